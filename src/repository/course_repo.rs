// ==========================================
// 课程排课系统 - 课程数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑,冲突校验由排课引擎负责
// 说明: 写入只能经由 SchedulingEngine 调用
// ==========================================

use crate::domain::course::{Course, CourseUpdate, NewCourse};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str =
    "SELECT id, name, faculty_id, division_id, room_id, time_slot_id, created_at FROM course";

fn map_course(row: &Row<'_>) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get(0)?,
        name: row.get(1)?,
        faculty_id: row.get(2)?,
        division_id: row.get(3)?,
        room_id: row.get(4)?,
        time_slot_id: row.get(5)?,
        created_at: row.get(6)?,
    })
}

// ==========================================
// CourseRepository - 课程仓储
// ==========================================
pub struct CourseRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CourseRepository {
    /// 从共享连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入课程
    ///
    /// # 返回
    /// - Ok(Course): 已落库的课程（含新 id）
    /// - Err(UniqueConstraintViolation): 教师或教室在该时间段已被占用
    /// - Err(ForeignKeyViolation): 引用了不存在的教师/班级/教室/时间段
    pub fn insert(&self, course: &NewCourse, created_at: NaiveDateTime) -> RepositoryResult<Course> {
        let conn = self.get_conn()?;
        let a = &course.assignment;
        conn.execute(
            r#"
            INSERT INTO course (name, faculty_id, division_id, room_id, time_slot_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                course.name,
                a.faculty_id,
                a.division_id,
                a.room_id,
                a.time_slot_id,
                created_at,
            ],
        )?;

        Ok(Course {
            id: conn.last_insert_rowid(),
            name: course.name.clone(),
            faculty_id: a.faculty_id,
            division_id: a.division_id,
            room_id: a.room_id,
            time_slot_id: a.time_slot_id,
            created_at,
        })
    }

    /// 覆盖更新课程（教师与创建时间不变）
    ///
    /// # 返回
    /// - Ok(Course): 更新后的课程
    /// - Err(NotFound): 课程不存在
    pub fn update(&self, id: i64, update: &CourseUpdate) -> RepositoryResult<Course> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let affected = tx.execute(
            r#"
            UPDATE course
            SET name = ?1, division_id = ?2, room_id = ?3, time_slot_id = ?4
            WHERE id = ?5
            "#,
            params![update.name, update.division_id, update.room_id, update.time_slot_id, id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Course", id));
        }

        let course = tx.query_row(
            &format!("{} WHERE id = ?1", SELECT_COLUMNS),
            params![id],
            map_course,
        )?;
        tx.commit()?;
        Ok(course)
    }

    /// 删除课程
    ///
    /// # 返回
    /// - Err(NotFound): 课程不存在
    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM course WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Course", id));
        }
        Ok(())
    }

    // ==========================================
    // 查询操作
    // ==========================================

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Course>> {
        let conn = self.get_conn()?;
        let course = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                map_course,
            )
            .optional()?;
        Ok(course)
    }

    /// 查询全部课程（冲突索引重建的数据源）
    pub fn find_all(&self) -> RepositoryResult<Vec<Course>> {
        self.query_list(&format!("{} ORDER BY id ASC", SELECT_COLUMNS), None)
    }

    /// 按教师过滤
    pub fn find_by_faculty(&self, faculty_id: i64) -> RepositoryResult<Vec<Course>> {
        self.query_list(
            &format!("{} WHERE faculty_id = ?1 ORDER BY id ASC", SELECT_COLUMNS),
            Some(faculty_id),
        )
    }

    /// 按班级过滤
    pub fn find_by_division(&self, division_id: i64) -> RepositoryResult<Vec<Course>> {
        self.query_list(
            &format!("{} WHERE division_id = ?1 ORDER BY id ASC", SELECT_COLUMNS),
            Some(division_id),
        )
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM course", [], |row| row.get(0))?;
        Ok(n)
    }

    fn query_list(&self, sql: &str, filter: Option<i64>) -> RepositoryResult<Vec<Course>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(sql)?;
        let courses = match filter {
            Some(id) => stmt.query_map(params![id], map_course)?.collect::<rusqlite::Result<Vec<_>>>()?,
            None => stmt.query_map([], map_course)?.collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(courses)
    }
}
