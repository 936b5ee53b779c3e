// ==========================================
// 课程排课系统 - 教师数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::faculty::{Faculty, NewFaculty};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = "SELECT id, username, email, name, department FROM faculty";

fn map_faculty(row: &Row<'_>) -> rusqlite::Result<Faculty> {
    Ok(Faculty {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        name: row.get(3)?,
        department: row.get(4)?,
    })
}

// ==========================================
// FacultyRepository - 教师仓储
// ==========================================
/// 职责: 管理 faculty 表的 CRUD 操作
pub struct FacultyRepository {
    conn: Arc<Mutex<Connection>>,
}

impl FacultyRepository {
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

    /// 注册教师
    ///
    /// # 返回
    /// - Ok(Faculty): 新建的教师记录
    /// - Err(UniqueConstraintViolation): 用户名或邮箱已存在
    pub fn create(&self, faculty: &NewFaculty) -> RepositoryResult<Faculty> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO faculty (username, email, name, department) VALUES (?1, ?2, ?3, ?4)",
            params![faculty.username, faculty.email, faculty.name, faculty.department],
        )?;

        Ok(Faculty {
            id: conn.last_insert_rowid(),
            username: faculty.username.clone(),
            email: faculty.email.clone(),
            name: faculty.name.clone(),
            department: faculty.department.clone(),
        })
    }

    /// 按主键查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Faculty>> {
        let conn = self.get_conn()?;
        let faculty = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                map_faculty,
            )
            .optional()?;
        Ok(faculty)
    }

    /// 查询全部教师（按姓名排序）
    pub fn find_all(&self) -> RepositoryResult<Vec<Faculty>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY name ASC, id ASC", SELECT_COLUMNS))?;
        let list = stmt
            .query_map([], map_faculty)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(list)
    }

    /// 按用户名或邮箱查询（注册查重）
    pub fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> RepositoryResult<Option<Faculty>> {
        let conn = self.get_conn()?;
        let faculty = conn
            .query_row(
                &format!("{} WHERE username = ?1 OR email = ?2 LIMIT 1", SELECT_COLUMNS),
                params![username, email],
                map_faculty,
            )
            .optional()?;
        Ok(faculty)
    }
}
