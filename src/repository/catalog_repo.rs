// ==========================================
// 课程排课系统 - 基础目录数据仓储
// ==========================================
// 范围: division / room / time_slot 三张预置表
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::division::Division;
use crate::domain::room::Room;
use crate::domain::time_slot::{parse_time, sort_chronologically, TimeSlot, TIME_FORMAT};
use crate::domain::types::Weekday;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

fn lock(conn: &Arc<Mutex<Connection>>) -> RepositoryResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| RepositoryError::LockError(e.to_string()))
}

// ==========================================
// DivisionRepository - 班级仓储
// ==========================================
pub struct DivisionRepository {
    conn: Arc<Mutex<Connection>>,
}

fn map_division(row: &Row<'_>) -> rusqlite::Result<Division> {
    Ok(Division {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

impl DivisionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 创建班级,返回新 id
    pub fn create(&self, name: &str) -> RepositoryResult<i64> {
        let conn = lock(&self.conn)?;
        conn.execute("INSERT INTO division (name) VALUES (?1)", params![name])?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Division>> {
        let conn = lock(&self.conn)?;
        let division = conn
            .query_row(
                "SELECT id, name FROM division WHERE id = ?1",
                params![id],
                map_division,
            )
            .optional()?;
        Ok(division)
    }

    pub fn find_all(&self) -> RepositoryResult<Vec<Division>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare("SELECT id, name FROM division ORDER BY id ASC")?;
        let list = stmt
            .query_map([], map_division)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(list)
    }
}

// ==========================================
// RoomRepository - 教室仓储
// ==========================================
pub struct RoomRepository {
    conn: Arc<Mutex<Connection>>,
}

fn map_room(row: &Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room {
        id: row.get(0)?,
        name: row.get(1)?,
        capacity: row.get(2)?,
        is_lab: row.get::<_, i64>(3)? != 0,
    })
}

impl RoomRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 创建教室,返回新 id
    pub fn create(&self, name: &str, capacity: i32, is_lab: bool) -> RepositoryResult<i64> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO room (name, capacity, is_lab) VALUES (?1, ?2, ?3)",
            params![name, capacity, is_lab as i64],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Room>> {
        let conn = lock(&self.conn)?;
        let room = conn
            .query_row(
                "SELECT id, name, capacity, is_lab FROM room WHERE id = ?1",
                params![id],
                map_room,
            )
            .optional()?;
        Ok(room)
    }

    pub fn find_all(&self) -> RepositoryResult<Vec<Room>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare("SELECT id, name, capacity, is_lab FROM room ORDER BY id ASC")?;
        let list = stmt
            .query_map([], map_room)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(list)
    }
}

// ==========================================
// TimeSlotRepository - 时间段仓储
// ==========================================
// 存储: day 为英文星期名, start_time/end_time 为 HH:MM 文本
pub struct TimeSlotRepository {
    conn: Arc<Mutex<Connection>>,
}

/// 原始行（day/time 仍为文本,转换在锁外完成）
struct TimeSlotRow {
    id: i64,
    day: String,
    start_time: String,
    end_time: String,
}

impl TimeSlotRow {
    fn into_domain(self) -> RepositoryResult<TimeSlot> {
        let day = self
            .day
            .parse::<Weekday>()
            .map_err(|message| RepositoryError::FieldValueError {
                field: "time_slot.day".to_string(),
                message,
            })?;
        let start_time = parse_stored_time("time_slot.start_time", &self.start_time)?;
        let end_time = parse_stored_time("time_slot.end_time", &self.end_time)?;
        Ok(TimeSlot {
            id: self.id,
            day,
            start_time,
            end_time,
        })
    }
}

fn parse_stored_time(field: &str, raw: &str) -> RepositoryResult<NaiveTime> {
    parse_time(raw).ok_or_else(|| RepositoryError::FieldValueError {
        field: field.to_string(),
        message: format!("无法解析时间: {}", raw),
    })
}

fn map_time_slot_row(row: &Row<'_>) -> rusqlite::Result<TimeSlotRow> {
    Ok(TimeSlotRow {
        id: row.get(0)?,
        day: row.get(1)?,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
    })
}

impl TimeSlotRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 创建时间段,返回新 id
    pub fn create(
        &self,
        day: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> RepositoryResult<i64> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO time_slot (day, start_time, end_time) VALUES (?1, ?2, ?3)",
            params![
                day.as_str(),
                start_time.format(TIME_FORMAT).to_string(),
                end_time.format(TIME_FORMAT).to_string(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<TimeSlot>> {
        let row = {
            let conn = lock(&self.conn)?;
            let row = conn
                .query_row(
                    "SELECT id, day, start_time, end_time FROM time_slot WHERE id = ?1",
                    params![id],
                    map_time_slot_row,
                )
                .optional()?;
            row
        };
        row.map(TimeSlotRow::into_domain).transpose()
    }

    /// 查询全部时间段（按星期 → 开始时间排序）
    pub fn find_all(&self) -> RepositoryResult<Vec<TimeSlot>> {
        let rows = {
            let conn = lock(&self.conn)?;
            let mut stmt = conn.prepare("SELECT id, day, start_time, end_time FROM time_slot")?;
            let rows = stmt
                .query_map([], map_time_slot_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        };

        let mut slots = rows
            .into_iter()
            .map(TimeSlotRow::into_domain)
            .collect::<RepositoryResult<Vec<_>>>()?;
        sort_chronologically(&mut slots);
        Ok(slots)
    }

    /// 时间段总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = lock(&self.conn)?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM time_slot", [], |row| row.get(0))?;
        Ok(n)
    }
}
