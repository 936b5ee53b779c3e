// ==========================================
// 课程排课系统 - 预置数据
// ==========================================
// 职责: 空库时写入时间段、班级、教室
// 触发: time_slot 表为空
// ==========================================

use crate::domain::room::DEFAULT_ROOM_CAPACITY;
use crate::domain::types::Weekday;
use rusqlite::{params, Connection};

/// 每天的课时 (开始, 结束)
pub const DEFAULT_DAILY_PERIODS: [(&str, &str); 5] = [
    ("09:00", "10:00"),
    ("10:00", "11:00"),
    ("11:00", "12:00"),
    ("13:00", "14:00"),
    ("14:00", "15:00"),
];

pub const DEFAULT_DIVISIONS: [&str; 3] = ["Division A", "Division B", "Division C"];

/// (名称, 容量, 是否实验室)
pub const DEFAULT_ROOMS: [(&str, i32, bool); 5] = [
    ("Room 101", DEFAULT_ROOM_CAPACITY, false),
    ("Room 102", 40, false),
    ("Room 103", 35, false),
    ("Lab 201", 25, true),
    ("Lab 202", 30, true),
];

/// 预置结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub time_slots: usize,
    pub divisions: usize,
    pub rooms: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.time_slots == 0 && self.divisions == 0 && self.rooms == 0
    }
}

/// 时间段表是否为空
pub fn needs_seed(conn: &Connection) -> rusqlite::Result<bool> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM time_slot", [], |row| row.get(0))?;
    Ok(n == 0)
}

/// 写入默认排课目录（单事务）
///
/// time_slot 已有数据时不做任何修改
pub fn seed_default_catalog(conn: &Connection) -> rusqlite::Result<SeedReport> {
    if !needs_seed(conn)? {
        tracing::debug!("时间段已存在,跳过预置数据");
        return Ok(SeedReport::default());
    }

    let tx = conn.unchecked_transaction()?;
    let mut report = SeedReport::default();

    for day in Weekday::ALL {
        for (start, end) in DEFAULT_DAILY_PERIODS {
            tx.execute(
                "INSERT INTO time_slot (day, start_time, end_time) VALUES (?1, ?2, ?3)",
                params![day.as_str(), start, end],
            )?;
            report.time_slots += 1;
        }
    }

    for name in DEFAULT_DIVISIONS {
        report.divisions += tx.execute(
            "INSERT OR IGNORE INTO division (name) VALUES (?1)",
            params![name],
        )?;
    }

    for (name, capacity, is_lab) in DEFAULT_ROOMS {
        report.rooms += tx.execute(
            "INSERT OR IGNORE INTO room (name, capacity, is_lab) VALUES (?1, ?2, ?3)",
            params![name, capacity, is_lab],
        )?;
    }

    tx.commit()?;
    tracing::info!(
        time_slots = report.time_slots,
        divisions = report.divisions,
        rooms = report.rooms,
        "预置数据写入完成"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};

    fn fresh() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_seed_inserts_full_week() {
        let conn = fresh();
        let report = seed_default_catalog(&conn).unwrap();
        assert_eq!(
            report,
            SeedReport {
                time_slots: 25,
                divisions: 3,
                rooms: 5
            }
        );

        let labs: i64 = conn
            .query_row("SELECT COUNT(*) FROM room WHERE is_lab = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(labs, 2);
    }

    #[test]
    fn test_seed_is_noop_when_slots_exist() {
        let conn = fresh();
        seed_default_catalog(&conn).unwrap();
        let second = seed_default_catalog(&conn).unwrap();
        assert!(second.is_empty());

        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM time_slot", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 25);
    }
}
