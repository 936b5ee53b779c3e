use chrono::Local;
use rusqlite::Connection;
use std::error::Error;
use std::fs;
use std::path::Path;

use timetable_scheduler::app::get_default_db_path;
use timetable_scheduler::db::{init_schema, open_sqlite_connection, read_schema_version};
use timetable_scheduler::seed::seed_default_catalog;

fn main() -> Result<(), Box<dyn Error>> {
    timetable_scheduler::logging::init();

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);

    backup_and_reset_db(&db_path)?;

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    let report = seed_default_catalog(&conn)?;

    eprintln!(
        "Seeded {}: {} time slots, {} divisions, {} rooms",
        db_path, report.time_slots, report.divisions, report.rooms
    );
    print_quick_counts(&conn)?;

    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn print_quick_counts(conn: &Connection) -> Result<(), Box<dyn Error>> {
    let version = read_schema_version(conn)?;
    eprintln!("schema_version: {:?}", version);

    for table in ["faculty", "division", "room", "time_slot", "course", "action_log"] {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        eprintln!("{:<12} {}", table, n);
    }
    Ok(())
}
