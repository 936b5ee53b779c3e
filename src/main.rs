// ==========================================
// 课程排课系统 - 命令行入口
// ==========================================
// 职责: 初始化日志与应用状态,输出各班级课表占用情况
// ==========================================

use timetable_scheduler::app::{get_default_db_path, AppState};
use timetable_scheduler::engine::Timetable;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    timetable_scheduler::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", timetable_scheduler::APP_NAME);
    tracing::info!("系统版本: {}", timetable_scheduler::VERSION);
    tracing::info!("==================================================");

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path).await?;

    for division in state.catalog_api.list_divisions()? {
        let timetable = state.timetable_api.division_timetable(division.id)?;
        println!("== {} ==", division.name);
        print_timetable(&timetable);
    }

    Ok(())
}

fn print_timetable(timetable: &Timetable) {
    for day in &timetable.days {
        let cells: Vec<String> = day
            .cells
            .iter()
            .map(|cell| {
                if cell.entries.is_empty() {
                    format!("{} -", cell.time_key)
                } else {
                    let names: Vec<String> = cell
                        .entries
                        .iter()
                        .map(|e| format!("{} @ {}", e.course_name, e.room_name))
                        .collect();
                    format!("{} {}", cell.time_key, names.join(" / "))
                }
            })
            .collect();
        println!("{:<10} {}", day.day.as_str(), cells.join(" | "));
    }
}
