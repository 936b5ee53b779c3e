// ==========================================
// 课程排课系统 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合排课引擎所需的所有 Repository
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::repository::{
    ActionLogRepository, CourseRepository, DivisionRepository, FacultyRepository,
    RoomRepository, TimeSlotRepository,
};

/// 排课引擎仓储集合
///
/// # 包含的仓储
/// - `faculty_repo`: 教师
/// - `division_repo`: 班级
/// - `room_repo`: 教室
/// - `time_slot_repo`: 时间段
/// - `course_repo`: 课程
/// - `action_log_repo`: 操作日志
#[derive(Clone)]
pub struct ScheduleRepositories {
    pub faculty_repo: Arc<FacultyRepository>,
    pub division_repo: Arc<DivisionRepository>,
    pub room_repo: Arc<RoomRepository>,
    pub time_slot_repo: Arc<TimeSlotRepository>,
    pub course_repo: Arc<CourseRepository>,
    pub action_log_repo: Arc<ActionLogRepository>,
}

impl ScheduleRepositories {
    /// 基于同一共享连接创建全部仓储
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            faculty_repo: Arc::new(FacultyRepository::new(conn.clone())),
            division_repo: Arc::new(DivisionRepository::new(conn.clone())),
            room_repo: Arc::new(RoomRepository::new(conn.clone())),
            time_slot_repo: Arc::new(TimeSlotRepository::new(conn.clone())),
            course_repo: Arc::new(CourseRepository::new(conn.clone())),
            action_log_repo: Arc::new(ActionLogRepository::new(conn)),
        }
    }
}

// 注: ScheduleRepositories 只是聚合结构体,
// 其正确性由引擎集成测试验证。
