// ==========================================
// 课程排课系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、值类型、枚举
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod course;
pub mod division;
pub mod faculty;
pub mod room;
pub mod time_slot;
pub mod types;

// 重导出核心类型
pub use action_log::ActionLog;
pub use course::{CandidateAssignment, Course, CourseUpdate, NewCourse};
pub use division::Division;
pub use faculty::{Faculty, NewFaculty};
pub use room::Room;
pub use time_slot::TimeSlot;
pub use types::{ActionType, ConflictReason, Weekday};
