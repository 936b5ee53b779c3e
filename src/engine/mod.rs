// ==========================================
// 课程排课系统 - 引擎层
// ==========================================
// 职责: 冲突检测、排课提交、课表投影
// 红线: Engine 不拼 SQL, 所有拒绝必须输出 reason
// ==========================================

pub mod conflict_index;
pub mod error;
pub mod repositories;
pub mod scheduler;
pub mod timetable;

// 重导出核心引擎
pub use conflict_index::{ConflictIndex, SharedConflictIndex};
pub use error::{EngineError, EngineResult};
pub use repositories::ScheduleRepositories;
pub use scheduler::{AssignmentOutcome, ConflictDetail, ScheduleConflict, SchedulingEngine};
pub use timetable::{project, NameLookup, Timetable, TimetableCell, TimetableDay, TimetableEntry};
