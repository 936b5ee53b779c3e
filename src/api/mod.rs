// ==========================================
// 课程排课系统 - API 层
// ==========================================
// 职责: 输入校验、所有权校验、面向用户的提示消息
// ==========================================

pub mod catalog_api;
pub mod error;
pub mod timetable_api;

// 重导出核心类型
pub use catalog_api::CatalogApi;
pub use error::{ApiError, ApiResult};
pub use timetable_api::{DeleteResponse, ScheduleRequest, ScheduleResponse, TimetableApi};
