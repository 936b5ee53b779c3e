// ==========================================
// 课程排课系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 课程排课冲突检测与课表生成
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 冲突检测与排课
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/建表）
pub mod db;

// 预置数据
pub mod seed;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ActionType, ConflictReason, Weekday};

// 领域实体
pub use domain::{
    ActionLog, CandidateAssignment, Course, CourseUpdate, Division, Faculty, NewCourse,
    NewFaculty, Room, TimeSlot,
};

// 引擎
pub use engine::{
    AssignmentOutcome, ConflictDetail, ConflictIndex, ScheduleConflict, SchedulingEngine,
    Timetable,
};

// API
pub use api::{CatalogApi, TimetableApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "课程排课系统";
