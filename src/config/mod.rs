// ==========================================
// 课程排课系统 - 配置层
// ==========================================
// 职责: 系统配置管理,启动时加载排课策略
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod scheduler_config_trait;
pub mod scheduling_policy;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use scheduler_config_trait::SchedulerConfigReader;
pub use scheduling_policy::SchedulingPolicy;
