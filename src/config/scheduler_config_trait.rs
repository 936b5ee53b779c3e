// ==========================================
// 课程排课系统 - 排课配置读取 Trait
// ==========================================
// 职责: 定义排课引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::Weekday;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// SchedulerConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait SchedulerConfigReader: Send + Sync {
    /// 班级冲突是否阻断排课
    ///
    /// # 默认值
    /// - false（班级冲突仅作提示,只有教师/教室冲突阻断）
    async fn get_division_conflict_blocking(&self) -> Result<bool, Box<dyn Error + Send + Sync>>;

    /// 课表展示的教学日及顺序
    ///
    /// # 默认值
    /// - Monday,Tuesday,Wednesday,Thursday,Friday
    async fn get_week_days(&self) -> Result<Vec<Weekday>, Box<dyn Error + Send + Sync>>;

    /// 默认提示语言
    ///
    /// # 默认值
    /// - zh-CN
    async fn get_default_locale(&self) -> Result<String, Box<dyn Error + Send + Sync>>;
}
