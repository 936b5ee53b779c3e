use crate::config::scheduler_config_trait::SchedulerConfigReader;
use crate::domain::types::Weekday;
use serde::{Deserialize, Serialize};

/// 排课策略（启动时从 config_kv 加载一次）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingPolicy {
    /// 班级冲突是否阻断排课（默认仅提示）
    #[serde(default)]
    pub division_blocking: bool,

    /// 课表展示的教学日顺序
    #[serde(default = "default_week_days")]
    pub week_days: Vec<Weekday>,
}

fn default_week_days() -> Vec<Weekday> {
    Weekday::ALL.to_vec()
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            division_blocking: false,
            week_days: default_week_days(),
        }
    }
}

impl SchedulingPolicy {
    /// 从配置读取器加载
    ///
    /// 单项读取失败时记录告警并使用默认值,不阻断启动
    pub async fn load(reader: &dyn SchedulerConfigReader) -> Self {
        let defaults = Self::default();

        let division_blocking = match reader.get_division_conflict_blocking().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "读取 division_conflict_blocking 失败,使用默认值");
                defaults.division_blocking
            }
        };

        let week_days = match reader.get_week_days().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "读取 week_days 失败,使用默认值");
                defaults.week_days
            }
        };

        Self {
            division_blocking,
            week_days,
        }
    }

    /// 班级阻断模式
    pub fn with_division_blocking(mut self, blocking: bool) -> Self {
        self.division_blocking = blocking;
        self
    }
}
