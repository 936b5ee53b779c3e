// ==========================================
// 课程排课系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{CatalogApi, TimetableApi};
use crate::config::{ConfigManager, SchedulerConfigReader, SchedulingPolicy};
use crate::db::{init_schema, open_shared_connection};
use crate::engine::{ScheduleRepositories, SchedulingEngine};
use crate::i18n;
use crate::seed::seed_default_catalog;

/// 应用状态
///
/// 所有仓储共享同一连接; 排课引擎持有冲突索引
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 共享数据库连接
    pub conn: Arc<Mutex<Connection>>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 排课引擎
    pub engine: Arc<SchedulingEngine>,

    /// 排课API
    pub timetable_api: Arc<TimetableApi>,

    /// 目录API
    pub catalog_api: Arc<CatalogApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并建表
    /// 2. 空库时写入预置数据
    /// 3. 加载排课策略与默认语言
    /// 4. 构建冲突索引与API实例
    pub async fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_shared_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;

        {
            let guard = conn.lock().map_err(|e| format!("数据库锁获取失败: {}", e))?;
            init_schema(&guard).map_err(|e| format!("建表失败: {}", e))?;
            seed_default_catalog(&guard).map_err(|e| format!("预置数据写入失败: {}", e))?;
        }

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone()));
        let policy = SchedulingPolicy::load(config_manager.as_ref()).await;

        match config_manager.get_default_locale().await {
            Ok(locale) => {
                i18n::set_locale(&locale);
            }
            Err(e) => tracing::warn!("读取默认语言失败(将使用 zh-CN): {}", e),
        }

        tracing::info!(
            division_blocking = policy.division_blocking,
            week_days = policy.week_days.len(),
            "排课策略已加载"
        );

        // ==========================================
        // 引擎与API
        // ==========================================
        let repos = ScheduleRepositories::from_connection(conn.clone());
        let engine = Arc::new(SchedulingEngine::new(repos.clone(), policy));

        let index = engine
            .rebuild_index()
            .map_err(|e| format!("冲突索引构建失败: {}", e))?;
        tracing::info!("冲突索引就绪，课程数: {}", index.len());

        let timetable_api = Arc::new(TimetableApi::new(engine.clone()));
        let catalog_api = Arc::new(CatalogApi::new(repos));

        Ok(Self {
            db_path,
            conn,
            config_manager,
            engine,
            timetable_api,
            catalog_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先使用 TIMETABLE_DB_PATH 环境变量,否则放在用户数据目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("TIMETABLE_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./timetable.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("timetable-scheduler-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("timetable-scheduler");
        }

        // 目录创建失败时 Connection::open 会给出明确错误
        std::fs::create_dir_all(&path).ok();
        path = path.join("timetable.db");
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }
}
