// ==========================================
// 课程排课系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 排课冲突属于正常结果,不在此列
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 排课引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 输入错误 =====
    #[error("引用的实体不存在: {entity} with id={id}")]
    NotFound { entity: String, id: i64 },

    #[error("输入无效: {0}")]
    InvalidInput(String),

    // ===== 并发错误 =====
    #[error("引擎锁已中毒: {0}")]
    LockPoisoned(String),

    // ===== 数据库错误 =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl EngineError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        EngineError::NotFound {
            entity: entity.to_string(),
            id,
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
