// ==========================================
// 课程排课系统 - 操作日志领域模型
// ==========================================
// 红线: 所有课程写入必须记录
// 对齐: action_log 表
// ==========================================

use crate::domain::types::ActionType;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,               // UUID
    pub action_type: String,             // 存储为字符串
    pub action_ts: NaiveDateTime,        // 操作时间
    pub actor: String,                   // 操作人
    pub course_id: Option<i64>,          // 关联课程
    pub payload_json: Option<JsonValue>, // 操作参数
    pub detail: Option<String>,          // 描述
}

impl ActionLog {
    /// 创建一条当前时间的日志
    pub fn new(
        action_type: ActionType,
        actor: impl Into<String>,
        course_id: Option<i64>,
        payload_json: Option<JsonValue>,
        detail: Option<String>,
    ) -> Self {
        Self {
            action_id: Uuid::new_v4().to_string(),
            action_type: action_type.as_str().to_string(),
            action_ts: Utc::now().naive_utc(),
            actor: actor.into(),
            course_id,
            payload_json,
            detail,
        }
    }
}
