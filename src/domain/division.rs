// ==========================================
// 课程排课系统 - 班级领域模型
// ==========================================
// 对齐: division 表
// ==========================================

use serde::{Deserialize, Serialize};

/// 学生班级
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    pub id: i64,
    pub name: String, // 唯一, 如 "Division A"
}
