// ==========================================
// 课程排课系统 - 教室领域模型
// ==========================================
// 对齐: room 表
// ==========================================

use serde::{Deserialize, Serialize};

/// 默认教室容量
pub const DEFAULT_ROOM_CAPACITY: i32 = 30;

/// 教室 / 实验室
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,  // 唯一, 如 "Room 101"
    pub capacity: i32, // 容量
    pub is_lab: bool,  // 是否实验室
}
