// ==========================================
// 课程排课系统 - 教师领域模型
// ==========================================
// 对齐: faculty 表
// 说明: 登录/密码属于认证层,不在本模型中
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Faculty - 教师
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: i64,                    // 主键
    pub username: String,           // 用户名 (唯一)
    pub email: String,              // 邮箱 (唯一)
    pub name: String,               // 显示名称
    pub department: Option<String>, // 所属院系
}

// ==========================================
// NewFaculty - 待注册教师
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFaculty {
    pub username: String,
    pub email: String,
    pub name: String,
    pub department: Option<String>,
}
