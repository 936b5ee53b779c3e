// ==========================================
// 课程排课系统 - 领域类型定义
// ==========================================
// 职责: 星期、冲突原因、操作类型等枚举
// 约定: 数据库存储格式与 Display 输出保持一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 星期 (Weekday)
// ==========================================
// 红线: 固定 5 天教学周,声明顺序即展示顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// 教学周全部日期（周一至周五）
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// 转换为数据库存储字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }

    /// 在教学周中的序号（周一为 0）
    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = String;

    /// 大小写不敏感,允许前后空白
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monday" => Ok(Weekday::Monday),
            "tuesday" => Ok(Weekday::Tuesday),
            "wednesday" => Ok(Weekday::Wednesday),
            "thursday" => Ok(Weekday::Thursday),
            "friday" => Ok(Weekday::Friday),
            other => Err(format!("无效的星期: {}", other)),
        }
    }
}

// ==========================================
// 冲突原因 (Conflict Reason)
// ==========================================
// 优先级: 教室 > 教师 > 班级(仅在阻断模式下) > 通用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictReason {
    RoomConflict,       // 教室已被占用
    FacultyConflict,    // 教师同一时段已有课程
    DivisionConflict,   // 班级同一时段已有课程
    SchedulingConflict, // 通用冲突
}

impl ConflictReason {
    /// 原因代码（供调用方做分支判断）
    pub fn code(&self) -> &'static str {
        match self {
            ConflictReason::RoomConflict => "ROOM_CONFLICT",
            ConflictReason::FacultyConflict => "FACULTY_CONFLICT",
            ConflictReason::DivisionConflict => "DIVISION_CONFLICT",
            ConflictReason::SchedulingConflict => "SCHEDULING_CONFLICT",
        }
    }

    /// 对应的国际化消息键
    pub fn message_key(&self) -> &'static str {
        match self {
            ConflictReason::RoomConflict => "schedule.room_conflict",
            ConflictReason::FacultyConflict => "schedule.faculty_conflict",
            ConflictReason::DivisionConflict => "schedule.division_conflict",
            ConflictReason::SchedulingConflict => "schedule.generic_conflict",
        }
    }
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ==========================================
// 操作类型 (Action Type)
// ==========================================
// 用途: 审计日志 action_type 字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    ScheduleCourse, // 新增排课
    EditCourse,     // 修改排课
    DeleteCourse,   // 删除排课
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::ScheduleCourse => "SCHEDULE_COURSE",
            ActionType::EditCourse => "EDIT_COURSE",
            ActionType::DeleteCourse => "DELETE_COURSE",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
