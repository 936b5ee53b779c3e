// ==========================================
// 课程排课系统 - 时间段领域模型
// ==========================================
// 对齐: time_slot 表
// 红线: 时间段为预置数据,创建后不可变
// ==========================================

use crate::domain::types::Weekday;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 时间格式（数据库存储与展示统一使用 HH:MM）
pub const TIME_FORMAT: &str = "%H:%M";

// ==========================================
// TimeSlot - 时间段
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: i64,
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl TimeSlot {
    /// 时间键 `"HH:MM-HH:MM"`,课表列标识
    pub fn time_key(&self) -> String {
        format!(
            "{}-{}",
            self.start_time.format(TIME_FORMAT),
            self.end_time.format(TIME_FORMAT)
        )
    }

    /// 展示键 `"{day} HH:MM-HH:MM"`
    pub fn display_key(&self) -> String {
        format!("{} {}", self.day, self.time_key())
    }

    /// 排序规则: 星期 → 开始时间 → 结束时间 → id
    pub fn chronological_cmp(&self, other: &TimeSlot) -> Ordering {
        self.day
            .cmp(&other.day)
            .then(self.start_time.cmp(&other.start_time))
            .then(self.end_time.cmp(&other.end_time))
            .then(self.id.cmp(&other.id))
    }
}

/// 按星期、开始时间排序（稳定且确定）
pub fn sort_chronologically(slots: &mut [TimeSlot]) {
    slots.sort_by(|a, b| a.chronological_cmp(b));
}

/// 解析 HH:MM 时间字符串
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: i64, day: Weekday, start: &str, end: &str) -> TimeSlot {
        TimeSlot {
            id,
            day,
            start_time: parse_time(start).unwrap(),
            end_time: parse_time(end).unwrap(),
        }
    }

    #[test]
    fn test_display_key() {
        let s = slot(1, Weekday::Monday, "09:00", "10:00");
        assert_eq!(s.time_key(), "09:00-10:00");
        assert_eq!(s.display_key(), "Monday 09:00-10:00");
    }

    #[test]
    fn test_sort_by_day_then_start() {
        let mut slots = vec![
            slot(3, Weekday::Tuesday, "09:00", "10:00"),
            slot(2, Weekday::Monday, "13:00", "14:00"),
            slot(1, Weekday::Monday, "09:00", "10:00"),
        ];
        sort_chronologically(&mut slots);
        let ids: Vec<i64> = slots.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        assert!(parse_time("9am").is_none());
        assert_eq!(parse_time(" 14:00 "), NaiveTime::from_hms_opt(14, 0, 0));
    }
}
