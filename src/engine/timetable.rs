// ==========================================
// 课程排课系统 - 课表投影
// ==========================================
// 职责: 将课程列表投影为 星期 × 时间段 网格
// 红线: 纯函数,不访问数据库,不修改输入
// ==========================================

use crate::domain::course::Course;
use crate::domain::division::Division;
use crate::domain::faculty::Faculty;
use crate::domain::room::Room;
use crate::domain::time_slot::TimeSlot;
use crate::domain::types::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// 课表结构
// ==========================================

/// 单元格中的一门课程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub course_id: i64,
    pub course_name: String,
    pub room_name: String,
    pub division_name: String,
    pub faculty_name: String,
}

/// 一个时间段单元格; 无课时 entries 为空
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableCell {
    pub time_slot_id: i64,
    pub time_key: String,
    pub entries: Vec<TimetableEntry>,
}

impl TimetableCell {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 一天的课表（列按 HH:MM-HH:MM 排序）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableDay {
    pub day: Weekday,
    pub cells: Vec<TimetableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    pub days: Vec<TimetableDay>,
}

impl Timetable {
    pub fn day(&self, day: Weekday) -> Option<&TimetableDay> {
        self.days.iter().find(|d| d.day == day)
    }

    /// 按 (星期, "HH:MM-HH:MM") 定位单元格
    pub fn cell(&self, day: Weekday, time_key: &str) -> Option<&TimetableCell> {
        self.day(day)?.cells.iter().find(|c| c.time_key == time_key)
    }

    /// 已排课程条目总数
    pub fn entry_count(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| d.cells.iter())
            .map(|c| c.entries.len())
            .sum()
    }
}

// ==========================================
// NameLookup - 展示名称查找表
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct NameLookup {
    rooms: HashMap<i64, String>,
    divisions: HashMap<i64, String>,
    faculty: HashMap<i64, String>,
}

impl NameLookup {
    pub fn new(rooms: &[Room], divisions: &[Division], faculty: &[Faculty]) -> Self {
        Self {
            rooms: rooms.iter().map(|r| (r.id, r.name.clone())).collect(),
            divisions: divisions.iter().map(|d| (d.id, d.name.clone())).collect(),
            faculty: faculty.iter().map(|f| (f.id, f.name.clone())).collect(),
        }
    }

    pub fn room(&self, id: i64) -> String {
        name_or_id(&self.rooms, id)
    }

    pub fn division(&self, id: i64) -> String {
        name_or_id(&self.divisions, id)
    }

    pub fn faculty(&self, id: i64) -> String {
        name_or_id(&self.faculty, id)
    }
}

fn name_or_id(names: &HashMap<i64, String>, id: i64) -> String {
    names.get(&id).cloned().unwrap_or_else(|| format!("#{}", id))
}

// ==========================================
// 投影
// ==========================================

/// 将课程投影到课表网格
///
/// # 参数
/// - courses: 待展示课程（教师或班级过滤后的结果）
/// - time_slots: 全部预置时间段,决定每天的列
/// - names: 教室/班级/教师展示名
/// - day_order: 展示的教学日及顺序
///
/// 引用了未知时间段或不在 day_order 中的课程会被跳过
pub fn project(
    courses: &[Course],
    time_slots: &[TimeSlot],
    names: &NameLookup,
    day_order: &[Weekday],
) -> Timetable {
    let slot_by_id: HashMap<i64, &TimeSlot> = time_slots.iter().map(|s| (s.id, s)).collect();

    let mut days: Vec<TimetableDay> = day_order
        .iter()
        .map(|day| {
            let mut slots: Vec<&TimeSlot> =
                time_slots.iter().filter(|s| s.day == *day).collect();
            slots.sort_by(|a, b| a.chronological_cmp(b));
            slots.dedup_by_key(|s| s.time_key());

            TimetableDay {
                day: *day,
                cells: slots
                    .into_iter()
                    .map(|s| TimetableCell {
                        time_slot_id: s.id,
                        time_key: s.time_key(),
                        entries: Vec::new(),
                    })
                    .collect(),
            }
        })
        .collect();

    let mut ordered: Vec<&Course> = courses.iter().collect();
    ordered.sort_by_key(|c| c.id);

    for course in ordered {
        let Some(slot) = slot_by_id.get(&course.time_slot_id) else {
            tracing::debug!(course_id = course.id, time_slot_id = course.time_slot_id, "课程引用未知时间段,跳过");
            continue;
        };

        let time_key = slot.time_key();
        let cell = days
            .iter_mut()
            .find(|d| d.day == slot.day)
            .and_then(|d| d.cells.iter_mut().find(|c| c.time_key == time_key));

        match cell {
            Some(cell) => cell.entries.push(TimetableEntry {
                course_id: course.id,
                course_name: course.name.clone(),
                room_name: names.room(course.room_id),
                division_name: names.division(course.division_id),
                faculty_name: names.faculty(course.faculty_id),
            }),
            None => {
                tracing::debug!(course_id = course.id, day = %slot.day, "课程不在展示日内,跳过");
            }
        }
    }

    Timetable { days }
}
