// ==========================================
// 课程排课系统 - 课程领域模型
// ==========================================
// 对齐: course 表
// 红线: 同一 (教师, 时间段) / (教室, 时间段) 至多一门课程
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Course - 已排课程
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub faculty_id: i64,
    pub division_id: i64,
    pub room_id: i64,
    pub time_slot_id: i64,
    pub created_at: NaiveDateTime,
}

impl Course {
    /// 提取本课程占用的排课组合
    pub fn assignment(&self) -> CandidateAssignment {
        CandidateAssignment {
            faculty_id: self.faculty_id,
            division_id: self.division_id,
            room_id: self.room_id,
            time_slot_id: self.time_slot_id,
        }
    }

    /// 两门课程是否冲突
    ///
    /// 同一时间段,且教师、教室、班级三者之一相同
    pub fn conflicts_with(&self, other: &Course) -> bool {
        self.id != other.id && self.assignment().conflicts_with(other)
    }
}

// ==========================================
// CandidateAssignment - 候选排课组合
// ==========================================
// 不落库的值类型,仅用于探测冲突索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateAssignment {
    pub faculty_id: i64,
    pub division_id: i64,
    pub room_id: i64,
    pub time_slot_id: i64,
}

impl CandidateAssignment {
    pub fn new(faculty_id: i64, division_id: i64, room_id: i64, time_slot_id: i64) -> Self {
        Self {
            faculty_id,
            division_id,
            room_id,
            time_slot_id,
        }
    }

    /// 与已有课程是否冲突
    pub fn conflicts_with(&self, course: &Course) -> bool {
        self.time_slot_id == course.time_slot_id
            && (self.faculty_id == course.faculty_id
                || self.room_id == course.room_id
                || self.division_id == course.division_id)
    }
}

// ==========================================
// NewCourse - 待创建课程
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourse {
    pub name: String,
    pub assignment: CandidateAssignment,
}

// ==========================================
// CourseUpdate - 课程修改内容
// ==========================================
// 教师不可修改,其余字段整体覆盖
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseUpdate {
    pub name: String,
    pub division_id: i64,
    pub room_id: i64,
    pub time_slot_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn course(id: i64, faculty: i64, division: i64, room: i64, slot: i64) -> Course {
        Course {
            id,
            name: format!("C{}", id),
            faculty_id: faculty,
            division_id: division,
            room_id: room,
            time_slot_id: slot,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_conflict_requires_same_slot() {
        let a = course(1, 1, 1, 1, 1);
        let b = course(2, 1, 1, 1, 2);
        assert!(!a.conflicts_with(&b));
    }

    #[test]
    fn test_conflict_on_any_shared_resource() {
        let a = course(1, 1, 1, 1, 1);
        assert!(a.conflicts_with(&course(2, 1, 2, 2, 1))); // 教师
        assert!(a.conflicts_with(&course(3, 2, 2, 1, 1))); // 教室
        assert!(a.conflicts_with(&course(4, 2, 1, 2, 1))); // 班级
        assert!(!a.conflicts_with(&course(5, 2, 2, 2, 1)));
    }

    #[test]
    fn test_course_never_conflicts_with_itself() {
        let a = course(1, 1, 1, 1, 1);
        assert!(!a.conflicts_with(&a.clone()));
    }
}
