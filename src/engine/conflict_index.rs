// ==========================================
// 课程排课系统 - 冲突索引
// ==========================================
// 职责: 基于全部课程构建内存索引,回答占用查询
// 结构: faculty_busy[教师][时间段] / room_busy[教室][时间段] / slot_courses[时间段]
// 红线: 只做两两冲突判断,不做全局优化
// 红线: 索引整体重建并整体替换,读者不会看到半成品
// ==========================================

use crate::domain::course::{CandidateAssignment, Course};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

// ==========================================
// ConflictIndex - 冲突索引
// ==========================================
#[derive(Debug, Default, Clone)]
pub struct ConflictIndex {
    faculty_busy: HashMap<i64, HashMap<i64, Course>>,
    room_busy: HashMap<i64, HashMap<i64, Course>>,
    slot_courses: HashMap<i64, Vec<Course>>,
    course_count: usize,
    built: bool,
}

impl ConflictIndex {
    /// 创建未构建的空索引
    pub fn new() -> Self {
        Self::default()
    }

    /// 一次遍历构建索引
    pub fn build(courses: &[Course]) -> Self {
        let mut index = Self::new();
        index.rebuild(courses);
        index
    }

    /// 清空并重新填充; O(n)
    pub fn rebuild(&mut self, courses: &[Course]) {
        self.faculty_busy.clear();
        self.room_busy.clear();
        self.slot_courses.clear();

        for course in courses {
            let slot = course.time_slot_id;

            if let Some(prev) = self
                .faculty_busy
                .entry(course.faculty_id)
                .or_default()
                .insert(slot, course.clone())
            {
                tracing::warn!(
                    faculty_id = course.faculty_id,
                    time_slot_id = slot,
                    previous_course_id = prev.id,
                    course_id = course.id,
                    "教师同一时段存在多门课程"
                );
            }

            if let Some(prev) = self
                .room_busy
                .entry(course.room_id)
                .or_default()
                .insert(slot, course.clone())
            {
                tracing::warn!(
                    room_id = course.room_id,
                    time_slot_id = slot,
                    previous_course_id = prev.id,
                    course_id = course.id,
                    "教室同一时段存在多门课程"
                );
            }

            self.slot_courses.entry(slot).or_default().push(course.clone());
        }

        self.course_count = courses.len();
        self.built = true;
    }

    /// 是否已从课程数据构建过
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// 已索引的课程数
    pub fn len(&self) -> usize {
        self.course_count
    }

    pub fn is_empty(&self) -> bool {
        self.course_count == 0
    }

    // ==========================================
    // 占用查询
    // ==========================================

    /// 教师与教室在该时间段是否都空闲（不检查班级）
    pub fn is_free(&self, faculty_id: i64, room_id: i64, time_slot_id: i64) -> bool {
        self.is_free_excluding(faculty_id, room_id, time_slot_id, None)
    }

    /// 同 is_free,但忽略指定课程（编辑时课程自身不算占用）
    pub fn is_free_excluding(
        &self,
        faculty_id: i64,
        room_id: i64,
        time_slot_id: i64,
        exclude_course_id: Option<i64>,
    ) -> bool {
        self.faculty_occupant_excluding(faculty_id, time_slot_id, exclude_course_id)
            .is_none()
            && self
                .room_occupant_excluding(room_id, time_slot_id, exclude_course_id)
                .is_none()
    }

    /// 教师在该时间段的课程
    pub fn faculty_occupant(&self, faculty_id: i64, time_slot_id: i64) -> Option<&Course> {
        self.faculty_occupant_excluding(faculty_id, time_slot_id, None)
    }

    /// 教室在该时间段的课程
    pub fn room_occupant(&self, room_id: i64, time_slot_id: i64) -> Option<&Course> {
        self.room_occupant_excluding(room_id, time_slot_id, None)
    }

    pub fn faculty_occupant_excluding(
        &self,
        faculty_id: i64,
        time_slot_id: i64,
        exclude_course_id: Option<i64>,
    ) -> Option<&Course> {
        lookup(&self.faculty_busy, faculty_id, time_slot_id, exclude_course_id)
    }

    pub fn room_occupant_excluding(
        &self,
        room_id: i64,
        time_slot_id: i64,
        exclude_course_id: Option<i64>,
    ) -> Option<&Course> {
        lookup(&self.room_busy, room_id, time_slot_id, exclude_course_id)
    }

    /// 班级在该时间段的全部课程（按 id 升序）
    pub fn division_occupants(
        &self,
        division_id: i64,
        time_slot_id: i64,
        exclude_course_id: Option<i64>,
    ) -> Vec<&Course> {
        let mut found: Vec<&Course> = self
            .slot_courses
            .get(&time_slot_id)
            .map(|courses| {
                courses
                    .iter()
                    .filter(|c| c.division_id == division_id && Some(c.id) != exclude_course_id)
                    .collect()
            })
            .unwrap_or_default();
        found.sort_by_key(|c| c.id);
        found
    }

    /// 教师忙碌时段 ∪ 教室忙碌时段
    pub fn busy_slots(&self, faculty_id: i64, room_id: i64) -> HashSet<i64> {
        self.busy_slots_excluding(faculty_id, room_id, None)
    }

    pub fn busy_slots_excluding(
        &self,
        faculty_id: i64,
        room_id: i64,
        exclude_course_id: Option<i64>,
    ) -> HashSet<i64> {
        let faculty_slots = self.faculty_busy.get(&faculty_id).into_iter().flatten();
        let room_slots = self.room_busy.get(&room_id).into_iter().flatten();

        faculty_slots
            .chain(room_slots)
            .filter(|(_, course)| Some(course.id) != exclude_course_id)
            .map(|(slot, _)| *slot)
            .collect()
    }

    /// 与候选组合冲突的全部课程
    ///
    /// 同一时间段且教师、教室、班级之一相同; 结果按 id 升序
    pub fn conflicting_courses(&self, candidate: &CandidateAssignment) -> Vec<Course> {
        let mut found: Vec<Course> = self
            .slot_courses
            .get(&candidate.time_slot_id)
            .map(|courses| {
                courses
                    .iter()
                    .filter(|c| candidate.conflicts_with(c))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        found.sort_by_key(|c| c.id);
        found
    }
}

fn lookup(
    busy: &HashMap<i64, HashMap<i64, Course>>,
    owner_id: i64,
    time_slot_id: i64,
    exclude_course_id: Option<i64>,
) -> Option<&Course> {
    busy.get(&owner_id)
        .and_then(|slots| slots.get(&time_slot_id))
        .filter(|course| Some(course.id) != exclude_course_id)
}

// ==========================================
// SharedConflictIndex - 共享索引句柄
// ==========================================
// 读者取 Arc 快照; 重建后整体替换
#[derive(Debug, Default)]
pub struct SharedConflictIndex {
    inner: RwLock<Arc<ConflictIndex>>,
}

impl SharedConflictIndex {
    pub fn new(index: ConflictIndex) -> Self {
        Self {
            inner: RwLock::new(Arc::new(index)),
        }
    }

    /// 当前索引快照
    pub fn snapshot(&self) -> Arc<ConflictIndex> {
        // 替换只交换 Arc,锁中毒时数据仍完整
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// 整体替换索引,返回新快照
    pub fn replace(&self, index: ConflictIndex) -> Arc<ConflictIndex> {
        let next = Arc::new(index);
        match self.inner.write() {
            Ok(mut guard) => *guard = Arc::clone(&next),
            Err(poisoned) => *poisoned.into_inner() = Arc::clone(&next),
        }
        next
    }
}
