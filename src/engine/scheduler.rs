// ==========================================
// 课程排课系统 - 排课引擎
// ==========================================
// 职责: 校验并提交新增/修改排课,枚举空闲时段,解释冲突
// 流程: 校验实体 → 查冲突索引 → 落库 → 重建索引 → 记录日志
// 红线: Engine 不拼 SQL; 冲突时绝不自动改派
// 红线: 所有写操作在引擎写锁内完成
// ==========================================

use crate::config::scheduling_policy::SchedulingPolicy;
use crate::domain::action_log::ActionLog;
use crate::domain::course::{CandidateAssignment, Course, CourseUpdate, NewCourse};
use crate::domain::time_slot::TimeSlot;
use crate::domain::types::{ActionType, ConflictReason};
use crate::engine::conflict_index::{ConflictIndex, SharedConflictIndex};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::repositories::ScheduleRepositories;
use crate::engine::timetable::{project, NameLookup, Timetable};
use crate::i18n;
use crate::repository::error::RepositoryError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::instrument;

// ==========================================
// 冲突结果
// ==========================================

/// 冲突明细
///
/// 命名优先取教师冲突课程,其次教室冲突课程,最后班级冲突课程
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictDetail {
    pub faculty_conflict: bool,
    pub room_conflict: bool,
    pub division_conflict: bool,
    pub faculty_course: Option<Course>,
    pub room_course: Option<Course>,
    pub division_courses: Vec<Course>,
    pub course_name: Option<String>,
    pub faculty_name: Option<String>,
}

impl ConflictDetail {
    /// 是否存在阻断性冲突（教师或教室）
    pub fn has_hard_conflict(&self) -> bool {
        self.faculty_conflict || self.room_conflict
    }
}

/// 被拒绝的排课
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConflict {
    pub reason: ConflictReason,
    pub message: String,
    pub detail: ConflictDetail,
}

/// 排课提交结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum AssignmentOutcome {
    Committed(Course),
    Rejected(ScheduleConflict),
}

impl AssignmentOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, AssignmentOutcome::Committed(_))
    }

    pub fn course(&self) -> Option<&Course> {
        match self {
            AssignmentOutcome::Committed(course) => Some(course),
            AssignmentOutcome::Rejected(_) => None,
        }
    }

    pub fn conflict(&self) -> Option<&ScheduleConflict> {
        match self {
            AssignmentOutcome::Committed(_) => None,
            AssignmentOutcome::Rejected(conflict) => Some(conflict),
        }
    }
}

// ==========================================
// SchedulingEngine - 排课引擎
// ==========================================
pub struct SchedulingEngine {
    repos: ScheduleRepositories,
    index: SharedConflictIndex,
    policy: SchedulingPolicy,
    // 串行化 校验→落库→重建 全过程
    write_lock: Mutex<()>,
    // 唯一约束兜底拒绝的次数
    constraint_fallbacks: AtomicU64,
}

impl SchedulingEngine {
    /// 创建排课引擎（索引延迟到首次使用时构建）
    pub fn new(repos: ScheduleRepositories, policy: SchedulingPolicy) -> Self {
        Self {
            repos,
            index: SharedConflictIndex::default(),
            policy,
            write_lock: Mutex::new(()),
            constraint_fallbacks: AtomicU64::new(0),
        }
    }

    pub fn repositories(&self) -> &ScheduleRepositories {
        &self.repos
    }

    pub fn policy(&self) -> &SchedulingPolicy {
        &self.policy
    }

    /// 被数据库唯一约束（而非冲突索引）拒绝的写入次数
    pub fn constraint_fallback_count(&self) -> u64 {
        self.constraint_fallbacks.load(Ordering::Relaxed)
    }

    fn lock_writes(&self) -> EngineResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| EngineError::LockPoisoned(e.to_string()))
    }

    // ==========================================
    // 索引维护
    // ==========================================

    /// 从全部课程重建索引并整体替换
    pub fn rebuild_index(&self) -> EngineResult<Arc<ConflictIndex>> {
        let courses = self.repos.course_repo.find_all()?;
        let index = ConflictIndex::build(&courses);
        tracing::debug!(course_count = courses.len(), "冲突索引已重建");
        Ok(self.index.replace(index))
    }

    /// 重建索引; 失败时置为未构建,下次读取再延迟重建
    fn refresh_index(&self) -> EngineResult<Arc<ConflictIndex>> {
        self.rebuild_index().map_err(|e| {
            self.index.replace(ConflictIndex::new());
            e
        })
    }

    /// 写入已提交后的索引刷新; 失败只告警,不影响提交结果
    fn refresh_after_commit(&self, course_id: i64) {
        if let Err(e) = self.refresh_index() {
            tracing::warn!(error = %e, course_id, "提交后索引重建失败,索引已作废");
        }
    }

    /// 当前索引; 从未构建时在写锁内构建（只读路径使用）
    fn current_index(&self) -> EngineResult<Arc<ConflictIndex>> {
        let snapshot = self.index.snapshot();
        if snapshot.is_built() {
            return Ok(snapshot);
        }
        let _guard = self.lock_writes()?;
        self.current_index_locked()
    }

    /// 调用方已持有写锁
    fn current_index_locked(&self) -> EngineResult<Arc<ConflictIndex>> {
        let snapshot = self.index.snapshot();
        if snapshot.is_built() {
            Ok(snapshot)
        } else {
            self.rebuild_index()
        }
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 教师与教室在该时段是否都空闲
    pub fn check_availability(
        &self,
        faculty_id: i64,
        room_id: i64,
        time_slot_id: i64,
    ) -> EngineResult<bool> {
        Ok(self.current_index()?.is_free(faculty_id, room_id, time_slot_id))
    }

    /// 教师/教室冲突明细（不检查班级）
    pub fn get_conflict_details(
        &self,
        faculty_id: i64,
        room_id: i64,
        time_slot_id: i64,
    ) -> EngineResult<ConflictDetail> {
        let index = self.current_index()?;
        self.describe_conflicts(&index, faculty_id, room_id, time_slot_id, None, None)
    }

    /// 含班级的冲突明细
    pub fn get_conflict_details_for(
        &self,
        candidate: &CandidateAssignment,
    ) -> EngineResult<ConflictDetail> {
        let index = self.current_index()?;
        self.describe_conflicts(
            &index,
            candidate.faculty_id,
            candidate.room_id,
            candidate.time_slot_id,
            Some(candidate.division_id),
            None,
        )
    }

    /// 教师与教室都空闲的时间段（按星期、开始时间排序）
    pub fn get_available_slots(&self, faculty_id: i64, room_id: i64) -> EngineResult<Vec<TimeSlot>> {
        self.get_available_slots_excluding(faculty_id, room_id, None)
    }

    /// 同上,但指定课程自身的占用不计入（用于编辑时给出候选时段）
    pub fn get_available_slots_excluding(
        &self,
        faculty_id: i64,
        room_id: i64,
        exclude_course_id: Option<i64>,
    ) -> EngineResult<Vec<TimeSlot>> {
        let index = self.current_index()?;
        let busy = index.busy_slots_excluding(faculty_id, room_id, exclude_course_id);

        let slots = self
            .repos
            .time_slot_repo
            .find_all()?
            .into_iter()
            .filter(|slot| !busy.contains(&slot.id))
            .collect();
        Ok(slots)
    }

    /// 与候选组合冲突的全部课程
    pub fn conflicting_courses(&self, candidate: &CandidateAssignment) -> EngineResult<Vec<Course>> {
        Ok(self.current_index()?.conflicting_courses(candidate))
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 新增排课
    ///
    /// # 返回
    /// - Ok(Committed): 已落库
    /// - Ok(Rejected): 冲突,附原因与明细
    /// - Err(NotFound): 引用的教师/班级/教室/时间段不存在
    #[instrument(skip(self, request), fields(
        faculty_id = request.assignment.faculty_id,
        room_id = request.assignment.room_id,
        time_slot_id = request.assignment.time_slot_id
    ))]
    pub fn schedule_course(&self, request: &NewCourse, actor: &str) -> EngineResult<AssignmentOutcome> {
        let name = validate_name(&request.name)?;
        let _guard = self.lock_writes()?;

        let candidate = request.assignment;
        self.ensure_faculty_exists(candidate.faculty_id)?;
        self.ensure_catalog_exists(candidate.division_id, candidate.room_id, candidate.time_slot_id)?;

        let index = self.current_index_locked()?;
        if let Some(conflict) = self.evaluate(&index, &candidate, None)? {
            tracing::info!(reason = %conflict.reason, "排课被拒绝");
            return Ok(AssignmentOutcome::Rejected(conflict));
        }

        let new_course = NewCourse {
            name,
            assignment: candidate,
        };
        let created = match self
            .repos
            .course_repo
            .insert(&new_course, Utc::now().naive_utc())
        {
            Ok(course) => course,
            Err(RepositoryError::UniqueConstraintViolation(msg)) => {
                // 索引落后于数据库（外部写入）
                tracing::warn!(error = %msg, "唯一约束拒绝写入,重建索引");
                self.constraint_fallbacks.fetch_add(1, Ordering::Relaxed);
                let index = self.refresh_index()?;
                return Ok(AssignmentOutcome::Rejected(self.constraint_conflict(&index, &candidate, None)?));
            }
            Err(e) => return Err(e.into()),
        };

        self.refresh_after_commit(created.id);
        self.record(
            ActionType::ScheduleCourse,
            actor,
            &created,
            json!({ "name": created.name, "assignment": created.assignment() }),
        );

        tracing::info!(course_id = created.id, "排课成功");
        Ok(AssignmentOutcome::Committed(created))
    }

    /// 修改排课（教师不可变）
    ///
    /// 教室与时间段均未变化时跳过冲突校验（班级阻断模式下改班级除外）;
    /// 否则以"本课程不存在"的视角重新校验
    #[instrument(skip(self, update), fields(
        room_id = update.room_id,
        time_slot_id = update.time_slot_id
    ))]
    pub fn edit_course(
        &self,
        course_id: i64,
        update: &CourseUpdate,
        actor: &str,
    ) -> EngineResult<AssignmentOutcome> {
        let name = validate_name(&update.name)?;
        let _guard = self.lock_writes()?;

        let existing = self
            .repos
            .course_repo
            .find_by_id(course_id)?
            .ok_or_else(|| EngineError::not_found("Course", course_id))?;
        self.ensure_catalog_exists(update.division_id, update.room_id, update.time_slot_id)?;

        let candidate = CandidateAssignment::new(
            existing.faculty_id,
            update.division_id,
            update.room_id,
            update.time_slot_id,
        );

        let unchanged = existing.room_id == update.room_id
            && existing.time_slot_id == update.time_slot_id
            && !(self.policy.division_blocking && existing.division_id != update.division_id);
        if !unchanged {
            let index = self.current_index_locked()?;
            if let Some(conflict) = self.evaluate(&index, &candidate, Some(course_id))? {
                tracing::info!(reason = %conflict.reason, "修改被拒绝");
                return Ok(AssignmentOutcome::Rejected(conflict));
            }
        }

        let normalized = CourseUpdate {
            name,
            division_id: update.division_id,
            room_id: update.room_id,
            time_slot_id: update.time_slot_id,
        };
        let updated = match self.repos.course_repo.update(course_id, &normalized) {
            Ok(course) => course,
            Err(RepositoryError::UniqueConstraintViolation(msg)) => {
                tracing::warn!(error = %msg, "唯一约束拒绝修改,重建索引");
                self.constraint_fallbacks.fetch_add(1, Ordering::Relaxed);
                let index = self.refresh_index()?;
                return Ok(AssignmentOutcome::Rejected(self.constraint_conflict(
                    &index,
                    &candidate,
                    Some(course_id),
                )?));
            }
            Err(RepositoryError::NotFound { .. }) => {
                return Err(EngineError::not_found("Course", course_id))
            }
            Err(e) => return Err(e.into()),
        };

        self.refresh_after_commit(course_id);
        self.record(
            ActionType::EditCourse,
            actor,
            &updated,
            json!({ "before": existing.assignment(), "after": updated.assignment(), "name": updated.name }),
        );

        tracing::info!(course_id, validated = !unchanged, "课程已修改");
        Ok(AssignmentOutcome::Committed(updated))
    }

    /// 删除排课（无条件）
    ///
    /// # 返回
    /// - Ok(Course): 被删除的课程
    #[instrument(skip(self))]
    pub fn delete_course(&self, course_id: i64, actor: &str) -> EngineResult<Course> {
        let _guard = self.lock_writes()?;

        let existing = self
            .repos
            .course_repo
            .find_by_id(course_id)?
            .ok_or_else(|| EngineError::not_found("Course", course_id))?;

        match self.repos.course_repo.delete(course_id) {
            Ok(()) => {}
            Err(RepositoryError::NotFound { .. }) => {
                return Err(EngineError::not_found("Course", course_id))
            }
            Err(e) => return Err(e.into()),
        }

        self.refresh_after_commit(course_id);
        self.record(
            ActionType::DeleteCourse,
            actor,
            &existing,
            json!({ "name": existing.name, "assignment": existing.assignment() }),
        );

        tracing::info!(course_id, "课程已删除");
        Ok(existing)
    }

    // ==========================================
    // 课表
    // ==========================================

    /// 教师课表
    pub fn faculty_timetable(&self, faculty_id: i64) -> EngineResult<Timetable> {
        self.ensure_faculty_exists(faculty_id)?;
        let courses = self.repos.course_repo.find_by_faculty(faculty_id)?;
        self.project_courses(&courses)
    }

    /// 班级课表
    pub fn division_timetable(&self, division_id: i64) -> EngineResult<Timetable> {
        if self.repos.division_repo.find_by_id(division_id)?.is_none() {
            return Err(EngineError::not_found("Division", division_id));
        }
        let courses = self.repos.course_repo.find_by_division(division_id)?;
        self.project_courses(&courses)
    }

    fn project_courses(&self, courses: &[Course]) -> EngineResult<Timetable> {
        let time_slots = self.repos.time_slot_repo.find_all()?;
        let names = NameLookup::new(
            &self.repos.room_repo.find_all()?,
            &self.repos.division_repo.find_all()?,
            &self.repos.faculty_repo.find_all()?,
        );
        Ok(project(courses, &time_slots, &names, &self.policy.week_days))
    }

    // ==========================================
    // 内部
    // ==========================================

    /// 按优先级判定冲突: 教室 > 教师 > 班级(仅阻断模式)
    fn evaluate(
        &self,
        index: &ConflictIndex,
        candidate: &CandidateAssignment,
        exclude_course_id: Option<i64>,
    ) -> EngineResult<Option<ScheduleConflict>> {
        let detail = self.describe_conflicts(
            index,
            candidate.faculty_id,
            candidate.room_id,
            candidate.time_slot_id,
            Some(candidate.division_id),
            exclude_course_id,
        )?;

        let reason = if detail.room_conflict {
            ConflictReason::RoomConflict
        } else if detail.faculty_conflict {
            ConflictReason::FacultyConflict
        } else if self.policy.division_blocking && detail.division_conflict {
            ConflictReason::DivisionConflict
        } else {
            return Ok(None);
        };

        Ok(Some(ScheduleConflict {
            reason,
            message: i18n::t(reason.message_key()),
            detail,
        }))
    }

    /// 数据库约束拒绝但索引未能解释时,返回通用冲突
    fn constraint_conflict(
        &self,
        index: &ConflictIndex,
        candidate: &CandidateAssignment,
        exclude_course_id: Option<i64>,
    ) -> EngineResult<ScheduleConflict> {
        if let Some(conflict) = self.evaluate(index, candidate, exclude_course_id)? {
            return Ok(conflict);
        }
        let detail = self.describe_conflicts(
            index,
            candidate.faculty_id,
            candidate.room_id,
            candidate.time_slot_id,
            Some(candidate.division_id),
            exclude_course_id,
        )?;
        let reason = ConflictReason::SchedulingConflict;
        Ok(ScheduleConflict {
            reason,
            message: i18n::t(reason.message_key()),
            detail,
        })
    }

    fn describe_conflicts(
        &self,
        index: &ConflictIndex,
        faculty_id: i64,
        room_id: i64,
        time_slot_id: i64,
        division_id: Option<i64>,
        exclude_course_id: Option<i64>,
    ) -> EngineResult<ConflictDetail> {
        let faculty_course = index
            .faculty_occupant_excluding(faculty_id, time_slot_id, exclude_course_id)
            .cloned();
        let room_course = index
            .room_occupant_excluding(room_id, time_slot_id, exclude_course_id)
            .cloned();
        let division_courses: Vec<Course> = division_id
            .map(|d| {
                index
                    .division_occupants(d, time_slot_id, exclude_course_id)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let named = faculty_course
            .as_ref()
            .or(room_course.as_ref())
            .or(division_courses.first());

        let (course_name, faculty_name) = match named {
            Some(course) => {
                let faculty_name = self
                    .repos
                    .faculty_repo
                    .find_by_id(course.faculty_id)?
                    .map(|f| f.name);
                (Some(course.name.clone()), faculty_name)
            }
            None => (None, None),
        };

        Ok(ConflictDetail {
            faculty_conflict: faculty_course.is_some(),
            room_conflict: room_course.is_some(),
            division_conflict: !division_courses.is_empty(),
            faculty_course,
            room_course,
            division_courses,
            course_name,
            faculty_name,
        })
    }

    fn ensure_faculty_exists(&self, faculty_id: i64) -> EngineResult<()> {
        if self.repos.faculty_repo.find_by_id(faculty_id)?.is_none() {
            return Err(EngineError::not_found("Faculty", faculty_id));
        }
        Ok(())
    }

    fn ensure_catalog_exists(&self, division_id: i64, room_id: i64, time_slot_id: i64) -> EngineResult<()> {
        if self.repos.division_repo.find_by_id(division_id)?.is_none() {
            return Err(EngineError::not_found("Division", division_id));
        }
        if self.repos.room_repo.find_by_id(room_id)?.is_none() {
            return Err(EngineError::not_found("Room", room_id));
        }
        if self.repos.time_slot_repo.find_by_id(time_slot_id)?.is_none() {
            return Err(EngineError::not_found("TimeSlot", time_slot_id));
        }
        Ok(())
    }

    /// 写操作日志; 失败只告警,不回滚已提交的课程
    fn record(&self, action_type: ActionType, actor: &str, course: &Course, payload: serde_json::Value) {
        let log = ActionLog::new(
            action_type,
            actor,
            Some(course.id),
            Some(payload),
            Some(course.name.clone()),
        );
        if let Err(e) = self.repos.action_log_repo.insert(&log) {
            tracing::warn!(error = %e, action_type = %action_type, course_id = course.id, "操作日志写入失败");
        }
    }
}

fn validate_name(name: &str) -> EngineResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput("课程名称不能为空".to_string()));
    }
    Ok(trimmed.to_string())
}
