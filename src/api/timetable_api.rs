// ==========================================
// 课程排课系统 - 排课 API
// ==========================================
// 职责: 新增/修改/删除排课、课表查询
// 红线: 只有课程所属教师可以修改或删除
// 红线: 冲突时返回原因与候选时段,不自动改派
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::course::{CandidateAssignment, Course, CourseUpdate, NewCourse};
use crate::domain::time_slot::TimeSlot;
use crate::engine::scheduler::{AssignmentOutcome, ConflictDetail, ScheduleConflict, SchedulingEngine};
use crate::engine::timetable::Timetable;
use crate::i18n::{t, t_with_args};

// ==========================================
// 请求/响应结构
// ==========================================

/// 新增排课请求（教师由调用方身份决定）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub course_name: String,
    pub division_id: i64,
    pub room_id: i64,
    pub time_slot_id: i64,
}

/// 排课结果
///
/// 失败时 reason_code 为 ROOM_CONFLICT / FACULTY_CONFLICT / DIVISION_CONFLICT / SCHEDULING_CONFLICT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub success: bool,
    pub reason_code: Option<String>,
    pub message: String,
    pub course: Option<Course>,
    pub conflict: Option<ConflictDetail>,
    /// 同一教师+教室下仍空闲的时间段
    pub available_slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub course: Course,
    pub message: String,
}

// ==========================================
// TimetableApi - 排课 API
// ==========================================
pub struct TimetableApi {
    engine: Arc<SchedulingEngine>,
}

impl TimetableApi {
    pub fn new(engine: Arc<SchedulingEngine>) -> Self {
        Self { engine }
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 新增排课
    ///
    /// # 参数
    /// - faculty_id: 当前教师
    /// - request: 课程名、班级、教室、时间段
    pub fn add_schedule(&self, faculty_id: i64, request: ScheduleRequest) -> ApiResult<ScheduleResponse> {
        validate_request(&request.course_name, &[request.division_id, request.room_id, request.time_slot_id])?;

        let new_course = NewCourse {
            name: request.course_name,
            assignment: CandidateAssignment::new(
                faculty_id,
                request.division_id,
                request.room_id,
                request.time_slot_id,
            ),
        };

        let outcome = self.engine.schedule_course(&new_course, &actor(faculty_id))?;
        match outcome {
            AssignmentOutcome::Committed(course) => {
                info!(course_id = course.id, faculty_id, "新增排课成功");
                Ok(committed(course, t("schedule.success")))
            }
            AssignmentOutcome::Rejected(conflict) => {
                let available = self.engine.get_available_slots(faculty_id, request.room_id)?;
                Ok(rejected(conflict, available))
            }
        }
    }

    /// 修改排课
    ///
    /// # 返回
    /// - Err(Unauthorized): 非本人课程
    /// - Err(NotFound): 课程不存在
    pub fn edit_schedule(
        &self,
        faculty_id: i64,
        course_id: i64,
        request: ScheduleRequest,
    ) -> ApiResult<ScheduleResponse> {
        validate_request(&request.course_name, &[request.division_id, request.room_id, request.time_slot_id])?;
        self.load_owned_course(faculty_id, course_id, "auth.not_owner_edit")?;

        let update = CourseUpdate {
            name: request.course_name,
            division_id: request.division_id,
            room_id: request.room_id,
            time_slot_id: request.time_slot_id,
        };

        let outcome = self.engine.edit_course(course_id, &update, &actor(faculty_id))?;
        match outcome {
            AssignmentOutcome::Committed(course) => {
                info!(course_id, faculty_id, "修改排课成功");
                Ok(committed(course, t("course.updated")))
            }
            AssignmentOutcome::Rejected(conflict) => {
                let available = self.engine.get_available_slots_excluding(
                    faculty_id,
                    request.room_id,
                    Some(course_id),
                )?;
                Ok(rejected(conflict, available))
            }
        }
    }

    /// 删除排课
    pub fn delete_schedule(&self, faculty_id: i64, course_id: i64) -> ApiResult<DeleteResponse> {
        self.load_owned_course(faculty_id, course_id, "auth.not_owner_delete")?;
        let course = self.engine.delete_course(course_id, &actor(faculty_id))?;
        info!(course_id, faculty_id, "删除排课成功");
        Ok(DeleteResponse {
            course,
            message: t("course.deleted"),
        })
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn faculty_timetable(&self, faculty_id: i64) -> ApiResult<Timetable> {
        Ok(self.engine.faculty_timetable(faculty_id)?)
    }

    pub fn division_timetable(&self, division_id: i64) -> ApiResult<Timetable> {
        Ok(self.engine.division_timetable(division_id)?)
    }

    pub fn available_slots(&self, faculty_id: i64, room_id: i64) -> ApiResult<Vec<TimeSlot>> {
        Ok(self.engine.get_available_slots(faculty_id, room_id)?)
    }

    pub fn check_availability(&self, faculty_id: i64, room_id: i64, time_slot_id: i64) -> ApiResult<bool> {
        Ok(self.engine.check_availability(faculty_id, room_id, time_slot_id)?)
    }

    /// 候选组合的冲突明细（含班级）
    pub fn conflict_details(&self, candidate: &CandidateAssignment) -> ApiResult<ConflictDetail> {
        Ok(self.engine.get_conflict_details_for(candidate)?)
    }

    pub fn find_course(&self, course_id: i64) -> ApiResult<Course> {
        self.engine
            .repositories()
            .course_repo
            .find_by_id(course_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Course(id={})不存在", course_id)))
    }

    fn load_owned_course(&self, faculty_id: i64, course_id: i64, denied_key: &str) -> ApiResult<Course> {
        let course = self.find_course(course_id)?;
        if course.faculty_id != faculty_id {
            debug!(course_id, faculty_id, owner_id = course.faculty_id, "非课程所属教师");
            return Err(ApiError::Unauthorized(t(denied_key)));
        }
        Ok(course)
    }
}

fn actor(faculty_id: i64) -> String {
    format!("faculty:{}", faculty_id)
}

fn validate_request(course_name: &str, ids: &[i64]) -> ApiResult<()> {
    if course_name.trim().is_empty() || ids.iter().any(|id| *id <= 0) {
        return Err(ApiError::InvalidInput(t("schedule.missing_fields")));
    }
    Ok(())
}

fn committed(course: Course, message: String) -> ScheduleResponse {
    ScheduleResponse {
        success: true,
        reason_code: None,
        message,
        course: Some(course),
        conflict: None,
        available_slots: Vec::new(),
    }
}

fn rejected(conflict: ScheduleConflict, available_slots: Vec<TimeSlot>) -> ScheduleResponse {
    let message = if available_slots.is_empty() {
        t("schedule.no_available_slots")
    } else {
        match (&conflict.detail.course_name, &conflict.detail.faculty_name) {
            (Some(course), Some(faculty)) => format!(
                "{} {}",
                conflict.message,
                t_with_args("schedule.conflict_with", &[("course", course), ("faculty", faculty)])
            ),
            _ => conflict.message.clone(),
        }
    };

    ScheduleResponse {
        success: false,
        reason_code: Some(conflict.reason.code().to_string()),
        message,
        course: None,
        conflict: Some(conflict.detail),
        available_slots,
    }
}
