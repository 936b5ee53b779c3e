// ==========================================
// 课程排课系统 - 目录 API
// ==========================================
// 职责: 教师注册、班级/教室/时间段查询、操作日志查询
// ==========================================

use std::collections::BTreeMap;

use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::ActionLog;
use crate::domain::division::Division;
use crate::domain::faculty::{Faculty, NewFaculty};
use crate::domain::room::Room;
use crate::domain::time_slot::TimeSlot;
use crate::domain::types::Weekday;
use crate::engine::repositories::ScheduleRepositories;
use crate::i18n::t;
use crate::repository::error::RepositoryError;

pub struct CatalogApi {
    repos: ScheduleRepositories,
}

impl CatalogApi {
    pub fn new(repos: ScheduleRepositories) -> Self {
        Self { repos }
    }

    /// 注册教师
    ///
    /// # 返回
    /// - Err(InvalidInput): 用户名/邮箱/姓名为空
    /// - Err(BusinessRuleViolation): 用户名或邮箱已存在
    pub fn register_faculty(&self, request: NewFaculty) -> ApiResult<Faculty> {
        let username = request.username.trim().to_string();
        let email = request.email.trim().to_string();
        let name = request.name.trim().to_string();
        if username.is_empty() || email.is_empty() || name.is_empty() {
            return Err(ApiError::InvalidInput(t("schedule.missing_fields")));
        }

        let repo = &self.repos.faculty_repo;
        if repo.find_by_username_or_email(&username, &email)?.is_some() {
            return Err(ApiError::BusinessRuleViolation(t("auth.duplicate_account")));
        }

        let department = request
            .department
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let faculty = repo
            .create(&NewFaculty {
                username,
                email,
                name,
                department,
            })
            .map_err(|e| match e {
                // 并发注册时由唯一约束兜底
                RepositoryError::UniqueConstraintViolation(_) => {
                    ApiError::BusinessRuleViolation(t("auth.duplicate_account"))
                }
                other => other.into(),
            })?;

        info!(faculty_id = faculty.id, username = %faculty.username, "教师注册成功");
        Ok(faculty)
    }

    pub fn list_faculty(&self) -> ApiResult<Vec<Faculty>> {
        Ok(self.repos.faculty_repo.find_all()?)
    }

    pub fn list_divisions(&self) -> ApiResult<Vec<Division>> {
        Ok(self.repos.division_repo.find_all()?)
    }

    pub fn list_rooms(&self) -> ApiResult<Vec<Room>> {
        Ok(self.repos.room_repo.find_all()?)
    }

    /// 全部时间段（按星期、开始时间排序）
    pub fn list_time_slots(&self) -> ApiResult<Vec<TimeSlot>> {
        Ok(self.repos.time_slot_repo.find_all()?)
    }

    /// 时间段按星期分组（供选择界面使用）
    pub fn time_slots_by_day(&self) -> ApiResult<BTreeMap<Weekday, Vec<TimeSlot>>> {
        let mut grouped: BTreeMap<Weekday, Vec<TimeSlot>> = BTreeMap::new();
        for slot in self.repos.time_slot_repo.find_all()? {
            grouped.entry(slot.day).or_default().push(slot);
        }
        Ok(grouped)
    }

    /// 课程的操作历史（新→旧）
    pub fn course_history(&self, course_id: i64) -> ApiResult<Vec<ActionLog>> {
        Ok(self.repos.action_log_repo.find_by_course(course_id)?)
    }

    pub fn recent_actions(&self, limit: i64) -> ApiResult<Vec<ActionLog>> {
        if limit <= 0 {
            return Err(ApiError::InvalidInput(format!("limit 必须为正数: {}", limit)));
        }
        Ok(self.repos.action_log_repo.find_recent(limit)?)
    }
}
