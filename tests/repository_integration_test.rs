// ==========================================
// Repository 层集成测试
// ==========================================
// 测试目标: 验证数据库约束兜底、错误映射与操作日志持久化
// ==========================================


use chrono::NaiveDate;
use serde_json::json;
use timetable_scheduler::domain::{
    ActionLog, ActionType, CandidateAssignment, CourseUpdate, NewCourse, Weekday,
};
use timetable_scheduler::logging;
use timetable_scheduler::repository::RepositoryError;

use test_helpers::{division_id, register_faculty, room_id, setup_env, slot_id};

fn created_at() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 9, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn new_course(name: &str, assignment: CandidateAssignment) -> NewCourse {
    NewCourse {
        name: name.to_string(),
        assignment,
    }
}

// ==========================================
// 测试用例
// ==========================================

#[test]
fn test_course_unique_indexes_back_up_engine() {
    logging::init_test();

    let env = setup_env();
    let f1 = register_faculty(&env.repos, "f1", "Dr. Ada");
    let f2 = register_faculty(&env.repos, "f2", "Dr. Brian");
    let div_a = division_id(&env.repos, "Division A");
    let div_b = division_id(&env.repos, "Division B");
    let r101 = room_id(&env.repos, "Room 101");
    let r102 = room_id(&env.repos, "Room 102");
    let mon9 = slot_id(&env.repos, Weekday::Monday, "09:00");

    let repo = &env.repos.course_repo;
    repo.insert(
        &new_course("Algorithms", CandidateAssignment::new(f1.id, div_a, r101, mon9)),
        created_at(),
    )
    .unwrap();

    // 同教室同时段
    let room_clash = repo.insert(
        &new_course("Networks", CandidateAssignment::new(f2.id, div_b, r101, mon9)),
        created_at(),
    );
    assert!(matches!(
        room_clash,
        Err(RepositoryError::UniqueConstraintViolation(_))
    ));

    // 同教师同时段
    let faculty_clash = repo.insert(
        &new_course("Compilers", CandidateAssignment::new(f1.id, div_b, r102, mon9)),
        created_at(),
    );
    assert!(matches!(
        faculty_clash,
        Err(RepositoryError::UniqueConstraintViolation(_))
    ));

    // 班级不受唯一约束
    let same_division = repo.insert(
        &new_course("Networks", CandidateAssignment::new(f2.id, div_a, r102, mon9)),
        created_at(),
    );
    assert!(same_division.is_ok());
    assert_eq!(repo.count().unwrap(), 2);
}

#[test]
fn test_course_foreign_keys_are_enforced() {
    let env = setup_env();
    let f1 = register_faculty(&env.repos, "f1", "Dr. Ada");
    let div_a = division_id(&env.repos, "Division A");
    let mon9 = slot_id(&env.repos, Weekday::Monday, "09:00");

    let result = env.repos.course_repo.insert(
        &new_course("Ghost Room", CandidateAssignment::new(f1.id, div_a, 9_999, mon9)),
        created_at(),
    );
    assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
}

#[test]
fn test_course_update_and_delete_round_trip() {
    let env = setup_env();
    let f1 = register_faculty(&env.repos, "f1", "Dr. Ada");
    let div_a = division_id(&env.repos, "Division A");
    let div_c = division_id(&env.repos, "Division C");
    let r101 = room_id(&env.repos, "Room 101");
    let lab = room_id(&env.repos, "Lab 201");
    let mon9 = slot_id(&env.repos, Weekday::Monday, "09:00");
    let fri14 = slot_id(&env.repos, Weekday::Friday, "14:00");

    let repo = &env.repos.course_repo;
    let course = repo
        .insert(
            &new_course("Algorithms", CandidateAssignment::new(f1.id, div_a, r101, mon9)),
            created_at(),
        )
        .unwrap();

    let updated = repo
        .update(
            course.id,
            &CourseUpdate {
                name: "Advanced Algorithms".to_string(),
                division_id: div_c,
                room_id: lab,
                time_slot_id: fri14,
            },
        )
        .unwrap();
    assert_eq!(updated.faculty_id, f1.id);
    assert_eq!(updated.created_at, course.created_at);
    assert_eq!(updated.assignment(), CandidateAssignment::new(f1.id, div_c, lab, fri14));

    assert_eq!(repo.find_by_faculty(f1.id).unwrap().len(), 1);
    assert!(repo.find_by_division(div_a).unwrap().is_empty());
    assert_eq!(repo.find_by_division(div_c).unwrap()[0].name, "Advanced Algorithms");

    repo.delete(course.id).unwrap();
    assert!(repo.find_by_id(course.id).unwrap().is_none());

    assert!(matches!(
        repo.delete(course.id),
        Err(RepositoryError::NotFound { .. })
    ));
    assert!(matches!(
        repo.update(
            course.id,
            &CourseUpdate {
                name: "Gone".to_string(),
                division_id: div_a,
                room_id: r101,
                time_slot_id: mon9,
            },
        ),
        Err(RepositoryError::NotFound { .. })
    ));
}

#[test]
fn test_faculty_lookup_by_username_or_email() {
    let env = setup_env();
    let ada = register_faculty(&env.repos, "ada", "Dr. Ada");

    let repo = &env.repos.faculty_repo;
    let by_name = repo.find_by_username_or_email("ada", "nobody@example.edu").unwrap();
    assert_eq!(by_name.map(|f| f.id), Some(ada.id));

    let by_email = repo.find_by_username_or_email("nobody", "ada@example.edu").unwrap();
    assert_eq!(by_email.map(|f| f.id), Some(ada.id));

    assert!(repo
        .find_by_username_or_email("nobody", "nobody@example.edu")
        .unwrap()
        .is_none());
}

#[test]
fn test_action_log_persistence() {
    let env = setup_env();
    let repo = &env.repos.action_log_repo;

    let first = ActionLog::new(
        ActionType::ScheduleCourse,
        "faculty:1",
        Some(42),
        Some(json!({ "room_id": 1, "time_slot_id": 2 })),
        Some("Algorithms".to_string()),
    );
    let second = ActionLog::new(ActionType::DeleteCourse, "faculty:1", Some(42), None, None);
    let unrelated = ActionLog::new(ActionType::ScheduleCourse, "faculty:2", Some(7), None, None);

    repo.insert(&first).unwrap();
    repo.insert(&second).unwrap();
    repo.insert(&unrelated).unwrap();

    let history = repo.find_by_course(42).unwrap();
    assert_eq!(history.len(), 2);
    // 时间倒序,同一秒内按写入顺序倒序
    assert_eq!(history[0].action_type, "DELETE_COURSE");
    assert_eq!(history[1].action_id, first.action_id);
    assert_eq!(history[1].payload_json, first.payload_json);
    assert_eq!(history[1].detail.as_deref(), Some("Algorithms"));

    assert_eq!(repo.find_recent(2).unwrap().len(), 2);
    assert_eq!(repo.find_recent(10).unwrap().len(), 3);
}
