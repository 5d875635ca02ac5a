//! Repository CRUD tests against a migrated test database.

use projecthub_core::types::DbId;
use sqlx::PgPool;

use projecthub_db::models::milestone::CreateMilestone;
use projecthub_db::models::profile::CreateStudentProfile;
use projecthub_db::models::project::{CreateProject, ProjectFilter};
use projecthub_db::models::user::CreateUser;
use projecthub_db::repositories::{BookmarkRepo, MilestoneRepo, ProfileRepo, ProjectRepo, UserRepo};

async fn seed_user(pool: &PgPool, email: &str, role: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            full_name: "Test User".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_project(pool: &PgPool, supervisor_id: DbId) -> DbId {
    ProjectRepo::create(
        pool,
        supervisor_id,
        &CreateProject {
            title: "Campus navigation app".to_string(),
            abstract_text: "An indoor navigation system for the faculty building.".to_string(),
            specialization: "software-engineering".to_string(),
            difficulty: 3,
            tags: vec![],
            technologies: vec![],
        },
        &["navigation".to_string()],
        &["flutter".to_string()],
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test]
async fn test_user_create_and_find_by_email_is_case_insensitive(pool: PgPool) {
    let id = seed_user(&pool, "alice@university.edu", "student").await;

    let found = UserRepo::find_by_email(&pool, "alice@university.edu")
        .await
        .unwrap()
        .expect("user should be found");
    assert_eq!(found.id, id);
    assert_eq!(found.role, "student");
    assert!(found.is_active);
}

#[sqlx::test]
async fn test_duplicate_email_violates_unique_constraint(pool: PgPool) {
    seed_user(&pool, "bob@university.edu", "student").await;

    let err = UserRepo::create(
        &pool,
        &CreateUser {
            email: "bob@university.edu".to_string(),
            full_name: "Bob Again".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            role: "student".to_string(),
        },
    )
    .await
    .unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some("uq_users_email"));
        }
        other => panic!("expected database error, got {other:?}"),
    }
}

#[sqlx::test]
async fn test_failed_profile_insert_rolls_back_the_user_row(pool: PgPool) {
    let profile = CreateStudentProfile {
        matric_number: "CSC/2021/001".to_string(),
        specialization: "software-engineering".to_string(),
        enrollment_year: 2021,
    };
    UserRepo::create_student(
        &pool,
        &CreateUser {
            email: "first@student.university.edu".to_string(),
            full_name: "First Student".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            role: "student".to_string(),
        },
        &profile,
    )
    .await
    .unwrap();

    // Same matric number under a fresh email trips the profile constraint.
    let err = UserRepo::create_student(
        &pool,
        &CreateUser {
            email: "second@student.university.edu".to_string(),
            full_name: "Second Student".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            role: "student".to_string(),
        },
        &profile,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, sqlx::Error::Database(_)));

    // The user insert must roll back with it, or the email would be
    // burned and every retry would conflict on it.
    let stranded = UserRepo::find_by_email(&pool, "second@student.university.edu")
        .await
        .unwrap();
    assert!(stranded.is_none());
}

#[sqlx::test]
async fn test_claiming_a_project_links_student_to_supervisor_once(pool: PgPool) {
    let supervisor = seed_user(&pool, "sup@university.edu", "supervisor").await;
    let student = seed_user(&pool, "stu@student.university.edu", "student").await;
    let rival = seed_user(&pool, "rival@student.university.edu", "student").await;
    let project_id = seed_project(&pool, supervisor).await;

    let claimed = ProjectRepo::claim_for_student(&pool, project_id, student)
        .await
        .unwrap()
        .expect("unclaimed project should be claimable");
    assert_eq!(claimed.student_id, Some(student));
    assert!(ProfileRepo::supervises(&pool, supervisor, student).await.unwrap());

    // A second claim finds the slot taken and writes nothing.
    let lost = ProjectRepo::claim_for_student(&pool, project_id, rival).await.unwrap();
    assert!(lost.is_none());
    assert!(!ProfileRepo::supervises(&pool, supervisor, rival).await.unwrap());
}

#[sqlx::test]
async fn test_project_filter_by_specialization(pool: PgPool) {
    let supervisor = seed_user(&pool, "sup@university.edu", "supervisor").await;
    seed_project(&pool, supervisor).await;

    let filter = ProjectFilter {
        specialization: Some("software-engineering".to_string()),
        ..Default::default()
    };
    let hits = ProjectRepo::list(&pool, &filter, 20, 0).await.unwrap();
    assert_eq!(hits.len(), 1);

    let filter = ProjectFilter {
        specialization: Some("data-science".to_string()),
        ..Default::default()
    };
    let misses = ProjectRepo::list(&pool, &filter, 20, 0).await.unwrap();
    assert!(misses.is_empty());
}

#[sqlx::test]
async fn test_soft_deleted_project_is_hidden_and_restorable(pool: PgPool) {
    let supervisor = seed_user(&pool, "sup@university.edu", "supervisor").await;
    let project_id = seed_project(&pool, supervisor).await;

    assert!(ProjectRepo::soft_delete(&pool, project_id).await.unwrap());
    assert!(ProjectRepo::find_by_id(&pool, project_id).await.unwrap().is_none());

    assert!(ProjectRepo::restore(&pool, project_id).await.unwrap());
    assert!(ProjectRepo::find_by_id(&pool, project_id).await.unwrap().is_some());
}

#[sqlx::test]
async fn test_milestone_status_and_blocking_reason(pool: PgPool) {
    let supervisor = seed_user(&pool, "sup@university.edu", "supervisor").await;
    let project_id = seed_project(&pool, supervisor).await;

    let milestone = MilestoneRepo::create(
        &pool,
        project_id,
        &CreateMilestone {
            title: "Literature review".to_string(),
            description: None,
            priority: "high".to_string(),
            due_date: chrono::Utc::now() + chrono::Duration::days(30),
            estimated_hours: Some(20),
            reminder_days_before: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(milestone.status, "not_started");

    let blocked = MilestoneRepo::set_status(&pool, milestone.id, "blocked", Some("waiting on ethics approval"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(blocked.status, "blocked");
    assert_eq!(blocked.blocking_reason.as_deref(), Some("waiting on ethics approval"));

    // Leaving the blocked state clears the reason.
    let resumed = MilestoneRepo::set_status(&pool, milestone.id, "in_progress", None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resumed.status, "in_progress");
    assert!(resumed.blocking_reason.is_none());
}

#[sqlx::test]
async fn test_duplicate_bookmark_violates_unique_constraint(pool: PgPool) {
    let supervisor = seed_user(&pool, "sup@university.edu", "supervisor").await;
    let student = seed_user(&pool, "stu@student.university.edu", "student").await;
    let project_id = seed_project(&pool, supervisor).await;

    BookmarkRepo::create(&pool, student, project_id).await.unwrap();
    let err = BookmarkRepo::create(&pool, student, project_id).await.unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some("uq_bookmarks_user_project"));
        }
        other => panic!("expected database error, got {other:?}"),
    }
}

#[sqlx::test]
async fn test_rating_check_constraint_rejects_out_of_range(pool: PgPool) {
    let student = seed_user(&pool, "stu@student.university.edu", "student").await;
    let message = projecthub_db::repositories::AssistantRepo::insert_message(
        &pool, student, "assistant", "Here are some projects.",
    )
    .await
    .unwrap();

    let err = projecthub_db::repositories::AssistantRepo::rate_message(&pool, message.id, student, 5.5)
        .await
        .unwrap_err();
    assert!(matches!(err, sqlx::Error::Database(_)));

    let ok = projecthub_db::repositories::AssistantRepo::rate_message(&pool, message.id, student, 4.5)
        .await
        .unwrap();
    assert_eq!(ok.rating, 4.5);
}
