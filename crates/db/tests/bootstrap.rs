use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test]
async fn test_full_bootstrap(pool: PgPool) {
    projecthub_db::health_check(&pool).await.unwrap();

    // Every table the repositories touch must exist after migration.
    let tables = [
        "users",
        "student_profiles",
        "supervisor_profiles",
        "supervisor_students",
        "projects",
        "milestones",
        "bookmarks",
        "milestone_discussions",
        "discussion_replies",
        "notifications",
        "assistant_messages",
        "message_ratings",
        "sessions",
    ];

    for table in tables {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_name = $1)")
                .bind(table)
                .fetch_one(&pool)
                .await
                .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert!(exists, "{table} should exist after migrations");
    }
}

/// The blocked_reason -> blocking_reason rename must have been applied.
#[sqlx::test]
async fn test_blocking_reason_column_renamed(pool: PgPool) {
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (
            SELECT 1 FROM information_schema.columns
            WHERE table_name = 'milestones' AND column_name = 'blocking_reason'
         )",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(exists, "milestones.blocking_reason should exist");

    let (old_exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (
            SELECT 1 FROM information_schema.columns
            WHERE table_name = 'milestones' AND column_name = 'blocked_reason'
         )",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(!old_exists, "milestones.blocked_reason should be gone");
}
