use chrono::{Duration, SubsecRound, Utc};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use taskpro_application::{
    NewUserRecord, SortOrder, TaskFilter, TaskRepository, TaskSort, TaskSortField, UserRepository,
};
use taskpro_core::NonEmptyString;
use taskpro_domain::{
    EmailAddress, RecurringType, Role, Task, TaskId, TaskPriority, TaskRecurrence, TaskStatus,
    UserId,
};

use super::PostgresTaskRepository;
use crate::PostgresUserRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres task tests: {error}");
    }

    Some(pool)
}

async fn ensure_user(pool: &PgPool) -> UserId {
    let email = EmailAddress::new(format!("tasks-{}@example.com", uuid::Uuid::new_v4()))
        .unwrap_or_else(|_| panic!("test email must be valid"));

    PostgresUserRepository::new(pool.clone())
        .create(NewUserRecord {
            display_name: "Task Owner".to_owned(),
            email,
            role: Role::User,
            password_hash: "$argon2id$test".to_owned(),
        })
        .await
        .unwrap_or_else(|error| panic!("failed to create task owner: {error}"))
        .id
}

fn task(title: &str, owner: UserId, priority: TaskPriority) -> Task {
    // Postgres stores microseconds.
    let now = Utc::now().trunc_subsecs(6);
    Task {
        id: TaskId::new(),
        title: NonEmptyString::new(title).unwrap_or_else(|_| panic!("title")),
        description: NonEmptyString::new("stored in postgres")
            .unwrap_or_else(|_| panic!("description")),
        due_date: now + Duration::days(3),
        priority,
        status: TaskStatus::Todo,
        assigned_to: owner,
        created_by: owner,
        recurrence: None,
        parent_task_id: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn insert_find_update_delete_round_trip() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let owner = ensure_user(&pool).await;
    let repository = PostgresTaskRepository::new(pool);

    let mut stored = task("Weekly sync", owner, TaskPriority::High);
    stored.recurrence = Some(TaskRecurrence {
        recurring_type: RecurringType::Weekly,
        interval: Some(1),
        days: vec![1, 3],
        day_of_month: None,
        end_date: None,
    });
    assert!(repository.insert(&stored).await.is_ok());

    let found = repository
        .find(stored.id)
        .await
        .unwrap_or_else(|error| panic!("find failed: {error}"));
    assert_eq!(found, Some(stored.clone()));

    stored.status = TaskStatus::Completed;
    assert!(repository.update(&stored).await.is_ok());
    let updated = repository.find(stored.id).await.ok().flatten();
    assert_eq!(updated.map(|task| task.status), Some(TaskStatus::Completed));

    assert_eq!(repository.delete(stored.id).await.ok(), Some(true));
    assert_eq!(repository.delete(stored.id).await.ok(), Some(false));
}

#[tokio::test]
async fn list_scopes_searches_and_orders_by_priority() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let owner = ensure_user(&pool).await;
    let repository = PostgresTaskRepository::new(pool);

    for (title, priority) in [
        ("Draft budget", TaskPriority::Low),
        ("Approve budget", TaskPriority::High),
        ("Book travel", TaskPriority::Medium),
    ] {
        assert!(repository.insert(&task(title, owner, priority)).await.is_ok());
    }

    let listed = repository
        .list(&TaskFilter {
            involving: Some(owner),
            search: Some("BUDGET".to_owned()),
            sort: TaskSort {
                field: TaskSortField::Priority,
                order: SortOrder::Desc,
            },
            ..TaskFilter::default()
        })
        .await
        .unwrap_or_else(|error| panic!("list failed: {error}"));

    let titles: Vec<&str> = listed.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["Approve budget", "Draft budget"]);
}

#[tokio::test]
async fn update_of_missing_task_is_not_found() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let owner = ensure_user(&pool).await;
    let repository = PostgresTaskRepository::new(pool);

    let result = repository
        .update(&task("ghost", owner, TaskPriority::Low))
        .await;
    assert!(matches!(result, Err(taskpro_core::AppError::NotFound(_))));
}
