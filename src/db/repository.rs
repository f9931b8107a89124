use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{NewTaskRequest, OrderUpdate, Task, Theme};

pub async fn fetch_tasks(db: &SqlitePool) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "SELECT id, text, completed, display_order, user_id, created_at FROM tasks ORDER BY display_order ASC",
    )
    .fetch_all(db)
    .await
}

pub async fn find_task_by_id(db: &SqlitePool, id: &str) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "SELECT id, text, completed, display_order, user_id, created_at FROM tasks WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_task(db: &SqlitePool, req: NewTaskRequest) -> Result<Task, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now().timestamp_millis();

    let mut tx = db.begin().await?;
    let order = match req.order {
        // Caller-computed position is trusted verbatim, duplicates included.
        Some(order) => order,
        None => {
            sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(display_order) + 1, 0) FROM tasks")
                .fetch_one(&mut *tx)
                .await?
        }
    };

    sqlx::query(
        "INSERT INTO tasks (id, text, completed, display_order, user_id, created_at) VALUES (?, ?, 0, ?, NULL, ?)",
    )
    .bind(&id)
    .bind(&req.text)
    .bind(order)
    .bind(created_at)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(Task {
        id,
        text: req.text,
        completed: false,
        order,
        user_id: None,
        created_at,
    })
}

pub async fn toggle_task(db: &SqlitePool, id: &str) -> Result<Option<Task>, sqlx::Error> {
    let Some(mut task) = find_task_by_id(db, id).await? else {
        return Ok(None);
    };
    task.completed = !task.completed;

    sqlx::query("UPDATE tasks SET completed = ? WHERE id = ?")
        .bind(task.completed)
        .bind(id)
        .execute(db)
        .await?;

    Ok(Some(task))
}

/// Idempotent: deleting an id that no longer exists succeeds.
pub async fn delete_task(db: &SqlitePool, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn update_task_text(
    db: &SqlitePool,
    id: &str,
    text: &str,
) -> Result<Option<Task>, sqlx::Error> {
    let result = sqlx::query("UPDATE tasks SET text = ? WHERE id = ?")
        .bind(text)
        .bind(id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find_task_by_id(db, id).await
}

/// Applies one display_order patch per pair, in the order given, inside a
/// single transaction.
pub async fn update_tasks_order(
    db: &SqlitePool,
    updates: &[OrderUpdate],
) -> Result<(), sqlx::Error> {
    let mut tx = db.begin().await?;
    for update in updates {
        sqlx::query("UPDATE tasks SET display_order = ? WHERE id = ?")
            .bind(update.order)
            .bind(&update.id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await
}

pub async fn fetch_theme(db: &SqlitePool, user_id: &str) -> Result<Theme, sqlx::Error> {
    let stored: Option<String> =
        sqlx::query_scalar("SELECT theme FROM user_preferences WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(db)
            .await?;

    Ok(stored.as_deref().map_or(Theme::Light, Theme::from_db))
}

pub async fn upsert_theme(db: &SqlitePool, user_id: &str, theme: Theme) -> Result<(), sqlx::Error> {
    let existing: Option<String> =
        sqlx::query_scalar("SELECT user_id FROM user_preferences WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(db)
            .await?;

    match existing {
        Some(_) => {
            sqlx::query("UPDATE user_preferences SET theme = ? WHERE user_id = ?")
                .bind(theme.as_str())
                .bind(user_id)
                .execute(db)
                .await?;
        }
        None => {
            sqlx::query("INSERT INTO user_preferences (user_id, theme) VALUES (?, ?)")
                .bind(user_id)
                .bind(theme.as_str())
                .execute(db)
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test db");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    #[tokio::test]
    async fn test_insert_assigns_next_order() {
        let pool = setup_test_db().await;

        let first = insert_task(
            &pool,
            NewTaskRequest {
                text: "first".to_string(),
                order: None,
            },
        )
        .await
        .expect("Failed to insert task");
        assert_eq!(first.order, 0);
        assert!(!first.completed);

        let second = insert_task(
            &pool,
            NewTaskRequest {
                text: "second".to_string(),
                order: None,
            },
        )
        .await
        .expect("Failed to insert task");
        assert_eq!(second.order, 1);
    }

    #[tokio::test]
    async fn test_theme_defaults_to_light() {
        let pool = setup_test_db().await;

        let theme = fetch_theme(&pool, "nobody")
            .await
            .expect("Failed to fetch theme");
        assert_eq!(theme, Theme::Light);

        upsert_theme(&pool, "nobody", Theme::Dark)
            .await
            .expect("Failed to set theme");
        let theme = fetch_theme(&pool, "nobody")
            .await
            .expect("Failed to fetch theme");
        assert_eq!(theme, Theme::Dark);
    }
}
