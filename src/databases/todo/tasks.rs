use serde::Serialize;
use sqlx::{FromRow, PgPool};

pub const MAX_TITLE_LEN: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "mission_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    InProgress,
    Finished,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::InProgress => "in progress",
            TaskStatus::Finished => "finished",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Task {
    pub id: i32,
    pub user_id: i32,
    pub task_name: String,
    pub status: TaskStatus,
}

/// Trims the title and caps it at the column width. Blank titles yield `None`.
pub fn normalize_title(raw: &str) -> Option<String> {
    let title = raw.trim();
    if title.is_empty() {
        return None;
    }
    Some(title.chars().take(MAX_TITLE_LEN).collect())
}

// Every statement below filters on user_id; a guessed task id from another
// account matches nothing.

pub async fn list_tasks(pool: &PgPool, owner_id: i32) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        r#"
        SELECT id, user_id, task_name, status
        FROM todo
        WHERE user_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_task(pool: &PgPool, owner_id: i32, raw_title: &str) -> Result<Option<Task>, sqlx::Error> {
    let Some(title) = normalize_title(raw_title) else {
        return Ok(None);
    };

    let task = sqlx::query_as::<_, Task>(
        r#"
        INSERT INTO todo (user_id, task_name, status)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, task_name, status
        "#,
    )
    .bind(owner_id)
    .bind(title)
    .bind(TaskStatus::InProgress)
    .fetch_one(pool)
    .await?;

    Ok(Some(task))
}

pub async fn finish_task(pool: &PgPool, owner_id: i32, task_id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE todo SET status = $1 WHERE id = $2 AND user_id = $3")
        .bind(TaskStatus::Finished)
        .bind(task_id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_task(pool: &PgPool, owner_id: i32, task_id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM todo WHERE id = $1 AND user_id = $2")
        .bind(task_id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
