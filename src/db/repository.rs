use sqlx::SqlitePool;

use crate::models::{NewTask, Task};

const TASK_COLUMNS: &str = "task_id, task_description, date_to_send, isCompleted, email_address_to_send, task_belongs_to_assessment";

pub async fn create_task(db: &SqlitePool, task: &NewTask) -> Result<Task, sqlx::Error> {
    let task_id = sqlx::query(
        r#"
        INSERT INTO tasks
            (task_description, date_to_send, isCompleted,
            email_address_to_send, task_belongs_to_assessment)
        VALUES (?1, ?2, 0, ?3, ?4)
        "#,
    )
    .bind(&task.task_description)
    .bind(task.date_to_send)
    .bind(&task.email_address_to_send)
    .bind(task.task_belongs_to_assessment)
    .execute(db)
    .await?
    .last_insert_rowid();

    Ok(Task {
        task_id,
        task_description: task.task_description.clone(),
        date_to_send: task.date_to_send,
        is_completed: false,
        email_address_to_send: task.email_address_to_send.clone(),
        task_belongs_to_assessment: task.task_belongs_to_assessment,
    })
}

pub async fn find_task_by_id(db: &SqlitePool, task_id: i64) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!("SELECT {} FROM tasks WHERE task_id = ?", TASK_COLUMNS))
        .bind(task_id)
        .fetch_optional(db)
        .await
}

/// Writes every field of `task`, inserting it under its id if no row exists yet.
pub async fn save_task(db: &SqlitePool, task: &Task) -> Result<Task, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        r#"
        INSERT INTO tasks ({columns})
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(task_id) DO UPDATE SET
            task_description = excluded.task_description,
            date_to_send = excluded.date_to_send,
            isCompleted = excluded.isCompleted,
            email_address_to_send = excluded.email_address_to_send,
            task_belongs_to_assessment = excluded.task_belongs_to_assessment
        RETURNING {columns}
        "#,
        columns = TASK_COLUMNS
    ))
    .bind(task.task_id)
    .bind(&task.task_description)
    .bind(task.date_to_send)
    .bind(task.is_completed)
    .bind(&task.email_address_to_send)
    .bind(task.task_belongs_to_assessment)
    .fetch_one(db)
    .await
}
