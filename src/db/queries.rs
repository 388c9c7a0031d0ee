//! Read-side joins across the module/assessment ownership chain, plus the
//! single assessment update the lecturer is allowed to make.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::config::LecturerMatch;
use crate::models::{PendingTaskToSet, TaskToDo};

/// Result of a listing query: every row, or the reason there are none.
#[derive(Debug)]
pub enum QueryOutcome<T> {
    Rows(Vec<T>),
    Failed(sqlx::Error),
}

impl<T> QueryOutcome<T> {
    pub fn into_result(self) -> Result<Vec<T>, sqlx::Error> {
        match self {
            QueryOutcome::Rows(rows) => Ok(rows),
            QueryOutcome::Failed(e) => Err(e),
        }
    }
}

impl<T> From<Result<Vec<T>, sqlx::Error>> for QueryOutcome<T> {
    fn from(result: Result<Vec<T>, sqlx::Error>) -> Self {
        match result {
            Ok(rows) => QueryOutcome::Rows(rows),
            Err(e) => QueryOutcome::Failed(e),
        }
    }
}

// instr() keeps the substring match case-sensitive and treats '_' and '%'
// in usernames literally.
fn lecturer_filter(rule: LecturerMatch) -> &'static str {
    match rule {
        LecturerMatch::Substring => "instr(M.primary_lecturer, ?1) > 0",
        LecturerMatch::Exact => "M.primary_lecturer = ?1",
    }
}

pub async fn fetch_pending_date_assignments(
    db: &SqlitePool,
    username: &str,
    rule: LecturerMatch,
) -> QueryOutcome<PendingTaskToSet> {
    let sql = format!(
        r#"
        SELECT
            M.module_name AS module_name,
            M.curriculum AS curriculum,
            A.assessment_type AS assessment_type,
            A.assessment_weeks AS assessment_weeks,
            A.assessment_id AS assessment_id,
            S.week1_begin_date AS week1_begin_date,
            A.assessment_weight AS assessment_weight
        FROM modules M
        JOIN entries E ON E.entry_id = M.module_belongsTo_entry
        JOIN assessments A ON A.assessment_belongsTo_module = M.module_id
        JOIN users U ON U.user_id = E.user_id
        JOIN settings S ON S.entry_FK = E.entry_id
        WHERE {}
          AND A.areDatesSet = 0
        "#,
        lecturer_filter(rule)
    );

    sqlx::query_as::<_, PendingTaskToSet>(&sql)
        .bind(username)
        .fetch_all(db)
        .await
        .into()
}

pub async fn fetch_open_tasks(
    db: &SqlitePool,
    username: &str,
    rule: LecturerMatch,
) -> QueryOutcome<TaskToDo> {
    let sql = format!(
        r#"
        SELECT
            T.task_id AS task_id,
            T.task_description AS task_description,
            T.date_to_send AS date_to_send,
            M.module_name AS module_name,
            M.curriculum AS curriculum,
            A.assessment_type AS assessment_type
        FROM tasks T
        JOIN assessments A ON T.task_belongs_to_assessment = A.assessment_id
        JOIN modules M ON A.assessment_belongsTo_module = M.module_id
        JOIN entries E ON M.module_belongsTo_entry = E.entry_id
        JOIN settings S ON S.entry_FK = E.entry_id
        JOIN users U ON E.user_id = U.user_id
        WHERE {}
          AND T.isCompleted = 0
        "#,
        lecturer_filter(rule)
    );

    sqlx::query_as::<_, TaskToDo>(&sql)
        .bind(username)
        .fetch_all(db)
        .await
        .into()
}

/// Returns the number of assessments touched; an unknown id updates nothing.
pub async fn update_assessment_dates(
    db: &SqlitePool,
    assessment_id: i64,
    upload_date: NaiveDate,
    deadline_date: NaiveDate,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE assessments
        SET assessment_upload_date = ?1,
            assessment_deadline_date = ?2,
            areDatesSet = 1
        WHERE assessment_id = ?3
        "#,
    )
    .bind(upload_date)
    .bind(deadline_date)
    .bind(assessment_id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result)
}
