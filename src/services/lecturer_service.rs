use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::config::{LecturerMatch, QueryFailure};
use crate::db::{QueryOutcome, queries, repository};
use crate::error::AppError;
use crate::lookup::RemoteLookup;
use crate::models::{
    NewTask, NewTaskRequest, PendingTasksToSet, SettedDatesRequest, Task, TasksToDo,
};

pub struct LecturerService {
    db: SqlitePool,
    lookup: Arc<dyn RemoteLookup>,
    lecturer_match: LecturerMatch,
    query_failure: QueryFailure,
}

impl LecturerService {
    pub fn new(
        db: SqlitePool,
        lookup: Arc<dyn RemoteLookup>,
        lecturer_match: LecturerMatch,
        query_failure: QueryFailure,
    ) -> Self {
        Self {
            db,
            lookup,
            lecturer_match,
            query_failure,
        }
    }

    /// Assessments owned by the lecturer whose upload/deadline dates are not set yet.
    pub async fn retrieve_dates_to_set(&self, lecturer_id: i64) -> Result<PendingTasksToSet, AppError> {
        let username = self.lecturer_username(lecturer_id).await?;
        let outcome =
            queries::fetch_pending_date_assignments(&self.db, &username, self.lecturer_match).await;
        let rows = self.apply_failure_policy("pending date assignments", outcome)?;
        info!("{} assessment(s) awaiting dates for lecturer {}", rows.len(), lecturer_id);
        Ok(rows.into())
    }

    pub async fn record_dates(&self, req: SettedDatesRequest) -> Result<(), AppError> {
        let upload_date = req.upload_date()?;
        let deadline_date = req.deadline_date()?;

        let result =
            queries::update_assessment_dates(&self.db, req.assessment_id, upload_date, deadline_date)
                .await;
        let updated = match (result, self.query_failure) {
            (Ok(updated), _) => updated,
            (Err(e), QueryFailure::Swallow) => {
                error!("recording dates for assessment {} failed: {}", req.assessment_id, e);
                return Ok(());
            }
            (Err(e), QueryFailure::Surface) => return Err(AppError::Database(e)),
        };
        if updated == 0 {
            warn!("no assessment {} to record dates on", req.assessment_id);
        } else {
            info!(
                "assessment {} dates set: upload {} deadline {}",
                req.assessment_id, upload_date, deadline_date
            );
        }
        Ok(())
    }

    pub async fn create_task(&self, req: NewTaskRequest) -> Result<Task, AppError> {
        let date_to_send = req.date_to_send()?;
        let assessment = self.lookup.fetch_assessment(req.assessment_id).await?;
        let assessment_id = assessment.assessment_id.ok_or_else(|| {
            AppError::Upstream(format!("assessment {} came back without an id", req.assessment_id))
        })?;

        let task = repository::create_task(
            &self.db,
            &NewTask {
                task_description: req.task_description,
                date_to_send,
                email_address_to_send: None,
                task_belongs_to_assessment: assessment_id,
            },
        )
        .await?;
        info!("task {} created for assessment {}", task.task_id, assessment_id);
        Ok(task)
    }

    pub async fn list_open_tasks(&self, lecturer_id: i64) -> Result<TasksToDo, AppError> {
        let username = self.lecturer_username(lecturer_id).await?;
        let outcome = queries::fetch_open_tasks(&self.db, &username, self.lecturer_match).await;
        let rows = self.apply_failure_policy("open tasks", outcome)?;
        Ok(rows.into())
    }

    /// Marks the task completed. Repeating the call leaves it completed.
    pub async fn change_completion(&self, task_id: i64) -> Result<Task, AppError> {
        let mut task = repository::find_task_by_id(&self.db, task_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("task {} does not exist", task_id)))?;

        task.is_completed = true;
        let task = repository::save_task(&self.db, &task).await?;
        info!("task {} marked completed", task_id);
        Ok(task)
    }

    async fn lecturer_username(&self, lecturer_id: i64) -> Result<String, AppError> {
        let user = self.lookup.fetch_user(lecturer_id).await?;
        match user.username {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(AppError::Upstream(format!(
                "user {} came back without a username",
                lecturer_id
            ))),
        }
    }

    fn apply_failure_policy<T>(&self, what: &str, outcome: QueryOutcome<T>) -> Result<Vec<T>, AppError> {
        match (outcome, self.query_failure) {
            (QueryOutcome::Rows(rows), _) => Ok(rows),
            (QueryOutcome::Failed(e), QueryFailure::Swallow) => {
                error!("{} query failed, answering with an empty list: {}", what, e);
                Ok(Vec::new())
            }
            (QueryOutcome::Failed(e), QueryFailure::Surface) => Err(AppError::Database(e)),
        }
    }
}
