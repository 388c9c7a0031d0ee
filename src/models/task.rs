use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::lecturer::{id_from_str_or_number, parse_iso_date};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_id: i64,
    pub task_description: String,
    pub date_to_send: NaiveDate,
    #[sqlx(rename = "isCompleted")]
    pub is_completed: bool,
    pub email_address_to_send: Option<String>,
    pub task_belongs_to_assessment: i64,
}

/// A task that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub task_description: String,
    pub date_to_send: NaiveDate,
    pub email_address_to_send: Option<String>,
    pub task_belongs_to_assessment: i64,
}

/// Body of `POST /lecturers/tasks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskRequest {
    #[serde(rename = "assessmentID", deserialize_with = "id_from_str_or_number")]
    pub assessment_id: i64,
    pub task_description: String,
    pub date_to_send: String,
}

impl NewTaskRequest {
    pub fn date_to_send(&self) -> Result<NaiveDate, AppError> {
        parse_iso_date("dateToSend", &self.date_to_send)
    }
}
