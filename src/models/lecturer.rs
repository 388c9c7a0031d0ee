use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};
use sqlx::FromRow;

use crate::error::AppError;

/// An assessment whose upload/deadline dates the lecturer still has to set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PendingTaskToSet {
    pub module_name: String,
    pub curriculum: Option<String>,
    pub assessment_type: Option<String>,
    pub assessment_weeks: Option<String>,
    pub assessment_id: i64,
    pub week1_begin_date: Option<NaiveDate>,
    pub assessment_weight: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTasksToSet {
    pub pending_tasks_to_set_list: Vec<PendingTaskToSet>,
}

impl From<Vec<PendingTaskToSet>> for PendingTasksToSet {
    fn from(pending_tasks_to_set_list: Vec<PendingTaskToSet>) -> Self {
        Self { pending_tasks_to_set_list }
    }
}

/// An open reminder task together with the module it concerns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskToDo {
    pub task_id: i64,
    pub task_description: String,
    pub date_to_send: NaiveDate,
    pub module_name: String,
    pub curriculum: Option<String>,
    pub assessment_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksToDo {
    pub tasks_to_do: Vec<TaskToDo>,
}

impl From<Vec<TaskToDo>> for TasksToDo {
    fn from(tasks_to_do: Vec<TaskToDo>) -> Self {
        Self { tasks_to_do }
    }
}

/// Body of `PUT /lecturers/uploadSettedDates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettedDatesRequest {
    pub upload_date: String,
    pub deadline_date: String,
    #[serde(rename = "assessmentID", deserialize_with = "id_from_str_or_number")]
    pub assessment_id: i64,
}

impl SettedDatesRequest {
    pub fn upload_date(&self) -> Result<NaiveDate, AppError> {
        parse_iso_date("uploadDate", &self.upload_date)
    }

    pub fn deadline_date(&self) -> Result<NaiveDate, AppError> {
        parse_iso_date("deadlineDate", &self.deadline_date)
    }
}

pub(crate) fn parse_iso_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| AppError::BadRequest(format!("{} is not a yyyy-MM-dd date: {}", field, e)))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Number(i64),
    Text(String),
}

/// Ids arrive either as JSON numbers or as numeric strings.
pub(crate) fn id_from_str_or_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match IdRepr::deserialize(deserializer)? {
        IdRepr::Number(n) => Ok(n),
        IdRepr::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid id: {:?}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTaskRequest;

    #[test]
    fn setted_dates_accepts_string_id() {
        let req: SettedDatesRequest = serde_json::from_str(
            r#"{"uploadDate":"2022-04-04","deadlineDate":"2022-05-20","assessmentID":"3050"}"#,
        )
        .unwrap();
        assert_eq!(req.assessment_id, 3050);
        assert_eq!(req.upload_date().unwrap(), NaiveDate::from_ymd_opt(2022, 4, 4).unwrap());
        assert_eq!(req.deadline_date().unwrap(), NaiveDate::from_ymd_opt(2022, 5, 20).unwrap());
    }

    #[test]
    fn new_task_accepts_numeric_id() {
        let req: NewTaskRequest = serde_json::from_str(
            r#"{"assessmentID":3051,"taskDescription":"Mark papers","dateToSend":"2022-07-01"}"#,
        )
        .unwrap();
        assert_eq!(req.assessment_id, 3051);
        assert_eq!(req.task_description, "Mark papers");
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let res: Result<SettedDatesRequest, _> = serde_json::from_str(
            r#"{"uploadDate":"2022-04-04","deadlineDate":"2022-05-20","assessmentID":"abc"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn malformed_date_is_a_bad_request() {
        let err = parse_iso_date("uploadDate", "04/04/2022").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn views_serialize_with_wire_names() {
        let view = PendingTasksToSet::from(vec![PendingTaskToSet {
            module_name: "Continuous and Agile Software Engineering".into(),
            curriculum: Some("WM".into()),
            assessment_type: Some("ASSESSED_LAB".into()),
            assessment_weeks: Some("00000100000000000".into()),
            assessment_id: 3050,
            week1_begin_date: NaiveDate::from_ymd_opt(2022, 4, 1),
            assessment_weight: 10,
        }]);
        let json = serde_json::to_value(&view).unwrap();
        let row = &json["pendingTasksToSetList"][0];
        assert_eq!(row["moduleName"], "Continuous and Agile Software Engineering");
        assert_eq!(row["assessmentId"], 3050);
        assert_eq!(row["week1BeginDate"], "2022-04-01");
        assert_eq!(row["assessmentWeight"], 10);

        let todo = serde_json::to_value(TasksToDo::default()).unwrap();
        assert_eq!(todo["tasksToDo"], serde_json::json!([]));
    }
}
