use serde::{Deserialize, Serialize};

/// A user as served by the user service. Only the fields this service reads
/// are kept; anything else in the body is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, alias = "userId")]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
}

/// An assessment as served by the assessment service. Dates are kept as the
/// raw strings the service sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assessment {
    #[serde(alias = "id")]
    pub assessment_id: Option<i64>,
    pub assessment_type: Option<String>,
    pub assessment_weight: Option<i32>,
    pub assessment_weeks: Option<String>,
    pub assessment_upload_date: Option<String>,
    pub assessment_deadline_date: Option<String>,
    pub are_dates_set: bool,
}
