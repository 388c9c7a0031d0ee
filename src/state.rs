use std::sync::Arc;

use sqlx::SqlitePool;

use crate::services::LecturerService;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub lecturers: Arc<LecturerService>,
}
