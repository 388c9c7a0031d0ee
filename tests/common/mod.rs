#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header::CONTENT_TYPE};
use lecturer_service::build_app;
use lecturer_service::config::AppConfig;
use lecturer_service::lookup::StaticLookup;
use lecturer_service::models::Assessment;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// In-memory database with the real schema and a small university:
/// lecturer "jdoe" owns module 100 (as "jdoe_cs101"), "asmith" owns module 101.
pub async fn seeded_pool() -> SqlitePool {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::raw_sql(
        r#"
        INSERT INTO users (user_id, username) VALUES (1, 'jdoe'), (2, 'asmith');
        INSERT INTO entries (entry_id, user_id) VALUES (10, 1);
        INSERT INTO settings (settings_id, entry_FK, week1_begin_date) VALUES (1, 10, '2022-04-01');
        INSERT INTO modules (module_id, module_name, curriculum, primary_lecturer, module_belongsTo_entry)
        VALUES
            (100, 'Continuous and Agile Software Engineering', 'WM', 'jdoe_cs101', 10),
            (101, 'Databases', 'ASE', 'asmith', 10);
        INSERT INTO assessments
            (assessment_id, assessment_type, assessment_weight, assessment_weeks, areDatesSet, assessment_belongsTo_module)
        VALUES
            (3050, 'ASSESSED_LAB', 10, '00000100000000000', 0, 100),
            (3051, 'PROJECT', 40, '00000001111111000', 1, 100),
            (3060, 'EXAM', 50, '00000000000000001', 0, 101);
        "#,
    )
    .execute(&pool)
    .await
    .expect("Failed to seed database");

    pool
}

pub fn assessment(id: i64, assessment_type: &str) -> Assessment {
    Assessment {
        assessment_id: Some(id),
        assessment_type: Some(assessment_type.to_string()),
        ..Assessment::default()
    }
}

pub fn default_lookup() -> StaticLookup {
    StaticLookup::new()
        .with_user(1, "jdoe")
        .with_user(2, "asmith")
        .with_assessment(assessment(3050, "ASSESSED_LAB"))
        .with_assessment(assessment(3051, "PROJECT"))
        .with_assessment(assessment(3060, "EXAM"))
}

pub fn default_config() -> AppConfig {
    AppConfig::from_lookup(|_| None).expect("default config")
}

pub fn app_with(pool: &SqlitePool, lookup: StaticLookup, config: &AppConfig) -> Router {
    build_app(pool.clone(), Arc::new(lookup), config)
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(res: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

pub async fn task_rows(pool: &SqlitePool) -> Vec<(i64, bool, Option<String>, i64)> {
    sqlx::query_as(
        "SELECT task_id, isCompleted, email_address_to_send, task_belongs_to_assessment FROM tasks ORDER BY task_id",
    )
    .fetch_all(pool)
    .await
    .expect("Failed to read tasks")
}
