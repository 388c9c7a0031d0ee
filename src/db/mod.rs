pub mod queries;
pub mod repository;

pub use queries::QueryOutcome;
