pub mod lecturer_service;

pub use lecturer_service::LecturerService;
