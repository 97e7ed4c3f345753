pub mod auth_service;
pub mod dashboard;
pub mod task_service;

mod service_tests;
