pub mod api;
pub mod board;
pub mod calendar;
pub mod date_parts;
pub mod error;
pub mod tag;
pub mod task;
pub mod timestamp;
pub mod user;
