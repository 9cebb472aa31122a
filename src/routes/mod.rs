pub mod account;
pub mod auth;
pub mod book;
pub mod health_checks;
pub mod task;

pub use health_checks::*;
