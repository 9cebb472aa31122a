pub mod activity;
pub mod book;
pub mod task;
pub mod user;
