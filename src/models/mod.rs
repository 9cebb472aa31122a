pub mod activity;
pub mod book;
pub mod task;
pub mod user;

pub use activity::*;
pub use book::*;
pub use task::*;
pub use user::*;
