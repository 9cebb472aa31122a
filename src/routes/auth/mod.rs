pub mod login;
pub mod signup;

pub use login::*;
pub use signup::*;
