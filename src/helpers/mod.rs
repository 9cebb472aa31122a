pub(crate) mod json;
pub(crate) mod origin;

pub use json::*;
pub use origin::*;
