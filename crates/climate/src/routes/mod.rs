pub mod api;
pub mod error;
pub mod home;

pub use api::*;
pub use error::{ApiError, ErrorBody};
pub use home::*;
