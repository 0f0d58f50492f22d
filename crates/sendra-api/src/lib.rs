mod backend;
mod error;

pub use backend::{ApiBackend, HttpBackend};
pub use error::ApiError;
