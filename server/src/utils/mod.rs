pub mod error;
pub mod response;
pub mod sanitize;

pub use error::{AppError, FieldError};
