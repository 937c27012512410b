//! API request/response types

mod error;
mod json;
mod question;

pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use question::{QuestionQueryParams, QuestionRequest, QuestionResponse};
