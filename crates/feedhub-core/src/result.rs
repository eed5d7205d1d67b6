//! Convenience result type alias for FeedHub.

use crate::error::AppError;

/// A specialized `Result` type for FeedHub operations.
pub type AppResult<T> = Result<T, AppError>;
