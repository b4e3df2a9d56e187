use axum::extract::FromRequest;

use crate::error::AppError;

/// `Json` whose rejection renders as the standard error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
