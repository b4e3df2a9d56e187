//! Request validation.
//!
//! JSON bodies that only need shape checks derive [`Validate`]. Endpoints
//! whose fields are normalized before use go through [`payloads`], which
//! sanitize every field and collect all messages at once into a
//! [`Validated`] value.

pub mod payloads;
pub mod rules;

use crate::error::AppError;

pub use validator::Validate;

/// A sanitized payload plus every message produced while sanitizing it.
#[derive(Debug, Clone)]
pub struct Validated<T> {
    pub sanitized: T,
    pub errors: Vec<String>,
}

/// Turns a sanitized payload whose fields may be missing into the fully
/// populated form handlers work with.
pub trait Resolve {
    type Output;

    fn resolve(self) -> Option<Self::Output>;
}

impl<T> Resolve for Option<T> {
    type Output = T;

    fn resolve(self) -> Option<T> {
        self
    }
}

impl<T> Validated<T> {
    pub fn new(sanitized: T, errors: Vec<String>) -> Self {
        Self { sanitized, errors }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<T: Resolve> Validated<T> {
    /// `Validation` error listing every message, or the resolved payload.
    pub fn into_result(self) -> Result<T::Output, AppError> {
        if !self.errors.is_empty() {
            return Err(AppError::Validation(self.errors));
        }
        self.sanitized
            .resolve()
            .ok_or_else(|| AppError::Validation(vec!["Invalid input data".to_string()]))
    }
}

/// Flattens derive-based errors into their messages, field order preserved.
pub fn messages(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect()
}
