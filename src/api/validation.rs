use axum::Json;
use axum::async_trait;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::error::ApiError;
use super::protocol::{CreateUserRequest, UpdateUserRequest};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("display_name cannot be empty")]
    EmptyDisplayName,

    #[error("email must contain the @ symbol")]
    InvalidEmail,

    #[error("display_name or email must be set")]
    NothingToUpdate,
}

/// Shape rules a request body must satisfy before it reaches a handler.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.display_name.is_empty() {
            return Err(ValidationError::EmptyDisplayName);
        }
        if !self.email.contains('@') {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let display_name = self.display_name.as_deref().unwrap_or_default();
        let email = self.email.as_deref().unwrap_or_default();

        if display_name.is_empty() && email.is_empty() {
            return Err(ValidationError::NothingToUpdate);
        }
        if !email.is_empty() && !email.contains('@') {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }
}

/// JSON body extractor that runs [`Validate`] before the handler sees the value.
#[derive(Debug)]
pub struct Validated<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}
