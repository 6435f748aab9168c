//! HTTP API Module
//!
//! Thin transport layer between clients and the [`UserStore`](crate::storage::store::UserStore).
//!
//! ## Request Flow
//! 1. **Middleware**: every request gets an id, a tracing span and a deadline.
//! 2. **Validation**: JSON bodies are decoded and checked by the `Validated` extractor
//!    before any handler code runs.
//! 3. **Dispatch**: handlers call exactly one store operation.
//! 4. **Mapping**: `ApiError` turns failures into status codes (400 validation,
//!    404 missing user, 503 storage failure).
//!
//! ## Submodules
//! - **`error`**: The `ApiError` type and its response mapping.
//! - **`handlers`**: Axum handlers, generic over the store implementation.
//! - **`protocol`**: Route paths and request/response DTOs.
//! - **`router`**: Router assembly and middleware.
//! - **`validation`**: Per-request shape rules and the validating extractor.

pub mod error;
pub mod handlers;
pub mod protocol;
pub mod router;
pub mod validation;
