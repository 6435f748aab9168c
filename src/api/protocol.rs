//! HTTP Protocol
//!
//! Route paths and the Data Transfer Objects (DTOs) exchanged with clients.
//! Stored [`User`](crate::storage::types::User) values are returned as-is; only
//! request bodies and small envelopes are defined here.

use serde::{Deserialize, Serialize};

use crate::storage::types::{UserId, UserPatch};

// --- API Endpoints ---

/// Server clock, returned as RFC 3339 text.
pub const ENDPOINT_ROOT: &str = "/";
/// Collection endpoint: list (GET) and create (POST).
pub const ENDPOINT_USERS: &str = "/api/v1/users";
/// Item endpoint: get (GET), update (PATCH) and delete (DELETE).
pub const ENDPOINT_USER: &str = "/api/v1/users/:id";

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
/// Client address set by a reverse proxy.
pub const REAL_IP_HEADER: &str = "x-real-ip";
/// Proxy chain, client first.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

// --- Data Transfer Objects ---

/// Body of `POST /api/v1/users/`.
///
/// Missing fields decode as empty strings and are then rejected by validation,
/// so clients get one consistent 400 instead of a deserializer error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub user_id: UserId,
}

/// Body of `PATCH /api/v1/users/{id}/`. Absent and empty fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        UserPatch {
            display_name: req.display_name,
            email: req.email,
        }
    }
}

/// Error envelope for every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short, stable description of the failure class.
    pub status: String,
    /// Human-readable detail.
    pub error: String,
}
