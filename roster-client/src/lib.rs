//! Frontend-side building blocks shared by the browser app and native tools:
//! the `User` wire type, normalized API errors, the user API seam and the
//! user-screen state machine. The `reqwest`-backed HTTP wrapper is only built
//! for native targets; the browser supplies its own transport.

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

pub mod api;
pub mod error;
#[cfg(not(target_arch = "wasm32"))]
pub mod http_client;
pub mod screen;
#[cfg(not(target_arch = "wasm32"))]
pub mod user_service;

pub use api::{ApiResponse, UserApi};
pub use error::ApiError;
#[cfg(not(target_arch = "wasm32"))]
pub use http_client::ApiService;
pub use screen::{ScreenState, UserRow, UserScreen};
#[cfg(not(target_arch = "wasm32"))]
pub use user_service::UserService;

pub const USERS_PATH: &str = "/users";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[display("User {{ id: {}, username: {} }}", id, username)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CreateUserRequest<'a> {
    pub username: &'a str,
}
