//! Client-side session handling and a typed HTTP client for the TaskPro API.
//!
//! Nothing here carries security weight. Permission checks only decide what
//! to render; the API enforces every rule again.

#![forbid(unsafe_code)]

mod api_client;
mod error;
mod session_storage;
mod session_store;
mod ui_permissions;
mod wire;

pub use api_client::{API_TIMEOUT, ApiClient};
pub use error::{ClientError, ClientResult};
pub use session_storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};
pub use session_store::{SESSION_STORAGE_KEY, SessionRecord, SessionStore};
pub use ui_permissions::UiPermissions;
pub use wire::{
    AuthResponse, CreateTaskRequest, TaskListParams, TaskResponse, UserResponse,
};
