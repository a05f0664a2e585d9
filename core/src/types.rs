//! Domain values and per-endpoint wire records for the Taskie API.
//!
//! # Design
//! One record per request/response shape, no shared hierarchy. Response
//! fields the server may omit or null out are `Option` so that a missing
//! value reaches the facade as data instead of a decode failure; the facade
//! decides which of them are required.

use serde::{Deserialize, Serialize};

/// A task ("note" on the wire) as stored by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(rename = "taskPriority")]
    pub priority: i32,
}

impl Task {
    pub fn priority_tier(&self) -> PriorityTier {
        PriorityTier::from_priority(self.priority)
    }
}

/// Display tier for a task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityTier {
    Low,
    Medium,
    High,
}

impl PriorityTier {
    /// 1 is low, 2 is medium; 3 and any out-of-range value show as high.
    pub fn from_priority(priority: i32) -> Self {
        match priority {
            1 => PriorityTier::Low,
            2 => PriorityTier::Medium,
            _ => PriorityTier::High,
        }
    }
}

/// Profile of the signed-in user, composed from the profile endpoint and
/// the incomplete-task listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    pub task_count: usize,
}

/// Credentials for login and registration. `name` is only sent on
/// registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDataRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserDataRequest {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: None,
        }
    }

    pub fn register(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: Some(name.into()),
        }
    }
}

/// Request payload for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddTaskRequest {
    pub title: String,
    pub content: String,
    #[serde(rename = "taskPriority")]
    pub priority: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfileResponse {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GetTasksResponse {
    #[serde(default)]
    pub notes: Vec<Task>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompleteNoteResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteNoteResponse {
    #[serde(default)]
    pub message: Option<String>,
}
