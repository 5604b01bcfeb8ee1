//! Wire types for the tracking API.
//!
//! The server is the source of truth for every record here; the client
//! only holds caches refreshed per fetch. Responses use Mongo-style
//! `_id` keys, so each id field accepts both spellings.

use crate::types::{Priority, Role, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Users and sessions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(alias = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// A reference to a user. Some endpoints populate the full record,
/// others send the bare id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Summary(UserSummary),
    Id(String),
}

impl UserRef {
    pub fn id(&self) -> &str {
        match self {
            UserRef::Id(id) => id,
            UserRef::Summary(user) => &user.id,
        }
    }

    /// Display name when the record is populated, id otherwise.
    pub fn label(&self) -> &str {
        match self {
            UserRef::Id(id) => id,
            UserRef::Summary(user) => &user.username,
        }
    }
}

/// A reference to a project, either bare id or populated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectRef {
    Stub(ProjectStub),
    Id(String),
}

/// The slice of a populated project document the client cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStub {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, alias = "name")]
    pub title: Option<String>,
}

impl ProjectRef {
    pub fn id(&self) -> &str {
        match self {
            ProjectRef::Id(id) => id,
            ProjectRef::Stub(stub) => &stub.id,
        }
    }
}

/// The authenticated identity. Token and user are correlated: both
/// present or both absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Session {
    pub user: Option<UserSummary>,
    pub token: Option<String>,
}

impl Session {
    pub fn new(user: UserSummary, token: impl Into<String>) -> Self {
        Self {
            user: Some(user),
            token: Some(token.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn clear(&mut self) {
        self.user = None;
        self.token = None;
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(alias = "_id")]
    pub id: String,
    /// Older server builds emitted `name` instead of `title`.
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: Option<UserRef>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, rename = "assignedTo")]
    pub assigned_to: Option<UserRef>,
    #[serde(default)]
    pub project: Option<ProjectRef>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Logs
// ---------------------------------------------------------------------------

/// Append-only history entry attached to a task. Never mutated by the
/// client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(alias = "_id")]
    pub id: String,
    pub action: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "oldValue")]
    pub old_value: Option<serde_json::Value>,
    #[serde(default, rename = "newValue")]
    pub new_value: Option<serde_json::Value>,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default, rename = "createdAt")]
    pub timestamp: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// `POST /auth/register` and `POST /auth/login` both answer with this.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: UserSummary,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    #[serde(rename = "assignedTo")]
    pub assigned_to: Option<String>,
}

/// Partial task update. Absent fields are left untouched by the server,
/// so the status-cycle operation can send `{status}` alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    // Double Option: outer = field present in the patch, inner = clear
    // the assignment (serialized as null).
    #[serde(skip_serializing_if = "Option::is_none", rename = "assignedTo")]
    pub assigned_to: Option<Option<String>>,
}

impl TaskPatch {
    pub fn status_only(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assigned_to.is_none()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
