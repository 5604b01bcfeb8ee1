pub mod auth;
pub mod logs;
pub mod project;
pub mod task;

use taskdeck_core::http::ApiClient;

/// True when a session is currently stored. Read before an operation so
/// failures can distinguish "expired mid-command" from "never logged in".
pub fn has_session(client: &ApiClient) -> bool {
    client.identity().load().is_some()
}
