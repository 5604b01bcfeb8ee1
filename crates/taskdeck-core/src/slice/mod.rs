//! Resource slices: independent state containers, one per resource
//! family, each owning its cached data and a [`RequestStatus`]
//! lifecycle.
//!
//! Every operation follows the same shape: `begin()` (Pending, prior
//! message cleared, list caches emptied for list fetches so a reload
//! never shows stale rows), one adapter call, then `succeed`/`fail`,
//! which the status machine discards if a newer operation started in the
//! meantime. No operation retries; a failure is terminal for that
//! dispatch.
//!
//! [`RequestStatus`]: crate::status::RequestStatus

pub mod auth;
pub mod logs;
pub mod projects;
pub mod tasks;

pub use auth::AuthSlice;
pub use logs::LogsSlice;
pub use projects::ProjectsSlice;
pub use tasks::TasksSlice;
