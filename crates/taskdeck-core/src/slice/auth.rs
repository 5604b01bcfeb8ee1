//! Authentication slice: register, login, logout, and startup restore.
//!
//! Register and login persist the session through the injected identity
//! store in the same transition that updates slice state, so storage and
//! state never disagree. Logout is purely local and cannot fail.

use crate::http::ApiClient;
use crate::model::{AuthResponse, Credentials, NewUser, Session};
use crate::status::RequestStatus;
use crate::types::OpKind;

#[derive(Default)]
pub struct AuthSlice {
    session: Session,
    status: RequestStatus,
}

impl AuthSlice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// `POST /auth/register`. On success the new identity is signed in
    /// and persisted.
    pub async fn register(&mut self, client: &ApiClient, new_user: &NewUser) {
        let ticket = self.status.begin();
        if new_user.username.trim().is_empty()
            || new_user.email.trim().is_empty()
            || new_user.password.is_empty()
        {
            self.status
                .fail(ticket, "username, email, and password are required");
            return;
        }

        match client.post::<AuthResponse>("/auth/register", new_user).await {
            Ok(auth) => {
                self.session = Session::new(auth.user, auth.token);
                client.identity().store(&self.session);
                self.status.succeed(ticket, OpKind::Created, "registered");
            }
            Err(err) => {
                if self.status.fail(ticket, err.display_message()) {
                    self.session.clear();
                }
            }
        }
    }

    /// `POST /auth/login`.
    pub async fn login(&mut self, client: &ApiClient, credentials: &Credentials) {
        let ticket = self.status.begin();
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            self.status.fail(ticket, "email and password are required");
            return;
        }

        match client.post::<AuthResponse>("/auth/login", credentials).await {
            Ok(auth) => {
                self.session = Session::new(auth.user, auth.token);
                client.identity().store(&self.session);
                self.status.succeed(ticket, OpKind::Loaded, "logged in");
            }
            Err(err) => {
                if self.status.fail(ticket, err.display_message()) {
                    self.session.clear();
                }
            }
        }
    }

    /// Clear the session and the persisted identity. No network call is
    /// involved; this cannot fail.
    pub fn logout(&mut self, client: &ApiClient) {
        self.session.clear();
        client.identity().clear();
        self.status.reset();
    }

    /// Restore the session from the persistence bridge, called once at
    /// startup. Leaves the session empty when nothing (or garbage) is
    /// stored.
    pub fn restore(&mut self, client: &ApiClient) {
        self.session = client.identity().load().unwrap_or_default();
    }

    /// Return the status to Idle. The session itself is untouched:
    /// navigating away from a login form is not a logout.
    pub fn reset(&mut self) {
        self.status.reset();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
