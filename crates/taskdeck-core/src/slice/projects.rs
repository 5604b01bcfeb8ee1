//! Projects slice: CRUD over the caller's projects.
//!
//! Holds two caches at once: the current project (detail/edit pages)
//! and the full project list (dashboard). List maintenance is local:
//! create appends, update replaces by id, delete filters; no refetch is
//! issued after a mutation.

use crate::http::ApiClient;
use crate::model::{NewProject, Project};
use crate::status::RequestStatus;
use crate::types::OpKind;

#[derive(Default)]
pub struct ProjectsSlice {
    current: Option<Project>,
    list: Vec<Project>,
    status: RequestStatus,
}

impl ProjectsSlice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Project> {
        self.current.as_ref()
    }

    pub fn list(&self) -> &[Project] {
        &self.list
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// `POST /projects`.
    pub async fn create(&mut self, client: &ApiClient, project: &NewProject) {
        let ticket = self.status.begin();
        if project.title.trim().is_empty() {
            self.status.fail(ticket, "title is required");
            return;
        }

        match client.post::<Project>("/projects", project).await {
            Ok(created) => {
                if self.status.succeed(ticket, OpKind::Created, "project created") {
                    self.list.push(created.clone());
                    self.current = Some(created);
                }
            }
            Err(err) => {
                self.status.fail(ticket, err.display_message());
            }
        }
    }

    /// `GET /projects/:id`. The previous current project is cleared for
    /// the duration of the fetch.
    pub async fn fetch_one(&mut self, client: &ApiClient, project_id: &str) {
        let ticket = self.status.begin();
        self.current = None;

        match client
            .get_one::<Project>(&format!("/projects/{project_id}"))
            .await
        {
            Ok(project) => {
                if self.status.succeed(ticket, OpKind::Loaded, "project loaded") {
                    self.current = Some(project);
                }
            }
            Err(err) => {
                self.status.fail(ticket, err.display_message());
            }
        }
    }

    /// `GET /projects`. The list is emptied while the fetch is pending
    /// so a reload never shows stale rows.
    pub async fn fetch_all(&mut self, client: &ApiClient) {
        let ticket = self.status.begin();
        self.list.clear();

        match client.get_list::<Vec<Project>>("/projects").await {
            Ok(projects) => {
                if self.status.succeed(ticket, OpKind::Loaded, "projects loaded") {
                    self.list = projects;
                }
            }
            Err(err) => {
                if self.status.fail(ticket, err.display_message()) {
                    self.list.clear();
                }
            }
        }
    }

    /// `PUT /projects/:id`. On success the matching list entry is
    /// replaced; on failure both caches are left as they were.
    pub async fn update(&mut self, client: &ApiClient, project_id: &str, project: &NewProject) {
        let ticket = self.status.begin();
        if project.title.trim().is_empty() {
            self.status.fail(ticket, "title is required");
            return;
        }

        match client
            .put::<Project>(&format!("/projects/{project_id}"), project)
            .await
        {
            Ok(updated) => {
                if self.status.succeed(ticket, OpKind::Updated, "project updated") {
                    if let Some(entry) = self.list.iter_mut().find(|p| p.id == updated.id) {
                        *entry = updated.clone();
                    }
                    self.current = Some(updated);
                }
            }
            Err(err) => {
                self.status.fail(ticket, err.display_message());
            }
        }
    }

    /// `DELETE /projects/:id`. On success the entry is filtered out of
    /// the list; other cached projects are untouched.
    pub async fn delete(&mut self, client: &ApiClient, project_id: &str) {
        let ticket = self.status.begin();

        match client.delete(&format!("/projects/{project_id}")).await {
            Ok(()) => {
                if self.status.succeed(ticket, OpKind::Deleted, "project deleted") {
                    self.list.retain(|p| p.id != project_id);
                    if self.current.as_ref().is_some_and(|p| p.id == project_id) {
                        self.current = None;
                    }
                }
            }
            Err(err) => {
                self.status.fail(ticket, err.display_message());
            }
        }
    }

    /// Back to Idle. The current project is dropped; the list cache is
    /// deliberately preserved so the dashboard keeps its rows across a
    /// detail-page reset.
    pub fn reset(&mut self) {
        self.status.reset();
        self.current = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::identity::MemoryIdentityStore;
    use std::sync::Arc;

    fn client_for(url: &str) -> ApiClient {
        let config = ClientConfig {
            api_url: url.to_string(),
            ..ClientConfig::default()
        };
        ApiClient::new(&config, Arc::new(MemoryIdentityStore::new())).unwrap()
    }

    fn project_json(id: &str, title: &str) -> String {
        format!(r#"{{"_id": "{id}", "title": "{title}", "description": "d"}}"#)
    }

    #[tokio::test]
    async fn create_then_list_includes_project() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/projects")
            .with_body(project_json("p1", "Alpha"))
            .create_async()
            .await;
        server
            .mock("GET", "/projects")
            .with_body(format!("[{}]", project_json("p1", "Alpha")))
            .create_async()
            .await;

        let client = client_for(&server.url());
        let mut projects = ProjectsSlice::new();

        projects
            .create(
                &client,
                &NewProject {
                    title: "Alpha".into(),
                    description: "d".into(),
                },
            )
            .await;
        assert!(projects.status().succeeded());
        assert_eq!(projects.status().outcome(), Some(OpKind::Created));
        assert_eq!(projects.list().len(), 1);

        projects.fetch_all(&client).await;
        assert!(projects.status().succeeded());
        assert_eq!(projects.list().len(), 1);
        assert_eq!(projects.list()[0].title, "Alpha");
        assert_eq!(projects.list()[0].description, "d");
    }

    #[tokio::test]
    async fn fetch_all_clears_list_on_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects")
            .with_body(format!("[{}]", project_json("p1", "Alpha")))
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let mut projects = ProjectsSlice::new();
        projects.fetch_all(&client).await;
        assert_eq!(projects.list().len(), 1);

        // Second fetch hits the exhausted mock and fails.
        projects.fetch_all(&client).await;
        assert!(projects.status().failed());
        assert!(projects.list().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_list_entry() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects")
            .with_body(format!(
                "[{}, {}]",
                project_json("p1", "Alpha"),
                project_json("p2", "Beta")
            ))
            .create_async()
            .await;
        server
            .mock("PUT", "/projects/p2")
            .with_body(project_json("p2", "Beta v2"))
            .create_async()
            .await;

        let client = client_for(&server.url());
        let mut projects = ProjectsSlice::new();
        projects.fetch_all(&client).await;

        projects
            .update(
                &client,
                "p2",
                &NewProject {
                    title: "Beta v2".into(),
                    description: "d".into(),
                },
            )
            .await;

        assert_eq!(projects.status().outcome(), Some(OpKind::Updated));
        assert_eq!(projects.list()[1].title, "Beta v2");
        assert_eq!(projects.current().unwrap().title, "Beta v2");
        assert_eq!(projects.list()[0].title, "Alpha");
    }

    #[tokio::test]
    async fn delete_filters_list_and_leaves_others() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects")
            .with_body(format!(
                "[{}, {}]",
                project_json("p1", "Alpha"),
                project_json("p2", "Beta")
            ))
            .create_async()
            .await;
        server
            .mock("DELETE", "/projects/p1")
            .with_status(204)
            .create_async()
            .await;

        use crate::identity::IdentityStore;
        use crate::model::{Session, UserSummary};

        let store = Arc::new(MemoryIdentityStore::new());
        store.store(&Session::new(
            UserSummary {
                id: "u1".into(),
                username: "ada".into(),
                email: "a@b.com".into(),
                role: None,
            },
            "t",
        ));
        let config = ClientConfig {
            api_url: server.url(),
            ..ClientConfig::default()
        };
        let client = ApiClient::new(&config, store.clone()).unwrap();
        let mut projects = ProjectsSlice::new();
        projects.fetch_all(&client).await;

        projects.delete(&client, "p1").await;
        assert_eq!(projects.status().outcome(), Some(OpKind::Deleted));
        assert_eq!(projects.list().len(), 1);
        assert_eq!(projects.list()[0].id, "p2");
        // Deleting a project must not touch the session.
        assert!(store.load().is_some());
    }

    #[tokio::test]
    async fn mutation_failure_preserves_caches() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects")
            .with_body(format!("[{}]", project_json("p1", "Alpha")))
            .create_async()
            .await;
        server
            .mock("DELETE", "/projects/p1")
            .with_status(500)
            .with_body(r#"{"message": "nope"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let mut projects = ProjectsSlice::new();
        projects.fetch_all(&client).await;

        projects.delete(&client, "p1").await;
        assert!(projects.status().failed());
        assert_eq!(projects.status().message(), "nope");
        assert_eq!(projects.list().len(), 1, "delete failure must not wipe the list");
    }

    #[tokio::test]
    async fn fetch_one_failure_leaves_no_current() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects/p9")
            .with_status(404)
            .with_body(r#"{"message": "no such project"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let mut projects = ProjectsSlice::new();
        projects.fetch_one(&client, "p9").await;
        assert!(projects.status().failed());
        assert!(projects.current().is_none());
    }

    #[tokio::test]
    async fn reset_preserves_list() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects")
            .with_body(format!("[{}]", project_json("p1", "Alpha")))
            .create_async()
            .await;
        server
            .mock("GET", "/projects/p1")
            .with_body(project_json("p1", "Alpha"))
            .create_async()
            .await;

        let client = client_for(&server.url());
        let mut projects = ProjectsSlice::new();
        projects.fetch_all(&client).await;
        projects.fetch_one(&client, "p1").await;
        assert!(projects.current().is_some());

        projects.reset();
        assert!(projects.status().is_idle());
        assert!(projects.current().is_none());
        assert_eq!(projects.list().len(), 1);
    }

    #[tokio::test]
    async fn create_validation_blocks_dispatch() {
        let client = client_for("http://127.0.0.1:1/api");
        let mut projects = ProjectsSlice::new();
        projects
            .create(
                &client,
                &NewProject {
                    title: "  ".into(),
                    description: "d".into(),
                },
            )
            .await;
        assert!(projects.status().failed());
        assert_eq!(projects.status().message(), "title is required");
    }
}
