//! Tasks slice: the single owner of every task cache.
//!
//! Holds the current task (detail/edit), the task list of one project
//! (recorded in `scope`), and the user directory for assignment
//! pickers. Loading a different project's tasks replaces the scoped
//! list wholesale.

use crate::http::ApiClient;
use crate::model::{NewTask, Task, TaskPatch, UserSummary};
use crate::status::RequestStatus;
use crate::types::{OpKind, TaskStatus};

#[derive(Default)]
pub struct TasksSlice {
    current: Option<Task>,
    list: Vec<Task>,
    scope: Option<String>,
    users: Vec<UserSummary>,
    status: RequestStatus,
}

impl TasksSlice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Task> {
        self.current.as_ref()
    }

    /// Tasks of the project identified by [`TasksSlice::scope`].
    pub fn list(&self) -> &[Task] {
        &self.list
    }

    /// Which project the list cache belongs to.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn users(&self) -> &[UserSummary] {
        &self.users
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// `POST /projects/:id/tasks`.
    pub async fn create(&mut self, client: &ApiClient, project_id: &str, task: &NewTask) {
        let ticket = self.status.begin();
        if task.title.trim().is_empty() {
            self.status.fail(ticket, "title is required");
            return;
        }

        match client
            .post::<Task>(&format!("/projects/{project_id}/tasks"), task)
            .await
        {
            Ok(created) => {
                if self.status.succeed(ticket, OpKind::Created, "task created") {
                    if self.scope.as_deref() == Some(project_id) {
                        self.list.push(created.clone());
                    }
                    self.current = Some(created);
                }
            }
            Err(err) => {
                self.status.fail(ticket, err.display_message());
            }
        }
    }

    /// `GET /tasks/:id`.
    pub async fn fetch_one(&mut self, client: &ApiClient, task_id: &str) {
        let ticket = self.status.begin();
        self.current = None;

        match client.get_one::<Task>(&format!("/tasks/{task_id}")).await {
            Ok(task) => {
                if self.status.succeed(ticket, OpKind::Loaded, "task loaded") {
                    self.current = Some(task);
                }
            }
            Err(err) => {
                self.status.fail(ticket, err.display_message());
            }
        }
    }

    /// `GET /projects/:id/tasks`. Re-scopes the list cache to
    /// `project_id`; the old list is emptied while the fetch is pending.
    pub async fn fetch_for_project(&mut self, client: &ApiClient, project_id: &str) {
        let ticket = self.status.begin();
        self.list.clear();
        self.scope = Some(project_id.to_string());

        match client
            .get_list::<Vec<Task>>(&format!("/projects/{project_id}/tasks"))
            .await
        {
            Ok(tasks) => {
                if self.status.succeed(ticket, OpKind::Loaded, "tasks loaded") {
                    self.list = tasks;
                }
            }
            Err(err) => {
                if self.status.fail(ticket, err.display_message()) {
                    self.list.clear();
                }
            }
        }
    }

    /// `GET /users`, the assignment picker directory.
    pub async fn fetch_users(&mut self, client: &ApiClient) {
        let ticket = self.status.begin();

        match client.get_list::<Vec<UserSummary>>("/users").await {
            Ok(users) => {
                if self.status.succeed(ticket, OpKind::Loaded, "users loaded") {
                    self.users = users;
                }
            }
            Err(err) => {
                if self.status.fail(ticket, err.display_message()) {
                    self.users.clear();
                }
            }
        }
    }

    /// `PUT /tasks/:id` with any combination of fields.
    pub async fn update(&mut self, client: &ApiClient, task_id: &str, patch: &TaskPatch) {
        let ticket = self.status.begin();
        if patch.is_empty() {
            self.status.fail(ticket, "nothing to update");
            return;
        }
        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            self.status.fail(ticket, "title is required");
            return;
        }

        match client
            .put::<Task>(&format!("/tasks/{task_id}"), patch)
            .await
        {
            Ok(updated) => {
                if self.status.succeed(ticket, OpKind::Updated, "task updated") {
                    if let Some(entry) = self.list.iter_mut().find(|t| t.id == updated.id) {
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

    /// The constrained status update: cycle `from` one step forward and
    /// send only `{status}`. See [`TaskStatus::next`] for the wrap-around
    /// order.
    pub async fn advance_status(&mut self, client: &ApiClient, task_id: &str, from: TaskStatus) {
        self.update(client, task_id, &TaskPatch::status_only(from.next()))
            .await;
    }

    /// `DELETE /tasks/:id`.
    pub async fn delete(&mut self, client: &ApiClient, task_id: &str) {
        let ticket = self.status.begin();

        match client.delete(&format!("/tasks/{task_id}")).await {
            Ok(()) => {
                if self.status.succeed(ticket, OpKind::Deleted, "task deleted") {
                    self.list.retain(|t| t.id != task_id);
                    if self.current.as_ref().is_some_and(|t| t.id == task_id) {
                        self.current = None;
                    }
                }
            }
            Err(err) => {
                self.status.fail(ticket, err.display_message());
            }
        }
    }

    /// Back to Idle. Drops the current task; the scoped list and the
    /// user directory are reusable and survive.
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

    fn task_json(id: &str, title: &str, status: &str) -> String {
        format!(r#"{{"_id": "{id}", "title": "{title}", "status": "{status}", "priority": "medium", "project": "p1"}}"#)
    }

    #[tokio::test]
    async fn fetch_for_project_scopes_the_list() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects/p1/tasks")
            .with_body(format!("[{}]", task_json("t1", "One", "pending")))
            .create_async()
            .await;

        let client = client_for(&server.url());
        let mut tasks = TasksSlice::new();
        tasks.fetch_for_project(&client, "p1").await;

        assert!(tasks.status().succeeded());
        assert_eq!(tasks.scope(), Some("p1"));
        assert_eq!(tasks.list().len(), 1);
    }

    #[tokio::test]
    async fn create_appends_only_within_scope() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects/p1/tasks")
            .with_body("[]")
            .create_async()
            .await;
        server
            .mock("POST", "/projects/p1/tasks")
            .with_body(task_json("t1", "One", "pending"))
            .create_async()
            .await;
        server
            .mock("POST", "/projects/p2/tasks")
            .with_body(task_json("t2", "Two", "pending"))
            .create_async()
            .await;

        let client = client_for(&server.url());
        let mut tasks = TasksSlice::new();
        tasks.fetch_for_project(&client, "p1").await;

        let new_task = NewTask {
            title: "One".into(),
            description: "".into(),
            assigned_to: None,
        };
        tasks.create(&client, "p1", &new_task).await;
        assert_eq!(tasks.list().len(), 1, "in-scope create appends");

        tasks.create(&client, "p2", &new_task).await;
        assert_eq!(tasks.list().len(), 1, "out-of-scope create must not append");
        assert_eq!(tasks.current().unwrap().id, "t2");
    }

    #[tokio::test]
    async fn advance_status_sends_only_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/tasks/t1")
            .match_body(mockito::Matcher::JsonString(
                r#"{"status": "in-progress"}"#.to_string(),
            ))
            .with_body(task_json("t1", "One", "in-progress"))
            .create_async()
            .await;

        let client = client_for(&server.url());
        let mut tasks = TasksSlice::new();
        tasks
            .advance_status(&client, "t1", TaskStatus::Pending)
            .await;

        assert_eq!(tasks.status().outcome(), Some(OpKind::Updated));
        assert_eq!(tasks.current().unwrap().status, TaskStatus::InProgress);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn advance_status_wraps_from_completed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/tasks/t1")
            .match_body(mockito::Matcher::JsonString(
                r#"{"status": "pending"}"#.to_string(),
            ))
            .with_body(task_json("t1", "One", "pending"))
            .create_async()
            .await;

        let client = client_for(&server.url());
        let mut tasks = TasksSlice::new();
        tasks
            .advance_status(&client, "t1", TaskStatus::Completed)
            .await;
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn update_replaces_list_entry_and_current() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects/p1/tasks")
            .with_body(format!(
                "[{}, {}]",
                task_json("t1", "One", "pending"),
                task_json("t2", "Two", "pending")
            ))
            .create_async()
            .await;
        server
            .mock("PUT", "/tasks/t2")
            .with_body(task_json("t2", "Two v2", "pending"))
            .create_async()
            .await;

        let client = client_for(&server.url());
        let mut tasks = TasksSlice::new();
        tasks.fetch_for_project(&client, "p1").await;

        tasks
            .update(
                &client,
                "t2",
                &TaskPatch {
                    title: Some("Two v2".into()),
                    ..TaskPatch::default()
                },
            )
            .await;

        assert_eq!(tasks.list()[1].title, "Two v2");
        assert_eq!(tasks.current().unwrap().title, "Two v2");
    }

    #[tokio::test]
    async fn delete_removes_from_list() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects/p1/tasks")
            .with_body(format!(
                "[{}, {}]",
                task_json("t1", "One", "pending"),
                task_json("t2", "Two", "pending")
            ))
            .create_async()
            .await;
        server
            .mock("DELETE", "/tasks/t1")
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let mut tasks = TasksSlice::new();
        tasks.fetch_for_project(&client, "p1").await;

        tasks.delete(&client, "t1").await;
        assert_eq!(tasks.status().outcome(), Some(OpKind::Deleted));
        assert_eq!(tasks.list().len(), 1);
        assert_eq!(tasks.list()[0].id, "t2");
    }

    #[tokio::test]
    async fn fetch_users_fills_directory() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users")
            .with_body(
                r#"[{"_id": "u1", "username": "ada", "email": "a@b.com", "role": "developer"}]"#,
            )
            .create_async()
            .await;

        let client = client_for(&server.url());
        let mut tasks = TasksSlice::new();
        tasks.fetch_users(&client).await;

        assert_eq!(tasks.users().len(), 1);
        assert_eq!(tasks.users()[0].username, "ada");
    }

    #[tokio::test]
    async fn update_failure_preserves_caches() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects/p1/tasks")
            .with_body(format!("[{}]", task_json("t1", "One", "pending")))
            .create_async()
            .await;
        server
            .mock("PUT", "/tasks/t1")
            .with_status(500)
            .with_body(r#"{"message": "locked"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let mut tasks = TasksSlice::new();
        tasks.fetch_for_project(&client, "p1").await;

        tasks
            .update(
                &client,
                "t1",
                &TaskPatch {
                    title: Some("New".into()),
                    ..TaskPatch::default()
                },
            )
            .await;

        assert!(tasks.status().failed());
        assert_eq!(tasks.list()[0].title, "One");
    }

    #[tokio::test]
    async fn reset_preserves_list_and_users() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects/p1/tasks")
            .with_body(format!("[{}]", task_json("t1", "One", "pending")))
            .create_async()
            .await;
        server
            .mock("GET", "/users")
            .with_body(r#"[{"_id": "u1", "username": "ada", "email": "a@b.com"}]"#)
            .create_async()
            .await;
        server
            .mock("GET", "/tasks/t1")
            .with_body(task_json("t1", "One", "pending"))
            .create_async()
            .await;

        let client = client_for(&server.url());
        let mut tasks = TasksSlice::new();
        tasks.fetch_for_project(&client, "p1").await;
        tasks.fetch_users(&client).await;
        tasks.fetch_one(&client, "t1").await;

        tasks.reset();
        assert!(tasks.status().is_idle());
        assert!(tasks.current().is_none());
        assert_eq!(tasks.list().len(), 1);
        assert_eq!(tasks.users().len(), 1);
    }
}
