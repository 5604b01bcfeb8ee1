//! Logs slice: read-only history view of one task.
//!
//! A task and its logs are always presented together, so the fetch is
//! one composite operation: two sequential calls, all-or-nothing. If the
//! log fetch fails after the task fetch succeeded, the whole operation
//! fails and the already-fetched task is dropped; partial success has
//! no useful display.

use crate::http::ApiClient;
use crate::model::{LogEntry, Task};
use crate::status::RequestStatus;
use crate::types::OpKind;

#[derive(Default)]
pub struct LogsSlice {
    task: Option<Task>,
    logs: Vec<LogEntry>,
    status: RequestStatus,
}

impl LogsSlice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// `GET /tasks/:id` then `GET /logs/task/:id`, reported as one
    /// operation.
    pub async fn fetch_task_and_logs(&mut self, client: &ApiClient, task_id: &str) {
        let ticket = self.status.begin();
        self.task = None;
        self.logs.clear();

        let task = match client.get_one::<Task>(&format!("/tasks/{task_id}")).await {
            Ok(task) => task,
            Err(err) => {
                self.status.fail(ticket, err.display_message());
                return;
            }
        };

        match client
            .get_one::<Vec<LogEntry>>(&format!("/logs/task/{task_id}"))
            .await
        {
            Ok(logs) => {
                if self
                    .status
                    .succeed(ticket, OpKind::Loaded, "task logs loaded")
                {
                    self.task = Some(task);
                    self.logs = logs;
                }
            }
            Err(err) => {
                // The task fetch already succeeded, but it is dropped
                // with the rest: no partial success.
                self.status.fail(ticket, err.display_message());
            }
        }
    }

    pub fn reset(&mut self) {
        self.status.reset();
        self.task = None;
        self.logs.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
