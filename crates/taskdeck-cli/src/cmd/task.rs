use crate::cmd::has_session;
use crate::output::{check, print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use taskdeck_core::http::ApiClient;
use taskdeck_core::model::{NewTask, Task, TaskPatch};
use taskdeck_core::slice::TasksSlice;
use taskdeck_core::types::{Priority, TaskStatus};

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// List a project's tasks
    List { project_id: String },
    /// Show one task
    Get { id: String },
    /// Create a task in a project
    Create {
        project_id: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// User id to assign the task to
        #[arg(long)]
        assign: Option<String>,
    },
    /// Edit task fields
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// pending, in-progress, or completed
        #[arg(long)]
        status: Option<TaskStatus>,
        /// low, medium, or high
        #[arg(long)]
        priority: Option<Priority>,
        /// User id to assign the task to
        #[arg(long, conflicts_with = "unassign")]
        assign: Option<String>,
        /// Clear the assignment
        #[arg(long)]
        unassign: bool,
    },
    /// Cycle a task's status one step (pending → in-progress → completed → pending)
    Advance { id: String },
    /// Delete a task
    Delete { id: String },
    /// List users available for assignment
    Users,
}

pub async fn run(client: &ApiClient, subcmd: TaskSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TaskSubcommand::List { project_id } => list(client, &project_id, json).await,
        TaskSubcommand::Get { id } => get(client, &id, json).await,
        TaskSubcommand::Create {
            project_id,
            title,
            description,
            assign,
        } => create(client, &project_id, title, description, assign, json).await,
        TaskSubcommand::Edit {
            id,
            title,
            description,
            status,
            priority,
            assign,
            unassign,
        } => {
            let patch = TaskPatch {
                title,
                description,
                status,
                priority,
                assigned_to: match (assign, unassign) {
                    (Some(user), _) => Some(Some(user)),
                    (None, true) => Some(None),
                    (None, false) => None,
                },
            };
            edit(client, &id, patch, json).await
        }
        TaskSubcommand::Advance { id } => advance(client, &id, json).await,
        TaskSubcommand::Delete { id } => delete(client, &id, json).await,
        TaskSubcommand::Users => users(client, json).await,
    }
}

fn assignee_label(task: &Task) -> String {
    task.assigned_to
        .as_ref()
        .map(|a| a.label().to_string())
        .unwrap_or_default()
}

async fn list(client: &ApiClient, project_id: &str, json: bool) -> anyhow::Result<()> {
    let had_session = has_session(client);
    let mut tasks = TasksSlice::new();
    tasks.fetch_for_project(client, project_id).await;
    check(tasks.status(), client, had_session)?;

    if json {
        print_json(&tasks.list())?;
        return Ok(());
    }

    if tasks.list().is_empty() {
        println!("No tasks for project '{project_id}'.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = tasks
        .list()
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.status.to_string(),
                t.priority.to_string(),
                assignee_label(t),
                t.title.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "STATUS", "PRIORITY", "ASSIGNEE", "TITLE"], rows);
    Ok(())
}

fn print_task(task: &Task) {
    println!("Task: {}", task.id);
    println!("Title:       {}", task.title);
    println!("Status:      {}", task.status);
    println!("Priority:    {}", task.priority);
    if !task.description.is_empty() {
        println!("Description: {}", task.description);
    }
    println!("Assignee:    {}", {
        let label = assignee_label(task);
        if label.is_empty() {
            "(none)".to_string()
        } else {
            label
        }
    });
    if let Some(project) = &task.project {
        println!("Project:     {}", project.id());
    }
}

async fn get(client: &ApiClient, id: &str, json: bool) -> anyhow::Result<()> {
    let had_session = has_session(client);
    let mut tasks = TasksSlice::new();
    tasks.fetch_one(client, id).await;
    check(tasks.status(), client, had_session)?;

    let task = tasks
        .current()
        .with_context(|| format!("task '{id}' not loaded"))?;
    if json {
        print_json(task)?;
        return Ok(());
    }
    print_task(task);
    Ok(())
}

async fn create(
    client: &ApiClient,
    project_id: &str,
    title: String,
    description: String,
    assign: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let had_session = has_session(client);
    let mut tasks = TasksSlice::new();
    tasks
        .create(
            client,
            project_id,
            &NewTask {
                title,
                description,
                assigned_to: assign,
            },
        )
        .await;
    check(tasks.status(), client, had_session)?;

    let task = tasks.current().context("created task not cached")?;
    if json {
        print_json(task)?;
    } else {
        println!("Created task [{}]: {}", task.id, task.title);
    }
    Ok(())
}

async fn edit(client: &ApiClient, id: &str, patch: TaskPatch, json: bool) -> anyhow::Result<()> {
    let had_session = has_session(client);
    let mut tasks = TasksSlice::new();
    tasks.update(client, id, &patch).await;
    check(tasks.status(), client, had_session)?;

    let task = tasks.current().context("updated task not cached")?;
    if json {
        print_json(task)?;
    } else {
        println!("Updated task [{}]", task.id);
    }
    Ok(())
}

async fn advance(client: &ApiClient, id: &str, json: bool) -> anyhow::Result<()> {
    let had_session = has_session(client);
    let mut tasks = TasksSlice::new();

    // The cycle needs the task's current status.
    tasks.fetch_one(client, id).await;
    check(tasks.status(), client, had_session)?;
    let from = tasks
        .current()
        .with_context(|| format!("task '{id}' not loaded"))?
        .status;

    tasks.advance_status(client, id, from).await;
    check(tasks.status(), client, had_session)?;

    let task = tasks.current().context("updated task not cached")?;
    if json {
        print_json(task)?;
    } else {
        println!("Task [{}] is now {}", task.id, task.status);
    }
    Ok(())
}

async fn delete(client: &ApiClient, id: &str, json: bool) -> anyhow::Result<()> {
    let had_session = has_session(client);
    let mut tasks = TasksSlice::new();
    tasks.delete(client, id).await;
    check(tasks.status(), client, had_session)?;

    if json {
        print_json(&serde_json::json!({ "id": id, "deleted": true }))?;
    } else {
        println!("Deleted task [{id}]");
    }
    Ok(())
}

async fn users(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let had_session = has_session(client);
    let mut tasks = TasksSlice::new();
    tasks.fetch_users(client).await;
    check(tasks.status(), client, had_session)?;

    if json {
        print_json(&tasks.users())?;
        return Ok(());
    }

    if tasks.users().is_empty() {
        println!("No users.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = tasks
        .users()
        .iter()
        .map(|u| {
            vec![
                u.id.clone(),
                u.username.clone(),
                u.email.clone(),
                u.role.map(|r| r.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["ID", "USERNAME", "EMAIL", "ROLE"], rows);
    Ok(())
}
