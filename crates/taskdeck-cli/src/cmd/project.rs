use crate::cmd::has_session;
use crate::output::{check, print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use taskdeck_core::http::ApiClient;
use taskdeck_core::model::{NewProject, Project};
use taskdeck_core::slice::ProjectsSlice;

#[derive(Subcommand)]
pub enum ProjectSubcommand {
    /// List all projects
    List,
    /// Show one project
    Get { id: String },
    /// Create a project
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Update a project's title and description
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a project
    Delete { id: String },
}

pub async fn run(client: &ApiClient, subcmd: ProjectSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ProjectSubcommand::List => list(client, json).await,
        ProjectSubcommand::Get { id } => get(client, &id, json).await,
        ProjectSubcommand::Create { title, description } => {
            create(client, title, description, json).await
        }
        ProjectSubcommand::Update {
            id,
            title,
            description,
        } => update(client, &id, title, description, json).await,
        ProjectSubcommand::Delete { id } => delete(client, &id, json).await,
    }
}

fn owner_label(project: &Project) -> String {
    project
        .owner
        .as_ref()
        .map(|o| o.label().to_string())
        .unwrap_or_default()
}

async fn list(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let had_session = has_session(client);
    let mut projects = ProjectsSlice::new();
    projects.fetch_all(client).await;
    check(projects.status(), client, had_session)?;

    if json {
        print_json(&projects.list())?;
        return Ok(());
    }

    if projects.list().is_empty() {
        println!("No projects.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = projects
        .list()
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                p.title.clone(),
                owner_label(p),
                p.description.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "TITLE", "OWNER", "DESCRIPTION"], rows);
    Ok(())
}

async fn get(client: &ApiClient, id: &str, json: bool) -> anyhow::Result<()> {
    let had_session = has_session(client);
    let mut projects = ProjectsSlice::new();
    projects.fetch_one(client, id).await;
    check(projects.status(), client, had_session)?;

    let project = projects
        .current()
        .with_context(|| format!("project '{id}' not loaded"))?;

    if json {
        print_json(project)?;
        return Ok(());
    }

    println!("Project: {}", project.id);
    println!("Title:       {}", project.title);
    println!("Description: {}", project.description);
    if let Some(owner) = &project.owner {
        println!("Owner:       {}", owner.label());
    }
    if let Some(created) = project.created_at {
        println!("Created:     {}", created.format("%Y-%m-%d %H:%M"));
    }
    Ok(())
}

async fn create(
    client: &ApiClient,
    title: String,
    description: String,
    json: bool,
) -> anyhow::Result<()> {
    let had_session = has_session(client);
    let mut projects = ProjectsSlice::new();
    projects
        .create(client, &NewProject { title, description })
        .await;
    check(projects.status(), client, had_session)?;

    let project = projects.current().context("created project not cached")?;
    if json {
        print_json(project)?;
    } else {
        println!("Created project [{}]: {}", project.id, project.title);
    }
    Ok(())
}

async fn update(
    client: &ApiClient,
    id: &str,
    title: Option<String>,
    description: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let had_session = has_session(client);
    let mut projects = ProjectsSlice::new();

    // The API replaces both fields; fill whichever flag was omitted from
    // the current record.
    let (title, description) = match (title, description) {
        (Some(t), Some(d)) => (t, d),
        (title, description) => {
            projects.fetch_one(client, id).await;
            check(projects.status(), client, had_session)?;
            let current = projects
                .current()
                .with_context(|| format!("project '{id}' not loaded"))?;
            (
                title.unwrap_or_else(|| current.title.clone()),
                description.unwrap_or_else(|| current.description.clone()),
            )
        }
    };

    projects
        .update(client, id, &NewProject { title, description })
        .await;
    check(projects.status(), client, had_session)?;

    let project = projects.current().context("updated project not cached")?;
    if json {
        print_json(project)?;
    } else {
        println!("Updated project [{}]", project.id);
    }
    Ok(())
}

async fn delete(client: &ApiClient, id: &str, json: bool) -> anyhow::Result<()> {
    let had_session = has_session(client);
    let mut projects = ProjectsSlice::new();
    projects.delete(client, id).await;
    check(projects.status(), client, had_session)?;

    if json {
        print_json(&serde_json::json!({ "id": id, "deleted": true }))?;
    } else {
        println!("Deleted project [{id}]");
    }
    Ok(())
}
