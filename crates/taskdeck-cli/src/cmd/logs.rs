use crate::cmd::has_session;
use crate::output::{check, print_json, print_table};
use anyhow::Context;
use taskdeck_core::http::ApiClient;
use taskdeck_core::model::LogEntry;
use taskdeck_core::slice::LogsSlice;

pub async fn run(client: &ApiClient, task_id: &str, json: bool) -> anyhow::Result<()> {
    let had_session = has_session(client);
    let mut logs = LogsSlice::new();
    logs.fetch_task_and_logs(client, task_id).await;
    check(logs.status(), client, had_session)?;

    let task = logs
        .task()
        .with_context(|| format!("task '{task_id}' not loaded"))?;

    if json {
        print_json(&serde_json::json!({ "task": task, "logs": logs.logs() }))?;
        return Ok(());
    }

    println!("Task [{}]: {} ({})", task.id, task.title, task.status);
    println!();

    if logs.logs().is_empty() {
        println!("No history.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = logs.logs().iter().map(log_row).collect();
    print_table(&["TIME", "ACTION", "USER", "DETAIL"], rows);
    Ok(())
}

fn log_row(entry: &LogEntry) -> Vec<String> {
    let time = entry
        .timestamp
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    let user = entry
        .user
        .as_ref()
        .map(|u| u.label().to_string())
        .unwrap_or_default();

    // Prefer the description; fall back to the old → new change pair.
    let detail = if !entry.description.is_empty() {
        entry.description.clone()
    } else {
        match (&entry.old_value, &entry.new_value) {
            (Some(old), Some(new)) => format!("{old} -> {new}"),
            (None, Some(new)) => new.to_string(),
            _ => String::new(),
        }
    };

    vec![time, entry.action.clone(), user, detail]
}
