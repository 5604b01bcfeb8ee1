use serde::Serialize;
use taskdeck_core::http::ApiClient;
use taskdeck_core::status::RequestStatus;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    // Calculate column widths
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    // Print header
    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  "));

    // Print separator
    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    // Print rows
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  "));
    }
}

/// Turn a failed slice status into a command error. When the failure
/// also cleared the stored identity (the view layer's redirect-to-login
/// cue), append a hint.
pub fn check(status: &RequestStatus, client: &ApiClient, had_session: bool) -> anyhow::Result<()> {
    if !status.failed() {
        return Ok(());
    }
    if had_session && client.identity().load().is_none() {
        anyhow::bail!(
            "{} (session expired, run `taskdeck auth login`)",
            status.message()
        );
    }
    anyhow::bail!("{}", status.message());
}
