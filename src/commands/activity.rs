use std::path::Path;
use tracing::info;

#[cfg(feature = "cli")]
use owo_colors::OwoColorize;

use super::read_sql_input;
use crate::error::Result;
use crate::sql::{table_activity, TableActivity};

#[derive(Debug)]
pub struct ActivityResult {
    pub activity: Vec<TableActivity>,
}

pub fn execute_activity(path: &Path) -> Result<ActivityResult> {
    let sql = read_sql_input(path)?;
    let activity = table_activity(&sql);
    info!(count = activity.len(), "Collected table activity");
    Ok(ActivityResult { activity })
}

#[cfg(feature = "cli")]
pub fn print_activity_summary(result: &ActivityResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&result.activity)?);
        return Ok(());
    }

    println!("\n{}", "=== pgsift Table Activity ===".bold().blue());

    if result.activity.is_empty() {
        println!("\n{}", "No table activity found.".yellow());
        return Ok(());
    }

    println!();
    for entry in &result.activity {
        let table = match &entry.schema {
            Some(schema) => format!("{}.{}", schema, entry.table_name),
            None => entry.table_name.clone(),
        };
        println!("  {} {} {}", "•".cyan(), table.cyan(), entry.action.to_string().dimmed());
    }
    Ok(())
}
