use std::path::Path;
use tracing::info;

#[cfg(feature = "cli")]
use owo_colors::OwoColorize;

use super::read_sql_input;
use crate::error::Result;
use crate::sql::{extract_events, Event};
#[cfg(feature = "cli")]
use crate::sql::EntityType;

#[derive(Debug)]
pub struct EventsResult {
    pub events: Vec<Event>,
}

pub fn execute_events(path: &Path) -> Result<EventsResult> {
    let sql = read_sql_input(path)?;
    let events = extract_events(&sql);
    info!(count = events.len(), "Extracted change events");
    Ok(EventsResult { events })
}

#[cfg(feature = "cli")]
pub fn print_events_summary(result: &EventsResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&result.events)?);
        return Ok(());
    }

    println!("\n{}", "=== pgsift Change Events ===".bold().blue());

    if result.events.is_empty() {
        println!("\n{}", "No tables, functions or cron jobs touched.".yellow());
        return Ok(());
    }

    println!();
    for event in &result.events {
        let kind = match event.entity_type {
            EntityType::Table => format!("{:<8}", "table").green().to_string(),
            EntityType::Function => format!("{:<8}", "function").magenta().to_string(),
            EntityType::Cron => format!("{:<8}", "cron").yellow().to_string(),
        };
        println!("  {} {}", kind, event.qualified_name().cyan());
    }

    println!("\n{}: {} events", "Summary".bold(), result.events.len().to_string().yellow());
    Ok(())
}
