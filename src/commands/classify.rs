use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

#[cfg(feature = "cli")]
use owo_colors::OwoColorize;

use super::read_sql_input;
use crate::error::Result;
use crate::sql::{classify_sql, Classification};
#[cfg(feature = "cli")]
use crate::sql::{ParsedStatement, StatementCategory};

#[derive(Debug)]
pub struct ClassifyResult {
    pub sql: String,
    pub classification: Classification,
    pub duration: Duration,
}

pub fn execute_classify(path: &Path) -> Result<ClassifyResult> {
    let sql = read_sql_input(path)?;
    classify_source(sql)
}

pub(crate) fn classify_source(sql: String) -> Result<ClassifyResult> {
    let started = Instant::now();
    let classification = classify_sql(&sql)?;

    info!(
        queries = classification.queries.len(),
        seeds = classification.seeds.len(),
        migrations = classification.migrations.len(),
        "Classified SQL"
    );

    Ok(ClassifyResult {
        sql,
        classification,
        duration: started.elapsed(),
    })
}

#[cfg(feature = "cli")]
pub fn print_classify_summary(result: &ClassifyResult) {
    println!("\n{}", "=== pgsift Classification ===".bold().blue());

    for category in [
        StatementCategory::Migration,
        StatementCategory::Seed,
        StatementCategory::Query,
    ] {
        let bucket = result.classification.bucket(category);
        if bucket.is_empty() {
            continue;
        }

        println!("\n{} ({}):", heading(category).bold().green(), bucket.len().to_string().yellow());
        for statement in bucket {
            println!("  {} {}", "•".cyan(), preview(statement, &result.sql).dimmed());
        }
    }

    if result.classification.is_empty() {
        println!("\n{}", "No statements found.".yellow());
    } else {
        println!(
            "\n{} {} {}",
            "✓".green().bold(),
            format!("{} statements classified", result.classification.len()).green().bold(),
            format!("in {}", crate::logging::format_duration(result.duration)).dimmed()
        );
    }
}

#[cfg(feature = "cli")]
fn heading(category: StatementCategory) -> &'static str {
    match category {
        StatementCategory::Query => "Queries",
        StatementCategory::Seed => "Seeds",
        StatementCategory::Migration => "Migrations",
    }
}

/// First line of the statement, shortened for display
#[cfg(feature = "cli")]
fn preview(statement: &ParsedStatement, sql: &str) -> String {
    let text = statement.source_text(sql).trim();
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.chars().count() > 72 {
        format!("{}...", first_line.chars().take(72).collect::<String>())
    } else if first_line.len() < text.len() {
        format!("{} ...", first_line)
    } else {
        first_line.to_string()
    }
}
