use tracing::info;

#[cfg(feature = "cli")]
use owo_colors::OwoColorize;

use crate::cron::{parse_cron_command_with, CronJobSpec, CronOptions};
#[cfg(feature = "cli")]
use crate::error::Result;

#[derive(Debug)]
pub struct CronResult {
    pub spec: CronJobSpec,
    /// The command rebuilt from `spec`
    pub command: String,
}

pub fn execute_cron(raw_command: &str, options: &CronOptions) -> CronResult {
    let spec = parse_cron_command_with(raw_command, options);
    info!(kind = spec.kind(), "Parsed cron command");

    let command = spec.to_command();
    CronResult { spec, command }
}

#[cfg(feature = "cli")]
pub fn print_cron_summary(result: &CronResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&result.spec)?);
        return Ok(());
    }

    println!("\n{}", "=== pgsift Cron Job ===".bold().blue());
    println!("\n{}: {}", "Type".bold(), result.spec.kind().green());

    match &result.spec {
        CronJobSpec::HttpRequest(request) | CronJobSpec::EdgeFunction(request) => {
            println!("{}: {} {}", "Request".bold(), request.method.to_string().yellow(), request.url.cyan());
            for header in &request.headers {
                println!("  {} {}: {}", "header".dimmed(), header.name, header.value);
            }
            for parameter in &request.parameters {
                println!("  {} {}: {}", "param".dimmed(), parameter.name, parameter.value);
            }
            println!("{}: {}ms", "Timeout".bold(), request.timeout_ms);
        }
        CronJobSpec::SqlFunction { schema, function_name } => {
            println!("{}: {}.{}", "Function".bold(), schema, function_name.cyan());
        }
        CronJobSpec::SqlSnippet { snippet } => {
            println!("{}: {}", "Snippet".bold(), snippet.trim().dimmed());
        }
    }

    println!("\n{}:\n{}", "Command".bold(), result.command);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_cron_rebuilds_command() {
        let result = execute_cron("CALL public.cleanup()", &CronOptions::default());
        assert_eq!(result.spec.kind(), "sql_function");
        assert_eq!(result.command, "CALL public.cleanup()");
    }

    #[test]
    fn test_execute_cron_honors_project_ref() {
        let command = "select net.http_post(url:='https://abc.supabase.co/functions/v1/f', headers:=jsonb_build_object(), timeout_milliseconds:=1000)";
        let options = CronOptions {
            project_ref: Some("xyz".to_string()),
        };
        assert_eq!(execute_cron(command, &options).spec.kind(), "http_request");
    }
}
