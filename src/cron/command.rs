//! Recognize the shape of a pg_cron job command.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{CronJobSpec, HttpMethod, HttpRequestSpec, NameValuePair, DEFAULT_TIMEOUT_MS};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static NET_REQUEST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^select net\.(\w+)\(\s*",
        r"url:=\s*'([^']*)'\s*,\s*",
        r"headers:=\s*jsonb_build_object\(([^)]*)\)\s*",
        r"(?:,\s*(?:body|params):=\s*jsonb_build_object\(([^)]*)\)\s*)?",
        r"(?:,\s*timeout_milliseconds:=\s*(\d+)\s*)?\)",
    ))
    .unwrap()
});

#[derive(Debug, Clone, Default)]
pub struct CronOptions {
    /// When set, only URLs on `<project_ref>.supabase.` count as edge functions
    pub project_ref: Option<String>,
}

/// Parse a job command with default options.
pub fn parse_cron_command(raw_command: &str) -> CronJobSpec {
    parse_cron_command_with(raw_command, &CronOptions::default())
}

/// Parse a job command. Never fails: anything unrecognized is a SQL snippet.
pub fn parse_cron_command_with(raw_command: &str, options: &CronOptions) -> CronJobSpec {
    let command = normalize(raw_command);
    let lower = command.to_lowercase();

    if lower.starts_with("select net.") {
        if let Some(request) = parse_net_request(&command) {
            return if is_edge_function_url(&request.url, options) {
                CronJobSpec::EdgeFunction(request)
            } else {
                CronJobSpec::HttpRequest(request)
            };
        }
        debug!(command = %command, "pg_net call did not match the request shape");
    }

    if lower.starts_with("call ") {
        let target = command[5..].trim().trim_end_matches(';').trim_end();
        let target = target.strip_suffix("()").unwrap_or(target).trim();
        let (schema, function_name) = match target.split_once('.') {
            Some((schema, function_name)) => (schema.to_string(), function_name.to_string()),
            None => (crate::sql::DEFAULT_SCHEMA.to_string(), target.to_string()),
        };
        return CronJobSpec::SqlFunction {
            schema,
            function_name,
        };
    }

    if !command.is_empty() {
        return CronJobSpec::SqlSnippet {
            snippet: raw_command.to_string(),
        };
    }

    CronJobSpec::default()
}

/// Strip dollar quoting and collapse all whitespace to single spaces.
fn normalize(raw_command: &str) -> String {
    let without_dollars = raw_command.replace("$$", " ");
    WHITESPACE_RE
        .replace_all(&without_dollars, " ")
        .trim()
        .to_string()
}

fn parse_net_request(command: &str) -> Option<HttpRequestSpec> {
    let captures = NET_REQUEST_RE.captures(command)?;

    let method = match captures.get(1).map(|m| m.as_str()) {
        Some("http_get") => HttpMethod::Get,
        _ => HttpMethod::Post,
    };
    let url = captures.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
    let headers = captures.get(3).map(|m| pair_up(m.as_str())).unwrap_or_default();
    let parameters = captures.get(4).map(|m| pair_up(m.as_str())).unwrap_or_default();
    let timeout_ms = captures
        .get(5)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_MS);

    Some(HttpRequestSpec {
        method,
        url,
        headers,
        parameters,
        timeout_ms,
    })
}

/// Turn a flattened `'k1', 'v1', 'k2', 'v2'` list into pairs. A trailing key
/// without a value is dropped.
fn pair_up(flattened: &str) -> Vec<NameValuePair> {
    if flattened.trim().is_empty() {
        return Vec::new();
    }

    let parts: Vec<&str> = flattened.split(',').map(unquote).collect();
    parts
        .chunks_exact(2)
        .map(|pair| NameValuePair::new(pair[0], pair[1]))
        .collect()
}

fn unquote(part: &str) -> &str {
    let part = part.trim();
    let part = part.strip_prefix('\'').unwrap_or(part);
    part.strip_suffix('\'').unwrap_or(part)
}

fn is_edge_function_url(url: &str, options: &CronOptions) -> bool {
    let host_marker = match &options.project_ref {
        Some(project_ref) => format!("{}.supabase.", project_ref),
        None => ".supabase.".to_string(),
    };
    url.contains(&host_marker) && url.contains("/functions/v1/")
}
