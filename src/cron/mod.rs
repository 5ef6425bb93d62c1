//! Scheduled-job (pg_cron) command handling.
//!
//! A job's command is either an HTTP call through `pg_net`, an edge function
//! invocation (an HTTP call to a `/functions/v1/` URL), a `CALL` of a SQL
//! function, or an arbitrary SQL snippet.

pub mod builder;
pub mod command;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use builder::{build_cron_query, build_http_request_command, build_sql_function_command};
pub use command::{parse_cron_command, parse_cron_command_with, CronOptions};

/// Timeout used when a command does not set `timeout_milliseconds`.
pub const DEFAULT_TIMEOUT_MS: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameValuePair {
    pub name: String,
    pub value: String,
}

impl NameValuePair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

pub type HttpHeader = NameValuePair;
pub type HttpParameter = NameValuePair;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// The `pg_net` function issuing this method.
    pub fn net_function(&self) -> &'static str {
        match self {
            HttpMethod::Get => "http_get",
            HttpMethod::Post => "http_post",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequestSpec {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<HttpHeader>,
    /// Query parameters for GET, JSON body fields for POST
    pub parameters: Vec<HttpParameter>,
    pub timeout_ms: u32,
}

impl Default for HttpRequestSpec {
    fn default() -> Self {
        Self {
            method: HttpMethod::Post,
            url: String::new(),
            headers: Vec::new(),
            parameters: Vec::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CronJobSpec {
    HttpRequest(HttpRequestSpec),
    EdgeFunction(HttpRequestSpec),
    SqlFunction { schema: String, function_name: String },
    SqlSnippet { snippet: String },
}

impl Default for CronJobSpec {
    fn default() -> Self {
        CronJobSpec::SqlSnippet {
            snippet: String::new(),
        }
    }
}

impl CronJobSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            CronJobSpec::HttpRequest(_) => "http_request",
            CronJobSpec::EdgeFunction(_) => "edge_function",
            CronJobSpec::SqlFunction { .. } => "sql_function",
            CronJobSpec::SqlSnippet { .. } => "sql_snippet",
        }
    }

    /// Render the job back into the command text pg_cron stores.
    pub fn to_command(&self) -> String {
        match self {
            CronJobSpec::HttpRequest(request) | CronJobSpec::EdgeFunction(request) => {
                build_http_request_command(request)
            }
            CronJobSpec::SqlFunction {
                schema,
                function_name,
            } => build_sql_function_command(schema, function_name),
            CronJobSpec::SqlSnippet { snippet } => snippet.clone(),
        }
    }
}
