//! SQL inspection for database tooling.
//!
//! pgsift sorts a SQL script's statements into queries, seeds and migrations,
//! pulls change events (tables, functions and cron jobs touched) out of
//! arbitrary scripts, reports table activity, and reads and writes pg_cron
//! job commands.
//!
//! ```no_run
//! use pgsift::{classify_sql, extract_events};
//!
//! let sql = "CREATE TABLE public.users (id int); INSERT INTO users VALUES (1);";
//! let classification = classify_sql(sql)?;
//! assert_eq!(classification.migrations.len(), 1);
//! assert_eq!(classification.seeds.len(), 1);
//!
//! for event in extract_events(sql) {
//!     println!("{}", event.qualified_name());
//! }
//! # Ok::<(), pgsift::SiftError>(())
//! ```

pub mod commands;
pub mod config;
pub mod cron;
pub mod error;
pub mod logging;
pub mod sql;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::{OutputFormat, PgsiftConfig};
pub use cron::{
    build_cron_query, parse_cron_command, parse_cron_command_with, CronJobSpec, CronOptions,
    HttpMethod, HttpRequestSpec, NameValuePair,
};
pub use error::{Result, SiftError};
pub use sql::{
    categorize, classify, classify_sql, extract_events, parse_statements, table_activity, Classification,
    EntityType, Event, EventExtractor, ParsedStatement, StatementCategory, TableAction,
    TableActivity,
};
