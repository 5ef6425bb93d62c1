//! Extract entity change events (table, function, cron job) from SQL for
//! cache invalidation.
//!
//! Extraction is best-effort: a parser failure yields no events and a
//! statement with an unexpected shape is skipped without affecting the rest
//! of the batch.

use once_cell::sync::Lazy;
use pg_query::protobuf::{CreateFunctionStmt, CreateStmt, DropStmt, ObjectType as PgObjectType};
use pg_query::NodeEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::sql::parser::{
    range_var_name, split_qualified_name, string_parts, unwrap_node, ParsedStatement,
    PgQueryParser, SqlParser,
};

/// Schema PostgreSQL resolves unqualified names to by default.
pub const DEFAULT_SCHEMA: &str = "public";

static CRON_CALL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)cron\.(?:un)?schedule\s*\(\s*(?:'([^']*)'|"([^"]*)"|(\d+))"#).unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Table,
    Function,
    Cron,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Table => write!(f, "table"),
            EntityType::Function => write!(f, "function"),
            EntityType::Cron => write!(f, "cron"),
        }
    }
}

/// A schema-affecting change found in a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub entity_type: EntityType,
    pub entity_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl Event {
    pub fn table(schema: Option<String>, name: String) -> Self {
        Self {
            entity_type: EntityType::Table,
            entity_name: name,
            schema: Some(schema.unwrap_or_else(|| DEFAULT_SCHEMA.to_string())),
            table: None,
        }
    }

    pub fn function(schema: Option<String>, name: String) -> Self {
        Self {
            entity_type: EntityType::Function,
            entity_name: name,
            schema: Some(schema.unwrap_or_else(|| DEFAULT_SCHEMA.to_string())),
            table: None,
        }
    }

    pub fn cron(job: String) -> Self {
        Self {
            entity_type: EntityType::Cron,
            entity_name: job,
            schema: None,
            table: None,
        }
    }

    /// Fill the redundant `table` alias with the entity name.
    pub fn with_table_alias(mut self) -> Self {
        self.table = Some(self.entity_name.clone());
        self
    }

    /// `schema.name` for tables and functions, the bare job name for cron.
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.entity_name),
            None => self.entity_name.clone(),
        }
    }
}

/// Event extraction over a pluggable parser.
pub struct EventExtractor<P: SqlParser = PgQueryParser> {
    parser: P,
}

impl EventExtractor<PgQueryParser> {
    pub fn new() -> Self {
        Self { parser: PgQueryParser }
    }
}

impl Default for EventExtractor<PgQueryParser> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SqlParser> EventExtractor<P> {
    pub fn with_parser(parser: P) -> Self {
        Self { parser }
    }

    /// Extract events from every statement in `sql`, in source order.
    pub fn extract(&self, sql: &str) -> Vec<Event> {
        let sql_lower = sql.to_lowercase();

        let statements = match self.parser.parse_statements(sql) {
            Ok(statements) => statements,
            Err(e) => {
                warn!(error = %e, sql = %sql, "Failed to parse SQL for event extraction");
                return Vec::new();
            }
        };

        statements
            .iter()
            .filter_map(|statement| extract_statement_event(statement, sql, &sql_lower))
            .collect()
    }
}

/// Extract events from `sql` with the default parser. Never fails.
pub fn extract_events(sql: &str) -> Vec<Event> {
    EventExtractor::new().extract(sql)
}

fn extract_statement_event(statement: &ParsedStatement, sql: &str, sql_lower: &str) -> Option<Event> {
    match &statement.node {
        NodeEnum::CreateStmt(create) => create_table_event(create),
        NodeEnum::CreateFunctionStmt(create) => create_function_event(create),
        NodeEnum::DropStmt(drop) => drop_event(drop),
        NodeEnum::SelectStmt(_)
            if sql_lower.contains("cron.schedule") || sql_lower.contains("cron.unschedule") =>
        {
            cron_event(statement.source_text(sql))
        }
        _ => {
            debug!(kind = %statement.kind(), "No event for statement");
            None
        }
    }
}

fn create_table_event(create: &CreateStmt) -> Option<Event> {
    let (schema, name) = range_var_name(create.relation.as_ref()?)?;
    Some(Event::table(schema, name).with_table_alias())
}

fn create_function_event(create: &CreateFunctionStmt) -> Option<Event> {
    let parts = string_parts(&create.funcname);
    let (schema, name) = split_qualified_name(&parts)?;
    Some(Event::function(schema, name))
}

fn drop_event(drop: &DropStmt) -> Option<Event> {
    let object = drop.objects.first().and_then(unwrap_node)?;

    match drop.remove_type() {
        PgObjectType::ObjectTable => {
            let NodeEnum::List(list) = object else {
                return None;
            };
            let (schema, name) = split_qualified_name(&string_parts(&list.items))?;
            Some(Event::table(schema, name))
        }
        PgObjectType::ObjectFunction => {
            let NodeEnum::ObjectWithArgs(func) = object else {
                return None;
            };
            let (schema, name) = split_qualified_name(&string_parts(&func.objname))?;
            Some(Event::function(schema, name))
        }
        _ => None,
    }
}

/// Recover the job name (or id) of a `cron.schedule` / `cron.unschedule`
/// call from the statement text.
pub fn cron_event(statement_sql: &str) -> Option<Event> {
    let captures = CRON_CALL_RE.captures(statement_sql)?;
    let job = captures
        .get(1)
        .or_else(|| captures.get(2))
        .or_else(|| captures.get(3))?
        .as_str();

    if job.is_empty() {
        return None;
    }
    Some(Event::cron(job.to_string()))
}
