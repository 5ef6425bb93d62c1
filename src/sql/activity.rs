//! Table-level activity for telemetry: tables created, data loaded into
//! tables, and row level security switched on.
//!
//! A script the parser rejects as a whole is split and scanned statement by
//! statement, so one bad statement only loses its own activity.

use once_cell::sync::Lazy;
use pg_query::protobuf::{AlterTableStmt, AlterTableType, ObjectType as PgObjectType, RangeVar};
use pg_query::NodeEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::sql::parser::{parse_statements, range_var_name, unwrap_node};

/// `ALTER TABLE ... ENABLE RLS`, the shorthand PostgreSQL itself rejects.
static ENABLE_RLS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?is)^\s*alter\s+table\s+(?:if\s+exists\s+)?(?:only\s+)?"#,
        r#"(?:((?:"(?:[^"]|"")+")|\w+)\s*\.\s*)?((?:"(?:[^"]|"")+")|\w+)"#,
        r#"\s.*?\benable\s+(?:rls|row\s+level\s+security)\b"#,
    ))
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableAction {
    TableCreated,
    TableDataAdded,
    TableRlsEnabled,
}

impl fmt::Display for TableAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableAction::TableCreated => write!(f, "table created"),
            TableAction::TableDataAdded => write!(f, "table data added"),
            TableAction::TableRlsEnabled => write!(f, "table RLS enabled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableActivity {
    pub action: TableAction,
    /// Schema as written; `None` for unqualified names
    pub schema: Option<String>,
    pub table_name: String,
}

impl TableActivity {
    fn from_range_var(action: TableAction, range_var: &RangeVar) -> Option<Self> {
        let (schema, table_name) = range_var_name(range_var)?;
        Some(Self {
            action,
            schema,
            table_name,
        })
    }
}

/// Scan `sql` for table activity. Never fails.
pub fn table_activity(sql: &str) -> Vec<TableActivity> {
    match parse_statements(sql) {
        Ok(statements) => statements
            .iter()
            .filter_map(|statement| statement_activity(&statement.node))
            .collect(),
        Err(e) => {
            debug!(error = %e, "Script did not parse as a whole, scanning statements separately");
            scan_each_statement(sql)
        }
    }
}

fn scan_each_statement(sql: &str) -> Vec<TableActivity> {
    let statements = match pg_query::split_with_scanner(sql) {
        Ok(statements) => statements,
        Err(e) => {
            warn!(error = %e, "Failed to split SQL for table activity");
            return Vec::new();
        }
    };

    statements
        .into_iter()
        .flat_map(|statement| match parse_statements(statement) {
            Ok(parsed) => parsed
                .iter()
                .filter_map(|parsed| statement_activity(&parsed.node))
                .collect(),
            Err(e) => {
                debug!(error = %e, statement = %statement, "Skipping unparseable statement");
                enable_rls_shorthand(statement).into_iter().collect::<Vec<_>>()
            }
        })
        .collect()
}

fn enable_rls_shorthand(statement: &str) -> Option<TableActivity> {
    let captures = ENABLE_RLS_RE.captures(statement)?;
    Some(TableActivity {
        action: TableAction::TableRlsEnabled,
        schema: captures.get(1).map(|m| unquote_identifier(m.as_str())),
        table_name: unquote_identifier(captures.get(2)?.as_str()),
    })
}

fn unquote_identifier(identifier: &str) -> String {
    match identifier.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
        Some(quoted) => quoted.replace("\"\"", "\""),
        None => identifier.to_lowercase(),
    }
}

fn statement_activity(node: &NodeEnum) -> Option<TableActivity> {
    match node {
        NodeEnum::CreateStmt(create) => {
            TableActivity::from_range_var(TableAction::TableCreated, create.relation.as_ref()?)
        }
        NodeEnum::CreateTableAsStmt(ctas) if ctas.objtype() == PgObjectType::ObjectTable => {
            let rel = ctas.into.as_ref()?.rel.as_ref()?;
            TableActivity::from_range_var(TableAction::TableCreated, rel)
        }
        NodeEnum::SelectStmt(select) => {
            let rel = select.into_clause.as_ref()?.rel.as_ref()?;
            TableActivity::from_range_var(TableAction::TableCreated, rel)
        }
        NodeEnum::InsertStmt(insert) => {
            TableActivity::from_range_var(TableAction::TableDataAdded, insert.relation.as_ref()?)
        }
        NodeEnum::CopyStmt(copy) if copy.is_from => {
            TableActivity::from_range_var(TableAction::TableDataAdded, copy.relation.as_ref()?)
        }
        NodeEnum::AlterTableStmt(alter) if enables_row_security(alter) => {
            TableActivity::from_range_var(TableAction::TableRlsEnabled, alter.relation.as_ref()?)
        }
        _ => None,
    }
}

fn enables_row_security(alter: &AlterTableStmt) -> bool {
    alter.cmds.iter().any(|cmd| {
        matches!(
            unwrap_node(cmd),
            Some(NodeEnum::AlterTableCmd(cmd)) if cmd.subtype() == AlterTableType::AtEnableRowSecurity
        )
    })
}
