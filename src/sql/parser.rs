//! Thin adapter over `pg_query` plus the node helpers shared by the
//! classifier, the event extractor and the activity scanner.

use pg_query::protobuf::{Node, RangeVar, RawStmt};
use pg_query::NodeEnum;

use crate::error::Result;

/// One top-level statement as produced by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatement {
    pub node: NodeEnum,
    /// Byte offset of the statement in the source text
    pub location: Option<usize>,
    /// Byte length of the statement, `None` when it runs to the end of input
    pub length: Option<usize>,
}

impl ParsedStatement {
    pub fn new(node: NodeEnum) -> Self {
        Self {
            node,
            location: None,
            length: None,
        }
    }

    pub fn with_span(mut self, location: Option<usize>, length: Option<usize>) -> Self {
        self.location = location;
        self.length = length;
        self
    }

    /// Slice the statement's own text out of `sql`.
    ///
    /// Falls back to the whole input when the offset is unknown or the
    /// recorded span does not land on valid boundaries.
    pub fn source_text<'a>(&self, sql: &'a str) -> &'a str {
        let Some(start) = self.location else {
            return sql;
        };
        let end = match self.length {
            Some(len) => start.saturating_add(len),
            None => sql.len(),
        };
        sql.get(start..end).unwrap_or(sql)
    }

    /// Name of the statement's variant, e.g. `CreateStmt`.
    pub fn kind(&self) -> &'static str {
        statement_kind(&self.node)
    }
}

/// Anything that can turn SQL text into top-level statements.
pub trait SqlParser {
    fn parse_statements(&self, sql: &str) -> Result<Vec<ParsedStatement>>;
}

/// Parser backed by libpg_query.
#[derive(Debug, Default, Clone, Copy)]
pub struct PgQueryParser;

impl PgQueryParser {
    pub fn new() -> Self {
        Self
    }
}

impl SqlParser for PgQueryParser {
    fn parse_statements(&self, sql: &str) -> Result<Vec<ParsedStatement>> {
        let parsed = pg_query::parse(sql)?;

        Ok(parsed
            .protobuf
            .stmts
            .iter()
            .filter_map(parsed_statement_from_raw)
            .collect())
    }
}

/// Parse `sql` with the default libpg_query parser.
pub fn parse_statements(sql: &str) -> Result<Vec<ParsedStatement>> {
    PgQueryParser.parse_statements(sql)
}

fn parsed_statement_from_raw(raw: &RawStmt) -> Option<ParsedStatement> {
    let node = unwrap_statement(raw)?.clone();
    let location = usize::try_from(raw.stmt_location).ok();
    // libpg_query reports 0 for "rest of the input"
    let length = usize::try_from(raw.stmt_len).ok().filter(|len| *len > 0);

    Some(ParsedStatement::new(node).with_span(location, length))
}

/// Unwrap the two layers of optionality around a raw statement's node.
pub fn unwrap_statement(raw: &RawStmt) -> Option<&NodeEnum> {
    raw.stmt.as_ref()?.node.as_ref()
}

/// Unwrap a generic node into its tagged variant.
pub fn unwrap_node(node: &Node) -> Option<&NodeEnum> {
    node.node.as_ref()
}

/// Collect the string-valued parts of a dotted name list, skipping anything
/// else (e.g. `A_Star` in `schema.*`).
pub fn string_parts(nodes: &[Node]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|node| match unwrap_node(node) {
            Some(NodeEnum::String(s)) => Some(s.sval.clone()),
            _ => None,
        })
        .collect()
}

/// Split a flattened name into `(schema, name)`.
///
/// The last part is the name; the first part is the schema only when there
/// is more than one part.
pub fn split_qualified_name(parts: &[String]) -> Option<(Option<String>, String)> {
    let name = parts.last().filter(|name| !name.is_empty())?.clone();
    let schema = if parts.len() > 1 {
        parts.first().cloned()
    } else {
        None
    };

    Some((schema, name))
}

/// Schema and relation name of a range var; empty schema means unqualified.
pub fn range_var_name(range_var: &RangeVar) -> Option<(Option<String>, String)> {
    if range_var.relname.is_empty() {
        return None;
    }
    let schema = if range_var.schemaname.is_empty() {
        None
    } else {
        Some(range_var.schemaname.clone())
    };

    Some((schema, range_var.relname.clone()))
}

/// Reported for nodes that are not top-level statements.
pub const NON_STATEMENT_KIND: &str = "non-statement node";

macro_rules! statement_names {
    ($node:expr; $($variant:ident),+ $(,)?) => {
        match $node {
            $(NodeEnum::$variant(_) => stringify!($variant),)+
            _ => NON_STATEMENT_KIND,
        }
    };
}

/// Variant name of a statement node, e.g. `SelectStmt`.
pub fn statement_kind(node: &NodeEnum) -> &'static str {
    statement_names!(node;
        SelectStmt, InsertStmt, UpdateStmt, DeleteStmt, MergeStmt, AlterCollationStmt,
        AlterDatabaseRefreshCollStmt, AlterDatabaseSetStmt, AlterDatabaseStmt, AlterDefaultPrivilegesStmt,
        AlterDomainStmt, AlterEnumStmt, AlterEventTrigStmt, AlterExtensionContentsStmt,
        AlterExtensionStmt, AlterFdwStmt, AlterForeignServerStmt, AlterFunctionStmt,
        AlterObjectDependsStmt, AlterObjectSchemaStmt, AlterOpFamilyStmt, AlterOperatorStmt,
        AlterOwnerStmt, AlterPolicyStmt, AlterPublicationStmt, AlterRoleSetStmt,
        AlterRoleStmt, AlterSeqStmt, AlterStatsStmt, AlterSubscriptionStmt, AlterSystemStmt,
        AlterTableMoveAllStmt, AlterTableSpaceOptionsStmt, AlterTableStmt, AlterTsconfigurationStmt,
        AlterTsdictionaryStmt, AlterTypeStmt, AlterUserMappingStmt, CallStmt, CheckPointStmt,
        ClosePortalStmt, ClusterStmt, CommentStmt, CompositeTypeStmt, ConstraintsSetStmt,
        CopyStmt, CreateAmStmt, CreateCastStmt, CreateConversionStmt, CreateDomainStmt,
        CreateEnumStmt, CreateEventTrigStmt, CreateExtensionStmt, CreateFdwStmt,
        CreateForeignServerStmt, CreateForeignTableStmt, CreateFunctionStmt, CreateOpClassStmt,
        CreateOpFamilyStmt, CreatePlangStmt, CreatePolicyStmt, CreatePublicationStmt,
        CreateRangeStmt, CreateRoleStmt, CreateSchemaStmt, CreateSeqStmt, CreateStatsStmt,
        CreateStmt, CreateSubscriptionStmt, CreateTableAsStmt, CreateTableSpaceStmt,
        CreateTransformStmt, CreateTrigStmt, CreateUserMappingStmt, CreatedbStmt,
        DeallocateStmt, DeclareCursorStmt, DefineStmt, DiscardStmt, DoStmt, DropOwnedStmt,
        DropRoleStmt, DropStmt, DropSubscriptionStmt, DropTableSpaceStmt, DropUserMappingStmt,
        DropdbStmt, ExecuteStmt, ExplainStmt, FetchStmt, GrantRoleStmt, GrantStmt,
        ImportForeignSchemaStmt, IndexStmt, ListenStmt, LoadStmt, LockStmt, NotifyStmt,
        PrepareStmt, ReassignOwnedStmt, RefreshMatViewStmt, ReindexStmt, RenameStmt,
        RuleStmt, SecLabelStmt, TransactionStmt, TruncateStmt, UnlistenStmt, VacuumStmt,
        VariableSetStmt, VariableShowStmt, ViewStmt,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiple_statements_keeps_order_and_spans() {
        let sql = "CREATE TABLE a (id int); SELECT 1;\nINSERT INTO a VALUES (1)";
        let statements = parse_statements(sql).unwrap();

        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].kind(), "CreateStmt");
        assert_eq!(statements[1].kind(), "SelectStmt");
        assert_eq!(statements[2].kind(), "InsertStmt");

        assert_eq!(statements[0].source_text(sql), "CREATE TABLE a (id int)");
        assert_eq!(statements[1].source_text(sql).trim(), "SELECT 1");
        // last statement without terminator runs to the end of input
        assert_eq!(statements[2].length, None);
        assert_eq!(statements[2].source_text(sql).trim(), "INSERT INTO a VALUES (1)");
    }

    #[test]
    fn test_parse_invalid_sql_is_error() {
        assert!(parse_statements("SELEC 1 FROM").is_err());
    }

    #[test]
    fn test_parse_empty_input() {
        let statements = parse_statements("").unwrap();
        assert!(statements.is_empty());
    }

    #[test]
    fn test_source_text_falls_back_to_whole_input() {
        let sql = "SELECT 1";
        let stmt = ParsedStatement::new(NodeEnum::SelectStmt(Default::default()));
        assert_eq!(stmt.source_text(sql), sql);

        let out_of_bounds = stmt.with_span(Some(4), Some(100));
        assert_eq!(out_of_bounds.source_text(sql), sql);
    }

    #[test]
    fn test_split_qualified_name() {
        let parts = vec!["accounting".to_string(), "invoices".to_string()];
        assert_eq!(
            split_qualified_name(&parts),
            Some((Some("accounting".to_string()), "invoices".to_string()))
        );

        let parts = vec!["users".to_string()];
        assert_eq!(split_qualified_name(&parts), Some((None, "users".to_string())));

        let parts = vec!["db".to_string(), "app".to_string(), "users".to_string()];
        assert_eq!(
            split_qualified_name(&parts),
            Some((Some("db".to_string()), "users".to_string()))
        );

        assert_eq!(split_qualified_name(&[]), None);
    }

    #[test]
    fn test_statement_kind_names_variant() {
        assert_eq!(statement_kind(&NodeEnum::DropStmt(Default::default())), "DropStmt");
        assert_eq!(statement_kind(&NodeEnum::MergeStmt(Default::default())), "MergeStmt");
        assert_eq!(statement_kind(&NodeEnum::CreatePlangStmt(Default::default())), "CreatePlangStmt");
        assert_eq!(statement_kind(&NodeEnum::AConst(Default::default())), NON_STATEMENT_KIND);
    }
}
