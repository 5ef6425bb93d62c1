//! Partition parsed statements into queries, seeds and migrations.
//!
//! Rules are evaluated top to bottom and the first match wins. The query and
//! seed rules both look at `SelectStmt`: a SELECT with an INTO target creates
//! a table from data and is a seed, every other SELECT is a query.

use pg_query::NodeEnum;
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::error::{calculate_line_column, Result, SiftError};
use crate::sql::parser::{parse_statements, ParsedStatement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementCategory {
    Query,
    Seed,
    Migration,
}

impl fmt::Display for StatementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementCategory::Query => write!(f, "query"),
            StatementCategory::Seed => write!(f, "seed"),
            StatementCategory::Migration => write!(f, "migration"),
        }
    }
}

/// Statements grouped by category, each bucket in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub queries: Vec<ParsedStatement>,
    pub seeds: Vec<ParsedStatement>,
    pub migrations: Vec<ParsedStatement>,
}

impl Classification {
    pub fn len(&self) -> usize {
        self.queries.len() + self.seeds.len() + self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bucket(&self, category: StatementCategory) -> &[ParsedStatement] {
        match category {
            StatementCategory::Query => &self.queries,
            StatementCategory::Seed => &self.seeds,
            StatementCategory::Migration => &self.migrations,
        }
    }

    fn push(&mut self, category: StatementCategory, statement: ParsedStatement) {
        match category {
            StatementCategory::Query => self.queries.push(statement),
            StatementCategory::Seed => self.seeds.push(statement),
            StatementCategory::Migration => self.migrations.push(statement),
        }
    }
}

/// Ordered classification policy.
pub const RULES: &[(StatementCategory, fn(&NodeEnum) -> bool)] = &[
    (StatementCategory::Query, is_query),
    (StatementCategory::Seed, is_seed),
    (StatementCategory::Migration, is_migration),
];

/// A SELECT without an INTO target.
pub fn is_query(node: &NodeEnum) -> bool {
    matches!(node, NodeEnum::SelectStmt(select) if select.into_clause.is_none())
}

/// DML, or a SELECT ... INTO.
pub fn is_seed(node: &NodeEnum) -> bool {
    match node {
        NodeEnum::InsertStmt(_)
        | NodeEnum::UpdateStmt(_)
        | NodeEnum::DeleteStmt(_)
        | NodeEnum::MergeStmt(_) => true,
        NodeEnum::SelectStmt(select) => select.into_clause.is_some(),
        _ => false,
    }
}

/// Membership in the migration allow-list: schema, server configuration,
/// session, transaction and utility statements.
pub fn is_migration(node: &NodeEnum) -> bool {
    matches!(
        node,
        NodeEnum::AlterCollationStmt(_)
            | NodeEnum::AlterDatabaseRefreshCollStmt(_)
            | NodeEnum::AlterDatabaseSetStmt(_)
            | NodeEnum::AlterDatabaseStmt(_)
            | NodeEnum::AlterDefaultPrivilegesStmt(_)
            | NodeEnum::AlterDomainStmt(_)
            | NodeEnum::AlterEnumStmt(_)
            | NodeEnum::AlterEventTrigStmt(_)
            | NodeEnum::AlterExtensionContentsStmt(_)
            | NodeEnum::AlterExtensionStmt(_)
            | NodeEnum::AlterFdwStmt(_)
            | NodeEnum::AlterForeignServerStmt(_)
            | NodeEnum::AlterFunctionStmt(_)
            | NodeEnum::AlterObjectDependsStmt(_)
            | NodeEnum::AlterObjectSchemaStmt(_)
            | NodeEnum::AlterOpFamilyStmt(_)
            | NodeEnum::AlterOperatorStmt(_)
            | NodeEnum::AlterOwnerStmt(_)
            | NodeEnum::AlterPolicyStmt(_)
            | NodeEnum::AlterPublicationStmt(_)
            | NodeEnum::AlterRoleSetStmt(_)
            | NodeEnum::AlterRoleStmt(_)
            | NodeEnum::AlterSeqStmt(_)
            | NodeEnum::AlterStatsStmt(_)
            | NodeEnum::AlterSubscriptionStmt(_)
            | NodeEnum::AlterSystemStmt(_)
            | NodeEnum::AlterTableMoveAllStmt(_)
            | NodeEnum::AlterTableSpaceOptionsStmt(_)
            | NodeEnum::AlterTableStmt(_)
            | NodeEnum::AlterTsconfigurationStmt(_)
            | NodeEnum::AlterTsdictionaryStmt(_)
            | NodeEnum::AlterTypeStmt(_)
            | NodeEnum::AlterUserMappingStmt(_)
            | NodeEnum::CallStmt(_)
            | NodeEnum::CheckPointStmt(_)
            | NodeEnum::ClosePortalStmt(_)
            | NodeEnum::ClusterStmt(_)
            | NodeEnum::CommentStmt(_)
            | NodeEnum::CompositeTypeStmt(_)
            | NodeEnum::ConstraintsSetStmt(_)
            | NodeEnum::CopyStmt(_)
            | NodeEnum::CreateAmStmt(_)
            | NodeEnum::CreateCastStmt(_)
            | NodeEnum::CreateConversionStmt(_)
            | NodeEnum::CreateDomainStmt(_)
            | NodeEnum::CreateEnumStmt(_)
            | NodeEnum::CreateEventTrigStmt(_)
            | NodeEnum::CreateExtensionStmt(_)
            | NodeEnum::CreateFdwStmt(_)
            | NodeEnum::CreateForeignServerStmt(_)
            | NodeEnum::CreateForeignTableStmt(_)
            | NodeEnum::CreateFunctionStmt(_)
            | NodeEnum::CreateOpClassStmt(_)
            | NodeEnum::CreateOpFamilyStmt(_)
            | NodeEnum::CreatePlangStmt(_)
            | NodeEnum::CreatePolicyStmt(_)
            | NodeEnum::CreatePublicationStmt(_)
            | NodeEnum::CreateRangeStmt(_)
            | NodeEnum::CreateRoleStmt(_)
            | NodeEnum::CreateSchemaStmt(_)
            | NodeEnum::CreateSeqStmt(_)
            | NodeEnum::CreateStatsStmt(_)
            | NodeEnum::CreateStmt(_)
            | NodeEnum::CreateSubscriptionStmt(_)
            | NodeEnum::CreateTableAsStmt(_)
            | NodeEnum::CreateTableSpaceStmt(_)
            | NodeEnum::CreateTransformStmt(_)
            | NodeEnum::CreateTrigStmt(_)
            | NodeEnum::CreateUserMappingStmt(_)
            | NodeEnum::CreatedbStmt(_)
            | NodeEnum::DeallocateStmt(_)
            | NodeEnum::DeclareCursorStmt(_)
            | NodeEnum::DefineStmt(_)
            | NodeEnum::DiscardStmt(_)
            | NodeEnum::DoStmt(_)
            | NodeEnum::DropOwnedStmt(_)
            | NodeEnum::DropRoleStmt(_)
            | NodeEnum::DropStmt(_)
            | NodeEnum::DropSubscriptionStmt(_)
            | NodeEnum::DropTableSpaceStmt(_)
            | NodeEnum::DropUserMappingStmt(_)
            | NodeEnum::DropdbStmt(_)
            | NodeEnum::ExecuteStmt(_)
            | NodeEnum::ExplainStmt(_)
            | NodeEnum::FetchStmt(_)
            | NodeEnum::GrantRoleStmt(_)
            | NodeEnum::GrantStmt(_)
            | NodeEnum::ImportForeignSchemaStmt(_)
            | NodeEnum::IndexStmt(_)
            | NodeEnum::ListenStmt(_)
            | NodeEnum::LoadStmt(_)
            | NodeEnum::LockStmt(_)
            | NodeEnum::NotifyStmt(_)
            | NodeEnum::PrepareStmt(_)
            | NodeEnum::ReassignOwnedStmt(_)
            | NodeEnum::RefreshMatViewStmt(_)
            | NodeEnum::ReindexStmt(_)
            | NodeEnum::RenameStmt(_)
            | NodeEnum::RuleStmt(_)
            | NodeEnum::SecLabelStmt(_)
            | NodeEnum::TransactionStmt(_)
            | NodeEnum::TruncateStmt(_)
            | NodeEnum::UnlistenStmt(_)
            | NodeEnum::VacuumStmt(_)
            | NodeEnum::VariableSetStmt(_)
            | NodeEnum::VariableShowStmt(_)
            | NodeEnum::ViewStmt(_)
    )
}

/// Category of a single node, `None` when no rule matches.
pub fn categorize(node: &NodeEnum) -> Option<StatementCategory> {
    RULES
        .iter()
        .find(|(_, matches)| matches(node))
        .map(|(category, _)| *category)
}

/// Classify statements into buckets, failing on the first statement that no
/// rule accepts.
pub fn classify(statements: Vec<ParsedStatement>) -> Result<Classification> {
    classify_with_source(statements, None)
}

/// Parse `sql` and classify its statements. Parser failures are propagated.
pub fn classify_sql(sql: &str) -> Result<Classification> {
    let statements = parse_statements(sql)?;
    classify_with_source(statements, Some(sql))
}

fn classify_with_source(
    statements: Vec<ParsedStatement>,
    sql: Option<&str>,
) -> Result<Classification> {
    let mut classification = Classification::default();

    for (index, statement) in statements.into_iter().enumerate() {
        let Some(category) = categorize(&statement.node) else {
            let line = match (sql, statement.location) {
                (Some(sql), Some(location)) => {
                    // skip the whitespace libpg_query leaves after the previous ';'
                    let leading = statement.source_text(sql).len()
                        - statement.source_text(sql).trim_start().len();
                    Some(calculate_line_column(sql, location + leading).0)
                }
                _ => None,
            };
            return Err(SiftError::UnsupportedStatement {
                index,
                kind: statement.kind().to_string(),
                line,
            });
        };

        debug!(index, kind = %statement.kind(), %category, "Classified statement");
        classification.push(category, statement);
    }

    Ok(classification)
}
