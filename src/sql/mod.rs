pub mod parser;
pub mod classifier;
pub mod events;
pub mod activity;

pub use parser::{parse_statements, ParsedStatement, PgQueryParser, SqlParser};
pub use classifier::{categorize, classify, classify_sql, Classification, StatementCategory};
pub use events::{extract_events, Event, EventExtractor, EntityType, DEFAULT_SCHEMA};
pub use activity::{table_activity, TableAction, TableActivity};
