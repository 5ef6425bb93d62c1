mod common;

use common::{fixtures, init_test_tracing, TestWorkspace};
use pgsift::commands::{execute_activity, execute_classify, execute_cron, execute_events};
use pgsift::config::{OutputFormat, PgsiftConfig};
use pgsift::{table_activity, SiftError, TableAction};

#[test]
fn test_execute_classify_from_file() {
    init_test_tracing();
    let workspace = TestWorkspace::new();
    let path = workspace.write_sql("mixed.sql", fixtures::sql::MIXED_SCRIPT);

    let result = execute_classify(&path).unwrap();
    assert_eq!(result.sql, fixtures::sql::MIXED_SCRIPT);
    assert_eq!(result.classification.len(), 6);
}

#[test]
fn test_execute_classify_missing_file() {
    let workspace = TestWorkspace::new();
    let path = workspace.temp_dir.path().join("nope.sql");

    let err = execute_classify(&path).unwrap_err();
    assert!(matches!(err, SiftError::FileNotFound(_)));
    assert!(pgsift::error::suggest_fix(&err).unwrap().contains("stdin"));
}

#[test]
fn test_execute_classify_language_file() {
    let workspace = TestWorkspace::new();
    let path = workspace.write_sql("languages.sql", fixtures::sql::LANGUAGE_AND_TEXT_SEARCH);

    let result = execute_classify(&path).unwrap();
    assert_eq!(result.classification.migrations.len(), 3);
}

#[test]
fn test_execute_events_and_activity() {
    let workspace = TestWorkspace::new();
    let path = workspace.write_sql("schema.sql", fixtures::sql::SCHEMA_MIGRATION);

    let events = execute_events(&path).unwrap();
    assert_eq!(events.events.len(), 2);

    let activity = execute_activity(&path).unwrap();
    let actions: Vec<_> = activity.activity.iter().map(|a| a.action).collect();
    assert_eq!(actions, vec![TableAction::TableCreated, TableAction::TableRlsEnabled]);
}

#[test]
fn test_seed_activity() {
    let activity = table_activity(fixtures::sql::SEED_DATA);
    let actions: Vec<_> = activity.iter().map(|a| a.action).collect();
    assert_eq!(actions, vec![TableAction::TableDataAdded, TableAction::TableCreated]);
    assert_eq!(activity[1].table_name, "users_backup");
}

#[test]
fn test_activity_survives_unparseable_statement() {
    let workspace = TestWorkspace::new();
    let path = workspace.write_sql("rls.sql", fixtures::sql::ACTIVITY_WITH_RLS_SHORTHAND);

    let activity = execute_activity(&path).unwrap().activity;
    let actions: Vec<_> = activity.iter().map(|a| a.action).collect();
    assert_eq!(
        actions,
        vec![
            TableAction::TableCreated,
            TableAction::TableDataAdded,
            TableAction::TableRlsEnabled,
        ]
    );
    assert!(activity.iter().all(|a| a.table_name == "users"));
}

#[test]
fn test_config_drives_cron_options() {
    let workspace = TestWorkspace::new();
    let config_path = workspace.temp_dir.path().join("pgsift.toml");
    std::fs::write(&config_path, "project_ref = \"abcdefgh\"\noutput_format = \"json\"\n").unwrap();

    let config_file = PgsiftConfig::load_from_path(&config_path).unwrap();
    let config = PgsiftConfig::merge_with_cli(config_file, None, false, None);
    assert_eq!(config.output_format(), OutputFormat::Json);

    let result = execute_cron(fixtures::cron::EDGE_FUNCTION, &config.cron_options());
    assert_eq!(result.spec.kind(), "edge_function");

    let config = PgsiftConfig::merge_with_cli(Some(config), Some("other".to_string()), false, None);
    let result = execute_cron(fixtures::cron::EDGE_FUNCTION, &config.cron_options());
    assert_eq!(result.spec.kind(), "http_request");
}
