#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Route library logs to the test harness output
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Temporary directory holding SQL files for command tests
pub struct TestWorkspace {
    pub temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    pub fn write_sql(&self, name: &str, sql: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, sql).expect("failed to write SQL file");
        path
    }
}
