use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pgsift
#[derive(Error, Debug)]
pub enum SiftError {
    // SQL Parsing Errors
    #[error("Failed to parse SQL: {message}")]
    SqlParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported statement {kind} at position {index}{}", line.map(|l| format!(" (line {})", l)).unwrap_or_default())]
    UnsupportedStatement {
        index: usize,
        kind: String,
        line: Option<usize>,
    },

    // File System Errors
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read {path}: {message}")]
    FileRead {
        path: PathBuf,
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {message}")]
    FileWrite {
        path: PathBuf,
        message: String,
        #[source]
        source: std::io::Error,
    },

    // Configuration Errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to load configuration from {path}: {message}")]
    ConfigLoad {
        path: PathBuf,
        message: String,
    },

    #[error("{0}")]
    Other(String),
}

impl From<pg_query::Error> for SiftError {
    fn from(err: pg_query::Error) -> Self {
        SiftError::SqlParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for SiftError {
    fn from(err: serde_json::Error) -> Self {
        SiftError::Other(format!("Failed to serialize output: {}", err))
    }
}

/// Result type alias for pgsift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Attach the path of the file that was being read
    fn file_context(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorContext<T> for std::result::Result<T, std::io::Error> {
    fn file_context(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            let path = path.into();
            match e.kind() {
                std::io::ErrorKind::NotFound => SiftError::FileNotFound(path),
                _ => SiftError::FileRead {
                    path,
                    message: e.to_string(),
                    source: e,
                },
            }
        })
    }
}

/// Helper function to format error with all its causes
pub fn format_error_chain(err: &SiftError) -> String {
    use std::error::Error;

    let mut output = format!("Error: {}", err);

    let mut current_err: &dyn Error = err;
    while let Some(source) = current_err.source() {
        output.push_str(&format!("\n  Caused by: {}", source));
        current_err = source;
    }

    output
}

/// Helper function to suggest fixes for common errors
pub fn suggest_fix(err: &SiftError) -> Option<String> {
    match err {
        SiftError::UnsupportedStatement { kind, .. } => Some(
            format!("Cannot classify this SQL: {} is neither a query, a seed nor a migration.\n\
                    - Move the statement into a separate file\n\
                    - Or run it manually outside of the migration flow", kind)
        ),
        SiftError::FileNotFound(path) => Some(
            format!("File not found: {}\n\
                    - Check if the path is correct\n\
                    - Use '-' to read SQL from stdin", path.display())
        ),
        SiftError::SqlParse { message, .. } => Some(
            format!("SQL parsing error:\n{}\n\
                    - Check SQL syntax\n\
                    - Ensure the input contains valid PostgreSQL statements", message)
        ),
        SiftError::ConfigLoad { path, .. } => Some(
            format!("Could not read {}\n\
                    - Run 'pgsift init' to generate a sample configuration", path.display())
        ),
        _ => None,
    }
}

/// Calculate line and column number from a byte position in text
pub fn calculate_line_column(text: &str, byte_position: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    let mut current_pos = 0;

    for ch in text.chars() {
        if current_pos >= byte_position {
            break;
        }

        current_pos += ch.len_utf8();

        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_line_column() {
        let sql = "SELECT * FROM users\nWHERE id = 1\nAND name = 'test'";

        assert_eq!(calculate_line_column(sql, 0), (1, 1));
        assert_eq!(calculate_line_column(sql, 7), (1, 8)); // at '*'
        assert_eq!(calculate_line_column(sql, 20), (2, 1)); // at 'W' in WHERE
        assert_eq!(calculate_line_column(sql, 25), (2, 6)); // at 'i' in id
        assert_eq!(calculate_line_column(sql, 33), (3, 1)); // at 'A' in AND
    }

    #[test]
    fn test_calculate_line_column_with_unicode() {
        let sql = "SELECT '🎉' FROM table\nWHERE x = 1";

        assert_eq!(calculate_line_column(sql, 8), (1, 9)); // at '🎉'
        assert_eq!(calculate_line_column(sql, 12), (1, 10)); // after '🎉'
    }

    #[test]
    fn test_unsupported_statement_message() {
        let err = SiftError::UnsupportedStatement {
            index: 2,
            kind: "non-statement node".to_string(),
            line: Some(7),
        };
        assert_eq!(err.to_string(), "Unsupported statement non-statement node at position 2 (line 7)");

        let err = SiftError::UnsupportedStatement {
            index: 0,
            kind: "ReturnStmt".to_string(),
            line: None,
        };
        assert_eq!(err.to_string(), "Unsupported statement ReturnStmt at position 0");
        assert!(suggest_fix(&err).unwrap().contains("Cannot classify this SQL"));
    }

    #[test]
    fn test_file_context_maps_not_found() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        match result.file_context("missing.sql") {
            Err(SiftError::FileNotFound(path)) => assert_eq!(path, PathBuf::from("missing.sql")),
            other => panic!("Expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_format_error_chain_includes_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = SiftError::FileRead {
            path: PathBuf::from("a.sql"),
            message: "denied".to_string(),
            source: io,
        };
        let chain = format_error_chain(&err);
        assert!(chain.starts_with("Error: Failed to read a.sql"));
        assert!(chain.contains("Caused by: denied"));
    }
}
