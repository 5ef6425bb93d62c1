use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cron::CronOptions;
use crate::error::{Result, SiftError};

pub const CONFIG_FILE_NAME: &str = "pgsift.toml";
pub const SAMPLE_CONFIG_FILE_NAME: &str = "pgsift.toml.example";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PgsiftConfig {
    /// Project reference used to recognize edge function URLs in cron commands
    pub project_ref: Option<String>,

    /// Output format for `events`, `activity` and `cron` (text or json)
    pub output_format: Option<OutputFormat>,

    /// Log verbosity used when no -v flag is given
    pub verbosity: Option<u8>,
}

impl PgsiftConfig {
    /// Load configuration from pgsift.toml in the current directory
    pub fn load_from_file() -> Result<Option<Self>> {
        Self::load_from_path(Path::new(CONFIG_FILE_NAME))
    }

    /// Load configuration from an explicit path. A missing file is not an error.
    pub fn load_from_path(config_path: &Path) -> Result<Option<Self>> {
        if !config_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(config_path).map_err(|e| SiftError::ConfigLoad {
            path: config_path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: PgsiftConfig = toml::from_str(&content).map_err(|e| SiftError::ConfigLoad {
            path: config_path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Some(config))
    }

    /// Merge CLI arguments with config file values
    /// CLI arguments take precedence over config file values
    pub fn merge_with_cli(
        config_file: Option<Self>,
        cli_project_ref: Option<String>,
        cli_json: bool,
        cli_verbosity: Option<u8>,
    ) -> Self {
        let base_config = config_file.unwrap_or_default();

        Self {
            project_ref: cli_project_ref.or(base_config.project_ref),
            output_format: if cli_json {
                Some(OutputFormat::Json)
            } else {
                base_config.output_format
            },
            verbosity: cli_verbosity.or(base_config.verbosity),
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format.unwrap_or_default()
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity.unwrap_or(0)
    }

    pub fn cron_options(&self) -> CronOptions {
        CronOptions {
            project_ref: self.project_ref.clone(),
        }
    }

    /// Create a sample configuration file in the current directory
    pub fn write_sample_config() -> Result<PathBuf> {
        Self::write_sample_config_in(Path::new("."))
    }

    pub fn write_sample_config_in(dir: &Path) -> Result<PathBuf> {
        let sample_config = PgsiftConfig {
            project_ref: Some("your-project-ref".to_string()),
            output_format: Some(OutputFormat::Text),
            verbosity: Some(0),
        };

        let content = toml::to_string_pretty(&sample_config)
            .map_err(|e| SiftError::Configuration(e.to_string()))?;
        let path = dir.join(SAMPLE_CONFIG_FILE_NAME);
        fs::write(&path, content).map_err(|e| SiftError::FileWrite {
            path: path.clone(),
            message: e.to_string(),
            source: e,
        })?;

        Ok(path)
    }
}
