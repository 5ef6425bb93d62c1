pub mod activity;
pub mod classify;
pub mod cron;
pub mod events;

pub use activity::{execute_activity, ActivityResult};
pub use classify::{execute_classify, ClassifyResult};
pub use cron::{execute_cron, CronResult};
pub use events::{execute_events, EventsResult};

#[cfg(feature = "cli")]
pub use activity::print_activity_summary;
#[cfg(feature = "cli")]
pub use classify::print_classify_summary;
#[cfg(feature = "cli")]
pub use cron::print_cron_summary;
#[cfg(feature = "cli")]
pub use events::print_events_summary;

use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::{ErrorContext, Result};

/// Read SQL from `path`, or from stdin when the path is `-`.
pub fn read_sql_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut sql = String::new();
        std::io::stdin()
            .read_to_string(&mut sql)
            .file_context("<stdin>")?;
        debug!(bytes = sql.len(), "Read SQL from stdin");
        return Ok(sql);
    }

    let sql = std::fs::read_to_string(path).file_context(path)?;
    debug!(path = %path.display(), bytes = sql.len(), "Read SQL file");
    Ok(sql)
}
