use crate::domain::ports::EventLog;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H:%M:%S";

/// Appends `<timestamp>: <message>` lines to a text file.
#[derive(Debug, Clone)]
pub struct ProgressLog {
    path: PathBuf,
}

impl ProgressLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }
}

impl EventLog for ProgressLog {
    fn record(&self, message: &str) {
        tracing::info!("{}", message);

        let line = format!("{}: {}", Local::now().format(TIMESTAMP_FORMAT), message);
        if let Err(e) = self.append(&line) {
            tracing::warn!("Could not write progress log {}: {}", self.path.display(), e);
        }
    }
}
