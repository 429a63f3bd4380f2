//! Price fetcher.
//!
//! Runs the external scraper and recovers the station list from its stdout:
//! - strict parse of the whole output first
//! - then a scan for the first `[` or `{` that starts a complete JSON value
//!
//! Scrapers print progress and diagnostics around their JSON, the scan
//! tolerates that. It is still a heuristic: a bracketed log line that happens
//! to be valid JSON ahead of the real payload wins.

use std::path::PathBuf;
use std::process::Command;

use log::{debug, warn};
use serde_json::Value;

use crate::error::FetchError;
use crate::station::Snapshot;

pub trait PriceSource {
    fn fetch(&self) -> Result<Snapshot, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ScraperCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl ScraperCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        ScraperCommand {
            program: program.into(),
            args,
            working_dir: None,
        }
    }

    fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl PriceSource for ScraperCommand {
    fn fetch(&self) -> Result<Snapshot, FetchError> {
        debug!("running scraper: {}", self.display());

        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| FetchError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!("scraper stderr: {}", stderr.trim());
        }

        if !output.status.success() {
            return Err(FetchError::Exited {
                status: output.status,
                stderr: stderr.trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        extract_json(&stdout).map(Snapshot::from_value)
    }
}

/// Recover one JSON value from scraper output, strict parse first.
pub fn extract_json(text: &str) -> Result<Value, FetchError> {
    match serde_json::from_str(text) {
        Ok(value) => return Ok(value),
        Err(e) => warn!("direct JSON parse failed ({e}), scanning output"),
    }

    let mut last_err = None;

    for (start, _) in text.match_indices(['[', '{']) {
        // the stream deserializer stops at the end of the first value, so
        // brackets are matched by the parser itself, strings included
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => {
                debug!("recovered JSON at byte offset {start}");
                return Ok(value);
            }
            Some(Err(e)) => last_err = Some(e),
            None => {}
        }
    }

    match last_err {
        Some(e) => Err(FetchError::Unparseable(e)),
        None => Err(FetchError::NoJson),
    }
}
