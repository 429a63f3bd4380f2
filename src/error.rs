use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Scraper process failed or its output held no recoverable JSON.
/// Fatal to the run: nothing is written and no mail goes out.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to start scraper `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("scraper exited with {status}: {stderr}")]
    Exited { status: ExitStatus, stderr: String },

    #[error("no JSON array or object found in scraper output")]
    NoJson,

    #[error("could not parse JSON from scraper output: {0}")]
    Unparseable(#[source] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The state file exists but is not JSON. Never treated as a first run.
    #[error("state file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Mail failures. Logged by the notifier, never propagated past it.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("invalid mail address `{address}`: {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("mail transport error: {0}")]
    Transport(String),

    #[error("mail not configured: {0} is not set")]
    NotConfigured(&'static str),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to load .env: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("could not determine a data directory, set FUELCHECK_STATE or --state")]
    NoDataDir,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
