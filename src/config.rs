//! Configuration, resolved once at start-up.
//!
//! Layers, later wins:
//! - built-in defaults
//! - TOML file (`--config` or `<config dir>/fuelcheck/config.toml`)
//! - `.env` and process environment
//! - command line flags
//!
//! Mail credentials and the recipient come from the environment only.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::{debug, warn};
use serde::Deserialize;

use crate::cli::{CheckArgs, GlobalArgs};
use crate::error::ConfigError;
use crate::fetch::ScraperCommand;
use crate::notify::smtp::DEFAULT_SMTP_HOST;
use crate::notify::{MailSettings, Notifier, SmtpTransport, StdoutTransport, Transport, UnconfiguredTransport};
use crate::store::diff::MatchBy;
use crate::store::STATE_FILE_NAME;

pub const ENV_USER: &str = "EMAIL_USER";
pub const ENV_PASS: &str = "EMAIL_PASS";
pub const ENV_TO: &str = "EMAIL_TO";
pub const ENV_SMTP_HOST: &str = "SMTP_HOST";
pub const ENV_SMTP_PORT: &str = "SMTP_PORT";
pub const ENV_STATE: &str = "FUELCHECK_STATE";

const PLACEHOLDER_ADDRESS: &str = "fuelcheck@localhost";

/// Shape of config.toml. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub state_path: Option<PathBuf>,
    pub always_notify: Option<bool>,
    pub match_by: Option<MatchBy>,
    pub scraper: Option<ScraperSection>,
    pub mail: MailSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScraperSection {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MailSection {
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub from_name: Option<String>,
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: Option<u16>,
    pub from_name: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub recipient: Option<String>,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("from_name", &self.from_name)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("recipient", &self.recipient)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub state_path: PathBuf,
    pub scraper: ScraperCommand,
    pub always_notify: bool,
    pub match_by: MatchBy,
    pub mail: MailConfig,
    pub dry_run: bool,
    pub strict: bool,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "fuelcheck")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.toml"))
}

pub fn default_state_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.data_dir().join(STATE_FILE_NAME))
}

/// Loads `.env` from the working directory, a missing file is fine.
pub fn load_dotenv() -> Result<bool, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!("loaded environment from {}", path.display());
            Ok(true)
        }
        Err(dotenvy::Error::Io(_)) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

impl Config {
    /// Reads the config file and process environment, then applies flags.
    pub fn load(global: &GlobalArgs, args: &CheckArgs) -> Result<Self, ConfigError> {
        load_dotenv()?;

        let file = match &global.config {
            Some(path) => FileConfig::read(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => {
                    debug!("using config {}", path.display());
                    FileConfig::read(&path)?
                }
                None => FileConfig::default(),
            },
        };

        Self::resolve(file, |key| std::env::var(key).ok(), global, args)
    }

    pub fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
        global: &GlobalArgs,
        args: &CheckArgs,
    ) -> Result<Self, ConfigError> {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let state_path = match global
            .state
            .clone()
            .or_else(|| env(ENV_STATE).map(PathBuf::from))
            .or(file.state_path)
        {
            Some(path) => path,
            None => default_state_path().ok_or(ConfigError::NoDataDir)?,
        };

        let mut scraper = match file.scraper {
            Some(section) => ScraperCommand {
                program: section.command,
                args: section.args,
                working_dir: section.working_dir,
            },
            None => ScraperCommand::new("node", vec!["scrape.js".to_string()]),
        };
        if let Some(program) = &args.scraper {
            scraper = ScraperCommand::new(program.clone(), args.scraper_args.clone());
        } else if !args.scraper_args.is_empty() {
            scraper.args = args.scraper_args.clone();
        }

        let smtp_port = match env(ENV_SMTP_PORT) {
            Some(raw) => Some(raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                key: ENV_SMTP_PORT,
                value: raw.clone(),
            })?),
            None => file.mail.smtp_port,
        };

        let mail = MailConfig {
            smtp_host: env(ENV_SMTP_HOST)
                .or(file.mail.smtp_host)
                .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_port,
            from_name: file.mail.from_name.unwrap_or_else(|| "Fuel Checker".to_string()),
            username: env(ENV_USER),
            password: env(ENV_PASS),
            recipient: env(ENV_TO),
        };

        Ok(Config {
            state_path,
            scraper,
            always_notify: !args.no_always_notify && file.always_notify.unwrap_or(true),
            match_by: args.match_by.or(file.match_by).unwrap_or_default(),
            mail,
            dry_run: args.dry_run,
            strict: args.strict,
        })
    }

    /// Builds the notifier. Missing mail variables do not stop the check:
    /// the notifier gets a transport that fails every send, so the run still
    /// fetches and saves and the failure shows up in the log.
    pub fn notifier(&self) -> Notifier {
        let mail = &self.mail;

        let (transport, sender, recipient): (Box<dyn Transport>, String, String) = if self.dry_run {
            (
                Box::new(StdoutTransport) as Box<dyn Transport>,
                mail.username.clone().unwrap_or_else(|| PLACEHOLDER_ADDRESS.to_string()),
                mail.recipient.clone().unwrap_or_else(|| PLACEHOLDER_ADDRESS.to_string()),
            )
        } else {
            match (&mail.username, &mail.password, &mail.recipient) {
                (Some(username), Some(password), Some(recipient)) => {
                    let transport =
                        SmtpTransport::new(mail.smtp_host.clone(), mail.smtp_port, username.clone(), password.clone());
                    (Box::new(transport) as Box<dyn Transport>, username.clone(), recipient.clone())
                }
                (username, password, recipient) => {
                    let missing = if username.is_none() {
                        ENV_USER
                    } else if password.is_none() {
                        ENV_PASS
                    } else {
                        ENV_TO
                    };
                    warn!("{missing} is not set, the report mail will not be sent");
                    (
                        Box::new(UnconfiguredTransport::new(missing)) as Box<dyn Transport>,
                        username.clone().unwrap_or_else(|| PLACEHOLDER_ADDRESS.to_string()),
                        recipient.clone().unwrap_or_else(|| PLACEHOLDER_ADDRESS.to_string()),
                    )
                }
            }
        };

        let settings = MailSettings {
            from_name: mail.from_name.clone(),
            sender,
            recipient,
        };

        Notifier::new(transport, settings, self.match_by)
    }
}
