// src/config/options.rs
//! Run configuration, built once at startup and passed down explicitly.
//!
//! Every setting is looked up in the environment first, then in a flat JSON
//! settings object (`env_vars.json` by default):
//! ```json
//! { "CITY": "м. Дніпро", "STREET": "вул. Прикладна", "HOUSE_NUM": "1",
//!   "TELEGRAM_TOKEN": "123:abc", "TELEGRAM_CHAT_ID": 42 }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::consts::*;
use crate::error::ConfigError;
use crate::notify::{
    email::{DEFAULT_SMTP_HOST, SMTPS_PORT},
    telegram::DEFAULT_API_BASE,
};

/// The one address whose schedule is watched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    pub city: String,
    pub street: String,
    pub house: String,
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}, {}", self.city, self.street, self.house)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailConfig {
    pub recipient: String,
    pub from: String,
    pub transport: EmailTransport,
}

/// SMTP unless `SENDMAIL` names a local program.
#[derive(Clone, PartialEq, Eq)]
pub enum EmailTransport {
    Smtp {
        host: String,
        port: u16,
        user: Option<String>,
        pass: Option<String>,
    },
    Sendmail { program: PathBuf },
}

impl std::fmt::Debug for EmailTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmailTransport::Smtp { host, port, user, pass } => f
                .debug_struct("Smtp")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("pass", &pass.as_ref().map(|_| "<redacted>"))
                .finish(),
            EmailTransport::Sendmail { program } => {
                f.debug_struct("Sendmail").field("program", program).finish()
            }
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_id: String,
    pub api_base: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub address: Address,
    pub state_file: PathBuf,
    pub log_file: PathBuf,
    /// `None` unless a recipient is set.
    pub email: Option<EmailConfig>,
    /// `None` unless both token and chat id are set.
    pub telegram: Option<TelegramConfig>,
}

/// Flat key/value settings read from a JSON object. Non-string scalars are stringified.
pub type Settings = HashMap<String, String>;

pub fn parse_settings(text: &str, path: &Path) -> Result<Settings, ConfigError> {
    let map: serde_json::Map<String, Value> = serde_json::from_str(text)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
    Ok(map
        .into_iter()
        .filter_map(|(k, v)| {
            let v = match v {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((k, v))
        })
        .collect())
}

pub fn read_settings(path: &Path) -> Result<Settings, ConfigError> {
    let text = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    parse_settings(&text, path)
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

impl Config {
    /// Environment, falling back to `env_vars.json` in the working directory.
    /// A missing or broken fallback file is ignored.
    pub fn from_env() -> Result<Self, ConfigError> {
        let fallback = match read_settings(Path::new(SETTINGS_FILE)) {
            Ok(s) => s,
            Err(e) => {
                logd!("Settings fallback not used: {e}");
                Settings::new()
            }
        };
        Self::from_lookup(|k| env_var(k).or_else(|| fallback.get(k).cloned()))
    }

    /// Environment, falling back to an explicitly named settings file that must load.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let settings = read_settings(path)?;
        Self::from_lookup(|k| env_var(k).or_else(|| settings.get(k).cloned()))
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |k: &'static str| get(k).ok_or(ConfigError::Missing(k));

        let address = Address {
            city: required(CITY)?,
            street: required(STREET)?,
            house: required(HOUSE_NUM)?,
        };

        let email = match get(EMAIL_RECIPIENT) {
            Some(recipient) => {
                let transport = match get(SENDMAIL) {
                    Some(program) => EmailTransport::Sendmail { program: program.into() },
                    None => EmailTransport::Smtp {
                        host: get(SMTP_HOST).unwrap_or_else(|| DEFAULT_SMTP_HOST.into()),
                        port: match get(SMTP_PORT) {
                            Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key: SMTP_PORT, value: v })?,
                            None => SMTPS_PORT,
                        },
                        user: get(SMTP_USER),
                        pass: get(SMTP_PASS),
                    },
                };
                Some(EmailConfig {
                    recipient,
                    from: get(SMTP_FROM).unwrap_or_else(|| {
                        format!("no-reply@{}", get("HOSTNAME").unwrap_or_else(|| "localhost".into()))
                    }),
                    transport,
                })
            }
            None => None,
        };

        let telegram = match (get(TELEGRAM_TOKEN), get(TELEGRAM_CHAT_ID)) {
            (Some(token), Some(chat_id)) => Some(TelegramConfig {
                token,
                chat_id,
                api_base: get(TELEGRAM_API).unwrap_or_else(|| DEFAULT_API_BASE.into()),
            }),
            _ => None,
        };

        Ok(Config {
            address,
            state_file: get(STATE_FILE).map(PathBuf::from).unwrap_or_else(|| DEFAULT_STATE_FILE.into()),
            log_file: get(LOG_FILE).map(PathBuf::from).unwrap_or_else(|| DEFAULT_LOG_FILE.into()),
            email,
            telegram,
        })
    }
}
