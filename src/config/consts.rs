// src/config/consts.rs

// Local state
pub const DEFAULT_STATE_FILE: &str = ".store/state.json";
pub const DEFAULT_LOG_FILE: &str = ".store/outage-watch.log";

// Settings fallback, read when an environment variable is unset
pub const SETTINGS_FILE: &str = "env_vars.json";

// Environment keys
pub const CITY: &str = "CITY";
pub const STREET: &str = "STREET";
pub const HOUSE_NUM: &str = "HOUSE_NUM";
pub const STATE_FILE: &str = "STATE_FILE";
pub const LOG_FILE: &str = "LOG_FILE";
pub const EMAIL_RECIPIENT: &str = "EMAIL_RECIPIENT";
pub const SMTP_FROM: &str = "SMTP_FROM";
pub const SMTP_HOST: &str = "SMTP_HOST";
pub const SMTP_PORT: &str = "SMTP_PORT";
pub const SMTP_USER: &str = "SMTP_USER";
pub const SMTP_PASS: &str = "SMTP_PASS";
pub const SENDMAIL: &str = "SENDMAIL";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const TELEGRAM_API: &str = "TELEGRAM_API";
