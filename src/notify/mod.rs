// src/notify/mod.rs
//! Outbound notification channels.
//!
//! Each channel owns its own target (mailbox, chat) and protocol. The runner
//! only sees [`Notifier`] and treats every channel as independent: one failing
//! never stops the next from being tried.

pub mod email;
pub mod telegram;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::config::Config;
use crate::error::NotifyError;

pub use email::EmailNotifier;
pub use telegram::TelegramNotifier;

pub const HEADING: &str = "Интервалы отключения";
pub const NO_OUTAGES: &str = "Нет интервалов отключения";

/// What changed: the day's outage ranges and, when known, the day itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub date: Option<NaiveDate>,
    pub off_intervals: Vec<String>,
}

impl Notification {
    pub fn new(date: Option<NaiveDate>, off_intervals: Vec<String>) -> Self {
        Self { date, off_intervals }
    }

    pub fn date_label(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// Heading line, then one ` - ` bullet per range (or the "none" bullet).
    pub fn body(&self) -> String {
        let mut lines = vec![format!("{HEADING}:")];
        if self.off_intervals.is_empty() {
            lines.push(format!(" - {NO_OUTAGES}"));
        } else {
            lines.extend(self.off_intervals.iter().map(|r| format!(" - {r}")));
        }
        lines.join("\n")
    }

    pub fn subject(&self) -> String {
        match self.date_label() {
            Some(d) => format!("{HEADING} {d}"),
            None => HEADING.to_string(),
        }
    }

    /// Body with the date on its own first line, for channels without a subject.
    pub fn dated_body(&self) -> String {
        match self.date_label() {
            Some(d) => format!("{d}\n{}", self.body()),
            None => self.body(),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Channel name for logs and reports ("email", "telegram").
    fn name(&self) -> &str;

    /// Who receives it; safe to log.
    fn target(&self) -> String;

    async fn send(&self, note: &Notification) -> Result<(), NotifyError>;
}

/// Channels configured in `cfg`, email first. A channel that cannot be set up is logged and left out.
pub fn from_config(cfg: &Config) -> Vec<Box<dyn Notifier>> {
    let mut out: Vec<Box<dyn Notifier>> = Vec::new();

    match &cfg.email {
        Some(e) => match EmailNotifier::from_config(e) {
            Ok(mailer) => out.push(Box::new(mailer)),
            Err(e) => logw!("notify failure: email setup: {e}"),
        },
        None => logf!("Email channel not configured; skipping"),
    }

    match &cfg.telegram {
        Some(t) => match TelegramNotifier::with_api_base(&t.token, &t.chat_id, &t.api_base) {
            Ok(bot) => out.push(Box::new(bot)),
            Err(e) => logw!("notify failure: telegram setup: {e}"),
        },
        None => logf!("Telegram channel not configured; skipping"),
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Address, EmailConfig, EmailTransport, TelegramConfig};

    fn config() -> Config {
        Config {
            address: Address { city: s!("c"), street: s!("s"), house: s!("1") },
            state_file: ".store/state.json".into(),
            log_file: ".store/outage-watch.log".into(),
            email: None,
            telegram: None,
        }
    }

    #[test]
    fn channels_follow_config_in_order() {
        let mut cfg = config();
        assert!(from_config(&cfg).is_empty());

        cfg.email = Some(EmailConfig {
            recipient: s!("me@example.org"),
            from: s!("bot@example.org"),
            transport: EmailTransport::Smtp {
                host: s!(email::DEFAULT_SMTP_HOST),
                port: email::SMTPS_PORT,
                user: None,
                pass: None,
            },
        });
        cfg.telegram = Some(TelegramConfig {
            token: s!("123:abc"),
            chat_id: s!("42"),
            api_base: s!(telegram::DEFAULT_API_BASE),
        });
        let names: Vec<String> = from_config(&cfg).iter().map(|n| n.name().to_string()).collect();
        assert_eq!(names, vec!["email", "telegram"]);
    }

    #[test]
    fn body_lists_ranges() {
        let n = Notification::new(None, vec!["01:00 - 02:00".into(), "05:30 - 07:00".into()]);
        assert_eq!(n.body(), "Интервалы отключения:\n - 01:00 - 02:00\n - 05:30 - 07:00");
        assert_eq!(n.subject(), "Интервалы отключения");
        assert_eq!(n.dated_body(), n.body());
    }

    #[test]
    fn empty_body_says_so() {
        let n = Notification::new(NaiveDate::from_ymd_opt(2025, 10, 20), vec![]);
        assert_eq!(n.body(), "Интервалы отключения:\n - Нет интервалов отключения");
        assert_eq!(n.subject(), "Интервалы отключения 2025-10-20");
        assert!(n.dated_body().starts_with("2025-10-20\nИнтервалы"));
    }
}
