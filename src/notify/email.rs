// src/notify/email.rs
// Mail is built with lettre and goes out either over SMTP (implicit TLS on 465,
// STARTTLS on any other port) or through a local sendmail-compatible program,
// which gets the formatted message on stdin as `<program> -t -i`.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{Notification, Notifier};
use crate::config::{EmailConfig, EmailTransport};
use crate::error::NotifyError;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const SMTPS_PORT: u16 = 465;
const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

enum Delivery {
    Smtp { relay: String, mailer: AsyncSmtpTransport<Tokio1Executor> },
    Sendmail { program: PathBuf },
}

pub struct EmailNotifier {
    from: Mailbox,
    to: Mailbox,
    delivery: Delivery,
}

impl EmailNotifier {
    pub fn smtp(
        recipient: &str,
        from: &str,
        host: &str,
        port: u16,
        credentials: Option<Credentials>,
    ) -> Result<Self, NotifyError> {
        let builder = if port == SMTPS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
        };
        let mut builder = builder.port(port).timeout(Some(SMTP_TIMEOUT));
        if let Some(creds) = credentials {
            builder = builder.credentials(creds);
        }
        Ok(Self {
            from: from.parse()?,
            to: recipient.parse()?,
            delivery: Delivery::Smtp { relay: format!("{host}:{port}"), mailer: builder.build() },
        })
    }

    pub fn sendmail(recipient: &str, from: &str, program: impl Into<PathBuf>) -> Result<Self, NotifyError> {
        Ok(Self {
            from: from.parse()?,
            to: recipient.parse()?,
            delivery: Delivery::Sendmail { program: program.into() },
        })
    }

    pub fn from_config(cfg: &EmailConfig) -> Result<Self, NotifyError> {
        match &cfg.transport {
            EmailTransport::Smtp { host, port, user, pass } => {
                let creds = user
                    .as_ref()
                    .map(|u| Credentials::new(u.clone(), pass.clone().unwrap_or_default()));
                Self::smtp(&cfg.recipient, &cfg.from, host, *port, creds)
            }
            EmailTransport::Sendmail { program } => Self::sendmail(&cfg.recipient, &cfg.from, program),
        }
    }

    /// Plain-text UTF-8 message; lettre encodes and folds the subject.
    pub fn compose(&self, note: &Notification) -> Result<Message, NotifyError> {
        Ok(Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(note.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(note.body())?)
    }

    async fn pipe_to(&self, program: &Path, message: &Message) -> Result<(), NotifyError> {
        let name = program.display().to_string();

        let mut child = Command::new(program)
            .args(["-t", "-i"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| NotifyError::Spawn { program: name.clone(), source })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&message.formatted())
                .await
                .map_err(|source| NotifyError::Io { program: name.clone(), source })?;
            stdin
                .shutdown()
                .await
                .map_err(|source| NotifyError::Io { program: name.clone(), source })?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| NotifyError::Io { program: name.clone(), source })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.trim().is_empty() {
                logd!("{name}: {}", stderr.trim());
            }
            return Err(NotifyError::Exit { program: name, status: output.status });
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &str {
        "email"
    }

    fn target(&self) -> String {
        self.to.email.to_string()
    }

    async fn send(&self, note: &Notification) -> Result<(), NotifyError> {
        let message = self.compose(note)?;
        match &self.delivery {
            Delivery::Smtp { relay, mailer } => {
                logd!("Sending mail to {} via {relay}", self.to.email);
                mailer.send(message).await?;
                Ok(())
            }
            Delivery::Sendmail { program } => self.pipe_to(program, &message).await,
        }
    }
}
