// src/cli.rs
use std::path::PathBuf;

use chrono::Utc;
use color_eyre::eyre::{Result, WrapErr, bail, eyre};

use crate::config::{Config, consts};
use crate::notify;
use crate::runner::{CycleReport, run_cycle};
use crate::source::{ContentSource, FileSource, StdinSource};
use crate::store::FileStore;

pub const HELP: &str = include_str!("cli_help.txt");

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    /// `None` reads stdin.
    pub html: Option<PathBuf>,
    pub state: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub dry_run: bool,
    pub help: bool,
}

pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Params> {
    let mut params = Params::default();
    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        match a.as_str() {
            "--html" => {
                let v = args.next().ok_or_else(|| eyre!("Missing value for --html"))?;
                params.html = if v == "-" { None } else { Some(PathBuf::from(v)) };
            }
            "--state" => params.state = Some(PathBuf::from(args.next().ok_or_else(|| eyre!("Missing value for --state"))?)),
            "--config" => params.config = Some(PathBuf::from(args.next().ok_or_else(|| eyre!("Missing value for --config"))?)),
            "--dry-run" => params.dry_run = true,
            "-h" | "--help" => params.help = true,
            other => bail!("Unknown arg: {other}"),
        }
    }
    Ok(params)
}

pub async fn run(params: Params) -> Result<()> {
    let loaded = match &params.config {
        Some(path) => Config::from_file(path),
        None => Config::from_env(),
    };
    let mut cfg = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            crate::log::init(fallback_log_file());
            loge!("config failure: {e}");
            return Err(e).wrap_err("loading configuration");
        }
    };
    if let Some(state) = params.state {
        cfg.state_file = state;
    }
    crate::log::init(&cfg.log_file);
    logf!("Checking outage schedule for {}", cfg.address);

    let source: Box<dyn ContentSource> = match params.html {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(StdinSource),
    };
    let html = match source.fetch(&cfg.address) {
        Ok(html) => html,
        Err(e) => {
            loge!("source failure: {e}; nothing compared, sent or saved");
            return Err(e).wrap_err("reading schedule table");
        }
    };

    let store = FileStore::new(&cfg.state_file);
    let notifiers = if params.dry_run {
        logf!("Dry run; notification channels disabled");
        Vec::new()
    } else {
        notify::from_config(&cfg)
    };

    let report = run_cycle(&html, &store, &notifiers, Utc::now())
        .await
        .wrap_err("decoding schedule table")?;
    print!("{}", render_report(&report));
    Ok(())
}

/// Log destination when no configuration could be loaded.
fn fallback_log_file() -> PathBuf {
    std::env::var(consts::LOG_FILE)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| consts::DEFAULT_LOG_FILE.into())
}

/// Human summary printed after each run.
pub fn render_report(report: &CycleReport) -> String {
    let mut out = String::new();
    if let Some(d) = report.date {
        out.push_str(&format!("Дата: {}\n", d.format("%Y-%m-%d")));
    }
    out.push_str("Интервалы отключения (Света НЕТ):\n");
    if report.off_intervals.is_empty() {
        out.push_str(&format!(" - {}\n", notify::NO_OUTAGES));
    }
    for r in &report.off_intervals {
        out.push_str(&format!(" - {r}\n"));
    }
    if !report.maybe_intervals.is_empty() {
        out.push_str("Возможные отключения:\n");
        for r in &report.maybe_intervals {
            out.push_str(&format!(" - {r}\n"));
        }
    }
    out.push_str(if report.changed { "Schedule changed\n" } else { "Schedule unchanged\n" });
    for d in &report.deliveries {
        match &d.error {
            None => out.push_str(&format!("Sent via {} to {}\n", d.channel, d.target)),
            Some(e) => out.push_str(&format!("Failed via {} to {}: {e}\n", d.channel, d.target)),
        }
    }
    if report.stale_risk() {
        out.push_str("Warning: state was not saved; the next run may notify again\n");
    }
    out
}
