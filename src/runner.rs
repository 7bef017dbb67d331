// src/runner.rs
//! One check cycle: decode → fingerprint → compare → notify → persist.
//!
//! Failure containment per step:
//! - no schedule in the fragment aborts the cycle before anything is sent or written;
//! - an unreadable prior record is treated as "no prior state";
//! - each channel is tried on its own, a failure is logged and the next one still runs;
//! - the record is always rewritten, changed or not. A failed write is logged and
//!   reported; the next run will then notify again for the same data.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::DecodeError;
use crate::fingerprint::{Fingerprint, normalize_lines};
use crate::notify::{Notification, Notifier};
use crate::schedule::{Schedule, SlotState, labels};
use crate::specs::{self, DecodedTable};
use crate::store::{PersistedState, StateStore};

/// Outcome of one channel's dispatch attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub channel: String,
    pub target: String,
    pub error: Option<String>,
}

impl Delivery {
    pub fn ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct CycleReport {
    pub schedule: Schedule,
    pub date: Option<NaiveDate>,
    pub off_intervals: Vec<String>,
    pub maybe_intervals: Vec<String>,
    pub fingerprint: Fingerprint,
    pub previous: Option<Fingerprint>,
    pub changed: bool,
    /// One entry per channel tried; empty when nothing changed.
    pub deliveries: Vec<Delivery>,
    /// The record this cycle tried to write.
    pub state: PersistedState,
    pub persisted: bool,
}

impl CycleReport {
    /// The record on disk is older than this run, so the next run may re-notify.
    pub fn stale_risk(&self) -> bool {
        !self.persisted
    }

    pub fn notified(&self) -> bool {
        self.deliveries.iter().any(Delivery::ok)
    }
}

/// A missing previous fingerprint always counts as a change.
pub fn has_changed(previous: Option<&Fingerprint>, current: &Fingerprint) -> bool {
    previous != Some(current)
}

fn read_previous(store: &dyn StateStore) -> Option<PersistedState> {
    match store.read() {
        Ok(Some(state)) => {
            logd!("Prior state from {}: digest={} version={}", store.location(), state.digest, state.version);
            Some(state)
        }
        Ok(None) => {
            logf!("No prior state at {}", store.location());
            None
        }
        Err(e) => {
            logw!("Prior state unreadable, treating as absent: {e}");
            None
        }
    }
}

async fn dispatch(notifiers: &[Box<dyn Notifier>], note: &Notification) -> Vec<Delivery> {
    let mut out = Vec::with_capacity(notifiers.len());
    for n in notifiers {
        let target = n.target();
        let error = match n.send(note).await {
            Ok(()) => {
                logf!("Notified via {} ({target})", n.name());
                None
            }
            Err(e) => {
                logw!("notify failure: {} ({target}): {e}", n.name());
                Some(e.to_string())
            }
        };
        out.push(Delivery { channel: n.name().to_string(), target, error });
    }
    out
}

/// Run one cycle over an already decoded table.
pub async fn run_decoded(
    table: DecodedTable,
    store: &dyn StateStore,
    notifiers: &[Box<dyn Notifier>],
    now: DateTime<Utc>,
) -> CycleReport {
    let DecodedTable { schedule, date } = table;
    let off_intervals = normalize_lines(&labels(&schedule.intervals(SlotState::Off)));
    let maybe_intervals = labels(&schedule.intervals(SlotState::Maybe));

    let fingerprint = Fingerprint::of_lines(&off_intervals);
    let previous = read_previous(store).map(|s| s.fingerprint());
    let changed = has_changed(previous.as_ref(), &fingerprint);
    logd!(
        "Off intervals: {:?}; digest {} (previous {})",
        off_intervals,
        fingerprint,
        previous.as_ref().map(Fingerprint::as_str).unwrap_or("none")
    );

    let deliveries = if changed {
        logf!("Schedule changed; notifying {} channel(s)", notifiers.len());
        dispatch(notifiers, &Notification::new(date, off_intervals.clone())).await
    } else {
        logf!("Schedule unchanged; no notification sent");
        Vec::new()
    };

    let state = PersistedState::new(&fingerprint, now, off_intervals.clone());
    let persisted = match store.write(&state) {
        Ok(()) => {
            logf!("State saved to {}", store.location());
            true
        }
        Err(e) => {
            loge!("persist failure: {e}; the next run will re-notify unchanged data");
            false
        }
    };

    CycleReport {
        schedule,
        date,
        off_intervals,
        maybe_intervals,
        fingerprint,
        previous,
        changed,
        deliveries,
        state,
        persisted,
    }
}

/// Run one cycle over raw table markup. Only a decode failure is returned as an error.
pub async fn run_cycle(
    fragment: &str,
    store: &dyn StateStore,
    notifiers: &[Box<dyn Notifier>],
    now: DateTime<Utc>,
) -> Result<CycleReport, DecodeError> {
    let table = specs::decode_fragment(fragment).map_err(|e| {
        loge!("decode failure: {e}; nothing compared, sent or saved");
        e
    })?;
    Ok(run_decoded(table, store, notifiers, now).await)
}
