// tests/common/mod.rs
#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use outage_watch::error::{NotifyError, StoreError};
use outage_watch::notify::{Notification, Notifier};
use outage_watch::store::{PersistedState, StateStore};

pub const SCHEDULED: &str = "cell-scheduled";
pub const NON_SCHEDULED: &str = "cell-non-scheduled";
pub const FIRST_HALF: &str = "cell-first-half";
pub const SECOND_HALF: &str = "cell-second-half";
pub const MAYBE: &str = "cell-scheduled-maybe";

/// 2025-10-20 12:00:00 UTC
pub const REL: &str = "1760961600";

/// Wide fact table as the site renders it: label cell with colspan, then hour cells.
pub fn wide_table(markers: &[&str]) -> String {
    let mut head = String::from(r#"<tr><th colspan="2">Часові</th>"#);
    for h in 0..24 {
        head.push_str(&format!(r#"<th scope="col"><div>{:02}-{:02}</div></th>"#, h, (h + 1) % 24));
    }
    head.push_str("</tr>");

    let mut row = String::from(r#"<tr class="current-day"><td colspan="2"><b>Пн</b></td>"#);
    for m in markers {
        if m.is_empty() {
            row.push_str("<td></td>");
        } else {
            row.push_str(&format!(r#"<td class="{m}"></td>"#));
        }
    }
    row.push_str("</tr>");

    format!(
        r#"<div class="discon-fact-table active" rel="{REL}">
  <table>
    <thead>{head}</thead>
    <tbody>
      {row}
    </tbody>
  </table>
</div>"#
    )
}

/// The same day split into two half-day tables, one hour per row.
pub fn two_column(markers: &[&str]) -> String {
    let (am, pm) = markers.split_at(markers.len().min(12));
    let table = |first: usize, half: &[&str]| {
        let mut t = String::from("<table><tbody>");
        for (i, m) in half.iter().enumerate() {
            let h = first + i;
            t.push_str(&format!(
                r#"<tr><td>{:02}-{:02}</td><td><img src="bolt.svg"></td><td class="{m}"></td></tr>"#,
                h,
                (h + 1) % 24
            ));
        }
        t.push_str("</tbody></table>");
        t
    };
    format!(
        r#"<div class="discon-fact-table active"><div class="table2col" rel="{REL}">{}{}</div></div>"#,
        table(0, am),
        table(12, pm)
    )
}

/// Even hours on, odd hours off.
pub fn alternating() -> Vec<&'static str> {
    (0..24).map(|h| if h % 2 == 0 { NON_SCHEDULED } else { SCHEDULED }).collect()
}

pub fn all(marker: &'static str) -> Vec<&'static str> {
    vec![marker; 24]
}

#[derive(Default)]
pub struct MemoryStore {
    pub state: RefCell<Option<PersistedState>>,
    pub writes: RefCell<usize>,
}

impl StateStore for MemoryStore {
    fn read(&self) -> Result<Option<PersistedState>, StoreError> {
        Ok(self.state.borrow().clone())
    }

    fn write(&self, state: &PersistedState) -> Result<(), StoreError> {
        *self.state.borrow_mut() = Some(state.clone());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".into()
    }
}

/// Store whose reads and writes always fail.
pub struct BrokenStore;

impl StateStore for BrokenStore {
    fn read(&self) -> Result<Option<PersistedState>, StoreError> {
        Err(StoreError::Corrupt { path: "broken".into(), reason: "unreadable".into() })
    }

    fn write(&self, _state: &PersistedState) -> Result<(), StoreError> {
        Err(StoreError::Io {
            path: "broken".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }

    fn location(&self) -> String {
        "broken".into()
    }
}

#[derive(Clone, Default)]
pub struct Recorder {
    pub sent: Arc<Mutex<Vec<Notification>>>,
}

impl Recorder {
    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<Notification> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Notifier for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn target(&self) -> String {
        "test".into()
    }

    async fn send(&self, note: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(note.clone());
        Ok(())
    }
}

pub struct Failing;

#[async_trait]
impl Notifier for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn target(&self) -> String {
        "nowhere".into()
    }

    async fn send(&self, _note: &Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Rejected("channel down".into()))
    }
}
