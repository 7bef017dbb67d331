// src/specs/fact_table.rs
//! Scraping *spec* for the outage "fact table".
//!
//! Layout (wide shape, one day):
//! ```text
//! <div class="discon-fact-table active" rel="<unix seconds>">
//!   <table>
//!     <thead>..</thead>
//!     <tbody>
//!       <tr class="current-day">
//!         <td colspan="2">day label</td>
//!         <td class="cell-scheduled"></td> ... 24 hour cells
//! ```
//! Each hour cell's class marks the power state of its two half-hour slots.
//! Cells with `colspan` are labels, not hours.

use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::core::html::{self, blocks, first_block, has_attr, has_class};
use crate::error::DecodeError;
use crate::schedule::{Schedule, SlotState, HOURS_PER_DAY};

pub const CURRENT_DAY_CLASS: &str = "current-day";
pub const TABLE_CLASS: &str = "discon-fact-table";

/// Hour-cell markers and the half-hour pair each expands to.
pub const MARKERS: [(&str, [SlotState; 2]); 5] = [
    ("cell-scheduled", [SlotState::Off, SlotState::Off]),
    ("cell-non-scheduled", [SlotState::On, SlotState::On]),
    ("cell-first-half", [SlotState::Off, SlotState::On]),
    ("cell-second-half", [SlotState::On, SlotState::Off]),
    ("cell-scheduled-maybe", [SlotState::Maybe, SlotState::Maybe]),
];

/// Classify one hour cell by its class tokens. Unmarked cells are `unknown` for both halves.
pub fn classify_cell(cell: &str) -> [SlotState; 2] {
    let classes = html::classes(cell);
    MARKERS
        .iter()
        .find(|(marker, _)| classes.iter().any(|c| c == marker))
        .map(|(_, pair)| *pair)
        .unwrap_or([SlotState::Unknown; 2])
}

/// Decode one wide fact table into 48 slots.
///
/// Fails only when there is no table, no body or no row. A short row is padded
/// with `unknown`; a row with more than 24 hour cells is cut at 24.
pub fn decode(fragment: &str) -> Result<Schedule, DecodeError> {
    let table = first_block(fragment, "table").ok_or(DecodeError::NoTable)?;
    let body = first_block(html::inner_after_open_tag(table), "tbody").ok_or(DecodeError::NoBody)?;
    let rows = html::inner_after_open_tag(body);

    let row = blocks(rows, "tr")
        .find(|tr| has_class(tr, CURRENT_DAY_CLASS))
        .or_else(|| first_block(rows, "tr"))
        .ok_or(DecodeError::NoRow)?;

    let hour_cells: Vec<&str> = blocks(html::inner_after_open_tag(row), "td")
        .filter(|td| !has_attr(td, "colspan"))
        .take(HOURS_PER_DAY)
        .collect();

    if hour_cells.len() < HOURS_PER_DAY {
        logw!(
            "Fact table: only {} of {} hour cells found; padding with unknown",
            hour_cells.len(),
            HOURS_PER_DAY
        );
    }

    Ok(Schedule::from_slots(hour_cells.iter().flat_map(|td| classify_cell(td))))
}

/// Calendar date of the table, read from its `rel` timestamp in the local zone.
pub fn schedule_date(fragment: &str) -> Option<NaiveDate> {
    schedule_date_in(fragment, &Local)
}

pub fn schedule_date_in<Tz: TimeZone>(fragment: &str, tz: &Tz) -> Option<NaiveDate> {
    let el = html::find_by_class(fragment, TABLE_CLASS)
        .or_else(|| html::find_with_attr(fragment, "rel"))?;
    let rel = html::attr(el, "rel")
        .filter(|v| !v.trim().is_empty())
        .or_else(|| html::attr(el, "data-rel"))?;
    let ts: i64 = rel.trim().parse().ok()?;
    let utc = DateTime::from_timestamp(ts, 0)?;
    Some(utc.with_timezone(tz).date_naive())
}
