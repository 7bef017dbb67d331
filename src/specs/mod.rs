// src/specs/mod.rs
//! # Scraping "specs" module
//!
//! Page-specific knowledge of the outage site's markup lives here and nowhere else.
//!
//! - `two_column` – rebuilds the narrow two-table rendering into the wide shape.
//! - `fact_table` – decodes the wide table into 48 half-hour slots, and reads the
//!   table's day from its `rel` timestamp.
//!
//! Specs are pure: no network, no persistence, no notifications. They are
//! testable offline against saved fragments.
//!
//! ## Typical call chain
//! ```text
//! source::ContentSource → specs::decode_fragment → runner::run_cycle
//!                          ├ two_column::normalize
//!                          ├ fact_table::decode
//!                          └ fact_table::schedule_date
//! ```
pub mod fact_table;
pub mod two_column;

use chrono::NaiveDate;

use crate::error::DecodeError;
use crate::schedule::Schedule;

/// One decoded day: the slot timeline plus the date the page attached to it, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedTable {
    pub schedule: Schedule,
    pub date: Option<NaiveDate>,
}

/// Normalize the layout, then decode slots and date.
pub fn decode_fragment(fragment: &str) -> Result<DecodedTable, DecodeError> {
    let wide = two_column::normalize(fragment);
    let schedule = fact_table::decode(&wide)?;
    let date = fact_table::schedule_date(&wide);
    Ok(DecodedTable { schedule, date })
}
