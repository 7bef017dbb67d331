// src/specs/two_column.rs
//! Normalizer for the narrow-screen "two-column" rendering of the fact table.
//!
//! The site sometimes renders one day as two half-day tables side by side,
//! one hour per row, the hour's marker on the row's third `<td>`:
//! ```text
//! <div class="table2col" rel="..">
//!   <table> <tr><td>00</td><td>01</td><td class="cell-scheduled"></td></tr> .. </table>
//!   <table> <tr><td>12</td><td>13</td><td class="cell-non-scheduled"></td></tr> .. </table>
//! </div>
//! ```
//! [`normalize`] rebuilds the canonical wide table from those markers so the
//! decoder only ever sees one shape. Anything it does not recognise passes through.

use std::borrow::Cow;

use crate::core::html::{self, blocks, first_block};
use crate::schedule::HOURS_PER_DAY;

use super::fact_table::TABLE_CLASS;

pub const WRAPPER_CLASS: &str = "table2col";
pub const LEGEND_CLASS: &str = "discon-fact-legend";

/// Zero-based index of the marker cell in a two-column row.
const MARKER_CELL: usize = 2;

/// True when the first table already has a header with one `<th>` per hour.
fn is_wide(fragment: &str) -> bool {
    let Some(table) = first_block(fragment, "table") else { return false };
    let inner = html::inner_after_open_tag(table);
    first_block(inner, "thead").is_some() && blocks(inner, "th").count() >= HOURS_PER_DAY
}

/// Class attribute of every row's marker cell, across all tables, in document order.
fn collect_markers(wrap: &str) -> Vec<String> {
    let mut out = Vec::new();
    for table in blocks(wrap, "table") {
        for tr in blocks(table, "tr") {
            if let Some(td) = blocks(tr, "td").nth(MARKER_CELL) {
                out.push(html::attr(td, "class").unwrap_or_default());
            }
        }
    }
    out
}

pub fn normalize(fragment: &str) -> Cow<'_, str> {
    if is_wide(fragment) {
        return Cow::Borrowed(fragment);
    }

    let wrapper = html::find_by_class(fragment, WRAPPER_CLASS);
    let wrap = wrapper.map(html::inner_after_open_tag).unwrap_or(fragment);
    if blocks(wrap, "table").take(2).count() < 2 {
        return Cow::Borrowed(fragment);
    }

    let markers = collect_markers(wrap);
    if markers.len() < HOURS_PER_DAY {
        logd!(
            "Two-column layout: {} hour markers, need {}; leaving fragment as-is",
            markers.len(),
            HOURS_PER_DAY
        );
        return Cow::Borrowed(fragment);
    }

    // Keep the day timestamp: wrapper's own rel first, else the first rel anywhere.
    let rel = wrapper
        .and_then(|w| html::attr(w, "rel"))
        .filter(|r| !r.is_empty())
        .or_else(|| html::find_with_attr(fragment, "rel").and_then(|el| html::attr(el, "rel")))
        .unwrap_or_default();
    let legend = html::find_by_class(fragment, LEGEND_CLASS);

    logd!("Two-column layout detected; rebuilt {} hour cells into a wide table", HOURS_PER_DAY);
    Cow::Owned(build_wide_table(&rel, &markers[..HOURS_PER_DAY], legend))
}

/// Synthetic wide table in the exact shape the live site renders on desktop.
pub fn build_wide_table(rel: &str, markers: &[String], legend: Option<&str>) -> String {
    let mut out = String::with_capacity(256 + markers.len() * 64);
    out.push_str(&format!(
        r#"<div rel="{}" class="{TABLE_CLASS} active"><table><thead><tr><th colspan="2">Часові</th>"#,
        escape_attr(rel)
    ));
    for h in 0..markers.len() {
        out.push_str(&format!(r#"<th scope="col"><div>{:02}-{:02}</div></th>"#, h, (h + 1) % 24));
    }
    out.push_str(r#"</tr></thead><tbody><tr><td colspan="2">&nbsp;</td>"#);
    for cls in markers {
        if cls.is_empty() {
            out.push_str("<td></td>");
        } else {
            out.push_str(&format!(r#"<td class="{}"></td>"#, escape_attr(cls)));
        }
    }
    out.push_str("</tr></tbody></table>");
    if let Some(legend) = legend {
        out.push_str(legend);
    }
    out.push_str("</div>");
    out
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}
