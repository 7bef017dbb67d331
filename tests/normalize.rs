// tests/normalize.rs
mod common;

use std::borrow::Cow;

use common::*;
use outage_watch::specs::{decode_fragment, fact_table, two_column};

fn mixed_day() -> Vec<&'static str> {
    let mut m = all(NON_SCHEDULED);
    m[0] = SCHEDULED;
    m[1] = SCHEDULED;
    m[7] = FIRST_HALF;
    m[12] = SECOND_HALF;
    m[13] = SCHEDULED;
    m[20] = MAYBE;
    m[23] = "";
    m
}

#[test]
fn two_column_decodes_like_the_wide_table() {
    let day = mixed_day();
    let narrow = decode_fragment(&two_column(&day)).unwrap();
    let wide = decode_fragment(&wide_table(&day)).unwrap();
    assert_eq!(narrow.schedule, wide.schedule);
    assert_eq!(narrow.date, wide.date);
    assert!(narrow.date.is_some());
}

#[test]
fn normalized_output_is_the_wide_shape() {
    let html = two_column(&mixed_day());
    let out = two_column::normalize(&html);
    assert!(matches!(out, Cow::Owned(_)));
    assert!(out.contains(r#"class="discon-fact-table active""#));
    assert!(out.contains("<thead>"));
    assert_eq!(out.matches("<th scope=\"col\">").count(), 24);
    // label cell plus 24 hours
    assert_eq!(out.matches("<td").count(), 25);
}

#[test]
fn too_few_markers_pass_through_and_pad() {
    let html = two_column(&[SCHEDULED; 20]);
    assert_eq!(two_column::normalize(&html), html.as_str());
    // Falls back to decoding the first half-day table as-is.
    assert!(fact_table::decode(&html).is_ok());
}

#[test]
fn without_wrapper_any_two_tables_qualify() {
    let day = mixed_day();
    let bare = two_column(&day)
        .replace(r#"<div class="table2col" rel="1760961600">"#, "<div>");
    let narrow = decode_fragment(&bare).unwrap();
    assert_eq!(narrow.schedule, decode_fragment(&wide_table(&day)).unwrap().schedule);
}

#[test]
fn wide_table_is_untouched() {
    let html = wide_table(&alternating());
    assert!(matches!(two_column::normalize(&html), Cow::Borrowed(_)));
}
