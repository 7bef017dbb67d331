// src/schedule.rs
//! Half-hour power timeline for one day and the run-length compressor over it.
//!
//! A [`Schedule`] always holds exactly [`SLOTS_PER_DAY`] slots; slot `i` covers
//! `[i * 30min, (i + 1) * 30min)`. [`Schedule::intervals`] turns the slots back
//! into maximal `HH:MM - HH:MM` ranges for one state.

use std::fmt;
use std::str::FromStr;

pub const SLOTS_PER_DAY: usize = 48;
pub const HOURS_PER_DAY: usize = SLOTS_PER_DAY / 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SlotState {
    On,
    Off,
    Maybe,
    #[default]
    Unknown,
}

impl SlotState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotState::On => "on",
            SlotState::Off => "off",
            SlotState::Maybe => "maybe",
            SlotState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    slots: [SlotState; SLOTS_PER_DAY],
}

impl Default for Schedule {
    fn default() -> Self {
        Self { slots: [SlotState::Unknown; SLOTS_PER_DAY] }
    }
}

impl Schedule {
    /// Build from any slot sequence: missing tail slots stay `Unknown`,
    /// anything past slot 47 is dropped.
    pub fn from_slots<I: IntoIterator<Item = SlotState>>(slots: I) -> Self {
        let mut out = Self::default();
        for (dst, src) in out.slots.iter_mut().zip(slots) {
            *dst = src;
        }
        out
    }

    /// Paint `intervals` with `state` over a `background` day.
    pub fn from_intervals(state: SlotState, intervals: &[Interval], background: SlotState) -> Self {
        let mut slots = [background; SLOTS_PER_DAY];
        for iv in intervals {
            for slot in &mut slots[iv.start_slot()..iv.end_slot()] {
                *slot = state;
            }
        }
        Self { slots }
    }

    pub fn slots(&self) -> &[SlotState] {
        &self.slots
    }

    pub fn count(&self, state: SlotState) -> usize {
        self.slots.iter().filter(|s| **s == state).count()
    }

    pub fn intervals(&self, state: SlotState) -> Vec<Interval> {
        compress(&self.slots, state)
    }
}

/// Half-open slot range `[start, end)` on 30-minute boundaries; `end` may be 48 (24:00).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    start: u8,
    end: u8,
}

impl Interval {
    /// `None` unless `start < end <= 48`.
    pub fn new(start_slot: usize, end_slot: usize) -> Option<Self> {
        if start_slot < end_slot && end_slot <= SLOTS_PER_DAY {
            Some(Self { start: start_slot as u8, end: end_slot as u8 })
        } else {
            None
        }
    }

    pub fn start_slot(&self) -> usize { self.start as usize }
    pub fn end_slot(&self) -> usize { self.end as usize }

    pub fn start_label(&self) -> String {
        slot_label(self.start_slot())
    }

    pub fn end_label(&self) -> String {
        slot_label(self.end_slot())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start_label(), self.end_label())
    }
}

impl FromStr for Interval {
    type Err = String;

    /// Parses `HH:MM - HH:MM` as written by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s.split_once('-').ok_or_else(|| format!("Invalid interval: {s}"))?;
        let start = parse_label(a.trim()).ok_or_else(|| format!("Invalid start time: {a}"))?;
        let end = parse_label(b.trim()).ok_or_else(|| format!("Invalid end time: {b}"))?;
        Interval::new(start, end).ok_or_else(|| format!("Empty or reversed interval: {s}"))
    }
}

/// Clock label of a slot boundary: 0 -> "00:00", 3 -> "01:30", 48 -> "24:00".
pub fn slot_label(slot: usize) -> String {
    let (h, half) = (slot / 2, slot % 2);
    format!("{h:02}:{}", if half == 0 { "00" } else { "30" })
}

fn parse_label(s: &str) -> Option<usize> {
    let (h, m) = s.split_once(':')?;
    let h: usize = h.parse().ok()?;
    let slot = match m {
        "00" => h * 2,
        "30" => h * 2 + 1,
        _ => return None,
    };
    (slot <= SLOTS_PER_DAY).then_some(slot)
}

/// Single left-to-right scan emitting every maximal run of `target`.
pub fn compress(slots: &[SlotState], target: SlotState) -> Vec<Interval> {
    let mut out = Vec::new();
    let n = slots.len().min(SLOTS_PER_DAY);
    let mut i = 0;
    while i < n {
        if slots[i] != target {
            i += 1;
            continue;
        }
        let start = i;
        while i < n && slots[i] == target { i += 1; }
        if let Some(iv) = Interval::new(start, i) {
            out.push(iv);
        }
    }
    out
}

/// Interval list rendered the way it is compared, stored and sent.
pub fn labels(intervals: &[Interval]) -> Vec<String> {
    intervals.iter().map(Interval::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use SlotState::*;

    #[test]
    fn labels_cover_day_edges() {
        assert_eq!(slot_label(0), "00:00");
        assert_eq!(slot_label(3), "01:30");
        assert_eq!(slot_label(47), "23:30");
        assert_eq!(slot_label(48), "24:00");
    }

    #[test]
    fn compress_finds_maximal_runs() {
        let s = Schedule::from_slots([Off, Off, On, Off, Maybe, Off, Off]);
        let got = labels(&s.intervals(Off));
        assert_eq!(got, vec!["00:00 - 01:00", "01:30 - 02:00", "02:30 - 03:30"]);
    }

    #[test]
    fn run_to_end_of_day_is_labelled_24() {
        let mut slots = vec![On; 46];
        slots.extend([Off, Off]);
        let s = Schedule::from_slots(slots);
        assert_eq!(labels(&s.intervals(Off)), vec!["23:00 - 24:00"]);
    }

    #[test]
    fn empty_input_yields_no_intervals() {
        assert!(compress(&[], Off).is_empty());
        assert!(Schedule::default().intervals(Off).is_empty());
        assert_eq!(Schedule::default().intervals(Unknown).len(), 1);
    }

    #[test]
    fn adjacent_intervals_never_touch() {
        let s = Schedule::from_slots([Off, On, Off, Off, Maybe, Maybe, Off, On, On, Off]);
        for state in [On, Off, Maybe, Unknown] {
            let ivs = s.intervals(state);
            for w in ivs.windows(2) {
                assert!(w[0].end_slot() < w[1].start_slot());
            }
        }
    }

    #[test]
    fn from_slots_pads_and_truncates() {
        assert_eq!(Schedule::from_slots([Off]).count(Unknown), 47);
        let long = Schedule::from_slots(std::iter::repeat(On).take(60));
        assert_eq!(long.slots().len(), SLOTS_PER_DAY);
        assert_eq!(long.count(On), SLOTS_PER_DAY);
    }

    #[test]
    fn interval_parses_its_own_label() {
        let iv: Interval = "07:30 - 24:00".parse().unwrap();
        assert_eq!((iv.start_slot(), iv.end_slot()), (15, 48));
        assert!("08:00 - 07:00".parse::<Interval>().is_err());
        assert!("08:15 - 09:00".parse::<Interval>().is_err());
    }
}
