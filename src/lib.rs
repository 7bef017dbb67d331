// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod fingerprint;
pub mod notify;
pub mod runner;
pub mod schedule;
pub mod source;
pub mod specs;
pub mod store;

pub use error::{DecodeError, NotifyError, StoreError};
pub use runner::{run_cycle, CycleReport};
pub use schedule::{Interval, Schedule, SlotState};
