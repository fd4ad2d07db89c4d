//! Core library for the garage-profit command line application.
//!
//! The library computes per-mechanic profit for a garage over a month or a
//! date range. Income is recovered from the free-text final report of each
//! work order by [`extract`], summed per mechanic by [`aggregate`], and
//! combined with payroll into report rows by [`report`]. Readers and writers
//! for the ledgers and the generated reports live under [`io`], shared data
//! types in [`model`], and [`pipeline`] wires a full run together.

pub mod aggregate;
pub mod error;
pub mod extract;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod prompt;
pub mod report;

pub use error::{Result, ToolError};
