//! Data conversion for SvS battle history and troop stats.
//!
//! [`history`] turns the two-header-row CSV export into a per-state
//! document keyed by match date, [`sort`] normalizes that document's
//! ordering, and [`troop_stats`] flattens troop stat spreadsheets.

mod error;
pub mod history;
pub mod sort;
pub mod troop_stats;

pub use error::{CoreError, CoreErrorCode};
