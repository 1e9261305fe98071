mod converter;
mod result_code;
mod slot;
mod types;

pub use converter::{Conversion, ConversionStats, HistoryConverter, SkipReason};
pub use result_code::ResultCode;
pub use slot::{SVS_YEAR, parse_opponent, parse_slot_date};
pub use types::{HistoryDocument, MatchOutcome, StateHistory};
