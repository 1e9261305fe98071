use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{CoreError, CoreErrorCode};

use super::result_code::ResultCode;
use super::slot::{parse_opponent, parse_slot_date};
use super::types::{HistoryDocument, MatchOutcome};

/// Why a match slot produced no outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyCell,
    InvalidDate,
    InvalidOpponent,
    UnknownResult,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub rows_read: usize,
    pub rows_without_state: usize,
    pub slots_written: usize,
    pub skipped_empty: usize,
    pub skipped_invalid_date: usize,
    pub skipped_invalid_opponent: usize,
    pub skipped_unknown_result: usize,
}

impl ConversionStats {
    pub fn slots_skipped(&self) -> usize {
        self.skipped_empty
            + self.skipped_invalid_date
            + self.skipped_invalid_opponent
            + self.skipped_unknown_result
    }

    fn count_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::EmptyCell => self.skipped_empty += 1,
            SkipReason::InvalidDate => self.skipped_invalid_date += 1,
            SkipReason::InvalidOpponent => self.skipped_invalid_opponent += 1,
            SkipReason::UnknownResult => self.skipped_unknown_result += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: HistoryDocument,
    pub stats: ConversionStats,
}

/// Converts the SvS history CSV export into a [`HistoryDocument`].
///
/// The export has two header records. The first is ignored. The second
/// labels the columns: column 0 holds the state id, then every pair of
/// columns starting at 1 is one match slot, headed by a label whose second
/// token is the `MM/DD` date. Data rows carry the opponent id in the first
/// column of the pair and the result label in the second.
///
/// Bad cells never fail the run; they drop only their own slot.
#[derive(Debug, Default, Clone, Copy)]
pub struct HistoryConverter;

impl HistoryConverter {
    pub fn new() -> Self {
        Self
    }

    pub fn convert_path(&self, path: &Path) -> Result<Conversion, CoreError> {
        let file = File::open(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to open {}: {e}", path.display()),
            )
        })?;
        self.convert_reader(file)
    }

    pub fn convert_reader<R: Read>(&self, reader: R) -> Result<Conversion, CoreError> {
        let mut input = BufReader::new(reader);

        // The csv reader drops blank lines, so the two header rows are taken
        // off the stream by physical position before it sees the data.
        let missing_header = || {
            CoreError::new(
                CoreErrorCode::MissingHeader,
                "input must start with two header rows",
            )
        };
        read_physical_record(&mut input)?.ok_or_else(missing_header)?;
        let header_line = read_physical_record(&mut input)?.ok_or_else(missing_header)?;
        let headers = parse_header_line(&header_line)?;

        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input);
        let records = rdr.records();

        let mut document = HistoryDocument::new();
        let mut stats = ConversionStats::default();

        for record in records {
            let row = record?;
            stats.rows_read += 1;

            let state = cell(&row, 0);
            if state.is_empty() {
                stats.rows_without_state += 1;
                continue;
            }
            document.register_state(state);

            for i in (1..headers.len()).step_by(2) {
                match read_slot(&headers, &row, i) {
                    Ok((date, outcome)) => {
                        document.record(state, date, outcome);
                        stats.slots_written += 1;
                    }
                    Err(reason) => stats.count_skip(reason),
                }
            }
        }

        Ok(Conversion { document, stats })
    }
}

fn read_slot(
    headers: &StringRecord,
    row: &StringRecord,
    index: usize,
) -> Result<(String, MatchOutcome), SkipReason> {
    let date_header = headers.get(index).unwrap_or_default();
    let opponent = cell(row, index);
    let result = cell(row, index + 1);

    if date_header.is_empty() || opponent.is_empty() || result.is_empty() {
        return Err(SkipReason::EmptyCell);
    }

    let date = parse_slot_date(date_header).ok_or(SkipReason::InvalidDate)?;
    let opposition_state = parse_opponent(opponent).ok_or(SkipReason::InvalidOpponent)?;
    let result = ResultCode::from_label(result).ok_or(SkipReason::UnknownResult)?;

    Ok((date, MatchOutcome::new(opposition_state, result)))
}

/// Reads one CSV record's worth of lines, following quoted line breaks.
/// Returns `None` at end of input.
fn read_physical_record<B: BufRead>(input: &mut B) -> io::Result<Option<String>> {
    let mut record = String::new();
    loop {
        if input.read_line(&mut record)? == 0 {
            return Ok((!record.is_empty()).then_some(record));
        }
        if record.bytes().filter(|&b| b == b'"').count() % 2 == 0 {
            return Ok(Some(record));
        }
    }
}

// A blank label row yields no match slots.
fn parse_header_line(line: &str) -> Result<StringRecord, CoreError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    Ok(rdr.records().next().transpose()?.unwrap_or_default())
}

// Short rows read as empty cells.
fn cell(row: &StringRecord, index: usize) -> &str {
    row.get(index).map(str::trim).unwrap_or_default()
}
