use chrono::NaiveDate;

/// Year assumed for every `MM/DD` header; the export carries no year.
pub const SVS_YEAR: i32 = 2024;

/// Extracts the match date from a slot header such as `"SvS 03/15"`.
///
/// The second whitespace-separated token must be `MM/DD` (one or two digits
/// each) naming a real day in [`SVS_YEAR`]. Returns the date as `YYYY-MM-DD`.
///
/// Days are checked against the leap year 2024, so `02/29` is accepted
/// rather than skipped as it would be under a year-less (1900) calendar.
pub fn parse_slot_date(header: &str) -> Option<String> {
    let token = header.split_whitespace().nth(1)?;
    let (month, day) = token.split_once('/')?;
    let month = parse_date_part(month)?;
    let day = parse_date_part(day)?;
    let date = NaiveDate::from_ymd_opt(SVS_YEAR, month, day)?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn parse_date_part(part: &str) -> Option<u32> {
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Parses the opponent cell as a signed integer literal.
pub fn parse_opponent(cell: &str) -> Option<i64> {
    cell.trim().parse().ok()
}
