use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map as JsonMap, Value as JsonValue};
use svs_core::history::HistoryDocument;
use svs_core::sort::ENVELOPE_KEY;
use svs_core::troop_stats::TroopStats;

const INDENT: &[u8] = b"    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// State mapping at the top level.
    #[default]
    Flat,
    /// State mapping wrapped in `{"svs-data-per-state": ...}` for the web page.
    Enveloped,
}

pub fn render_history_json(
    document: &HistoryDocument,
    style: JsonStyle,
) -> serde_json::Result<JsonValue> {
    let states = serde_json::to_value(document)?;
    Ok(match style {
        JsonStyle::Flat => states,
        JsonStyle::Enveloped => {
            let mut out = JsonMap::new();
            out.insert(ENVELOPE_KEY.to_string(), states);
            JsonValue::Object(out)
        }
    })
}

pub fn render_troop_stats_json(stats: &TroopStats) -> serde_json::Result<JsonValue> {
    serde_json::to_value(stats)
}

/// Pretty prints with four-space indentation and a trailing newline.
pub fn to_pretty_string<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    String::from_utf8(buf)
        .map_err(|e| serde_json::Error::io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Renders the whole document before touching `path`, then writes it in one go.
pub fn write_json_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> io::Result<()> {
    let rendered = to_pretty_string(value).map_err(io::Error::other)?;
    fs::write(path, rendered)
}

pub fn read_json_file(path: &Path) -> io::Result<JsonValue> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
