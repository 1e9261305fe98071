use serde_json::{Value, json};
use svs_core::history::{HistoryConverter, HistoryDocument};
use svs_render::{JsonStyle, read_json_file, render_history_json, to_pretty_string, write_json_file};

fn sample_document() -> HistoryDocument {
    let input = "\
export
State,SvS 03/22,Result,SvS 03/15,Result
1001,2002,Supreme Win,2003,Battle Win
1004,,
";
    HistoryConverter::new()
        .convert_reader(input.as_bytes())
        .expect("fixture should convert")
        .document
}

#[test]
fn flat_json_keeps_states_at_top_level() {
    let value = render_history_json(&sample_document(), JsonStyle::Flat).expect("render");
    let keys: Vec<&str> = value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["1001", "1004"]);
    assert_eq!(value["1004"], json!({}));
}

#[test]
fn enveloped_json_wraps_state_mapping() {
    let value = render_history_json(&sample_document(), JsonStyle::Enveloped).expect("render");
    assert_eq!(value["svs-data-per-state"]["1001"]["2024-03-15"]["won-prep"], false);
    assert_eq!(value.as_object().map(|o| o.len()), Some(1));
}

#[test]
fn dates_keep_input_column_order() {
    let value = render_history_json(&sample_document(), JsonStyle::Flat).expect("render");
    let dates: Vec<&str> = value["1001"]
        .as_object()
        .expect("history should be an object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(dates, vec!["2024-03-22", "2024-03-15"]);
}

#[test]
fn pretty_output_uses_four_space_indent() {
    let text = to_pretty_string(&json!({"1001": {"2024-03-15": {"won-prep": true}}}))
        .expect("render");
    assert_eq!(
        text,
        "{\n    \"1001\": {\n        \"2024-03-15\": {\n            \"won-prep\": true\n        }\n    }\n}\n"
    );
}

#[test]
fn outcome_fields_render_in_declaration_order() {
    let text = to_pretty_string(&sample_document()).expect("render");
    let opposition = text.find("\"opposition-state\"").expect("field present");
    let had_match = text.find("\"had-svs-match\"").expect("field present");
    assert!(opposition < had_match);
}

#[test]
fn written_file_reads_back_identically() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("history.json");
    let value = render_history_json(&sample_document(), JsonStyle::Enveloped).expect("render");

    write_json_file(&path, &value).expect("write");
    let back: Value = read_json_file(&path).expect("read");
    assert_eq!(back, value);
}

#[test]
fn non_ascii_state_names_render_unchanged() {
    let text = to_pretty_string(&json!({"État 1001": {}})).expect("render");
    assert_eq!(text, "{\n    \"État 1001\": {}\n}\n");
}
