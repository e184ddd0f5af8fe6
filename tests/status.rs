use print_osd::status::{format_job_date, format_print_time};
use print_osd::{PrinterStatus, StatusError};

const JOB: &str = r#"{
    "job": {"file": {"name": "benchy.gcode", "date": 1700000000}},
    "progress": {"completion": 42.5, "printTime": 5025},
    "state": "Printing"
}"#;

const PRINTER: &str = r#"{
    "temperature": {
        "bed": {"actual": 60.1, "target": 60.0},
        "tool0": {"actual": 200.3, "target": 200.0}
    },
    "state": {"text": "Printing"}
}"#;

const MERGED: &str = r#"{
    "job": {"file": {"name": "benchy.gcode", "date": 1700000000}},
    "progress": {"completion": 42.5, "printTime": 5025},
    "state": "Printing",
    "temperature": {
        "bed": {"actual": 60.1, "target": 60.0},
        "tool0": {"actual": 200.3, "target": 200.0}
    }
}"#;

fn reference_status() -> PrinterStatus {
    PrinterStatus {
        state: "Printing".to_string(),
        completion: 42.5,
        bed_actual: 60.1,
        bed_target: 60.0,
        tool_actual: 200.3,
        tool_target: 200.0,
        print_time_text: "01:23:45".to_string(),
        ..PrinterStatus::default()
    }
}

#[test]
fn test_new_status_defaults() {
    let status = PrinterStatus::new();
    assert_eq!(status.state, "N/A");
    assert_eq!(status.completion, 0.0);
    assert_eq!(status.print_time_seconds, 0);
    assert_eq!(status.print_time_text, "");
    assert_eq!(status.job_date_epoch, 0);
    assert_eq!(status.job_date_text, "");
}

#[test]
fn test_parse_job_payload() {
    let mut status = PrinterStatus::new();
    status.parse(JOB).unwrap();

    assert_eq!(status.state, "Printing");
    assert_eq!(status.completion, 42.5);
    assert_eq!(status.print_time_seconds, 5025);
    assert_eq!(status.print_time_text, "01:23:45");
    assert_eq!(status.job_date_epoch, 1700000000);
    assert_eq!(
        Some(status.job_date_text.clone()),
        format_job_date(1700000000)
    );
    // temperatures untouched
    assert_eq!(status.bed_actual, 0.0);
    assert_eq!(status.tool_target, 0.0);
}

#[test]
fn test_parse_printer_payload() {
    let mut status = PrinterStatus::new();
    status.parse(PRINTER).unwrap();

    assert_eq!(status.bed_actual, 60.1);
    assert_eq!(status.bed_target, 60.0);
    assert_eq!(status.tool_actual, 200.3);
    assert_eq!(status.tool_target, 200.0);
    // no `job` key, so the state object is ignored
    assert_eq!(status.state, "N/A");
}

#[test]
fn test_merge_is_order_independent() {
    let mut job_first = PrinterStatus::new();
    job_first.parse(JOB).unwrap();
    job_first.parse(PRINTER).unwrap();

    let mut printer_first = PrinterStatus::new();
    printer_first.parse(PRINTER).unwrap();
    printer_first.parse(JOB).unwrap();

    let mut merged = PrinterStatus::new();
    merged.parse(MERGED).unwrap();

    assert_eq!(job_first, merged);
    assert_eq!(printer_first, merged);
}

#[test]
fn test_absent_fields_keep_previous_values() {
    let mut status = PrinterStatus::new();
    status.parse(JOB).unwrap();
    status.parse(PRINTER).unwrap();

    status
        .parse(r#"{"job": {}, "state": "Operational"}"#)
        .unwrap();

    assert_eq!(status.state, "Operational");
    assert_eq!(status.completion, 42.5);
    assert_eq!(status.print_time_seconds, 5025);
    assert_eq!(status.job_date_epoch, 1700000000);
    assert_eq!(status.bed_actual, 60.1);
}

#[test]
fn test_null_job_fields_are_skipped() {
    let mut status = PrinterStatus::new();
    status.parse(JOB).unwrap();

    let idle = r#"{
        "job": {"file": {"name": null, "date": null}},
        "progress": {"completion": null, "printTime": null},
        "state": "Operational"
    }"#;
    status.parse(idle).unwrap();

    assert_eq!(status.state, "Operational");
    assert_eq!(status.completion, 42.5);
    assert_eq!(status.print_time_seconds, 5025);
    assert_eq!(status.print_time_text, "01:23:45");
}

#[test]
fn test_parse_empty_is_noop() {
    let mut status = PrinterStatus::new();
    status.parse("").unwrap();
    assert_eq!(status, PrinterStatus::new());

    status.parse(MERGED).unwrap();
    let before = status.clone();
    status.parse("").unwrap();
    assert_eq!(status, before);
}

#[test]
fn test_parse_malformed_json_fails_without_changes() {
    let mut status = PrinterStatus::new();
    status.parse(JOB).unwrap();
    let before = status.clone();

    let err = status.parse("{\"job\": ").unwrap_err();
    assert!(matches!(err, StatusError::MalformedJson { .. }));
    assert_eq!(status, before);

    assert!(status.parse("not json at all").is_err());
    assert_eq!(status, before);
}

#[test]
fn test_partial_temperature_is_an_error() {
    let mut status = PrinterStatus::new();
    status.parse(PRINTER).unwrap();
    let before = status.clone();

    let partial = r#"{
        "temperature": {
            "bed": {"actual": 99.0, "target": 100.0},
            "tool0": {"actual": 180.0}
        }
    }"#;

    match status.parse(partial) {
        Err(StatusError::MissingField { path }) => {
            assert_eq!(path, "temperature.tool0.target");
        }
        other => panic!("expected a missing field error, got {:?}", other),
    }
    // bed values from the rejected payload were not applied
    assert_eq!(status, before);
}

#[test]
fn test_combined_payload_with_bad_temperature_changes_nothing() {
    let combined = r#"{
        "job": {"file": {"date": 1700000000}},
        "progress": {"completion": 50.0, "printTime": 100},
        "state": "Printing",
        "temperature": {"bed": {"actual": 60.0, "target": 60.0}}
    }"#;

    let mut status = PrinterStatus::new();
    assert!(status.parse(combined).is_err());
    assert_eq!(status, PrinterStatus::new());

    status.parse(MERGED).unwrap();
    let before = status.clone();
    assert!(status.parse(combined).is_err());
    assert_eq!(status, before);
    assert_eq!(status.print_time_text, format_print_time(status.print_time_seconds));
}

#[test]
fn test_missing_tool_object_is_an_error() {
    let mut status = PrinterStatus::new();
    let err = status
        .parse(r#"{"temperature": {"bed": {"actual": 20.0, "target": 0.0}}}"#)
        .unwrap_err();
    assert!(err.to_string().contains("temperature.tool0.actual"));
}

#[test]
fn test_print_time_text() {
    assert_eq!(format_print_time(3661), "01:01:01");
    assert_eq!(format_print_time(59), "00:00:59");
    assert_eq!(format_print_time(5025), "01:23:45");
    assert_eq!(format_print_time(360000), "100:00:00");

    let mut status = PrinterStatus::new();
    status
        .parse(r#"{"job": {}, "progress": {"printTime": 0}}"#)
        .unwrap();
    assert_eq!(status.print_time_text, "");

    status
        .parse(r#"{"job": {}, "progress": {"printTime": 3661}}"#)
        .unwrap();
    assert_eq!(status.print_time_text, "01:01:01");

    // a zero elapsed time keeps the last text
    status
        .parse(r#"{"job": {}, "progress": {"printTime": 0}}"#)
        .unwrap();
    assert_eq!(status.print_time_seconds, 0);
    assert_eq!(status.print_time_text, "01:01:01");
}

#[test]
fn test_render_reference_status() {
    let expected = [
        "State%3A%20Printing",
        "Progress%3A%2042.50%20%25",
        "Bed%3A%2060.1%20%C2%B0C%20%2860.0%20%C2%B0C%29",
        "Tool%3A%20200.3%20%C2%B0C%20%28200.0%20%C2%B0C%29",
        "Print%20Time%3A%2001%3A23%3A45",
    ]
    .join("|");

    assert_eq!(reference_status().render(), expected);
}

#[test]
fn test_render_segments_decode_to_lines() {
    let mut odd = reference_status();
    odd.state = "Offline | Error: 100% / done?".to_string();
    odd.completion = 99.999;
    odd.bed_actual = -1.25;

    for status in [PrinterStatus::new(), reference_status(), odd] {
        let rendered = status.render();
        let segments: Vec<&str> = rendered.split('|').collect();
        assert_eq!(segments.len(), 5);

        for (segment, line) in segments.iter().zip(status.osd_lines().iter()) {
            assert!(!segment.contains(' '));
            assert_eq!(
                percent_encoding::percent_decode_str(segment)
                    .decode_utf8()
                    .unwrap(),
                line.as_str()
            );
        }
    }
}

#[test]
fn test_render_keeps_slash_unescaped() {
    let rendered = PrinterStatus::new().render();
    assert!(rendered.starts_with("State%3A%20N/A|"));

    let mut status = reference_status();
    status.state = "Offline after error: a/b ~x_y-z.".to_string();
    assert!(
        status
            .render()
            .starts_with("State%3A%20Offline%20after%20error%3A%20a/b%20~x_y-z.|")
    );
}

#[test]
fn test_render_default_status() {
    let lines = PrinterStatus::new().osd_lines();
    assert_eq!(lines[0], "State: N/A");
    assert_eq!(lines[1], "Progress: 0.00 %");
    assert_eq!(lines[2], "Bed: 0.0 \u{b0}C (0.0 \u{b0}C)");
    assert_eq!(lines[3], "Tool: 0.0 \u{b0}C (0.0 \u{b0}C)");
    assert_eq!(lines[4], "Print Time: ");
}
