use std::fmt;

use chrono::{Local, TimeZone};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

use crate::error::StatusError;

/// Bytes escaped in an OSD line: everything except `A-Za-z0-9-_.~/`.
const OSD_LINE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Latest known printer status, merged from the OctoPrint job and printer
/// payloads.
///
/// The two API calls populate disjoint subsets of this record. Each parse
/// only touches the fields present in its payload, so the record always
/// holds a composite "latest known" view that [`PrinterStatus::render`] can
/// turn into camera OSD text.
#[derive(Debug, Clone, PartialEq)]
pub struct PrinterStatus {
    /// Printer state as reported by the job endpoint (e.g. "Printing").
    pub state: String,

    /// Job completion in percent.
    pub completion: f64,

    /// Elapsed print time in seconds.
    pub print_time_seconds: u64,

    /// Elapsed print time as `HH:MM:SS`, derived from `print_time_seconds`.
    pub print_time_text: String,

    /// Bed temperature in °C.
    pub bed_actual: f64,

    /// Bed target temperature in °C.
    pub bed_target: f64,

    /// Hotend (tool0) temperature in °C.
    pub tool_actual: f64,

    /// Hotend (tool0) target temperature in °C.
    pub tool_target: f64,

    /// Upload date of the job file as a unix timestamp.
    pub job_date_epoch: i64,

    /// Local-time rendering of `job_date_epoch`.
    pub job_date_text: String,
}

impl Default for PrinterStatus {
    fn default() -> Self {
        Self {
            state: "N/A".to_string(),
            completion: 0.0,
            print_time_seconds: 0,
            print_time_text: String::new(),
            bed_actual: 0.0,
            bed_target: 0.0,
            tool_actual: 0.0,
            tool_target: 0.0,
            job_date_epoch: 0,
            job_date_text: String::new(),
        }
    }
}

impl PrinterStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a raw payload from either OctoPrint endpoint into the record.
    ///
    /// An empty payload (failed HTTP call) leaves the record untouched. A
    /// payload with a `job` key updates the job fields that are present; a
    /// payload with a `temperature` key must carry all four bed/tool values.
    /// Derived text fields are refreshed afterwards in every case.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The payload is not valid JSON
    /// - A `temperature` object lacks one of its bed/tool actual/target values
    ///
    /// On error the record is left as it was before the call.
    pub fn parse(&mut self, raw: &str) -> Result<(), StatusError> {
        if !raw.is_empty() {
            let payload: Value = serde_json::from_str(raw)?;

            // Validate the strict part before writing anything.
            let temperatures = match payload.get("temperature") {
                Some(_) => Some(Temperatures::read(&payload)?),
                None => None,
            };

            if payload.get("job").is_some() {
                self.apply_job(&payload);
            }
            if let Some(temperatures) = temperatures {
                self.bed_actual = temperatures.bed_actual;
                self.bed_target = temperatures.bed_target;
                self.tool_actual = temperatures.tool_actual;
                self.tool_target = temperatures.tool_target;
            }
        }

        self.update_derived();
        Ok(())
    }

    fn apply_job(&mut self, payload: &Value) {
        if let Some(state) = payload.get("state").and_then(Value::as_str) {
            self.state = state.to_string();
        }
        if let Some(completion) = payload.pointer("/progress/completion").and_then(Value::as_f64) {
            self.completion = completion;
        }
        if let Some(print_time) = payload.pointer("/progress/printTime").and_then(as_seconds) {
            self.print_time_seconds = print_time;
        }
        if let Some(date) = payload.pointer("/job/file/date").and_then(as_epoch) {
            self.job_date_epoch = date;
        }
    }

    /// Recompute `print_time_text` and `job_date_text` from their sources.
    ///
    /// Zero sources leave the previous text in place.
    pub fn update_derived(&mut self) {
        if self.print_time_seconds > 0 {
            self.print_time_text = format_print_time(self.print_time_seconds);
        }
        if self.job_date_epoch > 0 {
            if let Some(text) = format_job_date(self.job_date_epoch) {
                self.job_date_text = text;
            }
        }
    }

    /// The five OSD lines in display order, before encoding.
    pub fn osd_lines(&self) -> [String; 5] {
        [
            format!("State: {}", self.state),
            format!("Progress: {:.2} %", self.completion),
            format!(
                "Bed: {:.1} \u{b0}C ({:.1} \u{b0}C)",
                self.bed_actual, self.bed_target
            ),
            format!(
                "Tool: {:.1} \u{b0}C ({:.1} \u{b0}C)",
                self.tool_actual, self.tool_target
            ),
            format!("Print Time: {}", self.print_time_text),
        ]
    }

    /// Render the record in the camera's custom-title syntax: each line
    /// percent-encoded on its own, joined with a literal `|`.
    pub fn render(&self) -> String {
        self.osd_lines()
            .iter()
            .map(|line| utf8_percent_encode(line, OSD_LINE).to_string())
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl fmt::Display for PrinterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "state={} completion={:.2}% print_time={}s ({}) bed={:.1}/{:.1} tool={:.1}/{:.1} job_date={} ({})",
            self.state,
            self.completion,
            self.print_time_seconds,
            self.print_time_text,
            self.bed_actual,
            self.bed_target,
            self.tool_actual,
            self.tool_target,
            self.job_date_epoch,
            self.job_date_text
        )
    }
}

/// Bed and tool0 readings of a printer payload; all four are required.
struct Temperatures {
    bed_actual: f64,
    bed_target: f64,
    tool_actual: f64,
    tool_target: f64,
}

impl Temperatures {
    fn read(payload: &Value) -> Result<Self, StatusError> {
        Ok(Self {
            bed_actual: required_f64(payload, "/temperature/bed/actual")?,
            bed_target: required_f64(payload, "/temperature/bed/target")?,
            tool_actual: required_f64(payload, "/temperature/tool0/actual")?,
            tool_target: required_f64(payload, "/temperature/tool0/target")?,
        })
    }
}

/// Format elapsed seconds as zero-padded `HH:MM:SS`.
pub fn format_print_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds / 60) % 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Format a unix timestamp as local time, `YYYY-MM-DD HH:MM:SS`.
///
/// Returns `None` for timestamps chrono cannot represent.
pub fn format_job_date(epoch: i64) -> Option<String> {
    Local
        .timestamp_opt(epoch, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

fn required_f64(payload: &Value, path: &str) -> Result<f64, StatusError> {
    payload
        .pointer(path)
        .and_then(Value::as_f64)
        .ok_or_else(|| StatusError::MissingField {
            path: path.trim_start_matches('/').replace('/', "."),
        })
}

// OctoPrint reports integers, but tolerate a fractional value.
fn as_seconds(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.floor() as u64)
    })
}

fn as_epoch(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|v| v.is_finite()).map(|v| v.floor() as i64))
}
