use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::config::constants;
use crate::poller::{OsdSink, StatusSource};
use crate::status::PrinterStatus;

/// Offline status source that reads the job and printer payloads from
/// fixture files instead of OctoPrint.
pub struct MockSource {
    job_path: PathBuf,
    printer_path: PathBuf,
}

impl MockSource {
    pub fn new(job_path: PathBuf, printer_path: PathBuf) -> Self {
        Self {
            job_path,
            printer_path,
        }
    }

    /// Fixtures at their default location under `mock/`.
    pub fn from_default_fixtures() -> Self {
        Self::new(
            PathBuf::from(constants::MOCK_JOB_FILE),
            PathBuf::from(constants::MOCK_PRINTER_FILE),
        )
    }
}

impl StatusSource for MockSource {
    fn job(&mut self) -> Result<String> {
        fs::read_to_string(&self.job_path)
            .with_context(|| format!("Failed to read {}", self.job_path.display()))
    }

    fn printer(&mut self) -> Result<String> {
        fs::read_to_string(&self.printer_path)
            .with_context(|| format!("Failed to read {}", self.printer_path.display()))
    }
}

/// Sink that prints the status record and the OSD text to stdout instead of
/// calling the camera.
#[derive(Default)]
pub struct ConsoleSink;

impl OsdSink for ConsoleSink {
    fn push(&mut self, status: &PrinterStatus, osd_text: &str) -> Result<()> {
        println!("{}", status);
        println!("{}", osd_text);
        Ok(())
    }
}
