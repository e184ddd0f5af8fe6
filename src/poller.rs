use anyhow::{Context, Result};
use log::{debug, error, info};
use std::{thread, time::Duration};

use crate::status::PrinterStatus;

/// Where the raw OctoPrint payloads come from.
///
/// Implemented by [`crate::PrinterService`] for a live server and by
/// [`crate::MockSource`] for fixture files.
pub trait StatusSource {
    /// Raw body of the job endpoint. An empty string means "no data".
    fn job(&mut self) -> Result<String>;

    /// Raw body of the printer endpoint. An empty string means "no data".
    fn printer(&mut self) -> Result<String>;
}

/// Where the rendered OSD text goes.
///
/// Implemented by [`crate::CameraService`] for a live camera and by
/// [`crate::ConsoleSink`] for mock mode.
pub trait OsdSink {
    fn push(&mut self, status: &PrinterStatus, osd_text: &str) -> Result<()>;
}

/// Fixed-tick poll loop driving source → status → sink.
///
/// Owns the one status record that lives for the whole process. A failed
/// cycle is logged and skipped; the record keeps whatever was merged before
/// the failure.
pub struct Poller<S, K> {
    source: S,
    sink: K,
    status: PrinterStatus,
    interval_seconds: u64,
    ticks: u64,
}

impl<S: StatusSource, K: OsdSink> Poller<S, K> {
    /// Create a poller that runs a cycle every `interval_seconds` ticks.
    pub fn new(source: S, sink: K, interval_seconds: u64) -> Self {
        Self {
            source,
            sink,
            status: PrinterStatus::new(),
            interval_seconds: interval_seconds.max(1),
            ticks: 0,
        }
    }

    /// Run one poll cycle and return the OSD text that was pushed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A source cannot produce a payload (mock fixtures missing)
    /// - A payload cannot be merged into the status record
    /// - The sink rejects the rendered text
    pub fn run_cycle(&mut self) -> Result<String> {
        let job = self.source.job().context("Failed to fetch job status")?;
        self.status
            .parse(&job)
            .context("Failed to parse job status")?;

        let printer = self
            .source
            .printer()
            .context("Failed to fetch printer status")?;
        self.status
            .parse(&printer)
            .context("Failed to parse printer status")?;

        debug!("Current status: {}", self.status);

        let osd_text = self.status.render();
        self.sink
            .push(&self.status, &osd_text)
            .context("Failed to push OSD text")?;

        Ok(osd_text)
    }

    /// Run one poll cycle, logging instead of returning any error.
    ///
    /// Returns `true` when the cycle succeeded.
    pub fn run_cycle_logged(&mut self) -> bool {
        match self.run_cycle() {
            Ok(osd_text) => {
                debug!("Pushed OSD text: {}", osd_text);
                true
            }
            Err(e) => {
                error!("Poll cycle failed: {:#}", e);
                false
            }
        }
    }

    /// Advance the coarse one-second timer by one tick.
    ///
    /// Runs a cycle once `interval_seconds` ticks have accumulated and
    /// returns its outcome, or `None` when no cycle was due.
    pub fn tick(&mut self) -> Option<bool> {
        self.ticks += 1;
        if self.ticks >= self.interval_seconds {
            self.ticks = 0;
            Some(self.run_cycle_logged())
        } else {
            None
        }
    }

    /// Run the poll loop forever: one cycle immediately, then one every
    /// interval. Overrun cycles are not made up.
    pub fn run(&mut self) -> ! {
        info!(
            "Starting poll loop with an interval of {} seconds",
            self.interval_seconds
        );
        self.run_cycle_logged();

        loop {
            thread::sleep(Duration::from_secs(1));
            self.tick();
        }
    }

    /// The current merged status record.
    pub fn status(&self) -> &PrinterStatus {
        &self.status
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Get the configured interval in seconds.
    pub fn get_interval_seconds(&self) -> u64 {
        self.interval_seconds
    }
}
