use anyhow::Result;
use log::{debug, warn};
use std::time::Duration;

use crate::config::constants;
use crate::poller::StatusSource;

/// Read-only client for the OctoPrint REST API.
///
/// Fetches the job and printer status documents as raw text. Failures are
/// logged and reported as an empty body, which the status parser treats as
/// "nothing new", so a flaky connection only leaves stale values on screen.
pub struct PrinterService {
    pub api_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl PrinterService {
    /// Create a new PrinterService for the given OctoPrint base URL.
    ///
    /// # Arguments
    ///
    /// * `api_url` - Base URL of the OctoPrint server (e.g., "http://octopi.local:80")
    /// * `api_key` - OctoPrint API key, sent as the `apikey` query parameter
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_url: String, api_key: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(constants::REQUEST_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            api_url,
            api_key,
            client,
        })
    }

    /// URL of the job status endpoint, including the API key.
    pub fn job_url(&self) -> String {
        format!("{}/api/job?apikey={}", self.api_url, self.api_key)
    }

    /// URL of the printer status endpoint, including the API key.
    pub fn printer_url(&self) -> String {
        format!("{}/api/printer?apikey={}", self.api_url, self.api_key)
    }

    /// Get the current job status document, or an empty string on failure.
    pub fn get_job_status(&self) -> String {
        self.get_or_empty(&self.job_url(), "job")
    }

    /// Get the current printer (temperature) status document, or an empty
    /// string on failure.
    pub fn get_printer_status(&self) -> String {
        self.get_or_empty(&self.printer_url(), "printer")
    }

    fn get_or_empty(&self, url: &str, what: &str) -> String {
        match self.get_text(url) {
            Ok(body) => {
                debug!("Fetched {} status ({} bytes)", what, body.len());
                body
            }
            Err(e) => {
                warn!("Failed to get {} status: {}", what, e);
                String::new()
            }
        }
    }

    fn get_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send()?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "HTTP request failed with status: {}",
                response.status()
            ));
        }

        Ok(response.text()?)
    }
}

impl StatusSource for PrinterService {
    fn job(&mut self) -> Result<String> {
        Ok(self.get_job_status())
    }

    fn printer(&mut self) -> Result<String> {
        Ok(self.get_printer_status())
    }
}
