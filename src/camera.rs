use anyhow::Result;
use log::{debug, info};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use std::time::Duration;

use crate::config::constants;
use crate::poller::OsdSink;
use crate::status::PrinterStatus;

/// Path and fixed query of the camera's configuration endpoint. The OSD text
/// is appended as the value of the second custom title of video widget 0.
const SET_TITLE_PATH: &str =
    "/cgi-bin/configManager.cgi?action=setConfig&VideoWidget[0].CustomTitle[1].Text=";

/// Camera OSD service for pushing custom title text.
///
/// Talks to the camera's `configManager.cgi` endpoint, authenticating with
/// the configured user and password on every call.
pub struct CameraService {
    pub base_url: String,
    user: String,
    password: String,
    client: reqwest::blocking::Client,
}

impl CameraService {
    /// Create a new CameraService.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the camera (e.g., "http://192.168.1.64:80")
    /// * `user` - Camera user name
    /// * `password` - Camera password
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: String, user: String, password: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(constants::REQUEST_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            base_url,
            user,
            password,
            client,
        })
    }

    /// Full request URL for the given, already encoded, OSD text.
    pub fn set_text_url(&self, osd_text: &str) -> String {
        format!("{}{}{}", self.base_url, SET_TITLE_PATH, osd_text)
    }

    /// Set the camera's custom OSD title.
    ///
    /// `osd_text` must already be in the camera's wire format: percent-encoded
    /// lines joined with `|`. The request is first sent without credentials;
    /// on a 401 it is repeated with digest auth when the camera offers a
    /// digest challenge, and with basic auth otherwise. Returns the camera's
    /// response body.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The HTTP request fails or times out
    /// - The digest challenge cannot be answered
    /// - The camera returns an error status (e.g. bad credentials)
    pub fn set_text(&self, osd_text: &str) -> Result<String> {
        let url = self.set_text_url(osd_text);
        let mut response = self.client.get(&url).send()?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let challenge = response
                .headers()
                .get_all(WWW_AUTHENTICATE)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .find(|value| is_digest_challenge(value))
                .map(str::to_owned);

            let request = self.client.get(&url);
            response = match challenge {
                Some(challenge) => {
                    debug!("Camera requested digest auth");
                    let uri = request_uri(&url)?;
                    let authorization =
                        digest_authorization(&challenge, &self.user, &self.password, &uri)?;
                    request.header(AUTHORIZATION, authorization).send()?
                }
                None => {
                    debug!("Camera requested basic auth");
                    request.basic_auth(&self.user, Some(&self.password)).send()?
                }
            };
        }

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to set camera OSD text: HTTP {}",
                response.status()
            ));
        }

        Ok(response.text()?)
    }

    /// Push a placeholder title to check that the camera is reachable and
    /// accepts the credentials.
    pub fn test_connection(&self) -> Result<String> {
        self.set_text(constants::TEST_CONNECT_TEXT)
    }
}

impl OsdSink for CameraService {
    fn push(&mut self, _status: &PrinterStatus, osd_text: &str) -> Result<()> {
        let reply = self.set_text(osd_text)?;
        info!("Camera replied: {}", reply.trim());
        Ok(())
    }
}

/// Answer a `WWW-Authenticate: Digest ...` challenge for a GET of `uri`
/// (path and query), returning the `Authorization` header value.
pub fn digest_authorization(challenge: &str, user: &str, password: &str, uri: &str) -> Result<String> {
    let mut prompt = digest_auth::parse(challenge)
        .map_err(|e| anyhow::anyhow!("Invalid digest challenge '{}': {}", challenge, e))?;
    let context = digest_auth::AuthContext::new(user, password, uri);
    let answer = prompt
        .respond(&context)
        .map_err(|e| anyhow::anyhow!("Failed to answer digest challenge: {}", e))?;
    Ok(answer.to_header_string())
}

fn is_digest_challenge(value: &str) -> bool {
    value
        .trim_start()
        .get(..6)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("digest"))
}

fn request_uri(url: &str) -> Result<String> {
    let url = reqwest::Url::parse(url)?;
    Ok(match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    })
}
