//! Blocking HTTP client for the Moonraker API.
//!
//! Endpoints used:
//! - `POST /printer/gcode/script?script=...` to run a G-code line
//! - `GET /server/gcode_store?count=N` for the cached console log
//!
//! See <https://moonraker.readthedocs.io/en/latest/web_api/>.

use log::{debug, warn};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::HttpConfig;
use crate::domain::entry::GcodeEntry;
use crate::error::{MoonbenchError, Result};
use crate::moonraker::client::{CommandPort, GcodeStore};

/// Blocking Moonraker API client
pub struct MoonrakerClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GcodeStoreResponse {
    result: GcodeStoreResult,
}

#[derive(Debug, Deserialize)]
struct GcodeStoreResult {
    gcode_store: Vec<GcodeEntry>,
}

impl MoonrakerClient {
    /// Create a client for `printer` (an IP or zeroconf name like
    /// `mainsailos.local`).
    pub fn new(printer: &str, http: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(http.connect_timeout())
            .timeout(http.read_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: format!("http://{printer}"),
        })
    }

    fn map_transport_error(&self, what: &str, e: reqwest::Error) -> MoonbenchError {
        if e.is_timeout() {
            MoonbenchError::RemoteTimeout(format!("{what} against {}", self.base_url))
        } else {
            MoonbenchError::Http(e)
        }
    }
}

impl CommandPort for MoonrakerClient {
    fn run_gcode(&self, script: &str) -> Result<()> {
        debug!("run_gcode: {script}");

        let response = self
            .client
            .post(format!("{}/printer/gcode/script", self.base_url))
            .query(&[("script", script)])
            .send()
            .map_err(|e| self.map_transport_error("POST /printer/gcode/script", e))?;

        // Moonraker is known to answer 200 after exactly one minute for
        // still-running commands, and other non-2xx codes can show up in the
        // same ambiguous window. Tolerate and log them rather than failing.
        if !response.status().is_success() {
            warn!(
                "gcode script `{script}` returned HTTP {}; continuing",
                response.status()
            );
        }
        Ok(())
    }
}

impl GcodeStore for MoonrakerClient {
    fn recent_entries(&self, count: usize) -> Result<Vec<GcodeEntry>> {
        debug!("reading last {count} gcode_store entries");

        let response = self
            .client
            .get(format!("{}/server/gcode_store", self.base_url))
            .query(&[("count", count)])
            .send()
            .map_err(|e| self.map_transport_error("GET /server/gcode_store", e))?;

        let body: GcodeStoreResponse = response
            .json()
            .map_err(|e| self.map_transport_error("GET /server/gcode_store", e))?;

        Ok(body.result.gcode_store)
    }
}
