//! MPC-HC web interface client
//!
//! Covers the two halves of the wire protocol:
//! - status: `GET /variables.html`, scraped for `<p id="KEY">VALUE</p>` pairs
//! - control: `GET /command.html?wm_command=<id>`, and seek as
//!   `POST /command.html?wm_command=-1&position=<H:MM:SS>`
//!
//! Every request carries a hard 3 second timeout. There is no retry.

use regex::Regex;
use reqwest::{Client, StatusCode};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::adapters::commands::CommandCode;
use crate::adapters::state::{format_position, RawVariables};
use crate::error::{MpcError, Result};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

const VARIABLES_PATH: &str = "/variables.html";
const COMMAND_PATH: &str = "/command.html";

#[allow(clippy::expect_used)] // Pattern is a literal
static VARIABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<p id="(.+?)">(.+?)</p>"#).expect("valid variable regex"));

/// Extract status variables from a `variables.html` body.
///
/// Values are lowercased; the last occurrence of a key wins.
pub fn parse_variables(html: &str) -> RawVariables {
    VARIABLE_RE
        .captures_iter(html)
        .map(|cap| (cap[1].to_string(), cap[2].to_lowercase()))
        .collect()
}

/// HTTP session bound to one MPC-HC endpoint.
///
/// Owns a single `reqwest::Client` (and its connection pool) for its whole
/// lifetime; dropping the last clone releases it.
#[derive(Clone)]
pub struct MpcHcClient {
    client: Client,
    base_url: String,
}

impl MpcHcClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        #[allow(clippy::expect_used)] // Builder only fails if the TLS backend cannot initialize
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch and parse the status page.
    pub async fn fetch_variables(&self) -> Result<RawVariables> {
        let url = format!("{}{}", self.base_url, VARIABLES_PATH);
        debug!(url = %url, "MPC-HC status request");

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::REQUEST_TIMEOUT {
            return Err(MpcError::Connection(format!(
                "{} answered {}",
                url,
                response.status()
            )));
        }

        let body = response.text().await?;
        let vars = parse_variables(&body);
        debug!(count = vars.len(), variables = ?vars, "MPC-HC status");
        Ok(vars)
    }

    /// Send a `wm_command` and report transport failures.
    pub async fn command(&self, wm_command: &str) -> Result<()> {
        let url = format!("{}{}", self.base_url, COMMAND_PATH);
        debug!(url = %url, wm_command, "MPC-HC command");

        let response = self
            .client
            .get(&url)
            .query(&[("wm_command", wm_command)])
            .send()
            .await?;
        check_status(response.status())
    }

    /// Ask the player to jump to `position_secs`.
    pub async fn seek(&self, position_secs: f64) -> Result<()> {
        let url = format!("{}{}", self.base_url, COMMAND_PATH);
        let position = format_position(position_secs);
        debug!(url = %url, position = %position, "MPC-HC seek");

        let response = self
            .client
            .post(&url)
            .query(&[
                ("wm_command", CommandCode::SEEK.to_string()),
                ("position", position),
            ])
            .send()
            .await?;
        check_status(response.status())
    }
}

fn check_status(status: StatusCode) -> Result<()> {
    if status == StatusCode::REQUEST_TIMEOUT {
        return Err(MpcError::Connection(format!("player answered {}", status)));
    }
    if !status.is_success() {
        warn!("MPC-HC command answered {}", status);
    }
    Ok(())
}

pub(crate) fn log_dispatch_failure(wm_command: &str, base_url: &str, e: &MpcError) {
    if e.is_connection_failure() {
        error!(
            "Could not send command {} to MPC-HC at: {} ({})",
            wm_command, base_url, e
        );
    } else {
        error!("MPC-HC command {} failed: {}", wm_command, e);
    }
}

/// One-shot reachability check used before an endpoint is put into service.
pub async fn validate_connection(base_url: &str) -> anyhow::Result<()> {
    let client = MpcHcClient::new(base_url);
    match client.fetch_variables().await {
        Ok(_) => Ok(()),
        Err(e) if e.is_connection_failure() => {
            Err(anyhow::anyhow!("Cannot connect to MPC-HC at {}: {}", base_url, e))
        }
        Err(e) => Err(anyhow::anyhow!("Unknown error probing {}: {}", base_url, e)),
    }
}
