//! Client for the modern-numeral conversion service.
//!
//! The service answers `GET /api/romans/?n=<int>` with either
//! `{"result": "..."}` or `{"error": "..."}`. Anything other than a clean
//! result (transport failure, non-success status, error payload, undecodable
//! body) is reported as [`RomanError::Conversion`] so callers can tell it
//! apart from a plain out-of-range request.

use super::RomanError;
use crate::config::AppConfig;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the conversion service.
#[derive(Clone)]
pub struct RomanApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// Wire format of a conversion response.
#[derive(Debug, Deserialize)]
struct ConversionResponse {
    result: Option<String>,
    error: Option<String>,
}

impl RomanApiClient {
    /// Build a client from configuration.
    pub fn new(config: &AppConfig) -> Result<Self, RomanError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RomanError::Conversion {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Convert a number to its modern (subtractive) Roman numeral.
    ///
    /// Zero short-circuits to the literal `"0"` and out-of-range values are
    /// rejected locally; neither touches the network.
    pub async fn modern_roman(&self, input: i64) -> Result<String, RomanError> {
        if input == 0 {
            return Ok("0".to_string());
        }
        if !(1..=3999).contains(&input) {
            return Err(RomanError::OutOfRange { value: input });
        }

        let url = format!("{}/api/romans/?n={}", self.base_url, input);
        debug!(%url, "requesting modern numeral conversion");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RomanError::Conversion {
                reason: format!("request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RomanError::Conversion {
                reason: format!("service returned HTTP {status}"),
            });
        }

        let body: ConversionResponse =
            response.json().await.map_err(|e| RomanError::Conversion {
                reason: format!("invalid response body: {e}"),
            })?;

        if let Some(error) = body.error {
            return Err(RomanError::Conversion { reason: error });
        }
        body.result.ok_or_else(|| RomanError::Conversion {
            reason: "response carried neither result nor error".to_string(),
        })
    }
}
