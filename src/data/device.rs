//! HTTP client for the embedded point-of-sale device.
//!
//! The device exposes two endpoints on the local network:
//!
//! - `GET /reporte`: the current day's report as JSON
//! - `GET /status`: a small health payload (sale count + status string)
//!
//! The report body is returned as a raw `serde_json::Value`: the firmware is
//! untrusted and may send partial data, so shaping is left to the normalizer.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::AppConfig;
use crate::domain::DeviceStatus;
use crate::error::AppError;

/// The device can take several seconds to assemble a report over WiFi.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct DeviceClient {
    client: Client,
    base_url: String,
}

impl DeviceClient {
    pub fn new(ip: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: format!("http://{ip}"),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(&config.device_ip)
    }

    /// Fetch the current report. The raw payload is handed to the normalizer;
    /// nothing about its shape is trusted here beyond "it parsed as JSON".
    pub fn fetch_report(&self) -> Result<Value, AppError> {
        let url = format!("{}/reporte", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AppError::new(4, format!("Failed to reach device at {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Device returned HTTP {} for {url}.", response.status()),
            ));
        }

        response
            .json::<Value>()
            .map_err(|e| AppError::new(4, format!("Invalid report JSON from device: {e}")))
    }

    /// Fetch the device health payload.
    pub fn fetch_status(&self) -> Result<DeviceStatus, AppError> {
        let url = format!("{}/status", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AppError::new(4, format!("Failed to reach device at {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Device returned HTTP {} for {url}.", response.status()),
            ));
        }

        response
            .json::<DeviceStatus>()
            .map_err(|e| AppError::new(4, format!("Invalid status JSON from device: {e}")))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_DEVICE_IP;

    #[test]
    fn base_url_is_plain_http_on_the_configured_ip() {
        let client = DeviceClient::new(DEFAULT_DEVICE_IP).unwrap();
        assert_eq!(client.base_url(), "http://192.168.1.100");
    }
}
