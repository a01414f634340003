use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::error::{AppError, Result};
use crate::domain::port_record::PortRecord;

/// The external port-listing service. How it gathers the snapshot (netstat,
/// docker inspect, ...) is its business; this side only consumes the two
/// endpoints.
#[async_trait]
pub trait PortsBackend {
    /// `GET /api/ports`: fetch the current snapshot.
    async fn fetch_ports(&self) -> Result<Vec<PortRecord>>;

    /// `POST /api/update_ports`: ask the backend to regenerate its snapshot.
    /// The response body is unused; any non-success status is a failure.
    async fn trigger_update(&self) -> Result<()>;
}

/// One row of the backend's JSON snapshot. Keys absent from a row fall back
/// to the record defaults.
#[derive(Debug, Deserialize)]
struct BackendPortRow {
    #[serde(rename = "Protocol")]
    protocol: Option<String>,
    #[serde(rename = "State")]
    state: Option<String>,
    #[serde(rename = "Local Address")]
    local_address: Option<String>,
    #[serde(rename = "Port")]
    port: Option<String>,
    #[serde(rename = "PID")]
    pid: Option<String>,
    #[serde(rename = "Process")]
    process: Option<String>,
    #[serde(rename = "Docker Container")]
    docker_container: Option<String>,
}

impl From<BackendPortRow> for PortRecord {
    fn from(row: BackendPortRow) -> Self {
        PortRecord {
            protocol: row
                .protocol
                .unwrap_or_else(|| PortRecord::DEFAULT_PROTOCOL.to_string()),
            state: row
                .state
                .unwrap_or_else(|| PortRecord::DEFAULT_STATE.to_string()),
            local_address: row
                .local_address
                .unwrap_or_else(|| PortRecord::DEFAULT_LOCAL_ADDRESS.to_string()),
            port: row.port.unwrap_or_else(|| PortRecord::DEFAULT_PORT.to_string()),
            pid: row.pid.unwrap_or_else(|| PortRecord::DEFAULT_PID.to_string()),
            process: row
                .process
                .unwrap_or_else(|| PortRecord::DEFAULT_PROCESS.to_string()),
            docker_container: row
                .docker_container
                .unwrap_or_else(|| PortRecord::DEFAULT_DOCKER_CONTAINER.to_string()),
        }
    }
}

pub struct HttpPortsBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPortsBackend {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl PortsBackend for HttpPortsBackend {
    async fn fetch_ports(&self) -> Result<Vec<PortRecord>> {
        let url = self.endpoint("api/ports");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::NetworkError(format!(
                "Backend error ({}): {}",
                status, text
            )));
        }

        let rows: Vec<BackendPortRow> = response
            .json()
            .await
            .map_err(|e| AppError::NetworkError(format!("Failed to parse JSON: {}", e)))?;

        Ok(rows.into_iter().map(PortRecord::from).collect())
    }

    async fn trigger_update(&self) -> Result<()> {
        let url = self.endpoint("api/update_ports");

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::NetworkError(format!(
                "Backend error ({}): {}",
                status, text
            )));
        }

        Ok(())
    }
}
