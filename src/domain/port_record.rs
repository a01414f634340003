use serde::{Deserialize, Serialize};

/// One observed port binding, as rendered in the dashboard table.
///
/// Every field is kept textual on purpose: values arrive from CSV files and
/// from the backend snapshot and are displayed verbatim (a `port` of `"080"`
/// keeps its leading zero). An empty `docker_container` means the port belongs
/// to a plain host process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortRecord {
    pub protocol: String,
    pub state: String,
    pub local_address: String,
    pub port: String,
    pub pid: String,
    pub process: String,
    pub docker_container: String,
}

impl PortRecord {
    /// Fallback values substituted for fields missing from input.
    pub const DEFAULT_PROTOCOL: &'static str = "TCP";
    pub const DEFAULT_STATE: &'static str = "UNKNOWN";
    pub const DEFAULT_LOCAL_ADDRESS: &'static str = "0.0.0.0";
    pub const DEFAULT_PORT: &'static str = "0";
    pub const DEFAULT_PID: &'static str = "0";
    pub const DEFAULT_PROCESS: &'static str = "unknown";
    pub const DEFAULT_DOCKER_CONTAINER: &'static str = "";

    /// Value of the field selected by `key`.
    pub fn field(&self, key: SortKey) -> &str {
        match key {
            SortKey::Protocol => &self.protocol,
            SortKey::State => &self.state,
            SortKey::LocalAddress => &self.local_address,
            SortKey::Port => &self.port,
            SortKey::Pid => &self.pid,
            SortKey::Process => &self.process,
            SortKey::DockerContainer => &self.docker_container,
        }
    }

    /// Whether the record resolved to the `"unknown"` process sentinel.
    ///
    /// The CSV import drops such rows, whether `unknown` was spelled out in
    /// the file or synthesized as the default for a missing column. Backend
    /// loads keep them.
    pub fn is_unknown_process(&self) -> bool {
        self.process == Self::DEFAULT_PROCESS
    }
}

impl Default for PortRecord {
    fn default() -> Self {
        Self {
            protocol: Self::DEFAULT_PROTOCOL.to_string(),
            state: Self::DEFAULT_STATE.to_string(),
            local_address: Self::DEFAULT_LOCAL_ADDRESS.to_string(),
            port: Self::DEFAULT_PORT.to_string(),
            pid: Self::DEFAULT_PID.to_string(),
            process: Self::DEFAULT_PROCESS.to_string(),
            docker_container: Self::DEFAULT_DOCKER_CONTAINER.to_string(),
        }
    }
}

/// Column selector for sorting, one per table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Protocol,
    State,
    LocalAddress,
    Port,
    Pid,
    Process,
    DockerContainer,
}
