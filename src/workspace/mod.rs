// Workspace model shared by the usage core and its collaborators.
pub mod environment;
pub mod registry;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Attribute carrying a machine's memory limit in bytes, string-encoded.
pub const MEMORY_LIMIT_ATTRIBUTE: &str = "memory_limit_bytes";

/// Lifecycle states a workspace moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkspaceStatus {
    /// No runtime exists for the workspace.
    Stopped,
    /// A runtime is being prepared; only the declared environment is known.
    Starting,
    /// Runtime is live with materialized machines.
    Running,
    /// Runtime is being torn down; machines are still materialized.
    Stopping,
}

impl WorkspaceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
        }
    }
}

/// One container/process instance observed by the runtime layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub attributes: HashMap<String, String>,
}

/// Materialized runtime state of a workspace, keyed by machine name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceRuntime {
    pub machines: HashMap<String, Machine>,
}

/// Tenant-owned unit of orchestrated work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    /// Owner account name the workspace is registered under.
    pub namespace: String,
    pub status: WorkspaceStatus,
    /// Present once the runtime layer has materialized machines for the
    /// workspace; absent while stopped or still starting.
    pub runtime: Option<WorkspaceRuntime>,
}
