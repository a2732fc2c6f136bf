/// Collaborator boundaries onto the workspace registry and runtime layer.
use async_trait::async_trait;

use super::environment::Environment;
use super::Workspace;
use crate::error::UsageResult;

/// Read-only view of the workspace registry.
#[async_trait]
pub trait WorkspaceRegistry: Send + Sync {
    /// Lists workspaces registered under a namespace, offset-paginated.
    ///
    /// `include_runtime` asks the registry to attach materialized runtime
    /// state to the returned records. Callers must keep fetching until a
    /// short or empty page comes back.
    async fn list_by_namespace(
        &self,
        namespace: &str,
        include_runtime: bool,
        max_items: usize,
        skip_count: usize,
    ) -> UsageResult<Vec<Workspace>>;
}

/// In-progress startup context of a workspace.
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    /// Environment the runtime is being built from.
    pub environment: Environment,
}

/// Tracks runtimes that are still being prepared.
#[async_trait]
pub trait RuntimeContextTracker: Send + Sync {
    /// Returns `None` when the workspace holds no startup context, e.g. it
    /// stopped since it was listed.
    async fn runtime_context(&self, workspace_id: &str) -> UsageResult<Option<RuntimeContext>>;
}
