/// RAM usage tracking across an account's active workspaces.
use std::sync::Arc;

use async_trait::async_trait;
use futures::{pin_mut, TryStreamExt};

use crate::account::AccountStore;
use crate::error::{UsageError, UsageResult};
use crate::resource::{ResourceKind, ResourceUsage, UsageTracker};
use crate::usage::calculator::EnvironmentRamCalculator;
use crate::utils::pages;
use crate::workspace::registry::{RuntimeContextTracker, WorkspaceRegistry};
use crate::workspace::{Workspace, WorkspaceStatus};

/// Tracks the RAM currently committed by an account's non-stopped
/// workspaces.
///
/// Workspaces that are still starting are charged from their declared
/// environment; materialized workspaces from their runtime machines. One
/// invocation performs a sequential scan; there is no caching and no shared
/// mutable state, so concurrent invocations are safe.
pub struct RamUsageTracker {
    accounts: Arc<dyn AccountStore>,
    workspaces: Arc<dyn WorkspaceRegistry>,
    runtimes: Arc<dyn RuntimeContextTracker>,
    calculator: EnvironmentRamCalculator,
    page_size: usize,
}

impl RamUsageTracker {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        workspaces: Arc<dyn WorkspaceRegistry>,
        runtimes: Arc<dyn RuntimeContextTracker>,
        calculator: EnvironmentRamCalculator,
    ) -> Self {
        Self {
            accounts,
            workspaces,
            runtimes,
            calculator,
            page_size: pages::DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the page size used when enumerating workspaces.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    async fn workspace_ram_mb(&self, workspace: &Workspace) -> UsageResult<u64> {
        match workspace.status {
            // Filtered out before this point; a stopped workspace holds no
            // runtime to charge for.
            WorkspaceStatus::Stopped => Ok(0),
            WorkspaceStatus::Starting => {
                match self.runtimes.runtime_context(&workspace.id).await? {
                    Some(context) => self.calculator.calculate(&context.environment).await,
                    None => {
                        // Stopped between listing and lookup; nothing to charge.
                        tracing::debug!(
                            "Workspace {} lost its runtime context, counting 0 MB",
                            workspace.id
                        );
                        Ok(0)
                    }
                }
            }
            // TODO: read observed RAM from the runtime layer instead of the
            // declared machine attributes
            WorkspaceStatus::Running | WorkspaceStatus::Stopping => {
                let runtime = workspace.runtime.as_ref().ok_or_else(|| {
                    UsageError::Server(format!(
                        "Workspace {} is {} but carries no runtime",
                        workspace.id,
                        workspace.status.as_str()
                    ))
                })?;
                self.calculator.calculate_machines(&runtime.machines)
            }
        }
    }
}

#[async_trait]
impl UsageTracker for RamUsageTracker {
    fn resource_kind(&self) -> ResourceKind {
        ResourceKind::Ram
    }

    async fn get_used_resource(&self, account_id: &str) -> UsageResult<Option<ResourceUsage>> {
        let account = self.accounts.get_by_id(account_id).await?;

        let workspaces = pages::stream(
            |max_items, skip_count| {
                self.workspaces
                    .list_by_namespace(&account.name, true, max_items, skip_count)
            },
            self.page_size,
        );
        pin_mut!(workspaces);

        let mut active = Vec::new();
        while let Some(workspace) = workspaces.try_next().await? {
            if workspace.status != WorkspaceStatus::Stopped {
                active.push(workspace);
            }
        }

        let mut used_mb: u64 = 0;
        for workspace in &active {
            let ram = self.workspace_ram_mb(workspace).await?;
            tracing::debug!(
                "Workspace {} ({}) contributes {} MB",
                workspace.id,
                workspace.status.as_str(),
                ram
            );
            used_mb = used_mb.saturating_add(ram);
        }

        if used_mb > 0 {
            Ok(Some(ResourceUsage::new(ResourceKind::Ram, used_mb)))
        } else {
            Ok(None)
        }
    }
}
