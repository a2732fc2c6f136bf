/// Account model and lookup boundary.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::UsageResult;

/// Billing and quota boundary owning zero or more workspaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    /// Namespace under which the account's workspaces are registered.
    pub name: String,
}

/// Read-only account lookup.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with [`crate::error::UsageError::NotFound`] for an unknown id.
    async fn get_by_id(&self, account_id: &str) -> UsageResult<Account>;
}
