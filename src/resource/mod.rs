/// Resource kinds and usage records surfaced to the quota layer.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::UsageResult;

/// Kinds of resources the platform accounts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Memory committed to workspace machines.
    Ram,
}

impl ResourceKind {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Ram => "RAM",
        }
    }

    /// Unit amounts of this kind are expressed in.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Ram => "mb",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Amount of one resource kind currently committed by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUsage {
    pub kind: ResourceKind,
    pub amount: u64,
    pub unit: String,
}

impl ResourceUsage {
    pub fn new(kind: ResourceKind, amount: u64) -> Self {
        Self {
            kind,
            amount,
            unit: kind.unit().to_string(),
        }
    }
}

/// Per-resource-kind usage tracker consumed by the quota layer.
#[async_trait]
pub trait UsageTracker: Send + Sync {
    /// Resource kind this tracker accounts for.
    fn resource_kind(&self) -> ResourceKind;

    /// Current usage of the account, or `None` when there is nothing to
    /// charge against quota (distinct from observing zero usage).
    async fn get_used_resource(&self, account_id: &str) -> UsageResult<Option<ResourceUsage>>;
}
