// Patchwork resource-usage core
// Computes per-account RAM commitments for the admission-control layer

pub mod account;
pub mod error;
pub mod resource;
pub mod usage;
pub mod utils;
pub mod workspace;

pub use error::{ResolveError, UsageError, UsageResult};
pub use resource::{ResourceKind, ResourceUsage, UsageTracker};
pub use usage::{EnvironmentRamCalculator, RamUsageTracker};
