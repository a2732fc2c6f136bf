/// RAM usage accounting for admission control.
///
/// Combines declared memory requests (workspaces still starting) with
/// materialized runtime state (workspaces already running) into a single
/// per-account figure.
mod calculator;
mod tracker;

pub use calculator::EnvironmentRamCalculator;
pub use tracker::RamUsageTracker;
