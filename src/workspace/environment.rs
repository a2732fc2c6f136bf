/// Declarative environment descriptions and their resolution boundary.
use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Typed, opaque description of how to build an environment.
///
/// The payload is either inline (`content`) or fetched from `location` by the
/// resolution strategy registered for `recipe_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub recipe_type: String,
    pub content_type: Option<String>,
    pub content: Option<String>,
    pub location: Option<String>,
}

/// Declarative workspace specification before resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    pub recipe: Recipe,
    /// Per-machine overrides declared alongside the recipe, keyed by machine
    /// name. May be empty; resolution fills in the full machine set.
    #[serde(default)]
    pub machines: HashMap<String, MachineConfig>,
}

/// Per-machine configuration: a flat string attribute map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MachineConfig {
    pub attributes: HashMap<String, String>,
}

/// Fully expanded form of an [`Environment`].
///
/// Every machine carries concrete attributes, including a parseable
/// [`crate::workspace::MEMORY_LIMIT_ATTRIBUTE`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedEnvironment {
    pub machines: HashMap<String, MachineConfig>,
}

/// Recipe-type-specific resolution strategy.
///
/// Strategies expand recipe references into machine configurations, fetching
/// and parsing external recipe documents where needed.
#[async_trait]
pub trait EnvironmentResolver: Send + Sync {
    async fn resolve(&self, environment: &Environment) -> Result<ResolvedEnvironment, ResolveError>;
}
