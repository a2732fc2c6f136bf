/// RAM accounting over environment descriptions.
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ResolveError, UsageError, UsageResult};
use crate::workspace::environment::{Environment, EnvironmentResolver, ResolvedEnvironment};
use crate::workspace::{Machine, MEMORY_LIMIT_ATTRIBUTE};

const BYTES_TO_MEGABYTES: u64 = 1024 * 1024;

/// Sums the RAM declared for the machines of an environment, in megabytes.
///
/// Resolution is pluggable by recipe type; registering a new
/// [`EnvironmentResolver`] extends the calculator without touching any
/// caller.
pub struct EnvironmentRamCalculator {
    resolvers: HashMap<String, Arc<dyn EnvironmentResolver>>,
}

impl EnvironmentRamCalculator {
    pub fn new(resolvers: HashMap<String, Arc<dyn EnvironmentResolver>>) -> Self {
        Self { resolvers }
    }

    /// Resolves the environment (fetching the recipe if needed) and sums the
    /// memory limit of all its machines, in megabytes.
    ///
    /// Every resolution-stage failure, including an unregistered recipe
    /// type, surfaces as [`UsageError::Calculation`] with the cause attached.
    pub async fn calculate(&self, environment: &Environment) -> UsageResult<u64> {
        let resolved = self
            .resolve(environment)
            .await
            .map_err(|source| UsageError::Calculation { source })?;
        self.calculate_resolved(&resolved)
    }

    /// Sums an already-resolved environment, in megabytes.
    pub fn calculate_resolved(&self, environment: &ResolvedEnvironment) -> UsageResult<u64> {
        let mut sum: u64 = 0;
        for (name, machine) in &environment.machines {
            sum = sum.saturating_add(parse_memory_attribute(name, &machine.attributes)?);
        }
        Ok(sum / BYTES_TO_MEGABYTES)
    }

    /// Sums runtime-observed machines directly, in megabytes.
    pub fn calculate_machines(&self, machines: &HashMap<String, Machine>) -> UsageResult<u64> {
        let mut sum: u64 = 0;
        for (name, machine) in machines {
            sum = sum.saturating_add(parse_memory_attribute(name, &machine.attributes)?);
        }
        Ok(sum / BYTES_TO_MEGABYTES)
    }

    async fn resolve(
        &self,
        environment: &Environment,
    ) -> Result<ResolvedEnvironment, ResolveError> {
        let recipe_type = environment.recipe.recipe_type.as_str();
        let resolver = self.resolvers.get(recipe_type).ok_or_else(|| {
            ResolveError::NotFound(format!(
                "No environment resolver configured for recipe type '{}'",
                recipe_type
            ))
        })?;
        let resolved = resolver.resolve(environment).await?;
        tracing::debug!(
            "Resolved '{}' environment into {} machines",
            recipe_type,
            resolved.machines.len()
        );
        Ok(resolved)
    }
}

/// Parses the string-encoded byte count; negative or missing values never
/// default to zero.
fn parse_memory_attribute(machine: &str, attributes: &HashMap<String, String>) -> UsageResult<u64> {
    attributes
        .get(MEMORY_LIMIT_ATTRIBUTE)
        .and_then(|raw| raw.parse::<u64>().ok())
        .ok_or_else(|| UsageError::InvalidAttribute {
            machine: machine.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::environment::{MachineConfig, Recipe};

    const MIB: u64 = 1024 * 1024;

    fn machine_config(limit: &str) -> MachineConfig {
        let mut attributes = HashMap::new();
        attributes.insert(MEMORY_LIMIT_ATTRIBUTE.to_string(), limit.to_string());
        MachineConfig { attributes }
    }

    fn machine(limit: &str) -> Machine {
        Machine {
            attributes: machine_config(limit).attributes,
        }
    }

    fn environment(recipe_type: &str) -> Environment {
        Environment {
            recipe: Recipe {
                recipe_type: recipe_type.to_string(),
                content_type: None,
                content: Some("services: {}".to_string()),
                location: None,
            },
            machines: HashMap::new(),
        }
    }

    fn calculator_without_resolvers() -> EnvironmentRamCalculator {
        EnvironmentRamCalculator::new(HashMap::new())
    }

    struct FixedResolver {
        machines: HashMap<String, MachineConfig>,
    }

    #[async_trait::async_trait]
    impl EnvironmentResolver for FixedResolver {
        async fn resolve(
            &self,
            _environment: &Environment,
        ) -> Result<ResolvedEnvironment, ResolveError> {
            Ok(ResolvedEnvironment {
                machines: self.machines.clone(),
            })
        }
    }

    struct FailingResolver;

    #[async_trait::async_trait]
    impl EnvironmentResolver for FailingResolver {
        async fn resolve(
            &self,
            _environment: &Environment,
        ) -> Result<ResolvedEnvironment, ResolveError> {
            Err(ResolveError::Validation(
                "machine 'db' declares no memory".to_string(),
            ))
        }
    }

    #[test]
    fn sums_resolved_machines_in_megabytes() {
        let mut machines = HashMap::new();
        machines.insert("dev".to_string(), machine_config(&(512 * MIB).to_string()));
        machines.insert("db".to_string(), machine_config(&(256 * MIB).to_string()));
        let resolved = ResolvedEnvironment { machines };

        let ram = calculator_without_resolvers()
            .calculate_resolved(&resolved)
            .unwrap();
        assert_eq!(ram, 768);
    }

    #[test]
    fn truncates_partial_megabytes() {
        let mut machines = HashMap::new();
        machines.insert("dev".to_string(), machine_config(&(MIB + MIB / 2).to_string()));
        let resolved = ResolvedEnvironment { machines };

        let ram = calculator_without_resolvers()
            .calculate_resolved(&resolved)
            .unwrap();
        assert_eq!(ram, 1);
    }

    #[test]
    fn empty_environment_sums_to_zero() {
        let resolved = ResolvedEnvironment {
            machines: HashMap::new(),
        };
        let ram = calculator_without_resolvers()
            .calculate_resolved(&resolved)
            .unwrap();
        assert_eq!(ram, 0);
    }

    #[test]
    fn missing_memory_attribute_fails() {
        let mut machines = HashMap::new();
        machines.insert("dev".to_string(), MachineConfig::default());
        let resolved = ResolvedEnvironment { machines };

        let err = calculator_without_resolvers()
            .calculate_resolved(&resolved)
            .unwrap_err();
        match err {
            UsageError::InvalidAttribute { machine } => assert_eq!(machine, "dev"),
            other => panic!("expected invalid attribute error, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_memory_attribute_fails() {
        let mut machines = HashMap::new();
        machines.insert("dev".to_string(), machine("512 MiB"));

        let err = calculator_without_resolvers()
            .calculate_machines(&machines)
            .unwrap_err();
        assert!(matches!(err, UsageError::InvalidAttribute { .. }));
    }

    #[test]
    fn negative_memory_attribute_fails() {
        let mut machines = HashMap::new();
        machines.insert("dev".to_string(), machine("-1048576"));

        let err = calculator_without_resolvers()
            .calculate_machines(&machines)
            .unwrap_err();
        assert!(matches!(err, UsageError::InvalidAttribute { .. }));
    }

    #[test]
    fn sums_runtime_machines() {
        let mut machines = HashMap::new();
        machines.insert("dev".to_string(), machine(&(512 * MIB).to_string()));
        machines.insert("db".to_string(), machine(&(256 * MIB).to_string()));

        let ram = calculator_without_resolvers()
            .calculate_machines(&machines)
            .unwrap();
        assert_eq!(ram, 768);
    }

    #[tokio::test]
    async fn resolves_environment_before_summing() {
        let mut machines = HashMap::new();
        machines.insert("dev".to_string(), machine_config(&(1024 * MIB).to_string()));
        let mut resolvers: HashMap<String, Arc<dyn EnvironmentResolver>> = HashMap::new();
        resolvers.insert("compose".to_string(), Arc::new(FixedResolver { machines }));
        let calculator = EnvironmentRamCalculator::new(resolvers);

        let ram = calculator.calculate(&environment("compose")).await.unwrap();
        assert_eq!(ram, 1024);
    }

    #[tokio::test]
    async fn unregistered_recipe_type_is_wrapped_not_found() {
        let calculator = calculator_without_resolvers();

        let err = calculator
            .calculate(&environment("dockerfile"))
            .await
            .unwrap_err();
        match err {
            UsageError::Calculation {
                source: ResolveError::NotFound(message),
            } => assert!(message.contains("dockerfile")),
            other => panic!("expected wrapped not-found error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn resolver_failure_is_wrapped() {
        let mut resolvers: HashMap<String, Arc<dyn EnvironmentResolver>> = HashMap::new();
        resolvers.insert("compose".to_string(), Arc::new(FailingResolver));
        let calculator = EnvironmentRamCalculator::new(resolvers);

        let err = calculator.calculate(&environment("compose")).await.unwrap_err();
        assert!(matches!(
            err,
            UsageError::Calculation {
                source: ResolveError::Validation(_)
            }
        ));
    }
}
