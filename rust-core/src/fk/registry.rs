//! Name-keyed lookup of FK spectra algorithms

use super::algorithm::{DelayAndSumFk, FkSpectraAlgorithm};
use crate::error::FkError;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps algorithm names to shared implementations
#[derive(Clone, Default)]
pub struct AlgorithmRegistry {
    algorithms: HashMap<String, Arc<dyn FkSpectraAlgorithm>>,
}

impl AlgorithmRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in delay-and-sum algorithm
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DelayAndSumFk));
        registry
    }

    /// Add an algorithm under its own name, replacing any previous entry.
    /// Returns the replaced algorithm, if any.
    pub fn register(&mut self, algorithm: Arc<dyn FkSpectraAlgorithm>) -> Option<Arc<dyn FkSpectraAlgorithm>> {
        let name = algorithm.name().to_string();
        tracing::debug!(algorithm = %name, "Registering FK spectra algorithm");
        self.algorithms.insert(name, algorithm)
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn FkSpectraAlgorithm>, FkError> {
        self.algorithms
            .get(name)
            .cloned()
            .ok_or_else(|| FkError::UnknownAlgorithm(name.to_string()))
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.algorithms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("algorithms", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fk::algorithm::{FkInputs, ProcessingOptions};
    use crate::fk::spectra::{FkSpectra, FkSpectraMetadata};

    struct Silent;

    impl FkSpectraAlgorithm for Silent {
        fn name(&self) -> &str {
            "silent"
        }

        fn generate_fk(&self, inputs: &FkInputs<'_>, _options: &ProcessingOptions) -> Result<FkSpectra, FkError> {
            Ok(FkSpectra {
                metadata: FkSpectraMetadata::from_definition(inputs.definition),
                values: Vec::new(),
            })
        }
    }

    #[test]
    fn test_defaults_contain_delay_and_sum() {
        let registry = AlgorithmRegistry::with_defaults();
        assert_eq!(registry.names(), vec![DelayAndSumFk::NAME]);
        assert_eq!(registry.get("delay-and-sum").unwrap().name(), "delay-and-sum");
    }

    #[test]
    fn test_unknown_name() {
        let registry = AlgorithmRegistry::with_defaults();
        assert!(matches!(registry.get("capon"), Err(FkError::UnknownAlgorithm(name)) if name == "capon"));
    }

    #[test]
    fn test_register_custom_algorithm() {
        let mut registry = AlgorithmRegistry::with_defaults();
        assert!(registry.register(Arc::new(Silent)).is_none());
        assert_eq!(registry.names(), vec!["delay-and-sum", "silent"]);

        // re-registering replaces the existing entry
        assert!(registry.register(Arc::new(Silent)).is_some());
        assert_eq!(registry.names().len(), 2);
    }

    #[test]
    fn test_dispatch_through_registry() {
        let mut registry = AlgorithmRegistry::new();
        registry.register(Arc::new(Silent));

        let def = crate::test_fixtures::definition();
        let positions = crate::test_fixtures::tripartite_positions();
        let segments = crate::test_fixtures::array_segments((0.0, 0.0), 401);
        let inputs = FkInputs {
            channel_segments: &segments,
            definition: &def,
            medium_velocity_km_per_sec: 5.8,
            relative_positions: &positions,
        };

        let spectra = registry
            .get("silent")
            .unwrap()
            .generate_fk(&inputs, &ProcessingOptions::default())
            .unwrap();
        assert!(spectra.is_empty());
    }
}
