//! Named sweep presets.
//!
//! The slow quadratic sorts cannot reach the sizes the n log n sorts are
//! measured at, so each family gets its own algorithm set and size range.

use crate::config::{SweepConfig, DEFAULT_REPETITIONS};

/// A ready-made (algorithms, sizes) combination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preset {
    /// Name used on the command line (e.g., "fast")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    pub algorithms: &'static [&'static str],
    pub size_exponents: &'static [u32],
}

impl Preset {
    /// Sweep configuration for this preset with the default repetition count.
    pub fn to_config(&self) -> SweepConfig {
        SweepConfig::new(
            self.algorithms.iter().copied(),
            self.size_exponents.iter().copied(),
            DEFAULT_REPETITIONS,
        )
    }
}

/// Registry of all known presets
pub struct PresetRegistry {
    presets: Vec<Preset>,
}

impl PresetRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            presets: Vec::new(),
        }
    }

    /// Register a preset
    pub fn register(&mut self, preset: Preset) {
        self.presets.push(preset);
    }

    /// Get all registered presets
    pub fn all(&self) -> &[Preset] {
        &self.presets
    }

    /// Find preset by name
    pub fn find(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// List preset names
    pub fn list_names(&self) -> Vec<&'static str> {
        self.presets.iter().map(|p| p.name).collect()
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the default registry with all presets
pub fn build_registry() -> PresetRegistry {
    let mut registry = PresetRegistry::new();

    registry.register(Preset {
        name: "fast",
        description: "n log n sorts at large sizes",
        algorithms: &["mergeSort", "bitonicSort", "heapSort"],
        size_exponents: &[12, 14, 15, 16, 17, 18, 19, 20, 21],
    });
    registry.register(Preset {
        name: "slow",
        description: "quadratic sorts and quick sort at small sizes",
        algorithms: &["bubbleSort", "selectionSort", "quickSort"],
        size_exponents: &[10, 12, 14, 15, 16],
    });
    registry.register(Preset {
        name: "quick",
        description: "quick sort only, tiny inputs",
        algorithms: &["quickSort"],
        size_exponents: &[5, 6, 7, 8, 9],
    });

    registry
}
