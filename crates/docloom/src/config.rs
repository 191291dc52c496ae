//! Build configuration.
//!
//! [`BuildConfig`] is the immutable record the enclosing build hands this
//! core: declared capabilities, diagram thresholds, and the worker count.
//! It is constructed once, validated before any rendering starts, and
//! threaded by reference through the pipeline; no module-level settings
//! are consulted mid-render.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use docloom_diagram::DiagramLimits;
use docloom_model::CapabilityDecl;

/// Configuration errors. All of these are fatal and abort the build
/// before any rendering starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A capability was declared with an empty or whitespace-bearing name.
    #[error("malformed capability name {name:?}")]
    MalformedCapability { name: String },

    /// The same capability was declared twice.
    #[error("capability \"{name}\" declared more than once")]
    DuplicateCapability { name: String },

    /// A percentage threshold outside 0..=100.
    #[error("{field} must be within 0..=100, got {value}")]
    ThresholdOutOfRange { field: &'static str, value: u32 },

    /// A worker pool of size zero cannot start.
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
}

/// The immutable configuration for one build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Declared capabilities, probed at pipeline construction.
    pub capabilities: Vec<CapabilityDecl>,
    /// Maximum relationship nodes before a diagram is rejected.
    pub diagram_node_ceiling: usize,
    /// Per-call timeout for the external diagram renderer.
    pub diagram_timeout: Duration,
    /// Minimum coverage percentage for enhancement diagram kinds.
    pub diagram_coverage_floor: u8,
    /// Coverage percentage below which an object routes through the
    /// needs-attention fragment.
    pub low_coverage_threshold: u8,
    /// Render worker count.
    pub concurrency: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            capabilities: Vec::new(),
            diagram_node_ceiling: 20,
            diagram_timeout: Duration::from_secs(10),
            diagram_coverage_floor: 25,
            low_coverage_threshold: 50,
            concurrency: 4,
        }
    }
}

impl BuildConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        BuildConfig::default()
    }

    /// Declares a capability with priority 0.
    pub fn declare(mut self, name: impl Into<String>) -> Self {
        self.capabilities.push(CapabilityDecl::new(name));
        self
    }

    /// Declares a capability with an explicit priority.
    pub fn declare_with_priority(mut self, name: impl Into<String>, priority: i32) -> Self {
        self.capabilities
            .push(CapabilityDecl::with_priority(name, priority));
        self
    }

    /// Sets the diagram node ceiling.
    pub fn with_diagram_node_ceiling(mut self, ceiling: usize) -> Self {
        self.diagram_node_ceiling = ceiling;
        self
    }

    /// Sets the external renderer timeout.
    pub fn with_diagram_timeout(mut self, timeout: Duration) -> Self {
        self.diagram_timeout = timeout;
        self
    }

    /// Sets the coverage floor for enhancement diagrams.
    pub fn with_diagram_coverage_floor(mut self, floor: u8) -> Self {
        self.diagram_coverage_floor = floor;
        self
    }

    /// Sets the needs-attention routing threshold.
    pub fn with_low_coverage_threshold(mut self, threshold: u8) -> Self {
        self.low_coverage_threshold = threshold;
        self
    }

    /// Sets the render worker count.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// The diagram decision thresholds.
    pub fn diagram_limits(&self) -> DiagramLimits {
        DiagramLimits {
            node_ceiling: self.diagram_node_ceiling,
            coverage_floor: self.diagram_coverage_floor,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] here is build-fatal; nothing renders until the
    /// configuration is sound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for decl in &self.capabilities {
            let name = decl.name.as_str();
            if name.trim().is_empty() || name.chars().any(char::is_whitespace) {
                return Err(ConfigError::MalformedCapability {
                    name: name.to_string(),
                });
            }
            if !seen.insert(name) {
                return Err(ConfigError::DuplicateCapability {
                    name: name.to_string(),
                });
            }
        }
        if self.diagram_coverage_floor > 100 {
            return Err(ConfigError::ThresholdOutOfRange {
                field: "diagram_coverage_floor",
                value: self.diagram_coverage_floor as u32,
            });
        }
        if self.low_coverage_threshold > 100 {
            return Err(ConfigError::ThresholdOutOfRange {
                field: "low_coverage_threshold",
                value: self.low_coverage_threshold as u32,
            });
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        BuildConfig::default().validate().unwrap();
    }

    #[test]
    fn declared_capabilities_validate() {
        let config = BuildConfig::new()
            .declare("diagram:inheritance")
            .declare_with_priority("diagram:flow", 5)
            .declare("source-links");
        config.validate().unwrap();
        assert_eq!(config.capabilities.len(), 3);
    }

    #[test]
    fn empty_capability_name_is_fatal() {
        let err = BuildConfig::new().declare("").validate().unwrap_err();
        assert!(matches!(err, ConfigError::MalformedCapability { .. }));
    }

    #[test]
    fn whitespace_capability_name_is_fatal() {
        let err = BuildConfig::new()
            .declare("diagram flow")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MalformedCapability { .. }));
    }

    #[test]
    fn duplicate_capability_is_fatal() {
        let err = BuildConfig::new()
            .declare("math")
            .declare("math")
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DuplicateCapability { name } if name == "math"
        ));
    }

    #[test]
    fn zero_concurrency_is_fatal() {
        let err = BuildConfig::new()
            .with_concurrency(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroConcurrency));
    }

    #[test]
    fn out_of_range_threshold_is_fatal() {
        let err = BuildConfig::new()
            .with_low_coverage_threshold(101)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ThresholdOutOfRange { .. }));
    }

    #[test]
    fn diagram_limits_reflect_config() {
        let config = BuildConfig::new()
            .with_diagram_node_ceiling(8)
            .with_diagram_coverage_floor(40);
        let limits = config.diagram_limits();
        assert_eq!(limits.node_ceiling, 8);
        assert_eq!(limits.coverage_floor, 40);
    }
}
