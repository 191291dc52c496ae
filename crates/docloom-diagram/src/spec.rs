//! Diagram decision types.

use serde::{Deserialize, Serialize};

/// The kind of diagram a decision can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    Inheritance,
    Flow,
    Sequence,
}

impl DiagramKind {
    /// Returns the display name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            DiagramKind::Inheritance => "inheritance",
            DiagramKind::Flow => "flow",
            DiagramKind::Sequence => "sequence",
        }
    }

    /// The capability gating this kind, e.g. `"diagram:flow"`.
    pub fn capability(self) -> &'static str {
        match self {
            DiagramKind::Inheritance => "diagram:inheritance",
            DiagramKind::Flow => "diagram:flow",
            DiagramKind::Sequence => "diagram:sequence",
        }
    }

    /// Returns `true` for kinds that are documentation enhancements
    /// rather than structural summaries. Enhancement kinds are suppressed
    /// for poorly documented objects so a rich diagram does not imply a
    /// completeness the prose lacks.
    pub fn is_enhancement(self) -> bool {
        matches!(self, DiagramKind::Flow | DiagramKind::Sequence)
    }
}

impl std::fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a decision accepted, rejected, or skipped a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionReason {
    /// Accepted for generation.
    Accepted,
    /// The object has nothing to diagram.
    NoCandidate,
    /// No capability covers any candidate kind.
    NoCapability,
    /// The node count exceeds the configured ceiling.
    ExceedsComplexityCeiling,
    /// Coverage is below the floor for enhancement kinds.
    LowCoverage,
    /// The external renderer timed out, including the reduced-cap retry.
    Timeout,
    /// The external renderer failed outright.
    RendererFailed,
    /// The build was cancelled before the renderer was invoked.
    Cancelled,
}

impl DecisionReason {
    /// Returns the human-readable reason string.
    pub fn as_str(self) -> &'static str {
        match self {
            DecisionReason::Accepted => "accepted",
            DecisionReason::NoCandidate => "nothing to diagram",
            DecisionReason::NoCapability => "no capability",
            DecisionReason::ExceedsComplexityCeiling => "exceeds complexity ceiling",
            DecisionReason::LowCoverage => "low coverage",
            DecisionReason::Timeout => "timeout",
            DecisionReason::RendererFailed => "renderer failed",
            DecisionReason::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The outcome of the diagram decision for one object.
///
/// A rejected spec still records the *intended* kind when there was one,
/// so the renderer can fall back to a degraded textual summary of the
/// same relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramSpec {
    pub object_id: String,
    /// Intended diagram kind; `None` when there is nothing to draw or no
    /// capability covers it.
    pub kind: Option<DiagramKind>,
    /// Relationship node count used for the complexity check.
    pub node_count: usize,
    /// Whether generation should proceed.
    pub accepted: bool,
    pub reason: DecisionReason,
}

impl DiagramSpec {
    /// A spec that draws nothing, with the given reason.
    pub fn none(object_id: impl Into<String>, reason: DecisionReason) -> Self {
        DiagramSpec {
            object_id: object_id.into(),
            kind: None,
            node_count: 0,
            accepted: false,
            reason,
        }
    }

    /// The kind's display name, `"none"` when no kind was intended.
    pub fn kind_name(&self) -> &'static str {
        self.kind.map(DiagramKind::as_str).unwrap_or("none")
    }

    /// Returns a copy downgraded to rejected with a new reason, keeping
    /// the intended kind and node count.
    pub fn downgraded(&self, reason: DecisionReason) -> Self {
        DiagramSpec {
            accepted: false,
            reason,
            ..self.clone()
        }
    }
}

/// Thresholds for the diagram decision, from the build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramLimits {
    /// Maximum relationship nodes before a diagram is rejected.
    pub node_ceiling: usize,
    /// Minimum coverage percentage for enhancement kinds.
    pub coverage_floor: u8,
}

impl Default for DiagramLimits {
    fn default() -> Self {
        DiagramLimits {
            node_ceiling: 20,
            coverage_floor: 25,
        }
    }
}
