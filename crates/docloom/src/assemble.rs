//! The render output assembler.
//!
//! Per-object rendering completes in arbitrary order on the worker pool;
//! this module performs the deterministic merge afterwards. Sections nest
//! along the member hierarchy, top-level entries order
//! dependency-then-lexical (a parent package always precedes and contains
//! its submodules; siblings order lexically), and the manifest maps every
//! object id to its section id for downstream link resolution.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use docloom_diagram::DiagramSpec;
use docloom_model::DocGraph;
use docloom_render::Section;

/// The kind of a per-object degradation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// The object sits on a `bases` cycle; inheritance was omitted.
    BaseCycle,
    /// Diagram generation failed or timed out after retry.
    DiagramFailure,
}

impl WarningKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WarningKind::BaseCycle => "base-cycle",
            WarningKind::DiagramFailure => "diagram-failure",
        }
    }
}

/// One per-object degradation surfaced to the build log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildWarning {
    pub object_id: String,
    pub kind: WarningKind,
    pub message: String,
}

/// Summary counts for the build log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Objects rendered.
    pub objects: usize,
    /// Diagram specs accepted for generation.
    pub diagrams_accepted: usize,
    /// Diagram specs with an intended kind that were rejected or
    /// downgraded.
    pub diagrams_rejected: usize,
    /// Fragment render failures replaced by placeholders.
    pub fragment_failures: usize,
    /// Unique symbols no inventory resolved.
    pub unresolved_references: usize,
    /// Objects downgraded for a `bases` cycle.
    pub base_cycles: usize,
}

/// The assembler's artifact: an ordered section tree plus the manifest
/// and the build-log summary. Ready for an external writer; this core
/// never writes files itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedDoc {
    /// Top-level sections, dependency-then-lexical order.
    pub sections: Vec<Section>,
    /// Object id → section id.
    pub manifest: BTreeMap<String, String>,
    /// Per-object degradations, in graph order.
    pub warnings: Vec<BuildWarning>,
    pub stats: BuildStats,
}

/// Everything one worker produced for one object.
#[derive(Debug)]
pub struct ObjectArtifact {
    pub id: String,
    pub section: Section,
    pub diagram: DiagramSpec,
    pub warnings: Vec<BuildWarning>,
}

/// Marker the disclosure renderer leaves in place of a failed fragment.
const RENDER_ERROR_MARKER: &str = "[render error:";

fn count_fragment_failures(section: &Section) -> usize {
    section.body.matches(RENDER_ERROR_MARKER).count()
        + section
            .children
            .iter()
            .map(count_fragment_failures)
            .sum::<usize>()
}

/// Merges per-object artifacts into the final document.
pub(crate) fn assemble(
    graph: &DocGraph,
    artifacts: Vec<ObjectArtifact>,
    unresolved_references: usize,
) -> RenderedDoc {
    let mut stats = BuildStats {
        objects: artifacts.len(),
        unresolved_references,
        ..BuildStats::default()
    };
    let mut warnings = Vec::new();
    let mut manifest = BTreeMap::new();
    let mut sections: HashMap<String, Section> = HashMap::new();

    for artifact in artifacts {
        if artifact.diagram.accepted {
            stats.diagrams_accepted += 1;
        } else if artifact.diagram.kind.is_some() {
            stats.diagrams_rejected += 1;
        }
        stats.fragment_failures += count_fragment_failures(&artifact.section);
        for warning in &artifact.warnings {
            if warning.kind == WarningKind::BaseCycle {
                stats.base_cycles += 1;
            }
        }
        warnings.extend(artifact.warnings);
        manifest.insert(artifact.id.clone(), artifact.section.id.clone());
        sections.insert(artifact.id, artifact.section);
    }

    // Dependency-then-lexical: path depth first, then lexical id.
    let mut roots: Vec<&str> = graph.root_ids();
    roots.sort_by_key(|id| (id.split('.').count(), *id));

    let top_level: Vec<Section> = roots
        .into_iter()
        .filter_map(|id| build_subtree(graph, id, &mut sections))
        .collect();

    RenderedDoc {
        sections: top_level,
        manifest,
        warnings,
        stats,
    }
}

/// Recursively attaches member sections, in declaration order, after the
/// object's own tier children. Taking sections out of the map makes
/// revisits impossible, so a malformed member graph cannot recurse
/// forever.
fn build_subtree(
    graph: &DocGraph,
    id: &str,
    sections: &mut HashMap<String, Section>,
) -> Option<Section> {
    let mut section = sections.remove(id)?;
    if let Some(obj) = graph.get(id) {
        for member in &obj.members {
            if let Some(child) = build_subtree(graph, member, sections) {
                section.push_child(child);
            }
        }
    }
    Some(section)
}
