//! The diagram decision.
//!
//! [`decide`] is a pure function from one object plus the frozen build
//! inputs (category, coverage, capability set, limits) to a
//! [`DiagramSpec`]. It never invokes a renderer; actually generating the
//! image is [`generate`](crate::renderer::generate)'s job, and only for
//! accepted specs.
//!
//! Determinism matters here: the same inputs must produce the same spec so
//! results are cacheable and fixtures reproducible. Acceptance is also
//! monotonic in capability availability; removing a capability can only
//! shrink what gets accepted.

use docloom_model::{CapabilitySet, Category, CoverageScore, DocObject};

use crate::spec::{DecisionReason, DiagramKind, DiagramLimits, DiagramSpec};

/// Candidate kinds for an object, by shape. Order is the tie-break when
/// capability priorities are equal.
fn candidate_kinds(obj: &DocObject, category: Category) -> Vec<DiagramKind> {
    let mut kinds = Vec::new();
    if category.is_class_like() && (!obj.bases.is_empty() || !obj.subclasses.is_empty()) {
        kinds.push(DiagramKind::Inheritance);
    }
    if obj.kind.is_callable() && !obj.calls.is_empty() {
        kinds.push(DiagramKind::Flow);
        if obj.is_async {
            kinds.push(DiagramKind::Sequence);
        }
    }
    kinds
}

/// Relationship node count for the complexity check.
///
/// Call collaborators count for both flow-family kinds so that swapping
/// one flow-family kind for another under a different capability set can
/// never change the complexity verdict.
fn node_count(obj: &DocObject, kind: DiagramKind) -> usize {
    let structural = obj.bases.len() + obj.subclasses.len();
    match kind {
        DiagramKind::Inheritance => structural,
        DiagramKind::Flow | DiagramKind::Sequence => structural + obj.calls.len(),
    }
}

/// Decides whether, and how, to diagram one object.
///
/// The checks run in fixed order:
///
/// 1. no candidate kinds → `none` / [`DecisionReason::NoCandidate`]
/// 2. no capability for any candidate → `none` /
///    [`DecisionReason::NoCapability`]
/// 3. richest available kind picked by capability priority (candidate
///    order breaks ties)
/// 4. node count over the ceiling → rejected, intended kind kept
/// 5. enhancement kind below the coverage floor → rejected, intended kind
///    kept
/// 6. otherwise accepted
pub fn decide(
    obj: &DocObject,
    category: Category,
    coverage: &CoverageScore,
    capabilities: &CapabilitySet,
    limits: DiagramLimits,
) -> DiagramSpec {
    let candidates = candidate_kinds(obj, category);
    if candidates.is_empty() {
        return DiagramSpec::none(&obj.id, DecisionReason::NoCandidate);
    }

    let available: Vec<DiagramKind> = candidates
        .into_iter()
        .filter(|kind| capabilities.has(kind.capability()))
        .collect();
    if available.is_empty() {
        return DiagramSpec::none(&obj.id, DecisionReason::NoCapability);
    }

    // max_by_key takes the last max; iterate in reverse so candidate
    // order remains the tie-break.
    let kind = *available
        .iter()
        .rev()
        .max_by_key(|kind| capabilities.priority(kind.capability()).unwrap_or(0))
        .expect("available is non-empty");

    let nodes = node_count(obj, kind);
    let mut spec = DiagramSpec {
        object_id: obj.id.clone(),
        kind: Some(kind),
        node_count: nodes,
        accepted: false,
        reason: DecisionReason::Accepted,
    };

    if nodes > limits.node_ceiling {
        spec.reason = DecisionReason::ExceedsComplexityCeiling;
        return spec;
    }
    if kind.is_enhancement() && coverage.percentage < limits.coverage_floor {
        spec.reason = DecisionReason::LowCoverage;
        return spec;
    }

    spec.accepted = true;
    spec
}
