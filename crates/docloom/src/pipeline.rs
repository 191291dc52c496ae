//! The per-object render pipeline and its worker pool.
//!
//! A [`Pipeline`] freezes everything shared at construction: validated
//! config, probed capability set, fragment registry, compiled template
//! engine, and the cross-reference resolver. [`Pipeline::run`] then
//! processes every object of a graph through classify → coverage →
//! diagram → chain → tiers, on a bounded worker pool, and hands the
//! ordered merge to the assembler.
//!
//! Per-object rendering is embarrassingly parallel; the only shared
//! mutable state lives inside the resolver's concurrency-safe maps.
//! Output ordering is decided by the assembler, never by task completion
//! order. Cancellation is cooperative: the flag is checked at stage
//! boundaries and in-flight objects are discarded, not emitted.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use docloom_diagram::{
    decide, generate, CommandRenderer, DecisionReason, DiagramOutcome, DiagramRenderer,
    DiagramSpec,
};
use docloom_model::{
    classify, coverage, CapabilityProbe, CapabilitySet, Category, DocGraph, DocObject,
};
use docloom_render::{
    default_registry, render_tiers, DiagramView, FragmentRegistry, LinkView, MemberView,
    ObjectView, TemplateEngine,
};
use docloom_xref::{RefOutcome, Resolver};

use crate::assemble::{assemble, BuildWarning, ObjectArtifact, RenderedDoc, WarningKind};
use crate::config::BuildConfig;
use crate::error::BuildError;

/// A configured, frozen render pipeline for one build.
pub struct Pipeline {
    config: BuildConfig,
    capabilities: CapabilitySet,
    registry: FragmentRegistry,
    engine: TemplateEngine,
    resolver: Resolver,
    diagram_renderer: Option<Box<dyn DiagramRenderer>>,
    cancel: Arc<AtomicBool>,
}

impl Pipeline {
    /// Builds a pipeline from a configuration and a capability probe.
    ///
    /// Validates the configuration, probes the declared capabilities, and
    /// compiles the default fragment templates.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`BuildError`] for an unsound configuration or a
    /// fragment template that fails to compile.
    pub fn new(config: BuildConfig, probe: &dyn CapabilityProbe) -> Result<Self, BuildError> {
        config.validate()?;
        let capabilities = CapabilitySet::build(&config.capabilities, probe);
        debug!(
            available = ?capabilities.available_names().collect::<Vec<_>>(),
            "capability set frozen"
        );
        let registry = default_registry();
        let engine = registry.build_engine()?;
        Ok(Pipeline {
            config,
            capabilities,
            registry,
            engine,
            resolver: Resolver::new(),
            diagram_renderer: None,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Replaces the fragment registry, recompiling its templates.
    pub fn with_registry(mut self, registry: FragmentRegistry) -> Result<Self, BuildError> {
        self.engine = registry.build_engine()?;
        self.registry = registry;
        Ok(self)
    }

    /// Sets the cross-reference resolver.
    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Sets the external diagram renderer. Without one, accepted diagram
    /// specs pass through ungenerated.
    pub fn with_diagram_renderer(mut self, renderer: Box<dyn DiagramRenderer>) -> Self {
        self.diagram_renderer = Some(renderer);
        self
    }

    /// Sets an external diagram renderer program, bounded by the
    /// configured per-call timeout.
    pub fn with_diagram_command(self, program: impl Into<String>) -> Self {
        let renderer = CommandRenderer::new(program).with_timeout(self.config.diagram_timeout);
        self.with_diagram_renderer(Box::new(renderer))
    }

    /// The frozen capability set for this build.
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// A handle for cooperative cancellation from the enclosing build.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Renders the whole graph into a [`RenderedDoc`].
    ///
    /// # Errors
    ///
    /// [`BuildError::Cancelled`] if the cancellation flag was raised;
    /// partial artifacts are discarded. [`BuildError::PoolStart`] if a
    /// render worker could not be spawned.
    pub fn run(&self, graph: &DocGraph) -> Result<RenderedDoc, BuildError> {
        if self.cancelled() {
            return Err(BuildError::Cancelled);
        }
        let cycles = graph.base_cycles();
        let ids: Vec<&str> = graph.ids().collect();
        let workers = self.config.concurrency.min(ids.len().max(1));

        let artifacts = if workers <= 1 {
            let mut out = Vec::with_capacity(ids.len());
            for id in &ids {
                if self.cancelled() {
                    return Err(BuildError::Cancelled);
                }
                out.push(self.process_object(graph, &cycles, id));
            }
            out
        } else {
            self.run_pool(graph, &cycles, &ids, workers)?
        };

        if self.cancelled() {
            return Err(BuildError::Cancelled);
        }
        Ok(assemble(graph, artifacts, self.resolver.unresolved_count()))
    }

    fn run_pool(
        &self,
        graph: &DocGraph,
        cycles: &BTreeSet<String>,
        ids: &[&str],
        workers: usize,
    ) -> Result<Vec<ObjectArtifact>, BuildError> {
        let (job_tx, job_rx) = crossbeam::channel::unbounded::<(usize, &str)>();
        let (result_tx, result_rx) = crossbeam::channel::unbounded::<(usize, ObjectArtifact)>();

        for (idx, id) in ids.iter().enumerate() {
            job_tx.send((idx, *id)).expect("job channel open");
        }
        drop(job_tx);

        std::thread::scope(|scope| -> Result<(), BuildError> {
            for n in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                std::thread::Builder::new()
                    .name(format!("docloom-render-{n}"))
                    .spawn_scoped(scope, move || {
                        while let Ok((idx, id)) = job_rx.recv() {
                            if self.cancelled() {
                                break;
                            }
                            let artifact = self.process_object(graph, cycles, id);
                            if result_tx.send((idx, artifact)).is_err() {
                                break;
                            }
                        }
                    })
                    .map_err(|err| BuildError::PoolStart(err.to_string()))?;
            }
            Ok(())
        })?;
        drop(result_tx);

        let mut slots: Vec<Option<ObjectArtifact>> = (0..ids.len()).map(|_| None).collect();
        for (idx, artifact) in result_rx.try_iter() {
            slots[idx] = Some(artifact);
        }

        let mut artifacts = Vec::with_capacity(ids.len());
        for slot in slots {
            match slot {
                Some(artifact) => artifacts.push(artifact),
                // A missing slot means a worker bailed out on
                // cancellation; partial output is discarded.
                None => return Err(BuildError::Cancelled),
            }
        }
        Ok(artifacts)
    }

    /// Runs the full per-object pipeline for one object.
    ///
    /// Never fails: every degradation path ends in a renderable view plus
    /// warnings.
    fn process_object(
        &self,
        graph: &DocGraph,
        cycles: &BTreeSet<String>,
        id: &str,
    ) -> ObjectArtifact {
        let obj = graph.get(id).expect("ids come from the graph");
        let mut warnings = Vec::new();

        // Classification; a bases cycle downgrades to concrete with
        // inheritance omitted.
        let in_cycle = cycles.contains(id);
        let category = if in_cycle {
            warn!(object = %id, "bases cycle detected, rendering as concrete");
            warnings.push(BuildWarning {
                object_id: id.to_string(),
                kind: WarningKind::BaseCycle,
                message: "inheritance omitted: cycle detected in bases".to_string(),
            });
            Category::Concrete
        } else {
            classify(obj)
        };

        let score = coverage::score(obj);

        // Diagram decision, then generation for accepted specs.
        let spec = if in_cycle {
            DiagramSpec::none(id, DecisionReason::NoCandidate)
        } else {
            decide(
                obj,
                category,
                &score,
                &self.capabilities,
                self.config.diagram_limits(),
            )
        };
        let outcome = match (&self.diagram_renderer, spec.accepted) {
            (Some(renderer), true) => generate(renderer.as_ref(), &spec, obj, &self.cancel),
            _ => DiagramOutcome {
                spec,
                image: None,
            },
        };
        if matches!(
            outcome.spec.reason,
            DecisionReason::Timeout | DecisionReason::RendererFailed
        ) {
            warnings.push(BuildWarning {
                object_id: id.to_string(),
                kind: WarningKind::DiagramFailure,
                message: format!(
                    "{} diagram not generated: {}",
                    outcome.spec.kind_name(),
                    outcome.spec.reason
                ),
            });
        }

        let view = self.build_view(graph, obj, category, &score, &outcome, in_cycle);

        let low_coverage = score.percentage < self.config.low_coverage_threshold;
        let chain = self
            .registry
            .resolve_chain(category, &self.capabilities, low_coverage);
        let section = render_tiers(&view, &chain, &self.engine, &self.capabilities);

        ObjectArtifact {
            id: id.to_string(),
            section,
            diagram: outcome.spec,
            warnings,
        }
    }

    fn build_view(
        &self,
        graph: &DocGraph,
        obj: &DocObject,
        category: Category,
        score: &coverage::CoverageScore,
        outcome: &DiagramOutcome,
        in_cycle: bool,
    ) -> ObjectView {
        let mut view = if in_cycle {
            let mut stripped = obj.clone();
            stripped.bases.clear();
            stripped.subclasses.clear();
            let mut view = ObjectView::from_object(&stripped, category, score);
            view.warnings
                .push("inheritance information omitted: cycle detected in base classes".to_string());
            view
        } else {
            let mut view = ObjectView::from_object(obj, category, score);
            view.bases = obj.bases.iter().map(|b| self.link_for(b)).collect();
            view.subclasses = obj.subclasses.iter().map(|s| self.link_for(s)).collect();
            view
        };

        view.members = obj
            .members
            .iter()
            .filter_map(|member| {
                graph.get(member).map(|m| MemberView {
                    id: m.id.clone(),
                    name: m.name.clone(),
                    kind: m.kind.as_str().to_string(),
                })
            })
            .collect();

        view.diagram = DiagramView {
            kind: outcome.spec.kind_name().to_string(),
            accepted: outcome.spec.accepted,
            reason: outcome.spec.reason.as_str().to_string(),
            node_count: outcome.spec.node_count,
            image: outcome.image.as_ref().map(|image| image.uri.clone()),
        };
        view
    }

    fn link_for(&self, symbol: &str) -> LinkView {
        match self.resolver.resolve(symbol) {
            RefOutcome::Resolved(r) => LinkView::linked(r.display, r.uri),
            RefOutcome::PlainText(text) => LinkView::plain(text),
        }
    }
}
