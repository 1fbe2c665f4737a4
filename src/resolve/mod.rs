//! Resolution pass over a layout tree.
//!
//! A pass walks the tree once, asks every child of every non-final spec for
//! its substitute and records both the original node and the node that will
//! actually be measured. Substitutes are rebuilt on every pass; nothing is
//! cached between calls to [`Resolver::resolve`].

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::error::{LayoutError, Result};
use crate::layout::{LayoutElement, LayoutSpec, same_node, substitute_for};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::ResolutionMetrics;

pub mod audit;

pub use audit::{
    NullResolveAudit, RecordingAudit, ResolveAudit, ResolveAuditEvent, ResolveAuditEventBuilder,
    ResolveAuditStage,
};

pub const RESOLVE_TARGET: &str = "layout::resolve";

/// Configuration knobs for a [`Resolver`].
#[derive(Clone)]
pub struct ResolverConfig {
    /// Deepest tree level a pass may reach before it is abandoned with
    /// [`LayoutError::DepthExceeded`].
    ///
    /// Every level counts, not only levels reached through substitution: a
    /// container that keeps handing out fresh non-final copies of itself never
    /// substitutes anything. Legitimate trees deeper than this are rejected
    /// too, so raise it for unusually deep hierarchies.
    pub max_depth: usize,
    /// Optional structured logger.
    pub logger: Option<Logger>,
    /// Level used for pass and substitution events.
    pub log_level: LogLevel,
    /// Fail the pass when the log sink fails instead of ignoring it.
    pub propagate_log_errors: bool,
    /// Totals shared across passes.
    pub metrics: Option<Arc<Mutex<ResolutionMetrics>>>,
    pub audit: Arc<dyn ResolveAudit>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            logger: None,
            log_level: LogLevel::Debug,
            propagate_log_errors: false,
            metrics: None,
            audit: Arc::new(NullResolveAudit),
        }
    }
}

impl ResolverConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn ResolveAudit>) -> Self {
        self.audit = audit;
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(ResolutionMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<ResolutionMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Counters for a single pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub nodes_visited: usize,
    pub substitutions: usize,
    pub final_skips: usize,
}

/// One position in the resolved tree.
#[derive(Debug, Clone)]
pub struct ResolvedNode {
    index: Option<usize>,
    depth: usize,
    original: LayoutElement,
    effective: LayoutElement,
    children: Vec<ResolvedNode>,
}

impl ResolvedNode {
    /// Slot in the parent spec; `None` for the root.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The node the caller placed in the tree.
    pub fn original(&self) -> &LayoutElement {
        &self.original
    }

    /// The node to measure and render.
    pub fn effective(&self) -> &LayoutElement {
        &self.effective
    }

    pub fn is_substituted(&self) -> bool {
        !same_node(&self.original, &self.effective)
    }

    /// Resolved children of the effective node.
    pub fn children(&self) -> &[ResolvedNode] {
        &self.children
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a ResolvedNode>) {
        out.push(self);
        for child in &self.children {
            child.collect(out);
        }
    }

    fn hash_into(&self, hasher: &mut blake3::Hasher) {
        hasher.update(&(self.depth as u64).to_le_bytes());
        hasher.update(&self.index.map_or(u64::MAX, |index| index as u64).to_le_bytes());
        for node in [&self.original, &self.effective] {
            hash_str(hasher, node.kind());
            hash_str(hasher, node.identifier().unwrap_or_default());
        }
        hasher.update(&[u8::from(self.is_substituted())]);
        hasher.update(&(self.children.len() as u64).to_le_bytes());
        for child in &self.children {
            child.hash_into(hasher);
        }
    }
}

/// Length-prefixed so adjacent strings cannot run into each other.
fn hash_str(hasher: &mut blake3::Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

/// Output of a resolution pass.
#[derive(Debug, Clone)]
pub struct ResolvedTree {
    root: ResolvedNode,
    stats: PassStats,
}

impl ResolvedTree {
    pub fn root(&self) -> &ResolvedNode {
        &self.root
    }

    pub fn stats(&self) -> PassStats {
        self.stats
    }

    /// Every position, depth first.
    pub fn nodes(&self) -> Vec<&ResolvedNode> {
        let mut out = Vec::new();
        self.root.collect(&mut out);
        out
    }

    /// `(original kind, effective kind)` for every substituted position.
    pub fn substitutions(&self) -> Vec<(String, String)> {
        self.nodes()
            .into_iter()
            .filter(|node| node.is_substituted())
            .map(|node| {
                (
                    node.original.kind().to_string(),
                    node.effective.kind().to_string(),
                )
            })
            .collect()
    }

    /// First position whose original node is `node`.
    pub fn find_original(&self, node: &LayoutElement) -> Option<&ResolvedNode> {
        self.nodes()
            .into_iter()
            .find(|resolved| same_node(&resolved.original, node))
    }

    /// Structural hash of the pass: kinds, identifiers, indices and where
    /// substitution happened. Two passes over an unchanged tree agree even
    /// though their substitutes are distinct allocations.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        self.root.hash_into(&mut hasher);
        hasher.finalize()
    }
}

/// Walks layout trees applying final-node substitution.
#[derive(Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ResolverConfig {
        &mut self.config
    }

    /// Run one pass over the tree rooted at `root`.
    ///
    /// The root is treated as the child of a non-final owner, so it may be
    /// substituted too.
    pub fn resolve(&self, root: &LayoutElement) -> Result<ResolvedTree> {
        self.audit(
            ResolveAuditStage::PassStarted,
            [json_kv("root", root.kind())],
        );
        self.emit(
            self.config.log_level,
            "pass_started",
            [json_kv("root", root.kind())],
        )?;

        let mut pass = Pass {
            resolver: self,
            stats: PassStats::default(),
        };
        let outcome = pass.resolve_root(root);
        let stats = pass.stats;

        match outcome {
            Ok(root) => {
                self.record_metrics(|metrics| metrics.record_pass(&stats))?;
                let fields = [
                    json_kv("nodes_visited", stats.nodes_visited),
                    json_kv("substitutions", stats.substitutions),
                    json_kv("final_skips", stats.final_skips),
                ];
                self.audit(ResolveAuditStage::PassCompleted, fields.clone());
                self.emit(self.config.log_level, "pass_completed", fields)?;
                Ok(ResolvedTree { root, stats })
            }
            Err(err) => {
                let _ = self.record_metrics(ResolutionMetrics::record_failure);
                let fields = [json_kv("error", err.to_string())];
                self.audit(ResolveAuditStage::PassFailed, fields.clone());
                let _ = self.emit(LogLevel::Warn, "pass_failed", fields);
                Err(err)
            }
        }
    }

    /// Apply `update` to the shared totals. A poisoned handle is reported
    /// as a warning and the totals are left alone.
    fn record_metrics(&self, update: impl FnOnce(&mut ResolutionMetrics)) -> Result<()> {
        let Some(metrics) = &self.config.metrics else {
            return Ok(());
        };
        match metrics.lock() {
            Ok(mut guard) => {
                update(&mut guard);
                Ok(())
            }
            Err(_) => self.emit(LogLevel::Warn, "metrics_poisoned", std::iter::empty()),
        }
    }

    fn audit(&self, stage: ResolveAuditStage, details: impl IntoIterator<Item = (String, Value)>) {
        let mut builder = ResolveAuditEventBuilder::new(stage);
        for (key, value) in details {
            builder.detail(key, value);
        }
        self.config.audit.record(builder.finish());
    }

    fn emit(
        &self,
        level: LogLevel,
        message: &str,
        fields: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<()> {
        let Some(logger) = &self.config.logger else {
            return Ok(());
        };
        if !logger.enabled(level) {
            return Ok(());
        }
        let event = event_with_fields(level, RESOLVE_TARGET, message, fields);
        match logger.log_event(event) {
            Err(err) if self.config.propagate_log_errors => Err(LayoutError::Logging(err)),
            _ => Ok(()),
        }
    }
}

struct Pass<'r> {
    resolver: &'r Resolver,
    stats: PassStats,
}

impl Pass<'_> {
    fn resolve_root(&mut self, root: &LayoutElement) -> Result<ResolvedNode> {
        let effective = self.substitute(None, root, 0)?;
        self.visit(None, root, effective, 0)
    }

    fn visit(
        &mut self,
        index: Option<usize>,
        original: &LayoutElement,
        effective: LayoutElement,
        depth: usize,
    ) -> Result<ResolvedNode> {
        if depth > self.resolver.config.max_depth {
            return Err(LayoutError::DepthExceeded {
                depth,
                kind: effective.kind().to_string(),
            });
        }

        self.stats.nodes_visited += 1;
        self.resolver.audit(
            ResolveAuditStage::NodeVisited,
            [
                json_kv("kind", effective.kind()),
                json_kv("depth", depth),
                json_kv("index", json!(index)),
            ],
        );

        let mut children = Vec::new();
        if let Some(spec) = effective.as_spec() {
            if spec.is_empty() {
                return Err(LayoutError::EmptySpec {
                    kind: effective.kind().to_string(),
                });
            }
            children.reserve(spec.child_count());
            for (child_index, child) in spec.children() {
                let resolved = self.substitute(Some(spec), child, depth + 1)?;
                children.push(self.visit(Some(child_index), child, resolved, depth + 1)?);
            }
        }

        Ok(ResolvedNode {
            index,
            depth,
            original: Arc::clone(original),
            effective,
            children,
        })
    }

    fn substitute(
        &mut self,
        owner: Option<&LayoutSpec>,
        child: &LayoutElement,
        depth: usize,
    ) -> Result<LayoutElement> {
        let effective = match owner {
            Some(spec) => spec.resolve_substitute(child),
            None => substitute_for(child),
        };

        if !same_node(child, &effective) {
            self.stats.substitutions += 1;
            let fields = [
                json_kv("original", child.kind()),
                json_kv("substitute", effective.kind()),
                json_kv("depth", depth),
            ];
            self.resolver
                .audit(ResolveAuditStage::SubstituteApplied, fields.clone());
            self.resolver
                .emit(self.resolver.config.log_level, "substitute_applied", fields)?;
        } else if owner.is_some_and(LayoutSpec::is_final) || child.is_final_layoutable() {
            self.stats.final_skips += 1;
            self.resolver.audit(
                ResolveAuditStage::FinalSkipped,
                [json_kv("kind", child.kind()), json_kv("depth", depth)],
            );
        }

        Ok(effective)
    }
}
