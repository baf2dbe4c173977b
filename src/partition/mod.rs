//! Graph partitioning
//!
//! Re-routes modules of named entry chunks into bucket-owned chunks
//! and repairs the graph's structural invariants: parent/child links,
//! entry and initial flags, entrypoint ordering, and the optional
//! manifest chunk loaded ahead of everything.
//!
//! Root rule: materialized buckets come first in declaration order,
//! the original entry chunk last; the first element of that sequence
//! is the group root. It alone keeps the runtime, everything else is
//! attached beneath it.

use std::collections::{BTreeSet, HashMap, HashSet};

use anyhow::Result;
use tracing::{debug, info};

use crate::config::Config;
use crate::graph::{Chunk, ChunkGraph, ChunkId};
use crate::matcher::PathMatcher;

/// Whether a pass has already rewritten the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartitionState {
    #[default]
    NotPartitioned,
    Partitioned,
}

/// Pass-scoped partitioning context. Owns the bucket-to-chunk mapping
/// for the lifetime of one pass; a restarted pass starts from a fresh
/// context and re-binds existing chunks by name.
#[derive(Debug, Default)]
pub struct PartitionPass {
    state: PartitionState,

    /// Bucket index -> chunk materialized for it this pass
    materialized: HashMap<usize, ChunkId>,

    /// The manifest chunk, once installed
    manifest: Option<ChunkId>,
}

impl PartitionPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this pass has already run
    pub fn is_partitioned(&self) -> bool {
        self.state == PartitionState::Partitioned
    }

    /// Chunk materialized for a bucket during this pass, if any
    pub fn bucket_chunk(&self, bucket: usize) -> Option<ChunkId> {
        self.materialized.get(&bucket).copied()
    }

    /// The manifest chunk installed by this pass, if any
    pub fn manifest_chunk(&self) -> Option<ChunkId> {
        self.manifest
    }
}

/// The graph partitioner
pub struct Partitioner {
    matcher: PathMatcher,
    ignore_chunks: HashSet<String>,
    manifest_name: Option<String>,
}

impl Partitioner {
    /// Create a partitioner from already-compiled rules
    pub fn new(
        matcher: PathMatcher,
        ignore_chunks: Vec<String>,
        manifest_name: Option<String>,
    ) -> Self {
        Self {
            matcher,
            ignore_chunks: ignore_chunks.into_iter().collect(),
            manifest_name,
        }
    }

    /// Create a partitioner from a validated configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.matcher()?,
            config.ignore_chunk_names(),
            config.manifest.clone(),
        ))
    }

    /// Partition the graph. Idempotent: calling again with the same
    /// pass context is a no-op, and a fresh pass over an
    /// already-partitioned graph converges without duplicating chunks.
    pub fn partition(&self, graph: &mut ChunkGraph, pass: &mut PartitionPass) {
        if pass.is_partitioned() {
            debug!("Graph already partitioned in this pass, skipping");
            return;
        }

        let targets = self.select_targets(graph);
        info!("Partitioning {} entry chunk(s)", targets.len());

        // group roots produced per target, in target order, duplicate-free
        let mut roots: Vec<ChunkId> = Vec::new();

        for target in targets {
            let root = self.partition_chunk(graph, pass, target);
            if !roots.contains(&root) {
                roots.push(root);
            }
        }

        if self.manifest_name.is_some() {
            self.install_manifest(graph, pass, &roots);
        }

        self.sweep_empty(graph, pass);
        pass.state = PartitionState::Partitioned;
    }

    /// Entry chunks with a name, minus ignored names and chunks the
    /// partitioner itself owns (bucket/manifest names are reserved, so
    /// a restarted pass never scans its own output).
    fn select_targets(&self, graph: &ChunkGraph) -> Vec<ChunkId> {
        graph
            .chunk_ids()
            .into_iter()
            .filter(|&id| {
                let Some(chunk) = graph.chunk(id) else {
                    return false;
                };
                let Some(name) = chunk.name.as_deref() else {
                    return false;
                };
                chunk.is_entry && !self.ignore_chunks.contains(name) && !self.is_reserved(name)
            })
            .collect()
    }

    fn is_reserved(&self, name: &str) -> bool {
        self.matcher.is_bucket_name(name) || self.manifest_name.as_deref() == Some(name)
    }

    /// Classify and relocate one target chunk's modules, then re-link
    /// the resulting group. Returns the group root (the target itself
    /// when nothing matched).
    fn partition_chunk(
        &self,
        graph: &mut ChunkGraph,
        pass: &mut PartitionPass,
        target: ChunkId,
    ) -> ChunkId {
        // snapshot: relocation must not skip or double-process modules
        let snapshot: Vec<_> = graph
            .chunk(target)
            .map(|c| c.modules.clone())
            .unwrap_or_default();

        // buckets that received a module from this target, in
        // declaration order
        let mut received: BTreeSet<usize> = BTreeSet::new();

        for module_id in snapshot {
            let identifier = graph
                .module(module_id)
                .and_then(|m| m.identifier.as_deref());
            let Some(bucket) = self.matcher.classify(identifier) else {
                continue;
            };

            let bucket_chunk = self.materialize(graph, pass, bucket);
            if bucket_chunk == target {
                continue;
            }

            graph.add_module_to_chunk(module_id, bucket_chunk);
            graph.remove_module_from_chunk(module_id, target);
            received.insert(bucket);
        }

        if received.is_empty() {
            return target;
        }

        debug!(
            "Routed modules from chunk {} into {} bucket(s)",
            target,
            received.len()
        );

        // ordered group: buckets in declaration order, original entry last
        let mut group: Vec<ChunkId> = received
            .iter()
            .filter_map(|b| pass.bucket_chunk(*b))
            .collect();
        group.push(target);

        self.relink_group(graph, &group);
        group[0]
    }

    /// The chunk materialized for a bucket, created at most once per
    /// pass. A chunk left over from an earlier pass is re-bound by its
    /// reserved name instead of duplicated.
    fn materialize(&self, graph: &mut ChunkGraph, pass: &mut PartitionPass, bucket: usize) -> ChunkId {
        if let Some(id) = pass.bucket_chunk(bucket) {
            return id;
        }

        let name = self.matcher.buckets()[bucket].name.clone();
        let id = match graph.chunk_by_name(&name) {
            Some(existing) => existing,
            None => graph.add_chunk(Chunk::entry(&name)),
        };

        debug!("Materialized bucket chunk '{}'", name);
        pass.materialized.insert(bucket, id);
        id
    }

    /// Make the first chunk of the group the structural root: sole
    /// entry (and initial) of the set, everything else a child with
    /// the root as sole parent. Bucket chunks are also inserted into
    /// the target's entrypoints just ahead of the target.
    fn relink_group(&self, graph: &mut ChunkGraph, group: &[ChunkId]) {
        let root = group[0];
        let target = group[group.len() - 1];

        if let Some(chunk) = graph.chunk_mut(root) {
            chunk.is_entry = true;
            chunk.is_initial = true;
        }

        for &member in &group[1..] {
            graph.set_sole_parent(member, root);
            if let Some(chunk) = graph.chunk_mut(member) {
                chunk.is_entry = false;
                chunk.is_initial = true;
            }
        }

        // buckets load ahead of the original entry in its entrypoints
        let entrypoints = graph
            .chunk(target)
            .map(|c| c.entrypoints.clone())
            .unwrap_or_default();
        for ep_id in entrypoints {
            for &bucket_chunk in &group[..group.len() - 1] {
                let Some(ep) = graph.entrypoint_mut(ep_id) else {
                    continue;
                };
                if !ep.contains(bucket_chunk) {
                    ep.insert_before(bucket_chunk, target);
                    graph.add_chunk_to_entrypoint(bucket_chunk, ep_id);
                }
            }
        }
    }

    /// Install the manifest chunk above every group root and at the
    /// front of every affected entrypoint, once across all entries.
    fn install_manifest(&self, graph: &mut ChunkGraph, pass: &mut PartitionPass, roots: &[ChunkId]) {
        let Some(name) = self.manifest_name.as_deref() else {
            return;
        };
        if roots.is_empty() {
            return;
        }

        let manifest = match pass.manifest.or_else(|| graph.chunk_by_name(name)) {
            Some(existing) => existing,
            None => {
                info!("Creating manifest chunk '{}'", name);
                graph.add_chunk(Chunk::entry(name))
            }
        };
        pass.manifest = Some(manifest);

        if let Some(chunk) = graph.chunk_mut(manifest) {
            chunk.is_entry = true;
            chunk.is_initial = true;
        }

        for &root in roots {
            if root == manifest {
                continue;
            }
            graph.set_sole_parent(root, manifest);
            // the runtime moves up into the manifest
            if let Some(chunk) = graph.chunk_mut(root) {
                chunk.is_entry = false;
            }

            let entrypoints = graph
                .chunk(root)
                .map(|c| c.entrypoints.clone())
                .unwrap_or_default();
            for ep_id in entrypoints {
                let Some(ep) = graph.entrypoint_mut(ep_id) else {
                    continue;
                };
                if !ep.contains(manifest) {
                    ep.insert_before(manifest, root);
                    graph.add_chunk_to_entrypoint(manifest, ep_id);
                }
            }
        }
    }

    /// Clear the initial flag on materialized bucket chunks that ended
    /// up (or were later left) without modules, so a downstream
    /// dead-chunk pass may remove them. Re-runnable after external
    /// optimization passes.
    pub fn sweep_empty(&self, graph: &mut ChunkGraph, pass: &PartitionPass) {
        for &chunk_id in pass.materialized.values() {
            let Some(chunk) = graph.chunk_mut(chunk_id) else {
                continue;
            };
            if chunk.is_empty() && chunk.is_initial {
                debug!(
                    "Bucket chunk '{}' is empty, clearing initial flag",
                    chunk.name.as_deref().unwrap_or("<unnamed>")
                );
                chunk.is_initial = false;
            }
        }
    }
}
