//! Chunk graph data structures
//!
//! An owned arena of modules, chunks and entrypoints addressed by
//! stable handles. The partitioner mutates it through exclusive
//! references; no I/O happens here.

mod chunk;
pub mod io;

use std::collections::HashMap;

pub use chunk::{Chunk, Entrypoint};

/// Unique identifier for a module
pub type ModuleId = usize;

/// Unique identifier for a chunk
pub type ChunkId = usize;

/// Unique identifier for an entrypoint
pub type EntrypointId = usize;

/// A single compiled source unit with a resolved identifier
#[derive(Debug, Clone, Default)]
pub struct Module {
    /// Resolved request, possibly with a loader-chain prefix
    /// (`style-loader!./a.css`). `None` for synthetic modules.
    pub identifier: Option<String>,

    /// Chunks this module currently belongs to
    pub chunks: Vec<ChunkId>,
}

/// The chunk graph
#[derive(Debug, Default)]
pub struct ChunkGraph {
    /// All modules indexed by their ID
    modules: HashMap<ModuleId, Module>,

    /// All chunks indexed by their ID
    chunks: HashMap<ChunkId, Chunk>,

    /// All entrypoints indexed by their ID
    entrypoints: HashMap<EntrypointId, Entrypoint>,

    /// Map from identifier to module ID
    identifier_to_module: HashMap<String, ModuleId>,

    next_module_id: ModuleId,
    next_chunk_id: ChunkId,
    next_entrypoint_id: EntrypointId,
}

impl ChunkGraph {
    /// Create a new empty chunk graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module. Modules with an identifier are deduplicated by it.
    pub fn add_module(&mut self, identifier: Option<String>) -> ModuleId {
        if let Some(ident) = &identifier {
            if let Some(&id) = self.identifier_to_module.get(ident) {
                return id;
            }
        }

        let id = self.next_module_id;
        self.next_module_id += 1;

        if let Some(ident) = &identifier {
            self.identifier_to_module.insert(ident.clone(), id);
        }
        self.modules.insert(
            id,
            Module {
                identifier,
                chunks: Vec::new(),
            },
        );

        id
    }

    /// Add a chunk
    pub fn add_chunk(&mut self, chunk: Chunk) -> ChunkId {
        let id = self.next_chunk_id;
        self.next_chunk_id += 1;
        self.chunks.insert(id, chunk);
        id
    }

    /// Add an entrypoint and register it on its member chunks
    pub fn add_entrypoint(&mut self, entrypoint: Entrypoint) -> EntrypointId {
        let id = self.next_entrypoint_id;
        self.next_entrypoint_id += 1;

        for &chunk_id in &entrypoint.chunks {
            if let Some(chunk) = self.chunks.get_mut(&chunk_id) {
                if !chunk.entrypoints.contains(&id) {
                    chunk.entrypoints.push(id);
                }
            }
        }

        self.entrypoints.insert(id, entrypoint);
        id
    }

    /// Get a module by ID
    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(&id)
    }

    /// Get a chunk by ID
    pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.get(&id)
    }

    /// Get a mutable reference to a chunk
    pub fn chunk_mut(&mut self, id: ChunkId) -> Option<&mut Chunk> {
        self.chunks.get_mut(&id)
    }

    /// Get an entrypoint by ID
    pub fn entrypoint(&self, id: EntrypointId) -> Option<&Entrypoint> {
        self.entrypoints.get(&id)
    }

    /// Get a mutable reference to an entrypoint
    pub fn entrypoint_mut(&mut self, id: EntrypointId) -> Option<&mut Entrypoint> {
        self.entrypoints.get_mut(&id)
    }

    /// Get module ID from its identifier
    pub fn module_by_identifier(&self, identifier: &str) -> Option<ModuleId> {
        self.identifier_to_module.get(identifier).copied()
    }

    /// Find a chunk by name
    pub fn chunk_by_name(&self, name: &str) -> Option<ChunkId> {
        self.chunk_ids()
            .into_iter()
            .find(|id| self.chunks[id].name.as_deref() == Some(name))
    }

    /// All module IDs, in creation order
    pub fn module_ids(&self) -> Vec<ModuleId> {
        let mut ids: Vec<ModuleId> = self.modules.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// All chunk IDs, in creation order
    pub fn chunk_ids(&self) -> Vec<ChunkId> {
        let mut ids: Vec<ChunkId> = self.chunks.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// All entrypoint IDs, in creation order
    pub fn entrypoint_ids(&self) -> Vec<EntrypointId> {
        let mut ids: Vec<EntrypointId> = self.entrypoints.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Add a module to a chunk (both sides, duplicate-free)
    pub fn add_module_to_chunk(&mut self, module_id: ModuleId, chunk_id: ChunkId) {
        if let Some(chunk) = self.chunks.get_mut(&chunk_id) {
            if !chunk.modules.contains(&module_id) {
                chunk.modules.push(module_id);
            }
        }
        if let Some(module) = self.modules.get_mut(&module_id) {
            if !module.chunks.contains(&chunk_id) {
                module.chunks.push(chunk_id);
            }
        }
    }

    /// Remove a module from a chunk (both sides)
    pub fn remove_module_from_chunk(&mut self, module_id: ModuleId, chunk_id: ChunkId) {
        if let Some(chunk) = self.chunks.get_mut(&chunk_id) {
            chunk.modules.retain(|&m| m != module_id);
        }
        if let Some(module) = self.modules.get_mut(&module_id) {
            module.chunks.retain(|&c| c != chunk_id);
        }
    }

    /// Link `child` under `parent` (both sides, duplicate-free)
    pub fn connect_chunks(&mut self, parent: ChunkId, child: ChunkId) {
        if let Some(chunk) = self.chunks.get_mut(&parent) {
            if !chunk.children.contains(&child) {
                chunk.children.push(child);
            }
        }
        if let Some(chunk) = self.chunks.get_mut(&child) {
            if !chunk.parents.contains(&parent) {
                chunk.parents.push(parent);
            }
        }
    }

    /// Make `parent` the sole parent of `child`, unlinking any former
    /// parents on both sides
    pub fn set_sole_parent(&mut self, child: ChunkId, parent: ChunkId) {
        let former: Vec<ChunkId> = self
            .chunks
            .get(&child)
            .map(|c| c.parents.clone())
            .unwrap_or_default();

        for old in former {
            if old == parent {
                continue;
            }
            if let Some(chunk) = self.chunks.get_mut(&old) {
                chunk.children.retain(|&c| c != child);
            }
        }
        if let Some(chunk) = self.chunks.get_mut(&child) {
            chunk.parents.clear();
        }

        self.connect_chunks(parent, child);
    }

    /// Register an entrypoint on a chunk
    pub fn add_chunk_to_entrypoint(&mut self, chunk_id: ChunkId, entrypoint_id: EntrypointId) {
        if let Some(chunk) = self.chunks.get_mut(&chunk_id) {
            if !chunk.entrypoints.contains(&entrypoint_id) {
                chunk.entrypoints.push(entrypoint_id);
            }
        }
    }

    /// Total number of modules
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Total number of chunks
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}
