//! Chunk and entrypoint data structures

use super::{ChunkId, EntrypointId, ModuleId};

/// An output unit: a group of modules with load-order relationships
/// to other chunks
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    /// Chunk name (only top-level chunks are named)
    pub name: Option<String>,

    /// Member modules, in insertion order, duplicate-free
    pub modules: Vec<ModuleId>,

    /// Chunks that must be loaded before this one
    pub parents: Vec<ChunkId>,

    /// Chunks loaded after this one
    pub children: Vec<ChunkId>,

    /// Whether this chunk carries the runtime bootstrap
    pub is_entry: bool,

    /// Whether this chunk is loaded eagerly on page load
    pub is_initial: bool,

    /// Entrypoints this chunk participates in
    pub entrypoints: Vec<EntrypointId>,
}

impl Chunk {
    /// Create a named entry chunk (entry + initial)
    pub fn entry(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            is_entry: true,
            is_initial: true,
            ..Self::default()
        }
    }

    /// Check if chunk has no modules
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Number of modules in chunk
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if the chunk contains a module
    pub fn has_module(&self, id: ModuleId) -> bool {
        self.modules.contains(&id)
    }
}

/// The ordered chunk-loading sequence for one named application entry
#[derive(Debug, Clone)]
pub struct Entrypoint {
    /// Entry name
    pub name: String,

    /// Chunks to load, in order
    pub chunks: Vec<ChunkId>,
}

impl Entrypoint {
    /// Create an entrypoint loading the given chunks in order
    pub fn new(name: impl Into<String>, chunks: Vec<ChunkId>) -> Self {
        Self {
            name: name.into(),
            chunks,
        }
    }

    /// Check if the entrypoint already loads a chunk
    pub fn contains(&self, chunk: ChunkId) -> bool {
        self.chunks.contains(&chunk)
    }

    /// Insert `chunk` immediately before `before`, keeping the relative
    /// order of every other chunk. If `before` is not present the chunk
    /// is pushed to the front.
    pub fn insert_before(&mut self, chunk: ChunkId, before: ChunkId) {
        let position = self
            .chunks
            .iter()
            .position(|&c| c == before)
            .unwrap_or(0);
        self.chunks.insert(position, chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_before_preserves_order() {
        let mut ep = Entrypoint::new("app", vec![10, 20, 30]);

        ep.insert_before(5, 20);
        assert_eq!(ep.chunks, vec![10, 5, 20, 30]);

        // target missing: goes to the front
        ep.insert_before(1, 99);
        assert_eq!(ep.chunks, vec![1, 10, 5, 20, 30]);
    }

    #[test]
    fn test_entry_chunk_flags() {
        let chunk = Chunk::entry("app");
        assert_eq!(chunk.name.as_deref(), Some("app"));
        assert!(chunk.is_entry);
        assert!(chunk.is_initial);
        assert!(chunk.is_empty());
    }
}
