//! JSON graph descriptions
//!
//! A serde-friendly mirror of the chunk graph so the CLI can feed a
//! host pipeline's graph through the partitioner and write the result
//! back out. The library API works on [`ChunkGraph`] directly.

use std::collections::HashMap;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::{Chunk, ChunkGraph, ChunkId, Entrypoint};

/// One chunk in a graph file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkEntry {
    /// Chunk name; unnamed chunks serialize as null
    pub name: Option<String>,

    /// Whether the chunk carries a runtime
    #[serde(default = "default_true")]
    pub entry: bool,

    /// Whether the chunk loads eagerly
    #[serde(default = "default_true")]
    pub initial: bool,

    /// Module identifiers, in order
    #[serde(default)]
    pub modules: Vec<String>,

    /// Parent chunk names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
}

fn default_true() -> bool {
    true
}

/// One entrypoint in a graph file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntrypointEntry {
    /// Entry name
    pub name: String,

    /// Chunk names to load, in order
    pub chunks: Vec<String>,
}

/// A complete graph description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphFile {
    #[serde(default)]
    pub chunks: Vec<ChunkEntry>,

    #[serde(default)]
    pub entrypoints: Vec<EntrypointEntry>,
}

impl GraphFile {
    /// Build an owned chunk graph from the description. Modules are
    /// deduplicated by identifier across chunks.
    pub fn into_graph(self) -> Result<ChunkGraph> {
        let mut graph = ChunkGraph::new();
        let mut by_name: HashMap<String, ChunkId> = HashMap::new();

        for entry in &self.chunks {
            let chunk = Chunk {
                name: entry.name.clone(),
                is_entry: entry.entry,
                is_initial: entry.initial,
                ..Chunk::default()
            };
            let id = graph.add_chunk(chunk);

            if let Some(name) = &entry.name {
                if by_name.insert(name.clone(), id).is_some() {
                    bail!("Duplicate chunk name in graph file: {}", name);
                }
            }

            for identifier in &entry.modules {
                let module_id = graph.add_module(Some(identifier.clone()));
                graph.add_module_to_chunk(module_id, id);
            }
        }

        for entry in &self.chunks {
            let Some(name) = &entry.name else { continue };
            for parent in &entry.parents {
                let Some(&parent_id) = by_name.get(parent) else {
                    bail!("Unknown parent chunk '{}' for chunk '{}'", parent, name);
                };
                graph.connect_chunks(parent_id, by_name[name]);
            }
        }

        for entry in self.entrypoints {
            let mut chunks = Vec::with_capacity(entry.chunks.len());
            for name in &entry.chunks {
                let Some(&id) = by_name.get(name) else {
                    bail!("Unknown chunk '{}' in entrypoint '{}'", name, entry.name);
                };
                chunks.push(id);
            }
            graph.add_entrypoint(Entrypoint::new(entry.name, chunks));
        }

        Ok(graph)
    }

    /// Describe an existing graph. Synthetic modules have no file
    /// representation and are skipped; unnamed chunks are never
    /// referenced as parents.
    pub fn from_graph(graph: &ChunkGraph) -> Self {
        let name_of = |id: ChunkId| -> Option<String> {
            graph.chunk(id).and_then(|c| c.name.clone())
        };

        let chunks = graph
            .chunk_ids()
            .into_iter()
            .filter_map(|id| graph.chunk(id).map(|c| (id, c)))
            .map(|(_, chunk)| ChunkEntry {
                name: chunk.name.clone(),
                entry: chunk.is_entry,
                initial: chunk.is_initial,
                modules: chunk
                    .modules
                    .iter()
                    .filter_map(|&m| graph.module(m).and_then(|m| m.identifier.clone()))
                    .collect(),
                parents: chunk.parents.iter().filter_map(|&p| name_of(p)).collect(),
            })
            .collect();

        let entrypoints = graph
            .entrypoint_ids()
            .into_iter()
            .filter_map(|id| graph.entrypoint(id))
            .map(|ep| EntrypointEntry {
                name: ep.name.clone(),
                chunks: ep.chunks.iter().filter_map(|&c| name_of(c)).collect(),
            })
            .collect();

        Self {
            chunks,
            entrypoints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "chunks": [
            { "name": "app", "modules": ["./src/app.js", "node_modules/react/index.js"] },
            { "name": "other", "modules": ["node_modules/react/index.js"] }
        ],
        "entrypoints": [
            { "name": "app", "chunks": ["app"] },
            { "name": "other", "chunks": ["other"] }
        ]
    }"#;

    #[test]
    fn test_load_dedupes_shared_modules() {
        let file: GraphFile = serde_json::from_str(SAMPLE).unwrap();
        let graph = file.into_graph().unwrap();

        assert_eq!(graph.chunk_count(), 2);
        // react appears in both chunks but is one module
        assert_eq!(graph.module_count(), 2);

        let react = graph
            .module_by_identifier("node_modules/react/index.js")
            .unwrap();
        assert_eq!(graph.module(react).unwrap().chunks.len(), 2);
    }

    #[test]
    fn test_unknown_entrypoint_chunk_rejected() {
        let file: GraphFile = serde_json::from_str(
            r#"{ "chunks": [], "entrypoints": [{ "name": "app", "chunks": ["missing"] }] }"#,
        )
        .unwrap();
        assert!(file.into_graph().is_err());
    }

    #[test]
    fn test_round_trip_keeps_structure() {
        let file: GraphFile = serde_json::from_str(SAMPLE).unwrap();
        let graph = file.into_graph().unwrap();
        let out = GraphFile::from_graph(&graph);

        assert_eq!(out.chunks.len(), 2);
        assert_eq!(out.entrypoints.len(), 2);
        assert_eq!(out.chunks[0].name.as_deref(), Some("app"));
        assert_eq!(out.chunks[0].modules.len(), 2);
    }
}
