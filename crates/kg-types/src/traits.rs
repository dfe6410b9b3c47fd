//! Store trait and error types shared by the persistence and operations crates.

use crate::KnowledgeGraph;
use async_trait::async_trait;
use std::path::PathBuf;

/// Backing store for the graph: whole-snapshot load and whole-snapshot replace.
///
/// Contract: `load_graph` on a missing store yields an empty graph, never an error.
/// `save_graph` replaces the entire previous content; it is never an incremental append.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Read the full graph, preserving stored order.
    async fn load_graph(&self) -> Result<KnowledgeGraph, GraphStoreError>;

    /// Replace the stored graph with `graph`.
    async fn save_graph(&self, graph: &KnowledgeGraph) -> Result<(), GraphStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GraphStoreError {
    #[error("store io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl GraphStoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Operation-level failure.
#[derive(Debug, thiserror::Error)]
pub enum KgError {
    #[error("Entity with name {0} not found")]
    NotFound(String),
    #[error("store: {0}")]
    Store(#[from] GraphStoreError),
}
