//! In-memory graph store (process lifetime only).

use async_trait::async_trait;
use kg_types::{GraphStore, GraphStoreError, KnowledgeGraph};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Holds the snapshot in memory. Loads return a copy so callers never alias stored state.
#[derive(Debug, Default)]
pub struct InMemoryGraphStore {
    graph: RwLock<KnowledgeGraph>,
    saves: AtomicUsize,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save_graph` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn load_graph(&self) -> Result<KnowledgeGraph, GraphStoreError> {
        Ok(self.graph.read().await.clone())
    }

    async fn save_graph(&self, graph: &KnowledgeGraph) -> Result<(), GraphStoreError> {
        *self.graph.write().await = graph.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
