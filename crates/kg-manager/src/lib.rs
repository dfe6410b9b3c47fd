//! Graph operations over a [`GraphStore`](kg_types::GraphStore): load, compute, persist if mutated.

mod manager;
pub mod search;

pub use kg_types::KgError;
pub use manager::KnowledgeGraphManager;
