//! Graph store trait with file-backed and in-memory implementations.

mod jsonl;
mod memory;
mod record;

pub use jsonl::JsonlGraphStore;
pub use kg_types::{GraphStore, GraphStoreError, KnowledgeGraph};
pub use memory::InMemoryGraphStore;
pub use record::{decode_line, encode_graph, StoreRecord};
