//! Core types and traits for the knowledge graph memory server.
//!
//! Field names serialize in camelCase so stored records and tool payloads share one shape.

mod graph;
mod traits;

pub use graph::*;
pub use traits::*;
