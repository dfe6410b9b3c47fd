//! Knowledge graph memory server: tool registry, dispatch, and HTTP routes.

pub mod config;
pub mod server;
pub mod tools;
