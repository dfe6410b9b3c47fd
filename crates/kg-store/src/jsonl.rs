//! Line-delimited JSON file store.

use crate::record::{decode_graph, encode_graph};
use async_trait::async_trait;
use kg_types::{GraphStore, GraphStoreError, KnowledgeGraph};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// File-backed store. Every load reads the whole file; every save rewrites it.
pub struct JsonlGraphStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonlGraphStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    async fn create_empty(&self) -> Result<(), GraphStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| GraphStoreError::io(parent, e))?;
        }
        tokio::fs::write(&self.path, b"")
            .await
            .map_err(|e| GraphStoreError::io(&self.path, e))?;
        tracing::info!(path = %self.path.display(), "created empty graph store");
        Ok(())
    }
}

#[async_trait]
impl GraphStore for JsonlGraphStore {
    async fn load_graph(&self) -> Result<KnowledgeGraph, GraphStoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.create_empty().await?;
                return Ok(KnowledgeGraph::default());
            }
            Err(e) => return Err(GraphStoreError::io(&self.path, e)),
        };
        let graph = decode_graph(&content);
        tracing::debug!(
            entities = graph.entities.len(),
            relations = graph.relations.len(),
            "loaded graph"
        );
        Ok(graph)
    }

    async fn save_graph(&self, graph: &KnowledgeGraph) -> Result<(), GraphStoreError> {
        let buf = encode_graph(graph)?;
        let _guard = self.write_lock.lock().await;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, buf.as_bytes())
            .await
            .map_err(|e| GraphStoreError::io(&tmp, e))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(GraphStoreError::io(&self.path, e));
        }
        tracing::debug!(
            entities = graph.entities.len(),
            relations = graph.relations.len(),
            bytes = buf.len(),
            "saved graph"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kg_types::{Entity, Relation};
    use tempfile::tempdir;

    fn sample_graph() -> KnowledgeGraph {
        KnowledgeGraph {
            entities: vec![
                Entity::new("ComparisonV3Coordinator", "component")
                    .with_observations(["coordinates comparisons"]),
                Entity::new("BudgetCalculator", "service")
                    .with_observations(["runs calculation nightly", "owned by finance"])
                    .with_subdomain("budget_management"),
                Entity::new("Blank", "marker").with_subdomain(""),
            ],
            relations: vec![
                Relation::new("ComparisonV3Coordinator", "BudgetCalculator", "calls"),
                Relation::new("BudgetCalculator", "Ledger", "writes_to"),
            ],
        }
    }

    #[tokio::test]
    async fn missing_file_loads_empty_and_is_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("memory.json");
        let store = JsonlGraphStore::new(&path);
        let graph = store.load_graph().await.unwrap();
        assert!(graph.is_empty());
        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = JsonlGraphStore::new(dir.path().join("memory.json"));
        let graph = sample_graph();
        store.save_graph(&graph).await.unwrap();
        let loaded = store.load_graph().await.unwrap();
        assert_eq!(loaded, graph);
        assert_eq!(loaded.entities[0].subdomain, None);
        assert_eq!(loaded.entities[2].subdomain.as_deref(), Some(""));

        store.save_graph(&loaded).await.unwrap();
        assert_eq!(store.load_graph().await.unwrap(), graph);
    }

    #[tokio::test]
    async fn save_replaces_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        let store = JsonlGraphStore::new(&path);
        store.save_graph(&sample_graph()).await.unwrap();
        let smaller = KnowledgeGraph {
            entities: vec![Entity::new("Only", "t")],
            relations: vec![],
        };
        store.save_graph(&smaller).await.unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert_eq!(store.load_graph().await.unwrap(), smaller);
        assert!(!dir.path().join("memory.json.tmp").exists());
    }

    #[tokio::test]
    async fn malformed_lines_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(
            &path,
            concat!(
                r#"{"type":"entity","name":"A","entityType":"t","observations":["x"]}"#,
                "\n",
                "garbage line\n",
                r#"{"type":"entity","name":"B"}"#,
                "\n\n",
                r#"{"type":"relation","from":"A","to":"B","relationType":"uses"}"#,
                "\n",
            ),
        )
        .unwrap();
        let graph = JsonlGraphStore::new(&path).load_graph().await.unwrap();
        assert_eq!(graph.entities.len(), 1);
        assert_eq!(graph.entities[0].name, "A");
        assert_eq!(graph.relations, vec![Relation::new("A", "B", "uses")]);
    }

    #[tokio::test]
    async fn failed_save_keeps_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        let store = JsonlGraphStore::new(&path);
        let graph = sample_graph();
        store.save_graph(&graph).await.unwrap();

        // Occupy the temp path with a non-empty directory so the replacement cannot be written.
        let blocker = dir.path().join("memory.json.tmp");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), "x").unwrap();

        let err = store
            .save_graph(&KnowledgeGraph::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GraphStoreError::Io { .. }));
        assert_eq!(store.load_graph().await.unwrap(), graph);
    }

    #[tokio::test]
    async fn unreadable_store_is_an_io_error() {
        let dir = tempdir().unwrap();
        // A directory at the store path exists but cannot be read as a file.
        let store = JsonlGraphStore::new(dir.path());
        let err = store.load_graph().await.unwrap_err();
        assert!(matches!(err, GraphStoreError::Io { .. }));
    }
}
