//! KnowledgeGraphManager: the eight graph operations over a store.

use crate::search::{entity_matches, induced_subgraph, tokenize};
use kg_store::{GraphStore, JsonlGraphStore};
use kg_types::{
    Entity, KgError, KnowledgeGraph, ObservationDeletion, ObservationInput, ObservationResult,
    Relation,
};
use std::collections::HashSet;
use std::path::Path;

/// Runs every operation against a freshly loaded snapshot; there is no cached graph between calls.
///
/// Callers must serialize calls that share one backing file: two concurrent mutations both load
/// the same snapshot and the later save wins.
pub struct KnowledgeGraphManager<S> {
    store: S,
}

impl KnowledgeGraphManager<JsonlGraphStore> {
    /// Manager over the line-delimited file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::new(JsonlGraphStore::new(path))
    }
}

impl<S> KnowledgeGraphManager<S>
where
    S: GraphStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Add entities whose name is not yet taken. Returns only the ones added.
    ///
    /// Repeated observation strings inside a new entity are collapsed to their first occurrence,
    /// and the returned entities carry that deduplicated list. A name repeated within `entities`
    /// keeps only its first entry.
    pub async fn create_entities(&self, entities: Vec<Entity>) -> Result<Vec<Entity>, KgError> {
        let mut graph = self.store.load_graph().await?;
        let mut names: HashSet<String> = graph.entities.iter().map(|e| e.name.clone()).collect();
        let mut added = Vec::new();
        for mut entity in entities {
            if !names.insert(entity.name.clone()) {
                continue;
            }
            entity.dedup_observations();
            graph.entities.push(entity.clone());
            added.push(entity);
        }
        if !added.is_empty() {
            self.store.save_graph(&graph).await?;
        }
        tracing::debug!(added = added.len(), "create_entities");
        Ok(added)
    }

    /// Add relations whose `(from, to, relationType)` triple is new. Endpoints need not exist.
    pub async fn create_relations(
        &self,
        relations: Vec<Relation>,
    ) -> Result<Vec<Relation>, KgError> {
        let mut graph = self.store.load_graph().await?;
        let mut added = Vec::new();
        for relation in relations {
            if graph.contains_relation(&relation) {
                continue;
            }
            graph.relations.push(relation.clone());
            added.push(relation);
        }
        if !added.is_empty() {
            self.store.save_graph(&graph).await?;
        }
        tracing::debug!(added = added.len(), "create_relations");
        Ok(added)
    }

    /// Append new observation strings per entity.
    ///
    /// Fails with [`KgError::NotFound`] on the first unknown entity; nothing is persisted then.
    pub async fn add_observations(
        &self,
        inputs: Vec<ObservationInput>,
    ) -> Result<Vec<ObservationResult>, KgError> {
        let mut graph = self.store.load_graph().await?;
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            let entity = graph
                .entity_mut(&input.entity_name)
                .ok_or_else(|| KgError::NotFound(input.entity_name.clone()))?;
            let added = entity.add_observations(&input.contents);
            results.push(ObservationResult {
                entity_name: input.entity_name,
                added_observations: added,
            });
        }
        let total: usize = results.iter().map(|r| r.added_observations.len()).sum();
        if total > 0 {
            self.store.save_graph(&graph).await?;
        }
        tracing::debug!(entities = results.len(), added = total, "add_observations");
        Ok(results)
    }

    /// Remove the named entities and every relation touching them. Unknown names are ignored.
    pub async fn delete_entities(&self, names: Vec<String>) -> Result<(), KgError> {
        let mut graph = self.store.load_graph().await?;
        let doomed: HashSet<&str> = names.iter().map(String::as_str).collect();
        let before = (graph.entities.len(), graph.relations.len());
        graph.entities.retain(|e| !doomed.contains(e.name.as_str()));
        graph.relations.retain(|r| !r.touches(&doomed));
        self.store.save_graph(&graph).await?;
        tracing::debug!(
            entities = before.0 - graph.entities.len(),
            relations = before.1 - graph.relations.len(),
            "delete_entities"
        );
        Ok(())
    }

    /// Remove listed observation strings. Entities that do not exist are skipped silently.
    pub async fn delete_observations(
        &self,
        deletions: Vec<ObservationDeletion>,
    ) -> Result<(), KgError> {
        let mut graph = self.store.load_graph().await?;
        for deletion in &deletions {
            match graph.entity_mut(&deletion.entity_name) {
                Some(entity) => entity
                    .observations
                    .retain(|obs| !deletion.observations.contains(obs)),
                None => {
                    tracing::debug!(entity = %deletion.entity_name, "delete_observations: no such entity")
                }
            }
        }
        self.store.save_graph(&graph).await?;
        Ok(())
    }

    /// Remove relations matching any given triple exactly.
    pub async fn delete_relations(&self, relations: Vec<Relation>) -> Result<(), KgError> {
        let mut graph = self.store.load_graph().await?;
        let before = graph.relations.len();
        graph
            .relations
            .retain(|r| !relations.iter().any(|d| d.same_triple(r)));
        self.store.save_graph(&graph).await?;
        tracing::debug!(removed = before - graph.relations.len(), "delete_relations");
        Ok(())
    }

    pub async fn read_graph(&self) -> Result<KnowledgeGraph, KgError> {
        Ok(self.store.load_graph().await?)
    }

    /// Entities matching any keyword of `query`, with the relations among them.
    /// A blank query matches nothing.
    pub async fn search_nodes(&self, query: &str) -> Result<KnowledgeGraph, KgError> {
        let keywords = tokenize(query);
        if keywords.is_empty() {
            return Ok(KnowledgeGraph::default());
        }
        let graph = self.store.load_graph().await?;
        let result = induced_subgraph(graph, |e| entity_matches(e, &keywords));
        tracing::debug!(
            keywords = keywords.len(),
            entities = result.entities.len(),
            relations = result.relations.len(),
            "search_nodes"
        );
        Ok(result)
    }

    /// The named entities that exist, with the relations among them.
    pub async fn open_nodes(&self, names: &[String]) -> Result<KnowledgeGraph, KgError> {
        let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
        let graph = self.store.load_graph().await?;
        Ok(induced_subgraph(graph, |e| wanted.contains(e.name.as_str())))
    }
}
