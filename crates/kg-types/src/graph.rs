//! Graph model: entities, relations, and the observation DTOs used by the operations.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named, typed knowledge unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Unique within the graph.
    pub name: String,
    /// Free-form classification tag.
    pub entity_type: String,
    /// Facts in insertion order; no duplicates.
    pub observations: Vec<String>,
    /// Knowledge area. `None` means the entity spans multiple domains.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
}

impl Entity {
    pub fn new(name: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity_type: entity_type.into(),
            observations: Vec::new(),
            subdomain: None,
        }
    }

    pub fn with_observations<I, T>(mut self, observations: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.observations = observations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.subdomain = Some(subdomain.into());
        self
    }

    /// Append each string not already present, in order. Returns what was appended.
    pub fn add_observations<'a, I>(&mut self, contents: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut added = Vec::new();
        for obs in contents {
            if !self.observations.contains(obs) {
                self.observations.push(obs.clone());
                added.push(obs.clone());
            }
        }
        added
    }

    /// Drop repeated observation strings, keeping the first occurrence.
    pub fn dedup_observations(&mut self) {
        let mut seen = HashSet::new();
        self.observations.retain(|obs| seen.insert(obs.clone()));
    }
}

/// Directed, typed edge between two entities, referenced by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    /// Name of the entity where the relation starts.
    pub from: String,
    /// Name of the entity where the relation ends.
    pub to: String,
    /// Active-voice verb phrase, e.g. "depends_on".
    pub relation_type: String,
}

impl Relation {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        relation_type: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relation_type: relation_type.into(),
        }
    }

    /// Identity used for deduplication: `(from, to, relationType)`.
    pub fn same_triple(&self, other: &Relation) -> bool {
        self.from == other.from && self.to == other.to && self.relation_type == other.relation_type
    }

    pub fn touches(&self, names: &HashSet<&str>) -> bool {
        names.contains(self.from.as_str()) || names.contains(self.to.as_str())
    }
}

/// Snapshot of the whole graph, or an induced subgraph of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub entities: Vec<Entity>,
    pub relations: Vec<Relation>,
}

impl KnowledgeGraph {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relations.is_empty()
    }

    pub fn entity_names(&self) -> HashSet<&str> {
        self.entities.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn entity_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.name == name)
    }

    pub fn contains_relation(&self, relation: &Relation) -> bool {
        self.relations.iter().any(|r| r.same_triple(relation))
    }
}

/// Input item for `add_observations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ObservationInput {
    /// Entity to add the observations to.
    pub entity_name: String,
    pub contents: Vec<String>,
}

/// Per-entity outcome of `add_observations`: only the strings actually appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationResult {
    pub entity_name: String,
    pub added_observations: Vec<String>,
}

/// Input item for `delete_observations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ObservationDeletion {
    /// Entity holding the observations.
    pub entity_name: String,
    pub observations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entity_serializes_camel_case_and_omits_missing_subdomain() {
        let e = Entity::new("ComparisonV3Coordinator", "component").with_observations(["x"]);
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(
            v,
            json!({ "name": "ComparisonV3Coordinator", "entityType": "component", "observations": ["x"] })
        );
    }

    #[test]
    fn empty_subdomain_is_distinct_from_absent() {
        let absent: Entity =
            serde_json::from_value(json!({ "name": "a", "entityType": "t", "observations": [] }))
                .unwrap();
        let null: Entity = serde_json::from_value(
            json!({ "name": "a", "entityType": "t", "observations": [], "subdomain": null }),
        )
        .unwrap();
        let empty: Entity = serde_json::from_value(
            json!({ "name": "a", "entityType": "t", "observations": [], "subdomain": "" }),
        )
        .unwrap();
        assert_eq!(absent.subdomain, None);
        assert_eq!(null.subdomain, None);
        assert_eq!(empty.subdomain.as_deref(), Some(""));
        assert_eq!(serde_json::to_value(&empty).unwrap()["subdomain"], "");
    }

    #[test]
    fn entity_requires_observations_field() {
        let res: Result<Entity, _> =
            serde_json::from_value(json!({ "name": "a", "entityType": "t" }));
        assert!(res.is_err());
    }

    #[test]
    fn add_observations_skips_existing_and_repeats() {
        let mut e = Entity::new("a", "t").with_observations(["one"]);
        let input = vec!["one".to_string(), "two".to_string(), "two".to_string()];
        let added = e.add_observations(&input);
        assert_eq!(added, vec!["two".to_string()]);
        assert_eq!(e.observations, vec!["one", "two"]);
    }

    #[test]
    fn relation_identity_is_the_full_triple() {
        let a = Relation::new("A", "B", "uses");
        assert!(a.same_triple(&Relation::new("A", "B", "uses")));
        assert!(!a.same_triple(&Relation::new("A", "B", "owns")));
        assert!(!a.same_triple(&Relation::new("B", "A", "uses")));
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            json!({ "from": "A", "to": "B", "relationType": "uses" })
        );
    }
}
