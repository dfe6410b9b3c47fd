//! Keyword matching and subgraph induction.
//!
//! Search is a boolean filter: an entity matches when any keyword is a substring of its name,
//! type, subdomain, or any one of its observations (all compared lower-cased).

use kg_types::{Entity, KnowledgeGraph};

/// Lower-case `query` and split it on whitespace, `,`, `&` and `+`. Empty pieces are dropped.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '&' | '+'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// True if any keyword occurs in any searchable field. Keywords must already be lower-case.
pub fn entity_matches(entity: &Entity, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return false;
    }
    let name = entity.name.to_lowercase();
    let entity_type = entity.entity_type.to_lowercase();
    let subdomain = entity
        .subdomain
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();
    let observations: Vec<String> = entity
        .observations
        .iter()
        .map(|o| o.to_lowercase())
        .collect();

    keywords.iter().any(|kw| {
        let kw = kw.as_str();
        name.contains(kw)
            || entity_type.contains(kw)
            || subdomain.contains(kw)
            || observations.iter().any(|o| o.contains(kw))
    })
}

/// Entities passing `keep`, plus the relations whose endpoints are both among them.
pub fn induced_subgraph<F>(graph: KnowledgeGraph, keep: F) -> KnowledgeGraph
where
    F: Fn(&Entity) -> bool,
{
    let KnowledgeGraph {
        entities,
        relations,
    } = graph;
    let mut sub = KnowledgeGraph {
        entities: entities.into_iter().filter(|e| keep(e)).collect(),
        relations: Vec::new(),
    };
    let names = sub.entity_names();
    let relations: Vec<_> = relations
        .into_iter()
        .filter(|r| names.contains(r.from.as_str()) && names.contains(r.to.as_str()))
        .collect();
    sub.relations = relations;
    sub
}
