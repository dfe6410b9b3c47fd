//! Line codec for the store file: one tagged JSON record per line.

use kg_types::{Entity, GraphStoreError, KnowledgeGraph, Relation};
use serde::{Deserialize, Serialize};

/// One stored line. The `type` field selects the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreRecord {
    Entity(Entity),
    Relation(Relation),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum StoreRecordRef<'a> {
    Entity(&'a Entity),
    Relation(&'a Relation),
}

/// Decode a single line. Blank lines yield `Ok(None)`.
pub fn decode_line(line: &str) -> Result<Option<StoreRecord>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Fold decoded records into a graph, keeping file order.
pub(crate) fn decode_graph(content: &str) -> KnowledgeGraph {
    let mut graph = KnowledgeGraph::default();
    for (idx, line) in content.lines().enumerate() {
        match decode_line(line) {
            Ok(Some(StoreRecord::Entity(e))) => graph.entities.push(e),
            Ok(Some(StoreRecord::Relation(r))) => graph.relations.push(r),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(line = idx + 1, error = %e, "skipping malformed store record");
            }
        }
    }
    graph
}

/// Encode every entity, then every relation, one record per line with a trailing newline.
pub fn encode_graph(graph: &KnowledgeGraph) -> Result<String, GraphStoreError> {
    let mut out = String::new();
    for e in &graph.entities {
        out.push_str(&serde_json::to_string(&StoreRecordRef::Entity(e))?);
        out.push('\n');
    }
    for r in &graph.relations {
        out.push_str(&serde_json::to_string(&StoreRecordRef::Relation(r))?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_entities_before_relations_with_discriminator() {
        let graph = KnowledgeGraph {
            entities: vec![Entity::new("A", "service").with_subdomain("budget_management")],
            relations: vec![Relation::new("A", "B", "calls")],
        };
        let text = encode_graph(&graph).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(text.ends_with('\n'));
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "entity");
        assert_eq!(first["subdomain"], "budget_management");
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["type"], "relation");
        assert_eq!(second["relationType"], "calls");
    }

    #[test]
    fn empty_graph_encodes_to_empty_string() {
        assert_eq!(encode_graph(&KnowledgeGraph::default()).unwrap(), "");
    }

    #[test]
    fn decode_line_dispatches_on_type() {
        let e = decode_line(r#"{"type":"entity","name":"A","entityType":"t","observations":["o"]}"#)
            .unwrap();
        assert!(matches!(e, Some(StoreRecord::Entity(ref x)) if x.name == "A"));
        let r = decode_line(r#"{"type":"relation","from":"A","to":"B","relationType":"uses"}"#)
            .unwrap();
        assert_eq!(r, Some(StoreRecord::Relation(Relation::new("A", "B", "uses"))));
        assert_eq!(decode_line("   ").unwrap(), None);
    }

    #[test]
    fn decode_line_rejects_unknown_or_incomplete_records() {
        assert!(decode_line(r#"{"type":"widget","name":"A"}"#).is_err());
        assert!(decode_line(r#"{"type":"relation","from":"A","to":"B"}"#).is_err());
        assert!(decode_line(r#"{"name":"A","entityType":"t","observations":[]}"#).is_err());
        assert!(decode_line("not json").is_err());
    }

    #[test]
    fn decode_graph_skips_bad_lines_and_keeps_order() {
        let content = concat!(
            r#"{"type":"entity","name":"A","entityType":"t","observations":[]}"#,
            "\n\n",
            "{broken\n",
            r#"{"type":"relation","from":"A","to":"B","relationType":"uses"}"#,
            "\n",
            r#"{"type":"entity","name":"B","entityType":"t","observations":[],"subdomain":null}"#,
            "\n",
        );
        let graph = decode_graph(content);
        let names: Vec<&str> = graph.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(graph.relations, vec![Relation::new("A", "B", "uses")]);
        assert_eq!(graph.entities[1].subdomain, None);
    }
}
