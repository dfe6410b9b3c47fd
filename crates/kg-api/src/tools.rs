//! Tool registry and dispatch: maps named tool calls onto manager operations.

use kg_manager::KnowledgeGraphManager;
use kg_store::GraphStore;
use kg_types::{Entity, KgError, ObservationDeletion, ObservationInput, Relation};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CREATE_ENTITIES: &str = "create_entities";
pub const CREATE_RELATIONS: &str = "create_relations";
pub const ADD_OBSERVATIONS: &str = "add_observations";
pub const DELETE_ENTITIES: &str = "delete_entities";
pub const DELETE_OBSERVATIONS: &str = "delete_observations";
pub const DELETE_RELATIONS: &str = "delete_relations";
pub const READ_GRAPH: &str = "read_graph";
pub const SEARCH_NODES: &str = "search_nodes";
pub const OPEN_NODES: &str = "open_nodes";

const TOOL_NAMES: [&str; 9] = [
    CREATE_ENTITIES,
    CREATE_RELATIONS,
    ADD_OBSERVATIONS,
    DELETE_ENTITIES,
    DELETE_OBSERVATIONS,
    DELETE_RELATIONS,
    READ_GRAPH,
    SEARCH_NODES,
    OPEN_NODES,
];

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("No arguments provided for tool: {0}")]
    NoArguments(String),
    #[error("Invalid arguments for tool {tool}: {message}")]
    InvalidArguments { tool: String, message: String },
    #[error(transparent)]
    Operation(#[from] KgError),
    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Listing entry for one tool.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

#[derive(Deserialize, JsonSchema)]
struct EntitiesArgs {
    entities: Vec<Entity>,
}

#[derive(Deserialize, JsonSchema)]
struct RelationsArgs {
    /// Relations in active voice.
    relations: Vec<Relation>,
}

#[derive(Deserialize, JsonSchema)]
struct AddObservationsArgs {
    observations: Vec<ObservationInput>,
}

#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct DeleteEntitiesArgs {
    /// Names of the entities to delete.
    entity_names: Vec<String>,
}

#[derive(Deserialize, JsonSchema)]
struct DeleteObservationsArgs {
    deletions: Vec<ObservationDeletion>,
}

#[derive(Deserialize, JsonSchema)]
struct ReadGraphArgs {}

#[derive(Deserialize, JsonSchema)]
struct SearchArgs {
    /// Keywords matched against names, types, subdomains and observations.
    query: String,
}

#[derive(Deserialize, JsonSchema)]
struct OpenArgs {
    /// Names of the entities to retrieve.
    names: Vec<String>,
}

fn tool<T: JsonSchema>(name: &'static str, description: &'static str) -> ToolDefinition {
    ToolDefinition {
        name,
        description,
        input_schema: schemars::schema_for!(T).to_value(),
    }
}

/// All tools, in listing order.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        tool::<EntitiesArgs>(
            CREATE_ENTITIES,
            "Create multiple new entities in the knowledge graph",
        ),
        tool::<RelationsArgs>(
            CREATE_RELATIONS,
            "Create multiple new relations between entities in the knowledge graph. Relations should be in active voice",
        ),
        tool::<AddObservationsArgs>(
            ADD_OBSERVATIONS,
            "Add new observations to existing entities in the knowledge graph",
        ),
        tool::<DeleteEntitiesArgs>(
            DELETE_ENTITIES,
            "Delete multiple entities and their associated relations from the knowledge graph",
        ),
        tool::<DeleteObservationsArgs>(
            DELETE_OBSERVATIONS,
            "Delete specific observations from entities in the knowledge graph",
        ),
        tool::<RelationsArgs>(
            DELETE_RELATIONS,
            "Delete multiple relations from the knowledge graph",
        ),
        tool::<ReadGraphArgs>(READ_GRAPH, "Read the entire knowledge graph"),
        tool::<SearchArgs>(
            SEARCH_NODES,
            "Search for nodes in the knowledge graph. Keywords separated by spaces, commas, '&' or '+' are OR-ed and matched against names, types, subdomains and observations",
        ),
        tool::<OpenArgs>(
            OPEN_NODES,
            "Open specific nodes in the knowledge graph by their names",
        ),
    ]
}

fn parse<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

fn pretty<T: Serialize>(value: &T) -> Result<String, ToolError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Run one tool call and render its result as text.
///
/// `read_graph` takes no arguments; every other tool fails with [`ToolError::NoArguments`] when
/// `arguments` is absent or null.
pub async fn call_tool<S: GraphStore>(
    manager: &KnowledgeGraphManager<S>,
    name: &str,
    arguments: Option<Value>,
) -> Result<String, ToolError> {
    if !TOOL_NAMES.contains(&name) {
        return Err(ToolError::UnknownTool(name.to_string()));
    }
    if name == READ_GRAPH {
        if let Some(args) = arguments.filter(|v| !v.is_null()) {
            let _: ReadGraphArgs = parse(name, args)?;
        }
        return pretty(&manager.read_graph().await?);
    }
    let args = match arguments {
        Some(Value::Null) | None => return Err(ToolError::NoArguments(name.to_string())),
        Some(v) => v,
    };

    match name {
        CREATE_ENTITIES => {
            let a: EntitiesArgs = parse(name, args)?;
            pretty(&manager.create_entities(a.entities).await?)
        }
        CREATE_RELATIONS => {
            let a: RelationsArgs = parse(name, args)?;
            pretty(&manager.create_relations(a.relations).await?)
        }
        ADD_OBSERVATIONS => {
            let a: AddObservationsArgs = parse(name, args)?;
            pretty(&manager.add_observations(a.observations).await?)
        }
        DELETE_ENTITIES => {
            let a: DeleteEntitiesArgs = parse(name, args)?;
            manager.delete_entities(a.entity_names).await?;
            Ok("Entities deleted successfully".to_string())
        }
        DELETE_OBSERVATIONS => {
            let a: DeleteObservationsArgs = parse(name, args)?;
            manager.delete_observations(a.deletions).await?;
            Ok("Observations deleted successfully".to_string())
        }
        DELETE_RELATIONS => {
            let a: RelationsArgs = parse(name, args)?;
            manager.delete_relations(a.relations).await?;
            Ok("Relations deleted successfully".to_string())
        }
        SEARCH_NODES => {
            let a: SearchArgs = parse(name, args)?;
            pretty(&manager.search_nodes(&a.query).await?)
        }
        OPEN_NODES => {
            let a: OpenArgs = parse(name, args)?;
            pretty(&manager.open_nodes(&a.names).await?)
        }
        _ => Err(ToolError::UnknownTool(name.to_string())),
    }
}
