use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

use graphql_parser::schema as input;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::federation_spec::directives::{
    DirectiveError, FederationDirective, JoinGraphDirective,
};

use super::subgraph_state::{SubgraphId, SubgraphState};

static BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

pub type SchemaDocument = input::Document<'static, String>;

/// Name of a subgraph as registered in `@join__graph(name:)`. This is the
/// identifier used for fetch routing, node identity and exclusion sets.
pub type SubgraphName = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Query => write!(f, "query"),
            OperationKind::Mutation => write!(f, "mutation"),
            OperationKind::Subscription => write!(f, "subscription"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Object,
    Interface,
    Enum,
    Union,
    InputObject,
    Scalar,
}

impl Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeKind::Object => write!(f, "object"),
            TypeKind::Interface => write!(f, "interface"),
            TypeKind::Enum => write!(f, "enum"),
            TypeKind::Union => write!(f, "union"),
            TypeKind::InputObject => write!(f, "input object"),
            TypeKind::Scalar => write!(f, "scalar"),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SupergraphStateError {
    #[error(transparent)]
    Directive(#[from] DirectiveError),
    #[error("subgraph '{0}' is not registered in the join__Graph enum")]
    SubgraphNotFound(String),
    #[error("type '{0}' is defined more than once in the supergraph")]
    DuplicateTypeDefinition(String),
}

#[derive(Debug)]
pub struct SupergraphState {
    /// Per-subgraph type tables, keyed by subgraph name. Ordered so that
    /// graph construction (and everything downstream of it) is deterministic.
    pub subgraphs: BTreeMap<SubgraphName, SubgraphState>,
    /// A map of (GRAPH_ID, subgraph_name), extracted from the join__Graph enum
    pub known_subgraphs: BTreeMap<SubgraphId, SubgraphName>,
    /// A map of (subgraph_name, endpoint)
    pub subgraph_endpoints: HashMap<SubgraphName, String>,
    /// Kind of every named type defined in the supergraph document
    pub type_kinds: HashMap<String, TypeKind>,
    /// The root entrypoints
    pub query_type: String,
    pub mutation_type: Option<String>,
    pub subscription_type: Option<String>,
}

impl SupergraphState {
    #[instrument(level = "trace", skip(schema), name = "new_supergraph_state")]
    pub fn new(schema: &SchemaDocument) -> Result<Self, SupergraphStateError> {
        let (known_subgraphs, subgraph_endpoints) =
            Self::extract_subgraph_names_and_endpoints(schema)?;
        let type_kinds = Self::extract_type_kinds(schema)?;
        let (query_type, mutation_type, subscription_type) =
            Self::extract_root_types(schema, &type_kinds);

        let mut instance = Self {
            subgraphs: BTreeMap::new(),
            known_subgraphs,
            subgraph_endpoints,
            type_kinds,
            query_type,
            mutation_type,
            subscription_type,
        };

        let mut subgraphs = BTreeMap::new();
        for (graph_id, subgraph_name) in instance.known_subgraphs.iter() {
            debug!("decomposing subgraph '{}' ({})", subgraph_name, graph_id);
            let state = SubgraphState::decompose_from_supergraph(graph_id, subgraph_name, schema)?;
            subgraphs.insert(subgraph_name.clone(), state);
        }
        instance.subgraphs = subgraphs;

        Ok(instance)
    }

    pub fn resolve_graph_id(&self, graph_id: &str) -> Result<&SubgraphName, SupergraphStateError> {
        self.known_subgraphs
            .get(graph_id)
            .ok_or_else(|| SupergraphStateError::SubgraphNotFound(graph_id.to_string()))
    }

    pub fn subgraph(&self, name: &str) -> Result<&SubgraphState, SupergraphStateError> {
        self.subgraphs
            .get(name)
            .ok_or_else(|| SupergraphStateError::SubgraphNotFound(name.to_string()))
    }

    /// Kind of a named type, falling back to `Scalar` for built-ins that have
    /// no definition in the document.
    pub fn kind_of(&self, type_name: &str) -> Option<TypeKind> {
        if let Some(kind) = self.type_kinds.get(type_name) {
            return Some(*kind);
        }

        if BUILTIN_SCALARS.contains(&type_name) {
            return Some(TypeKind::Scalar);
        }

        None
    }

    pub fn root_type_name(&self, kind: OperationKind) -> Option<&str> {
        match kind {
            OperationKind::Query => Some(self.query_type.as_str()),
            OperationKind::Mutation => self.mutation_type.as_deref(),
            OperationKind::Subscription => self.subscription_type.as_deref(),
        }
    }

    fn extract_type_kinds(
        schema: &SchemaDocument,
    ) -> Result<HashMap<String, TypeKind>, SupergraphStateError> {
        let mut kinds = HashMap::new();

        for def in schema.definitions.iter() {
            let (name, kind) = match def {
                input::Definition::TypeDefinition(input::TypeDefinition::Object(t)) => {
                    (&t.name, TypeKind::Object)
                }
                input::Definition::TypeDefinition(input::TypeDefinition::Interface(t)) => {
                    (&t.name, TypeKind::Interface)
                }
                input::Definition::TypeDefinition(input::TypeDefinition::Enum(t)) => {
                    (&t.name, TypeKind::Enum)
                }
                input::Definition::TypeDefinition(input::TypeDefinition::Union(t)) => {
                    (&t.name, TypeKind::Union)
                }
                input::Definition::TypeDefinition(input::TypeDefinition::InputObject(t)) => {
                    (&t.name, TypeKind::InputObject)
                }
                input::Definition::TypeDefinition(input::TypeDefinition::Scalar(t)) => {
                    (&t.name, TypeKind::Scalar)
                }
                _ => continue,
            };

            if kinds.insert(name.to_string(), kind).is_some() {
                return Err(SupergraphStateError::DuplicateTypeDefinition(
                    name.to_string(),
                ));
            }
        }

        Ok(kinds)
    }

    fn extract_root_types(
        schema: &SchemaDocument,
        type_kinds: &HashMap<String, TypeKind>,
    ) -> (String, Option<String>, Option<String>) {
        let schema_def = schema.definitions.iter().find_map(|def| match def {
            input::Definition::SchemaDefinition(schema_def) => Some(schema_def),
            _ => None,
        });

        let explicit = |root: Option<&Option<String>>| root.and_then(|name| name.clone());
        let conventional = |name: &str| {
            if type_kinds.contains_key(name) {
                Some(name.to_string())
            } else {
                None
            }
        };

        let query_type = explicit(schema_def.map(|d| &d.query))
            .or_else(|| conventional("Query"))
            .unwrap_or_else(|| "Query".to_string());
        let mutation_type =
            explicit(schema_def.map(|d| &d.mutation)).or_else(|| conventional("Mutation"));
        let subscription_type = explicit(schema_def.map(|d| &d.subscription))
            .or_else(|| conventional("Subscription"));

        (query_type, mutation_type, subscription_type)
    }

    fn extract_subgraph_names_and_endpoints(
        schema: &SchemaDocument,
    ) -> Result<
        (
            BTreeMap<SubgraphId, SubgraphName>,
            HashMap<SubgraphName, String>,
        ),
        SupergraphStateError,
    > {
        let mut subgraph_names = BTreeMap::new();
        let mut subgraph_endpoints = HashMap::new();

        let join_graph_enum = schema.definitions.iter().find_map(|def| match def {
            input::Definition::TypeDefinition(input::TypeDefinition::Enum(enum_type))
                if enum_type.name == "join__Graph" =>
            {
                Some(enum_type)
            }
            _ => None,
        });

        if let Some(join_graph_enum) = join_graph_enum {
            for enum_value in join_graph_enum.values.iter() {
                let graph_id = enum_value.name.to_string();
                let join_graphs = JoinGraphDirective::extract_all(&enum_value.directives)?;

                if let Some(join_graph) = join_graphs.first() {
                    subgraph_names.insert(graph_id, join_graph.name.to_string());
                    subgraph_endpoints
                        .insert(join_graph.name.to_string(), join_graph.url.to_string());
                }
            }
        }

        Ok((subgraph_names, subgraph_endpoints))
    }
}
