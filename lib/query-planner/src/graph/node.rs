use std::fmt::{Debug, Display};

use crate::state::supergraph_state::{SubgraphName, TypeKind};

/// A (type, subgraph) pair. Node identity in the merged graph is the petgraph
/// index; two subgraphs hosting the same type produce two distinct nodes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Node {
    pub type_name: String,
    pub subgraph: SubgraphName,
    pub kind: TypeKind,
}

impl Node {
    pub fn new(type_name: &str, subgraph: &str, kind: TypeKind) -> Self {
        Self {
            type_name: type_name.to_string(),
            subgraph: subgraph.to_string(),
            kind,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{}/{}", self.type_name, self.subgraph)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
