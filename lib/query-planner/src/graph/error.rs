use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::state::selection_resolver::SelectionResolverError;
use crate::state::supergraph_state::SupergraphStateError;

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("node with index '{0:?}' was not found")]
    NodeNotFound(NodeIndex),
    #[error("edge with index '{0:?}' was not found")]
    EdgeNotFound(EdgeIndex),
    #[error("type '{0}' is not defined in the supergraph")]
    DefinitionNotFound(String),
    #[error(transparent)]
    SelectionResolver(#[from] SelectionResolverError),
    #[error(transparent)]
    State(#[from] SupergraphStateError),
}
