use std::collections::HashSet;
use std::sync::Arc;

use petgraph::graph::EdgeIndex;

use crate::graph::selection::Selection;

/// State pinned by an outer lookup that a nested requirement walk must not
/// touch again: subgraphs already claimed on this branch, requirement
/// selections already checked on a cheaper edge, and the very edge whose
/// requirement is currently being satisfied.
#[derive(Debug, Default, Clone)]
pub struct ExcludedFromLookup {
    pub graph_ids: HashSet<String>,
    pub requirements: HashSet<Arc<Selection>>,
    pub edges: HashSet<EdgeIndex>,
}

impl ExcludedFromLookup {
    pub fn new() -> ExcludedFromLookup {
        Default::default()
    }

    pub fn next(
        &self,
        graph_id: &str,
        requirements: &HashSet<Arc<Selection>>,
        edges: &[EdgeIndex],
    ) -> ExcludedFromLookup {
        let mut graph_ids = self.graph_ids.clone();
        graph_ids.insert(graph_id.to_string());

        let mut next_edges = self.edges.clone();
        next_edges.extend(edges.iter().copied());

        ExcludedFromLookup {
            graph_ids,
            requirements: requirements.clone(),
            edges: next_edges,
        }
    }

    pub fn next_with_graph_id(&self, graph_id: &str) -> ExcludedFromLookup {
        let mut next = self.clone();
        next.graph_ids.insert(graph_id.to_string());
        next
    }
}
