use std::collections::BTreeMap;

use super::error::WalkOperationError;
use super::path::OperationPath;
use crate::graph::Graph;

/// Keeps the cheapest path per terminal subgraph. On a cost tie the first
/// discovered path stays. A BTreeMap keyed by subgraph name keeps the
/// emission order deterministic.
pub struct BestPathTracker<'a> {
    graph: &'a Graph,
    subgraph_to_best_path: BTreeMap<String, OperationPath>,
}

impl<'a> BestPathTracker<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            subgraph_to_best_path: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, path: &OperationPath) -> Result<(), WalkOperationError> {
        let tail_subgraph = self.graph.node(path.tail())?.subgraph.clone();

        match self.subgraph_to_best_path.get_mut(&tail_subgraph) {
            Some(existing) => {
                if path.cost < existing.cost {
                    *existing = path.clone();
                }
            }
            None => {
                self.subgraph_to_best_path
                    .insert(tail_subgraph, path.clone());
            }
        }

        Ok(())
    }

    pub fn get_best_paths(self) -> Vec<OperationPath> {
        self.subgraph_to_best_path.into_values().collect()
    }
}

/// The overall winner across subgraphs; first discovered wins a tie.
pub fn find_best_path(paths: Vec<OperationPath>) -> Option<OperationPath> {
    let mut best: Option<OperationPath> = None;

    for path in paths {
        match &best {
            Some(current) if path.cost >= current.cost => {}
            _ => best = Some(path),
        }
    }

    best
}
