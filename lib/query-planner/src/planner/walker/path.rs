use std::fmt::Debug;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::graph::error::GraphError;
use crate::graph::Graph;

/// A walk through the query graph: the root node it started from, the edges
/// taken in order, and (aligned slot by slot) the resolver sub-paths that
/// satisfy each edge's requirement. Extension always copies; two paths never
/// share mutable state.
#[derive(Clone)]
pub struct OperationPath {
    pub root_node: NodeIndex,
    pub edges: Vec<EdgeIndex>,
    pub required_paths_for_edges: Vec<Vec<OperationPath>>,
    pub cost: u64,
    tail_node: NodeIndex,
}

impl OperationPath {
    pub fn new(root_node: NodeIndex) -> Self {
        Self {
            root_node,
            edges: Vec::new(),
            required_paths_for_edges: Vec::new(),
            cost: 0,
            tail_node: root_node,
        }
    }

    /// Returns a new path extended by `edge_index`, with `required_paths`
    /// recorded for that edge. The cost grows by the edge's base cost plus
    /// the cost of every attached requirement sub-path.
    pub fn advance(
        &self,
        graph: &Graph,
        edge_index: EdgeIndex,
        required_paths: Vec<OperationPath>,
    ) -> Result<OperationPath, GraphError> {
        let edge = graph.edge(edge_index)?;

        let mut cost = self.cost + edge.cost();
        for required_path in required_paths.iter() {
            cost += required_path.cost;
        }

        let mut next = self.clone();
        next.edges.push(edge_index);
        next.required_paths_for_edges.push(required_paths);
        next.cost = cost;
        next.tail_node = graph.get_edge_tail(&edge_index)?;

        Ok(next)
    }

    pub fn tail(&self) -> NodeIndex {
        self.tail_node
    }

    pub fn has_visited_edge(&self, edge_index: &EdgeIndex) -> bool {
        self.edges.contains(edge_index)
    }

    pub fn is_aligned(&self) -> bool {
        self.edges.len() == self.required_paths_for_edges.len()
    }

    pub fn pretty_print(&self, graph: &Graph) -> String {
        if self.edges.is_empty() {
            return graph.pretty_print_node(&self.root_node);
        }

        self.edges
            .iter()
            .enumerate()
            .map(|(position, edge_index)| graph.pretty_print_edge(*edge_index, position > 0))
            .collect::<Vec<String>>()
            .join(" ")
    }

    /// DOT source of this path's edge chain, optionally wrapped as a link for
    /// an online viewer. A debugging surface only.
    pub fn print(&self, graph: &Graph, as_link: bool) -> String {
        let mut dot = String::from("digraph {\n");

        if self.edges.is_empty() {
            dot.push_str(&format!(
                "  \"{}\"\n",
                graph.pretty_print_node(&self.root_node)
            ));
        }

        for edge_index in self.edges.iter() {
            let head = graph
                .get_edge_head(edge_index)
                .map(|index| graph.pretty_print_node(&index))
                .unwrap_or_else(|_| format!("{:?}", edge_index));
            let tail = graph
                .get_edge_tail(edge_index)
                .map(|index| graph.pretty_print_node(&index))
                .unwrap_or_else(|_| format!("{:?}", edge_index));
            let label = graph
                .edge(*edge_index)
                .map(|edge| format!("{:?}", edge))
                .unwrap_or_default();

            dot.push_str(&format!(
                "  \"{}\" -> \"{}\" [ label = \"{}\" ]\n",
                head, tail, label
            ));
        }

        dot.push('}');

        if as_link {
            format!(
                "https://dreampuf.github.io/GraphvizOnline/#{}",
                utf8_percent_encode(&dot, NON_ALPHANUMERIC)
            )
        } else {
            dot
        }
    }
}

impl Debug for OperationPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("");
        let out = out.field("cost", &self.cost);

        if self.edges.is_empty() {
            out.field("empty", &true).field("head", &self.root_node)
        } else {
            out.field(
                "edges",
                &self
                    .edges
                    .iter()
                    .map(|edge_index| format!("{:?}", edge_index))
                    .collect::<Vec<String>>()
                    .join(" --> "),
            )
        }
        .finish()
    }
}
