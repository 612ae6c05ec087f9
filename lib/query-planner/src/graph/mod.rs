pub mod edge;
pub mod error;
pub mod node;
pub mod selection;

mod tests;

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt::{Debug, Display};

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use petgraph::dot::Dot;
use petgraph::graph::{EdgeIndex, Edges, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction, Graph as Petgraph};
use tracing::{debug, info, instrument};

use crate::state::selection_resolver::SelectionResolver;
use crate::state::subgraph_state::SubgraphState;
use crate::state::supergraph_state::{
    OperationKind, SupergraphState, SupergraphStateError, TypeKind,
};

use self::edge::Edge;
use self::error::GraphError;
use self::node::Node;

type InnerGraph = Petgraph<Node, Edge, Directed>;

pub struct Graph {
    pub id: String,
    pub graph: InnerGraph,
    node_display_name_to_index: HashMap<String, NodeIndex>,
    /// All nodes hosting a given type name, across subgraphs
    type_name_to_nodes: BTreeMap<String, Vec<NodeIndex>>,
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
}

impl Graph {
    fn new(id: String) -> Self {
        Self {
            id,
            graph: InnerGraph::new(),
            node_display_name_to_index: HashMap::new(),
            type_name_to_nodes: BTreeMap::new(),
            query_type: None,
            mutation_type: None,
            subscription_type: None,
        }
    }

    /// Builds one graph per subgraph, merges them, then joins same-named
    /// entity types across subgraphs by their resolvable keys.
    #[instrument(skip(state))]
    pub fn build_from_supergraph(state: &SupergraphState) -> Result<Self, GraphError> {
        let mut resolvers: BTreeMap<String, SelectionResolver<'_>> = state
            .subgraphs
            .iter()
            .map(|(name, subgraph)| (name.clone(), SelectionResolver::new(subgraph)))
            .collect();

        let mut merged = Graph::new("supergraph".to_string());
        merged.query_type = Some(state.query_type.clone());
        merged.mutation_type = state.mutation_type.clone();
        merged.subscription_type = state.subscription_type.clone();

        for (name, subgraph) in state.subgraphs.iter() {
            let resolver = resolvers
                .get_mut(name)
                .ok_or_else(|| SupergraphStateError::SubgraphNotFound(name.clone()))
                .map_err(GraphError::State)?;
            let local = Self::build_for_subgraph(state, subgraph, resolver)?;

            debug!(
                "merging subgraph graph '{}' ({} nodes, {} edges)",
                local.id,
                local.graph.node_count(),
                local.graph.edge_count()
            );

            merged.absorb(local);
        }

        merged.join_by_keys(state, &mut resolvers)?;

        Ok(merged)
    }

    /// Builds the local graph of a single subgraph: one node per reachable
    /// type, one edge per non-external field. Traversal starts from the root
    /// operation types and the subgraph's entities.
    #[instrument(skip(state, subgraph, resolver), fields(subgraph = %subgraph.name))]
    fn build_for_subgraph(
        state: &SupergraphState,
        subgraph: &SubgraphState,
        resolver: &mut SelectionResolver<'_>,
    ) -> Result<Self, GraphError> {
        let mut instance = Graph::new(subgraph.name.clone());
        let mut pending: VecDeque<String> = VecDeque::new();
        let mut visited: BTreeSet<String> = BTreeSet::new();

        let root_types = [
            Some(state.query_type.as_str()),
            state.mutation_type.as_deref(),
            state.subscription_type.as_deref(),
        ];

        for root_name in root_types.into_iter().flatten() {
            if subgraph.types.contains_key(root_name) {
                pending.push_back(root_name.to_string());
            }
        }

        for entity_name in subgraph.entity_type_names.iter() {
            pending.push_back(entity_name.clone());
        }

        while let Some(type_name) = pending.pop_front() {
            if !visited.insert(type_name.clone()) {
                continue;
            }

            let kind = Self::kind_of_type(state, subgraph, &type_name)?;
            let head = instance.upsert_node(Node::new(&type_name, &subgraph.name, kind));

            if !matches!(kind, TypeKind::Object | TypeKind::Interface) {
                continue;
            }

            let Some(type_state) = subgraph.types.get(&type_name) else {
                continue;
            };

            for field in type_state.fields.iter() {
                let requirement = match field
                    .join_field
                    .as_ref()
                    .and_then(|join_field| join_field.requires.as_ref())
                {
                    Some(requires) => Some(resolver.resolve(&type_name, requires)?),
                    None => None,
                };

                if field.external && requirement.is_none() {
                    debug!(
                        "[ ] field '{}.{}/{}' is external, skipping edge creation",
                        type_name, field.name, subgraph.name
                    );
                    continue;
                }

                let target_kind = Self::kind_of_type(state, subgraph, &field.return_type_name)?;
                let tail = instance.upsert_node(Node::new(
                    &field.return_type_name,
                    &subgraph.name,
                    target_kind,
                ));

                debug!(
                    "[x] creating field move edge '{}.{}/{}' (type: {})",
                    type_name, field.name, subgraph.name, field.return_type_name
                );

                instance.upsert_edge(
                    head,
                    tail,
                    Edge::field_move(
                        field.name.clone(),
                        field.return_type_name.clone(),
                        target_kind,
                        field.is_list,
                        requirement,
                    ),
                );

                pending.push_back(field.return_type_name.clone());
            }
        }

        Ok(instance)
    }

    fn kind_of_type(
        state: &SupergraphState,
        subgraph: &SubgraphState,
        type_name: &str,
    ) -> Result<TypeKind, GraphError> {
        if let Some(type_state) = subgraph.types.get(type_name) {
            return Ok(type_state.kind);
        }

        state
            .kind_of(type_name)
            .ok_or_else(|| GraphError::DefinitionNotFound(type_name.to_string()))
    }

    /// Copies every node and edge of `other` into this graph. Nodes get fresh
    /// indices; edge endpoints are remapped so edge→node identity survives
    /// the copy.
    fn absorb(&mut self, other: Graph) {
        let mut index_map: HashMap<NodeIndex, NodeIndex> =
            HashMap::with_capacity(other.graph.node_count());

        for old_index in other.graph.node_indices() {
            let new_index = self.upsert_node(other.graph[old_index].clone());
            index_map.insert(old_index, new_index);
        }

        for edge_index in other.graph.edge_indices() {
            let endpoints = other.graph.edge_endpoints(edge_index);
            let weight = other.graph.edge_weight(edge_index);

            if let (Some((source, target)), Some(weight)) = (endpoints, weight) {
                if let (Some(&new_source), Some(&new_target)) =
                    (index_map.get(&source), index_map.get(&target))
                {
                    self.graph.add_edge(new_source, new_target, weight.clone());
                }
            }
        }
    }

    /// Entity edges fan out all-to-all: for every resolvable key of a type in
    /// subgraph G, every other subgraph hosting the type gets an edge into G
    /// carrying G's resolved key selection. Redundant jumps with identical
    /// requirements are pruned by the walker during search, not here.
    #[instrument(skip(self, state, resolvers))]
    fn join_by_keys(
        &mut self,
        state: &SupergraphState,
        resolvers: &mut BTreeMap<String, SelectionResolver<'_>>,
    ) -> Result<(), GraphError> {
        for (subgraph_name, subgraph) in state.subgraphs.iter() {
            for type_name in subgraph.entity_type_names.iter() {
                let Some(type_state) = subgraph.types.get(type_name) else {
                    continue;
                };

                // Interface and union keys are not joined
                if type_state.kind != TypeKind::Object {
                    continue;
                }

                let Some(tail) = self.node_index_of(type_name, subgraph_name) else {
                    continue;
                };

                for join_type in type_state.join_types.iter() {
                    if !join_type.resolvable {
                        continue;
                    }

                    let Some(key) = join_type.key.as_ref() else {
                        continue;
                    };

                    let resolver = resolvers
                        .get_mut(subgraph_name)
                        .ok_or_else(|| SupergraphStateError::SubgraphNotFound(subgraph_name.clone()))
                        .map_err(GraphError::State)?;
                    let selection = resolver.resolve(type_name, key)?;

                    for (other_name, other_subgraph) in state.subgraphs.iter() {
                        if other_name == subgraph_name {
                            continue;
                        }

                        if !other_subgraph.types.contains_key(type_name) {
                            continue;
                        }

                        let Some(head) = self.node_index_of(type_name, other_name) else {
                            continue;
                        };

                        info!(
                            "creating entity move edge from '{}/{}' to '{}/{}' via key '{}'",
                            type_name, other_name, type_name, subgraph_name, key
                        );

                        self.upsert_edge(head, tail, Edge::entity_move(selection.clone()));
                    }
                }
            }
        }

        Ok(())
    }

    pub fn upsert_node(&mut self, node: Node) -> NodeIndex {
        let display_identifier = node.display_name();

        if let Some(index) = self.node_display_name_to_index.get(&display_identifier) {
            return *index;
        }

        let type_name = node.type_name.clone();
        let index = self.graph.add_node(node);
        self.node_display_name_to_index
            .insert(display_identifier, index);
        self.type_name_to_nodes
            .entry(type_name)
            .or_default()
            .push(index);

        index
    }

    pub fn upsert_edge(&mut self, head: NodeIndex, tail: NodeIndex, edge: Edge) -> EdgeIndex {
        let existing_edge = self
            .graph
            .edges_connecting(head, tail)
            .find_map(|edge_ref| {
                if edge_ref.weight() == &edge {
                    Some(edge_ref.id())
                } else {
                    None
                }
            });

        if let Some(existing) = existing_edge {
            existing
        } else {
            self.graph.add_edge(head, tail, edge)
        }
    }

    pub fn node(&self, node_index: NodeIndex) -> Result<&Node, GraphError> {
        self.graph
            .node_weight(node_index)
            .ok_or(GraphError::NodeNotFound(node_index))
    }

    pub fn edge(&self, edge_index: EdgeIndex) -> Result<&Edge, GraphError> {
        self.graph
            .edge_weight(edge_index)
            .ok_or(GraphError::EdgeNotFound(edge_index))
    }

    pub fn get_edge_head(&self, edge_index: &EdgeIndex) -> Result<NodeIndex, GraphError> {
        self.graph
            .edge_endpoints(*edge_index)
            .ok_or(GraphError::EdgeNotFound(*edge_index))
            .map(|endpoints| endpoints.0)
    }

    pub fn get_edge_tail(&self, edge_index: &EdgeIndex) -> Result<NodeIndex, GraphError> {
        self.graph
            .edge_endpoints(*edge_index)
            .ok_or(GraphError::EdgeNotFound(*edge_index))
            .map(|endpoints| endpoints.1)
    }

    pub fn edges_from(&self, node_index: NodeIndex) -> Edges<'_, Edge, Directed> {
        self.graph.edges_directed(node_index, Direction::Outgoing)
    }

    pub fn edges_to(&self, node_index: NodeIndex) -> Edges<'_, Edge, Directed> {
        self.graph.edges_directed(node_index, Direction::Incoming)
    }

    pub fn nodes_of_type(&self, type_name: &str) -> &[NodeIndex] {
        self.type_name_to_nodes
            .get(type_name)
            .map(|nodes| nodes.as_slice())
            .unwrap_or(&[])
    }

    pub fn node_index_of(&self, type_name: &str, subgraph: &str) -> Option<NodeIndex> {
        self.node_display_name_to_index
            .get(&format!("{}/{}", type_name, subgraph))
            .copied()
    }

    pub fn root_type_name(&self, kind: OperationKind) -> Option<&str> {
        match kind {
            OperationKind::Query => self.query_type.as_deref(),
            OperationKind::Mutation => self.mutation_type.as_deref(),
            OperationKind::Subscription => self.subscription_type.as_deref(),
        }
    }

    pub fn pretty_print_node(&self, node_index: &NodeIndex) -> String {
        self.node(*node_index)
            .map(|node| node.display_name())
            .unwrap_or_else(|_| format!("{:?}", node_index))
    }

    pub fn pretty_print_edge(&self, edge_index: EdgeIndex, without_source: bool) -> String {
        let Some((source, target)) = self.graph.edge_endpoints(edge_index) else {
            return format!("{:?}", edge_index);
        };
        let Ok(edge) = self.edge(edge_index) else {
            return format!("{:?}", edge_index);
        };

        if without_source {
            format!("-({:?})- {}", edge, self.pretty_print_node(&target))
        } else {
            format!(
                "{} -({:?})- {}",
                self.pretty_print_node(&source),
                edge,
                self.pretty_print_node(&target)
            )
        }
    }

    /// DOT source of the whole graph, optionally wrapped as a link for an
    /// online viewer. A debugging surface only.
    pub fn print(&self, as_link: bool) -> String {
        let dot = format!("{:?}", Dot::with_config(&self.graph, &[]));

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

/// Print me with `println!("{}", graph);` to see the graph in DOT/digraph format.
impl Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.print(false))
    }
}

impl Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("id", &self.id)
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .finish()
    }
}
