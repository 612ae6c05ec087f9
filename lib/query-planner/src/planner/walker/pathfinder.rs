use std::collections::HashSet;
use std::sync::Arc;

use petgraph::visit::EdgeRef;
use tracing::{debug, instrument};

use crate::graph::edge::{EdgeReference, Move};
use crate::graph::selection::{Selection, SelectionNode};
use crate::graph::Graph;

use super::best_path::BestPathTracker;
use super::error::WalkOperationError;
use super::excluded::ExcludedFromLookup;
use super::path::OperationPath;

type VisitedGraphs = HashSet<String>;
type VisitedRequirements = HashSet<Arc<Selection>>;

struct IndirectPathsLookupQueue {
    queue: Vec<(VisitedGraphs, VisitedRequirements, OperationPath)>,
}

impl IndirectPathsLookupQueue {
    pub fn new_from_excluded(excluded: &ExcludedFromLookup, path: &OperationPath) -> Self {
        IndirectPathsLookupQueue {
            queue: vec![(
                excluded.graph_ids.clone(),
                excluded.requirements.clone(),
                path.clone(),
            )],
        }
    }

    pub fn add(
        &mut self,
        visited_graphs: VisitedGraphs,
        visited_requirements: VisitedRequirements,
        path: OperationPath,
    ) {
        self.queue.push((visited_graphs, visited_requirements, path));
    }

    pub fn pop(&mut self) -> Option<(VisitedGraphs, VisitedRequirements, OperationPath)> {
        self.queue.pop()
    }
}

/// Expands `path` by a single field move matching `field_name`, taken from the
/// current tail. Every candidate edge must have its requirement satisfiable
/// from here.
#[instrument(skip(graph, path, excluded), fields(path = %path.pretty_print(graph), current_cost = path.cost))]
pub fn find_direct_paths(
    graph: &Graph,
    path: &OperationPath,
    field_name: &str,
    excluded: &ExcludedFromLookup,
) -> Result<Vec<OperationPath>, WalkOperationError> {
    let mut result: Vec<OperationPath> = Vec::new();

    let edges_iter = graph.edges_from(path.tail()).filter(|edge_ref| {
        matches!(&edge_ref.weight().transition, Move::Field { name, .. } if name == field_name)
            && !path.has_visited_edge(&edge_ref.id())
            && !excluded.edges.contains(&edge_ref.id())
    });

    for edge_ref in edges_iter {
        debug!(
            "checking edge {}",
            graph.pretty_print_edge(edge_ref.id(), false)
        );

        let target_subgraph = &graph.node(edge_ref.target())?.subgraph;
        let new_excluded = excluded.next_with_graph_id(target_subgraph);

        match can_satisfy_edge(graph, &edge_ref, path, &new_excluded)? {
            Some(required_paths) => {
                debug!(
                    "advancing path {} with edge {}",
                    path.pretty_print(graph),
                    graph.pretty_print_edge(edge_ref.id(), false)
                );

                result.push(path.advance(graph, edge_ref.id(), required_paths)?);
            }
            None => {
                debug!("edge not satisfied, continue look up...");
            }
        }
    }

    Ok(result)
}

/// Expands `path` by entity moves until a subgraph owning `field_name` is
/// reached. The frontier is explored LIFO; each branch carries its own
/// visited-subgraph and visited-requirement sets, so sibling branches may
/// legitimately share subgraphs.
#[instrument(skip(graph, path, excluded), fields(path = %path.pretty_print(graph), current_cost = path.cost))]
pub fn find_indirect_paths(
    graph: &Graph,
    path: &OperationPath,
    field_name: &str,
    excluded: &ExcludedFromLookup,
) -> Result<Vec<OperationPath>, WalkOperationError> {
    let mut tracker = BestPathTracker::new(graph);
    let source_subgraph = graph.node(path.tail())?.subgraph.clone();

    let mut queue = IndirectPathsLookupQueue::new_from_excluded(excluded, path);

    while let Some((visited_graphs, visited_requirements, current_path)) = queue.pop() {
        let entity_edges = graph
            .edges_from(current_path.tail())
            .filter(|edge_ref| edge_ref.weight().is_entity_move());

        for edge_ref in entity_edges {
            debug!(
                "exploring edge {}",
                graph.pretty_print_edge(edge_ref.id(), false)
            );

            if excluded.edges.contains(&edge_ref.id()) {
                debug!("ignoring, edge is pinned by an outer requirement check");
                continue;
            }

            let edge_tail_subgraph = &graph.node(edge_ref.target())?.subgraph;

            if visited_graphs.contains(edge_tail_subgraph) {
                debug!(
                    "ignoring, subgraph was already visited on this branch (current: {}, visited: {:?})",
                    edge_tail_subgraph, visited_graphs
                );
                continue;
            }

            if edge_tail_subgraph == &source_subgraph {
                // Never hop back to where the lookup started
                debug!("ignoring, we would go back to the same subgraph");
                continue;
            }

            // Entity-move edges are created all-to-all, so every subgraph
            // points to every other subgraph per distinct key:
            //  Subgraph A: User @key(id) @key(name)
            //  Subgraph B: User @key(id)
            //  Edges in the merged graph:
            //    - User/A @key(id) -> User/B
            //    - User/B @key(id) -> User/A
            //    - User/B @key(name) -> User/A
            // An edge whose requirement was already checked on some other
            // branch can be ignored, the cheaper variant has been covered.
            let edge = edge_ref.weight();

            let requirement_already_checked = match edge.requirement.as_ref() {
                Some(requirement) => visited_requirements.contains(requirement),
                None => false,
            };

            if requirement_already_checked {
                debug!("ignoring, already visited an edge with the same requirement");
                continue;
            }

            let new_excluded = excluded.next(
                edge_tail_subgraph,
                &visited_requirements,
                &[edge_ref.id()],
            );

            match can_satisfy_edge(graph, &edge_ref, &current_path, &new_excluded)? {
                None => {
                    debug!("requirements not satisfied, continue look up...");
                    continue;
                }
                Some(required_paths) => {
                    debug!(
                        "advancing path to {}",
                        graph.pretty_print_edge(edge_ref.id(), false)
                    );

                    let next_path = current_path.advance(graph, edge_ref.id(), required_paths)?;

                    let direct_paths_excluded =
                        excluded.next(edge_tail_subgraph, &visited_requirements, &[]);
                    let direct_paths =
                        find_direct_paths(graph, &next_path, field_name, &direct_paths_excluded)?;

                    if !direct_paths.is_empty() {
                        debug!(
                            "found {} direct paths after {}",
                            direct_paths.len(),
                            graph.pretty_print_edge(edge_ref.id(), false)
                        );

                        for direct_path in direct_paths {
                            tracker.add(&direct_path)?;
                        }
                    } else {
                        debug!("no direct paths found, going deeper");

                        let mut next_visited_graphs = visited_graphs.clone();
                        next_visited_graphs.insert(edge_tail_subgraph.to_string());

                        let next_visited_requirements = match edge.requirement.as_ref() {
                            Some(requirement) => {
                                let mut next = visited_requirements.clone();
                                next.insert(requirement.clone());
                                next
                            }
                            None => visited_requirements.clone(),
                        };

                        queue.add(next_visited_graphs, next_visited_requirements, next_path);
                    }
                }
            }
        }
    }

    let best_paths = tracker.get_best_paths();

    debug!(
        "finished finding indirect paths, found total of {}",
        best_paths.len()
    );

    Ok(best_paths)
}

#[derive(Debug)]
struct MoveRequirement {
    pub paths: Vec<OperationPath>,
    pub selection: SelectionNode,
}

/// Checks that the requirement of `edge_ref` is resolvable at the tail of
/// `path`, before the edge may be taken. Returns the resolver paths that must
/// be executed first, or `None` when the requirement cannot be met.
#[instrument(skip_all, fields(path = %path.pretty_print(graph), edge = %graph.pretty_print_edge(edge_ref.id(), true)))]
fn can_satisfy_edge(
    graph: &Graph,
    edge_ref: &EdgeReference<'_>,
    path: &OperationPath,
    excluded: &ExcludedFromLookup,
) -> Result<Option<Vec<OperationPath>>, WalkOperationError> {
    let edge = edge_ref.weight();

    let Some(requirement) = edge.requirement.as_ref() else {
        return Ok(Some(vec![]));
    };

    debug!(
        "checking requirement {} for edge '{}'",
        requirement,
        graph.pretty_print_edge(edge_ref.id(), false)
    );

    let mut requirements: Vec<MoveRequirement> = Vec::new();
    let mut resolution_paths: Vec<OperationPath> = Vec::new();

    for selection in requirement.selection_set.iter() {
        requirements.splice(
            0..0,
            vec![MoveRequirement {
                paths: vec![path.clone()],
                selection: selection.clone(),
            }],
        );
    }

    // Popping from the end keeps the most recently added requirement first
    while let Some(move_requirement) = requirements.pop() {
        match &move_requirement.selection {
            SelectionNode::Field { field_name, .. } => {
                let result =
                    validate_field_requirement(graph, &move_requirement, field_name, excluded)?;

                match result {
                    Some((survivors, next_requirements)) => {
                        if move_requirement.selection.is_leaf() {
                            debug!(
                                "found {} resolver paths for leaf requirement '{}'",
                                survivors.len(),
                                field_name
                            );

                            resolution_paths.extend(survivors);
                        }

                        requirements.splice(0..0, next_requirements);
                    }
                    None => {
                        return Ok(None);
                    }
                }
            }
            SelectionNode::Fragment { type_name, .. } => {
                return Err(WalkOperationError::UnsupportedRequirementFragment(
                    type_name.clone(),
                ));
            }
        }
    }

    for resolution_path in resolution_paths.iter() {
        debug!("path {} is valid", resolution_path.pretty_print(graph));
    }

    Ok(Some(resolution_paths))
}

type FieldRequirementResult = Option<(Vec<OperationPath>, Vec<MoveRequirement>)>;

/// Advances every candidate path of `move_requirement` to `field_name`,
/// directly or through entity moves, and reduces the survivors to the best
/// one per subgraph. `None` means the field is unreachable and the whole edge
/// fails.
#[instrument(skip_all, fields(field = field_name))]
fn validate_field_requirement(
    graph: &Graph,
    move_requirement: &MoveRequirement,
    field_name: &str,
    excluded: &ExcludedFromLookup,
) -> Result<FieldRequirementResult, WalkOperationError> {
    let mut next_paths: Vec<OperationPath> = Vec::new();

    for candidate in move_requirement.paths.iter() {
        next_paths.extend(find_direct_paths(graph, candidate, field_name, excluded)?);
    }

    for candidate in move_requirement.paths.iter() {
        next_paths.extend(find_indirect_paths(graph, candidate, field_name, excluded)?);
    }

    if next_paths.is_empty() {
        return Ok(None);
    }

    let mut tracker = BestPathTracker::new(graph);
    for next_path in next_paths.iter() {
        tracker.add(next_path)?;
    }
    let survivors = tracker.get_best_paths();

    let nested = move_requirement.selection.selections();

    if nested.map(|selections| selections.is_empty()).unwrap_or(true) {
        return Ok(Some((survivors, vec![])));
    }

    let next_requirements: Vec<MoveRequirement> = nested
        .map(|selections| {
            selections
                .iter()
                .map(|selection| MoveRequirement {
                    selection: selection.clone(),
                    paths: survivors.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Some((survivors, next_requirements)))
}
