use petgraph::graph::EdgeIndex;
use tracing::{debug, instrument};

use crate::graph::edge::Move;
use crate::graph::selection::{Selection, SelectionNode};
use crate::graph::Graph;
use crate::state::supergraph_state::OperationKind;

use super::error::PlanError;
use super::plan_nodes::{
    FetchNode, FlattenNode, FlattenNodePath, FlattenPathSegment, PlanNode, PlanSelectionItem,
    PlanSelectionSet, QueryPlan, RequiresNode, SequenceNode,
};
use super::walker::path::OperationPath;

/// A maximal run of edges resolvable by one subgraph: an optional entity move
/// into the subgraph, followed by the field moves taken there.
struct ServiceSegment {
    service_name: String,
    entity_edge: Option<EdgeIndex>,
    field_edges: Vec<EdgeIndex>,
}

/// Translates a terminal walker path into an executable plan: one root fetch,
/// one `Flatten(Fetch)` per entity move, composed sequentially.
#[instrument(skip(graph, path))]
pub fn build_query_plan_from_path(
    graph: &Graph,
    operation_kind: OperationKind,
    path: &OperationPath,
) -> Result<QueryPlan, PlanError> {
    if !path.is_aligned() {
        return Err(PlanError::MisalignedPath(
            path.edges.len(),
            path.required_paths_for_edges.len(),
        ));
    }

    if path.edges.is_empty() {
        return Ok(QueryPlan::new(None));
    }

    let segments = split_into_segments(graph, path)?;
    let mut nodes: Vec<PlanNode> = Vec::with_capacity(segments.len());

    for (position, segment) in segments.iter().enumerate() {
        // The entity move opening the next segment dictates which key fields
        // this segment has to fetch
        let boundary = match segments.get(position + 1).and_then(|next| next.entity_edge) {
            Some(entity_edge) => graph.edge(entity_edge)?.requirement.clone(),
            None => None,
        };

        let selection = build_segment_selection(graph, segment, boundary.as_deref())?;

        if selection.is_empty() {
            return Err(PlanError::MissingTargetField(segment.service_name.clone()));
        }

        match segment.entity_edge {
            None => {
                let operation = match operation_kind {
                    OperationKind::Query => selection.to_compact_string(),
                    other => format!("{}{}", other, selection.to_compact_string()),
                };

                debug!(
                    "emitting root fetch for subgraph '{}': {}",
                    segment.service_name, operation
                );

                nodes.push(PlanNode::Fetch(FetchNode {
                    service_name: segment.service_name.clone(),
                    variable_usages: Vec::new(),
                    operation_kind,
                    operation,
                    requires: None,
                    selection,
                }));
            }
            Some(entity_edge) => {
                let edge = graph.edge(entity_edge)?;
                let head_node = graph.node(graph.get_edge_head(&entity_edge)?)?;
                let requirement = edge.requirement.as_ref().ok_or_else(|| {
                    PlanError::MissingEntityRequirement(head_node.display_name())
                })?;

                let entity_selection = PlanSelectionSet(vec![PlanSelectionItem::InlineFragment {
                    type_condition: head_node.type_name.clone(),
                    selections: selection,
                }]);

                let operation = format!(
                    "query($representations:[_Any!]!){{_entities(representations:$representations){}}}",
                    entity_selection.to_compact_string()
                );

                debug!(
                    "emitting entity fetch for subgraph '{}': {}",
                    segment.service_name, operation
                );

                nodes.push(PlanNode::Flatten(FlattenNode {
                    path: flatten_path_to(graph, path, entity_edge)?,
                    node: Box::new(PlanNode::Fetch(FetchNode {
                        service_name: segment.service_name.clone(),
                        variable_usages: Vec::new(),
                        operation_kind: OperationKind::Query,
                        operation,
                        requires: Some(RequiresNode::new(
                            head_node.type_name.clone(),
                            selection_nodes_to_plan_set(&requirement.selection_set),
                        )),
                        selection: entity_selection,
                    })),
                }));
            }
        }
    }

    let node = if nodes.len() == 1 {
        nodes.pop()
    } else {
        Some(PlanNode::Sequence(SequenceNode { nodes }))
    };

    Ok(QueryPlan::new(node))
}

fn split_into_segments(
    graph: &Graph,
    path: &OperationPath,
) -> Result<Vec<ServiceSegment>, PlanError> {
    let mut segments: Vec<ServiceSegment> = Vec::new();

    for edge_index in path.edges.iter() {
        let edge = graph.edge(*edge_index)?;

        match &edge.transition {
            Move::Entity => {
                let tail_node = graph.node(graph.get_edge_tail(edge_index)?)?;

                segments.push(ServiceSegment {
                    service_name: tail_node.subgraph.clone(),
                    entity_edge: Some(*edge_index),
                    field_edges: Vec::new(),
                });
            }
            Move::Field { .. } => {
                if segments.is_empty() {
                    let head_node = graph.node(graph.get_edge_head(edge_index)?)?;

                    segments.push(ServiceSegment {
                        service_name: head_node.subgraph.clone(),
                        entity_edge: None,
                        field_edges: Vec::new(),
                    });
                }

                if let Some(segment) = segments.last_mut() {
                    segment.field_edges.push(*edge_index);
                }
            }
            _ => {
                return Err(PlanError::UnsupportedMove(edge.display_name()));
            }
        }
    }

    Ok(segments)
}

/// Nests the segment's field chain innermost-out, appending `__typename` and
/// the downstream key fields at the deepest position when another entity
/// fetch follows.
fn build_segment_selection(
    graph: &Graph,
    segment: &ServiceSegment,
    boundary: Option<&Selection>,
) -> Result<PlanSelectionSet, PlanError> {
    let mut innermost: Vec<PlanSelectionItem> = Vec::new();

    if let Some(boundary) = boundary {
        innermost.push(PlanSelectionItem::Field {
            name: "__typename".to_string(),
            selections: PlanSelectionSet::default(),
        });
        innermost.extend(selection_nodes_to_plan_set(&boundary.selection_set).0);
    }

    let mut current = PlanSelectionSet(innermost);

    for edge_index in segment.field_edges.iter().rev() {
        let edge = graph.edge(*edge_index)?;
        let Some(field_name) = edge.field_name() else {
            return Err(PlanError::UnsupportedMove(format!("{:?}", edge)));
        };

        current = PlanSelectionSet(vec![PlanSelectionItem::Field {
            name: field_name.to_string(),
            selections: current,
        }]);
    }

    Ok(current)
}

/// The structural response position of the entity move's head: all field
/// names up to the move, with `"@"` after every list-returning field.
fn flatten_path_to(
    graph: &Graph,
    path: &OperationPath,
    entity_edge: EdgeIndex,
) -> Result<FlattenNodePath, PlanError> {
    let mut segments: Vec<FlattenPathSegment> = Vec::new();

    for edge_index in path.edges.iter() {
        if *edge_index == entity_edge {
            break;
        }

        let edge = graph.edge(*edge_index)?;

        if let Move::Field { name, is_list, .. } = &edge.transition {
            segments.push(FlattenPathSegment::Field(name.clone()));

            if *is_list {
                segments.push(FlattenPathSegment::List);
            }
        }
    }

    Ok(FlattenNodePath(segments))
}

fn selection_nodes_to_plan_set(nodes: &[SelectionNode]) -> PlanSelectionSet {
    PlanSelectionSet(
        nodes
            .iter()
            .map(|node| match node {
                SelectionNode::Field {
                    field_name,
                    selection_set,
                    ..
                } => PlanSelectionItem::Field {
                    name: field_name.clone(),
                    selections: selection_set
                        .as_ref()
                        .map(|set| selection_nodes_to_plan_set(set))
                        .unwrap_or_default(),
                },
                SelectionNode::Fragment {
                    type_name,
                    selection_set,
                } => PlanSelectionItem::InlineFragment {
                    type_condition: type_name.clone(),
                    selections: selection_nodes_to_plan_set(selection_set),
                },
            })
            .collect(),
    )
}
