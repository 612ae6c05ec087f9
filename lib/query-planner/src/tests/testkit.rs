use std::collections::HashSet;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Once;

use lazy_static::lazy_static;
use petgraph::graph::EdgeIndex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::graph::selection::SelectionNode;
use crate::graph::Graph;
use crate::planner::plan;
use crate::planner::plan_nodes::QueryPlan;
use crate::planner::traversal_step::Step;
use crate::planner::walker::path::OperationPath;
use crate::planner::walker::walk_query;
use crate::state::supergraph_state::{OperationKind, SupergraphState};
use crate::utils::parsing::parse_schema;

fn init_test_logger_internal() {
    let tree_layer = tracing_tree::HierarchicalLayer::new(2)
        .with_bracketed_fields(true)
        .with_deferred_spans(false)
        .with_indent_lines(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_targets(false);

    tracing_subscriber::registry()
        .with(tree_layer)
        .with(EnvFilter::from_default_env())
        .init();
}

lazy_static! {
    static ref TRACING_INIT: Once = Once::new();
}

pub fn init_logger() {
    TRACING_INIT.call_once(|| {
        init_test_logger_internal();
    });
}

pub fn read_supergraph(fixture_path: &str) -> String {
    let supergraph_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(fixture_path);

    std::fs::read_to_string(supergraph_path).expect("Unable to read input file")
}

pub fn build_graph(fixture_path: &str) -> Result<Graph, Box<dyn Error>> {
    let schema = parse_schema(&read_supergraph(fixture_path))?;
    let state = SupergraphState::new(&schema)?;

    Ok(Graph::build_from_supergraph(&state)?)
}

pub fn walk(graph: &Graph, fields: &str) -> Result<Option<OperationPath>, Box<dyn Error>> {
    let steps = Step::parse_field_steps(fields);

    Ok(walk_query(graph, OperationKind::Query, &steps)?)
}

pub fn build_query_plan(fixture_path: &str, fields: &str) -> Result<QueryPlan, Box<dyn Error>> {
    let graph = build_graph(fixture_path)?;
    let steps = Step::parse_field_steps(fields);

    plan(&graph, OperationKind::Query, &steps)?.ok_or_else(|| "no plan found".into())
}

/// Checks the structural invariants every returned path has to hold: edges
/// form a chain from the root, the requirement slots stay aligned, no edge
/// repeats, and no entity move jumps back to the subgraph its predecessor
/// just left.
pub fn assert_path_well_formed(graph: &Graph, path: &OperationPath) {
    assert!(
        path.is_aligned(),
        "edges and requirement slots are misaligned"
    );

    let mut expected_head = path.root_node;
    let mut seen_edges: HashSet<EdgeIndex> = HashSet::new();
    let mut previously_left_subgraph: Option<String> = None;

    for (position, edge_index) in path.edges.iter().enumerate() {
        assert!(
            seen_edges.insert(*edge_index),
            "edge {:?} appears twice on the path",
            edge_index
        );

        let head = graph.get_edge_head(edge_index).unwrap();
        let tail = graph.get_edge_tail(edge_index).unwrap();

        assert_eq!(
            head, expected_head,
            "edge at position {} does not continue the chain",
            position
        );

        let edge = graph.edge(*edge_index).unwrap();

        if edge.is_entity_move() {
            let head_subgraph = graph.node(head).unwrap().subgraph.clone();
            let tail_subgraph = graph.node(tail).unwrap().subgraph.clone();

            if let Some(previous) = &previously_left_subgraph {
                assert_ne!(
                    &tail_subgraph, previous,
                    "entity move jumps back to the subgraph its predecessor left"
                );
            }

            previously_left_subgraph = Some(head_subgraph);
        }

        if !path.required_paths_for_edges[position].is_empty() {
            assert!(
                edge.requirement.is_some(),
                "requirement paths attached to an edge without a requirement"
            );
        }

        expected_head = tail;
    }
}

/// Every leaf field named by an edge's requirement must be read by the tail
/// of at least one attached resolver sub-path.
pub fn assert_requirement_closure(graph: &Graph, path: &OperationPath) {
    for (position, edge_index) in path.edges.iter().enumerate() {
        let edge = graph.edge(*edge_index).unwrap();

        let Some(requirement) = edge.requirement.as_ref() else {
            continue;
        };

        let required_paths = &path.required_paths_for_edges[position];
        assert!(
            !required_paths.is_empty(),
            "edge with a requirement has no resolver paths attached"
        );

        let mut leaf_fields: Vec<String> = Vec::new();
        collect_leaf_fields(&requirement.selection_set, &mut leaf_fields);

        for leaf_field in leaf_fields {
            let covered = required_paths.iter().any(|required_path| {
                required_path
                    .edges
                    .last()
                    .map(|last_edge| {
                        graph.edge(*last_edge).unwrap().field_name() == Some(leaf_field.as_str())
                    })
                    .unwrap_or(false)
            });

            assert!(
                covered,
                "requirement field '{}' is not read by any resolver path",
                leaf_field
            );
        }
    }
}

fn collect_leaf_fields(selection_set: &[SelectionNode], out: &mut Vec<String>) {
    for node in selection_set {
        match node {
            SelectionNode::Field {
                field_name,
                selection_set,
                ..
            } => match selection_set {
                Some(nested) if !nested.is_empty() => collect_leaf_fields(nested, out),
                _ => out.push(field_name.clone()),
            },
            SelectionNode::Fragment { selection_set, .. } => {
                collect_leaf_fields(selection_set, out);
            }
        }
    }
}
