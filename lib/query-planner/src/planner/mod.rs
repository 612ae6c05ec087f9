pub mod error;
pub mod plan_nodes;
pub mod query_plan;
pub mod traversal_step;
pub mod walker;

use tracing::instrument;

use crate::graph::Graph;
use crate::state::supergraph_state::OperationKind;

use self::error::PlannerError;
use self::plan_nodes::QueryPlan;
use self::query_plan::build_query_plan_from_path;
use self::traversal_step::Step;
use self::walker::walk_query;

/// The full planning pipeline for one operation: walk the graph for the
/// cheapest satisfying path, then synthesize the fetch tree. `Ok(None)` means
/// no subgraph combination can resolve the steps.
#[instrument(skip(graph, steps))]
pub fn plan(
    graph: &Graph,
    operation_kind: OperationKind,
    steps: &[Step],
) -> Result<Option<QueryPlan>, PlannerError> {
    match walk_query(graph, operation_kind, steps)? {
        None => Ok(None),
        Some(path) => Ok(Some(build_query_plan_from_path(
            graph,
            operation_kind,
            &path,
        )?)),
    }
}
