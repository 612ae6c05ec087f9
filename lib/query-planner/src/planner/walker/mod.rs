mod best_path;
mod excluded;
mod pathfinder;

pub mod error;
pub mod path;

use tracing::{debug, instrument, span, warn, Level};

use crate::graph::Graph;
use crate::state::supergraph_state::OperationKind;

use self::best_path::{find_best_path, BestPathTracker};
use self::error::WalkOperationError;
use self::excluded::ExcludedFromLookup;
use self::path::OperationPath;
use self::pathfinder::{find_direct_paths, find_indirect_paths};

use super::traversal_step::Step;

/// Finds the cheapest walk through the graph whose field moves realize
/// `steps` in order, interleaving entity moves where necessary. `None` means
/// the operation cannot be satisfied by any subgraph combination.
#[instrument(skip(graph, steps), fields(steps = steps.len()))]
pub fn walk_query(
    graph: &Graph,
    operation_kind: OperationKind,
    steps: &[Step],
) -> Result<Option<OperationPath>, WalkOperationError> {
    let Some(root_type_name) = graph.root_type_name(operation_kind) else {
        debug!("no root type registered for {}", operation_kind);
        return Ok(None);
    };

    let mut paths: Vec<OperationPath> = graph
        .nodes_of_type(root_type_name)
        .iter()
        .map(|node_index| OperationPath::new(*node_index))
        .collect();

    if paths.is_empty() {
        debug!("no '{}' nodes in the graph", root_type_name);
        return Ok(None);
    }

    for step in steps {
        let Step::Field { name: field_name } = step;

        let step_span = span!(Level::INFO, "process_step", field = field_name);
        let _enter = step_span.enter();

        debug!(
            "trying to advance to '{}' through {} possible paths",
            field_name,
            paths.len()
        );

        let mut tracker = BestPathTracker::new(graph);

        for path in paths.iter() {
            let excluded = ExcludedFromLookup::new();

            let direct_paths = find_direct_paths(graph, path, field_name, &excluded)?;
            debug!("direct paths found: {}", direct_paths.len());

            let indirect_paths = find_indirect_paths(graph, path, field_name, &excluded)?;
            debug!("indirect paths found: {}", indirect_paths.len());

            if direct_paths.is_empty() && indirect_paths.is_empty() {
                warn!("failed to advance: {}", path.pretty_print(graph));
            }

            for next_path in direct_paths.into_iter().chain(indirect_paths) {
                tracker.add(&next_path)?;
            }
        }

        paths = tracker.get_best_paths();

        if paths.is_empty() {
            debug!("no paths survived step '{}'", field_name);
            return Ok(None);
        }
    }

    Ok(find_best_path(paths))
}
