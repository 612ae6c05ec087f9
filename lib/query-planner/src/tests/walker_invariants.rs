use std::error::Error;

use crate::tests::testkit::{
    assert_path_well_formed, assert_requirement_closure, build_graph, init_logger, walk,
};

#[test]
fn returned_paths_are_well_formed() -> Result<(), Box<dyn Error>> {
    init_logger();

    let graph = build_graph("fixture/tests/complex-entity-call.supergraph.graphql")?;
    let path = walk(&graph, "topProducts.products.price.price")?.expect("expected a path");

    assert_path_well_formed(&graph, &path);
    assert_requirement_closure(&graph, &path);

    Ok(())
}

#[test]
fn path_cost_penalizes_entity_hops() -> Result<(), Box<dyn Error>> {
    init_logger();

    let graph = build_graph("fixture/tests/basic-entity.supergraph.graphql")?;

    let local = walk(&graph, "users.name")?.expect("expected a path");
    let remote = walk(&graph, "users.age")?.expect("expected a path");

    // Two field moves, against a field move plus an entity move and its
    // requirement resolution
    assert_eq!(local.cost, 2);
    assert!(remote.cost > local.cost);

    Ok(())
}

#[test]
fn walking_is_deterministic() -> Result<(), Box<dyn Error>> {
    init_logger();

    let graph = build_graph("fixture/tests/complex-entity-call.supergraph.graphql")?;

    let first = walk(&graph, "topProducts.products.price.price")?.expect("expected a path");
    let second = walk(&graph, "topProducts.products.price.price")?.expect("expected a path");

    assert_eq!(first.cost, second.cost);
    assert_eq!(first.edges, second.edges);
    assert_eq!(first.pretty_print(&graph), second.pretty_print(&graph));

    Ok(())
}

#[test]
fn requirements_on_field_moves_are_validated() -> Result<(), Box<dyn Error>> {
    init_logger();

    let graph = build_graph("fixture/tests/field-requires.supergraph.graphql")?;
    let path = walk(&graph, "orders.shippingEstimate")?.expect("expected a path");

    assert_path_well_formed(&graph, &path);
    assert_requirement_closure(&graph, &path);

    // The walk ends on the @requires field, whose requirement had to be
    // resolved through an extra entity move
    let last_edge = graph.edge(*path.edges.last().unwrap()).unwrap();
    assert_eq!(last_edge.field_name(), Some("shippingEstimate"));
    assert!(last_edge.requirement.is_some());

    let required_paths = path.required_paths_for_edges.last().unwrap();
    assert!(!required_paths.is_empty());

    Ok(())
}

#[test]
fn path_dot_output_is_a_digraph() -> Result<(), Box<dyn Error>> {
    init_logger();

    let graph = build_graph("fixture/tests/basic-entity.supergraph.graphql")?;
    let path = walk(&graph, "users.age")?.expect("expected a path");

    let dot = path.print(&graph, false);
    assert!(dot.starts_with("digraph"));
    assert!(dot.contains("User/A"));

    let link = path.print(&graph, true);
    assert!(link.starts_with("https://dreampuf.github.io/GraphvizOnline/#"));

    Ok(())
}
