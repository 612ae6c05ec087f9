use std::error::Error;

use crate::graph::Graph;
use crate::tests::testkit::{build_graph, build_query_plan, init_logger, walk};

const FIXTURE: &str = "fixture/tests/key-preference.supergraph.graphql";

#[test]
fn prefers_the_smaller_key_when_both_are_viable() -> Result<(), Box<dyn Error>> {
    init_logger();

    let query_plan = build_query_plan(FIXTURE, "topProduct.name")?;

    // Product is reachable in "link" through both @key(id) and @key(id pid);
    // resolving one key field is cheaper than two
    insta::assert_snapshot!(format!("{}", query_plan), @r#"
    QueryPlan {
      Sequence {
        Fetch(service: "catalog") {
          {
            topProduct {
              __typename
              id
            }
          }
        },
        Flatten(path: "topProduct") {
          Fetch(service: "link") {
            {
              ... on Product {
                id
              }
            } =>
            {
              ... on Product {
                name
              }
            }
          },
        },
      },
    }
    "#);

    Ok(())
}

#[test]
fn taken_entity_edge_carries_the_smaller_requirement() -> Result<(), Box<dyn Error>> {
    init_logger();

    let graph: Graph = build_graph(FIXTURE)?;
    let path = walk(&graph, "topProduct.name")?.expect("expected a path");

    let entity_edges: Vec<_> = path
        .edges
        .iter()
        .filter(|edge_index| graph.edge(**edge_index).unwrap().is_entity_move())
        .collect();
    assert_eq!(entity_edges.len(), 1);

    let requirement = graph
        .edge(*entity_edges[0])
        .unwrap()
        .requirement
        .as_ref()
        .expect("entity edge without requirement");

    assert_eq!(requirement.key_fields_string, "id");

    Ok(())
}
