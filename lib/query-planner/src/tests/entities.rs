use std::error::Error;

use crate::planner::plan;
use crate::planner::plan_nodes::PlanNode;
use crate::planner::traversal_step::Step;
use crate::state::supergraph_state::OperationKind;
use crate::tests::testkit::{build_graph, build_query_plan, init_logger};

const FIXTURE: &str = "fixture/tests/basic-entity.supergraph.graphql";

#[test]
fn basic_entity_jump() -> Result<(), Box<dyn Error>> {
    init_logger();

    let query_plan = build_query_plan(FIXTURE, "users.age")?;

    insta::assert_snapshot!(format!("{}", query_plan), @r#"
    QueryPlan {
      Sequence {
        Fetch(service: "B") {
          {
            users {
              __typename
              id
            }
          }
        },
        Flatten(path: "users.@") {
          Fetch(service: "A") {
            {
              ... on User {
                id
              }
            } =>
            {
              ... on User {
                age
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
fn entity_fetch_uses_the_representations_contract() -> Result<(), Box<dyn Error>> {
    init_logger();

    let query_plan = build_query_plan(FIXTURE, "users.age")?;

    let Some(PlanNode::Sequence(sequence)) = &query_plan.node else {
        panic!("expected a sequence at the plan root");
    };

    let PlanNode::Fetch(root_fetch) = &sequence.nodes[0] else {
        panic!("expected a root fetch");
    };
    assert_eq!(root_fetch.operation, "{users{__typename id}}");

    let PlanNode::Flatten(flatten) = &sequence.nodes[1] else {
        panic!("expected a flatten after the root fetch");
    };
    let PlanNode::Fetch(entity_fetch) = flatten.node.as_ref() else {
        panic!("expected a fetch inside the flatten");
    };

    assert_eq!(entity_fetch.service_name, "A");
    assert_eq!(
        entity_fetch.operation,
        "query($representations:[_Any!]!){_entities(representations:$representations){...on User{age}}}"
    );

    Ok(())
}

#[test]
fn single_subgraph_solution_wins_when_available() -> Result<(), Box<dyn Error>> {
    init_logger();

    // `name` is resolvable directly in B, no entity jump is worth taking
    let query_plan = build_query_plan(FIXTURE, "users.name")?;

    insta::assert_snapshot!(format!("{}", query_plan), @r#"
    QueryPlan {
      Fetch(service: "B") {
        {
          users {
            name
          }
        }
      },
    }
    "#);

    Ok(())
}

#[test]
fn unreachable_field_returns_no_plan() -> Result<(), Box<dyn Error>> {
    init_logger();

    let graph = build_graph(FIXTURE)?;
    let steps = Step::parse_field_steps("users.nickname");

    let result = plan(&graph, OperationKind::Query, &steps)?;
    assert!(result.is_none());

    Ok(())
}

#[test]
fn missing_root_type_returns_no_plan() -> Result<(), Box<dyn Error>> {
    init_logger();

    let graph = build_graph(FIXTURE)?;
    let steps = Step::parse_field_steps("users");

    let result = plan(&graph, OperationKind::Mutation, &steps)?;
    assert!(result.is_none());

    Ok(())
}

#[test]
fn planning_is_deterministic() -> Result<(), Box<dyn Error>> {
    init_logger();

    let first = build_query_plan(FIXTURE, "users.age")?;
    let second = build_query_plan(FIXTURE, "users.age")?;

    assert_eq!(format!("{}", first), format!("{}", second));
    assert_eq!(
        serde_json::to_string(&first)?,
        serde_json::to_string(&second)?
    );

    Ok(())
}
