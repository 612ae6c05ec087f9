use std::error::Error;

use crate::tests::testkit::{build_query_plan, init_logger};

const FIXTURE: &str = "fixture/tests/complex-entity-call.supergraph.graphql";

#[test]
fn composite_key_with_nested_selection() -> Result<(), Box<dyn Error>> {
    init_logger();

    let query_plan = build_query_plan(FIXTURE, "topProducts.products.price.price")?;

    insta::assert_snapshot!(format!("{}", query_plan), @r#"
    QueryPlan {
      Sequence {
        Fetch(service: "products") {
          {
            topProducts {
              products {
                __typename
                category {
                  id
                  tag
                }
                id
                pid
              }
            }
          }
        },
        Flatten(path: "topProducts.products.@") {
          Fetch(service: "price") {
            {
              ... on Product {
                category {
                  id
                  tag
                }
                id
                pid
              }
            } =>
            {
              ... on Product {
                price {
                  price
                }
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
fn list_positions_mark_flatten_paths() -> Result<(), Box<dyn Error>> {
    init_logger();

    let query_plan = build_query_plan(FIXTURE, "topProducts.products.stock")?;

    // `topProducts` is not a list, `products` is; only the latter gets an `@`
    insta::assert_snapshot!(format!("{}", query_plan), @r#"
    QueryPlan {
      Sequence {
        Fetch(service: "products") {
          {
            topProducts {
              products {
                __typename
                id
                pid
              }
            }
          }
        },
        Flatten(path: "topProducts.products.@") {
          Fetch(service: "list") {
            {
              ... on Product {
                id
                pid
              }
            } =>
            {
              ... on Product {
                stock
              }
            }
          },
        },
      },
    }
    "#);

    Ok(())
}
