#[cfg(test)]
mod graph_tests {
    use petgraph::visit::EdgeRef;

    use crate::graph::Graph;
    use crate::state::selection_resolver::SelectionResolver;
    use crate::state::supergraph_state::SupergraphState;
    use crate::utils::parsing::parse_schema;

    const TWO_SUBGRAPH_USERS: &str = r#"
        schema {
          query: Query
        }

        enum join__Graph {
          A @join__graph(name: "A", url: "http://a.example.com/graphql")
          B @join__graph(name: "B", url: "http://b.example.com/graphql")
        }

        type Query
          @join__type(graph: A)
          @join__type(graph: B)
        {
          users: [User] @join__field(graph: B)
        }

        type User
          @join__type(graph: A, key: "id")
          @join__type(graph: B, key: "id")
        {
          id: ID!
          name: String
          age: Int @join__field(graph: A)
        }
    "#;

    const EXTERNAL_AND_REQUIRES: &str = r#"
        schema {
          query: Query
        }

        enum join__Graph {
          COST @join__graph(name: "cost", url: "http://cost.example.com/graphql")
          STORE @join__graph(name: "store", url: "http://store.example.com/graphql")
        }

        type Query
          @join__type(graph: COST)
          @join__type(graph: STORE)
        {
          orders: [Order] @join__field(graph: STORE)
        }

        type Order
          @join__type(graph: COST, key: "id")
          @join__type(graph: STORE, key: "id")
        {
          id: ID!
          weight: Int @join__field(graph: COST, external: true) @join__field(graph: STORE)
          shippingEstimate: Int @join__field(graph: COST, requires: "weight")
        }
    "#;

    fn init_test(supergraph_sdl: &str) -> (Graph, SupergraphState) {
        let schema = parse_schema(supergraph_sdl).expect("failed to parse schema");
        let state = SupergraphState::new(&schema).expect("failed to build supergraph state");
        let graph = Graph::build_from_supergraph(&state).expect("failed to create graph");

        (graph, state)
    }

    #[test]
    fn joins_entities_by_key_across_subgraphs() {
        let (graph, state) = init_test(TWO_SUBGRAPH_USERS);

        assert_eq!(graph.nodes_of_type("User").len(), 2);

        let entity_edges: Vec<_> = graph
            .graph
            .edge_references()
            .filter(|edge_ref| edge_ref.weight().is_entity_move())
            .collect();

        assert_eq!(entity_edges.len(), 2);

        let mut endpoints: Vec<(String, String)> = entity_edges
            .iter()
            .map(|edge_ref| {
                let head = graph.node(edge_ref.source()).unwrap();
                let tail = graph.node(edge_ref.target()).unwrap();
                (head.subgraph.clone(), tail.subgraph.clone())
            })
            .collect();
        endpoints.sort();

        assert_eq!(
            endpoints,
            vec![
                ("A".to_string(), "B".to_string()),
                ("B".to_string(), "A".to_string())
            ]
        );

        let mut resolver = SelectionResolver::new(state.subgraph("A").unwrap());
        let expected = resolver.resolve("User", "id").unwrap();

        for edge_ref in entity_edges {
            let requirement = edge_ref
                .weight()
                .requirement
                .as_ref()
                .expect("entity edge without requirement");

            assert_eq!(**requirement, *expected);
        }
    }

    #[test]
    fn skips_root_types_with_no_fields_in_subgraph() {
        let (graph, _) = init_test(TWO_SUBGRAPH_USERS);

        // Query has no resolvable fields in A, so only B hosts a Query node
        let query_nodes = graph.nodes_of_type("Query");
        assert_eq!(query_nodes.len(), 1);
        assert_eq!(graph.node(query_nodes[0]).unwrap().subgraph, "B");
    }

    #[test]
    fn skips_external_fields_without_requires() {
        let (graph, _) = init_test(EXTERNAL_AND_REQUIRES);

        let order_in_cost = graph
            .node_index_of("Order", "cost")
            .expect("Order/cost not found");

        let weight_edges = graph
            .edges_from(order_in_cost)
            .filter(|edge_ref| edge_ref.weight().field_name() == Some("weight"))
            .count();

        assert_eq!(weight_edges, 0, "external field must not produce an edge");
    }

    #[test]
    fn field_requires_becomes_an_edge_requirement() {
        let (graph, _) = init_test(EXTERNAL_AND_REQUIRES);

        let order_in_cost = graph
            .node_index_of("Order", "cost")
            .expect("Order/cost not found");

        let estimate_edge = graph
            .edges_from(order_in_cost)
            .find(|edge_ref| edge_ref.weight().field_name() == Some("shippingEstimate"))
            .expect("shippingEstimate edge not found");

        let requirement = estimate_edge
            .weight()
            .requirement
            .as_ref()
            .expect("requires was not resolved onto the edge");

        assert_eq!(requirement.key_fields_string, "weight");
        assert_eq!(requirement.type_name, "Order");
    }

    #[test]
    fn print_emits_dot_source() {
        let (graph, _) = init_test(TWO_SUBGRAPH_USERS);

        let dot = graph.print(false);
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("User/A"));
        assert!(dot.contains("User/B"));

        let link = graph.print(true);
        assert!(link.starts_with("https://dreampuf.github.io/GraphvizOnline/#"));
    }
}
