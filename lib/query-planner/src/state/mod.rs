pub mod selection_resolver;
pub mod subgraph_state;
pub mod supergraph_state;
