use std::sync::Arc;

use graphql_parser::query::{
    Definition, Field, OperationDefinition, Selection as ParserSelection,
    SelectionSet as ParserSelectionSet,
};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::graph::selection::{Selection, SelectionNode};
use crate::utils::parsing::parse_operation;

use super::subgraph_state::SubgraphState;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SelectionResolverError {
    #[error("failed to parse selection '{0}': {1}")]
    ParseFailure(String, String),
    #[error("type '{0}' is not defined in subgraph '{1}'")]
    DefinitionNotFound(String, String),
    #[error("field '{1}' is not defined on type '{0}' in subgraph '{2}'")]
    FieldNotFound(String, String, String),
    #[error("fragments are not supported in key and requires selections (type '{0}')")]
    FragmentNotSupported(String),
}

/// Resolves `(type_name, key_fields_string)` pairs into canonical, memoized
/// [`Selection`]s against one subgraph's type table. Requirement equality sits
/// on a hot path of the walker, so identical pairs share one allocation.
#[derive(Debug)]
pub struct SelectionResolver<'a> {
    pub subgraph: &'a SubgraphState,
    cache: FxHashMap<(String, String), Arc<Selection>>,
}

impl<'a> SelectionResolver<'a> {
    pub fn new(subgraph: &'a SubgraphState) -> Self {
        Self {
            subgraph,
            cache: FxHashMap::default(),
        }
    }

    pub fn resolve(
        &mut self,
        type_name: &str,
        key_fields: &str,
    ) -> Result<Arc<Selection>, SelectionResolverError> {
        let cache_key = (type_name.to_string(), key_fields.to_string());

        if let Some(selection) = self.cache.get(&cache_key) {
            return Ok(selection.clone());
        }

        debug!(
            "resolving selection '{}' of type '{}' in subgraph '{}'",
            key_fields, type_name, self.subgraph.name
        );

        let selection_set = parse_selection_set(key_fields)?;
        let selection_nodes = self.resolve_selection_set(type_name, &selection_set)?;
        let selection = Arc::new(Selection::new(
            type_name.to_string(),
            key_fields.to_string(),
            selection_nodes,
        ));

        self.cache.insert(cache_key, selection.clone());

        Ok(selection)
    }

    fn resolve_field_selection(
        &self,
        type_name: &str,
        selection_field: &Field<'static, String>,
    ) -> Result<SelectionNode, SelectionResolverError> {
        let type_state = self.subgraph.types.get(type_name).ok_or_else(|| {
            SelectionResolverError::DefinitionNotFound(
                type_name.to_string(),
                self.subgraph.name.clone(),
            )
        })?;
        let field_state = type_state.field(&selection_field.name).ok_or_else(|| {
            SelectionResolverError::FieldNotFound(
                type_name.to_string(),
                selection_field.name.to_string(),
                self.subgraph.name.clone(),
            )
        })?;

        let selection_set = if selection_field.selection_set.items.is_empty() {
            None
        } else {
            Some(self.resolve_selection_set(
                &field_state.return_type_name,
                &selection_field.selection_set,
            )?)
        };

        Ok(SelectionNode::Field {
            type_name: type_name.to_string(),
            field_name: field_state.name.clone(),
            selection_set,
        })
    }

    fn resolve_selection_set(
        &self,
        type_name: &str,
        selection_set: &ParserSelectionSet<'static, String>,
    ) -> Result<Vec<SelectionNode>, SelectionResolverError> {
        let mut result: Vec<SelectionNode> = Vec::with_capacity(selection_set.items.len());

        for selection in &selection_set.items {
            match selection {
                ParserSelection::Field(field) => {
                    result.push(self.resolve_field_selection(type_name, field)?);
                }
                ParserSelection::InlineFragment(_) | ParserSelection::FragmentSpread(_) => {
                    return Err(SelectionResolverError::FragmentNotSupported(
                        type_name.to_string(),
                    ));
                }
            }
        }

        result.sort();

        Ok(result)
    }
}

fn parse_selection_set(
    key_fields: &str,
) -> Result<ParserSelectionSet<'static, String>, SelectionResolverError> {
    let wrapped = format!("{{ {} }}", key_fields);
    let document = parse_operation(&wrapped).map_err(|error| {
        SelectionResolverError::ParseFailure(key_fields.to_string(), error.to_string())
    })?;

    match document.definitions.into_iter().next() {
        Some(Definition::Operation(OperationDefinition::SelectionSet(selection_set))) => {
            Ok(selection_set)
        }
        _ => Err(SelectionResolverError::ParseFailure(
            key_fields.to_string(),
            "expected a bare selection set".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;
    use crate::state::supergraph_state::SupergraphState;
    use crate::utils::parsing::parse_schema;

    const SDL: &str = r#"
        schema {
          query: Query
        }

        enum join__Graph {
          PRICE @join__graph(name: "price", url: "http://price.example.com/graphql")
        }

        type Query @join__type(graph: PRICE) {
          product: Product @join__field(graph: PRICE)
        }

        type Product @join__type(graph: PRICE, key: "id pid category { id tag }") {
          id: ID!
          pid: ID
          category: Category
        }

        type Category @join__type(graph: PRICE) {
          id: ID!
          tag: String
        }
    "#;

    fn price_state() -> SupergraphState {
        let schema = parse_schema(SDL).expect("failed to parse schema");
        SupergraphState::new(&schema).expect("failed to build supergraph state")
    }

    #[test]
    fn resolution_is_field_order_invariant() {
        let state = price_state();
        let mut resolver = SelectionResolver::new(state.subgraph("price").unwrap());

        let sorted = resolver
            .resolve("Product", "category { id tag } id pid")
            .unwrap();
        let shuffled = resolver
            .resolve("Product", "pid category { tag id } id")
            .unwrap();

        assert_eq!(*sorted, *shuffled);

        let mut set: HashSet<Arc<Selection>> = HashSet::new();
        set.insert(sorted);
        assert!(set.contains(&shuffled));
    }

    #[test]
    fn memoizes_identical_pairs() {
        let state = price_state();
        let mut resolver = SelectionResolver::new(state.subgraph("price").unwrap());

        let first = resolver.resolve("Product", "id pid").unwrap();
        let second = resolver.resolve("Product", "id pid").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn sorts_fields_canonically() {
        let state = price_state();
        let mut resolver = SelectionResolver::new(state.subgraph("price").unwrap());

        let selection = resolver
            .resolve("Product", "pid id category { tag id }")
            .unwrap();

        assert_eq!(
            selection.to_string(),
            "{ category { id tag } id pid }"
        );
    }

    #[test]
    fn rejects_fragments_in_key_selections() {
        let state = price_state();
        let mut resolver = SelectionResolver::new(state.subgraph("price").unwrap());

        let result = resolver.resolve("Product", "id ... on Product { pid }");

        assert!(matches!(
            result,
            Err(SelectionResolverError::FragmentNotSupported(_))
        ));
    }

    #[test]
    fn fails_on_unknown_fields() {
        let state = price_state();
        let mut resolver = SelectionResolver::new(state.subgraph("price").unwrap());

        let result = resolver.resolve("Product", "id nope");

        assert!(matches!(
            result,
            Err(SelectionResolverError::FieldNotFound(_, _, _))
        ));
    }
}
