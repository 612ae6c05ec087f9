use std::fmt::Debug;
use std::sync::Arc;

use crate::state::supergraph_state::TypeKind;

use super::selection::Selection;

pub type EdgeReference<'a> = petgraph::graph::EdgeReference<'a, Edge>;

/// The closed set of moves the walker can take through the graph.
#[derive(Clone, PartialEq)]
pub enum Move {
    /// Traverse a field into its return type
    Field {
        name: String,
        type_name: String,
        type_kind: TypeKind,
        is_list: bool,
    },
    /// Re-enter the same logical entity in another subgraph
    Entity,
    /// Narrow an abstract type to a concrete one (`... on X`)
    Abstract {
        from_type: String,
        from_kind: TypeKind,
        to_type: String,
        to_kind: TypeKind,
    },
    /// interfaceObject
    InterfaceObject {
        from_type: String,
        from_kind: TypeKind,
        to_type: String,
    },
}

#[derive(Clone)]
pub struct Edge {
    pub transition: Move,
    /// A selection that must be resolvable at the edge's head before the move
    /// may be taken. Always present on entity moves; present on field moves
    /// carrying `@requires`.
    pub requirement: Option<Arc<Selection>>,
}

impl Edge {
    pub fn field_move(
        name: String,
        type_name: String,
        type_kind: TypeKind,
        is_list: bool,
        requirement: Option<Arc<Selection>>,
    ) -> Self {
        Self {
            transition: Move::Field {
                name,
                type_name,
                type_kind,
                is_list,
            },
            requirement,
        }
    }

    pub fn entity_move(requirement: Arc<Selection>) -> Self {
        Self {
            transition: Move::Entity,
            requirement: Some(requirement),
        }
    }

    pub fn cost(&self) -> u64 {
        match self.transition {
            Move::Field { .. } => 1,
            _ => 10,
        }
    }

    pub fn is_entity_move(&self) -> bool {
        matches!(self.transition, Move::Entity)
    }

    pub fn field_name(&self) -> Option<&str> {
        match &self.transition {
            Move::Field { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn display_name(&self) -> String {
        match &self.transition {
            Move::Field { name, .. } => name.clone(),
            Move::Entity => match &self.requirement {
                Some(requirement) => format!("🔑 {}", requirement.key_fields_string),
                None => "🔑".to_string(),
            },
            Move::Abstract { to_type, .. } => format!("🔮 {}", to_type),
            Move::InterfaceObject { to_type, .. } => format!("🔮 {}", to_type),
        }
    }
}

impl Debug for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())?;

        if let (Move::Field { .. }, Some(requirement)) = (&self.transition, &self.requirement) {
            write!(f, " @requires({})", requirement.key_fields_string)?;
        }

        Ok(())
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.transition == other.transition && self.requirement == other.requirement
    }
}
