use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};

#[derive(Clone, Eq)]
pub enum SelectionNode {
    Field {
        /// The type declaring the field, used for the canonical sort
        type_name: String,
        field_name: String,
        selection_set: Option<Vec<SelectionNode>>,
    },
    Fragment {
        type_name: String,
        selection_set: Vec<SelectionNode>,
    },
}

impl SelectionNode {
    pub fn sort_key(&self) -> String {
        match self {
            SelectionNode::Field {
                type_name,
                field_name,
                ..
            } => format!("{}.{}", type_name, field_name),
            SelectionNode::Fragment { type_name, .. } => type_name.to_string(),
        }
    }

    pub fn selections(&self) -> Option<&Vec<SelectionNode>> {
        match self {
            SelectionNode::Field { selection_set, .. } => selection_set.as_ref(),
            SelectionNode::Fragment { selection_set, .. } => Some(selection_set),
        }
    }

    pub fn is_leaf(&self) -> bool {
        match self {
            SelectionNode::Field { selection_set, .. } => selection_set
                .as_ref()
                .map(|set| set.is_empty())
                .unwrap_or(true),
            SelectionNode::Fragment { .. } => false,
        }
    }
}

impl Ord for SelectionNode {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self, other) {
            (SelectionNode::Field { .. }, SelectionNode::Field { .. }) => {
                self.sort_key().cmp(&other.sort_key())
            }
            (
                SelectionNode::Fragment { type_name: a, .. },
                SelectionNode::Fragment { type_name: b, .. },
            ) => a.cmp(b),
            // Fields come before fragments
            (SelectionNode::Field { .. }, SelectionNode::Fragment { .. }) => {
                std::cmp::Ordering::Less
            }
            (SelectionNode::Fragment { .. }, SelectionNode::Field { .. }) => {
                std::cmp::Ordering::Greater
            }
        }
    }
}

impl PartialOrd for SelectionNode {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SelectionNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                SelectionNode::Field {
                    type_name,
                    field_name,
                    selection_set,
                },
                SelectionNode::Field {
                    type_name: other_type_name,
                    field_name: other_field_name,
                    selection_set: other_selection_set,
                },
            ) => {
                type_name == other_type_name
                    && field_name == other_field_name
                    && selection_set == other_selection_set
            }
            (
                SelectionNode::Fragment {
                    type_name,
                    selection_set,
                },
                SelectionNode::Fragment {
                    type_name: other_type_name,
                    selection_set: other_selection_set,
                },
            ) => type_name == other_type_name && selection_set == other_selection_set,
            _ => false,
        }
    }
}

// Hash must agree with both equality branches of Selection::eq, so only field
// names participate, never declaring types
impl Hash for SelectionNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            SelectionNode::Field {
                field_name,
                selection_set,
                ..
            } => {
                field_name.hash(state);
                if let Some(selection_set) = selection_set {
                    selection_set.hash(state);
                }
            }
            SelectionNode::Fragment {
                type_name,
                selection_set,
            } => {
                type_name.hash(state);
                selection_set.hash(state);
            }
        }
    }
}

impl Debug for SelectionNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl Display for SelectionNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionNode::Field {
                field_name,
                selection_set,
                ..
            } => {
                write!(f, "{}", field_name)?;
                if let Some(selection_set) = selection_set {
                    if !selection_set.is_empty() {
                        write!(f, " {}", render_selection_set(selection_set))?;
                    }
                }
                Ok(())
            }
            SelectionNode::Fragment {
                type_name,
                selection_set,
            } => {
                write!(
                    f,
                    "... on {} {}",
                    type_name,
                    render_selection_set(selection_set)
                )
            }
        }
    }
}

fn render_selection_set(selection_set: &[SelectionNode]) -> String {
    let inner = selection_set
        .iter()
        .map(|node| node.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    format!("{{ {} }}", inner)
}

/// A canonical, resolved selection set: every field knows its declaring type,
/// and every level is sorted (fields before fragments, fields by
/// `"<type>.<field>"`, fragments by type name).
#[derive(Clone, Eq)]
pub struct Selection {
    pub type_name: String,
    pub key_fields_string: String,
    pub selection_set: Vec<SelectionNode>,
}

impl Selection {
    pub fn new(
        type_name: String,
        key_fields_string: String,
        selection_set: Vec<SelectionNode>,
    ) -> Self {
        Self {
            type_name,
            key_fields_string,
            selection_set,
        }
    }
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        if self.type_name != other.type_name {
            return false;
        }

        // Fast early-out: two identical key strings resolve identically
        if self.key_fields_string == other.key_fields_string {
            return true;
        }

        self.selection_set == other.selection_set
    }
}

impl Hash for Selection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_name.hash(state);
        self.selection_set.hash(state);
    }
}

impl Debug for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", render_selection_set(&self.selection_set))
    }
}
