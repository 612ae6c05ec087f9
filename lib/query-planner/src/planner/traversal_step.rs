use std::fmt::Debug;

/// A single step of an operation, as consumed by the walker. Only field
/// traversal is supported.
pub enum Step {
    Field { name: String },
}

impl Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Field { name } => f.write_str(name),
        }
    }
}

impl Step {
    /// Parses a dotted field chain, e.g. `"topProducts.products.price"`
    pub fn parse_field_steps(input: &str) -> Vec<Step> {
        input
            .trim()
            .split('.')
            .filter(|name| !name.is_empty())
            .map(|name| Step::Field {
                name: name.to_string(),
            })
            .collect()
    }

    pub fn field_name(&self) -> &str {
        match self {
            Step::Field { name } => name,
        }
    }
}
