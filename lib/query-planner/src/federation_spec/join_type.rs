use graphql_parser::schema::Directive;

use super::directive_trait::{bool_arg, graph_arg, string_arg, DirectiveError, FederationDirective};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct JoinTypeDirective {
    pub graph_id: String,
    pub key: Option<String>,
    pub extension: bool,
    pub resolvable: bool,
    pub is_interface_object: bool,
}

impl Default for JoinTypeDirective {
    fn default() -> Self {
        Self {
            graph_id: Default::default(),
            key: None,
            extension: false,
            resolvable: true,
            is_interface_object: false,
        }
    }
}

impl JoinTypeDirective {
    pub const NAME: &'static str = "join__type";
}

impl FederationDirective for JoinTypeDirective {
    fn directive_name() -> &'static str {
        Self::NAME
    }

    fn parse(directive: &Directive<'_, String>) -> Result<Self, DirectiveError> {
        let mut result = Self::default();
        let mut seen_graph = false;

        for (arg_name, arg_value) in &directive.arguments {
            if arg_name.eq("graph") {
                result.graph_id = graph_arg(Self::NAME, arg_value)?;
                seen_graph = true;
            } else if arg_name.eq("key") {
                result.key = Some(string_arg(Self::NAME, "key", arg_value)?);
            } else if arg_name.eq("extension") {
                result.extension = bool_arg(Self::NAME, "extension", arg_value)?;
            } else if arg_name.eq("resolvable") {
                result.resolvable = bool_arg(Self::NAME, "resolvable", arg_value)?;
            } else if arg_name.eq("isInterfaceObject") {
                result.is_interface_object = bool_arg(Self::NAME, "isInterfaceObject", arg_value)?;
            }
        }

        if !seen_graph {
            return Err(DirectiveError::MissingArgument {
                directive: Self::NAME,
                argument: "graph",
            });
        }

        Ok(result)
    }
}

impl Ord for JoinTypeDirective {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.graph_id.cmp(&other.graph_id)
    }
}

impl PartialOrd for JoinTypeDirective {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
