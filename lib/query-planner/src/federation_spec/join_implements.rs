use graphql_parser::schema::Directive;

use super::directive_trait::{graph_arg, string_arg, DirectiveError, FederationDirective};

#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct JoinImplementsDirective {
    pub graph_id: String,
    pub interface: String,
}

impl JoinImplementsDirective {
    pub const NAME: &'static str = "join__implements";
}

impl FederationDirective for JoinImplementsDirective {
    fn directive_name() -> &'static str {
        Self::NAME
    }

    fn parse(directive: &Directive<'_, String>) -> Result<Self, DirectiveError> {
        let mut result = Self::default();

        for (arg_name, arg_value) in &directive.arguments {
            if arg_name.eq("graph") {
                result.graph_id = graph_arg(Self::NAME, arg_value)?;
            } else if arg_name.eq("interface") {
                result.interface = string_arg(Self::NAME, "interface", arg_value)?;
            }
        }

        if result.graph_id.is_empty() {
            return Err(DirectiveError::MissingArgument {
                directive: Self::NAME,
                argument: "graph",
            });
        }

        if result.interface.is_empty() {
            return Err(DirectiveError::MissingArgument {
                directive: Self::NAME,
                argument: "interface",
            });
        }

        Ok(result)
    }
}
