use graphql_parser::schema::Directive;

use super::directive_trait::{string_arg, DirectiveError, FederationDirective};

#[derive(Debug, Default, Clone)]
pub struct JoinGraphDirective {
    pub name: String,
    pub url: String,
}

impl JoinGraphDirective {
    pub const NAME: &'static str = "join__graph";
}

impl FederationDirective for JoinGraphDirective {
    fn directive_name() -> &'static str {
        Self::NAME
    }

    fn parse(directive: &Directive<'_, String>) -> Result<Self, DirectiveError> {
        let mut result = Self::default();

        for (arg_name, arg_value) in &directive.arguments {
            if arg_name.eq("name") {
                result.name = string_arg(Self::NAME, "name", arg_value)?;
            } else if arg_name.eq("url") {
                result.url = string_arg(Self::NAME, "url", arg_value)?;
            }
        }

        if result.name.is_empty() {
            return Err(DirectiveError::MissingArgument {
                directive: Self::NAME,
                argument: "name",
            });
        }

        Ok(result)
    }
}
