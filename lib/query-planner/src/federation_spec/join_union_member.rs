use graphql_parser::schema::Directive;

use super::directive_trait::{graph_arg, string_arg, DirectiveError, FederationDirective};

#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct JoinUnionMemberDirective {
    pub graph_id: String,
    pub member: String,
}

impl JoinUnionMemberDirective {
    pub const NAME: &'static str = "join__unionMember";
}

impl FederationDirective for JoinUnionMemberDirective {
    fn directive_name() -> &'static str {
        Self::NAME
    }

    fn parse(directive: &Directive<'_, String>) -> Result<Self, DirectiveError> {
        let mut result = Self::default();

        for (arg_name, arg_value) in &directive.arguments {
            if arg_name.eq("graph") {
                result.graph_id = graph_arg(Self::NAME, arg_value)?;
            } else if arg_name.eq("member") {
                result.member = string_arg(Self::NAME, "member", arg_value)?;
            }
        }

        if result.graph_id.is_empty() {
            return Err(DirectiveError::MissingArgument {
                directive: Self::NAME,
                argument: "graph",
            });
        }

        Ok(result)
    }
}
