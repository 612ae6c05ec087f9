use graphql_parser::schema::Directive;

use super::directive_trait::{bool_arg, graph_arg, string_arg, DirectiveError, FederationDirective};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinFieldDirective {
    pub graph_id: Option<String>,
    pub requires: Option<String>,
    pub provides: Option<String>,
    pub type_in_graph: Option<String>,
    pub external: bool,
    pub override_value: Option<String>,
    pub used_overridden: bool,
}

// The defaults are spelled out on purpose, a `false` here is load-bearing.
#[allow(clippy::derivable_impls)]
impl Default for JoinFieldDirective {
    fn default() -> Self {
        Self {
            graph_id: None,
            requires: None,
            provides: None,
            type_in_graph: None,
            external: false,
            override_value: None,
            used_overridden: false,
        }
    }
}

impl JoinFieldDirective {
    pub const NAME: &'static str = "join__field";
}

impl FederationDirective for JoinFieldDirective {
    fn directive_name() -> &'static str {
        Self::NAME
    }

    fn parse(directive: &Directive<'_, String>) -> Result<Self, DirectiveError> {
        let mut result = Self::default();

        for (arg_name, arg_value) in &directive.arguments {
            if arg_name.eq("graph") {
                result.graph_id = Some(graph_arg(Self::NAME, arg_value)?);
            } else if arg_name.eq("requires") {
                result.requires = Some(string_arg(Self::NAME, "requires", arg_value)?);
            } else if arg_name.eq("provides") {
                result.provides = Some(string_arg(Self::NAME, "provides", arg_value)?);
            } else if arg_name.eq("type") {
                result.type_in_graph = Some(string_arg(Self::NAME, "type", arg_value)?);
            } else if arg_name.eq("external") {
                result.external = bool_arg(Self::NAME, "external", arg_value)?;
            } else if arg_name.eq("override") {
                result.override_value = Some(string_arg(Self::NAME, "override", arg_value)?);
            } else if arg_name.eq("usedOverridden") {
                result.used_overridden = bool_arg(Self::NAME, "usedOverridden", arg_value)?;
            }
        }

        Ok(result)
    }
}

impl Ord for JoinFieldDirective {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.graph_id.cmp(&other.graph_id)
    }
}

impl PartialOrd for JoinFieldDirective {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
