use graphql_parser::schema::{Directive, Value};

/// Arguments of the join spec directives are strictly kinded: `graph` is an
/// enum value, selections are strings, flags are booleans. Anything else in a
/// composed supergraph is a composition bug and aborts the parse.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DirectiveError {
    #[error("directive '@{directive}' is missing its required argument '{argument}'")]
    MissingArgument {
        directive: &'static str,
        argument: &'static str,
    },
    #[error("argument '{argument}' of directive '@{directive}' must be of kind {expected}")]
    InvalidArgument {
        directive: &'static str,
        argument: &'static str,
        expected: &'static str,
    },
}

pub trait FederationDirective {
    fn directive_name() -> &'static str;

    fn is(directive: &Directive<'_, String>) -> bool {
        Self::directive_name() == directive.name
    }

    fn parse(directive: &Directive<'_, String>) -> Result<Self, DirectiveError>
    where
        Self: Sized;

    fn extract_all(directives: &[Directive<'_, String>]) -> Result<Vec<Self>, DirectiveError>
    where
        Self: Sized,
    {
        directives
            .iter()
            .filter(|directive| Self::is(directive))
            .map(Self::parse)
            .collect()
    }
}

pub(crate) fn graph_arg(
    directive: &'static str,
    arg_value: &Value<'_, String>,
) -> Result<String, DirectiveError> {
    match arg_value {
        // `graph` is declared as an enum value of join__Graph, but some
        // composers emit it as a string
        Value::Enum(value) => Ok(value.clone()),
        Value::String(value) => Ok(value.clone()),
        _ => Err(DirectiveError::InvalidArgument {
            directive,
            argument: "graph",
            expected: "enum",
        }),
    }
}

pub(crate) fn string_arg(
    directive: &'static str,
    argument: &'static str,
    arg_value: &Value<'_, String>,
) -> Result<String, DirectiveError> {
    match arg_value {
        Value::String(value) => Ok(value.clone()),
        _ => Err(DirectiveError::InvalidArgument {
            directive,
            argument,
            expected: "string",
        }),
    }
}

pub(crate) fn bool_arg(
    directive: &'static str,
    argument: &'static str,
    arg_value: &Value<'_, String>,
) -> Result<bool, DirectiveError> {
    match arg_value {
        Value::Boolean(value) => Ok(*value),
        _ => Err(DirectiveError::InvalidArgument {
            directive,
            argument,
            expected: "boolean",
        }),
    }
}
