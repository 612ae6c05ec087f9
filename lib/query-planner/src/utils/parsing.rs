use graphql_parser::query::ParseError as OperationParseError;
use graphql_parser::schema::ParseError as SchemaParseError;

#[inline]
pub fn parse_schema(
    sdl: &str,
) -> Result<graphql_parser::schema::Document<'static, String>, SchemaParseError> {
    graphql_parser::parse_schema(sdl).map(|doc| doc.into_static())
}

#[inline]
pub fn parse_operation(
    operation: &str,
) -> Result<graphql_parser::query::Document<'static, String>, OperationParseError> {
    graphql_parser::parse_query(operation).map(|doc| doc.into_static())
}
