pub mod directives;

pub(crate) mod directive_trait;
pub(crate) mod join_enum_value;
pub(crate) mod join_field;
pub(crate) mod join_graph;
pub(crate) mod join_implements;
pub(crate) mod join_type;
pub(crate) mod join_union_member;
