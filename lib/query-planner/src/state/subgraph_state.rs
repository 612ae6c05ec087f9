use std::collections::{BTreeMap, BTreeSet};

use graphql_parser::schema as input;
use tracing::instrument;

use crate::federation_spec::directives::{
    FederationDirective, JoinEnumValueDirective, JoinFieldDirective, JoinImplementsDirective,
    JoinTypeDirective, JoinUnionMemberDirective,
};

use super::supergraph_state::{SchemaDocument, SupergraphStateError, TypeKind};

/// Identifier of a subgraph as it appears in the join__Graph enum (e.g. `ACCOUNTS`)
pub type SubgraphId = String;

pub fn inner_type_name<'a>(ty: &'a input::Type<'static, String>) -> &'a str {
    match ty {
        input::Type::NamedType(name) => name,
        input::Type::ListType(inner) => inner_type_name(inner),
        input::Type::NonNullType(inner) => inner_type_name(inner),
    }
}

/// A list wrapper counts at any nullability depth: `[User]`, `[User!]!` and
/// `[User]!` are all list-like.
pub fn is_list_like_type(ty: &input::Type<'static, String>) -> bool {
    match ty {
        input::Type::NamedType(_) => false,
        input::Type::ListType(_) => true,
        input::Type::NonNullType(inner) => is_list_like_type(inner),
    }
}

fn type_definition_name<'a>(def: &'a input::Definition<'static, String>) -> Option<&'a str> {
    match def {
        input::Definition::TypeDefinition(input::TypeDefinition::Object(t)) => Some(&t.name),
        input::Definition::TypeDefinition(input::TypeDefinition::Interface(t)) => Some(&t.name),
        input::Definition::TypeDefinition(input::TypeDefinition::Enum(t)) => Some(&t.name),
        input::Definition::TypeDefinition(input::TypeDefinition::Union(t)) => Some(&t.name),
        input::Definition::TypeDefinition(input::TypeDefinition::Scalar(t)) => Some(&t.name),
        input::Definition::TypeDefinition(input::TypeDefinition::InputObject(t)) => Some(&t.name),
        _ => None,
    }
}

#[derive(Debug)]
pub struct SubgraphState {
    pub graph_id: SubgraphId,
    pub name: String,
    /// Types hosted by this subgraph, ordered by name
    pub types: BTreeMap<String, SubgraphTypeState>,
    /// Types with at least one resolvable key in this subgraph
    pub entity_type_names: BTreeSet<String>,
}

#[derive(Debug)]
pub struct SubgraphTypeState {
    pub name: String,
    pub kind: TypeKind,
    pub fields: Vec<SubgraphFieldState>,
    /// The `@join__type` entries of this subgraph only
    pub join_types: Vec<JoinTypeDirective>,
    /// Interfaces implemented in this subgraph. Parsed and validated, not
    /// consumed by the planner yet.
    pub join_implements: Vec<JoinImplementsDirective>,
    /// Union members contributed by this subgraph. Parsed and validated, not
    /// consumed by the planner yet.
    pub join_union_members: Vec<JoinUnionMemberDirective>,
    /// Enum values visible in this subgraph
    pub enum_values: Vec<String>,
}

#[derive(Debug)]
pub struct SubgraphFieldState {
    pub name: String,
    pub return_type_name: String,
    pub is_list: bool,
    pub external: bool,
    pub join_field: Option<JoinFieldDirective>,
}

impl SubgraphTypeState {
    pub fn field(&self, name: &str) -> Option<&SubgraphFieldState> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn is_entity(&self) -> bool {
        self.join_types
            .iter()
            .any(|join_type| join_type.resolvable && join_type.key.is_some())
    }
}

impl SubgraphState {
    #[instrument(level = "trace", skip(schema))]
    pub fn decompose_from_supergraph(
        graph_id: &SubgraphId,
        name: &str,
        schema: &SchemaDocument,
    ) -> Result<Self, SupergraphStateError> {
        let mut instance = Self {
            graph_id: graph_id.clone(),
            name: name.to_string(),
            types: BTreeMap::new(),
            entity_type_names: BTreeSet::new(),
        };

        for def in schema.definitions.iter() {
            // The join and link spec machinery is not addressable by operations
            if let Some(type_name) = type_definition_name(def) {
                if type_name.starts_with("join__") || type_name.starts_with("link__") {
                    continue;
                }
            }

            let type_state = match def {
                input::Definition::TypeDefinition(input::TypeDefinition::Object(object_type)) => {
                    Self::process_fielded_type(
                        graph_id,
                        TypeKind::Object,
                        &object_type.name,
                        &object_type.directives,
                        &object_type.fields,
                    )?
                }
                input::Definition::TypeDefinition(input::TypeDefinition::Interface(
                    interface_type,
                )) => Self::process_fielded_type(
                    graph_id,
                    TypeKind::Interface,
                    &interface_type.name,
                    &interface_type.directives,
                    &interface_type.fields,
                )?,
                input::Definition::TypeDefinition(input::TypeDefinition::Enum(enum_type)) => {
                    Self::process_enum_type(graph_id, enum_type)?
                }
                input::Definition::TypeDefinition(input::TypeDefinition::Scalar(scalar_type)) => {
                    Self::process_leaf_type(
                        graph_id,
                        TypeKind::Scalar,
                        &scalar_type.name,
                        &scalar_type.directives,
                    )?
                }
                input::Definition::TypeDefinition(input::TypeDefinition::Union(union_type)) => {
                    Self::process_union_type(graph_id, union_type)?
                }
                _ => None,
            };

            if let Some(type_state) = type_state {
                if type_state.is_entity() {
                    instance.entity_type_names.insert(type_state.name.clone());
                }

                instance.types.insert(type_state.name.clone(), type_state);
            }
        }

        Ok(instance)
    }

    fn process_fielded_type(
        graph_id: &str,
        kind: TypeKind,
        type_name: &str,
        directives: &[input::Directive<'static, String>],
        fields: &[input::Field<'static, String>],
    ) -> Result<Option<SubgraphTypeState>, SupergraphStateError> {
        let Some(join_types) = Self::join_types_for(graph_id, directives)? else {
            return Ok(None);
        };

        let join_implements: Vec<JoinImplementsDirective> =
            JoinImplementsDirective::extract_all(directives)?
                .into_iter()
                .filter(|join_implements| join_implements.graph_id == graph_id)
                .collect();

        let mut relevant_fields: Vec<SubgraphFieldState> = Vec::new();

        for field in fields {
            let join_fields = JoinFieldDirective::extract_all(&field.directives)?;
            let relevant_join_field = join_fields
                .iter()
                .find(|join_field| join_field.graph_id.as_deref() == Some(graph_id));

            // A field without any join__field is available wherever the type is
            if !join_fields.is_empty() && relevant_join_field.is_none() {
                continue;
            }

            relevant_fields.push(SubgraphFieldState {
                name: field.name.to_string(),
                return_type_name: inner_type_name(&field.field_type).to_string(),
                is_list: is_list_like_type(&field.field_type),
                external: relevant_join_field.map(|jf| jf.external).unwrap_or(false),
                join_field: relevant_join_field.cloned(),
            });
        }

        if relevant_fields.is_empty() {
            return Ok(None);
        }

        Ok(Some(SubgraphTypeState {
            name: type_name.to_string(),
            kind,
            fields: relevant_fields,
            join_types,
            join_implements,
            join_union_members: Vec::new(),
            enum_values: Vec::new(),
        }))
    }

    fn process_enum_type(
        graph_id: &str,
        enum_type: &input::EnumType<'static, String>,
    ) -> Result<Option<SubgraphTypeState>, SupergraphStateError> {
        let Some(join_types) = Self::join_types_for(graph_id, &enum_type.directives)? else {
            return Ok(None);
        };

        let mut enum_values: Vec<String> = Vec::new();

        for value in enum_type.values.iter() {
            let join_enum_values = JoinEnumValueDirective::extract_all(&value.directives)?;

            // A value without any join__enumValue is visible everywhere
            let visible = join_enum_values.is_empty()
                || join_enum_values
                    .iter()
                    .any(|join_enum_value| join_enum_value.graph_id == graph_id);

            if visible {
                enum_values.push(value.name.to_string());
            }
        }

        Ok(Some(SubgraphTypeState {
            name: enum_type.name.to_string(),
            kind: TypeKind::Enum,
            fields: Vec::new(),
            join_types,
            join_implements: Vec::new(),
            join_union_members: Vec::new(),
            enum_values,
        }))
    }

    fn process_union_type(
        graph_id: &str,
        union_type: &input::UnionType<'static, String>,
    ) -> Result<Option<SubgraphTypeState>, SupergraphStateError> {
        let Some(join_types) = Self::join_types_for(graph_id, &union_type.directives)? else {
            return Ok(None);
        };

        let join_union_members: Vec<JoinUnionMemberDirective> =
            JoinUnionMemberDirective::extract_all(&union_type.directives)?
                .into_iter()
                .filter(|join_union_member| join_union_member.graph_id == graph_id)
                .collect();

        Ok(Some(SubgraphTypeState {
            name: union_type.name.to_string(),
            kind: TypeKind::Union,
            fields: Vec::new(),
            join_types,
            join_implements: Vec::new(),
            join_union_members,
            enum_values: Vec::new(),
        }))
    }

    fn process_leaf_type(
        graph_id: &str,
        kind: TypeKind,
        type_name: &str,
        directives: &[input::Directive<'static, String>],
    ) -> Result<Option<SubgraphTypeState>, SupergraphStateError> {
        let Some(join_types) = Self::join_types_for(graph_id, directives)? else {
            return Ok(None);
        };

        Ok(Some(SubgraphTypeState {
            name: type_name.to_string(),
            kind,
            fields: Vec::new(),
            join_types,
            join_implements: Vec::new(),
            join_union_members: Vec::new(),
            enum_values: Vec::new(),
        }))
    }

    /// `None` means the type does not belong to this subgraph. A type without
    /// any `@join__type` belongs to every subgraph.
    fn join_types_for(
        graph_id: &str,
        directives: &[input::Directive<'static, String>],
    ) -> Result<Option<Vec<JoinTypeDirective>>, SupergraphStateError> {
        let all_join_types = JoinTypeDirective::extract_all(directives)?;
        let join_types: Vec<JoinTypeDirective> = all_join_types
            .iter()
            .filter(|join_type| join_type.graph_id == graph_id)
            .cloned()
            .collect();

        if !all_join_types.is_empty() && join_types.is_empty() {
            return Ok(None);
        }

        Ok(Some(join_types))
    }
}
