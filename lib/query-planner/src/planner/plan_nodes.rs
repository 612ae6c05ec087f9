use std::fmt::{Display, Formatter as FmtFormatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::state::supergraph_state::OperationKind;
use crate::utils::pretty_display::{get_indent, PrettyDisplay};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QueryPlan {
    pub kind: String, // "QueryPlan"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<PlanNode>,
}

impl QueryPlan {
    pub fn new(node: Option<PlanNode>) -> Self {
        Self {
            kind: "QueryPlan".to_string(),
            node,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "kind")]
pub enum PlanNode {
    Fetch(FetchNode),
    Sequence(SequenceNode),
    Parallel(ParallelNode),
    Flatten(FlattenNode),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FetchNode {
    pub service_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub variable_usages: Vec<String>,
    pub operation_kind: OperationKind,
    /// A standalone GraphQL document in the target subgraph's dialect
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires: Option<RequiresNode>,
    /// Structured form of the operation's selection set, used for the
    /// pretty-printer; the wire shape only carries the serialized string
    #[serde(skip)]
    pub selection: PlanSelectionSet,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RequiresNode {
    pub kind: String, // "fragment"
    pub type_name: String,
    pub selection_set: PlanSelectionSet,
}

impl RequiresNode {
    pub fn new(type_name: String, selection_set: PlanSelectionSet) -> Self {
        Self {
            kind: "fragment".to_string(),
            type_name,
            selection_set,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SequenceNode {
    pub nodes: Vec<PlanNode>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ParallelNode {
    pub nodes: Vec<PlanNode>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FlattenNode {
    pub path: FlattenNodePath,
    pub node: Box<PlanNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlattenPathSegment {
    Field(String),
    /// Apply the nested fetch to every element at this position
    List,
}

impl Display for FlattenPathSegment {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        match self {
            FlattenPathSegment::Field(field_name) => write!(f, "{}", field_name),
            FlattenPathSegment::List => write!(f, "@"),
        }
    }
}

impl Serialize for FlattenPathSegment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FlattenPathSegment::Field(field_name) => serializer.serialize_str(field_name),
            FlattenPathSegment::List => serializer.serialize_str("@"),
        }
    }
}

impl<'de> Deserialize<'de> for FlattenPathSegment {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        Ok(match raw.as_str() {
            "@" => FlattenPathSegment::List,
            _ => FlattenPathSegment::Field(raw),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct FlattenNodePath(pub Vec<FlattenPathSegment>);

impl Display for FlattenNodePath {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        let rendered = self
            .0
            .iter()
            .map(|segment| segment.to_string())
            .collect::<Vec<_>>()
            .join(".");

        write!(f, "{}", rendered)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct PlanSelectionSet(pub Vec<PlanSelectionItem>);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind")]
pub enum PlanSelectionItem {
    Field {
        name: String,
        #[serde(skip_serializing_if = "PlanSelectionSet::is_empty", default)]
        selections: PlanSelectionSet,
    },
    InlineFragment {
        #[serde(rename = "typeCondition")]
        type_condition: String,
        selections: PlanSelectionSet,
    },
}

impl PlanSelectionSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_compact_string(&self) -> String {
        let mut out = String::new();
        self.write_compact(&mut out);
        out
    }

    fn write_compact(&self, out: &mut String) {
        out.push('{');

        for (position, item) in self.0.iter().enumerate() {
            if position > 0 {
                out.push(' ');
            }

            item.write_compact(out);
        }

        out.push('}');
    }
}

impl PlanSelectionItem {
    fn write_compact(&self, out: &mut String) {
        match self {
            PlanSelectionItem::Field { name, selections } => {
                out.push_str(name);
                if !selections.is_empty() {
                    selections.write_compact(out);
                }
            }
            PlanSelectionItem::InlineFragment {
                type_condition,
                selections,
            } => {
                out.push_str("...on ");
                out.push_str(type_condition);
                selections.write_compact(out);
            }
        }
    }
}

impl PrettyDisplay for PlanSelectionSet {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);

        for item in self.0.iter() {
            match item {
                PlanSelectionItem::Field { name, selections } => {
                    if selections.is_empty() {
                        writeln!(f, "{indent}{name}")?;
                    } else {
                        writeln!(f, "{indent}{name} {{")?;
                        selections.pretty_fmt(f, depth + 1)?;
                        writeln!(f, "{indent}}}")?;
                    }
                }
                PlanSelectionItem::InlineFragment {
                    type_condition,
                    selections,
                } => {
                    writeln!(f, "{indent}... on {type_condition} {{")?;
                    selections.pretty_fmt(f, depth + 1)?;
                    writeln!(f, "{indent}}}")?;
                }
            }
        }

        Ok(())
    }
}

impl PrettyDisplay for RequiresNode {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);

        writeln!(f, "{indent}... on {} {{", self.type_name)?;
        self.selection_set.pretty_fmt(f, depth + 1)?;
        writeln!(f, "{indent}}}")?;

        Ok(())
    }
}

impl PrettyDisplay for FetchNode {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);

        writeln!(f, "{indent}Fetch(service: \"{}\") {{", self.service_name)?;

        if let Some(requires) = &self.requires {
            writeln!(f, "{indent}  {{")?;
            requires.pretty_fmt(f, depth + 2)?;
            writeln!(f, "{indent}  }} =>")?;
        }

        writeln!(f, "{indent}  {{")?;
        self.selection.pretty_fmt(f, depth + 2)?;
        writeln!(f, "{indent}  }}")?;

        writeln!(f, "{indent}}},")?;

        Ok(())
    }
}

impl PrettyDisplay for FlattenNode {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);

        writeln!(f, "{indent}Flatten(path: \"{}\") {{", self.path)?;
        self.node.pretty_fmt(f, depth + 1)?;
        writeln!(f, "{indent}}},")?;

        Ok(())
    }
}

impl PrettyDisplay for SequenceNode {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);

        writeln!(f, "{indent}Sequence {{")?;
        for node in &self.nodes {
            node.pretty_fmt(f, depth + 1)?;
        }
        writeln!(f, "{indent}}},")?;

        Ok(())
    }
}

impl PrettyDisplay for ParallelNode {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);

        writeln!(f, "{indent}Parallel {{")?;
        for node in &self.nodes {
            node.pretty_fmt(f, depth + 1)?;
        }
        writeln!(f, "{indent}}},")?;

        Ok(())
    }
}

impl PrettyDisplay for PlanNode {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        match self {
            PlanNode::Fetch(node) => node.pretty_fmt(f, depth),
            PlanNode::Flatten(node) => node.pretty_fmt(f, depth),
            PlanNode::Sequence(node) => node.pretty_fmt(f, depth),
            PlanNode::Parallel(node) => node.pretty_fmt(f, depth),
        }
    }
}

impl PrettyDisplay for QueryPlan {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);

        writeln!(f, "{indent}QueryPlan {{")?;
        if let Some(node) = &self.node {
            node.pretty_fmt(f, depth + 1)?;
        } else {
            writeln!(f, "{indent}  None,")?;
        }
        writeln!(f, "{indent}}}")?;

        Ok(())
    }
}

impl Display for QueryPlan {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        self.pretty_fmt(f, 0)
    }
}

impl Display for PlanNode {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        self.pretty_fmt(f, 0)
    }
}
