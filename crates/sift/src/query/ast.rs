use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Query AST
///
/// Pure representation of the nested boolean query shape. This layer
/// carries no schema knowledge and no execution semantics; all
/// interpretation happens in later passes:
///
/// - validation (schema- and registry-aware)
/// - normalization (argument conversion)
/// - evaluation
///
/// A node's shape is identified by key presence on the wire: group
/// nodes carry `AND`/`OR` lists, comparison nodes carry
/// `field`/`operator`/`value`. Any other key fails deserialization; a
/// bare `{}` parses as a branch-less group, which validation rejects.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryNode {
    Group(GroupNode),
    Compare(CompareNode),
}

///
/// GroupNode
///
/// Both branch lists may be present on one node; evaluation combines
/// them as `all-branch OR any-branch`. An absent list contributes
/// nothing. An empty `all` list is vacuously true and an empty `any`
/// list vacuously false.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GroupNode {
    #[serde(rename = "AND", skip_serializing_if = "Option::is_none")]
    pub all: Option<Vec<QueryNode>>,

    #[serde(rename = "OR", skip_serializing_if = "Option::is_none")]
    pub any: Option<Vec<QueryNode>>,
}

///
/// CompareNode
///
/// Leaf comparison: a field name, a registry operator name, and one or
/// two raw arguments. Arguments arrive as text and are rewritten in
/// place by normalization; the operator stays a name so resolution
/// failures surface as inspectable errors rather than parse failures.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompareNode {
    pub field: String,

    #[serde(rename = "operator")]
    pub op: String,

    #[serde(rename = "value")]
    pub args: Vec<Value>,
}

impl QueryNode {
    #[must_use]
    pub const fn and(children: Vec<Self>) -> Self {
        Self::Group(GroupNode {
            all: Some(children),
            any: None,
        })
    }

    #[must_use]
    pub const fn or(children: Vec<Self>) -> Self {
        Self::Group(GroupNode {
            all: None,
            any: Some(children),
        })
    }

    #[must_use]
    pub const fn and_or(all: Vec<Self>, any: Vec<Self>) -> Self {
        Self::Group(GroupNode {
            all: Some(all),
            any: Some(any),
        })
    }

    #[must_use]
    pub fn compare(field: impl Into<String>, op: impl Into<String>, args: Vec<Value>) -> Self {
        Self::Compare(CompareNode {
            field: field.into(),
            op: op.into(),
            args,
        })
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group(group) => group.fmt(f),
            Self::Compare(cmp) => cmp.fmt(f),
        }
    }
}

impl fmt::Display for GroupNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.all, &self.any) {
            (Some(all), Some(any)) => {
                write_branch(f, all, " and ")?;
                f.write_str(" or ")?;
                write_branch(f, any, " or ")
            }
            (Some(all), None) => write_branch(f, all, " and "),
            (None, Some(any)) => write_branch(f, any, " or "),
            (None, None) => f.write_str("()"),
        }
    }
}

fn write_branch(f: &mut fmt::Formatter<'_>, children: &[QueryNode], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (idx, child) in children.iter().enumerate() {
        if idx > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{child}")?;
    }

    f.write_str(")")
}

impl fmt::Display for CompareNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}", self.op, self.field)?;
        for arg in &self.args {
            write!(f, ", {arg}")?;
        }

        f.write_str(")")
    }
}

///
/// TESTS
///
