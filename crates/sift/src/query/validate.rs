use crate::{
    query::{
        ast::{CompareNode, GroupNode, QueryNode},
        op::{Arity, OperatorRegistry},
    },
    schema::TableSchema,
    value::ValueKind,
};
use thiserror::Error as ThisError;

///
/// Query Validation
///
/// Two passes over the same tree. `Structural` runs before
/// normalization and checks everything that does not depend on
/// argument kinds: field existence, operator resolution, argument
/// counts, group shape. `Typed` runs after native normalization and
/// checks that every argument landed on a kind the schema declares
/// anywhere; textual operators skip conversion, so their arguments
/// must still be raw text.
///
/// Arity is checked before any argument is indexed, so an
/// under-supplied node reports a count problem instead of an
/// out-of-bounds access.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidatePhase {
    Structural,
    Typed,
}

///
/// ValidateError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValidateError {
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    #[error("unknown operator '{name}'")]
    UnknownOperator { name: String },

    #[error("operator '{op}' expects {expected} argument(s), found {found}")]
    ArityMismatch {
        op: String,
        expected: Arity,
        found: usize,
    },

    #[error("operator '{op}' carries {found} value(s), expected 1 or 2")]
    ValueCount { op: String, found: usize },

    #[error("group node declares neither an all-list nor an any-list")]
    EmptyGroup,

    #[error("argument of kind {found} for field '{field}' is outside the declared column types")]
    UndeclaredKind { field: String, found: ValueKind },

    #[error("operator '{op}' takes text arguments, found {found}")]
    NonTextArgument { op: String, found: ValueKind },
}

/// Walk the query and check every node against the schema and the
/// operator registry for the given phase.
pub(crate) fn validate(
    query: &QueryNode,
    schema: &TableSchema,
    registry: &OperatorRegistry,
    phase: ValidatePhase,
) -> Result<(), ValidateError> {
    match query {
        QueryNode::Group(group) => validate_group(group, schema, registry, phase),
        QueryNode::Compare(cmp) => validate_compare(cmp, schema, registry, phase),
    }
}

fn validate_group(
    group: &GroupNode,
    schema: &TableSchema,
    registry: &OperatorRegistry,
    phase: ValidatePhase,
) -> Result<(), ValidateError> {
    if group.all.is_none() && group.any.is_none() {
        return Err(ValidateError::EmptyGroup);
    }

    for branch in [&group.all, &group.any] {
        if let Some(children) = branch {
            for child in children {
                validate(child, schema, registry, phase)?;
            }
        }
    }

    Ok(())
}

fn validate_compare(
    cmp: &CompareNode,
    schema: &TableSchema,
    registry: &OperatorRegistry,
    phase: ValidatePhase,
) -> Result<(), ValidateError> {
    schema
        .column(&cmp.field)
        .map_err(|_| ValidateError::UnknownField {
            field: cmp.field.clone(),
        })?;

    let op = registry
        .resolve(&cmp.op)
        .ok_or_else(|| ValidateError::UnknownOperator {
            name: cmp.op.clone(),
        })?;

    // Wire shape first, then the operator's own arity.
    let found = cmp.args.len();
    if !(1..=2).contains(&found) {
        return Err(ValidateError::ValueCount {
            op: cmp.op.clone(),
            found,
        });
    }
    if !op.arity().accepts(found) {
        return Err(ValidateError::ArityMismatch {
            op: cmp.op.clone(),
            expected: op.arity(),
            found,
        });
    }

    if phase == ValidatePhase::Typed {
        for arg in &cmp.args {
            if op.is_textual() {
                if arg.kind() != ValueKind::Text {
                    return Err(ValidateError::NonTextArgument {
                        op: cmp.op.clone(),
                        found: arg.kind(),
                    });
                }
            } else if !schema.declares_kind(arg.kind()) {
                return Err(ValidateError::UndeclaredKind {
                    field: cmp.field.clone(),
                    found: arg.kind(),
                });
            }
        }
    }

    Ok(())
}

///
/// TESTS
///
