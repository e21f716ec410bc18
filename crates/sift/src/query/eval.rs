use crate::{
    query::{
        ast::{CompareNode, GroupNode, QueryNode},
        lexical,
        normalize::NormalizeMode,
        op::{CompareOp, OperatorRegistry},
    },
    record::{FieldPresence, Row},
    value::{Value, compare_eq, strict_ordering},
};
use std::cmp::Ordering;

///
/// Query Evaluation
///
/// Pure per-record walk of a validated, normalized query. No schema
/// access, no mutation, no state across records. Any comparison that
/// does not resolve cleanly is a non-match, never a panic.
///
/// CONTRACT: internal-only; queries are validated before evaluation.
///

#[must_use]
pub(crate) fn eval<R: Row + ?Sized>(
    row: &R,
    node: &QueryNode,
    registry: &OperatorRegistry,
    mode: NormalizeMode,
) -> bool {
    match node {
        QueryNode::Group(group) => eval_group(row, group, registry, mode),
        QueryNode::Compare(cmp) => eval_compare(row, cmp, registry, mode),
    }
}

fn eval_group<R: Row + ?Sized>(
    row: &R,
    group: &GroupNode,
    registry: &OperatorRegistry,
    mode: NormalizeMode,
) -> bool {
    let all_branch =
        |children: &[QueryNode]| children.iter().all(|child| eval(row, child, registry, mode));
    let any_branch =
        |children: &[QueryNode]| children.iter().any(|child| eval(row, child, registry, mode));

    match (&group.all, &group.any) {
        // A shapeless group never matches; validation rejects it up front.
        (None, None) => false,

        // Empty lists follow the vacuous conventions: all([]) is true,
        // any([]) is false.
        (Some(all), None) => all_branch(all),
        (None, Some(any)) => any_branch(any),

        // Both lists on one node combine as all-branch OR any-branch.
        (Some(all), Some(any)) => all_branch(all) || any_branch(any),
    }
}

fn eval_compare<R: Row + ?Sized>(
    row: &R,
    cmp: &CompareNode,
    registry: &OperatorRegistry,
    mode: NormalizeMode,
) -> bool {
    let Some(op) = registry.resolve(&cmp.op) else {
        return false;
    };
    if !op.arity().accepts(cmp.args.len()) {
        return false;
    }

    let FieldPresence::Present(target) = row.field(&cmp.field) else {
        return false;
    };

    // Null never satisfies a comparison, whatever the operator.
    if target.is_null() {
        return false;
    }

    match mode {
        NormalizeMode::Native => compare_native(target, op, &cmp.args),
        NormalizeMode::Padded => compare_padded(target, op, &cmp.args),
    }
}

fn compare_native(target: &Value, op: CompareOp, args: &[Value]) -> bool {
    // NOTE: comparison helpers return None when kinds disagree; eval
    // treats that as a non-match.
    match op {
        CompareOp::Eq => compare_eq(target, &args[0]).unwrap_or(false),
        CompareOp::Ne => compare_eq(target, &args[0]).is_some_and(|v| !v),

        CompareOp::Lt => strict_ordering(target, &args[0]).is_some_and(Ordering::is_lt),
        CompareOp::Lte => strict_ordering(target, &args[0]).is_some_and(Ordering::is_le),
        CompareOp::Gt => strict_ordering(target, &args[0]).is_some_and(Ordering::is_gt),
        CompareOp::Gte => strict_ordering(target, &args[0]).is_some_and(Ordering::is_ge),

        // Inclusive on both ends; inverted bounds can never match.
        CompareOp::Between => {
            strict_ordering(target, &args[0]).is_some_and(Ordering::is_ge)
                && strict_ordering(target, &args[1]).is_some_and(Ordering::is_le)
        }

        CompareOp::In => in_args(target, args).unwrap_or(false),
        CompareOp::NotIn => in_args(target, args).is_some_and(|matched| !matched),

        CompareOp::Contains
        | CompareOp::NotContains
        | CompareOp::StartsWith
        | CompareOp::EndsWith => compare_text(target, op, args),
    }
}

fn compare_padded(target: &Value, op: CompareOp, args: &[Value]) -> bool {
    if op.is_textual() {
        return compare_text(target, op, args);
    }

    let rendered = target.to_string();
    let arg_texts: Vec<String> = args.iter().map(ToString::to_string).collect();
    let arg_refs: Vec<&str> = arg_texts.iter().map(String::as_str).collect();

    // Mutual alignment across the target and every argument at once.
    let (target, args) = lexical::align(&rendered, &arg_refs);

    match op {
        CompareOp::Eq => target == args[0],
        CompareOp::Ne => target != args[0],

        CompareOp::Lt => target < args[0],
        CompareOp::Lte => target <= args[0],
        CompareOp::Gt => target > args[0],
        CompareOp::Gte => target >= args[0],

        CompareOp::Between => target >= args[0] && target <= args[1],

        CompareOp::In => args.contains(&target),
        CompareOp::NotIn => !args.contains(&target),

        _ => false,
    }
}

/// Textual comparison against the rendered form of the target, shared
/// by both normalization modes.
fn compare_text(target: &Value, op: CompareOp, args: &[Value]) -> bool {
    let Value::Text(needle) = &args[0] else {
        return false;
    };
    let rendered = target.to_string();

    match op {
        CompareOp::Contains => rendered.contains(needle.as_str()),
        CompareOp::NotContains => !rendered.contains(needle.as_str()),
        CompareOp::StartsWith => rendered.starts_with(needle.as_str()),
        CompareOp::EndsWith => rendered.ends_with(needle.as_str()),
        _ => false,
    }
}

/// Check whether the target equals any supplied argument.
fn in_args(target: &Value, args: &[Value]) -> Option<bool> {
    let mut saw_valid = false;
    for arg in args {
        match compare_eq(target, arg) {
            Some(true) => return Some(true),
            Some(false) => saw_valid = true,
            None => {}
        }
    }

    saw_valid.then_some(false)
}
