use crate::{
    query::{
        ast::{CompareNode, QueryNode},
        lexical,
        op::OperatorRegistry,
    },
    schema::{ColumnDef, ColumnType, TableSchema},
    types::DateFormat,
    value::Value,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error as ThisError;

///
/// Query Normalization
///
/// Rewrites a query's raw argument text in place so evaluation can
/// compare like with like. Two strategies share the entry point:
///
/// - `Native` parses each argument into the column's native kind,
///   consulting the column's custom converter first and the
///   type-driven default otherwise.
/// - `Padded` stays in string space: slash-delimited day/month/year
///   dates are reordered big-endian here, and digit runs are width-
///   aligned later at compare time, where the record's value is known.
///
/// Textual operators are exempt in both modes; they match against
/// rendered text and keep their raw arguments.
///
/// Runs once per execution. A second run is harmless: native arguments
/// pass through untouched and padded rewrites are fixpoints.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum NormalizeMode {
    #[default]
    Native,
    Padded,
}

///
/// NormalizeError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum NormalizeError {
    #[error("cannot convert '{value}' for field '{field}' of type {ty}")]
    BadValue {
        field: String,
        value: String,
        ty: ColumnType,
    },
}

/// Rewrite every comparison's arguments for the chosen strategy.
///
/// CONTRACT: the structural validation pass runs before this. A node
/// whose field or operator does not resolve is left untouched rather
/// than guessed at; the follow-up validation pass reports it.
pub(crate) fn normalize(
    query: &mut QueryNode,
    schema: &TableSchema,
    registry: &OperatorRegistry,
    mode: NormalizeMode,
) -> Result<(), NormalizeError> {
    match query {
        QueryNode::Group(group) => {
            for branch in [&mut group.all, &mut group.any] {
                if let Some(children) = branch {
                    for child in children {
                        normalize(child, schema, registry, mode)?;
                    }
                }
            }

            Ok(())
        }
        QueryNode::Compare(cmp) => normalize_compare(cmp, schema, registry, mode),
    }
}

fn normalize_compare(
    cmp: &mut CompareNode,
    schema: &TableSchema,
    registry: &OperatorRegistry,
    mode: NormalizeMode,
) -> Result<(), NormalizeError> {
    let Ok(column) = schema.column(&cmp.field) else {
        return Ok(());
    };
    let Some(op) = registry.resolve(&cmp.op) else {
        return Ok(());
    };

    if op.is_textual() {
        return Ok(());
    }

    match mode {
        NormalizeMode::Native => convert_native(cmp, column, schema.date_format()),
        NormalizeMode::Padded => {
            rewrite_padded(cmp);
            Ok(())
        }
    }
}

fn convert_native(
    cmp: &mut CompareNode,
    column: &ColumnDef,
    format: &DateFormat,
) -> Result<(), NormalizeError> {
    let mut converted = Vec::with_capacity(cmp.args.len());

    for arg in &cmp.args {
        let Value::Text(raw) = arg else {
            // Already native; the typed pass judges the kind.
            converted.push(arg.clone());
            continue;
        };

        let value = match column.converter() {
            Some(convert) => convert(raw),
            None => convert_default(raw, column.ty(), format),
        };

        let Some(value) = value else {
            return Err(NormalizeError::BadValue {
                field: cmp.field.clone(),
                value: raw.clone(),
                ty: column.ty(),
            });
        };

        converted.push(value);
    }

    // Commit only once every argument converted, so a failure leaves
    // the node exactly as it arrived.
    cmp.args = converted;
    Ok(())
}

fn convert_default(raw: &str, ty: ColumnType, format: &DateFormat) -> Option<Value> {
    let trimmed = raw.trim();

    match ty {
        ColumnType::Int => trimmed.parse::<i64>().ok().map(Value::Int),
        ColumnType::Decimal => parse_decimal(trimmed).map(Value::Decimal),
        ColumnType::Date => format.parse_date(trimmed).map(Value::Date),
        // Free-form string-to-bool coercion is not assumed safe; only
        // the literal forms pass, anything else needs a converter.
        ColumnType::Bool => match trimmed {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        ColumnType::Text => Some(Value::text(raw)),
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .ok()
        .or_else(|| Decimal::from_scientific(raw).ok())
}

fn rewrite_padded(cmp: &mut CompareNode) {
    for arg in &mut cmp.args {
        match arg {
            Value::Text(raw) => {
                if let Some(big_endian) = lexical::big_endian_slash_date(raw) {
                    *raw = big_endian;
                }
            }
            other => {
                // Padded comparison is uniformly string space, so a
                // hand-built native argument is rendered out.
                let rendered = other.to_string();
                *other = Value::text(rendered);
            }
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Date;

    fn schema() -> TableSchema {
        TableSchema::new()
            .with_column("name", ColumnDef::new(ColumnType::Text))
            .unwrap()
            .with_column("age", ColumnDef::new(ColumnType::Int))
            .unwrap()
            .with_column("height", ColumnDef::new(ColumnType::Decimal))
            .unwrap()
            .with_column("birth_day", ColumnDef::new(ColumnType::Date).nullable())
            .unwrap()
            .with_column("active", ColumnDef::new(ColumnType::Bool))
            .unwrap()
    }

    fn args(query: &QueryNode) -> &[Value] {
        let QueryNode::Compare(cmp) = query else {
            panic!("expected a comparison node");
        };
        &cmp.args
    }

    #[test]
    fn native_converts_each_argument_to_the_column_kind() {
        let schema = schema();
        let registry = OperatorRegistry::standard();

        let cases = [
            ("age", "gte", "25", Value::Int(25)),
            ("height", "eq", "1.75", Value::Decimal("1.75".parse().unwrap())),
            (
                "birth_day",
                "eq",
                "2021-02-14",
                Value::Date(Date::new_checked(2021, 2, 14).unwrap()),
            ),
            ("active", "eq", "true", Value::Bool(true)),
            ("name", "eq", "amy", Value::text("amy")),
        ];

        for (field, op, raw, expected) in cases {
            let mut query = QueryNode::compare(field, op, vec![Value::text(raw)]);
            normalize(&mut query, &schema, &registry, NormalizeMode::Native).unwrap();
            assert_eq!(args(&query), [expected], "{field} {op} {raw}");
        }
    }

    #[test]
    fn native_recurses_through_group_branches() {
        let schema = schema();
        let registry = OperatorRegistry::standard();

        let mut query = QueryNode::and_or(
            vec![QueryNode::compare("age", "gte", vec![Value::text("25")])],
            vec![QueryNode::compare("age", "lt", vec![Value::text("60")])],
        );
        normalize(&mut query, &schema, &registry, NormalizeMode::Native).unwrap();

        let QueryNode::Group(group) = &query else {
            panic!("expected a group node");
        };
        assert_eq!(args(&group.all.as_ref().unwrap()[0]), [Value::Int(25)]);
        assert_eq!(args(&group.any.as_ref().unwrap()[0]), [Value::Int(60)]);
    }

    #[test]
    fn conversion_failure_names_the_value_and_leaves_the_node_alone() {
        let schema = schema();
        let registry = OperatorRegistry::standard();

        let mut query =
            QueryNode::compare("age", "btw", vec![Value::text("20"), Value::text("x")]);
        let result = normalize(&mut query, &schema, &registry, NormalizeMode::Native);

        assert_eq!(
            result,
            Err(NormalizeError::BadValue {
                field: "age".to_string(),
                value: "x".to_string(),
                ty: ColumnType::Int,
            })
        );

        // No partial commit: the first argument was convertible but
        // must still be raw.
        assert_eq!(args(&query), [Value::text("20"), Value::text("x")]);
    }

    #[test]
    fn custom_converters_take_precedence_over_type_defaults() {
        let schema = TableSchema::new()
            .with_column(
                "posted",
                ColumnDef::new(ColumnType::Bool).with_converter(|raw| match raw {
                    "1" => Some(Value::Bool(true)),
                    "0" => Some(Value::Bool(false)),
                    _ => None,
                }),
            )
            .unwrap();
        let registry = OperatorRegistry::standard();

        let mut query = QueryNode::compare("posted", "eq", vec![Value::text("1")]);
        normalize(&mut query, &schema, &registry, NormalizeMode::Native).unwrap();
        assert_eq!(args(&query), [Value::Bool(true)]);

        let mut query = QueryNode::compare("posted", "eq", vec![Value::text("true")]);
        let result = normalize(&mut query, &schema, &registry, NormalizeMode::Native);
        assert_eq!(
            result,
            Err(NormalizeError::BadValue {
                field: "posted".to_string(),
                value: "true".to_string(),
                ty: ColumnType::Bool,
            })
        );
    }

    #[test]
    fn textual_operators_keep_raw_arguments() {
        let schema = schema();
        let registry = OperatorRegistry::standard();

        for op in ["ct", "nct", "sw", "ew"] {
            let mut query = QueryNode::compare("age", op, vec![Value::text("2")]);
            normalize(&mut query, &schema, &registry, NormalizeMode::Native).unwrap();
            assert_eq!(args(&query), [Value::text("2")], "{op}");
        }
    }

    #[test]
    fn scientific_notation_falls_back_on_decimal_columns() {
        let schema = schema();
        let registry = OperatorRegistry::standard();

        let mut query = QueryNode::compare("height", "gt", vec![Value::text("1.5e3")]);
        normalize(&mut query, &schema, &registry, NormalizeMode::Native).unwrap();

        assert_eq!(args(&query), [Value::Decimal(Decimal::from(1500))]);
    }

    #[test]
    fn unresolved_nodes_are_left_for_validation_to_report() {
        let schema = schema();
        let registry = OperatorRegistry::standard();

        let mut query = QueryNode::compare("ghost", "eq", vec![Value::text("1")]);
        normalize(&mut query, &schema, &registry, NormalizeMode::Native).unwrap();
        assert_eq!(args(&query), [Value::text("1")]);

        let mut query = QueryNode::compare("age", "near", vec![Value::text("1")]);
        normalize(&mut query, &schema, &registry, NormalizeMode::Native).unwrap();
        assert_eq!(args(&query), [Value::text("1")]);
    }

    #[test]
    fn native_rerun_is_a_no_op() {
        let schema = schema();
        let registry = OperatorRegistry::standard();

        let mut query = QueryNode::compare("age", "gte", vec![Value::text("25")]);
        normalize(&mut query, &schema, &registry, NormalizeMode::Native).unwrap();
        let once = query.clone();

        normalize(&mut query, &schema, &registry, NormalizeMode::Native).unwrap();
        assert_eq!(query, once);
    }

    #[test]
    fn padded_reorders_slash_dates_and_stays_in_string_space() {
        let schema = schema();
        let registry = OperatorRegistry::standard();

        let mut query = QueryNode::compare("birth_day", "gte", vec![Value::text("14/02/2021")]);
        normalize(&mut query, &schema, &registry, NormalizeMode::Padded).unwrap();
        assert_eq!(args(&query), [Value::text("2021-02-14")]);

        let mut query = QueryNode::compare("age", "gte", vec![Value::text("9")]);
        normalize(&mut query, &schema, &registry, NormalizeMode::Padded).unwrap();
        assert_eq!(args(&query), [Value::text("9")]);
    }

    #[test]
    fn padded_renders_native_arguments_out() {
        let schema = schema();
        let registry = OperatorRegistry::standard();

        let mut query = QueryNode::compare("age", "eq", vec![Value::Int(30)]);
        normalize(&mut query, &schema, &registry, NormalizeMode::Padded).unwrap();
        assert_eq!(args(&query), [Value::text("30")]);
    }
}
