use crate::{
    query::{
        NormalizeMode, OperatorRegistry, QueryNode, ValidatePhase, eval, normalize, validate,
    },
    record::Record,
    schema::{ColumnDef, ColumnType, TableSchema},
    types::Date,
    value::Value,
};

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

fn amy() -> Record {
    Record::new()
        .with("name", Value::text("amy"))
        .with("age", Value::Int(30))
        .with("height", Value::Decimal("1.62".parse().unwrap()))
        .with(
            "birth_day",
            Value::Date(Date::new_checked(1994, 3, 2).unwrap()),
        )
        .with("active", Value::Bool(true))
}

/// Run one comparison through the full validate-normalize-validate
/// pipeline and evaluate it against the row.
fn check(row: &Record, mode: NormalizeMode, field: &str, op: &str, raw_args: &[&str]) -> bool {
    let schema = schema();
    let registry = OperatorRegistry::standard();
    let args = raw_args.iter().map(|raw| Value::text(*raw)).collect();

    let mut query = QueryNode::compare(field, op, args);
    validate(&query, &schema, &registry, ValidatePhase::Structural).unwrap();
    normalize(&mut query, &schema, &registry, mode).unwrap();
    let follow_up = match mode {
        NormalizeMode::Native => ValidatePhase::Typed,
        NormalizeMode::Padded => ValidatePhase::Structural,
    };
    validate(&query, &schema, &registry, follow_up).unwrap();

    eval(row, &query, &registry, mode)
}

fn check_native(row: &Record, field: &str, op: &str, raw_args: &[&str]) -> bool {
    check(row, NormalizeMode::Native, field, op, raw_args)
}

fn check_padded(row: &Record, field: &str, op: &str, raw_args: &[&str]) -> bool {
    check(row, NormalizeMode::Padded, field, op, raw_args)
}

#[test]
fn ordering_operators_follow_native_ordering() {
    let amy = amy();

    assert!(check_native(&amy, "age", "gt", &["25"]));
    assert!(!check_native(&amy, "age", "gt", &["30"]));
    assert!(check_native(&amy, "age", "gte", &["30"]));
    assert!(check_native(&amy, "age", "lt", &["45"]));
    assert!(!check_native(&amy, "age", "lte", &["29"]));
    assert!(check_native(&amy, "age", "eq", &["30"]));
    assert!(!check_native(&amy, "age", "neq", &["30"]));
    assert!(check_native(&amy, "age", "neq", &["31"]));
}

#[test]
fn between_is_inclusive_and_inverted_bounds_never_match() {
    let amy = amy();

    assert!(check_native(&amy, "age", "btw", &["20", "30"]));
    assert!(check_native(&amy, "age", "btw", &["30", "45"]));
    assert!(check_native(&amy, "age", "btw", &["30", "30"]));
    assert!(!check_native(&amy, "age", "btw", &["31", "45"]));

    // Inverted bounds are an empty range, not a swapped one.
    assert!(!check_native(&amy, "age", "btw", &["45", "20"]));
}

#[test]
fn decimal_and_date_columns_compare_natively() {
    let amy = amy();

    assert!(check_native(&amy, "height", "gt", &["1.5"]));
    assert!(check_native(&amy, "height", "lt", &["1.75"]));
    assert!(check_native(&amy, "height", "eq", &["1.62"]));

    assert!(check_native(
        &amy,
        "birth_day",
        "btw",
        &["1990-01-01", "1999-12-31"]
    ));
    assert!(check_native(&amy, "birth_day", "gt", &["1994-03-01"]));
    assert!(!check_native(&amy, "birth_day", "gt", &["1994-03-02"]));
}

#[test]
fn null_values_never_match_any_operator() {
    let row = amy().with("birth_day", Value::Null);

    for (op, args) in [
        ("eq", vec!["1994-03-02"]),
        ("neq", vec!["1994-03-02"]),
        ("gt", vec!["1990-01-01"]),
        ("lt", vec!["1999-12-31"]),
        ("gte", vec!["1990-01-01"]),
        ("lte", vec!["1999-12-31"]),
        ("btw", vec!["1990-01-01", "1999-12-31"]),
        ("ct", vec!["1994"]),
        ("nct", vec!["1994"]),
        ("sw", vec!["19"]),
        ("ew", vec!["02"]),
        ("in", vec!["1994-03-02"]),
        ("nin", vec!["1994-03-02"]),
    ] {
        assert!(
            !check_native(&row, "birth_day", op, &args),
            "{op} matched a null value"
        );
    }
}

#[test]
fn missing_fields_never_match() {
    let row = Record::new().with("name", Value::text("amy"));

    assert!(!check_native(&row, "age", "eq", &["30"]));
    assert!(!check_native(&row, "age", "neq", &["30"]));
}

#[test]
fn textual_operators_match_rendered_targets() {
    let amy = amy();

    // Text column.
    assert!(check_native(&amy, "name", "sw", &["a"]));
    assert!(check_native(&amy, "name", "ew", &["my"]));
    assert!(check_native(&amy, "name", "ct", &["m"]));
    assert!(check_native(&amy, "name", "nct", &["z"]));

    // Non-text columns render to text first.
    assert!(check_native(&amy, "age", "ct", &["0"]));
    assert!(!check_native(&amy, "age", "ct", &["4"]));
    assert!(check_native(&amy, "height", "ct", &["."]));
    assert!(check_native(&amy, "birth_day", "sw", &["1994"]));
    assert!(check_native(&amy, "active", "ct", &["ru"]));
}

#[test]
fn membership_checks_each_argument() {
    let amy = amy();

    assert!(check_native(&amy, "age", "in", &["30"]));
    assert!(check_native(&amy, "age", "in", &["29", "30"]));
    assert!(!check_native(&amy, "age", "in", &["29", "31"]));

    assert!(check_native(&amy, "age", "nin", &["29", "31"]));
    assert!(!check_native(&amy, "age", "nin", &["30", "31"]));
}

#[test]
fn invalid_membership_comparisons_never_satisfy_not_in() {
    // Hand-built node that skips normalization: the argument kind can
    // never equal an integer target, so neither `in` nor `nin` holds.
    let amy = amy();
    let registry = OperatorRegistry::standard();

    let query = QueryNode::compare("age", "in", vec![Value::text("nope")]);
    assert!(!eval(&amy, &query, &registry, NormalizeMode::Native));

    let query = QueryNode::compare("age", "nin", vec![Value::text("nope")]);
    assert!(!eval(&amy, &query, &registry, NormalizeMode::Native));
}

#[test]
fn group_nodes_follow_the_vacuous_conventions() {
    let amy = amy();
    let registry = OperatorRegistry::standard();

    let empty_and = QueryNode::and(vec![]);
    assert!(eval(&amy, &empty_and, &registry, NormalizeMode::Native));

    let empty_or = QueryNode::or(vec![]);
    assert!(!eval(&amy, &empty_or, &registry, NormalizeMode::Native));
}

#[test]
fn both_branches_on_one_node_combine_as_or() {
    let amy = amy();
    let registry = OperatorRegistry::standard();

    let matching = QueryNode::compare("age", "eq", vec![Value::Int(30)]);
    let failing = QueryNode::compare("age", "eq", vec![Value::Int(99)]);

    let query = QueryNode::and_or(vec![failing.clone()], vec![matching.clone()]);
    assert!(eval(&amy, &query, &registry, NormalizeMode::Native));

    let query = QueryNode::and_or(vec![matching], vec![failing.clone()]);
    assert!(eval(&amy, &query, &registry, NormalizeMode::Native));

    let query = QueryNode::and_or(vec![failing.clone()], vec![failing]);
    assert!(!eval(&amy, &query, &registry, NormalizeMode::Native));
}

#[test]
fn unresolved_nodes_evaluate_false_instead_of_panicking() {
    let amy = amy();
    let registry = OperatorRegistry::standard();

    // Unknown operator.
    let query = QueryNode::compare("age", "near", vec![Value::Int(30)]);
    assert!(!eval(&amy, &query, &registry, NormalizeMode::Native));

    // Under-supplied range: arity guard fires before indexing.
    let query = QueryNode::compare("age", "btw", vec![Value::Int(20)]);
    assert!(!eval(&amy, &query, &registry, NormalizeMode::Native));
}

#[test]
fn padded_mode_orders_numbers_by_aligned_width() {
    let row = amy().with("age", Value::Int(9));

    assert!(check_padded(&row, "age", "lt", &["10"]));
    assert!(!check_padded(&row, "age", "gt", &["10"]));
    assert!(check_padded(&row, "age", "eq", &["09"]));
    assert!(check_padded(&row, "age", "btw", &["9", "100"]));
}

#[test]
fn padded_mode_reorders_slash_dates() {
    let amy = amy();

    assert!(check_padded(
        &amy,
        "birth_day",
        "btw",
        &["01/01/1990", "31/12/1999"]
    ));
    assert!(check_padded(&amy, "birth_day", "gte", &["02/03/1994"]));
    assert!(!check_padded(&amy, "birth_day", "gt", &["02/03/1994"]));
}

#[test]
fn padded_and_native_agree_on_the_scenario_operators() {
    let amy = amy();

    for (field, op, args) in [
        ("age", "gte", vec!["25"]),
        ("age", "btw", vec!["20", "45"]),
        ("name", "sw", vec!["a"]),
        ("height", "gt", vec!["1.5"]),
    ] {
        assert_eq!(
            check_native(&amy, field, op, &args),
            check_padded(&amy, field, op, &args),
            "{field} {op} {args:?}"
        );
    }
}
