use crate::{SeedableRng, pick};
use rand_chacha::ChaCha8Rng;
use sift::{
    query::QueryNode,
    schema::{ColumnType, TableSchema},
    value::Value,
};

///
/// Query generation
///
/// Well-formed random queries over an arbitrary schema: every field
/// resolves, every operator is standard and every argument parses for
/// its column type, so `Engine::prepare` accepts the output in either
/// normalization mode. The schema must declare at least one column.
///

const ORDERING_OPS: &[&str] = &["gt", "lt", "eq", "neq", "gte", "lte"];
const TEXTUAL_OPS: &[&str] = &["ct", "nct", "sw", "ew"];

#[must_use]
pub fn seeded_query(seed: u64, schema: &TableSchema) -> QueryNode {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let columns: Vec<(&str, ColumnType)> = schema
        .columns()
        .map(|(name, def)| (name, def.ty()))
        .collect();

    random_group(&mut rng, &columns, 2)
}

fn random_node(rng: &mut ChaCha8Rng, columns: &[(&str, ColumnType)], depth: usize) -> QueryNode {
    if depth == 0 || pick(rng, 3) > 0 {
        random_compare(rng, columns)
    } else {
        random_group(rng, columns, depth)
    }
}

fn random_group(rng: &mut ChaCha8Rng, columns: &[(&str, ColumnType)], depth: usize) -> QueryNode {
    let branch = |rng: &mut ChaCha8Rng| {
        let len = 1 + pick(rng, 3);

        (0..len)
            .map(|_| random_node(rng, columns, depth - 1))
            .collect::<Vec<_>>()
    };

    match pick(rng, 3) {
        0 => QueryNode::and(branch(rng)),
        1 => QueryNode::or(branch(rng)),
        _ => QueryNode::and_or(branch(rng), branch(rng)),
    }
}

fn random_compare(rng: &mut ChaCha8Rng, columns: &[(&str, ColumnType)]) -> QueryNode {
    let (field, ty) = columns[pick(rng, columns.len())];

    match pick(rng, 4) {
        0 => {
            let op = TEXTUAL_OPS[pick(rng, TEXTUAL_OPS.len())];

            QueryNode::compare(field, op, vec![Value::text(fragment(rng))])
        }
        1 => QueryNode::compare(field, "btw", range_args(rng, ty)),
        2 => {
            let op = if pick(rng, 2) == 0 { "in" } else { "nin" };
            let args = (0..1 + pick(rng, 2)).map(|_| raw_arg(rng, ty)).collect();

            QueryNode::compare(field, op, args)
        }
        _ => {
            let op = ORDERING_OPS[pick(rng, ORDERING_OPS.len())];

            QueryNode::compare(field, op, vec![raw_arg(rng, ty)])
        }
    }
}

/// A textual argument that converts cleanly for the column type.
fn raw_arg(rng: &mut ChaCha8Rng, ty: ColumnType) -> Value {
    Value::text(raw_text(rng, ty))
}

/// Two arguments with the lower bound first, so `btw` ranges can match.
fn range_args(rng: &mut ChaCha8Rng, ty: ColumnType) -> Vec<Value> {
    let mut pair = [raw_text(rng, ty), raw_text(rng, ty)];

    if ty == ColumnType::Int {
        pair.sort_unstable_by_key(|raw| raw.parse::<i64>().unwrap_or(0));
    } else {
        // Every other rendering is fixed-width, so string order is native order.
        pair.sort_unstable();
    }

    pair.into_iter().map(Value::text).collect()
}

fn raw_text(rng: &mut ChaCha8Rng, ty: ColumnType) -> String {
    match ty {
        ColumnType::Bool => {
            if pick(rng, 2) == 0 { "true" } else { "false" }.to_string()
        }
        ColumnType::Int => pick(rng, 120).to_string(),
        ColumnType::Decimal => format!("{}.{:02}", 120 + pick(rng, 80), pick(rng, 100)),
        ColumnType::Date => format!(
            "{:04}-{:02}-{:02}",
            1950 + pick(rng, 60),
            1 + pick(rng, 12),
            1 + pick(rng, 28),
        ),
        ColumnType::Text => fragment(rng),
    }
}

fn fragment(rng: &mut ChaCha8Rng) -> String {
    let len = 1 + pick(rng, 3);

    (0..len)
        .map(|_| char::from(b'a' + pick(rng, 26) as u8))
        .collect()
}
