use crate::{SeedableRng, pick};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use sift::{
    record::Record,
    schema::{ColumnDef, ColumnType, TableSchema},
    types::Date,
    value::Value,
};

///
/// People table
///
/// The five-column table the test surfaces share: one column of every
/// supported type, with a nullable date. Generation is fully
/// deterministic per seed so failures replay.
///

const FIRST_NAMES: &[&str] = &[
    "amy", "bob", "cara", "dan", "eve", "finn", "gus", "hana", "ivo", "juno", "kai", "lena",
    "milo", "nora", "otis", "pia",
];

#[must_use]
pub fn people_schema() -> TableSchema {
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

/// `len` records drawn from one seeded stream.
#[must_use]
pub fn seeded_people(seed: u64, len: usize) -> Vec<Record> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..len).map(|_| random_person(&mut rng)).collect()
}

fn random_person(rng: &mut ChaCha8Rng) -> Record {
    let name = format!(
        "{}-{:03}",
        FIRST_NAMES[pick(rng, FIRST_NAMES.len())],
        pick(rng, 1000),
    );
    let age = pick(rng, 100) as i64;
    let height = Decimal::new(12_000 + pick(rng, 8_000) as i64, 2);
    // One in ten birth days is null; the column is nullable.
    let birth_day = if pick(rng, 10) == 0 {
        Value::Null
    } else {
        Value::Date(random_date(rng))
    };
    let active = pick(rng, 2) == 0;

    Record::new()
        .with("name", Value::text(name))
        .with("age", Value::Int(age))
        .with("height", Value::Decimal(height))
        .with("birth_day", birth_day)
        .with("active", Value::Bool(active))
}

fn random_date(rng: &mut ChaCha8Rng) -> Date {
    let year = 1950 + pick(rng, 60) as i32;
    let month = 1 + pick(rng, 12) as u8;
    // Capped at 28 so every month accepts the day.
    let day = 1 + pick(rng, 28) as u8;

    Date::new_checked(year, month, day).unwrap()
}
