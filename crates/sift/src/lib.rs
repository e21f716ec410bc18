//! In-memory boolean query engine: validated and normalized comparison
//! trees evaluated against record collections, with the schema, the
//! operator table and the normalization strategy all injected.
#![warn(unreachable_pub)]

mod engine;

// public exports are one module level down
pub mod audit;
pub mod error;
pub mod obs;
pub mod query;
pub mod record;
pub mod schema;
pub mod types;
pub mod value;

pub use engine::Engine;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, counters, or pipeline internals are re-exported here.
///

pub mod prelude {
    pub use crate::{
        Engine,
        query::{NormalizeMode, OperatorRegistry, QueryNode},
        record::Record,
        schema::{ColumnDef, ColumnType, TableSchema},
        value::Value,
    };
}
