use crate::{
    obs,
    record::Record,
    schema::{ColumnType, TableSchema},
    value::ValueKind,
};
use thiserror::Error as ThisError;

///
/// Table audit
///
/// Opt-in consistency sweep over a whole record collection: every
/// declared column must be present on every record with the declared
/// kind, honoring nullability. This walks every row, so it never runs
/// inside the per-record evaluation loop; callers invoke it once when
/// a table is ingested.
///
/// Keys a record carries beyond the schema are ignored.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum AuditError {
    #[error("row {row}: missing column '{field}'")]
    MissingColumn { row: usize, field: String },

    #[error("row {row}: column '{field}' is null but not nullable")]
    NullViolation { row: usize, field: String },

    #[error("row {row}: column '{field}' is {expected}, found {found}")]
    TypeMismatch {
        row: usize,
        field: String,
        expected: ColumnType,
        found: ValueKind,
    },
}

/// Check every record against the schema, failing on the first
/// inconsistency.
pub fn check_table(schema: &TableSchema, records: &[Record]) -> Result<(), AuditError> {
    obs::record_audit_check();

    for (row, record) in records.iter().enumerate() {
        check_record(schema, record, row)?;
    }

    Ok(())
}

fn check_record(schema: &TableSchema, record: &Record, row: usize) -> Result<(), AuditError> {
    for (field, def) in schema.columns() {
        let Some(value) = record.get(field) else {
            return Err(AuditError::MissingColumn {
                row,
                field: field.to_string(),
            });
        };

        if value.is_null() {
            if def.is_nullable() {
                continue;
            }
            return Err(AuditError::NullViolation {
                row,
                field: field.to_string(),
            });
        }

        if !def.ty().matches(value) {
            return Err(AuditError::TypeMismatch {
                row,
                field: field.to_string(),
                expected: def.ty(),
                found: value.kind(),
            });
        }
    }

    Ok(())
}

///
/// TESTS
///
