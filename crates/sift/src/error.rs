use crate::{
    audit::AuditError,
    query::{NormalizeError, ValidateError},
    schema::SchemaError,
};
use thiserror::Error as ThisError;

///
/// Error
///
/// Umbrella over every failure the engine surfaces. Callers who need
/// to tell a bad query shape from a bad value format from an unknown
/// operator match on the nested error instead of parsing messages.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    SchemaError(#[from] SchemaError),

    #[error(transparent)]
    ValidateError(#[from] ValidateError),

    #[error(transparent)]
    NormalizeError(#[from] NormalizeError),

    #[error(transparent)]
    AuditError(#[from] AuditError),
}
