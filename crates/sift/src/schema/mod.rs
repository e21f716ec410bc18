use crate::{
    types::DateFormat,
    value::{Value, ValueKind},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, sync::Arc};
use thiserror::Error as ThisError;

///
/// Column schema
///
/// Injected description of the table under filtration. The engine never
/// hard-codes a column set; every consumer supplies its own `TableSchema`
/// and may swap it without touching validation, normalization, or
/// evaluation.
///

///
/// ColumnType
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum ColumnType {
    Bool,
    Date,
    Decimal,
    Int,
    Text,
}

impl ColumnType {
    #[must_use]
    pub const fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Bool, Value::Bool(_))
                | (Self::Date, Value::Date(_))
                | (Self::Decimal, Value::Decimal(_))
                | (Self::Int, Value::Int(_))
                | (Self::Text, Value::Text(_))
        )
    }

    #[must_use]
    pub const fn value_kind(self) -> ValueKind {
        match self {
            Self::Bool => ValueKind::Bool,
            Self::Date => ValueKind::Date,
            Self::Decimal => ValueKind::Decimal,
            Self::Int => ValueKind::Int,
            Self::Text => ValueKind::Text,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value_kind())
    }
}

///
/// Converter
///
/// Per-column override for turning raw query text into a typed value.
/// Returning `None` signals a conversion failure; the normalizer turns
/// that into an error naming the field and target type.
///

pub type Converter = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;

///
/// ColumnDef
///

#[derive(Clone)]
pub struct ColumnDef {
    ty: ColumnType,
    nullable: bool,
    convert: Option<Converter>,
}

impl ColumnDef {
    #[must_use]
    pub const fn new(ty: ColumnType) -> Self {
        Self {
            ty,
            nullable: false,
            convert: None,
        }
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Attach a custom converter consulted instead of the type-driven
    /// default during native normalization.
    #[must_use]
    pub fn with_converter(
        mut self,
        convert: impl Fn(&str) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        self.convert = Some(Arc::new(convert));
        self
    }

    #[must_use]
    pub const fn ty(&self) -> ColumnType {
        self.ty
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub const fn converter(&self) -> Option<&Converter> {
        self.convert.as_ref()
    }
}

impl fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("ty", &self.ty)
            .field("nullable", &self.nullable)
            .field("convert", &self.convert.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

///
/// SchemaError
///

#[derive(Debug, ThisError)]
pub enum SchemaError {
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    #[error("duplicate column '{field}'")]
    DuplicateColumn { field: String },

    #[error("invalid date format description '{format}'")]
    InvalidDateFormat { format: String },
}

///
/// TableSchema
///
/// Ordered column map plus the date format textual dates are read with.
/// Immutable once built; construction is the only place errors surface.
///

#[derive(Clone, Debug, Default)]
pub struct TableSchema {
    columns: Vec<(String, ColumnDef)>,
    date_format: DateFormat,
}

impl TableSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(
        mut self,
        name: impl Into<String>,
        def: ColumnDef,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(SchemaError::DuplicateColumn { field: name });
        }

        self.columns.push((name, def));
        Ok(self)
    }

    pub fn with_date_format(mut self, description: &str) -> Result<Self, SchemaError> {
        let format = DateFormat::new(description).ok_or_else(|| SchemaError::InvalidDateFormat {
            format: description.to_string(),
        })?;

        self.date_format = format;
        Ok(self)
    }

    pub fn column(&self, field: &str) -> Result<&ColumnDef, SchemaError> {
        self.columns
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, def)| def)
            .ok_or_else(|| SchemaError::UnknownField {
                field: field.to_string(),
            })
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.columns.iter().any(|(name, _)| name == field)
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnDef)> {
        self.columns.iter().map(|(name, def)| (name.as_str(), def))
    }

    /// Distinct column types declared by this schema.
    #[must_use]
    pub fn type_set(&self) -> BTreeSet<ColumnType> {
        self.columns.iter().map(|(_, def)| def.ty()).collect()
    }

    /// Whether any declared column carries this value kind.
    #[must_use]
    pub fn declares_kind(&self, kind: ValueKind) -> bool {
        self.columns
            .iter()
            .any(|(_, def)| def.ty().value_kind() == kind)
    }

    #[must_use]
    pub const fn date_format(&self) -> &DateFormat {
        &self.date_format
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

///
/// TESTS
///
