use std::{collections::BTreeMap, fmt};

///
/// Operator kernel
///
/// Closed set of comparison behaviors plus the injected name table that
/// maps wire operator names onto them. Renaming or aliasing an operator
/// touches the registry only; validation and evaluation dispatch on the
/// kernel variant.
///

///
/// Arity
///
/// Accepted argument count for one operator. Checked before any
/// argument indexing, so a mismatch surfaces as an error rather than an
/// out-of-bounds access.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Arity {
    min: usize,
    max: usize,
}

impl Arity {
    pub(crate) const ONE: Self = Self { min: 1, max: 1 };
    pub(crate) const TWO: Self = Self { min: 2, max: 2 };
    pub(crate) const ONE_OR_TWO: Self = Self { min: 1, max: 2 };

    #[must_use]
    pub const fn min(self) -> usize {
        self.min
    }

    #[must_use]
    pub const fn max(self) -> usize {
        self.max
    }

    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}..={}", self.min, self.max)
        }
    }
}

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CompareOp {
    Gt,
    Lt,
    Eq,
    Ne,
    Gte,
    Lte,
    Between,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    In,
    NotIn,
}

impl CompareOp {
    #[must_use]
    pub const fn arity(self) -> Arity {
        match self {
            Self::Between => Arity::TWO,
            Self::In | Self::NotIn => Arity::ONE_OR_TWO,
            _ => Arity::ONE,
        }
    }

    /// Textual operators read the record value through its rendered
    /// string form and never take converted arguments.
    #[must_use]
    pub const fn is_textual(self) -> bool {
        matches!(
            self,
            Self::Contains | Self::NotContains | Self::StartsWith | Self::EndsWith
        )
    }

    /// Canonical registry name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Eq => "eq",
            Self::Ne => "neq",
            Self::Gte => "gte",
            Self::Lte => "lte",
            Self::Between => "btw",
            Self::Contains => "ct",
            Self::NotContains => "nct",
            Self::StartsWith => "sw",
            Self::EndsWith => "ew",
            Self::In => "in",
            Self::NotIn => "nin",
        }
    }

    const ALL: [Self; 13] = [
        Self::Gt,
        Self::Lt,
        Self::Eq,
        Self::Ne,
        Self::Gte,
        Self::Lte,
        Self::Between,
        Self::Contains,
        Self::NotContains,
        Self::StartsWith,
        Self::EndsWith,
        Self::In,
        Self::NotIn,
    ];
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

///
/// OperatorRegistry
///
/// Name to kernel map consulted during validation and evaluation.
/// Unknown names resolve to `None`; the validator turns that into an
/// error naming the operator.
///

#[derive(Clone, Debug)]
pub struct OperatorRegistry {
    ops: BTreeMap<String, CompareOp>,
}

impl OperatorRegistry {
    /// The full standard table: `gt lt eq neq gte lte btw ct nct sw ew
    /// in nin`.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for op in CompareOp::ALL {
            registry.ops.insert(op.name().to_string(), op);
        }

        registry
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            ops: BTreeMap::new(),
        }
    }

    /// Bind `name` to `op`, replacing any previous binding. Useful for
    /// aliases and trimmed-down operator sets.
    #[must_use]
    pub fn with_operator(mut self, name: impl Into<String>, op: CompareOp) -> Self {
        self.ops.insert(name.into(), op);
        self
    }

    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<CompareOp> {
        self.ops.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.ops.contains_key(name)
    }

    /// Registered names in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ops.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

///
/// TESTS
///
