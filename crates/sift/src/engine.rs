use crate::{
    error::Error,
    obs,
    query::{NormalizeMode, OperatorRegistry, QueryNode, ValidatePhase, eval, normalize, validate},
    record::Record,
    schema::TableSchema,
};

///
/// Engine
///
/// One filtering surface: an injected schema, an operator registry and
/// a normalization strategy. The engine owns no records; callers hand
/// a slice in per run and get the matching references back in input
/// order.
///
/// Execution clones the query before normalizing, so a single query
/// value can be filtered by several callers at once without external
/// locking.
///

#[derive(Clone, Debug)]
pub struct Engine {
    schema: TableSchema,
    registry: OperatorRegistry,
    mode: NormalizeMode,
}

impl Engine {
    #[must_use]
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            registry: OperatorRegistry::standard(),
            mode: NormalizeMode::default(),
        }
    }

    /// Swap in a custom operator table.
    #[must_use]
    pub fn with_registry(mut self, registry: OperatorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Select the normalization strategy for every subsequent run.
    #[must_use]
    pub const fn with_mode(mut self, mode: NormalizeMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub const fn schema(&self) -> &TableSchema {
        &self.schema
    }

    #[must_use]
    pub const fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn mode(&self) -> NormalizeMode {
        self.mode
    }

    /// Run one validation phase on its own, for callers that
    /// pre-validate queries before executing them.
    pub fn validate(&self, query: &QueryNode, phase: ValidatePhase) -> Result<(), Error> {
        validate(query, &self.schema, &self.registry, phase)
            .inspect_err(|_| obs::record_validate_failure())
            .map_err(Error::from)
    }

    /// Normalize a query in place: structural check, argument rewrite,
    /// then the follow-up check for the active mode.
    pub fn normalize(&self, query: &mut QueryNode) -> Result<(), Error> {
        self.validate(query, ValidatePhase::Structural)?;

        normalize(query, &self.schema, &self.registry, self.mode)
            .inspect_err(|_| obs::record_normalize_failure())
            .map_err(Error::from)?;

        // Padded arguments stay in string space, so the native kind
        // check does not apply; the shape is checked again instead.
        let follow_up = match self.mode {
            NormalizeMode::Native => ValidatePhase::Typed,
            NormalizeMode::Padded => ValidatePhase::Structural,
        };
        self.validate(query, follow_up)
    }

    /// Clone and fully prepare a query for evaluation, leaving the
    /// caller's value untouched.
    pub fn prepare(&self, query: &QueryNode) -> Result<QueryNode, Error> {
        let mut prepared = query.clone();
        self.normalize(&mut prepared)?;

        Ok(prepared)
    }

    /// Evaluate one prepared query against one record.
    ///
    /// CONTRACT: `prepared` comes from [`Engine::prepare`] or an
    /// equivalent validate-normalize run; a raw query silently fails
    /// to match instead of erroring here.
    #[must_use]
    pub fn matches(&self, record: &Record, prepared: &QueryNode) -> bool {
        eval(record, prepared, &self.registry, self.mode)
    }

    /// Validate, normalize and sweep: returns the records satisfying
    /// the query, preserving input order.
    pub fn filter<'a>(
        &self,
        records: &'a [Record],
        query: &QueryNode,
    ) -> Result<Vec<&'a Record>, Error> {
        let prepared = self.prepare(query)?;

        let kept: Vec<&Record> = records
            .iter()
            .filter(|record| self.matches(record, &prepared))
            .collect();

        obs::record_run(records.len() as u64, kept.len() as u64);
        Ok(kept)
    }
}

///
/// TESTS
///
