use serde::{Deserialize, Serialize};
use std::cell::RefCell;

///
/// Run metrics
/// Ephemeral, in-memory counters for filter executions on this thread.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RunCounters {
    // Pipeline entrypoints
    pub queries_run: u64,
    pub validate_failures: u64,
    pub normalize_failures: u64,

    // Rows touched
    pub rows_scanned: u64,
    pub rows_matched: u64,

    // Opt-in table audits
    pub audit_checks: u64,
}

thread_local! {
    static RUN_STATE: RefCell<RunCounters> = RefCell::new(RunCounters::default());
}

/// Borrow counters immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&RunCounters) -> R) -> R {
    RUN_STATE.with(|m| f(&m.borrow()))
}

/// Borrow counters mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut RunCounters) -> R) -> R {
    RUN_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters (useful in tests).
pub fn reset() {
    with_state_mut(|m| *m = RunCounters::default());
}

/// Snapshot the current counters.
#[must_use]
pub fn snapshot() -> RunCounters {
    with_state(Clone::clone)
}

/// Record one filter sweep and the rows it touched.
pub(crate) fn record_run(rows_scanned: u64, rows_matched: u64) {
    with_state_mut(|m| {
        m.queries_run = m.queries_run.saturating_add(1);
        m.rows_scanned = m.rows_scanned.saturating_add(rows_scanned);
        m.rows_matched = m.rows_matched.saturating_add(rows_matched);
    });
}

pub(crate) fn record_validate_failure() {
    with_state_mut(|m| m.validate_failures = m.validate_failures.saturating_add(1));
}

pub(crate) fn record_normalize_failure() {
    with_state_mut(|m| m.normalize_failures = m.normalize_failures.saturating_add(1));
}

pub(crate) fn record_audit_check() {
    with_state_mut(|m| m.audit_checks = m.audit_checks.saturating_add(1));
}

///
/// TESTS
///
