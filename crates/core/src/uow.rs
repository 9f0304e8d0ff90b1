//! Reentrant unit-of-work demarcation.
//!
//! Workflow operations legitimately call one another (a batch operation
//! runs the single-record operation once per id). The unit of work makes
//! that safe: the outermost frame owns the physical store transaction and
//! nested frames reuse it, so exactly one commit or rollback happens per
//! logical operation.
//!
//! Nesting is an explicit context value ([`UowScope`]) threaded through the
//! call chain rather than thread-local state, which keeps the behavior
//! deterministic under structured concurrency and trivial to unit-test.

use std::sync::Arc;

use crate::store::RecordStore;
use crate::workflow::error::EngineError;

/// Transaction demarcation wrapper around a record store.
#[derive(Debug, Clone)]
pub struct UnitOfWork<S> {
    store: Arc<S>,
}

/// Explicit transaction context passed to the work closure.
///
/// The depth starts at 1 in the outermost frame and grows by one per
/// [`UowScope::nested`] call; only the frame at depth 1 touches the
/// physical transaction.
#[derive(Debug)]
pub struct UowScope<'a, S> {
    store: &'a S,
    depth: u32,
}

impl<S: RecordStore> UnitOfWork<S> {
    /// Creates a unit of work over the given store.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Runs `f` inside one physical store transaction.
    ///
    /// Begins a transaction, executes `f` with an explicit scope, and
    /// commits when `f` returns `Ok`. Any error rolls the transaction back
    /// and propagates unchanged; a rollback failure is logged, never
    /// substituted for the original error.
    pub fn run<T, F>(&self, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut UowScope<'_, S>) -> Result<T, EngineError>,
    {
        self.store.begin()?;
        let mut scope = UowScope {
            store: self.store.as_ref(),
            depth: 1,
        };
        match f(&mut scope) {
            Ok(value) => {
                self.store.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.store.rollback() {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

impl<S: RecordStore> UowScope<'_, S> {
    /// The store handle for this transaction.
    #[must_use]
    pub fn store(&self) -> &S {
        self.store
    }

    /// Current nesting depth; the outermost frame is at depth 1.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Reenters the active transaction without beginning a new one.
    ///
    /// Errors propagate unchanged to the outermost frame, which performs
    /// the single rollback; inner frames never commit or roll back.
    pub fn nested<T, F>(&mut self, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut UowScope<'_, S>) -> Result<T, EngineError>,
    {
        let mut inner = UowScope {
            store: self.store,
            depth: self.depth + 1,
        };
        f(&mut inner)
    }
}
