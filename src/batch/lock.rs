//! Advisory per-document locks.
//!
//! Restores the invariant "at most one in-flight state transition per
//! document": a submission holds every document of its lote for the
//! duration, and the poller skips documents that are currently held.
//! In-process only — the host store's transactionality covers the rest.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::core::FacturaSendError;

/// Registry of document names currently undergoing a state transition.
#[derive(Debug, Default)]
pub struct DocumentLocks {
    held: Mutex<HashSet<String>>,
}

impl DocumentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire every name or none: if any document is already held, no
    /// lock is taken and the busy name is reported.
    pub fn try_acquire(&self, names: &[String]) -> Result<LockGuard<'_>, FacturaSendError> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(ocupado) = names.iter().find(|n| held.contains(n.as_str())) {
            return Err(FacturaSendError::Locked(ocupado.clone()));
        }

        held.extend(names.iter().cloned());
        Ok(LockGuard {
            locks: self,
            names: names.to_vec(),
        })
    }

    /// Acquire a single document, or `None` when it is busy.
    pub fn try_acquire_one(&self, name: &str) -> Option<LockGuard<'_>> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);

        if !held.insert(name.to_string()) {
            return None;
        }

        Some(LockGuard {
            locks: self,
            names: vec![name.to_string()],
        })
    }
}

/// Releases its documents on drop.
#[derive(Debug)]
#[must_use = "dropping the guard releases the documents"]
pub struct LockGuard<'a> {
    locks: &'a DocumentLocks,
    names: Vec<String>,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        let mut held = self
            .locks
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for name in &self.names {
            held.remove(name);
        }
    }
}
