use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use headlines_logging::{headlines_debug, headlines_warn};

use crate::{Operation, OperationId};

#[derive(Debug)]
struct Members {
    open: bool,
    operations: HashMap<OperationId, Operation>,
}

/// Set of in-flight operations owned by one presenter.
///
/// `clear` cancels every member and closes the registry; anything added
/// while closed is canceled on the spot instead of being tracked.
#[derive(Debug)]
pub struct SubscriptionRegistry {
    members: Mutex<Members>,
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self {
            members: Mutex::new(Members {
                open: true,
                operations: HashMap::new(),
            }),
        }
    }

    /// Tracks `op`. Returns `false` when the registry is closed, in which
    /// case `op` has already been canceled.
    pub fn add(&self, op: Operation) -> bool {
        {
            let mut members = self.lock();
            if members.open {
                if op.is_pending() {
                    members.operations.insert(op.id(), op);
                }
                return true;
            }
        }
        headlines_warn!(
            "Operation {} ({}) added after teardown; canceling",
            op.id(),
            op.label()
        );
        op.cancel();
        false
    }

    pub fn remove(&self, id: OperationId) -> Option<Operation> {
        self.lock().operations.remove(&id)
    }

    /// Cancels and drops every member, then closes the registry.
    pub fn clear(&self) {
        let drained: Vec<Operation> = {
            let mut members = self.lock();
            members.open = false;
            members.operations.drain().map(|(_, op)| op).collect()
        };
        if !drained.is_empty() {
            headlines_debug!("Canceling {} registered operation(s)", drained.len());
        }
        for op in drained {
            op.cancel();
        }
    }

    pub fn reopen(&self) {
        self.lock().open = true;
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn len(&self) -> usize {
        self.lock().operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().operations.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Members> {
        self.members
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
