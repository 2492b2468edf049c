use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

pub type OperationId = u64;

static NEXT_OPERATION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Pending,
    Completed,
    Canceled,
    Failed,
}

type CancelFn = Box<dyn FnOnce() + Send>;

struct Slot {
    state: OperationState,
    on_cancel: Option<CancelFn>,
}

/// Handle to one in-flight unit of async work.
///
/// Clones share the same state; the cancel closure runs at most once no
/// matter how many clones race to cancel.
#[derive(Clone)]
pub struct Operation {
    id: OperationId,
    label: Arc<str>,
    slot: Arc<Mutex<Slot>>,
}

impl Operation {
    pub fn new(label: impl Into<String>, on_cancel: impl FnOnce() + Send + 'static) -> Self {
        let label: String = label.into();
        Self {
            id: NEXT_OPERATION_ID.fetch_add(1, Ordering::Relaxed),
            label: Arc::from(label),
            slot: Arc::new(Mutex::new(Slot {
                state: OperationState::Pending,
                on_cancel: Some(Box::new(on_cancel)),
            })),
        }
    }

    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> OperationState {
        self.lock().state
    }

    pub fn is_pending(&self) -> bool {
        self.state() == OperationState::Pending
    }

    /// Cancels a pending operation. Returns `false` if it had already
    /// reached a terminal state.
    pub fn cancel(&self) -> bool {
        let on_cancel = {
            let mut slot = self.lock();
            if slot.state != OperationState::Pending {
                return false;
            }
            slot.state = OperationState::Canceled;
            slot.on_cancel.take()
        };
        // Run outside the lock; the closure may wake tasks that inspect us.
        if let Some(on_cancel) = on_cancel {
            on_cancel();
        }
        true
    }

    pub fn complete(&self) -> bool {
        self.finish(OperationState::Completed)
    }

    pub fn fail(&self) -> bool {
        self.finish(OperationState::Failed)
    }

    fn finish(&self, terminal: OperationState) -> bool {
        let mut slot = self.lock();
        if slot.state != OperationState::Pending {
            return false;
        }
        slot.state = terminal;
        slot.on_cancel = None;
        true
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("state", &self.state())
            .finish()
    }
}
