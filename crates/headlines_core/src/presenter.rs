use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use headlines_logging::{headlines_debug, headlines_trace};
use thiserror::Error;

use crate::{Operation, OperationId, SubscriptionRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresenterError {
    #[error("view is not attached; call Presenter::attach_view before requesting data")]
    ViewNotAttached,
}

/// Binds a presentation unit to its view and owns the teardown of every
/// operation the unit started.
///
/// All methods take `&self`, so a presenter is normally shared as
/// `Arc<Presenter<V>>` between the host and the tasks it spawns.
pub struct Presenter<V: ?Sized> {
    view: RwLock<Option<Arc<V>>>,
    registry: SubscriptionRegistry,
}

impl<V: ?Sized> Default for Presenter<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ?Sized> Presenter<V> {
    pub fn new() -> Self {
        Self {
            view: RwLock::new(None),
            registry: SubscriptionRegistry::new(),
        }
    }

    /// Stores `view` as the current handle, replacing any previous one.
    ///
    /// Operations started for a previous view are left running.
    pub fn attach_view(&self, view: Arc<V>) {
        headlines_debug!("attach_view() called");
        *self.write_view() = Some(view);
        self.registry.reopen();
    }

    /// Clears the view, then cancels and forgets every registered operation.
    /// Safe to call repeatedly.
    pub fn detach_view(&self) {
        let had_view = self.write_view().take().is_some();
        headlines_debug!("detach_view() called - view was attached: {}", had_view);
        self.registry.clear();
    }

    pub fn view(&self) -> Option<Arc<V>> {
        let view = self.read_view().clone();
        headlines_trace!("view() called - attached: {}", view.is_some());
        view
    }

    pub fn is_view_attached(&self) -> bool {
        self.read_view().is_some()
    }

    /// Precondition guard for callers that cannot proceed without a view.
    pub fn check_view_attached(&self) -> Result<Arc<V>, PresenterError> {
        self.read_view().clone().ok_or(PresenterError::ViewNotAttached)
    }

    /// Registers `op` for cancellation on detach. Returns `false` when the
    /// presenter is already torn down; `op` is canceled in that case.
    pub fn add_operation(&self, op: Operation) -> bool {
        self.registry.add(op)
    }

    pub fn remove_operation(&self, id: OperationId) -> Option<Operation> {
        self.registry.remove(id)
    }

    pub fn operation_count(&self) -> usize {
        self.registry.len()
    }

    fn read_view(&self) -> RwLockReadGuard<'_, Option<Arc<V>>> {
        self.view.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_view(&self) -> RwLockWriteGuard<'_, Option<Arc<V>>> {
        self.view
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OperationState;

    trait Greeter: Send + Sync {
        fn name(&self) -> &str;
    }

    struct Named(&'static str);

    impl Greeter for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn attach_and_detach_toggle_the_view() {
        let presenter: Presenter<dyn Greeter> = Presenter::new();
        assert!(!presenter.is_view_attached());
        assert_eq!(
            presenter.check_view_attached().err(),
            Some(PresenterError::ViewNotAttached)
        );

        presenter.attach_view(Arc::new(Named("first")));
        assert!(presenter.is_view_attached());
        assert_eq!(presenter.view().map(|v| v.name().to_string()).as_deref(), Some("first"));

        presenter.attach_view(Arc::new(Named("second")));
        assert_eq!(
            presenter.check_view_attached().map(|v| v.name().to_string()),
            Ok("second".to_string())
        );

        presenter.detach_view();
        assert!(presenter.view().is_none());
    }

    #[test]
    fn detach_twice_is_idempotent() {
        let presenter: Presenter<dyn Greeter> = Presenter::new();
        presenter.attach_view(Arc::new(Named("view")));
        let op = Operation::new("work", || {});
        assert!(presenter.add_operation(op.clone()));

        presenter.detach_view();
        presenter.detach_view();

        assert!(!presenter.is_view_attached());
        assert_eq!(presenter.operation_count(), 0);
        assert_eq!(op.state(), OperationState::Canceled);
    }

    #[test]
    fn reattach_keeps_running_operations() {
        let presenter: Presenter<dyn Greeter> = Presenter::new();
        presenter.attach_view(Arc::new(Named("one")));
        let op = Operation::new("work", || {});
        presenter.add_operation(op.clone());

        presenter.attach_view(Arc::new(Named("two")));

        assert!(op.is_pending());
        assert_eq!(presenter.operation_count(), 1);
    }

    #[test]
    fn operations_added_after_detach_are_canceled() {
        let presenter: Presenter<dyn Greeter> = Presenter::new();
        presenter.attach_view(Arc::new(Named("view")));
        presenter.detach_view();

        let late = Operation::new("late", || {});
        assert!(!presenter.add_operation(late.clone()));
        assert_eq!(late.state(), OperationState::Canceled);

        presenter.attach_view(Arc::new(Named("again")));
        assert!(presenter.add_operation(Operation::new("fresh", || {})));
        assert_eq!(presenter.operation_count(), 1);
    }
}
