use std::future::Future;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// The two execution contexts the search pipeline splits work across.
///
/// View callbacks only run on `ui`; remote calls only run on `background`.
#[derive(Debug, Clone)]
pub struct Schedulers {
    pub ui: Handle,
    pub background: Handle,
}

impl Schedulers {
    pub fn new(ui: Handle, background: Handle) -> Self {
        Self { ui, background }
    }

    /// Both contexts on the runtime this is called from.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        let handle = Handle::current();
        Self::new(handle.clone(), handle)
    }

    pub(crate) fn spawn_ui<F>(&self, future: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.ui.spawn(future)
    }

    pub(crate) fn spawn_background<F>(&self, future: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.background.spawn(future)
    }
}
