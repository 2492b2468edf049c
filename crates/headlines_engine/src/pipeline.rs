use std::future;
use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::{Stream, StreamExt};
use headlines_core::{
    accepts_query, normalize_response, Operation, Presenter, SearchResultItem, SearchSettings,
    SearchView,
};
use headlines_logging::{headlines_debug, headlines_info, headlines_warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::debounce::debounce;
use crate::search::{ChannelBatchSink, SearchService};
use crate::types::SearchEvent;
use crate::{Schedulers, SearchError, SearchFailureKind};

/// Presenter for the feed search screen.
///
/// Debounces the query stream, searches each accepted query in the
/// background and reports to the attached view. Dropping it detaches the
/// view, which cancels every search still running.
pub struct SearchPresenter {
    inner: Arc<SearchContext>,
}

struct SearchContext {
    presenter: Presenter<dyn SearchView>,
    service: Arc<dyn SearchService>,
    settings: SearchSettings,
    schedulers: Schedulers,
    /// Most recent search, tracked only when superseded searches are canceled.
    latest: Mutex<Option<Operation>>,
}

impl SearchPresenter {
    pub fn new<S>(
        view: Arc<dyn SearchView>,
        queries: S,
        service: Arc<dyn SearchService>,
        settings: SearchSettings,
        schedulers: Schedulers,
    ) -> Self
    where
        S: Stream<Item = String> + Send + Unpin + 'static,
    {
        let inner = Arc::new(SearchContext {
            presenter: Presenter::new(),
            service,
            settings,
            schedulers,
            latest: Mutex::new(None),
        });
        inner.presenter.attach_view(view);
        inner.listen_for_queries(queries);
        Self { inner }
    }

    pub fn attach_view(&self, view: Arc<dyn SearchView>) {
        self.inner.presenter.attach_view(view);
    }

    pub fn detach_view(&self) {
        self.inner.presenter.detach_view();
    }

    pub fn is_view_attached(&self) -> bool {
        self.inner.presenter.is_view_attached()
    }

    /// Lifecycle this presenter runs on.
    pub fn presenter(&self) -> &Presenter<dyn SearchView> {
        &self.inner.presenter
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.inner.settings
    }
}

impl Drop for SearchPresenter {
    fn drop(&mut self) {
        self.inner.presenter.detach_view();
    }
}

impl SearchContext {
    fn listen_for_queries<S>(self: &Arc<Self>, queries: S)
    where
        S: Stream<Item = String> + Send + Unpin + 'static,
    {
        let token = CancellationToken::new();
        let op = cancelable("search-queries", &token);
        if !self.presenter.add_operation(op.clone()) {
            return;
        }

        let min_length = self.settings.search_text_min_length;
        let window = self.settings.search_delay();
        let ctx = Arc::clone(self);
        // Built inside the task so the timer belongs to the UI runtime.
        self.schedulers.spawn_ui(async move {
            let accepted = debounce(queries, window).filter(move |query| {
                future::ready(accepts_query(Some(query.as_str()), min_length))
            });
            tokio::pin!(accepted);
            loop {
                let query = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    next = accepted.next() => match next {
                        Some(query) => query,
                        None => break,
                    },
                };
                headlines_debug!("Debounced search query: {}", query);
                ctx.on_search_term_entered(query);
            }
            ctx.presenter.remove_operation(op.id());
            if op.complete() {
                headlines_debug!("Query stream ended");
            }
        });
    }

    fn on_search_term_entered(self: &Arc<Self>, query: String) {
        headlines_debug!("on_search_term_entered() called with: query = [{}]", query);
        let Some(view) = self.presenter.view() else {
            headlines_info!("Search view is detached; skipping [{}]", query);
            return;
        };

        if self.settings.cancel_superseded {
            let previous = self.latest().take();
            if let Some(previous) = previous {
                if previous.cancel() {
                    headlines_debug!("Canceled superseded {}", previous.label());
                }
            }
        }

        let token = CancellationToken::new();
        let op = cancelable(format!("search [{query}]"), &token);
        if !self.presenter.add_operation(op.clone()) {
            return;
        }
        if self.settings.cancel_superseded {
            *self.latest() = Some(op.clone());
        }

        view.toggle_loading_indicator(true);

        let (tx, rx) = mpsc::unbounded_channel();
        let service = Arc::clone(&self.service);
        let limit = self.settings.search_result_limit;
        let search_token = token.clone();
        self.schedulers.spawn_background(async move {
            let sink = ChannelBatchSink::new(tx.clone());
            tokio::select! {
                biased;
                _ = search_token.cancelled() => {}
                result = service.search_feeds(&query, limit, &sink) => {
                    let _ = tx.send(SearchEvent::Finished(result));
                }
            }
        });

        let ctx = Arc::clone(self);
        self.schedulers.spawn_ui(async move {
            ctx.deliver_results(op, token, rx).await;
        });
    }

    /// Accumulates every batch of one search, then reports once.
    async fn deliver_results(
        &self,
        op: Operation,
        token: CancellationToken,
        mut rx: mpsc::UnboundedReceiver<SearchEvent>,
    ) {
        let mut items: Vec<SearchResultItem> = Vec::new();
        let outcome = loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break None,
                event = rx.recv() => match event {
                    Some(SearchEvent::Batch(batch)) => {
                        headlines_debug!("Received batch of {} feed(s)", batch.results.len());
                        items.extend(normalize_response(batch));
                    }
                    Some(SearchEvent::Finished(result)) => break Some(result),
                    None => {
                        break Some(Err(SearchError::new(
                            SearchFailureKind::Disconnected,
                            "search ended without an outcome",
                        )))
                    }
                },
            }
        };

        self.presenter.remove_operation(op.id());
        self.forget_latest(&op);

        match outcome {
            None => headlines_debug!("{} canceled", op.label()),
            Some(Ok(())) => {
                if op.complete() {
                    self.on_search_completed(items);
                }
            }
            Some(Err(err)) => {
                if op.fail() {
                    self.on_search_failed(&err);
                }
            }
        }
    }

    fn on_search_completed(&self, items: Vec<SearchResultItem>) {
        let Some(view) = self.presenter.view() else {
            headlines_info!("on_completed() - search view is already detached.");
            return;
        };
        view.toggle_loading_indicator(false);
        if items.is_empty() {
            view.show_no_search_results();
        } else {
            headlines_debug!("Found search items. Total: {}", items.len());
            view.show_search_results(items);
        }
    }

    fn on_search_failed(&self, err: &SearchError) {
        headlines_warn!("Search failed: {}", err);
        let Some(view) = self.presenter.view() else {
            headlines_info!("on_error() - search view is already detached.");
            return;
        };
        view.toggle_loading_indicator(false);
        if self.settings.surface_errors {
            view.show_search_results_error();
        }
    }

    fn forget_latest(&self, op: &Operation) {
        let mut latest = self.latest();
        if latest.as_ref().is_some_and(|current| current.id() == op.id()) {
            *latest = None;
        }
    }

    fn latest(&self) -> MutexGuard<'_, Option<Operation>> {
        self.latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn cancelable(label: impl Into<String>, token: &CancellationToken) -> Operation {
    let token = token.clone();
    Operation::new(label, move || token.cancel())
}
