use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use futures_util::Stream;
use headlines_logging::{headlines_debug, headlines_trace, headlines_warn};
use tokio::sync::mpsc;

/// Listener a search widget calls back into.
///
/// Both callbacks return `true` to tell the widget the query was handled.
pub trait SearchResultProvider<R>: Send + Sync {
    /// Sink the widget renders its own result list from.
    fn results(&self) -> &R;

    fn on_query_text_change(&self, new_query: &str) -> bool;

    fn on_query_text_submit(&self, query: &str) -> bool;
}

/// Screen hosting a search widget with a single listener slot.
///
/// Passing `None` unregisters the current listener.
pub trait SearchHost: Send + Sync + 'static {
    type Results: Send + Sync + 'static;

    fn set_search_result_provider(
        &self,
        provider: Option<Arc<dyn SearchResultProvider<Self::Results>>>,
    );
}

/// Turns a host's query callbacks into a [`QueryStream`].
///
/// Holds the host weakly, so the bridge never keeps a screen alive.
pub struct QueryBridge<H: SearchHost> {
    host: Weak<H>,
    results: H::Results,
}

impl<H: SearchHost> QueryBridge<H> {
    pub fn new(host: &Arc<H>, results: H::Results) -> Self {
        Self {
            host: Arc::downgrade(host),
            results,
        }
    }

    /// Registers as the host's listener and returns the query sequence.
    ///
    /// Consumes the bridge: once the stream is canceled, a new bridge is
    /// needed to listen again.
    pub fn subscribe(self) -> QueryStream {
        let (tx, rx) = mpsc::unbounded_channel();
        let provider: Arc<dyn SearchResultProvider<H::Results>> = Arc::new(QueryForwarder {
            results: self.results,
            tx,
        });

        match self.host.upgrade() {
            Some(host) => host.set_search_result_provider(Some(provider)),
            None => headlines_warn!("Search host is already destroyed; no queries will arrive."),
        }

        let host = self.host;
        QueryStream {
            rx,
            unregister: Some(Box::new(move || unregister(&host))),
        }
    }
}

fn unregister<H: SearchHost>(host: &Weak<H>) {
    match host.upgrade() {
        Some(host) => {
            headlines_debug!("Unregistering search result provider");
            host.set_search_result_provider(None);
        }
        None => headlines_warn!("Search host is already destroyed."),
    }
}

struct QueryForwarder<R> {
    results: R,
    tx: mpsc::UnboundedSender<String>,
}

impl<R> QueryForwarder<R> {
    fn forward(&self, query: &str) -> bool {
        if self.tx.send(query.to_owned()).is_err() {
            headlines_trace!("Query stream closed; dropping [{}]", query);
        }
        true
    }
}

impl<R: Send + Sync> SearchResultProvider<R> for QueryForwarder<R> {
    fn results(&self) -> &R {
        &self.results
    }

    fn on_query_text_change(&self, new_query: &str) -> bool {
        headlines_debug!("on_query_text_change() called with: new_query = [{}]", new_query);
        self.forward(new_query)
    }

    fn on_query_text_submit(&self, query: &str) -> bool {
        headlines_debug!("on_query_text_submit() called with: query = [{}]", query);
        self.forward(query)
    }
}

/// Every change and submit from the host, in call order, unbounded.
///
/// Dropping or canceling the stream unregisters it from the host once.
pub struct QueryStream {
    rx: mpsc::UnboundedReceiver<String>,
    unregister: Option<Box<dyn FnOnce() + Send>>,
}

impl QueryStream {
    pub fn cancel(&mut self) {
        if let Some(unregister) = self.unregister.take() {
            self.rx.close();
            unregister();
        }
    }

    pub fn is_canceled(&self) -> bool {
        self.unregister.is_none()
    }
}

impl Stream for QueryStream {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<String>> {
        if self.is_canceled() {
            return Poll::Ready(None);
        }
        self.rx.poll_recv(cx)
    }
}

impl Drop for QueryStream {
    fn drop(&mut self) {
        self.cancel();
    }
}
