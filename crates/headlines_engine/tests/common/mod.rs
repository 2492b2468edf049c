#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use headlines_core::{FeedItem, SearchResponse, SearchResultItem, SearchView};
use headlines_engine::{
    BatchSink, SearchError, SearchFailureKind, SearchHost, SearchResultProvider, SearchService,
};

pub fn init_logging() {
    headlines_logging::initialize_for_tests();
}

/// Stand-in for a search screen with one listener slot.
#[derive(Default)]
pub struct FakeSearchScreen {
    provider: Mutex<Option<Arc<dyn SearchResultProvider<Vec<String>>>>>,
    pub registrations: AtomicUsize,
    pub unregistrations: AtomicUsize,
}

impl FakeSearchScreen {
    fn current(&self) -> Option<Arc<dyn SearchResultProvider<Vec<String>>>> {
        self.provider.lock().unwrap().clone()
    }

    /// Returns `false` when no listener is registered.
    pub fn type_text(&self, text: &str) -> bool {
        self.current()
            .map(|provider| provider.on_query_text_change(text))
            .unwrap_or(false)
    }

    pub fn submit(&self, text: &str) -> bool {
        self.current()
            .map(|provider| provider.on_query_text_submit(text))
            .unwrap_or(false)
    }

    pub fn result_rows(&self) -> Option<Vec<String>> {
        self.current().map(|provider| provider.results().clone())
    }

    pub fn has_listener(&self) -> bool {
        self.current().is_some()
    }

    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    pub fn unregistrations(&self) -> usize {
        self.unregistrations.load(Ordering::SeqCst)
    }
}

impl SearchHost for FakeSearchScreen {
    type Results = Vec<String>;

    fn set_search_result_provider(
        &self,
        provider: Option<Arc<dyn SearchResultProvider<Vec<String>>>>,
    ) {
        let counter = if provider.is_some() {
            &self.registrations
        } else {
            &self.unregistrations
        };
        counter.fetch_add(1, Ordering::SeqCst);
        let previous = std::mem::replace(&mut *self.provider.lock().unwrap(), provider);
        drop(previous);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCall {
    Loading(bool),
    Results(Vec<String>),
    Empty,
    Error,
}

#[derive(Default)]
pub struct RecordingView {
    calls: Mutex<Vec<ViewCall>>,
}

impl RecordingView {
    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ViewCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl SearchView for RecordingView {
    fn toggle_loading_indicator(&self, active: bool) {
        self.record(ViewCall::Loading(active));
    }

    fn show_search_results(&self, items: Vec<SearchResultItem>) {
        let titles = items.into_iter().filter_map(|item| item.title).collect();
        self.record(ViewCall::Results(titles));
    }

    fn show_no_search_results(&self) {
        self.record(ViewCall::Empty);
    }

    fn show_search_results_error(&self) {
        self.record(ViewCall::Error);
    }
}

/// How the scripted service answers one query.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Size of each batch, emitted in order.
    pub batches: Vec<usize>,
    /// Wait before each batch (or before finishing when there are none).
    pub delay: Duration,
    pub failure: Option<SearchFailureKind>,
}

impl Plan {
    pub fn batches(batches: &[usize]) -> Self {
        Self {
            batches: batches.to_vec(),
            delay: Duration::from_millis(10),
            failure: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self, kind: SearchFailureKind) -> Self {
        self.failure = Some(kind);
        self
    }
}

type Planner = Box<dyn Fn(&str) -> Plan + Send + Sync>;

pub struct ScriptedSearchService {
    planner: Planner,
    calls: Mutex<Vec<(String, u32)>>,
}

impl ScriptedSearchService {
    pub fn new(planner: impl Fn(&str) -> Plan + Send + Sync + 'static) -> Self {
        Self {
            planner: Box::new(planner),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(plan: Plan) -> Self {
        Self::new(move |_| plan.clone())
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(query, _)| query.clone())
            .collect()
    }

    pub fn limits(&self) -> Vec<u32> {
        self.calls.lock().unwrap().iter().map(|(_, limit)| *limit).collect()
    }
}

pub fn feed_batch(query: &str, start: usize, len: usize) -> SearchResponse {
    SearchResponse {
        results: (start..start + len)
            .map(|n| FeedItem {
                feed_id: format!("feed/https://example.com/{query}/{n}"),
                title: Some(format!("{query} #{n}")),
                ..FeedItem::default()
            })
            .collect(),
        ..SearchResponse::default()
    }
}

#[async_trait::async_trait]
impl SearchService for ScriptedSearchService {
    async fn search_feeds(
        &self,
        query: &str,
        limit: u32,
        sink: &dyn BatchSink,
    ) -> Result<(), SearchError> {
        self.calls.lock().unwrap().push((query.to_string(), limit));
        let plan = (self.planner)(query);

        let mut emitted = 0;
        for size in &plan.batches {
            tokio::time::sleep(plan.delay).await;
            sink.emit(feed_batch(query, emitted, *size));
            emitted += size;
        }
        if plan.batches.is_empty() {
            tokio::time::sleep(plan.delay).await;
        }

        match plan.failure {
            Some(kind) => Err(SearchError {
                kind,
                message: "scripted failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}
