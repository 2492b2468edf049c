use std::time::Duration;

use serde::Deserialize;

/// Tuning for the debounced search pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Quiet period a query must survive before it is searched.
    pub search_delay_ms: u64,
    pub search_text_min_length: usize,
    /// Passed to the search service as the result count.
    pub search_result_limit: u32,
    /// Cancel an in-flight search when a newer query is accepted.
    pub cancel_superseded: bool,
    /// Call `SearchView::show_search_results_error` when a search fails.
    pub surface_errors: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            search_delay_ms: 500,
            search_text_min_length: 3,
            search_result_limit: 20,
            cancel_superseded: false,
            surface_errors: false,
        }
    }
}

impl SearchSettings {
    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }
}
