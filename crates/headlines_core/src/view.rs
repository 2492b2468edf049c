use crate::SearchResultItem;

/// Callbacks a search screen must provide.
///
/// Implementations are only ever invoked from the UI-affine scheduler.
pub trait SearchView: Send + Sync {
    fn toggle_loading_indicator(&self, active: bool);

    fn show_search_results(&self, items: Vec<SearchResultItem>);

    fn show_no_search_results(&self);

    /// Only called when error surfacing is enabled in the search settings.
    fn show_search_results_error(&self) {}
}
