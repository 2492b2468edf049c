/// Whether a debounced query is long enough to be sent to the search service.
pub fn accepts_query(query: Option<&str>, min_length: usize) -> bool {
    query.is_some_and(|text| text.chars().count() >= min_length)
}
