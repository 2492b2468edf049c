use std::sync::{Arc, Mutex};

use headlines_core::{
    Operation, OperationState, Presenter, PresenterError, SearchResultItem, SearchView,
};

fn init_logging() {
    headlines_logging::initialize_for_tests();
}

#[derive(Default)]
struct RecordingView {
    calls: Mutex<Vec<String>>,
}

impl SearchView for RecordingView {
    fn toggle_loading_indicator(&self, active: bool) {
        self.calls.lock().unwrap().push(format!("loading:{active}"));
    }

    fn show_search_results(&self, items: Vec<SearchResultItem>) {
        self.calls.lock().unwrap().push(format!("results:{}", items.len()));
    }

    fn show_no_search_results(&self) {
        self.calls.lock().unwrap().push("empty".to_string());
    }
}

#[test]
fn search_view_can_be_driven_through_presenter() {
    init_logging();
    let presenter: Presenter<dyn SearchView> = Presenter::new();
    let view = Arc::new(RecordingView::default());
    presenter.attach_view(view.clone());

    let attached = presenter.check_view_attached().unwrap();
    attached.toggle_loading_indicator(true);
    attached.show_no_search_results();
    attached.show_search_results_error();

    assert_eq!(
        *view.calls.lock().unwrap(),
        vec!["loading:true".to_string(), "empty".to_string()]
    );
}

#[test]
fn detach_cancels_registered_operations_and_is_repeatable() {
    init_logging();
    let presenter: Presenter<dyn SearchView> = Presenter::new();
    presenter.attach_view(Arc::new(RecordingView::default()));

    let ops: Vec<Operation> = (0..3)
        .map(|n| Operation::new(format!("op-{n}"), || {}))
        .collect();
    for op in &ops {
        assert!(presenter.add_operation(op.clone()));
    }
    ops[0].complete();
    presenter.remove_operation(ops[0].id());
    assert_eq!(presenter.operation_count(), 2);

    presenter.detach_view();
    let after_first = (presenter.is_view_attached(), presenter.operation_count());
    presenter.detach_view();
    let after_second = (presenter.is_view_attached(), presenter.operation_count());

    assert_eq!(after_first, (false, 0));
    assert_eq!(after_first, after_second);
    assert_eq!(ops[0].state(), OperationState::Completed);
    assert_eq!(ops[1].state(), OperationState::Canceled);
    assert_eq!(ops[2].state(), OperationState::Canceled);
    assert_eq!(
        presenter.check_view_attached().err(),
        Some(PresenterError::ViewNotAttached)
    );
}
