use std::collections::HashSet;

use spend_core::{
    update, AppState, Cursor, Effect, Employee, FetchFailure, Msg, Page, PageCursor, Transaction,
    TransactionListView,
};

fn init_logging() {
    spend_logging::initialize_for_tests();
}

fn employee(id: &str) -> Employee {
    Employee::new(id, id.to_uppercase(), "Tester")
}

fn txn(id: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        amount: 3.0,
        employee: employee("alice"),
        merchant: "Hardware Store".to_string(),
        date: "2024-05-05".to_string(),
        approved: true,
    }
}

fn page(ids: &[&str], next: Option<&str>) -> Page {
    Page {
        data: ids.iter().map(|id| txn(id)).collect(),
        next_cursor: next.map(Cursor::new),
    }
}

fn page_request(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchTransactionsPage { request, .. } => Some(*request),
            _ => None,
        })
        .expect("page fetch effect")
}

/// Mounted + directory loaded; the first page fetch is in flight.
fn mounted() -> (AppState, u64) {
    let (state, _) = update(AppState::new(), Msg::Mounted);
    let (state, effects) = update(
        state,
        Msg::EmployeesLoaded {
            request: 1,
            result: Ok(vec![employee("alice"), employee("bob")]),
        },
    );
    let request = page_request(&effects);
    (state, request)
}

fn loaded(ids: &[&str], next: Option<&str>) -> AppState {
    let (state, request) = mounted();
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request,
            result: Ok(page(ids, next)),
        },
    );
    state
}

#[test]
fn accumulated_pages_grow_monotonically_without_duplicates() {
    init_logging();
    let pages: [(&[&str], Option<&str>); 4] = [
        (&["a", "b"], Some("p2")),
        (&["b", "c"], Some("p3")),
        (&["d"], Some("p4")),
        (&[], None),
    ];

    let (mut state, mut request) = mounted();
    let mut last_len = 0;
    for (i, (ids, next)) in pages.iter().enumerate() {
        let (next_state, _) = update(
            state,
            Msg::PageLoaded {
                request,
                result: Ok(page(ids, *next)),
            },
        );
        state = next_state;

        let data = state.paginated().data().expect("data after page");
        assert!(data.len() >= last_len);
        last_len = data.len();
        let unique: HashSet<_> = data.iter().map(|t| &t.id).collect();
        assert_eq!(unique.len(), data.len());

        if i + 1 < pages.len() {
            let (next_state, effects) = update(state, Msg::LoadMoreClicked);
            state = next_state;
            request = page_request(&effects);
        }
    }

    assert_eq!(state.paginated().cursor(), &PageCursor::Exhausted);
    assert_eq!(state.view().transactions.ids(), vec!["a", "b", "c", "d"]);
}

#[test]
fn loading_spans_the_whole_fetch_and_clears_on_failure() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::Mounted);
    assert!(state.directory().loading());
    assert!(state.view().employees_loading);

    let (state, effects) = update(
        state,
        Msg::EmployeesLoaded {
            request: 1,
            result: Err(FetchFailure::new("network error")),
        },
    );
    assert!(!state.directory().loading());
    assert_eq!(state.directory().data(), None);
    // Pagination still starts after the directory completes.
    let request = page_request(&effects);
    assert!(state.paginated().loading());

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request,
            result: Err(FetchFailure::new("timeout")),
        },
    );
    assert!(!state.paginated().loading());
    assert!(!state.any_loading());
    assert_eq!(state.view().transactions, TransactionListView::Unavailable);
}

#[test]
fn failed_employee_fetch_leaves_list_unavailable_until_next_selection() {
    init_logging();
    let state = loaded(&["t1"], Some("p2"));
    let (state, effects) = update(state, Msg::EmployeeSelected(employee("bob")));
    assert_eq!(state.view().transactions, TransactionListView::Loading);

    let (state, _) = update(
        state,
        Msg::EmployeeTransactionsLoaded {
            request: effects[0].request(),
            result: Err(FetchFailure::new("http status 500")),
        },
    );
    assert!(!state.any_loading());
    assert_eq!(state.view().transactions, TransactionListView::Unavailable);

    let (state, _) = update(state, Msg::EmployeeSelected(employee("carol")));
    assert_eq!(state.view().transactions, TransactionListView::Loading);
}

#[test]
fn list_reads_loading_before_the_first_page_is_requested() {
    init_logging();
    let fresh = AppState::new().view();
    assert_eq!(fresh.transactions, TransactionListView::Loading);

    let (state, _) = update(AppState::new(), Msg::Mounted);
    assert!(!state.paginated().loading());
    assert_eq!(state.view().transactions, TransactionListView::Loading);
}

#[test]
fn mounted_twice_does_not_refetch() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::Mounted);
    let (state, effects) = update(state, Msg::Mounted);
    assert!(effects.is_empty());

    let state = {
        let (state, _) = update(
            state,
            Msg::EmployeesLoaded {
                request: 1,
                result: Ok(vec![employee("alice")]),
            },
        );
        state
    };
    let (_state, effects) = update(state, Msg::Mounted);
    assert!(effects.is_empty());
}

#[test]
fn late_response_for_superseded_employee_is_discarded() {
    init_logging();
    let state = loaded(&["t1"], Some("p2"));

    let (state, first) = update(state, Msg::EmployeeSelected(employee("bob")));
    let (mut state, second) = update(state, Msg::EmployeeSelected(employee("carol")));
    let bob_request = first[0].request();
    let carol_request = second[0].request();
    assert_ne!(bob_request, carol_request);
    assert!(state.consume_dirty());

    let (mut state, _) = update(
        state,
        Msg::EmployeeTransactionsLoaded {
            request: bob_request,
            result: Ok(vec![txn("bob-1")]),
        },
    );
    assert!(!state.consume_dirty());
    assert_eq!(state.view().transactions, TransactionListView::Loading);
    assert_eq!(state.filtered().employee_id(), Some("carol"));

    let (state, _) = update(
        state,
        Msg::EmployeeTransactionsLoaded {
            request: carol_request,
            result: Ok(vec![txn("carol-1")]),
        },
    );
    assert_eq!(state.view().transactions.ids(), vec!["carol-1"]);
}

#[test]
fn response_arriving_after_filter_cleared_is_discarded() {
    init_logging();
    let state = loaded(&["t1", "t2"], Some("p2"));

    let (state, effects) = update(state, Msg::EmployeeSelected(employee("bob")));
    let (state, _) = update(state, Msg::EmployeeSelected(Employee::empty()));
    let (state, _) = update(
        state,
        Msg::EmployeeTransactionsLoaded {
            request: effects[0].request(),
            result: Ok(vec![txn("bob-1")]),
        },
    );

    assert_eq!(state.filtered().data(), None);
    assert_eq!(state.view().transactions.ids(), vec!["t1", "t2"]);
}

#[test]
fn filtering_drops_in_flight_page_but_keeps_cursor() {
    init_logging();
    let state = loaded(&["t1", "t2"], Some("p2"));
    let (state, effects) = update(state, Msg::LoadMoreClicked);
    let stale_page = page_request(&effects);

    let (state, _) = update(state, Msg::EmployeeSelected(employee("bob")));
    assert!(!state.paginated().loading());

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request: stale_page,
            result: Ok(page(&["t3"], None)),
        },
    );
    let (state, effects) = update(state, Msg::EmployeeSelected(Employee::empty()));
    assert!(effects.is_empty());
    assert_eq!(state.view().transactions.ids(), vec!["t1", "t2"]);
    assert_eq!(
        state.paginated().cursor(),
        &PageCursor::Next(Cursor::new("p2"))
    );
    assert!(state.view().load_more.enabled);
}

#[test]
fn first_page_superseded_by_filter_is_requested_again_on_clear() {
    init_logging();
    let (state, _) = mounted();
    let (state, _) = update(state, Msg::EmployeeSelected(employee("bob")));

    let (state, effects) = update(state, Msg::EmployeeSelected(Employee::empty()));
    assert_eq!(
        effects,
        vec![Effect::FetchTransactionsPage {
            request: 4,
            cursor: None,
        }]
    );
    assert!(state.paginated().loading());
}

#[test]
fn load_more_is_disabled_while_filtered_fetch_is_in_flight() {
    init_logging();
    let state = loaded(&["t1"], Some("p2"));
    let (state, _) = update(state, Msg::EmployeeSelected(employee("bob")));

    let (state, effects) = update(state, Msg::LoadMoreClicked);
    assert!(effects.is_empty());
    assert!(!state.paginated().loading());
}

#[test]
fn failure_of_superseded_page_does_not_reach_error_slot() {
    init_logging();
    let state = loaded(&["t1", "t2"], Some("p2"));
    let (state, effects) = update(state, Msg::LoadMoreClicked);
    let dropped_page = page_request(&effects);
    let (mut state, _) = update(state, Msg::EmployeeSelected(employee("bob")));
    assert!(state.consume_dirty());

    let (mut state, _) = update(
        state,
        Msg::ErrorReported {
            request: dropped_page,
            message: "Failed to load transactions page: timeout".to_string(),
        },
    );
    assert_eq!(state.error(), None);
    assert!(!state.consume_dirty());

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request: dropped_page,
            result: Err(FetchFailure::new("timeout")),
        },
    );
    let (state, _) = update(state, Msg::EmployeeSelected(Employee::empty()));
    let view = state.view();
    assert_eq!(view.error, None);
    assert!(view.load_more.enabled);
}

#[test]
fn failure_of_pending_request_sets_error_slot() {
    init_logging();
    let state = loaded(&["t1"], Some("p2"));
    let (state, effects) = update(state, Msg::EmployeeSelected(employee("bob")));

    let (state, _) = update(
        state,
        Msg::ErrorReported {
            request: effects[0].request(),
            message: "Failed to load transactions by employee: timeout".to_string(),
        },
    );
    assert_eq!(
        state.error(),
        Some("Failed to load transactions by employee: timeout")
    );
}
