use std::sync::Once;

use pretty_assertions::assert_eq;
use spend_core::{
    update, ActiveView, AppState, Cursor, Effect, Employee, FetchFailure, Msg, Page, Transaction,
    TransactionListView,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(spend_logging::initialize_for_tests);
}

fn alice() -> Employee {
    Employee::new("alice", "Alice", "Adams")
}

fn bob() -> Employee {
    Employee::new("bob", "Bob", "Brown")
}

fn txn(id: &str, employee: Employee) -> Transaction {
    Transaction {
        id: id.to_string(),
        amount: 12.5,
        employee,
        merchant: "Coffee Corner".to_string(),
        date: "2024-03-01".to_string(),
        approved: false,
    }
}

fn page(ids: &[&str], next: Option<&str>) -> Page {
    Page {
        data: ids.iter().map(|id| txn(id, alice())).collect(),
        next_cursor: next.map(Cursor::new),
    }
}

/// Scenario A: fresh session with the directory and first page loaded.
fn scenario_a() -> AppState {
    let (state, effects) = update(AppState::new(), Msg::Mounted);
    assert_eq!(effects, vec![Effect::FetchEmployees { request: 1 }]);

    let (state, effects) = update(
        state,
        Msg::EmployeesLoaded {
            request: 1,
            result: Ok(vec![alice(), bob()]),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::FetchTransactionsPage {
            request: 2,
            cursor: None,
        }]
    );

    let (state, effects) = update(
        state,
        Msg::PageLoaded {
            request: 2,
            result: Ok(page(&["t1", "t2"], Some("p2"))),
        },
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn scenario_a_first_page_is_shown_with_load_more_enabled() {
    init_logging();
    let state = scenario_a();
    let view = state.view();

    assert_eq!(view.active_view, ActiveView::Unfiltered);
    assert_eq!(view.transactions.ids(), vec!["t1", "t2"]);
    assert!(view.load_more.visible);
    assert!(view.load_more.enabled);
    assert!(!view.employees_loading);
    let labels: Vec<_> = view
        .employee_options
        .iter()
        .map(|o| o.label.as_str())
        .collect();
    assert_eq!(labels, vec!["All Employees", "Alice Adams", "Bob Brown"]);
    assert_eq!(view.employee_options[0].value, "");
}

#[test]
fn scenario_b_last_page_hides_load_more_and_further_clicks_are_noops() {
    init_logging();
    let state = scenario_a();

    let (state, effects) = update(state, Msg::LoadMoreClicked);
    assert_eq!(
        effects,
        vec![Effect::FetchTransactionsPage {
            request: 3,
            cursor: Some(Cursor::new("p2")),
        }]
    );
    assert!(!state.view().load_more.enabled);

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request: 3,
            result: Ok(page(&["t3"], None)),
        },
    );
    let view = state.view();
    assert_eq!(view.transactions.ids(), vec!["t1", "t2", "t3"]);
    assert!(!view.load_more.visible);
    assert!(!view.load_more.enabled);

    let (next, effects) = update(state.clone(), Msg::LoadMoreClicked);
    assert!(effects.is_empty());
    assert_eq!(next.paginated(), state.paginated());
}

#[test]
fn scenario_c_filter_shows_employee_transactions_only() {
    init_logging();
    let state = scenario_a();

    let (state, effects) = update(state, Msg::EmployeeSelected(bob()));
    assert_eq!(
        effects,
        vec![Effect::FetchTransactionsByEmployee {
            request: 3,
            employee_id: "bob".to_string(),
        }]
    );
    let view = state.view();
    assert_eq!(view.active_view, ActiveView::Filtered);
    assert_eq!(view.transactions, TransactionListView::Loading);
    assert!(!view.load_more.visible);

    let (state, _) = update(
        state,
        Msg::EmployeeTransactionsLoaded {
            request: 3,
            result: Ok(vec![txn("t4", bob()), txn("t5", bob())]),
        },
    );
    let view = state.view();
    assert_eq!(view.transactions.ids(), vec!["t4", "t5"]);
    assert_eq!(view.selected_employee_id, "bob");
    assert!(!view.load_more.visible);

    let stored: Vec<_> = state
        .paginated()
        .data()
        .unwrap()
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(stored, vec!["t1", "t2"]);
}

#[test]
fn scenario_d_clearing_filter_restores_paginated_view() {
    init_logging();
    let state = scenario_a();
    let before = state.paginated().clone();

    let (state, _) = update(state, Msg::EmployeeSelected(bob()));
    let (state, _) = update(
        state,
        Msg::EmployeeTransactionsLoaded {
            request: 3,
            result: Ok(vec![txn("t4", bob()), txn("t5", bob())]),
        },
    );
    let (state, effects) = update(state, Msg::EmployeeSelected(Employee::empty()));

    assert!(effects.is_empty());
    assert_eq!(state.paginated(), &before);
    assert_eq!(state.filtered().data(), None);
    let view = state.view();
    assert_eq!(view.active_view, ActiveView::Unfiltered);
    assert_eq!(view.transactions.ids(), vec!["t1", "t2"]);
    assert!(view.load_more.visible);
    assert!(view.load_more.enabled);
    assert_eq!(view.selected_employee_id, "");
}

#[test]
fn scenario_e_page_failure_keeps_data_and_disables_load_more() {
    init_logging();
    let state = scenario_a();
    let (state, _) = update(state, Msg::LoadMoreClicked);
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request: 3,
            result: Ok(page(&["t3"], Some("p3"))),
        },
    );

    let (state, effects) = update(state, Msg::LoadMoreClicked);
    assert_eq!(effects.len(), 1);
    let (state, _) = update(
        state,
        Msg::ErrorReported {
            request: 4,
            message: "http status 500".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request: 4,
            result: Err(FetchFailure::new("http status 500")),
        },
    );

    let view = state.view();
    assert_eq!(view.transactions.ids(), vec!["t1", "t2", "t3"]);
    assert!(view.load_more.visible);
    assert!(!view.load_more.enabled);
    assert_eq!(view.error.as_deref(), Some("http status 500"));
    assert!(!state.paginated().loading());

    let (state, effects) = update(state, Msg::LoadMoreClicked);
    assert!(effects.is_empty());

    // Re-armed by going through the sentinel.
    let (state, _) = update(state, Msg::EmployeeSelected(bob()));
    let (state, _) = update(state, Msg::EmployeeSelected(Employee::empty()));
    assert!(state.view().load_more.enabled);
    let (_state, effects) = update(state, Msg::LoadMoreClicked);
    assert_eq!(
        effects,
        vec![Effect::FetchTransactionsPage {
            request: 6,
            cursor: Some(Cursor::new("p3")),
        }]
    );
}

#[test]
fn error_slot_is_last_writer_wins_and_dismissable() {
    init_logging();
    // Directory (request 1) and Bob's transactions (request 2) both in flight.
    let (state, _) = update(AppState::new(), Msg::Mounted);
    let (state, _) = update(state, Msg::EmployeeSelected(bob()));
    let (state, _) = update(
        state,
        Msg::ErrorReported {
            request: 1,
            message: "first".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::ErrorReported {
            request: 2,
            message: "second".to_string(),
        },
    );
    assert_eq!(state.error(), Some("second"));

    let (mut state, _) = update(state, Msg::ErrorDismissed);
    assert_eq!(state.view().error, None);
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::ErrorDismissed);
    assert!(!state.consume_dirty());
}
