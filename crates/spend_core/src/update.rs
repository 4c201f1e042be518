use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effect = match msg {
        Msg::Mounted => state.start_initial_load(),
        Msg::EmployeeSelected(employee) => state.select_employee(employee),
        Msg::LoadMoreClicked => state.load_more(),
        Msg::EmployeesLoaded { request, result } => state.apply_employees(request, result),
        Msg::PageLoaded { request, result } => {
            state.apply_page(request, result);
            None
        }
        Msg::EmployeeTransactionsLoaded { request, result } => {
            state.apply_employee_transactions(request, result);
            None
        }
        Msg::ErrorReported { request, message } => {
            state.report_error(request, message);
            None
        }
        Msg::ErrorDismissed => {
            state.dismiss_error();
            None
        }
    };

    (state, effect.into_iter().collect())
}
