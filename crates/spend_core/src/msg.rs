use crate::{Employee, FetchFailure, Page, RequestId, Transaction};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The view was shown; starts the initial load if nothing is loaded yet.
    Mounted,
    /// User picked an entry in the employee selector. The empty sentinel clears the filter.
    EmployeeSelected(Employee),
    /// User clicked "load more".
    LoadMoreClicked,
    /// Engine completion for the employee directory.
    EmployeesLoaded {
        request: RequestId,
        result: Result<Vec<Employee>, FetchFailure>,
    },
    /// Engine completion for one page of the all-employees listing.
    PageLoaded {
        request: RequestId,
        result: Result<Page, FetchFailure>,
    },
    /// Engine completion for one employee's transactions.
    EmployeeTransactionsLoaded {
        request: RequestId,
        result: Result<Vec<Transaction>, FetchFailure>,
    },
    /// The error reporter recorded a final fetch failure of `request`.
    ErrorReported { request: RequestId, message: String },
    /// User dismissed the error banner.
    ErrorDismissed,
}
