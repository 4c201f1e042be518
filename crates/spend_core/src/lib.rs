//! Spend core: pure feed/reconciler state machine and view-model helpers.
mod effect;
mod feeds;
mod msg;
mod state;
mod types;
mod update;
mod view_model;

pub use effect::Effect;
pub use feeds::{
    Completion, EmployeeDirectory, EmployeeFilteredFeed, PageCursor, PaginatedTransactionFeed,
};
pub use msg::Msg;
pub use state::{ActiveView, AppState};
pub use types::{Cursor, Employee, FetchFailure, Page, RequestId, Transaction};
pub use update::update;
pub use view_model::{
    AppViewModel, EmployeeOption, LoadMoreView, TransactionListView, TransactionRowView,
    EMPLOYEES_LOADING_LABEL, TRANSACTIONS_LOADING_LABEL, TRANSACTIONS_UNAVAILABLE_LABEL,
};
