use crate::{ActiveView, Transaction};

pub const EMPLOYEES_LOADING_LABEL: &str = "Loading employees...";
pub const TRANSACTIONS_LOADING_LABEL: &str = "Loading...";
pub const TRANSACTIONS_UNAVAILABLE_LABEL: &str = "Could not load transactions.";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub active_view: ActiveView,
    /// Selector entries, sentinel first. Empty until the directory has loaded.
    pub employee_options: Vec<EmployeeOption>,
    pub employees_loading: bool,
    /// Empty string while no filter is applied.
    pub selected_employee_id: String,
    pub transactions: TransactionListView,
    pub load_more: LoadMoreView,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TransactionListView {
    /// A fetch that will fill the active list is pending.
    #[default]
    Loading,
    /// The active feed settled without data; its last fetch failed.
    Unavailable,
    Rows(Vec<TransactionRowView>),
}

impl TransactionListView {
    pub fn ids(&self) -> Vec<&str> {
        match self {
            TransactionListView::Loading | TransactionListView::Unavailable => Vec::new(),
            TransactionListView::Rows(rows) => rows.iter().map(|row| row.id.as_str()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRowView {
    pub id: String,
    pub merchant: String,
    pub employee_name: String,
    pub amount: f64,
    pub date: String,
    pub approved: bool,
}

impl From<&Transaction> for TransactionRowView {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id.clone(),
            merchant: transaction.merchant.clone(),
            employee_name: transaction.employee.full_name(),
            amount: transaction.amount,
            date: transaction.date.clone(),
            approved: transaction.approved,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadMoreView {
    pub visible: bool,
    pub enabled: bool,
}
