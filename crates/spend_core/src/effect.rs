use crate::{Cursor, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchEmployees {
        request: RequestId,
    },
    /// `cursor == None` asks for the first page.
    FetchTransactionsPage {
        request: RequestId,
        cursor: Option<Cursor>,
    },
    FetchTransactionsByEmployee {
        request: RequestId,
        employee_id: String,
    },
}

impl Effect {
    pub fn request(&self) -> RequestId {
        match self {
            Effect::FetchEmployees { request }
            | Effect::FetchTransactionsPage { request, .. }
            | Effect::FetchTransactionsByEmployee { request, .. } => *request,
        }
    }
}
