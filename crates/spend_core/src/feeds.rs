//! Feed states: one cached, independently loadable slice of data each.
//!
//! Every feed tracks at most one pending request. `loading` is derived from
//! that pending id, so it is set exactly while a fetch the feed still cares
//! about is in flight, and cleared by completion, invalidation or
//! supersession alike. Completions whose id does not match the pending one
//! are reported as [`Completion::Stale`] and leave the feed untouched.

use std::collections::HashSet;

use crate::{Cursor, Employee, FetchFailure, Page, RequestId, Transaction};

/// Outcome of handing a fetch result to a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The result was current and has been stored.
    Applied,
    /// The result was current but failed; previously stored data is kept.
    Failed(FetchFailure),
    /// The result belongs to a request the feed no longer waits for.
    Stale,
}

fn accept(pending: &mut Option<RequestId>, request: RequestId) -> bool {
    if *pending == Some(request) {
        *pending = None;
        true
    } else {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmployeeDirectory {
    data: Option<Vec<Employee>>,
    pending: Option<RequestId>,
}

impl EmployeeDirectory {
    pub fn data(&self) -> Option<&[Employee]> {
        self.data.as_deref()
    }

    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    /// Repeated fetches re-request the list; the stored value is replaced on success.
    pub(crate) fn begin_fetch(&mut self, request: RequestId) {
        self.pending = Some(request);
    }

    pub(crate) fn complete(
        &mut self,
        request: RequestId,
        result: Result<Vec<Employee>, FetchFailure>,
    ) -> Completion {
        if !accept(&mut self.pending, request) {
            return Completion::Stale;
        }
        match result {
            Ok(employees) => {
                self.data = Some(employees);
                Completion::Applied
            }
            Err(failure) => Completion::Failed(failure),
        }
    }
}

/// Where the paginated feed stands in the backend's page sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageCursor {
    /// Nothing fetched since creation or the last invalidation.
    #[default]
    Start,
    /// More pages exist; the token names the next one.
    Next(Cursor),
    /// The last fetched page reported no successor. Terminal until invalidated.
    Exhausted,
}

/// Transactions across all employees, accumulated page by page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaginatedTransactionFeed {
    data: Option<Vec<Transaction>>,
    cursor: PageCursor,
    pending: Option<RequestId>,
}

impl PaginatedTransactionFeed {
    pub fn data(&self) -> Option<&[Transaction]> {
        self.data.as_deref()
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    /// The caller-facing "more pages available" signal.
    pub fn has_more(&self) -> bool {
        !matches!(self.cursor, PageCursor::Exhausted)
    }

    /// True when a new page fetch would actually go to the network.
    pub fn can_fetch(&self) -> bool {
        self.has_more() && !self.loading()
    }

    /// Marks `request` as the pending page fetch and returns the cursor to send
    /// (`None` asks for the first page). Returns `None` without side effects when
    /// the feed is exhausted or already waiting on a page.
    pub(crate) fn begin_fetch(&mut self, request: RequestId) -> Option<Option<Cursor>> {
        if self.loading() {
            return None;
        }
        let cursor = match &self.cursor {
            PageCursor::Exhausted => return None,
            PageCursor::Start => None,
            PageCursor::Next(cursor) => Some(cursor.clone()),
        };
        self.pending = Some(request);
        Some(cursor)
    }

    pub(crate) fn complete(
        &mut self,
        request: RequestId,
        result: Result<Page, FetchFailure>,
    ) -> Completion {
        if !accept(&mut self.pending, request) {
            return Completion::Stale;
        }
        match result {
            Ok(page) => {
                self.append(page.data);
                self.cursor = match page.next_cursor {
                    Some(cursor) => PageCursor::Next(cursor),
                    None => PageCursor::Exhausted,
                };
                Completion::Applied
            }
            Err(failure) => Completion::Failed(failure),
        }
    }

    /// Clears accumulated data and cursor; the next fetch starts from page one.
    pub fn invalidate_data(&mut self) {
        self.data = None;
        self.cursor = PageCursor::Start;
        self.pending = None;
    }

    /// Stops waiting on the in-flight page, keeping data and cursor.
    pub(crate) fn supersede(&mut self) {
        self.pending = None;
    }

    fn append(&mut self, incoming: Vec<Transaction>) {
        let data = self.data.get_or_insert_with(Vec::new);
        let mut seen: HashSet<String> = data.iter().map(|t| t.id.clone()).collect();
        data.extend(incoming.into_iter().filter(|t| seen.insert(t.id.clone())));
    }
}

/// The complete transaction list of one employee; replaced on every fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmployeeFilteredFeed {
    data: Option<Vec<Transaction>>,
    employee_id: Option<String>,
    pending: Option<RequestId>,
}

impl EmployeeFilteredFeed {
    pub fn data(&self) -> Option<&[Transaction]> {
        self.data.as_deref()
    }

    /// Employee the stored or pending data belongs to.
    pub fn employee_id(&self) -> Option<&str> {
        self.employee_id.as_deref()
    }

    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    pub(crate) fn begin_fetch(&mut self, request: RequestId, employee_id: impl Into<String>) {
        self.employee_id = Some(employee_id.into());
        self.pending = Some(request);
    }

    pub(crate) fn complete(
        &mut self,
        request: RequestId,
        result: Result<Vec<Transaction>, FetchFailure>,
    ) -> Completion {
        if !accept(&mut self.pending, request) {
            return Completion::Stale;
        }
        match result {
            Ok(transactions) => {
                self.data = Some(transactions);
                Completion::Applied
            }
            Err(failure) => Completion::Failed(failure),
        }
    }

    pub fn invalidate_data(&mut self) {
        self.data = None;
        self.employee_id = None;
        self.pending = None;
    }
}
