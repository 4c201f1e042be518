use crate::feeds::{Completion, EmployeeDirectory, EmployeeFilteredFeed, PaginatedTransactionFeed};
use crate::view_model::{
    AppViewModel, EmployeeOption, LoadMoreView, TransactionListView, TransactionRowView,
};
use crate::{Effect, Employee, FetchFailure, Page, RequestId, Transaction};

/// Which feed is authoritative for the rendered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    /// The paginated all-employees feed.
    #[default]
    Unfiltered,
    /// The single-employee feed.
    Filtered,
}

/// Reconciler state. Owns all three feeds; it is the only place that
/// invalidates either transaction feed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    directory: EmployeeDirectory,
    paginated: PaginatedTransactionFeed,
    filtered: EmployeeFilteredFeed,
    selected_employee: Option<Employee>,
    load_more_disabled_by_error: bool,
    error: Option<String>,
    last_request_id: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directory(&self) -> &EmployeeDirectory {
        &self.directory
    }

    pub fn paginated(&self) -> &PaginatedTransactionFeed {
        &self.paginated
    }

    pub fn filtered(&self) -> &EmployeeFilteredFeed {
        &self.filtered
    }

    pub fn selected_employee(&self) -> Option<&Employee> {
        self.selected_employee.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn active_view(&self) -> ActiveView {
        match self.selected_employee {
            Some(_) => ActiveView::Filtered,
            None => ActiveView::Unfiltered,
        }
    }

    /// Data of the authoritative feed; `None` while it has nothing to show.
    pub fn active_transactions(&self) -> Option<&[Transaction]> {
        match self.active_view() {
            ActiveView::Unfiltered => self.paginated.data(),
            ActiveView::Filtered => self.filtered.data(),
        }
    }

    pub fn any_loading(&self) -> bool {
        self.directory.loading() || self.paginated.loading() || self.filtered.loading()
    }

    pub fn load_more_visible(&self) -> bool {
        self.active_view() == ActiveView::Unfiltered
            && self.paginated.data().is_some()
            && self.paginated.has_more()
    }

    /// `Unfiltered ∧ ¬exhausted ∧ ¬loading ∧ ¬disabled-by-error`.
    pub fn can_load_more(&self) -> bool {
        self.load_more_visible() && !self.any_loading() && !self.load_more_disabled_by_error
    }

    pub fn view(&self) -> AppViewModel {
        let employee_options = match self.directory.data() {
            Some(employees) => std::iter::once(Employee::empty())
                .chain(employees.iter().cloned())
                .map(|employee| EmployeeOption {
                    label: employee.full_name(),
                    value: employee.id,
                })
                .collect(),
            None => Vec::new(),
        };

        let transactions = match self.active_transactions() {
            Some(rows) => {
                TransactionListView::Rows(rows.iter().map(TransactionRowView::from).collect())
            }
            None if self.active_feed_settled() => TransactionListView::Unavailable,
            None => TransactionListView::Loading,
        };

        AppViewModel {
            active_view: self.active_view(),
            employee_options,
            employees_loading: self.directory.loading(),
            selected_employee_id: self
                .selected_employee
                .as_ref()
                .map(|employee| employee.id.clone())
                .unwrap_or_default(),
            transactions,
            load_more: LoadMoreView {
                visible: self.load_more_visible(),
                enabled: self.can_load_more(),
            },
            error: self.error.clone(),
        }
    }

    /// True once nothing in flight can still fill the active list.
    fn active_feed_settled(&self) -> bool {
        match self.active_view() {
            ActiveView::Filtered => !self.filtered.loading(),
            ActiveView::Unfiltered => {
                self.last_request_id > 0 && !self.paginated.loading() && !self.directory.loading()
            }
        }
    }

    /// Whether some feed still waits for `request`.
    fn tracks(&self, request: RequestId) -> bool {
        [
            self.directory.pending(),
            self.paginated.pending(),
            self.filtered.pending(),
        ]
        .contains(&Some(request))
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn allocate_request(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.last_request_id
    }

    /// Directory first; the first page follows once the directory completes.
    pub(crate) fn start_initial_load(&mut self) -> Option<Effect> {
        if self.directory.data().is_some() || self.directory.loading() {
            return None;
        }
        self.filtered.invalidate_data();
        let request = self.allocate_request();
        self.directory.begin_fetch(request);
        self.mark_dirty();
        Some(Effect::FetchEmployees { request })
    }

    pub(crate) fn select_employee(&mut self, employee: Employee) -> Option<Effect> {
        if employee.is_empty_sentinel() {
            self.clear_filter()
        } else {
            Some(self.apply_filter(employee))
        }
    }

    /// Hides the paginated feed (dropping any in-flight page) before the
    /// filtered fetch is issued. Both happen in one update.
    fn apply_filter(&mut self, employee: Employee) -> Effect {
        self.paginated.supersede();
        self.filtered.invalidate_data();
        let request = self.allocate_request();
        self.filtered.begin_fetch(request, employee.id.clone());
        let employee_id = employee.id.clone();
        self.selected_employee = Some(employee);
        self.mark_dirty();
        Effect::FetchTransactionsByEmployee {
            request,
            employee_id,
        }
    }

    /// Returns to the accumulated paginated data without resetting it. Also re-arms
    /// load-more after a page failure.
    fn clear_filter(&mut self) -> Option<Effect> {
        self.filtered.invalidate_data();
        self.selected_employee = None;
        self.load_more_disabled_by_error = false;
        self.mark_dirty();

        // A first page superseded by an earlier filter has to be requested again.
        if self.paginated.data().is_none() && !self.directory.loading() {
            self.fetch_next_page()
        } else {
            None
        }
    }

    pub(crate) fn load_more(&mut self) -> Option<Effect> {
        if !self.can_load_more() {
            return None;
        }
        self.fetch_next_page()
    }

    fn fetch_next_page(&mut self) -> Option<Effect> {
        if !self.paginated.can_fetch() {
            return None;
        }
        let request = self.allocate_request();
        let cursor = self.paginated.begin_fetch(request)?;
        self.mark_dirty();
        Some(Effect::FetchTransactionsPage { request, cursor })
    }

    pub(crate) fn apply_employees(
        &mut self,
        request: RequestId,
        result: Result<Vec<Employee>, FetchFailure>,
    ) -> Option<Effect> {
        if self.directory.complete(request, result) == Completion::Stale {
            return None;
        }
        self.mark_dirty();
        // Sequenced after completion, not after success: a failed directory
        // still leaves the transaction list usable.
        match self.active_view() {
            ActiveView::Unfiltered if self.paginated.data().is_none() => self.fetch_next_page(),
            _ => None,
        }
    }

    pub(crate) fn apply_page(&mut self, request: RequestId, result: Result<Page, FetchFailure>) {
        match self.paginated.complete(request, result) {
            Completion::Stale => {}
            Completion::Applied => self.mark_dirty(),
            Completion::Failed(_) => {
                self.load_more_disabled_by_error = true;
                self.mark_dirty();
            }
        }
    }

    pub(crate) fn apply_employee_transactions(
        &mut self,
        request: RequestId,
        result: Result<Vec<Transaction>, FetchFailure>,
    ) {
        if self.filtered.complete(request, result) != Completion::Stale {
            self.mark_dirty();
        }
    }

    /// Reports arrive ahead of their request's completion. Failures of
    /// superseded or invalidated requests are dropped.
    pub(crate) fn report_error(&mut self, request: RequestId, message: String) {
        if !self.tracks(request) {
            return;
        }
        self.error = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn dismiss_error(&mut self) {
        if self.error.take().is_some() {
            self.mark_dirty();
        }
    }
}
