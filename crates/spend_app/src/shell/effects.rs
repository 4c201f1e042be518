use std::sync::{mpsc, Arc};

use anyhow::Context;
use spend_core::{Cursor, Effect, Employee, FetchFailure, Msg, Page, RequestId, Transaction};
use spend_engine::{
    BackendSettings, EmployeeRecord, EngineConfig, EngineEvent, EngineHandle, ErrorReporter,
    FeedKind, FetchError, PageRecord, ReqwestBackend, TransactionRecord,
};
use spend_logging::spend_info;

/// Turns core effects into engine requests and engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        settings: BackendSettings,
        config: EngineConfig,
        msg_tx: mpsc::Sender<Msg>,
    ) -> anyhow::Result<Self> {
        let base_url = settings.base_url.clone();
        let backend = ReqwestBackend::new(settings)
            .with_context(|| format!("invalid backend base url {base_url}"))?;
        let reporter = Arc::new(MsgErrorReporter { msg_tx });
        let engine = EngineHandle::new(Arc::new(backend), config, reporter)
            .context("failed to start the fetch runtime")?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchEmployees { request } => {
                    spend_info!("FetchEmployees request={}", request);
                    self.engine.fetch_employees(request);
                }
                Effect::FetchTransactionsPage { request, cursor } => {
                    spend_info!("FetchTransactionsPage request={} cursor={:?}", request, cursor);
                    self.engine.fetch_transactions_page(
                        request,
                        cursor.map(|c| c.as_str().to_string()),
                    );
                }
                Effect::FetchTransactionsByEmployee {
                    request,
                    employee_id,
                } => {
                    spend_info!(
                        "FetchTransactionsByEmployee request={} employee={}",
                        request,
                        employee_id
                    );
                    self.engine
                        .fetch_transactions_by_employee(request, employee_id);
                }
            }
        }
    }

    /// Drains completed engine requests without blocking.
    pub fn poll(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(map_event)
            .collect()
    }
}

/// Feeds final fetch failures into the core's error slot.
struct MsgErrorReporter {
    msg_tx: mpsc::Sender<Msg>,
}

impl ErrorReporter for MsgErrorReporter {
    fn report(&self, feed: FeedKind, request: RequestId, error: &FetchError) {
        let _ = self.msg_tx.send(Msg::ErrorReported {
            request,
            message: format!("Failed to load {feed}: {error}"),
        });
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::EmployeesFetched { request, result } => Msg::EmployeesLoaded {
            request,
            result: result
                .map(|records| records.into_iter().map(map_employee).collect())
                .map_err(map_failure),
        },
        EngineEvent::PageFetched { request, result } => Msg::PageLoaded {
            request,
            result: result.map(map_page).map_err(map_failure),
        },
        EngineEvent::EmployeeTransactionsFetched { request, result } => {
            Msg::EmployeeTransactionsLoaded {
                request,
                result: result
                    .map(|records| records.into_iter().map(map_transaction).collect())
                    .map_err(map_failure),
            }
        }
    }
}

fn map_employee(record: EmployeeRecord) -> Employee {
    Employee::new(record.id, record.first_name, record.last_name)
}

fn map_transaction(record: TransactionRecord) -> Transaction {
    Transaction {
        id: record.id,
        amount: record.amount,
        employee: map_employee(record.employee),
        merchant: record.merchant,
        date: record.date,
        approved: record.approved,
    }
}

fn map_page(record: PageRecord) -> Page {
    Page {
        data: record.data.into_iter().map(map_transaction).collect(),
        next_cursor: record.next_cursor.map(Cursor::new),
    }
}

fn map_failure(error: FetchError) -> FetchFailure {
    FetchFailure::new(error.to_string())
}
