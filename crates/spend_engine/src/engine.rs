use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use spend_logging::{spend_debug, spend_info};
use tokio::sync::mpsc as async_mpsc;

use crate::gate::{ErrorReporter, RequestGate, RetryPolicy};
use crate::{Backend, EngineEvent, FeedKind, RequestId};

enum EngineCommand {
    FetchEmployees {
        request: RequestId,
    },
    FetchTransactionsPage {
        request: RequestId,
        cursor: Option<String>,
    },
    FetchTransactionsByEmployee {
        request: RequestId,
        employee_id: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub retry_policy: RetryPolicy,
}

struct Gates {
    employees: RequestGate,
    page: RequestGate,
    by_employee: RequestGate,
}

impl Gates {
    fn new(policy: RetryPolicy, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            employees: RequestGate::new(FeedKind::Employees, policy, reporter.clone()),
            page: RequestGate::new(FeedKind::TransactionsPage, policy, reporter.clone()),
            by_employee: RequestGate::new(FeedKind::TransactionsByEmployee, policy, reporter),
        }
    }

    fn get(&self, feed: FeedKind) -> &RequestGate {
        match feed {
            FeedKind::Employees => &self.employees,
            FeedKind::TransactionsPage => &self.page,
            FeedKind::TransactionsByEmployee => &self.by_employee,
        }
    }
}

/// Runs fetches on a dedicated single-threaded runtime. Requests interleave
/// cooperatively and are never cancelled; every request yields exactly one
/// [`EngineEvent`].
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    gates: Arc<Gates>,
}

impl EngineHandle {
    pub fn new(
        backend: Arc<dyn Backend>,
        config: EngineConfig,
        reporter: Arc<dyn ErrorReporter>,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, mut cmd_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        let gates = Arc::new(Gates::new(config.retry_policy, reporter));

        let worker_gates = gates.clone();
        thread::Builder::new()
            .name("spend-engine".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    while let Some(command) = cmd_rx.recv().await {
                        let backend = backend.clone();
                        let gates = worker_gates.clone();
                        let event_tx = event_tx.clone();
                        tokio::spawn(async move {
                            handle_command(backend.as_ref(), &gates, command, event_tx).await;
                        });
                    }
                    spend_debug!("engine command channel closed");
                });
            })?;

        Ok(Self {
            cmd_tx,
            event_rx,
            gates,
        })
    }

    pub fn fetch_employees(&self, request: RequestId) {
        let _ = self.cmd_tx.send(EngineCommand::FetchEmployees { request });
    }

    pub fn fetch_transactions_page(&self, request: RequestId, cursor: Option<String>) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::FetchTransactionsPage { request, cursor });
    }

    pub fn fetch_transactions_by_employee(
        &self,
        request: RequestId,
        employee_id: impl Into<String>,
    ) {
        let _ = self.cmd_tx.send(EngineCommand::FetchTransactionsByEmployee {
            request,
            employee_id: employee_id.into(),
        });
    }

    pub fn is_loading(&self, feed: FeedKind) -> bool {
        self.gates.get(feed).loading()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    backend: &dyn Backend,
    gates: &Gates,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::FetchEmployees { request } => {
            spend_info!("request #{} fetching employees", request);
            let result = gates.employees.run(request, || backend.employees()).await;
            if let Ok(employees) = &result {
                spend_info!("request #{} loaded {} employees", request, employees.len());
            }
            EngineEvent::EmployeesFetched { request, result }
        }
        EngineCommand::FetchTransactionsPage { request, cursor } => {
            spend_info!("request #{} fetching transactions page cursor={:?}", request, cursor);
            let result = gates
                .page
                .run(request, || backend.transactions_page(cursor.as_deref()))
                .await;
            if let Ok(page) = &result {
                spend_info!(
                    "request #{} loaded {} transactions, next cursor {:?}",
                    request,
                    page.data.len(),
                    page.next_cursor
                );
            }
            EngineEvent::PageFetched { request, result }
        }
        EngineCommand::FetchTransactionsByEmployee {
            request,
            employee_id,
        } => {
            spend_info!(
                "request #{} fetching transactions for employee {}",
                request,
                employee_id
            );
            let result = gates
                .by_employee
                .run(request, || backend.transactions_by_employee(&employee_id))
                .await;
            if let Ok(transactions) = &result {
                spend_info!(
                    "request #{} loaded {} transactions for employee {}",
                    request,
                    transactions.len(),
                    employee_id
                );
            }
            EngineEvent::EmployeeTransactionsFetched { request, result }
        }
    };
    let _ = event_tx.send(event);
}
