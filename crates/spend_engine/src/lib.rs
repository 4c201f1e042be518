//! Spend engine: backend access, request gating and effect execution.
mod backend;
mod engine;
mod gate;
mod types;

pub use backend::{Backend, BackendSettings, ReqwestBackend};
pub use engine::{EngineConfig, EngineHandle};
pub use gate::{ErrorReporter, RequestGate, RetryPolicy};
pub use types::{
    EmployeeRecord, EngineEvent, FailureKind, FeedKind, FetchError, PageRecord, RequestId,
    TransactionRecord,
};
