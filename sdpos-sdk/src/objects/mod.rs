//! Request and response types for the partner API.
//!
//! Wire types keep the partner's snake_case field names. The dashboard-facing
//! [`NormalizedTransaction`](transactions::NormalizedTransaction) uses
//! camelCase.

pub mod export;
pub mod health;
pub mod machines;
pub mod transactions;

pub use export::{
    ExportFormat, ExportJob, ExportJobCreated, ExportJobResponse, ExportOutcome, ExportRequest,
    ExportStatus, ExportStatusResponse, UnknownExportFormat,
};
pub use health::HealthResponse;
pub use machines::{Machine, MachineQuery, MachineStatus, MachinesResponse};
pub use transactions::{
    NormalizedTransaction, PaymentMethod, RawTransaction, TransactionQuery, TransactionStatus,
    TransactionSummary, TransactionsResponse,
};

/// Treat empty strings as absent, the way the partner's optional filters do.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
