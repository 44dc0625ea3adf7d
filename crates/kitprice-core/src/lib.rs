pub mod allocation;
pub mod display;
pub mod models;
pub mod normalize;
pub mod storage;
pub mod worksheet;

pub use allocation::{
    Allocation, AllocationReport, AllocationSummary, BALANCE_TOLERANCE, BalanceStatus, allocate,
};
pub use display::{LineView, ReportView, SummaryView, balance_note, format_currency};
pub use models::{Amount, LineItem, LineItemId, MAX_AMOUNT, MAX_QUANTITY, Quantity};
pub use normalize::{normalize_amount, normalize_quantity, normalize_refunded};
pub use storage::{StoreError, WorksheetEdit, WorksheetStore, worksheet_edit};
pub use worksheet::{DEFAULT_ROW_COUNT, RowEdit, Worksheet, WorksheetError};
