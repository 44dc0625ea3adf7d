pub mod config;
pub mod contracts;

pub use config::ServiceConfig;
pub use contracts::{
    AllocateRequest, AllocationResponse, KitPriceRequest, RawLineItem, RowAddedResponse,
    RowEditRequest, WorksheetResponse, raw_text,
};
