use chrono::{DateTime, Utc};
use kitprice_core::{
    AllocationReport, Amount, LineItem, LineItemId, ReportView, RowEdit, Worksheet,
    normalize_amount, normalize_quantity, normalize_refunded,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Renders a loosely typed JSON field as the text a user would have typed.
///
/// Numbers and strings keep their literal text; `null`, arrays and objects
/// read as empty input.
pub fn raw_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn optional_raw_text(value: &Option<Value>) -> String {
    value.as_ref().map(raw_text).unwrap_or_default()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLineItem {
    pub id: Option<Uuid>,
    #[serde(default)]
    pub part_number: String,
    pub quantity: Option<Value>,
    pub unit_list_price: Option<Value>,
    pub refunded: Option<Value>,
}

impl RawLineItem {
    pub fn into_line_item(self) -> LineItem {
        let mut item = LineItem::new(
            self.part_number,
            normalize_quantity(&optional_raw_text(&self.quantity)),
            normalize_amount(&optional_raw_text(&self.unit_list_price)),
            normalize_refunded(&optional_raw_text(&self.refunded)),
        );
        if let Some(id) = self.id {
            item.id = LineItemId::from(id);
        }
        item
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocateRequest {
    #[serde(default)]
    pub items: Vec<RawLineItem>,
    pub kit_price: Option<Value>,
}

impl AllocateRequest {
    pub fn normalize(self) -> (Vec<LineItem>, Amount) {
        let kit_price = normalize_amount(&optional_raw_text(&self.kit_price));
        let items = self
            .items
            .into_iter()
            .map(RawLineItem::into_line_item)
            .collect();
        (items, kit_price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationResponse {
    pub generated_at: DateTime<Utc>,
    pub items: Vec<LineItem>,
    pub report: AllocationReport,
    pub view: ReportView,
}

impl AllocationResponse {
    pub fn new(items: Vec<LineItem>, report: AllocationReport) -> Self {
        let view = ReportView::from(&report);
        Self {
            generated_at: Utc::now(),
            items,
            report,
            view,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KitPriceRequest {
    pub kit_price: Option<Value>,
}

impl KitPriceRequest {
    pub fn raw(&self) -> String {
        optional_raw_text(&self.kit_price)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowEditRequest {
    pub part_number: Option<String>,
    pub quantity: Option<Value>,
    pub unit_list_price: Option<Value>,
    pub refunded: Option<Value>,
}

impl From<RowEditRequest> for RowEdit {
    fn from(request: RowEditRequest) -> Self {
        RowEdit {
            part_number: request.part_number,
            quantity: request.quantity.as_ref().map(raw_text),
            unit_list_price: request.unit_list_price.as_ref().map(raw_text),
            refunded: request.refunded.as_ref().map(raw_text),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorksheetResponse {
    pub worksheet_id: Uuid,
    pub kit_price: Amount,
    pub rows: Vec<LineItem>,
    pub max_rows: usize,
    pub report: AllocationReport,
    pub view: ReportView,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Worksheet> for WorksheetResponse {
    fn from(worksheet: &Worksheet) -> Self {
        let report = worksheet.calculate();
        let view = ReportView::from(&report);
        Self {
            worksheet_id: worksheet.id,
            kit_price: worksheet.kit_price,
            rows: worksheet.rows.clone(),
            max_rows: worksheet.max_rows,
            report,
            view,
            created_at: worksheet.created_at,
            updated_at: worksheet.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowAddedResponse {
    pub row_id: LineItemId,
    pub worksheet: WorksheetResponse,
}
