use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::allocation::{AllocationReport, allocate};
use crate::models::{Amount, LineItem, LineItemId};
use crate::normalize::{normalize_amount, normalize_quantity, normalize_refunded};

pub const DEFAULT_ROW_COUNT: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorksheetError {
    #[error("row {0} not found")]
    RowNotFound(LineItemId),
    #[error("worksheet already holds the maximum of {0} rows")]
    RowLimitReached(usize),
}

/// Raw field edits for a single row. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowEdit {
    pub part_number: Option<String>,
    pub quantity: Option<String>,
    pub unit_list_price: Option<String>,
    pub refunded: Option<String>,
}

impl RowEdit {
    fn apply(self, row: &mut LineItem) {
        if let Some(part_number) = self.part_number {
            row.part_number = part_number;
        }
        if let Some(quantity) = self.quantity {
            row.quantity = normalize_quantity(&quantity);
        }
        if let Some(price) = self.unit_list_price {
            row.unit_list_price = normalize_amount(&price);
        }
        if let Some(refunded) = self.refunded {
            row.refunded = normalize_refunded(&refunded);
        }
    }
}

/// An editable set of rows and a kit price.
///
/// Calculations read a borrowed snapshot and never hold on to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worksheet {
    pub id: Uuid,
    pub rows: Vec<LineItem>,
    pub kit_price: Amount,
    /// Blank rows seeded on creation and on reset.
    pub default_rows: usize,
    pub max_rows: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Worksheet {
    /// `max_rows` is raised to `default_rows` if smaller.
    pub fn new(default_rows: usize, max_rows: usize) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            rows: blank_rows(default_rows),
            kit_price: Amount::ZERO,
            default_rows,
            max_rows: max_rows.max(default_rows),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_row(&mut self) -> Result<LineItemId, WorksheetError> {
        if self.rows.len() >= self.max_rows {
            return Err(WorksheetError::RowLimitReached(self.max_rows));
        }

        let row = LineItem::blank();
        let id = row.id;
        self.rows.push(row);
        self.touch();
        Ok(id)
    }

    pub fn remove_row(&mut self, id: LineItemId) -> Result<LineItem, WorksheetError> {
        let index = self
            .rows
            .iter()
            .position(|row| row.id == id)
            .ok_or(WorksheetError::RowNotFound(id))?;

        let removed = self.rows.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Replaces every row with fresh blank rows. The kit price is kept.
    pub fn reset(&mut self) {
        self.rows = blank_rows(self.default_rows);
        self.touch();
    }

    pub fn edit_row(&mut self, id: LineItemId, edit: RowEdit) -> Result<&LineItem, WorksheetError> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(WorksheetError::RowNotFound(id))?;

        edit.apply(row);
        self.updated_at = Utc::now();
        Ok(row)
    }

    pub fn set_kit_price(&mut self, raw: &str) -> Amount {
        self.kit_price = normalize_amount(raw);
        self.touch();
        self.kit_price
    }

    pub fn calculate(&self) -> AllocationReport {
        allocate(&self.rows, self.kit_price)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Worksheet {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_COUNT, usize::MAX)
    }
}

fn blank_rows(count: usize) -> Vec<LineItem> {
    (0..count).map(|_| LineItem::blank()).collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn edit(quantity: &str, price: &str) -> RowEdit {
        RowEdit {
            quantity: Some(quantity.to_string()),
            unit_list_price: Some(price.to_string()),
            ..RowEdit::default()
        }
    }

    #[test]
    fn starts_with_default_blank_rows() {
        let sheet = Worksheet::default();
        assert_eq!(sheet.rows.len(), DEFAULT_ROW_COUNT);
        assert!(sheet.kit_price.is_zero());
        assert!(sheet.rows.iter().all(|row| row.part_number.is_empty()));
    }

    #[test]
    fn edits_are_normalized() {
        let mut sheet = Worksheet::new(1, 10);
        let id = sheet.rows[0].id;

        let row = sheet.edit_row(id, edit("-5", "-10")).unwrap();
        assert_eq!(row.quantity.get(), 1);
        assert!(row.unit_list_price.is_zero());

        let row = sheet
            .edit_row(
                id,
                RowEdit {
                    part_number: Some("AB-1".to_string()),
                    refunded: Some("true".to_string()),
                    ..edit("3", "12.50")
                },
            )
            .unwrap();
        assert_eq!(row.part_number, "AB-1");
        assert_eq!(row.quantity.get(), 3);
        assert_eq!(row.unit_list_price.get(), Decimal::new(1250, 2));
        assert!(row.refunded);
    }

    #[test]
    fn partial_edit_keeps_other_fields() {
        let mut sheet = Worksheet::new(1, 10);
        let id = sheet.rows[0].id;
        sheet.edit_row(id, edit("4", "2")).unwrap();

        let row = sheet
            .edit_row(
                id,
                RowEdit {
                    part_number: Some("X".to_string()),
                    ..RowEdit::default()
                },
            )
            .unwrap();
        assert_eq!(row.quantity.get(), 4);
        assert_eq!(row.unit_list_price.get(), Decimal::from(2));
    }

    #[test]
    fn removing_unknown_row_fails() {
        let mut sheet = Worksheet::new(2, 10);
        let missing = LineItemId::new();
        assert_eq!(
            sheet.remove_row(missing),
            Err(WorksheetError::RowNotFound(missing))
        );
        assert_eq!(sheet.rows.len(), 2);
    }

    #[test]
    fn add_and_remove_rows() {
        let mut sheet = Worksheet::new(0, 2);
        let first = sheet.add_row().unwrap();
        let second = sheet.add_row().unwrap();
        assert_ne!(first, second);
        assert_eq!(sheet.add_row(), Err(WorksheetError::RowLimitReached(2)));

        let removed = sheet.remove_row(first).unwrap();
        assert_eq!(removed.id, first);
        assert_eq!(sheet.rows.len(), 1);
        assert!(sheet.rows.iter().all(|row| row.id != first));
        assert_eq!(sheet.rows[0].id, second);
    }

    #[test]
    fn reset_issues_fresh_ids_and_keeps_kit_price() {
        let mut sheet = Worksheet::new(3, 10);
        sheet.set_kit_price("99");
        let before: Vec<_> = sheet.rows.iter().map(|row| row.id).collect();

        sheet.add_row().unwrap();
        sheet.reset();

        assert_eq!(sheet.rows.len(), 3);
        assert!(sheet.rows.iter().all(|row| !before.contains(&row.id)));
        assert_eq!(sheet.kit_price.get(), Decimal::from(99));
    }

    #[test]
    fn calculate_reflects_current_rows() {
        let mut sheet = Worksheet::new(2, 10);
        let ids: Vec<_> = sheet.rows.iter().map(|row| row.id).collect();
        sheet.edit_row(ids[0], edit("1", "100")).unwrap();
        sheet.edit_row(ids[1], edit("1", "300")).unwrap();
        sheet.set_kit_price("200.00");

        let report = sheet.calculate();
        assert_eq!(report.summary.total_list_value, Decimal::from(400));
        assert_eq!(report.allocations[0].extended_allocated_price, Decimal::from(50));
        assert!(report.summary.balanced);
    }

    #[test]
    fn invalid_kit_price_becomes_zero() {
        let mut sheet = Worksheet::new(1, 10);
        assert!(sheet.set_kit_price("twelve").is_zero());
        assert!(sheet.set_kit_price("-4").is_zero());
        assert_eq!(sheet.set_kit_price("$1,000").get(), Decimal::from(1000));
    }
}
