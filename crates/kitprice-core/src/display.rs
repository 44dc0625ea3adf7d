use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::allocation::{Allocation, AllocationReport, BalanceStatus};
use crate::models::LineItemId;

pub const NO_PART_LABEL: &str = "(no part)";

/// Formats an amount as dollars with two decimals and thousands separators.
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

pub fn balance_note(status: &BalanceStatus) -> String {
    match status {
        BalanceStatus::Balanced => "Amounts are balanced".to_string(),
        BalanceStatus::Unbalanced { difference } => format!(
            "Allocated total differs from kit price by {}",
            format_currency(*difference)
        ),
    }
}

pub fn part_label(part_number: &str) -> &str {
    if part_number.trim().is_empty() {
        NO_PART_LABEL
    } else {
        part_number
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryView {
    pub total_list_value: String,
    pub kit_price: String,
    pub allocated_total: String,
    pub refund_total: String,
    pub balanced: bool,
    pub balance_note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineView {
    pub id: LineItemId,
    pub label: String,
    pub quantity: u32,
    pub unit_list_price: String,
    pub extended_list_price: String,
    pub unit_allocated_price: String,
    pub extended_allocated_price: String,
    pub refunded: bool,
}

/// Display strings for a whole report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportView {
    pub summary: SummaryView,
    pub lines: Vec<LineView>,
}

impl From<&Allocation> for LineView {
    fn from(allocation: &Allocation) -> Self {
        Self {
            id: allocation.id,
            label: part_label(&allocation.part_number).to_string(),
            quantity: allocation.quantity.get(),
            unit_list_price: format_currency(allocation.unit_list_price),
            extended_list_price: format_currency(allocation.extended_list_price),
            unit_allocated_price: format_currency(allocation.unit_allocated_price),
            extended_allocated_price: format_currency(allocation.extended_allocated_price),
            refunded: allocation.refunded,
        }
    }
}

impl From<&AllocationReport> for ReportView {
    fn from(report: &AllocationReport) -> Self {
        let summary = &report.summary;
        Self {
            summary: SummaryView {
                total_list_value: format_currency(summary.total_list_value),
                kit_price: format_currency(summary.kit_price),
                allocated_total: format_currency(summary.allocated_total),
                refund_total: format_currency(summary.refund_total),
                balanced: summary.balanced,
                balance_note: balance_note(&report.balance()),
            },
            lines: report.allocations.iter().map(LineView::from).collect(),
        }
    }
}
