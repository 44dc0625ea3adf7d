//! Proportional distribution of a kit price across line items.
//!
//! Each line receives the share of the kit price that its extended list
//! value contributes to the total list value. When there is no list value to
//! weigh against, every line receives zero and the missing amount shows up as
//! a negative balance difference.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Amount, LineItem, LineItemId, Quantity};

/// Differences smaller than half a cent read as balanced.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: LineItemId,
    pub part_number: String,
    pub quantity: Quantity,
    pub unit_list_price: Decimal,
    pub extended_list_price: Decimal,
    pub unit_allocated_price: Decimal,
    pub extended_allocated_price: Decimal,
    pub refunded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub total_list_value: Decimal,
    pub kit_price: Decimal,
    pub allocated_total: Decimal,
    pub refund_total: Decimal,
    pub balance_difference: Decimal,
    pub balanced: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BalanceStatus {
    Balanced,
    Unbalanced { difference: Decimal },
}

impl BalanceStatus {
    pub fn classify(allocated_total: Decimal, kit_price: Decimal) -> Self {
        let difference = allocated_total - kit_price;
        if difference.abs() < BALANCE_TOLERANCE {
            BalanceStatus::Balanced
        } else {
            BalanceStatus::Unbalanced { difference }
        }
    }

    pub fn is_balanced(&self) -> bool {
        matches!(self, BalanceStatus::Balanced)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationReport {
    pub summary: AllocationSummary,
    pub allocations: Vec<Allocation>,
}

impl AllocationReport {
    pub fn balance(&self) -> BalanceStatus {
        BalanceStatus::classify(self.summary.allocated_total, self.summary.kit_price)
    }
}

/// Distributes `kit_price` over `items` in proportion to extended list value.
///
/// Allocations come back in input order. Nothing is rounded here; rounding to
/// cents is a presentation concern.
pub fn allocate(items: &[LineItem], kit_price: Amount) -> AllocationReport {
    let kit_price = kit_price.get();
    let total_list_value: Decimal = items.iter().map(LineItem::extended_list_price).sum();

    let allocations: Vec<Allocation> = items
        .iter()
        .map(|item| {
            let extended_list_price = item.extended_list_price();
            let (unit_allocated_price, extended_allocated_price) =
                if total_list_value <= Decimal::ZERO {
                    (Decimal::ZERO, Decimal::ZERO)
                } else {
                    let share = extended_list_price / total_list_value;
                    let extended = share * kit_price;
                    (extended / item.quantity.as_decimal(), extended)
                };

            Allocation {
                id: item.id,
                part_number: item.part_number.clone(),
                quantity: item.quantity,
                unit_list_price: item.unit_list_price.get(),
                extended_list_price,
                unit_allocated_price,
                extended_allocated_price,
                refunded: item.refunded,
            }
        })
        .collect();

    let allocated_total: Decimal = allocations
        .iter()
        .map(|allocation| allocation.extended_allocated_price)
        .sum();
    let refund_total: Decimal = allocations
        .iter()
        .filter(|allocation| allocation.refunded)
        .map(|allocation| allocation.extended_allocated_price)
        .sum();
    let balance = BalanceStatus::classify(allocated_total, kit_price);

    AllocationReport {
        summary: AllocationSummary {
            total_list_value,
            kit_price,
            allocated_total,
            refund_total,
            balance_difference: allocated_total - kit_price,
            balanced: balance.is_balanced(),
        },
        allocations,
    }
}
