use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Largest quantity a single line may carry.
pub const MAX_QUANTITY: u32 = 1_000_000;

/// Largest unit list price or kit price accepted, one trillion.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(Uuid);

impl LineItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LineItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for LineItemId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A line quantity, always in `1..=MAX_QUANTITY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub const ONE: Quantity = Quantity(1);

    pub fn new(value: u32) -> Option<Self> {
        (1..=MAX_QUANTITY).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn as_decimal(self) -> Decimal {
        Decimal::from(self.0)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u32> for Quantity {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("quantity must be between 1 and {MAX_QUANTITY}"))
    }
}

impl From<Quantity> for u32 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A non-negative money amount no larger than [`MAX_AMOUNT`].
///
/// Used for unit list prices and for the kit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub fn new(value: Decimal) -> Option<Self> {
        (value >= Decimal::ZERO && value <= MAX_AMOUNT).then_some(Self(value.normalize()))
    }

    pub fn get(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = String;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("amount must be between 0 and {MAX_AMOUNT}"))
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One part entry on a worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub part_number: String,
    pub quantity: Quantity,
    pub unit_list_price: Amount,
    pub refunded: bool,
}

impl LineItem {
    /// A blank row: no part number, quantity 1, price 0, not refunded.
    pub fn blank() -> Self {
        Self {
            id: LineItemId::new(),
            part_number: String::new(),
            quantity: Quantity::ONE,
            unit_list_price: Amount::ZERO,
            refunded: false,
        }
    }

    pub fn new(
        part_number: impl Into<String>,
        quantity: Quantity,
        unit_list_price: Amount,
        refunded: bool,
    ) -> Self {
        Self {
            id: LineItemId::new(),
            part_number: part_number.into(),
            quantity,
            unit_list_price,
            refunded,
        }
    }

    pub fn extended_list_price(&self) -> Decimal {
        self.unit_list_price.get() * self.quantity.as_decimal()
    }
}
