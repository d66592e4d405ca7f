//! # Vendor Purchase Orders
//!
//! Order totals and the stock changes applied when an order arrives.
//!
//! ```text
//! ORDERED ──► IN_TRANSIT ──► ARRIVED        (restock applied once)
//!    │             │
//!    └─────────────┴──► CANCELLED
//! ```
//!
//! Receiving is the only step that touches inventory. Each line adds its
//! quantity to the item on hand and replaces the item's unit cost with the
//! line's cost per unit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::{out_of_range, Money};
use crate::types::{Item, ItemStatus};
use crate::validation::validate_positive;

// =============================================================================
// Order Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Ordered,
    InTransit,
    Arrived,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "ORDERED",
            OrderStatus::InTransit => "IN_TRANSIT",
            OrderStatus::Arrived => "ARRIVED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order
// =============================================================================

/// One line of a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub item_id: String,
    pub quantity: u32,
    pub cost_per_unit: Money,
}

impl OrderLine {
    pub fn new(item_id: impl Into<String>, quantity: u32, cost_per_unit: Money) -> Self {
        OrderLine {
            item_id: item_id.into(),
            quantity,
            cost_per_unit,
        }
    }

    /// `quantity × cost_per_unit`.
    pub fn line_total(&self) -> CoreResult<Money> {
        self.cost_per_unit
            .checked_mul(self.quantity.into())
            .ok_or_else(|| out_of_range("line_total").into())
    }

    fn validate(&self) -> CoreResult<()> {
        if self.quantity == 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }
        validate_positive("cost_per_unit", self.cost_per_unit)?;
        Ok(())
    }
}

/// A purchase order placed with a vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VendorOrder {
    #[serde(default)]
    pub status: OrderStatus,
    /// Invoice total when the vendor's differs from the sum of the lines.
    #[serde(default)]
    pub total_cost: Option<Money>,
    pub lines: Vec<OrderLine>,
}

/// An item's state after an order is received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Restock {
    pub item_id: String,
    pub item: Item,
    /// `cost × quantity` after the restock.
    pub total_value: Money,
}

impl VendorOrder {
    pub fn new(lines: Vec<OrderLine>) -> Self {
        VendorOrder {
            status: OrderStatus::Ordered,
            total_cost: None,
            lines,
        }
    }

    pub fn with_total_cost(mut self, total_cost: Money) -> Self {
        self.total_cost = Some(total_cost);
        self
    }

    /// Every line needs a positive quantity and cost; an explicit total must
    /// be positive.
    pub fn validate(&self) -> CoreResult<()> {
        for line in &self.lines {
            line.validate()?;
        }
        if let Some(total) = self.total_cost {
            validate_positive("total_cost", total)?;
        }
        Ok(())
    }

    /// Sum of the line totals.
    pub fn lines_total(&self) -> CoreResult<Money> {
        self.lines.iter().try_fold(Money::ZERO, |sum, line| -> CoreResult<Money> {
            sum.checked_add(line.line_total()?)
                .ok_or_else(|| out_of_range("total_cost").into())
        })
    }

    /// The explicit total when given, otherwise [`lines_total`](Self::lines_total).
    pub fn total_cost(&self) -> CoreResult<Money> {
        match self.total_cost {
            Some(total) => Ok(total),
            None => self.lines_total(),
        }
    }

    /// Moves the order to `next` and returns the stock changes that
    /// transition causes.
    ///
    /// Only a move into `Arrived` from any other status restocks; every
    /// other transition, including `Arrived` to `Arrived`, changes nothing
    /// and returns no restocks. Lines naming the same item apply in order,
    /// so the last line's cost wins. Nothing is changed on error.
    ///
    /// ## Errors
    /// - `InvalidInput` for an invalid order, a line naming an item missing
    ///   from `items`, or a quantity or value too large to represent
    ///
    /// ## Example
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use stockroom_core::money::Money;
    /// use stockroom_core::types::Item;
    /// use stockroom_core::vendor::{OrderLine, OrderStatus, VendorOrder};
    ///
    /// let items = BTreeMap::from([("booster".to_string(), Item::single(Money::from_whole(4), 2))]);
    /// let mut order = VendorOrder::new(vec![OrderLine::new("booster", 10, Money::from_whole(3))]);
    ///
    /// let restocks = order.receive(OrderStatus::Arrived, &items).unwrap();
    /// assert_eq!(restocks[0].item.quantity, 12);
    /// assert_eq!(restocks[0].total_value, Money::from_whole(36));
    /// assert!(order.receive(OrderStatus::Arrived, &items).unwrap().is_empty());
    /// ```
    pub fn receive(
        &mut self,
        next: OrderStatus,
        items: &BTreeMap<String, Item>,
    ) -> CoreResult<Vec<Restock>> {
        if next != OrderStatus::Arrived || self.status == OrderStatus::Arrived {
            debug!(from = %self.status, to = %next, "order status change without restock");
            self.status = next;
            return Ok(Vec::new());
        }

        self.validate()?;

        let mut touched: Vec<(String, Item)> = Vec::new();
        for line in &self.lines {
            let position = match touched.iter().position(|(id, _)| *id == line.item_id) {
                Some(position) => position,
                None => {
                    let item = items.get(&line.item_id).ok_or_else(|| ValidationError::Invalid {
                        field: "item_id".to_string(),
                        reason: format!("no inventory item {}", line.item_id),
                    })?;
                    touched.push((line.item_id.clone(), item.clone()));
                    touched.len() - 1
                }
            };

            let item = &mut touched[position].1;
            item.quantity = item.quantity.checked_add(line.quantity).ok_or_else(|| {
                ValidationError::OutOfRange {
                    field: "quantity".to_string(),
                    min: "0".to_string(),
                    max: u32::MAX.to_string(),
                }
            })?;
            item.cost = line.cost_per_unit;
            item.status = ItemStatus::InStock;
        }

        let restocks = touched
            .into_iter()
            .map(|(item_id, item)| {
                let total_value = item.total_value()?;
                Ok(Restock {
                    item_id,
                    item,
                    total_value,
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        debug!(from = %self.status, lines = self.lines.len(), items = restocks.len(), "order received");
        self.status = next;
        Ok(restocks)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
