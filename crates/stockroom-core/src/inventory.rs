//! # Inventory Valuation & Alerts
//!
//! Dashboard figures and stock alerts computed from plain records.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::{out_of_range, Money};
use crate::sale::SaleInput;
use crate::types::{Item, ItemStatus};

/// Quantity at or below which an in-stock item raises a low-stock alert.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Customers interested in an item before it raises a high-interest alert.
pub const HIGH_INTEREST_THRESHOLD: u32 = 2;

// =============================================================================
// Stock Changes
// =============================================================================

/// Quantity and status of an item after one unit is sold.
///
/// Selling the last unit flips the status to `NeedsRestock`; otherwise the
/// status is left as it was.
pub fn status_after_sale(item: &Item) -> CoreResult<(u32, ItemStatus)> {
    let remaining = item
        .quantity
        .checked_sub(1)
        .ok_or_else(|| ValidationError::Invalid {
            field: "quantity".to_string(),
            reason: "insufficient quantity in stock".to_string(),
        })?;

    let status = if remaining == 0 {
        ItemStatus::NeedsRestock
    } else {
        item.status
    };
    Ok((remaining, status))
}

// =============================================================================
// Alerts
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    RestockNeeded,
    LowStock,
    HighInterest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub kind: AlertKind,
    pub priority: AlertPriority,
    pub message: String,
}

/// Alert for an item's quantity on hand, if any.
///
/// | Quantity | Alert                 |
/// |----------|-----------------------|
/// | 0        | restock needed, high  |
/// | 1-2      | low stock, high       |
/// | 3-5      | low stock, medium     |
/// | 6+       | none                  |
pub fn stock_alert(quantity: u32) -> Option<StockAlert> {
    match quantity {
        0 => Some(StockAlert {
            kind: AlertKind::RestockNeeded,
            priority: AlertPriority::High,
            message: "Out of stock".to_string(),
        }),
        q if q <= LOW_STOCK_THRESHOLD => Some(StockAlert {
            kind: AlertKind::LowStock,
            priority: if q <= 2 {
                AlertPriority::High
            } else {
                AlertPriority::Medium
            },
            message: format!("Only {} units left", q),
        }),
        _ => None,
    }
}

/// Alert for the number of customers who asked about an item, if any.
pub fn interest_alert(interested_customers: u32) -> Option<StockAlert> {
    if interested_customers < HIGH_INTEREST_THRESHOLD {
        return None;
    }

    Some(StockAlert {
        kind: AlertKind::HighInterest,
        priority: if interested_customers >= 3 {
            AlertPriority::Medium
        } else {
            AlertPriority::Low
        },
        message: format!("{} customers interested", interested_customers),
    })
}

// =============================================================================
// Summary
// =============================================================================

/// Headline dashboard numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    /// Cost value of in-stock items.
    pub total_inventory_value: Money,
    pub items_in_stock: u32,
    /// Realized profit across all sales, recomputed from sale inputs.
    pub total_profit: Money,
    /// In-stock items at or below [`LOW_STOCK_THRESHOLD`].
    pub low_stock_alerts: u32,
}

impl InventorySummary {
    pub fn from_records(items: &[Item], sales: &[SaleInput]) -> CoreResult<Self> {
        let in_stock = || items.iter().filter(|i| i.status == ItemStatus::InStock);

        let total_profit = sales.iter().try_fold(Money::ZERO, |sum, sale| -> CoreResult<Money> {
            let profit = sale.breakdown()?.net_profit;
            sum.checked_add(profit)
                .ok_or_else(|| out_of_range("total_profit").into())
        })?;
        let total_inventory_value = in_stock().try_fold(Money::ZERO, |sum, item| -> CoreResult<Money> {
            sum.checked_add(item.total_value()?)
                .ok_or_else(|| out_of_range("total_inventory_value").into())
        })?;

        Ok(InventorySummary {
            total_inventory_value,
            items_in_stock: count(in_stock()),
            total_profit,
            low_stock_alerts: count(in_stock().filter(|i| i.quantity <= LOW_STOCK_THRESHOLD)),
        })
    }
}

fn count<T>(iter: impl Iterator<Item = T>) -> u32 {
    u32::try_from(iter.count()).unwrap_or(u32::MAX)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::FeeSchedule;
    use crate::types::Platform;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_after_sale() {
        let item = Item::single(Money::from_whole(10), 2);
        assert_eq!(status_after_sale(&item).unwrap(), (1, ItemStatus::InStock));

        let last = Item::single(Money::from_whole(10), 1);
        assert_eq!(status_after_sale(&last).unwrap(), (0, ItemStatus::NeedsRestock));

        let empty = Item::single(Money::from_whole(10), 0);
        assert!(status_after_sale(&empty).is_err());
    }

    #[test]
    fn test_stock_alerts() {
        let out = stock_alert(0).unwrap();
        assert_eq!(out.kind, AlertKind::RestockNeeded);
        assert_eq!(out.priority, AlertPriority::High);

        assert_eq!(stock_alert(2).unwrap().priority, AlertPriority::High);

        let low = stock_alert(4).unwrap();
        assert_eq!(low.kind, AlertKind::LowStock);
        assert_eq!(low.priority, AlertPriority::Medium);
        assert_eq!(low.message, "Only 4 units left");

        assert!(stock_alert(6).is_none());
    }

    #[test]
    fn test_interest_alerts() {
        assert!(interest_alert(1).is_none());
        assert_eq!(interest_alert(2).unwrap().priority, AlertPriority::Low);
        assert_eq!(interest_alert(5).unwrap().priority, AlertPriority::Medium);
    }

    #[test]
    fn test_summary() {
        let mut discontinued = Item::single(Money::from_whole(100), 10);
        discontinued.status = ItemStatus::Discontinued;
        let items = vec![
            Item::single(Money::new(dec!(12.50)), 4),
            Item::sealed_box(Money::from_whole(120), 2, 24),
            discontinued,
        ];

        let fees = FeeSchedule::conventional();
        let sales = vec![
            SaleInput::new(Platform::Ebay, Money::from_whole(18), Money::from_whole(12))
                .with_platform_fee(&fees),
            SaleInput::new(Platform::Discord, Money::from_whole(8), Money::from_whole(10)),
        ];

        let summary = InventorySummary::from_records(&items, &sales).unwrap();
        assert_eq!(summary.total_inventory_value, Money::from_whole(290));
        assert_eq!(summary.items_in_stock, 2);
        assert_eq!(summary.low_stock_alerts, 2);
        // (18 - 12 - 2.10) + (8 - 10)
        assert_eq!(summary.total_profit, Money::new(dec!(1.90)));
    }

    #[test]
    fn test_summary_value_overflow_is_an_error() {
        let items = vec![
            Item::single(Money::new(Decimal::MAX), 1),
            Item::single(Money::from_whole(1), 1),
        ];
        let err = InventorySummary::from_records(&items, &[]).unwrap_err();
        assert!(err.to_string().contains("total_inventory_value"));
    }
}
