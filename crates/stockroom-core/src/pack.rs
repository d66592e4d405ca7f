//! # Pack Sales
//!
//! Unit economics for boxes whose packs are sold off one at a time.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Box: cost $120, 24 packs                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cost_per_pack = 120 / 24 = $5.00                                      │
//! │       │                                                                 │
//! │       ├──► pack #1 sold $7.00 ──► SaleBreakdown (unit cost $5.00)      │
//! │       ├──► pack #2 sold $6.50 ──► ...                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BoxRollup: sold 2, remaining 22, avg $6.75, projected $162.00         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::fees::{FeeSchedule, PlatformFee};
use crate::money::{out_of_range, Money};
use crate::sale::{SaleBreakdown, SaleInput};
use crate::types::{Item, Percent, Platform};
use crate::validation::{validate_non_negative, validate_packs_per_box};

/// `box_cost / packs_per_box`, unrounded.
pub fn cost_per_pack(box_cost: Money, packs_per_box: u32) -> CoreResult<Money> {
    validate_non_negative("cost", box_cost)?;
    validate_packs_per_box(packs_per_box)?;

    let per_pack = box_cost
        .checked_div(Decimal::from(packs_per_box))
        .ok_or_else(|| ValidationError::MustBePositive {
            field: "packs_per_box".to_string(),
        })?;
    Ok(per_pack)
}

/// Pack number for a new pack sale: the requested one, or one past the
/// number of pack sales already recorded for the box.
///
/// Numbers are 1-based; an explicit `Some(0)` is rejected. Uniqueness is the
/// store's job, since two concurrent requests can see the same count.
pub fn next_pack_number(existing_sales: u32, requested: Option<u32>) -> CoreResult<u32> {
    match requested {
        Some(0) => Err(ValidationError::MustBePositive {
            field: "pack_number".to_string(),
        }
        .into()),
        Some(number) => Ok(number),
        None => existing_sales
            .checked_add(1)
            .ok_or_else(|| {
                ValidationError::Invalid {
                    field: "pack_number".to_string(),
                    reason: "too many pack sales recorded".to_string(),
                }
                .into()
            }),
    }
}

// =============================================================================
// Pack Sale
// =============================================================================

/// The inputs of one pack sold out of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PackSaleInput {
    pub platform: Platform,
    pub sold_price: Money,
    #[serde(default)]
    pub shipping_cost: Money,
    #[serde(default)]
    pub materials_cost: Money,
    #[serde(default)]
    pub platform_fee_percent: Percent,
    #[serde(default)]
    pub platform_fee_flat: Money,
    /// Position within the box; assigned when absent.
    #[serde(default)]
    pub pack_number: Option<u32>,
}

/// Derived values of a pack sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PackSaleBreakdown {
    pub cost_per_pack: Money,
    pub pack_number: u32,
    pub platform_fee_total: Money,
    pub break_even_price: Money,
    pub net_profit: Money,
}

impl PackSaleInput {
    /// A pack sale with no shipping, materials or platform fee.
    pub fn new(platform: Platform, sold_price: Money) -> Self {
        PackSaleInput {
            platform,
            sold_price,
            shipping_cost: Money::ZERO,
            materials_cost: Money::ZERO,
            platform_fee_percent: Percent::ZERO,
            platform_fee_flat: Money::ZERO,
            pack_number: None,
        }
    }

    pub fn with_shipping(mut self, shipping_cost: Money) -> Self {
        self.shipping_cost = shipping_cost;
        self
    }

    pub fn with_materials(mut self, materials_cost: Money) -> Self {
        self.materials_cost = materials_cost;
        self
    }

    pub fn with_pack_number(mut self, pack_number: u32) -> Self {
        self.pack_number = Some(pack_number);
        self
    }

    pub fn with_fee(mut self, fee: PlatformFee) -> Self {
        self.platform_fee_percent = fee.fee_percent;
        self.platform_fee_flat = fee.fee_flat;
        self
    }

    /// Fills both fee fields from the schedule entry for this sale's platform.
    pub fn with_platform_fee(self, fees: &FeeSchedule) -> Self {
        let fee = fees.get(self.platform);
        self.with_fee(fee)
    }

    /// Computes the breakdown against the parent box, using the box's cost
    /// per pack as the unit cost.
    ///
    /// `existing_sales` is the number of pack sales already recorded for the
    /// box, used to assign a pack number when none was given.
    pub fn breakdown(&self, parent: &Item, existing_sales: u32) -> CoreResult<PackSaleBreakdown> {
        if !parent.is_box() {
            return Err(ValidationError::NotAllowed {
                field: "item_type".to_string(),
                allowed: vec!["box".to_string()],
            }
            .into());
        }

        let cost_per_pack = cost_per_pack(parent.cost, parent.packs_per_box)?;
        let pack_number = next_pack_number(existing_sales, self.pack_number)?;
        let SaleBreakdown {
            platform_fee_total,
            break_even_price,
            net_profit,
        } = self.as_sale(cost_per_pack).breakdown()?;

        Ok(PackSaleBreakdown {
            cost_per_pack,
            pack_number,
            platform_fee_total,
            break_even_price,
            net_profit,
        })
    }

    fn as_sale(&self, unit_cost: Money) -> SaleInput {
        SaleInput {
            platform: self.platform,
            sold_price: self.sold_price,
            unit_cost,
            shipping_cost: self.shipping_cost,
            materials_cost: self.materials_cost,
            platform_fee_percent: self.platform_fee_percent,
            platform_fee_flat: self.platform_fee_flat,
        }
    }
}

// =============================================================================
// Box Rollup
// =============================================================================

/// Reporting totals for one box. Recomputed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BoxRollup {
    pub cost_per_pack: Money,
    pub packs_sold: u32,
    /// `packs_per_box × quantity - packs_sold`; negative if oversold.
    pub packs_remaining: i64,
    pub total_available_packs: u32,
    pub total_revenue: Money,
    /// Zero when nothing has sold yet.
    pub avg_pack_price: Money,
    pub projected_revenue: Money,
    pub projected_net_profit: Money,
}

impl BoxRollup {
    /// Rolls up the sold prices of a box's pack sales.
    ///
    /// Totals too large to represent fail with `OutOfRange`.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    /// use stockroom_core::pack::BoxRollup;
    /// use stockroom_core::types::Item;
    ///
    /// let item = Item::sealed_box(Money::from_whole(120), 1, 24);
    /// let rollup = BoxRollup::compute(&item, [Money::from_whole(7), Money::from_cents(650)]).unwrap();
    ///
    /// assert_eq!(rollup.packs_remaining, 22);
    /// assert_eq!(rollup.avg_pack_price, Money::from_cents(675));
    /// assert_eq!(rollup.projected_revenue, Money::from_whole(162));
    /// assert_eq!(rollup.projected_net_profit, Money::from_whole(42));
    /// ```
    pub fn compute(parent: &Item, sold_prices: impl IntoIterator<Item = Money>) -> CoreResult<Self> {
        let cost_per_pack = cost_per_pack(parent.cost, parent.packs_per_box)?;

        let (packs_sold, total_revenue) = sold_prices.into_iter().try_fold(
            (0u32, Money::ZERO),
            |(count, sum), price| -> CoreResult<(u32, Money)> {
                let count = count
                    .checked_add(1)
                    .ok_or_else(|| out_of_range("packs_sold"))?;
                let sum = sum
                    .checked_add(price)
                    .ok_or_else(|| out_of_range("total_revenue"))?;
                Ok((count, sum))
            },
        )?;

        let total_available_packs = parent
            .packs_per_box
            .checked_mul(parent.quantity)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "total_available_packs".to_string(),
                min: "0".to_string(),
                max: u32::MAX.to_string(),
            })?;
        let packs_remaining = i64::from(total_available_packs) - i64::from(packs_sold);

        let avg_pack_price = if packs_sold == 0 {
            Money::ZERO
        } else {
            total_revenue
                .checked_div(Decimal::from(packs_sold))
                .ok_or_else(|| out_of_range("avg_pack_price"))?
        };

        let projected_revenue = avg_pack_price
            .checked_mul(Decimal::from(total_available_packs))
            .ok_or_else(|| out_of_range("projected_revenue"))?;
        let projected_net_profit = projected_revenue
            .checked_sub(parent.total_value()?)
            .ok_or_else(|| out_of_range("projected_net_profit"))?;

        debug!(packs_sold, packs_remaining, revenue = %total_revenue, "rolled up box");

        Ok(BoxRollup {
            cost_per_pack,
            packs_sold,
            packs_remaining,
            total_available_packs,
            total_revenue,
            avg_pack_price,
            projected_revenue,
            projected_net_profit,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::FeeSchedule;
    use rust_decimal_macros::dec;

    fn booster_box() -> Item {
        Item::sealed_box(Money::from_whole(120), 1, 24)
    }

    fn whatnot_pack(sold: Money) -> PackSaleInput {
        PackSaleInput::new(Platform::Whatnot, sold)
            .with_materials(Money::new(dec!(0.25)))
            .with_platform_fee(&FeeSchedule::conventional())
    }

    #[test]
    fn test_cost_per_pack() {
        assert_eq!(
            cost_per_pack(Money::from_whole(120), 24).unwrap(),
            Money::from_whole(5)
        );
        // Kept unrounded
        let third = cost_per_pack(Money::from_whole(10), 3).unwrap();
        assert!(Money::from_whole(10).abs_diff(third * 3u32) < Money::new(dec!(0.000001)));
        assert_eq!(third.round_cents(), Money::from_cents(333));

        assert!(cost_per_pack(Money::from_whole(10), 0).is_err());
    }

    #[test]
    fn test_next_pack_number() {
        assert_eq!(next_pack_number(0, None).unwrap(), 1);
        assert_eq!(next_pack_number(7, None).unwrap(), 8);
        assert_eq!(next_pack_number(7, Some(3)).unwrap(), 3);
        assert!(next_pack_number(7, Some(0)).is_err());
        assert!(next_pack_number(u32::MAX, None).is_err());
    }

    #[test]
    fn test_pack_sale_breakdown() {
        let breakdown = whatnot_pack(Money::from_whole(7))
            .breakdown(&booster_box(), 4)
            .unwrap();

        assert_eq!(breakdown.cost_per_pack, Money::from_whole(5));
        assert_eq!(breakdown.pack_number, 5);
        // 7 × 0.12 + 0.30
        assert_eq!(breakdown.platform_fee_total, Money::new(dec!(1.14)));
        // 5 + 0.25 + 1.14
        assert_eq!(breakdown.break_even_price, Money::new(dec!(6.39)));
        assert_eq!(breakdown.net_profit, Money::new(dec!(0.61)));
    }

    #[test]
    fn test_pack_sale_platform_fee_and_number() {
        let sale = PackSaleInput::new(Platform::Ebay, Money::from_whole(10))
            .with_platform_fee(&FeeSchedule::conventional())
            .with_pack_number(12);
        assert_eq!(sale.platform_fee_percent, Percent::whole(10));
        assert_eq!(sale.platform_fee_flat, Money::new(dec!(0.30)));

        let breakdown = sale.breakdown(&booster_box(), 4).unwrap();
        assert_eq!(breakdown.pack_number, 12);
        // 10 - 5 - (1.00 + 0.30)
        assert_eq!(breakdown.net_profit, Money::new(dec!(3.70)));
    }

    #[test]
    fn test_pack_sale_on_single_item_rejected() {
        let single = Item::single(Money::from_whole(20), 1);
        let err = whatnot_pack(Money::from_whole(7))
            .breakdown(&single, 0)
            .unwrap_err();
        assert!(err.to_string().contains("item_type"));
    }

    #[test]
    fn test_rollup_without_sales() {
        let rollup = BoxRollup::compute(&booster_box(), []).unwrap();
        assert_eq!(rollup.packs_sold, 0);
        assert_eq!(rollup.packs_remaining, 24);
        assert_eq!(rollup.avg_pack_price, Money::ZERO);
        assert_eq!(rollup.projected_revenue, Money::ZERO);
        assert_eq!(rollup.projected_net_profit, Money::from_whole(-120));
    }

    #[test]
    fn test_rollup_spans_every_box_on_hand() {
        let two_boxes = Item::sealed_box(Money::from_whole(60), 2, 10);
        let sold = vec![Money::from_whole(8); 4];
        let rollup = BoxRollup::compute(&two_boxes, sold).unwrap();

        assert_eq!(rollup.total_available_packs, 20);
        assert_eq!(rollup.packs_remaining, 16);
        assert_eq!(rollup.total_revenue, Money::from_whole(32));
        assert_eq!(rollup.projected_revenue, Money::from_whole(160));
        // 160 - 60 × 2
        assert_eq!(rollup.projected_net_profit, Money::from_whole(40));
    }

    #[test]
    fn test_rollup_pack_count_overflow_is_an_error() {
        let stacked = Item::sealed_box(Money::from_whole(60), 2, u32::MAX);
        let err = BoxRollup::compute(&stacked, []).unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
        assert!(err.to_string().contains("total_available_packs"));
    }

    #[test]
    fn test_rollup_revenue_overflow_is_an_error() {
        let sold = [Money::new(Decimal::MAX), Money::from_whole(1)];
        let err = BoxRollup::compute(&booster_box(), sold).unwrap_err();
        assert!(err.to_string().contains("total_revenue"));
    }
}
