//! # Sale Breakdown
//!
//! Fee total, break-even and net profit for a recorded sale, and the check
//! that compares stored values against a fresh recomputation.
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Record Sale form                                                       │
//! │                                                                         │
//! │  pick platform ──► SaleInput::with_platform_fee (schedule defaults)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  type sold price ──► breakdown() on every keystroke ──► live preview   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  submit ──► breakdown() once more ──► stored alongside the inputs      │
//! │                                                                         │
//! │  later: verify_cached(inputs, stored) ──► drift report                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stored breakdown fields are a read cache. The inputs are the record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::fees::{FeeSchedule, PlatformFee};
use crate::money::Money;
use crate::pricing::{break_even_additive, net_profit, CostBasis};
use crate::types::{Percent, Platform};

/// Largest difference between a stored and a recomputed value that still
/// counts as a match. Stored values may have been rounded to cents.
pub const CACHE_TOLERANCE: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

// =============================================================================
// Sale Input
// =============================================================================

/// The inputs of a completed single-item sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleInput {
    pub platform: Platform,
    pub sold_price: Money,
    /// Acquisition cost of the unit sold.
    pub unit_cost: Money,
    #[serde(default)]
    pub shipping_cost: Money,
    #[serde(default)]
    pub materials_cost: Money,
    #[serde(default)]
    pub platform_fee_percent: Percent,
    #[serde(default)]
    pub platform_fee_flat: Money,
}

impl SaleInput {
    /// A sale with no shipping, materials or platform fee.
    pub fn new(platform: Platform, sold_price: Money, unit_cost: Money) -> Self {
        SaleInput {
            platform,
            sold_price,
            unit_cost,
            shipping_cost: Money::ZERO,
            materials_cost: Money::ZERO,
            platform_fee_percent: Percent::ZERO,
            platform_fee_flat: Money::ZERO,
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

    pub fn costs(&self) -> CostBasis {
        CostBasis::new(self.unit_cost, self.shipping_cost, self.materials_cost)
    }

    pub fn fee(&self) -> PlatformFee {
        PlatformFee::new(self.platform_fee_percent, self.platform_fee_flat)
    }

    /// Computes the fee total, additive break-even and net profit.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal_macros::dec;
    /// use stockroom_core::fees::FeeSchedule;
    /// use stockroom_core::money::Money;
    /// use stockroom_core::sale::SaleInput;
    /// use stockroom_core::types::Platform;
    ///
    /// let sale = SaleInput::new(Platform::Whatnot, Money::new(dec!(125)), Money::new(dec!(50)))
    ///     .with_shipping(Money::new(dec!(5)))
    ///     .with_materials(Money::new(dec!(2.50)))
    ///     .with_platform_fee(&FeeSchedule::conventional());
    ///
    /// let breakdown = sale.breakdown().unwrap();
    /// assert_eq!(breakdown.platform_fee_total, Money::new(dec!(15.30)));
    /// assert_eq!(breakdown.break_even_price, Money::new(dec!(72.80)));
    /// assert_eq!(breakdown.net_profit, Money::new(dec!(52.20)));
    /// ```
    pub fn breakdown(&self) -> CoreResult<SaleBreakdown> {
        let costs = self.costs();
        let fee = self.fee();

        let net_profit = net_profit(self.sold_price, &costs, &fee)?;
        let platform_fee_total = fee.fee_on(self.sold_price)?;
        let break_even_price = break_even_additive(&costs, platform_fee_total)?;

        debug!(
            platform = %self.platform,
            sold = %self.sold_price,
            fee = %platform_fee_total,
            profit = %net_profit,
            "computed sale breakdown"
        );

        Ok(SaleBreakdown {
            platform_fee_total,
            break_even_price,
            net_profit,
        })
    }
}

// =============================================================================
// Sale Breakdown
// =============================================================================

/// Derived values of a sale. Unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleBreakdown {
    pub platform_fee_total: Money,
    /// Additive break-even against the recorded sold price.
    pub break_even_price: Money,
    /// Signed; negative is a loss.
    pub net_profit: Money,
}

impl SaleBreakdown {
    #[inline]
    pub fn is_loss(&self) -> bool {
        self.net_profit.is_negative()
    }

    /// Every field rounded to cents, for storage or display.
    pub fn rounded(&self) -> Self {
        SaleBreakdown {
            platform_fee_total: self.platform_fee_total.round_cents(),
            break_even_price: self.break_even_price.round_cents(),
            net_profit: self.net_profit.round_cents(),
        }
    }
}

// =============================================================================
// Cache Verification
// =============================================================================

/// A stored breakdown field that disagrees with recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CacheDrift {
    pub field: String,
    pub cached: Money,
    pub recomputed: Money,
}

/// Recomputes `input` and lists every field of `cached` that differs by more
/// than [`CACHE_TOLERANCE`]. An empty list means the cache is sound.
pub fn verify_cached(input: &SaleInput, cached: &SaleBreakdown) -> CoreResult<Vec<CacheDrift>> {
    let fresh = input.breakdown()?;
    let tolerance = Money::new(CACHE_TOLERANCE);

    let drift: Vec<CacheDrift> = [
        ("platformFeeTotal", cached.platform_fee_total, fresh.platform_fee_total),
        ("breakEvenPrice", cached.break_even_price, fresh.break_even_price),
        ("netProfit", cached.net_profit, fresh.net_profit),
    ]
    .into_iter()
    .filter(|(_, stored, recomputed)| stored.abs_diff(*recomputed) > tolerance)
    .map(|(field, stored, recomputed)| CacheDrift {
        field: field.to_string(),
        cached: stored,
        recomputed,
    })
    .collect();

    if !drift.is_empty() {
        warn!(fields = drift.len(), "stored sale breakdown differs from recomputation");
    }
    Ok(drift)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn small_ebay_sale() -> SaleInput {
        SaleInput::new(Platform::Ebay, Money::new(dec!(18.00)), Money::new(dec!(12.00)))
            .with_shipping(Money::new(dec!(1.50)))
            .with_materials(Money::new(dec!(1.00)))
            .with_platform_fee(&FeeSchedule::conventional())
    }

    #[test]
    fn test_breakdown_small_sale() {
        let breakdown = small_ebay_sale().breakdown().unwrap();
        assert_eq!(breakdown.platform_fee_total, Money::new(dec!(2.10)));
        assert_eq!(breakdown.break_even_price, Money::new(dec!(16.60)));
        assert_eq!(breakdown.net_profit, Money::new(dec!(1.40)));
        assert!(!breakdown.is_loss());
    }

    #[test]
    fn test_platform_defaults() {
        let fees = FeeSchedule::conventional();
        let paypal = SaleInput::new(Platform::Paypal, Money::from_whole(10), Money::from_whole(5))
            .with_platform_fee(&fees);
        assert_eq!(paypal.platform_fee_percent, Percent::new(dec!(3.49)));
        assert_eq!(paypal.platform_fee_flat, Money::new(dec!(0.49)));

        let discord = SaleInput::new(Platform::Discord, Money::from_whole(10), Money::from_whole(5))
            .with_platform_fee(&fees);
        assert_eq!(discord.breakdown().unwrap().platform_fee_total, Money::ZERO);
    }

    #[test]
    fn test_loss_sale() {
        let sale = SaleInput::new(Platform::Whatnot, Money::from_whole(10), Money::from_whole(12))
            .with_platform_fee(&FeeSchedule::conventional());
        let breakdown = sale.breakdown().unwrap();
        // 10 - 12 - 1.50
        assert_eq!(breakdown.net_profit, Money::new(dec!(-3.50)));
        assert!(breakdown.is_loss());
    }

    #[test]
    fn test_negative_unit_cost_rejected() {
        let sale = SaleInput::new(Platform::Other, Money::from_whole(10), Money::from_whole(-1));
        let err = sale.breakdown().unwrap_err();
        assert!(err.to_string().contains("unit_cost"));
    }

    #[test]
    fn test_verify_cached_accepts_rounded_values() {
        let sale = SaleInput::new(Platform::Paypal, Money::new(dec!(33.33)), Money::new(dec!(20)))
            .with_platform_fee(&FeeSchedule::conventional());
        let stored = sale.breakdown().unwrap().rounded();
        assert!(verify_cached(&sale, &stored).unwrap().is_empty());
    }

    #[test]
    fn test_verify_cached_flags_tampered_profit() {
        let sale = small_ebay_sale();
        let mut stored = sale.breakdown().unwrap();
        stored.net_profit = Money::new(dec!(5.00));

        let drift = verify_cached(&sale, &stored).unwrap();
        assert_eq!(drift.len(), 1);
        assert_eq!(drift[0].field, "netProfit");
        assert_eq!(drift[0].cached, Money::new(dec!(5.00)));
        assert_eq!(drift[0].recomputed, Money::new(dec!(1.40)));
    }

    #[test]
    fn test_sale_input_json() {
        let json = r#"{
            "platform": "WHATNOT",
            "soldPrice": "125.00",
            "unitCost": "50.00",
            "shippingCost": "5.00",
            "materialsCost": "2.50",
            "platformFeePercent": "12",
            "platformFeeFlat": "0.30"
        }"#;
        let sale: SaleInput = serde_json::from_str(json).unwrap();
        assert_eq!(sale.breakdown().unwrap().net_profit, Money::new(dec!(52.20)));
    }
}
