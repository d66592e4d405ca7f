//! # Platform Fees
//!
//! The one authoritative fee table, and fee application.
//!
//! ## Fee Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fee_total = gross × fee_percent / 100 + fee_flat                      │
//! │                                                                         │
//! │  $125.00 on WHATNOT (12% + $0.30):                                     │
//! │    125.00 × 0.12 = 15.00                                               │
//! │    15.00 + 0.30  = 15.30                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Route handlers, form previews and the suggestion engine all read the same
//! [`FeeSchedule`]; nothing else in the workspace hard-codes a fee.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{out_of_range, Money};
use crate::types::{Percent, Platform};
use crate::validation::{validate_non_negative, validate_percent};

// =============================================================================
// Platform Fee
// =============================================================================

/// A marketplace's percentage-plus-flat charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PlatformFee {
    pub fee_percent: Percent,
    pub fee_flat: Money,
}

impl PlatformFee {
    pub const fn new(fee_percent: Percent, fee_flat: Money) -> Self {
        PlatformFee {
            fee_percent,
            fee_flat,
        }
    }

    /// No intermediary fee (direct sales).
    pub const fn none() -> Self {
        PlatformFee::new(Percent::ZERO, Money::ZERO)
    }

    /// Checks that both components are non-negative.
    pub fn validate(&self) -> CoreResult<()> {
        validate_percent("platform_fee_percent", self.fee_percent)?;
        validate_non_negative("platform_fee_flat", self.fee_flat)?;
        Ok(())
    }

    /// Like [`validate`](Self::validate), and additionally rejects a
    /// percentage of 100 or more. Required wherever a price is divided by
    /// `1 - fee_percent / 100`.
    pub fn validate_for_gross_up(&self) -> CoreResult<()> {
        self.validate()?;
        if self.fee_percent >= Percent::HUNDRED {
            return Err(CoreError::InvalidFeeSchedule {
                fee_percent: self.fee_percent.value(),
            });
        }
        Ok(())
    }

    /// The share of a sold price the seller keeps before the flat fee:
    /// `1 - fee_percent / 100`.
    #[inline]
    pub fn retained_fraction(&self) -> Decimal {
        Decimal::ONE - self.fee_percent.fraction()
    }

    /// Fee charged on `gross`. Unvalidated, unrounded.
    ///
    /// Fails with `OutOfRange` when the fee is too large to represent.
    pub fn fee_on(&self, gross: Money) -> CoreResult<Money> {
        gross
            .checked_mul(self.fee_percent.fraction())
            .and_then(|fee| fee.checked_add(self.fee_flat))
            .ok_or_else(|| CoreError::from(out_of_range("platform_fee_total")))
    }
}

/// Computes `gross × fee_percent / 100 + fee_flat`.
///
/// `gross` is not checked (a zero or refund amount is the caller's call).
/// The result is exact and unrounded; round only for display.
///
/// ## Example
/// ```rust
/// use rust_decimal_macros::dec;
/// use stockroom_core::fees::apply_platform_fee;
/// use stockroom_core::money::Money;
/// use stockroom_core::types::Percent;
///
/// let fee = apply_platform_fee(
///     Money::new(dec!(125.00)),
///     Percent::new(dec!(12.0)),
///     Money::new(dec!(0.30)),
/// )
/// .unwrap();
/// assert_eq!(fee, Money::new(dec!(15.30)));
/// ```
pub fn apply_platform_fee(gross: Money, fee_percent: Percent, fee_flat: Money) -> CoreResult<Money> {
    let fee = PlatformFee::new(fee_percent, fee_flat);
    fee.validate()?;
    let total = fee.fee_on(gross)?;
    trace!(%gross, %fee_percent, %fee_flat, %total, "applied platform fee");
    Ok(total)
}

/// What the seller takes home from a listing at `list_price` once the
/// platform has deducted its fee.
pub fn net_listing_price(list_price: Money, fee: &PlatformFee) -> CoreResult<Money> {
    fee.validate()?;
    list_price
        .checked_sub(fee.fee_on(list_price)?)
        .ok_or_else(|| out_of_range("net_listing_price").into())
}

// =============================================================================
// Fee Schedule
// =============================================================================

/// Fee per platform.
///
/// Serializes as a plain map: `{"WHATNOT": {"feePercent": "12", ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FeeSchedule(BTreeMap<Platform, PlatformFee>);

impl FeeSchedule {
    /// Creates an empty schedule; every platform reads as fee-free.
    pub fn empty() -> Self {
        FeeSchedule(BTreeMap::new())
    }

    /// The conventional marketplace fees.
    ///
    /// | Platform  | Percent | Flat  |
    /// |-----------|---------|-------|
    /// | WHATNOT   | 12%     | $0.30 |
    /// | EBAY      | 10%     | $0.30 |
    /// | PAYPAL    | 3.49%   | $0.49 |
    /// | DISCORD   | 0%      | $0.00 |
    /// | INSTAGRAM | 0%      | $0.00 |
    /// | OTHER     | 0%      | $0.00 |
    pub fn conventional() -> Self {
        let mut schedule = FeeSchedule::empty();
        schedule.set(
            Platform::Whatnot,
            PlatformFee::new(Percent::whole(12), Money::from_cents(30)),
        );
        schedule.set(
            Platform::Ebay,
            PlatformFee::new(Percent::whole(10), Money::from_cents(30)),
        );
        schedule.set(
            Platform::Paypal,
            PlatformFee::new(Percent::new(Decimal::new(349, 2)), Money::from_cents(49)),
        );
        for platform in [Platform::Discord, Platform::Instagram, Platform::Other] {
            schedule.set(platform, PlatformFee::none());
        }
        schedule
    }

    /// Fee for `platform`; platforms missing from the table are fee-free.
    pub fn get(&self, platform: Platform) -> PlatformFee {
        self.0.get(&platform).copied().unwrap_or_else(PlatformFee::none)
    }

    /// Replaces the fee for `platform`.
    pub fn set(&mut self, platform: Platform, fee: PlatformFee) {
        self.0.insert(platform, fee);
    }

    /// Iterates entries in platform order.
    pub fn iter(&self) -> impl Iterator<Item = (Platform, PlatformFee)> + '_ {
        self.0.iter().map(|(p, f)| (*p, *f))
    }

    /// Checks every entry is non-negative and below 100%.
    ///
    /// Every fee in the table may end up in a gross-up, so the stricter
    /// check applies to all of them.
    pub fn validate(&self) -> CoreResult<()> {
        for (_, fee) in self.iter() {
            fee.validate_for_gross_up()?;
        }
        Ok(())
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        FeeSchedule::conventional()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fee_composition() {
        let fee = apply_platform_fee(
            Money::new(dec!(125.00)),
            Percent::new(dec!(12.0)),
            Money::new(dec!(0.30)),
        )
        .unwrap();
        assert_eq!(fee, Money::new(dec!(15.30)));

        let fee = apply_platform_fee(
            Money::new(dec!(18.00)),
            Percent::new(dec!(10.0)),
            Money::new(dec!(0.30)),
        )
        .unwrap();
        assert_eq!(fee, Money::new(dec!(2.10)));
    }

    #[test]
    fn test_fee_composition_grid() {
        let amounts = [dec!(0), dec!(0.01), dec!(18), dec!(99.99), dec!(1234.56)];
        let percents = [dec!(0), dec!(3.49), dec!(12), dec!(99.9)];
        let flats = [dec!(0), dec!(0.30), dec!(0.49)];

        for amount in amounts {
            for percent in percents {
                for flat in flats {
                    let fee = apply_platform_fee(
                        Money::new(amount),
                        Percent::new(percent),
                        Money::new(flat),
                    )
                    .unwrap();
                    assert_eq!(fee.amount(), amount * percent / dec!(100) + flat);
                }
            }
        }
    }

    #[test]
    fn test_negative_fee_components_rejected() {
        let err = apply_platform_fee(
            Money::from_whole(10),
            Percent::new(dec!(-1)),
            Money::ZERO,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidInput(ValidationError::Negative {
                field: "platform_fee_percent".to_string()
            })
        );

        let err = apply_platform_fee(Money::from_whole(10), Percent::ZERO, Money::from_cents(-30))
            .unwrap_err();
        assert!(err.to_string().contains("platform_fee_flat"));
    }

    #[test]
    fn test_fee_overflow_is_an_error() {
        let err = apply_platform_fee(
            Money::new(Decimal::MAX),
            Percent::HUNDRED,
            Money::from_whole(1),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidInput(ValidationError::OutOfRange { ref field, .. })
                if field == "platform_fee_total"
        ));
        assert_eq!(err.code(), "INVALID_INPUT");

        let flat_only = PlatformFee::new(Percent::ZERO, Money::from_whole(1));
        assert!(net_listing_price(Money::new(Decimal::MIN), &flat_only).is_err());
    }

    #[test]
    fn test_conventional_schedule() {
        let fees = FeeSchedule::conventional();
        assert_eq!(
            fees.get(Platform::Whatnot),
            PlatformFee::new(Percent::new(dec!(12)), Money::new(dec!(0.30)))
        );
        assert_eq!(
            fees.get(Platform::Ebay),
            PlatformFee::new(Percent::new(dec!(10)), Money::new(dec!(0.30)))
        );
        assert_eq!(
            fees.get(Platform::Paypal),
            PlatformFee::new(Percent::new(dec!(3.49)), Money::new(dec!(0.49)))
        );
        for platform in [Platform::Discord, Platform::Instagram, Platform::Other] {
            assert_eq!(fees.get(platform), PlatformFee::none());
        }
        assert_eq!(fees.iter().count(), Platform::ALL.len());
        assert!(fees.validate().is_ok());
    }

    #[test]
    fn test_missing_platform_is_fee_free() {
        let fees = FeeSchedule::empty();
        assert_eq!(fees.get(Platform::Ebay), PlatformFee::none());
    }

    #[test]
    fn test_schedule_rejects_hundred_percent() {
        let mut fees = FeeSchedule::conventional();
        fees.set(
            Platform::Ebay,
            PlatformFee::new(Percent::HUNDRED, Money::ZERO),
        );
        assert!(matches!(
            fees.validate(),
            Err(CoreError::InvalidFeeSchedule { .. })
        ));
    }

    #[test]
    fn test_net_listing_price() {
        let fees = FeeSchedule::conventional();
        // $100 on WHATNOT: 100 - (12 + 0.30)
        let net = net_listing_price(Money::from_whole(100), &fees.get(Platform::Whatnot)).unwrap();
        assert_eq!(net, Money::new(dec!(87.70)));

        let direct = net_listing_price(Money::from_whole(100), &fees.get(Platform::Discord)).unwrap();
        assert_eq!(direct, Money::from_whole(100));
    }

    #[test]
    fn test_schedule_json_shape() {
        let json = serde_json::to_value(FeeSchedule::conventional()).unwrap();
        assert_eq!(json["WHATNOT"]["feePercent"], "12");
        assert_eq!(json["PAYPAL"]["feeFlat"], "0.49");
    }
}
