//! # Pricing & Profit
//!
//! Break-even prices, net profit and retail price suggestions.
//!
//! ## Two Break-Even Formulas
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  (a) ADDITIVE - break_even_additive                                     │
//! │      unit + shipping + materials + fee_total                           │
//! │      fee_total is already known because the sold price is fixed.       │
//! │      Used for: recorded Sale / PackSale breakdowns (display only).      │
//! │                                                                         │
//! │  (b) INVERTED - break_even_listing_price                               │
//! │      (unit + shipping + materials + fee_flat) / (1 - fee% / 100)       │
//! │      The percentage fee is taken out of the unknown price itself.       │
//! │      Used for: "what is the lowest price I can list at?"               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Retail Suggestion Flow
//! ```text
//! cost ──► × (1 + markup) ──► ÷ (1 - whatnot fee) ──► ceil ──► retail
//!                                                               │
//!              box? ──► retail ÷ packs × (1 + pack markup) ──► ceil ──► pack
//!                                                               │
//!                            ebay = ceil(retail × 1.02), discord = ceil(retail × 0.95)
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use ts_rs::TS;

use crate::category::CategoryConfig;
use crate::error::{CoreResult, ValidationError};
use crate::fees::{net_listing_price, FeeSchedule, PlatformFee};
use crate::money::{out_of_range, Money};
use crate::types::{Item, ItemType, Percent, Platform};
use crate::validation::{validate_margin, validate_non_negative, validate_packs_per_box, validate_positive};

/// Listing premium on eBay over the WhatNot retail price (+2%).
const EBAY_PRICE_FACTOR: Decimal = Decimal::from_parts(102, 0, 0, false, 2);

/// Discount for direct channels with no platform fee (-5%).
const DISCORD_PRICE_FACTOR: Decimal = Decimal::from_parts(95, 0, 0, false, 2);

/// Default target margin for [`suggested_listing_price`].
pub const DEFAULT_TARGET_MARGIN: Decimal = Decimal::from_parts(88, 0, 0, false, 2);

// =============================================================================
// Cost Basis
// =============================================================================

/// Everything a sale has to pay back besides the platform fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CostBasis {
    pub unit_cost: Money,
    #[serde(default)]
    pub shipping_cost: Money,
    #[serde(default)]
    pub materials_cost: Money,
}

impl CostBasis {
    pub fn new(unit_cost: Money, shipping_cost: Money, materials_cost: Money) -> Self {
        CostBasis {
            unit_cost,
            shipping_cost,
            materials_cost,
        }
    }

    /// Unit cost alone, with no shipping or materials.
    pub fn unit(unit_cost: Money) -> Self {
        CostBasis::new(unit_cost, Money::ZERO, Money::ZERO)
    }

    /// `unit + shipping + materials`; `OutOfRange` if the sum overflows.
    pub fn total(&self) -> CoreResult<Money> {
        self.unit_cost
            .checked_add(self.shipping_cost)
            .and_then(|sum| sum.checked_add(self.materials_cost))
            .ok_or_else(|| out_of_range("total_cost").into())
    }

    pub fn validate(&self) -> CoreResult<()> {
        validate_non_negative("unit_cost", self.unit_cost)?;
        validate_non_negative("shipping_cost", self.shipping_cost)?;
        validate_non_negative("materials_cost", self.materials_cost)?;
        Ok(())
    }
}

// =============================================================================
// Break-Even & Net Profit
// =============================================================================

/// Break-even against an already fixed sold price: the sum of all costs and
/// the fee total that sold price incurred.
///
/// Only meaningful for reporting on a recorded sale. To find the lowest
/// price worth listing at, use [`break_even_listing_price`].
pub fn break_even_additive(costs: &CostBasis, fee_total: Money) -> CoreResult<Money> {
    costs
        .total()?
        .checked_add(fee_total)
        .ok_or_else(|| out_of_range("break_even_price").into())
}

/// The lowest listing price at which, after the platform deducts its
/// percentage and flat fee, every cost is covered.
///
/// `(unit + shipping + materials + fee_flat) / (1 - fee_percent / 100)`
///
/// ## Errors
/// - `InvalidInput` for negative costs or fee components
/// - `InvalidFeeSchedule` when `fee_percent >= 100`
///
/// ## Example
/// ```rust
/// use rust_decimal_macros::dec;
/// use stockroom_core::fees::PlatformFee;
/// use stockroom_core::money::Money;
/// use stockroom_core::pricing::{break_even_listing_price, CostBasis};
/// use stockroom_core::types::Percent;
///
/// let costs = CostBasis::new(Money::new(dec!(12)), Money::new(dec!(1.50)), Money::new(dec!(1)));
/// let fee = PlatformFee::new(Percent::new(dec!(10)), Money::new(dec!(0.30)));
///
/// // (14.50 + 0.30) / 0.90
/// let price = break_even_listing_price(&costs, &fee).unwrap();
/// assert_eq!(price.round_cents(), Money::new(dec!(16.44)));
/// ```
pub fn break_even_listing_price(costs: &CostBasis, fee: &PlatformFee) -> CoreResult<Money> {
    costs.validate()?;
    fee.validate_for_gross_up()?;

    let total = costs.total()?;
    let price = total
        .checked_add(fee.fee_flat)
        .and_then(|owed| owed.checked_div(fee.retained_fraction()))
        .ok_or_else(|| out_of_range("break_even_price"))?;

    debug!(
        costs = %total,
        fee_percent = %fee.fee_percent,
        fee_flat = %fee.fee_flat,
        %price,
        "computed break-even listing price"
    );
    Ok(price)
}

/// `sold - unit - shipping - materials - fee(sold)`.
///
/// Signed: a loss comes back negative and is never clamped to zero.
pub fn net_profit(sold_price: Money, costs: &CostBasis, fee: &PlatformFee) -> CoreResult<Money> {
    costs.validate()?;
    fee.validate()?;

    let fee_total = fee.fee_on(sold_price)?;
    sold_price
        .checked_sub(costs.total()?)
        .and_then(|left| left.checked_sub(fee_total))
        .ok_or_else(|| out_of_range("net_profit").into())
}

/// Quick quote: the whole-dollar price that keeps `margin` of the sale after
/// fees, `ceil(total_cost / margin)`. Pass [`DEFAULT_TARGET_MARGIN`] for the
/// usual 88%.
pub fn suggested_listing_price(total_cost: Money, margin: Decimal) -> CoreResult<Money> {
    validate_non_negative("total_cost", total_cost)?;
    validate_margin(margin)?;

    let price = total_cost
        .checked_div(margin)
        .ok_or_else(|| out_of_range("total_cost"))?;
    Ok(price.ceil_whole())
}

// =============================================================================
// Retail Pricing Suggestion
// =============================================================================

/// What [`suggest_pricing`] needs to know about an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    pub cost: Money,
    #[serde(default)]
    pub item_type: ItemType,
    #[serde(default)]
    pub packs_per_box: Option<u32>,
    #[serde(default)]
    pub market_price: Option<Money>,
}

impl From<&Item> for PricingRequest {
    fn from(item: &Item) -> Self {
        PricingRequest {
            cost: item.cost,
            item_type: item.item_type,
            packs_per_box: Some(item.packs_per_box),
            market_price: item.market_price,
        }
    }
}

/// Listing prices per channel, all derived from the retail price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PlatformPrices {
    pub whatnot: Money,
    pub ebay: Money,
    pub discord: Money,
}

/// The inputs and result behind a suggestion, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingCalculations {
    pub base_markup: Percent,
    /// WhatNot percentage fee used for the gross-up.
    pub platform_fee: Percent,
    pub pack_markup: Option<Percent>,
    /// Markup realized by the final, rounded retail price.
    pub final_markup_percent: Percent,
}

/// Suggested prices for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingSuggestion {
    pub retail_price: Money,
    pub pack_price: Option<Money>,
    pub pack_group_price: Option<Money>,
    /// Packs in one group price, when pack pricing applies.
    pub pack_group_size: Option<u32>,
    pub platform_prices: PlatformPrices,
    pub calculations: PricingCalculations,
}

/// Compact form shown next to an item: `Retail: $74 | Pack: $19 | 3-Pack: $57`.
///
/// Whole-dollar prices drop the cents; a market price keeps them.
impl fmt::Display for PricingSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Retail: ")?;
        write_price(f, self.retail_price)?;
        if let Some(pack) = self.pack_price {
            f.write_str(" | Pack: ")?;
            write_price(f, pack)?;
        }
        if let (Some(group), Some(size)) = (self.pack_group_price, self.pack_group_size) {
            write!(f, " | {}-Pack: ", size)?;
            write_price(f, group)?;
        }
        Ok(())
    }
}

fn write_price(f: &mut fmt::Formatter<'_>, price: Money) -> fmt::Result {
    let amount = price.amount();
    if amount.fract().is_zero() && !amount.is_sign_negative() {
        write!(f, "${}", amount.trunc())
    } else {
        write!(f, "{}", price)
    }
}

/// Suggests retail, pack and per-platform prices for an item.
///
/// ## Algorithm
/// 1. Market pricing when the category asks for it and the item has a
///    positive market price. Otherwise
///    `ceil(cost × (1 + markup) / (1 - whatnot_fee))`.
/// 2. Boxes: `pack = ceil(retail / packs × (1 + pack_markup))` and
///    `group = pack × pack_group_size`.
/// 3. `ebay = ceil(retail × 1.02)`, `discord = ceil(retail × 0.95)`.
/// 4. Final markup from the rounded retail price.
///
/// ## Errors
/// - `InvalidInput`: `cost <= 0`; a box with no or zero `packs_per_box`;
///   invalid category rules
/// - `InvalidFeeSchedule`: WhatNot fee at or above 100% on the markup path
///
/// ## Example
/// ```rust
/// use stockroom_core::category::category_presets;
/// use stockroom_core::fees::FeeSchedule;
/// use stockroom_core::money::Money;
/// use stockroom_core::pricing::{suggest_pricing, PricingRequest};
/// use stockroom_core::types::ItemType;
///
/// let boxes = category_presets()["Boxes"];
/// let request = PricingRequest {
///     cost: Money::from_whole(50),
///     item_type: ItemType::Box,
///     packs_per_box: Some(5),
///     market_price: None,
/// };
///
/// let pricing = suggest_pricing(&request, &boxes, &FeeSchedule::conventional()).unwrap();
/// // 50 × 1.30 = 65, 65 / 0.88 = 73.86 → 74
/// assert_eq!(pricing.retail_price, Money::from_whole(74));
/// assert_eq!(pricing.to_string(), "Retail: $74 | Pack: $19 | 3-Pack: $57");
/// ```
pub fn suggest_pricing(
    request: &PricingRequest,
    category: &CategoryConfig,
    fees: &FeeSchedule,
) -> CoreResult<PricingSuggestion> {
    validate_positive("cost", request.cost)?;
    category.validate()?;

    let pack_count = match request.item_type {
        ItemType::Box => {
            let packs = request.packs_per_box.unwrap_or(0);
            validate_packs_per_box(packs)?;
            Some(packs)
        }
        _ => None,
    };

    let whatnot = fees.get(Platform::Whatnot);
    let market_price = request.market_price.filter(Money::is_positive);

    // Step 1: base retail price
    let retail_price = match market_price {
        Some(market) if category.use_market_pricing => market,
        _ => {
            whatnot.validate_for_gross_up()?;
            request
                .cost
                .checked_mul(category.base_markup_percent.markup_factor())
                .and_then(|base_price| base_price.checked_div(whatnot.retained_fraction()))
                .ok_or_else(|| out_of_range("cost"))?
                .ceil_whole()
        }
    };

    // Step 2: pack pricing for boxes
    let (pack_price, pack_group_price, pack_group_size) = match pack_count {
        Some(packs) => {
            let base_pack = retail_price
                .checked_div(Decimal::from(packs))
                .ok_or_else(|| ValidationError::MustBePositive {
                    field: "packs_per_box".to_string(),
                })?;
            let pack = base_pack
                .checked_mul(category.pack_markup_percent.markup_factor())
                .ok_or_else(|| out_of_range("pack_price"))?
                .ceil_whole();
            let group = pack
                .checked_mul(Decimal::from(category.pack_group_size))
                .ok_or_else(|| out_of_range("pack_group_price"))?;
            (Some(pack), Some(group), Some(category.pack_group_size))
        }
        None => (None, None, None),
    };

    // Step 3: channel variants
    let channel_price = |factor: Decimal| {
        retail_price
            .checked_mul(factor)
            .map(|price| price.ceil_whole())
            .ok_or_else(|| out_of_range("retail_price"))
    };
    let platform_prices = PlatformPrices {
        whatnot: retail_price,
        ebay: channel_price(EBAY_PRICE_FACTOR)?,
        discord: channel_price(DISCORD_PRICE_FACTOR)?,
    };

    // Step 4: realized markup; cost > 0 was checked above
    let final_markup = retail_price
        .checked_sub(request.cost)
        .and_then(|gain| gain.amount().checked_div(request.cost.amount()))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| out_of_range("final_markup_percent"))?;

    let suggestion = PricingSuggestion {
        retail_price,
        pack_price,
        pack_group_price,
        pack_group_size,
        platform_prices,
        calculations: PricingCalculations {
            base_markup: category.base_markup_percent,
            platform_fee: whatnot.fee_percent,
            pack_markup: pack_count.map(|_| category.pack_markup_percent),
            final_markup_percent: Percent::new(final_markup),
        },
    };

    debug!(
        cost = %request.cost,
        item_type = %request.item_type,
        retail = %suggestion.retail_price,
        "suggested pricing"
    );
    Ok(suggestion)
}

// =============================================================================
// Item Pricing
// =============================================================================

/// The derived price fields stored on an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItemPricing {
    pub retail_price: Money,
    pub pack_price: Option<Money>,
    pub pack_group_price: Option<Money>,
    /// Take-home from the eBay listing price after eBay's fee.
    pub ebay_net_price: Money,
    /// Take-home from the WhatNot listing price after WhatNot's fee.
    pub whatnot_net_price: Money,
}

impl ItemPricing {
    /// Suggests prices for `item` and derives the per-platform take-home.
    pub fn for_item(item: &Item, category: &CategoryConfig, fees: &FeeSchedule) -> CoreResult<Self> {
        let suggestion = suggest_pricing(&PricingRequest::from(item), category, fees)?;
        let prices = suggestion.platform_prices;

        Ok(ItemPricing {
            retail_price: suggestion.retail_price,
            pack_price: suggestion.pack_price,
            pack_group_price: suggestion.pack_group_price,
            ebay_net_price: net_listing_price(prices.ebay, &fees.get(Platform::Ebay))?,
            whatnot_net_price: net_listing_price(prices.whatnot, &fees.get(Platform::Whatnot))?,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
