//! # CLI Commands
//!
//! One function per subcommand. Each takes the loaded [`PricingConfig`]
//! plus plain arguments and returns a serializable result; `main` prints it
//! as JSON.
//!
//! ```text
//! ┌──────────────┬──────────────────────────────────────────────┐
//! │ fees         │ effective fee schedule                       │
//! │ quote        │ suggest_pricing + per-platform net prices    │
//! │ sale         │ recorded-sale breakdown (additive break-even)│
//! │ break-even   │ minimum listing price (inverted break-even)  │
//! │ box-rollup   │ pack revenue and projection for one box      │
//! └──────────────┴──────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::Serialize;
use stockroom_core::{
    break_even_listing_price, net_listing_price, suggest_pricing, BoxRollup, CostBasis,
    FeeSchedule, Item, ItemType, Money, Percent, Platform, PlatformFee, PricingRequest,
    PricingSuggestion, SaleBreakdown, SaleInput,
};
use tracing::debug;

use crate::config::PricingConfig;
use crate::error::CliResult;

// =============================================================================
// fees
// =============================================================================

pub fn fees(config: &PricingConfig) -> FeeSchedule {
    debug!("fees command");
    config.fees.clone()
}

// =============================================================================
// quote
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct QuoteArgs {
    pub cost: Decimal,
    pub item_type: ItemType,
    pub packs_per_box: Option<u32>,
    pub market_price: Option<Decimal>,
    pub category: Option<String>,
}

/// A pricing suggestion plus what the seller keeps on each listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[serde(flatten)]
    pub suggestion: PricingSuggestion,
    pub ebay_net_price: Money,
    pub whatnot_net_price: Money,
}

pub fn quote(config: &PricingConfig, args: &QuoteArgs) -> CliResult<Quote> {
    debug!(cost = %args.cost, item_type = %args.item_type, "quote command");

    let category = config.category(args.category.as_deref())?;
    let request = PricingRequest {
        cost: Money::new(args.cost),
        item_type: args.item_type,
        packs_per_box: args.packs_per_box,
        market_price: args.market_price.map(Money::new),
    };

    let suggestion = suggest_pricing(&request, &category, &config.fees)?;
    let prices = suggestion.platform_prices;
    let ebay_net_price =
        net_listing_price(prices.ebay, &config.fees.get(Platform::Ebay))?.round_cents();
    let whatnot_net_price =
        net_listing_price(prices.whatnot, &config.fees.get(Platform::Whatnot))?.round_cents();

    Ok(Quote {
        suggestion,
        ebay_net_price,
        whatnot_net_price,
    })
}

// =============================================================================
// sale
// =============================================================================

#[derive(Debug, Clone)]
pub struct SaleArgs {
    pub platform: Platform,
    pub sold: Decimal,
    pub cost: Decimal,
    pub shipping: Decimal,
    pub materials: Decimal,
    /// Replaces the platform's configured percentage when set.
    pub fee_percent: Option<Decimal>,
    /// Replaces the platform's configured flat fee when set.
    pub fee_flat: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReport {
    pub input: SaleInput,
    #[serde(flatten)]
    pub breakdown: SaleBreakdown,
    pub is_loss: bool,
}

pub fn sale(config: &PricingConfig, args: &SaleArgs) -> CliResult<SaleReport> {
    debug!(platform = %args.platform, sold = %args.sold, "sale command");

    let mut fee = config.fees.get(args.platform);
    if let Some(percent) = args.fee_percent {
        fee.fee_percent = Percent::new(percent);
    }
    if let Some(flat) = args.fee_flat {
        fee.fee_flat = Money::new(flat);
    }

    let input = SaleInput::new(args.platform, Money::new(args.sold), Money::new(args.cost))
        .with_shipping(Money::new(args.shipping))
        .with_materials(Money::new(args.materials))
        .with_fee(fee);

    let breakdown = input.breakdown()?.rounded();

    Ok(SaleReport {
        input,
        is_loss: breakdown.is_loss(),
        breakdown,
    })
}

// =============================================================================
// break-even
// =============================================================================

#[derive(Debug, Clone)]
pub struct BreakEvenArgs {
    pub platform: Platform,
    pub cost: Decimal,
    pub shipping: Decimal,
    pub materials: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakEvenReport {
    pub platform: Platform,
    pub fee: PlatformFee,
    pub total_cost: Money,
    /// Lowest listing price that covers costs and the fee on itself.
    pub break_even_price: Money,
}

pub fn break_even(config: &PricingConfig, args: &BreakEvenArgs) -> CliResult<BreakEvenReport> {
    debug!(platform = %args.platform, cost = %args.cost, "break-even command");

    let costs = CostBasis::new(
        Money::new(args.cost),
        Money::new(args.shipping),
        Money::new(args.materials),
    );
    let fee = config.fees.get(args.platform);
    let price = break_even_listing_price(&costs, &fee)?;

    Ok(BreakEvenReport {
        platform: args.platform,
        fee,
        total_cost: costs.total()?,
        break_even_price: price.round_cents(),
    })
}

// =============================================================================
// box-rollup
// =============================================================================

#[derive(Debug, Clone)]
pub struct BoxRollupArgs {
    pub cost: Decimal,
    pub quantity: u32,
    pub packs_per_box: u32,
    pub sold: Vec<Decimal>,
}

pub fn box_rollup(args: &BoxRollupArgs) -> CliResult<BoxRollup> {
    debug!(packs_per_box = args.packs_per_box, sales = args.sold.len(), "box-rollup command");

    let parent = Item::sealed_box(Money::new(args.cost), args.quantity, args.packs_per_box);
    let rollup = BoxRollup::compute(&parent, args.sold.iter().copied().map(Money::new))?;
    Ok(rollup)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_box_uses_boxes_preset() {
        let config = PricingConfig::default();
        let args = QuoteArgs {
            cost: dec!(50),
            item_type: ItemType::Box,
            packs_per_box: Some(5),
            category: Some("Boxes".to_string()),
            ..Default::default()
        };

        let quote = quote(&config, &args).unwrap();
        assert_eq!(quote.suggestion.retail_price, Money::from_whole(74));
        assert_eq!(quote.suggestion.pack_price, Some(Money::from_whole(19)));
        assert_eq!(quote.suggestion.pack_group_price, Some(Money::from_whole(57)));
        // 76 - (7.60 + 0.30)
        assert_eq!(quote.ebay_net_price, Money::new(dec!(68.10)));
        // 74 - (8.88 + 0.30)
        assert_eq!(quote.whatnot_net_price, Money::new(dec!(64.82)));
    }

    #[test]
    fn test_quote_rejects_unrepresentable_cost() {
        let config = PricingConfig::default();
        for cost in [dec!(0.0000000000000000000000000001), Decimal::MAX] {
            let args = QuoteArgs {
                cost,
                ..Default::default()
            };
            assert_eq!(quote(&config, &args).unwrap_err().code(), "INVALID_INPUT");
        }
    }

    #[test]
    fn test_quote_unknown_category() {
        let config = PricingConfig::default();
        let args = QuoteArgs {
            cost: dec!(10),
            category: Some("Comics".to_string()),
            ..Default::default()
        };
        assert_eq!(quote(&config, &args).unwrap_err().code(), "NOT_FOUND");
    }

    #[test]
    fn test_sale_with_platform_defaults() {
        let config = PricingConfig::default();
        let args = SaleArgs {
            platform: Platform::Whatnot,
            sold: dec!(125),
            cost: dec!(50),
            shipping: dec!(5),
            materials: dec!(2.50),
            fee_percent: None,
            fee_flat: None,
        };

        let report = sale(&config, &args).unwrap();
        assert_eq!(report.breakdown.platform_fee_total, Money::new(dec!(15.30)));
        assert_eq!(report.breakdown.break_even_price, Money::new(dec!(72.80)));
        assert_eq!(report.breakdown.net_profit, Money::new(dec!(52.20)));
        assert!(!report.is_loss);
    }

    #[test]
    fn test_sale_fee_flags_override_one_component() {
        let config = PricingConfig::default();
        let args = SaleArgs {
            platform: Platform::Ebay,
            sold: dec!(10),
            cost: dec!(12),
            shipping: Decimal::ZERO,
            materials: Decimal::ZERO,
            fee_percent: Some(dec!(0)),
            fee_flat: None,
        };

        let report = sale(&config, &args).unwrap();
        assert_eq!(report.input.platform_fee_flat, Money::new(dec!(0.30)));
        assert_eq!(report.breakdown.net_profit, Money::new(dec!(-2.30)));
        assert!(report.is_loss);
    }

    #[test]
    fn test_break_even_inverted() {
        let config = PricingConfig::default();
        let args = BreakEvenArgs {
            platform: Platform::Discord,
            cost: dec!(12),
            shipping: dec!(1.50),
            materials: dec!(1.00),
        };

        let report = break_even(&config, &args).unwrap();
        assert_eq!(report.total_cost, Money::new(dec!(14.50)));
        assert_eq!(report.break_even_price, Money::new(dec!(14.50)));

        let ebay = break_even(
            &config,
            &BreakEvenArgs {
                platform: Platform::Ebay,
                ..args
            },
        )
        .unwrap();
        // (14.50 + 0.30) / 0.90
        assert_eq!(ebay.break_even_price, Money::new(dec!(16.44)));
    }

    #[test]
    fn test_box_rollup() {
        let args = BoxRollupArgs {
            cost: dec!(120),
            quantity: 1,
            packs_per_box: 24,
            sold: vec![dec!(7), dec!(6.50)],
        };

        let rollup = box_rollup(&args).unwrap();
        assert_eq!(rollup.cost_per_pack, Money::from_whole(5));
        assert_eq!(rollup.packs_remaining, 22);
        assert_eq!(rollup.projected_net_profit, Money::from_whole(42));
    }

    #[test]
    fn test_box_rollup_rejects_zero_packs() {
        let args = BoxRollupArgs {
            cost: dec!(120),
            quantity: 1,
            packs_per_box: 0,
            sold: Vec::new(),
        };
        assert_eq!(box_rollup(&args).unwrap_err().code(), "INVALID_INPUT");
    }
}
