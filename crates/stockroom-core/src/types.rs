//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │    Platform     │   │    Percent      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  cost           │   │  Whatnot        │   │  12 = 12%       │       │
//! │  │  quantity       │   │  Ebay, Paypal   │   │  exact decimal  │       │
//! │  │  item_type      │   │  Discord, ...   │   └─────────────────┘       │
//! │  │  packs_per_box  │   └─────────────────┘                              │
//! │  │  market_price   │   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  status         │   │    ItemType     │   │   ItemStatus    │       │
//! │  └─────────────────┘   │  Single/Pack/Box│   │  InStock, ...   │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only the fields the engine reads or produces live here. Names,
//! descriptions, images and relations belong to the persistence layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::{finite_decimal, out_of_range, Money};

// =============================================================================
// Percent
// =============================================================================

/// A percentage in percent units: `Percent::new(12)` is 12%.
///
/// Used for platform fees, markups and reported markup results.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Percent(#[ts(type = "string")] Decimal);

impl Percent {
    /// 0%.
    pub const ZERO: Percent = Percent(Decimal::ZERO);

    /// 100%.
    pub const HUNDRED: Percent = Percent(Decimal::ONE_HUNDRED);

    /// Creates a percentage from percent units.
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Percent(value)
    }

    /// Creates a whole-number percentage.
    #[inline]
    pub fn whole(value: i64) -> Self {
        Percent(Decimal::from(value))
    }

    /// Converts a number typed into a form field, rejecting NaN/infinity.
    pub fn try_from_f64(field: &str, value: f64) -> Result<Self, ValidationError> {
        finite_decimal(field, value).map(Percent)
    }

    /// Returns the value in percent units (12 for 12%).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the value as a fraction (0.12 for 12%).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// `1 + fraction`, the multiplier for a markup.
    #[inline]
    pub fn markup_factor(&self) -> Decimal {
        Decimal::ONE + self.fraction()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

impl From<Decimal> for Percent {
    fn from(value: Decimal) -> Self {
        Percent(value)
    }
}

// =============================================================================
// Platform
// =============================================================================

/// A marketplace or channel an item is sold through.
///
/// Each platform has a conventional fee in
/// [`FeeSchedule::conventional`](crate::fees::FeeSchedule::conventional).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    /// Live-auction marketplace; the primary channel for retail pricing.
    Whatnot,
    Ebay,
    /// PayPal Goods & Services invoices.
    Paypal,
    /// Direct sales arranged over Discord.
    Discord,
    Instagram,
    Other,
}

impl Platform {
    /// Every platform, in display order.
    pub const ALL: [Platform; 6] = [
        Platform::Whatnot,
        Platform::Ebay,
        Platform::Paypal,
        Platform::Discord,
        Platform::Instagram,
        Platform::Other,
    ];

    /// Wire name, e.g. `"WHATNOT"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Whatnot => "WHATNOT",
            Platform::Ebay => "EBAY",
            Platform::Paypal => "PAYPAL",
            Platform::Discord => "DISCORD",
            Platform::Instagram => "INSTAGRAM",
            Platform::Other => "OTHER",
        }
    }

    /// Human label for dropdowns.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Whatnot => "Whatnot",
            Platform::Ebay => "eBay",
            Platform::Paypal => "PayPal G&S",
            Platform::Discord => "Discord",
            Platform::Instagram => "Instagram",
            Platform::Other => "Other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ValidationError;

    /// Case-insensitive: `"ebay"`, `"EBAY"` and `"eBay"` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "platform".to_string(),
                allowed: Platform::ALL.iter().map(|p| p.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Item Type
// =============================================================================

/// How an inventory item is sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// One unit, sold as-is.
    #[default]
    Single,
    /// A single sealed pack.
    Pack,
    /// A box of `packs_per_box` packs; packs may be sold off one at a time.
    Box,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Single => "single",
            ItemType::Pack => "pack",
            ItemType::Box => "box",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(ItemType::Single),
            "pack" => Ok(ItemType::Pack),
            "box" => Ok(ItemType::Box),
            _ => Err(ValidationError::NotAllowed {
                field: "item_type".to_string(),
                allowed: vec!["single".into(), "pack".into(), "box".into()],
            }),
        }
    }
}

// =============================================================================
// Item Status
// =============================================================================

/// Stock status of an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    InStock,
    LowStock,
    OutOfStock,
    Sold,
    Reserved,
    /// Last unit sold; reorder from a vendor.
    NeedsRestock,
    Discontinued,
}

// =============================================================================
// Item
// =============================================================================

/// The pricing-relevant view of an inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unit acquisition cost.
    pub cost: Money,

    /// Units on hand.
    pub quantity: u32,

    #[serde(default)]
    pub item_type: ItemType,

    /// Packs in one box. Only meaningful for [`ItemType::Box`].
    #[serde(default = "default_packs_per_box")]
    pub packs_per_box: u32,

    /// Market price, used when the category prefers market pricing.
    #[serde(default)]
    pub market_price: Option<Money>,

    #[serde(default)]
    pub status: ItemStatus,
}

fn default_packs_per_box() -> u32 {
    1
}

impl Item {
    /// Creates an in-stock single item.
    pub fn single(cost: Money, quantity: u32) -> Self {
        Item {
            cost,
            quantity,
            item_type: ItemType::Single,
            packs_per_box: 1,
            market_price: None,
            status: ItemStatus::InStock,
        }
    }

    /// Creates an in-stock box of `packs_per_box` packs.
    pub fn sealed_box(cost: Money, quantity: u32, packs_per_box: u32) -> Self {
        Item {
            item_type: ItemType::Box,
            packs_per_box,
            ..Item::single(cost, quantity)
        }
    }

    /// Sets the market price.
    pub fn with_market_price(mut self, price: Money) -> Self {
        self.market_price = Some(price);
        self
    }

    #[inline]
    pub fn is_box(&self) -> bool {
        self.item_type == ItemType::Box
    }

    /// Value of the stock on hand at cost (`cost × quantity`).
    pub fn total_value(&self) -> CoreResult<Money> {
        self.cost
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(|| out_of_range("total_value").into())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_fraction() {
        let fee = Percent::new(dec!(12));
        assert_eq!(fee.fraction(), dec!(0.12));
        assert_eq!(fee.markup_factor(), dec!(1.12));
        assert_eq!(Percent::new(dec!(3.49)).fraction(), dec!(0.0349));
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(Percent::new(dec!(12.00)).to_string(), "12%");
        assert_eq!(Percent::new(dec!(3.49)).to_string(), "3.49%");
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("WHATNOT".parse::<Platform>().unwrap(), Platform::Whatnot);
        assert_eq!("eBay".parse::<Platform>().unwrap(), Platform::Ebay);
        assert_eq!(" paypal ".parse::<Platform>().unwrap(), Platform::Paypal);
        assert!("etsy".parse::<Platform>().is_err());
    }

    #[test]
    fn test_platform_wire_names() {
        for platform in Platform::ALL {
            let json = serde_json::to_string(&platform).unwrap();
            assert_eq!(json, format!("\"{}\"", platform.as_str()));
        }
    }

    #[test]
    fn test_item_type_from_str() {
        assert_eq!("Box".parse::<ItemType>().unwrap(), ItemType::Box);
        assert_eq!(ItemType::default(), ItemType::Single);
        assert!("crate".parse::<ItemType>().is_err());
    }

    #[test]
    fn test_item_total_value() {
        let item = Item::single(Money::from_cents(1250), 4);
        assert_eq!(item.total_value().unwrap(), Money::from_whole(50));

        let empty = Item::single(Money::from_cents(1250), 0);
        assert_eq!(empty.total_value().unwrap(), Money::ZERO);

        let huge = Item::single(Money::new(Decimal::MAX), 2);
        assert_eq!(huge.total_value().unwrap_err().code(), "INVALID_INPUT");
    }

    #[test]
    fn test_item_deserialize_defaults() {
        let item: Item = serde_json::from_str(r#"{"cost":"20","quantity":2}"#).unwrap();
        assert_eq!(item.item_type, ItemType::Single);
        assert_eq!(item.packs_per_box, 1);
        assert_eq!(item.market_price, None);
        assert_eq!(item.status, ItemStatus::InStock);
    }
}
