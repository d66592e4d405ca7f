//! # Category Pricing Rules
//!
//! Per-category markup configuration and the built-in presets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::types::Percent;
use crate::validation::{validate_pack_group_size, validate_percent};

/// How items in a category are priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryConfig {
    /// Markup applied to unit cost before the platform fee gross-up.
    pub base_markup_percent: Percent,

    /// Extra markup on a pack sold individually, over its pro-rata share of
    /// the box price.
    pub pack_markup_percent: Percent,

    /// Packs bundled into one group price.
    pub pack_group_size: u32,

    /// Take the item's market price as-is instead of marking up cost.
    pub use_market_pricing: bool,
}

impl CategoryConfig {
    /// Rules for items without a category: 30% markup, 25% pack markup,
    /// packs grouped in fives.
    pub fn fallback() -> Self {
        CategoryConfig {
            base_markup_percent: Percent::whole(30),
            pack_markup_percent: Percent::whole(25),
            pack_group_size: 5,
            use_market_pricing: false,
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        validate_percent("base_markup_percent", self.base_markup_percent)?;
        validate_percent("pack_markup_percent", self.pack_markup_percent)?;
        validate_pack_group_size(self.pack_group_size)?;
        Ok(())
    }
}

impl Default for CategoryConfig {
    fn default() -> Self {
        CategoryConfig::fallback()
    }
}

/// Built-in category presets, keyed by category name.
///
/// | Category         | Markup | Pack markup | Group | Market pricing |
/// |------------------|--------|-------------|-------|----------------|
/// | Trading Cards    | 0%     | 25%         | 3     | yes            |
/// | Boxes            | 30%    | 25%         | 3     | no             |
/// | Action Figures   | 40%    | 0%          | 1     | no             |
/// | Collectible Pins | 50%    | 0%          | 1     | no             |
pub fn category_presets() -> BTreeMap<String, CategoryConfig> {
    let preset = |markup, pack_markup, group, market| CategoryConfig {
        base_markup_percent: Percent::whole(markup),
        pack_markup_percent: Percent::whole(pack_markup),
        pack_group_size: group,
        use_market_pricing: market,
    };

    BTreeMap::from([
        ("Trading Cards".to_string(), preset(0, 25, 3, true)),
        ("Boxes".to_string(), preset(30, 25, 3, false)),
        ("Action Figures".to_string(), preset(40, 0, 1, false)),
        ("Collectible Pins".to_string(), preset(50, 0, 1, false)),
    ])
}
