//! # Pricing Configuration
//!
//! Fee schedule and category rules used by every command.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKROOM_WHATNOT_FEE_PERCENT=11.5                                 │
//! │     STOCKROOM_EBAY_FEE_FLAT=0.40                                       │
//! │     STOCKROOM_DEFAULT_MARKUP_PERCENT=35                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/stockroom/stockroom.toml (Linux)                         │
//! │     ~/Library/Application Support/com.stockroom.stockroom/... (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     FeeSchedule::conventional(), category_presets()                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [fees.WHATNOT]
//! fee_percent = 11.5
//! fee_flat = 0.30
//!
//! [default_category]
//! base_markup_percent = 35
//! pack_markup_percent = 25
//! pack_group_size = 3
//! use_market_pricing = false
//!
//! [categories."Graded Slabs"]
//! base_markup_percent = 20
//! pack_markup_percent = 0
//! pack_group_size = 1
//! use_market_pricing = true
//! ```
//!
//! Entries in the file are merged over the defaults, so a file that only
//! sets the WhatNot fee keeps every other platform's conventional fee.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;
use stockroom_core::{
    category_presets, CategoryConfig, FeeSchedule, Money, Percent, Platform, PlatformFee,
};
use tracing::{debug, info};

use crate::error::{CliError, CliResult};

/// Environment variable prefix for overrides.
const ENV_PREFIX: &str = "STOCKROOM";

// =============================================================================
// File Format
// =============================================================================

/// A fee entry as written in the config file.
#[derive(Debug, Clone, Copy, Deserialize)]
struct FeeEntry {
    fee_percent: Decimal,
    #[serde(default)]
    fee_flat: Decimal,
}

/// A category entry as written in the config file.
#[derive(Debug, Clone, Copy, Deserialize)]
struct CategoryEntry {
    base_markup_percent: Decimal,
    #[serde(default)]
    pack_markup_percent: Decimal,
    #[serde(default = "one")]
    pack_group_size: u32,
    #[serde(default)]
    use_market_pricing: bool,
}

fn one() -> u32 {
    1
}

impl From<CategoryEntry> for CategoryConfig {
    fn from(entry: CategoryEntry) -> Self {
        CategoryConfig {
            base_markup_percent: Percent::new(entry.base_markup_percent),
            pack_markup_percent: Percent::new(entry.pack_markup_percent),
            pack_group_size: entry.pack_group_size,
            use_market_pricing: entry.use_market_pricing,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    fees: BTreeMap<String, FeeEntry>,
    #[serde(default)]
    categories: BTreeMap<String, CategoryEntry>,
    #[serde(default)]
    default_category: Option<CategoryEntry>,
}

// =============================================================================
// Effective Configuration
// =============================================================================

/// The configuration every command runs with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    pub fees: FeeSchedule,
    pub categories: BTreeMap<String, CategoryConfig>,
    /// Rules for items with no (or an unlisted) category.
    pub default_category: CategoryConfig,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            fees: FeeSchedule::conventional(),
            categories: category_presets(),
            default_category: CategoryConfig::fallback(),
        }
    }
}

impl PricingConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (stockroom.toml), if it exists
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading pricing config from file");
                let contents =
                    std::fs::read_to_string(&path).map_err(|source| CliError::ConfigRead {
                        path: path.clone(),
                        source,
                    })?;
                config.merge_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Merges a TOML document over the current values.
    pub fn merge_toml(&mut self, contents: &str) -> CliResult<()> {
        let file: ConfigFile = toml::from_str(contents)?;

        for (key, entry) in file.fees {
            let platform = Platform::from_str(&key).map_err(CliError::InvalidConfig)?;
            self.fees.set(
                platform,
                PlatformFee::new(Percent::new(entry.fee_percent), Money::new(entry.fee_flat)),
            );
        }
        for (name, entry) in file.categories {
            self.categories.insert(name, entry.into());
        }
        if let Some(entry) = file.default_category {
            self.default_category = entry.into();
        }

        Ok(())
    }

    /// Applies `STOCKROOM_*` overrides read through `lookup`.
    ///
    /// Per platform: `STOCKROOM_<PLATFORM>_FEE_PERCENT` and
    /// `STOCKROOM_<PLATFORM>_FEE_FLAT`. Plus
    /// `STOCKROOM_DEFAULT_MARKUP_PERCENT` for the default category.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> CliResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        for platform in Platform::ALL {
            let mut fee = self.fees.get(platform);

            let var = format!("{}_{}_FEE_PERCENT", ENV_PREFIX, platform.as_str());
            if let Some(value) = parse_override(&var, lookup(&var))? {
                debug!(%platform, %value, "Overriding fee percent from environment");
                fee.fee_percent = Percent::new(value);
            }

            let var = format!("{}_{}_FEE_FLAT", ENV_PREFIX, platform.as_str());
            if let Some(value) = parse_override(&var, lookup(&var))? {
                debug!(%platform, %value, "Overriding flat fee from environment");
                fee.fee_flat = Money::new(value);
            }

            self.fees.set(platform, fee);
        }

        let var = format!("{}_DEFAULT_MARKUP_PERCENT", ENV_PREFIX);
        if let Some(value) = parse_override(&var, lookup(&var))? {
            self.default_category.base_markup_percent = Percent::new(value);
        }

        Ok(())
    }

    /// Rejects negative values, fees at or above 100% and empty pack groups.
    pub fn validate(&self) -> CliResult<()> {
        self.fees.validate()?;
        self.default_category.validate()?;
        for config in self.categories.values() {
            config.validate()?;
        }
        Ok(())
    }

    /// Rules for `name`, or the default rules when `name` is `None`.
    pub fn category(&self, name: Option<&str>) -> CliResult<CategoryConfig> {
        match name {
            None => Ok(self.default_category),
            Some(name) => self
                .categories
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, config)| *config)
                .ok_or_else(|| CliError::UnknownCategory(name.to_string())),
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockroom", "stockroom")
            .map(|dirs| dirs.config_dir().join("stockroom.toml"))
    }
}

fn parse_override(var: &str, value: Option<String>) -> CliResult<Option<Decimal>> {
    match value {
        None => Ok(None),
        Some(raw) => Decimal::from_str(raw.trim())
            .map(Some)
            .map_err(|_| CliError::InvalidOverride {
                var: var.to_string(),
                value: raw,
            }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PricingConfig::default();
        assert_eq!(config.fees, FeeSchedule::conventional());
        assert_eq!(config.categories.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut config = PricingConfig::default();
        config
            .merge_toml(
                r#"
                [fees.WHATNOT]
                fee_percent = 11.5
                fee_flat = 0.30

                [categories."Graded Slabs"]
                base_markup_percent = 20
                use_market_pricing = true
                "#,
            )
            .unwrap();

        let whatnot = config.fees.get(Platform::Whatnot);
        assert_eq!(whatnot.fee_percent, Percent::new(dec!(11.5)));
        assert_eq!(whatnot.fee_flat, Money::new(dec!(0.30)));
        assert_eq!(
            config.fees.get(Platform::Paypal),
            FeeSchedule::conventional().get(Platform::Paypal)
        );

        let slabs = config.category(Some("graded slabs")).unwrap();
        assert_eq!(slabs.base_markup_percent, Percent::whole(20));
        assert_eq!(slabs.pack_group_size, 1);
        assert!(slabs.use_market_pricing);
        assert_eq!(config.categories.len(), 5);
    }

    #[test]
    fn test_invalid_toml() {
        let mut config = PricingConfig::default();
        let err = config.merge_toml("[fees.ETSY]\nfee_percent = 6.5").unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = PricingConfig::default();
        config
            .apply_env_overrides(env(&[
                ("STOCKROOM_EBAY_FEE_PERCENT", "13"),
                ("STOCKROOM_DISCORD_FEE_FLAT", "0.10"),
                ("STOCKROOM_DEFAULT_MARKUP_PERCENT", "35"),
            ]))
            .unwrap();

        let ebay = config.fees.get(Platform::Ebay);
        assert_eq!(ebay.fee_percent, Percent::whole(13));
        assert_eq!(ebay.fee_flat, Money::new(dec!(0.30)));
        assert_eq!(
            config.fees.get(Platform::Discord).fee_flat,
            Money::new(dec!(0.10))
        );
        assert_eq!(
            config.default_category.base_markup_percent,
            Percent::whole(35)
        );
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = PricingConfig::default();
        let err = config
            .apply_env_overrides(env(&[("STOCKROOM_WHATNOT_FEE_PERCENT", "twelve")]))
            .unwrap_err();
        assert!(err.to_string().contains("STOCKROOM_WHATNOT_FEE_PERCENT"));
    }

    #[test]
    fn test_validate_rejects_full_fee() {
        let mut config = PricingConfig::default();
        config
            .apply_env_overrides(env(&[("STOCKROOM_WHATNOT_FEE_PERCENT", "100")]))
            .unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), "INVALID_FEE_SCHEDULE");
    }

    #[test]
    fn test_unknown_category() {
        let config = PricingConfig::default();
        assert!(config.category(Some("Comics")).is_err());
        assert_eq!(
            config.category(None).unwrap(),
            CategoryConfig::fallback()
        );
    }
}
