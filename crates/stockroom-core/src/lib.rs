//! # stockroom-core: Pricing & Profit Engine for Stockroom
//!
//! Pure, synchronous calculations for a collectibles reseller: platform
//! fees, break-even prices, net profit, retail price suggestions and
//! pack/box unit economics.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        Web UI (live profit preview on every keystroke)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        Request handlers / pricing-cli                           │   │
//! │  │    load config, fetch records, store derived fields             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  money  │ │  fees   │ │ pricing │ │  sale   │ │  pack   │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO SHARED STATE • PURE FUNCTIONS      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Exact decimal `Money`
//! - [`types`] - `Item`, `Platform`, `Percent`, ...
//! - [`fees`] - The fee schedule and fee application
//! - [`category`] - Per-category markup rules and presets
//! - [`pricing`] - Break-even, net profit, retail suggestions
//! - [`sale`] - Sale breakdowns and cache verification
//! - [`pack`] - Pack sales and box rollups
//! - [`inventory`] - Valuation and stock alerts
//! - [`vendor`] - Purchase order totals and restocking
//! - [`validation`] - Input checks
//! - [`error`] - Error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output; safe to call from any
//!    number of threads at once
//! 2. **No Intermediate Rounding**: round for display, never mid-calculation
//! 3. **One Fee Table**: every fee comes from a [`FeeSchedule`]
//! 4. **Explicit Errors**: typed, and each names the offending field
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal_macros::dec;
//! use stockroom_core::{FeeSchedule, Money, Platform, SaleInput};
//!
//! let sale = SaleInput::new(Platform::Ebay, Money::new(dec!(18)), Money::new(dec!(12)))
//!     .with_shipping(Money::new(dec!(1.50)))
//!     .with_materials(Money::new(dec!(1.00)))
//!     .with_platform_fee(&FeeSchedule::conventional());
//!
//! let breakdown = sale.breakdown().unwrap();
//! assert_eq!(breakdown.net_profit, Money::new(dec!(1.40)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod category;
pub mod error;
pub mod fees;
pub mod inventory;
pub mod money;
pub mod pack;
pub mod pricing;
pub mod sale;
pub mod types;
pub mod validation;
pub mod vendor;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use category::{category_presets, CategoryConfig};
pub use error::{CoreError, CoreResult, ValidationError};
pub use fees::{apply_platform_fee, net_listing_price, FeeSchedule, PlatformFee};
pub use inventory::{InventorySummary, StockAlert};
pub use money::Money;
pub use pack::{cost_per_pack, next_pack_number, BoxRollup, PackSaleBreakdown, PackSaleInput};
pub use pricing::{
    break_even_additive, break_even_listing_price, net_profit, suggest_pricing,
    suggested_listing_price, CostBasis, ItemPricing, PricingRequest, PricingSuggestion,
};
pub use sale::{verify_cached, CacheDrift, SaleBreakdown, SaleInput};
pub use types::*;
pub use vendor::{OrderLine, OrderStatus, Restock, VendorOrder};
