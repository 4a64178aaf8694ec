//! Protocol constants
//!
//! Compile-time defaults. Anything a deployment may want to tune is mirrored
//! in `VaultConfig`, which is seeded from these values.

// ===== FIXED-POINT SCALES =====

/// 1e18 fixed-point unit used for ratios and ownership fractions
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Decimals of the lending market's base-currency valuations (USD, e8)
pub const BASE_CURRENCY_DECIMALS: u32 = 8;

/// Basis point denominator (100% = 10_000)
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Leverage ratio reported when the position carries no debt
pub const LEVERAGE_RATIO_SENTINEL: u128 = u128::MAX;

// ===== LEVERAGE TARGET =====

/// Target collateral / debt ratio: 2.0 in WAD
pub const TARGET_RATIO_WAD: u128 = 2 * WAD;

/// Rebalance is a no-op while the ratio sits within this band of target
pub const REBALANCE_TOLERANCE_BPS: u32 = 50; // 0.5%

/// Borrow/supply (or withdraw/repay) steps per rebalance call: one step plus one nested retry
pub const MAX_REBALANCE_STEPS: u8 = 2;

/// Maximum number of rebalance records kept in history
pub const MAX_REBALANCE_HISTORY: usize = 10;

// ===== SHARE VALUATION =====

/// Shares minted per whole unit of WETH on the very first deposit
pub const BOOTSTRAP_RATE: u128 = 10_000;

/// Haircut applied to every redemption to absorb unwind slippage
pub const REDEEM_HAIRCUT_BPS: u32 = 100; // 1%

/// Number of withdraw→swap→repay legs used to unwind a redeemer's debt share
pub const REDEEM_REPAY_LEGS: u8 = 3;

/// Decimals of the share token
pub const SHARE_DECIMALS: u32 = 18;

// ===== TRADING =====

/// Default slippage tolerance applied to every swap minimum
pub const SWAP_SLIPPAGE_BPS: u32 = 50; // 0.5%

/// Hard ceiling accepted by swap parameter validation
pub const MAX_SLIPPAGE_BPS: u32 = 1_000; // 10%

/// Swap venue fee tier (hundredths of a bip, 3000 = 0.3%)
pub const SWAP_FEE_TIER: u32 = 3_000;

// ===== ADMIN =====

/// Maximum number of admin log entries retained
pub const MAX_ADMIN_LOG_ENTRIES: usize = 1_000;
