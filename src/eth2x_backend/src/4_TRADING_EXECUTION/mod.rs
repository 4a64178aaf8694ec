//! # Trading Execution Module
//!
//! Swaps between WETH and USDC on an external venue.
//!
//! ## Architecture
//! - **swaps/**: `SwapVenue` boundary and exact-input swap execution
//! - **slippage/**: output estimate, minimum receive and result validation
//!
//! ## Key Constraints
//! - **Sequential Execution**: one swap at a time, inside the calling operation
//! - **Slippage Protected**: default 0.5% tolerance, 10% hard ceiling
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use crate::_4_TRADING_EXECUTION::swaps::execute_swap;
//! use crate::types::TrackedAsset;
//!
//! // Sell 1 WETH for USDC at the snapshot's prices
//! let outcome = execute_swap(
//!     &mut venue,
//!     TrackedAsset::WETH,
//!     1_000_000_000_000_000_000,
//!     TrackedAsset::USDC,
//!     &position,
//!     &config,
//! )?;
//!
//! log::info!("Received {} USDC", outcome.amount_out);
//! ```
//!
//! ## Safety Features
//! - Minimum output on every swap, checked by the venue and again here
//! - Input validation before the venue is called

pub mod slippage;
pub mod swaps;

pub use swaps::{execute_swap, SwapOutcome, SwapVenue};
