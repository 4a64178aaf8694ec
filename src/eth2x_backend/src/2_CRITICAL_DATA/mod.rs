//! Critical Data - Position reads, valuation and leverage math
//! Source of truth for every number an operation acts on

pub mod leverage;
pub mod position_snapshot;
pub mod share_supply;
pub mod valuation;

// Re-export commonly used functions
pub use leverage::{leverage_ratio, plan_adjustment, within_tolerance, RebalanceAction};
pub use position_snapshot::{amount_to_value, read_position, value_to_amount};
pub use share_supply::{ShareLedger, ShareSupply};
pub use valuation::{calculate_mint_amount, calculate_redeem_amount, RedeemQuote};
