//! Critical Operations - Mint, redeem, rebalance
//! Every state-changing entry point of the vault lives here
//!
//! Each operation validates everything it can before its first external
//! call and commits local state (share ledger, history) only after the last
//! external call succeeded. The host undoes external effects of a failed call.

pub mod minting;
pub mod rebalancing;
pub mod redeeming;

use candid::Principal;
use crate::_2_CRITICAL_DATA::position_snapshot::read_position;
use crate::_3_LENDING_MARKET::{LendingMarket, PriceOracle};
use crate::_4_TRADING_EXECUTION::SwapVenue;
use crate::infrastructure::Result;
use crate::types::PositionSnapshot;

/// The external collaborators an operation acts through
pub struct ExternalAdapters<M, S, O> {
    pub market: M,
    pub venue: S,
    pub oracle: O,
    /// Account holding the vault's position in the lending market
    pub vault_account: Principal,
}

impl<M: LendingMarket, S: SwapVenue, O: PriceOracle> ExternalAdapters<M, S, O> {
    pub fn new(market: M, venue: S, oracle: O, vault_account: Principal) -> Self {
        Self { market, venue, oracle, vault_account }
    }

    /// Fresh snapshot of the vault's position
    pub fn read_position(&self, total_supply: u128) -> Result<PositionSnapshot> {
        read_position(&self.market, &self.oracle, self.vault_account, total_supply)
    }
}
