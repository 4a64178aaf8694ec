//! # Rebalancing Module
//!
//! Moves the position toward the target collateral / debt ratio (2.0).
//! Callable by anyone; at target it is a harmless no-op.
//!
//! ## Strategy
//! - **Bounded steps**: at most `max_rebalance_steps` adjustments per call
//!   (default 2: one step plus one nested retry)
//! - **Fresh snapshot per step**: each step re-reads the position
//! - **Lever**: borrow USDC → swap to WETH → supply
//! - **Delever**: withdraw WETH → swap to USDC → repay
//!
//! Borrow capacity and the liquidation threshold can stop a step short of
//! target. The call then reports partial progress (`converged == false`);
//! repeated calls finish the job.
//!
//! ## Example Flow
//! ```text
//! Position: $10,000 collateral, $2,000 debt (ratio 5.0)
//! Target debt at 2.0: $5,000 → borrow $3,000 USDC
//! Swap to ~0.997 WETH, supply → ratio ≈ 2.6
//! Step 2 re-reads and borrows again
//! ```
//!
//! ## Safety Features
//! - Slippage-protected swaps priced off the step's snapshot
//! - Any failed external call aborts the whole rebalance
//! - A step that leaves the ratio farther from target aborts it too
//! - Keeps last MAX_REBALANCE_HISTORY records for audit


use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};
use crate::_2_CRITICAL_DATA::leverage::{leverage_ratio, plan_adjustment, within_tolerance, RebalanceAction};
use crate::_3_LENDING_MARKET::{call_failure, LendingMarket, PriceOracle};
use crate::_4_TRADING_EXECUTION::{execute_swap, SwapVenue};
use crate::infrastructure::config::VaultConfig;
use crate::infrastructure::constants::MAX_REBALANCE_HISTORY;
use crate::infrastructure::{RebalanceError, Result, VaultError};
use crate::types::{CallContext, PositionSnapshot, TrackedAsset};
use super::ExternalAdapters;

// === TYPES ===

/// One executed adjustment
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RebalanceStep {
    pub action: RebalanceAction,
    /// Ratio the step was planned from (WAD)
    pub ratio_before: u128,
    /// Amount that left the market: USDC borrowed or WETH withdrawn
    pub amount_out_of_market: u128,
    /// Amount that went back: WETH supplied or USDC repaid
    pub amount_into_market: u128,
}

/// Result of one `rebalance` call
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RebalanceOutcome {
    pub ratio_before: u128,
    pub ratio_after: u128,
    pub steps: Vec<RebalanceStep>,
    /// Ratio ended inside the tolerance band
    pub converged: bool,
}

/// Record of a rebalance execution
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RebalanceRecord {
    pub timestamp: u64,
    pub caller: Principal,
    pub ratio_before: u128,
    pub ratio_after: u128,
    pub actions: Vec<RebalanceAction>,
    pub converged: bool,
}

/// Rebalancer status for monitoring
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RebalancerStatus {
    pub last_rebalance: Option<u64>,
    pub total_rebalances: u64,
    pub recent_history: Vec<RebalanceRecord>,
}

// === STATE ===

/// Rebalance bookkeeping, persisted with the vault state
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct RebalanceState {
    pub last_rebalance: Option<u64>,
    pub total_rebalances: u64,
    pub history: Vec<RebalanceRecord>,
}

impl RebalanceState {
    pub fn status(&self) -> RebalancerStatus {
        RebalancerStatus {
            last_rebalance: self.last_rebalance,
            total_rebalances: self.total_rebalances,
            recent_history: self.history.clone(),
        }
    }

    fn record(&mut self, record: RebalanceRecord) {
        self.last_rebalance = Some(record.timestamp);
        self.total_rebalances += 1;
        self.history.push(record);

        // Keep only the most recent entries
        if self.history.len() > MAX_REBALANCE_HISTORY {
            let excess = self.history.len() - MAX_REBALANCE_HISTORY;
            self.history.drain(0..excess);
        }
    }
}

// === CORE LOGIC ===

/// Execute one rebalance call
///
/// ## Process
/// 1. Read a fresh position and plan
/// 2. Stop if the plan is `None`; otherwise execute it
/// 3. Repeat up to `max_rebalance_steps` times
/// 4. Re-read, report and record
pub fn perform_rebalance<M, S, O>(
    ctx: &CallContext,
    adapters: &mut ExternalAdapters<M, S, O>,
    total_supply: u128,
    config: &VaultConfig,
    state: &mut RebalanceState,
) -> Result<RebalanceOutcome>
where
    M: LendingMarket,
    S: SwapVenue,
    O: PriceOracle,
{
    log::info!("🔄 Rebalance requested by {}", ctx.caller);

    let target = config.target_ratio_wad;
    let mut steps: Vec<RebalanceStep> = Vec::new();
    let mut ratio_before = None;

    for step in 0..config.max_rebalance_steps {
        let position = adapters.read_position(total_supply)?;
        let ratio = leverage_ratio(&position.account)?;
        ratio_before.get_or_insert(ratio);
        if let Some(last) = steps.last() {
            ensure_progress(last.ratio_before, ratio, target)?;
        }

        let action = plan_adjustment(&position, config)?;
        let (amount_out_of_market, amount_into_market) = match &action {
            RebalanceAction::None => {
                log::info!("⚖️ Step {}: nothing to do at ratio {}", step + 1, ratio);
                break;
            }
            RebalanceAction::Lever { borrow_amount, .. } => {
                execute_lever(adapters, &position, *borrow_amount, config)?
            }
            RebalanceAction::Delever { withdraw_amount, .. } => {
                execute_delever(adapters, &position, *withdraw_amount, config)?
            }
        };

        steps.push(RebalanceStep {
            action,
            ratio_before: ratio,
            amount_out_of_market,
            amount_into_market,
        });
    }

    let final_position = adapters.read_position(total_supply)?;
    let ratio_after = leverage_ratio(&final_position.account)?;
    if let Some(last) = steps.last() {
        ensure_progress(last.ratio_before, ratio_after, target)?;
    }
    let converged = is_idle(&final_position)
        || within_tolerance(ratio_after, target, config.rebalance_tolerance_bps)?;
    let ratio_before = ratio_before.unwrap_or(ratio_after);

    if converged {
        log::info!("✅ Rebalance done: ratio {} → {} in {} steps", ratio_before, ratio_after, steps.len());
    } else {
        log::info!(
            "⏸️ Rebalance partial: ratio {} → {} after {} steps, call again",
            ratio_before,
            ratio_after,
            steps.len()
        );
    }

    if !steps.is_empty() {
        state.record(RebalanceRecord {
            timestamp: ctx.now,
            caller: ctx.caller,
            ratio_before,
            ratio_after,
            actions: steps.iter().map(|step| step.action.clone()).collect(),
            converged,
        });
    }

    Ok(RebalanceOutcome {
        ratio_before,
        ratio_after,
        steps,
        converged,
    })
}

/// A step must not leave the ratio farther from `target` than it found it
fn ensure_progress(ratio_before_step: u128, ratio_after_step: u128, target: u128) -> Result<()> {
    let distance_before = ratio_before_step.abs_diff(target);
    let distance_after = ratio_after_step.abs_diff(target);
    if distance_after > distance_before {
        log::warn!(
            "❌ Step moved ratio away from target {}: {} → {}",
            target,
            ratio_before_step,
            ratio_after_step
        );
        return Err(VaultError::Rebalance(RebalanceError::InvalidPlan {
            reason: format!(
                "ratio moved from {} to {}, farther from target {}",
                ratio_before_step, ratio_after_step, target
            ),
        }));
    }
    Ok(())
}

/// An empty position has nothing to lever
fn is_idle(position: &PositionSnapshot) -> bool {
    position.account.collateral_value == 0 && position.account.debt_value == 0
}

/// Borrow USDC → swap to WETH → supply
///
/// Returns (USDC borrowed, WETH supplied)
fn execute_lever<M, S, O>(
    adapters: &mut ExternalAdapters<M, S, O>,
    position: &PositionSnapshot,
    borrow_amount: u128,
    config: &VaultConfig,
) -> Result<(u128, u128)>
where
    M: LendingMarket,
    S: SwapVenue,
    O: PriceOracle,
{
    log::info!("💰 Borrowing {} USDC", borrow_amount);
    adapters
        .market
        .borrow(TrackedAsset::USDC, borrow_amount, adapters.vault_account)
        .map_err(|fault| call_failure("borrow", fault))?;

    let swap = execute_swap(
        &mut adapters.venue,
        TrackedAsset::USDC,
        borrow_amount,
        TrackedAsset::WETH,
        position,
        config,
    )?;

    adapters
        .market
        .supply(TrackedAsset::WETH, swap.amount_out, adapters.vault_account)
        .map_err(|fault| call_failure("supply", fault))?;

    log::info!("✅ Levered: {} USDC → {} wei supplied", borrow_amount, swap.amount_out);

    Ok((borrow_amount, swap.amount_out))
}

/// Withdraw WETH → swap to USDC → repay
///
/// Returns (WETH withdrawn, USDC repaid)
fn execute_delever<M, S, O>(
    adapters: &mut ExternalAdapters<M, S, O>,
    position: &PositionSnapshot,
    withdraw_amount: u128,
    config: &VaultConfig,
) -> Result<(u128, u128)>
where
    M: LendingMarket,
    S: SwapVenue,
    O: PriceOracle,
{
    log::info!("💸 Withdrawing {} wei", withdraw_amount);
    let withdrawn = adapters
        .market
        .withdraw(TrackedAsset::WETH, withdraw_amount, adapters.vault_account)
        .map_err(|fault| call_failure("withdraw", fault))?;

    let swap = execute_swap(
        &mut adapters.venue,
        TrackedAsset::WETH,
        withdrawn,
        TrackedAsset::USDC,
        position,
        config,
    )?;

    let repaid = adapters
        .market
        .repay(TrackedAsset::USDC, swap.amount_out, adapters.vault_account)
        .map_err(|fault| call_failure("repay", fault))?;

    log::info!("✅ Delevered: {} wei → {} USDC repaid", withdrawn, repaid);

    Ok((withdrawn, repaid))
}
