//! Share supply store
//!
//! Vault shares are a plain fungible ledger. The engine only ever depends on
//! `total_supply` and `balance_of`; mint and burn happen inside vault
//! operations, the rest is the usual holder-facing surface.

use std::collections::BTreeMap;
use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};
use crate::infrastructure::errors::{overflow, LedgerError, Result, VaultError};

/// Fungible share ledger the engine mints into and burns from
pub trait ShareLedger {
    fn total_supply(&self) -> u128;
    fn balance_of(&self, holder: &Principal) -> u128;
    fn mint(&mut self, to: Principal, amount: u128) -> Result<()>;
    fn burn(&mut self, from: Principal, amount: u128) -> Result<()>;
    fn transfer(&mut self, from: Principal, to: Principal, amount: u128) -> Result<()>;
    fn approve(&mut self, owner: Principal, spender: Principal, amount: u128) -> Result<()>;
    fn allowance(&self, owner: &Principal, spender: &Principal) -> u128;
    fn transfer_from(&mut self, spender: Principal, from: Principal, to: Principal, amount: u128) -> Result<()>;
}

/// In-crate share ledger, persisted with the rest of the vault state
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ShareSupply {
    total_supply: u128,
    balances: BTreeMap<Principal, u128>,
    allowances: BTreeMap<(Principal, Principal), u128>,
}

impl ShareSupply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    fn debit(&mut self, holder: Principal, amount: u128) -> Result<()> {
        let available = self.balance_of(&holder);
        let remaining = available.checked_sub(amount).ok_or_else(|| {
            VaultError::Ledger(LedgerError::InsufficientBalance {
                required: amount.to_string(),
                available: available.to_string(),
            })
        })?;

        if remaining == 0 {
            self.balances.remove(&holder);
        } else {
            self.balances.insert(holder, remaining);
        }
        Ok(())
    }

    fn credit(&mut self, holder: Principal, amount: u128) -> Result<()> {
        let balance = self
            .balance_of(&holder)
            .checked_add(amount)
            .ok_or_else(|| overflow(format!("balance of {} + {}", holder, amount)))?;
        if balance > 0 {
            self.balances.insert(holder, balance);
        }
        Ok(())
    }
}

impl ShareLedger for ShareSupply {
    fn total_supply(&self) -> u128 {
        self.total_supply
    }

    fn balance_of(&self, holder: &Principal) -> u128 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    fn mint(&mut self, to: Principal, amount: u128) -> Result<()> {
        let total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or_else(|| overflow(format!("total supply {} + {}", self.total_supply, amount)))?;
        self.credit(to, amount)?;
        self.total_supply = total_supply;
        Ok(())
    }

    fn burn(&mut self, from: Principal, amount: u128) -> Result<()> {
        self.debit(from, amount)?;
        // Balances never sum past the supply
        self.total_supply -= amount;
        Ok(())
    }

    fn transfer(&mut self, from: Principal, to: Principal, amount: u128) -> Result<()> {
        self.debit(from, amount)?;
        self.credit(to, amount)
    }

    fn approve(&mut self, owner: Principal, spender: Principal, amount: u128) -> Result<()> {
        if amount == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
        Ok(())
    }

    fn allowance(&self, owner: &Principal, spender: &Principal) -> u128 {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    fn transfer_from(&mut self, spender: Principal, from: Principal, to: Principal, amount: u128) -> Result<()> {
        let approved = self.allowance(&from, &spender);
        if approved < amount {
            return Err(VaultError::Ledger(LedgerError::InsufficientAllowance {
                required: amount.to_string(),
                approved: approved.to_string(),
            }));
        }

        self.transfer(from, to, amount)?;
        self.approve(from, spender, approved - amount)
    }
}
