//! Admin Controls Module
//!
//! Mint access policy, ownership and admin logging.
//!
//! While an owner exists, minting may be restricted to an allowlist.
//! Renouncing ownership switches the vault to `OpenToAll` permanently:
//! with no owner left, nobody could maintain the allowlist anyway.

use std::collections::BTreeSet;
use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};
use crate::infrastructure::constants::MAX_ADMIN_LOG_ENTRIES;
use crate::infrastructure::errors::{AccessError, Result, VaultError};

/// Who may mint
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum AccessPolicy {
    OpenToAll,
    Allowlisted(BTreeSet<Principal>),
}

impl AccessPolicy {
    pub fn permits(&self, caller: &Principal) -> bool {
        match self {
            AccessPolicy::OpenToAll => true,
            AccessPolicy::Allowlisted(allowed) => allowed.contains(caller),
        }
    }
}

/// Admin action log entry
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AdminAction {
    pub timestamp: u64,
    pub admin: Principal,
    pub action: String,
}

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AdminState {
    pub owner: Option<Principal>,
    pub policy: AccessPolicy,
    pub log: Vec<AdminAction>,
}

impl AdminState {
    /// Owned vault with an empty allowlist
    pub fn owned_by(owner: Principal) -> Self {
        Self {
            owner: Some(owner),
            policy: AccessPolicy::Allowlisted(BTreeSet::new()),
            log: Vec::new(),
        }
    }

    /// Ownerless vault, minting open to everyone
    pub fn ownerless() -> Self {
        Self {
            owner: None,
            policy: AccessPolicy::OpenToAll,
            log: Vec::new(),
        }
    }

    /// Checked before any mint logic runs
    pub fn check_can_mint(&self, caller: &Principal) -> Result<()> {
        if self.policy.permits(caller) {
            Ok(())
        } else {
            Err(VaultError::Access(AccessError::Unauthorized {
                principal: caller.to_text(),
            }))
        }
    }

    pub fn require_owner(&self, caller: &Principal) -> Result<()> {
        match self.owner {
            Some(owner) if owner == *caller => Ok(()),
            _ => Err(VaultError::Access(AccessError::NotOwner {
                principal: caller.to_text(),
            })),
        }
    }

    pub fn allow_minter(&mut self, caller: Principal, minter: Principal, now: u64) -> Result<()> {
        self.require_owner(&caller)?;
        match &mut self.policy {
            AccessPolicy::Allowlisted(allowed) => {
                allowed.insert(minter);
            }
            AccessPolicy::OpenToAll => {
                log::warn!("allow_minter({}) has no effect: minting is open to all", minter);
            }
        }
        self.log_admin_action(caller, format!("ALLOW_MINTER {}", minter), now);
        Ok(())
    }

    pub fn revoke_minter(&mut self, caller: Principal, minter: Principal, now: u64) -> Result<()> {
        self.require_owner(&caller)?;
        if let AccessPolicy::Allowlisted(allowed) = &mut self.policy {
            allowed.remove(&minter);
        }
        self.log_admin_action(caller, format!("REVOKE_MINTER {}", minter), now);
        Ok(())
    }

    pub fn set_access_policy(&mut self, caller: Principal, policy: AccessPolicy, now: u64) -> Result<()> {
        self.require_owner(&caller)?;
        let label = match &policy {
            AccessPolicy::OpenToAll => "OPEN_TO_ALL".to_string(),
            AccessPolicy::Allowlisted(allowed) => format!("ALLOWLISTED ({} minters)", allowed.len()),
        };
        self.policy = policy;
        self.log_admin_action(caller, format!("SET_ACCESS_POLICY {}", label), now);
        Ok(())
    }

    /// Irreversible: clears the owner and opens minting to everyone
    pub fn renounce_ownership(&mut self, caller: Principal, now: u64) -> Result<()> {
        self.require_owner(&caller)?;
        self.owner = None;
        self.policy = AccessPolicy::OpenToAll;
        self.log_admin_action(caller, "RENOUNCE_OWNERSHIP".to_string(), now);
        log::info!("🔓 Ownership renounced by {}, minting open to all", caller);
        Ok(())
    }

    fn log_admin_action(&mut self, admin: Principal, action: String, timestamp: u64) {
        log::info!("📝 Admin action: {} by {}", action, admin);

        self.log.push(AdminAction { timestamp, admin, action });

        // Keep only the newest entries
        let len = self.log.len();
        if len > MAX_ADMIN_LOG_ENTRIES {
            self.log.drain(0..(len - MAX_ADMIN_LOG_ENTRIES));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Principal {
        Principal::from_slice(&[1])
    }

    fn alice() -> Principal {
        Principal::from_slice(&[2])
    }

    #[test]
    fn test_allowlist_blocks_unknown_minter() {
        let admin = AdminState::owned_by(owner());
        let result = admin.check_can_mint(&alice());
        assert!(matches!(result, Err(VaultError::Access(AccessError::Unauthorized { .. }))));
    }

    #[test]
    fn test_allowed_minter_passes() {
        let mut admin = AdminState::owned_by(owner());
        admin.allow_minter(owner(), alice(), 1).unwrap();
        assert!(admin.check_can_mint(&alice()).is_ok());

        admin.revoke_minter(owner(), alice(), 2).unwrap();
        assert!(admin.check_can_mint(&alice()).is_err());
        assert_eq!(admin.log.len(), 2);
    }

    #[test]
    fn test_only_owner_edits_allowlist() {
        let mut admin = AdminState::owned_by(owner());
        let result = admin.allow_minter(alice(), alice(), 1);
        assert!(matches!(result, Err(VaultError::Access(AccessError::NotOwner { .. }))));
        assert!(admin.log.is_empty());
    }

    #[test]
    fn test_renounce_opens_minting() {
        let mut admin = AdminState::owned_by(owner());
        admin.renounce_ownership(owner(), 7).unwrap();

        assert_eq!(admin.owner, None);
        assert_eq!(admin.policy, AccessPolicy::OpenToAll);
        assert!(admin.check_can_mint(&alice()).is_ok());

        // No owner left to act
        assert!(admin.renounce_ownership(owner(), 8).is_err());
    }

    #[test]
    fn test_ownerless_is_open() {
        let admin = AdminState::ownerless();
        assert!(admin.check_can_mint(&Principal::anonymous()).is_ok());
    }

    #[test]
    fn test_admin_log_is_bounded() {
        let mut admin = AdminState::owned_by(owner());
        for i in 0..(MAX_ADMIN_LOG_ENTRIES as u64 + 5) {
            admin.revoke_minter(owner(), alice(), i).unwrap();
        }
        assert_eq!(admin.log.len(), MAX_ADMIN_LOG_ENTRIES);
        assert_eq!(admin.log[0].timestamp, 5);
    }
}
