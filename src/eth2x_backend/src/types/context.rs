use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};

/// Who is calling and when, supplied by the host for every mutating call
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Principal,
    /// Host time in nanoseconds
    pub now: u64,
}

impl CallContext {
    pub fn new(caller: Principal, now: u64) -> Self {
        Self { caller, now }
    }
}
