//! Minting module - Deposits WETH and issues vault shares
//! Critical operation that grows both the position and the share supply

pub mod mint_orchestrator;
pub mod mint_validator;


pub use mint_orchestrator::{mint, preview_mint};
