//! Client for the staking vault program.
//!
//! [`Vault`] wraps one on-chain vault: it reads [`VaultData`] / [`UserData`] snapshots and
//! submits the program's `create_vault`, `authorize_funder`, `unauthorize_funder`, `fund`
//! and `create_user` instructions. All staking rules are enforced by the program itself.

pub mod config;
pub mod error;
pub mod funding;
pub mod instructions;
pub mod pda;
pub mod program;
pub mod state;
pub mod transaction;
pub mod vault;

pub use config::Config;
pub use error::{Error, Result};
pub use program::Program;
pub use state::{UserData, VaultData, VaultStatus};
pub use transaction::Instructions;
pub use vault::{CreateVaultOptions, FundOptions, Vault};
