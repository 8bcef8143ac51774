//! Account layouts owned by the staking program.
//!
//! Accounts use the Anchor layout: an 8 byte discriminator, `sha256("account:<Name>")[..8]`,
//! followed by the Borsh encoded fields. Anything after the fields is allocation padding.

use crate::{Error, Result};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use serde_with::{serde_as, DisplayFromStr};
use solana_sdk::{hash::hash, pubkey::Pubkey};

pub const DISCRIMINATOR_LEN: usize = 8;

/// Maximum number of funders a vault can authorize.
pub const MAX_FUNDERS: usize = 5;

/// Compute Anchor 8-byte account discriminator: sha256("account:{name}")[..8]
pub fn account_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let preimage = format!("account:{}", name);
    let mut disc = [0u8; DISCRIMINATOR_LEN];
    disc.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..DISCRIMINATOR_LEN]);
    disc
}

/// A program-owned account that can be decoded from raw account data.
pub trait AccountData: BorshDeserialize + Sized {
    /// Anchor account name, used for the discriminator.
    const NAME: &'static str;

    fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        account_discriminator(Self::NAME)
    }

    fn try_from_account_data(address: &Pubkey, data: &[u8]) -> Result<Self> {
        let mismatch = || Error::AccountDiscriminator {
            address: *address,
            expected: Self::NAME,
        };
        if data.len() < DISCRIMINATOR_LEN {
            return Err(mismatch());
        }
        let (disc, mut rest) = data.split_at(DISCRIMINATOR_LEN);
        if disc != Self::discriminator() {
            return Err(mismatch());
        }
        Self::deserialize(&mut rest).map_err(|source| Error::AccountData {
            address: *address,
            name: Self::NAME,
            source,
        })
    }
}

#[derive(BorshSerialize, BorshDeserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VaultStatus {
    #[default]
    None,
    Initialized,
    Paused,
}

#[serde_as]
#[derive(BorshSerialize, BorshDeserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct VaultData {
    #[serde_as(as = "DisplayFromStr")]
    pub authority: Pubkey,
    pub status: VaultStatus,
    #[serde_as(as = "DisplayFromStr")]
    pub reward_mint: Pubkey,
    pub reward_bump: u8,
    #[serde_as(as = "DisplayFromStr")]
    pub reward_account: Pubkey,
    /// Configured reward duration, in seconds.
    pub reward_duration: u64,
    /// Unix timestamp at which the current reward period ends.
    pub reward_duration_deadline: u64,
    pub reward_rate: u64,
    pub stake_token_count: u32,
    pub staked_count: u32,
    pub user_count: u32,
    /// Fixed slots, unused ones hold `Pubkey::default()`.
    #[serde_as(as = "[DisplayFromStr; MAX_FUNDERS]")]
    pub funders: [Pubkey; MAX_FUNDERS],
}

impl AccountData for VaultData {
    const NAME: &'static str = "Vault";
}

impl VaultData {
    /// Authorized funders, skipping empty slots.
    pub fn funders(&self) -> impl Iterator<Item = &Pubkey> {
        self.funders.iter().filter(|pk| **pk != Pubkey::default())
    }

    pub fn is_funder(&self, funder: &Pubkey) -> bool {
        self.funders().any(|pk| pk == funder)
    }
}

#[serde_as]
#[derive(BorshSerialize, BorshDeserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct UserData {
    #[serde_as(as = "DisplayFromStr")]
    pub vault: Pubkey,
    #[serde_as(as = "DisplayFromStr")]
    pub key: Pubkey,
    pub reward_earned_claimed: u64,
    pub reward_earned_pending: u64,
    pub mint_staked_count: u32,
    #[serde_as(as = "Vec<DisplayFromStr>")]
    pub mint_accounts: Vec<Pubkey>,
}

impl AccountData for UserData {
    const NAME: &'static str = "User";
}

/// Offset of `UserData::vault` in the raw account, used for `getProgramAccounts` filters.
pub const USER_VAULT_OFFSET: usize = DISCRIMINATOR_LEN;
