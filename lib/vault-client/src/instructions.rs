//! Instruction builders for the staking program entry points.
//!
//! Builders are pure: they do not touch the network and can be composed into larger
//! transactions by the caller.

use borsh::BorshSerialize;
use solana_sdk::{
    hash::hash,
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program, sysvar,
};

pub const CREATE_VAULT: &str = "create_vault";
pub const AUTHORIZE_FUNDER: &str = "authorize_funder";
pub const UNAUTHORIZE_FUNDER: &str = "unauthorize_funder";
pub const FUND: &str = "fund";
pub const CREATE_USER: &str = "create_user";

/// Compute Anchor 8-byte instruction discriminator: sha256("global:{name}")[..8]
pub fn anchor_sighash(name: &str) -> [u8; 8] {
    let preimage = format!("global:{}", name);
    let mut sighash = [0u8; 8];
    sighash.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..8]);
    sighash
}

fn instruction_data<A: BorshSerialize>(name: &str, args: &A) -> Vec<u8> {
    let mut data = anchor_sighash(name).to_vec();
    // writing into a Vec cannot fail
    borsh::to_writer(&mut data, args).ok();
    data
}

#[derive(BorshSerialize, Debug)]
pub struct CreateVaultArgs {
    pub reward_bump: u8,
    pub reward_duration: u64,
    pub stake_token_count: u32,
}

#[derive(Debug)]
pub struct CreateVaultAccounts {
    pub authority: Pubkey,
    pub vault: Pubkey,
    pub reward: Pubkey,
    pub reward_mint: Pubkey,
    pub reward_account: Pubkey,
}

pub fn create_vault(
    program_id: &Pubkey,
    accounts: &CreateVaultAccounts,
    args: &CreateVaultArgs,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(accounts.authority, true),          // authority (writable signer)
            AccountMeta::new(accounts.vault, true),              // vault (writable signer)
            AccountMeta::new_readonly(accounts.reward, false),   // reward (PDA)
            AccountMeta::new_readonly(accounts.reward_mint, false),
            AccountMeta::new(accounts.reward_account, false),    // rewardAccount (ATA of reward)
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data: instruction_data(CREATE_VAULT, args),
    }
}

pub fn authorize_funder(
    program_id: &Pubkey,
    authority: &Pubkey,
    vault: &Pubkey,
    funder_to_add: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new(*vault, false),
        ],
        data: instruction_data(AUTHORIZE_FUNDER, funder_to_add),
    }
}

pub fn unauthorize_funder(
    program_id: &Pubkey,
    authority: &Pubkey,
    vault: &Pubkey,
    funder_to_remove: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new(*vault, false),
        ],
        data: instruction_data(UNAUTHORIZE_FUNDER, funder_to_remove),
    }
}

#[derive(Debug)]
pub struct FundAccounts {
    pub funder: Pubkey,
    pub vault: Pubkey,
    pub reward_account: Pubkey,
    /// Token account the reward tokens are taken from.
    pub funder_account: Pubkey,
}

pub fn fund(program_id: &Pubkey, accounts: &FundAccounts, amount: u64) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(accounts.funder, true),
            AccountMeta::new(accounts.vault, false),
            AccountMeta::new(accounts.reward_account, false),
            AccountMeta::new(accounts.funder_account, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data: instruction_data(FUND, &amount),
    }
}

pub fn create_user(
    program_id: &Pubkey,
    authority: &Pubkey,
    vault: &Pubkey,
    user: &Pubkey,
    user_bump: u8,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new(*vault, false),
            AccountMeta::new(*user, false),                       // user (writable, PDA)
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: instruction_data(CREATE_USER, &user_bump),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program_id() -> Pubkey {
        Pubkey::new_unique()
    }

    #[test]
    fn test_sighash() {
        // sha256("global:initialize")[..8], as generated by Anchor
        assert_eq!(
            anchor_sighash("initialize"),
            [175, 175, 109, 31, 13, 152, 155, 237]
        );
    }

    #[test]
    fn test_create_vault() {
        let program_id = program_id();
        let accounts = CreateVaultAccounts {
            authority: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            reward: Pubkey::new_unique(),
            reward_mint: Pubkey::new_unique(),
            reward_account: Pubkey::new_unique(),
        };
        let ix = create_vault(
            &program_id,
            &accounts,
            &CreateVaultArgs {
                reward_bump: 253,
                reward_duration: 128,
                stake_token_count: 2,
            },
        );
        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.accounts.len(), 9);

        let signers = ix
            .accounts
            .iter()
            .filter(|a| a.is_signer)
            .map(|a| a.pubkey)
            .collect::<Vec<_>>();
        assert_eq!(signers, vec![accounts.authority, accounts.vault]);
        assert!(!ix.accounts[2].is_writable);
        assert!(ix.accounts[4].is_writable);
        assert_eq!(ix.accounts[4].pubkey, accounts.reward_account);

        assert_eq!(&ix.data[..8], &anchor_sighash(CREATE_VAULT));
        assert_eq!(ix.data[8], 253);
        assert_eq!(&ix.data[9..17], &128u64.to_le_bytes());
        assert_eq!(&ix.data[17..], &2u32.to_le_bytes());
    }

    #[test]
    fn test_funder_instructions() {
        let program_id = program_id();
        let authority = Pubkey::new_unique();
        let vault = Pubkey::new_unique();
        let funder = Pubkey::new_unique();

        let add = authorize_funder(&program_id, &authority, &vault, &funder);
        let remove = unauthorize_funder(&program_id, &authority, &vault, &funder);
        for ix in [&add, &remove] {
            assert_eq!(ix.accounts.len(), 2);
            assert!(ix.accounts[0].is_signer);
            assert!(ix.accounts[1].is_writable);
            assert!(!ix.accounts[1].is_signer);
            assert_eq!(&ix.data[8..], funder.as_ref());
        }
        assert_eq!(&add.data[..8], &anchor_sighash(AUTHORIZE_FUNDER));
        assert_eq!(&remove.data[..8], &anchor_sighash(UNAUTHORIZE_FUNDER));
    }

    #[test]
    fn test_fund() {
        let accounts = FundAccounts {
            funder: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            reward_account: Pubkey::new_unique(),
            funder_account: Pubkey::new_unique(),
        };
        let ix = fund(&program_id(), &accounts, 1_000_000);
        assert_eq!(ix.accounts[0].pubkey, accounts.funder);
        assert!(ix.accounts[0].is_signer);
        assert_eq!(ix.accounts[3].pubkey, accounts.funder_account);
        assert_eq!(ix.accounts[4].pubkey, spl_token::id());
        assert_eq!(ix.data.len(), 16);
        assert_eq!(&ix.data[8..], &1_000_000u64.to_le_bytes());
    }

    #[test]
    fn test_create_user() {
        let authority = Pubkey::new_unique();
        let user = Pubkey::new_unique();
        let ix = create_user(&program_id(), &authority, &Pubkey::new_unique(), &user, 7);
        assert_eq!(ix.accounts[2].pubkey, user);
        assert!(ix.accounts[2].is_writable);
        assert_eq!(ix.accounts[3].pubkey, system_program::id());
        assert_eq!(ix.data, [anchor_sighash(CREATE_USER).as_ref(), &[7]].concat());
    }
}
