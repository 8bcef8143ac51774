//! Program-derived addresses used by the staking program.

use solana_sdk::pubkey::Pubkey;

pub const REWARD_SEED: &[u8] = b"reward";
pub const USER_SEED: &[u8] = b"user";

/// Reward authority PDA: seeds = ["reward", vault]
pub fn find_reward_address(program_id: &Pubkey, vault: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[REWARD_SEED, vault.as_ref()], program_id)
}

/// User PDA: seeds = ["user", vault, authority]
pub fn find_user_address(program_id: &Pubkey, vault: &Pubkey, authority: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[USER_SEED, vault.as_ref(), authority.as_ref()], program_id)
}

/// SPL associated token account of `owner` for `mint`.
pub fn associated_token_account(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    spl_associated_token_account::get_associated_token_address(owner, mint)
}

/// Associated token account holding the vault's reward tokens.
pub fn reward_token_account(reward_address: &Pubkey, reward_mint: &Pubkey) -> Pubkey {
    associated_token_account(reward_address, reward_mint)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM_ID: Pubkey = Pubkey::new_from_array([7; 32]);

    #[test]
    fn test_reward_address_matches_bump() {
        let vault = Pubkey::new_unique();
        let (reward, bump) = find_reward_address(&PROGRAM_ID, &vault);
        let recreated =
            Pubkey::create_program_address(&[REWARD_SEED, vault.as_ref(), &[bump]], &PROGRAM_ID)
                .unwrap();
        assert_eq!(reward, recreated);
        assert!(!reward.is_on_curve());
    }

    #[test]
    fn test_user_address_per_authority() {
        let vault = Pubkey::new_unique();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();

        let (a1, _) = find_user_address(&PROGRAM_ID, &vault, &alice);
        let (a2, _) = find_user_address(&PROGRAM_ID, &vault, &alice);
        let (b, _) = find_user_address(&PROGRAM_ID, &vault, &bob);
        assert_eq!(a1, a2);
        assert_ne!(a1, b);

        let (other_vault, _) = find_user_address(&PROGRAM_ID, &Pubkey::new_unique(), &alice);
        assert_ne!(a1, other_vault);
    }

    #[test]
    fn test_reward_token_account_is_ata() {
        let vault = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let (reward, _) = find_reward_address(&PROGRAM_ID, &vault);
        let ata = reward_token_account(&reward, &mint);
        let (expected, _) = Pubkey::find_program_address(
            &[reward.as_ref(), spl_token::id().as_ref(), mint.as_ref()],
            &spl_associated_token_account::id(),
        );
        assert_eq!(ata, expected);
    }

    #[test]
    fn test_associated_token_account_of_wallet() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let (expected, _) = Pubkey::find_program_address(
            &[owner.as_ref(), spl_token::id().as_ref(), mint.as_ref()],
            &spl_associated_token_account::id(),
        );
        assert_eq!(associated_token_account(&owner, &mint), expected);
        assert_ne!(associated_token_account(&owner, &mint), associated_token_account(&mint, &owner));
    }
}
