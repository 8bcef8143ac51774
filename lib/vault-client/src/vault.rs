use crate::{
    instructions::{self, CreateVaultAccounts, CreateVaultArgs, FundAccounts},
    pda,
    program::Program,
    state::{UserData, VaultData, USER_VAULT_OFFSET},
    transaction::Instructions,
    Result,
};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};

pub struct CreateVaultOptions<'a> {
    /// Vault authority, also pays for the transaction.
    pub authority: &'a dyn Signer,
    /// Keypair for the new vault account. A fresh one is generated when `None`.
    pub vault: Option<&'a dyn Signer>,
    pub reward_mint: Pubkey,
    pub reward_duration: u64,
    pub stake_token_count: u32,
}

pub struct FundOptions<'a> {
    /// Authorized funder, also pays for the transaction.
    pub funder: &'a dyn Signer,
    /// Token account the reward tokens are taken from.
    pub funder_account: Pubkey,
    pub amount: u64,
}

/// Client handle for one staking vault.
///
/// The cached reward mint, stake token count and reward duration are taken at
/// construction and never refreshed; use [`Vault::fetch`] for the current state.
#[derive(Clone)]
pub struct Vault {
    program: Program,
    key: Pubkey,
    reward_mint: Pubkey,
    reward_address: Pubkey,
    reward_account: Pubkey,
    stake_token_count: u32,
    reward_duration: u64,
}

impl Vault {
    /// Wrap an existing vault whose parameters are already known.
    pub fn new(
        program: Program,
        key: Pubkey,
        reward_mint: Pubkey,
        stake_token_count: u32,
        reward_duration: u64,
    ) -> Self {
        let (reward_address, _) = pda::find_reward_address(program.id(), &key);
        let reward_account = pda::reward_token_account(&reward_address, &reward_mint);
        Self {
            program,
            key,
            reward_mint,
            reward_address,
            reward_account,
            stake_token_count,
            reward_duration,
        }
    }

    /// Wrap an existing vault, reading its parameters from chain.
    pub async fn load(program: Program, key: Pubkey) -> Result<Option<Self>> {
        let Some(data) = program.fetch::<VaultData>(&key).await? else {
            return Ok(None);
        };
        let (reward_address, _) = pda::find_reward_address(program.id(), &key);
        Ok(Some(Self {
            program,
            key,
            reward_mint: data.reward_mint,
            reward_address,
            reward_account: data.reward_account,
            stake_token_count: data.stake_token_count,
            reward_duration: data.reward_duration,
        }))
    }

    /// Create a new vault on chain.
    pub async fn create(
        program: Program,
        options: CreateVaultOptions<'_>,
    ) -> Result<(Self, Signature)> {
        let generated;
        let vault_signer: &dyn Signer = match options.vault {
            Some(signer) => signer,
            None => {
                generated = Keypair::new();
                &generated
            }
        };
        let key = vault_signer.pubkey();

        let (reward_address, reward_bump) = pda::find_reward_address(program.id(), &key);
        let reward_account = pda::reward_token_account(&reward_address, &options.reward_mint);
        tracing::info!(
            "creating vault {}, reward={} reward_account={}",
            key,
            reward_address,
            reward_account
        );

        let instruction = instructions::create_vault(
            program.id(),
            &CreateVaultAccounts {
                authority: options.authority.pubkey(),
                vault: key,
                reward: reward_address,
                reward_mint: options.reward_mint,
                reward_account,
            },
            &CreateVaultArgs {
                reward_bump,
                reward_duration: options.reward_duration,
                stake_token_count: options.stake_token_count,
            },
        );

        let ins = Instructions::new(options.authority)
            .signer(vault_signer)
            .instruction(instruction);
        let signature = program.send(ins).await?;

        let vault = Self {
            program,
            key,
            reward_mint: options.reward_mint,
            reward_address,
            reward_account,
            stake_token_count: options.stake_token_count,
            reward_duration: options.reward_duration,
        };
        Ok((vault, signature))
    }

    pub fn key(&self) -> &Pubkey {
        &self.key
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn reward_mint(&self) -> &Pubkey {
        &self.reward_mint
    }

    pub fn reward_address(&self) -> &Pubkey {
        &self.reward_address
    }

    pub fn reward_account(&self) -> &Pubkey {
        &self.reward_account
    }

    pub fn stake_token_count(&self) -> u32 {
        self.stake_token_count
    }

    pub fn reward_duration(&self) -> u64 {
        self.reward_duration
    }

    pub fn user_address(&self, authority: &Pubkey) -> (Pubkey, u8) {
        pda::find_user_address(self.program.id(), &self.key, authority)
    }

    pub async fn fetch(&self) -> Result<Option<VaultData>> {
        self.program.fetch(&self.key).await
    }

    pub async fn fetch_user(&self, address: &Pubkey) -> Result<Option<UserData>> {
        self.program.fetch(address).await
    }

    pub async fn fetch_user_by_authority(&self, authority: &Pubkey) -> Result<Option<UserData>> {
        let (address, _) = self.user_address(authority);
        self.fetch_user(&address).await
    }

    /// All user accounts registered with this vault.
    pub async fn fetch_users(&self) -> Result<Vec<(Pubkey, UserData)>> {
        self.program
            .fetch_all::<UserData>([RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
                USER_VAULT_OFFSET,
                self.key.as_ref(),
            ))])
            .await
    }

    pub async fn add_funder(&self, authority: &dyn Signer, funder: &Pubkey) -> Result<Signature> {
        tracing::info!("authorizing funder {} on vault {}", funder, self.key);
        let instruction =
            instructions::authorize_funder(self.program.id(), &authority.pubkey(), &self.key, funder);
        self.program
            .send(Instructions::new(authority).instruction(instruction))
            .await
    }

    pub async fn remove_funder(&self, authority: &dyn Signer, funder: &Pubkey) -> Result<Signature> {
        tracing::info!("unauthorizing funder {} on vault {}", funder, self.key);
        let instruction = instructions::unauthorize_funder(
            self.program.id(),
            &authority.pubkey(),
            &self.key,
            funder,
        );
        self.program
            .send(Instructions::new(authority).instruction(instruction))
            .await
    }

    pub async fn fund(&self, options: FundOptions<'_>) -> Result<Signature> {
        tracing::info!(
            "funding vault {} with {} from {}",
            self.key,
            options.amount,
            options.funder_account
        );
        let instruction = instructions::fund(
            self.program.id(),
            &FundAccounts {
                funder: options.funder.pubkey(),
                vault: self.key,
                reward_account: self.reward_account,
                funder_account: options.funder_account,
            },
            options.amount,
        );
        self.program
            .send(Instructions::new(options.funder).instruction(instruction))
            .await
    }

    /// Register `authority` as a user of this vault, returning the user address.
    pub async fn create_user(&self, authority: &dyn Signer) -> Result<(Pubkey, Signature)> {
        let (user, user_bump) = self.user_address(&authority.pubkey());
        tracing::info!("creating user {} for {}", user, authority.pubkey());
        let instruction = instructions::create_user(
            self.program.id(),
            &authority.pubkey(),
            &self.key,
            &user,
            user_bump,
        );
        let signature = self
            .program
            .send(Instructions::new(authority).instruction(instruction))
            .await?;
        Ok((user, signature))
    }
}
