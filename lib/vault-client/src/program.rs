use crate::{
    state::AccountData,
    transaction::{Instructions, COMMITMENT},
    Error, Result,
};
use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::{Memcmp, RpcFilterType},
};
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use std::sync::Arc;

/// Handle to the remote staking program: an RPC connection and the program id.
#[derive(Clone)]
pub struct Program {
    rpc: Arc<RpcClient>,
    id: Pubkey,
}

impl Program {
    pub fn new(rpc: Arc<RpcClient>, id: Pubkey) -> Self {
        Self { rpc, id }
    }

    /// Connect to `url` with `confirmed` as the default commitment.
    pub fn from_url(url: impl ToString, id: Pubkey) -> Self {
        Self::new(
            Arc::new(RpcClient::new_with_commitment(url.to_string(), COMMITMENT)),
            id,
        )
    }

    pub fn id(&self) -> &Pubkey {
        &self.id
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Fetch and decode a program account. A missing account is `Ok(None)`.
    pub async fn fetch<T: AccountData>(&self, address: &Pubkey) -> Result<Option<T>> {
        let account = self
            .rpc
            .get_account_with_commitment(address, COMMITMENT)
            .await?
            .value;
        let Some(account) = account else {
            tracing::debug!("{} account {} not found", T::NAME, address);
            return Ok(None);
        };
        if account.owner != self.id {
            return Err(Error::AccountOwner {
                address: *address,
                owner: account.owner,
            });
        }
        T::try_from_account_data(address, &account.data).map(Some)
    }

    /// Fetch every account of type `T` matching `filters`.
    ///
    /// A discriminator filter for `T` is always added.
    pub async fn fetch_all<T: AccountData>(
        &self,
        filters: impl IntoIterator<Item = RpcFilterType>,
    ) -> Result<Vec<(Pubkey, T)>> {
        let filters = std::iter::once(RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
            0,
            &T::discriminator(),
        )))
        .chain(filters)
        .collect::<Vec<_>>();

        let config = RpcProgramAccountsConfig {
            filters: Some(filters),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(COMMITMENT),
                ..Default::default()
            },
            ..Default::default()
        };
        let accounts = self
            .rpc
            .get_program_accounts_with_config(&self.id, config)
            .await?;
        tracing::debug!("found {} {} accounts", accounts.len(), T::NAME);

        accounts
            .into_iter()
            .map(|(address, account)| {
                T::try_from_account_data(&address, &account.data).map(|data| (address, data))
            })
            .collect()
    }

    pub async fn send(&self, instructions: Instructions<'_>) -> Result<Signature> {
        instructions.execute(&self.rpc).await
    }
}
