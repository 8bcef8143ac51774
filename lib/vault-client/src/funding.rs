//! Helpers for funding wallets and reward tokens, mostly on local validators and devnet.

use crate::{
    pda,
    transaction::{Instructions, COMMITMENT},
    Error, Result,
};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    program_pack::Pack,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    system_instruction,
};
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use spl_token::state::Mint;

pub const DEFAULT_AIRDROP: u64 = 1_000_000_000;

/// Request an airdrop and wait until it is confirmed.
///
/// Fails if the airdrop transaction landed with an error.
pub async fn airdrop(rpc: &RpcClient, to: &Pubkey, lamports: u64) -> Result<Signature> {
    tracing::info!("requesting airdrop of {} lamports to {}", lamports, to);
    let signature = rpc.request_airdrop(to, lamports).await?;
    rpc.poll_for_signature_with_commitment(&signature, COMMITMENT)
        .await?;
    if let Some(Err(error)) = rpc
        .get_signature_status_with_commitment(&signature, COMMITMENT)
        .await?
    {
        tracing::warn!("airdrop {} failed: {}", signature, error);
        return Err(Error::SolanaClient(error.into()));
    }
    Ok(signature)
}

/// Create and initialize a new SPL mint.
pub async fn create_mint(
    rpc: &RpcClient,
    payer: &dyn Signer,
    mint_authority: &Pubkey,
    decimals: u8,
) -> Result<(Pubkey, Signature)> {
    let mint = Keypair::new();
    let minimum_balance_for_rent_exemption =
        rpc.get_minimum_balance_for_rent_exemption(Mint::LEN).await?;

    let ins = Instructions::new(payer)
        .signer(&mint)
        .instruction(system_instruction::create_account(
            &payer.pubkey(),
            &mint.pubkey(),
            minimum_balance_for_rent_exemption,
            Mint::LEN as u64,
            &spl_token::id(),
        ))
        .instruction(spl_token::instruction::initialize_mint2(
            &spl_token::id(),
            &mint.pubkey(),
            mint_authority,
            None,
            decimals,
        )?);

    let signature = ins.execute(rpc).await?;
    Ok((mint.pubkey(), signature))
}

/// Create the associated token account of `owner` for `mint`, if it does not exist yet.
pub async fn create_token_account(
    rpc: &RpcClient,
    payer: &dyn Signer,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<(Pubkey, Signature)> {
    let associated_token_account = pda::associated_token_account(owner, mint);
    let instruction =
        create_associated_token_account_idempotent(&payer.pubkey(), owner, mint, &spl_token::id());

    let signature = Instructions::new(payer)
        .instruction(instruction)
        .execute(rpc)
        .await?;
    Ok((associated_token_account, signature))
}

pub async fn mint_to(
    rpc: &RpcClient,
    payer: &dyn Signer,
    mint: &Pubkey,
    mint_authority: &dyn Signer,
    destination: &Pubkey,
    amount: u64,
) -> Result<Signature> {
    let instruction = spl_token::instruction::mint_to(
        &spl_token::id(),
        mint,
        destination,
        &mint_authority.pubkey(),
        &[],
        amount,
    )?;

    Instructions::new(payer)
        .signer(mint_authority)
        .instruction(instruction)
        .execute(rpc)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_airdrop() {
        let rpc = RpcClient::new_mock("succeeds".to_owned());
        let signature = airdrop(&rpc, &Pubkey::new_unique(), DEFAULT_AIRDROP)
            .await
            .unwrap();
        assert_ne!(signature, Signature::default());
    }

    #[tokio::test]
    async fn test_airdrop_failed_transaction() {
        let rpc = RpcClient::new_mock("instruction_error".to_owned());
        let result = airdrop(&rpc, &Pubkey::new_unique(), DEFAULT_AIRDROP).await;
        assert!(matches!(result, Err(Error::SolanaClient(_))));
    }

    #[tokio::test]
    async fn test_create_token_account_address() {
        let rpc = RpcClient::new_mock("succeeds".to_owned());
        let payer = Keypair::new();
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let (ata, _) = create_token_account(&rpc, &payer, &owner, &mint).await.unwrap();
        assert_eq!(
            ata,
            spl_associated_token_account::get_associated_token_address(&owner, &mint)
        );
    }

    #[tokio::test]
    async fn test_mint_flow() {
        let rpc = RpcClient::new_mock("succeeds".to_owned());
        let payer = Keypair::new();
        let (mint, _) = create_mint(&rpc, &payer, &payer.pubkey(), 6).await.unwrap();
        mint_to(&rpc, &payer, &mint, &payer, &Pubkey::new_unique(), 1_000)
            .await
            .unwrap();
    }
}
