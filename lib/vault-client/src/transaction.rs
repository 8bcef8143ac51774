use crate::Result;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    instruction::Instruction,
    message::Message,
    pubkey::Pubkey,
    signature::Signature,
    signer::Signer,
    transaction::Transaction,
};

/// Commitment used for every submission and for the blockhash it is built on.
pub const COMMITMENT: CommitmentConfig = CommitmentConfig {
    commitment: CommitmentLevel::Confirmed,
};

/// Instructions submitted together as one transaction.
pub struct Instructions<'a> {
    pub fee_payer: Pubkey,
    pub signers: Vec<&'a dyn Signer>,
    pub instructions: Vec<Instruction>,
}

impl<'a> Instructions<'a> {
    /// Start a transaction paid for, and signed by, `fee_payer`.
    pub fn new(fee_payer: &'a dyn Signer) -> Self {
        Self {
            fee_payer: fee_payer.pubkey(),
            signers: vec![fee_payer],
            instructions: Vec::new(),
        }
    }

    pub fn signer(mut self, signer: &'a dyn Signer) -> Self {
        if !self.signers.iter().any(|s| s.pubkey() == signer.pubkey()) {
            self.signers.push(signer);
        }
        self
    }

    pub fn instruction(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    /// Sign against `recent_blockhash` without sending.
    pub fn sign(&self, recent_blockhash: solana_sdk::hash::Hash) -> Result<Transaction> {
        let message =
            Message::new_with_blockhash(&self.instructions, Some(&self.fee_payer), &recent_blockhash);
        let mut tx = Transaction::new_unsigned(message);
        tx.try_sign(&self.signers, recent_blockhash)?;
        Ok(tx)
    }

    /// Build, sign, send and wait for `confirmed` commitment.
    ///
    /// No retries: a rejected or expired transaction is returned as an error.
    pub async fn execute(self, rpc: &RpcClient) -> Result<Signature> {
        let (recent_blockhash, _) = rpc.get_latest_blockhash_with_commitment(COMMITMENT).await?;

        let tx = self.sign(recent_blockhash)?;

        tracing::debug!(
            "submitting transaction, fee_payer={} instructions={}",
            self.fee_payer,
            self.instructions.len()
        );
        let signature = rpc
            .send_and_confirm_transaction_with_spinner_and_commitment(&tx, COMMITMENT)
            .await?;
        tracing::info!("confirmed {}", signature);

        Ok(signature)
    }
}
