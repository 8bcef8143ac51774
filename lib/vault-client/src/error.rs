use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    rpc_request::{RpcError, RpcResponseErrorData},
};
use solana_sdk::{program_error::ProgramError, pubkey::Pubkey, signer::SignerError};
use std::result::Result as StdResult;
use thiserror::Error as ThisError;

pub type Result<T> = StdResult<T, Error>;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("{}", verbose_solana_error(.0))]
    SolanaClient(#[from] ClientError),
    #[error(transparent)]
    Signer(#[from] SignerError),
    #[error(transparent)]
    Program(#[from] ProgramError),
    #[error("account {address} is not a {expected} account: discriminator mismatch")]
    AccountDiscriminator {
        address: Pubkey,
        expected: &'static str,
    },
    #[error("account {address} is owned by {owner}, not the staking program")]
    AccountOwner { address: Pubkey, owner: Pubkey },
    #[error("failed to decode {name} account {address}: {source}")]
    AccountData {
        address: Pubkey,
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read keypair {path}: {reason}")]
    Keypair { path: String, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

impl Error {
    pub fn custom<E: Into<anyhow::Error>>(e: E) -> Self {
        Error::Any(e.into())
    }

    /// Index of the instruction that failed preflight simulation, if the RPC node reported one.
    pub fn failed_instruction(&self) -> Option<usize> {
        match self {
            Error::SolanaClient(err) => find_failed_instruction(err),
            _ => None,
        }
    }
}

const PREFLIGHT_INSTRUCTION_ERROR: &str =
    "Transaction simulation failed: Error processing Instruction ";

fn rpc_response(err: &ClientError) -> Option<(i64, &str, &RpcResponseErrorData)> {
    match &err.kind {
        ClientErrorKind::RpcError(RpcError::RpcResponseError {
            code,
            message,
            data,
        }) => Some((*code, message.as_str(), data)),
        _ => None,
    }
}

/// Parses the failing instruction index out of a preflight rejection message.
pub fn find_failed_instruction(err: &ClientError) -> Option<usize> {
    let (_, message, _) = rpc_response(err)?;
    let rest = message.strip_prefix(PREFLIGHT_INSTRUCTION_ERROR)?;
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

/// Renders an RPC error together with the program logs of a failed preflight.
pub fn verbose_solana_error(err: &ClientError) -> String {
    let Some((code, message, data)) = rpc_response(err) else {
        return err.to_string();
    };
    let logs: &[String] = match data {
        RpcResponseErrorData::SendTransactionPreflightFailure(result) => {
            result.logs.as_deref().unwrap_or_default()
        }
        _ => &[],
    };
    std::iter::once(format!("{message} ({code})"))
        .chain(
            logs.iter()
                .enumerate()
                .map(|(i, log)| format!("{}: {log}", i + 1)),
        )
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_client::{rpc_request::RpcRequest, rpc_response::RpcSimulateTransactionResult};

    fn rpc_response_error(message: &str, logs: Option<Vec<String>>) -> ClientError {
        let data = match logs {
            Some(logs) => RpcResponseErrorData::SendTransactionPreflightFailure(
                serde_json::from_value::<RpcSimulateTransactionResult>(
                    serde_json::json!({ "logs": logs }),
                )
                .unwrap(),
            ),
            None => RpcResponseErrorData::Empty,
        };
        ClientError::new_with_request(
            ClientErrorKind::RpcError(RpcError::RpcResponseError {
                code: -32002,
                message: message.to_owned(),
                data,
            }),
            RpcRequest::SendTransaction,
        )
    }

    #[test]
    fn test_failed_instruction_index() {
        let err = rpc_response_error(
            "Transaction simulation failed: Error processing Instruction 1: custom program error: 0x1771",
            None,
        );
        assert_eq!(find_failed_instruction(&err), Some(1));
        assert_eq!(Error::from(err).failed_instruction(), Some(1));

        let err = rpc_response_error("Node is unhealthy", None);
        assert_eq!(find_failed_instruction(&err), None);
        assert_eq!(verbose_solana_error(&err), "Node is unhealthy (-32002)");
    }

    #[test]
    fn test_verbose_error_includes_logs() {
        let err = rpc_response_error(
            "Transaction simulation failed",
            Some(vec![
                "Program log: Instruction: AuthorizeFunder".to_owned(),
                "Program log: unauthorized".to_owned(),
            ]),
        );
        let s = Error::from(err).to_string();
        assert!(s.starts_with("Transaction simulation failed (-32002)"));
        assert!(s.contains("1: Program log: Instruction: AuthorizeFunder"));
        assert!(s.contains("2: Program log: unauthorized"));
    }
}
