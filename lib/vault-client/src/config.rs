use crate::{program::Program, transaction::COMMITMENT, Error, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair},
};
use std::path::{Path, PathBuf};

#[serde_as]
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "Config::default_rpc_url")]
    pub rpc_url: String,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub program_id: Option<Pubkey>,
    #[serde(default = "Config::default_keypair")]
    pub keypair: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: Self::default_rpc_url(),
            program_id: None,
            keypair: Self::default_keypair(),
        }
    }
}

impl Config {
    pub fn default_rpc_url() -> String {
        "http://127.0.0.1:8899".to_owned()
    }

    /// Same location as the Solana CLI default keypair.
    pub fn default_keypair() -> PathBuf {
        home::home_dir()
            .unwrap_or_default()
            .join(".config/solana/id.json")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&s)?)
    }

    /// Like [`Config::load`], but falls back to defaults when there is no usable file.
    pub fn get_config(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load(path)
                .map_err(|error| {
                    tracing::warn!(
                        "invalid config file {}, using default: {}",
                        path.display(),
                        error
                    );
                })
                .unwrap_or_default(),
            None => {
                tracing::info!("no config specified, using default");
                Config::default()
            }
        }
    }

    /// RPC client for `rpc_url`. Does not need a program id.
    pub fn rpc_client(&self) -> RpcClient {
        RpcClient::new_with_commitment(self.rpc_url.clone(), COMMITMENT)
    }

    pub fn program(&self) -> Result<Program> {
        let id = self
            .program_id
            .ok_or_else(|| Error::custom(anyhow::anyhow!("program_id is not configured")))?;
        Ok(Program::from_url(&self.rpc_url, id))
    }

    pub fn read_keypair(&self) -> Result<Keypair> {
        read_keypair_file(&self.keypair).map_err(|error| Error::Keypair {
            path: self.keypair.display().to_string(),
            reason: error.to_string(),
        })
    }
}
