#![allow(clippy::print_stdout)]

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use serde::Serialize;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Signature},
    signer::Signer,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vault_client::{
    funding::{self, DEFAULT_AIRDROP},
    pda, Config, CreateVaultOptions, FundOptions, Vault, VaultData,
};

#[derive(Parser, Debug)]
#[command(name = "vault", version, about = "Manage staking vaults")]
struct Args {
    /// Path to TOML config file
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// RPC URL, overrides the config file
    #[arg(long, short)]
    url: Option<String>,
    /// Staking program id, overrides the config file
    #[arg(long)]
    program_id: Option<Pubkey>,
    /// Signer keypair file, overrides the config file
    #[arg(long, short)]
    keypair: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new vault, signed by the configured keypair as authority
    Create {
        #[arg(long)]
        reward_mint: Pubkey,
        /// Reward duration in seconds
        #[arg(long)]
        reward_duration: u64,
        #[arg(long)]
        stake_token_count: u32,
        /// Keypair for the vault account, generated if omitted
        #[arg(long)]
        vault_keypair: Option<PathBuf>,
    },
    /// Print a vault snapshot
    Show { vault: Pubkey },
    /// Print a user snapshot, by address or by authority (default: the configured keypair)
    ShowUser {
        vault: Pubkey,
        #[arg(long, conflicts_with = "authority")]
        user: Option<Pubkey>,
        #[arg(long)]
        authority: Option<Pubkey>,
    },
    /// List all users of a vault
    Users { vault: Pubkey },
    /// Authorize a funder
    AddFunder { vault: Pubkey, funder: Pubkey },
    /// Revoke a funder
    RemoveFunder { vault: Pubkey, funder: Pubkey },
    /// Transfer reward tokens into the vault
    Fund {
        vault: Pubkey,
        /// Raw token amount
        #[arg(long)]
        amount: u64,
        /// Source token account (default: the keypair's associated token account)
        #[arg(long)]
        funder_account: Option<Pubkey>,
    },
    /// Register the configured keypair as a vault user
    CreateUser { vault: Pubkey },
    /// Request an airdrop of SOL
    Airdrop {
        /// Recipient (default: the configured keypair)
        #[arg(long)]
        to: Option<Pubkey>,
        #[arg(long, default_value_t = DEFAULT_AIRDROP)]
        lamports: u64,
    },
}

#[derive(Serialize)]
struct TxOutput {
    signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
}

impl TxOutput {
    fn new(signature: Signature, address: Option<Pubkey>) -> Self {
        Self {
            signature: signature.to_string(),
            address: address.map(|pk| pk.to_string()),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

impl Args {
    fn config(&self) -> Config {
        let mut config = Config::get_config(self.config.as_deref());
        if let Some(url) = &self.url {
            config.rpc_url = url.clone();
        }
        if self.program_id.is_some() {
            config.program_id = self.program_id;
        }
        if let Some(keypair) = &self.keypair {
            config.keypair = keypair.clone();
        }
        config
    }
}

async fn load_vault(config: &Config, key: Pubkey) -> anyhow::Result<Vault> {
    Vault::load(config.program()?, key)
        .await?
        .ok_or_else(|| anyhow!("vault {} not found", key))
}

/// Index of the rejected instruction, when the error is a preflight failure.
fn failed_instruction(error: &anyhow::Error) -> Option<usize> {
    error
        .downcast_ref::<vault_client::Error>()
        .and_then(vault_client::Error::failed_instruction)
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = args.config();

    match args.command {
        Commands::Create {
            reward_mint,
            reward_duration,
            stake_token_count,
            vault_keypair,
        } => {
            let authority = config.read_keypair()?;
            let vault_keypair = vault_keypair
                .map(|path| {
                    read_keypair_file(&path)
                        .map_err(|error| anyhow!("reading {}: {}", path.display(), error))
                })
                .transpose()?;
            let (vault, signature) = Vault::create(
                config.program()?,
                CreateVaultOptions {
                    authority: &authority,
                    vault: vault_keypair.as_ref().map(|k| k as &dyn Signer),
                    reward_mint,
                    reward_duration,
                    stake_token_count,
                },
            )
            .await?;
            print_json(&TxOutput::new(signature, Some(*vault.key())))?;
        }
        Commands::Show { vault } => {
            let data = config.program()?.fetch::<VaultData>(&vault).await?;
            print_json(&data)?;
        }
        Commands::ShowUser {
            vault,
            user,
            authority,
        } => {
            let vault = load_vault(&config, vault).await?;
            let data = match (user, authority) {
                (Some(user), _) => vault.fetch_user(&user).await?,
                (None, Some(authority)) => vault.fetch_user_by_authority(&authority).await?,
                (None, None) => {
                    let keypair = config.read_keypair()?;
                    vault.fetch_user_by_authority(&keypair.pubkey()).await?
                }
            };
            print_json(&data)?;
        }
        Commands::Users { vault } => {
            let users = load_vault(&config, vault).await?.fetch_users().await?;
            let users = users
                .into_iter()
                .map(|(address, data)| serde_json::json!({ "address": address.to_string(), "data": data }))
                .collect::<Vec<_>>();
            print_json(&users)?;
        }
        Commands::AddFunder { vault, funder } => {
            let authority = config.read_keypair()?;
            let signature = load_vault(&config, vault)
                .await?
                .add_funder(&authority, &funder)
                .await?;
            print_json(&TxOutput::new(signature, None))?;
        }
        Commands::RemoveFunder { vault, funder } => {
            let authority = config.read_keypair()?;
            let signature = load_vault(&config, vault)
                .await?
                .remove_funder(&authority, &funder)
                .await?;
            print_json(&TxOutput::new(signature, None))?;
        }
        Commands::Fund {
            vault,
            amount,
            funder_account,
        } => {
            let funder = config.read_keypair()?;
            let vault = load_vault(&config, vault).await?;
            let funder_account = funder_account.unwrap_or_else(|| {
                pda::associated_token_account(&funder.pubkey(), vault.reward_mint())
            });
            let signature = vault
                .fund(FundOptions {
                    funder: &funder,
                    funder_account,
                    amount,
                })
                .await?;
            print_json(&TxOutput::new(signature, None))?;
        }
        Commands::CreateUser { vault } => {
            let authority = config.read_keypair()?;
            let (user, signature) = load_vault(&config, vault)
                .await?
                .create_user(&authority)
                .await?;
            print_json(&TxOutput::new(signature, Some(user)))?;
        }
        Commands::Airdrop { to, lamports } => {
            let to = match to {
                Some(to) => to,
                None => config.read_keypair()?.pubkey(),
            };
            let signature = funding::airdrop(&config.rpc_client(), &to, lamports).await?;
            print_json(&TxOutput::new(signature, Some(to)))?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!("{:?}", args);

    if let Err(error) = run(args).await {
        if let Some(index) = failed_instruction(&error) {
            tracing::error!("instruction #{} was rejected", index);
        }
        tracing::error!("{:#}", error);
        std::process::exit(1);
    }
}
