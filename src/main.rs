//! `reme`: deploy, inspect and drive a REME ledger from the command line.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::{rngs::OsRng, RngCore};

use reme_ledger::calls::{self, Invocation};
use reme_ledger::config::DeploymentConfig;
use reme_ledger::types::{parse_amount, Address};

#[derive(Parser)]
#[command(name = "reme", about = "REME Coin fee ledger")]
struct Cli {
    /// TOML deployment config. Flags and env vars override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Deployer and initial owner.
    #[arg(long, env = "OWNER")]
    owner: Option<Address>,

    /// Fee in parts per million (5000 = 0.5%).
    #[arg(long, env = "FEE")]
    fee: Option<u64>,

    /// Account credited with collected fees.
    #[arg(long, env = "FEE_BENEFICIARY")]
    fee_beneficiary: Option<Address>,

    /// Fee threshold in whole tokens.
    #[arg(long, env = "FEE_THRESHOLD")]
    fee_threshold: Option<u64>,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, default_value = "warn", env = "REME_LOG_LEVEL")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Deploy and print the resulting ledger snapshot.
    Inspect,
    /// Deploy, replay a JSON array of invocations and print the receipts.
    Replay {
        /// File holding `[{"caller": "0x..", "call": {"type": ..}}, ..]`.
        calls: PathBuf,
    },
    /// Show the fee split for a transfer with fees enabled.
    Quote {
        /// Account paying the transfer.
        #[arg(long)]
        from: Address,
        /// Amount in base units (1 REME = 10^18).
        #[arg(long, value_parser = parse_amount)]
        amount: reme_ledger::Amount,
    },
    /// Print a random address.
    NewAddress,
}

fn init_tracing(default_level: &str) {
    use tracing_subscriber::EnvFilter;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(cli: &Cli) -> anyhow::Result<DeploymentConfig> {
    let base = match &cli.config {
        Some(path) => {
            let cfg = DeploymentConfig::from_toml_file(path)
                .with_context(|| format!("loading {}", path.display()))?;
            tracing::info!("loaded config from {}", path.display());
            Some(cfg)
        }
        None => None,
    };

    let owner = cli
        .owner
        .or(base.as_ref().map(|cfg| cfg.owner))
        .context("owner is required (--owner, OWNER or config)")?;
    let fee_beneficiary = cli
        .fee_beneficiary
        .or(base.as_ref().map(|cfg| cfg.fee_beneficiary))
        .context("fee beneficiary is required (--fee-beneficiary, FEE_BENEFICIARY or config)")?;
    let mut config = match base {
        Some(cfg) => cfg,
        None => DeploymentConfig::with_parties(owner, fee_beneficiary),
    };
    config.owner = owner;
    config.fee_beneficiary = fee_beneficiary;
    if let Some(fee) = cli.fee {
        config.fee = fee;
    }
    if let Some(threshold) = cli.fee_threshold {
        config.fee_threshold = threshold;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match &cli.command {
        Command::NewAddress => {
            let mut bytes = [0u8; 20];
            OsRng.fill_bytes(&mut bytes);
            println!("{}", Address::from(bytes));
        }
        Command::Inspect => {
            let ledger = resolve_config(&cli)?.deploy()?;
            println!("{}", serde_json::to_string_pretty(&ledger.snapshot())?);
        }
        Command::Replay { calls: path } => {
            let mut ledger = resolve_config(&cli)?.deploy()?;
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let invocations: Vec<Invocation> =
                serde_json::from_str(&raw).context("parsing invocations")?;
            let receipts = calls::replay(&mut ledger, &invocations);
            let rejected = receipts.iter().filter(|r| !r.accepted()).count();
            tracing::info!(total = receipts.len(), rejected, "replay finished");
            let report = serde_json::json!({
                "receipts": receipts,
                "snapshot": ledger.snapshot(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Quote { from, amount } => {
            let mut ledger = resolve_config(&cli)?.deploy()?;
            let owner = ledger.owner();
            ledger.enable_fees(&owner)?;
            let split = ledger.compute_fee(from, *amount);
            println!("{}", serde_json::to_string_pretty(&split)?);
        }
    }
    Ok(())
}
