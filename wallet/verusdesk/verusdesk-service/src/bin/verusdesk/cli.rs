use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "verusdesk")]
#[command(about = "Stage currency definitions and trade on the Verus marketplace", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Override daemon RPC URL
    #[arg(short, long, global = true)]
    pub node_url: Option<String>,

    /// Log filters, e.g. `info` or `debug,reqwest=warn`
    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assemble a currency definition with `definecurrency` and stage it
    Define(DefineArgs),
    /// Staged (not yet broadcast) currency definitions
    #[command(subcommand)]
    Staged(StagedCommand),
    /// Browse marketplace offers
    #[command(subcommand)]
    Offers(OffersCommand),
    /// Take an offer
    Take(TakeArgs),
    /// Make an offer
    Make(MakeArgs),
    /// Close open offers
    Close {
        #[arg(required = true)]
        txids: Vec<String>,
    },
    /// Broadcast trade history
    #[command(subcommand)]
    Trades(TradesCommand),
}

#[derive(Args, Debug)]
pub struct DefineArgs {
    /// Currency name
    #[arg(long)]
    pub name: String,

    /// Option to enable, by name (`token`, `fractional`, `pbaas`, ...); repeatable
    #[arg(long = "option", value_name = "NAME")]
    pub options: Vec<String>,

    /// Raw option mask, OR-ed with any named options
    #[arg(long)]
    pub mask: Option<u32>,

    /// Definition field as `key=value`; repeatable
    #[arg(long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,

    /// Token preallocation as `identity=amount`; repeatable
    #[arg(long = "prealloc", value_name = "IDENTITY=AMOUNT")]
    pub preallocations: Vec<String>,

    /// Preallocations as JSON, for fractional and NFT currencies
    #[arg(long)]
    pub preallocations_json: Option<String>,

    /// Print the assembled parameters without calling the daemon
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum StagedCommand {
    List,
    Remove { define_txid: String },
    Clear,
    /// Relay a staged definition with `sendrawtransaction`
    Broadcast { define_txid: String },
}

#[derive(Subcommand, Debug)]
pub enum OffersCommand {
    /// Offers for a currency, or for an identity with `--identity`
    List {
        target: String,
        #[arg(long)]
        identity: bool,
    },
    /// This wallet's open offers
    Open,
    /// Resolve both sides of one offer
    Show {
        target: String,
        txid: String,
        #[arg(long)]
        identity: bool,
    },
}

#[derive(Args, Debug)]
pub struct TakeArgs {
    /// Currency or identity the offer is listed under
    #[arg(long)]
    pub target: String,
    #[arg(long)]
    pub identity_listing: bool,
    /// Offer txid
    #[arg(long)]
    pub txid: String,
    /// Funding address, or `*` for any wallet address
    #[arg(long)]
    pub from: String,
    #[arg(long)]
    pub change_address: Option<String>,
    /// Destination for an accepted currency amount
    #[arg(long)]
    pub accept_address: Option<String>,
    /// New primary address for an accepted identity
    #[arg(long)]
    pub primary_address: Option<String>,
    #[arg(long)]
    pub minimum_signatures: Option<i64>,
    #[arg(long)]
    pub revocation_authority: Option<String>,
    #[arg(long)]
    pub recovery_authority: Option<String>,
    #[arg(long)]
    pub private_address: Option<String>,
    /// Manual deliver side as `currency=amount`, used when the offer cannot be read
    #[arg(long, value_name = "CURRENCY=AMOUNT")]
    pub deliver: Option<String>,
    /// Manual accept side as `currency=amount`
    #[arg(long, value_name = "CURRENCY=AMOUNT")]
    pub accept: Option<String>,
    #[arg(long)]
    pub return_tx: bool,
    #[arg(long)]
    pub fee: Option<f64>,
}

#[derive(Args, Debug)]
pub struct MakeArgs {
    #[arg(long)]
    pub from: String,
    #[arg(long)]
    pub change_address: Option<String>,
    #[arg(long)]
    pub expiry_height: Option<u64>,
    /// Currency offered as `currency=amount`
    #[arg(long, value_name = "CURRENCY=AMOUNT", conflicts_with = "offer_identity")]
    pub offer_currency: Option<String>,
    /// Identity offered
    #[arg(long)]
    pub offer_identity: Option<String>,
    /// Currency wanted as `currency=amount`
    #[arg(long, value_name = "CURRENCY=AMOUNT", conflicts_with = "want_identity")]
    pub want_currency: Option<String>,
    /// Address receiving the wanted currency
    #[arg(long)]
    pub want_address: Option<String>,
    /// Identity name wanted
    #[arg(long)]
    pub want_identity: Option<String>,
    #[arg(long)]
    pub want_parent: Option<String>,
    /// Primary address of the wanted identity; repeatable
    #[arg(long = "want-primary-address")]
    pub want_primary_addresses: Vec<String>,
    #[arg(long, default_value_t = 1)]
    pub want_minimum_signatures: i64,
    #[arg(long)]
    pub return_tx: bool,
    #[arg(long)]
    pub fee: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum TradesCommand {
    List,
    /// Fetch details for one trade
    Details { txid: String },
    /// Re-fetch details for every trade
    Refresh,
    Remove { txid: String },
    Clear,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn apply_to_env(&self) {
        if let Some(config_path) = &self.config {
            std::env::set_var(verusdesk_core::infrastructure::config::CONFIG_PATH_ENV, config_path);
        }

        if let Some(data_dir) = &self.data_dir {
            std::env::set_var(verusdesk_core::infrastructure::config::DATA_DIR_ENV, data_dir);
        }

        if let Some(node_url) = &self.node_url {
            std::env::set_var(verusdesk_core::infrastructure::config::NODE_URL_ENV, node_url);
        }
    }
}
