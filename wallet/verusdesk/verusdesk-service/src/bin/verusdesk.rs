#[path = "verusdesk/cli.rs"]
mod cli;
#[path = "verusdesk/modes/mod.rs"]
mod modes;
#[path = "verusdesk/setup.rs"]
mod setup;

use crate::cli::{Cli, Command};
use log::{error, info, warn};
use std::process::ExitCode;
use verusdesk_core::application::Desk;
use verusdesk_core::foundation::Result;
use verusdesk_core::infrastructure::config::AppConfig;

async fn run(args: &Cli, app_config: &AppConfig) -> Result<()> {
    let desk = Desk::connect(app_config)?;
    let outcome = match &args.command {
        Command::Define(define) => modes::currency::define(&desk, define).await,
        Command::Staged(staged) => modes::currency::staged(&desk, staged).await,
        Command::Offers(offers) => modes::offers::offers(&desk, offers).await,
        Command::Take(take) => modes::offers::take(&desk, take).await,
        Command::Make(make) => modes::offers::make(&desk, make).await,
        Command::Close { txids } => modes::offers::close(&desk, txids).await,
        Command::Trades(trades) => modes::trades::trades(&desk, trades).await,
    };
    if let Err(err) = desk.flush() {
        warn!("persisting state on exit failed error={}", err);
    }
    outcome
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Cli::parse_args();
    args.apply_to_env();

    let app_config = match setup::load_app_config() {
        Ok(config) => config,
        Err(err) => {
            let _ = setup::init_logging(&args.log_level, None);
            error!("failed to load configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = setup::init_logging(&args.log_level, Some(&app_config)) {
        eprintln!("logger setup failed: {err}");
    }
    info!("verusdesk starting chain={} ephemeral={}", app_config.node.chain, app_config.storage.ephemeral);

    match run(&args, &app_config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let context = err.context();
            error!("{} (code={:?} kind={:?})", err.user_message(), context.code, context.kind);
            ExitCode::FAILURE
        }
    }
}
