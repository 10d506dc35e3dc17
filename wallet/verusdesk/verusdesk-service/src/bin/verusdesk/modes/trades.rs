use crate::cli::TradesCommand;
use crate::setup::print_json;
use serde_json::json;
use verusdesk_core::application::Desk;
use verusdesk_core::foundation::{DeskError, Result};

pub async fn trades(desk: &Desk, command: &TradesCommand) -> Result<()> {
    match command {
        TradesCommand::List => print_json(&serde_json::to_value(desk.trades.records())?),
        TradesCommand::Details { txid } => {
            let details = desk.trades.get_details(txid).await;
            print_json(&json!({"txid": txid, "details": details}))
        }
        TradesCommand::Refresh => {
            let records = desk.trades.refresh_all().await;
            print_json(&serde_json::to_value(records)?)
        }
        TradesCommand::Remove { txid } => {
            if !desk.trades.remove(txid) {
                return Err(DeskError::invalid_field("txid", format!("{txid} is not in the trade history")));
            }
            Ok(())
        }
        TradesCommand::Clear => {
            desk.trades.clear();
            Ok(())
        }
    }
}
