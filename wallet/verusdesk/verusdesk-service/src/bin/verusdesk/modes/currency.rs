use crate::cli::{DefineArgs, StagedCommand};
use crate::setup::{print_json, split_pair};
use log::info;
use serde_json::{json, Value};
use verusdesk_core::application::Desk;
use verusdesk_core::domain::currency::{assemble_definition, CurrencyDefinitionDraft, CurrencyOption, OptionSelection};
use verusdesk_core::foundation::{DeskError, Result};

pub fn build_draft(args: &DefineArgs) -> Result<CurrencyDefinitionDraft> {
    let mut selection = OptionSelection::new();
    for name in &args.options {
        let option = CurrencyOption::from_name(name).ok_or_else(|| DeskError::invalid_field("option", format!("unknown option {name:?}")))?;
        selection.set(option, true);
    }
    let mut draft = CurrencyDefinitionDraft::new(args.name.clone(), &selection);
    if let Some(mask) = args.mask {
        draft.options_mask |= mask;
    }
    for field in &args.fields {
        let (key, value) = split_pair(field, "field")?;
        draft.set_field(key, Value::String(value.to_string()));
    }
    for entry in &args.preallocations {
        let (identity, amount) = split_pair(entry, "prealloc")?;
        draft = draft.with_preallocation(identity, amount);
    }
    if let Some(raw) = &args.preallocations_json {
        draft = draft.with_preallocations_json(raw.clone());
    }
    Ok(draft)
}

pub async fn define(desk: &Desk, args: &DefineArgs) -> Result<()> {
    let draft = build_draft(args)?;
    if args.dry_run {
        return print_json(&assemble_definition(&draft));
    }
    let staged = desk.define_currency(&draft).await?;
    info!("definition staged define_txid={}", staged.define_txid);
    print_json(&json!({"define_txid": staged.define_txid, "params": staged.input_params}))
}

pub async fn staged(desk: &Desk, command: &StagedCommand) -> Result<()> {
    match command {
        StagedCommand::List => {
            let listing: Vec<Value> = desk
                .staging
                .list()
                .into_iter()
                .map(|record| {
                    json!({
                        "define_txid": record.define_txid,
                        "name": record.currency_name(),
                        "broadcast_txid": desk.staging.broadcast_txid(&record.define_txid),
                    })
                })
                .collect();
            print_json(&Value::Array(listing))
        }
        StagedCommand::Remove { define_txid } => {
            if !desk.staging.remove(define_txid) {
                return Err(DeskError::StagedNotFound(define_txid.clone()));
            }
            Ok(())
        }
        StagedCommand::Clear => {
            desk.staging.clear();
            Ok(())
        }
        StagedCommand::Broadcast { define_txid } => {
            let txid = desk.staging.broadcast(define_txid).await?;
            print_json(&json!({"define_txid": define_txid, "txid": txid}))
        }
    }
}
