use crate::application::staging::StagingLedger;
use crate::domain::currency::{assemble_definition, validate_draft, CurrencyDefinitionDraft};
use crate::domain::StagedDefinition;
use crate::foundation::Result;
use crate::infrastructure::rpc::DaemonClient;
use log::info;

/// Validate and assemble `draft`, ask the daemon to build the definition, and stage the result.
///
/// Returns the staged record. If the daemon hands back a txid that is already staged, the
/// existing record is kept and returned unchanged.
pub async fn define_currency(daemon: &DaemonClient, ledger: &StagingLedger, draft: &CurrencyDefinitionDraft) -> Result<StagedDefinition> {
    validate_draft(draft)?;
    let params = assemble_definition(draft);
    info!("defining currency name={} options={}", draft.name.trim(), draft.options_mask);
    let outcome = daemon.define_currency(&params).await?;
    let record = StagedDefinition::new(params, outcome.txid, outcome.hex);
    let define_txid = record.define_txid.clone();
    if !ledger.add(record.clone()) {
        return Ok(ledger.get(&define_txid).unwrap_or(record));
    }
    Ok(record)
}
