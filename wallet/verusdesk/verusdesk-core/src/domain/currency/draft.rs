use crate::domain::currency::options::{project_mask, GroupId, OptionSelection, ProjectedOptions};
use crate::foundation::{DeskError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Core `definecurrency` fields, in the order they are emitted.
pub const CORE_FIELDS: &[&str] = &[
    "idregistrationfees",
    "idreferrallevels",
    "notarizationreward",
    "proofprotocol",
    "notarizationprotocol",
    "expiryheight",
    "startblock",
    "endblock",
    "initialsupply",
    "prelaunchdiscount",
    "prelaunchcarveout",
    "gatewayconvertername",
];

/// Keys the assembler owns; caller-supplied values under these names are ignored.
pub const RESERVED_FIELDS: &[&str] = &["options", "name", "preallocations"];

/// How a raw form value is normalized before it is emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldShape {
    Number,
    Text,
    /// Comma-separated text becomes an array of strings.
    TextList,
    /// Comma-separated text becomes an array of numbers.
    NumberList,
    /// Free-form JSON, parsed permissively.
    Json,
}

pub fn field_shape(name: &str) -> FieldShape {
    match name {
        "gatewayconvertername" | "parent" | "systemid" | "launchsystemid" => FieldShape::Text,
        "idregistrationfees" | "idreferrallevels" | "idimportfees" | "notarizationreward" | "proofprotocol"
        | "notarizationprotocol" | "expiryheight" | "startblock" | "endblock" | "initialsupply" | "prelaunchdiscount"
        | "prelaunchcarveout" | "blocktime" | "powaveragingwindow" | "notarizationperiod" | "minnotariesconfirm" => {
            FieldShape::Number
        }
        "currencies" | "notaries" => FieldShape::TextList,
        "weights" | "conversions" | "initialcontributions" | "minpreconversion" | "maxpreconversion" => FieldShape::NumberList,
        "eras" | "nodes" => FieldShape::Json,
        _ => FieldShape::Text,
    }
}

impl GroupId {
    /// The conditional group a known field belongs to; `None` for core fields.
    pub fn for_field(name: &str) -> Option<GroupId> {
        match name {
            "currencies" | "weights" | "conversions" | "initialcontributions" | "minpreconversion" | "maxpreconversion" => {
                Some(GroupId::Fractional)
            }
            "blocktime" | "powaveragingwindow" | "notarizationperiod" | "eras" => Some(GroupId::PBaaS),
            "notaries" | "nodes" | "minnotariesconfirm" => Some(GroupId::Gateway),
            _ => None,
        }
    }
}

/// One `{identity, amount}` row of a plain token's preallocation list, as typed by the operator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PreallocationEntry {
    #[serde(default)]
    pub identity: String,
    #[serde(default)]
    pub amount: Value,
}

impl PreallocationEntry {
    pub fn new(identity: impl Into<String>, amount: impl Into<Value>) -> Self {
        Self { identity: identity.into(), amount: amount.into() }
    }
}

/// Loosely typed currency definition form state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencyDefinitionDraft {
    #[serde(alias = "options")]
    pub options_mask: u32,
    pub name: String,
    #[serde(default)]
    pub core_fields: BTreeMap<String, Value>,
    #[serde(default)]
    pub conditional_fields: BTreeMap<GroupId, BTreeMap<String, Value>>,
    /// Plain token preallocation rows.
    #[serde(default)]
    pub preallocations: Vec<PreallocationEntry>,
    /// Fractional/NFT preallocations as free-form JSON text.
    #[serde(default)]
    pub preallocations_json: String,
}

impl CurrencyDefinitionDraft {
    pub fn new(name: impl Into<String>, options: &OptionSelection) -> Self {
        Self { options_mask: options.mask(), name: name.into(), ..Default::default() }
    }

    pub fn projected(&self) -> ProjectedOptions {
        project_mask(self.options_mask)
    }

    /// Store a field under its conditional group, or with the core fields when it has none.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match GroupId::for_field(&name) {
            Some(group) => {
                self.conditional_fields.entry(group).or_default().insert(name, value);
            }
            None => {
                self.core_fields.insert(name, value);
            }
        }
    }

    pub fn set_group_field(&mut self, group: GroupId, name: impl Into<String>, value: impl Into<Value>) {
        self.conditional_fields.entry(group).or_default().insert(name.into(), value.into());
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn with_preallocation(mut self, identity: impl Into<String>, amount: impl Into<Value>) -> Self {
        self.preallocations.push(PreallocationEntry::new(identity, amount));
        self
    }

    pub fn with_preallocations_json(mut self, raw: impl Into<String>) -> Self {
        self.preallocations_json = raw.into();
        self
    }
}

/// Pre-flight check run before the daemon is asked to define the currency.
pub fn validate_draft(draft: &CurrencyDefinitionDraft) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(DeskError::missing_field("name"));
    }
    Ok(())
}
