//! Builds the single `definecurrency` parameter object from a draft.
//!
//! Applicability (is the field legal under the current options) and presence (did the operator
//! enter a usable value) are decided separately: a field is emitted only when both hold.
//! The assembler never fails; unusable optional input is dropped.

use crate::domain::currency::draft::{field_shape, CurrencyDefinitionDraft, FieldShape, PreallocationEntry, CORE_FIELDS, RESERVED_FIELDS};
use crate::domain::currency::options::{GroupId, ProjectedOptions};
use crate::foundation::util::json::{coerce_number, coerce_numeric_value, is_blank, parse_permissive};
use serde_json::{Map, Value};

/// Whether a core (non-grouped) field may appear under the projected options.
fn core_field_applies(name: &str, projected: &ProjectedOptions) -> bool {
    match name {
        "idregistrationfees" | "idreferrallevels" => projected.id_referrals,
        "notarizationreward" => projected.show_notarization_reward,
        _ => true,
    }
}

fn normalize(name: &str, value: Value) -> Value {
    match field_shape(name) {
        FieldShape::Number => match value {
            // "NaN" and "inf" parse as floats that JSON cannot carry.
            Value::String(s) if s.trim().parse::<f64>().is_ok_and(|n| !n.is_finite()) => Value::Null,
            other => coerce_numeric_value(other),
        },
        FieldShape::Text => match value {
            Value::String(s) => Value::String(s.trim().to_string()),
            other => other,
        },
        FieldShape::TextList => match value {
            Value::String(s) => split_list(&s).into_iter().map(Value::String).collect(),
            other => other,
        },
        FieldShape::NumberList => match value {
            Value::String(s) => split_list(&s).into_iter().map(|item| coerce_numeric_value(Value::String(item))).collect(),
            Value::Array(items) => items.into_iter().map(coerce_numeric_value).collect(),
            other => other,
        },
        FieldShape::Json => match value {
            Value::String(s) => parse_permissive(&s),
            other => other,
        },
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|item| !item.is_empty()).map(str::to_string).collect()
}

/// `[{identity: amount}, ...]` from operator rows, skipping incomplete or non-numeric rows.
fn token_preallocations(entries: &[PreallocationEntry]) -> Value {
    let rows = entries
        .iter()
        .filter_map(|entry| {
            let identity = entry.identity.trim();
            if identity.is_empty() {
                return None;
            }
            let amount = match &entry.amount {
                Value::Number(n) if n.as_f64().is_some_and(f64::is_finite) => n.clone(),
                Value::String(s) => coerce_number(s)?,
                _ => return None,
            };
            let mut row = Map::new();
            row.insert(identity.to_string(), Value::Number(amount));
            Some(Value::Object(row))
        })
        .collect::<Vec<_>>();
    if rows.is_empty() {
        Value::Null
    } else {
        Value::Array(rows)
    }
}

/// Known fields are gated by their own group regardless of where the draft filed them.
fn field_applies(name: &str, projected: &ProjectedOptions) -> bool {
    match GroupId::for_field(name) {
        Some(group) => projected.is_group_active(group),
        None => core_field_applies(name, projected),
    }
}

fn insert_field(payload: &mut Map<String, Value>, projected: &ProjectedOptions, name: &str, value: &Value) {
    if RESERVED_FIELDS.contains(&name) || !field_applies(name, projected) {
        return;
    }
    payload.insert(name.to_string(), normalize(name, value.clone()));
}

pub fn assemble_definition(draft: &CurrencyDefinitionDraft) -> Value {
    let projected = draft.projected();
    let mut payload = Map::new();
    payload.insert("options".to_string(), Value::from(projected.mask));
    payload.insert("name".to_string(), Value::String(draft.name.trim().to_string()));

    for name in CORE_FIELDS {
        if let Some(value) = draft.core_fields.get(*name) {
            insert_field(&mut payload, &projected, name, value);
        }
    }
    if payload.get("endblock").map_or(true, is_blank) {
        payload.insert("endblock".to_string(), Value::from(0));
    }
    for (name, value) in draft.core_fields.iter().filter(|(name, _)| !CORE_FIELDS.contains(&name.as_str())) {
        insert_field(&mut payload, &projected, name, value);
    }

    for (group, fields) in &draft.conditional_fields {
        if !projected.is_group_active(*group) {
            continue;
        }
        for (name, value) in fields {
            insert_field(&mut payload, &projected, name, value);
        }
    }

    if projected.is_plain_token() {
        payload.insert("preallocations".to_string(), token_preallocations(&draft.preallocations));
    } else if projected.is_fractional || projected.is_nft {
        payload.insert("preallocations".to_string(), parse_permissive(&draft.preallocations_json));
    }

    payload.retain(|_, value| !is_blank(value));
    Value::Object(payload)
}
