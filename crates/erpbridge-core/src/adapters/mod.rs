mod exact;
mod navision;
mod sap_b1;
mod visma;

pub use exact::ExactAdapter;
pub use navision::NavisionAdapter;
pub use sap_b1::SapB1Adapter;
pub use visma::VismaAdapter;

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::adapter::{AdapterSettings, ErpAdapter, ErpError, Operation};
use crate::coerce::{list_items, Record};
use crate::field_map::Entity;
use crate::{validate_currency_code, ErpId, OrderDraft};

/// Instantiates the adapter registered for `id`.
pub fn adapter_for(id: ErpId, settings: AdapterSettings) -> Arc<dyn ErpAdapter> {
    match id {
        ErpId::Navision => Arc::new(NavisionAdapter::new(settings)),
        ErpId::SapB1 => Arc::new(SapB1Adapter::new(settings)),
        ErpId::Exact => Arc::new(ExactAdapter::new(settings)),
        ErpId::Visma => Arc::new(VismaAdapter::new(settings)),
    }
}

/// Maps every item of a collection envelope.
pub(crate) fn map_items<'a, T>(
    payload: &'a Value,
    path: &[&str],
    entity: Entity,
    settings: &'a AdapterSettings,
    map: impl Fn(&Record<'a>) -> T,
) -> Vec<T> {
    list_items(payload, path)
        .into_iter()
        .map(|item| map(&Record::new(item, entity, settings.field_mapper.as_ref())))
        .collect()
}

/// Single record of a detail response, unwrapped from its envelope.
pub(crate) fn detail_record<'a>(
    payload: &'a Value,
    path: &[&str],
    entity: Entity,
    settings: &'a AdapterSettings,
) -> Record<'a> {
    let item = list_items(payload, path).into_iter().next().unwrap_or(payload);
    Record::new(item, entity, settings.field_mapper.as_ref())
}

/// Record currency; blank, `##` or malformed codes fall back to the default.
pub(crate) fn resolve_currency(
    record: &Record<'_>,
    aliases: &[&str],
    settings: &AdapterSettings,
) -> String {
    record
        .text("currency", aliases)
        .filter(|code| code != "##")
        .and_then(|code| validate_currency_code(&code).ok())
        .unwrap_or_else(|| settings.default_currency.clone())
}

pub(crate) fn ensure_draft_lines(draft: &OrderDraft) -> Result<(), ErpError> {
    if draft.customer_code.trim().is_empty() {
        return Err(ErpError::malformed_payload(
            "order draft must name a customer",
        ));
    }
    if draft.lines.is_empty() {
        return Err(ErpError::malformed_payload(
            "order draft must contain at least one line",
        ));
    }
    Ok(())
}

pub(crate) fn require_key(operation: Operation, key: Option<&str>) -> Result<&str, ErpError> {
    key.map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            ErpError::malformed_payload(format!("operation '{operation}' requires a record key"))
        })
}

/// OData string literal for a key predicate or filter, URL-encoded.
pub(crate) fn odata_literal(key: &str) -> String {
    urlencoding::encode(&format!("'{}'", key.replace('\'', "''"))).into_owned()
}

/// JSON number for an outbound decimal. Values an `f64` cannot carry exactly
/// go out as decimal strings.
pub(crate) fn number(value: Decimal) -> Value {
    let normalized = value.normalize();
    if normalized.fract().is_zero() {
        if let Some(integer) = normalized.to_i64() {
            return Value::from(integer);
        }
    }
    normalized
        .to_f64()
        .filter(|float| {
            Decimal::from_str(&float.to_string()).is_ok_and(|exact| exact == normalized)
        })
        .and_then(serde_json::Number::from_f64)
        .map_or_else(|| Value::String(normalized.to_string()), Value::Number)
}

/// Inserts `value` under `key` when present.
pub(crate) fn put(object: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        object.insert(key.to_owned(), value);
    }
}
