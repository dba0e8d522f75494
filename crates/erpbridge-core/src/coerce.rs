//! Payload access and lenient type coercion.
//!
//! Vendor payloads arrive as `serde_json::Value`, either decoded from JSON or
//! converted from XML. A [`Record`] wraps one vendor object and resolves
//! normalized fields through the configured [`FieldMapper`] first, then the
//! adapter's aliases. Values that cannot be coerced read as `None`.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::domain::parse_ms_json_date;
use crate::field_map::{Entity, FieldMapper};
use crate::{parse_amount, BusinessDate, Money, UtcDateTime};

/// Keys XML decoders use for element text next to `@attributes`.
const TEXT_KEYS: [&str; 3] = ["@text", "#text", "$value"];
const ATTRIBUTES_KEY: &str = "@attributes";

/// Read-only view over one vendor object.
#[derive(Clone, Copy)]
pub struct Record<'a> {
    object: Option<&'a Map<String, Value>>,
    entity: Entity,
    mapper: &'a dyn FieldMapper,
}

impl std::fmt::Debug for Record<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("entity", &self.entity)
            .field("object", &self.object)
            .finish()
    }
}

impl<'a> Record<'a> {
    /// Non-object values produce a record where every field is absent.
    pub fn new(value: &'a Value, entity: Entity, mapper: &'a dyn FieldMapper) -> Self {
        Self {
            object: value.as_object(),
            entity,
            mapper,
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Same object viewed as another entity, for embedded sub-structures.
    pub fn as_entity(&self, entity: Entity) -> Self {
        Self { entity, ..*self }
    }

    pub fn is_empty(&self) -> bool {
        self.object.map_or(true, Map::is_empty)
    }

    /// True when `key` exists, even with a blank value.
    pub fn has_key(&self, key: &str) -> bool {
        self.object.is_some_and(|object| object.contains_key(key))
    }

    /// Candidate values for `field`: the configured override, then each alias.
    fn candidates<'s>(
        &'s self,
        field: &str,
        aliases: &'s [&'s str],
    ) -> impl Iterator<Item = &'a Value> + 's {
        let object = self.object;
        let override_key = self.mapper.override_for(self.entity, field);
        override_key
            .into_iter()
            .chain(aliases.iter().copied())
            .filter_map(move |key| object.and_then(|object| lookup_path(object, key)))
            .filter_map(scalar)
    }

    /// First present value for `field`, unwrapped from XML text nodes.
    pub fn raw(&self, field: &str, aliases: &[&str]) -> Option<&'a Value> {
        self.candidates(field, aliases).next()
    }

    pub fn text(&self, field: &str, aliases: &[&str]) -> Option<String> {
        self.candidates(field, aliases).find_map(as_text)
    }

    pub fn decimal(&self, field: &str, aliases: &[&str]) -> Option<Decimal> {
        self.candidates(field, aliases).find_map(as_decimal)
    }

    pub fn float(&self, field: &str, aliases: &[&str]) -> Option<f64> {
        self.candidates(field, aliases)
            .find_map(|value| match value {
                Value::Number(number) => number.as_f64(),
                _ => as_decimal(value).and_then(|decimal| decimal.to_f64()),
            })
    }

    pub fn integer(&self, field: &str, aliases: &[&str]) -> Option<i64> {
        self.candidates(field, aliases).find_map(as_integer)
    }

    pub fn flag(&self, field: &str, aliases: &[&str]) -> Option<bool> {
        self.candidates(field, aliases).find_map(as_flag)
    }

    /// Calendar date; NAV's `0001-01-01` reads as absent.
    pub fn date(&self, field: &str, aliases: &[&str]) -> Option<BusinessDate> {
        self.candidates(field, aliases).find_map(as_date)
    }

    pub fn timestamp(&self, field: &str, aliases: &[&str]) -> Option<UtcDateTime> {
        self.candidates(field, aliases).find_map(as_timestamp)
    }

    /// Amount in `currency`, unless the vendor string carries its own currency.
    pub fn money(&self, field: &str, aliases: &[&str], currency: &str) -> Option<Money> {
        self.candidates(field, aliases).find_map(|value| {
            let (amount, inline_currency) = match value {
                Value::String(text) => {
                    let parsed = parse_amount(text)?;
                    (parsed.amount, parsed.currency)
                }
                other => (as_decimal(other)?, None),
            };
            Money::new(amount, inline_currency.as_deref().unwrap_or(currency)).ok()
        })
    }

    /// Attribute of an XML-decoded element (`@attributes.<name>`).
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.object?
            .get(ATTRIBUTES_KEY)?
            .as_object()?
            .get(name)
            .and_then(as_text)
    }

    /// Nested object under the first matching key.
    pub fn child(&self, entity: Entity, aliases: &[&str]) -> Option<Record<'a>> {
        let object = self.object?;
        aliases
            .iter()
            .filter_map(|key| lookup_path(object, key))
            .find(|value| value.as_object().is_some_and(|map| !map.is_empty()))
            .map(|value| Record::new(value, entity, self.mapper))
    }

    /// Nested list under the first matching key, tolerating the shapes
    /// [`list_items`] accepts.
    pub fn children(&self, entity: Entity, aliases: &[&str]) -> Vec<Record<'a>> {
        let Some(object) = self.object else {
            return Vec::new();
        };
        aliases
            .iter()
            .filter_map(|key| lookup_path(object, key))
            .map(|value| list_items(value, &[]))
            .find(|items| !items.is_empty())
            .unwrap_or_default()
            .into_iter()
            .map(|value| Record::new(value, entity, self.mapper))
            .collect()
    }
}

/// Resolves `key`, or a `/`-separated path of keys, inside `object`.
fn lookup_path<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(value) = object.get(key) {
        return Some(value);
    }
    if !key.contains('/') {
        return None;
    }

    let mut segments = key.split('/');
    let first = segments.next()?;
    segments.try_fold(object.get(first)?, |current, segment| {
        current.as_object()?.get(segment)
    })
}

/// Unwraps XML text nodes and drops null or empty values.
fn scalar(value: &Value) -> Option<&Value> {
    match value {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) => match TEXT_KEYS.iter().find_map(|key| map.get(*key)) {
            Some(text) => scalar(text),
            None => Some(value),
        },
        other => Some(other),
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => {
            let text = number.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(text) => parse_amount(text).map(|parsed| parsed.amount),
        _ => None,
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0 && float.abs() < 9.0e15)
                .map(|float| float as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok().or_else(|| {
            parse_amount(text)
                .map(|parsed| parsed.amount)
                .filter(|decimal| decimal.fract().is_zero())
                .and_then(|decimal| decimal.to_i64())
        }),
        _ => None,
    }
}

/// Flag spellings: `true/false`, `1/0`, `Y/N`, `yes/no`, `J/N`, `tYES/tNO`.
pub fn parse_flag(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "y" | "yes" | "j" | "ja" | "tyes" => Some(true),
        "false" | "0" | "n" | "no" | "nee" | "nein" | "tno" => Some(false),
        _ => None,
    }
}

fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(text) => parse_flag(text),
        _ => None,
    }
}

fn as_date(value: &Value) -> Option<BusinessDate> {
    let text = value.as_str()?;
    BusinessDate::parse(text)
        .ok()
        .filter(|date| !date.is_placeholder())
}

/// Timestamps: RFC3339 with any offset, offset-less date-times read as UTC,
/// `/Date(ms)/`, unix milliseconds, or a bare date at midnight UTC. Year-one
/// values are "no date" placeholders.
fn as_timestamp(value: &Value) -> Option<UtcDateTime> {
    parse_timestamp(value).filter(|timestamp| timestamp.into_inner().year() > 1)
}

fn parse_timestamp(value: &Value) -> Option<UtcDateTime> {
    match value {
        Value::Number(number) => number.as_i64().and_then(UtcDateTime::from_unix_millis),
        Value::String(text) => {
            let trimmed = text.trim();
            if let Some(millis) = parse_ms_json_date(trimmed) {
                return UtcDateTime::from_unix_millis(millis);
            }
            if let Ok(parsed) = UtcDateTime::parse_normalized(trimmed) {
                return Some(parsed);
            }
            if trimmed.len() > 10 && trimmed.as_bytes().get(10) == Some(&b'T') {
                if let Ok(parsed) = UtcDateTime::parse_normalized(&format!("{trimmed}Z")) {
                    return Some(parsed);
                }
            }
            let date = BusinessDate::parse(trimmed).ok()?;
            let midnight = date.into_inner().midnight().assume_utc();
            UtcDateTime::from_offset_datetime(midnight).ok()
        }
        _ => None,
    }
}

/// Locates the item list inside a collection envelope.
///
/// `path` names the keys of an XML-decoded `Root.Item` structure; it may be
/// empty. Without a path, OData v4 `value`, OData v2 `d.results` / `d`, bare
/// arrays and bare single objects are recognized. A single XML child that
/// arrives as an object instead of an array is one item. Entries that are not
/// objects are skipped.
pub fn list_items<'a>(value: &'a Value, path: &[&str]) -> Vec<&'a Value> {
    let mut current = value;
    for key in path {
        match current.as_object().and_then(|object| object.get(*key)) {
            Some(next) => current = next,
            None if current.is_array() => break,
            None => return Vec::new(),
        }
    }

    let located = if path.is_empty() {
        unwrap_envelope(current)
    } else {
        Some(current)
    };

    match located {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| {
                let is_object = item.is_object();
                if !is_object && !item.is_null() {
                    tracing::warn!(entry = %item, "skipping list entry that is not an object");
                }
                is_object
            })
            .collect(),
        Some(item) if item.as_object().is_some_and(|map| !map.is_empty()) => vec![item],
        _ => Vec::new(),
    }
}

fn unwrap_envelope(value: &Value) -> Option<&Value> {
    let object = match value {
        Value::Object(object) => object,
        Value::Array(_) => return Some(value),
        _ => return None,
    };

    // Unexpanded OData v2 navigation property.
    if object.contains_key("__deferred") {
        return None;
    }
    if let Some(items) = object.get("value").filter(|items| items.is_array()) {
        return Some(items);
    }
    if let Some(data) = object.get("d") {
        if let Some(results) = data.get("results") {
            return Some(results);
        }
        return Some(data);
    }
    if let Some(results) = object.get("results").filter(|items| items.is_array()) {
        return Some(results);
    }
    Some(value)
}

/// Total count reported in the envelope (`@odata.count`, `__count`, ...).
pub fn count_hint(value: &Value, keys: &[&str]) -> Option<u64> {
    envelope_scalars(value, keys).find_map(|value| match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

/// Continuation link reported in the envelope (`@odata.nextLink`, `__next`, ...).
pub fn next_link(value: &Value, keys: &[&str]) -> Option<String> {
    envelope_scalars(value, keys).find_map(as_text)
}

fn envelope_scalars<'a>(
    value: &'a Value,
    keys: &'a [&'a str],
) -> impl Iterator<Item = &'a Value> + 'a {
    let top = value.as_object();
    let nested = value.get("d").and_then(Value::as_object);
    let attributes = value
        .as_object()
        .and_then(|object| object.values().find_map(|root| root.get(ATTRIBUTES_KEY)))
        .and_then(Value::as_object);

    keys.iter().filter_map(move |key| {
        [top, nested, attributes]
            .into_iter()
            .flatten()
            .find_map(|object| lookup_path(object, key))
            .and_then(scalar)
    })
}
