//! Configurable vendor-key overrides.
//!
//! Adapters know the standard key names of their vendor. Installations with
//! customized ERP schemas rename or add fields; a [`FieldMapper`] lets the
//! configuration point a normalized field at a different vendor key without
//! touching adapter code.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Wrapper kinds whose fields can be remapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Customer,
    Contact,
    ShippingLocation,
    Order,
    OrderDetail,
    Invoice,
    InvoiceDocument,
    Quotation,
    Warehouse,
    Product,
    Campaign,
}

impl Entity {
    pub const ALL: [Self; 11] = [
        Self::Customer,
        Self::Contact,
        Self::ShippingLocation,
        Self::Order,
        Self::OrderDetail,
        Self::Invoice,
        Self::InvoiceDocument,
        Self::Quotation,
        Self::Warehouse,
        Self::Product,
        Self::Campaign,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Contact => "contact",
            Self::ShippingLocation => "shipping_location",
            Self::Order => "order",
            Self::OrderDetail => "order_detail",
            Self::Invoice => "invoice",
            Self::InvoiceDocument => "invoice_document",
            Self::Quotation => "quotation",
            Self::Warehouse => "warehouse",
            Self::Product => "product",
            Self::Campaign => "campaign",
        }
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Entity {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|entity| entity.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownEntity {
                value: value.to_owned(),
            })
    }
}

/// Translates a normalized field name to a vendor key override.
pub trait FieldMapper: Send + Sync {
    /// Vendor key configured for `field` of `entity`, if any.
    fn override_for(&self, entity: Entity, field: &str) -> Option<&str>;

    fn has_custom_mappings(&self) -> bool;
}

/// Mapper without overrides; adapters use their built-in keys only.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFieldMapper;

impl FieldMapper for IdentityFieldMapper {
    fn override_for(&self, _entity: Entity, _field: &str) -> Option<&str> {
        None
    }

    fn has_custom_mappings(&self) -> bool {
        false
    }
}

/// `entity -> field -> vendor key` table as written in configuration.
///
/// ```toml
/// [field_mappings.customer]
/// email = "E_Mail_Address"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMappingConfig {
    pub entities: BTreeMap<String, BTreeMap<String, String>>,
}

impl FieldMappingConfig {
    pub fn is_empty(&self) -> bool {
        self.entities.values().all(BTreeMap::is_empty)
    }

    /// Checks entity names and rejects keys that cannot be vendor field names.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (entity, fields) in &self.entities {
            entity.parse::<Entity>()?;
            for (field, target) in fields {
                if !is_valid_field_name(field) || !is_valid_field_name(target) {
                    return Err(ValidationError::InvalidFieldMapping {
                        entity: entity.clone(),
                        field: field.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|ch| ch.is_whitespace() || ch.is_control() || matches!(ch, '{' | '}' | '$'))
}

/// Mapper backed by a validated [`FieldMappingConfig`].
#[derive(Debug, Clone, Default)]
pub struct ConfigurableFieldMapper {
    overrides: HashMap<(Entity, String), String>,
}

impl ConfigurableFieldMapper {
    pub fn new(config: &FieldMappingConfig) -> Result<Self, ValidationError> {
        config.validate()?;

        let mut overrides = HashMap::new();
        for (entity, fields) in &config.entities {
            let entity = entity.parse::<Entity>()?;
            for (field, target) in fields {
                overrides.insert((entity, field.clone()), target.clone());
            }
        }

        Ok(Self { overrides })
    }
}

impl FieldMapper for ConfigurableFieldMapper {
    fn override_for(&self, entity: Entity, field: &str) -> Option<&str> {
        self.overrides
            .get(&(entity, field.to_owned()))
            .map(String::as_str)
    }

    fn has_custom_mappings(&self) -> bool {
        !self.overrides.is_empty()
    }
}
