use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, BusinessDate, Money, UtcDateTime};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub code: Option<String>,
    pub name: Option<String>,
    pub address: Address,
    pub is_default: Option<bool>,
    pub active: Option<bool>,
}

/// Price and stock position of one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPriceAvailability {
    pub product_code: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub unit_price: Option<Money>,
    pub quantity_available: Option<Decimal>,
    pub quantity_on_order: Option<Decimal>,
    pub next_delivery_date: Option<BusinessDate>,
}

/// Product master data for catalogue synchronization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductSync {
    pub code: Option<String>,
    pub description: Option<String>,
    pub description_2: Option<String>,
    pub unit: Option<String>,
    pub unit_price: Option<Money>,
    pub product_group: Option<String>,
    pub ean: Option<String>,
    pub blocked: Option<bool>,
    pub weight: Option<f64>,
    pub vendor_code: Option<String>,
    pub modified_at: Option<UtcDateTime>,
}
