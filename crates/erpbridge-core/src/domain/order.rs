use std::fmt::{Display, Formatter};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BusinessDate, Money};

/// Lifecycle state derived from each vendor's status fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Open,
    Confirmed,
    PartiallyShipped,
    Shipped,
    Invoiced,
    Completed,
    Cancelled,
    #[default]
    Unknown,
}

impl OrderStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Confirmed => "confirmed",
            Self::PartiallyShipped => "partially_shipped",
            Self::Shipped => "shipped",
            Self::Invoiced => "invoiced",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commercial kind of an order document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Standard,
    Return,
    Credit,
    Blanket,
    Service,
    Quote,
    #[default]
    Unknown,
}

impl OrderType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Return => "return",
            Self::Credit => "credit",
            Self::Blanket => "blanket",
            Self::Service => "service",
            Self::Quote => "quote",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for OrderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized sales order header with its own lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub number: Option<String>,
    pub id: Option<String>,
    pub customer_code: Option<String>,
    pub customer_name: Option<String>,
    pub reference: Option<String>,
    pub order_date: Option<BusinessDate>,
    pub delivery_date: Option<BusinessDate>,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub currency: Option<String>,
    pub total_excl_vat: Option<Money>,
    pub total_incl_vat: Option<Money>,
    pub shipping_location_code: Option<String>,
    pub details: Vec<OrderDetail>,
}

/// Document line shared by orders, invoices and quotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetail {
    pub line_number: Option<i64>,
    pub product_code: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub unit_price: Option<Money>,
    pub discount_percent: Option<Decimal>,
    pub line_total: Option<Money>,
    pub quantity_delivered: Option<Decimal>,
    pub quantity_outstanding: Option<Decimal>,
    pub warehouse_code: Option<String>,
    pub delivery_date: Option<BusinessDate>,
    pub is_text_line: bool,
}

/// Outbound order to be rendered into a vendor request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_code: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub order_date: Option<BusinessDate>,
    #[serde(default)]
    pub delivery_date: Option<BusinessDate>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub shipping_location_code: Option<String>,
    #[serde(default)]
    pub lines: Vec<OrderDraftLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraftLine {
    pub product_code: String,
    pub quantity: Decimal,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    #[serde(default)]
    pub discount_percent: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub warehouse_code: Option<String>,
    #[serde(default)]
    pub delivery_date: Option<BusinessDate>,
}

/// Result of `create_order`, mapped from the vendor's response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub number: Option<String>,
    pub id: Option<String>,
    pub status: OrderStatus,
    pub total_incl_vat: Option<Money>,
    pub order: Option<Order>,
}
