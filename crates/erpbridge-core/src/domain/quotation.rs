use serde::{Deserialize, Serialize};

use crate::{BusinessDate, Money, OrderDetail};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    Draft,
    Open,
    Accepted,
    Rejected,
    Expired,
    #[default]
    Unknown,
}

/// Normalized sales quotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quotation {
    pub number: Option<String>,
    pub customer_code: Option<String>,
    pub customer_name: Option<String>,
    pub quotation_date: Option<BusinessDate>,
    pub valid_until: Option<BusinessDate>,
    pub status: QuotationStatus,
    pub currency: Option<String>,
    pub total_excl_vat: Option<Money>,
    pub total_incl_vat: Option<Money>,
    pub details: Vec<OrderDetail>,
}
