use serde::{Deserialize, Serialize};

use crate::{BusinessDate, Money, OrderDetail};

/// Normalized sales invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub number: Option<String>,
    pub customer_code: Option<String>,
    pub customer_name: Option<String>,
    pub invoice_date: Option<BusinessDate>,
    pub due_date: Option<BusinessDate>,
    pub order_number: Option<String>,
    pub reference: Option<String>,
    pub currency: Option<String>,
    pub total_excl_vat: Option<Money>,
    pub total_incl_vat: Option<Money>,
    pub open_amount: Option<Money>,
    pub paid: Option<bool>,
    pub details: Vec<OrderDetail>,
}

/// Decoded invoice file (usually a PDF).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    pub invoice_number: Option<String>,
    pub file_name: Option<String>,
    pub content_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub size: usize,
}

impl InvoiceDocument {
    pub fn new(
        invoice_number: Option<String>,
        file_name: Option<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            invoice_number,
            file_name,
            content_type: content_type.into(),
            size: bytes.len(),
            bytes,
        }
    }
}
