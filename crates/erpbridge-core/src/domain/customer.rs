use serde::{Deserialize, Serialize};

use crate::Money;

/// Postal address as it appears on customers, shipping locations and warehouses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub street_2: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.street_2.is_none()
            && self.postal_code.is_none()
            && self.city.is_none()
            && self.country.is_none()
    }
}

/// Normalized customer (debtor / business partner) record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub code: Option<String>,
    pub name: Option<String>,
    pub name_2: Option<String>,
    pub address: Address,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub vat_number: Option<String>,
    pub currency: Option<String>,
    pub credit_limit: Option<Money>,
    pub balance: Option<Money>,
    pub blocked: Option<bool>,
    pub payment_terms: Option<String>,
    pub salesperson: Option<String>,
    pub shipping_locations: Vec<ShippingLocation>,
    pub contacts: Vec<Contact>,
}

/// Contact person attached to a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub code: Option<String>,
    pub customer_code: Option<String>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub job_title: Option<String>,
}

/// Ship-to address of a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingLocation {
    pub code: Option<String>,
    pub customer_code: Option<String>,
    pub name: Option<String>,
    pub address: Address,
    pub phone: Option<String>,
    pub is_default: Option<bool>,
}
