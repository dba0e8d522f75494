use serde::{Deserialize, Serialize};

use crate::BusinessDate;

/// Sales campaign / promotion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub starts_on: Option<BusinessDate>,
    pub ends_on: Option<BusinessDate>,
    pub active: Option<bool>,
}
