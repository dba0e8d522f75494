use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field_map::{FieldMapper, IdentityFieldMapper};
use crate::{
    Campaign, Collection, Contact, Customer, ErpId, Invoice, InvoiceDocument, Order,
    OrderConfirmation, OrderDraft, ProductPriceAvailability, ProductSync, Quotation,
    ShippingLocation, ValidationError, Warehouse,
};

/// Operation exposed by every ERP adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    GetCustomerList,
    GetCustomer,
    GetContactList,
    GetShippingLocations,
    GetOrderList,
    GetOrderDetail,
    BuildOrderRequest,
    CreateOrder,
    GetInvoiceList,
    GetInvoiceDetail,
    GetInvoiceDocument,
    GetQuotationList,
    GetQuotationDetail,
    GetWarehouseList,
    GetProductPriceAvailability,
    GetProductSync,
    GetCampaignList,
}

impl Operation {
    pub const ALL: [Self; 17] = [
        Self::GetCustomerList,
        Self::GetCustomer,
        Self::GetContactList,
        Self::GetShippingLocations,
        Self::GetOrderList,
        Self::GetOrderDetail,
        Self::BuildOrderRequest,
        Self::CreateOrder,
        Self::GetInvoiceList,
        Self::GetInvoiceDetail,
        Self::GetInvoiceDocument,
        Self::GetQuotationList,
        Self::GetQuotationDetail,
        Self::GetWarehouseList,
        Self::GetProductPriceAvailability,
        Self::GetProductSync,
        Self::GetCampaignList,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetCustomerList => "get_customer_list",
            Self::GetCustomer => "get_customer",
            Self::GetContactList => "get_contact_list",
            Self::GetShippingLocations => "get_shipping_locations",
            Self::GetOrderList => "get_order_list",
            Self::GetOrderDetail => "get_order_detail",
            Self::BuildOrderRequest => "build_order_request",
            Self::CreateOrder => "create_order",
            Self::GetInvoiceList => "get_invoice_list",
            Self::GetInvoiceDetail => "get_invoice_detail",
            Self::GetInvoiceDocument => "get_invoice_document",
            Self::GetQuotationList => "get_quotation_list",
            Self::GetQuotationDetail => "get_quotation_detail",
            Self::GetWarehouseList => "get_warehouse_list",
            Self::GetProductPriceAvailability => "get_product_price_availability",
            Self::GetProductSync => "get_product_sync",
            Self::GetCampaignList => "get_campaign_list",
        }
    }

    /// camelCase spelling used by older integrations.
    pub const fn alias(self) -> &'static str {
        match self {
            Self::GetCustomerList => "getCustomerList",
            Self::GetCustomer => "getCustomer",
            Self::GetContactList => "getContactList",
            Self::GetShippingLocations => "getShippingLocations",
            Self::GetOrderList => "getOrderList",
            Self::GetOrderDetail => "getOrderDetail",
            Self::BuildOrderRequest => "buildOrderRequest",
            Self::CreateOrder => "createOrder",
            Self::GetInvoiceList => "getInvoiceList",
            Self::GetInvoiceDetail => "getInvoiceDetail",
            Self::GetInvoiceDocument => "getInvoiceDocument",
            Self::GetQuotationList => "getQuotationList",
            Self::GetQuotationDetail => "getQuotationDetail",
            Self::GetWarehouseList => "getWarehouseList",
            Self::GetProductPriceAvailability => "getProductPriceAvailability",
            Self::GetProductSync => "getProductSync",
            Self::GetCampaignList => "getCampaignList",
        }
    }

    /// Operations that return a [`Collection`].
    pub const fn is_list(self) -> bool {
        matches!(
            self,
            Self::GetCustomerList
                | Self::GetContactList
                | Self::GetShippingLocations
                | Self::GetOrderList
                | Self::GetInvoiceList
                | Self::GetQuotationList
                | Self::GetWarehouseList
                | Self::GetProductPriceAvailability
                | Self::GetProductSync
                | Self::GetCampaignList
        )
    }

    /// Operations whose endpoint needs a record key (customer code, order number, ...).
    pub const fn requires_key(self) -> bool {
        matches!(
            self,
            Self::GetCustomer
                | Self::GetContactList
                | Self::GetShippingLocations
                | Self::GetOrderDetail
                | Self::GetInvoiceDetail
                | Self::GetInvoiceDocument
                | Self::GetQuotationDetail
        )
    }

    const fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|operation| {
                operation.as_str() == trimmed
                    || operation.alias() == trimmed
                    || operation.as_str().replace('_', "-") == trimmed
            })
            .ok_or_else(|| ValidationError::InvalidOperation {
                value: value.to_owned(),
            })
    }
}

/// Operations an adapter supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilitySet {
    bits: u32,
}

impl CapabilitySet {
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    pub const fn full() -> Self {
        let mut bits = 0;
        let mut index = 0;
        while index < Operation::ALL.len() {
            bits |= Operation::ALL[index].bit();
            index += 1;
        }
        Self { bits }
    }

    pub const fn with(self, operation: Operation) -> Self {
        Self {
            bits: self.bits | operation.bit(),
        }
    }

    pub const fn without(self, operation: Operation) -> Self {
        Self {
            bits: self.bits & !operation.bit(),
        }
    }

    pub const fn supports(self, operation: Operation) -> bool {
        self.bits & operation.bit() != 0
    }

    pub fn supported_operations(self) -> Vec<&'static str> {
        Operation::ALL
            .into_iter()
            .filter(|operation| self.supports(*operation))
            .map(Operation::as_str)
            .collect()
    }
}

impl Serialize for CapabilitySet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.supported_operations().serialize(serializer)
    }
}

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErpErrorKind {
    UnsupportedOperation,
    MalformedPayload,
    InvalidDocument,
    Configuration,
    Transport,
    Internal,
}

/// Structured adapter error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErpError {
    kind: ErpErrorKind,
    message: String,
    retryable: bool,
}

impl ErpError {
    pub fn unsupported_operation(adapter: ErpId, operation: Operation) -> Self {
        Self {
            kind: ErpErrorKind::UnsupportedOperation,
            message: format!("operation '{operation}' is not supported by adapter '{adapter}'"),
            retryable: false,
        }
    }

    pub fn malformed_payload(message: impl Into<String>) -> Self {
        Self {
            kind: ErpErrorKind::MalformedPayload,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self {
            kind: ErpErrorKind::InvalidDocument,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self {
            kind: ErpErrorKind::Configuration,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn transport(message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind: ErpErrorKind::Transport,
            message: message.into(),
            retryable,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ErpErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> ErpErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ErpErrorKind::UnsupportedOperation => "erp.unsupported_operation",
            ErpErrorKind::MalformedPayload => "erp.malformed_payload",
            ErpErrorKind::InvalidDocument => "erp.invalid_document",
            ErpErrorKind::Configuration => "erp.configuration",
            ErpErrorKind::Transport => "erp.transport",
            ErpErrorKind::Internal => "erp.internal",
        }
    }
}

impl Display for ErpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ErpError {}

impl From<ValidationError> for ErpError {
    fn from(error: ValidationError) -> Self {
        Self::configuration(error.to_string())
    }
}

/// Per-installation settings every adapter reads.
#[derive(Clone)]
pub struct AdapterSettings {
    /// Currency for amounts the vendor leaves unqualified.
    pub default_currency: String,
    /// SAP B1 price list number.
    pub price_list: u32,
    pub field_mapper: Arc<dyn FieldMapper>,
}

impl AdapterSettings {
    pub fn new(
        default_currency: impl AsRef<str>,
        price_list: u32,
        field_mapper: Arc<dyn FieldMapper>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            default_currency: crate::validate_currency_code(default_currency.as_ref())?,
            price_list,
            field_mapper,
        })
    }
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            default_currency: String::from("EUR"),
            price_list: 1,
            field_mapper: Arc::new(IdentityFieldMapper),
        }
    }
}

impl std::fmt::Debug for AdapterSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterSettings")
            .field("default_currency", &self.default_currency)
            .field("price_list", &self.price_list)
            .field(
                "custom_field_mappings",
                &self.field_mapper.has_custom_mappings(),
            )
            .finish()
    }
}

/// ERP vendor mapping contract.
///
/// Every method receives the decoded vendor response for one call. Methods an
/// adapter does not override report `UnsupportedOperation`.
pub trait ErpAdapter: Send + Sync {
    fn id(&self) -> ErpId;
    fn capabilities(&self) -> CapabilitySet;

    /// Vendor-relative path for `operation`; `key` identifies the record.
    fn endpoint(&self, operation: Operation, key: Option<&str>) -> Result<String, ErpError>;

    fn get_customer_list(&self, payload: &Value) -> Result<Collection<Customer>, ErpError> {
        let _ = payload;
        Err(ErpError::unsupported_operation(self.id(), Operation::GetCustomerList))
    }

    fn get_customer(&self, payload: &Value) -> Result<Customer, ErpError> {
        let _ = payload;
        Err(ErpError::unsupported_operation(self.id(), Operation::GetCustomer))
    }

    fn get_contact_list(&self, payload: &Value) -> Result<Collection<Contact>, ErpError> {
        let _ = payload;
        Err(ErpError::unsupported_operation(self.id(), Operation::GetContactList))
    }

    fn get_shipping_locations(
        &self,
        payload: &Value,
    ) -> Result<Collection<ShippingLocation>, ErpError> {
        let _ = payload;
        Err(ErpError::unsupported_operation(self.id(), Operation::GetShippingLocations))
    }

    fn get_order_list(&self, payload: &Value) -> Result<Collection<Order>, ErpError> {
        let _ = payload;
        Err(ErpError::unsupported_operation(self.id(), Operation::GetOrderList))
    }

    fn get_order_detail(&self, payload: &Value) -> Result<Order, ErpError> {
        let _ = payload;
        Err(ErpError::unsupported_operation(self.id(), Operation::GetOrderDetail))
    }

    /// Renders the vendor request body for a new order.
    fn build_order_request(&self, draft: &OrderDraft) -> Result<Value, ErpError> {
        let _ = draft;
        Err(ErpError::unsupported_operation(self.id(), Operation::BuildOrderRequest))
    }

    /// Maps the vendor response to an order creation.
    fn create_order(&self, payload: &Value) -> Result<OrderConfirmation, ErpError> {
        let _ = payload;
        Err(ErpError::unsupported_operation(self.id(), Operation::CreateOrder))
    }

    fn get_invoice_list(&self, payload: &Value) -> Result<Collection<Invoice>, ErpError> {
        let _ = payload;
        Err(ErpError::unsupported_operation(self.id(), Operation::GetInvoiceList))
    }

    fn get_invoice_detail(&self, payload: &Value) -> Result<Invoice, ErpError> {
        let _ = payload;
        Err(ErpError::unsupported_operation(self.id(), Operation::GetInvoiceDetail))
    }

    fn get_invoice_document(&self, payload: &Value) -> Result<InvoiceDocument, ErpError> {
        let _ = payload;
        Err(ErpError::unsupported_operation(self.id(), Operation::GetInvoiceDocument))
    }

    fn get_quotation_list(&self, payload: &Value) -> Result<Collection<Quotation>, ErpError> {
        let _ = payload;
        Err(ErpError::unsupported_operation(self.id(), Operation::GetQuotationList))
    }

    fn get_quotation_detail(&self, payload: &Value) -> Result<Quotation, ErpError> {
        let _ = payload;
        Err(ErpError::unsupported_operation(self.id(), Operation::GetQuotationDetail))
    }

    fn get_warehouse_list(&self, payload: &Value) -> Result<Collection<Warehouse>, ErpError> {
        let _ = payload;
        Err(ErpError::unsupported_operation(self.id(), Operation::GetWarehouseList))
    }

    fn get_product_price_availability(
        &self,
        payload: &Value,
    ) -> Result<Collection<ProductPriceAvailability>, ErpError> {
        let _ = payload;
        Err(ErpError::unsupported_operation(
            self.id(),
            Operation::GetProductPriceAvailability,
        ))
    }

    fn get_product_sync(&self, payload: &Value) -> Result<Collection<ProductSync>, ErpError> {
        let _ = payload;
        Err(ErpError::unsupported_operation(self.id(), Operation::GetProductSync))
    }

    fn get_campaign_list(&self, payload: &Value) -> Result<Collection<Campaign>, ErpError> {
        let _ = payload;
        Err(ErpError::unsupported_operation(self.id(), Operation::GetCampaignList))
    }
}

/// Runs `operation` by name and serializes the normalized result.
///
/// For [`Operation::BuildOrderRequest`] the payload is an [`OrderDraft`].
pub fn dispatch(
    adapter: &dyn ErpAdapter,
    operation: Operation,
    payload: &Value,
) -> Result<Value, ErpError> {
    let result = match operation {
        Operation::GetCustomerList => to_value(adapter.get_customer_list(payload)?),
        Operation::GetCustomer => to_value(adapter.get_customer(payload)?),
        Operation::GetContactList => to_value(adapter.get_contact_list(payload)?),
        Operation::GetShippingLocations => to_value(adapter.get_shipping_locations(payload)?),
        Operation::GetOrderList => to_value(adapter.get_order_list(payload)?),
        Operation::GetOrderDetail => to_value(adapter.get_order_detail(payload)?),
        Operation::BuildOrderRequest => {
            let draft: OrderDraft = serde_json::from_value(payload.clone()).map_err(|error| {
                ErpError::malformed_payload(format!("order draft is not valid: {error}"))
            })?;
            adapter.build_order_request(&draft)
        }
        Operation::CreateOrder => to_value(adapter.create_order(payload)?),
        Operation::GetInvoiceList => to_value(adapter.get_invoice_list(payload)?),
        Operation::GetInvoiceDetail => to_value(adapter.get_invoice_detail(payload)?),
        Operation::GetInvoiceDocument => to_value(adapter.get_invoice_document(payload)?),
        Operation::GetQuotationList => to_value(adapter.get_quotation_list(payload)?),
        Operation::GetQuotationDetail => to_value(adapter.get_quotation_detail(payload)?),
        Operation::GetWarehouseList => to_value(adapter.get_warehouse_list(payload)?),
        Operation::GetProductPriceAvailability => {
            to_value(adapter.get_product_price_availability(payload)?)
        }
        Operation::GetProductSync => to_value(adapter.get_product_sync(payload)?),
        Operation::GetCampaignList => to_value(adapter.get_campaign_list(payload)?),
    }?;

    let items = result.get("items").and_then(Value::as_array).map(Vec::len);
    tracing::debug!(
        adapter = %adapter.id(),
        operation = %operation,
        items = ?items,
        "mapped vendor payload"
    );

    Ok(result)
}

fn to_value<T: Serialize>(value: T) -> Result<Value, ErpError> {
    serde_json::to_value(value)
        .map_err(|error| ErpError::internal(format!("failed to serialize result: {error}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_parses_snake_case_and_alias() {
        assert_eq!(
            "get_order_detail".parse::<Operation>().expect("snake"),
            Operation::GetOrderDetail
        );
        assert_eq!(
            "getOrderDetail".parse::<Operation>().expect("alias"),
            Operation::GetOrderDetail
        );
        assert_eq!(
            "get-product-sync".parse::<Operation>().expect("kebab"),
            Operation::GetProductSync
        );
        assert!("getLedger".parse::<Operation>().is_err());
    }

    #[test]
    fn capability_set_tracks_each_operation() {
        let caps = CapabilitySet::full().without(Operation::GetCampaignList);
        assert!(caps.supports(Operation::GetCustomerList));
        assert!(!caps.supports(Operation::GetCampaignList));
        assert_eq!(caps.supported_operations().len(), Operation::ALL.len() - 1);

        let only = CapabilitySet::none().with(Operation::CreateOrder);
        assert_eq!(only.supported_operations(), vec!["create_order"]);
    }

    #[test]
    fn error_codes_and_retryability() {
        let err = ErpError::unsupported_operation(ErpId::Exact, Operation::GetCampaignList);
        assert_eq!(err.code(), "erp.unsupported_operation");
        assert!(!err.retryable());
        assert!(err.message().contains("exact"));

        let transport = ErpError::transport("503 from upstream", true);
        assert_eq!(transport.kind(), ErpErrorKind::Transport);
        assert!(transport.retryable());
    }

    #[test]
    fn validation_error_becomes_configuration_error() {
        let err: ErpError = ValidationError::InvalidAdapter {
            value: String::from("oracle"),
        }
        .into();
        assert_eq!(err.kind(), ErpErrorKind::Configuration);
    }

    #[test]
    fn dispatch_serializes_collections() {
        let adapter = crate::adapters::NavisionAdapter::default();
        let payload = serde_json::json!({
            "@odata.count": 2,
            "value": [{"Code": "BLUE"}, {"Code": "RED"}]
        });

        let result = dispatch(&adapter, Operation::GetWarehouseList, &payload)
            .expect("warehouse list");

        assert_eq!(result["items"].as_array().map(Vec::len), Some(2));
        assert_eq!(result["items"][1]["code"], "RED");
        assert_eq!(result["total_count"], 2);
    }
}
