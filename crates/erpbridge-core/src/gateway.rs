//! HTTP gateway: fetches vendor payloads and maps them through the adapter.
//!
//! One request per call. Failures are classified as [`ErpErrorKind::Transport`]
//! and then settled by the configured [`ErrorPolicy`]. Only the warehouse list
//! is cached.
//!
//! [`ErpErrorKind::Transport`]: crate::adapter::ErpErrorKind::Transport

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::adapter::{dispatch, ErpAdapter, ErpError, Operation};
use crate::cache::TtlCache;
use crate::config::{ErpConfig, ErrorPolicy};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};
use crate::{
    Campaign, Collection, Contact, Customer, Invoice, InvoiceDocument, Order, OrderConfirmation,
    OrderDraft, ProductPriceAvailability, ProductSync, Quotation, ShippingLocation, Warehouse,
};

pub struct ErpGateway {
    config: ErpConfig,
    adapter: Arc<dyn ErpAdapter>,
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    cache: TtlCache,
}

impl std::fmt::Debug for ErpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErpGateway")
            .field("adapter", &self.adapter.id())
            .field("base_url", &self.config.base_url)
            .field("error_policy", &self.config.error_policy)
            .field("auth", &self.auth)
            .finish()
    }
}

impl ErpGateway {
    /// Validates `config`, selects its adapter and resolves credentials from
    /// the environment.
    pub fn new(config: ErpConfig, http_client: Arc<dyn HttpClient>) -> Result<Self, ErpError> {
        config.validate()?;
        let adapter = config.build_adapter()?;
        let auth = config.auth.resolve()?;
        let cache = match config.cache_ttl_secs {
            0 => TtlCache::disabled(),
            secs => TtlCache::new(Duration::from_secs(secs)),
        };

        Ok(Self {
            config,
            adapter,
            http_client,
            auth,
            cache,
        })
    }

    /// Replaces the credentials resolved at construction.
    pub fn with_auth(mut self, auth: HttpAuth) -> Self {
        self.auth = auth;
        self
    }

    pub fn config(&self) -> &ErpConfig {
        &self.config
    }

    pub fn adapter(&self) -> &dyn ErpAdapter {
        self.adapter.as_ref()
    }

    /// Absolute URL for `operation`.
    pub fn url_for(&self, operation: Operation, key: Option<&str>) -> Result<String, ErpError> {
        let base = self.config.base_url.trim_end_matches('/');
        if base.is_empty() {
            return Err(ErpError::configuration("base_url is not configured"));
        }
        let path = self.adapter.endpoint(operation, key)?;
        Ok(format!("{base}/{}", path.trim_start_matches('/')))
    }

    /// Fetches and decodes the raw vendor payload for a read operation.
    #[instrument(skip(self), fields(adapter = %self.adapter.id()))]
    pub async fn fetch(&self, operation: Operation, key: Option<&str>) -> Result<Value, ErpError> {
        self.ensure_supported(operation)?;
        let url = self.url_for(operation, key)?;
        let body = self.execute(HttpRequest::get(url)).await?;
        decode_body(&body)
    }

    /// Runs a read operation by name and returns the serialized wrapper.
    #[instrument(skip(self), fields(adapter = %self.adapter.id()))]
    pub async fn run(
        &self,
        operation: Operation,
        key: Option<&str>,
    ) -> Result<Option<Value>, ErpError> {
        let result = match operation {
            Operation::BuildOrderRequest | Operation::CreateOrder => {
                Err(ErpError::malformed_payload(format!(
                    "operation '{operation}' needs an order draft"
                )))
            }
            Operation::GetWarehouseList => self.fetch_cached(operation).await,
            _ => self.fetch(operation, key).await,
        };
        let result = result.and_then(|payload| dispatch(self.adapter.as_ref(), operation, &payload));
        self.settle(operation, result)
    }

    pub async fn customer_list(&self) -> Result<Option<Collection<Customer>>, ErpError> {
        self.read(Operation::GetCustomerList, None, |adapter, payload| {
            adapter.get_customer_list(payload)
        })
        .await
    }

    pub async fn customer(&self, code: &str) -> Result<Option<Customer>, ErpError> {
        self.read(Operation::GetCustomer, Some(code), |adapter, payload| {
            adapter.get_customer(payload)
        })
        .await
    }

    pub async fn contact_list(
        &self,
        customer_code: &str,
    ) -> Result<Option<Collection<Contact>>, ErpError> {
        self.read(Operation::GetContactList, Some(customer_code), |adapter, payload| {
            adapter.get_contact_list(payload)
        })
        .await
    }

    pub async fn shipping_locations(
        &self,
        customer_code: &str,
    ) -> Result<Option<Collection<ShippingLocation>>, ErpError> {
        self.read(
            Operation::GetShippingLocations,
            Some(customer_code),
            |adapter, payload| adapter.get_shipping_locations(payload),
        )
        .await
    }

    pub async fn order_list(&self) -> Result<Option<Collection<Order>>, ErpError> {
        self.read(Operation::GetOrderList, None, |adapter, payload| {
            adapter.get_order_list(payload)
        })
        .await
    }

    pub async fn order_detail(&self, number: &str) -> Result<Option<Order>, ErpError> {
        self.read(Operation::GetOrderDetail, Some(number), |adapter, payload| {
            adapter.get_order_detail(payload)
        })
        .await
    }

    /// Renders the draft for the vendor, posts it and maps the response.
    #[instrument(skip(self, draft), fields(adapter = %self.adapter.id(), customer = %draft.customer_code))]
    pub async fn create_order(
        &self,
        draft: &OrderDraft,
    ) -> Result<Option<OrderConfirmation>, ErpError> {
        let result = self.post_order(draft).await;
        self.settle(Operation::CreateOrder, result)
    }

    pub async fn invoice_list(&self) -> Result<Option<Collection<Invoice>>, ErpError> {
        self.read(Operation::GetInvoiceList, None, |adapter, payload| {
            adapter.get_invoice_list(payload)
        })
        .await
    }

    pub async fn invoice_detail(&self, number: &str) -> Result<Option<Invoice>, ErpError> {
        self.read(Operation::GetInvoiceDetail, Some(number), |adapter, payload| {
            adapter.get_invoice_detail(payload)
        })
        .await
    }

    pub async fn invoice_document(
        &self,
        number: &str,
    ) -> Result<Option<InvoiceDocument>, ErpError> {
        self.read(Operation::GetInvoiceDocument, Some(number), |adapter, payload| {
            adapter.get_invoice_document(payload)
        })
        .await
    }

    pub async fn quotation_list(&self) -> Result<Option<Collection<Quotation>>, ErpError> {
        self.read(Operation::GetQuotationList, None, |adapter, payload| {
            adapter.get_quotation_list(payload)
        })
        .await
    }

    pub async fn quotation_detail(&self, number: &str) -> Result<Option<Quotation>, ErpError> {
        self.read(Operation::GetQuotationDetail, Some(number), |adapter, payload| {
            adapter.get_quotation_detail(payload)
        })
        .await
    }

    /// Warehouse list, served from the TTL cache while fresh.
    #[instrument(skip(self), fields(adapter = %self.adapter.id()))]
    pub async fn warehouse_list(&self) -> Result<Option<Collection<Warehouse>>, ErpError> {
        let result = self
            .fetch_cached(Operation::GetWarehouseList)
            .await
            .and_then(|payload| self.adapter.get_warehouse_list(&payload));
        self.settle(Operation::GetWarehouseList, result)
    }

    pub async fn product_price_availability(
        &self,
    ) -> Result<Option<Collection<ProductPriceAvailability>>, ErpError> {
        self.read(
            Operation::GetProductPriceAvailability,
            None,
            |adapter, payload| adapter.get_product_price_availability(payload),
        )
        .await
    }

    pub async fn product_sync(&self) -> Result<Option<Collection<ProductSync>>, ErpError> {
        self.read(Operation::GetProductSync, None, |adapter, payload| {
            adapter.get_product_sync(payload)
        })
        .await
    }

    pub async fn campaign_list(&self) -> Result<Option<Collection<Campaign>>, ErpError> {
        self.read(Operation::GetCampaignList, None, |adapter, payload| {
            adapter.get_campaign_list(payload)
        })
        .await
    }

    /// Drops cached reference data.
    pub async fn invalidate_cache(&self) {
        self.cache.clear().await;
    }

    async fn read<T>(
        &self,
        operation: Operation,
        key: Option<&str>,
        map: impl FnOnce(&dyn ErpAdapter, &Value) -> Result<T, ErpError>,
    ) -> Result<Option<T>, ErpError> {
        let result = match self.fetch(operation, key).await {
            Ok(payload) => map(self.adapter.as_ref(), &payload),
            Err(error) => Err(error),
        };
        self.settle(operation, result)
    }

    async fn fetch_cached(&self, operation: Operation) -> Result<Value, ErpError> {
        self.ensure_supported(operation)?;
        let url = self.url_for(operation, None)?;

        if let Some(body) = self.cache.get(&url).await {
            debug!(%url, "serving cached response");
            return decode_body(&body);
        }

        let body = self.execute(HttpRequest::get(url.clone())).await?;
        let payload = decode_body(&body)?;
        self.cache.put(url, body).await;
        Ok(payload)
    }

    async fn post_order(&self, draft: &OrderDraft) -> Result<OrderConfirmation, ErpError> {
        self.ensure_supported(Operation::CreateOrder)?;
        let request_body = self.adapter.build_order_request(draft)?;
        let url = self.url_for(Operation::CreateOrder, None)?;
        let body = serde_json::to_string(&request_body).map_err(|error| {
            ErpError::internal(format!("failed to serialize order request: {error}"))
        })?;

        let response = self
            .execute(HttpRequest::post(url).with_json_body(body))
            .await?;
        self.adapter.create_order(&decode_body(&response)?)
    }

    async fn execute(&self, request: HttpRequest) -> Result<String, ErpError> {
        let request = request
            .with_header("accept", "application/json")
            .with_auth(&self.auth)
            .with_timeout_ms(self.config.timeout_ms);
        let method = request.method;
        let url = request.url.clone();

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| ErpError::transport(error.message(), error.retryable()))?;

        debug!(method = method.as_str(), %url, status = response.status, "vendor response");

        if !response.is_success() {
            return Err(ErpError::transport(
                format!("{} {url} returned HTTP {}", method.as_str(), response.status),
                response.is_retryable_status(),
            ));
        }
        Ok(response.body)
    }

    fn ensure_supported(&self, operation: Operation) -> Result<(), ErpError> {
        if self.adapter.capabilities().supports(operation) {
            Ok(())
        } else {
            Err(ErpError::unsupported_operation(self.adapter.id(), operation))
        }
    }

    fn settle<T>(
        &self,
        operation: Operation,
        result: Result<T, ErpError>,
    ) -> Result<Option<T>, ErpError> {
        match (result, self.config.error_policy) {
            (Ok(value), _) => Ok(Some(value)),
            (Err(error), ErrorPolicy::Rethrow) => Err(error),
            (Err(error), ErrorPolicy::Suppress) => {
                warn!(
                    adapter = %self.adapter.id(),
                    %operation,
                    code = error.code(),
                    retryable = error.retryable(),
                    error = error.message(),
                    "suppressed ERP call failure"
                );
                Ok(None)
            }
        }
    }
}

/// Decodes a JSON response body; an empty body reads as `{}`.
fn decode_body(body: &str) -> Result<Value, ErpError> {
    if body.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(body).map_err(|error| {
        ErpError::transport(format!("response body is not valid JSON: {error}"), false)
    })
}
