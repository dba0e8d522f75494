//! # erpbridge core
//!
//! Normalizes ERP vendor payloads into one stable set of business wrappers.
//!
//! ## Overview
//!
//! Each supported ERP has an adapter implementing [`ErpAdapter`]. The adapter
//! is selected at runtime from configuration and translates a decoded vendor
//! response (JSON, or XML decoded into the same nested value shape) into
//! [`Customer`], [`Order`], [`Invoice`] and the other wrappers in [`domain`].
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapter`] | Adapter trait, operations, capabilities and `ErpError` |
//! | [`adapters`] | NAV, SAP B1, Exact Online and Visma mappings |
//! | [`cache`] | TTL cache for reference data |
//! | [`coerce`] | Vendor record access and value coercion |
//! | [`config`] | TOML / environment configuration |
//! | [`document`] | Base64 invoice document decoding |
//! | [`domain`] | Normalized wrappers |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Validation and core errors |
//! | [`field_map`] | Configurable vendor key overrides |
//! | [`gateway`] | HTTP fetch + map, under an error policy |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`source`] | Adapter identifiers |
//!
//! ## Quick Start
//!
//! ```rust
//! use erpbridge_core::{adapter_for, AdapterSettings, ErpId};
//! use serde_json::json;
//!
//! let adapter = adapter_for(ErpId::Navision, AdapterSettings::default());
//! let customers = adapter
//!     .get_customer_list(&json!({"value": [{"No": "10000", "Name": "Cannon Group"}]}))
//!     .unwrap();
//! assert_eq!(customers.items[0].code.as_deref(), Some("10000"));
//! ```

pub mod adapter;
pub mod adapters;
pub mod cache;
pub mod coerce;
pub mod config;
pub mod document;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod field_map;
pub mod gateway;
pub mod http_client;
pub mod source;

pub use adapter::{
    dispatch, AdapterSettings, CapabilitySet, ErpAdapter, ErpError, ErpErrorKind, Operation,
};
pub use adapters::{adapter_for, ExactAdapter, NavisionAdapter, SapB1Adapter, VismaAdapter};
pub use cache::TtlCache;
pub use coerce::{count_hint, list_items, next_link, parse_flag, Record};
pub use config::{AuthConfig, ErpConfig, ErrorPolicy};
pub use document::{decode_document, DEFAULT_CONTENT_TYPE};
pub use domain::{
    parse_amount, validate_currency_code, Address, BusinessDate, Campaign, Collection, Contact,
    Customer, Invoice, InvoiceDocument, Money, Order, OrderConfirmation, OrderDetail, OrderDraft,
    OrderDraftLine, OrderStatus, OrderType, ParsedAmount, ProductPriceAvailability, ProductSync,
    Quotation, QuotationStatus, ShippingLocation, UtcDateTime, Warehouse,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{CoreError, ValidationError};
pub use field_map::{
    ConfigurableFieldMapper, Entity, FieldMapper, FieldMappingConfig, IdentityFieldMapper,
};
pub use gateway::ErpGateway;
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
    StaticHttpClient,
};
pub use source::ErpId;
