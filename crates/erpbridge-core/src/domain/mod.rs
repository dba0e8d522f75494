//! # Domain Models
//!
//! Normalized business wrappers produced by every ERP adapter.
//!
//! ## Overview
//!
//! Wrappers are flat transfer objects. Each field is optional because vendors
//! omit what they do not track; a missing or uncoercible vendor value is
//! `None`, never an error. Lines belong to exactly one parent document.
//!
//! ## Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Customer`] | Customer with address, contacts and ship-to locations |
//! | [`Contact`] | Contact person of a customer |
//! | [`ShippingLocation`] | Ship-to address |
//! | [`Order`] | Sales order header with [`OrderDetail`] lines |
//! | [`OrderDraft`] | Outbound order for `create_order` |
//! | [`OrderConfirmation`] | Vendor answer to an order creation |
//! | [`Invoice`] | Sales invoice with lines |
//! | [`InvoiceDocument`] | Decoded invoice file |
//! | [`Quotation`] | Sales quotation with lines |
//! | [`Warehouse`] | Stock location |
//! | [`ProductPriceAvailability`] | Price and stock per product |
//! | [`ProductSync`] | Product master data |
//! | [`Campaign`] | Sales campaign |
//! | [`Collection`] | One page of records with paging hints |
//! | [`Money`] | Exact decimal amount with ISO currency |
//! | [`BusinessDate`] | Calendar date |
//! | [`UtcDateTime`] | UTC timestamp |

mod campaign;
mod collection;
mod customer;
mod date;
mod invoice;
mod money;
mod order;
mod product;
mod quotation;
mod timestamp;

pub use campaign::Campaign;
pub use collection::Collection;
pub use customer::{Address, Contact, Customer, ShippingLocation};
pub(crate) use date::parse_ms_json_date;
pub use date::BusinessDate;
pub use invoice::{Invoice, InvoiceDocument};
pub use money::{parse_amount, validate_currency_code, Money, ParsedAmount};
pub use order::{
    Order, OrderConfirmation, OrderDetail, OrderDraft, OrderDraftLine, OrderStatus, OrderType,
};
pub use product::{ProductPriceAvailability, ProductSync, Warehouse};
pub use quotation::{Quotation, QuotationStatus};
pub use timestamp::UtcDateTime;
