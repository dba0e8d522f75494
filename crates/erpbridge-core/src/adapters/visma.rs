use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

use crate::adapter::{AdapterSettings, CapabilitySet, ErpAdapter, ErpError, Operation};
use crate::adapters::{detail_record, ensure_draft_lines, map_items, put, require_key, resolve_currency};
use crate::coerce::{count_hint, next_link, Record};
use crate::document::decode_document;
use crate::field_map::Entity;
use crate::{
    Address, Campaign, Collection, Contact, Customer, ErpId, Invoice, InvoiceDocument, Order,
    OrderConfirmation, OrderDetail, OrderDraft, OrderStatus, OrderType, ProductPriceAvailability,
    ProductSync, Quotation, QuotationStatus, ShippingLocation, Warehouse,
};

const COUNT_KEYS: [&str; 1] = ["count"];
const NEXT_KEYS: [&str; 1] = ["next"];
const CURRENCY: [&str; 2] = ["Currency", "CurrencyCode"];

/// Visma business API with XML documents decoded into nested values.
///
/// Every scalar arrives as a string. Amounts carry a currency prefix and a
/// comma decimal separator (`"EUR 1.234,56"`), dates are `DD-MM-YYYY` and
/// flags `Y`/`N`. A collection element holding one child decodes to an object
/// rather than an array.
#[derive(Debug, Clone, Default)]
pub struct VismaAdapter {
    settings: AdapterSettings,
}

impl VismaAdapter {
    pub fn new(settings: AdapterSettings) -> Self {
        Self { settings }
    }

    fn collection<'a, T>(
        &'a self,
        payload: &'a Value,
        path: &[&str],
        entity: Entity,
        map: impl Fn(&Record<'a>) -> T,
    ) -> Collection<T> {
        Collection::new(map_items(payload, path, entity, &self.settings, map))
            .with_total_count(count_hint(payload, &COUNT_KEYS))
            .with_next_page(next_link(payload, &NEXT_KEYS))
    }

    fn map_customer(&self, record: &Record<'_>) -> Customer {
        let currency = resolve_currency(record, &CURRENCY, &self.settings);
        Customer {
            code: record.text("code", &["CustomerNo"]),
            name: record.text("name", &["Name"]),
            name_2: record.text("name_2", &["Name2"]),
            address: map_address(record),
            phone: record.text("phone", &["Phone"]),
            email: record.text("email", &["Email"]),
            vat_number: record.text("vat_number", &["VatNo"]),
            credit_limit: record.money("credit_limit", &["CreditLimit"], &currency),
            balance: record.money("balance", &["Balance"], &currency),
            blocked: record.flag("blocked", &["Blocked"]),
            payment_terms: record.text("payment_terms", &["PaymentTerms"]),
            salesperson: record.text("salesperson", &["SalesRep"]),
            shipping_locations: record
                .children(
                    Entity::ShippingLocation,
                    &["DeliveryAddresses/DeliveryAddress"],
                )
                .iter()
                .map(map_shipping_location)
                .collect(),
            contacts: record
                .children(Entity::Contact, &["Contacts/Contact"])
                .iter()
                .map(map_contact)
                .collect(),
            currency: Some(currency),
        }
    }

    fn map_order(&self, record: &Record<'_>) -> Order {
        let currency = resolve_currency(record, &CURRENCY, &self.settings);
        Order {
            number: record.text("number", &["OrderNo"]),
            id: record.text("id", &["OrderId"]).or_else(|| record.attribute("id")),
            customer_code: record.text("customer_code", &["CustomerNo"]),
            customer_name: record.text("customer_name", &["CustomerName"]),
            reference: record.text("reference", &["Reference"]),
            order_date: record.date("order_date", &["OrderDate"]),
            delivery_date: record.date("delivery_date", &["DeliveryDate"]),
            status: order_status(record.text("status", &["Status"]).as_deref()),
            order_type: order_type(record.text("order_type", &["OrderType"]).as_deref()),
            total_excl_vat: record.money("total_excl_vat", &["TotalExclVat"], &currency),
            total_incl_vat: record.money("total_incl_vat", &["TotalInclVat"], &currency),
            shipping_location_code: record.text(
                "shipping_location_code",
                &["DeliveryAddressCode"],
            ),
            details: record
                .children(Entity::OrderDetail, &["OrderLines/OrderLine"])
                .iter()
                .map(|line| map_line(line, &currency))
                .collect(),
            currency: Some(currency),
        }
    }

    fn map_invoice(&self, record: &Record<'_>) -> Invoice {
        let currency = resolve_currency(record, &CURRENCY, &self.settings);
        let open_amount = record.money("open_amount", &["OpenAmount"], &currency);
        Invoice {
            number: record.text("number", &["InvoiceNo"]),
            customer_code: record.text("customer_code", &["CustomerNo"]),
            customer_name: record.text("customer_name", &["CustomerName"]),
            invoice_date: record.date("invoice_date", &["InvoiceDate"]),
            due_date: record.date("due_date", &["DueDate"]),
            order_number: record.text("order_number", &["OrderNo"]),
            reference: record.text("reference", &["Reference"]),
            total_excl_vat: record.money("total_excl_vat", &["TotalExclVat"], &currency),
            total_incl_vat: record.money("total_incl_vat", &["TotalInclVat"], &currency),
            paid: record
                .flag("paid", &["Paid"])
                .or_else(|| open_amount.as_ref().map(|amount| amount.is_zero())),
            open_amount,
            details: record
                .children(Entity::OrderDetail, &["InvoiceLines/InvoiceLine"])
                .iter()
                .map(|line| map_line(line, &currency))
                .collect(),
            currency: Some(currency),
        }
    }

    fn map_quotation(&self, record: &Record<'_>) -> Quotation {
        let currency = resolve_currency(record, &CURRENCY, &self.settings);
        let status = match record.text("status", &["Status"]).as_deref() {
            Some("0") => QuotationStatus::Draft,
            Some("1") => QuotationStatus::Open,
            Some("2") => QuotationStatus::Accepted,
            Some("3") => QuotationStatus::Rejected,
            Some("4") => QuotationStatus::Expired,
            _ => QuotationStatus::Unknown,
        };

        Quotation {
            number: record.text("number", &["QuotationNo"]),
            customer_code: record.text("customer_code", &["CustomerNo"]),
            customer_name: record.text("customer_name", &["CustomerName"]),
            quotation_date: record.date("quotation_date", &["QuotationDate"]),
            valid_until: record.date("valid_until", &["ValidUntil"]),
            status,
            total_excl_vat: record.money("total_excl_vat", &["TotalExclVat"], &currency),
            total_incl_vat: record.money("total_incl_vat", &["TotalInclVat"], &currency),
            details: record
                .children(Entity::OrderDetail, &["QuotationLines/QuotationLine"])
                .iter()
                .map(|line| map_line(line, &currency))
                .collect(),
            currency: Some(currency),
        }
    }

    fn map_price_availability(&self, record: &Record<'_>) -> ProductPriceAvailability {
        ProductPriceAvailability {
            product_code: record.text("product_code", &["ArticleNo"]),
            description: record.text("description", &["Description"]),
            unit: record.text("unit", &["Unit"]),
            unit_price: record.money("unit_price", &["Price"], &self.settings.default_currency),
            quantity_available: record.decimal("quantity_available", &["Available"]),
            quantity_on_order: record.decimal("quantity_on_order", &["OnOrder"]),
            next_delivery_date: record.date("next_delivery_date", &["NextDeliveryDate"]),
        }
    }

    fn map_product(&self, record: &Record<'_>) -> ProductSync {
        ProductSync {
            code: record.text("code", &["ArticleNo"]),
            description: record.text("description", &["Description"]),
            description_2: record.text("description_2", &["Description2"]),
            unit: record.text("unit", &["Unit"]),
            unit_price: record.money("unit_price", &["Price"], &self.settings.default_currency),
            product_group: record.text("product_group", &["ArticleGroup"]),
            ean: record.text("ean", &["EAN"]),
            blocked: record.flag("blocked", &["Blocked"]),
            weight: record.float("weight", &["Weight"]),
            vendor_code: record.text("vendor_code", &["SupplierNo"]),
            modified_at: record.timestamp("modified_at", &["Modified"]),
        }
    }
}

// ============================================================================
// Record mapping
// ============================================================================

fn map_address(record: &Record<'_>) -> Address {
    Address {
        street: record.text("street", &["Address1"]),
        street_2: record.text("street_2", &["Address2"]),
        postal_code: record.text("postal_code", &["PostCode"]),
        city: record.text("city", &["City"]),
        country: record.text("country", &["CountryCode"]),
    }
}

fn map_contact(record: &Record<'_>) -> Contact {
    Contact {
        code: record.text("code", &["ContactNo"]),
        customer_code: record.text("customer_code", &["CustomerNo"]),
        name: record.text("name", &["Name"]),
        first_name: record.text("first_name", &["FirstName"]),
        last_name: record.text("last_name", &["LastName"]),
        email: record.text("email", &["Email"]),
        phone: record.text("phone", &["Phone"]),
        mobile: record.text("mobile", &["Mobile"]),
        job_title: record.text("job_title", &["Function"]),
    }
}

fn map_shipping_location(record: &Record<'_>) -> ShippingLocation {
    ShippingLocation {
        code: record.text("code", &["Code"]),
        customer_code: record.text("customer_code", &["CustomerNo"]),
        name: record.text("name", &["Name"]),
        address: map_address(record),
        phone: record.text("phone", &["Phone"]),
        is_default: record.flag("is_default", &["Default"]),
    }
}

fn map_line(record: &Record<'_>, currency: &str) -> OrderDetail {
    OrderDetail {
        line_number: record.integer("line_number", &["LineNo"]),
        product_code: record.text("product_code", &["ArticleNo"]),
        description: record.text("description", &["Description"]),
        quantity: record.decimal("quantity", &["Quantity"]),
        unit: record.text("unit", &["Unit"]),
        unit_price: record.money("unit_price", &["Price"], currency),
        discount_percent: record.decimal("discount_percent", &["Discount"]),
        line_total: record.money("line_total", &["LineTotal"], currency),
        quantity_delivered: record.decimal("quantity_delivered", &["QuantityDelivered"]),
        quantity_outstanding: record.decimal(
            "quantity_outstanding",
            &["QuantityBackorder", "QuantityOutstanding"],
        ),
        warehouse_code: record.text("warehouse_code", &["Warehouse"]),
        delivery_date: record.date("delivery_date", &["DeliveryDate"]),
        is_text_line: record
            .attribute("type")
            .is_some_and(|kind| kind.eq_ignore_ascii_case("text")),
    }
}

fn map_warehouse(record: &Record<'_>) -> Warehouse {
    Warehouse {
        code: record.text("code", &["Code"]),
        name: record.text("name", &["Name"]),
        address: map_address(record),
        is_default: record.flag("is_default", &["Default"]),
        active: record.flag("active", &["Active"]),
    }
}

fn map_campaign(record: &Record<'_>) -> Campaign {
    Campaign {
        code: record.text("code", &["Code"]),
        name: record.text("name", &["Name"]),
        description: record.text("description", &["Description"]),
        starts_on: record.date("starts_on", &["StartDate"]),
        ends_on: record.date("ends_on", &["EndDate"]),
        active: record.flag("active", &["Active"]),
    }
}

fn order_status(code: Option<&str>) -> OrderStatus {
    match code {
        Some("0") => OrderStatus::Open,
        Some("1") => OrderStatus::Confirmed,
        Some("2") => OrderStatus::PartiallyShipped,
        Some("3") => OrderStatus::Shipped,
        Some("4") => OrderStatus::Invoiced,
        Some("9") => OrderStatus::Cancelled,
        _ => OrderStatus::Unknown,
    }
}

fn order_type(code: Option<&str>) -> OrderType {
    match code.map(str::to_ascii_uppercase).as_deref() {
        Some("SO") => OrderType::Standard,
        Some("RO") => OrderType::Return,
        Some("CO") => OrderType::Credit,
        Some("BO") => OrderType::Blanket,
        Some("QU") => OrderType::Quote,
        _ => OrderType::Unknown,
    }
}

/// Comma decimal with at least two fraction digits: `12.5` → `"12,50"`.
fn visma_decimal(value: Decimal) -> String {
    let mut value = value.normalize();
    if value.scale() < 2 {
        value.rescale(2);
    }
    value.to_string().replace('.', ",")
}

fn encode_key(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}

// ============================================================================
// Adapter contract
// ============================================================================

impl ErpAdapter for VismaAdapter {
    fn id(&self) -> ErpId {
        ErpId::Visma
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::full()
    }

    fn endpoint(&self, operation: Operation, key: Option<&str>) -> Result<String, ErpError> {
        let path = match operation {
            Operation::GetCustomerList => String::from("customers"),
            Operation::GetCustomer => {
                format!("customers/{}", encode_key(require_key(operation, key)?))
            }
            Operation::GetContactList => format!(
                "customers/{}/contacts",
                encode_key(require_key(operation, key)?)
            ),
            Operation::GetShippingLocations => format!(
                "customers/{}/deliveryaddresses",
                encode_key(require_key(operation, key)?)
            ),
            Operation::GetOrderList => String::from("orders"),
            Operation::GetOrderDetail => {
                format!("orders/{}", encode_key(require_key(operation, key)?))
            }
            Operation::BuildOrderRequest | Operation::CreateOrder => String::from("orders"),
            Operation::GetInvoiceList => String::from("invoices"),
            Operation::GetInvoiceDetail => {
                format!("invoices/{}", encode_key(require_key(operation, key)?))
            }
            Operation::GetInvoiceDocument => format!(
                "invoices/{}/document",
                encode_key(require_key(operation, key)?)
            ),
            Operation::GetQuotationList => String::from("quotations"),
            Operation::GetQuotationDetail => {
                format!("quotations/{}", encode_key(require_key(operation, key)?))
            }
            Operation::GetWarehouseList => String::from("warehouses"),
            Operation::GetProductPriceAvailability => String::from("articles/availability"),
            Operation::GetProductSync => String::from("articles"),
            Operation::GetCampaignList => String::from("campaigns"),
        };
        Ok(path)
    }

    fn get_customer_list(&self, payload: &Value) -> Result<Collection<Customer>, ErpError> {
        Ok(self.collection(payload, &["Customers", "Customer"], Entity::Customer, |record| {
            self.map_customer(record)
        }))
    }

    fn get_customer(&self, payload: &Value) -> Result<Customer, ErpError> {
        let record = detail_record(payload, &["Customer"], Entity::Customer, &self.settings);
        Ok(self.map_customer(&record))
    }

    fn get_contact_list(&self, payload: &Value) -> Result<Collection<Contact>, ErpError> {
        Ok(self.collection(payload, &["Contacts", "Contact"], Entity::Contact, map_contact))
    }

    fn get_shipping_locations(
        &self,
        payload: &Value,
    ) -> Result<Collection<ShippingLocation>, ErpError> {
        Ok(self.collection(
            payload,
            &["DeliveryAddresses", "DeliveryAddress"],
            Entity::ShippingLocation,
            map_shipping_location,
        ))
    }

    fn get_order_list(&self, payload: &Value) -> Result<Collection<Order>, ErpError> {
        Ok(self.collection(payload, &["Orders", "Order"], Entity::Order, |record| {
            self.map_order(record)
        }))
    }

    fn get_order_detail(&self, payload: &Value) -> Result<Order, ErpError> {
        let record = detail_record(payload, &["Order"], Entity::Order, &self.settings);
        Ok(self.map_order(&record))
    }

    fn build_order_request(&self, draft: &OrderDraft) -> Result<Value, ErpError> {
        ensure_draft_lines(draft)?;

        let lines: Vec<Value> = draft
            .lines
            .iter()
            .zip(1_u32..)
            .map(|(line, index)| {
                let mut body = Map::new();
                body.insert(String::from("@attributes"), json!({"type": "item"}));
                body.insert(String::from("LineNo"), json!(index.to_string()));
                body.insert(String::from("ArticleNo"), json!(line.product_code));
                body.insert(
                    String::from("Quantity"),
                    json!(visma_decimal(line.quantity)),
                );
                put(
                    &mut body,
                    "Price",
                    line.unit_price.map(|price| json!(visma_decimal(price))),
                );
                put(
                    &mut body,
                    "Discount",
                    line.discount_percent
                        .map(|discount| json!(visma_decimal(discount))),
                );
                put(&mut body, "Description", line.description.clone().map(Value::from));
                put(&mut body, "Warehouse", line.warehouse_code.clone().map(Value::from));
                put(
                    &mut body,
                    "DeliveryDate",
                    line.delivery_date
                        .map(|date| Value::from(date.to_dmy_string())),
                );
                Value::Object(body)
            })
            .collect();

        let currency = draft
            .currency
            .as_deref()
            .unwrap_or(&self.settings.default_currency)
            .to_ascii_uppercase();

        let mut order = Map::new();
        order.insert(String::from("CustomerNo"), json!(draft.customer_code));
        put(&mut order, "Reference", draft.reference.clone().map(Value::from));
        put(
            &mut order,
            "OrderDate",
            draft.order_date.map(|date| Value::from(date.to_dmy_string())),
        );
        put(
            &mut order,
            "DeliveryDate",
            draft.delivery_date.map(|date| Value::from(date.to_dmy_string())),
        );
        order.insert(String::from("OrderType"), json!("SO"));
        order.insert(String::from("Currency"), json!(currency));
        put(
            &mut order,
            "DeliveryAddressCode",
            draft.shipping_location_code.clone().map(Value::from),
        );
        order.insert(String::from("OrderLines"), json!({"OrderLine": lines}));

        Ok(json!({"Order": order}))
    }

    /// Accepts an `OrderConfirmation` element or the echoed `Order`.
    fn create_order(&self, payload: &Value) -> Result<OrderConfirmation, ErpError> {
        let root = Record::new(payload, Entity::Order, self.settings.field_mapper.as_ref());

        if let Some(confirmation) = root.child(Entity::Order, &["OrderConfirmation"]) {
            let currency = resolve_currency(&confirmation, &CURRENCY, &self.settings);
            let order = confirmation
                .child(Entity::Order, &["Order"])
                .map(|order| self.map_order(&order));
            return Ok(OrderConfirmation {
                number: confirmation
                    .text("number", &["OrderNo"])
                    .or_else(|| order.as_ref().and_then(|order| order.number.clone())),
                id: confirmation
                    .text("id", &["OrderId"])
                    .or_else(|| confirmation.attribute("id")),
                status: match confirmation.text("status", &["Status"]) {
                    Some(code) => order_status(Some(&code)),
                    None => order.as_ref().map_or(OrderStatus::Unknown, |order| order.status),
                },
                total_incl_vat: confirmation.money("total_incl_vat", &["TotalInclVat"], &currency),
                order,
            });
        }

        match root.child(Entity::Order, &["Order"]) {
            Some(record) => {
                let order = self.map_order(&record);
                Ok(OrderConfirmation {
                    number: order.number.clone(),
                    id: order.id.clone(),
                    status: order.status,
                    total_incl_vat: order.total_incl_vat.clone(),
                    order: Some(order),
                })
            }
            None => Ok(OrderConfirmation::default()),
        }
    }

    fn get_invoice_list(&self, payload: &Value) -> Result<Collection<Invoice>, ErpError> {
        Ok(self.collection(payload, &["Invoices", "Invoice"], Entity::Invoice, |record| {
            self.map_invoice(record)
        }))
    }

    fn get_invoice_detail(&self, payload: &Value) -> Result<Invoice, ErpError> {
        let record = detail_record(payload, &["Invoice"], Entity::Invoice, &self.settings);
        Ok(self.map_invoice(&record))
    }

    fn get_invoice_document(&self, payload: &Value) -> Result<InvoiceDocument, ErpError> {
        let record = detail_record(
            payload,
            &["InvoiceDocument"],
            Entity::InvoiceDocument,
            &self.settings,
        );
        let invoice_number = record.text("invoice_number", &["InvoiceNo"]);
        let file_name = record
            .text("file_name", &["FileName"])
            .or_else(|| invoice_number.as_ref().map(|number| format!("{number}.pdf")));

        decode_document(
            invoice_number,
            file_name,
            record.text("content_type", &["MimeType"]),
            record.text("content", &["Data", "Content"]).as_deref(),
        )
    }

    fn get_quotation_list(&self, payload: &Value) -> Result<Collection<Quotation>, ErpError> {
        Ok(self.collection(
            payload,
            &["Quotations", "Quotation"],
            Entity::Quotation,
            |record| self.map_quotation(record),
        ))
    }

    fn get_quotation_detail(&self, payload: &Value) -> Result<Quotation, ErpError> {
        let record = detail_record(payload, &["Quotation"], Entity::Quotation, &self.settings);
        Ok(self.map_quotation(&record))
    }

    fn get_warehouse_list(&self, payload: &Value) -> Result<Collection<Warehouse>, ErpError> {
        Ok(self.collection(
            payload,
            &["Warehouses", "Warehouse"],
            Entity::Warehouse,
            map_warehouse,
        ))
    }

    fn get_product_price_availability(
        &self,
        payload: &Value,
    ) -> Result<Collection<ProductPriceAvailability>, ErpError> {
        Ok(self.collection(payload, &["Articles", "Article"], Entity::Product, |record| {
            self.map_price_availability(record)
        }))
    }

    fn get_product_sync(&self, payload: &Value) -> Result<Collection<ProductSync>, ErpError> {
        Ok(self.collection(payload, &["Articles", "Article"], Entity::Product, |record| {
            self.map_product(record)
        }))
    }

    fn get_campaign_list(&self, payload: &Value) -> Result<Collection<Campaign>, ErpError> {
        Ok(self.collection(
            payload,
            &["Campaigns", "Campaign"],
            Entity::Campaign,
            map_campaign,
        ))
    }
}
