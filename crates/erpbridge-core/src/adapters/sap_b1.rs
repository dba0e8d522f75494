use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

use crate::adapter::{AdapterSettings, CapabilitySet, ErpAdapter, ErpError, Operation};
use crate::adapters::{
    detail_record, ensure_draft_lines, map_items, number, odata_literal, put, require_key,
    resolve_currency,
};
use crate::coerce::{count_hint, list_items, next_link, Record};
use crate::document::decode_document;
use crate::field_map::Entity;
use crate::{
    Address, Campaign, Collection, Contact, Customer, ErpId, Invoice, InvoiceDocument, Money,
    Order, OrderConfirmation, OrderDetail, OrderDraft, OrderStatus, OrderType,
    ProductPriceAvailability, ProductSync, Quotation, QuotationStatus, ShippingLocation,
    UtcDateTime, Warehouse,
};

const COUNT_KEYS: [&str; 2] = ["@odata.count", "odata.count"];
const NEXT_KEYS: [&str; 2] = ["@odata.nextLink", "odata.nextLink"];
const CURRENCY: [&str; 2] = ["DocCurrency", "Currency"];
const SALES_ORDER_OBJECT: &str = "17";

/// SAP Business One Service Layer.
#[derive(Debug, Clone, Default)]
pub struct SapB1Adapter {
    settings: AdapterSettings,
}

impl SapB1Adapter {
    pub fn new(settings: AdapterSettings) -> Self {
        Self { settings }
    }

    fn collection<'a, T>(
        &'a self,
        payload: &'a Value,
        entity: Entity,
        map: impl Fn(&Record<'a>) -> T,
    ) -> Collection<T> {
        Collection::new(map_items(payload, &[], entity, &self.settings, map))
            .with_total_count(count_hint(payload, &COUNT_KEYS))
            .with_next_page(next_link(payload, &NEXT_KEYS))
    }

    fn map_customer(&self, record: &Record<'_>) -> Customer {
        let currency = resolve_currency(record, &CURRENCY, &self.settings);
        let default_ship_to = record.text("default_ship_to", &["ShipToDefault"]);

        Customer {
            code: record.text("code", &["CardCode"]),
            name: record.text("name", &["CardName"]),
            name_2: record.text("name_2", &["CardForeignName"]),
            address: Address {
                street: record.text("street", &["Address"]),
                street_2: record.text("street_2", &["Block"]),
                postal_code: record.text("postal_code", &["ZipCode"]),
                city: record.text("city", &["City"]),
                country: record.text("country", &["Country"]),
            },
            phone: record.text("phone", &["Phone1", "Phone2"]),
            email: record.text("email", &["EmailAddress"]),
            vat_number: record.text("vat_number", &["FederalTaxID", "VatIDNum"]),
            credit_limit: record.money("credit_limit", &["CreditLimit"], &currency),
            balance: record.money("balance", &["CurrentAccountBalance"], &currency),
            blocked: record.flag("blocked", &["Frozen"]),
            payment_terms: record.text("payment_terms", &["PayTermsGrpCode"]),
            salesperson: record.text("salesperson", &["SalesPersonCode"]),
            shipping_locations: ship_to_addresses(record, default_ship_to.as_deref()),
            contacts: record
                .children(Entity::Contact, &["ContactEmployees"])
                .iter()
                .map(|contact| map_contact(contact, record.text("code", &["CardCode"])))
                .collect(),
            currency: Some(currency),
        }
    }

    fn map_order(&self, record: &Record<'_>) -> Order {
        let currency = resolve_currency(record, &CURRENCY, &self.settings);
        let details = document_lines(record, &currency);
        let total_incl_vat = record.money("total_incl_vat", &["DocTotal"], &currency);
        let vat = record.money("vat", &["VatSum"], &currency);

        Order {
            number: record.text("number", &["DocNum"]),
            id: record.text("id", &["DocEntry"]),
            customer_code: record.text("customer_code", &["CardCode"]),
            customer_name: record.text("customer_name", &["CardName"]),
            reference: record.text("reference", &["NumAtCard"]),
            order_date: record.date("order_date", &["DocDate"]),
            delivery_date: record.date("delivery_date", &["DocDueDate"]),
            status: order_status(record, &details),
            order_type: order_type(record),
            total_excl_vat: total_excl_vat(record, total_incl_vat.as_ref(), vat.as_ref(), &currency),
            total_incl_vat,
            shipping_location_code: record.text("shipping_location_code", &["ShipToCode"]),
            currency: Some(currency),
            details,
        }
    }

    fn map_invoice(&self, record: &Record<'_>) -> Invoice {
        let currency = resolve_currency(record, &CURRENCY, &self.settings);
        let details = document_lines(record, &currency);
        let total_incl_vat = record.money("total_incl_vat", &["DocTotal"], &currency);
        let vat = record.money("vat", &["VatSum"], &currency);
        let paid_to_date = record.money("paid_to_date", &["PaidToDate"], &currency);
        let open_amount = match (&total_incl_vat, &paid_to_date) {
            (Some(total), Some(paid)) => total.checked_sub(paid),
            _ => None,
        };
        let paid = match record.text("status", &["DocumentStatus"]).as_deref() {
            Some("bost_Close" | "bost_Paid") => Some(true),
            _ => open_amount.as_ref().map(Money::is_zero),
        };

        Invoice {
            number: record.text("number", &["DocNum"]),
            customer_code: record.text("customer_code", &["CardCode"]),
            customer_name: record.text("customer_name", &["CardName"]),
            invoice_date: record.date("invoice_date", &["DocDate"]),
            due_date: record.date("due_date", &["DocDueDate"]),
            order_number: base_order_number(record),
            reference: record.text("reference", &["NumAtCard"]),
            total_excl_vat: total_excl_vat(record, total_incl_vat.as_ref(), vat.as_ref(), &currency),
            total_incl_vat,
            currency: Some(currency),
            open_amount,
            paid,
            details,
        }
    }

    fn map_quotation(&self, record: &Record<'_>) -> Quotation {
        let currency = resolve_currency(record, &CURRENCY, &self.settings);
        let details = document_lines(record, &currency);
        let total_incl_vat = record.money("total_incl_vat", &["DocTotal"], &currency);
        let vat = record.money("vat", &["VatSum"], &currency);

        let status = if record.flag("cancelled", &["Cancelled"]) == Some(true) {
            QuotationStatus::Rejected
        } else {
            match record.text("status", &["DocumentStatus"]).as_deref() {
                Some("bost_Open") => QuotationStatus::Open,
                Some("bost_Close") => QuotationStatus::Accepted,
                _ => QuotationStatus::Unknown,
            }
        };

        Quotation {
            number: record.text("number", &["DocNum"]),
            customer_code: record.text("customer_code", &["CardCode"]),
            customer_name: record.text("customer_name", &["CardName"]),
            quotation_date: record.date("quotation_date", &["DocDate"]),
            valid_until: record.date("valid_until", &["DocDueDate"]),
            status,
            total_excl_vat: total_excl_vat(record, total_incl_vat.as_ref(), vat.as_ref(), &currency),
            total_incl_vat,
            currency: Some(currency),
            details,
        }
    }

    /// Price from `ItemPrices` for the configured price list.
    fn item_price(&self, record: &Record<'_>) -> Option<Money> {
        if let Some(price) = record.money("unit_price", &[], &self.settings.default_currency) {
            return Some(price);
        }

        let list = i64::from(self.settings.price_list);
        record
            .children(Entity::Product, &["ItemPrices"])
            .into_iter()
            .find(|price| price.integer("price_list", &["PriceList"]) == Some(list))
            .and_then(|price| {
                let currency = resolve_currency(&price, &["Currency"], &self.settings);
                price.money("unit_price", &["Price"], &currency)
            })
    }

    fn map_price_availability(&self, record: &Record<'_>) -> ProductPriceAvailability {
        let stock = record.children(Entity::Product, &["ItemWarehouseInfoCollection"]);
        let (available, on_order) = if stock.is_empty() {
            let in_stock = record.decimal("in_stock", &["QuantityOnStock"]);
            let committed = record
                .decimal("committed", &["QuantityOrderedByCustomers"])
                .unwrap_or_default();
            (
                in_stock.and_then(|in_stock| in_stock.checked_sub(committed)),
                record.decimal("quantity_on_order", &["QuantityOrderedFromVendors"]),
            )
        } else {
            let available = stock.iter().try_fold(Decimal::ZERO, |total, row| {
                let in_stock = row.decimal("in_stock", &["InStock"]).unwrap_or_default();
                let committed = row.decimal("committed", &["Committed"]).unwrap_or_default();
                total.checked_add(in_stock.checked_sub(committed)?)
            });
            let on_order = stock
                .iter()
                .filter_map(|row| row.decimal("ordered", &["Ordered"]))
                .try_fold(Decimal::ZERO, |total, ordered| total.checked_add(ordered));
            (available, on_order)
        };

        ProductPriceAvailability {
            product_code: record.text("product_code", &["ItemCode"]),
            description: record.text("description", &["ItemName"]),
            unit: record.text("unit", &["SalesUnit", "InventoryUOM"]),
            unit_price: self.item_price(record),
            quantity_available: available,
            quantity_on_order: on_order,
            next_delivery_date: None,
        }
    }

    fn map_product(&self, record: &Record<'_>) -> ProductSync {
        ProductSync {
            code: record.text("code", &["ItemCode"]),
            description: record.text("description", &["ItemName"]),
            description_2: record.text("description_2", &["ForeignName"]),
            unit: record.text("unit", &["SalesUnit", "InventoryUOM"]),
            unit_price: self.item_price(record),
            product_group: record.text("product_group", &["ItemsGroupCode"]),
            ean: record.text("ean", &["BarCode"]),
            blocked: record.flag("blocked", &["Frozen"]),
            weight: record.float("weight", &["SalesUnitWeight", "SalesWeightUnit"]),
            vendor_code: record.text("vendor_code", &["Mainsupplier"]),
            modified_at: modified_at(record),
        }
    }
}

// ============================================================================
// Record mapping
// ============================================================================

fn map_contact(record: &Record<'_>, customer_code: Option<String>) -> Contact {
    Contact {
        code: record.text("code", &["InternalCode"]),
        customer_code: record.text("customer_code", &["CardCode"]).or(customer_code),
        name: record.text("name", &["Name"]),
        first_name: record.text("first_name", &["FirstName"]),
        last_name: record.text("last_name", &["LastName"]),
        email: record.text("email", &["E_Mail"]),
        phone: record.text("phone", &["Phone1", "Phone2"]),
        mobile: record.text("mobile", &["MobilePhone"]),
        job_title: record.text("job_title", &["Position", "Title"]),
    }
}

fn map_address_row(record: &Record<'_>, default_ship_to: Option<&str>) -> ShippingLocation {
    let code = record.text("code", &["AddressName"]);
    let is_default = default_ship_to.map(|default| code.as_deref() == Some(default));

    ShippingLocation {
        customer_code: record.text("customer_code", &["BPCode"]),
        name: record.text("name", &["AddressName2", "AddressName"]),
        address: Address {
            street: record.text("street", &["Street"]),
            street_2: record.text("street_2", &["Block"]),
            postal_code: record.text("postal_code", &["ZipCode"]),
            city: record.text("city", &["City"]),
            country: record.text("country", &["Country"]),
        },
        phone: None,
        is_default,
        code,
    }
}

fn is_ship_to(record: &Record<'_>) -> bool {
    // Rows without a type come from endpoints that already filtered them.
    record
        .text("address_type", &["AddressType"])
        .map_or(true, |kind| kind == "bo_ShipTo")
}

fn ship_to_addresses(record: &Record<'_>, default_ship_to: Option<&str>) -> Vec<ShippingLocation> {
    record
        .children(Entity::ShippingLocation, &["BPAddresses"])
        .iter()
        .filter(|row| is_ship_to(row))
        .map(|row| map_address_row(row, default_ship_to))
        .collect()
}

fn map_line(record: &Record<'_>, currency: &str) -> OrderDetail {
    let quantity = record.decimal("quantity", &["Quantity"]);
    let outstanding = record.decimal("quantity_outstanding", &["RemainingOpenQuantity"]);
    let line_currency = record
        .text("currency", &["Currency"])
        .and_then(|code| crate::validate_currency_code(&code).ok())
        .unwrap_or_else(|| currency.to_owned());

    OrderDetail {
        line_number: record.integer("line_number", &["LineNum"]),
        product_code: record.text("product_code", &["ItemCode"]),
        description: record.text("description", &["ItemDescription", "Dscription"]),
        unit: record.text("unit", &["UoMCode", "MeasureUnit"]),
        unit_price: record.money("unit_price", &["UnitPrice", "Price"], &line_currency),
        discount_percent: record.decimal("discount_percent", &["DiscountPercent"]),
        line_total: record.money("line_total", &["LineTotal"], &line_currency),
        quantity_delivered: record
            .decimal("quantity_delivered", &["DeliveredQuantity"])
            .or_else(|| quantity?.checked_sub(outstanding?)),
        quantity_outstanding: outstanding,
        warehouse_code: record.text("warehouse_code", &["WarehouseCode"]),
        delivery_date: record.date("delivery_date", &["ShipDate"]),
        is_text_line: false,
        quantity,
    }
}

fn map_special_line(record: &Record<'_>) -> Option<OrderDetail> {
    let kind = record.text("line_type", &["LineType"])?;
    if kind != "dslt_Text" {
        return None;
    }
    Some(OrderDetail {
        line_number: record.integer("line_number", &["OrderNumber", "AfterLineNumber"]),
        description: record.text("description", &["LineText"]),
        is_text_line: true,
        ..OrderDetail::default()
    })
}

fn document_lines(record: &Record<'_>, currency: &str) -> Vec<OrderDetail> {
    let mut details: Vec<OrderDetail> = record
        .children(Entity::OrderDetail, &["DocumentLines"])
        .iter()
        .map(|line| map_line(line, currency))
        .collect();
    details.extend(
        record
            .children(Entity::OrderDetail, &["DocumentSpecialLines"])
            .iter()
            .filter_map(map_special_line),
    );
    details
}

fn total_excl_vat(
    record: &Record<'_>,
    total_incl_vat: Option<&Money>,
    vat: Option<&Money>,
    currency: &str,
) -> Option<Money> {
    record
        .money("total_excl_vat", &[], currency)
        .or_else(|| total_incl_vat?.checked_sub(vat?))
}

fn order_status(record: &Record<'_>, details: &[OrderDetail]) -> OrderStatus {
    if record.flag("cancelled", &["Cancelled"]) == Some(true) {
        return OrderStatus::Cancelled;
    }
    match record.text("status", &["DocumentStatus"]).as_deref() {
        Some("bost_Close") => OrderStatus::Completed,
        Some("bost_Delivered") => OrderStatus::Shipped,
        Some("bost_Paid") => OrderStatus::Invoiced,
        Some("bost_Open") => {
            let partially_delivered = details.iter().any(|line| {
                line.quantity_delivered
                    .is_some_and(|delivered| delivered > Decimal::ZERO)
            });
            if partially_delivered {
                OrderStatus::PartiallyShipped
            } else {
                OrderStatus::Open
            }
        }
        _ => OrderStatus::Unknown,
    }
}

fn order_type(record: &Record<'_>) -> OrderType {
    let base = match record.text("object_code", &["DocObjectCode"]).as_deref() {
        Some("oOrders" | "17") => OrderType::Standard,
        Some("oReturns" | "16") => OrderType::Return,
        Some("oCreditNotes" | "14") => OrderType::Credit,
        Some("oQuotations" | "23") => OrderType::Quote,
        Some(_) => OrderType::Unknown,
        None => match record.text("doc_type", &["DocType"]) {
            Some(_) => OrderType::Standard,
            None => OrderType::Unknown,
        },
    };

    let is_service = record.text("doc_type", &["DocType"]).as_deref() == Some("dDocument_Service");
    if base == OrderType::Standard && is_service {
        OrderType::Service
    } else {
        base
    }
}

/// Order the invoice was copied from, read from the first line's base document.
fn base_order_number(record: &Record<'_>) -> Option<String> {
    if let Some(number) = record.text("order_number", &["U_OrderNo"]) {
        return Some(number);
    }
    record
        .children(Entity::OrderDetail, &["DocumentLines"])
        .iter()
        .find(|line| line.text("base_type", &["BaseType"]).as_deref() == Some(SALES_ORDER_OBJECT))
        .and_then(|line| line.text("base_entry", &["BaseEntry"]))
}

/// `UpdateDate` and `UpdateTime` are separate fields in the Service Layer.
fn modified_at(record: &Record<'_>) -> Option<UtcDateTime> {
    let date = record.date("modified_date", &["UpdateDate"]);
    let time = record.text("modified_time", &["UpdateTime"]);
    if let (Some(date), Some(time)) = (date, time) {
        let combined = format!("{}T{time}Z", date.to_iso_string());
        if let Ok(parsed) = UtcDateTime::parse_normalized(&combined) {
            return Some(parsed);
        }
    }
    record.timestamp("modified_at", &["UpdateDate"])
}

fn map_warehouse(record: &Record<'_>) -> Warehouse {
    Warehouse {
        code: record.text("code", &["WarehouseCode"]),
        name: record.text("name", &["WarehouseName"]),
        address: Address {
            street: record.text("street", &["Street"]),
            street_2: record.text("street_2", &["Block"]),
            postal_code: record.text("postal_code", &["ZipCode"]),
            city: record.text("city", &["City"]),
            country: record.text("country", &["Country"]),
        },
        is_default: None,
        active: record.flag("inactive", &["Inactive"]).map(|inactive| !inactive),
    }
}

fn map_campaign(record: &Record<'_>) -> Campaign {
    Campaign {
        code: record.text("code", &["CampaignNumber"]),
        name: record.text("name", &["CampaignName"]),
        description: record.text("description", &["Remarks"]),
        starts_on: record.date("starts_on", &["StartDate"]),
        ends_on: record.date("ends_on", &["FinishDate"]),
        active: record
            .text("status", &["Status"])
            .map(|status| status == "cs_Open"),
    }
}

/// Numeric `DocEntry` keys are unquoted in Service Layer paths.
fn doc_entry(key: &str) -> String {
    if key.chars().all(|ch| ch.is_ascii_digit()) {
        key.to_owned()
    } else {
        odata_literal(key)
    }
}

// ============================================================================
// Adapter contract
// ============================================================================

impl ErpAdapter for SapB1Adapter {
    fn id(&self) -> ErpId {
        ErpId::SapB1
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::full()
    }

    fn endpoint(&self, operation: Operation, key: Option<&str>) -> Result<String, ErpError> {
        let path = match operation {
            Operation::GetCustomerList => {
                String::from("BusinessPartners?$filter=CardType%20eq%20%27cCustomer%27")
            }
            Operation::GetCustomer => format!(
                "BusinessPartners({})",
                odata_literal(require_key(operation, key)?)
            ),
            Operation::GetContactList => format!(
                "BusinessPartners({})?$select=CardCode,ContactEmployees",
                odata_literal(require_key(operation, key)?)
            ),
            Operation::GetShippingLocations => format!(
                "BusinessPartners({})?$select=CardCode,ShipToDefault,BPAddresses",
                odata_literal(require_key(operation, key)?)
            ),
            Operation::GetOrderList => String::from("Orders"),
            Operation::GetOrderDetail => {
                format!("Orders({})", doc_entry(require_key(operation, key)?))
            }
            Operation::BuildOrderRequest | Operation::CreateOrder => String::from("Orders"),
            Operation::GetInvoiceList => String::from("Invoices"),
            Operation::GetInvoiceDetail => {
                format!("Invoices({})", doc_entry(require_key(operation, key)?))
            }
            Operation::GetInvoiceDocument => format!(
                "InvoiceDocuments({})",
                doc_entry(require_key(operation, key)?)
            ),
            Operation::GetQuotationList => String::from("Quotations"),
            Operation::GetQuotationDetail => {
                format!("Quotations({})", doc_entry(require_key(operation, key)?))
            }
            Operation::GetWarehouseList => String::from("Warehouses"),
            Operation::GetProductPriceAvailability => String::from(
                "Items?$select=ItemCode,ItemName,SalesUnit,ItemPrices,ItemWarehouseInfoCollection",
            ),
            Operation::GetProductSync => String::from("Items"),
            Operation::GetCampaignList => String::from("Campaigns"),
        };
        Ok(path)
    }

    fn get_customer_list(&self, payload: &Value) -> Result<Collection<Customer>, ErpError> {
        Ok(self.collection(payload, Entity::Customer, |record| {
            self.map_customer(record)
        }))
    }

    fn get_customer(&self, payload: &Value) -> Result<Customer, ErpError> {
        let record = detail_record(payload, &[], Entity::Customer, &self.settings);
        Ok(self.map_customer(&record))
    }

    /// Accepts a business partner with `ContactEmployees` or a bare contact list.
    fn get_contact_list(&self, payload: &Value) -> Result<Collection<Contact>, ErpError> {
        let partner = Record::new(payload, Entity::Customer, self.settings.field_mapper.as_ref());
        if partner.has_key("ContactEmployees") {
            let customer_code = partner.text("code", &["CardCode"]);
            let contacts: Vec<Contact> = partner
                .children(Entity::Contact, &["ContactEmployees"])
                .iter()
                .map(|contact| map_contact(contact, customer_code.clone()))
                .collect();
            return Ok(Collection::new(contacts));
        }
        Ok(self.collection(payload, Entity::Contact, |record| map_contact(record, None)))
    }

    fn get_shipping_locations(
        &self,
        payload: &Value,
    ) -> Result<Collection<ShippingLocation>, ErpError> {
        let partner = Record::new(payload, Entity::Customer, self.settings.field_mapper.as_ref());
        if partner.has_key("BPAddresses") {
            let default_ship_to = partner.text("default_ship_to", &["ShipToDefault"]);
            let customer_code = partner.text("code", &["CardCode"]);
            let locations = ship_to_addresses(&partner, default_ship_to.as_deref())
                .into_iter()
                .map(|mut location| {
                    location.customer_code = location.customer_code.or(customer_code.clone());
                    location
                })
                .collect();
            return Ok(Collection::new(locations));
        }

        let locations = list_items(payload, &[])
            .into_iter()
            .map(|item| {
                Record::new(
                    item,
                    Entity::ShippingLocation,
                    self.settings.field_mapper.as_ref(),
                )
            })
            .filter(is_ship_to)
            .map(|record| map_address_row(&record, None))
            .collect();
        Ok(Collection::new(locations)
            .with_total_count(count_hint(payload, &COUNT_KEYS))
            .with_next_page(next_link(payload, &NEXT_KEYS)))
    }

    fn get_order_list(&self, payload: &Value) -> Result<Collection<Order>, ErpError> {
        Ok(self.collection(payload, Entity::Order, |record| self.map_order(record)))
    }

    fn get_order_detail(&self, payload: &Value) -> Result<Order, ErpError> {
        let record = detail_record(payload, &[], Entity::Order, &self.settings);
        Ok(self.map_order(&record))
    }

    fn build_order_request(&self, draft: &OrderDraft) -> Result<Value, ErpError> {
        ensure_draft_lines(draft)?;

        let lines: Vec<Value> = draft
            .lines
            .iter()
            .map(|line| {
                let mut body = Map::new();
                body.insert(String::from("ItemCode"), json!(line.product_code));
                body.insert(String::from("Quantity"), number(line.quantity));
                put(&mut body, "UnitPrice", line.unit_price.map(number));
                put(&mut body, "DiscountPercent", line.discount_percent.map(number));
                put(
                    &mut body,
                    "ItemDescription",
                    line.description.clone().map(Value::from),
                );
                put(
                    &mut body,
                    "WarehouseCode",
                    line.warehouse_code.clone().map(Value::from),
                );
                put(
                    &mut body,
                    "ShipDate",
                    line.delivery_date.map(|date| Value::from(date.to_iso_string())),
                );
                Value::Object(body)
            })
            .collect();

        // Service Layer rejects orders without a due date.
        let due_date = draft.delivery_date.or(draft.order_date);

        let mut body = Map::new();
        body.insert(String::from("CardCode"), json!(draft.customer_code));
        put(&mut body, "NumAtCard", draft.reference.clone().map(Value::from));
        put(
            &mut body,
            "DocDate",
            draft.order_date.map(|date| Value::from(date.to_iso_string())),
        );
        put(
            &mut body,
            "DocDueDate",
            due_date.map(|date| Value::from(date.to_iso_string())),
        );
        put(
            &mut body,
            "DocCurrency",
            draft
                .currency
                .as_ref()
                .map(|code| Value::from(code.to_ascii_uppercase())),
        );
        put(
            &mut body,
            "ShipToCode",
            draft.shipping_location_code.clone().map(Value::from),
        );
        body.insert(String::from("DocumentLines"), Value::Array(lines));

        Ok(Value::Object(body))
    }

    fn create_order(&self, payload: &Value) -> Result<OrderConfirmation, ErpError> {
        let record = detail_record(payload, &[], Entity::Order, &self.settings);
        if record.is_empty() {
            return Ok(OrderConfirmation::default());
        }
        let order = self.map_order(&record);
        Ok(OrderConfirmation {
            number: order.number.clone(),
            id: order.id.clone(),
            status: order.status,
            total_incl_vat: order.total_incl_vat.clone(),
            order: Some(order),
        })
    }

    fn get_invoice_list(&self, payload: &Value) -> Result<Collection<Invoice>, ErpError> {
        Ok(self.collection(payload, Entity::Invoice, |record| {
            self.map_invoice(record)
        }))
    }

    fn get_invoice_detail(&self, payload: &Value) -> Result<Invoice, ErpError> {
        let record = detail_record(payload, &[], Entity::Invoice, &self.settings);
        Ok(self.map_invoice(&record))
    }

    fn get_invoice_document(&self, payload: &Value) -> Result<InvoiceDocument, ErpError> {
        let record = Record::new(
            payload,
            Entity::InvoiceDocument,
            self.settings.field_mapper.as_ref(),
        );
        let invoice_number = record.text("invoice_number", &["DocNum", "DocEntry"]);
        let file_name = record
            .text("file_name", &["FileName"])
            .map(|name| match record.text("file_extension", &["FileExtension"]) {
                Some(extension) if !name.contains('.') => format!("{name}.{extension}"),
                _ => name,
            })
            .or_else(|| invoice_number.as_ref().map(|number| format!("{number}.pdf")));

        decode_document(
            invoice_number,
            file_name,
            record.text("content_type", &["ContentType"]),
            record
                .text("content", &["Content", "FileContent", "Base64"])
                .as_deref(),
        )
    }

    fn get_quotation_list(&self, payload: &Value) -> Result<Collection<Quotation>, ErpError> {
        Ok(self.collection(payload, Entity::Quotation, |record| {
            self.map_quotation(record)
        }))
    }

    fn get_quotation_detail(&self, payload: &Value) -> Result<Quotation, ErpError> {
        let record = detail_record(payload, &[], Entity::Quotation, &self.settings);
        Ok(self.map_quotation(&record))
    }

    fn get_warehouse_list(&self, payload: &Value) -> Result<Collection<Warehouse>, ErpError> {
        Ok(self.collection(payload, Entity::Warehouse, map_warehouse))
    }

    fn get_product_price_availability(
        &self,
        payload: &Value,
    ) -> Result<Collection<ProductPriceAvailability>, ErpError> {
        Ok(self.collection(payload, Entity::Product, |record| {
            self.map_price_availability(record)
        }))
    }

    fn get_product_sync(&self, payload: &Value) -> Result<Collection<ProductSync>, ErpError> {
        Ok(self.collection(payload, Entity::Product, |record| self.map_product(record)))
    }

    fn get_campaign_list(&self, payload: &Value) -> Result<Collection<Campaign>, ErpError> {
        Ok(self.collection(payload, Entity::Campaign, map_campaign))
    }
}
