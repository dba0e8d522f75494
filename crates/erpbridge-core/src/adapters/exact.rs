use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

use crate::adapter::{AdapterSettings, CapabilitySet, ErpAdapter, ErpError, Operation};
use crate::adapters::{
    detail_record, ensure_draft_lines, map_items, number, odata_literal, put, require_key,
    resolve_currency,
};
use crate::coerce::{count_hint, next_link, Record};
use crate::document::decode_document;
use crate::field_map::Entity;
use crate::{
    Address, Collection, Contact, Customer, ErpId, Invoice, InvoiceDocument, Money, Order,
    OrderConfirmation, OrderDetail, OrderDraft, OrderStatus, OrderType,
    ProductPriceAvailability, ProductSync, Quotation, QuotationStatus, ShippingLocation,
    Warehouse,
};

const COUNT_KEYS: [&str; 1] = ["__count"];
const NEXT_KEYS: [&str; 1] = ["__next"];
const CURRENCY: [&str; 2] = ["Currency", "SalesCurrency"];
const DELIVERY_ADDRESS_TYPE: i64 = 4;

/// Exact Online REST API (OData v2).
#[derive(Debug, Clone, Default)]
pub struct ExactAdapter {
    settings: AdapterSettings,
}

/// Exact document status codes shared by orders, deliveries and invoicing.
mod status {
    pub const OPEN: i64 = 12;
    pub const PARTIAL: i64 = 20;
    pub const COMPLETE: i64 = 21;
    pub const CANCELLED: i64 = 45;
}

impl ExactAdapter {
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
        Customer {
            code: record.text("code", &["Code"]),
            name: record.text("name", &["Name"]),
            name_2: record.text("name_2", &["SearchCode"]),
            address: map_address(record),
            phone: record.text("phone", &["Phone"]),
            email: record.text("email", &["Email"]),
            vat_number: record.text("vat_number", &["VATNumber"]),
            credit_limit: record.money("credit_limit", &["CreditLineSales"], &currency),
            balance: record.money("balance", &["BalanceSales", "Balance"], &currency),
            blocked: record.flag("blocked", &["Blocked"]),
            payment_terms: record.text("payment_terms", &["PaymentConditionSales"]),
            salesperson: record.text(
                "salesperson",
                &["AccountManagerFullName", "AccountManager"],
            ),
            shipping_locations: record
                .children(Entity::ShippingLocation, &["Addresses"])
                .iter()
                .filter(|row| is_delivery_address(row))
                .map(map_shipping_location)
                .collect(),
            contacts: record
                .children(Entity::Contact, &["Contacts"])
                .iter()
                .map(map_contact)
                .collect(),
            currency: Some(currency),
        }
    }

    fn map_order(&self, record: &Record<'_>) -> Order {
        let currency = resolve_currency(record, &CURRENCY, &self.settings);
        let total_excl_vat = record.money("total_excl_vat", &["AmountFCExclVat"], &currency);
        let total_incl_vat = record.money("total_incl_vat", &["AmountFC"], &currency);
        let order_type = order_type(record, total_excl_vat.as_ref().or(total_incl_vat.as_ref()));

        Order {
            number: record.text("number", &["OrderNumber"]),
            id: record.text("id", &["OrderID"]),
            customer_code: record.text("customer_code", &["OrderedByCode", "OrderedBy"]),
            customer_name: record.text("customer_name", &["OrderedByName"]),
            reference: record.text("reference", &["YourRef", "Description"]),
            order_date: record.date("order_date", &["OrderDate"]),
            delivery_date: record.date("delivery_date", &["DeliveryDate"]),
            status: order_status(record),
            order_type,
            details: record
                .children(Entity::OrderDetail, &["SalesOrderLines"])
                .iter()
                .map(|line| map_line(line, &currency))
                .collect(),
            total_excl_vat,
            total_incl_vat,
            shipping_location_code: record.text(
                "shipping_location_code",
                &["DeliveryAddressCode", "DeliveryAddress"],
            ),
            currency: Some(currency),
        }
    }

    fn map_invoice(&self, record: &Record<'_>) -> Invoice {
        let currency = resolve_currency(record, &CURRENCY, &self.settings);
        let open_amount = record.money(
            "open_amount",
            &["OutstandingAmountFC", "AmountOpenFC"],
            &currency,
        );

        Invoice {
            number: record.text("number", &["InvoiceNumber"]),
            customer_code: record.text(
                "customer_code",
                &["InvoiceToCode", "OrderedByCode", "InvoiceTo", "OrderedBy"],
            ),
            customer_name: record.text("customer_name", &["InvoiceToName", "OrderedByName"]),
            invoice_date: record.date("invoice_date", &["InvoiceDate"]),
            due_date: record.date("due_date", &["DueDate"]),
            order_number: record.text("order_number", &["OrderNumber"]),
            reference: record.text("reference", &["YourRef", "Description"]),
            total_excl_vat: record.money("total_excl_vat", &["AmountFCExclVat"], &currency),
            total_incl_vat: record.money("total_incl_vat", &["AmountFC"], &currency),
            paid: open_amount.as_ref().map(Money::is_zero),
            open_amount,
            details: record
                .children(Entity::OrderDetail, &["SalesInvoiceLines"])
                .iter()
                .map(|line| map_line(line, &currency))
                .collect(),
            currency: Some(currency),
        }
    }

    fn map_quotation(&self, record: &Record<'_>) -> Quotation {
        let currency = resolve_currency(record, &CURRENCY, &self.settings);
        let status = match record.integer("status", &["Status"]) {
            Some(5 | 6) => QuotationStatus::Rejected,
            Some(10 | 20) => QuotationStatus::Draft,
            Some(25 | 35 | 40) => QuotationStatus::Open,
            Some(50) => QuotationStatus::Accepted,
            _ => QuotationStatus::Unknown,
        };

        Quotation {
            number: record.text("number", &["QuotationNumber"]),
            customer_code: record.text(
                "customer_code",
                &["OrderAccountCode", "OrderAccount"],
            ),
            customer_name: record.text("customer_name", &["OrderAccountName"]),
            quotation_date: record.date("quotation_date", &["QuotationDate"]),
            valid_until: record.date("valid_until", &["ClosingDate", "DueDate"]),
            status,
            total_excl_vat: record.money("total_excl_vat", &["AmountFCExclVat"], &currency),
            total_incl_vat: record.money("total_incl_vat", &["AmountFC"], &currency),
            details: record
                .children(Entity::OrderDetail, &["QuotationLines"])
                .iter()
                .map(|line| map_line(line, &currency))
                .collect(),
            currency: Some(currency),
        }
    }

    fn map_price_availability(&self, record: &Record<'_>) -> ProductPriceAvailability {
        let current = record.decimal("current_stock", &["CurrentStock", "Stock"]);
        let reserved = record
            .decimal("reserved_stock", &["ReservedStock"])
            .unwrap_or_default();

        ProductPriceAvailability {
            product_code: record.text("product_code", &["ItemCode", "Code"]),
            description: record.text("description", &["ItemDescription", "Description"]),
            unit: record.text("unit", &["UnitCode", "Unit"]),
            unit_price: record.money(
                "unit_price",
                &["StandardSalesPrice", "SalesPrice", "Price"],
                &self.settings.default_currency,
            ),
            quantity_available: current.and_then(|current| current.checked_sub(reserved)),
            quantity_on_order: record.decimal("quantity_on_order", &["PlannedStockIn"]),
            next_delivery_date: record.date("next_delivery_date", &["PlannedStockInDate"]),
        }
    }

    fn map_product(&self, record: &Record<'_>) -> ProductSync {
        ProductSync {
            code: record.text("code", &["Code"]),
            description: record.text("description", &["Description"]),
            description_2: record.text("description_2", &["ExtraDescription"]),
            unit: record.text("unit", &["Unit", "UnitCode"]),
            unit_price: record.money(
                "unit_price",
                &["StandardSalesPrice", "SalesPrice"],
                &self.settings.default_currency,
            ),
            product_group: record.text("product_group", &["ItemGroupCode"]),
            ean: record.text("ean", &["Barcode"]),
            blocked: record
                .flag("blocked", &["Blocked"])
                .or_else(|| record.flag("is_sales_item", &["IsSalesItem"]).map(|sales| !sales)),
            weight: record.float("weight", &["NetWeight", "GrossWeight"]),
            vendor_code: record.text("vendor_code", &["SupplierCode"]),
            modified_at: record.timestamp("modified_at", &["Modified"]),
        }
    }
}

// ============================================================================
// Record mapping
// ============================================================================

fn map_address(record: &Record<'_>) -> Address {
    Address {
        street: record.text("street", &["AddressLine1"]),
        street_2: record.text("street_2", &["AddressLine2"]),
        postal_code: record.text("postal_code", &["Postcode"]),
        city: record.text("city", &["City"]),
        country: record.text("country", &["Country"]),
    }
}

fn map_contact(record: &Record<'_>) -> Contact {
    Contact {
        code: record.text("code", &["ID"]),
        customer_code: record.text("customer_code", &["AccountCode", "Account"]),
        name: record.text("name", &["FullName"]),
        first_name: record.text("first_name", &["FirstName"]),
        last_name: record.text("last_name", &["LastName"]),
        email: record.text("email", &["Email"]),
        phone: record.text("phone", &["BusinessPhone", "Phone"]),
        mobile: record.text("mobile", &["BusinessMobile", "Mobile"]),
        job_title: record.text("job_title", &["JobTitleDescription"]),
    }
}

fn is_delivery_address(record: &Record<'_>) -> bool {
    record
        .integer("address_type", &["Type"])
        .map_or(true, |kind| kind == DELIVERY_ADDRESS_TYPE)
}

fn map_shipping_location(record: &Record<'_>) -> ShippingLocation {
    ShippingLocation {
        code: record.text("code", &["ID"]),
        customer_code: record.text("customer_code", &["AccountCode", "Account"]),
        name: record.text("name", &["ContactName", "AccountName"]),
        address: map_address(record),
        phone: record.text("phone", &["Phone"]),
        is_default: record.flag("is_default", &["Main"]),
    }
}

fn map_line(record: &Record<'_>, currency: &str) -> OrderDetail {
    let product_code = record.text("product_code", &["ItemCode", "Item"]);
    let quantity = record.decimal("quantity", &["Quantity"]);
    let delivered = record.decimal("quantity_delivered", &["QuantityDelivered"]);
    // Discount is a fraction: 0.1 means 10 %.
    let discount_percent = record
        .decimal("discount_percent", &["Discount"])
        .and_then(|fraction| fraction.checked_mul(Decimal::ONE_HUNDRED))
        .map(|percent| percent.normalize());
    let is_text_line = product_code.is_none()
        && quantity.map_or(true, |quantity| quantity.is_zero())
        && record.text("description", &["Description"]).is_some();

    OrderDetail {
        line_number: record.integer("line_number", &["LineNumber"]),
        description: record.text("description", &["ItemDescription", "Description"]),
        unit: record.text("unit", &["UnitCode", "Unit"]),
        unit_price: record.money("unit_price", &["NetPrice", "UnitPrice"], currency),
        discount_percent,
        line_total: record.money("line_total", &["AmountFC"], currency),
        quantity_delivered: delivered,
        quantity_outstanding: match (quantity, delivered) {
            (Some(quantity), Some(delivered)) => quantity.checked_sub(delivered),
            _ => None,
        },
        warehouse_code: record.text("warehouse_code", &["WarehouseCode", "Warehouse"]),
        delivery_date: record.date("delivery_date", &["DeliveryDate"]),
        is_text_line,
        product_code,
        quantity,
    }
}

fn map_warehouse(record: &Record<'_>) -> Warehouse {
    Warehouse {
        code: record.text("code", &["Code"]),
        name: record.text("name", &["Description"]),
        address: map_address(record),
        is_default: record.flag("is_default", &["Main"]),
        active: None,
    }
}

fn order_status(record: &Record<'_>) -> OrderStatus {
    let order = record.integer("status", &["Status"]);
    let delivery = record.integer("delivery_status", &["DeliveryStatus"]);
    let invoice = record.integer("invoice_status", &["InvoiceStatus"]);

    match order {
        Some(status::CANCELLED) => OrderStatus::Cancelled,
        Some(status::COMPLETE) if invoice == Some(status::COMPLETE) => OrderStatus::Invoiced,
        Some(status::COMPLETE) if delivery == Some(status::COMPLETE) => OrderStatus::Shipped,
        Some(status::COMPLETE) => OrderStatus::Completed,
        Some(status::PARTIAL) => OrderStatus::PartiallyShipped,
        _ => match delivery {
            Some(status::COMPLETE) => OrderStatus::Shipped,
            Some(status::PARTIAL) => OrderStatus::PartiallyShipped,
            _ if order == Some(status::OPEN) => OrderStatus::Open,
            _ => OrderStatus::Unknown,
        },
    }
}

/// Exact has no document type; credit orders are entered with negative amounts.
fn order_type(record: &Record<'_>, total: Option<&Money>) -> OrderType {
    match total {
        Some(total) if total.amount.is_sign_negative() && !total.amount.is_zero() => {
            OrderType::Return
        }
        Some(_) => OrderType::Standard,
        None if record.text("number", &["OrderNumber"]).is_some() => OrderType::Standard,
        None => OrderType::Unknown,
    }
}

fn guid_literal(key: &str) -> String {
    format!("guid{}", odata_literal(key))
}

// ============================================================================
// Adapter contract
// ============================================================================

impl ErpAdapter for ExactAdapter {
    fn id(&self) -> ErpId {
        ErpId::Exact
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::full().without(Operation::GetCampaignList)
    }

    fn endpoint(&self, operation: Operation, key: Option<&str>) -> Result<String, ErpError> {
        let path = match operation {
            Operation::GetCustomerList => {
                String::from("crm/Accounts?$filter=IsSales%20eq%20true&$inlinecount=allpages")
            }
            Operation::GetCustomer => format!(
                "crm/Accounts({})",
                guid_literal(require_key(operation, key)?)
            ),
            Operation::GetContactList => format!(
                "crm/Contacts?$filter=Account%20eq%20{}",
                guid_literal(require_key(operation, key)?)
            ),
            Operation::GetShippingLocations => format!(
                "crm/Addresses?$filter=Account%20eq%20{}%20and%20Type%20eq%20{DELIVERY_ADDRESS_TYPE}",
                guid_literal(require_key(operation, key)?)
            ),
            Operation::GetOrderList => String::from(
                "salesorder/SalesOrders?$expand=SalesOrderLines&$inlinecount=allpages",
            ),
            Operation::GetOrderDetail => format!(
                "salesorder/SalesOrders({})?$expand=SalesOrderLines",
                guid_literal(require_key(operation, key)?)
            ),
            Operation::BuildOrderRequest | Operation::CreateOrder => {
                String::from("salesorder/SalesOrders")
            }
            Operation::GetInvoiceList => {
                String::from("salesinvoice/SalesInvoices?$inlinecount=allpages")
            }
            Operation::GetInvoiceDetail => format!(
                "salesinvoice/SalesInvoices({})?$expand=SalesInvoiceLines",
                guid_literal(require_key(operation, key)?)
            ),
            Operation::GetInvoiceDocument => format!(
                "documents/DocumentAttachments?$filter=Document%20eq%20{}",
                guid_literal(require_key(operation, key)?)
            ),
            Operation::GetQuotationList => String::from("crm/Quotations?$inlinecount=allpages"),
            Operation::GetQuotationDetail => format!(
                "crm/Quotations({})?$expand=QuotationLines",
                guid_literal(require_key(operation, key)?)
            ),
            Operation::GetWarehouseList => String::from("inventory/Warehouses"),
            Operation::GetProductPriceAvailability => String::from("inventory/ItemWarehouses"),
            Operation::GetProductSync => String::from("logistics/Items?$inlinecount=allpages"),
            Operation::GetCampaignList => {
                return Err(ErpError::unsupported_operation(self.id(), operation));
            }
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

    fn get_contact_list(&self, payload: &Value) -> Result<Collection<Contact>, ErpError> {
        Ok(self.collection(payload, Entity::Contact, map_contact))
    }

    fn get_shipping_locations(
        &self,
        payload: &Value,
    ) -> Result<Collection<ShippingLocation>, ErpError> {
        let rows = self.collection(payload, Entity::ShippingLocation, |record| {
            is_delivery_address(record).then(|| map_shipping_location(record))
        });
        let row_count = rows.items.len();
        let items: Vec<ShippingLocation> = rows.items.into_iter().flatten().collect();
        // Vendor counts include the postal and invoice addresses dropped here.
        let total_count = match (items.len() == row_count, &rows.next_page) {
            (true, _) => rows.total_count,
            (false, None) => u64::try_from(items.len()).ok(),
            (false, Some(_)) => None,
        };
        Ok(Collection {
            items,
            total_count,
            next_page: rows.next_page,
        })
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
                body.insert(String::from("Item"), json!(line.product_code));
                body.insert(String::from("Quantity"), number(line.quantity));
                put(&mut body, "NetPrice", line.unit_price.map(number));
                put(
                    &mut body,
                    "Discount",
                    line.discount_percent
                        .map(|percent| number(percent / Decimal::ONE_HUNDRED)),
                );
                put(&mut body, "Description", line.description.clone().map(Value::from));
                put(
                    &mut body,
                    "DeliveryDate",
                    line.delivery_date.map(|date| Value::from(date.to_iso_string())),
                );
                Value::Object(body)
            })
            .collect();

        // Exact sets the warehouse on the order header.
        let warehouse = draft
            .lines
            .iter()
            .find_map(|line| line.warehouse_code.clone());

        let mut body = Map::new();
        body.insert(String::from("OrderedBy"), json!(draft.customer_code));
        put(&mut body, "YourRef", draft.reference.clone().map(Value::from));
        put(
            &mut body,
            "OrderDate",
            draft.order_date.map(|date| Value::from(date.to_iso_string())),
        );
        put(
            &mut body,
            "DeliveryDate",
            draft.delivery_date.map(|date| Value::from(date.to_iso_string())),
        );
        put(
            &mut body,
            "Currency",
            draft
                .currency
                .as_ref()
                .map(|code| Value::from(code.to_ascii_uppercase())),
        );
        put(
            &mut body,
            "DeliveryAddress",
            draft.shipping_location_code.clone().map(Value::from),
        );
        put(&mut body, "Warehouse", warehouse.map(Value::from));
        body.insert(String::from("SalesOrderLines"), Value::Array(lines));

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
        let record = detail_record(payload, &[], Entity::InvoiceDocument, &self.settings);
        let invoice_number = record.text("invoice_number", &["InvoiceNumber", "DocumentNumber"]);

        decode_document(
            invoice_number,
            record.text("file_name", &["FileName"]),
            record.text("content_type", &["ContentType"]),
            record
                .text("content", &["Attachment", "AttachmentContent", "Data"])
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
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;

    use super::*;
    use crate::adapter::ErpErrorKind;
    use crate::{BusinessDate, OrderDraftLine};

    fn adapter() -> ExactAdapter {
        ExactAdapter::default()
    }

    fn dec(input: &str) -> Decimal {
        Decimal::from_str(input).expect("literal decimal")
    }

    #[test]
    fn status_codes_derive_order_status() {
        let exact = adapter();
        let status = |payload: Value| exact.get_order_detail(&payload).expect("order").status;

        assert_eq!(status(json!({"d": {"Status": 12}})), OrderStatus::Open);
        assert_eq!(status(json!({"d": {"Status": 20}})), OrderStatus::PartiallyShipped);
        assert_eq!(
            status(json!({"d": {"Status": 21, "DeliveryStatus": 21}})),
            OrderStatus::Shipped
        );
        assert_eq!(
            status(json!({"d": {"Status": 21, "DeliveryStatus": 21, "InvoiceStatus": 21}})),
            OrderStatus::Invoiced
        );
        assert_eq!(status(json!({"d": {"Status": 45}})), OrderStatus::Cancelled);
        assert_eq!(
            status(json!({"d": {"Status": 12, "DeliveryStatus": 20}})),
            OrderStatus::PartiallyShipped
        );
    }

    #[test]
    fn negative_total_is_return_order() {
        let order = adapter()
            .get_order_detail(&json!({"d": {"OrderNumber": 7, "AmountFC": -121.0}}))
            .expect("order");
        assert_eq!(order.order_type, OrderType::Return);

        let order = adapter()
            .get_order_detail(&json!({"d": {"OrderNumber": 8, "AmountFC": 121.0}}))
            .expect("order");
        assert_eq!(order.order_type, OrderType::Standard);
    }

    #[test]
    fn discount_fraction_becomes_percent_and_codes_are_trimmed() {
        let order = adapter()
            .get_order_detail(&json!({"d": {
                "OrderNumber": 1,
                "OrderDate": "/Date(1705276800000)/",
                "SalesOrderLines": {"results": [
                    {"LineNumber": 1, "ItemCode": "      A100", "Quantity": 4, "Discount": 0.1,
                     "QuantityDelivered": 1}
                ]}
            }}))
            .expect("order");

        assert_eq!(
            order.order_date,
            Some(BusinessDate::from_ymd(2024, 1, 15).expect("date"))
        );
        let line = &order.details[0];
        assert_eq!(line.product_code.as_deref(), Some("A100"));
        assert_eq!(line.discount_percent, Some(dec("10")));
        assert_eq!(line.quantity_outstanding, Some(dec("3")));
    }

    #[test]
    fn campaigns_are_unsupported() {
        let exact = adapter();
        assert!(!exact.capabilities().supports(Operation::GetCampaignList));

        let err = exact.get_campaign_list(&json!({})).expect_err("unsupported");
        assert_eq!(err.kind(), ErpErrorKind::UnsupportedOperation);

        let err = exact
            .endpoint(Operation::GetCampaignList, None)
            .expect_err("unsupported");
        assert_eq!(err.kind(), ErpErrorKind::UnsupportedOperation);
    }

    #[test]
    fn order_request_writes_discount_as_fraction() {
        let draft = OrderDraft {
            customer_code: String::from("5b7e6f4a-0000-0000-0000-000000000001"),
            lines: vec![OrderDraftLine {
                product_code: String::from("A100"),
                quantity: dec("2"),
                discount_percent: Some(dec("15")),
                warehouse_code: Some(String::from("MAIN")),
                ..OrderDraftLine::default()
            }],
            ..OrderDraft::default()
        };

        let body = adapter().build_order_request(&draft).expect("body");
        assert_eq!(body["SalesOrderLines"][0]["Discount"], json!(0.15));
        assert_eq!(body["Warehouse"], json!("MAIN"));
    }

    #[test]
    fn only_delivery_addresses_are_shipping_locations() {
        let locations = adapter()
            .get_shipping_locations(&json!({"d": {"results": [
                {"ID": "a", "Type": 1, "City": "Delft"},
                {"ID": "b", "Type": 4, "City": "Gouda", "Main": true}
            ]}}))
            .expect("locations");
        assert_eq!(locations.len(), 1);
        assert_eq!(locations.items[0].code.as_deref(), Some("b"));
        assert_eq!(locations.items[0].is_default, Some(true));
    }

    #[test]
    fn shipping_location_count_follows_the_filter() {
        let exact = adapter();

        let last_page = exact
            .get_shipping_locations(&json!({"d": {"__count": "3", "results": [
                {"ID": "a", "Type": 1},
                {"ID": "b", "Type": 4},
                {"ID": "c", "Type": 3}
            ]}}))
            .expect("locations");
        assert_eq!(last_page.len(), 1);
        assert_eq!(last_page.total_count, Some(1));

        let paged = exact
            .get_shipping_locations(&json!({"d": {
                "__count": "40",
                "__next": "https://start.exactonline.nl/api/v1/1/crm/Addresses?$skiptoken=guid'x'",
                "results": [{"ID": "a", "Type": 1}, {"ID": "b", "Type": 4}]
            }}))
            .expect("locations");
        assert_eq!(paged.len(), 1);
        assert_eq!(paged.total_count, None);

        let unfiltered = exact
            .get_shipping_locations(&json!({"d": {"__count": "2", "results": [
                {"ID": "a", "Type": 4},
                {"ID": "b", "Type": 4}
            ]}}))
            .expect("locations");
        assert_eq!(unfiltered.total_count, Some(2));
    }

    #[test]
    fn out_of_range_line_values_read_as_absent() {
        let exact = adapter();

        let order = exact
            .get_order_detail(&json!({"d": {"SalesOrderLines": {"results": [{
                "ItemCode": "A",
                "Discount": 1e27,
                "Quantity": "79228162514264337593543950335",
                "QuantityDelivered": "-1"
            }]}}}))
            .expect("order");
        let line = &order.details[0];
        assert_eq!(line.discount_percent, None);
        assert_eq!(line.quantity_outstanding, None);
        assert_eq!(line.quantity_delivered, Some(dec("-1")));

        let products = exact
            .get_product_price_availability(&json!({"d": {"results": [{
                "Code": "A",
                "CurrentStock": "79228162514264337593543950335",
                "ReservedStock": "-1"
            }]}}))
            .expect("availability");
        assert_eq!(products.items[0].product_code.as_deref(), Some("A"));
        assert_eq!(products.items[0].quantity_available, None);
    }
}
