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
    Address, Campaign, Collection, Contact, Customer, ErpId, Invoice, InvoiceDocument, Order,
    OrderConfirmation, OrderDetail, OrderDraft, OrderStatus, OrderType, ProductPriceAvailability,
    ProductSync, Quotation, QuotationStatus, ShippingLocation, Warehouse,
};

const COUNT_KEYS: [&str; 1] = ["@odata.count"];
const NEXT_KEYS: [&str; 1] = ["@odata.nextLink"];
const CURRENCY: [&str; 1] = ["Currency_Code"];
const LINE_NUMBER_STEP: i64 = 10_000;

/// Dynamics NAV / Business Central OData v4 web services.
#[derive(Debug, Clone, Default)]
pub struct NavisionAdapter {
    settings: AdapterSettings,
}

impl NavisionAdapter {
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
            code: record.text("code", &["No"]),
            name: record.text("name", &["Name"]),
            name_2: record.text("name_2", &["Name_2"]),
            address: map_address(record),
            phone: record.text("phone", &["Phone_No"]),
            email: record.text("email", &["E_Mail", "Email"]),
            vat_number: record.text("vat_number", &["VAT_Registration_No"]),
            // Credit limit and balance are always posted in local currency.
            credit_limit: record.money(
                "credit_limit",
                &["Credit_Limit_LCY"],
                &self.settings.default_currency,
            ),
            balance: record.money(
                "balance",
                &["Balance_LCY", "Balance"],
                &self.settings.default_currency,
            ),
            blocked: map_blocked(record),
            payment_terms: record.text("payment_terms", &["Payment_Terms_Code"]),
            salesperson: record.text("salesperson", &["Salesperson_Code"]),
            shipping_locations: record
                .children(Entity::ShippingLocation, &["ShipToAddresses", "Ship_to_Addresses"])
                .iter()
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
        let details = record
            .children(Entity::OrderDetail, &["SalesLines", "SalesOrderLines"])
            .iter()
            .map(|line| map_line(line, &currency))
            .collect();

        Order {
            number: record.text("number", &["No"]),
            id: record.text("id", &["SystemId", "Id"]),
            customer_code: record.text("customer_code", &["Sell_to_Customer_No"]),
            customer_name: record.text("customer_name", &["Sell_to_Customer_Name"]),
            reference: record.text(
                "reference",
                &["External_Document_No", "Your_Reference"],
            ),
            order_date: record.date("order_date", &["Order_Date", "Document_Date"]),
            delivery_date: record.date(
                "delivery_date",
                &["Requested_Delivery_Date", "Promised_Delivery_Date", "Shipment_Date"],
            ),
            status: order_status(record),
            order_type: order_type(record),
            total_excl_vat: record.money("total_excl_vat", &["Amount"], &currency),
            total_incl_vat: record.money(
                "total_incl_vat",
                &["Amount_Including_VAT"],
                &currency,
            ),
            shipping_location_code: record.text("shipping_location_code", &["Ship_to_Code"]),
            currency: Some(currency),
            details,
        }
    }

    fn map_invoice(&self, record: &Record<'_>) -> Invoice {
        let currency = resolve_currency(record, &CURRENCY, &self.settings);
        let open_amount = record.money("open_amount", &["Remaining_Amount"], &currency);
        let paid = record
            .flag("paid", &["Closed", "Paid"])
            .or_else(|| open_amount.as_ref().map(|amount| amount.is_zero()));
        let details = record
            .children(
                Entity::OrderDetail,
                &["SalesInvLines", "SalesInvoiceLines", "SalesLines"],
            )
            .iter()
            .map(|line| map_line(line, &currency))
            .collect();

        Invoice {
            number: record.text("number", &["No"]),
            customer_code: record.text("customer_code", &["Sell_to_Customer_No"]),
            customer_name: record.text("customer_name", &["Sell_to_Customer_Name"]),
            invoice_date: record.date("invoice_date", &["Posting_Date", "Document_Date"]),
            due_date: record.date("due_date", &["Due_Date"]),
            order_number: record.text("order_number", &["Order_No"]),
            reference: record.text(
                "reference",
                &["External_Document_No", "Your_Reference"],
            ),
            total_excl_vat: record.money("total_excl_vat", &["Amount"], &currency),
            total_incl_vat: record.money(
                "total_incl_vat",
                &["Amount_Including_VAT"],
                &currency,
            ),
            currency: Some(currency),
            open_amount,
            paid,
            details,
        }
    }

    fn map_quotation(&self, record: &Record<'_>) -> Quotation {
        let currency = resolve_currency(record, &CURRENCY, &self.settings);
        let details = record
            .children(Entity::OrderDetail, &["SalesLines", "SalesQuoteLines"])
            .iter()
            .map(|line| map_line(line, &currency))
            .collect();

        Quotation {
            number: record.text("number", &["No"]),
            customer_code: record.text("customer_code", &["Sell_to_Customer_No"]),
            customer_name: record.text("customer_name", &["Sell_to_Customer_Name"]),
            quotation_date: record.date("quotation_date", &["Document_Date", "Order_Date"]),
            valid_until: record.date("valid_until", &["Quote_Valid_Until_Date"]),
            status: quotation_status(record),
            total_excl_vat: record.money("total_excl_vat", &["Amount"], &currency),
            total_incl_vat: record.money(
                "total_incl_vat",
                &["Amount_Including_VAT"],
                &currency,
            ),
            currency: Some(currency),
            details,
        }
    }

    fn map_price_availability(&self, record: &Record<'_>) -> ProductPriceAvailability {
        let inventory = record.decimal("inventory", &["Inventory"]);
        let reserved = record.decimal("quantity_reserved", &["Qty_on_Sales_Order"]);
        let computed = match (inventory, reserved) {
            (Some(inventory), Some(reserved)) => inventory.checked_sub(reserved),
            (inventory, _) => inventory,
        };

        ProductPriceAvailability {
            product_code: record.text("product_code", &["No", "Item_No"]),
            description: record.text("description", &["Description"]),
            unit: record.text("unit", &["Base_Unit_of_Measure", "Sales_Unit_of_Measure"]),
            unit_price: record.money(
                "unit_price",
                &["Unit_Price"],
                &self.settings.default_currency,
            ),
            quantity_available: record
                .decimal("quantity_available", &["Available_Inventory", "Projected_Available"])
                .or(computed),
            quantity_on_order: record.decimal("quantity_on_order", &["Qty_on_Purch_Order"]),
            next_delivery_date: record.date(
                "next_delivery_date",
                &["Next_Receipt_Date", "Expected_Receipt_Date"],
            ),
        }
    }

    fn map_product(&self, record: &Record<'_>) -> ProductSync {
        ProductSync {
            code: record.text("code", &["No"]),
            description: record.text("description", &["Description"]),
            description_2: record.text("description_2", &["Description_2"]),
            unit: record.text("unit", &["Base_Unit_of_Measure"]),
            unit_price: record.money(
                "unit_price",
                &["Unit_Price"],
                &self.settings.default_currency,
            ),
            product_group: record.text(
                "product_group",
                &["Item_Category_Code", "Product_Group_Code"],
            ),
            ean: record.text("ean", &["GTIN"]),
            blocked: record.flag("blocked", &["Blocked"]),
            weight: record.float("weight", &["Net_Weight", "Gross_Weight"]),
            vendor_code: record.text("vendor_code", &["Vendor_No"]),
            modified_at: record.timestamp(
                "modified_at",
                &["Last_DateTime_Modified", "SystemModifiedAt", "Last_Date_Modified"],
            ),
        }
    }
}

// ============================================================================
// Record mapping
// ============================================================================

fn map_address(record: &Record<'_>) -> Address {
    Address {
        street: record.text("street", &["Address"]),
        street_2: record.text("street_2", &["Address_2"]),
        postal_code: record.text("postal_code", &["Post_Code"]),
        city: record.text("city", &["City"]),
        country: record.text("country", &["Country_Region_Code"]),
    }
}

/// `Blocked` is an option field: blank, `Ship`, `Invoice` or `All`.
fn map_blocked(record: &Record<'_>) -> Option<bool> {
    match record.text("blocked", &["Blocked"]) {
        Some(value) => Some(!value.eq_ignore_ascii_case("false")),
        None if record.has_key("Blocked") => Some(false),
        None => None,
    }
}

fn map_contact(record: &Record<'_>) -> Contact {
    Contact {
        code: record.text("code", &["No"]),
        customer_code: record.text("customer_code", &["Customer_No", "Company_No"]),
        name: record.text("name", &["Name"]),
        first_name: record.text("first_name", &["First_Name"]),
        last_name: record.text("last_name", &["Surname"]),
        email: record.text("email", &["E_Mail", "Email"]),
        phone: record.text("phone", &["Phone_No"]),
        mobile: record.text("mobile", &["Mobile_Phone_No"]),
        job_title: record.text("job_title", &["Job_Title"]),
    }
}

fn map_shipping_location(record: &Record<'_>) -> ShippingLocation {
    ShippingLocation {
        code: record.text("code", &["Code"]),
        customer_code: record.text("customer_code", &["Customer_No"]),
        name: record.text("name", &["Name"]),
        address: map_address(record),
        phone: record.text("phone", &["Phone_No"]),
        is_default: record.flag("is_default", &["Default"]),
    }
}

fn map_line(record: &Record<'_>, currency: &str) -> OrderDetail {
    // Comment lines carry a blank `Type`.
    let is_text_line = match record.text("line_type", &["Type"]) {
        Some(kind) => kind.eq_ignore_ascii_case("comment"),
        None => record.has_key("Type"),
    };

    OrderDetail {
        line_number: record.integer("line_number", &["Line_No"]),
        product_code: record.text("product_code", &["No"]),
        description: record.text("description", &["Description"]),
        quantity: record.decimal("quantity", &["Quantity"]),
        unit: record.text("unit", &["Unit_of_Measure_Code", "Unit_of_Measure"]),
        unit_price: record.money("unit_price", &["Unit_Price"], currency),
        discount_percent: record.decimal("discount_percent", &["Line_Discount_Percent"]),
        line_total: record.money("line_total", &["Line_Amount", "Amount"], currency),
        quantity_delivered: record.decimal("quantity_delivered", &["Quantity_Shipped"]),
        quantity_outstanding: record.decimal("quantity_outstanding", &["Outstanding_Quantity"]),
        warehouse_code: record.text("warehouse_code", &["Location_Code"]),
        delivery_date: record.date(
            "delivery_date",
            &["Planned_Delivery_Date", "Shipment_Date"],
        ),
        is_text_line,
    }
}

fn map_warehouse(record: &Record<'_>) -> Warehouse {
    Warehouse {
        code: record.text("code", &["Code"]),
        name: record.text("name", &["Name"]),
        address: map_address(record),
        is_default: record.flag("is_default", &["Default"]),
        active: record.flag("blocked", &["Blocked"]).map(|blocked| !blocked),
    }
}

fn map_campaign(record: &Record<'_>) -> Campaign {
    Campaign {
        code: record.text("code", &["No"]),
        name: record.text("name", &["Description"]),
        description: record.text("description", &["Status_Code"]),
        starts_on: record.date("starts_on", &["Starting_Date"]),
        ends_on: record.date("ends_on", &["Ending_Date"]),
        active: record.flag("active", &["Activated"]),
    }
}

fn order_status(record: &Record<'_>) -> OrderStatus {
    if record.flag("completely_shipped", &["Completely_Shipped"]) == Some(true) {
        return OrderStatus::Shipped;
    }
    if record.flag("shipped", &["Shipped"]) == Some(true) {
        return OrderStatus::PartiallyShipped;
    }
    match record.text("status", &["Status"]).as_deref() {
        Some("Released") => OrderStatus::Confirmed,
        Some("Open" | "Pending Approval" | "Pending Prepayment") => OrderStatus::Open,
        _ => OrderStatus::Unknown,
    }
}

fn order_type(record: &Record<'_>) -> OrderType {
    match record.text("order_type", &["Document_Type"]).as_deref() {
        Some("Order") => OrderType::Standard,
        Some("Return Order") => OrderType::Return,
        Some("Credit Memo") => OrderType::Credit,
        Some("Blanket Order") => OrderType::Blanket,
        Some("Quote") => OrderType::Quote,
        _ => OrderType::Unknown,
    }
}

fn quotation_status(record: &Record<'_>) -> QuotationStatus {
    if record.flag("accepted", &["Quote_Accepted"]) == Some(true) {
        return QuotationStatus::Accepted;
    }
    match record.text("status", &["Status"]).as_deref() {
        Some("Open" | "Pending Approval") => QuotationStatus::Draft,
        Some("Released") => QuotationStatus::Open,
        _ => QuotationStatus::Unknown,
    }
}

// ============================================================================
// Adapter contract
// ============================================================================

impl ErpAdapter for NavisionAdapter {
    fn id(&self) -> ErpId {
        ErpId::Navision
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::full()
    }

    fn endpoint(&self, operation: Operation, key: Option<&str>) -> Result<String, ErpError> {
        let path = match operation {
            Operation::GetCustomerList => String::from("Customers"),
            Operation::GetCustomer => format!(
                "Customers({})?$expand=ShipToAddresses,Contacts",
                odata_literal(require_key(operation, key)?)
            ),
            Operation::GetContactList => format!(
                "Contacts?$filter=Customer_No%20eq%20{}",
                odata_literal(require_key(operation, key)?)
            ),
            Operation::GetShippingLocations => format!(
                "ShipToAddresses?$filter=Customer_No%20eq%20{}",
                odata_literal(require_key(operation, key)?)
            ),
            Operation::GetOrderList => String::from("SalesOrders?$count=true"),
            Operation::GetOrderDetail => format!(
                "SalesOrders('Order',{})?$expand=SalesLines",
                odata_literal(require_key(operation, key)?)
            ),
            Operation::BuildOrderRequest | Operation::CreateOrder => {
                String::from("SalesOrders?$expand=SalesLines")
            }
            Operation::GetInvoiceList => String::from("PostedSalesInvoices?$count=true"),
            Operation::GetInvoiceDetail => format!(
                "PostedSalesInvoices({})?$expand=SalesInvLines",
                odata_literal(require_key(operation, key)?)
            ),
            Operation::GetInvoiceDocument => format!(
                "PostedSalesInvoices({})/NAV.GetPdf",
                odata_literal(require_key(operation, key)?)
            ),
            Operation::GetQuotationList => String::from("SalesQuotes?$count=true"),
            Operation::GetQuotationDetail => format!(
                "SalesQuotes('Quote',{})?$expand=SalesLines",
                odata_literal(require_key(operation, key)?)
            ),
            Operation::GetWarehouseList => String::from("Locations"),
            Operation::GetProductPriceAvailability => String::from("ItemAvailability"),
            Operation::GetProductSync => String::from("Items?$count=true"),
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

    fn get_contact_list(&self, payload: &Value) -> Result<Collection<Contact>, ErpError> {
        Ok(self.collection(payload, Entity::Contact, map_contact))
    }

    fn get_shipping_locations(
        &self,
        payload: &Value,
    ) -> Result<Collection<ShippingLocation>, ErpError> {
        Ok(self.collection(payload, Entity::ShippingLocation, map_shipping_location))
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
            .zip(1_i64..)
            .map(|(line, index)| {
                let mut body = Map::new();
                body.insert(String::from("Line_No"), json!(index * LINE_NUMBER_STEP));
                body.insert(String::from("Type"), json!("Item"));
                body.insert(String::from("No"), json!(line.product_code));
                body.insert(String::from("Quantity"), number(line.quantity));
                put(&mut body, "Unit_Price", line.unit_price.map(number));
                put(
                    &mut body,
                    "Line_Discount_Percent",
                    line.discount_percent.map(number),
                );
                put(&mut body, "Description", line.description.clone().map(Value::from));
                put(
                    &mut body,
                    "Location_Code",
                    line.warehouse_code.clone().map(Value::from),
                );
                put(
                    &mut body,
                    "Shipment_Date",
                    line.delivery_date.map(|date| Value::from(date.to_iso_string())),
                );
                Value::Object(body)
            })
            .collect();

        let mut body = Map::new();
        body.insert(
            String::from("Sell_to_Customer_No"),
            json!(draft.customer_code),
        );
        put(
            &mut body,
            "External_Document_No",
            draft.reference.clone().map(Value::from),
        );
        put(
            &mut body,
            "Order_Date",
            draft.order_date.map(|date| Value::from(date.to_iso_string())),
        );
        put(
            &mut body,
            "Requested_Delivery_Date",
            draft.delivery_date.map(|date| Value::from(date.to_iso_string())),
        );
        // NAV leaves Currency_Code blank for local currency.
        put(
            &mut body,
            "Currency_Code",
            draft
                .currency
                .as_ref()
                .filter(|code| !code.eq_ignore_ascii_case(&self.settings.default_currency))
                .map(|code| Value::from(code.to_ascii_uppercase())),
        );
        put(
            &mut body,
            "Ship_to_Code",
            draft.shipping_location_code.clone().map(Value::from),
        );
        body.insert(String::from("SalesLines"), Value::Array(lines));

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
        let invoice_number = record.text("invoice_number", &["No", "Document_No"]);
        let file_name = record
            .text("file_name", &["File_Name", "FileName"])
            .or_else(|| invoice_number.as_ref().map(|number| format!("{number}.pdf")));
        let content = record.text("content", &["PdfBase64", "Content", "value"]);

        decode_document(
            invoice_number,
            file_name,
            record.text("content_type", &["Content_Type", "MimeType"]),
            content.as_deref(),
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
