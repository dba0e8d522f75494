//! Golden payloads per vendor, mapped through the public adapter API.
//!
//! Fixtures live under `tests/fixtures/<adapter>/` and mirror responses as the
//! vendors return them (Visma XML already decoded into nested values).

use std::path::PathBuf;
use std::str::FromStr;

use erpbridge_core::{
    adapter_for, AdapterSettings, BusinessDate, ErpId, OrderStatus, OrderType, QuotationStatus,
};
use rust_decimal::Decimal;
use serde_json::Value;

fn fixture(adapter: &str, name: &str) -> Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .join(adapter)
        .join(format!("{name}.json"));
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|error| panic!("fixture {} unreadable: {error}", path.display()));
    serde_json::from_str(&text).expect("fixture is valid JSON")
}

fn dec(input: &str) -> Decimal {
    Decimal::from_str(input).expect("literal decimal")
}

fn date(year: i32, month: u8, day: u8) -> Option<BusinessDate> {
    Some(BusinessDate::from_ymd(year, month, day).expect("literal date"))
}

// ============================================================================
// Dynamics NAV / Business Central
// ============================================================================

#[test]
fn navision_customer_list_maps_odata_collection() {
    // Given: a Business Central customer page with count and next link
    let adapter = adapter_for(ErpId::Navision, AdapterSettings::default());
    let payload = fixture("navision", "customer_list");

    // When: the customer list is mapped
    let customers = adapter.get_customer_list(&payload).expect("customer list");

    // Then: paging hints and both customers are carried over
    assert_eq!(customers.len(), 2);
    assert_eq!(customers.total_count, Some(2));
    assert_eq!(
        customers.next_page.as_deref(),
        Some("https://bc.example/ODataV4/Customers?$skiptoken=20000")
    );

    let cannon = &customers.items[0];
    assert_eq!(cannon.code.as_deref(), Some("10000"));
    assert_eq!(cannon.address.city.as_deref(), Some("Birmingham"));
    assert_eq!(cannon.address.country.as_deref(), Some("GB"));
    assert_eq!(cannon.email.as_deref(), Some("info@cannon.example"));
    assert_eq!(cannon.currency.as_deref(), Some("EUR"));
    assert_eq!(cannon.blocked, Some(false));
    let balance = cannon.balance.as_ref().expect("balance");
    assert_eq!(balance.amount, dec("168364.40"));
    assert_eq!(balance.currency, "EUR");

    let selangorian = &customers.items[1];
    assert_eq!(selangorian.currency.as_deref(), Some("USD"));
    assert_eq!(selangorian.blocked, Some(true));
    assert!(selangorian.address.is_empty());
}

#[test]
fn navision_order_detail_maps_lines_and_comment_rows() {
    // Given: a released sales order with an item line and a comment line
    let adapter = adapter_for(ErpId::Navision, AdapterSettings::default());
    let payload = fixture("navision", "order_detail");

    // When: the order detail is mapped
    let order = adapter.get_order_detail(&payload).expect("order detail");

    // Then: header fields follow the vendor document
    assert_eq!(order.number.as_deref(), Some("101005"));
    assert_eq!(order.customer_code.as_deref(), Some("10000"));
    assert_eq!(order.reference.as_deref(), Some("PO-4411"));
    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(order.order_type, OrderType::Standard);
    assert_eq!(order.order_date, date(2024, 3, 5));
    assert_eq!(order.delivery_date, None, "0001-01-01 reads as unset");
    assert_eq!(order.shipping_location_code.as_deref(), Some("MAIN"));

    let total = order.total_incl_vat.as_ref().expect("total");
    assert_eq!(total.amount, dec("1563.13"));
    assert_eq!(total.currency, "USD");

    // And: the comment row is kept as a text line
    assert_eq!(order.details.len(), 2);
    let desk = &order.details[0];
    assert_eq!(desk.line_number, Some(10000));
    assert_eq!(desk.product_code.as_deref(), Some("1896-S"));
    assert_eq!(desk.quantity, Some(dec("2")));
    assert_eq!(desk.warehouse_code.as_deref(), Some("EAST"));
    assert_eq!(desk.delivery_date, date(2024, 3, 12));
    assert!(!desk.is_text_line);

    let comment = &order.details[1];
    assert!(comment.is_text_line);
    assert_eq!(
        comment.description.as_deref(),
        Some("Deliver via the loading dock")
    );
}

#[test]
fn navision_quotation_list_maps_status_and_currency() {
    // Given: a released quote in local currency and an accepted quote in USD
    let adapter = adapter_for(ErpId::Navision, AdapterSettings::default());
    let payload = fixture("navision", "quotation_list");

    // When: the quotation list is mapped
    let quotations = adapter.get_quotation_list(&payload).expect("quotation list");

    // Then: the acceptance flag wins over the release status
    assert_eq!(quotations.len(), 2);
    assert_eq!(quotations.total_count, Some(2));

    let released = &quotations.items[0];
    assert_eq!(released.number.as_deref(), Some("1001"));
    assert_eq!(released.status, QuotationStatus::Open);
    assert_eq!(released.quotation_date, date(2024, 2, 12));
    assert_eq!(released.valid_until, date(2024, 3, 12));
    assert_eq!(released.currency.as_deref(), Some("EUR"));
    let total = released.total_incl_vat.as_ref().expect("total incl vat");
    assert_eq!(total.amount, dec("5225"));
    assert_eq!(total.currency, "EUR");

    let accepted = &quotations.items[1];
    assert_eq!(accepted.status, QuotationStatus::Accepted);
    assert_eq!(accepted.valid_until, None);
    let net = accepted.total_excl_vat.as_ref().expect("total excl vat");
    assert_eq!(net.amount, dec("912.75"));
    assert_eq!(net.currency, "USD");
}

#[test]
fn navision_quotation_detail_maps_lines() {
    // Given: an open quote in GBP with an item line and a comment line
    let adapter = adapter_for(ErpId::Navision, AdapterSettings::default());
    let payload = fixture("navision", "quotation_detail");

    // When: the quotation detail is mapped
    let quotation = adapter.get_quotation_detail(&payload).expect("quotation detail");

    // Then: an open quote is still a draft and lines carry the document currency
    assert_eq!(quotation.number.as_deref(), Some("1003"));
    assert_eq!(quotation.customer_name.as_deref(), Some("Selangorian Ltd."));
    assert_eq!(quotation.status, QuotationStatus::Draft);
    assert_eq!(
        quotation.total_excl_vat.as_ref().map(|money| money.currency.as_str()),
        Some("GBP")
    );
    assert_eq!(quotation.details.len(), 2);

    let lamp = &quotation.details[0];
    assert_eq!(lamp.line_number, Some(10000));
    assert_eq!(lamp.quantity, Some(dec("20")));
    assert_eq!(lamp.warehouse_code.as_deref(), Some("BLUE"));
    let price = lamp.unit_price.as_ref().expect("unit price");
    assert_eq!(price.amount, dec("75"));
    assert_eq!(price.currency, "GBP");
    assert!(!lamp.is_text_line);

    assert!(quotation.details[1].is_text_line);
}

#[test]
fn navision_campaign_list_maps_activation() {
    // Given: an activated campaign and an inactive one without an end date
    let adapter = adapter_for(ErpId::Navision, AdapterSettings::default());
    let payload = fixture("navision", "campaign_list");

    // When: the campaign list is mapped
    let campaigns = adapter.get_campaign_list(&payload).expect("campaign list");

    // Then: the description becomes the name and placeholder dates read as absent
    assert_eq!(campaigns.len(), 2);
    let fair = &campaigns.items[0];
    assert_eq!(fair.code.as_deref(), Some("CP1001"));
    assert_eq!(fair.name.as_deref(), Some("Spring furniture fair"));
    assert_eq!(fair.description.as_deref(), Some("ACTIVE"));
    assert_eq!(fair.starts_on, date(2024, 3, 1));
    assert_eq!(fair.ends_on, date(2024, 4, 30));
    assert_eq!(fair.active, Some(true));

    let clearance = &campaigns.items[1];
    assert_eq!(clearance.description, None);
    assert_eq!(clearance.ends_on, None);
    assert_eq!(clearance.active, Some(false));
}

#[test]
fn navision_contact_list_maps_names_and_company() {
    // Given: a contact page with a next link
    let adapter = adapter_for(ErpId::Navision, AdapterSettings::default());
    let payload = fixture("navision", "contact_list");

    // When: the contact list is mapped
    let contacts = adapter.get_contact_list(&payload).expect("contact list");

    // Then: the customer number is preferred over the company number
    assert_eq!(contacts.len(), 2);
    assert_eq!(
        contacts.next_page.as_deref(),
        Some("https://bc.example/ODataV4/Contacts?$skiptoken=CT000020")
    );

    let mindy = &contacts.items[0];
    assert_eq!(mindy.customer_code.as_deref(), Some("10000"));
    assert_eq!(mindy.last_name.as_deref(), Some("Martin"));
    assert_eq!(mindy.job_title.as_deref(), Some("Purchasing Manager"));
    assert_eq!(mindy.mobile, None);

    let andy = &contacts.items[1];
    assert_eq!(andy.customer_code.as_deref(), Some("10000"));
    assert_eq!(andy.email, None);
    assert_eq!(andy.mobile.as_deref(), Some("+44-(0)77 0012 3456"));
}

#[test]
fn navision_invoice_detail_maps_open_amount() {
    // Given: a posted USD invoice that is partly paid
    let adapter = adapter_for(ErpId::Navision, AdapterSettings::default());
    let payload = fixture("navision", "invoice_detail");

    // When: the invoice detail is mapped
    let invoice = adapter.get_invoice_detail(&payload).expect("invoice detail");

    // Then: the posting date is the invoice date and the remaining amount stays open
    assert_eq!(invoice.number.as_deref(), Some("103017"));
    assert_eq!(invoice.invoice_date, date(2024, 3, 8));
    assert_eq!(invoice.due_date, date(2024, 4, 7));
    assert_eq!(invoice.order_number.as_deref(), Some("101005"));
    assert_eq!(invoice.reference.as_deref(), Some("PO-4411"));
    assert_eq!(invoice.paid, Some(false));
    let open = invoice.open_amount.as_ref().expect("open amount");
    assert_eq!(open.amount, dec("563.13"));
    assert_eq!(open.currency, "USD");
    assert_eq!(
        invoice.total_incl_vat.as_ref().map(|money| money.amount),
        Some(dec("1563.13"))
    );

    assert_eq!(invoice.details.len(), 1);
    assert_eq!(invoice.details[0].product_code.as_deref(), Some("1896-S"));
    assert_eq!(
        invoice.details[0].line_total.as_ref().map(|money| money.amount),
        Some(dec("1250.5"))
    );
}

#[test]
fn navision_product_sync_normalizes_timestamps() {
    // Given: an item modified in a +01:00 zone and a blocked item never modified
    let adapter = adapter_for(ErpId::Navision, AdapterSettings::default());
    let payload = fixture("navision", "product_sync");

    // When: the product sync page is mapped
    let products = adapter.get_product_sync(&payload).expect("product sync");

    // Then: timestamps land in UTC and year-one placeholders read as absent
    assert_eq!(products.len(), 2);

    let desk = &products.items[0];
    assert_eq!(desk.code.as_deref(), Some("1896-S"));
    assert_eq!(desk.description_2.as_deref(), Some("Oak veneer"));
    assert_eq!(desk.product_group.as_deref(), Some("FURNITURE"));
    assert_eq!(desk.ean.as_deref(), Some("5701234000017"));
    assert_eq!(desk.blocked, Some(false));
    assert_eq!(desk.weight, Some(32.5));
    let price = desk.unit_price.as_ref().expect("unit price");
    assert_eq!(price.amount, dec("1000.8"));
    assert_eq!(price.currency, "EUR");
    assert_eq!(
        desk.modified_at.map(|at| at.format_rfc3339()).as_deref(),
        Some("2024-03-14T09:12:45Z")
    );

    let chair = &products.items[1];
    assert_eq!(chair.blocked, Some(true));
    assert_eq!(chair.ean, None);
    assert_eq!(chair.modified_at, None);
}

// ============================================================================
// SAP Business One
// ============================================================================

#[test]
fn sap_order_list_derives_status_and_net_total() {
    // Given: an open SAP order with a partly delivered line and a text line
    let adapter = adapter_for(ErpId::SapB1, AdapterSettings::default());
    let payload = fixture("sap_b1", "order_list");

    // When: the order list is mapped
    let orders = adapter.get_order_list(&payload).expect("order list");

    // Then: status reflects the delivered quantity and the net total is derived
    assert_eq!(orders.len(), 1);
    assert_eq!(orders.next_page.as_deref(), Some("Orders?$skip=20"));

    let order = &orders.items[0];
    assert_eq!(order.number.as_deref(), Some("1205"));
    assert_eq!(order.id.as_deref(), Some("412"));
    assert_eq!(order.status, OrderStatus::PartiallyShipped);
    assert_eq!(order.order_type, OrderType::Standard);
    assert_eq!(
        order.total_excl_vat.as_ref().map(|money| money.amount),
        Some(dec("1000"))
    );
    assert_eq!(order.currency.as_deref(), Some("USD"));

    let line = &order.details[0];
    assert_eq!(line.quantity_outstanding, Some(dec("4")));
    assert_eq!(line.quantity_delivered, Some(dec("6")));
    assert_eq!(line.warehouse_code.as_deref(), Some("01"));

    let note = order.details.last().expect("text line");
    assert!(note.is_text_line);
    assert_eq!(note.description.as_deref(), Some("Fragile, handle with care"));
}

#[test]
fn sap_price_availability_uses_configured_price_list() {
    // Given: an item with two price lists and stock in two warehouses
    let payload = fixture("sap_b1", "product_price_availability");
    let settings = AdapterSettings {
        price_list: 2,
        ..AdapterSettings::default()
    };
    let adapter = adapter_for(ErpId::SapB1, settings);

    // When: availability is mapped
    let products = adapter
        .get_product_price_availability(&payload)
        .expect("availability");

    // Then: price comes from list 2 and stock is summed across warehouses
    let item = &products.items[0];
    assert_eq!(item.product_code.as_deref(), Some("A00001"));
    let price = item.unit_price.as_ref().expect("price");
    assert_eq!(price.amount, dec("360"));
    assert_eq!(price.currency, "USD");
    assert_eq!(item.quantity_available, Some(dec("1030")));
    assert_eq!(item.quantity_on_order, Some(dec("50")));
}

#[test]
fn sap_quotation_list_maps_status_and_net_total() {
    // Given: an open EUR quotation and a cancelled USD quotation
    let adapter = adapter_for(ErpId::SapB1, AdapterSettings::default());
    let payload = fixture("sap_b1", "quotation_list");

    // When: the quotation list is mapped
    let quotations = adapter.get_quotation_list(&payload).expect("quotation list");

    // Then: cancellation wins over the closed status and VAT is subtracted
    assert_eq!(quotations.len(), 2);
    assert_eq!(quotations.total_count, Some(2));
    assert_eq!(quotations.next_page.as_deref(), Some("Quotations?$skip=20"));

    let open = &quotations.items[0];
    assert_eq!(open.number.as_deref(), Some("331"));
    assert_eq!(open.status, QuotationStatus::Open);
    assert_eq!(open.quotation_date, date(2024, 2, 5));
    assert_eq!(open.valid_until, date(2024, 3, 5));
    let net = open.total_excl_vat.as_ref().expect("total excl vat");
    assert_eq!(net.amount, dec("1000"));
    assert_eq!(net.currency, "EUR");

    let cancelled = &quotations.items[1];
    assert_eq!(cancelled.status, QuotationStatus::Rejected);
    assert_eq!(cancelled.currency.as_deref(), Some("USD"));
    assert_eq!(
        cancelled.total_excl_vat.as_ref().map(|money| money.amount),
        Some(dec("499.99"))
    );
}

#[test]
fn sap_quotation_detail_merges_text_lines() {
    // Given: a closed quotation with one item line and one special text line
    let adapter = adapter_for(ErpId::SapB1, AdapterSettings::default());
    let payload = fixture("sap_b1", "quotation_detail");

    // When: the quotation detail is mapped
    let quotation = adapter.get_quotation_detail(&payload).expect("quotation detail");

    // Then: a closed quotation is accepted and text lines follow the item lines
    assert_eq!(quotation.status, QuotationStatus::Accepted);
    assert_eq!(
        quotation.total_excl_vat.as_ref().map(|money| money.amount),
        Some(dec("300"))
    );
    assert_eq!(quotation.details.len(), 2);

    let printer = &quotation.details[0];
    assert_eq!(printer.product_code.as_deref(), Some("A00001"));
    assert_eq!(printer.quantity_outstanding, Some(dec("2")));
    assert_eq!(printer.quantity_delivered, Some(Decimal::ZERO));
    let total = printer.line_total.as_ref().expect("line total");
    assert_eq!(total.amount, dec("300"));
    assert_eq!(total.currency, "EUR");

    let note = &quotation.details[1];
    assert!(note.is_text_line);
    assert_eq!(note.description.as_deref(), Some("Valid for delivery in Q2"));
}

#[test]
fn sap_campaign_list_reads_open_status_as_active() {
    // Given: an open trade show campaign and a finished mailing
    let adapter = adapter_for(ErpId::SapB1, AdapterSettings::default());
    let payload = fixture("sap_b1", "campaign_list");

    // When: the campaign list is mapped
    let campaigns = adapter.get_campaign_list(&payload).expect("campaign list");

    // Then: only the open campaign is active
    assert_eq!(campaigns.len(), 2);
    let show = &campaigns.items[0];
    assert_eq!(show.code.as_deref(), Some("4"));
    assert_eq!(show.name.as_deref(), Some("Trade show 2024"));
    assert_eq!(show.description.as_deref(), Some("Booth 12B"));
    assert_eq!(show.starts_on, date(2024, 4, 8));
    assert_eq!(show.ends_on, date(2024, 4, 12));
    assert_eq!(show.active, Some(true));

    let mailing = &campaigns.items[1];
    assert_eq!(mailing.description, None);
    assert_eq!(mailing.active, Some(false));
}

#[test]
fn sap_contact_list_inherits_partner_code() {
    // Given: a business partner with two contact employees
    let adapter = adapter_for(ErpId::SapB1, AdapterSettings::default());
    let payload = fixture("sap_b1", "contact_list");

    // When: the contact list is mapped
    let contacts = adapter.get_contact_list(&payload).expect("contact list");

    // Then: every contact carries the partner's card code
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts.total_count, None);
    assert!(contacts
        .iter()
        .all(|contact| contact.customer_code.as_deref() == Some("C20000")));

    let carol = &contacts.items[0];
    assert_eq!(carol.code.as_deref(), Some("11"));
    assert_eq!(carol.email.as_deref(), Some("carol.elm@maxi-teq.example"));
    assert_eq!(carol.phone.as_deref(), Some("+1 212 555 0101"));
    assert_eq!(carol.job_title.as_deref(), Some("Buyer"));

    let dan = &contacts.items[1];
    assert_eq!(dan.email, None);
    assert_eq!(dan.mobile.as_deref(), Some("+1 917 555 0199"));
}

#[test]
fn sap_invoice_detail_derives_open_amount_and_base_order() {
    // Given: an open invoice copied from sales order 412 with a partial payment
    let adapter = adapter_for(ErpId::SapB1, AdapterSettings::default());
    let payload = fixture("sap_b1", "invoice_detail");

    // When: the invoice detail is mapped
    let invoice = adapter.get_invoice_detail(&payload).expect("invoice detail");

    // Then: the open amount is total minus paid and the base document is the order
    assert_eq!(invoice.number.as_deref(), Some("2044"));
    assert_eq!(invoice.reference.as_deref(), Some("PO-77"));
    assert_eq!(invoice.order_number.as_deref(), Some("412"));
    assert_eq!(invoice.invoice_date, date(2024, 2, 20));
    assert_eq!(invoice.due_date, date(2024, 3, 21));
    let open = invoice.open_amount.as_ref().expect("open amount");
    assert_eq!(open.amount, dec("405"));
    assert_eq!(open.currency, "EUR");
    assert_eq!(invoice.paid, Some(false));
    assert_eq!(
        invoice.total_excl_vat.as_ref().map(|money| money.amount),
        Some(dec("500"))
    );
    assert_eq!(invoice.details.len(), 1);
}

#[test]
fn sap_product_sync_combines_update_date_and_time() {
    // Given: a sellable item priced in list 1 and a frozen item priced only in list 2
    let adapter = adapter_for(ErpId::SapB1, AdapterSettings::default());
    let payload = fixture("sap_b1", "product_sync");

    // When: the product sync page is mapped
    let products = adapter.get_product_sync(&payload).expect("product sync");

    // Then: the configured price list is used and update time joins the date
    assert_eq!(products.len(), 2);
    assert_eq!(products.total_count, Some(2));

    let printer = &products.items[0];
    assert_eq!(printer.code.as_deref(), Some("A00001"));
    assert_eq!(printer.description_2.as_deref(), Some("Imprimante 1420"));
    assert_eq!(printer.product_group.as_deref(), Some("100"));
    assert_eq!(printer.ean.as_deref(), Some("0012345678905"));
    assert_eq!(printer.blocked, Some(false));
    assert_eq!(printer.weight, Some(4.2));
    assert_eq!(printer.vendor_code.as_deref(), Some("V10000"));
    let price = printer.unit_price.as_ref().expect("unit price");
    assert_eq!(price.amount, dec("160"));
    assert_eq!(price.currency, "EUR");
    assert_eq!(
        printer.modified_at.map(|at| at.format_rfc3339()).as_deref(),
        Some("2024-03-18T14:25:10Z")
    );

    let frozen = &products.items[1];
    assert_eq!(frozen.blocked, Some(true));
    assert_eq!(frozen.unit_price, None);
    assert_eq!(
        frozen.modified_at.map(|at| at.format_rfc3339()).as_deref(),
        Some("2024-01-09T00:00:00Z")
    );
}

// ============================================================================
// Exact Online
// ============================================================================

#[test]
fn exact_invoice_list_reads_odata_v2_envelope() {
    // Given: an OData v2 invoice page with /Date()/ values and inline lines
    let adapter = adapter_for(ErpId::Exact, AdapterSettings::default());
    let payload = fixture("exact", "invoice_list");

    // When: the invoice list is mapped
    let invoices = adapter.get_invoice_list(&payload).expect("invoice list");

    // Then: count, dates, padded codes and fractional discounts are normalized
    assert_eq!(invoices.total_count, Some(1));
    assert!(invoices.next_page.is_some());

    let invoice = &invoices.items[0];
    assert_eq!(invoice.number.as_deref(), Some("20240017"));
    assert_eq!(invoice.customer_code.as_deref(), Some("400"));
    assert_eq!(invoice.invoice_date, date(2024, 3, 1));
    assert_eq!(invoice.due_date, date(2024, 3, 31));
    assert_eq!(invoice.order_number.as_deref(), Some("17"));
    assert_eq!(invoice.paid, Some(true));

    let line = &invoice.details[0];
    assert_eq!(line.product_code.as_deref(), Some("BEER01"));
    assert_eq!(line.discount_percent, Some(dec("10")));
    assert_eq!(line.unit.as_deref(), Some("crate"));
}

#[test]
fn exact_customer_keeps_only_delivery_addresses() {
    // Given: an account with a delivery address, a postal address and deferred contacts
    let adapter = adapter_for(ErpId::Exact, AdapterSettings::default());
    let payload = fixture("exact", "customer");

    // When: the customer detail is mapped
    let customer = adapter.get_customer(&payload).expect("customer");

    // Then: only the delivery address becomes a shipping location
    assert_eq!(customer.code.as_deref(), Some("400"));
    assert_eq!(customer.vat_number.as_deref(), Some("NL001234567B01"));
    assert_eq!(
        customer.credit_limit.as_ref().map(|money| money.amount),
        Some(dec("5000"))
    );
    assert_eq!(customer.blocked, Some(false));
    assert_eq!(customer.shipping_locations.len(), 1);
    assert_eq!(customer.shipping_locations[0].code.as_deref(), Some("a-1"));
    assert_eq!(customer.shipping_locations[0].is_default, Some(true));
    assert!(customer.contacts.is_empty());
}

#[test]
fn exact_quotation_list_maps_numeric_status() {
    // Given: a draft EUR quotation and an accepted USD quotation with deferred lines
    let adapter = adapter_for(ErpId::Exact, AdapterSettings::default());
    let payload = fixture("exact", "quotation_list");

    // When: the quotation list is mapped
    let quotations = adapter.get_quotation_list(&payload).expect("quotation list");

    // Then: status codes map and the due date stands in for a missing closing date
    assert_eq!(quotations.len(), 2);
    assert_eq!(quotations.total_count, Some(2));

    let draft = &quotations.items[0];
    assert_eq!(draft.number.as_deref(), Some("10045"));
    assert_eq!(draft.customer_code.as_deref(), Some("400"));
    assert_eq!(draft.status, QuotationStatus::Draft);
    assert_eq!(draft.quotation_date, date(2024, 3, 1));
    assert_eq!(draft.valid_until, date(2024, 3, 31));
    assert!(draft.details.is_empty());
    let total = draft.total_incl_vat.as_ref().expect("total incl vat");
    assert_eq!(total.amount, dec("907.5"));
    assert_eq!(total.currency, "EUR");

    let accepted = &quotations.items[1];
    assert_eq!(accepted.status, QuotationStatus::Accepted);
    assert_eq!(accepted.valid_until, date(2024, 3, 31));
    assert_eq!(
        accepted.total_excl_vat.as_ref().map(|money| money.currency.as_str()),
        Some("USD")
    );
}

#[test]
fn exact_quotation_detail_unwraps_single_result() {
    // Given: an OData v2 quotation detail with expanded lines
    let adapter = adapter_for(ErpId::Exact, AdapterSettings::default());
    let payload = fixture("exact", "quotation_detail");

    // When: the quotation detail is mapped
    let quotation = adapter.get_quotation_detail(&payload).expect("quotation detail");

    // Then: the quotation is open and fractional discounts become percentages
    assert_eq!(quotation.number.as_deref(), Some("10047"));
    assert_eq!(quotation.status, QuotationStatus::Open);
    assert_eq!(
        quotation.total_incl_vat.as_ref().map(|money| money.amount),
        Some(dec("114.95"))
    );
    assert_eq!(quotation.details.len(), 1);

    let beer = &quotation.details[0];
    assert_eq!(beer.discount_percent, Some(dec("5")));
    let price = beer.unit_price.as_ref().expect("unit price");
    assert_eq!(price.amount, dec("20"));
    assert_eq!(price.currency, "EUR");
}

#[test]
fn exact_contact_list_trims_account_codes() {
    // Given: two contacts of a padded account code
    let adapter = adapter_for(ErpId::Exact, AdapterSettings::default());
    let payload = fixture("exact", "contact_list");

    // When: the contact list is mapped
    let contacts = adapter.get_contact_list(&payload).expect("contact list");

    // Then: codes are trimmed and blank values read as absent
    assert_eq!(contacts.len(), 2);
    let anke = &contacts.items[0];
    assert_eq!(anke.code.as_deref(), Some("c7a1b2d3-0001-4c4c-9a9a-111122223333"));
    assert_eq!(anke.customer_code.as_deref(), Some("400"));
    assert_eq!(anke.name.as_deref(), Some("Anke de Vries"));
    assert_eq!(anke.phone.as_deref(), Some("+31 20 555 0101"));
    assert_eq!(anke.job_title.as_deref(), Some("Inkoper"));

    let joost = &contacts.items[1];
    assert_eq!(joost.email, None);
    assert_eq!(joost.mobile.as_deref(), Some("+31 6 5555 0102"));
}

#[test]
fn exact_invoice_detail_keeps_outstanding_amount_open() {
    // Given: an unpaid USD invoice with an item line and a text line
    let adapter = adapter_for(ErpId::Exact, AdapterSettings::default());
    let payload = fixture("exact", "invoice_detail");

    // When: the invoice detail is mapped
    let invoice = adapter.get_invoice_detail(&payload).expect("invoice detail");

    // Then: an outstanding amount means unpaid and the text line is flagged
    assert_eq!(invoice.number.as_deref(), Some("20240018"));
    assert_eq!(invoice.customer_code.as_deref(), Some("512"));
    assert_eq!(invoice.reference.as_deref(), Some("Fust retour"));
    assert_eq!(invoice.paid, Some(false));
    let open = invoice.open_amount.as_ref().expect("open amount");
    assert_eq!(open.amount, dec("108.9"));
    assert_eq!(open.currency, "USD");

    assert_eq!(invoice.details.len(), 2);
    assert_eq!(invoice.details[0].discount_percent, Some(dec("10")));
    assert!(!invoice.details[0].is_text_line);
    let note = &invoice.details[1];
    assert!(note.is_text_line);
    assert_eq!(note.description.as_deref(), Some("Levering via achteringang"));
}

#[test]
fn exact_product_sync_reads_sales_item_flag() {
    // Given: a sales item and a non-sales item with a year-one modification date
    let adapter = adapter_for(ErpId::Exact, AdapterSettings::default());
    let payload = fixture("exact", "product_sync");

    // When: the product sync page is mapped
    let products = adapter.get_product_sync(&payload).expect("product sync");

    // Then: non-sales items are blocked and placeholder timestamps read as absent
    assert_eq!(products.len(), 2);
    assert!(products.next_page.is_some());

    let beer = &products.items[0];
    assert_eq!(beer.code.as_deref(), Some("BEER01"));
    assert_eq!(beer.description_2.as_deref(), Some("Krat inclusief statiegeld"));
    assert_eq!(beer.product_group.as_deref(), Some("DRANK"));
    assert_eq!(beer.vendor_code.as_deref(), Some("2001"));
    assert_eq!(beer.blocked, Some(false));
    assert_eq!(beer.weight, Some(14.5));
    assert_eq!(
        beer.unit_price.as_ref().map(|money| money.amount),
        Some(dec("20"))
    );
    assert_eq!(
        beer.modified_at.map(|at| at.format_rfc3339()).as_deref(),
        Some("2024-03-14T09:12:45Z")
    );

    let keg = &products.items[1];
    assert_eq!(keg.blocked, Some(true));
    assert_eq!(keg.weight, None);
    assert_eq!(
        keg.unit_price.as_ref().map(|money| money.is_zero()),
        Some(true)
    );
    assert_eq!(keg.modified_at, None);
}

// ============================================================================
// Visma
// ============================================================================

#[test]
fn visma_order_list_reads_decoded_xml() {
    // Given: a decoded XML order list with attributes and text nodes
    let adapter = adapter_for(ErpId::Visma, AdapterSettings::default());
    let payload = fixture("visma", "order_list");

    // When: the order list is mapped
    let orders = adapter.get_order_list(&payload).expect("order list");

    // Then: both orders are mapped and the count attribute is honored
    assert_eq!(orders.len(), 2);
    assert_eq!(orders.total_count, Some(2));

    let order = &orders.items[0];
    assert_eq!(order.id.as_deref(), Some("ORD-7781"));
    assert_eq!(order.order_date, date(2024, 3, 18));
    assert_eq!(order.status, OrderStatus::PartiallyShipped);
    assert_eq!(order.order_type, OrderType::Standard);
    assert_eq!(
        order.total_excl_vat.as_ref().map(|money| money.amount),
        Some(dec("1234.50"))
    );

    let flour = &order.details[0];
    assert_eq!(flour.quantity, Some(dec("10")));
    assert_eq!(flour.unit_price.as_ref().map(|m| m.amount), Some(dec("123.45")));
    assert_eq!(flour.quantity_outstanding, Some(dec("4")));

    let note = &order.details[1];
    assert!(note.is_text_line);
    assert_eq!(note.description.as_deref(), Some("Achterom leveren"));

    let cancelled = &orders.items[1];
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.order_type, OrderType::Return);
}

#[test]
fn visma_single_warehouse_is_a_one_item_list() {
    // Given: a warehouse list with a single child element
    let adapter = adapter_for(ErpId::Visma, AdapterSettings::default());
    let payload = fixture("visma", "warehouses");

    // When: the warehouse list is mapped
    let warehouses = adapter.get_warehouse_list(&payload).expect("warehouses");

    // Then: the lone object is treated as one item
    assert_eq!(warehouses.len(), 1);
    let warehouse = &warehouses.items[0];
    assert_eq!(warehouse.code.as_deref(), Some("HQ"));
    assert_eq!(warehouse.address.postal_code.as_deref(), Some("3542 AD"));
    assert_eq!(warehouse.is_default, Some(true));
    assert_eq!(warehouse.active, Some(true));
}

#[test]
fn visma_quotation_list_keeps_inline_currency() {
    // Given: an open EUR quotation and an expired quotation priced in SEK
    let adapter = adapter_for(ErpId::Visma, AdapterSettings::default());
    let payload = fixture("visma", "quotation_list");

    // When: the quotation list is mapped
    let quotations = adapter.get_quotation_list(&payload).expect("quotation list");

    // Then: status codes map and amount prefixes win over the document currency
    assert_eq!(quotations.len(), 2);
    assert_eq!(quotations.total_count, Some(2));

    let open = &quotations.items[0];
    assert_eq!(open.number.as_deref(), Some("Q-3101"));
    assert_eq!(open.status, QuotationStatus::Open);
    assert_eq!(open.quotation_date, date(2024, 3, 4));
    assert_eq!(open.valid_until, date(2024, 4, 4));
    let total = open.total_incl_vat.as_ref().expect("total incl vat");
    assert_eq!(total.amount, dec("2964.50"));
    assert_eq!(total.currency, "EUR");

    let expired = &quotations.items[1];
    assert_eq!(expired.status, QuotationStatus::Expired);
    assert_eq!(expired.currency.as_deref(), Some("EUR"));
    let net = expired.total_excl_vat.as_ref().expect("total excl vat");
    assert_eq!(net.amount, dec("9800"));
    assert_eq!(net.currency, "SEK");
}

#[test]
fn visma_quotation_detail_maps_text_lines() {
    // Given: an accepted quotation with an item line and a text line
    let adapter = adapter_for(ErpId::Visma, AdapterSettings::default());
    let payload = fixture("visma", "quotation_detail");

    // When: the quotation detail is mapped
    let quotation = adapter.get_quotation_detail(&payload).expect("quotation detail");

    // Then: comma decimals are read and the text line is flagged by its attribute
    assert_eq!(quotation.number.as_deref(), Some("Q-3102"));
    assert_eq!(quotation.status, QuotationStatus::Accepted);
    assert_eq!(
        quotation.total_excl_vat.as_ref().map(|money| money.amount),
        Some(dec("246.90"))
    );
    assert_eq!(quotation.details.len(), 2);

    let flour = &quotation.details[0];
    assert_eq!(flour.quantity, Some(dec("2")));
    assert_eq!(flour.discount_percent, Some(Decimal::ZERO));
    let price = flour.unit_price.as_ref().expect("unit price");
    assert_eq!(price.amount, dec("123.45"));
    assert_eq!(price.currency, "EUR");
    assert!(!flour.is_text_line);

    let note = &quotation.details[1];
    assert!(note.is_text_line);
    assert_eq!(
        note.description.as_deref(),
        Some("Prijs geldig bij afname per pallet")
    );
}

#[test]
fn visma_campaign_list_reads_dutch_flags() {
    // Given: an active campaign flagged J and an inactive one with an empty text node
    let adapter = adapter_for(ErpId::Visma, AdapterSettings::default());
    let payload = fixture("visma", "campaign_list");

    // When: the campaign list is mapped
    let campaigns = adapter.get_campaign_list(&payload).expect("campaign list");

    // Then: flags and day-first dates are normalized
    assert_eq!(campaigns.len(), 2);
    let spring = &campaigns.items[0];
    assert_eq!(spring.code.as_deref(), Some("VOORJAAR24"));
    assert_eq!(spring.name.as_deref(), Some("Voorjaarsactie"));
    assert_eq!(spring.starts_on, date(2024, 3, 1));
    assert_eq!(spring.ends_on, date(2024, 5, 31));
    assert_eq!(spring.active, Some(true));

    let christmas = &campaigns.items[1];
    assert_eq!(christmas.description, None);
    assert_eq!(christmas.active, Some(false));
}

#[test]
fn visma_single_contact_is_a_one_item_list() {
    // Given: a contact list with a single child element and a text-node email
    let adapter = adapter_for(ErpId::Visma, AdapterSettings::default());
    let payload = fixture("visma", "contact_list");

    // When: the contact list is mapped
    let contacts = adapter.get_contact_list(&payload).expect("contact list");

    // Then: the lone contact is mapped with its text node unwrapped
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts.total_count, Some(1));
    let marieke = &contacts.items[0];
    assert_eq!(marieke.code.as_deref(), Some("C-17"));
    assert_eq!(marieke.customer_code.as_deref(), Some("K1001"));
    assert_eq!(marieke.email.as_deref(), Some("marieke@degraaf.example"));
    assert_eq!(marieke.job_title.as_deref(), Some("Eigenaar"));
    assert_eq!(marieke.mobile, None);
}

#[test]
fn visma_invoice_detail_derives_paid_from_open_amount() {
    // Given: an invoice with an open amount and a single decoded line element
    let adapter = adapter_for(ErpId::Visma, AdapterSettings::default());
    let payload = fixture("visma", "invoice_detail");

    // When: the invoice detail is mapped
    let invoice = adapter.get_invoice_detail(&payload).expect("invoice detail");

    // Then: a non-zero open amount means unpaid
    assert_eq!(invoice.number.as_deref(), Some("F-24-0311"));
    assert_eq!(invoice.invoice_date, date(2024, 3, 25));
    assert_eq!(invoice.due_date, date(2024, 4, 24));
    assert_eq!(invoice.order_number.as_deref(), Some("7781"));
    assert_eq!(invoice.paid, Some(false));
    let open = invoice.open_amount.as_ref().expect("open amount");
    assert_eq!(open.amount, dec("493.75"));
    assert_eq!(open.currency, "EUR");
    assert_eq!(
        invoice.total_incl_vat.as_ref().map(|money| money.amount),
        Some(dec("1493.75"))
    );

    assert_eq!(invoice.details.len(), 1);
    assert_eq!(invoice.details[0].quantity, Some(dec("10")));
}

#[test]
fn visma_product_sync_reads_paging_attributes() {
    // Given: an article page with count and next attributes on the root element
    let adapter = adapter_for(ErpId::Visma, AdapterSettings::default());
    let payload = fixture("visma", "product_sync");

    // When: the product sync page is mapped
    let products = adapter.get_product_sync(&payload).expect("product sync");

    // Then: paging, comma weights, flags and offset-less timestamps are normalized
    assert_eq!(products.len(), 2);
    assert_eq!(products.total_count, Some(2));
    assert_eq!(products.next_page.as_deref(), Some("articles?page=2"));

    let flour = &products.items[0];
    assert_eq!(flour.code.as_deref(), Some("MEEL-25"));
    assert_eq!(flour.description_2.as_deref(), Some("Type 405"));
    assert_eq!(flour.product_group.as_deref(), Some("GRONDSTOF"));
    assert_eq!(flour.blocked, Some(false));
    assert_eq!(flour.weight, Some(25.0));
    assert_eq!(flour.vendor_code.as_deref(), Some("L220"));
    let price = flour.unit_price.as_ref().expect("unit price");
    assert_eq!(price.amount, dec("24.95"));
    assert_eq!(price.currency, "EUR");
    assert_eq!(
        flour.modified_at.map(|at| at.format_rfc3339()).as_deref(),
        Some("2024-03-18T09:30:00Z")
    );

    let yeast = &products.items[1];
    assert_eq!(yeast.blocked, Some(true));
    assert_eq!(yeast.weight, Some(0.5));
    assert_eq!(yeast.ean, None);
    assert_eq!(
        yeast.modified_at.map(|at| at.format_rfc3339()).as_deref(),
        Some("2024-02-01T07:00:00Z")
    );
}
