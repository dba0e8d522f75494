use std::sync::Arc;

use erpbridge_core::{
    adapter_for, dispatch, AdapterSettings, ErpAdapter, ErpErrorKind, ErpId, Operation,
};
use serde_json::{json, Value};

struct AdapterCase {
    id: ErpId,
    adapter: Arc<dyn ErpAdapter>,
    supports_campaigns: bool,
}

fn adapter_cases() -> Vec<AdapterCase> {
    ErpId::ALL
        .into_iter()
        .map(|id| AdapterCase {
            id,
            adapter: adapter_for(id, AdapterSettings::default()),
            supports_campaigns: id != ErpId::Exact,
        })
        .collect()
}

fn sample_draft() -> Value {
    json!({
        "customer_code": "C-100",
        "reference": "PO-1",
        "order_date": "2024-05-02",
        "currency": "usd",
        "lines": [
            {"product_code": "P-1", "quantity": 3, "unit_price": "12.50"},
            {"product_code": "P-2", "quantity": 1, "discount_percent": 5}
        ]
    })
}

// ============================================================================
// Capabilities
// ============================================================================

#[test]
fn every_adapter_reports_its_own_id() {
    for case in adapter_cases() {
        assert_eq!(case.adapter.id(), case.id, "adapter '{}': id", case.id);
    }
}

#[test]
fn capabilities_cover_all_operations_except_exact_campaigns() {
    for case in adapter_cases() {
        let capabilities = case.adapter.capabilities();
        for operation in Operation::ALL {
            let expected = operation != Operation::GetCampaignList || case.supports_campaigns;
            assert_eq!(
                capabilities.supports(operation),
                expected,
                "adapter '{}': support for '{operation}'",
                case.id
            );
        }
    }
}

// ============================================================================
// Endpoints
// ============================================================================

#[test]
fn supported_operations_resolve_an_endpoint() {
    for case in adapter_cases() {
        for operation in Operation::ALL {
            if !case.adapter.capabilities().supports(operation) {
                continue;
            }
            let path = case
                .adapter
                .endpoint(operation, Some("K-1"))
                .unwrap_or_else(|error| {
                    panic!("adapter '{}': endpoint for '{operation}': {error}", case.id)
                });
            assert!(!path.is_empty(), "adapter '{}': '{operation}' path", case.id);
            assert!(
                !path.starts_with('/'),
                "adapter '{}': '{operation}' path must be relative",
                case.id
            );
        }
    }
}

#[test]
fn keyed_operations_reject_a_missing_key() {
    for case in adapter_cases() {
        for operation in Operation::ALL.into_iter().filter(|op| op.requires_key()) {
            for key in [None, Some("  ")] {
                let error = case
                    .adapter
                    .endpoint(operation, key)
                    .expect_err("keyed endpoint without a key must fail");
                assert_eq!(
                    error.kind(),
                    ErpErrorKind::MalformedPayload,
                    "adapter '{}': '{operation}' with key {key:?}",
                    case.id
                );
            }
        }
    }
}

#[test]
fn keys_are_url_encoded_in_endpoints() {
    for case in adapter_cases() {
        let path = case
            .adapter
            .endpoint(Operation::GetCustomer, Some("A B/1"))
            .expect("customer endpoint");
        assert!(
            !path.contains("A B/1"),
            "adapter '{}': raw key leaked into '{path}'",
            case.id
        );
    }
}

// ============================================================================
// Tolerance of empty payloads
// ============================================================================

#[test]
fn empty_payloads_map_to_empty_results() {
    for case in adapter_cases() {
        for operation in Operation::ALL {
            if matches!(
                operation,
                Operation::BuildOrderRequest | Operation::GetInvoiceDocument
            ) {
                continue;
            }

            for payload in [json!({}), Value::Null, json!([])] {
                let result = dispatch(case.adapter.as_ref(), operation, &payload);
                if !case.adapter.capabilities().supports(operation) {
                    let error = result.expect_err("unsupported operation must fail");
                    assert_eq!(error.kind(), ErpErrorKind::UnsupportedOperation);
                    assert!(!error.retryable());
                    continue;
                }

                let value = result.unwrap_or_else(|error| {
                    panic!(
                        "adapter '{}': '{operation}' with {payload}: {error}",
                        case.id
                    )
                });
                if operation.is_list() {
                    assert_eq!(
                        value["items"],
                        json!([]),
                        "adapter '{}': '{operation}' items",
                        case.id
                    );
                } else {
                    assert!(value.is_object(), "adapter '{}': '{operation}'", case.id);
                }
            }
        }
    }
}

#[test]
fn empty_document_payload_is_an_invalid_document() {
    for case in adapter_cases() {
        let error = dispatch(case.adapter.as_ref(), Operation::GetInvoiceDocument, &json!({}))
            .expect_err("document without content must fail");
        assert_eq!(
            error.kind(),
            ErpErrorKind::InvalidDocument,
            "adapter '{}'",
            case.id
        );
        assert_eq!(error.code(), "erp.invalid_document");
    }
}

#[test]
fn empty_order_confirmation_has_unknown_status() {
    for case in adapter_cases() {
        let value = dispatch(case.adapter.as_ref(), Operation::CreateOrder, &json!({}))
            .expect("empty confirmation");
        assert_eq!(value["status"], json!("unknown"), "adapter '{}'", case.id);
        assert_eq!(value["number"], Value::Null, "adapter '{}'", case.id);
    }
}

// ============================================================================
// Order requests
// ============================================================================

#[test]
fn order_request_carries_customer_and_products() {
    for case in adapter_cases() {
        let body = dispatch(
            case.adapter.as_ref(),
            Operation::BuildOrderRequest,
            &sample_draft(),
        )
        .unwrap_or_else(|error| panic!("adapter '{}': build failed: {error}", case.id));

        assert!(body.is_object(), "adapter '{}': body shape", case.id);
        let rendered = body.to_string();
        for needle in ["C-100", "P-1", "P-2", "PO-1"] {
            assert!(
                rendered.contains(needle),
                "adapter '{}': '{needle}' missing from {rendered}",
                case.id
            );
        }
    }
}

#[test]
fn order_request_rejects_invalid_drafts() {
    let without_lines = json!({"customer_code": "C-100", "lines": []});
    let without_customer = json!({"customer_code": " ", "lines": [{"product_code": "P-1", "quantity": 1}]});

    for case in adapter_cases() {
        for draft in [json!({}), without_lines.clone(), without_customer.clone()] {
            let error = dispatch(case.adapter.as_ref(), Operation::BuildOrderRequest, &draft)
                .expect_err("invalid draft must fail");
            assert_eq!(
                error.kind(),
                ErpErrorKind::MalformedPayload,
                "adapter '{}': draft {draft}",
                case.id
            );
        }
    }
}
