//! HTTP tests for the `/medications` resource.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{failing_router, send, TestApp};

fn complete(app: &TestApp, sku: &str, name: &str) -> Value {
    json!({
        "sku": sku,
        "name": name,
        "description": "Film-coated tablet",
        "price": 4.5,
        "quantity": 20,
        "category_id": app.refs.analgesics,
        "supplier_id": app.refs.acme
    })
}

/// Inserts `n` medications named `Med 01`..`Med n` in one batch.
async fn seed(app: &TestApp, n: usize) {
    let batch: Vec<Value> = (1..=n)
        .map(|i| complete(app, &format!("SKU-{:02}", i), &format!("Med {:02}", i)))
        .collect();
    let (status, body) = app.post("/medications", Value::Array(batch)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    app.store.reset().await;
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_list_without_params_is_bare_array() {
    let app = TestApp::spawn().await;
    seed(&app, 3).await;

    let (status, body) = app.get("/medications").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["name"], "Med 01");
    assert_eq!(rows[2]["name"], "Med 03");
    assert_eq!(app.store.calls().await, vec!["list"]);
}

#[tokio::test]
async fn test_list_with_search_only() {
    let app = TestApp::spawn().await;
    seed(&app, 2).await;
    app.create(complete(&app, "IBU-1", "Ibuprofen 200mg")).await;
    app.create(complete(&app, "IBU-2", "ibuprofen 400mg")).await;
    app.store.reset().await;

    let (status, body) = app.get("/medications?name=IBUPROFEN").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["search"]["query"], "IBUPROFEN");
    assert_eq!(body["search"]["total_results"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert!(body.get("pagination").is_none());
    assert_eq!(app.store.calls().await, vec!["list"]);
}

#[tokio::test]
async fn test_search_ignores_case_for_accented_names() {
    let app = TestApp::spawn().await;
    app.create(complete(&app, "ETH-1", "Éter Anestésico")).await;
    app.create(complete(&app, "ASP-9", "ÄSPIRIN forte")).await;
    app.create(complete(&app, "ETH-2", "Ether")).await;

    let (status, body) = app.get("/medications?name=%C3%A9ter").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["search"]["query"], "éter");
    assert_eq!(body["search"]["total_results"], 1);
    assert_eq!(body["data"][0]["name"], "Éter Anestésico");

    let (_, body) = app.get("/medications?name=%C3%A4spirin").await;
    assert_eq!(body["search"]["total_results"], 1);
    assert_eq!(body["data"][0]["sku"], "ASP-9");

    let (_, paged) = app.get("/medications?name=%C3%89TER&page=1&limit=5").await;
    assert_eq!(paged["pagination"]["total_records"], 1);
    assert_eq!(paged["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_follows_renames() {
    let app = TestApp::spawn().await;
    let id = app.create(complete(&app, "REN-1", "Aspirin")).await;

    let (status, _) = app
        .put(&format!("/medications/{}", id), json!({ "name": "Ácido Acetilsalicílico" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, old) = app.get("/medications?name=aspirin").await;
    assert_eq!(old["search"]["total_results"], 0);

    let (_, new) = app.get("/medications?name=%C3%A1cido").await;
    assert_eq!(new["search"]["total_results"], 1);
}

#[tokio::test]
async fn test_empty_name_is_no_search() {
    let app = TestApp::spawn().await;
    seed(&app, 2).await;

    let (status, body) = app.get("/medications?name=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_paginated_counts_before_fetching() {
    let app = TestApp::spawn().await;
    seed(&app, 25).await;

    let (status, body) = app.get("/medications?page=2&limit=10").await;

    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 10);
    assert_eq!(data[0]["name"], "Med 11");
    assert_eq!(
        body["pagination"],
        json!({
            "current_page": 2,
            "per_page": 10,
            "total_records": 25,
            "total_pages": 3,
            "has_next": true,
            "has_prev": true
        })
    );
    assert!(body.get("search").is_none());
    assert_eq!(app.store.calls().await, vec!["count", "list"]);
}

#[tokio::test]
async fn test_list_last_and_past_last_page() {
    let app = TestApp::spawn().await;
    seed(&app, 25).await;

    let (_, last) = app.get("/medications?page=3&limit=10").await;
    assert_eq!(last["data"].as_array().unwrap().len(), 5);
    assert_eq!(last["pagination"]["has_next"], false);
    assert_eq!(last["pagination"]["has_prev"], true);

    let (status, beyond) = app.get("/medications?page=9&limit=10").await;
    assert_eq!(status, StatusCode::OK);
    assert!(beyond["data"].as_array().unwrap().is_empty());
    assert_eq!(beyond["pagination"]["has_next"], false);
}

#[tokio::test]
async fn test_limit_alone_defaults_to_first_page() {
    let app = TestApp::spawn().await;
    seed(&app, 5).await;

    let (status, body) = app.get("/medications?limit=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["current_page"], 1);
    assert_eq!(body["pagination"]["per_page"], 2);
    assert_eq!(body["pagination"]["total_pages"], 3);
    assert_eq!(body["pagination"]["has_prev"], false);
}

#[tokio::test]
async fn test_paginated_search_echoes_query() {
    let app = TestApp::spawn().await;
    seed(&app, 12).await;

    let (status, body) = app.get("/medications?name=med%201&page=1&limit=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["search"], json!({ "query": "med 1" }));
    // Med 10, Med 11, Med 12
    assert_eq!(body["pagination"]["total_records"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

/// Searched-only listings count returned rows; paginated listings count the
/// whole filtered set.
#[tokio::test]
async fn test_total_results_counts_returned_rows_only() {
    let app = TestApp::spawn().await;
    seed(&app, 4).await;

    let (_, searched) = app.get("/medications?name=Med").await;
    let (_, paged) = app.get("/medications?name=Med&page=1&limit=1").await;

    assert_eq!(searched["search"]["total_results"], 4);
    assert_eq!(paged["data"].as_array().unwrap().len(), 1);
    assert_eq!(paged["pagination"]["total_records"], 4);
    assert!(paged["search"].get("total_results").is_none());
}

#[tokio::test]
async fn test_invalid_paging_rejected_before_store() {
    let app = TestApp::spawn().await;

    let cases = [
        ("page=0", "Page must be a positive integer"),
        ("page=-3&limit=10", "Page must be a positive integer"),
        ("page=abc", "Page must be a positive integer"),
        ("page=1.5", "Page must be a positive integer"),
        ("limit=0", "Limit must be between 1 and 100"),
        ("page=1&limit=101", "Limit must be between 1 and 100"),
        ("limit=ten", "Limit must be between 1 and 100"),
    ];

    for (query, message) in cases {
        let (status, body) = app.get(&format!("/medications?{}", query)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", query);
        assert_eq!(body, json!({ "error": message }), "{}", query);
    }

    assert!(app.store.calls().await.is_empty());
}

#[tokio::test]
async fn test_page_error_reported_before_limit_error() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/medications?page=0&limit=500").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Page must be a positive integer");
}

// =============================================================================
// Fetch By Id
// =============================================================================

#[tokio::test]
async fn test_create_then_get_round_trips() {
    let app = TestApp::spawn().await;
    let input = json!({
        "sku": "AMX-500",
        "name": "Amoxicillin 500mg",
        "description": "Capsule",
        "price": 12.75,
        "quantity": 40,
        "category_id": app.refs.antibiotics,
        "supplier_id": app.refs.medisupply
    });

    let id = app.create(input.clone()).await;
    let (status, body) = app.get(&format!("/medications/{}", id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["sku"], input["sku"]);
    assert_eq!(body["name"], input["name"]);
    assert_eq!(body["description"], input["description"]);
    assert_eq!(body["price"].as_f64(), Some(12.75));
    assert_eq!(body["quantity"], json!(40));
    assert_eq!(
        body["categories"],
        json!({ "id": app.refs.antibiotics, "name": "Antibiotics" })
    );
    assert_eq!(
        body["suppliers"],
        json!({
            "id": app.refs.medisupply,
            "name": "MediSupply",
            "email": null,
            "phone": "+1-555-0100"
        })
    );
}

#[tokio::test]
async fn test_get_without_references_has_null_joins() {
    let app = TestApp::spawn().await;
    let id = app.create(json!({ "sku": "PLAIN-1", "name": "Saline" })).await;

    let (status, body) = app.get(&format!("/medications/{}", id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"], Value::Null);
    assert_eq!(body["suppliers"], Value::Null);
    assert_eq!(body["price"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn test_get_unknown_or_malformed_id_is_not_found() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/medications/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Medication not found: 9999");

    let (status, _) = app.get("/medications/not-a-number").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_single_returns_row_with_id() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post("/medications", complete(&app, "PCM-500", "Paracetamol 500mg"))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["sku"], "PCM-500");
    assert_eq!(body["category_id"], app.refs.analgesics);
    assert_eq!(app.store.calls().await, vec!["insert"]);
}

#[tokio::test]
async fn test_create_negative_price_is_validation_error() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/medications",
            json!({ "name": "Aspirin", "price": -5, "quantity": 10 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("Price must be a non-negative number"));
    assert!(app.store.calls().await.is_empty());
}

#[tokio::test]
async fn test_create_reports_both_numeric_fields() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/medications",
            json!({ "sku": "X", "name": "X", "price": -1, "quantity": "abc" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["details"],
        "Price must be a non-negative number, Quantity must be a non-negative number"
    );
}

#[tokio::test]
async fn test_numeric_strings_are_accepted() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/medications",
            json!({ "sku": "S-1", "name": "Syrup", "price": " 3.25 ", "quantity": "8" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["price"].as_f64(), Some(3.25));
    assert_eq!(body["quantity"].as_f64(), Some(8.0));
}

#[tokio::test]
async fn test_absent_numeric_fields_never_fail_validation() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/medications",
            json!({ "sku": "N-1", "name": "Nasal spray", "price": null }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["price"].as_f64(), Some(0.0));
    assert_eq!(body["quantity"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn test_create_with_wrong_field_type_is_client_error() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post("/medications", json!({ "sku": 12, "name": "Typed" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("sku"));
    assert!(app.store.calls().await.is_empty());
}

#[tokio::test]
async fn test_create_missing_required_column_is_store_error() {
    let app = TestApp::spawn().await;

    let (status, body) = app.post("/medications", json!({ "name": "No SKU" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(app.row_count().await, 0);
}

#[tokio::test]
async fn test_malformed_body_is_client_error() {
    let app = TestApp::spawn().await;

    for body in ["{\"sku\": ", "42", "\"text\"", "[1, 2]"] {
        let (status, response) = app.post_raw("/medications", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert!(response["error"].is_string(), "{}", body);
    }

    assert!(app.store.calls().await.is_empty());
}

#[tokio::test]
async fn test_batch_create_returns_message_and_rows() {
    let app = TestApp::spawn().await;
    let batch = json!([
        complete(&app, "B-1", "Cetirizine"),
        complete(&app, "B-2", "Loratadine")
    ]);

    let (status, body) = app.post("/medications", batch).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Successfully created 2 medications");
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["sku"], "B-1");
    assert!(data[1]["id"].as_i64().unwrap() > data[0]["id"].as_i64().unwrap());
}

#[tokio::test]
async fn test_empty_batch_rejected_before_store() {
    let app = TestApp::spawn().await;

    let (status, body) = app.post("/medications", json!([])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Medications array cannot be empty" }));
    assert!(app.store.calls().await.is_empty());
}

#[tokio::test]
async fn test_batch_reports_every_error_and_persists_nothing() {
    let app = TestApp::spawn().await;
    let mut missing_sku = complete(&app, "unused", "Missing SKU");
    missing_sku.as_object_mut().unwrap().remove("sku");
    let mut bad_numbers = complete(&app, "B-3", "Bad numbers");
    bad_numbers["price"] = json!(-1);
    bad_numbers["quantity"] = json!("lots");
    let mut null_supplier = complete(&app, "B-4", "Null supplier");
    null_supplier["supplier_id"] = Value::Null;

    let batch = json!([
        complete(&app, "B-1", "Valid"),
        missing_sku,
        bad_numbers,
        null_supplier
    ]);

    let (status, body) = app.post("/medications", batch).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(
        body["details"],
        "Missing required field 'sku' in medication at index 1; \
         Medication at index 2: Price must be a non-negative number; \
         Medication at index 2: Quantity must be a non-negative number; \
         Missing required field 'supplier_id' in medication at index 3"
    );
    assert!(app.store.calls().await.is_empty());
    assert_eq!(app.row_count().await, 0);
}

#[tokio::test]
async fn test_batch_store_failure_rolls_back_all_rows() {
    let app = TestApp::spawn().await;
    let mut dangling = complete(&app, "B-2", "Unknown category");
    dangling["category_id"] = json!(9999);

    let batch = json!([complete(&app, "B-1", "Fine"), dangling]);
    let (status, body) = app.post("/medications", batch).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(app.store.calls().await, vec!["insert"]);
    assert_eq!(app.row_count().await, 0);
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_applies_partial_patch() {
    let app = TestApp::spawn().await;
    let id = app.create(complete(&app, "UPD-1", "Before")).await;

    let (status, body) = app
        .put(&format!("/medications/{}", id), json!({ "quantity": 5 }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["quantity"].as_f64(), Some(5.0));
    assert_eq!(body["name"], "Before");
    assert_eq!(body["price"].as_f64(), Some(4.5));
}

#[tokio::test]
async fn test_update_validation_runs_before_store() {
    let app = TestApp::spawn().await;
    let id = app.create(complete(&app, "UPD-2", "Guarded")).await;
    app.store.reset().await;

    let (status, body) = app
        .put(&format!("/medications/{}", id), json!({ "price": -1 }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "Price must be a non-negative number");
    assert!(app.store.calls().await.is_empty());

    let (_, unchanged) = app.get(&format!("/medications/{}", id)).await;
    assert_eq!(unchanged["price"].as_f64(), Some(4.5));
}

#[tokio::test]
async fn test_update_unknown_and_malformed_ids() {
    let app = TestApp::spawn().await;

    let (status, _) = app.put("/medications/4242", json!({ "name": "Ghost" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.put("/medications/abc", json!({ "name": "Ghost" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid medication id: abc");
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_is_idempotent() {
    let app = TestApp::spawn().await;
    let id = app.create(complete(&app, "DEL-1", "Doomed")).await;
    let uri = format!("/medications/{}", id);

    let (status, body) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Deleted successfully" }));

    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_malformed_id_is_client_error() {
    let app = TestApp::spawn().await;

    let (status, _) = app.delete("/medications/x1").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.store.calls().await.is_empty());
}

// =============================================================================
// Store Failures
// =============================================================================

#[tokio::test]
async fn test_store_failure_status_follows_path() {
    use axum::http::Method;

    let router = failing_router();

    let (status, body) = send(&router, Method::GET, "/medications", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Query failed: store unavailable");

    let (status, _) = send(&router, Method::GET, "/medications/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let create = json!({ "sku": "F-1", "name": "Fails" }).to_string();
    let (status, body) = send(&router, Method::POST, "/medications", Some(create)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Query failed: store unavailable");

    let patch = json!({ "name": "Fails" }).to_string();
    let (status, _) = send(&router, Method::PUT, "/medications/1", Some(patch)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&router, Method::DELETE, "/medications/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
