//! Intake -> approval -> live inventory flow.

mod common;

use common::TestApp;
use serde_json::{json, Value};

fn intake_payload() -> Value {
    json!({
        "seller": {
            "name": "Meera Joshi",
            "phone": "9001122334",
            "email": "meera@example.com",
            "city": "Indore",
        },
        "car": {
            "brand": "Hyundai",
            "model": "i20",
            "year": 2021,
            "registrationNumber": "MP09XY5678",
            "fuelType": "Petrol",
            "kmDriven": 18000,
            "images": [
                "/files/car-dealership/1.jpg",
                "/files/car-dealership/2.jpg",
                "/files/car-dealership/3.jpg",
                "/files/car-dealership/4.jpg",
            ],
        },
        "expectedPrice": 650000,
        "rcDetails": { "rcOwner": "yes" },
    })
}

#[tokio::test]
async fn intake_approval_puts_car_live() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    // Public intake.
    let response = app
        .client
        .post(format!("{}/api/sell", app.address))
        .json(&intake_payload())
        .send()
        .await
        .expect("intake request failed");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("intake response not json");
    let request_id = body["data"]["id"].as_str().expect("request id").to_string();
    assert_eq!(body["data"]["status"], "PENDING");
    assert_eq!(body["data"]["source"], "ONLINE");

    // Shows up in the pending queue.
    let pending = app
        .client
        .get(format!("{}/api/admin/sell-requests", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("pending request failed");
    assert_eq!(pending.status(), 200);
    let pending: Value = pending.json().await.expect("pending not json");
    assert!(pending
        .as_array()
        .expect("pending array")
        .iter()
        .any(|request| request["id"] == request_id.as_str()));

    // Approve with pricing and an expense line; the label is learned.
    let response = app
        .client
        .put(format!("{}/api/admin/approve/{request_id}", app.address))
        .bearer_auth(&token)
        .json(&json!({
            "adminSellingPrice": 700000,
            "adminExpenses": [{ "label": "Detailing", "amount": 5000 }],
        }))
        .send()
        .await
        .expect("approve request failed");
    assert_eq!(response.status(), 200);
    let approved: Value = response.json().await.expect("approve response not json");
    let car_id = approved["car"]["id"].as_str().expect("car id").to_string();
    assert_eq!(approved["car"]["status"], "LIVE");
    assert_eq!(approved["car"]["adminSellingPrice"], 700000);

    // Approving twice is a precondition failure.
    let again = app
        .client
        .put(format!("{}/api/admin/approve/{request_id}", app.address))
        .bearer_auth(&token)
        .json(&json!({ "adminSellingPrice": 700000 }))
        .send()
        .await
        .expect("approve request failed");
    assert_eq!(again.status(), 400);

    // The car is on the public storefront.
    let storefront = app
        .client
        .get(format!("{}/api/cars", app.address))
        .send()
        .await
        .expect("storefront request failed");
    assert_eq!(storefront.status(), 200);
    let storefront: Value = storefront.json().await.expect("storefront not json");
    assert!(storefront
        .as_array()
        .expect("storefront array")
        .iter()
        .any(|car| car["id"] == car_id.as_str()));

    // Expense label was folded into the dropdown master.
    let options = app
        .client
        .get(format!("{}/api/admin/expense-options", app.address))
        .send()
        .await
        .expect("options request failed");
    let options: Value = options.json().await.expect("options not json");
    assert!(options
        .as_array()
        .expect("options array")
        .iter()
        .any(|label| label == "Detailing"));

    app.cleanup().await;
}

#[tokio::test]
async fn rejection_requires_a_reason() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let response = app
        .client
        .post(format!("{}/api/sell", app.address))
        .json(&intake_payload())
        .send()
        .await
        .expect("intake request failed");
    let body: Value = response.json().await.expect("intake response not json");
    let request_id = body["data"]["id"].as_str().expect("request id").to_string();

    // No reason -> validation error.
    let response = app
        .client
        .put(format!("{}/api/admin/reject/{request_id}", app.address))
        .bearer_auth(&token)
        .json(&json!({}))
        .send()
        .await
        .expect("reject request failed");
    assert_eq!(response.status(), 400);

    // With a reason it lands in the rejected list.
    let response = app
        .client
        .put(format!("{}/api/admin/reject/{request_id}", app.address))
        .bearer_auth(&token)
        .json(&json!({ "reason": "Odometer tampering suspected" }))
        .send()
        .await
        .expect("reject request failed");
    assert_eq!(response.status(), 200);

    let rejected = app
        .client
        .get(format!("{}/api/admin/rejected", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("rejected request failed");
    let rejected: Value = rejected.json().await.expect("rejected not json");
    let entry = rejected
        .as_array()
        .expect("rejected array")
        .iter()
        .find(|request| request["id"] == request_id.as_str())
        .expect("rejected entry present");
    assert_eq!(entry["rejectReason"], "Odometer tampering suspected");

    app.cleanup().await;
}

#[tokio::test]
async fn intake_validation_rejects_short_image_sets() {
    let app = TestApp::spawn().await;

    let mut payload = intake_payload();
    payload["car"]["images"] = json!(["/files/only-one.jpg"]);

    let response = app
        .client
        .post(format!("{}/api/sell", app.address))
        .json(&payload)
        .send()
        .await
        .expect("intake request failed");
    assert_eq!(response.status(), 400);

    app.cleanup().await;
}

#[tokio::test]
async fn dashboard_reflects_the_pipeline() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let car_id = app.create_live_car(&token).await;
    app.mark_sold(&token, &car_id, TestApp::mark_sold_payload(500_000, 200_000))
        .await;
    app.create_live_car(&token).await;

    let stats = app
        .client
        .get(format!("{}/api/admin/dashboard-stats", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("stats request failed");
    assert_eq!(stats.status(), 200);
    let stats: Value = stats.json().await.expect("stats not json");

    assert_eq!(stats["liveCars"], 1);
    assert_eq!(stats["soldCars"], 1);
    assert_eq!(stats["approvedRequests"], 2);
    assert_eq!(stats["totalRevenue"], 200_000);

    // History shows the sold car with profit figures.
    let history = app
        .client
        .get(format!("{}/api/admin/history", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("history request failed");
    assert_eq!(history.status(), 200);
    let history: Value = history.json().await.expect("history not json");
    let entries = history.as_array().expect("history array");
    assert_eq!(entries.len(), 1);
    // Sold for 500000 against a 400000 seller price.
    assert_eq!(entries[0]["profitBeforeExpense"], 100_000);
    assert_eq!(entries[0]["paymentSummary"]["status"], "PARTIAL");

    app.cleanup().await;
}
