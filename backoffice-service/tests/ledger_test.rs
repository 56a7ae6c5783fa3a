//! End-to-end coverage of the sale ledger: partial settlement, further
//! payments, overpayment rejection and invoice gating.

mod common;

use common::TestApp;
use serde_json::{json, Value};

async fn add_payment(app: &TestApp, token: &str, sale_id: &str, body: Value) -> reqwest::Response {
    app.client
        .post(format!("{}/api/admin/sales/{sale_id}/payments", app.address))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("add-payment request failed")
}

async fn sale_details(app: &TestApp, token: &str, sale_id: &str) -> Value {
    let response = app
        .client
        .get(format!("{}/api/admin/sales/{sale_id}", app.address))
        .bearer_auth(token)
        .send()
        .await
        .expect("sale details request failed");
    assert_eq!(response.status(), 200);
    response.json().await.expect("sale details not json")
}

#[tokio::test]
async fn partial_sale_then_full_payment_reaches_paid() {
    let app = TestApp::spawn().await;
    let token = app.login().await;
    let car_id = app.create_live_car(&token).await;

    // Sold for 500000 with 200000 received in cash up front.
    let sold = app
        .mark_sold(&token, &car_id, TestApp::mark_sold_payload(500_000, 200_000))
        .await;
    let summary = &sold["sale"]["paymentSummary"];
    assert_eq!(summary["totalAmount"], 500_000);
    assert_eq!(summary["paidAmount"], 200_000);
    assert_eq!(summary["remainingAmount"], 300_000);
    assert_eq!(summary["status"], "PARTIAL");

    let sale_id = sold["sale"]["id"].as_str().expect("sale id").to_string();

    // Final invoice is gated until fully paid.
    let gated = app
        .client
        .get(format!(
            "{}/api/admin/sales/{sale_id}/final-invoice",
            app.address
        ))
        .bearer_auth(&token)
        .send()
        .await
        .expect("final invoice request failed");
    assert_eq!(gated.status(), 400);

    // Settle the balance.
    let response = add_payment(
        &app,
        &token,
        &sale_id,
        json!({ "amount": 300_000, "paymentType": "BANK" }),
    )
    .await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("payment response not json");

    assert_eq!(body["payment"]["amount"], 300_000);
    assert_eq!(body["payment"]["paidTillNow"], 500_000);
    assert_eq!(body["payment"]["remainingAfterPayment"], 0);
    let invoice_number = body["payment"]["invoiceNumber"]
        .as_str()
        .expect("invoice number missing");
    assert!(invoice_number.starts_with("INV-"), "{invoice_number}");

    assert_eq!(body["saleSummary"]["paidAmount"], 500_000);
    assert_eq!(body["saleSummary"]["remainingAmount"], 0);
    assert_eq!(body["saleSummary"]["status"], "PAID");

    // The ledger projection shows both entries in order, snapshots intact.
    let details = sale_details(&app, &token, &sale_id).await;
    let payments = details["payments"].as_array().expect("payments array");
    assert_eq!(payments.len(), 2);
    assert_eq!(payments[0]["paymentType"], "CASH");
    assert_eq!(payments[0]["amount"], 200_000);
    assert_eq!(payments[0]["paidTillNow"], 200_000);
    assert_eq!(payments[0]["remainingAfterPayment"], 300_000);
    assert_eq!(payments[1]["paymentType"], "BANK");
    assert_eq!(payments[1]["paidTillNow"], 500_000);
    assert_eq!(payments[1]["remainingAfterPayment"], 0);

    // Final invoice is now available and stable.
    let invoice = app
        .client
        .get(format!(
            "{}/api/admin/sales/{sale_id}/final-invoice",
            app.address
        ))
        .bearer_auth(&token)
        .send()
        .await
        .expect("final invoice request failed");
    assert_eq!(invoice.status(), 200);
    let invoice: Value = invoice.json().await.expect("final invoice not json");
    let number = invoice["finalInvoiceNumber"]
        .as_str()
        .expect("final invoice number");
    assert!(number.starts_with("FIN-"), "{number}");
    assert_eq!(invoice["payments"].as_array().map(Vec::len), Some(2));

    app.cleanup().await;
}

#[tokio::test]
async fn overpayment_is_rejected_without_side_effects() {
    let app = TestApp::spawn().await;
    let token = app.login().await;
    let car_id = app.create_live_car(&token).await;

    let sold = app
        .mark_sold(&token, &car_id, TestApp::mark_sold_payload(500_000, 200_000))
        .await;
    let sale_id = sold["sale"]["id"].as_str().expect("sale id").to_string();

    // 600000 against a remaining balance of 300000.
    let response = add_payment(
        &app,
        &token,
        &sale_id,
        json!({ "amount": 600_000, "paymentType": "CASH" }),
    )
    .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("error body not json");
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("remaining balance"),
        "{body}"
    );

    // Sale and payment set are unchanged.
    let details = sale_details(&app, &token, &sale_id).await;
    assert_eq!(details["sale"]["paymentSummary"]["paidAmount"], 200_000);
    assert_eq!(details["sale"]["paymentSummary"]["remainingAmount"], 300_000);
    assert_eq!(details["sale"]["paymentSummary"]["status"], "PARTIAL");
    assert_eq!(details["payments"].as_array().map(Vec::len), Some(1));

    app.cleanup().await;
}

#[tokio::test]
async fn payment_validation_errors() {
    let app = TestApp::spawn().await;
    let token = app.login().await;
    let car_id = app.create_live_car(&token).await;

    let sold = app
        .mark_sold(&token, &car_id, TestApp::mark_sold_payload(500_000, 200_000))
        .await;
    let sale_id = sold["sale"]["id"].as_str().expect("sale id").to_string();

    // Zero amount.
    let response = add_payment(
        &app,
        &token,
        &sale_id,
        json!({ "amount": 0, "paymentType": "CASH" }),
    )
    .await;
    assert_eq!(response.status(), 400);

    // Missing payment type.
    let response = add_payment(&app, &token, &sale_id, json!({ "amount": 1000 })).await;
    assert_eq!(response.status(), 400);

    // Unknown sale.
    let response = add_payment(
        &app,
        &token,
        &uuid::Uuid::new_v4().to_string(),
        json!({ "amount": 1000, "paymentType": "CASH" }),
    )
    .await;
    assert_eq!(response.status(), 404);

    app.cleanup().await;
}

#[tokio::test]
async fn invoice_numbers_are_strictly_increasing() {
    let app = TestApp::spawn().await;
    let token = app.login().await;
    let car_id = app.create_live_car(&token).await;

    let sold = app
        .mark_sold(&token, &car_id, TestApp::mark_sold_payload(500_000, 100_000))
        .await;
    let sale_id = sold["sale"]["id"].as_str().expect("sale id").to_string();

    let mut sequences = Vec::new();
    for _ in 0..3 {
        let response = add_payment(
            &app,
            &token,
            &sale_id,
            json!({ "amount": 50_000, "paymentType": "UPI" }),
        )
        .await;
        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.expect("payment response not json");
        let invoice_number = body["payment"]["invoiceNumber"]
            .as_str()
            .expect("invoice number")
            .to_string();
        let sequence: i64 = invoice_number
            .rsplit('-')
            .next()
            .and_then(|tail| tail.parse().ok())
            .expect("numeric sequence tail");
        sequences.push(sequence);
    }

    assert!(
        sequences.windows(2).all(|pair| pair[1] > pair[0]),
        "{sequences:?}"
    );

    app.cleanup().await;
}

#[tokio::test]
async fn loan_sale_orders_direct_payment_before_disbursement() {
    let app = TestApp::spawn().await;
    let token = app.login().await;
    let car_id = app.create_live_car(&token).await;

    let payload = json!({
        "buyerDetails": {
            "buyerName": "Arjun Verma",
            "buyerPhone": "9988776655",
            "soldPrice": 500_000,
        },
        "payment": {
            "type": "LOAN",
            "cashPaid": 100_000,
            "cashPaymentMode": "UPI",
            "loanTotal": 400_000,
            "loanPaidNow": 400_000,
            "financeCompany": "Sundaram Finance",
        },
        "buyerKyc": {
            "aadhaar": ["/files/car-dealership/aadhaar.jpg"],
            "pan": ["/files/car-dealership/pan.jpg"],
            "photo": ["/files/car-dealership/photo.jpg"],
        },
        "buyerRto": {
            "form29": ["/files/car-dealership/form29.jpg"],
            "form30": ["/files/car-dealership/form30.jpg"],
        },
    });
    let sold = app.mark_sold(&token, &car_id, payload).await;
    let summary = &sold["sale"]["paymentSummary"];
    assert_eq!(summary["paidAmount"], 500_000);
    assert_eq!(summary["status"], "PAID");

    let sale_id = sold["sale"]["id"].as_str().expect("sale id").to_string();
    let details = sale_details(&app, &token, &sale_id).await;

    // Direct payment snapshots first, disbursement second.
    let payments = details["payments"].as_array().expect("payments array");
    assert_eq!(payments.len(), 2);
    assert_eq!(payments[0]["paymentType"], "CASH");
    assert_eq!(payments[0]["paymentMode"], "UPI");
    assert_eq!(payments[0]["paidTillNow"], 100_000);
    assert_eq!(payments[1]["paymentType"], "LOAN");
    assert_eq!(payments[1]["paidTillNow"], 500_000);
    assert_eq!(payments[1]["remainingAfterPayment"], 0);

    // Financing side recorded alongside the ledger.
    assert_eq!(details["loan"]["loanAmount"], 400_000);
    assert_eq!(details["loan"]["status"], "DISBURSED");
    assert_eq!(details["loan"]["financeCompany"], "Sundaram Finance");

    app.cleanup().await;
}

#[tokio::test]
async fn mark_sold_validation() {
    let app = TestApp::spawn().await;
    let token = app.login().await;
    let car_id = app.create_live_car(&token).await;

    // Initial payment exceeding the sold price.
    let response = app
        .client
        .put(format!("{}/api/admin/mark-sold/{car_id}", app.address))
        .bearer_auth(&token)
        .json(&TestApp::mark_sold_payload(500_000, 600_000))
        .send()
        .await
        .expect("mark-sold request failed");
    assert_eq!(response.status(), 400);

    // Missing KYC documents.
    let mut payload = TestApp::mark_sold_payload(500_000, 200_000);
    payload["buyerKyc"]["aadhaar"] = serde_json::json!([]);
    let response = app
        .client
        .put(format!("{}/api/admin/mark-sold/{car_id}", app.address))
        .bearer_auth(&token)
        .json(&payload)
        .send()
        .await
        .expect("mark-sold request failed");
    assert_eq!(response.status(), 400);

    // A valid sale still goes through afterwards (nothing was mutated).
    let sold = app
        .mark_sold(&token, &car_id, TestApp::mark_sold_payload(500_000, 500_000))
        .await;
    assert_eq!(sold["sale"]["paymentSummary"]["status"], "PAID");

    // And the car cannot be sold twice.
    let response = app
        .client
        .put(format!("{}/api/admin/mark-sold/{car_id}", app.address))
        .bearer_auth(&token)
        .json(&TestApp::mark_sold_payload(500_000, 500_000))
        .send()
        .await
        .expect("mark-sold request failed");
    assert_eq!(response.status(), 400);

    app.cleanup().await;
}

#[tokio::test]
async fn payment_receipt_projection() {
    let app = TestApp::spawn().await;
    let token = app.login().await;
    let car_id = app.create_live_car(&token).await;

    let sold = app
        .mark_sold(&token, &car_id, TestApp::mark_sold_payload(500_000, 200_000))
        .await;
    let sale_id = sold["sale"]["id"].as_str().expect("sale id").to_string();

    let response = add_payment(
        &app,
        &token,
        &sale_id,
        json!({ "amount": 100_000, "paymentType": "BANK", "note": "Second instalment" }),
    )
    .await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("payment response not json");
    let payment_id = body["payment"]["id"].as_str().expect("payment id");

    let receipt = app
        .client
        .get(format!("{}/api/admin/payments/{payment_id}", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("receipt request failed");
    assert_eq!(receipt.status(), 200);
    let receipt: Value = receipt.json().await.expect("receipt not json");
    assert_eq!(receipt["payment"]["note"], "Second instalment");
    assert_eq!(receipt["sale"]["id"], sale_id.as_str());
    assert_eq!(receipt["car"]["id"], car_id.as_str());

    // Rendered document lands in the store with a locator.
    let stored = app
        .client
        .get(format!(
            "{}/api/admin/payments/{payment_id}/receipt",
            app.address
        ))
        .bearer_auth(&token)
        .send()
        .await
        .expect("receipt document request failed");
    assert_eq!(stored.status(), 200);
    let stored: Value = stored.json().await.expect("stored receipt not json");
    let url = stored["url"].as_str().expect("document url");
    assert!(url.starts_with("/files/"), "{url}");

    let document = app
        .client
        .get(format!("{}{url}", app.address))
        .send()
        .await
        .expect("document fetch failed");
    assert_eq!(document.status(), 200);
    let text = document.text().await.expect("document body");
    assert!(text.contains("PAYMENT RECEIPT"), "{text}");

    app.cleanup().await;
}
