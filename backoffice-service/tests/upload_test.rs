//! Document-store upload round trip.

mod common;

use common::TestApp;
use serde_json::Value;

#[tokio::test]
async fn upload_and_fetch_round_trip() {
    let app = TestApp::spawn().await;

    let bytes = b"fake image bytes".to_vec();
    let part = reqwest::multipart::Part::bytes(bytes.clone())
        .file_name("rc image.jpg")
        .mime_str("image/jpeg")
        .expect("valid mime");
    let form = reqwest::multipart::Form::new().part("file", part);

    let response = app
        .client
        .post(format!("{}/api/uploads", app.address))
        .multipart(form)
        .send()
        .await
        .expect("upload request failed");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("upload response not json");

    let url = body["url"].as_str().expect("url missing");
    assert!(url.starts_with("/files/car-dealership/"), "{url}");
    // File names are sanitized for the storage key.
    assert_eq!(body["fileName"], "rc_image.jpg");
    assert_eq!(body["sizeBytes"], bytes.len() as i64);

    let fetched = app
        .client
        .get(format!("{}{url}", app.address))
        .send()
        .await
        .expect("fetch request failed");
    assert_eq!(fetched.status(), 200);
    assert_eq!(
        fetched
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("image/jpeg")
    );
    assert_eq!(fetched.bytes().await.expect("body").to_vec(), bytes);

    app.cleanup().await;
}

#[tokio::test]
async fn upload_without_file_field_fails() {
    let app = TestApp::spawn().await;

    let form = reqwest::multipart::Form::new().text("other", "value");
    let response = app
        .client
        .post(format!("{}/api/uploads", app.address))
        .multipart(form)
        .send()
        .await
        .expect("upload request failed");
    assert_eq!(response.status(), 400);

    app.cleanup().await;
}

#[tokio::test]
async fn unknown_file_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/files/car-dealership/missing.jpg", app.address))
        .send()
        .await
        .expect("fetch request failed");
    assert_eq!(response.status(), 404);

    app.cleanup().await;
}
