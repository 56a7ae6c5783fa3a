mod common;

use common::TestApp;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("health request failed");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("health body not json");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "backoffice-service");

    let ready = app
        .client
        .get(format!("{}/ready", app.address))
        .send()
        .await
        .expect("ready request failed");
    assert_eq!(ready.status(), 200);

    app.cleanup().await;
}

#[tokio::test]
async fn admin_routes_require_authentication() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/api/admin/sales", app.address))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 401);

    let response = app
        .client
        .get(format!("{}/api/admin/sales", app.address))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 401);

    app.cleanup().await;
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/api/admin/login", app.address))
        .json(&serde_json::json!({
            "email": common::TEST_ADMIN_EMAIL,
            "password": "wrong-password",
        }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(response.status(), 401);

    app.cleanup().await;
}
