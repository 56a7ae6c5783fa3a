use backoffice_service::config::{
    AuthConfig, Config, DatabaseConfig, DealershipConfig, ServerConfig, StorageConfig,
};
use backoffice_service::Application;
use secrecy::Secret;
use serde_json::{json, Value};
use uuid::Uuid;

pub const TEST_ADMIN_EMAIL: &str = "admin@dealership.test";
pub const TEST_ADMIN_PASSWORD: &str = "test-password";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: mongodb::Database,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db_name = format!("backoffice_test_{}", Uuid::new_v4().simple());
        let storage_root =
            std::env::temp_dir().join(format!("backoffice-test-{}", Uuid::new_v4().simple()));

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
            },
            database: DatabaseConfig {
                url: Secret::new(
                    std::env::var("TEST_MONGODB_URI")
                        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
                ),
                db_name: db_name.clone(),
            },
            auth: AuthConfig {
                jwt_secret: Secret::new("test-secret".to_string()),
                token_expiry_hours: 1,
                bootstrap_email: Some(TEST_ADMIN_EMAIL.to_string()),
                bootstrap_password: Some(Secret::new(TEST_ADMIN_PASSWORD.to_string())),
            },
            storage: StorageConfig { root: storage_root },
            dealership: DealershipConfig {
                name: "Test Motors".to_string(),
                tagline: "Test Used Car Dealer".to_string(),
            },
            service_name: "backoffice-service-test".to_string(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to come up.
        let client = reqwest::Client::new();
        let health_url = format!("{address}/health");
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            client,
        }
    }

    /// Login as the bootstrap admin and return the bearer token.
    pub async fn login(&self) -> String {
        let response = self
            .client
            .post(format!("{}/api/admin/login", self.address))
            .json(&json!({
                "email": TEST_ADMIN_EMAIL,
                "password": TEST_ADMIN_PASSWORD,
            }))
            .send()
            .await
            .expect("login request failed");
        assert_eq!(response.status(), 200, "login should succeed");
        let body: Value = response.json().await.expect("login response not json");
        body["token"].as_str().expect("token missing").to_string()
    }

    /// A complete offline-car payload; the car goes live immediately.
    pub fn offline_car_payload() -> Value {
        json!({
            "seller": {
                "name": "Ravi Kumar",
                "phone": "9876543210",
                "city": "Indore",
            },
            "car": {
                "brand": "Maruti",
                "model": "Swift",
                "year": 2019,
                "registrationNumber": "MP09AB1234",
                "variant": "VXI",
                "fuelType": "Petrol",
                "transmission": "Manual",
                "kmDriven": 42000,
                "images": [
                    "/files/car-dealership/front.jpg",
                    "/files/car-dealership/rear.jpg",
                    "/files/car-dealership/engine.jpg",
                    "/files/car-dealership/plate.jpg",
                ],
            },
            "rcDetails": { "rcOwner": "yes" },
            "sellerPrice": 400000,
            "adminSellingPrice": 500000,
        })
    }

    /// Create a live car through the offline intake; returns its id.
    pub async fn create_live_car(&self, token: &str) -> String {
        let response = self
            .client
            .post(format!("{}/api/admin/offline-car", self.address))
            .bearer_auth(token)
            .json(&Self::offline_car_payload())
            .send()
            .await
            .expect("offline-car request failed");
        assert_eq!(response.status(), 201, "offline car should be created");
        let body: Value = response.json().await.expect("offline-car response not json");
        body["liveCar"]["id"]
            .as_str()
            .expect("car id missing")
            .to_string()
    }

    /// Minimal mark-sold payload with a single direct payment leg.
    pub fn mark_sold_payload(sold_price: i64, cash_paid: i64) -> Value {
        json!({
            "buyerDetails": {
                "buyerName": "Sunita Sharma",
                "buyerPhone": "9123456780",
                "buyerCity": "Bhopal",
                "soldPrice": sold_price,
            },
            "payment": {
                "type": "CASH",
                "cashPaid": cash_paid,
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
        })
    }

    /// Mark a car sold and return the response body.
    pub async fn mark_sold(&self, token: &str, car_id: &str, payload: Value) -> Value {
        let response = self
            .client
            .put(format!("{}/api/admin/mark-sold/{car_id}", self.address))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .expect("mark-sold request failed");
        assert_eq!(response.status(), 200, "mark-sold should succeed");
        response.json().await.expect("mark-sold response not json")
    }

    /// Cleanup the test database after the test completes.
    pub async fn cleanup(&self) {
        self.db
            .drop(None)
            .await
            .expect("Failed to drop test database");
    }
}
