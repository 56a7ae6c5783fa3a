//! Application startup and lifecycle management.

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{delete, get, post, put},
    Router,
};
use bson::DateTime;
use mongodb::{options::ClientOptions, Client};
use secrecy::ExposeSecret;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use service_core::error::AppError;
use service_core::middleware::tracing::request_tracing_middleware;

use crate::config::Config;
use crate::handlers::{
    auth, cars, dashboard, documents, expenses, health, payments, sales, sell_requests, uploads,
};
use crate::models::Admin;
use crate::services::{
    password, InvoiceService, JwtService, LocalStorage, Repository, SaleLedger, Storage,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: mongodb::Database,
    pub config: Config,
    pub repository: Repository,
    pub ledger: SaleLedger,
    pub storage: Arc<dyn Storage>,
    pub invoices: InvoiceService,
    pub jwt: JwtService,
}

/// Application container for managing the server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: Config) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(config.database.url.expose_secret())
            .await
            .map_err(|e| {
                tracing::error!("Failed to parse MongoDB connection string: {}", e);
                AppError::Database(e.into())
            })?;
        client_options.app_name = Some("backoffice-service".to_string());

        let client = Client::with_options(client_options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::Database(e.into())
        })?;
        let db = client.database(&config.database.db_name);

        let repository = Repository::new(&db);
        repository.init_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let storage: Arc<dyn Storage> =
            Arc::new(LocalStorage::new(config.storage.root.clone()).await?);

        let jwt = JwtService::new(&config.auth.jwt_secret, config.auth.token_expiry_hours);
        let ledger = SaleLedger::new(repository.clone());
        let invoices = InvoiceService::new(storage.clone(), config.dealership.clone());

        bootstrap_admin(&repository, &config).await?;

        let state = AppState {
            db,
            config: config.clone(),
            repository,
            ledger,
            storage,
            invoices,
            jwt,
        };

        // Port 0 binds a random port (used by the test harness).
        let addr = SocketAddr::new(
            config
                .server
                .host
                .parse()
                .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid host: {e}")))?,
            config.server.port,
        );
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("back-office service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &mongodb::Database {
        &self.state.db
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router).await
    }
}

/// Create the startup admin account when configured and absent.
async fn bootstrap_admin(repository: &Repository, config: &Config) -> Result<(), AppError> {
    let (Some(email), Some(bootstrap_password)) = (
        config.auth.bootstrap_email.as_deref(),
        config.auth.bootstrap_password.as_ref(),
    ) else {
        return Ok(());
    };

    if repository.find_admin_by_email(email).await?.is_some() {
        return Ok(());
    }

    let admin = Admin {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: password::hash_password(bootstrap_password.expose_secret())?,
        role: "admin".to_string(),
        created_at: DateTime::now(),
    };
    repository.insert_admin(&admin).await?;
    tracing::info!(email, "bootstrap admin created");
    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Public surface
        .route("/api/sell", post(sell_requests::create_sell_request))
        .route("/api/cars", get(cars::list_cars_for_buyers))
        .route("/api/cars/:car_id", get(cars::get_car))
        .route("/api/uploads", post(uploads::upload_file))
        .route("/files/*key", get(uploads::serve_file))
        // Admin: auth + dashboard
        .route("/api/admin/login", post(auth::login))
        .route("/api/admin/dashboard-stats", get(dashboard::stats))
        .route("/api/admin/history", get(dashboard::history))
        // Admin: sell-request workflow
        .route("/api/admin/sell-requests", get(sell_requests::pending))
        .route(
            "/api/admin/sell-requests/:id",
            get(sell_requests::get_by_id).put(sell_requests::update),
        )
        .route("/api/admin/approve/:id", put(sell_requests::approve))
        .route("/api/admin/reject/:id", put(sell_requests::reject))
        .route("/api/admin/approved", get(sell_requests::approved))
        .route("/api/admin/rejected", get(sell_requests::rejected))
        // Admin: inventory
        .route("/api/admin/offline-car", post(cars::add_offline_car))
        .route("/api/admin/cars", get(cars::list_inventory))
        .route("/api/admin/live-cars", get(cars::list_inventory))
        .route("/api/admin/mark-sold/:car_id", put(cars::mark_sold))
        // Admin: sale ledger
        .route("/api/admin/sales", get(sales::list_sales))
        .route("/api/admin/sales/:sale_id", get(sales::sale_details))
        .route("/api/admin/sales/:sale_id/payments", post(sales::add_payment))
        .route(
            "/api/admin/sales/:sale_id/final-invoice",
            get(sales::final_invoice),
        )
        .route(
            "/api/admin/sales/:sale_id/final-invoice/document",
            get(sales::final_invoice_document),
        )
        .route("/api/admin/payments/:payment_id", get(payments::payment_receipt))
        .route(
            "/api/admin/payments/:payment_id/receipt",
            get(payments::payment_receipt_document),
        )
        // Admin: expenses + label masters
        .route(
            "/api/admin/expenses",
            post(expenses::add).get(expenses::list),
        )
        .route("/api/admin/expenses/:id", delete(expenses::remove))
        .route("/api/admin/expense-options", get(expenses::expense_options))
        .route("/api/admin/document-options", get(expenses::document_options))
        // Admin: document registries
        .route("/api/admin/seller-documents", get(documents::seller_documents))
        .route(
            "/api/admin/seller-documents/:sell_request_id",
            put(documents::update_seller_documents),
        )
        .route("/api/admin/buyer-documents", get(documents::buyer_documents))
        .route(
            "/api/admin/buyer-documents/:car_id",
            put(documents::update_buyer_documents),
        )
        // Leave headroom above the 5MB upload cap enforced per file.
        .layer(DefaultBodyLimit::max(8 * 1024 * 1024))
        .layer(from_fn(request_tracing_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
