use anyhow::Result;
use dotenvy::dotenv;
use secrecy::Secret;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub dealership: DealershipConfig,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub db_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: Secret<String>,
    pub token_expiry_hours: i64,
    /// When set and no matching account exists, an admin is created at
    /// startup (replaces a separate seeding script).
    pub bootstrap_email: Option<String>,
    pub bootstrap_password: Option<Secret<String>>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub root: PathBuf,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DealershipConfig {
    pub name: String,
    pub tagline: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("BACKOFFICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("BACKOFFICE_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse()?;

        let db_url = env::var("BACKOFFICE_DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db_name =
            env::var("BACKOFFICE_DATABASE_NAME").unwrap_or_else(|_| "dealership_db".to_string());

        let jwt_secret = env::var("BACKOFFICE_JWT_SECRET").expect("BACKOFFICE_JWT_SECRET must be set");
        let token_expiry_hours = env::var("BACKOFFICE_TOKEN_EXPIRY_HOURS")
            .unwrap_or_else(|_| "168".to_string())
            .parse()?;
        let bootstrap_email = env::var("BACKOFFICE_ADMIN_EMAIL").ok();
        let bootstrap_password = env::var("BACKOFFICE_ADMIN_PASSWORD").ok().map(Secret::new);

        let storage_root = env::var("BACKOFFICE_STORAGE_ROOT")
            .unwrap_or_else(|_| "./storage".to_string())
            .into();

        let dealership_name =
            env::var("BACKOFFICE_DEALERSHIP_NAME").unwrap_or_else(|_| "City Motors".to_string());
        let dealership_tagline = env::var("BACKOFFICE_DEALERSHIP_TAGLINE")
            .unwrap_or_else(|_| "Authorized Used Car Dealer".to_string());

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: Secret::new(db_url),
                db_name,
            },
            auth: AuthConfig {
                jwt_secret: Secret::new(jwt_secret),
                token_expiry_hours,
                bootstrap_email,
                bootstrap_password,
            },
            storage: StorageConfig { root: storage_root },
            dealership: DealershipConfig {
                name: dealership_name,
                tagline: dealership_tagline,
            },
            service_name: "backoffice-service".to_string(),
        })
    }
}
