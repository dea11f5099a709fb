use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub session_secret: String,
    pub admin_username: String,
    pub admin_password: String,
    pub gemini_api_key: Option<String>,
    pub payment_key_id: Option<String>,
    pub payment_key_secret: Option<String>,
    /// Where the uploaded AI context document is persisted.
    pub data_file_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: try_load("PORT", "8080"),
            database_path: try_load("DATABASE_PATH", "hope_connect.db"),
            session_secret: env::var("SESSION_SECRET").unwrap_or_else(|_| {
                warn!("SESSION_SECRET not set, using an insecure development default");
                "insecure-dev-secret".to_string()
            }),
            admin_username: try_load("ADMIN_USERNAME", "admin"),
            admin_password: try_load("ADMIN_PASSWORD", "admin"),
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|v| !v.is_empty()),
            payment_key_id: env::var("PAYMENT_KEY_ID").ok().filter(|v| !v.is_empty()),
            payment_key_secret: env::var("PAYMENT_KEY_SECRET").ok().filter(|v| !v.is_empty()),
            data_file_path: try_load("DATA_FILE_PATH", "ngo_data.json"),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| warn!("Invalid {key} value: {e}"))
        .expect("Environment misconfigured!")
}
