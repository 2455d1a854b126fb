//! Companion client for the marketplace API.
//!
//! Every service call tries the HTTP API first and falls back to a JSON file
//! that plays the role of browser local storage, seeded from [`mock`] data.

use std::{env, path::PathBuf};

pub mod cart;
pub mod error;
pub mod http;
pub mod mock;
pub mod services;
pub mod store;

pub use cart::{AddOutcome, Cart, CartLine};
pub use error::{ClientError, ClientResult};
pub use http::ApiClient;
pub use services::ClientServices;
pub use store::LocalStore;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root including the `/api` prefix.
    pub base_url: String,
    pub store_path: PathBuf,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, store_path: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            store_path: store_path.into(),
            timeout: 10,
        }
    }

    pub fn from_env() -> Self {
        let base_url =
            env::var("FOOD_API_URL").unwrap_or_else(|_| "http://127.0.0.1:3000/api".to_string());
        let store_path =
            env::var("FOOD_STORE_PATH").unwrap_or_else(|_| "digital_menu_store.json".to_string());
        Self::new(base_url, store_path)
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = secs;
        self
    }
}
