//! Blocking HTTP clients for the external food databases.

pub mod barcode;
pub mod openfoodfacts;
pub mod usda;

use crate::errors::AppResult;
use reqwest::blocking::Client;
use std::time::Duration;

pub const USER_AGENT: &str = concat!("calstudy/", env!("CARGO_PKG_VERSION"));

/// One request, one response: no retries.
pub fn http_client(timeout_secs: u64) -> AppResult<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .user_agent(USER_AGENT)
        .build()?)
}
