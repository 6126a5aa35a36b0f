pub mod client;
pub mod mock;
pub mod response;

use async_trait::async_trait;

use crate::errors::Result;
use crate::types::{RateOption, RateRequest};

pub use client::RatesClient;
pub use mock::MockRatesProvider;
pub use response::{extract_rate_options, rate_options_from_table};

/// source of fixed-rate quotes
#[async_trait]
pub trait RatesProvider: Send + Sync {
    /// fetch options for every fixed-rate term, sorted by ascending term
    ///
    /// Transport, status and body failures are errors; a well-formed
    /// response without quotes is an empty list.
    async fn fetch_rates(&self, request: &RateRequest) -> Result<Vec<RateOption>>;
}
