use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use serde_json::{json, Value};

use crate::config::RatesServiceConfig;
use crate::errors::{MortgageError, Result};
use crate::rates::response::extract_rate_options;
use crate::rates::RatesProvider;
use crate::types::{RateOption, RateRequest, FIXED_RATE_TERMS};

/// http client for the graphql rates service
pub struct RatesClient {
    http: Client,
    endpoint: Url,
}

impl RatesClient {
    /// create client from configuration
    pub fn new(config: &RatesServiceConfig) -> Result<Self> {
        config.validate()?;
        let endpoint = config.endpoint_url()?;

        let http = Client::builder()
            .default_headers(default_headers(config)?)
            .timeout(config.timeout())
            .build()
            .map_err(|e| MortgageError::InvalidConfiguration {
                message: format!("could not build http client: {e}"),
            })?;

        Ok(Self { http, endpoint })
    }

    /// create client from environment configuration
    pub fn from_env() -> Result<Self> {
        Self::new(&RatesServiceConfig::from_env()?)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RatesProvider for RatesClient {
    async fn fetch_rates(&self, request: &RateRequest) -> Result<Vec<RateOption>> {
        debug!(
            "requesting rates from {} for price {}, loan {}, repayment {}",
            self.endpoint, request.property_price, request.loan_amount, request.annual_repay_rate
        );

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&request_body(request))
            .send()
            .await
            .map_err(|e| MortgageError::Transport { message: e.to_string() })?;

        let status = resp.status();
        if !status.is_success() {
            warn!("rates service answered with status {status}");
            return Err(MortgageError::UnexpectedStatus { status: status.as_u16() });
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| MortgageError::UnparseableResponse { message: e.to_string() })?;

        let options = extract_rate_options(&body);
        debug!("rates service returned {} option(s)", options.len());
        Ok(options)
    }
}

/// graphql query asking for the rates table of every fixed-rate term
pub fn rates_query(request: &RateRequest) -> String {
    let years = FIXED_RATE_TERMS
        .iter()
        .map(|y| y.to_string())
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "query {{ root {{rates_table( property_price: {}, repayment: {}, loan_amount: {}, years_fixed: [{}]) }}}}",
        request.property_price.as_decimal().normalize(),
        request.annual_repay_rate.as_percentage().normalize(),
        request.loan_amount.as_decimal().normalize(),
        years,
    )
}

/// json body posted to the service
pub fn request_body(request: &RateRequest) -> Value {
    json!({
        "query": rates_query(request),
        "variables": null,
    })
}

fn default_headers(config: &RatesServiceConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));

    if let Some(language) = &config.accept_language {
        headers.insert(header::ACCEPT_LANGUAGE, header_value(language)?);
    }
    if let Some(referrer) = &config.referrer {
        headers.insert(header::REFERER, header_value(referrer)?);
    }

    Ok(headers)
}

fn header_value(raw: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(raw).map_err(|e| MortgageError::InvalidConfiguration {
        message: format!("invalid header value {raw:?}: {e}"),
    })
}
