use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::{MortgageError, Result};
use crate::rates::response::extract_rate_options;
use crate::rates::RatesProvider;
use crate::types::{RateOption, RateRequest};

/// mock rates provider for testing
///
/// Outcomes are handed out in the order they were queued. Once the queue is
/// empty every call answers with an empty list.
#[derive(Default)]
pub struct MockRatesProvider {
    outcomes: Mutex<VecDeque<Result<Vec<RateOption>>>>,
    requests: Mutex<Vec<RateRequest>>,
}

impl MockRatesProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// queue a successful answer
    pub fn respond_with(self, options: Vec<RateOption>) -> Self {
        self.push(Ok(options));
        self
    }

    /// queue an answer given as a raw service response body
    pub fn respond_with_body(self, body: &Value) -> Self {
        self.push(Ok(extract_rate_options(body)));
        self
    }

    /// queue a failed fetch
    pub fn fail_with(self, error: MortgageError) -> Self {
        self.push(Err(error));
        self
    }

    /// requests seen so far
    pub fn requests(&self) -> Vec<RateRequest> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn push(&self, outcome: Result<Vec<RateOption>>) {
        match self.outcomes.lock() {
            Ok(mut outcomes) => outcomes.push_back(outcome),
            Err(poisoned) => poisoned.into_inner().push_back(outcome),
        }
    }
}

#[async_trait]
impl RatesProvider for MockRatesProvider {
    async fn fetch_rates(&self, request: &RateRequest) -> Result<Vec<RateOption>> {
        match self.requests.lock() {
            Ok(mut requests) => requests.push(*request),
            Err(poisoned) => poisoned.into_inner().push(*request),
        }

        let next = match self.outcomes.lock() {
            Ok(mut outcomes) => outcomes.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };
        next.unwrap_or_else(|| Ok(Vec::new()))
    }
}
