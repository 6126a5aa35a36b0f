use std::str::FromStr;

use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{MortgageError, Result};

/// raw values entered into the mortgage form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInputs {
    pub purchase_price: Option<Money>,
    pub total_savings: Option<Money>,
    pub annual_repay_rate: Option<Rate>,
    pub real_estate_commission_included: bool,
}

impl Default for FormInputs {
    /// values the form starts out with
    fn default() -> Self {
        Self {
            purchase_price: Some(Money::from_major(150_000)),
            total_savings: Some(Money::from_major(30_000)),
            annual_repay_rate: Some(Rate::from_percentage(2)),
            real_estate_commission_included: false,
        }
    }
}

impl FormInputs {
    /// form with nothing entered
    pub fn empty() -> Self {
        Self {
            purchase_price: None,
            total_savings: None,
            annual_repay_rate: None,
            real_estate_commission_included: false,
        }
    }

    pub fn with_purchase_price(mut self, price: impl Into<Money>) -> Self {
        self.purchase_price = Some(price.into());
        self
    }

    pub fn with_total_savings(mut self, savings: impl Into<Money>) -> Self {
        self.total_savings = Some(savings.into());
        self
    }

    pub fn with_annual_repay_rate(mut self, rate: Rate) -> Self {
        self.annual_repay_rate = Some(rate);
        self
    }

    pub fn with_commission(mut self, included: bool) -> Self {
        self.real_estate_commission_included = included;
        self
    }
}

/// parse the text of a numeric input field, keeping the reason a value was refused
///
/// Blank or whitespace-only input is `Ok(None)`. Text that is not a number, or
/// a number a `Decimal` cannot hold such as `1e30`, is `InvalidNumber`.
pub fn try_parse_number_input(raw: &str) -> Result<Option<Decimal>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map(Some)
        .map_err(|e| MortgageError::InvalidNumber {
            input: trimmed.to_string(),
            message: e.to_string(),
        })
}

/// parse the text of a numeric input field
///
/// Refused text leaves the field empty, so it reports as required.
pub fn parse_number_input(raw: &str) -> Option<Decimal> {
    match try_parse_number_input(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("treating field as empty: {e}");
            None
        }
    }
}

/// parse an amount field (price, savings)
pub fn parse_amount(raw: &str) -> Option<Money> {
    parse_number_input(raw).map(Money::from_decimal)
}

/// parse a percentage field (annual repayment rate)
pub fn parse_percentage(raw: &str) -> Option<Rate> {
    parse_number_input(raw).map(Rate::from_percentage)
}
