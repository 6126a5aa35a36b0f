//! Field rules for the mortgage form.
//!
//! Every rule returns the message shown under its field, or an empty string
//! when the value is acceptable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::form::FormInputs;
use crate::types::Field;

/// lowest purchase price the rates service quotes for
pub const MIN_PROPERTY_PRICE: i64 = 10_000;

/// validate the purchase price
pub fn validate_purchase_price(purchase_price: Option<Money>) -> String {
    let Some(price) = purchase_price else {
        return "Purchase price is required.".to_string();
    };

    // no upper bound
    if price < Money::from_major(MIN_PROPERTY_PRICE) {
        return format!("Purchase price must be at least {MIN_PROPERTY_PRICE}.");
    }

    String::new()
}

/// validate total savings against the purchase price
pub fn validate_total_savings(total_savings: Option<Money>, purchase_price: Option<Money>) -> String {
    let Some(savings) = total_savings else {
        return "Total savings is required.".to_string();
    };

    if !savings.is_positive() {
        return "Total savings must be greater than zero.".to_string();
    }

    // savings equal to the price are rejected too
    if let Some(price) = purchase_price {
        if price <= savings {
            return "Total savings must be less than purchase price.".to_string();
        }
    }

    String::new()
}

/// validate the annual repayment rate, exclusive range (0, 100)
pub fn validate_repay_rate(rate: Option<Rate>) -> String {
    let Some(rate) = rate else {
        return "Annual repayment rate is required.".to_string();
    };

    let percentage = rate.as_percentage();
    if percentage <= Decimal::ZERO || percentage >= Decimal::ONE_HUNDRED {
        return "Annual repayment rate must be between 0 and 100.".to_string();
    }

    String::new()
}

/// per-field error messages, empty string meaning valid
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub purchase_price: String,
    pub total_savings: String,
    pub annual_repay_rate: String,
}

impl ValidationResult {
    /// validate every field of the form
    pub fn of(inputs: &FormInputs) -> Self {
        Self {
            purchase_price: validate_purchase_price(inputs.purchase_price),
            total_savings: validate_total_savings(inputs.total_savings, inputs.purchase_price),
            annual_repay_rate: validate_repay_rate(inputs.annual_repay_rate),
        }
    }

    /// error for a field, empty when valid
    pub fn error(&self, field: Field) -> &str {
        match field {
            Field::PurchasePrice => &self.purchase_price,
            Field::TotalSavings => &self.total_savings,
            Field::AnnualRepayRate => &self.annual_repay_rate,
            Field::RealEstateCommission => "",
        }
    }

    /// fields that currently have an error
    pub fn errors(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::NUMERIC
            .into_iter()
            .map(move |field| (field, self.error(field)))
            .filter(|(_, message)| !message.is_empty())
    }

    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }
}
