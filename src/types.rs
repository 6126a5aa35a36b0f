use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};

/// unique identifier for a single rates submission
pub type RequestId = Uuid;

/// fixed-rate terms (in years) requested from the rates service
pub const FIXED_RATE_TERMS: [u32; 6] = [5, 10, 15, 20, 25, 30];

/// form field identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    PurchasePrice,
    TotalSavings,
    AnnualRepayRate,
    RealEstateCommission,
}

impl Field {
    pub const NUMERIC: [Field; 3] = [Field::PurchasePrice, Field::TotalSavings, Field::AnnualRepayRate];
}

/// loan figures derived from the form inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpliedLoanFigures {
    pub implied_loan: Money,
    pub loan_to_value: Rate,
}

impl ImpliedLoanFigures {
    /// loan to value as a percentage of the purchase price
    pub fn loan_to_value_percent(&self) -> Decimal {
        self.loan_to_value.as_percentage()
    }
}

/// rates quoted for one fixed-rate term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateOption {
    #[serde(rename = "years")]
    pub term_years: String,
    pub borrowing_rate: Rate,
    pub monthly_rate: Money,
}

/// payload sent to the rates service on submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRequest {
    pub property_price: Money,
    pub loan_amount: Money,
    pub annual_repay_rate: Rate,
}
