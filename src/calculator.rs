use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{MortgageError, Result};
use crate::form::FormInputs;
use crate::types::ImpliedLoanFigures;
use crate::validation::validate_purchase_price;

/// flat part of the notary fee
pub const NOTARY_BASE_FEE: Decimal = dec!(2144.0);
/// notary fee per unit of price above the reference price
pub const NOTARY_RATE: Decimal = dec!(0.013);
/// price at which the notary fee equals the flat part
pub const NOTARY_REFERENCE_PRICE: Decimal = dec!(100000.0);
/// real estate broker commission
pub const BROKER_RATE: Decimal = dec!(0.0714);
/// property transfer tax
pub const STAMP_DUTY_RATE: Decimal = dec!(0.06);

/// purchase costs on top of the property price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingCosts {
    pub notary: Money,
    pub broker: Money,
    pub stamp_duty: Money,
}

impl ClosingCosts {
    pub fn total(&self) -> Result<Money> {
        self.notary
            .checked_add(self.broker)
            .and_then(|sum| sum.checked_add(self.stamp_duty))
            .ok_or_else(|| out_of_range("closing cost total"))
    }
}

fn out_of_range(what: &str) -> MortgageError {
    MortgageError::AmountOutOfRange {
        message: format!("{what} does not fit in a decimal"),
    }
}

/// calculate closing costs for a purchase
///
/// The notary fee is linear in the price and is not clamped, so it turns
/// negative for very cheap properties.
pub fn closing_costs(property_price: Money, include_commission: bool) -> Result<ClosingCosts> {
    let notary = property_price
        .checked_sub(Money::from_decimal(NOTARY_REFERENCE_PRICE))
        .and_then(|above| above.checked_mul(NOTARY_RATE))
        .and_then(|variable| variable.checked_add(Money::from_decimal(NOTARY_BASE_FEE)))
        .ok_or_else(|| out_of_range("notary fee"))?;

    let broker = if include_commission {
        property_price
            .checked_mul(BROKER_RATE)
            .ok_or_else(|| out_of_range("broker commission"))?
    } else {
        Money::ZERO
    };

    let stamp_duty = property_price
        .checked_mul(STAMP_DUTY_RATE)
        .ok_or_else(|| out_of_range("stamp duty"))?;

    Ok(ClosingCosts {
        notary,
        broker,
        stamp_duty,
    })
}

/// calculate the loan needed to cover price and closing costs after savings
pub fn calculate_implied_loan(
    property_price: Money,
    total_savings: Money,
    include_commission: bool,
) -> Result<Money> {
    closing_costs(property_price, include_commission)?
        .total()?
        .checked_sub(total_savings)
        .and_then(|loan| loan.checked_add(property_price))
        .ok_or_else(|| out_of_range("implied loan"))
}

/// calculate loan to value ratio
pub fn calculate_loan_to_value(implied_loan: Money, property_price: Money) -> Result<Rate> {
    if property_price.is_zero() {
        return Err(MortgageError::ZeroPropertyPrice);
    }

    implied_loan
        .as_decimal()
        .checked_div(property_price.as_decimal())
        .map(Rate::from_decimal)
        .ok_or_else(|| out_of_range("loan to value"))
}

/// derive loan figures from the form, if price and savings allow it
pub fn implied_loan_figures(inputs: &FormInputs) -> Option<ImpliedLoanFigures> {
    let price = inputs.purchase_price?;
    let savings = inputs.total_savings?;

    // the minimum price rule also keeps the ratio below away from zero
    if !validate_purchase_price(Some(price)).is_empty() {
        return None;
    }

    // prices near the decimal limit pass validation but the loan may not fit
    let implied_loan =
        calculate_implied_loan(price, savings, inputs.real_estate_commission_included).ok()?;
    let loan_to_value = calculate_loan_to_value(implied_loan, price).ok()?;

    Some(ImpliedLoanFigures {
        implied_loan,
        loan_to_value,
    })
}
