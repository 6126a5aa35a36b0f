use log::{debug, warn};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::decimal::{Money, Rate};
use crate::types::RateOption;

/// location of the per-term table in the service response
const RATES_TABLE_POINTER: &str = "/data/root/ratesTable";

/// quote for one term as sent by the service
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RateQuote {
    borrowing_rate: Decimal,
    monthly_rate: Decimal,
}

/// pull the rates table out of a response body
///
/// A body without a rates table, or with one that is not an object, yields
/// no options rather than an error.
pub fn extract_rate_options(body: &Value) -> Vec<RateOption> {
    match body.pointer(RATES_TABLE_POINTER) {
        Some(Value::Object(table)) => rate_options_from_table(table),
        Some(other) => {
            debug!("rates table is not an object: {other}");
            Vec::new()
        }
        None => {
            debug!("response has no rates table");
            Vec::new()
        }
    }
}

/// convert a term-keyed table into options sorted by ascending term
pub fn rate_options_from_table(table: &Map<String, Value>) -> Vec<RateOption> {
    let mut options: Vec<(u32, RateOption)> = Vec::with_capacity(table.len());

    for (term, value) in table {
        let Ok(years) = term.trim().parse::<u32>() else {
            warn!("skipping rates entry with non-numeric term {term:?}");
            continue;
        };

        let quote = match RateQuote::deserialize(value) {
            Ok(quote) => quote,
            Err(e) => {
                warn!("skipping malformed rates entry for {years} years: {e}");
                continue;
            }
        };

        options.push((
            years,
            RateOption {
                term_years: term.clone(),
                borrowing_rate: Rate::from_percentage(quote.borrowing_rate),
                monthly_rate: Money::from_decimal(quote.monthly_rate),
            },
        ));
    }

    options.sort_by_key(|(years, _)| *years);
    options.into_iter().map(|(_, option)| option).collect()
}
