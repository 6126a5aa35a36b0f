pub mod calculator;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod form;
pub mod orchestrator;
pub mod rates;
pub mod state;
pub mod types;
pub mod validation;
pub mod view;

// re-export key types
pub use calculator::{
    calculate_implied_loan, calculate_loan_to_value, closing_costs, implied_loan_figures,
    ClosingCosts,
};
pub use config::RatesServiceConfig;
pub use decimal::{Money, Rate};
pub use errors::{MortgageError, Result};
pub use events::{Event, EventStore};
pub use form::{
    parse_amount, parse_number_input, parse_percentage, try_parse_number_input, FormInputs,
};
pub use orchestrator::{PendingSubmission, SubmissionOrchestrator};
pub use rates::{MockRatesProvider, RatesClient, RatesProvider};
pub use state::{RequestPhase, RequestState, RATES_FAILURE_MESSAGE};
pub use types::{
    Field, ImpliedLoanFigures, RateOption, RateRequest, RequestId, FIXED_RATE_TERMS,
};
pub use validation::{
    validate_purchase_price, validate_repay_rate, validate_total_savings, ValidationResult,
    MIN_PROPERTY_PRICE,
};
pub use view::FormView;

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
