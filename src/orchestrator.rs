use hourglass_rs::SafeTimeProvider;
use log::{error, info, warn};
use uuid::Uuid;

use crate::calculator::implied_loan_figures;
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::form::FormInputs;
use crate::rates::RatesProvider;
use crate::state::{RequestState, RATES_FAILURE_MESSAGE};
use crate::types::{Field, ImpliedLoanFigures, RateOption, RateRequest, RequestId};
use crate::validation::ValidationResult;
use crate::view::FormView;

/// submission handed out by `begin_submission`, to be resolved with
/// `complete_submission`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSubmission {
    pub request_id: RequestId,
    pub request: RateRequest,
}

/// drives a mortgage form from edits through to fetched rates
///
/// The form inputs are the only stored data. Validation and loan figures are
/// recomputed from them on every call, and any edit drops a shown result.
pub struct SubmissionOrchestrator<P> {
    provider: P,
    inputs: FormInputs,
    state: RequestState,
    events: EventStore,
}

impl<P: RatesProvider> SubmissionOrchestrator<P> {
    /// create orchestrator with the default form values
    pub fn new(provider: P) -> Self {
        Self::with_inputs(provider, FormInputs::default())
    }

    /// create orchestrator with given form values
    pub fn with_inputs(provider: P, inputs: FormInputs) -> Self {
        Self {
            provider,
            inputs,
            state: RequestState::Idle,
            events: EventStore::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn inputs(&self) -> &FormInputs {
        &self.inputs
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// current per-field errors
    pub fn validation(&self) -> ValidationResult {
        ValidationResult::of(&self.inputs)
    }

    /// current implied loan and loan to value
    pub fn implied_loan_figures(&self) -> Option<ImpliedLoanFigures> {
        implied_loan_figures(&self.inputs)
    }

    /// payload a submission would send right now
    pub fn rate_request(&self) -> Option<RateRequest> {
        let figures = self.implied_loan_figures()?;

        Some(RateRequest {
            property_price: self.inputs.purchase_price?,
            loan_amount: figures.implied_loan,
            annual_repay_rate: self.inputs.annual_repay_rate?,
        })
    }

    /// check if a request is in flight (inputs and submit are disabled)
    pub fn is_processing(&self) -> bool {
        self.state.is_loading()
    }

    /// check if the submit action is enabled
    pub fn can_submit(&self) -> bool {
        !self.state.is_loading() && self.validation().is_valid() && self.rate_request().is_some()
    }

    /// snapshot for the presentation layer
    pub fn view(&self) -> FormView {
        FormView::from_orchestrator(self)
    }

    pub fn set_purchase_price(&mut self, value: Option<Money>, time_provider: &SafeTimeProvider) {
        if self.inputs.purchase_price != value {
            self.inputs.purchase_price = value;
            self.on_input_change(Field::PurchasePrice, time_provider);
        }
    }

    pub fn set_total_savings(&mut self, value: Option<Money>, time_provider: &SafeTimeProvider) {
        if self.inputs.total_savings != value {
            self.inputs.total_savings = value;
            self.on_input_change(Field::TotalSavings, time_provider);
        }
    }

    pub fn set_annual_repay_rate(&mut self, value: Option<Rate>, time_provider: &SafeTimeProvider) {
        if self.inputs.annual_repay_rate != value {
            self.inputs.annual_repay_rate = value;
            self.on_input_change(Field::AnnualRepayRate, time_provider);
        }
    }

    pub fn set_real_estate_commission(&mut self, included: bool, time_provider: &SafeTimeProvider) {
        if self.inputs.real_estate_commission_included != included {
            self.inputs.real_estate_commission_included = included;
            self.on_input_change(Field::RealEstateCommission, time_provider);
        }
    }

    /// react to an edited field
    ///
    /// A shown result no longer matches the inputs and goes back to idle. An
    /// edit during loading does the same, so the late response is discarded.
    pub fn on_input_change(&mut self, field: Field, time_provider: &SafeTimeProvider) {
        self.events.emit(Event::InputChanged {
            field,
            timestamp: time_provider.now(),
        });

        if matches!(self.state, RequestState::Idle) {
            return;
        }

        let previous = self.state.phase();
        self.transition(RequestState::Idle, time_provider);
        self.events.emit(Event::ResultsInvalidated {
            previous,
            field,
            timestamp: time_provider.now(),
        });
    }

    /// move to loading and hand out the request to send
    ///
    /// Returns `None` while another request is in flight or while any field
    /// has an error.
    pub fn begin_submission(&mut self, time_provider: &SafeTimeProvider) -> Option<PendingSubmission> {
        if self.state.is_loading() {
            self.reject("a submission is already in flight".to_string(), time_provider);
            return None;
        }

        let validation = self.validation();
        if !validation.is_valid() {
            let reason = validation
                .errors()
                .map(|(_, message)| message)
                .collect::<Vec<_>>()
                .join(" ");
            self.reject(reason, time_provider);
            return None;
        }

        let Some(request) = self.rate_request() else {
            self.reject("loan figures unavailable".to_string(), time_provider);
            return None;
        };

        let request_id = Uuid::new_v4();
        self.transition(RequestState::Loading { request_id }, time_provider);
        self.events.emit(Event::SubmissionStarted {
            request_id,
            request,
            timestamp: time_provider.now(),
        });
        info!("submitting rates request {request_id}");

        Some(PendingSubmission { request_id, request })
    }

    /// apply the outcome of a request
    ///
    /// Outcomes for anything but the request currently loading are dropped.
    /// Returns whether the outcome was applied.
    pub fn complete_submission(
        &mut self,
        request_id: RequestId,
        outcome: Result<Vec<RateOption>>,
        time_provider: &SafeTimeProvider,
    ) -> bool {
        if self.state.active_request() != Some(request_id) {
            warn!("discarding response for superseded rates request {request_id}");
            self.events.emit(Event::StaleResponseDiscarded {
                request_id,
                timestamp: time_provider.now(),
            });
            return false;
        }

        match outcome {
            Ok(rates) => {
                self.events.emit(Event::RatesLoaded {
                    request_id,
                    option_count: rates.len(),
                    timestamp: time_provider.now(),
                });
                self.transition(RequestState::Success { rates }, time_provider);
            }
            Err(e) => {
                error!("rates request {request_id} failed: {e}");
                self.events.emit(Event::RatesFailed {
                    request_id,
                    cause: e.to_string(),
                    timestamp: time_provider.now(),
                });
                self.transition(
                    RequestState::Failure {
                        message: RATES_FAILURE_MESSAGE.to_string(),
                    },
                    time_provider,
                );
            }
        }

        true
    }

    /// validate, fetch and record the outcome in one go
    pub async fn submit(&mut self, time_provider: &SafeTimeProvider) -> &RequestState {
        let Some(pending) = self.begin_submission(time_provider) else {
            return &self.state;
        };

        let outcome = self.provider.fetch_rates(&pending.request).await;
        self.complete_submission(pending.request_id, outcome, time_provider);
        &self.state
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    fn transition(&mut self, new_state: RequestState, time_provider: &SafeTimeProvider) {
        let old_status = self.state.phase();
        self.state = new_state;
        self.events.emit(Event::StatusChanged {
            old_status,
            new_status: self.state.phase(),
            timestamp: time_provider.now(),
        });
    }

    fn reject(&mut self, reason: String, time_provider: &SafeTimeProvider) {
        warn!("submission rejected: {reason}");
        self.events.emit(Event::SubmissionRejected {
            reason,
            timestamp: time_provider.now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MortgageError;
    use crate::rates::MockRatesProvider;
    use crate::state::RequestPhase;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn test_time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        ))
    }

    fn option(years: &str, borrowing: rust_decimal::Decimal, monthly: i64) -> RateOption {
        RateOption {
            term_years: years.to_string(),
            borrowing_rate: Rate::from_percentage(borrowing),
            monthly_rate: Money::from_major(monthly),
        }
    }

    fn submitted_form() -> FormInputs {
        FormInputs::default()
            .with_purchase_price(200_000)
            .with_annual_repay_rate(Rate::from_percentage(dec!(2.5)))
    }

    #[test]
    fn test_starts_idle_with_derived_values() {
        let orchestrator = SubmissionOrchestrator::new(MockRatesProvider::new());

        assert_eq!(orchestrator.state(), &RequestState::Idle);
        assert!(orchestrator.validation().is_valid());
        assert!(orchestrator.can_submit());
        assert_eq!(
            orchestrator.implied_loan_figures().unwrap().implied_loan,
            Money::from_major(131_794)
        );
    }

    #[tokio::test]
    async fn test_submit_sorts_rates_by_term() {
        let time = test_time();
        let provider = MockRatesProvider::new().respond_with_body(&json!({
            "data": { "root": { "ratesTable": {
                "30": { "borrowingRate": 3, "monthlyRate": 234 },
                "15": { "borrowingRate": 2.5, "monthlyRate": 123 },
            } } }
        }));
        let mut orchestrator = SubmissionOrchestrator::with_inputs(provider, submitted_form());

        let state = orchestrator.submit(&time).await.clone();

        assert_eq!(
            state,
            RequestState::Success {
                rates: vec![option("15", dec!(2.5), 123), option("30", dec!(3), 234)],
            }
        );

        let requests = orchestrator.provider().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].property_price, Money::from_major(200_000));
        assert_eq!(requests[0].annual_repay_rate, Rate::from_percentage(dec!(2.5)));
        // 2144 + 1300 + 12000 - 30000 + 200000
        assert_eq!(requests[0].loan_amount, Money::from_major(185_444));
    }

    #[tokio::test]
    async fn test_fetch_failure_uses_fixed_message() {
        let time = test_time();
        let provider = MockRatesProvider::new().fail_with(MortgageError::UnexpectedStatus { status: 502 });
        let mut orchestrator = SubmissionOrchestrator::with_inputs(provider, submitted_form());

        let state = orchestrator.submit(&time).await;
        assert_eq!(state.error_message(), Some("We could not calculate rates for the provided data"));

        // underlying cause is kept for diagnostics
        assert!(orchestrator.events().iter().any(|e| matches!(
            e,
            Event::RatesFailed { cause, .. } if cause.contains("502")
        )));
    }

    #[tokio::test]
    async fn test_new_submission_clears_error() {
        let time = test_time();
        let provider = MockRatesProvider::new()
            .fail_with(MortgageError::Transport { message: "connection reset".to_string() })
            .respond_with(vec![option("15", dec!(2.5), 123)]);
        let mut orchestrator = SubmissionOrchestrator::with_inputs(provider, submitted_form());

        orchestrator.submit(&time).await;
        assert_eq!(orchestrator.state().phase(), RequestPhase::Failure);

        let pending = orchestrator.begin_submission(&time).unwrap();
        assert!(orchestrator.state().is_loading());
        assert!(orchestrator.state().error_message().is_none());

        let outcome = orchestrator.provider().fetch_rates(&pending.request).await;
        orchestrator.complete_submission(pending.request_id, outcome, &time);
        assert_eq!(orchestrator.state().rates().map(|r| r.len()), Some(1));
    }

    #[tokio::test]
    async fn test_empty_service_answer_is_success() {
        let time = test_time();
        let provider = MockRatesProvider::new().respond_with_body(&json!({ "data": null }));
        let mut orchestrator = SubmissionOrchestrator::with_inputs(provider, submitted_form());

        let state = orchestrator.submit(&time).await;
        assert_eq!(state, &RequestState::Success { rates: Vec::new() });
    }

    #[tokio::test]
    async fn test_input_change_invalidates_success() {
        let time = test_time();
        let provider = MockRatesProvider::new().respond_with(vec![option("15", dec!(2.5), 123)]);
        let mut orchestrator = SubmissionOrchestrator::with_inputs(provider, submitted_form());

        orchestrator.submit(&time).await;
        assert!(orchestrator.state().rates().is_some());

        orchestrator.set_total_savings(Some(Money::from_major(50_000)), &time);
        assert_eq!(orchestrator.state(), &RequestState::Idle);
        assert!(orchestrator.events().iter().any(|e| matches!(
            e,
            Event::ResultsInvalidated { previous: RequestPhase::Success, field: Field::TotalSavings, .. }
        )));
    }

    #[tokio::test]
    async fn test_input_change_invalidates_failure() {
        let time = test_time();
        let provider = MockRatesProvider::new().fail_with(MortgageError::UnparseableResponse {
            message: "expected value".to_string(),
        });
        let mut orchestrator = SubmissionOrchestrator::with_inputs(provider, submitted_form());

        orchestrator.submit(&time).await;
        assert!(orchestrator.state().error_message().is_some());

        orchestrator.set_real_estate_commission(true, &time);
        assert_eq!(orchestrator.state(), &RequestState::Idle);
    }

    #[tokio::test]
    async fn test_unchanged_value_keeps_result() {
        let time = test_time();
        let provider = MockRatesProvider::new().respond_with(vec![option("15", dec!(2.5), 123)]);
        let mut orchestrator = SubmissionOrchestrator::with_inputs(provider, submitted_form());

        orchestrator.submit(&time).await;
        orchestrator.set_purchase_price(Some(Money::from_major(200_000)), &time);
        assert!(orchestrator.state().rates().is_some());
    }

    #[tokio::test]
    async fn test_invalid_form_does_not_submit() {
        let time = test_time();
        let mut orchestrator = SubmissionOrchestrator::new(MockRatesProvider::new());

        orchestrator.set_purchase_price(None, &time);
        assert!(!orchestrator.can_submit());

        let state = orchestrator.submit(&time).await;
        assert_eq!(state, &RequestState::Idle);
        assert!(orchestrator.provider().requests().is_empty());
        assert!(orchestrator.events().iter().any(|e| matches!(
            e,
            Event::SubmissionRejected { reason, .. } if reason.contains("Purchase price is required.")
        )));
    }

    #[tokio::test]
    async fn test_out_of_range_price_does_not_submit() {
        let time = test_time();
        let price = crate::form::parse_amount("78000000000000000000000000000");
        let mut orchestrator = SubmissionOrchestrator::with_inputs(
            MockRatesProvider::new(),
            FormInputs::default().with_total_savings(1),
        );
        orchestrator.set_purchase_price(price, &time);

        assert!(orchestrator.validation().is_valid());
        assert!(orchestrator.implied_loan_figures().is_none());
        assert!(!orchestrator.can_submit());
        assert!(orchestrator.view().closing_costs.is_none());

        let state = orchestrator.submit(&time).await;
        assert_eq!(state, &RequestState::Idle);
        assert!(orchestrator.provider().requests().is_empty());
        assert!(orchestrator.events().iter().any(|e| matches!(
            e,
            Event::SubmissionRejected { reason, .. } if reason == "loan figures unavailable"
        )));
    }

    #[test]
    fn test_no_second_submission_while_loading() {
        let time = test_time();
        let mut orchestrator = SubmissionOrchestrator::new(MockRatesProvider::new());

        let first = orchestrator.begin_submission(&time).unwrap();
        assert!(orchestrator.is_processing());
        assert!(!orchestrator.can_submit());
        assert!(orchestrator.begin_submission(&time).is_none());
        assert_eq!(orchestrator.state().active_request(), Some(first.request_id));
    }

    #[test]
    fn test_superseded_response_is_discarded() {
        let time = test_time();
        let mut orchestrator = SubmissionOrchestrator::new(MockRatesProvider::new());

        let first = orchestrator.begin_submission(&time).unwrap();
        orchestrator.set_annual_repay_rate(Some(Rate::from_percentage(3)), &time);
        assert_eq!(orchestrator.state(), &RequestState::Idle);

        let second = orchestrator.begin_submission(&time).unwrap();
        assert_ne!(first.request_id, second.request_id);
        assert_eq!(second.request.annual_repay_rate, Rate::from_percentage(3));

        // late answer for the first request
        let applied = orchestrator.complete_submission(
            first.request_id,
            Ok(vec![option("10", dec!(1.5), 999)]),
            &time,
        );
        assert!(!applied);
        assert!(orchestrator.state().is_loading());

        let applied = orchestrator.complete_submission(
            second.request_id,
            Ok(vec![option("10", dec!(1.7), 950)]),
            &time,
        );
        assert!(applied);
        assert_eq!(orchestrator.state().rates().unwrap()[0].monthly_rate, Money::from_major(950));
    }

    #[test]
    fn test_response_after_invalidation_is_discarded() {
        let time = test_time();
        let mut orchestrator = SubmissionOrchestrator::new(MockRatesProvider::new());

        let pending = orchestrator.begin_submission(&time).unwrap();
        orchestrator.set_total_savings(Some(Money::from_major(40_000)), &time);

        let applied = orchestrator.complete_submission(
            pending.request_id,
            Err(MortgageError::Transport { message: "timeout".to_string() }),
            &time,
        );
        assert!(!applied);
        assert_eq!(orchestrator.state(), &RequestState::Idle);
        assert!(orchestrator.events().iter().any(|e| matches!(e, Event::StaleResponseDiscarded { .. })));
    }

    #[test]
    fn test_status_changes_are_recorded() {
        let time = test_time();
        let mut orchestrator = SubmissionOrchestrator::new(MockRatesProvider::new());

        let pending = orchestrator.begin_submission(&time).unwrap();
        orchestrator.complete_submission(pending.request_id, Ok(Vec::new()), &time);

        let statuses: Vec<(RequestPhase, RequestPhase)> = orchestrator
            .take_events()
            .into_iter()
            .filter_map(|e| match e {
                Event::StatusChanged { old_status, new_status, .. } => Some((old_status, new_status)),
                _ => None,
            })
            .collect();

        assert_eq!(
            statuses,
            vec![
                (RequestPhase::Idle, RequestPhase::Loading),
                (RequestPhase::Loading, RequestPhase::Success),
            ]
        );
        assert!(orchestrator.events().is_empty());
    }
}
