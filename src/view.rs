//! serializable snapshot of the form for the presentation layer

use serde::{Deserialize, Serialize};

use crate::calculator::{closing_costs, ClosingCosts};
use crate::form::FormInputs;
use crate::orchestrator::SubmissionOrchestrator;
use crate::rates::RatesProvider;
use crate::state::RequestState;
use crate::types::ImpliedLoanFigures;
use crate::validation::ValidationResult;

/// everything the form and rates table render from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub inputs: FormInputs,
    pub validation: ValidationResult,
    pub figures: Option<ImpliedLoanFigures>,
    pub closing_costs: Option<ClosingCosts>,
    pub request: RequestState,
    pub processing: bool,
    pub can_submit: bool,
}

impl FormView {
    pub fn from_orchestrator<P: RatesProvider>(orchestrator: &SubmissionOrchestrator<P>) -> Self {
        let inputs = *orchestrator.inputs();
        let figures = orchestrator.implied_loan_figures();

        FormView {
            inputs,
            validation: orchestrator.validation(),
            closing_costs: figures
                .and(inputs.purchase_price)
                .and_then(|price| {
                    closing_costs(price, inputs.real_estate_commission_included).ok()
                }),
            figures,
            request: orchestrator.state().clone(),
            processing: orchestrator.is_processing(),
            can_submit: orchestrator.can_submit(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
