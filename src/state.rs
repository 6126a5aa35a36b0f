use serde::{Deserialize, Serialize};

use crate::types::{RateOption, RequestId};

/// message shown whenever fetching rates fails, whatever the cause
pub const RATES_FAILURE_MESSAGE: &str = "We could not calculate rates for the provided data";

/// lifecycle of a rates request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RequestState {
    /// nothing submitted, or results were invalidated by an edit
    #[default]
    Idle,
    /// waiting on the rates service
    Loading { request_id: RequestId },
    /// rates received, sorted by ascending term
    Success { rates: Vec<RateOption> },
    /// fetch failed
    Failure { message: String },
}

/// request state without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestPhase {
    Idle,
    Loading,
    Success,
    Failure,
}

impl RequestState {
    pub fn phase(&self) -> RequestPhase {
        match self {
            RequestState::Idle => RequestPhase::Idle,
            RequestState::Loading { .. } => RequestPhase::Loading,
            RequestState::Success { .. } => RequestPhase::Success,
            RequestState::Failure { .. } => RequestPhase::Failure,
        }
    }

    /// check if a request is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading { .. })
    }

    /// check if a result (rates or error) is being shown
    pub fn is_settled(&self) -> bool {
        matches!(self, RequestState::Success { .. } | RequestState::Failure { .. })
    }

    /// id of the in-flight request
    pub fn active_request(&self) -> Option<RequestId> {
        match self {
            RequestState::Loading { request_id } => Some(*request_id),
            _ => None,
        }
    }

    pub fn rates(&self) -> Option<&[RateOption]> {
        match self {
            RequestState::Success { rates } => Some(rates),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RequestState::Failure { message } => Some(message),
            _ => None,
        }
    }
}
