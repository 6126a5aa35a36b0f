use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::RequestPhase;
use crate::types::{Field, RateRequest, RequestId};

/// all events that can be emitted by the submission orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // input events
    InputChanged {
        field: Field,
        timestamp: DateTime<Utc>,
    },
    ResultsInvalidated {
        previous: RequestPhase,
        field: Field,
        timestamp: DateTime<Utc>,
    },

    // submission events
    SubmissionStarted {
        request_id: RequestId,
        request: RateRequest,
        timestamp: DateTime<Utc>,
    },
    SubmissionRejected {
        reason: String,
        timestamp: DateTime<Utc>,
    },
    RatesLoaded {
        request_id: RequestId,
        option_count: usize,
        timestamp: DateTime<Utc>,
    },
    RatesFailed {
        request_id: RequestId,
        cause: String,
        timestamp: DateTime<Utc>,
    },
    StaleResponseDiscarded {
        request_id: RequestId,
        timestamp: DateTime<Utc>,
    },

    // status change events
    StatusChanged {
        old_status: RequestPhase,
        new_status: RequestPhase,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
