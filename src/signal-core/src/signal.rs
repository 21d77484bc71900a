//! Outbound signal events.
//!
//! Every cycle tick produces exactly one [`SignalEvent`]. Presentation layers
//! subscribe through [`SignalSink`]; the core never renders anything itself.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::analyzer::FrequencyRow;
use crate::digit::Digit;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SignalEvent {
    /// ANALYSIS tick without a signal.
    Scanning {
        top: FrequencyRow,
        runner_up: FrequencyRow,
        threshold_pct: Decimal,
    },
    /// Runner-up reached the threshold; preparation starts.
    SignalFound {
        digit: Digit,
        frequency_pct: Decimal,
        prep_seconds: u32,
    },
    /// Preparation countdown.
    Countdown { digit: Digit, remaining: u32 },
    /// Preparation finished; the entry window is open.
    EntryOpened { digit: Digit, entry_seconds: u32 },
    /// Entry window countdown.
    EntryActive { digit: Digit, remaining: u32 },
    /// Entry window closed; carries a fresh analysis for display.
    EntryClosed {
        digit: Digit,
        top: FrequencyRow,
        runner_up: FrequencyRow,
    },
}

impl SignalEvent {
    /// Digit the event refers to, if a prediction is active.
    pub fn predicted_digit(&self) -> Option<Digit> {
        match self {
            SignalEvent::Scanning { .. } => None,
            SignalEvent::SignalFound { digit, .. }
            | SignalEvent::Countdown { digit, .. }
            | SignalEvent::EntryOpened { digit, .. }
            | SignalEvent::EntryActive { digit, .. }
            | SignalEvent::EntryClosed { digit, .. } => Some(*digit),
        }
    }

    /// Whether this event changed the cycle phase.
    pub fn is_transition(&self) -> bool {
        matches!(
            self,
            SignalEvent::SignalFound { .. }
                | SignalEvent::EntryOpened { .. }
                | SignalEvent::EntryClosed { .. }
        )
    }
}

/// Subscriber for cycle events.
#[cfg_attr(test, mockall::automock)]
pub trait SignalSink {
    fn emit(&mut self, event: &SignalEvent);
}

/// Records every event, in order.
impl SignalSink for Vec<SignalEvent> {
    fn emit(&mut self, event: &SignalEvent) {
        self.push(event.clone());
    }
}
