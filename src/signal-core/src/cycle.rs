//! Timer-driven signal cycle.
//!
//! ANALYSIS watches the runner-up frequency. Once it reaches the threshold,
//! the runner-up digit becomes the prediction and the machine runs a fixed
//! PREPARATION countdown followed by a fixed ENTRY window, then returns to
//! ANALYSIS. Outside ANALYSIS the analysis contents are ignored.

use serde::Serialize;
use tracing::{debug, info};

use crate::analyzer::AnalysisSnapshot;
use crate::config::CycleConfig;
use crate::digit::Digit;
use crate::signal::SignalEvent;

/// Cycle phase. The predicted digit exists only while a prediction is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CyclePhase {
    Analysis,
    Preparation { digit: Digit },
    Entry { digit: Digit },
}

impl CyclePhase {
    pub fn name(&self) -> &'static str {
        match self {
            CyclePhase::Analysis => "ANALYSIS",
            CyclePhase::Preparation { .. } => "PREPARATION",
            CyclePhase::Entry { .. } => "ENTRY",
        }
    }

    pub fn predicted_digit(&self) -> Option<Digit> {
        match self {
            CyclePhase::Analysis => None,
            CyclePhase::Preparation { digit } | CyclePhase::Entry { digit } => Some(*digit),
        }
    }
}

/// Point-in-time view of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleState {
    pub phase: CyclePhase,
    /// Whole ticks spent in the current phase
    pub elapsed_in_phase: u32,
}

impl CycleState {
    pub fn predicted_digit(&self) -> Option<Digit> {
        self.phase.predicted_digit()
    }
}

impl Default for CycleState {
    fn default() -> Self {
        Self {
            phase: CyclePhase::Analysis,
            elapsed_in_phase: 0,
        }
    }
}

/// One per session. Driven by exactly one `on_tick` call per second.
#[derive(Debug, Clone)]
pub struct CycleStateMachine {
    config: CycleConfig,
    state: CycleState,
}

impl CycleStateMachine {
    pub fn new(config: CycleConfig) -> Self {
        Self {
            config,
            state: CycleState::default(),
        }
    }

    pub fn config(&self) -> &CycleConfig {
        &self.config
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn phase(&self) -> CyclePhase {
        self.state.phase
    }

    pub fn elapsed_in_phase(&self) -> u32 {
        self.state.elapsed_in_phase
    }

    pub fn predicted_digit(&self) -> Option<Digit> {
        self.state.predicted_digit()
    }

    /// Back to ANALYSIS, discarding any countdown in progress.
    pub fn reset(&mut self) {
        self.state = CycleState::default();
    }

    /// Advance one tick.
    ///
    /// The phase timer is incremented before the countdown is checked, so a
    /// preparation of `prep_seconds` takes exactly that many ticks.
    pub fn on_tick(&mut self, analysis: &AnalysisSnapshot) -> SignalEvent {
        self.state.elapsed_in_phase = self.state.elapsed_in_phase.saturating_add(1);

        match self.state.phase {
            CyclePhase::Analysis => self.tick_analysis(analysis),
            CyclePhase::Preparation { digit } => {
                let remaining = self.config.prep_seconds.saturating_sub(self.state.elapsed_in_phase);
                if remaining == 0 {
                    self.enter(CyclePhase::Entry { digit });
                    info!(
                        "Entry window OPEN for digit {} ({}s)",
                        digit, self.config.entry_seconds
                    );
                    SignalEvent::EntryOpened {
                        digit,
                        entry_seconds: self.config.entry_seconds,
                    }
                } else {
                    debug!("Preparation for digit {}: {}s remaining", digit, remaining);
                    SignalEvent::Countdown { digit, remaining }
                }
            }
            CyclePhase::Entry { digit } => {
                let remaining = self.config.entry_seconds.saturating_sub(self.state.elapsed_in_phase);
                if remaining == 0 {
                    self.enter(CyclePhase::Analysis);
                    info!("Entry window closed for digit {}, back to ANALYSIS", digit);
                    SignalEvent::EntryClosed {
                        digit,
                        top: analysis.top(),
                        runner_up: analysis.runner_up(),
                    }
                } else {
                    debug!("Entry for digit {}: {}s remaining", digit, remaining);
                    SignalEvent::EntryActive { digit, remaining }
                }
            }
        }
    }

    fn tick_analysis(&mut self, analysis: &AnalysisSnapshot) -> SignalEvent {
        let top = analysis.top();
        let runner_up = analysis.runner_up();

        if analysis.meets_threshold(self.config.threshold_pct) {
            let digit = runner_up.digit;
            self.enter(CyclePhase::Preparation { digit });
            info!(
                "Signal found: digit {} at {:.2}%, starting {}s preparation",
                digit, runner_up.frequency_pct, self.config.prep_seconds
            );
            return SignalEvent::SignalFound {
                digit,
                frequency_pct: runner_up.frequency_pct,
                prep_seconds: self.config.prep_seconds,
            };
        }

        debug!(
            "Scanning: top {} ({:.2}%), next {} ({:.2}%), target {}%",
            top.digit,
            top.frequency_pct,
            runner_up.digit,
            runner_up.frequency_pct,
            self.config.threshold_pct
        );
        SignalEvent::Scanning {
            top,
            runner_up,
            threshold_pct: self.config.threshold_pct,
        }
    }

    fn enter(&mut self, phase: CyclePhase) {
        self.state = CycleState {
            phase,
            elapsed_in_phase: 0,
        };
    }
}

impl Default for CycleStateMachine {
    fn default() -> Self {
        Self::new(CycleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use rust_decimal_macros::dec;

    fn snapshot(values: &[i64]) -> AnalysisSnapshot {
        let digits: Vec<Digit> = values.iter().map(|v| Digit::new(*v).unwrap()).collect();
        analyze(&digits)
    }

    fn signalling() -> AnalysisSnapshot {
        snapshot(&[1, 1, 1, 1, 1, 1, 1, 2])
    }

    fn quiet() -> AnalysisSnapshot {
        // 1 dominates; runner-up 0 sits at 0%
        snapshot(&[1, 1, 1, 1, 1, 1, 1, 1])
    }

    fn digit(value: i64) -> Digit {
        Digit::new(value).unwrap()
    }

    #[test]
    fn test_scanning_below_threshold() {
        let mut machine = CycleStateMachine::default();

        let event = machine.on_tick(&quiet());

        assert!(matches!(event, SignalEvent::Scanning { .. }));
        assert_eq!(machine.phase(), CyclePhase::Analysis);
        assert_eq!(machine.elapsed_in_phase(), 1);
        assert_eq!(machine.predicted_digit(), None);
    }

    #[test]
    fn test_signal_enters_preparation() {
        let mut machine = CycleStateMachine::default();

        let event = machine.on_tick(&signalling());

        assert_eq!(
            event,
            SignalEvent::SignalFound {
                digit: digit(2),
                frequency_pct: dec!(12.5),
                prep_seconds: 20,
            }
        );
        assert_eq!(machine.phase(), CyclePhase::Preparation { digit: digit(2) });
        assert_eq!(machine.elapsed_in_phase(), 0);
        assert_eq!(machine.predicted_digit(), Some(digit(2)));
    }

    #[test]
    fn test_empty_window_does_not_signal() {
        let mut machine = CycleStateMachine::default();

        let event = machine.on_tick(&snapshot(&[]));

        assert!(matches!(event, SignalEvent::Scanning { .. }));
        assert_eq!(machine.phase(), CyclePhase::Analysis);
    }

    #[test]
    fn test_zero_threshold_ignores_empty_window() {
        let mut machine = CycleStateMachine::new(CycleConfig {
            threshold_pct: dec!(0),
            ..CycleConfig::default()
        });

        assert!(matches!(machine.on_tick(&snapshot(&[])), SignalEvent::Scanning { .. }));
        assert_eq!(machine.predicted_digit(), None);
    }

    #[test]
    fn test_long_analysis_saturates_timer() {
        let mut machine = CycleStateMachine::default();
        machine.state.elapsed_in_phase = u32::MAX;

        let event = machine.on_tick(&quiet());

        assert!(matches!(event, SignalEvent::Scanning { .. }));
        assert_eq!(machine.elapsed_in_phase(), u32::MAX);
    }

    #[test]
    fn test_full_cycle_timing() {
        let mut machine = CycleStateMachine::default();
        machine.on_tick(&signalling());
        assert_eq!(machine.elapsed_in_phase(), 0);

        for expected_remaining in (1..20).rev() {
            let event = machine.on_tick(&quiet());
            assert_eq!(
                event,
                SignalEvent::Countdown {
                    digit: digit(2),
                    remaining: expected_remaining,
                }
            );
        }
        let event = machine.on_tick(&quiet());
        assert_eq!(
            event,
            SignalEvent::EntryOpened {
                digit: digit(2),
                entry_seconds: 16,
            }
        );
        assert_eq!(machine.phase(), CyclePhase::Entry { digit: digit(2) });
        assert_eq!(machine.elapsed_in_phase(), 0);

        for expected_remaining in (1..16).rev() {
            let event = machine.on_tick(&quiet());
            assert_eq!(
                event,
                SignalEvent::EntryActive {
                    digit: digit(2),
                    remaining: expected_remaining,
                }
            );
        }
        let closing = quiet();
        let event = machine.on_tick(&closing);
        assert_eq!(
            event,
            SignalEvent::EntryClosed {
                digit: digit(2),
                top: closing.top(),
                runner_up: closing.runner_up(),
            }
        );
        assert_eq!(machine.phase(), CyclePhase::Analysis);
        assert_eq!(machine.elapsed_in_phase(), 0);
        assert_eq!(machine.predicted_digit(), None);
    }

    #[test]
    fn test_prediction_is_deaf_to_new_analysis() {
        let mut machine = CycleStateMachine::default();
        machine.on_tick(&signalling());

        // A different runner-up above threshold must not move the prediction
        let other = snapshot(&[7, 7, 7, 7, 4, 4, 4, 9]);
        for _ in 0..19 {
            machine.on_tick(&other);
            assert_eq!(machine.predicted_digit(), Some(digit(2)));
            assert!(matches!(machine.phase(), CyclePhase::Preparation { .. }));
        }
        machine.on_tick(&other);
        assert_eq!(machine.phase(), CyclePhase::Entry { digit: digit(2) });

        for _ in 0..15 {
            machine.on_tick(&snapshot(&[]));
            assert_eq!(machine.phase(), CyclePhase::Entry { digit: digit(2) });
        }
    }

    #[test]
    fn test_custom_config() {
        let mut machine = CycleStateMachine::new(CycleConfig {
            threshold_pct: dec!(30),
            prep_seconds: 2,
            entry_seconds: 1,
        });

        // Runner-up at 12.5% no longer qualifies
        assert!(matches!(machine.on_tick(&signalling()), SignalEvent::Scanning { .. }));

        let strong = snapshot(&[5, 5, 5, 6, 6, 6]);
        assert!(matches!(machine.on_tick(&strong), SignalEvent::SignalFound { .. }));
        assert_eq!(machine.predicted_digit(), Some(digit(6)));

        assert!(matches!(machine.on_tick(&strong), SignalEvent::Countdown { remaining: 1, .. }));
        assert!(matches!(machine.on_tick(&strong), SignalEvent::EntryOpened { .. }));
        assert!(matches!(machine.on_tick(&strong), SignalEvent::EntryClosed { .. }));
        assert_eq!(machine.phase(), CyclePhase::Analysis);
    }

    #[test]
    fn test_reset_discards_progress() {
        let mut machine = CycleStateMachine::default();
        machine.on_tick(&signalling());
        machine.on_tick(&quiet());

        machine.reset();

        assert_eq!(machine.state(), CycleState::default());
        assert_eq!(machine.predicted_digit(), None);
    }
}
