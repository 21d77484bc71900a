//! Core library for the digit cycle signal engine.
//!
//! Provides:
//! - Validated digits and input errors
//! - A bounded sliding window over the digit stream
//! - Frequency analysis with deterministic ranking
//! - The timer-driven ANALYSIS / PREPARATION / ENTRY cycle
//! - Signal events and the sink seam for presentation layers
//! - Session control, configuration and digit sources

pub mod analyzer;
pub mod config;
pub mod cycle;
pub mod digit;
pub mod error;
pub mod session;
pub mod signal;
pub mod source;
pub mod window;

pub use analyzer::{analyze, AnalysisSnapshot, Bias, FrequencyRow, RowStatus, DIGIT_COUNT};
pub use config::{Config, ConfigError, CycleConfig};
pub use cycle::{CyclePhase, CycleState, CycleStateMachine};
pub use digit::Digit;
pub use error::InputError;
pub use session::Session;
pub use signal::{SignalEvent, SignalSink};
pub use source::{DigitSource, RandomDigitSource, ReplaySource};
pub use window::SlidingWindow;
