//! Session control: one window and one cycle machine, started and stopped
//! together.

use tracing::{debug, info};

use crate::analyzer::{analyze, AnalysisSnapshot};
use crate::config::CycleConfig;
use crate::cycle::{CycleState, CycleStateMachine};
use crate::digit::Digit;
use crate::error::InputError;
use crate::signal::{SignalEvent, SignalSink};
use crate::window::SlidingWindow;

/// Owns the per-session state. Not shared: the 1 Hz driver and the digit
/// producer must be serialized by the caller (e.g. one `select!` loop).
#[derive(Debug, Clone)]
pub struct Session {
    window: SlidingWindow,
    machine: CycleStateMachine,
    running: bool,
}

impl Session {
    pub fn new(window_capacity: usize, cycle: CycleConfig) -> Result<Self, InputError> {
        Ok(Self {
            window: SlidingWindow::new(window_capacity)?,
            machine: CycleStateMachine::new(cycle),
            running: false,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Reset, pre-seed the window and start. Returns false if already running.
    pub fn start<I>(&mut self, seed: I) -> Result<bool, InputError>
    where
        I: IntoIterator<Item = i64>,
    {
        if self.running {
            return Ok(false);
        }

        self.window.seed(seed)?;
        self.machine.reset();
        self.running = true;

        info!(
            "Session started (window: {}/{} digits), cycle: {}",
            self.window.len(),
            self.window.capacity(),
            self.machine.phase().name()
        );
        Ok(true)
    }

    /// Discard window and cycle progress. Returns false if not running.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.window.clear();
        self.machine.reset();
        self.running = false;

        info!("Session stopped");
        true
    }

    /// Ingest one observation.
    pub fn push(&mut self, value: i64) -> Result<Digit, InputError> {
        self.window.push(value)
    }

    /// Resize the window and return the refreshed analysis.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<AnalysisSnapshot, InputError> {
        self.window.set_capacity(capacity)?;
        debug!(
            "Window capacity set to {} ({} digits held)",
            capacity,
            self.window.len()
        );
        Ok(self.analyze())
    }

    /// Run one cycle tick over the current (post-push) window.
    ///
    /// Returns `None` without touching the machine while stopped.
    pub fn tick(&mut self, sink: &mut dyn SignalSink) -> Option<SignalEvent> {
        if !self.running {
            return None;
        }

        let analysis = self.analyze();
        let event = self.machine.on_tick(&analysis);
        sink.emit(&event);
        Some(event)
    }

    pub fn snapshot(&self) -> Vec<Digit> {
        self.window.snapshot()
    }

    pub fn analyze(&self) -> AnalysisSnapshot {
        analyze(&self.window.snapshot())
    }

    pub fn cycle_state(&self) -> CycleState {
        self.machine.state()
    }

    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }

    pub fn cycle_config(&self) -> &CycleConfig {
        self.machine.config()
    }
}
