//! Metrics and logging for the digit scanner.

use std::collections::BTreeMap;
use std::time::Instant;

use signal_core::SignalEvent;
use tracing::info;

/// Metrics tracker for one scanner run.
pub struct Metrics {
    start_time: Instant,
    /// Digits accepted into the window
    ticks_ingested: u64,
    /// Inputs rejected (out of range or unparseable)
    rejected: u64,
    /// Cycle ticks processed
    cycle_ticks: u64,
    signals: u32,
    entries_opened: u32,
    entries_closed: u32,
    /// Signals per predicted digit
    predictions: BTreeMap<u8, u32>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            ticks_ingested: 0,
            rejected: 0,
            cycle_ticks: 0,
            signals: 0,
            entries_opened: 0,
            entries_closed: 0,
            predictions: BTreeMap::new(),
        }
    }

    /// Record a digit accepted into the window.
    pub fn record_ingested(&mut self) {
        self.ticks_ingested += 1;
    }

    /// Record a rejected input.
    pub fn record_rejected(&mut self) {
        self.rejected += 1;
    }

    /// Record the event produced by one cycle tick.
    pub fn record_event(&mut self, event: &SignalEvent) {
        self.cycle_ticks += 1;
        match event {
            SignalEvent::SignalFound { digit, .. } => {
                self.signals += 1;
                *self.predictions.entry(digit.value()).or_insert(0) += 1;
            }
            SignalEvent::EntryOpened { .. } => self.entries_opened += 1,
            SignalEvent::EntryClosed { .. } => self.entries_closed += 1,
            _ => {}
        }
    }

    pub fn ticks_ingested(&self) -> u64 {
        self.ticks_ingested
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    pub fn total_signals(&self) -> u32 {
        self.signals
    }

    /// Print metrics summary.
    pub fn print_summary(&self, market: &str) {
        let elapsed = self.start_time.elapsed();

        info!("╔════════════════════════════════════════════════════════════╗");
        info!("║              DIGIT SCANNER METRICS                         ║");
        info!("╠════════════════════════════════════════════════════════════╣");
        info!("║  Market:            {:>8}                                 ║", market);
        info!(
            "║  Uptime:            {:>8.1} minutes                       ║",
            elapsed.as_secs_f64() / 60.0
        );
        info!(
            "║  Digits Ingested:   {:>8}                                 ║",
            self.ticks_ingested
        );
        info!(
            "║  Rejected Inputs:   {:>8}                                 ║",
            self.rejected
        );
        info!(
            "║  Cycle Ticks:       {:>8}                                 ║",
            self.cycle_ticks
        );
        info!(
            "║  Signals Found:     {:>8}                                 ║",
            self.signals
        );
        info!(
            "║  Entries Open/Close:{:>4} / {:<4}                             ║",
            self.entries_opened, self.entries_closed
        );
        info!("╠════════════════════════════════════════════════════════════╣");
        info!("║  Per Digit:                                                ║");

        for (digit, count) in &self.predictions {
            info!(
                "║    {:<4}: {:>4} signals                                      ║",
                digit, count
            );
        }

        info!("╚════════════════════════════════════════════════════════════╝");
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
