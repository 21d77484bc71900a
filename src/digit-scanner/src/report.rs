//! Presentation: signal sinks and the probability table.

use std::io::Write;

use rust_decimal::Decimal;
use signal_core::{AnalysisSnapshot, Bias, Digit, SignalEvent, SignalSink};
use tracing::{debug, info, warn};

/// Number of most recent digits shown in the history line.
const HISTORY_LEN: usize = 32;

/// Human-readable status lines through `tracing`.
pub struct LogSink {
    market: String,
}

impl LogSink {
    pub fn new(market: &str) -> Self {
        Self {
            market: market.to_string(),
        }
    }
}

impl SignalSink for LogSink {
    fn emit(&mut self, event: &SignalEvent) {
        info!("[{}] {}", self.market, status_line(event));
    }
}

/// One JSON object per event, newline delimited.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> SignalSink for JsonSink<W> {
    fn emit(&mut self, event: &SignalEvent) {
        let result = serde_json::to_writer(&mut self.out, event)
            .map_err(std::io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"))
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            warn!("Failed to write event: {}", e);
        }
    }
}

/// Status text shown for an event.
pub fn status_line(event: &SignalEvent) -> String {
    match event {
        SignalEvent::Scanning {
            runner_up,
            threshold_pct,
            ..
        } => format!(
            "Next Hottest: {} at {:.2}% (Target >= {}%)",
            runner_up.digit, runner_up.frequency_pct, threshold_pct
        ),
        SignalEvent::SignalFound {
            digit,
            frequency_pct,
            prep_seconds,
        } => format!(
            "Signal Found! Digit {} at {:.2}%, starting {}s preparation",
            digit, frequency_pct, prep_seconds
        ),
        SignalEvent::Countdown { digit, remaining } => {
            format!("Next prediction (digit {}) in: {}s", digit, remaining)
        }
        SignalEvent::EntryOpened {
            digit,
            entry_seconds,
        } => format!("Entry Window OPEN for DIGIT {}! ({}s)", digit, entry_seconds),
        SignalEvent::EntryActive { digit, remaining } => {
            format!("DIGIT {} ENTRY NOW! ({}s remaining)", digit, remaining)
        }
        SignalEvent::EntryClosed { top, .. } => format!(
            "Entry Window Closed. Back to ANALYSIS (most frequent: {} at {:.2}%)",
            top.digit, top.frequency_pct
        ),
    }
}

fn bias_marker(bias: Bias) -> char {
    match bias {
        Bias::Above => '+',
        Bias::Below => '-',
        Bias::Uniform => '=',
    }
}

/// Print the ranked frequency table.
pub fn print_probability_table(analysis: &AnalysisSnapshot, threshold_pct: Decimal) {
    if analysis.is_empty() {
        info!("Gathering data...");
        return;
    }

    let top = analysis.top();
    info!(
        "Most Frequent: {} at {:.2}% over {} digits",
        top.digit,
        top.frequency_pct,
        analysis.sample_size()
    );
    info!("┌───────┬───────┬───────────────┬───────────────┐");
    info!("│ Digit │ Count │ Frequency (%) │ Status        │");
    info!("├───────┼───────┼───────────────┼───────────────┤");
    for row in analysis.rows() {
        info!(
            "│ {:^5} │ {:>5} │ {:>11.2} {} │ {:<13} │",
            row.digit,
            row.count,
            row.frequency_pct,
            bias_marker(row.bias()),
            analysis.status(row, threshold_pct).label()
        );
    }
    info!("└───────┴───────┴───────────────┴───────────────┘");
}

/// Log the tail of the window, oldest first.
pub fn log_history(digits: &[Digit]) {
    let start = digits.len().saturating_sub(HISTORY_LEN);
    let tail: String = digits[start..].iter().map(|d| d.to_string()).collect();
    debug!("History ({} digits): {}", digits.len(), tail);
}
