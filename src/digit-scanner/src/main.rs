//! Digit Scanner - tracks digit frequencies over a sliding window and runs
//! the timed signal cycle.
//!
//! Cycle: ANALYSIS until the runner-up digit reaches the threshold, then a
//! preparation countdown, then an entry window for the predicted digit.
//! Signals are advisory only.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use signal_core::{Config, CycleConfig, DigitSource, RandomDigitSource, ReplaySource, Session, SignalSink};

mod feed;
mod metrics;
mod report;

use feed::parse_feed;
use metrics::Metrics;
use report::{log_history, print_probability_table, JsonSink, LogSink};

/// Upper bound on the random digits used to pre-seed the window.
const MAX_SEED_DIGITS: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    /// Simulated uniform stream, one digit per tick
    Random,
    /// Digits read from stdin as they arrive
    Stdin,
    /// Digits replayed from a file, one per tick
    File,
}

/// Digit Scanner - frequency signals over a digit stream
#[derive(Parser, Debug)]
#[command(name = "digit-scanner")]
#[command(about = "Tracks digit frequencies and runs the timed signal cycle")]
struct Args {
    /// Window size in digits (overrides WINDOW_CAPACITY)
    #[arg(long)]
    window: Option<usize>,

    /// Runner-up frequency threshold in percent (overrides SIGNAL_THRESHOLD_PCT)
    #[arg(long)]
    threshold: Option<f64>,

    /// Preparation countdown in seconds (overrides PREP_SECONDS)
    #[arg(long)]
    prep_secs: Option<u32>,

    /// Entry window in seconds (overrides ENTRY_SECONDS)
    #[arg(long)]
    entry_secs: Option<u32>,

    /// Cycle tick interval in milliseconds (overrides TICK_INTERVAL_MS)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Market label shown in logs
    #[arg(long, default_value = "R_25")]
    market: String,

    /// Where digits come from
    #[arg(long, value_enum, default_value = "random")]
    source: SourceKind,

    /// Replay file for --source file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Replay the file forever instead of stopping at its end
    #[arg(long)]
    repeat: bool,

    /// Seed for the random source
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many cycle ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Write events to stdout as JSON lines
    #[arg(long)]
    json: bool,

    /// Heartbeat interval in seconds
    #[arg(long, default_value = "60")]
    heartbeat_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stderr keeps stdout free for --json
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    info!("=== Digit Scanner ===");
    info!("Market: {}", args.market);
    info!("Window: {} digits", config.window_capacity);
    info!("Threshold: {}%", config.cycle.threshold_pct);
    info!(
        "Cycle: {}s preparation, {}s entry",
        config.cycle.prep_seconds, config.cycle.entry_seconds
    );
    info!("Tick interval: {}ms", config.tick_interval_ms);
    info!("Source: {:?}", args.source);

    let mut session =
        Session::new(config.window_capacity, config.cycle).context("Invalid window size")?;
    let mut metrics = Metrics::new();
    let mut sink: Box<dyn SignalSink> = if args.json {
        Box::new(JsonSink::new(std::io::stdout()))
    } else {
        Box::new(LogSink::new(&args.market))
    };

    // Pull sources deliver one digit per tick; stdin pushes as lines arrive
    let mut pull_source: Option<Box<dyn DigitSource>> = None;
    let mut stdin_lines: Option<Lines<BufReader<Stdin>>> = None;
    let mut seed_digits = Vec::new();

    match args.source {
        SourceKind::Random => {
            let mut source = match args.seed {
                Some(seed) => RandomDigitSource::with_seed(seed),
                None => RandomDigitSource::new(),
            };
            seed_digits = source.take_batch(config.window_capacity.min(MAX_SEED_DIGITS));
            pull_source = Some(Box::new(source));
        }
        SourceKind::Stdin => {
            stdin_lines = Some(BufReader::new(tokio::io::stdin()).lines());
        }
        SourceKind::File => {
            let path = args
                .file
                .as_ref()
                .context("--source file requires --file <path>")?;
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let parsed = parse_feed(&text);
            for token in &parsed.rejected {
                warn!("Skipping non-numeric token in replay file: {:?}", token);
                metrics.record_rejected();
            }
            if parsed.values.is_empty() {
                anyhow::bail!("Replay file {} contains no digits", path.display());
            }
            info!("Loaded {} values from {}", parsed.values.len(), path.display());
            let source = if args.repeat {
                ReplaySource::looping(parsed.values)
            } else {
                ReplaySource::once(parsed.values)
            };
            pull_source = Some(Box::new(source));
        }
    }

    session
        .start(seed_digits)
        .context("Failed to seed window")?;
    print_probability_table(&session.analyze(), config.cycle.threshold_pct);

    let mut tick_interval = tokio::time::interval(Duration::from_millis(config.tick_interval_ms));
    tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut heartbeat_interval = tokio::time::interval(Duration::from_secs(args.heartbeat_secs));
    heartbeat_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut cycle_ticks: u64 = 0;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal, exiting...");
                break;
            }
            _ = heartbeat_interval.tick() => {
                metrics.print_summary(&args.market);
            }
            line = next_line(&mut stdin_lines) => {
                match line {
                    Ok(Some(line)) => {
                        let parsed = parse_feed(&line);
                        for token in &parsed.rejected {
                            warn!("Rejected input {:?}: not an integer", token);
                            metrics.record_rejected();
                        }
                        for value in parsed.values {
                            ingest(&mut session, &mut metrics, value);
                        }
                    }
                    Ok(None) => {
                        info!("Stdin closed, no more digits will arrive");
                        stdin_lines = None;
                    }
                    Err(e) => {
                        error!("Failed to read stdin: {}", e);
                        stdin_lines = None;
                    }
                }
            }
            _ = tick_interval.tick() => {
                // The stream digit lands before the cycle reads the window
                if let Some(source) = pull_source.as_mut() {
                    match source.next_digit() {
                        Some(value) => ingest(&mut session, &mut metrics, value),
                        None => {
                            info!("Replay finished");
                            break;
                        }
                    }
                }

                if let Some(event) = session.tick(sink.as_mut()) {
                    metrics.record_event(&event);
                    if event.is_transition() {
                        log_history(&session.snapshot());
                    }
                }

                cycle_ticks += 1;
                if args.max_ticks.is_some_and(|max| cycle_ticks >= max) {
                    info!("Reached {} cycle ticks", cycle_ticks);
                    break;
                }
            }
        }
    }

    // Final summary
    info!("=== FINAL STATUS ===");
    info!("Cycle: {:?}", session.cycle_state());
    print_probability_table(&session.analyze(), config.cycle.threshold_pct);
    metrics.print_summary(&args.market);

    session.stop();
    info!("Shutdown complete");
    Ok(())
}

/// Environment config with command-line overrides applied.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::from_env().context("Failed to load configuration")?;

    if let Some(window) = args.window {
        config.window_capacity = window;
    }
    if let Some(threshold) = args.threshold {
        let threshold_pct = Decimal::try_from(threshold).context("Invalid threshold")?;
        if !CycleConfig::is_valid_threshold(&threshold_pct) {
            anyhow::bail!("--threshold must be between 0 and 100, got {}", threshold);
        }
        config.cycle.threshold_pct = threshold_pct;
    }
    if let Some(prep) = args.prep_secs {
        config.cycle.prep_seconds = prep;
    }
    if let Some(entry) = args.entry_secs {
        config.cycle.entry_seconds = entry;
    }
    if let Some(tick_ms) = args.tick_ms {
        if tick_ms == 0 {
            anyhow::bail!("--tick-ms must be positive");
        }
        config.tick_interval_ms = tick_ms;
    }
    if args.heartbeat_secs == 0 {
        anyhow::bail!("--heartbeat-secs must be positive");
    }

    Ok(config)
}

/// Push one value, counting rejections instead of aborting.
fn ingest(session: &mut Session, metrics: &mut Metrics, value: i64) {
    match session.push(value) {
        Ok(_) => metrics.record_ingested(),
        Err(e) => {
            warn!("Rejected input: {}", e);
            metrics.record_rejected();
        }
    }
}

/// Next stdin line, or never if stdin is not a source.
async fn next_line(lines: &mut Option<Lines<BufReader<Stdin>>>) -> std::io::Result<Option<String>> {
    match lines {
        Some(lines) => lines.next_line().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_core::{CyclePhase, SignalEvent};

    #[test]
    fn test_ingest_counts_rejections() {
        let mut session = Session::new(4, Default::default()).unwrap();
        let mut metrics = Metrics::new();

        ingest(&mut session, &mut metrics, 3);
        ingest(&mut session, &mut metrics, 10);
        ingest(&mut session, &mut metrics, -1);

        assert_eq!(metrics.ticks_ingested(), 1);
        assert_eq!(metrics.rejected(), 2);
        assert_eq!(session.snapshot().len(), 1);
    }

    #[test]
    fn test_threshold_override_out_of_range_rejected() {
        for flag in ["--threshold=-5", "--threshold=100.5"] {
            let args = Args::try_parse_from(["digit-scanner", flag]).unwrap();
            assert!(load_config(&args).is_err(), "{} accepted", flag);
        }
    }

    #[test]
    fn test_threshold_override_applied() {
        let args = Args::try_parse_from(["digit-scanner", "--threshold", "30"]).unwrap();
        let config = load_config(&args).unwrap();
        assert_eq!(config.cycle.threshold_pct, Decimal::from(30));
    }

    #[test]
    fn test_seed_batch_is_bounded() {
        let mut source = RandomDigitSource::with_seed(1);
        let batch = source.take_batch(usize::MAX.min(MAX_SEED_DIGITS));
        assert_eq!(batch.len(), MAX_SEED_DIGITS);

        let mut session = Session::new(usize::MAX, Default::default()).unwrap();
        session.start(batch).unwrap();
        assert_eq!(session.snapshot().len(), MAX_SEED_DIGITS);
    }

    #[test]
    fn test_replay_drives_full_cycle() {
        let mut session = Session::new(8, Default::default()).unwrap();
        session.start([1, 1, 1, 1, 1, 1, 1]).unwrap();
        let mut source = ReplaySource::looping(vec![2, 1]);
        let mut metrics = Metrics::new();
        let mut events: Vec<SignalEvent> = Vec::new();

        // signal + 20 preparation + 16 entry
        for _ in 0..37 {
            let value = source.next_digit().unwrap();
            ingest(&mut session, &mut metrics, value);
            if let Some(event) = session.tick(&mut events) {
                metrics.record_event(&event);
            }
        }

        assert!(matches!(events[0], SignalEvent::SignalFound { .. }));
        assert!(matches!(events[20], SignalEvent::EntryOpened { .. }));
        assert!(matches!(events[36], SignalEvent::EntryClosed { .. }));
        assert_eq!(session.cycle_state().phase, CyclePhase::Analysis);
        assert_eq!(metrics.total_signals(), 1);
    }
}
