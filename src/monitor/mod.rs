//! Monitoring loop
//!
//! Drives a reading source through the inference pipeline at a fixed cadence:
//!
//! ```text
//! Idle → Sampling → Inferring → Presenting → (delay) → Sampling → …
//! ```
//!
//! Cycles never overlap: cycle N is presented before cycle N+1 samples. A bad
//! reading or a failing source skips the cycle and the loop carries on. The
//! loop ends only through its `LoopControl` (cycle limit or shutdown flag),
//! which is checked between cycles and during the delay, never mid-cycle.

mod sink;
mod source;


pub use sink::{
    render_diagnosis, render_text, ConsoleSink, ConsoleStyle, PresentationSink, RecordingSink,
};
pub use source::{ReadingSource, SimulatedSensor};

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::Error;
use crate::pipeline::{Diagnosis, InferencePipeline};

/// Default delay between cycles
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Longest uninterrupted sleep while waiting for the next cycle
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// Monitoring loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    /// Waiting for the next cycle
    Idle,
    /// Obtaining a reading from the source
    Sampling,
    /// Running the pipeline
    Inferring,
    /// Handing the result to the sink
    Presenting,
}

/// Exit condition for `MonitoringLoop::run`.
#[derive(Debug, Clone, Default)]
pub struct LoopControl {
    max_cycles: Option<u64>,
    shutdown: Arc<AtomicBool>,
}

impl LoopControl {
    /// Run until shut down
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after `n` cycles
    pub fn with_max_cycles(mut self, n: u64) -> Self {
        self.max_cycles = Some(n);
        self
    }

    /// Share an external shutdown flag
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = flag;
        self
    }

    /// Handle that stops the loop when set
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Request the loop to stop after the in-flight cycle
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    fn should_stop(&self, cycles: u64) -> bool {
        self.is_shutdown() || self.max_cycles.is_some_and(|max| cycles >= max)
    }
}

/// What happened in one cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Diagnosis handed to the sink
    Presented(Box<Diagnosis>),
    /// Cycle skipped in the given state
    Skipped(LoopState, Error),
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopSummary {
    /// Cycles started
    pub cycles: u64,
    /// Cycles presented
    pub presented: u64,
    /// Presented cycles with a failure verdict
    pub failures: u64,
    /// Cycles skipped on errors
    pub skipped: u64,
}

/// Sequential sample → infer → present loop.
pub struct MonitoringLoop<S, P> {
    pipeline: InferencePipeline,
    source: S,
    sink: P,
    interval: Duration,
    state: LoopState,
    summary: LoopSummary,
    latest: Option<Diagnosis>,
}

impl<S: ReadingSource, P: PresentationSink> MonitoringLoop<S, P> {
    /// Create a loop with the default 5 second interval
    pub fn new(pipeline: InferencePipeline, source: S, sink: P) -> Self {
        Self {
            pipeline,
            source,
            sink,
            interval: DEFAULT_INTERVAL,
            state: LoopState::Idle,
            summary: LoopSummary::default(),
            latest: None,
        }
    }

    /// Set the delay between cycles
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Current state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Cycles started so far
    pub fn cycles(&self) -> u64 {
        self.summary.cycles
    }

    /// Totals so far
    pub fn summary(&self) -> LoopSummary {
        self.summary
    }

    /// Latest presented diagnosis
    pub fn latest(&self) -> Option<&Diagnosis> {
        self.latest.as_ref()
    }

    /// Presentation sink
    pub fn sink(&self) -> &P {
        &self.sink
    }

    /// Consume the loop, returning the sink
    pub fn into_sink(self) -> P {
        self.sink
    }

    fn skip(&mut self, cycle: u64, error: Error) -> CycleOutcome {
        let state = self.state;
        tracing::warn!(cycle, ?state, code = error.code(), error = %error, "cycle skipped");
        self.sink.skipped(cycle, state, &error);
        self.summary.skipped += 1;
        self.state = LoopState::Idle;
        CycleOutcome::Skipped(state, error)
    }

    /// Run exactly one cycle, from sampling to presentation.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        self.summary.cycles += 1;
        let cycle = self.summary.cycles;

        self.state = LoopState::Sampling;
        let reading = match self.source.next_reading() {
            Ok(reading) => reading,
            Err(e) => return self.skip(cycle, e),
        };

        self.state = LoopState::Inferring;
        let diagnosis = match self.pipeline.diagnose(&reading) {
            Ok(diagnosis) => diagnosis,
            Err(e) => return self.skip(cycle, e),
        };

        self.state = LoopState::Presenting;
        if diagnosis.verdict.is_failure() {
            self.summary.failures += 1;
            tracing::info!(cycle, verdict = %diagnosis.verdict, "failure predicted");
        } else {
            tracing::debug!(cycle, verdict = %diagnosis.verdict, "cycle presented");
        }
        self.sink.present(cycle, &diagnosis);
        self.summary.presented += 1;
        self.latest = Some(diagnosis.clone());
        self.state = LoopState::Idle;

        CycleOutcome::Presented(Box::new(diagnosis))
    }

    /// Run cycles until the control says stop.
    pub fn run(&mut self, control: &LoopControl) -> LoopSummary {
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "monitoring started");

        while !control.should_stop(self.summary.cycles) {
            self.run_cycle();
            if control.should_stop(self.summary.cycles) {
                break;
            }
            self.wait(control);
        }

        tracing::info!(
            cycles = self.summary.cycles,
            failures = self.summary.failures,
            skipped = self.summary.skipped,
            "monitoring stopped"
        );
        self.summary
    }

    /// Sleep for the interval, waking early on shutdown.
    fn wait(&self, control: &LoopControl) {
        let deadline = Instant::now() + self.interval;
        loop {
            let now = Instant::now();
            if now >= deadline || control.is_shutdown() {
                return;
            }
            std::thread::sleep((deadline - now).min(SHUTDOWN_POLL));
        }
    }
}
