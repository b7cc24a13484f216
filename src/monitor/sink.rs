//! Presentation sinks

use std::io::Write;

use super::LoopState;
use crate::error::Error;
use crate::pipeline::{Diagnosis, Verdict};

/// Receives each cycle's output.
pub trait PresentationSink {
    /// Present a completed cycle
    fn present(&mut self, cycle: u64, diagnosis: &Diagnosis);

    /// Called when a cycle is skipped
    fn skipped(&mut self, _cycle: u64, _state: LoopState, _error: &Error) {}
}

/// Console output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleStyle {
    /// Human-readable block per cycle
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Writes each cycle to a writer (stdout by default).
pub struct ConsoleSink<W: Write = std::io::Stdout> {
    out: W,
    style: ConsoleStyle,
}

impl ConsoleSink {
    /// Console sink on stdout
    pub fn stdout(style: ConsoleStyle) -> Self {
        Self::new(std::io::stdout(), style)
    }
}

impl<W: Write> ConsoleSink<W> {
    /// Console sink on any writer
    pub fn new(out: W, style: ConsoleStyle) -> Self {
        Self { out, style }
    }

    /// Consume the sink, returning the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Horizontal bar for a score relative to the largest one
fn bar(score: f32, max: f32, width: usize) -> String {
    let filled = if max > 0.0 { ((score / max) * width as f32).round() as usize } else { 0 };
    "█".repeat(filled.min(width))
}

/// Render one monitoring cycle as a text block.
pub fn render_text(cycle: u64, diagnosis: &Diagnosis) -> String {
    format!(
        "── cycle {cycle} · {} ──\n{}",
        diagnosis.evaluated_at.to_rfc3339(),
        render_diagnosis(diagnosis)
    )
}

/// Render a diagnosis: readings with alert markers, verdict, and causes.
pub fn render_diagnosis(diagnosis: &Diagnosis) -> String {
    let mut text = String::new();

    for value in &diagnosis.readings {
        let marker = if value.alerting { "!" } else { " " };
        text.push_str(&format!("  {marker} {:<26} {}\n", value.feature, value.value));
    }

    match &diagnosis.verdict {
        Verdict::Normal => text.push_str("  ✓ Machine is operating normally\n"),
        Verdict::Failure(kind) => {
            text.push_str(&format!("  ⚠ Failure detected: {kind}\n"));
            if let Some(causes) = &diagnosis.causes {
                text.push_str("  Possible causes:\n");
                for cause in causes {
                    text.push_str(&format!("    → {} ({:.4})\n", cause.feature, cause.score));
                }
            }
            if let Some(contributions) = &diagnosis.contributions {
                let max = contributions.first().map_or(0.0, |c| c.score);
                text.push_str("  Feature contribution:\n");
                for c in contributions {
                    text.push_str(&format!("    {:<26} {}\n", c.feature, bar(c.score, max, 30)));
                }
            }
            if let Some(reason) = &diagnosis.explanation_unavailable {
                text.push_str(&format!("  (no explanation: {reason})\n"));
            }
        }
    }
    text
}

impl<W: Write> PresentationSink for ConsoleSink<W> {
    fn present(&mut self, cycle: u64, diagnosis: &Diagnosis) {
        let rendered = match self.style {
            ConsoleStyle::Text => render_text(cycle, diagnosis),
            ConsoleStyle::Json => match serde_json::to_string(diagnosis) {
                Ok(json) => format!("{json}\n"),
                Err(e) => {
                    tracing::error!(cycle, error = %e, "cannot serialize diagnosis");
                    return;
                }
            },
        };
        if let Err(e) = self.out.write_all(rendered.as_bytes()).and_then(|()| self.out.flush()) {
            tracing::error!(cycle, error = %e, "cannot write to console");
        }
    }

    fn skipped(&mut self, cycle: u64, _state: LoopState, error: &Error) {
        if self.style == ConsoleStyle::Text {
            if let Err(e) = writeln!(self.out, "── cycle {cycle} skipped: {error}") {
                tracing::error!(cycle, error = %e, "cannot write to console");
            }
        }
    }
}

/// Keeps every presented cycle in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Presented cycles
    pub presented: Vec<(u64, Diagnosis)>,
    /// Skipped cycles with the error code
    pub skipped: Vec<(u64, LoopState, &'static str)>,
}

impl RecordingSink {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresentationSink for RecordingSink {
    fn present(&mut self, cycle: u64, diagnosis: &Diagnosis) {
        self.presented.push((cycle, diagnosis.clone()));
    }

    fn skipped(&mut self, cycle: u64, state: LoopState, error: &Error) {
        self.skipped.push((cycle, state, error.code()));
    }
}

impl<S: PresentationSink + ?Sized> PresentationSink for &mut S {
    fn present(&mut self, cycle: u64, diagnosis: &Diagnosis) {
        (**self).present(cycle, diagnosis);
    }

    fn skipped(&mut self, cycle: u64, state: LoopState, error: &Error) {
        (**self).skipped(cycle, state, error);
    }
}
