/*!
 * Terminal presentation of playback.
 *
 * `ConsoleSink` renders controller transitions as an `indicatif` progress bar:
 * the bar position is the active unit and the message names its word.
 */

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use parking_lot::Mutex;

use crate::errors::PlaybackError;
use crate::playback::{PlaybackState, PresentationSink, Transition};
use crate::sequence::SignSequence;

#[derive(Debug, Default)]
struct ConsoleState {
    labels: Vec<String>,
    status: String,
}

/// Progress-bar sink; clones drive the same bar
#[derive(Clone)]
pub struct ConsoleSink {
    bar: ProgressBar,
    state: Arc<Mutex<ConsoleState>>,
}

impl ConsoleSink {
    /// Sink drawing to stderr
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(0))
    }

    /// Sink that keeps its status line but draws nothing
    pub fn hidden() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_draw_target(ProgressDrawTarget::hidden());
        Self::with_bar(bar)
    }

    fn with_bar(bar: ProgressBar) -> Self {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} signs {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{bar:40}] {pos}/{len} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("█▓▒░"));

        Self {
            bar,
            state: Arc::new(Mutex::new(ConsoleState::default())),
        }
    }

    /// Remember the labels of `sequence` for the transitions that follow
    ///
    /// Call before the sequence is handed to the controller.
    pub fn show_sequence(&self, sequence: &SignSequence) {
        let labels = sequence
            .units()
            .iter()
            .map(|unit| format!("{} ({})", unit.word(), unit.kind().label()))
            .collect();
        self.state.lock().labels = labels;
        self.bar.set_length(sequence.len() as u64);
        self.bar.set_position(0);
    }

    /// Message currently shown next to the bar
    pub fn status_line(&self) -> String {
        self.state.lock().status.clone()
    }

    /// Print a line above the bar
    pub fn println(&self, line: impl AsRef<str>) {
        self.bar.println(line.as_ref());
    }

    fn label(&self, index: Option<usize>) -> String {
        let state = self.state.lock();
        index
            .and_then(|i| state.labels.get(i).cloned())
            .unwrap_or_default()
    }

    fn set_status(&self, status: String) {
        self.bar.set_message(status.clone());
        self.state.lock().status = status;
    }
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink").field("state", &self.state).finish()
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationSink for ConsoleSink {
    fn on_transition(&mut self, transition: &Transition) {
        if let Some(index) = transition.active_index {
            self.bar.set_position(index as u64);
        }
        let label = self.label(transition.active_index);

        let status = match (transition.state, transition.active_index) {
            (PlaybackState::Idle, None) => "Ready".to_string(),
            (PlaybackState::Idle | PlaybackState::Stopped, Some(_)) => format!("Next: {}", label),
            (PlaybackState::Loading, _) => format!("⏳ {}", label),
            (PlaybackState::Playing, _) => format!("▶ {}", label),
            (PlaybackState::Paused, _) => format!("⏸ {}", label),
            (PlaybackState::Stopped, None) => {
                self.bar.set_position(0);
                "⏹ Stopped".to_string()
            }
            (PlaybackState::Completed, _) => {
                if let Some(len) = self.bar.length() {
                    self.bar.set_position(len);
                }
                let message = transition.reason.map(|r| r.message()).unwrap_or("Animation finished");
                self.bar.println(format!("✅ {}", message));
                message.to_string()
            }
            (PlaybackState::Failed, _) => {
                let message = transition.reason.map(|r| r.message()).unwrap_or("Playback failed");
                self.bar.println(format!("❌ {}", message));
                message.to_string()
            }
        };
        self.set_status(status);
    }

    fn on_rejected(&mut self, error: &PlaybackError) {
        self.bar.println(format!("⚠️  {}", error));
    }
}
