use serde::Serialize;

use super::model::{SignSequence, UnitKind};

/// Seconds a single sign is expected to take on screen
pub const SECONDS_PER_SIGN: f64 = 2.5;

/// Summary figures shown next to a translated sequence
///
/// Every unit counts here, including the ones playback skips for lack of media.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceStats {
    pub sign_count: usize,
    pub word_count: usize,
    pub playable_count: usize,
    pub fingerspell_count: usize,
    pub estimated_duration_secs: f64,
}

impl SequenceStats {
    /// Compute statistics for `sequence` translated from `input_text`
    ///
    /// `server_estimate` wins over the local estimate when the service sent one.
    pub fn compute(sequence: &SignSequence, input_text: &str, server_estimate: Option<f64>) -> Self {
        let sign_count = sequence.len();
        let estimated_duration_secs = server_estimate
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .unwrap_or(sign_count as f64 * SECONDS_PER_SIGN);

        Self {
            sign_count,
            word_count: input_text.split_whitespace().count(),
            playable_count: sequence.playable_count(),
            fingerspell_count: sequence
                .units()
                .iter()
                .filter(|u| u.kind() == UnitKind::FingerspellLetter)
                .count(),
            estimated_duration_secs,
        }
    }

    /// Duration rounded to whole seconds, as displayed
    pub fn display_duration(&self) -> String {
        format!("{}s", self.estimated_duration_secs.round() as u64)
    }
}
