/*!
 * Translated sign sequences.
 *
 * - `model`: sign units, the immutable sequence and the cursor model
 * - `stats`: summary figures for display
 */

pub mod model;
pub mod stats;

pub use model::{SequenceModel, SignSequence, SignUnit, UnitKind, UnitSpec};
pub use stats::{SECONDS_PER_SIGN, SequenceStats};
