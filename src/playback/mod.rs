/*!
 * Sequential playback of sign sequences.
 *
 * - `controller`: the state machine that sequences units and owns the adapter
 * - `state`: playback states, transitions and snapshots
 * - `sink`: presentation callbacks
 * - `session`: tokio task and handle that serialize access to a controller
 */

pub mod controller;
pub mod session;
pub mod sink;
pub mod state;

pub use controller::PlaybackController;
pub use session::{PlaybackSession, PlayerCommand, PlayerHandle};
pub use sink::{NullSink, PresentationSink, RecordingSink};
pub use state::{PlaybackSnapshot, PlaybackState, ReasonCode, Transition};
