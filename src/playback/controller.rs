/*!
 * Playback controller.
 *
 * The controller owns the sequence model and at most one media adapter. It is
 * driven by two kinds of input, transport commands (`play`, `pause`, `stop`,
 * `seek`, `load`) and adapter events, and must be fed them one at a time.
 *
 * Exactly-once advancement rests on two rules:
 * - the current adapter is disposed before any other adapter is created
 * - an event is acted on only if it comes from the current adapter and the
 *   controller is in the state that event belongs to
 */

use log::{debug, info, warn};

use super::sink::PresentationSink;
use super::state::{PlaybackSnapshot, PlaybackState, ReasonCode, Transition};
use crate::errors::{MediaError, PlaybackError};
use crate::media::{AdapterId, MediaAdapter, MediaEvent, MediaEventKind, MediaEventSender, MediaFactory};
use crate::sequence::{SequenceModel, SignSequence};

/// State machine sequencing sign clips
pub struct PlaybackController<F: MediaFactory, S: PresentationSink> {
    model: SequenceModel,
    state: PlaybackState,
    factory: F,
    sink: S,
    events: MediaEventSender,
    active: Option<Box<dyn MediaAdapter>>,
    next_id: AdapterId,
    // The current adapter ended while paused; resume advances instead of restarting it
    ended_while_paused: bool,
    played_in_run: bool,
    failures_in_run: usize,
    last_reason: Option<ReasonCode>,
}

impl<F: MediaFactory, S: PresentationSink> PlaybackController<F, S> {
    /// Create an idle controller with an empty sequence
    ///
    /// `events` is handed to every adapter; whoever holds the receiving end
    /// must pass each event back through [`PlaybackController::handle_media_event`].
    pub fn new(factory: F, sink: S, events: MediaEventSender) -> Self {
        Self {
            model: SequenceModel::default(),
            state: PlaybackState::Idle,
            factory,
            sink,
            events,
            active: None,
            next_id: AdapterId::new(1),
            ended_while_paused: false,
            played_in_run: false,
            failures_in_run: 0,
            last_reason: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.model.position()
    }

    pub fn sequence(&self) -> &SignSequence {
        self.model.sequence()
    }

    /// Unit currently being loaded, played or held paused
    pub fn active_index(&self) -> Option<usize> {
        match self.state {
            PlaybackState::Loading | PlaybackState::Playing | PlaybackState::Paused => Some(self.model.position()),
            _ => None,
        }
    }

    /// Id of the live adapter, if any
    pub fn active_adapter(&self) -> Option<AdapterId> {
        self.active.as_ref().map(|adapter| adapter.id())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.state,
            cursor: self.model.position(),
            active_index: self.active_index(),
            len: self.model.len(),
            last_reason: self.last_reason,
        }
    }

    /// Replace the sequence; the controller returns to `Idle`
    pub fn load(&mut self, sequence: SignSequence) {
        self.release_adapter();
        info!(
            "Loaded sequence of {} units ({} playable)",
            sequence.len(),
            sequence.playable_count()
        );
        self.model.load(sequence);
        self.reset_run();
        self.last_reason = None;
        self.set_state(PlaybackState::Idle, None);
    }

    /// Drop the sequence entirely
    pub fn clear(&mut self) {
        self.load(SignSequence::empty());
    }

    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Loading | PlaybackState::Playing => {
                debug!("play ignored while {}", self.state);
            }
            PlaybackState::Paused => self.resume(),
            PlaybackState::Idle | PlaybackState::Stopped => {
                let from = self.model.position();
                self.begin_run(from);
            }
            PlaybackState::Completed | PlaybackState::Failed => {
                self.rewind();
                self.begin_run(0);
            }
        }
    }

    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            debug!("pause ignored while {}", self.state);
            return;
        }
        if let Some(adapter) = self.active.as_mut() {
            adapter.pause();
        }
        let index = self.model.position();
        self.set_state(PlaybackState::Paused, Some(index));
    }

    /// Pause when progressing, play otherwise
    pub fn toggle(&mut self) {
        if self.state.is_progressing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn stop(&mut self) {
        match self.state {
            PlaybackState::Idle => {}
            PlaybackState::Stopped => self.rewind(),
            PlaybackState::Completed | PlaybackState::Failed => {
                self.release_adapter();
                self.rewind();
            }
            PlaybackState::Loading | PlaybackState::Playing | PlaybackState::Paused => {
                self.release_adapter();
                self.rewind();
                self.set_state(PlaybackState::Stopped, None);
            }
        }
    }

    /// Jump to the unit at `index`
    ///
    /// The unit must exist and have media. While playback is in progress or
    /// paused the unit is opened right away; otherwise only the cursor moves.
    pub fn seek(&mut self, index: usize) -> Result<(), PlaybackError> {
        if let Err(e) = self.validate_seek(index) {
            warn!("Seek rejected: {}", e);
            self.sink.on_rejected(&e);
            return Err(e);
        }

        match self.state {
            PlaybackState::Loading | PlaybackState::Playing | PlaybackState::Paused => {
                self.release_adapter();
                self.activate_from(index);
            }
            PlaybackState::Idle | PlaybackState::Stopped => {
                self.move_cursor(index);
                let state = self.state;
                self.set_state(state, Some(index));
            }
            PlaybackState::Completed | PlaybackState::Failed => {
                self.move_cursor(index);
                self.reset_run();
                self.set_state(PlaybackState::Stopped, Some(index));
            }
        }
        Ok(())
    }

    /// Apply an event emitted by an adapter
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        if self.active_adapter() != Some(event.adapter) {
            debug!("Dropping {:?} from superseded {}", event.kind, event.adapter);
            return;
        }

        match (event.kind, self.state) {
            (MediaEventKind::Ready, PlaybackState::Loading) => self.start_active(),
            (MediaEventKind::Ended, PlaybackState::Playing) => {
                debug!("Unit {} ended", self.model.position());
                self.advance();
            }
            (MediaEventKind::Ended, PlaybackState::Paused) => {
                debug!("Unit {} ended while paused", self.model.position());
                self.ended_while_paused = true;
            }
            (MediaEventKind::Failed(e), PlaybackState::Loading | PlaybackState::Playing) => {
                self.skip_failed(&e);
            }
            (kind, state) => {
                debug!("Ignoring {:?} from {} while {}", kind, event.adapter, state);
            }
        }
    }

    fn validate_seek(&self, index: usize) -> Result<(), PlaybackError> {
        let unit = self.model.sequence().get(index).ok_or(PlaybackError::OutOfRange {
            index,
            len: self.model.len(),
        })?;
        if !unit.is_playable() {
            return Err(PlaybackError::NoMedia {
                index,
                word: unit.word().to_string(),
            });
        }
        Ok(())
    }

    fn begin_run(&mut self, from: usize) {
        self.reset_run();
        if self.model.is_empty() {
            self.fail(ReasonCode::EmptySequence);
            return;
        }
        if self.model.find_next_playable(0).is_none() {
            self.fail(ReasonCode::NoPlayableMedia);
            return;
        }
        self.activate_from(from);
    }

    fn resume(&mut self) {
        if self.ended_while_paused {
            self.advance();
            return;
        }
        let result = match self.active.as_mut() {
            Some(adapter) => adapter.start(),
            None => Err(MediaError::NotReady),
        };
        match result {
            Ok(()) => {
                let index = self.model.position();
                self.set_state(PlaybackState::Playing, Some(index));
            }
            Err(e) => self.skip_failed(&e),
        }
    }

    fn start_active(&mut self) {
        let result = match self.active.as_mut() {
            Some(adapter) => adapter.start(),
            None => Err(MediaError::NotReady),
        };
        match result {
            Ok(()) => {
                self.played_in_run = true;
                let index = self.model.position();
                self.set_state(PlaybackState::Playing, Some(index));
            }
            Err(e) => self.skip_failed(&e),
        }
    }

    fn skip_failed(&mut self, error: &MediaError) {
        warn!("Skipping unit {}: {}", self.model.position(), error);
        self.failures_in_run += 1;
        self.advance();
    }

    /// Leave the current unit and activate the next playable one
    fn advance(&mut self) {
        self.release_adapter();
        self.model.advance();
        let from = self.model.position();
        self.activate_from(from);
    }

    /// Open the first playable unit at or after `from`
    ///
    /// Units whose `open` fails synchronously are skipped in the same pass,
    /// so the loop runs at most once per remaining unit.
    fn activate_from(&mut self, from: usize) {
        let mut from = from;
        loop {
            let Some(index) = self.model.find_next_playable(from) else {
                self.finish_run();
                return;
            };
            self.move_cursor(index);

            let Some(locator) = self.model.current_unit().and_then(|u| u.media_ref()).map(str::to_string) else {
                self.finish_run();
                return;
            };

            self.release_adapter();
            let id = self.next_id;
            self.next_id = id.next();
            let mut adapter = self.factory.create(id, self.events.clone());

            match adapter.open(&locator) {
                Ok(()) => {
                    debug!("{} opening unit {} ({})", id, index, locator);
                    self.active = Some(adapter);
                    self.set_state(PlaybackState::Loading, Some(index));
                    return;
                }
                Err(e) => {
                    warn!("Skipping unit {}: {}", index, e);
                    adapter.dispose();
                    self.failures_in_run += 1;
                    from = index + 1;
                }
            }
        }
    }

    /// Nothing left to activate in this run
    fn finish_run(&mut self) {
        self.release_adapter();
        self.move_cursor(self.model.len());
        if !self.played_in_run && self.failures_in_run > 0 {
            self.fail(ReasonCode::AllMediaFailed);
            return;
        }
        info!("Playback completed");
        self.last_reason = Some(ReasonCode::EndOfSequence);
        self.state = PlaybackState::Completed;
        self.notify(Transition::terminal(PlaybackState::Completed, ReasonCode::EndOfSequence));
    }

    fn fail(&mut self, reason: ReasonCode) {
        self.release_adapter();
        warn!("Playback failed: {}", reason);
        self.last_reason = Some(reason);
        self.state = PlaybackState::Failed;
        self.notify(Transition::terminal(PlaybackState::Failed, reason));
    }

    fn reset_run(&mut self) {
        self.played_in_run = false;
        self.failures_in_run = 0;
    }

    fn rewind(&mut self) {
        self.move_cursor(0);
    }

    fn move_cursor(&mut self, index: usize) {
        // Callers pass indices within [0, len]
        if let Err(e) = self.model.seek(index) {
            warn!("Cursor update refused: {}", e);
        }
    }

    fn release_adapter(&mut self) {
        if let Some(mut adapter) = self.active.take() {
            debug!("Disposing {}", adapter.id());
            adapter.dispose();
        }
        self.ended_while_paused = false;
    }

    fn set_state(&mut self, state: PlaybackState, active_index: Option<usize>) {
        self.state = state;
        self.notify(Transition::new(state, active_index));
    }

    fn notify(&mut self, transition: Transition) {
        debug!(
            "-> {} (unit {:?}, reason {:?})",
            transition.state, transition.active_index, transition.reason
        );
        self.sink.on_transition(&transition);
    }
}

impl<F: MediaFactory, S: PresentationSink> Drop for PlaybackController<F, S> {
    fn drop(&mut self) {
        self.release_adapter();
    }
}
