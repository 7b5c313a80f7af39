use std::sync::Arc;

use parking_lot::Mutex;

use super::state::{PlaybackState, Transition};
use crate::errors::PlaybackError;

/// Receiver of controller notifications
///
/// Handlers run synchronously on the controller's thread of control and must
/// return quickly.
pub trait PresentationSink: Send {
    /// Called once per state change
    fn on_transition(&mut self, transition: &Transition);

    /// Called when a transport command was refused
    fn on_rejected(&mut self, _error: &PlaybackError) {}
}

impl<S: PresentationSink + ?Sized> PresentationSink for Box<S> {
    fn on_transition(&mut self, transition: &Transition) {
        (**self).on_transition(transition);
    }

    fn on_rejected(&mut self, error: &PlaybackError) {
        (**self).on_rejected(error);
    }
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl PresentationSink for NullSink {
    fn on_transition(&mut self, _transition: &Transition) {}
}

#[derive(Debug, Default)]
struct Recorded {
    transitions: Vec<Transition>,
    rejections: Vec<PlaybackError>,
}

/// Sink that keeps every notification; clones share the same record
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transitions(&self) -> Vec<Transition> {
        self.inner.lock().transitions.clone()
    }

    pub fn states(&self) -> Vec<PlaybackState> {
        self.inner.lock().transitions.iter().map(|t| t.state).collect()
    }

    pub fn last(&self) -> Option<Transition> {
        self.inner.lock().transitions.last().copied()
    }

    pub fn rejections(&self) -> Vec<PlaybackError> {
        self.inner.lock().rejections.clone()
    }

    /// Forget what was recorded so far
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.transitions.clear();
        inner.rejections.clear();
    }
}

impl PresentationSink for RecordingSink {
    fn on_transition(&mut self, transition: &Transition) {
        self.inner.lock().transitions.push(*transition);
    }

    fn on_rejected(&mut self, error: &PlaybackError) {
        self.inner.lock().rejections.push(error.clone());
    }
}
