/*!
 * Media adapters.
 *
 * A media adapter wraps a single clip's playback session. Adapters never call
 * back into the controller directly: readiness, natural end and failures are
 * sent as [`MediaEvent`]s tagged with the [`AdapterId`] of the instance that
 * produced them, so the controller can drop events from superseded adapters.
 *
 * - `clip`: timer-driven adapter that probes local files or HTTP resources
 * - `locator`: resolution of media locators against a base URL or directory
 * - `mock`: scripted adapter for tests
 */

use std::fmt;

use tokio::sync::mpsc;

use crate::errors::MediaError;

pub mod clip;
pub mod locator;
pub mod mock;

pub use clip::{ClipAdapter, ClipFactory, ClipSettings};
pub use locator::{MediaBase, ResolvedLocator};

/// Identity of one adapter instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdapterId(u64);

impl AdapterId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// The id following this one
    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for AdapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "adapter#{}", self.0)
    }
}

/// What happened to an adapter's media
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEventKind {
    /// `open` finished and playback may start
    Ready,
    /// Playback reached the natural end of the clip
    Ended,
    /// Loading or playback failed
    Failed(MediaError),
}

/// Notification emitted by an adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEvent {
    pub adapter: AdapterId,
    pub kind: MediaEventKind,
}

impl MediaEvent {
    pub fn ready(adapter: AdapterId) -> Self {
        Self { adapter, kind: MediaEventKind::Ready }
    }

    pub fn ended(adapter: AdapterId) -> Self {
        Self { adapter, kind: MediaEventKind::Ended }
    }

    pub fn failed(adapter: AdapterId, error: MediaError) -> Self {
        Self { adapter, kind: MediaEventKind::Failed(error) }
    }
}

/// Channel end adapters report on
pub type MediaEventSender = mpsc::UnboundedSender<MediaEvent>;

/// Channel end the playback session drains
pub type MediaEventReceiver = mpsc::UnboundedReceiver<MediaEvent>;

/// Create the channel shared by a controller and its adapters
pub fn media_channel() -> (MediaEventSender, MediaEventReceiver) {
    mpsc::unbounded_channel()
}

/// Playback session over one media locator
///
/// `open` must return promptly; its outcome is reported later through the
/// event channel. After `dispose` the adapter must not emit anything, and it
/// emits `Ended` at most once over its lifetime.
pub trait MediaAdapter: Send {
    fn id(&self) -> AdapterId;

    /// Begin loading `locator`
    ///
    /// An `Err` here means the load failed synchronously and no event follows.
    fn open(&mut self, locator: &str) -> Result<(), MediaError>;

    /// Begin or resume playback
    fn start(&mut self) -> Result<(), MediaError>;

    /// Suspend playback; no-op when already paused
    fn pause(&mut self);

    /// Stop, release the resource and detach from the event channel
    fn dispose(&mut self);
}

/// Builds adapters, one per activated unit
pub trait MediaFactory: Send {
    fn create(&mut self, id: AdapterId, events: MediaEventSender) -> Box<dyn MediaAdapter>;
}

impl<F: MediaFactory + ?Sized> MediaFactory for Box<F> {
    fn create(&mut self, id: AdapterId, events: MediaEventSender) -> Box<dyn MediaAdapter> {
        (**self).create(id, events)
    }
}
