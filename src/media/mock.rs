/*!
 * Scripted media adapters for testing.
 *
 * `MockMediaFactory` builds adapters whose `open` outcome is chosen per
 * locator:
 * - `OpenBehavior::Ready` - reports `Ready` through the event channel
 * - `OpenBehavior::Fail` - reports `Failed` through the event channel
 * - `OpenBehavior::FailSync` - returns an error from `open` itself
 * - `OpenBehavior::Hang` - never reports anything
 *
 * A [`MockMediaProbe`] shares the factory's log: it records every adapter call
 * and can emit events on behalf of any adapter, including disposed ones, to
 * simulate late callbacks.
 */

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{AdapterId, MediaAdapter, MediaEvent, MediaEventSender, MediaFactory};
use crate::errors::MediaError;

/// How a mock adapter answers `open`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenBehavior {
    Ready,
    Fail,
    FailSync,
    Hang,
}

/// One recorded adapter call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaCall {
    Open(AdapterId, String),
    Start(AdapterId),
    Pause(AdapterId),
    Dispose(AdapterId),
}

#[derive(Debug, Default)]
struct MockMediaLog {
    calls: Vec<MediaCall>,
    senders: HashMap<AdapterId, MediaEventSender>,
    locators: HashMap<AdapterId, String>,
    ready: Vec<AdapterId>,
    live: Vec<AdapterId>,
}

/// Inspection and event-injection handle for a [`MockMediaFactory`]
#[derive(Debug, Clone, Default)]
pub struct MockMediaProbe {
    log: Arc<Mutex<MockMediaLog>>,
}

impl MockMediaProbe {
    /// Every call made on any adapter, in order
    pub fn calls(&self) -> Vec<MediaCall> {
        self.log.lock().calls.clone()
    }

    /// Adapters created and not yet disposed
    pub fn live_adapters(&self) -> Vec<AdapterId> {
        self.log.lock().live.clone()
    }

    /// Locators passed to `open`, in order
    pub fn opened_locators(&self) -> Vec<String> {
        self.log
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                MediaCall::Open(_, locator) => Some(locator.clone()),
                _ => None,
            })
            .collect()
    }

    /// Locator the given adapter was opened with
    pub fn locator_of(&self, id: AdapterId) -> Option<String> {
        self.log.lock().locators.get(&id).cloned()
    }

    /// Most recently created adapter
    pub fn last_adapter(&self) -> Option<AdapterId> {
        self.log.lock().senders.keys().max().copied()
    }

    /// Emit `Ended` for `id`, whether or not it is still live
    pub fn finish(&self, id: AdapterId) {
        self.emit(MediaEvent::ended(id));
    }

    /// Emit `Failed` for `id`
    pub fn fail(&self, id: AdapterId) {
        let locator = self.locator_of(id).unwrap_or_default();
        self.emit(MediaEvent::failed(
            id,
            MediaError::LoadFailed {
                locator,
                reason: "simulated failure".to_string(),
            },
        ));
    }

    /// Mark `id` ready and emit `Ready` for it
    pub fn make_ready(&self, id: AdapterId) {
        self.log.lock().ready.push(id);
        self.emit(MediaEvent::ready(id));
    }

    fn emit(&self, event: MediaEvent) {
        let sender = self.log.lock().senders.get(&event.adapter).cloned();
        if let Some(sender) = sender {
            let _ = sender.send(event);
        }
    }
}

/// Factory for scripted adapters
#[derive(Debug, Default)]
pub struct MockMediaFactory {
    probe: MockMediaProbe,
    behaviors: HashMap<String, OpenBehavior>,
    default_behavior: Option<OpenBehavior>,
}

impl MockMediaFactory {
    /// Adapters that become ready for every locator
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `behavior` for every locator without an explicit script
    pub fn with_default(mut self, behavior: OpenBehavior) -> Self {
        self.default_behavior = Some(behavior);
        self
    }

    /// Script the outcome of opening `locator`
    pub fn with_behavior(mut self, locator: impl Into<String>, behavior: OpenBehavior) -> Self {
        self.behaviors.insert(locator.into(), behavior);
        self
    }

    pub fn probe(&self) -> MockMediaProbe {
        self.probe.clone()
    }
}

impl MediaFactory for MockMediaFactory {
    fn create(&mut self, id: AdapterId, events: MediaEventSender) -> Box<dyn MediaAdapter> {
        {
            let mut log = self.probe.log.lock();
            log.senders.insert(id, events.clone());
            log.live.push(id);
        }
        Box::new(MockMediaAdapter {
            id,
            events,
            probe: self.probe.clone(),
            behaviors: self.behaviors.clone(),
            default_behavior: self.default_behavior.unwrap_or(OpenBehavior::Ready),
            disposed: false,
        })
    }
}

/// Adapter produced by [`MockMediaFactory`]
#[derive(Debug)]
pub struct MockMediaAdapter {
    id: AdapterId,
    events: MediaEventSender,
    probe: MockMediaProbe,
    behaviors: HashMap<String, OpenBehavior>,
    default_behavior: OpenBehavior,
    disposed: bool,
}

impl MockMediaAdapter {
    fn record(&self, call: MediaCall) {
        self.probe.log.lock().calls.push(call);
    }
}

impl MediaAdapter for MockMediaAdapter {
    fn id(&self) -> AdapterId {
        self.id
    }

    fn open(&mut self, locator: &str) -> Result<(), MediaError> {
        self.record(MediaCall::Open(self.id, locator.to_string()));
        self.probe.log.lock().locators.insert(self.id, locator.to_string());

        let behavior = self.behaviors.get(locator).copied().unwrap_or(self.default_behavior);
        match behavior {
            OpenBehavior::Ready => {
                self.probe.log.lock().ready.push(self.id);
                let _ = self.events.send(MediaEvent::ready(self.id));
                Ok(())
            }
            OpenBehavior::Fail => {
                let _ = self.events.send(MediaEvent::failed(
                    self.id,
                    MediaError::LoadFailed {
                        locator: locator.to_string(),
                        reason: "scripted failure".to_string(),
                    },
                ));
                Ok(())
            }
            OpenBehavior::FailSync => Err(MediaError::LoadFailed {
                locator: locator.to_string(),
                reason: "scripted synchronous failure".to_string(),
            }),
            OpenBehavior::Hang => Ok(()),
        }
    }

    fn start(&mut self) -> Result<(), MediaError> {
        self.record(MediaCall::Start(self.id));
        if self.disposed {
            return Err(MediaError::Disposed);
        }
        if !self.probe.log.lock().ready.contains(&self.id) {
            return Err(MediaError::NotReady);
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.record(MediaCall::Pause(self.id));
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.record(MediaCall::Dispose(self.id));
        self.probe.log.lock().live.retain(|live| *live != self.id);
    }
}
