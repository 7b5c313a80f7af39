/*!
 * Timer-driven clip adapter.
 *
 * `ClipAdapter` does not decode video. It checks that the clip exists (a local
 * file or an HTTP resource answering `HEAD`) and then plays it as a fixed-length
 * interval on a tokio timer, which is what a terminal front end needs to pace
 * the sequence.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::locator::{self, MediaBase, ResolvedLocator};
use super::{AdapterId, MediaAdapter, MediaEvent, MediaEventSender, MediaFactory};
use crate::errors::MediaError;

/// Settings shared by every clip adapter of a factory
#[derive(Debug, Clone)]
pub struct ClipSettings {
    /// Base relative locators are resolved against
    pub base: MediaBase,
    /// How long one clip plays
    pub clip_duration: Duration,
    /// How long `open` may take before failing
    pub open_timeout: Duration,
}

impl ClipSettings {
    pub fn new(base: MediaBase, clip_duration: Duration, open_timeout: Duration) -> Self {
        Self {
            base,
            clip_duration,
            open_timeout,
        }
    }
}

/// Flags shared between an adapter and its background tasks
#[derive(Debug, Default)]
struct ClipFlags {
    ready: AtomicBool,
    disposed: AtomicBool,
    ended: AtomicBool,
}

/// Factory producing [`ClipAdapter`]s over a single HTTP client
pub struct ClipFactory {
    settings: Arc<ClipSettings>,
    client: Client,
}

impl ClipFactory {
    pub fn new(settings: ClipSettings) -> Self {
        let client = Client::builder()
            .timeout(settings.open_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .unwrap_or_default();

        Self {
            settings: Arc::new(settings),
            client,
        }
    }
}

impl MediaFactory for ClipFactory {
    fn create(&mut self, id: AdapterId, events: MediaEventSender) -> Box<dyn MediaAdapter> {
        Box::new(ClipAdapter::new(id, Arc::clone(&self.settings), self.client.clone(), events))
    }
}

/// Adapter that probes a clip and plays it for a fixed duration
pub struct ClipAdapter {
    id: AdapterId,
    settings: Arc<ClipSettings>,
    client: Client,
    events: MediaEventSender,
    flags: Arc<ClipFlags>,
    probe_task: Option<JoinHandle<()>>,
    timer_task: Option<JoinHandle<()>>,
    remaining: Duration,
    started_at: Option<Instant>,
}

impl ClipAdapter {
    pub fn new(id: AdapterId, settings: Arc<ClipSettings>, client: Client, events: MediaEventSender) -> Self {
        let remaining = settings.clip_duration;
        Self {
            id,
            settings,
            client,
            events,
            flags: Arc::new(ClipFlags::default()),
            probe_task: None,
            timer_task: None,
            remaining,
            started_at: None,
        }
    }

    /// Time left before the clip ends
    pub fn remaining(&self) -> Duration {
        match self.started_at {
            Some(started) => self.remaining.saturating_sub(started.elapsed()),
            None => self.remaining,
        }
    }

    fn is_running(&self) -> bool {
        self.timer_task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl MediaAdapter for ClipAdapter {
    fn id(&self) -> AdapterId {
        self.id
    }

    fn open(&mut self, locator: &str) -> Result<(), MediaError> {
        if self.flags.disposed.load(Ordering::SeqCst) {
            return Err(MediaError::Disposed);
        }

        let resolved = locator::resolve(locator, &self.settings.base)?;
        if let ResolvedLocator::File(path) = &resolved {
            if !locator::is_video_file(path) {
                return Err(MediaError::LoadFailed {
                    locator: locator.to_string(),
                    reason: "unsupported media type".to_string(),
                });
            }
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| MediaError::LoadFailed {
            locator: locator.to_string(),
            reason: "no async runtime available".to_string(),
        })?;

        debug!("{} opening {}", self.id, resolved);

        let id = self.id;
        let flags = Arc::clone(&self.flags);
        let events = self.events.clone();
        let client = self.client.clone();
        let timeout = self.settings.open_timeout;
        let locator = locator.to_string();

        self.probe_task = Some(runtime.spawn(async move {
            let outcome = match tokio::time::timeout(timeout, probe(&client, &resolved, &locator)).await {
                Ok(result) => result,
                Err(_) => Err(MediaError::Timeout {
                    locator: locator.clone(),
                    secs: timeout.as_secs(),
                }),
            };

            if flags.disposed.load(Ordering::SeqCst) {
                return;
            }

            match outcome {
                Ok(()) => {
                    flags.ready.store(true, Ordering::SeqCst);
                    let _ = events.send(MediaEvent::ready(id));
                }
                Err(e) => {
                    warn!("{} failed to open: {}", id, e);
                    let _ = events.send(MediaEvent::failed(id, e));
                }
            }
        }));

        Ok(())
    }

    fn start(&mut self) -> Result<(), MediaError> {
        if self.flags.disposed.load(Ordering::SeqCst) {
            return Err(MediaError::Disposed);
        }
        if !self.flags.ready.load(Ordering::SeqCst) {
            return Err(MediaError::NotReady);
        }
        if self.is_running() || self.flags.ended.load(Ordering::SeqCst) {
            return Ok(());
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| MediaError::NotReady)?;

        let id = self.id;
        let flags = Arc::clone(&self.flags);
        let events = self.events.clone();
        let remaining = self.remaining;

        self.started_at = Some(Instant::now());
        self.timer_task = Some(runtime.spawn(async move {
            tokio::time::sleep(remaining).await;
            if flags.disposed.load(Ordering::SeqCst) {
                return;
            }
            if !flags.ended.swap(true, Ordering::SeqCst) {
                let _ = events.send(MediaEvent::ended(id));
            }
        }));

        Ok(())
    }

    fn pause(&mut self) {
        if !self.is_running() {
            return;
        }
        self.remaining = self.remaining();
        self.started_at = None;
        if let Some(task) = self.timer_task.take() {
            task.abort();
        }
    }

    fn dispose(&mut self) {
        self.flags.disposed.store(true, Ordering::SeqCst);
        if let Some(task) = self.probe_task.take() {
            task.abort();
        }
        if let Some(task) = self.timer_task.take() {
            task.abort();
        }
        self.started_at = None;
    }
}

impl Drop for ClipAdapter {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Check that the resolved clip exists
async fn probe(client: &Client, resolved: &ResolvedLocator, locator: &str) -> Result<(), MediaError> {
    match resolved {
        ResolvedLocator::File(path) => {
            let metadata = tokio::fs::metadata(path).await.map_err(|e| MediaError::LoadFailed {
                locator: locator.to_string(),
                reason: e.to_string(),
            })?;
            if metadata.is_file() {
                Ok(())
            } else {
                Err(MediaError::LoadFailed {
                    locator: locator.to_string(),
                    reason: "not a regular file".to_string(),
                })
            }
        }
        ResolvedLocator::Remote(url) => {
            let response = client
                .head(url.clone())
                .send()
                .await
                .map_err(|e| MediaError::LoadFailed {
                    locator: locator.to_string(),
                    reason: e.to_string(),
                })?;

            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                Err(MediaError::LoadFailed {
                    locator: locator.to_string(),
                    reason: format!("HTTP {}", status),
                })
            }
        }
    }
}
