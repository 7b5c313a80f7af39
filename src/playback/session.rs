/*!
 * Playback session task.
 *
 * A [`PlaybackSession`] moves a [`PlaybackController`] onto its own tokio task
 * and serializes everything that touches it: transport commands arrive on one
 * channel, adapter events on another, and the task applies them one at a time.
 * Callers talk to the task through a cloneable [`PlayerHandle`].
 */

use log::debug;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use super::controller::PlaybackController;
use super::sink::PresentationSink;
use super::state::{PlaybackSnapshot, PlaybackState};
use crate::errors::PlaybackError;
use crate::media::{MediaEventReceiver, MediaFactory, media_channel};
use crate::sequence::SignSequence;

/// Command sent from a [`PlayerHandle`] to the session task
#[derive(Debug)]
pub enum PlayerCommand {
    Load(SignSequence),
    Clear,
    Play,
    Pause,
    Toggle,
    Stop,
    Seek {
        index: usize,
        reply: oneshot::Sender<Result<(), PlaybackError>>,
    },
    /// Answered once every earlier command has been applied
    Query(oneshot::Sender<PlaybackSnapshot>),
    Shutdown(oneshot::Sender<()>),
}

// Replies are delivered after the snapshot watch is updated, so a caller that
// got its answer never observes an older snapshot afterwards.
enum Reply {
    Seek(oneshot::Sender<Result<(), PlaybackError>>, Result<(), PlaybackError>),
    Query(oneshot::Sender<PlaybackSnapshot>),
}

/// Spawner for the session task
pub struct PlaybackSession;

impl PlaybackSession {
    /// Build a controller over `factory` and `sink` and run it on a new task
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, S>(factory: F, sink: S) -> PlayerHandle
    where
        F: MediaFactory + 'static,
        S: PresentationSink + 'static,
    {
        let (media_tx, media_rx) = media_channel();
        let controller = PlaybackController::new(factory, sink, media_tx);
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());

        let task = tokio::spawn(Self::run(controller, commands_rx, media_rx, snapshot_tx));
        debug!("Playback session started");

        PlayerHandle {
            commands: commands_tx,
            snapshots: snapshot_rx,
            task: std::sync::Arc::new(parking_lot::Mutex::new(Some(task))),
        }
    }

    async fn run<F, S>(
        mut controller: PlaybackController<F, S>,
        mut commands: mpsc::UnboundedReceiver<PlayerCommand>,
        mut media: MediaEventReceiver,
        snapshots: watch::Sender<PlaybackSnapshot>,
    ) where
        F: MediaFactory,
        S: PresentationSink,
    {
        let mut shutdown_ack = None;

        loop {
            let mut reply = None;
            tokio::select! {
                command = commands.recv() => {
                    match command {
                        Some(PlayerCommand::Shutdown(ack)) => {
                            shutdown_ack = Some(ack);
                            break;
                        }
                        Some(command) => reply = Self::apply(&mut controller, command),
                        // Every handle is gone
                        None => break,
                    }
                }
                Some(event) = media.recv() => controller.handle_media_event(event),
            }

            let snapshot = controller.snapshot();
            snapshots.send_replace(snapshot);
            match reply {
                Some(Reply::Seek(tx, result)) => {
                    let _ = tx.send(result);
                }
                Some(Reply::Query(tx)) => {
                    let _ = tx.send(snapshot);
                }
                None => {}
            }
        }

        // Disposes the live adapter
        drop(controller);
        debug!("Playback session finished");

        if let Some(ack) = shutdown_ack {
            let _ = ack.send(());
        }
    }

    fn apply<F, S>(controller: &mut PlaybackController<F, S>, command: PlayerCommand) -> Option<Reply>
    where
        F: MediaFactory,
        S: PresentationSink,
    {
        match command {
            PlayerCommand::Load(sequence) => controller.load(sequence),
            PlayerCommand::Clear => controller.clear(),
            PlayerCommand::Play => controller.play(),
            PlayerCommand::Pause => controller.pause(),
            PlayerCommand::Toggle => controller.toggle(),
            PlayerCommand::Stop => controller.stop(),
            PlayerCommand::Seek { index, reply } => {
                return Some(Reply::Seek(reply, controller.seek(index)));
            }
            PlayerCommand::Query(reply) => return Some(Reply::Query(reply)),
            PlayerCommand::Shutdown(_) => {}
        }
        None
    }
}

/// Cloneable handle to a running [`PlaybackSession`]
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    commands: mpsc::UnboundedSender<PlayerCommand>,
    snapshots: watch::Receiver<PlaybackSnapshot>,
    task: std::sync::Arc<parking_lot::Mutex<Option<JoinHandle<()>>>>,
}

impl PlayerHandle {
    pub fn load(&self, sequence: SignSequence) -> Result<(), PlaybackError> {
        self.send(PlayerCommand::Load(sequence))
    }

    pub fn clear(&self) -> Result<(), PlaybackError> {
        self.send(PlayerCommand::Clear)
    }

    pub fn play(&self) -> Result<(), PlaybackError> {
        self.send(PlayerCommand::Play)
    }

    pub fn pause(&self) -> Result<(), PlaybackError> {
        self.send(PlayerCommand::Pause)
    }

    pub fn toggle(&self) -> Result<(), PlaybackError> {
        self.send(PlayerCommand::Toggle)
    }

    pub fn stop(&self) -> Result<(), PlaybackError> {
        self.send(PlayerCommand::Stop)
    }

    /// Seek to `index` and report whether the controller accepted it
    pub async fn seek(&self, index: usize) -> Result<(), PlaybackError> {
        let (reply, answer) = oneshot::channel();
        self.send(PlayerCommand::Seek { index, reply })?;
        answer.await.map_err(|_| PlaybackError::SessionClosed)?
    }

    /// State as of the last command or event the session applied
    pub fn snapshot(&self) -> PlaybackSnapshot {
        *self.snapshots.borrow()
    }

    /// State once every command sent so far has been applied
    pub async fn query(&self) -> Result<PlaybackSnapshot, PlaybackError> {
        let (reply, answer) = oneshot::channel();
        self.send(PlayerCommand::Query(reply))?;
        answer.await.map_err(|_| PlaybackError::SessionClosed)
    }

    /// Wait until the session reports a snapshot matching `predicate`
    pub async fn wait_until<P>(&self, mut predicate: P) -> Result<PlaybackSnapshot, PlaybackError>
    where
        P: FnMut(&PlaybackSnapshot) -> bool,
    {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(|snapshot| predicate(snapshot))
            .await
            .map_err(|_| PlaybackError::SessionClosed)?;
        Ok(*snapshot)
    }

    /// Wait until nothing is loading or playing any more
    ///
    /// Commands sent before this call are applied first, so `play()` followed
    /// by `wait_until_settled()` waits for that run to finish or be stopped.
    /// A paused run counts as still in progress.
    pub async fn wait_until_settled(&self) -> Result<PlaybackSnapshot, PlaybackError> {
        self.query().await?;
        self.wait_until(|snapshot| {
            snapshot.state.is_terminal() || matches!(snapshot.state, PlaybackState::Stopped | PlaybackState::Idle)
        })
        .await
    }

    /// Stop the session task and release its media
    pub async fn shutdown(&self) -> Result<(), PlaybackError> {
        let (ack, done) = oneshot::channel();
        self.send(PlayerCommand::Shutdown(ack))?;
        done.await.map_err(|_| PlaybackError::SessionClosed)?;

        let task = self.task.lock().take();
        if let Some(task) = task {
            let _ = task.await;
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    fn send(&self, command: PlayerCommand) -> Result<(), PlaybackError> {
        self.commands.send(command).map_err(|_| PlaybackError::SessionClosed)
    }
}
