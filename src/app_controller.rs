use anyhow::{Context, Result};
use log::{debug, error, info};
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app_config::Config;
use crate::console::ConsoleSink;
use crate::errors::{AppError, ProviderError};
use crate::language_utils;
use crate::media::{ClipFactory, ClipSettings, MediaBase, MediaFactory};
use crate::playback::{PlaybackSession, PlaybackSnapshot, PlaybackState, PlayerHandle};
use crate::providers::{
    DictionaryResponse, HealthResponse, HttpTranslationClient, SignLookupResponse, Translation, TranslationClient,
};

/// A parsed line of the interactive shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Translate(String),
    Play,
    Pause,
    Toggle,
    Stop,
    /// Zero-based unit index
    Seek(usize),
    List,
    Stats,
    Clear,
    Help,
    Quit,
}

impl ReplCommand {
    /// Parse one input line; blank lines yield `None`
    ///
    /// Seek positions are typed 1-based, as `list` displays them.
    pub fn parse(line: &str) -> Result<Option<Self>, AppError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "translate" | "t" => {
                if rest.is_empty() {
                    return Err(AppError::InvalidCommand("usage: translate <text>".to_string()));
                }
                Self::Translate(rest.to_string())
            }
            "play" | "p" => Self::Play,
            "pause" => Self::Pause,
            "toggle" | "space" => Self::Toggle,
            "stop" | "esc" => Self::Stop,
            "seek" | "s" => {
                let position: usize = rest
                    .parse()
                    .map_err(|_| AppError::InvalidCommand(format!("seek needs a position, got '{}'", rest)))?;
                let index = position
                    .checked_sub(1)
                    .ok_or_else(|| AppError::InvalidCommand("positions start at 1".to_string()))?;
                Self::Seek(index)
            }
            "list" | "ls" => Self::List,
            "stats" => Self::Stats,
            "clear" => Self::Clear,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(AppError::InvalidCommand(format!("unknown command '{}'", other))),
        };
        Ok(Some(command))
    }
}

/// What the shell should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplOutcome {
    /// Keep reading; print the text if any
    Continue(Option<String>),
    Quit,
}

const HELP: &str = "Commands:
  translate <text>   translate text and load the sign sequence
  play | pause | toggle | stop
  seek <n>           jump to sign n (as numbered by list)
  list               show the loaded sequence
  stats              show sign count, word count and duration
  clear              unload the sequence
  quit";

/// Main application controller for sign playback
pub struct Controller {
    config: Config,
    client: Arc<dyn TranslationClient>,
    player: PlayerHandle,
    console: ConsoleSink,
    current: Option<Translation>,
}

impl Controller {
    /// Create a controller talking to the configured service
    ///
    /// Spawns the playback session, so it must run inside a tokio runtime.
    pub fn with_config(config: Config) -> Result<Self> {
        let client = HttpTranslationClient::new(
            &config.translation.endpoint,
            config.translation.timeout(),
            config.translation.retry_count,
            config.translation.retry_backoff_ms,
        )
        .context("Failed to create translation client")?;

        let settings = ClipSettings::new(
            MediaBase::parse(config.media_base()),
            config.playback.clip_duration(),
            config.playback.open_timeout(),
        );

        Ok(Self::with_parts(
            config,
            Arc::new(client),
            ClipFactory::new(settings),
            ConsoleSink::new(),
        ))
    }

    /// Create a controller from explicit parts
    pub fn with_parts<F>(config: Config, client: Arc<dyn TranslationClient>, factory: F, console: ConsoleSink) -> Self
    where
        F: MediaFactory + 'static,
    {
        let player = PlaybackSession::spawn(factory, console.clone());
        Self {
            config,
            client,
            player,
            console,
            current: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn player(&self) -> &PlayerHandle {
        &self.player
    }

    /// Last successful translation
    pub fn current(&self) -> Option<&Translation> {
        self.current.as_ref()
    }

    /// Translate `text` and hand the sequence to the player
    ///
    /// On failure the loaded sequence and playback are left untouched.
    pub async fn translate(&mut self, text: &str) -> Result<&Translation, AppError> {
        let language = language_utils::to_service_code(&self.config.language)?;
        let translation = self.client.translate(text, &language).await?;

        let stats = translation.stats();
        info!(
            "Translated '{}' into {} signs ({} with video, ~{})",
            translation.input_text,
            stats.sign_count,
            stats.playable_count,
            stats.display_duration()
        );

        self.console.show_sequence(&translation.sequence);
        self.player.load(translation.sequence.clone())?;
        if self.config.playback.autoplay {
            self.player.play()?;
        }
        Ok(&*self.current.insert(translation))
    }

    /// Translate `text`, play it and wait until playback settles
    pub async fn play_text(&mut self, text: &str) -> Result<PlaybackSnapshot, AppError> {
        self.translate(text).await?;
        if !self.config.playback.autoplay {
            self.player.play()?;
        }
        Ok(self.player.wait_until_settled().await?)
    }

    pub async fn dictionary(&self) -> Result<DictionaryResponse, AppError> {
        Ok(self.client.dictionary().await?)
    }

    pub async fn lookup_sign(&self, word: &str) -> Result<SignLookupResponse, AppError> {
        Ok(self.client.lookup_sign(word).await?)
    }

    pub async fn health(&self) -> Result<HealthResponse, AppError> {
        Ok(self.client.health().await?)
    }

    /// Execute one line of the interactive shell
    pub async fn handle_line(&mut self, line: &str) -> Result<ReplOutcome, AppError> {
        let Some(command) = ReplCommand::parse(line)? else {
            return Ok(ReplOutcome::Continue(None));
        };
        debug!("Shell command: {:?}", command);

        let output = match command {
            ReplCommand::Translate(text) => {
                let translation = self.translate(&text).await?;
                Some(format!(
                    "Loaded {} signs for '{}'",
                    translation.sequence.len(),
                    translation.input_text
                ))
            }
            ReplCommand::Play => {
                self.player.play()?;
                None
            }
            ReplCommand::Pause => {
                self.player.pause()?;
                None
            }
            ReplCommand::Toggle => {
                self.player.toggle()?;
                None
            }
            ReplCommand::Stop => {
                self.player.stop()?;
                None
            }
            ReplCommand::Seek(index) => {
                self.player.seek(index).await?;
                None
            }
            ReplCommand::List => Some(self.render_list().await?),
            ReplCommand::Stats => Some(self.render_stats()),
            ReplCommand::Clear => {
                self.player.clear()?;
                self.current = None;
                Some("Sequence cleared".to_string())
            }
            ReplCommand::Help => Some(HELP.to_string()),
            ReplCommand::Quit => return Ok(ReplOutcome::Quit),
        };
        Ok(ReplOutcome::Continue(output))
    }

    /// Read commands from stdin until `quit` or end of input
    pub async fn run_interactive(&mut self) -> Result<()> {
        self.console.println(HELP);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await.context("Failed to read from stdin")? {
            match self.handle_line(&line).await {
                Ok(ReplOutcome::Quit) => break,
                Ok(ReplOutcome::Continue(Some(output))) => self.console.println(output),
                Ok(ReplOutcome::Continue(None)) => {}
                Err(AppError::Provider(ProviderError::InvalidInput(message))) => {
                    self.console.println(format!("⚠️  {}", message));
                }
                Err(e) => {
                    error!("{}", e);
                }
            }
        }
        Ok(())
    }

    /// Stop playback and end the session
    pub async fn shutdown(self) -> Result<(), AppError> {
        self.player.shutdown().await?;
        Ok(())
    }

    async fn render_list(&self) -> Result<String, AppError> {
        let Some(translation) = &self.current else {
            return Ok("No sequence loaded".to_string());
        };
        let snapshot = self.player.query().await?;

        let mut out = String::new();
        for unit in translation.sequence.units() {
            let marker = match snapshot.active_index {
                Some(active) if active == unit.index() => match snapshot.state {
                    PlaybackState::Paused => "⏸",
                    _ => "▶",
                },
                _ => " ",
            };
            let media = if unit.is_playable() { "" } else { " (no video)" };
            let _ = writeln!(
                out,
                "{} {:>3}. {} [{}]{}",
                marker,
                unit.index() + 1,
                unit.word(),
                unit.kind().label(),
                media
            );
        }
        Ok(out.trim_end().to_string())
    }

    fn render_stats(&self) -> String {
        match &self.current {
            Some(translation) => {
                let stats = translation.stats();
                format!(
                    "Signs: {} | Words: {} | With video: {} | Fingerspelled: {} | Duration: {}",
                    stats.sign_count,
                    stats.word_count,
                    stats.playable_count,
                    stats.fingerspell_count,
                    stats.display_duration()
                )
            }
            None => "No sequence loaded".to_string(),
        }
    }
}
