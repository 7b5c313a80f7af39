// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;

use signplay::app_config::{self, Config};
use signplay::app_controller::Controller;
use signplay::errors::{AppError, ProviderError};
use signplay::playback::PlaybackState;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate text and play the signs to the end
    Play {
        /// Text to translate
        #[arg(value_name = "TEXT", required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Start an interactive shell with transport controls
    #[command(alias = "repl")]
    Interactive,

    /// List the words the service has signs for
    Dictionary,

    /// Look up the clip for a single word
    Sign {
        /// Word to look up
        #[arg(value_name = "WORD")]
        word: String,
    },

    /// Check that the translation service is reachable
    Health,

    /// Generate shell completions for signplay
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// signplay - sign-language clip playback
///
/// Translates text into a sequence of sign-language clips through a translation
/// service and plays the clips one after another.
#[derive(Parser, Debug)]
#[command(name = "signplay")]
#[command(version)]
#[command(about = "Translate text into sign-language clips and play them in sequence")]
#[command(long_about = "signplay sends text to a sign-language translation service and plays the returned clips in order.

EXAMPLES:
    signplay play hello there                 # Translate and play to the end
    signplay --language hi play namaste       # Translate Hindi text
    signplay interactive                      # Shell with play/pause/stop/seek
    signplay sign hello                       # Show the clip for one word
    signplay --endpoint http://host:5000 health
    signplay completions bash > signplay.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json", global = true)]
    config_path: String,

    /// Base URL of the translation service
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    /// Language of the input text (e.g., 'en', 'hi', 'mr')
    #[arg(long, global = true)]
    language: Option<String>,

    /// URL or directory clip locators are resolved against
    #[arg(long, global = true)]
    media_base: Option<String>,

    /// Load translations without starting playback
    #[arg(long, global = true)]
    no_autoplay: bool,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger; `log::set_max_level` adjusts verbosity later
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn decoration(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "\x1B[1;31m"),
            Level::Warn => ("🚧 ", "\x1B[1;33m"),
            Level::Info => (" ", "\x1B[1;32m"),
            Level::Debug => ("🔍 ", "\x1B[1;36m"),
            Level::Trace => ("📋 ", "\x1B[1;35m"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::decoration(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "signplay", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&cli)?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let mut controller = Controller::with_config(config)?;
    let result = run_command(&mut controller, cli.command).await;
    controller.shutdown().await.context("Failed to stop playback")?;
    result
}

/// Load or create the configuration and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config_path)?;

    if let Some(endpoint) = &cli.endpoint {
        config.translation.endpoint = endpoint.clone();
    }
    if let Some(language) = &cli.language {
        config.language = language.clone();
    }
    if let Some(media_base) = &cli.media_base {
        config.playback.media_base = Some(media_base.clone());
    }
    if cli.no_autoplay {
        config.playback.autoplay = false;
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run_command(controller: &mut Controller, command: Commands) -> Result<()> {
    match command {
        Commands::Play { text } => {
            let text = text.join(" ");
            let snapshot = controller.play_text(&text).await.map_err(explain)?;
            if let Some(translation) = controller.current() {
                let stats = translation.stats();
                info!(
                    "Signs: {} | Words: {} | Duration: {}",
                    stats.sign_count,
                    stats.word_count,
                    stats.display_duration()
                );
            }
            if snapshot.state == PlaybackState::Failed {
                let reason = snapshot.last_reason.map(|r| r.message()).unwrap_or("Playback failed");
                return Err(anyhow!("{}", reason));
            }
        }
        Commands::Interactive => {
            controller.run_interactive().await?;
        }
        Commands::Dictionary => {
            let dictionary = controller.dictionary().await.map_err(explain)?;
            println!("📚 {} words", dictionary.total_words);
            for word in &dictionary.words {
                println!("  {}", word);
            }
        }
        Commands::Sign { word } => {
            let sign = controller.lookup_sign(&word).await.map_err(explain)?;
            println!("{} → {}", sign.word, sign.video_url.as_deref().unwrap_or("(no video)"));
        }
        Commands::Health => {
            let health = controller.health().await.map_err(explain)?;
            println!(
                "{} ({}) - {} videos",
                health.service.as_deref().unwrap_or("translation service"),
                health.status,
                health
                    .video_count
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "?".to_string())
            );
        }
        Commands::Completions { .. } => {}
    }
    Ok(())
}

/// Turn an application error into a message for the user
fn explain(error: AppError) -> anyhow::Error {
    match &error {
        AppError::Provider(ProviderError::ConnectionError(_)) => {
            warn!("Is the translation service running? Check --endpoint or conf.json");
        }
        AppError::Provider(ProviderError::NotFound(message)) => {
            return anyhow!("{}", message);
        }
        _ => {}
    }
    anyhow::Error::new(error)
}
