use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use wren_agent::ScreeningAgent;
use wren_config::{Config, ConfigManager};
use wren_llm::{OpenAiChat, SpeechClient};
use wren_robot::RobotClient;
use wren_runtime::{ChildLoop, ClinicianLoop, SessionEvent};
use wren_store::MemoryStore;

#[derive(Parser)]
#[command(name = "wren")]
#[command(about = "Robot-mediated language screening orchestrator")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, env = "WREN_CONFIG", default_value = "~/.wren/config.json")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full screening session: create it, open the conversation and
    /// exchange turns typed on stdin
    Session(SessionArgs),
    /// Send one gesture to the actuation endpoint
    Robot {
        /// Action name (e.g. wave, jump_forward)
        action: String,
    },
    /// Configuration management
    Config(ConfigArgs),
}

#[derive(Args)]
struct SessionArgs {
    #[arg(long, default_value = "child-001")]
    child_id: String,

    #[arg(long, default_value = "Friend")]
    child_name: String,

    /// Child's age in years, used for picture complexity matching
    #[arg(long)]
    age: Option<u32>,

    #[arg(long, default_value = "clinician-001")]
    clinician_id: String,
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Get a configuration value by dotted key (e.g. robot.host)
    Get { key: String },
    /// Set a configuration value by dotted key
    Set { key: String, value: String },
    /// Initialize a default configuration file
    Init {
        #[arg(long, default_value = "false")]
        force: bool,
    },
    /// Show the current configuration
    Show,
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = expand_tilde(&cli.config);

    match cli.command {
        Commands::Session(args) => {
            let manager = ConfigManager::load(&config_path).await?;
            let config = manager.snapshot().await;
            init_tracing(&config);
            run_session(args, config).await
        }
        Commands::Robot { action } => {
            let manager = ConfigManager::load(&config_path).await?;
            let config = manager.snapshot().await;
            init_tracing(&config);
            run_robot(&action, &config).await
        }
        Commands::Config(args) => handle_config(args, &config_path).await,
    }
}

async fn run_robot(action: &str, config: &Config) -> anyhow::Result<()> {
    let robot = RobotClient::new(
        config.robot.base_url(),
        Duration::from_millis(config.robot.timeout_ms),
    )?;
    robot.perform_named(action).await?;
    println!("{}", format!("Sent '{}' to {}", action, config.robot.base_url()).green());
    Ok(())
}

async fn run_session(args: SessionArgs, config: Config) -> anyhow::Result<()> {
    let api_key = std::env::var(&config.llm.api_key_env)
        .with_context(|| format!("{} is not set", config.llm.api_key_env))?;

    let store = Arc::new(MemoryStore::new());

    // Clinician side: create the session and watch the transcript.
    let clinician = ClinicianLoop::new(
        store.clone(),
        &args.clinician_id,
        Duration::from_millis(config.sync.clinician_poll_ms),
    );
    let session = clinician
        .start_session(&args.child_id, &args.child_name, args.age)
        .await?;
    println!(
        "{}",
        format!(
            "Session {} (#{}) created for {}",
            session.session_id, session.session_number, session.child_name
        )
        .cyan()
    );

    let (events_tx, mut events_rx) = tokio::sync::mpsc::channel(32);
    let session_id = session.session_id.clone();
    let watcher = tokio::spawn(async move { clinician.run(&session_id, events_tx).await });
    let printer = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            if let SessionEvent::PhaseChanged(phase) = event {
                tracing::info!(?phase, "session phase");
            }
        }
    });

    // Child side: the execution site for every turn.
    let model = Arc::new(
        OpenAiChat::new(
            &config.llm.base_url,
            &api_key,
            &config.llm.model,
            Duration::from_secs(config.llm.timeout_secs),
        )?
        .with_temperature(config.llm.temperature),
    );

    let mut agent = ScreeningAgent::new(model, &session.session_id)
        .with_emotion_feed(store.clone())
        .with_emotion_window(Duration::from_secs(config.sync.emotion_window_secs))
        .with_picture_dir(&config.pictures.dir);
    if let Some(age) = args.age {
        agent = agent.with_child_age(age.min(u8::MAX as u32) as u8);
    }

    let mut child = ChildLoop::new(store.clone(), agent, &session.session_id).with_gate(
        config.sync.speaking_rate_wps as f32,
        config.sync.audio_buffer_secs as f32,
    );

    if config.robot.enabled {
        let robot = Arc::new(RobotClient::new(
            config.robot.base_url(),
            Duration::from_millis(config.robot.timeout_ms),
        )?);
        child = child.with_robot(robot);
    }

    if config.speech.enable_tts {
        let speech = Arc::new(SpeechClient::new(
            &config.llm.base_url,
            &api_key,
            &config.speech.voice,
            config.speech.speed,
            Duration::from_secs(config.speech.timeout_secs),
            config.speech.cache_size,
        )?);
        speech.preload_common_phrases().await;
        child = child.with_speech(speech);
    }

    let outcome = child.begin().await?;
    print_turn(&outcome.turn);
    tokio::time::sleep(outcome.playback).await;
    child.mark_playback_complete().await;

    println!("{}", "Type the child's responses. 'end' finishes the session.".dimmed());
    loop {
        print!("{} ", "Child:".cyan().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("end") || input.eq_ignore_ascii_case("exit") {
            break;
        }

        match child.handle_utterance(input).await {
            Ok(outcome) => {
                print_turn(&outcome.turn);
                // Cooperative pacing: suppress input for the estimated
                // playback duration.
                tokio::time::sleep(outcome.playback).await;
                child.mark_playback_complete().await;
            }
            Err(e) => eprintln!("{}", format!("Turn failed: {e}").red()),
        }
    }

    child.end().await?;
    let _ = watcher.await?;
    printer.await?;
    println!("{}", "Session ended.".cyan());
    Ok(())
}

fn print_turn(turn: &wren_core::TurnResult) {
    println!("{} {}", "Wren:".green().bold(), turn.response_text);
    println!(
        "{}",
        format!(
            "  [action: {} ({}) | face: {}]",
            turn.robot_action.action, turn.robot_action.reason, turn.display_emotion
        )
        .dimmed()
    );
    if let Some(picture) = &turn.picture {
        println!(
            "{}",
            format!("  [showing picture: {} ({})]", picture.filename, picture.complexity).yellow()
        );
    }
}

async fn handle_config(args: ConfigArgs, config_path: &std::path::Path) -> anyhow::Result<()> {
    match args.command {
        ConfigCommands::Get { key } => {
            let manager = ConfigManager::load(config_path).await?;
            let config = manager.snapshot().await;
            match config.get_value(&key) {
                Some(value) => println!("{}", format!("{} = {}", key, value).green()),
                None => {
                    println!("{}", format!("Key not found: {}", key).red());
                    std::process::exit(1);
                }
            }
        }
        ConfigCommands::Set { key, value } => {
            let manager = ConfigManager::load(config_path).await?;
            {
                let config = manager.get();
                let mut config = config.write().await;
                if let Err(e) = config.set_value(&key, &value) {
                    println!("{}", format!("Failed to set value: {}", e).red());
                    std::process::exit(1);
                }
            }
            manager.save().await?;
            println!("{}", format!("Set {} = {}", key, value).green());
        }
        ConfigCommands::Init { force } => {
            if config_path.exists() && !force {
                println!(
                    "{}",
                    format!("Config already exists at {:?}", config_path).yellow()
                );
                println!("{}", "Use --force to overwrite".dimmed());
                return Ok(());
            }
            let manager = ConfigManager::new(Config::default(), config_path.to_path_buf());
            manager.save().await?;
            println!("{}", format!("Config initialized at {:?}", config_path).green());
        }
        ConfigCommands::Show => {
            let manager = ConfigManager::load(config_path).await?;
            let config = manager.snapshot().await;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
