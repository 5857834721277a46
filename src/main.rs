//! Entry point for the rhythm-reader CLI.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments and load the plain-text input.
//! - Load user configuration from `conf/config.toml` plus the cached overlay.
//! - Wire the session, speech backend, terminal sink, and event loop.

mod cache;
mod config;
mod pace;
mod runtime;
mod session;
mod sink;
mod speech;
mod text_utils;
mod tts_worker;
mod ui;

use crate::config::load_config;
use crate::runtime::Runtime;
use crate::session::{Message, Reader};
use anyhow::{Context, Result, anyhow};
use std::env;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt as subscriber_fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let input = parse_args()?;
    let base_config = load_config(Path::new("conf/config.toml"));
    let mut config = base_config.clone();
    if let Some(mut overlay) = cache::load_settings_overlay() {
        info!("Loaded tuned settings from cache");
        // The base config always wins for log level and key bindings so user
        // edits take effect.
        overlay.log_level = base_config.log_level;
        overlay.key_toggle_play_pause = base_config.key_toggle_play_pause.clone();
        overlay.key_next_line = base_config.key_next_line.clone();
        overlay.key_prev_line = base_config.key_prev_line.clone();
        overlay.key_restart = base_config.key_restart.clone();
        overlay.key_safe_quit = base_config.key_safe_quit.clone();
        config = overlay;
    }
    config.clamp();
    set_log_level(reload_handle, config.log_level.as_filter_str());

    let text = load_text(&input)?;
    let lines = text_utils::segment_lines(&text);
    if lines.is_empty() {
        return Err(anyhow!("No readable lines in the input; nothing to start"));
    }
    info!(
        source = %input,
        lines = lines.len(),
        wpm = config.speed_wpm,
        "Starting reading session"
    );

    let (events_tx, events_rx) = mpsc::channel();
    let interactive = matches!(input, InputSource::File(_));
    let bindings = ui::CommandBindings::from_config(&config);
    let (reader, mut initial) = Reader::start(lines, config);

    let text_path = match &input {
        InputSource::File(path) => Some(path.clone()),
        InputSource::Stdin => None,
    };
    if let Some(path) = &text_path {
        if let Some(line) = cache::load_bookmark(path) {
            if line > 0 {
                info!(line = line + 1, "Resuming from cached bookmark");
                let _ = events_tx.send(Message::JumpLines(line as i64));
            }
        }
    }
    if !cache::tutorial_seen() {
        initial.push(session::Effect::Announce(ui::key_help(&bindings)));
        cache::mark_tutorial_seen();
    }

    if interactive {
        ui::spawn_input_thread(events_tx.clone(), bindings);
    } else {
        // Batch mode: no terminal to take commands from, so play straight
        // through and exit at the summary.
        let _ = events_tx.send(Message::Play);
    }

    let quit_tx = events_tx.clone();
    ctrlc::set_handler(move || {
        let _ = quit_tx.send(Message::SafeQuit);
    })
    .context("Installing the Ctrl-C handler")?;

    let backend = tts_worker::PacedSpeech::spawn(events_tx);
    let sink = ui::TerminalSink::new();
    Runtime::new(reader, backend, sink, events_rx, text_path, !interactive).run(initial)
}

enum InputSource {
    File(PathBuf),
    Stdin,
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::File(path) => write!(f, "{}", path.display()),
            InputSource::Stdin => write!(f, "stdin"),
        }
    }
}

fn parse_args() -> Result<InputSource> {
    let mut args = env::args().skip(1);
    let arg = args
        .next()
        .ok_or_else(|| anyhow!("Usage: rhythm-reader <path-to-text.txt | ->"))?;
    if arg == "-" {
        return Ok(InputSource::Stdin);
    }
    let path = PathBuf::from(arg);
    if !path.exists() {
        return Err(anyhow!("File not found: {}", path.display()));
    }
    let is_txt = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
    if !is_txt {
        return Err(anyhow!(
            "Only plain .txt files are supported: {}",
            path.display()
        ));
    }
    Ok(InputSource::File(path))
}

fn load_text(input: &InputSource) -> Result<String> {
    match input {
        InputSource::File(path) => {
            fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))
        }
        InputSource::Stdin => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Reading stdin")?;
            Ok(buffer)
        }
    }
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            subscriber_fmt::layer()
                .with_target(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        tracing::warn!(%level, "Failed to update log level from config: {err}");
    }
}
