//! Terminal front end: a line-oriented presentation sink plus the command
//! reader that turns stdin input into session messages.

use crate::config::{AppConfig, ThemeMode, parse_hex_color};
use crate::pace::{SessionSummary, format_mm_ss};
use crate::session::Message;
use crate::sink::{PresentationSink, Progress};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::Sender;
use std::thread;
use tracing::debug;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

pub struct TerminalSink {
    lines: Vec<String>,
    completed: Vec<bool>,
    theme: ThemeMode,
    highlight: (u8, u8, u8),
}

impl TerminalSink {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            completed: Vec::new(),
            theme: ThemeMode::default(),
            highlight: (0xfb, 0xbf, 0x24),
        }
    }

    fn highlight_prefix(&self) -> String {
        let (r, g, b) = self.highlight;
        format!("{BOLD}\x1b[38;2;{r};{g};{b}m")
    }

    fn body_prefix(&self) -> &'static str {
        match self.theme {
            ThemeMode::Day => "",
            ThemeMode::Night => DIM,
        }
    }
}

impl PresentationSink for TerminalSink {
    fn render_lines(&mut self, lines: &[String]) {
        self.lines = lines.to_vec();
        self.completed = vec![false; lines.len()];
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{BOLD}{} lines loaded{RESET}", lines.len());
        let body = self.body_prefix();
        for (idx, line) in lines.iter().enumerate() {
            let _ = writeln!(out, "{body}{:>4}  {line}{RESET}", idx + 1);
        }
    }

    fn highlight(&mut self, index: usize) {
        let Some(line) = self.lines.get(index) else {
            return;
        };
        // A line highlighted after it was already completed is a replay
        // (wrap-around or backwards seek); mark it so.
        let marker = if self.completed.get(index).copied().unwrap_or(false) {
            '~'
        } else {
            '>'
        };
        let mut out = io::stdout().lock();
        let _ = writeln!(
            out,
            "{}{marker} {:>4}  {line}{RESET}",
            self.highlight_prefix(),
            index + 1
        );
    }

    fn mark_completed(&mut self, index: usize) {
        if let Some(done) = self.completed.get_mut(index) {
            *done = true;
        }
    }

    fn clear_completed(&mut self) {
        self.completed.iter_mut().for_each(|done| *done = false);
    }

    fn update_progress(&mut self, progress: &Progress) {
        let mut status = format!(
            "  line {} of {} ({:.0}%)",
            progress.current_line, progress.total_lines, progress.percent
        );
        if let Some(remaining) = progress.estimated_remaining {
            status.push_str(&format!("  ~{} left", format_mm_ss(remaining)));
        }
        if let Some(wpm) = progress.live_wpm {
            status.push_str(&format!("  {wpm} wpm"));
        }
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{DIM}{status}{RESET}");
    }

    fn announce(&mut self, message: &str) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{BOLD}** {message}{RESET}");
    }

    fn show_summary(&mut self, summary: &SessionSummary) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{BOLD}Reading complete{RESET}");
        let _ = writeln!(out, "  lines:        {}", summary.total_lines);
        let _ = writeln!(out, "  words:        {}", summary.total_words);
        let _ = writeln!(out, "  reading time: {}", format_mm_ss(summary.reading_time));
        let _ = writeln!(out, "  average wpm:  {}", summary.average_wpm);
        let _ = writeln!(out, "  target wpm:   {}", summary.target_wpm);
    }

    fn reveal(&mut self, index: usize) {
        // The terminal scrolls with its own output; nothing to move.
        debug!(line = index + 1, "Auto-scroll request");
    }

    fn restyle(&mut self, theme: ThemeMode, highlight_color: &str) {
        self.theme = theme;
        if let Some(rgb) = parse_hex_color(highlight_color) {
            self.highlight = rgb;
        }
    }
}

/// The configurable command words, lifted out of the config so parsing does
/// not depend on the whole settings record.
#[derive(Debug, Clone)]
pub struct CommandBindings {
    toggle: String,
    next: String,
    prev: String,
    restart: String,
    quit: String,
}

impl CommandBindings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            toggle: config.key_toggle_play_pause.clone(),
            next: config.key_next_line.clone(),
            prev: config.key_prev_line.clone(),
            restart: config.key_restart.clone(),
            quit: config.key_safe_quit.clone(),
        }
    }
}

/// A parsed line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Session(Message),
    Help,
}

/// Translate one line of input. An empty line toggles play/pause (the Enter
/// key as the space bar of a line-oriented terminal); `None` is unrecognized.
pub fn parse_command(input: &str, bindings: &CommandBindings) -> Option<Command> {
    let lower = input.trim().to_ascii_lowercase();
    if lower.is_empty() {
        return Some(Command::Session(Message::TogglePlayPause));
    }
    let mut parts = lower.split_whitespace();
    let head = parts.next()?;

    let message = match head {
        _ if head == bindings.toggle => Message::TogglePlayPause,
        "play" => Message::Play,
        "pause" => Message::Pause,
        _ if head == bindings.next => Message::NextLine,
        "next" => Message::NextLine,
        _ if head == bindings.prev => Message::PreviousLine,
        "prev" | "previous" => Message::PreviousLine,
        "jump" => Message::JumpLines(parts.next()?.parse().ok()?),
        "start" | "first" => Message::JumpToStart,
        "end" | "last" => Message::JumpToEnd,
        _ if head == bindings.restart => Message::Restart,
        "restart" => Message::Restart,
        "stop" => Message::Stop,
        "speed" => Message::SpeedChanged(parts.next()?.parse().ok()?),
        "voice" => Message::VoiceChanged(parts.next()?.parse().ok()?),
        "voices" => Message::ListVoices,
        "vol" | "volume" => {
            let volume: u32 = parts.next()?.parse().ok()?;
            Message::VolumeChanged(volume.min(100) as u8)
        }
        "mute" => Message::ToggleMute,
        "autoscroll" => Message::AutoScrollChanged(parse_on_off(parts.next()?)?),
        "wpm" => Message::ShowWpmChanged(parse_on_off(parts.next()?)?),
        "theme" => Message::ToggleTheme,
        "color" => Message::HighlightColorChanged(parts.next()?.to_string()),
        _ if head == bindings.quit => Message::SafeQuit,
        "quit" | "exit" => Message::SafeQuit,
        "help" | "h" | "?" => return Some(Command::Help),
        _ => return None,
    };
    Some(Command::Session(message))
}

fn parse_on_off(value: &str) -> Option<bool> {
    match value {
        "on" | "true" | "yes" => Some(true),
        "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

pub fn key_help(bindings: &CommandBindings) -> String {
    format!(
        "Commands: Enter or '{}' toggles play/pause; '{}'/'{}' move a line; \
         'jump N', 'start', 'end' seek; '{}' restarts; 'stop' returns to idle; \
         'speed N', 'voice N', 'vol N', 'mute', 'voices', 'theme', 'color #rrggbb', \
         'autoscroll on|off', 'wpm on|off' tune the session; '{}' quits.",
        bindings.toggle, bindings.next, bindings.prev, bindings.restart, bindings.quit
    )
}

/// Read stdin line by line and forward commands to the session. Exits when
/// stdin closes, which is treated as a quit.
pub fn spawn_input_thread(events: Sender<Message>, bindings: CommandBindings) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line, &bindings) {
                Some(Command::Session(message)) => {
                    if events.send(message).is_err() {
                        return;
                    }
                }
                Some(Command::Help) => println!("{}", key_help(&bindings)),
                None => println!("Unrecognized command; type 'help' for the list."),
            }
        }
        debug!("Input closed; requesting quit");
        let _ = events.send(Message::SafeQuit);
    });
}
