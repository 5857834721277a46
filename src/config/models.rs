use serde::Deserialize;

/// Bounds for the target reading pace slider.
pub const MIN_WPM: u32 = 50;
pub const MAX_WPM: u32 = 400;

const MAX_PAUSE_BETWEEN_LINES_MS: u64 = 2000;

/// User preferences; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct AppConfig {
    #[serde(default = "crate::config::defaults::default_speed_wpm")]
    pub speed_wpm: u32,
    #[serde(default)]
    pub voice_index: usize,
    #[serde(default = "crate::config::defaults::default_volume")]
    pub volume: u8,
    #[serde(default)]
    pub is_muted: bool,
    #[serde(default = "crate::config::defaults::default_auto_scroll")]
    pub auto_scroll: bool,
    #[serde(default = "crate::config::defaults::default_show_wpm")]
    pub show_wpm: bool,
    #[serde(default = "crate::config::defaults::default_pause_between_lines_ms")]
    pub pause_between_lines_ms: u64,
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "crate::config::defaults::default_highlight_color")]
    pub highlight_color: String,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
    #[serde(default = "crate::config::defaults::default_key_toggle_play_pause")]
    pub key_toggle_play_pause: String,
    #[serde(default = "crate::config::defaults::default_key_next_line")]
    pub key_next_line: String,
    #[serde(default = "crate::config::defaults::default_key_prev_line")]
    pub key_prev_line: String,
    #[serde(default = "crate::config::defaults::default_key_restart")]
    pub key_restart: String,
    #[serde(default = "crate::config::defaults::default_key_safe_quit")]
    pub key_safe_quit: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            speed_wpm: crate::config::defaults::default_speed_wpm(),
            voice_index: 0,
            volume: crate::config::defaults::default_volume(),
            is_muted: false,
            auto_scroll: crate::config::defaults::default_auto_scroll(),
            show_wpm: crate::config::defaults::default_show_wpm(),
            pause_between_lines_ms: crate::config::defaults::default_pause_between_lines_ms(),
            theme: ThemeMode::default(),
            highlight_color: crate::config::defaults::default_highlight_color(),
            log_level: crate::config::defaults::default_log_level(),
            key_toggle_play_pause: crate::config::defaults::default_key_toggle_play_pause(),
            key_next_line: crate::config::defaults::default_key_next_line(),
            key_prev_line: crate::config::defaults::default_key_prev_line(),
            key_restart: crate::config::defaults::default_key_restart(),
            key_safe_quit: crate::config::defaults::default_key_safe_quit(),
        }
    }
}

impl AppConfig {
    /// Normalize every field into its supported range after loading or
    /// merging, so the rest of the program never re-checks bounds.
    pub fn clamp(&mut self) {
        fn normalize_key_binding(value: &mut String, fallback: String) {
            let normalized = value.trim().to_ascii_lowercase();
            if normalized.is_empty() {
                *value = fallback;
            } else {
                *value = normalized;
            }
        }

        self.speed_wpm = self.speed_wpm.clamp(MIN_WPM, MAX_WPM);
        self.volume = self.volume.min(100);
        self.pause_between_lines_ms = self.pause_between_lines_ms.min(MAX_PAUSE_BETWEEN_LINES_MS);
        if parse_hex_color(&self.highlight_color).is_none() {
            self.highlight_color = crate::config::defaults::default_highlight_color();
        }
        normalize_key_binding(
            &mut self.key_toggle_play_pause,
            crate::config::defaults::default_key_toggle_play_pause(),
        );
        normalize_key_binding(
            &mut self.key_next_line,
            crate::config::defaults::default_key_next_line(),
        );
        normalize_key_binding(
            &mut self.key_prev_line,
            crate::config::defaults::default_key_prev_line(),
        );
        normalize_key_binding(
            &mut self.key_restart,
            crate::config::defaults::default_key_restart(),
        );
        normalize_key_binding(
            &mut self.key_safe_quit,
            crate::config::defaults::default_key_safe_quit(),
        );
    }
}

/// Theme mode.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    Day,
    Night,
}

impl Default for ThemeMode {
    fn default() -> Self {
        ThemeMode::Day
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ThemeMode::Day => "Day",
            ThemeMode::Night => "Night",
        };
        write!(f, "{}", label)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Parse a `#rrggbb` color string; `None` when it is not one.
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}
