pub(crate) fn default_speed_wpm() -> u32 {
    150
}

pub(crate) fn default_volume() -> u8 {
    100
}

pub(crate) fn default_auto_scroll() -> bool {
    true
}

pub(crate) fn default_show_wpm() -> bool {
    true
}

pub(crate) fn default_pause_between_lines_ms() -> u64 {
    100
}

pub(crate) fn default_highlight_color() -> String {
    "#fbbf24".to_string()
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}

pub(crate) fn default_key_toggle_play_pause() -> String {
    "space".to_string()
}

pub(crate) fn default_key_next_line() -> String {
    "n".to_string()
}

pub(crate) fn default_key_prev_line() -> String {
    "p".to_string()
}

pub(crate) fn default_key_restart() -> String {
    "r".to_string()
}

pub(crate) fn default_key_safe_quit() -> String {
    "q".to_string()
}
