use super::Effect;
use super::super::state::Reader;
use crate::config::{MAX_WPM, MIN_WPM, ThemeMode, parse_hex_color};
use tracing::{info, warn};

/// Preference changes take effect at the next dispatched line; an in-flight
/// utterance keeps the settings it was dispatched with.
impl Reader {
    pub(super) fn handle_speed_changed(&mut self, wpm: u32, effects: &mut Vec<Effect>) {
        let clamped = wpm.clamp(MIN_WPM, MAX_WPM);
        if clamped == self.config.speed_wpm {
            return;
        }
        self.config.speed_wpm = clamped;
        info!(wpm = clamped, "Adjusted target pace");
        effects.push(Effect::SaveSettings);
    }

    pub(super) fn handle_voice_changed(&mut self, index: usize, effects: &mut Vec<Effect>) {
        if index == self.config.voice_index {
            return;
        }
        self.config.voice_index = index;
        info!(voice = index, "Selected voice");
        effects.push(Effect::SaveSettings);
    }

    pub(super) fn handle_volume_changed(&mut self, volume: u8, effects: &mut Vec<Effect>) {
        let clamped = volume.min(100);
        if clamped == self.config.volume {
            return;
        }
        self.config.volume = clamped;
        info!(volume = clamped, "Adjusted volume");
        effects.push(Effect::SaveSettings);
    }

    pub(super) fn handle_toggle_mute(&mut self, effects: &mut Vec<Effect>) {
        self.config.is_muted = !self.config.is_muted;
        info!(muted = self.config.is_muted, "Toggled mute");
        effects.push(Effect::Announce(
            if self.config.is_muted { "Muted" } else { "Unmuted" }.to_string(),
        ));
        effects.push(Effect::SaveSettings);
    }

    pub(super) fn handle_auto_scroll_changed(&mut self, enabled: bool, effects: &mut Vec<Effect>) {
        if self.config.auto_scroll == enabled {
            return;
        }
        self.config.auto_scroll = enabled;
        info!(enabled, "Updated auto-scroll to the spoken line");
        effects.push(Effect::SaveSettings);
        if enabled && self.session.current_index < self.session.lines.len() {
            effects.push(Effect::Reveal(self.session.current_index));
        }
    }

    pub(super) fn handle_show_wpm_changed(&mut self, enabled: bool, effects: &mut Vec<Effect>) {
        if self.config.show_wpm == enabled {
            return;
        }
        self.config.show_wpm = enabled;
        info!(enabled, "Updated live WPM display");
        effects.push(Effect::SaveSettings);
        effects.push(Effect::UpdateProgress(self.progress()));
    }

    pub(super) fn handle_toggle_theme(&mut self, effects: &mut Vec<Effect>) {
        self.config.theme = match self.config.theme {
            ThemeMode::Day => ThemeMode::Night,
            ThemeMode::Night => ThemeMode::Day,
        };
        info!(theme = %self.config.theme, "Toggled theme");
        effects.push(Effect::Restyle {
            theme: self.config.theme,
            highlight_color: self.config.highlight_color.clone(),
        });
        effects.push(Effect::SaveSettings);
    }

    pub(super) fn handle_highlight_color_changed(
        &mut self,
        color: String,
        effects: &mut Vec<Effect>,
    ) {
        if parse_hex_color(&color).is_none() {
            warn!(%color, "Rejecting unparseable highlight color");
            effects.push(Effect::Announce(format!(
                "Not a #rrggbb color: {color}"
            )));
            return;
        }
        if color == self.config.highlight_color {
            return;
        }
        info!(%color, "Updated highlight color");
        self.config.highlight_color = color;
        effects.push(Effect::Restyle {
            theme: self.config.theme,
            highlight_color: self.config.highlight_color.clone(),
        });
        effects.push(Effect::SaveSettings);
    }
}
