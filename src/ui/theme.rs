use std::fs;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use tracing::warn;

use basta::config::Config;
use basta::engine::scoring::AnswerStatus;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    #[serde(default)]
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_pending: String,
    pub selected_bg: String,
    pub letter: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub status_incorrect: String,
    pub status_repeated: String,
    pub status_correct: String,
    pub status_unique: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    /// Looks up `<config dir>/themes/<name>.toml`. `"default"` and unknown
    /// names fall back to the built-in palette.
    pub fn load(name: &str) -> Self {
        if name == "default" {
            return Self::default();
        }
        let path = Config::config_dir()
            .join("themes")
            .join(format!("{name}.toml"));
        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<Theme>(&content) {
                Ok(theme) => theme,
                Err(err) => {
                    warn!(path = %path.display(), %err, "theme file did not parse");
                    Self::default()
                }
            },
            Err(_) => {
                warn!(theme = name, "theme not found, using default");
                Self::default()
            }
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            text_pending: "#6c7086".to_string(),
            selected_bg: "#313244".to_string(),
            letter: "#f9e2af".to_string(),
            accent: "#89b4fa".to_string(),
            accent_dim: "#45475a".to_string(),
            border: "#45475a".to_string(),
            border_focused: "#89b4fa".to_string(),
            header_bg: "#313244".to_string(),
            header_fg: "#cdd6f4".to_string(),
            bar_filled: "#fab387".to_string(),
            bar_empty: "#313244".to_string(),
            status_incorrect: "#f38ba8".to_string(),
            status_repeated: "#f9e2af".to_string(),
            status_correct: "#a6e3a1".to_string(),
            status_unique: "#cba6f7".to_string(),
            error: "#f38ba8".to_string(),
            warning: "#f9e2af".to_string(),
            success: "#a6e3a1".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }

    pub fn status(&self, status: AnswerStatus) -> Color {
        match status {
            AnswerStatus::Incorrect => Self::parse_color(&self.status_incorrect),
            AnswerStatus::Repeated => Self::parse_color(&self.status_repeated),
            AnswerStatus::Correct => Self::parse_color(&self.status_correct),
            AnswerStatus::Unique => Self::parse_color(&self.status_unique),
        }
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_pending(&self) -> Color { Self::parse_color(&self.text_pending) }
    pub fn selected_bg(&self) -> Color { Self::parse_color(&self.selected_bg) }
    pub fn letter(&self) -> Color { Self::parse_color(&self.letter) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}
