use ratatui::style::Color;

use crate::model::UiConfig;
use crate::ops::lifecycle::Notice;

/// Parsed color theme for the widget
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub border: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    /// Countdown digits
    pub clock: Color,
    /// Key hint colors, one per action
    pub start: Color,
    pub add: Color,
    pub minimize: Color,
    pub close: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            border: Color::Rgb(0x7D, 0x78, 0xBF),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            clock: Color::Rgb(0xFF, 0x44, 0x44),
            start: Color::Rgb(0x4C, 0xAF, 0x50),
            add: Color::Rgb(0xFF, 0xA5, 0x00),
            minimize: Color::Rgb(0x44, 0x88, 0xFF),
            close: Color::Rgb(0xFF, 0x44, 0x44),
            warning: Color::Rgb(0xFF, 0xD7, 0x00),
            error: Color::Rgb(0xFF, 0x44, 0x44),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "border" => theme.border = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "clock" => theme.clock = color,
                    "start" => theme.start = color,
                    "add" => theme.add = color,
                    "minimize" => theme.minimize = color,
                    "close" => theme.close = color,
                    "warning" => theme.warning = color,
                    "error" => theme.error = color,
                    _ => {}
                }
            }
        }

        theme
    }

    /// Color for a status-row notice
    pub fn notice_color(&self, notice: &Notice) -> Color {
        match notice {
            Notice::Info(_) => self.text_bright,
            Notice::Warning(_) => self.warning,
            Notice::Error(_) => self.error,
        }
    }
}
