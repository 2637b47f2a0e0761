//! Colors and shared styles.
//!
//! Kanagawa Wave tones, reduced to what the two screens need.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Palette {
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            bg_dark: Color::Rgb(22, 22, 29),
            bg_panel: Color::Rgb(31, 31, 40),
            bg_highlight: Color::Rgb(42, 42, 55),
            border: Color::Rgb(84, 84, 109),
            text_primary: Color::Rgb(220, 215, 186),
            text_secondary: Color::Rgb(200, 192, 147),
            text_muted: Color::Rgb(114, 113, 105),
            primary: Color::Rgb(149, 127, 184),
            accent: Color::Rgb(127, 180, 202),
            success: Color::Rgb(152, 187, 108),
            warning: Color::Rgb(230, 195, 132),
            error: Color::Rgb(255, 93, 98),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}

pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn focused_border(palette: &Palette) -> Style {
        Style::default().fg(palette.primary)
    }

    #[must_use]
    pub fn idle_border(palette: &Palette) -> Style {
        Style::default().fg(palette.border)
    }

    #[must_use]
    pub fn selected_row(palette: &Palette) -> Style {
        Style::default()
            .bg(palette.bg_highlight)
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD)
    }
}
