use std::fmt::Display;

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

use crate::{licence::LicenceState, structs::package::Status};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Amoled,
    Light,
}

impl Theme {
    pub(crate) fn cycle_next(&mut self) {
        *self = match self {
            Theme::Default => Theme::Amoled,
            Theme::Amoled => Theme::Light,
            Theme::Light => Theme::Default,
        };
    }

    /// Resolve every colour the widgets need in one place
    pub fn palette(&self) -> Palette {
        match self {
            Theme::Default => Palette {
                base: Style::new().fg(Color::Gray).bg(Color::Reset),
                title: Style::new().fg(Color::White).add_modifier(Modifier::BOLD),
                secondary: Style::new().fg(Color::DarkGray),
                header: Style::new().fg(Color::Black).bg(Color::Red).add_modifier(Modifier::BOLD),
                current: Style::new().fg(Color::Black).bg(Color::Yellow),
                accent: Color::LightBlue,
                popup: Style::new().fg(Color::Black).bg(Color::Blue),
                input: Style::new().fg(Color::Black).bg(Color::Blue),
                error: Style::new().fg(Color::Red),
                live: Color::Green,
                in_progress: Color::Yellow,
                deprecated: Color::Red,
            },
            Theme::Amoled => Palette {
                base: Style::new().fg(Color::White).bg(Color::Black),
                title: Style::new().fg(Color::White).add_modifier(Modifier::BOLD),
                secondary: Style::new().fg(Color::Gray),
                header: Style::new().fg(Color::White).bg(Color::DarkGray).add_modifier(Modifier::BOLD),
                current: Style::new().fg(Color::Black).bg(Color::White),
                accent: Color::Cyan,
                popup: Style::new().fg(Color::White).bg(Color::Black),
                input: Style::new().fg(Color::White).bg(Color::DarkGray),
                error: Style::new().fg(Color::LightRed),
                live: Color::LightGreen,
                in_progress: Color::LightYellow,
                deprecated: Color::LightRed,
            },
            Theme::Light => Palette {
                base: Style::new().fg(Color::Black).bg(Color::White),
                title: Style::new().fg(Color::Black).add_modifier(Modifier::BOLD),
                secondary: Style::new().fg(Color::DarkGray),
                header: Style::new().fg(Color::White).bg(Color::Blue).add_modifier(Modifier::BOLD),
                current: Style::new().fg(Color::White).bg(Color::Blue),
                accent: Color::Blue,
                popup: Style::new().fg(Color::Black).bg(Color::Gray),
                input: Style::new().fg(Color::Black).bg(Color::Gray),
                error: Style::new().fg(Color::Red),
                live: Color::Green,
                in_progress: Color::Rgb(180, 120, 0),
                deprecated: Color::Red,
            },
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Default => write!(f, "Default"),
            Theme::Amoled => write!(f, "AMOLED"),
            Theme::Light => write!(f, "Light"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(Theme::Default),
            "amoled" => Ok(Theme::Amoled),
            "light" => Ok(Theme::Light),
            _ => Err(format!("unknown theme '{s}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub base: Style,
    pub title: Style,
    pub secondary: Style,
    pub header: Style,
    pub current: Style,
    pub accent: Color,
    pub popup: Style,
    pub input: Style,
    pub error: Style,
    pub live: Color,
    pub in_progress: Color,
    pub deprecated: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Theme::default().palette()
    }
}

impl Palette {
    pub fn status(&self, status: Status) -> Color {
        match status {
            Status::Live => self.live,
            Status::InProgress => self.in_progress,
            Status::Deprecated => self.deprecated,
        }
    }

    pub fn licence(&self, state: LicenceState) -> Style {
        match state {
            LicenceState::Expired => Style::new().fg(self.deprecated),
            LicenceState::ExpiringSoon => Style::new().fg(self.in_progress),
            _ => self.secondary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_and_parse() {
        let mut theme = Theme::default();
        theme.cycle_next();
        assert_eq!(theme, Theme::Amoled);
        theme.cycle_next();
        theme.cycle_next();
        assert_eq!(theme, Theme::Default);
        assert_eq!("LIGHT".parse::<Theme>(), Ok(Theme::Light));
        assert!("neon".parse::<Theme>().is_err());
    }

    #[test]
    fn test_palette_status_colours() {
        let palette = Theme::Default.palette();
        assert_eq!(palette.status(Status::Live), Color::Green);
        assert_eq!(palette.status(Status::Deprecated), Color::Red);
        assert_eq!(
            palette.licence(LicenceState::Expired),
            Style::new().fg(Color::Red)
        );
        assert_ne!(Theme::Light.palette(), Theme::Amoled.palette());
    }
}
