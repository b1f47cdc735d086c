use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Block, Clear, Paragraph, Widget, Wrap},
};

use crate::{
    structs::event::{EventCommand, EventResult},
    theme::Palette,
    widgets::Commands,
};

/// Yes/no prompt before a package is removed
#[derive(Debug, Clone)]
pub struct ConfirmDelete {
    id: String,
    name: String,
    error: Option<String>,
    palette: Palette,
}

impl ConfirmDelete {
    pub fn new(id: String, name: String, palette: Palette) -> Self {
        Self {
            id,
            name,
            error: None,
            palette,
        }
    }

    pub fn set_error(&mut self, error: impl ToString) {
        self.error = Some(error.to_string());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn message(&self) -> String {
        format!(
            "Are you sure you want to delete {}? This action cannot be undone.",
            self.name
        )
    }
}

impl Widget for ConfirmDelete {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let mut lines = vec![
            Line::raw(self.message()),
            Line::raw(""),
            Line::styled("y: Delete    n/Esc: Cancel", self.palette.title),
        ];
        if let Some(error) = &self.error {
            lines.push(Line::styled(error.clone(), self.palette.error));
        }
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .title("Delete Package")
                    .style(self.palette.popup),
            )
            .render(area, buf);
    }
}

impl Commands for ConfirmDelete {
    fn command_descriptions(&self) -> Vec<(&str, &str, &str)> {
        vec![("y", "Confirm delete", ""), ("n/Esc", "Cancel", "")]
    }

    fn handle_key_event(&mut self, key: &KeyEvent) -> Option<EventResult> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(EventResult::Command(
                EventCommand::DeletePackage(self.id.clone()),
            )),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(EventResult::Close),
            _ => Some(EventResult::None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_confirm() {
        let mut dialog = ConfirmDelete::new("4".into(), "AutoCAD 2024".into(), Palette::default());
        assert!(dialog.message().contains("delete AutoCAD 2024?"));
        let key = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        assert_eq!(dialog.handle_key_event(&key('x')), Some(EventResult::None));
        assert_eq!(dialog.handle_key_event(&key('n')), Some(EventResult::Close));
        assert_eq!(
            dialog.handle_key_event(&key('y')),
            Some(EventResult::Command(EventCommand::DeletePackage("4".into())))
        );
    }

    #[test]
    fn test_error_is_rendered() {
        let mut dialog = ConfirmDelete::new("4".into(), "AutoCAD".into(), Palette::default());
        assert_eq!(dialog.error(), None);
        dialog.set_error("No package with id '4'");
        let area = Rect::new(0, 0, 60, 8);
        let mut buf = Buffer::empty(area);
        dialog.clone().render(area, &mut buf);
        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("No package with id '4'"));
    }
}
