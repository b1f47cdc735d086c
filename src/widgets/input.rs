use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Color, Style};
use tui_textarea::TextArea;

use crate::theme::Palette;

/// Single line text box, pre-filled with `value`
pub fn text_input(value: &str, placeholder: &str) -> TextArea<'static> {
    let mut textarea = TextArea::new(vec![value.to_string()]);
    textarea.set_placeholder_text(placeholder);
    textarea.set_cursor_line_style(Style::default());
    textarea.move_cursor(tui_textarea::CursorMove::End);
    textarea
}

pub fn multiline_input(value: &str, placeholder: &str) -> TextArea<'static> {
    let lines = if value.is_empty() {
        vec![String::new()]
    } else {
        value.lines().map(|l| l.to_string()).collect()
    };
    let mut textarea = TextArea::new(lines);
    textarea.set_placeholder_text(placeholder);
    textarea.set_cursor_line_style(Style::default());
    textarea
}

pub fn text_of(textarea: &TextArea) -> String {
    textarea.lines().join("\n")
}

/// Forward a key to a single line box. Enter never reaches it.
pub fn input_single(textarea: &mut TextArea<'static>, key: &KeyEvent) {
    if key.code == KeyCode::Enter {
        return;
    }
    textarea.input(*key);
}

/// Highlight the focused box and dim the rest
pub fn style_input(textarea: &mut TextArea<'static>, focused: bool, palette: &Palette) {
    if focused {
        textarea.set_style(palette.input);
        textarea.set_cursor_style(Style::default().bg(Color::White));
        textarea.set_placeholder_style(palette.input.fg(Color::DarkGray));
    } else {
        textarea.set_style(palette.base);
        textarea.set_cursor_style(palette.base);
        textarea.set_placeholder_style(palette.secondary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_single_line_ignores_enter() {
        let mut ta = text_input("Zoo", "Name");
        input_single(&mut ta, &KeyEvent::new(KeyCode::Char('m'), KeyModifiers::NONE));
        input_single(&mut ta, &KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(text_of(&ta), "Zoom");
    }

    #[test]
    fn test_multiline() {
        let ta = multiline_input("a\nb", "");
        assert_eq!(ta.lines().len(), 2);
        assert_eq!(text_of(&ta), "a\nb");
        assert_eq!(text_of(&multiline_input("", "")), "");
    }
}
