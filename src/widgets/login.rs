use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Clear, Widget},
};
use tui_textarea::TextArea;

use crate::{
    structs::event::{EventCommand, EventResult},
    theme::Palette,
    widgets::{
        Commands,
        input::{input_single, style_input, text_input, text_of},
    },
};

#[derive(Debug, Clone)]
pub struct LoginWidget {
    username: TextArea<'static>,
    password: TextArea<'static>,
    on_password: bool,
    error: Option<String>,
    palette: Palette,
}

impl LoginWidget {
    pub fn new(palette: Palette) -> Self {
        let mut password = text_input("", "password");
        password.set_mask_char('\u{2022}');
        Self {
            username: text_input("", "username"),
            password,
            on_password: false,
            error: None,
            palette,
        }
    }

    pub fn set_error(&mut self, error: impl ToString) {
        self.error = Some(error.to_string());
        //retry starts from an empty password
        self.password.select_all();
        self.password.cut();
    }
}

impl Widget for LoginWidget {
    fn render(mut self, area: Rect, buf: &mut Buffer) {
        use Constraint::{Length, Min};
        Clear.render(area, buf);
        let block = Block::bordered()
            .title("Sign In")
            .title_bottom(Line::from(" Tab:Switch  Enter:Sign in  Esc:Cancel "))
            .style(self.palette.popup);
        let inner = block.inner(area);
        block.render(area, buf);

        let [user_area, pass_area, _, error_area] =
            Layout::vertical([Length(1), Length(1), Length(1), Min(1)]).areas(inner);
        let p = self.palette;
        for (label, area, input, focused) in [
            ("Username", user_area, &mut self.username, !self.on_password),
            ("Password", pass_area, &mut self.password, self.on_password),
        ] {
            let [l, v] = Layout::horizontal([Length(10), Min(0)]).areas(area);
            Span::styled(label, p.secondary).render(l, buf);
            style_input(input, focused, &p);
            (&*input).render(v, buf);
        }
        if let Some(error) = &self.error {
            Line::styled(error.clone(), p.error).render(error_area, buf);
        }
    }
}

impl Commands for LoginWidget {
    fn command_descriptions(&self) -> Vec<(&str, &str, &str)> {
        vec![
            ("Tab", "Switch field", ""),
            ("Enter", "Sign in", ""),
            ("Esc", "Cancel", ""),
        ]
    }

    fn handle_key_event(&mut self, key: &KeyEvent) -> Option<EventResult> {
        match key.code {
            KeyCode::Esc => return Some(EventResult::Close),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.on_password = !self.on_password
            }
            KeyCode::Enter if !self.on_password => self.on_password = true,
            KeyCode::Enter => {
                return Some(EventResult::Command(EventCommand::SignIn {
                    username: text_of(&self.username).trim().to_string(),
                    password: text_of(&self.password),
                }));
            }
            _ if self.on_password => input_single(&mut self.password, key),
            _ => input_single(&mut self.username, key),
        }
        Some(EventResult::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn type_text(w: &mut LoginWidget, text: &str) {
        for c in text.chars() {
            w.handle_key_event(&KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    #[test]
    fn test_sign_in() {
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let mut w = LoginWidget::new(Palette::default());
        type_text(&mut w, "admin");
        assert_eq!(w.handle_key_event(&enter), Some(EventResult::None));
        type_text(&mut w, "secret");
        assert_eq!(
            w.handle_key_event(&enter),
            Some(EventResult::Command(EventCommand::SignIn {
                username: "admin".into(),
                password: "secret".into()
            }))
        );

        w.set_error("Invalid username or password");
        assert_eq!(text_of(&w.password), "");
        assert_eq!(text_of(&w.username), "admin");
    }
}
