use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Clear, Widget},
};
use tui_textarea::TextArea;

use crate::{
    structs::{
        event::{EventCommand, EventResult},
        package::{MAX_SCRIPT_BYTES, Script, ScriptType},
    },
    theme::Palette,
    widgets::{
        Commands,
        input::{input_single, multiline_input, style_input, text_input, text_of},
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum Focus {
    #[default]
    Name,
    Kind,
    Content,
}

/// Attach a script to one package
#[derive(Debug, Clone)]
pub struct ScriptWizard {
    package_id: String,
    name: TextArea<'static>,
    kind: ScriptType,
    content: TextArea<'static>,
    focus: Focus,
    error: Option<String>,
    palette: Palette,
}

impl ScriptWizard {
    pub fn new(package_id: String, palette: Palette) -> Self {
        Self {
            package_id,
            name: text_input("", "Install.ps1"),
            kind: ScriptType::default(),
            content: multiline_input("", "Script content"),
            focus: Focus::default(),
            error: None,
            palette,
        }
    }

    pub fn set_error(&mut self, error: impl ToString) {
        self.error = Some(error.to_string());
    }

    fn script(&self) -> Script {
        Script {
            name: text_of(&self.name).trim().to_string(),
            kind: self.kind,
            content: text_of(&self.content),
        }
    }

    fn cycle_kind(&mut self) {
        let all = ScriptType::ALL;
        let i = all.iter().position(|k| *k == self.kind).unwrap_or(0);
        self.kind = all[(i + 1) % all.len()];
    }

    fn submit(&mut self) -> EventResult {
        let script = self.script();
        if let Err(e) = script.validate() {
            self.set_error(e);
            return EventResult::None;
        }
        EventResult::Command(EventCommand::AddScript {
            id: self.package_id.clone(),
            script,
        })
    }
}

impl Widget for ScriptWizard {
    fn render(mut self, area: Rect, buf: &mut Buffer) {
        use Constraint::{Length, Min};
        Clear.render(area, buf);
        let block = Block::bordered()
            .title("Add Script")
            .title_bottom(Line::from(" Tab:Next  Ctrl+S:Save  Esc:Cancel "))
            .style(self.palette.popup);
        let inner = block.inner(area);
        block.render(area, buf);

        let [name_area, kind_area, content_area, size_area, error_area] =
            Layout::vertical([Length(1), Length(1), Min(3), Length(1), Length(1)]).areas(inner);
        let label = |area: Rect| Layout::horizontal([Length(10), Min(0)]).areas::<2>(area);
        let p = self.palette;

        let [l, v] = label(name_area);
        Span::styled("Name", p.secondary).render(l, buf);
        style_input(&mut self.name, self.focus == Focus::Name, &p);
        (&self.name).render(v, buf);

        let [l, v] = label(kind_area);
        Span::styled("Type", p.secondary).render(l, buf);
        let kind_style = if self.focus == Focus::Kind { p.input } else { p.popup };
        Span::styled(format!("< {} >", self.kind), kind_style).render(v, buf);

        style_input(&mut self.content, self.focus == Focus::Content, &p);
        self.content.set_block(Block::bordered().title("Content"));
        (&self.content).render(content_area, buf);

        let size = self.script().content.len();
        let size_style = if size > MAX_SCRIPT_BYTES { p.error } else { p.secondary };
        Line::styled(format!("{size} / {MAX_SCRIPT_BYTES} bytes"), size_style).render(size_area, buf);
        if let Some(error) = &self.error {
            Line::styled(error.clone(), p.error).render(error_area, buf);
        }
    }
}

impl Commands for ScriptWizard {
    fn command_descriptions(&self) -> Vec<(&str, &str, &str)> {
        vec![
            ("Tab", "Next field", ""),
            ("Space", "Change script type", ""),
            ("Ctrl+S", "Save script", ""),
            ("Esc", "Cancel", ""),
        ]
    }

    fn handle_key_event(&mut self, key: &KeyEvent) -> Option<EventResult> {
        match key.code {
            KeyCode::Esc => return Some(EventResult::Close),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(self.submit());
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Name => Focus::Kind,
                    Focus::Kind => Focus::Content,
                    Focus::Content => Focus::Name,
                }
            }
            _ => match self.focus {
                Focus::Name => input_single(&mut self.name, key),
                Focus::Kind => {
                    if matches!(key.code, KeyCode::Char(' ') | KeyCode::Right | KeyCode::Enter) {
                        self.cycle_kind();
                    }
                }
                Focus::Content => {
                    self.content.input(*key);
                }
            },
        }
        Some(EventResult::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: KeyCode) -> KeyEvent {
        KeyEvent::new(c, KeyModifiers::NONE)
    }

    fn save() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)
    }

    fn type_text(wizard: &mut ScriptWizard, text: &str) {
        for c in text.chars() {
            let code = if c == '\n' { KeyCode::Enter } else { KeyCode::Char(c) };
            wizard.handle_key_event(&key(code));
        }
    }

    #[test]
    fn test_add_script() {
        let mut wizard = ScriptWizard::new("2".to_string(), Palette::default());
        wizard.handle_key_event(&save());
        assert_eq!(wizard.error.as_deref(), Some("Script name is required"));

        type_text(&mut wizard, "fix.bat");
        wizard.handle_key_event(&key(KeyCode::Tab));
        type_text(&mut wizard, "  ");
        wizard.handle_key_event(&key(KeyCode::Tab));
        type_text(&mut wizard, "@echo off\nexit 0");

        assert_eq!(
            wizard.handle_key_event(&save()),
            Some(EventResult::Command(EventCommand::AddScript {
                id: "2".to_string(),
                script: Script {
                    name: "fix.bat".to_string(),
                    kind: ScriptType::Batch,
                    content: "@echo off\nexit 0".to_string(),
                }
            }))
        );
    }

    #[test]
    fn test_oversized_script() {
        let mut wizard = ScriptWizard::new("2".to_string(), Palette::default());
        type_text(&mut wizard, "big.ps1");
        wizard.content = multiline_input(&"x".repeat(MAX_SCRIPT_BYTES + 1), "");
        assert_eq!(wizard.handle_key_event(&save()), Some(EventResult::None));
        assert_eq!(
            wizard.error.as_deref(),
            Some("Script is too large. Maximum size is 10KB.")
        );
    }
}
