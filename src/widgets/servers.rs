use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Span,
    widgets::{Block, Widget},
};
use tui_textarea::TextArea;

use crate::{
    structs::{
        event::{EventCommand, EventResult},
        server::{ServerInfo, ServerKind},
    },
    theme::Palette,
    widgets::{
        Commands,
        input::{input_single, style_input, text_input, text_of},
        table::{TableFocus, TableRow, TableWidget},
    },
};

/// Inline editor for one server row
#[derive(Debug, Clone)]
struct ServerEdit {
    id: String,
    fields: [TextArea<'static>; 3],
    kind: ServerKind,
    //0..3 are the text fields, 3 is the type
    focus: usize,
}

impl ServerEdit {
    fn new(server: &ServerInfo) -> Self {
        Self {
            id: server.id.clone(),
            fields: [
                text_input(&server.name, "Name"),
                text_input(&server.ip_address, "IP address"),
                text_input(&server.fqdn, "FQDN"),
            ],
            kind: server.kind,
            focus: 0,
        }
    }

    fn server(&self) -> ServerInfo {
        let [name, ip, fqdn] = &self.fields;
        ServerInfo {
            id: self.id.clone(),
            name: text_of(name).trim().to_string(),
            ip_address: text_of(ip).trim().to_string(),
            fqdn: text_of(fqdn).trim().to_string(),
            kind: self.kind,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServersWidget {
    data: Vec<ServerInfo>,
    table: TableWidget,
    edit: Option<ServerEdit>,
    palette: Palette,
}

impl Default for ServersWidget {
    fn default() -> Self {
        Self {
            data: vec![],
            table: TableWidget::new(
                &["Name", "IP Address", "FQDN", "Type"],
                vec![
                    Constraint::Percentage(30),
                    Constraint::Length(16),
                    Constraint::Percentage(40),
                    Constraint::Length(12),
                ],
            )
            .sortable(),
            edit: None,
            palette: Palette::default(),
        }
    }
}

impl ServersWidget {
    pub fn set_data(&mut self, data: &[ServerInfo]) {
        self.data = data.to_vec();
        let rows = self
            .data
            .iter()
            .map(|s| {
                TableRow::new(
                    &s.id,
                    vec![
                        s.name.clone(),
                        s.ip_address.clone(),
                        s.fqdn.clone(),
                        s.kind.to_string(),
                    ],
                )
            })
            .collect();
        self.table.set_data(rows);
        self.table.set_title(&format!("Servers ({})", self.data.len()));
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        self.table.set_palette(palette);
    }

    pub fn select(&mut self, id: &str) {
        self.table.set_current_key(id);
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    fn current(&self) -> Option<&ServerInfo> {
        self.table
            .get_current()
            .and_then(|row| self.data.iter().find(|s| s.id == row.key))
    }

    fn handle_edit_key(&mut self, key: &KeyEvent) -> Option<EventResult> {
        let edit = self.edit.as_mut()?;
        match key.code {
            KeyCode::Esc => self.edit = None,
            KeyCode::Enter => {
                let server = edit.server();
                self.edit = None;
                return Some(EventResult::Command(EventCommand::UpdateServer(server)));
            }
            KeyCode::Tab => edit.focus = (edit.focus + 1) % 4,
            KeyCode::BackTab => edit.focus = (edit.focus + 3) % 4,
            KeyCode::Char(' ') | KeyCode::Right if edit.focus == 3 => edit.kind.cycle_next(),
            _ => {
                if let Some(field) = edit.fields.get_mut(edit.focus) {
                    input_single(field, key);
                }
            }
        }
        Some(EventResult::None)
    }
}

impl Widget for ServersWidget {
    fn render(mut self, area: Rect, buf: &mut Buffer) {
        use Constraint::{Length, Min, Percentage};
        let Some(mut edit) = self.edit.take() else {
            self.table.render(area, buf);
            return;
        };

        let [table_area, edit_area] = Layout::vertical([Min(0), Length(3)]).areas(area);
        self.table.focus(TableFocus::Unfocused);
        self.table.render(table_area, buf);

        let block = Block::bordered()
            .title("Edit server  Tab:Next  Enter:Save  Esc:Cancel")
            .style(self.palette.base);
        let inner = block.inner(edit_area);
        block.render(edit_area, buf);
        let [a, b, c, d] =
            Layout::horizontal([Percentage(30), Length(18), Percentage(40), Min(14)]).areas(inner);
        for (i, (field, rect)) in edit.fields.iter_mut().zip([a, b, c]).enumerate() {
            style_input(field, edit.focus == i, &self.palette);
            (&*field).render(rect, buf);
        }
        let kind_style = if edit.focus == 3 {
            self.palette.input
        } else {
            self.palette.base
        };
        Span::styled(format!("< {} >", edit.kind), kind_style).render(d, buf);
    }
}

impl Commands for ServersWidget {
    fn command_descriptions(&self) -> Vec<(&str, &str, &str)> {
        vec![
            ("a", "Add server", "Add"),
            ("e/Enter", "Edit server", "Edit"),
            ("d", "Delete server", "Delete"),
            ("1-4", "Sort column", ""),
        ]
    }

    fn handle_key_event(&mut self, key: &KeyEvent) -> Option<EventResult> {
        if self.edit.is_some() {
            return self.handle_edit_key(key);
        }
        if self.table.handle_key_event(key) {
            return Some(EventResult::None);
        }
        match key.code {
            KeyCode::Char('a') => Some(EventResult::Command(EventCommand::AddServer)),
            KeyCode::Char('d') => self
                .current()
                .map(|s| EventResult::Command(EventCommand::DeleteServer(s.id.clone()))),
            KeyCode::Char('e') | KeyCode::Enter => {
                self.edit = self.current().map(ServerEdit::new);
                self.edit.as_ref().map(|_| EventResult::None)
            }
            _ => None,
        }
    }
}
