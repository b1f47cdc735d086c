use crossterm::event::{KeyCode, KeyEvent};
use jiff::Timestamp;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Widget},
};
use tui_textarea::TextArea;

use crate::{
    query::{PackageQuery, SortBy},
    structs::{
        event::{EventCommand, EventResult, Popup},
        package::{Package, Status},
    },
    theme::Palette,
    widgets::{
        Commands, CurrentPackage,
        detail::DetailWidget,
        input::{style_input, text_input, text_of},
        table::{TableFocus, TableRow, TableWidget},
    },
};

#[derive(Debug, Clone)]
pub struct PackagesWidget {
    data: Vec<Package>,
    query: PackageQuery,
    search: TextArea<'static>,
    searching: bool,
    show_info: bool,
    table: TableWidget,
    detail: DetailWidget,
    palette: Palette,
    now: Timestamp,
}

impl Default for PackagesWidget {
    fn default() -> Self {
        Self {
            data: vec![],
            query: PackageQuery::default(),
            search: text_input("", "Search..."),
            searching: false,
            show_info: true,
            table: TableWidget::new(
                &["Name", "Version", "Status", "Platform", "Updated"],
                vec![
                    Constraint::Percentage(40),
                    Constraint::Length(18),
                    Constraint::Length(12),
                    Constraint::Percentage(25),
                    Constraint::Length(10),
                ],
            ),
            detail: DetailWidget::default(),
            palette: Palette::default(),
            now: Timestamp::now(),
        }
    }
}

impl PackagesWidget {
    pub fn set_data(&mut self, data: &[Package], now: Timestamp) {
        self.data = data.to_vec();
        self.now = now;
        self.filter_data();
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        self.table.set_palette(palette);
        self.detail.set_palette(palette);
    }

    pub fn set_sort(&mut self, sort_by: SortBy) {
        self.query.sort_by = sort_by;
        self.filter_data();
    }

    pub fn query(&self) -> &PackageQuery {
        &self.query
    }

    /// Header shortcut, shared with the status counts
    pub fn toggle_status(&mut self, status: Status) {
        self.query.toggle_status(status);
        self.filter_data();
    }

    pub fn select(&mut self, id: &str) {
        self.table.set_current_key(id);
        self.update_detail();
    }

    fn filter_data(&mut self) {
        let visible = self.query.apply(&self.data);
        let rows: Vec<TableRow> = visible
            .iter()
            .map(|pack| {
                TableRow::new(
                    &pack.id,
                    vec![
                        pack.name.clone(),
                        pack.version.clone(),
                        pack.status.to_string(),
                        pack.platforms_label(),
                        pack.last_updated.to_string(),
                    ],
                )
                .with_highlight(Some(self.palette.status(pack.status)))
            })
            .collect();
        let shown = rows.len();
        self.table.set_data(rows);
        self.table.set_title(&format!(
            "Showing {} of {} packages",
            shown,
            self.data.len()
        ));
        self.table.set_footer(&format!("sorted by {}", self.query.sort_by));
        self.update_detail();
    }

    fn update_detail(&mut self) {
        let current = self
            .table
            .get_current()
            .and_then(|row| self.data.iter().find(|p| p.id == row.key));
        self.detail.set_package(current, self.now);
    }

    fn clear_filters(&mut self) {
        self.search.select_all();
        self.search.cut();
        self.query.clear();
        self.filter_data();
    }

    fn filter_line(&self) -> Line<'static> {
        let any = |v: Option<String>| v.unwrap_or_else(|| "Any".to_string());
        let p = &self.palette;
        Line::from(vec![
            Span::styled(" Platform: ", p.secondary),
            Span::styled(any(self.query.platform.map(|v| v.to_string())), p.title),
            Span::styled("  Status: ", p.secondary),
            Span::styled(any(self.query.status.map(|v| v.label().to_string())), p.title),
            Span::styled("  Sort: ", p.secondary),
            Span::styled(self.query.sort_by.to_string(), p.title),
        ])
    }
}

impl Widget for PackagesWidget {
    fn render(mut self, area: Rect, buf: &mut Buffer) {
        use Constraint::{Length, Min, Percentage};
        let [filter_area, body] = Layout::vertical([Length(3), Min(0)]).areas(area);

        let block = Block::bordered().title("Filters").style(self.palette.base);
        let inner = block.inner(filter_area);
        block.render(filter_area, buf);
        let [search_area, controls_area] = Layout::horizontal([Length(32), Min(0)]).areas(inner);
        style_input(&mut self.search, self.searching, &self.palette);
        (&self.search).render(search_area, buf);
        self.filter_line().render(controls_area, buf);

        self.table.focus(if self.searching {
            TableFocus::Unfocused
        } else {
            TableFocus::Focused
        });
        if self.show_info {
            let [list, info] = Layout::horizontal([Percentage(55), Percentage(45)]).areas(body);
            self.table.render(list, buf);
            self.detail.render(info, buf);
        } else {
            self.table.render(body, buf);
        }
    }
}

impl Commands for PackagesWidget {
    fn command_descriptions(&self) -> Vec<(&str, &str, &str)> {
        vec![
            ("a", "Add package", "Add"),
            ("e", "Edit package", "Edit"),
            ("d", "Delete package", "Delete"),
            ("p", "Cycle platform filter", "Platform"),
            ("s", "Cycle status filter", "Status"),
            ("o", "Cycle sort order", "Sort"),
            ("L/I/D", "Toggle Live / In Progress / Deprecated", ""),
            ("n", "Add script", ""),
            ("[/]", "Previous / next script", ""),
            ("x", "Remove highlighted script", ""),
            ("P", "Record packaging by current user", ""),
            ("J/K", "Scroll info panel", ""),
            ("i", "Toggle info panel", ""),
            ("Esc", "Clear filters", ""),
        ]
    }

    fn handle_key_event(&mut self, key: &KeyEvent) -> Option<EventResult> {
        if self.searching {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => self.searching = false,
                _ => {
                    self.search.input(*key);
                    self.query.search = text_of(&self.search);
                    self.filter_data();
                }
            }
            return Some(EventResult::None);
        }

        if self.table.handle_key_event(key) {
            self.update_detail();
            return Some(EventResult::None);
        }

        let current = self.current_package().cloned();
        match key.code {
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('p') => {
                self.query.cycle_platform();
                self.filter_data();
            }
            KeyCode::Char('s') => {
                self.query.cycle_status();
                self.filter_data();
            }
            KeyCode::Char('o') => {
                self.query.sort_by.cycle_next();
                self.filter_data();
            }
            KeyCode::Char('L') => self.toggle_status(Status::Live),
            KeyCode::Char('I') => self.toggle_status(Status::InProgress),
            KeyCode::Char('D') => self.toggle_status(Status::Deprecated),
            KeyCode::Esc => self.clear_filters(),
            KeyCode::Char('i') => self.show_info = !self.show_info,
            KeyCode::Char(']') => self.detail.next_script(),
            KeyCode::Char('[') => self.detail.prev_script(),
            KeyCode::Char('J') => self.detail.scroll = self.detail.scroll.saturating_add(3),
            KeyCode::Char('K') => self.detail.scroll = self.detail.scroll.saturating_sub(3),
            KeyCode::Char('a') => return Some(EventResult::Open(Popup::AddPackage)),
            KeyCode::Char('e') => {
                return current.map(|p| EventResult::Open(Popup::EditPackage(p)));
            }
            KeyCode::Char('d') => {
                return current.map(|p| {
                    EventResult::Open(Popup::ConfirmDelete {
                        id: p.id,
                        name: p.name,
                    })
                });
            }
            KeyCode::Char('n') => {
                return current.map(|p| EventResult::Open(Popup::AddScript(p.id)));
            }
            KeyCode::Char('P') => {
                return current.map(|p| EventResult::Command(EventCommand::RecordPackaging(p.id)));
            }
            KeyCode::Char('x') => {
                let pack = current.filter(|p| !p.scripts.is_empty())?;
                return Some(EventResult::Command(EventCommand::RemoveScript {
                    id: pack.id,
                    index: self.detail.script_cursor,
                }));
            }
            _ => return None,
        }
        Some(EventResult::None)
    }
}

impl CurrentPackage for PackagesWidget {
    fn current_package(&self) -> Option<&Package> {
        self.table
            .get_current()
            .and_then(|a| self.data.iter().find(|b| b.id == a.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Seed;
    use crossterm::event::KeyModifiers;

    fn key(c: KeyCode) -> KeyEvent {
        KeyEvent::new(c, KeyModifiers::NONE)
    }

    fn widget() -> PackagesWidget {
        let mut w = PackagesWidget::default();
        w.set_data(&Seed::builtin().unwrap().packages, Timestamp::now());
        w
    }

    fn visible(w: &PackagesWidget) -> Vec<String> {
        w.table.rows().iter().map(|r| r.cells[0].clone()).collect()
    }

    #[test]
    fn test_newest_first() {
        let w = widget();
        let rows = w.table.rows();
        assert_eq!(rows.len(), 6);
        for pair in rows.windows(2) {
            assert!(pair[0].cells[4] >= pair[1].cells[4]);
        }
    }

    #[test]
    fn test_search_typing() {
        let mut w = widget();
        w.handle_key_event(&key(KeyCode::Char('/')));
        for c in "zoom".chars() {
            w.handle_key_event(&key(KeyCode::Char(c)));
        }
        assert_eq!(w.query().search, "zoom");
        assert_eq!(visible(&w), vec!["Zoom Client"]);

        //leaving search keeps the filter, Esc afterwards clears it
        w.handle_key_event(&key(KeyCode::Enter));
        assert_eq!(visible(&w).len(), 1);
        w.handle_key_event(&key(KeyCode::Esc));
        assert_eq!(visible(&w).len(), 6);
        assert_eq!(w.query().search, "");
    }

    #[test]
    fn test_status_toggle_and_sort() {
        let mut w = widget();
        w.handle_key_event(&key(KeyCode::Char('D')));
        assert_eq!(visible(&w), vec!["AutoCAD 2024"]);
        w.handle_key_event(&key(KeyCode::Char('D')));
        assert_eq!(visible(&w).len(), 6);

        w.handle_key_event(&key(KeyCode::Char('o')));
        assert_eq!(w.query().sort_by, SortBy::Name);
        assert_eq!(visible(&w)[0], "Adobe Acrobat Pro DC");
    }

    #[test]
    fn test_popups() {
        let mut w = widget();
        let first = w.current_package().unwrap().clone();
        assert_eq!(
            w.handle_key_event(&key(KeyCode::Char('d'))),
            Some(EventResult::Open(Popup::ConfirmDelete {
                id: first.id.clone(),
                name: first.name.clone()
            }))
        );
        assert_eq!(
            w.handle_key_event(&key(KeyCode::Char('e'))),
            Some(EventResult::Open(Popup::EditPackage(first)))
        );
        assert_eq!(w.handle_key_event(&key(KeyCode::Char('q'))), None);
    }

    #[test]
    fn test_remove_script_needs_scripts() {
        let mut w = widget();
        w.select("3");
        assert_eq!(w.handle_key_event(&key(KeyCode::Char('x'))), None);
        w.select("2");
        assert_eq!(
            w.handle_key_event(&key(KeyCode::Char('x'))),
            Some(EventResult::Command(EventCommand::RemoveScript {
                id: "2".to_string(),
                index: 0
            }))
        );
    }
}
