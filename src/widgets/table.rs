use crate::{theme::Palette, utils::natural_cmp};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Constraint,
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, Cell, Row, StatefulWidget, Table, TableState},
};

#[derive(Default, Debug, Clone)]
pub struct TableWidget {
    columns: Vec<String>,
    widths: Vec<Constraint>,
    rows: Vec<TableRow>,
    table_state: TableState,
    //None when row order comes from outside
    sort_by: Option<(usize, Sort)>,
    title: String,
    footer: String,
    focus_type: TableFocus,
    palette: Palette,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub enum TableFocus {
    #[default]
    Focused, //shows selection normally
    Unfocused, //shows selection dimmed
}

#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub enum Sort {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    /// Record id, never displayed
    pub key: String,
    pub cells: Vec<String>,
    pub highlight: Option<Color>,
}

impl TableRow {
    pub fn new(key: &str, cells: Vec<String>) -> Self {
        Self {
            key: key.to_string(),
            cells,
            highlight: None,
        }
    }
    pub fn with_highlight(self, highlight: Option<Color>) -> Self {
        Self { highlight, ..self }
    }
}

impl TableWidget {
    pub fn new(columns: &[&str], widths: Vec<Constraint>) -> Self {
        Self {
            columns: columns.iter().map(|s| s.to_string()).collect(),
            widths,
            ..Default::default()
        }
    }

    /// Let number keys sort by column
    pub fn sortable(self) -> Self {
        Self {
            sort_by: Some((0, Sort::Asc)),
            ..self
        }
    }

    ///return true if event was handled and should not be processed further
    pub(crate) fn handle_key_event(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.safe_move(-1),
            KeyCode::Down | KeyCode::Char('j') => self.safe_move(1),
            KeyCode::Home => self.safe_move(isize::MIN),
            KeyCode::End => self.safe_move(isize::MAX),
            KeyCode::PageUp => self.safe_move(-10),
            KeyCode::PageDown => self.safe_move(10),
            KeyCode::Char(c) if c.is_ascii_digit() && self.sort_by.is_some() => {
                let Some(index) = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) else {
                    return false;
                };
                self.set_sort(index);
                self.do_sort();
            }
            _ => return false,
        }
        true
    }

    pub fn focus(&mut self, focus: TableFocus) {
        self.focus_type = focus;
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Replace the rows, keeping the cursor on the same record when it still exists
    pub(crate) fn set_data(&mut self, rows: Vec<TableRow>) {
        let current = self.get_current().map(|r| r.key.clone());
        self.rows = rows;
        self.do_sort();

        let index = current
            .and_then(|key| self.rows.iter().position(|r| r.key == key))
            .or(if self.rows.is_empty() { None } else { Some(0) });
        self.table_state.select(index);
    }

    fn safe_move(&mut self, change: isize) {
        if self.rows.is_empty() {
            return;
        }

        let len = self.rows.len();
        let tstate = &mut self.table_state;
        if change < 0 {
            tstate.select(
                tstate
                    .selected()
                    .map(|s| s.saturating_sub(change.unsigned_abs())),
            );
        } else {
            tstate.select(
                tstate
                    .selected()
                    .map(|s| (s.saturating_add(change as usize)).min(len - 1)),
            );
        }
    }
    fn set_sort(&mut self, column_index: usize) {
        if column_index >= self.columns.len() {
            return;
        }
        let Some(sort_by) = &mut self.sort_by else {
            return;
        };

        if sort_by.0 == column_index {
            if sort_by.1 == Sort::Asc {
                sort_by.1 = Sort::Desc;
            } else {
                sort_by.1 = Sort::Asc;
            }
        } else {
            sort_by.0 = column_index;
            sort_by.1 = Sort::Asc;
        }
    }
    fn do_sort(&mut self) {
        let Some((sort_col, sort_dir)) = self.sort_by else {
            return;
        };
        //natural sort, so ip addresses order by octet
        match sort_dir {
            Sort::Asc => self
                .rows
                .sort_by(|a, b| natural_cmp(&a.cells[sort_col], &b.cells[sort_col])),
            Sort::Desc => self
                .rows
                .sort_by(|a, b| natural_cmp(&b.cells[sort_col], &a.cells[sort_col])),
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn set_footer(&mut self, footer: &str) {
        self.footer = footer.to_string();
    }

    pub(crate) fn set_current_key(&mut self, key: &str) {
        if let Some(i) = self.rows.iter().position(|r| r.key == key) {
            self.table_state.select(Some(i));
        }
    }

    pub(crate) fn rows(&self) -> &Vec<TableRow> {
        &self.rows
    }

    pub(crate) fn get_current(&self) -> Option<&TableRow> {
        self.table_state.selected().and_then(|i| self.rows.get(i))
    }
}

impl ratatui::widgets::Widget for TableWidget {
    fn render(mut self, area: ratatui::layout::Rect, buf: &mut ratatui::buffer::Buffer) {
        let current = match self.focus_type {
            TableFocus::Focused => self.palette.current,
            TableFocus::Unfocused => Style::new().fg(self.palette.accent),
        };

        let mut block = Block::bordered()
            .title(self.title.clone())
            .style(self.palette.base);
        if !self.footer.is_empty() {
            block = block.title_bottom(Line::from(self.footer.clone()).style(self.palette.secondary));
        }

        let mut table = Table::new(
            self.rows.iter().map(|item| {
                let mut row = Row::new(item.cells.iter().map(|c| c.as_str()));
                if let Some(col) = item.highlight {
                    row = row.fg(col);
                }
                row
            }),
            self.widths,
        )
        .row_highlight_style(current)
        .block(block);
        if !self.columns.is_empty() {
            table = table.header(
                self.columns
                    .iter()
                    .cloned()
                    .enumerate()
                    .map(|(i, c)| {
                        let c = match self.sort_by {
                            Some((col, Sort::Asc)) if col == i => format!("{} ↑", c),
                            Some((col, Sort::Desc)) if col == i => format!("{} ↓", c),
                            _ => c,
                        };
                        Cell::from(c)
                    })
                    .collect::<Row>()
                    .style(self.palette.header),
            )
        }
        <Table as StatefulWidget>::render(table, area, buf, &mut self.table_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(c: KeyCode) -> KeyEvent {
        KeyEvent::new(c, KeyModifiers::NONE)
    }

    fn rows() -> Vec<TableRow> {
        vec![
            TableRow::new("a", vec!["10.0.0.10".to_string()]),
            TableRow::new("b", vec!["10.0.0.9".to_string()]),
            TableRow::new("c", vec!["10.0.0.100".to_string()]),
        ]
    }

    #[test]
    fn test_sortable_orders_naturally() {
        let mut table = TableWidget::new(&["Ip"], vec![Constraint::Min(0)]).sortable();
        table.set_data(rows());
        let keys: Vec<&str> = table.rows().iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);

        assert!(table.handle_key_event(&key(KeyCode::Char('1'))));
        assert_eq!(table.rows()[0].key, "c");
    }

    #[test]
    fn test_fixed_order_and_cursor() {
        let mut table = TableWidget::new(&["Ip"], vec![Constraint::Min(0)]);
        table.set_data(rows());
        assert_eq!(table.get_current().unwrap().key, "a");
        assert!(!table.handle_key_event(&key(KeyCode::Char('1'))));

        table.handle_key_event(&key(KeyCode::Down));
        table.handle_key_event(&key(KeyCode::End));
        assert_eq!(table.get_current().unwrap().key, "c");

        //cursor follows the record across reloads
        let mut reordered = rows();
        reordered.reverse();
        table.set_data(reordered);
        assert_eq!(table.get_current().unwrap().key, "c");
        assert_eq!(table.table_state.selected(), Some(0));

        table.set_data(vec![]);
        assert!(table.get_current().is_none());
        table.handle_key_event(&key(KeyCode::Down));
    }
}
