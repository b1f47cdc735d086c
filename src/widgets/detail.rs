use jiff::Timestamp;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use crate::{
    licence::{LicenceState, format_expiry},
    structs::package::{DeploymentType, Package},
    theme::Palette,
};

/// Read only view of one package
#[derive(Debug, Clone)]
pub struct DetailWidget {
    package: Option<Package>,
    now: Timestamp,
    palette: Palette,
    pub script_cursor: usize,
    pub scroll: u16,
}

impl Default for DetailWidget {
    fn default() -> Self {
        Self {
            package: None,
            now: Timestamp::now(),
            palette: Palette::default(),
            script_cursor: 0,
            scroll: 0,
        }
    }
}

impl DetailWidget {
    pub fn set_package(&mut self, package: Option<&Package>, now: Timestamp) {
        let same = match (&self.package, package) {
            (Some(a), Some(b)) => a.id == b.id,
            _ => false,
        };
        if !same {
            self.script_cursor = 0;
            self.scroll = 0;
        }
        self.package = package.cloned();
        self.now = now;
        let scripts = self.package.as_ref().map_or(0, |p| p.scripts.len());
        self.script_cursor = self.script_cursor.min(scripts.saturating_sub(1));
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn next_script(&mut self) {
        let count = self.package.as_ref().map_or(0, |p| p.scripts.len());
        if self.script_cursor + 1 < count {
            self.script_cursor += 1;
        }
    }

    pub fn prev_script(&mut self) {
        self.script_cursor = self.script_cursor.saturating_sub(1);
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let Some(pack) = &self.package else {
            return vec![Line::styled("No package selected", self.palette.secondary)];
        };
        let p = &self.palette;
        let mut lines = vec![
            Line::styled(format!("{} {}", pack.name, pack.version), p.title),
            Line::from(vec![
                Span::styled(
                    pack.status.label(),
                    Style::new().fg(p.status(pack.status)),
                ),
                Span::styled(format!("  {}", pack.platforms_label()), p.secondary),
            ]),
            Line::raw(pack.summary.clone()),
            Line::raw(""),
        ];

        section(&mut lines, p, "Deployment");
        field(&mut lines, p, "Type", pack.deployment_type.to_string());
        if pack.deployment_type == DeploymentType::Sccm {
            field(&mut lines, p, "Patch My PC", yes_no(pack.is_patch_my_pc));
            field(&mut lines, p, "Dynamic", yes_no(pack.is_dynamic_install));
        }
        field(&mut lines, p, "Files", pack.file_types.to_string());
        field(&mut lines, p, "Method", pack.packaging_methodology.clone());
        field(&mut lines, p, "Tools", pack.tools_used.join(", "));
        field(
            &mut lines,
            p,
            "Sponsor",
            format!("{} ({})", pack.sponsor.name, pack.sponsor.department),
        );

        if pack.deployment_type == DeploymentType::Sccm {
            if let Some(sccm) = &pack.sccm_deployment {
                section(&mut lines, p, "Commands");
                field(&mut lines, p, "Install", sccm.install_command.clone());
                field(&mut lines, p, "Uninstall", sccm.uninstall_command.clone());
                for (label, value) in [
                    ("Repair", &sccm.repair_command),
                    ("Install in", &sccm.install_start_in),
                    ("Uninst. in", &sccm.uninstall_start_in),
                    ("Repair in", &sccm.repair_start_in),
                    ("Product", &sccm.product_code),
                ] {
                    if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
                        field(&mut lines, p, label, value.clone());
                    }
                }
            }
            if let Some(paths) = &pack.folder_paths {
                section(&mut lines, p, "Folders");
                field(&mut lines, p, "Source", paths.source.clone());
                field(&mut lines, p, "Deployment", paths.deployment.clone());
                field(&mut lines, p, "Logs", paths.logs.clone());
            }
        }

        section(&mut lines, p, "Licensing");
        field(&mut lines, p, "Type", pack.licensing.kind.clone());
        if let Some(expiry) = pack.licensing.expiry_date {
            let state = LicenceState::classify(Some(expiry), self.now);
            let remaining = format_expiry(expiry, self.now).unwrap_or_default();
            let mut spans = vec![
                Span::styled(format!("{:<12}", "Expires"), p.secondary),
                Span::styled(format!("{expiry} ({remaining})"), p.licence(state)),
            ];
            if let Some(badge) = state.badge() {
                spans.push(Span::styled(
                    format!(" [{badge}]"),
                    p.licence(state).add_modifier(Modifier::BOLD),
                ));
            }
            lines.push(Line::from(spans));
        }
        for link in &pack.licensing.file_links {
            field(&mut lines, p, "File", link.clone());
        }
        if !pack.licensing.notes.is_empty() {
            field(&mut lines, p, "Notes", pack.licensing.notes.clone());
        }

        section(&mut lines, p, &format!("Scripts ({})", pack.scripts.len()));
        for (i, script) in pack.scripts.iter().enumerate() {
            let marker = if i == self.script_cursor { ">" } else { " " };
            lines.push(Line::from(vec![
                Span::styled(format!("{marker} {}", script.name), p.title),
                Span::styled(
                    format!("  {} · {} bytes", script.kind, script.content.len()),
                    p.secondary,
                ),
            ]));
            if i == self.script_cursor {
                lines.extend(
                    script
                        .content
                        .lines()
                        .map(|l| Line::styled(format!("    {l}"), p.secondary)),
                );
            }
        }

        if !pack.comments.is_empty() {
            section(&mut lines, p, "Comments");
            lines.push(Line::raw(pack.comments.clone()));
        }

        section(&mut lines, p, "Packaged by");
        for entry in &pack.packaged_by_history {
            lines.push(Line::raw(format!(
                "{}  {}  {}",
                entry.date, entry.packager, entry.version
            )));
        }

        section(&mut lines, p, "Audit");
        for entry in &pack.audit_history {
            lines.push(Line::raw(format!(
                "{}  {}  {}: {}",
                entry.date, entry.user, entry.action, entry.changes
            )));
        }

        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!("Created {}  Updated {}", pack.created_at, pack.last_updated),
            p.secondary,
        ));
        lines
    }
}

fn section(lines: &mut Vec<Line<'static>>, p: &Palette, title: &str) {
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        title.to_string(),
        Style::new().fg(p.accent).add_modifier(Modifier::BOLD),
    ));
}

fn field(lines: &mut Vec<Line<'static>>, p: &Palette, label: &str, value: String) {
    lines.push(Line::from(vec![
        Span::styled(format!("{label:<12}"), p.secondary),
        Span::raw(value),
    ]));
}

fn yes_no(v: bool) -> String {
    if v { "Yes" } else { "No" }.to_string()
}

impl Widget for DetailWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.lines())
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .block(Block::bordered().title("Info").style(self.palette.base))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Seed;
    use crate::utils::midnight_utc;
    use jiff::civil::date;

    fn text(widget: &DetailWidget) -> String {
        widget
            .lines()
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_licence_line() {
        let seed = Seed::builtin().unwrap();
        let mut widget = DetailWidget::default();
        let now = midnight_utc(date(2024, 1, 1)).unwrap();
        widget.set_package(Some(&seed.packages[0]), now);
        let text = text(&widget);
        assert!(text.contains("2024-04-15 (3 months, 15 days)"));
        assert!(!text.contains("[Expires Soon]"));
        assert!(text.contains("Install     msiexec"));
    }

    #[test]
    fn test_expired_badge_and_intune() {
        let seed = Seed::builtin().unwrap();
        let teams = seed
            .packages
            .iter()
            .find(|p| p.name == "Microsoft Teams")
            .unwrap();
        let mut widget = DetailWidget::default();
        let now = midnight_utc(date(2025, 2, 1)).unwrap();
        widget.set_package(Some(teams), now);
        let text = text(&widget);
        assert!(text.contains("[Expired]"));
        assert!(!text.contains("Patch My PC"));
        assert!(!text.contains("Folders"));
    }

    #[test]
    fn test_script_cursor() {
        let seed = Seed::builtin().unwrap();
        let mut widget = DetailWidget::default();
        widget.set_package(Some(&seed.packages[1]), Timestamp::now());
        widget.next_script();
        assert_eq!(widget.script_cursor, 0);
        assert!(text(&widget).contains("> Remove-OldOffice.ps1"));
        widget.set_package(None, Timestamp::now());
        assert!(text(&widget).contains("No package selected"));
    }
}
