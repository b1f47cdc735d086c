use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Clear, Widget},
};
use tui_textarea::TextArea;

use crate::{
    error::ValidationError,
    structs::{
        draft::{PackageDraft, PackagePatch},
        event::{EventCommand, EventResult},
        package::{DeploymentType, FileType, FolderPaths, Package, Platform, SccmDeployment, Status},
    },
    theme::Palette,
    utils::parse_date,
    widgets::{
        Commands,
        input::{input_single, style_input, text_input, text_of},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Version,
    Summary,
    Status,
    Windows,
    Mac,
    Linux,
    LastUpdated,
    LastPackagedBy,
    SponsorName,
    SponsorDepartment,
    DeploymentType,
    PatchMyPc,
    DynamicInstall,
    Methodology,
    FileType,
    HasScript,
    ToolsUsed,
    InstallCommand,
    UninstallCommand,
    RepairCommand,
    InstallStartIn,
    UninstallStartIn,
    RepairStartIn,
    ProductCode,
    SourcePath,
    DeploymentPath,
    LogsPath,
    LicenceType,
    LicenceExpiry,
    LicenceFiles,
    LicenceNotes,
    Comments,
}

impl Field {
    const ALL: [Field; 33] = [
        Field::Name,
        Field::Version,
        Field::Summary,
        Field::Status,
        Field::Windows,
        Field::Mac,
        Field::Linux,
        Field::LastUpdated,
        Field::LastPackagedBy,
        Field::SponsorName,
        Field::SponsorDepartment,
        Field::DeploymentType,
        Field::PatchMyPc,
        Field::DynamicInstall,
        Field::Methodology,
        Field::FileType,
        Field::HasScript,
        Field::ToolsUsed,
        Field::InstallCommand,
        Field::UninstallCommand,
        Field::RepairCommand,
        Field::InstallStartIn,
        Field::UninstallStartIn,
        Field::RepairStartIn,
        Field::ProductCode,
        Field::SourcePath,
        Field::DeploymentPath,
        Field::LogsPath,
        Field::LicenceType,
        Field::LicenceExpiry,
        Field::LicenceFiles,
        Field::LicenceNotes,
        Field::Comments,
    ];

    fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name *",
            Field::Version => "Version *",
            Field::Summary => "Summary *",
            Field::Status => "Status",
            Field::Windows => "Windows",
            Field::Mac => "Mac",
            Field::Linux => "Linux",
            Field::LastUpdated => "Last updated",
            Field::LastPackagedBy => "Last packaged by",
            Field::SponsorName => "Sponsor",
            Field::SponsorDepartment => "Department",
            Field::DeploymentType => "Deployment",
            Field::PatchMyPc => "Patch My PC",
            Field::DynamicInstall => "Dynamic install",
            Field::Methodology => "Methodology",
            Field::FileType => "File type",
            Field::HasScript => "Has script",
            Field::ToolsUsed => "Tools (comma sep.)",
            Field::InstallCommand => "Install command",
            Field::UninstallCommand => "Uninstall command",
            Field::RepairCommand => "Repair command",
            Field::InstallStartIn => "Install start in",
            Field::UninstallStartIn => "Uninstall start in",
            Field::RepairStartIn => "Repair start in",
            Field::ProductCode => "Product code",
            Field::SourcePath => "Source path",
            Field::DeploymentPath => "Deployment path",
            Field::LogsPath => "Logs path",
            Field::LicenceType => "Licence type",
            Field::LicenceExpiry => "Licence expiry",
            Field::LicenceFiles => "Licence files",
            Field::LicenceNotes => "Licence notes",
            Field::Comments => "Comments",
        }
    }

    fn is_choice(&self) -> bool {
        matches!(
            self,
            Field::Status
                | Field::Windows
                | Field::Mac
                | Field::Linux
                | Field::DeploymentType
                | Field::PatchMyPc
                | Field::DynamicInstall
                | Field::FileType
                | Field::HasScript
        )
    }

    fn sccm_only(&self) -> bool {
        matches!(
            self,
            Field::PatchMyPc
                | Field::DynamicInstall
                | Field::InstallCommand
                | Field::UninstallCommand
                | Field::RepairCommand
                | Field::InstallStartIn
                | Field::UninstallStartIn
                | Field::RepairStartIn
                | Field::ProductCode
                | Field::SourcePath
                | Field::DeploymentPath
                | Field::LogsPath
        )
    }

    fn initial(&self, draft: &PackageDraft) -> String {
        let sccm = draft.sccm_deployment.clone().unwrap_or_default();
        let paths = draft.folder_paths.clone().unwrap_or_default();
        match self {
            Field::Name => draft.name.clone(),
            Field::Version => draft.version.clone(),
            Field::Summary => draft.summary.clone(),
            Field::LastUpdated => draft.last_updated.to_string(),
            Field::LastPackagedBy => draft.last_packaged_by.clone(),
            Field::SponsorName => draft.sponsor.name.clone(),
            Field::SponsorDepartment => draft.sponsor.department.clone(),
            Field::Methodology => draft.packaging_methodology.clone(),
            Field::ToolsUsed => draft.tools_used.join(", "),
            Field::InstallCommand => sccm.install_command,
            Field::UninstallCommand => sccm.uninstall_command,
            Field::RepairCommand => sccm.repair_command.unwrap_or_default(),
            Field::InstallStartIn => sccm.install_start_in.unwrap_or_default(),
            Field::UninstallStartIn => sccm.uninstall_start_in.unwrap_or_default(),
            Field::RepairStartIn => sccm.repair_start_in.unwrap_or_default(),
            Field::ProductCode => sccm.product_code.unwrap_or_default(),
            Field::SourcePath => paths.source,
            Field::DeploymentPath => paths.deployment,
            Field::LogsPath => paths.logs,
            Field::LicenceType => draft.licensing.kind.clone(),
            Field::LicenceExpiry => draft
                .licensing
                .expiry_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            Field::LicenceFiles => draft.licensing.file_links.join(", "),
            Field::LicenceNotes => draft.licensing.notes.clone(),
            Field::Comments => draft.comments.clone(),
            _ => String::new(),
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            Field::LastUpdated | Field::LicenceExpiry => "YYYY-MM-DD",
            Field::ToolsUsed | Field::LicenceFiles => "comma separated",
            _ => "",
        }
    }
}

#[derive(Debug, Clone)]
enum FormMode {
    Add,
    Edit(Box<Package>),
}

/// Add and edit overlay for a package
#[derive(Debug, Clone)]
pub struct PackageForm {
    mode: FormMode,
    //choice fields live here, text fields in `inputs`
    draft: PackageDraft,
    inputs: Vec<(Field, TextArea<'static>)>,
    cursor: usize,
    error: Option<String>,
    palette: Palette,
}

impl PackageForm {
    pub fn add(palette: Palette) -> Self {
        Self::with_draft(FormMode::Add, PackageDraft::default(), palette)
    }

    pub fn edit(pack: Package, palette: Palette) -> Self {
        let draft = PackageDraft::from(&pack);
        Self::with_draft(FormMode::Edit(Box::new(pack)), draft, palette)
    }

    fn with_draft(mode: FormMode, draft: PackageDraft, palette: Palette) -> Self {
        let inputs = Field::ALL
            .iter()
            .filter(|f| !f.is_choice())
            .map(|f| (*f, text_input(&f.initial(&draft), f.placeholder())))
            .collect();
        Self {
            mode,
            draft,
            inputs,
            cursor: 0,
            error: None,
            palette,
        }
    }

    pub fn set_error(&mut self, error: impl ToString) {
        self.error = Some(error.to_string());
    }

    pub fn title(&self) -> String {
        match &self.mode {
            FormMode::Add => "Add Package".to_string(),
            FormMode::Edit(p) => format!("Edit {}", p.name),
        }
    }

    fn visible(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| !(f.sccm_only() && self.draft.deployment_type == DeploymentType::Intune))
            .collect()
    }

    fn current(&self) -> Field {
        let visible = self.visible();
        visible[self.cursor.min(visible.len() - 1)]
    }

    fn input_mut(&mut self, field: Field) -> Option<&mut TextArea<'static>> {
        self.inputs
            .iter_mut()
            .find(|(f, _)| *f == field)
            .map(|(_, t)| t)
    }

    fn text(&self, field: Field) -> String {
        self.inputs
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, t)| text_of(t).trim().to_string())
            .unwrap_or_default()
    }

    fn optional(&self, field: Field) -> Option<String> {
        Some(self.text(field)).filter(|s| !s.is_empty())
    }

    fn list(&self, field: Field) -> Vec<String> {
        self.text(field)
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn change_choice(&mut self, forward: bool) {
        let field = self.current();
        let draft = &mut self.draft;
        match field {
            Field::Status => {
                let i = Status::ALL.iter().position(|s| *s == draft.status).unwrap_or(0);
                let next = if forward { i + 1 } else { i + Status::ALL.len() - 1 };
                draft.status = Status::ALL[next % Status::ALL.len()];
            }
            Field::Windows => draft.toggle_platform(Platform::Windows),
            Field::Mac => draft.toggle_platform(Platform::Mac),
            Field::Linux => draft.toggle_platform(Platform::Linux),
            Field::DeploymentType => {
                let next = match draft.deployment_type {
                    DeploymentType::Sccm => DeploymentType::Intune,
                    DeploymentType::Intune => DeploymentType::Sccm,
                };
                draft.set_deployment_type(next);
            }
            Field::PatchMyPc => draft.is_patch_my_pc = !draft.is_patch_my_pc,
            Field::DynamicInstall => draft.is_dynamic_install = !draft.is_dynamic_install,
            Field::FileType => {
                let all = FileType::ALL;
                let i = all
                    .iter()
                    .position(|t| *t == draft.file_types.primary)
                    .unwrap_or(0);
                let next = if forward { i + 1 } else { i + all.len() - 1 };
                draft.file_types.primary = all[next % all.len()];
            }
            Field::HasScript => draft.file_types.has_script = !draft.file_types.has_script,
            _ => {}
        }
    }

    fn move_cursor(&mut self, forward: bool) {
        let len = self.visible().len();
        let current = self.current();
        let index = self.visible().iter().position(|f| *f == current).unwrap_or(0);
        self.cursor = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
    }

    /// Draft built from the current field values, validated
    fn collect(&self) -> Result<PackageDraft, ValidationError> {
        let mut draft = self.draft.clone();
        draft.name = self.text(Field::Name);
        draft.version = self.text(Field::Version);
        draft.summary = self.text(Field::Summary);
        draft.last_updated = parse_date(&self.text(Field::LastUpdated))?;
        draft.last_packaged_by = self.text(Field::LastPackagedBy);
        draft.sponsor.name = self.text(Field::SponsorName);
        draft.sponsor.department = self.text(Field::SponsorDepartment);
        draft.packaging_methodology = self.text(Field::Methodology);
        draft.tools_used = self.list(Field::ToolsUsed);

        let sccm = SccmDeployment {
            install_command: self.text(Field::InstallCommand),
            uninstall_command: self.text(Field::UninstallCommand),
            repair_command: self.optional(Field::RepairCommand),
            install_start_in: self.optional(Field::InstallStartIn),
            uninstall_start_in: self.optional(Field::UninstallStartIn),
            repair_start_in: self.optional(Field::RepairStartIn),
            product_code: self.optional(Field::ProductCode),
        };
        let paths = FolderPaths {
            source: self.text(Field::SourcePath),
            deployment: self.text(Field::DeploymentPath),
            logs: self.text(Field::LogsPath),
        };
        //hidden blocks are kept when they already hold data
        let intune = draft.deployment_type == DeploymentType::Intune;
        draft.sccm_deployment =
            (!intune || sccm != SccmDeployment::default()).then_some(sccm);
        draft.folder_paths = (!intune || paths != FolderPaths::default()).then_some(paths);

        draft.licensing.kind = self.text(Field::LicenceType);
        draft.licensing.expiry_date = match self.optional(Field::LicenceExpiry) {
            Some(value) => Some(parse_date(&value)?),
            None => None,
        };
        draft.licensing.file_links = self.list(Field::LicenceFiles);
        draft.licensing.notes = self.text(Field::LicenceNotes);
        draft.comments = self.text(Field::Comments);

        draft.validate()?;
        Ok(draft)
    }

    fn submit(&mut self) -> Option<EventResult> {
        match self.collect() {
            Ok(draft) => {
                self.error = None;
                let command = match &self.mode {
                    FormMode::Add => EventCommand::CreatePackage(draft),
                    FormMode::Edit(original) => EventCommand::UpdatePackage {
                        id: original.id.clone(),
                        patch: PackagePatch::diff(original, &draft),
                    },
                };
                Some(EventResult::Command(command))
            }
            Err(e) => {
                self.set_error(e);
                Some(EventResult::None)
            }
        }
    }

    fn choice_value(&self, field: Field) -> String {
        let check = |b: bool| if b { "[x]" } else { "[ ]" }.to_string();
        let d = &self.draft;
        match field {
            Field::Status => format!("< {} >", d.status.label()),
            Field::Windows => check(d.platform.contains(&Platform::Windows)),
            Field::Mac => check(d.platform.contains(&Platform::Mac)),
            Field::Linux => check(d.platform.contains(&Platform::Linux)),
            Field::DeploymentType => format!("< {} >", d.deployment_type),
            Field::PatchMyPc => check(d.is_patch_my_pc),
            Field::DynamicInstall => check(d.is_dynamic_install),
            Field::FileType => format!("< {} >", d.file_types.primary),
            Field::HasScript => check(d.file_types.has_script),
            _ => String::new(),
        }
    }
}

impl Widget for PackageForm {
    fn render(mut self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::bordered()
            .title(self.title())
            .title_bottom(Line::from(" Tab:Next  Space:Change  Ctrl+S:Save  Esc:Cancel "))
            .style(self.palette.popup);
        let inner = block.inner(area);
        block.render(area, buf);

        let [rows_area, error_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);
        if let Some(error) = &self.error {
            Line::styled(error.clone(), self.palette.error).render(error_area, buf);
        }

        let visible = self.visible();
        let current = self.current();
        let height = rows_area.height as usize;
        let index = visible.iter().position(|f| *f == current).unwrap_or(0);
        let skip = (index + 1).saturating_sub(height);

        let palette = self.palette;
        for (row, field) in visible.iter().skip(skip).take(height).enumerate() {
            let rect = Rect::new(rows_area.x, rows_area.y + row as u16, rows_area.width, 1);
            let [label_area, value_area] =
                Layout::horizontal([Constraint::Length(20), Constraint::Min(0)]).areas(rect);
            let focused = *field == current;
            let label_style = if focused { palette.title } else { palette.secondary };
            Span::styled(field.label(), label_style).render(label_area, buf);

            if field.is_choice() {
                let style = if focused { palette.input } else { Style::default() };
                Span::styled(self.choice_value(*field), style).render(value_area, buf);
            } else if let Some(input) = self.input_mut(*field) {
                style_input(input, focused, &palette);
                (&*input).render(value_area, buf);
            }
        }
    }
}

impl Commands for PackageForm {
    fn command_descriptions(&self) -> Vec<(&str, &str, &str)> {
        vec![
            ("Tab/Down", "Next field", ""),
            ("Shift+Tab/Up", "Previous field", ""),
            ("Space/Left/Right", "Change choice", ""),
            ("Ctrl+S", "Save", ""),
            ("Esc", "Cancel", ""),
        ]
    }

    fn handle_key_event(&mut self, key: &KeyEvent) -> Option<EventResult> {
        match key.code {
            KeyCode::Esc => return Some(EventResult::Close),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return self.submit();
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => self.move_cursor(true),
            KeyCode::BackTab | KeyCode::Up => self.move_cursor(false),
            _ => {
                let field = self.current();
                if field.is_choice() {
                    match key.code {
                        KeyCode::Char(' ') | KeyCode::Right => self.change_choice(true),
                        KeyCode::Left => self.change_choice(false),
                        _ => {}
                    }
                } else if let Some(input) = self.input_mut(field) {
                    input_single(input, key);
                }
            }
        }
        Some(EventResult::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Seed;

    fn key(c: KeyCode) -> KeyEvent {
        KeyEvent::new(c, KeyModifiers::NONE)
    }

    fn save() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)
    }

    fn type_text(form: &mut PackageForm, text: &str) {
        for c in text.chars() {
            form.handle_key_event(&key(KeyCode::Char(c)));
        }
    }

    fn goto(form: &mut PackageForm, field: Field) {
        while form.current() != field {
            form.handle_key_event(&key(KeyCode::Tab));
        }
    }

    #[test]
    fn test_add_requires_identity() {
        let mut form = PackageForm::add(Palette::default());
        assert_eq!(form.handle_key_event(&save()), Some(EventResult::None));
        assert_eq!(form.error.as_deref(), Some("Package name is required"));

        type_text(&mut form, "Notepad++");
        goto(&mut form, Field::Version);
        type_text(&mut form, "8.6");
        goto(&mut form, Field::Summary);
        type_text(&mut form, "Editor");
        goto(&mut form, Field::ToolsUsed);
        type_text(&mut form, "PSADT, , Orca");

        let Some(EventResult::Command(EventCommand::CreatePackage(draft))) =
            form.handle_key_event(&save())
        else {
            panic!("expected a create command");
        };
        assert_eq!(draft.name, "Notepad++");
        assert_eq!(draft.platform, vec![Platform::Windows]);
        assert_eq!(draft.status, Status::InProgress);
        assert_eq!(draft.tools_used, vec!["PSADT", "Orca"]);
        assert!(draft.sccm_deployment.is_some());
        assert_eq!(draft.licensing.expiry_date, None);
    }

    #[test]
    fn test_intune_hides_sccm_fields() {
        let mut form = PackageForm::add(Palette::default());
        goto(&mut form, Field::PatchMyPc);
        form.handle_key_event(&key(KeyCode::Char(' ')));
        assert!(form.draft.is_patch_my_pc);

        goto(&mut form, Field::DeploymentType);
        form.handle_key_event(&key(KeyCode::Char(' ')));
        assert_eq!(form.draft.deployment_type, DeploymentType::Intune);
        assert!(!form.draft.is_patch_my_pc);
        assert!(!form.visible().contains(&Field::InstallCommand));
        assert!(form.visible().contains(&Field::LicenceExpiry));
    }

    #[test]
    fn test_bad_date_is_inline() {
        let seed = Seed::builtin().unwrap();
        let mut form = PackageForm::edit(seed.packages[0].clone(), Palette::default());
        goto(&mut form, Field::LicenceExpiry);
        type_text(&mut form, "x");
        assert_eq!(form.handle_key_event(&save()), Some(EventResult::None));
        assert!(form.error.as_deref().unwrap().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_edit_emits_changed_fields_only() {
        let seed = Seed::builtin().unwrap();
        let original = seed.packages[0].clone();
        let mut form = PackageForm::edit(original.clone(), Palette::default());
        assert_eq!(form.title(), "Edit Adobe Acrobat Pro DC");

        goto(&mut form, Field::Status);
        form.handle_key_event(&key(KeyCode::Right));
        goto(&mut form, Field::Comments);
        type_text(&mut form, "!");

        let Some(EventResult::Command(EventCommand::UpdatePackage { id, patch })) =
            form.handle_key_event(&save())
        else {
            panic!("expected an update command");
        };
        assert_eq!(id, original.id);
        assert_eq!(patch.status, Some(Status::Deprecated));
        assert_eq!(patch.comments, Some(format!("{}!", original.comments)));
        assert_eq!(patch.name, None);
        assert_eq!(patch.sccm_deployment, None);
        assert_eq!(form.handle_key_event(&key(KeyCode::Esc)), Some(EventResult::Close));
    }
}
