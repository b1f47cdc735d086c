use jiff::civil::Date;

use crate::{
    error::ValidationError,
    structs::package::{
        DeploymentType, FileTypes, FolderPaths, Licensing, MAX_SCRIPT_BYTES, Package, Platform,
        SccmDeployment, Script, Sponsor, Status,
    },
    utils::today,
};

/// Everything the add form collects. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDraft {
    pub name: String,
    pub version: String,
    pub platform: Vec<Platform>,
    pub icon: Option<String>,
    pub status: Status,
    pub summary: String,
    pub last_updated: Date,
    pub last_packaged_by: String,
    pub sponsor: Sponsor,
    pub deployment_type: DeploymentType,
    pub is_patch_my_pc: bool,
    pub is_dynamic_install: bool,
    pub packaging_methodology: String,
    pub file_types: FileTypes,
    pub tools_used: Vec<String>,
    pub sccm_deployment: Option<SccmDeployment>,
    pub folder_paths: Option<FolderPaths>,
    pub scripts: Vec<Script>,
    pub licensing: Licensing,
    pub comments: String,
}

impl Default for PackageDraft {
    fn default() -> Self {
        Self::new(today())
    }
}

impl PackageDraft {
    pub fn new(last_updated: Date) -> Self {
        Self {
            name: String::new(),
            version: String::new(),
            platform: vec![Platform::Windows],
            icon: None,
            status: Status::InProgress,
            summary: String::new(),
            last_updated,
            last_packaged_by: String::new(),
            sponsor: Sponsor::default(),
            deployment_type: DeploymentType::Sccm,
            is_patch_my_pc: false,
            is_dynamic_install: false,
            packaging_methodology: String::new(),
            file_types: FileTypes::default(),
            tools_used: vec![],
            sccm_deployment: Some(SccmDeployment::default()),
            folder_paths: Some(FolderPaths::default()),
            scripts: vec![],
            licensing: Licensing::default(),
            comments: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_identity(&self.name, &self.version, &self.summary, &self.platform)
    }

    /// Switching to Intune clears the SCCM only flags
    pub fn set_deployment_type(&mut self, deployment_type: DeploymentType) {
        self.deployment_type = deployment_type;
        if deployment_type == DeploymentType::Intune {
            self.is_patch_my_pc = false;
            self.is_dynamic_install = false;
        }
    }

    pub fn toggle_platform(&mut self, platform: Platform) {
        if self.platform.contains(&platform) {
            self.platform.retain(|p| *p != platform);
        } else {
            self.platform.push(platform);
        }
    }

    pub fn into_package(self, id: String, created_at: Date) -> Package {
        let mut pack = Package {
            id,
            name: self.name,
            version: self.version,
            platform: self.platform,
            icon: self.icon,
            status: self.status,
            summary: self.summary,
            last_updated: self.last_updated,
            last_packaged_by: self.last_packaged_by,
            packaged_by_history: vec![],
            sponsor: self.sponsor,
            deployment_type: self.deployment_type,
            is_patch_my_pc: self.is_patch_my_pc,
            is_dynamic_install: self.is_dynamic_install,
            packaging_methodology: self.packaging_methodology,
            file_types: self.file_types,
            tools_used: self.tools_used,
            sccm_deployment: self.sccm_deployment,
            folder_paths: self.folder_paths,
            scripts: self.scripts,
            licensing: self.licensing,
            comments: self.comments,
            created_at,
            audit_history: vec![],
        };
        clear_sccm_flags(&mut pack);
        pack
    }
}

impl From<&Package> for PackageDraft {
    fn from(pack: &Package) -> Self {
        Self {
            name: pack.name.clone(),
            version: pack.version.clone(),
            platform: pack.platform.clone(),
            icon: pack.icon.clone(),
            status: pack.status,
            summary: pack.summary.clone(),
            last_updated: pack.last_updated,
            last_packaged_by: pack.last_packaged_by.clone(),
            sponsor: pack.sponsor.clone(),
            deployment_type: pack.deployment_type,
            is_patch_my_pc: pack.is_patch_my_pc,
            is_dynamic_install: pack.is_dynamic_install,
            packaging_methodology: pack.packaging_methodology.clone(),
            file_types: pack.file_types.clone(),
            tools_used: pack.tools_used.clone(),
            sccm_deployment: pack.sccm_deployment.clone(),
            folder_paths: pack.folder_paths.clone(),
            scripts: pack.scripts.clone(),
            licensing: pack.licensing.clone(),
            comments: pack.comments.clone(),
        }
    }
}

/// Typed partial update. Only `Some` fields are written.
///
/// Scripts and the history logs are not part of the patch, they change through
/// their own store operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackagePatch {
    pub name: Option<String>,
    pub version: Option<String>,
    pub platform: Option<Vec<Platform>>,
    pub icon: Option<String>,
    pub status: Option<Status>,
    pub summary: Option<String>,
    pub last_updated: Option<Date>,
    pub last_packaged_by: Option<String>,
    pub sponsor: Option<Sponsor>,
    pub deployment_type: Option<DeploymentType>,
    pub is_patch_my_pc: Option<bool>,
    pub is_dynamic_install: Option<bool>,
    pub packaging_methodology: Option<String>,
    pub file_types: Option<FileTypes>,
    pub tools_used: Option<Vec<String>>,
    pub sccm_deployment: Option<SccmDeployment>,
    pub folder_paths: Option<FolderPaths>,
    pub licensing: Option<Licensing>,
    pub comments: Option<String>,
}

macro_rules! merge_fields {
    ($patch:expr, $pack:expr, $changed:expr, [$($field:ident),* $(,)?]) => {
        $(
            if let Some(value) = &$patch.$field {
                if &$pack.$field != value {
                    $pack.$field = value.clone();
                    $changed.push(stringify!($field));
                }
            }
        )*
    };
}

macro_rules! merge_optional_fields {
    ($patch:expr, $pack:expr, $changed:expr, [$($field:ident),* $(,)?]) => {
        $(
            if let Some(value) = &$patch.$field {
                if $pack.$field.as_ref() != Some(value) {
                    $pack.$field = Some(value.clone());
                    $changed.push(stringify!($field));
                }
            }
        )*
    };
}

impl PackagePatch {
    pub fn is_empty(&self) -> bool {
        *self == PackagePatch::default()
    }

    /// Merge into `pack`, returning the names of the fields that actually changed
    pub fn apply(&self, pack: &mut Package) -> Vec<&'static str> {
        let mut changed = vec![];
        merge_fields!(
            self,
            pack,
            changed,
            [
                name,
                version,
                platform,
                status,
                summary,
                last_updated,
                last_packaged_by,
                sponsor,
                deployment_type,
                is_patch_my_pc,
                is_dynamic_install,
                packaging_methodology,
                file_types,
                tools_used,
                licensing,
                comments,
            ]
        );
        merge_optional_fields!(self, pack, changed, [icon, sccm_deployment, folder_paths]);
        clear_sccm_flags(pack);
        changed
    }

    /// Patch holding only the fields where `edited` differs from `original`
    pub fn diff(original: &Package, edited: &PackageDraft) -> Self {
        fn changed<T: PartialEq + Clone>(a: &T, b: &T) -> Option<T> {
            if a == b { None } else { Some(b.clone()) }
        }
        fn changed_opt<T: PartialEq + Clone>(a: &Option<T>, b: &Option<T>) -> Option<T> {
            match b {
                Some(b) if a.as_ref() != Some(b) => Some(b.clone()),
                _ => None,
            }
        }

        Self {
            name: changed(&original.name, &edited.name),
            version: changed(&original.version, &edited.version),
            platform: changed(&original.platform, &edited.platform),
            icon: changed_opt(&original.icon, &edited.icon),
            status: changed(&original.status, &edited.status),
            summary: changed(&original.summary, &edited.summary),
            last_updated: changed(&original.last_updated, &edited.last_updated),
            last_packaged_by: changed(&original.last_packaged_by, &edited.last_packaged_by),
            sponsor: changed(&original.sponsor, &edited.sponsor),
            deployment_type: changed(&original.deployment_type, &edited.deployment_type),
            is_patch_my_pc: changed(&original.is_patch_my_pc, &edited.is_patch_my_pc),
            is_dynamic_install: changed(&original.is_dynamic_install, &edited.is_dynamic_install),
            packaging_methodology: changed(
                &original.packaging_methodology,
                &edited.packaging_methodology,
            ),
            file_types: changed(&original.file_types, &edited.file_types),
            tools_used: changed(&original.tools_used, &edited.tools_used),
            sccm_deployment: changed_opt(&original.sccm_deployment, &edited.sccm_deployment),
            folder_paths: changed_opt(&original.folder_paths, &edited.folder_paths),
            licensing: changed(&original.licensing, &edited.licensing),
            comments: changed(&original.comments, &edited.comments),
        }
    }
}

impl Package {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_identity(&self.name, &self.version, &self.summary, &self.platform)
    }
}

impl Script {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.content.len() > MAX_SCRIPT_BYTES {
            return Err(ValidationError::ScriptTooLarge);
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingScriptName);
        }
        if self.content.trim().is_empty() {
            return Err(ValidationError::EmptyScript);
        }
        Ok(())
    }
}

fn validate_identity(
    name: &str,
    version: &str,
    summary: &str,
    platform: &[Platform],
) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if version.trim().is_empty() {
        return Err(ValidationError::MissingVersion);
    }
    if summary.trim().is_empty() {
        return Err(ValidationError::MissingSummary);
    }
    if platform.is_empty() {
        return Err(ValidationError::NoPlatform);
    }
    Ok(())
}

fn clear_sccm_flags(pack: &mut Package) {
    if pack.deployment_type == DeploymentType::Intune {
        pack.is_patch_my_pc = false;
        pack.is_dynamic_install = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn draft() -> PackageDraft {
        PackageDraft {
            name: "7-Zip".to_string(),
            version: "23.01".to_string(),
            summary: "File archiver".to_string(),
            is_patch_my_pc: true,
            is_dynamic_install: true,
            ..PackageDraft::new(date(2024, 1, 1))
        }
    }

    #[test]
    fn test_draft_validation() {
        assert_eq!(draft().validate(), Ok(()));

        let mut d = draft();
        d.name = "  ".to_string();
        assert_eq!(d.validate(), Err(ValidationError::MissingName));

        let mut d = draft();
        d.version.clear();
        assert_eq!(d.validate(), Err(ValidationError::MissingVersion));

        let mut d = draft();
        d.summary.clear();
        assert_eq!(d.validate(), Err(ValidationError::MissingSummary));

        let mut d = draft();
        d.toggle_platform(Platform::Windows);
        assert_eq!(d.validate(), Err(ValidationError::NoPlatform));
    }

    #[test]
    fn test_intune_clears_flags() {
        let mut d = draft();
        d.set_deployment_type(DeploymentType::Intune);
        assert!(!d.is_patch_my_pc);
        assert!(!d.is_dynamic_install);

        let pack = draft().into_package("1".to_string(), date(2024, 1, 1));
        assert!(pack.is_patch_my_pc);

        let mut pack = pack;
        let patch = PackagePatch {
            deployment_type: Some(DeploymentType::Intune),
            ..Default::default()
        };
        let changed = patch.apply(&mut pack);
        assert_eq!(changed, vec!["deployment_type"]);
        assert!(!pack.is_patch_my_pc);
        assert!(!pack.is_dynamic_install);
    }

    #[test]
    fn test_patch_only_touches_set_fields() {
        let mut pack = draft().into_package("1".to_string(), date(2024, 1, 1));
        let before = pack.clone();
        let patch = PackagePatch {
            summary: Some("Archiver".to_string()),
            version: Some("23.01".to_string()),
            ..Default::default()
        };
        let changed = patch.apply(&mut pack);
        assert_eq!(changed, vec!["summary"]);
        assert_eq!(pack.summary, "Archiver");
        assert_eq!(pack.name, before.name);
        assert_eq!(pack.last_updated, before.last_updated);
        assert_eq!(pack.created_at, before.created_at);
    }

    #[test]
    fn test_diff() {
        let pack = draft().into_package("1".to_string(), date(2024, 1, 1));
        let mut edited = PackageDraft::from(&pack);
        assert!(PackagePatch::diff(&pack, &edited).is_empty());

        edited.comments = "Tested on Win11".to_string();
        edited.toggle_platform(Platform::Linux);
        let patch = PackagePatch::diff(&pack, &edited);
        assert_eq!(patch.comments.as_deref(), Some("Tested on Win11"));
        assert_eq!(
            patch.platform,
            Some(vec![Platform::Windows, Platform::Linux])
        );
        assert_eq!(patch.name, None);
    }

    #[test]
    fn test_script_validation() {
        let script = Script {
            name: "Install.ps1".to_string(),
            kind: Default::default(),
            content: "Start-Process msiexec".to_string(),
        };
        assert_eq!(script.validate(), Ok(()));

        let too_big = Script {
            content: "x".repeat(MAX_SCRIPT_BYTES + 1),
            ..script.clone()
        };
        assert_eq!(too_big.validate(), Err(ValidationError::ScriptTooLarge));

        let exact = Script {
            content: "x".repeat(MAX_SCRIPT_BYTES),
            ..script.clone()
        };
        assert_eq!(exact.validate(), Ok(()));

        let unnamed = Script {
            name: String::new(),
            ..script.clone()
        };
        assert_eq!(unnamed.validate(), Err(ValidationError::MissingScriptName));

        let empty = Script {
            content: " \n".to_string(),
            ..script
        };
        assert_eq!(empty.validate(), Err(ValidationError::EmptyScript));
    }
}
