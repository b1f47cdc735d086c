use std::fmt::Display;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Maximum script body size in bytes
pub const MAX_SCRIPT_BYTES: usize = 10 * 1024;

/// One tracked software title and its deployment metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: String,
    pub name: String,
    pub version: String,
    pub platform: Vec<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub status: Status,
    pub summary: String,
    pub last_updated: Date,
    #[serde(default)]
    pub last_packaged_by: String,
    #[serde(default)]
    pub packaged_by_history: Vec<PackagedBy>,
    pub sponsor: Sponsor,
    pub deployment_type: DeploymentType,
    #[serde(rename = "isPatchMyPC")]
    pub is_patch_my_pc: bool,
    pub is_dynamic_install: bool,

    //details
    pub packaging_methodology: String,
    pub file_types: FileTypes,
    #[serde(default)]
    pub tools_used: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sccm_deployment: Option<SccmDeployment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_paths: Option<FolderPaths>,
    #[serde(default)]
    pub scripts: Vec<Script>,
    pub licensing: Licensing,
    #[serde(default)]
    pub comments: String,
    pub created_at: Date,
    #[serde(default)]
    pub audit_history: Vec<AuditEntry>,
}

impl Package {
    pub fn has_platform(&self, platform: Platform) -> bool {
        self.platform.contains(&platform)
    }

    pub fn platforms_label(&self) -> String {
        self.platform
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Windows,
    Mac,
    Linux,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::Mac, Platform::Linux];
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown platform '{s}'"))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    InProgress,
    Live,
    Deprecated,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::InProgress, Status::Live, Status::Deprecated];

    /// The literal form used in records, also the sort key
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::InProgress => "in-progress",
            Status::Live => "live",
            Status::Deprecated => "deprecated",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::InProgress => "In Progress",
            Status::Live => "Live",
            Status::Deprecated => "Deprecated",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|st| st.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("unknown status '{s}'"))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentType {
    #[default]
    Sccm,
    Intune,
}

impl Display for DeploymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentType::Sccm => write!(f, "SCCM"),
            DeploymentType::Intune => write!(f, "Intune"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sponsor {
    pub name: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackagedBy {
    pub packager: String,
    pub date: Date,
    pub version: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileType {
    #[default]
    Msi,
    MsiMst,
    Exe,
    Ps1,
    Appx,
}

impl FileType {
    pub const ALL: [FileType; 5] = [
        FileType::Msi,
        FileType::MsiMst,
        FileType::Exe,
        FileType::Ps1,
        FileType::Appx,
    ];
}

impl Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileType::Msi => write!(f, "MSI"),
            FileType::MsiMst => write!(f, "MSI with MST"),
            FileType::Exe => write!(f, "EXE"),
            FileType::Ps1 => write!(f, "PS1"),
            FileType::Appx => write!(f, "APPX"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTypes {
    pub primary: FileType,
    pub has_script: bool,
}

impl Display for FileTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.primary)?;
        if self.has_script {
            write!(f, " + PowerShell Script")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SccmDeployment {
    pub install_command: String,
    pub uninstall_command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repair_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_start_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uninstall_start_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repair_start_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderPaths {
    pub source: String,
    pub deployment: String,
    pub logs: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    #[default]
    Powershell,
    Vbscript,
    Batch,
    Other,
}

impl ScriptType {
    pub const ALL: [ScriptType; 4] = [
        ScriptType::Powershell,
        ScriptType::Vbscript,
        ScriptType::Batch,
        ScriptType::Other,
    ];
}

impl Display for ScriptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptType::Powershell => write!(f, "PowerShell"),
            ScriptType::Vbscript => write!(f, "VBScript"),
            ScriptType::Batch => write!(f, "Batch"),
            ScriptType::Other => write!(f, "Other"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ScriptType,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Licensing {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<Date>,
    #[serde(default)]
    pub file_links: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub date: Date,
    pub user: String,
    pub action: String,
    pub changes: String,
}
