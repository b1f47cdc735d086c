use crate::structs::{
    draft::{PackageDraft, PackagePatch},
    package::{Package, Script},
    server::ServerInfo,
};

#[derive(Debug, PartialEq)]
pub enum EventResult {
    None,
    Quit,
    /// Dismiss the open overlay
    Close,
    Command(EventCommand),
    Open(Popup),
}

/// Store and session mutations requested by the widgets
#[derive(Debug, Clone, PartialEq)]
pub enum EventCommand {
    CreatePackage(PackageDraft),
    UpdatePackage { id: String, patch: PackagePatch },
    DeletePackage(String),
    AddScript { id: String, script: Script },
    RemoveScript { id: String, index: usize },
    /// Stamp the current user as packager of the current version
    RecordPackaging(String),
    SignIn { username: String, password: String },
    SignOut,
    AddServer,
    UpdateServer(ServerInfo),
    DeleteServer(String),
    CycleTheme,
}

/// Overlays a widget can ask for
#[derive(Debug, Clone, PartialEq)]
pub enum Popup {
    AddPackage,
    EditPackage(Package),
    AddScript(String),
    ConfirmDelete { id: String, name: String },
    SignIn,
}
