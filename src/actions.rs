use jiff::Timestamp;
use tracing::{info, warn};

use crate::{
    auth::authenticate,
    error::{AppError, StoreError},
    structs::{
        appstate::{AppState, Overlay},
        event::{EventCommand, Popup},
        package::PackagedBy,
    },
    utils::today_at,
    widgets::{
        confirm::ConfirmDelete, form::PackageForm, login::LoginWidget, script::ScriptWizard,
    },
};

/// Push the store contents into every table
pub fn refresh(state: &mut AppState) {
    let now = Timestamp::now();
    state
        .packages_widget
        .set_data(state.store.packages(), now);
    state.servers_widget.set_data(state.servers.servers());
}

pub fn open_popup(state: &mut AppState, popup: Popup) {
    let palette = state.palette;
    state.overlay = Some(match popup {
        Popup::AddPackage => Overlay::Form(PackageForm::add(palette)),
        Popup::EditPackage(pack) => Overlay::Form(PackageForm::edit(pack, palette)),
        Popup::AddScript(id) => Overlay::Script(ScriptWizard::new(id, palette)),
        Popup::ConfirmDelete { id, name } => {
            Overlay::Confirm(ConfirmDelete::new(id, name, palette))
        }
        Popup::SignIn => Overlay::Login(LoginWidget::new(palette)),
    });
}

/// Apply one command, close the overlay that issued it and refresh the tables.
/// On error nothing is changed and the overlay stays open.
pub fn run_command(state: &mut AppState, command: EventCommand) -> Result<(), AppError> {
    let message = match command {
        EventCommand::CreatePackage(draft) => {
            let id = state.store.create(draft)?;
            refresh(state);
            state.packages_widget.select(&id);
            "Package created".to_string()
        }
        EventCommand::UpdatePackage { id, patch } => {
            let changed = state.store.update(&id, &patch)?;
            if changed.is_empty() {
                "No changes".to_string()
            } else {
                format!("Updated {}", changed.join(", "))
            }
        }
        EventCommand::DeletePackage(id) => {
            let pack = state.store.delete(&id)?;
            format!("Deleted {}", pack.name)
        }
        EventCommand::AddScript { id, script } => {
            let name = script.name.clone();
            state.store.append_script(&id, script)?;
            format!("Added script {name}")
        }
        EventCommand::RemoveScript { id, index } => {
            let script = state.store.remove_script(&id, index)?;
            format!("Removed script {}", script.name)
        }
        EventCommand::RecordPackaging(id) => {
            let pack = state
                .store
                .get(&id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            let entry = PackagedBy {
                packager: state
                    .user
                    .as_ref()
                    .map(|u| u.username.clone())
                    .unwrap_or_else(|| "system".to_string()),
                date: today_at(Timestamp::now()),
                version: pack.version.clone(),
            };
            let message = format!("Packaged {} by {}", entry.version, entry.packager);
            state.store.record_packaging(&id, entry)?;
            message
        }
        EventCommand::SignIn { username, password } => {
            let user = authenticate(&username, &password)?;
            state.store.set_actor(Some(user.username.clone()));
            let message = format!("Signed in as {user}");
            state.user = Some(user);
            message
        }
        EventCommand::SignOut => {
            if let Some(user) = state.user.take() {
                info!(username = %user.username, "signed out");
            }
            state.store.set_actor(None);
            "Signed out".to_string()
        }
        EventCommand::AddServer => {
            let id = state.servers.add_at(Timestamp::now());
            refresh(state);
            state.servers_widget.select(&id);
            "Server added".to_string()
        }
        EventCommand::UpdateServer(server) => {
            state.servers.update(server)?;
            "Server updated".to_string()
        }
        EventCommand::DeleteServer(id) => {
            let server = state.servers.delete(&id)?;
            format!("Deleted {}", server.name)
        }
        EventCommand::CycleTheme => {
            state.config.theme.cycle_next();
            state.palette = state.config.theme.palette();
            state.packages_widget.set_palette(state.palette);
            state.servers_widget.set_palette(state.palette);
            format!("Theme: {}", state.config.theme)
        }
    };
    state.overlay = None;
    refresh(state);
    state.message.set(message);
    Ok(())
}

/// Run a command, routing a failure to the open overlay or the status line
pub fn run_and_report(state: &mut AppState, command: EventCommand) {
    if let Err(e) = run_command(state, command) {
        warn!(error = %e, "command failed");
        match &mut state.overlay {
            Some(overlay) => overlay.set_error(&e),
            None => state.message.set(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        seed::Seed,
        structs::{
            draft::{PackageDraft, PackagePatch},
            package::Status,
        },
        widgets::CurrentPackage,
    };

    fn state() -> AppState {
        let mut state = AppState::new(Config::default(), Seed::builtin().unwrap());
        refresh(&mut state);
        state
    }

    #[test]
    fn test_failed_create_keeps_form_open() {
        let mut state = state();
        open_popup(&mut state, Popup::AddPackage);
        run_and_report(&mut state, EventCommand::CreatePackage(PackageDraft::default()));
        assert!(matches!(state.overlay, Some(Overlay::Form(_))));
        assert_eq!(state.store.len(), 6);
    }

    #[test]
    fn test_create_selects_new_package() {
        let mut state = state();
        open_popup(&mut state, Popup::AddPackage);
        let mut draft = PackageDraft::default();
        draft.name = "7-Zip".into();
        draft.version = "24.08".into();
        draft.summary = "Archiver".into();
        run_and_report(&mut state, EventCommand::CreatePackage(draft));

        assert!(state.overlay.is_none());
        assert_eq!(state.store.len(), 7);
        assert_eq!(
            state.packages_widget.current_package().map(|p| p.name.as_str()),
            Some("7-Zip")
        );
        assert_eq!(state.message.as_ref(), "Package created");
    }

    #[test]
    fn test_audit_uses_signed_in_user() {
        let mut state = state();
        run_and_report(
            &mut state,
            EventCommand::SignIn {
                username: "user".into(),
                password: "user".into(),
            },
        );
        assert_eq!(state.message.as_ref(), "Signed in as user (user)");

        let patch = PackagePatch {
            status: Some(Status::Deprecated),
            ..Default::default()
        };
        run_and_report(&mut state, EventCommand::UpdatePackage { id: "1".into(), patch });
        assert_eq!(state.store.get("1").unwrap().audit_history[0].user, "user");

        run_and_report(&mut state, EventCommand::RecordPackaging("1".into()));
        assert_eq!(state.store.get("1").unwrap().last_packaged_by, "user");
    }

    #[test]
    fn test_bad_sign_in_reports_inline() {
        let mut state = state();
        open_popup(&mut state, Popup::SignIn);
        run_and_report(
            &mut state,
            EventCommand::SignIn {
                username: "admin".into(),
                password: "nope".into(),
            },
        );
        assert!(state.user.is_none());
        assert!(matches!(state.overlay, Some(Overlay::Login(_))));
    }

    #[test]
    fn test_unknown_id_goes_to_status() {
        let mut state = state();
        run_and_report(&mut state, EventCommand::DeletePackage("missing".into()));
        assert_eq!(state.message.as_ref(), "No package with id 'missing'");
        run_and_report(&mut state, EventCommand::DeleteServer("missing".into()));
        assert_eq!(state.message.as_ref(), "No server with id 'missing'");
    }

    #[test]
    fn test_failed_delete_shows_in_dialog() {
        let mut state = state();
        open_popup(
            &mut state,
            Popup::ConfirmDelete {
                id: "missing".into(),
                name: "Ghost".into(),
            },
        );
        run_and_report(&mut state, EventCommand::DeletePackage("missing".into()));
        let Some(Overlay::Confirm(dialog)) = &state.overlay else {
            panic!("dialog should stay open");
        };
        assert_eq!(dialog.error(), Some("No package with id 'missing'"));
        assert_eq!(state.store.len(), 6);
    }

    #[test]
    fn test_server_lifecycle() {
        let mut state = state();
        run_and_report(&mut state, EventCommand::AddServer);
        assert_eq!(state.servers.servers().len(), 5);
        let added = state.servers.servers()[4].clone();
        assert_eq!(added.name, "New Server");
        run_and_report(&mut state, EventCommand::DeleteServer(added.id));
        assert_eq!(state.servers.servers().len(), 4);
    }
}
