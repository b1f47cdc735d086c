//! Session owned collections. Every mutation the console performs goes through here.

use jiff::Timestamp;
use tracing::{debug, info};

use crate::{
    error::StoreError,
    structs::{
        draft::{PackageDraft, PackagePatch},
        package::{AuditEntry, Package, PackagedBy, Script, Status},
        server::{ServerInfo, ServerKind},
    },
    utils::today_at,
};

const SYSTEM_USER: &str = "system";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub live: usize,
    pub in_progress: usize,
    pub deprecated: usize,
}

#[derive(Debug, Default, Clone)]
pub struct PackageStore {
    packages: Vec<Package>,
    actor: Option<String>,
}

impl PackageStore {
    pub fn new(packages: Vec<Package>) -> Self {
        Self {
            packages,
            actor: None,
        }
    }

    /// User recorded in audit entries, `None` when signed out
    pub fn set_actor(&mut self, user: Option<String>) {
        self.actor = user;
    }

    fn actor(&self) -> String {
        self.actor.clone().unwrap_or_else(|| SYSTEM_USER.to_string())
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn get(&self, id: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn status_counts(&self) -> StatusCounts {
        self.packages
            .iter()
            .fold(StatusCounts::default(), |mut acc, p| {
                match p.status {
                    Status::Live => acc.live += 1,
                    Status::InProgress => acc.in_progress += 1,
                    Status::Deprecated => acc.deprecated += 1,
                }
                acc
            })
    }

    pub fn create(&mut self, draft: PackageDraft) -> Result<String, StoreError> {
        self.create_at(draft, Timestamp::now())
    }

    /// Validate, assign a fresh id and put the new package first
    pub fn create_at(&mut self, draft: PackageDraft, now: Timestamp) -> Result<String, StoreError> {
        draft.validate()?;

        let id = self.next_id(now);
        let created = today_at(now);
        let mut pack = draft.into_package(id.clone(), created);
        pack.audit_history.push(AuditEntry {
            date: created,
            user: self.actor(),
            action: "Created".to_string(),
            changes: "Initial package creation".to_string(),
        });

        info!(id = %id, name = %pack.name, "package created");
        self.packages.insert(0, pack);
        Ok(id)
    }

    pub fn update(&mut self, id: &str, patch: &PackagePatch) -> Result<Vec<&'static str>, StoreError> {
        self.update_at(id, patch, Timestamp::now())
    }

    /// Merge `patch` into the package. Nothing is written if the result fails validation.
    pub fn update_at(
        &mut self,
        id: &str,
        patch: &PackagePatch,
        now: Timestamp,
    ) -> Result<Vec<&'static str>, StoreError> {
        let index = self.index_of(id)?;
        let mut pack = self.packages[index].clone();
        let changed = patch.apply(&mut pack);
        pack.validate()?;

        if changed.is_empty() {
            debug!(id, "update with no changes");
            return Ok(changed);
        }
        pack.audit_history.insert(
            0,
            AuditEntry {
                date: today_at(now),
                user: self.actor(),
                action: "Updated".to_string(),
                changes: format!("Changed {}", changed.join(", ")),
            },
        );
        info!(id, fields = ?changed, "package updated");
        self.packages[index] = pack;
        Ok(changed)
    }

    pub fn delete(&mut self, id: &str) -> Result<Package, StoreError> {
        let index = self.index_of(id)?;
        let pack = self.packages.remove(index);
        info!(id, name = %pack.name, "package deleted");
        Ok(pack)
    }

    pub fn append_script(&mut self, id: &str, script: Script) -> Result<(), StoreError> {
        let index = self.index_of(id)?;
        script.validate()?;
        debug!(id, script = %script.name, bytes = script.content.len(), "script added");
        self.packages[index].scripts.push(script);
        Ok(())
    }

    pub fn remove_script(&mut self, id: &str, script_index: usize) -> Result<Script, StoreError> {
        let index = self.index_of(id)?;
        let scripts = &mut self.packages[index].scripts;
        if script_index >= scripts.len() {
            return Err(StoreError::ScriptIndex(script_index));
        }
        let script = scripts.remove(script_index);
        debug!(id, script = %script.name, "script removed");
        Ok(script)
    }

    /// Newest packaging run goes first, like the seeded histories
    pub fn record_packaging(&mut self, id: &str, entry: PackagedBy) -> Result<(), StoreError> {
        let index = self.index_of(id)?;
        let pack = &mut self.packages[index];
        pack.last_packaged_by = entry.packager.clone();
        pack.packaged_by_history.insert(0, entry);
        Ok(())
    }

    fn index_of(&self, id: &str) -> Result<usize, StoreError> {
        self.packages
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn next_id(&self, now: Timestamp) -> String {
        next_free_id(now, |id| self.get(id).is_some())
    }
}

#[derive(Debug, Default, Clone)]
pub struct ServerRegistry {
    servers: Vec<ServerInfo>,
}

impl ServerRegistry {
    pub fn new(servers: Vec<ServerInfo>) -> Self {
        Self { servers }
    }

    pub fn servers(&self) -> &[ServerInfo] {
        &self.servers
    }

    pub fn get(&self, id: &str) -> Option<&ServerInfo> {
        self.servers.iter().find(|s| s.id == id)
    }

    /// Append a blank server entry ready for editing
    pub fn add_at(&mut self, now: Timestamp) -> String {
        let id = next_free_id(now, |id| self.get(id).is_some());
        self.servers.push(ServerInfo {
            id: id.clone(),
            name: "New Server".to_string(),
            ip_address: String::new(),
            fqdn: String::new(),
            kind: ServerKind::Other,
        });
        info!(id = %id, "server added");
        id
    }

    pub fn update(&mut self, server: ServerInfo) -> Result<(), StoreError> {
        let Some(existing) = self.servers.iter_mut().find(|s| s.id == server.id) else {
            return Err(StoreError::ServerNotFound(server.id));
        };
        info!(id = %server.id, "server updated");
        *existing = server;
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> Result<ServerInfo, StoreError> {
        let index = self
            .servers
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::ServerNotFound(id.to_string()))?;
        info!(id, "server deleted");
        Ok(self.servers.remove(index))
    }
}

/// Millisecond timestamp, bumped until nothing holds it
fn next_free_id(now: Timestamp, taken: impl Fn(&str) -> bool) -> String {
    let mut millis = now.as_millisecond();
    loop {
        let id = millis.to_string();
        if !taken(&id) {
            return id;
        }
        millis += 1;
    }
}
