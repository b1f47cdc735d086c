use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::AppError,
    structs::{package::Package, server::ServerInfo},
};

const BUILTIN: &str = include_str!("../data/seed.json");

/// Starting records for a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub packages: Vec<Package>,
    #[serde(default)]
    pub servers: Vec<ServerInfo>,
}

impl Seed {
    pub fn builtin() -> Result<Self, AppError> {
        Ok(serde_json::from_str(BUILTIN)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)?;
        let seed: Seed = serde_json::from_str(&content)?;
        info!(path = %path.display(), packages = seed.packages.len(), "loaded seed file");
        Ok(seed)
    }

    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::package::{DeploymentType, Platform, Status};
    use jiff::civil::date;

    #[test]
    fn test_builtin_parses() {
        let seed = Seed::builtin().unwrap();
        assert_eq!(seed.packages.len(), 6);
        assert_eq!(seed.servers.len(), 4);

        let acrobat = &seed.packages[0];
        assert_eq!(acrobat.name, "Adobe Acrobat Pro DC");
        assert_eq!(acrobat.platform, vec![Platform::Windows, Platform::Mac]);
        assert_eq!(acrobat.status, Status::Live);
        assert_eq!(acrobat.licensing.expiry_date, Some(date(2024, 4, 15)));
        assert!(acrobat.is_dynamic_install);
        assert_eq!(acrobat.packaged_by_history.len(), 3);
    }

    #[test]
    fn test_builtin_records_are_valid() {
        let seed = Seed::builtin().unwrap();
        for pack in &seed.packages {
            assert_eq!(pack.validate(), Ok(()), "{}", pack.name);
            if pack.deployment_type == DeploymentType::Intune {
                assert!(!pack.is_patch_my_pc && !pack.is_dynamic_install);
            }
            for script in &pack.scripts {
                assert_eq!(script.validate(), Ok(()));
            }
        }
        let mut ids: Vec<&str> = seed.packages.iter().map(|p| p.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), seed.packages.len());
    }

    #[test]
    fn test_round_trip_keeps_field_names() {
        let seed = Seed::builtin().unwrap();
        let json = serde_json::to_string(&seed.packages[1]).unwrap();
        assert!(json.contains("\"isPatchMyPC\":true"));
        assert!(json.contains("\"deploymentType\":\"sccm\""));
        assert!(json.contains("\"lastUpdated\":\"2024-01-20\""));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, r#"{"servers": []}"#).unwrap();
        let seed = Seed::load(Some(&path)).unwrap();
        assert!(seed.packages.is_empty());

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(Seed::load(Some(&path)), Err(AppError::Seed(_))));
        assert!(matches!(
            Seed::load(Some(&dir.path().join("missing.json"))),
            Err(AppError::Io(_))
        ));
    }
}
