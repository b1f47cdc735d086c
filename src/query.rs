use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    structs::package::{Package, Platform, Status},
    utils::locale_cmp,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Name,
    Status,
    #[default]
    LastUpdated,
}

impl SortBy {
    pub(crate) fn cycle_next(&mut self) {
        *self = match self {
            SortBy::LastUpdated => SortBy::Name,
            SortBy::Name => SortBy::Status,
            SortBy::Status => SortBy::LastUpdated,
        };
    }
}

impl Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortBy::Name => write!(f, "Name"),
            SortBy::Status => write!(f, "Status"),
            SortBy::LastUpdated => write!(f, "Last Updated"),
        }
    }
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(SortBy::Name),
            "status" => Ok(SortBy::Status),
            "lastupdated" | "last-updated" | "updated" => Ok(SortBy::LastUpdated),
            _ => Err(format!("unknown sort '{s}'")),
        }
    }
}

/// The four list controls: search text, platform, status and ordering
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PackageQuery {
    pub search: String,
    pub platform: Option<Platform>,
    pub status: Option<Status>,
    pub sort_by: SortBy,
}

impl PackageQuery {
    pub fn matches(&self, pack: &Package) -> bool {
        self.matches_lowered(pack, &self.search.to_lowercase())
    }

    fn matches_lowered(&self, pack: &Package, search: &str) -> bool {
        matches_search(pack, search)
            && self.platform.is_none_or(|p| pack.has_platform(p))
            && self.status.is_none_or(|s| pack.status == s)
    }

    /// Filter then sort. The source slice is left untouched and the sort is stable.
    pub fn apply<'a>(&self, packages: &'a [Package]) -> Vec<&'a Package> {
        let search = self.search.to_lowercase();
        let mut filtered: Vec<&Package> = packages
            .iter()
            .filter(|p| self.matches_lowered(p, &search))
            .collect();

        match self.sort_by {
            SortBy::Name => filtered.sort_by(|a, b| locale_cmp(&a.name, &b.name)),
            SortBy::Status => filtered.sort_by(|a, b| a.status.as_str().cmp(b.status.as_str())),
            SortBy::LastUpdated => filtered.sort_by(|a, b| b.last_updated.cmp(&a.last_updated)),
        }
        filtered
    }

    /// Selecting the active status again clears it
    pub fn toggle_status(&mut self, status: Status) {
        if self.status == Some(status) {
            self.status = None;
        } else {
            self.status = Some(status);
        }
    }

    pub(crate) fn cycle_platform(&mut self) {
        self.platform = match self.platform {
            None => Some(Platform::Windows),
            Some(Platform::Windows) => Some(Platform::Mac),
            Some(Platform::Mac) => Some(Platform::Linux),
            Some(Platform::Linux) => None,
        };
    }

    pub(crate) fn cycle_status(&mut self) {
        self.status = match self.status {
            None => Some(Status::InProgress),
            Some(Status::InProgress) => Some(Status::Live),
            Some(Status::Live) => Some(Status::Deprecated),
            Some(Status::Deprecated) => None,
        };
    }

    pub fn clear(&mut self) {
        self.search.clear();
        self.platform = None;
        self.status = None;
    }

    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty() || self.platform.is_some() || self.status.is_some()
    }
}

fn matches_search(pack: &Package, lowered: &str) -> bool {
    lowered.is_empty()
        || pack.name.to_lowercase().contains(lowered)
        || pack.summary.to_lowercase().contains(lowered)
}
