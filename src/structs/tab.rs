use std::fmt::Display;

#[derive(Debug, Default, PartialEq)]
pub enum Tab {
    #[default]
    Packages,
    Servers,
}
impl Tab {
    pub fn values() -> Vec<String> {
        vec![Tab::Packages.to_string(), Tab::Servers.to_string()]
    }

    pub(crate) fn cycle_next(&mut self) {
        *self = match self {
            Tab::Packages => Tab::Servers,
            Tab::Servers => Tab::Packages,
        };
    }
}

impl Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tab::Packages => write!(f, "Packages"),
            Tab::Servers => write!(f, "Servers"),
        }
    }
}

//for select ratatui::Tabs
impl From<&Tab> for Option<usize> {
    fn from(tab: &Tab) -> Self {
        match tab {
            Tab::Packages => Some(0),
            Tab::Servers => Some(1),
        }
    }
}
