use crossterm::event::KeyEvent;

use crate::structs::{event::EventResult, package::Package};

pub mod confirm;
pub mod detail;
pub mod form;
pub mod input;
pub mod login;
pub mod packages;
pub mod script;
pub mod servers;
pub mod table;

pub trait Commands {
    /// (key, help text, short status bar label)
    fn command_descriptions(&self) -> Vec<(&str, &str, &str)>;
    fn handle_key_event(&mut self, key: &KeyEvent) -> Option<EventResult>;
}

pub trait CurrentPackage {
    fn current_package(&self) -> Option<&Package>;
}
