use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::{
    auth::User,
    config::Config,
    seed::Seed,
    store::{PackageStore, ServerRegistry},
    structs::{event::EventResult, tab::Tab, timedstring::TimedString},
    theme::Palette,
    widgets::{
        Commands, confirm::ConfirmDelete, form::PackageForm, login::LoginWidget,
        packages::PackagesWidget, script::ScriptWizard, servers::ServersWidget,
    },
};

/// Modal layer drawn over the current tab, takes all keys while open
#[derive(Debug, Clone)]
pub enum Overlay {
    Form(PackageForm),
    Script(ScriptWizard),
    Confirm(ConfirmDelete),
    Login(LoginWidget),
}

impl Overlay {
    /// Failed commands are reported inside the overlay that issued them
    pub fn set_error(&mut self, error: impl ToString) {
        match self {
            Overlay::Form(w) => w.set_error(error),
            Overlay::Script(w) => w.set_error(error),
            Overlay::Login(w) => w.set_error(error),
            Overlay::Confirm(w) => w.set_error(error),
        }
    }

    /// Popup size as (width %, height %)
    pub fn size(&self) -> (u16, u16) {
        match self {
            Overlay::Form(_) => (70, 85),
            Overlay::Script(_) => (70, 70),
            Overlay::Confirm(_) => (50, 25),
            Overlay::Login(_) => (40, 25),
        }
    }
}

impl Commands for Overlay {
    fn command_descriptions(&self) -> Vec<(&str, &str, &str)> {
        match self {
            Overlay::Form(w) => w.command_descriptions(),
            Overlay::Script(w) => w.command_descriptions(),
            Overlay::Confirm(w) => w.command_descriptions(),
            Overlay::Login(w) => w.command_descriptions(),
        }
    }

    fn handle_key_event(&mut self, key: &KeyEvent) -> Option<EventResult> {
        match self {
            Overlay::Form(w) => w.handle_key_event(key),
            Overlay::Script(w) => w.handle_key_event(key),
            Overlay::Confirm(w) => w.handle_key_event(key),
            Overlay::Login(w) => w.handle_key_event(key),
        }
    }
}

impl Widget for Overlay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self {
            Overlay::Form(w) => w.render(area, buf),
            Overlay::Script(w) => w.render(area, buf),
            Overlay::Confirm(w) => w.render(area, buf),
            Overlay::Login(w) => w.render(area, buf),
        }
    }
}

pub struct AppState {
    pub store: PackageStore,
    pub servers: ServerRegistry,
    pub user: Option<User>,
    pub config: Config,
    pub palette: Palette,
    pub show_help: bool,
    pub message: TimedString,

    pub tab: Tab,
    //tabs
    pub packages_widget: PackagesWidget,
    pub servers_widget: ServersWidget,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(config: Config, seed: Seed) -> Self {
        let palette = config.theme.palette();
        let mut packages_widget = PackagesWidget::default();
        packages_widget.set_palette(palette);
        packages_widget.set_sort(config.default_sort);
        let mut servers_widget = ServersWidget::default();
        servers_widget.set_palette(palette);
        Self {
            store: PackageStore::new(seed.packages),
            servers: ServerRegistry::new(seed.servers),
            user: None,
            config,
            palette,
            show_help: false,
            message: TimedString::new("", Duration::from_secs(5)),
            tab: Tab::default(),
            packages_widget,
            servers_widget,
            overlay: None,
        }
    }
}
