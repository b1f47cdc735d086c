pub mod actions;
pub mod auth;
pub mod config;
pub mod error;
pub mod licence;
pub mod query;
pub mod seed;
pub mod store;
pub mod structs;
pub mod theme;
pub mod utils;
pub mod widgets;

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use jiff::Timestamp;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Tabs, Widget},
};
use std::{path::PathBuf, sync::Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    actions::{open_popup, refresh, run_and_report},
    config::Config,
    error::AppError,
    licence::format_expiry,
    query::{PackageQuery, SortBy},
    seed::Seed,
    structs::{
        appstate::AppState,
        event::{EventCommand, EventResult, Popup},
        package::{Package, Platform, Status},
        tab::Tab,
    },
    theme::Theme,
    widgets::Commands,
};

#[derive(Parser, Debug)]
#[command(name = "pkgdesk", version, about = "Terminal console for software packaging records")]
struct Args {
    /// Config file, defaults to the platform config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON file with packages and servers to start from
    #[arg(long)]
    seed: Option<PathBuf>,

    /// default, amoled or light
    #[arg(long)]
    theme: Option<Theme>,

    /// Print the package list and exit
    #[arg(short, long)]
    print: bool,

    #[arg(short, long, default_value = "")]
    search: String,

    #[arg(long)]
    platform: Option<Platform>,

    /// in-progress, live or deprecated
    #[arg(long)]
    status: Option<Status>,

    /// name, status or updated
    #[arg(long)]
    sort: Option<SortBy>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(theme) = args.theme {
        config.theme = theme;
    }
    if let Some(sort) = args.sort {
        config.default_sort = sort;
    }
    init_logging(&config)?;
    info!(theme = %config.theme, "starting");

    let seed_file = args.seed.clone().or_else(|| config.seed_file.clone());
    let seed = Seed::load(seed_file.as_deref())?;

    if args.print {
        let query = PackageQuery {
            search: args.search,
            platform: args.platform,
            status: args.status,
            sort_by: config.default_sort,
        };
        print_packages(&seed.packages, &query);
        return Ok(());
    }

    let mut state = AppState::new(config, seed);
    refresh(&mut state);

    let mut terminal = ratatui::init();
    terminal.clear()?;
    let appresult = run(&mut terminal, state);
    ratatui::restore();

    if let Err(e) = appresult {
        eprintln!("{e}");
        std::process::exit(1);
    }
    Ok(())
}

/// Log to a file, the terminal belongs to the UI
fn init_logging(config: &Config) -> Result<(), AppError> {
    let path = config.log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.level)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn print_packages(packages: &[Package], query: &PackageQuery) {
    let now = Timestamp::now();
    let list = query.apply(packages);
    for pack in &list {
        let licence = pack
            .licensing
            .expiry_date
            .and_then(|d| format_expiry(d, now))
            .unwrap_or_default();
        println!(
            "{:<28} {:<16} {:<12} {:<14} {}  {}",
            pack.name,
            pack.version,
            pack.status,
            pack.platforms_label(),
            pack.last_updated,
            licence
        );
    }
    println!("Showing {} of {} packages", list.len(), packages.len());
}

fn run(terminal: &mut DefaultTerminal, mut state: AppState) -> Result<(), AppError> {
    loop {
        terminal.draw(|f| {
            use Constraint::{Length, Min};
            let vertical = Layout::vertical([Length(3), Min(0), Length(1)]);
            let [header_area, inner_area, footer_area] = vertical.areas(f.area());

            draw_tabs(&state, f, header_area);
            match state.tab {
                Tab::Packages => state.packages_widget.clone().render(inner_area, f.buffer_mut()),
                Tab::Servers => state.servers_widget.clone().render(inner_area, f.buffer_mut()),
            }
            draw_status(&state, f, footer_area);
            draw_overlay(&state, f);
            draw_help(&state, f);
        })?;

        match handle_event(&mut state)? {
            EventResult::None => {}
            EventResult::Quit => return Ok(()),
            EventResult::Close => state.overlay = None,
            EventResult::Open(popup) => open_popup(&mut state, popup),
            EventResult::Command(c) => run_and_report(&mut state, c),
        }
    }
}

fn handle_event(state: &mut AppState) -> Result<EventResult, AppError> {
    let Event::Key(key) = event::read()? else {
        return Ok(EventResult::None);
    };
    if key.kind != KeyEventKind::Press {
        return Ok(EventResult::None);
    }

    //priority is ctrl+c
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(EventResult::Quit);
    }

    //if showing help
    if state.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            state.show_help = false;
        }
        //no other actions allowed
        return Ok(EventResult::None);
    }

    //overlays take every key
    if let Some(overlay) = &mut state.overlay {
        return Ok(overlay.handle_key_event(&key).unwrap_or(EventResult::None));
    }

    let res = match state.tab {
        Tab::Packages => state.packages_widget.handle_key_event(&key),
        Tab::Servers => state.servers_widget.handle_key_event(&key),
    };
    if let Some(res) = res {
        return Ok(res);
    }

    //final global key handling
    let res = match key.code {
        KeyCode::Char('?') => {
            state.show_help = true;
            EventResult::None
        }
        KeyCode::Char('q') => EventResult::Quit,
        KeyCode::Tab => {
            state.tab.cycle_next();
            EventResult::None
        }
        KeyCode::Char('t') => EventResult::Command(EventCommand::CycleTheme),
        KeyCode::Char('l') if state.user.is_some() => EventResult::Command(EventCommand::SignOut),
        KeyCode::Char('l') => EventResult::Open(Popup::SignIn),
        _ => EventResult::None,
    };
    Ok(res)
}

fn draw_tabs(state: &AppState, f: &mut Frame<'_>, header_area: Rect) {
    let [tabs_area, info_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(58)]).areas(header_area);
    let p = &state.palette;
    Tabs::new(Tab::values())
        .highlight_style(p.current)
        .select(&state.tab)
        .style(p.base)
        .block(Block::bordered().title("pkgdesk"))
        .render(tabs_area, f.buffer_mut());

    let counts = state.store.status_counts();
    let user = state
        .user
        .as_ref()
        .map_or_else(|| "signed out".to_string(), |u| u.to_string());
    Paragraph::new(Line::from(vec![
        Span::styled(format!("Live {}", counts.live), Style::new().fg(p.live)),
        Span::raw("  "),
        Span::styled(
            format!("In Progress {}", counts.in_progress),
            Style::new().fg(p.in_progress),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Deprecated {}", counts.deprecated),
            Style::new().fg(p.deprecated),
        ),
        Span::styled(format!("  {user}"), p.secondary),
    ]))
    .alignment(Alignment::Right)
    .style(p.base)
    .block(Block::bordered())
    .render(info_area, f.buffer_mut());
}

fn current_commands(state: &AppState) -> Vec<(&str, &str, &str)> {
    if let Some(overlay) = &state.overlay {
        return overlay.command_descriptions();
    }
    match state.tab {
        Tab::Packages => state.packages_widget.command_descriptions(),
        Tab::Servers => state.servers_widget.command_descriptions(),
    }
}

fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

fn draw_overlay(state: &AppState, f: &mut Frame) {
    let Some(overlay) = &state.overlay else {
        return;
    };
    let (x, y) = overlay.size();
    let rect = popup_area(f.area(), x, y);
    overlay.clone().render(rect, f.buffer_mut());
}

fn draw_help(state: &AppState, f: &mut Frame) {
    if !state.show_help {
        return;
    }

    let mut commands = vec![
        "?: Toggle Help".to_string(),
        "q: Quit".to_string(),
        "Tab: Change view".to_string(),
        "t: Cycle theme".to_string(),
        "l: Sign in / Sign out".to_string(),
        "/: Search".to_string(),
        "j/k Up/Down: Move".to_string(),
        "".to_string(),
    ];
    commands.extend(
        current_commands(state)
            .into_iter()
            .map(|(k, v, _)| format!("{}: {}", k, v)),
    );

    let size = f.area();
    let block_width = (size.width / 3).max(50).min(size.width);
    let block_height = (commands.len() as u16 + 2).min(size.height);
    let rect = Rect::new(
        (size.width - block_width) / 2,
        (size.height - block_height) / 2,
        block_width,
        block_height,
    );

    let paragraph = Paragraph::new(commands.into_iter().map(Line::from).collect::<Vec<_>>())
        .block(Block::bordered().title("Help"))
        .style(state.palette.popup)
        .alignment(Alignment::Left);
    f.render_widget(Clear, rect);
    f.render_widget(paragraph, rect);
}

fn draw_status(state: &AppState, f: &mut Frame, rect: Rect) {
    let mut text = vec![" ?:Help".to_string(), "Tab:Change view".to_string()];
    text.extend(
        current_commands(state)
            .into_iter()
            .filter(|(_, _, v)| !v.is_empty())
            .map(|(k, _, v)| format!("{}:{}", k, v)),
    );
    text.push(if state.user.is_some() {
        "l:Sign out".to_string()
    } else {
        "l:Sign in".to_string()
    });

    let layout =
        Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)]).split(rect);
    Paragraph::new(text.join("  "))
        .style(Style::new().fg(state.palette.accent))
        .render(layout[0], f.buffer_mut());
    Text::raw(state.message.as_ref())
        .style(state.palette.title)
        .alignment(Alignment::Right)
        .render(layout[1], f.buffer_mut());
}
