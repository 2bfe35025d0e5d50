// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use pokedex_app::{
    AppCommand, AppMode, AppState, Catalog, DetailRecord, NavCommand, Navigator, PositionStore,
    Router, StoreKey, find_id_by_name, format_padded, suggestions,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const SUGGESTION_LIMIT: usize = 8;

/// Backend seam for the UI: how one detail payload is fetched. The
/// default `spawn_detail_fetch` resolves synchronously and pushes the
/// outcome onto the internal channel; production runtimes override it to
/// run the fetch on a worker thread.
pub trait AppRuntime {
    fn fetch_detail(&mut self, id: u32) -> Result<DetailRecord>;

    fn spawn_detail_fetch(
        &mut self,
        request_id: u64,
        id: u32,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let event = match self.fetch_detail(id) {
            Ok(record) => InternalEvent::Detail(DetailFetchEvent::Loaded { request_id, record }),
            Err(error) => InternalEvent::Detail(DetailFetchEvent::Failed {
                request_id,
                error: error.to_string(),
            }),
        };
        tx.send(event)
            .map_err(|_| anyhow::anyhow!("detail event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailFetchEvent {
    Loaded {
        request_id: u64,
        record: DetailRecord,
    },
    Failed {
        request_id: u64,
        error: String,
    },
}

impl DetailFetchEvent {
    const fn request_id(&self) -> u64 {
        match self {
            Self::Loaded { request_id, .. } | Self::Failed { request_id, .. } => *request_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    Detail(DetailFetchEvent),
}

/// The request the detail pane is currently waiting on. Results arriving
/// with any other request id are stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DetailInFlight {
    request_id: u64,
    id: u32,
}

#[derive(Debug, Clone, PartialEq)]
enum DetailPane {
    Loading(u32),
    Ready(DetailRecord),
    Failed { id: u32, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct SearchUiState {
    input: String,
    cursor: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct ViewData {
    detail: DetailPane,
    in_flight: Option<DetailInFlight>,
    next_request_id: u64,
    search: SearchUiState,
    status_token: u64,
}

impl Default for ViewData {
    fn default() -> Self {
        Self {
            detail: DetailPane::Loading(pokedex_app::FIRST_ID),
            in_flight: None,
            next_request_id: 0,
            search: SearchUiState::default(),
            status_token: 0,
        }
    }
}

/// Everything the navigation engine needs for one browsing session: the
/// read-only catalog plus the injected routing and persistence
/// collaborators.
pub struct Session<'a> {
    pub catalog: &'a Catalog,
    pub nav: Navigator,
    pub store: &'a mut dyn PositionStore,
    pub router: &'a mut dyn Router,
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    session: &mut Session<'_>,
    runtime: &mut R,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Some(last_search) = session.store.get(StoreKey::LastSearch)? {
        view_data.search.input = last_search;
    }

    start_detail_fetch(runtime, &mut view_data, &internal_tx, session.nav.cursor());

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) =
            terminal.draw(|frame| render(frame, state, session, &view_data))
        {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, session, runtime, &mut view_data, &internal_tx, key)
                    {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(state: &mut AppState, view_data: &mut ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Detail(event) => handle_detail_event(view_data, event),
        }
    }
}

fn handle_detail_event(view_data: &mut ViewData, event: DetailFetchEvent) {
    let Some(in_flight) = view_data.in_flight else {
        return;
    };
    if event.request_id() != in_flight.request_id {
        return;
    }

    match event {
        DetailFetchEvent::Loaded { record, .. } => {
            view_data.detail = DetailPane::Ready(record);
            view_data.in_flight = None;
        }
        DetailFetchEvent::Failed { error, .. } => {
            view_data.detail = DetailPane::Failed {
                id: in_flight.id,
                message: error,
            };
            view_data.in_flight = None;
        }
    }
}

fn next_detail_request_id(view_data: &mut ViewData) -> u64 {
    view_data.next_request_id = view_data.next_request_id.saturating_add(1);
    if view_data.next_request_id == 0 {
        view_data.next_request_id = 1;
    }
    view_data.next_request_id
}

fn start_detail_fetch<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    id: u32,
) {
    let request_id = next_detail_request_id(view_data);
    view_data.in_flight = Some(DetailInFlight { request_id, id });
    view_data.detail = DetailPane::Loading(id);

    if let Err(error) = runtime.spawn_detail_fetch(request_id, id, internal_tx.clone()) {
        view_data.in_flight = None;
        view_data.detail = DetailPane::Failed {
            id,
            message: error.to_string(),
        };
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Pure mapping from a key press to a navigation command while browsing.
/// Registered by the event loop; callers embedding the engine elsewhere
/// bind it to whatever input source they have.
pub fn nav_command_for_key(key: KeyEvent) -> Option<NavCommand> {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => Some(NavCommand::Prev),
        KeyCode::Right | KeyCode::Char('l') => Some(NavCommand::Next),
        _ => None,
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    session: &mut Session<'_>,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match state.mode {
        AppMode::Nav => handle_nav_key(state, session, runtime, view_data, internal_tx, key),
        AppMode::Search => {
            handle_search_key(state, session, runtime, view_data, internal_tx, key);
            false
        }
    }
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut AppState,
    session: &mut Session<'_>,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') {
        return true;
    }

    if key.code == KeyCode::Char('/') {
        state.dispatch(AppCommand::OpenSearch);
        view_data.search.cursor = 0;
        return false;
    }

    if let Some(command) = nav_command_for_key(key) {
        apply_nav_command(state, session, runtime, view_data, internal_tx, command);
    }
    false
}

fn handle_search_key<R: AppRuntime>(
    state: &mut AppState,
    session: &mut Session<'_>,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            state.dispatch(AppCommand::CloseSearch);
        }
        KeyCode::Enter => {
            submit_search(state, session, runtime, view_data, internal_tx);
        }
        KeyCode::Backspace => {
            view_data.search.input.pop();
            view_data.search.cursor = 0;
        }
        KeyCode::Down => {
            let count = suggestions(&view_data.search.input, session.catalog, SUGGESTION_LIMIT).len();
            if count > 0 {
                view_data.search.cursor = (view_data.search.cursor + 1).min(count - 1);
            }
        }
        KeyCode::Up => {
            view_data.search.cursor = view_data.search.cursor.saturating_sub(1);
        }
        KeyCode::Tab => {
            let picked = suggestions(&view_data.search.input, session.catalog, SUGGESTION_LIMIT)
                .get(view_data.search.cursor)
                .map(|entry| entry.name.clone());
            if let Some(name) = picked {
                view_data.search.input = name;
                view_data.search.cursor = 0;
            }
        }
        KeyCode::Char(ch) => {
            view_data.search.input.push(ch);
            view_data.search.cursor = 0;
        }
        _ => {}
    }
}

fn submit_search<R: AppRuntime>(
    state: &mut AppState,
    session: &mut Session<'_>,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let query = view_data.search.input.clone();

    let Some(id) = find_id_by_name(&query, session.catalog) else {
        emit_status(state, view_data, internal_tx, format!("no match for {query:?}"));
        return;
    };

    if let Err(error) = session.store.set(StoreKey::LastSearch, query.trim()) {
        emit_status(state, view_data, internal_tx, format!("save search failed: {error}"));
    }

    state.dispatch(AppCommand::CloseSearch);
    apply_nav_command(
        state,
        session,
        runtime,
        view_data,
        internal_tx,
        NavCommand::Jump(id),
    );
}

fn apply_nav_command<R: AppRuntime>(
    state: &mut AppState,
    session: &mut Session<'_>,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: NavCommand,
) {
    let before = session.nav.cursor();
    let result = session.nav.dispatch(command, session.store, session.router);

    // The cursor settles even when persisting it fails, so the detail
    // pane must follow it either way.
    let id = session.nav.cursor();
    if id != before {
        start_detail_fetch(runtime, view_data, internal_tx, id);
    }

    if let Err(error) = result {
        emit_status(state, view_data, internal_tx, format!("save position failed: {error}"));
    }
}

/// Index window for the list pane: keeps the cursor roughly centered and
/// never scrolls past either end.
fn list_window(cursor_index: usize, total: usize, visible: usize) -> usize {
    if total <= visible || visible == 0 {
        return 0;
    }
    let centered = cursor_index.saturating_sub(visible / 2);
    centered.min(total - visible)
}

fn render(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    session: &Session<'_>,
    view_data: &ViewData,
) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(34), Constraint::Percentage(66)])
        .split(outer[0]);

    render_list(frame, panes[0], session);
    render_detail(frame, panes[1], session, view_data);
    render_status(frame, outer[1], state);

    if state.mode == AppMode::Search {
        render_search(frame, session, view_data);
    }
}

fn render_list(frame: &mut ratatui::Frame<'_>, area: Rect, session: &Session<'_>) {
    let entries = session.catalog.entries();
    let size = session.catalog.size();
    let cursor_index = session.nav.cursor() as usize - 1;

    let visible = area.height.saturating_sub(2) as usize;
    let offset = list_window(cursor_index, entries.len(), visible);

    let items: Vec<ListItem<'_>> = entries
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(index, entry)| {
            let id: u32 = entry.id.parse().unwrap_or_default();
            let line = format!("{} {}", format_padded(id, size), entry.name);
            let item = ListItem::new(line);
            if index == cursor_index {
                item.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("catalog"));
    frame.render_widget(list, area);
}

fn render_detail(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    session: &Session<'_>,
    view_data: &ViewData,
) {
    let size = session.catalog.size();
    let lines: Vec<Line<'_>> = match &view_data.detail {
        DetailPane::Loading(id) => vec![
            Line::from(format!("#{}", format_padded(*id, size))),
            Line::from("loading..."),
        ],
        DetailPane::Ready(record) => {
            let mut lines = vec![
                Line::from(format!("#{}", format_padded(record.id, size))),
                Line::from(format!("name:   {}", record.name)),
                Line::from(format!("height: {} m", record.height_meters)),
                Line::from(format!("weight: {} kg", record.weight_kilograms)),
                Line::from(format!("types:  {}", record.types.join(", "))),
            ];
            if let Some(sprite) = &record.sprite_ref {
                lines.push(Line::from(format!("sprite: {sprite}")));
            }
            lines
        }
        DetailPane::Failed { id, message } => vec![
            Line::from(format!("#{}", format_padded(*id, size))),
            Line::styled(
                format!("detail unavailable: {message}"),
                Style::default().fg(Color::Red),
            ),
        ],
    };

    let pane = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("pokedex"));
    frame.render_widget(pane, area);
}

fn render_status(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState) {
    let hint = match state.mode {
        AppMode::Nav => "h/l or arrows: prev/next  /: search  q: quit",
        AppMode::Search => "enter: jump  tab: complete  esc: cancel",
    };
    let text = match &state.status_line {
        Some(status) => format!("{status}  --  {hint}"),
        None => hint.to_owned(),
    };
    frame.render_widget(Paragraph::new(text), area);
}

fn render_search(frame: &mut ratatui::Frame<'_>, session: &Session<'_>, view_data: &ViewData) {
    let area = popup_area(frame.area(), 40, (SUGGESTION_LIMIT + 3) as u16);
    frame.render_widget(Clear, area);

    let hits = suggestions(&view_data.search.input, session.catalog, SUGGESTION_LIMIT);
    let mut lines = vec![Line::from(format!("> {}", view_data.search.input))];
    for (index, entry) in hits.iter().enumerate() {
        let line = format!("  {}", entry.name);
        if index == view_data.search.cursor {
            lines.push(Line::styled(
                line,
                Style::default().add_modifier(Modifier::REVERSED),
            ));
        } else {
            lines.push(Line::from(line));
        }
    }

    let boxed = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("search"));
    frame.render_widget(boxed, area);
}

fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
