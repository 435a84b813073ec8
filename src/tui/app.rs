//! Main TUI application logic.

use super::{bot, dashboard, events, logs, settings, trading, LogBuffer, Route, Theme};
use crate::types::{ChartTimeframe, Section, TradeAction};
use crate::AppState;
use crossterm::{
    event::KeyCode,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
    Frame, Terminal,
};
use std::{io, sync::Arc, time::Duration};
use tracing::debug;

/// How long a notification stays in the status bar.
const NOTIFICATION_TTL_SECS: i64 = 5;

/// Action requested by a key press, run against the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    StartBot,
    StopBot,
    ManualTrade {
        symbol: String,
        side: TradeAction,
        amount: String,
    },
    SaveSettings {
        api_key: String,
        api_secret: String,
        use_testnet: bool,
    },
    TestConnection,
    ChartSymbol(String),
    ChartTimeframe(ChartTimeframe),
}

impl Command {
    /// Run the command. Outcomes surface as notifications.
    pub async fn execute(self, state: &AppState) {
        let outcome = match self {
            Command::StartBot => state.app.start_trading_bot().map(|_| ()),
            Command::StopBot => {
                state.app.stop_trading_bot();
                Ok(())
            }
            Command::ManualTrade { symbol, side, amount } => state
                .app
                .execute_manual_trade(&symbol, side.as_str(), &amount)
                .await
                .map(|_| ()),
            Command::SaveSettings {
                api_key,
                api_secret,
                use_testnet,
            } => state
                .app
                .save_api_settings(&api_key, &api_secret, use_testnet)
                .await
                .map(|_| ()),
            Command::TestConnection => state.app.test_api_connection().await.map(|_| ()),
            Command::ChartSymbol(symbol) => {
                state.charts.change_symbol(&symbol);
                Ok(())
            }
            Command::ChartTimeframe(timeframe) => {
                state.charts.change_timeframe(timeframe);
                Ok(())
            }
        };

        if let Err(e) = outcome {
            debug!("TUI command failed: {}", e);
        }
    }
}

/// Main TUI application.
pub struct App {
    current_route: Route,
    /// Controller section last mirrored into `current_route`.
    synced_section: Section,
    app_state: AppState,
    log_buffer: Arc<LogBuffer>,
    theme: Theme,
    trade_form: trading::TradeForm,
    settings_form: settings::SettingsForm,
    log_filter: logs::LogFilter,
    should_quit: bool,
}

impl App {
    pub fn new(app_state: AppState, log_buffer: Arc<LogBuffer>) -> Self {
        let settings_form = settings::SettingsForm::from_credentials(&app_state.app.cached_credentials());
        let synced_section = app_state.app.current_section();
        Self {
            current_route: Route::from(synced_section),
            synced_section,
            app_state,
            log_buffer,
            theme: Theme::default(),
            trade_form: trading::TradeForm::default(),
            settings_form,
            log_filter: logs::LogFilter::default(),
            should_quit: false,
        }
    }

    pub fn current_route(&self) -> Route {
        self.current_route
    }

    /// Handle an event, returning a command to run if one was requested.
    pub fn handle_event(&mut self, event: events::Event) -> Option<Command> {
        match event {
            events::Event::Key(key) => {
                if events::is_force_quit(&key) {
                    self.should_quit = true;
                    return None;
                }

                // Text entry swallows every other key
                if self.settings_form.is_editing() {
                    return settings::handle_event(&key, &mut self.settings_form);
                }

                if events::is_quit(&key) {
                    self.should_quit = true;
                    return None;
                }

                for route in Route::all() {
                    if events::is_key(&key, KeyCode::Char(route.key())) {
                        self.navigate(route);
                        return None;
                    }
                }

                match self.current_route {
                    Route::Dashboard => dashboard::handle_event(&key, &self.app_state),
                    Route::Trading => trading::handle_event(&key, &mut self.trade_form),
                    Route::Bot => bot::handle_event(&key),
                    Route::Settings => settings::handle_event(&key, &mut self.settings_form),
                    Route::Logs => {
                        logs::handle_event(&key, &mut self.log_filter, &self.log_buffer);
                        None
                    }
                }
            }
            events::Event::Tick => {
                self.sync_route();
                None
            }
            events::Event::Resize(_, _) => None,
        }
    }

    fn navigate(&mut self, route: Route) {
        self.current_route = route;
        if let Some(section) = route.section() {
            self.app_state.app.show_section(section);
            self.synced_section = section;
        }
        if route == Route::Settings {
            self.settings_form = settings::SettingsForm::from_credentials(&self.app_state.app.cached_credentials());
        }
    }

    /// Follow section changes made by the controller (e.g. a redirect to settings).
    fn sync_route(&mut self) {
        let section = self.app_state.app.current_section();
        if section != self.synced_section {
            self.synced_section = section;
            self.current_route = Route::from(section);
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Render the TUI.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Status bar
            ])
            .split(area);

        self.render_tabs(frame, chunks[0]);

        match self.current_route {
            Route::Dashboard => dashboard::render(frame, chunks[1], &self.app_state, &self.theme),
            Route::Trading => trading::render(frame, chunks[1], &self.app_state, &self.theme, &self.trade_form),
            Route::Bot => bot::render(frame, chunks[1], &self.app_state, &self.theme),
            Route::Settings => settings::render(frame, chunks[1], &self.theme, &self.settings_form),
            Route::Logs => logs::render(frame, chunks[1], &self.theme, &self.log_buffer, self.log_filter),
        }

        self.render_status_bar(frame, chunks[2]);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let routes = Route::all();
        let titles: Vec<Line> = routes
            .iter()
            .map(|r| {
                Line::from(vec![
                    Span::styled(format!("[{}] ", r.key()), self.theme.muted()),
                    Span::raw(r.name().to_string()),
                ])
            })
            .collect();

        let selected = routes
            .iter()
            .position(|r| *r == self.current_route)
            .unwrap_or(0);

        let bot_state = self.app_state.app.bot_status();
        let title = format!("TradeSense | Bot: {}", bot_state.as_str());

        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title(title))
            .select(selected)
            .style(self.theme.tab_inactive())
            .highlight_style(self.theme.tab_active());

        frame.render_widget(tabs, area);
    }

    /// Latest notification while fresh, key help otherwise.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let ttl = chrono::Duration::seconds(NOTIFICATION_TTL_SECS);
        let text = match self.app_state.notifications.latest() {
            Some(n) if n.is_visible(chrono::Utc::now(), ttl) => Line::from(vec![Span::styled(
                n.message.clone(),
                self.theme.notification(n.notification_type),
            )]),
            _ => Line::from(vec![
                Span::styled("q", self.theme.muted()),
                Span::raw(" or "),
                Span::styled("Ctrl+C", self.theme.muted()),
                Span::raw(" to quit | "),
                Span::styled("1-5", self.theme.muted()),
                Span::raw(" to switch views"),
            ]),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border());
        frame.render_widget(block, area);

        let inner = Rect {
            x: area.x + 2,
            y: area.y + 1,
            width: area.width.saturating_sub(4),
            height: 1,
        };
        frame.render_widget(text, inner);
    }
}

/// Run the TUI until the user quits.
pub async fn run_tui(app_state: AppState, log_buffer: Arc<LogBuffer>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(app_state.clone(), log_buffer);
    let mut event_handler = events::EventHandler::new(Duration::from_millis(250));

    let result = loop {
        if let Err(e) = terminal.draw(|f| app.render(f)) {
            break Err(e);
        }

        if let Some(event) = event_handler.next().await {
            if let Some(command) = app.handle_event(event) {
                let state = app_state.clone();
                tokio::spawn(async move { command.execute(&state).await });
            }
        }

        if app.should_quit() {
            break Ok(());
        }
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
