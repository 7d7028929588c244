//! Application state and TUI event loop.
//!
//! [`App`] owns the theme, the selected question tab and the finished
//! [`Summaries`]. The loop is synchronous; callers that run inside an async
//! runtime should move it onto a blocking thread.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};

use stats_data::aggregator::Summaries;

use crate::charts;
use crate::components::header::Header;
use crate::themes::Theme;

// ── Tab ───────────────────────────────────────────────────────────────────────

/// One analytical question per tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    PriceByPlatform,
    Releases,
    Genres,
    PriceByGenre,
    CreationYears,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::PriceByPlatform,
        Tab::Releases,
        Tab::Genres,
        Tab::PriceByGenre,
        Tab::CreationYears,
    ];

    pub fn index(self) -> usize {
        match self {
            Tab::PriceByPlatform => 0,
            Tab::Releases => 1,
            Tab::Genres => 2,
            Tab::PriceByGenre => 3,
            Tab::CreationYears => 4,
        }
    }

    /// Short tab label, e.g. `"Q1 Prices"`.
    pub fn label(self) -> &'static str {
        match self {
            Tab::PriceByPlatform => "Q1 Prices",
            Tab::Releases => "Q2 Releases",
            Tab::Genres => "Q3 Genres",
            Tab::PriceByGenre => "Q4 Genre prices",
            Tab::CreationYears => "Q5 Accounts",
        }
    }

    pub fn question(self) -> &'static str {
        match self {
            Tab::PriceByPlatform => "How are prices distributed across platforms?",
            Tab::Releases => "How did the number of releases evolve over time?",
            Tab::Genres => "What are the most common genres on each platform?",
            Tab::PriceByGenre => "How do prices vary by genre and platform?",
            Tab::CreationYears => "Which years have the most accounts created?",
        }
    }

    /// How the answer is derived, shown under the question.
    pub fn method(self) -> &'static str {
        match self {
            Tab::PriceByPlatform => "Mean latest price of every priced game, grouped by platform.",
            Tab::Releases => "Priced games with a parseable release date, counted per year and platform.",
            Tab::Genres => "First listed genre per game; overall top genres and each platform's own ranking.",
            Tab::PriceByGenre => "Mean price per platform and genre, rare combinations filtered out.",
            Tab::CreationYears => "Player accounts counted by the year their profile was created.",
        }
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }

    /// Tab selected by a `1`-`5` key press.
    pub fn from_digit(c: char) -> Option<Tab> {
        let n = c.to_digit(10)? as usize;
        Tab::ALL.get(n.checked_sub(1)?).copied()
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard.
pub struct App {
    pub theme: Theme,
    pub tab: Tab,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    pub summaries: Summaries,
}

impl App {
    pub fn new(theme_name: &str, summaries: Summaries) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            tab: Tab::PriceByPlatform,
            should_quit: false,
            summaries,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until `q`, `Esc` or `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the loop never
    /// blocks indefinitely on input.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Apply one key press to the application state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => self.tab = self.tab.next(),
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => self.tab = self.tab.previous(),
            KeyCode::Char(c) => {
                if let Some(tab) = Tab::from_digit(c) {
                    self.tab = tab;
                }
            }
            _ => {}
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

        let meta = &self.summaries.metadata;
        let header = Header::new(&meta.platforms, meta.priced_games, meta.players, &self.theme);
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), chunks[0]);

        let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.label()).collect::<Vec<_>>())
            .select(self.tab.index())
            .style(self.theme.tab)
            .highlight_style(self.theme.tab_active)
            .divider(" | ")
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.table_border),
            );
        frame.render_widget(tabs, chunks[1]);

        let intro = vec![
            Line::from(Span::styled(
                format!("Q{}: {}", self.tab.index() + 1, self.tab.question()),
                self.theme.header,
            )),
            Line::from(Span::styled(self.tab.method(), self.theme.dim)),
            Line::from(self.status_spans()),
        ];
        frame.render_widget(Paragraph::new(Text::from(intro)), chunks[2]);

        let area = chunks[3];
        match self.tab {
            Tab::PriceByPlatform => {
                charts::render_price_by_platform(frame, area, &self.summaries, &self.theme)
            }
            Tab::Releases => charts::render_releases(frame, area, &self.summaries, &self.theme),
            Tab::Genres => charts::render_genres(frame, area, &self.summaries, &self.theme),
            Tab::PriceByGenre => {
                charts::render_price_by_genre(frame, area, &self.summaries, &self.theme)
            }
            Tab::CreationYears => {
                charts::render_creation_years(frame, area, &self.summaries, &self.theme)
            }
        }

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "←/→ or Tab: switch question · 1-5: jump · q: quit",
                self.theme.dim,
            ))),
            chunks[4],
        );
    }

    /// Data-quality notes shown above every chart.
    fn status_spans(&self) -> Vec<Span<'static>> {
        let meta = &self.summaries.metadata;
        let mut spans = vec![Span::styled(
            format!("{} games without a price excluded", meta.dropped_missing_price),
            self.theme.label,
        )];
        if meta.rejected_prices > 0 {
            spans.push(Span::styled(" · ", self.theme.separator));
            spans.push(Span::styled(
                format!("{} unreadable price cells skipped", meta.rejected_prices),
                self.theme.warning,
            ));
        }
        spans
    }
}

/// Run the dashboard for `summaries` until the user quits.
pub fn run_dashboard(theme_name: &str, summaries: Summaries) -> io::Result<()> {
    App::new(theme_name, summaries).run()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use stats_data::aggregator::{
        CreationYears, GenrePriceTable, SummaryMetadata, TopGenres,
    };

    fn summaries() -> Summaries {
        Summaries {
            metadata: SummaryMetadata {
                dropped_missing_price: 4,
                rejected_prices: 2,
                ..Default::default()
            },
            price_by_platform: vec![],
            releases: vec![],
            genre_counts: vec![],
            top_genres: TopGenres::default(),
            top_genres_per_platform: vec![],
            price_by_genre: GenrePriceTable::default(),
            creation_years: CreationYears::Unavailable,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ── Tab ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_tab_cycle_wraps() {
        assert_eq!(Tab::CreationYears.next(), Tab::PriceByPlatform);
        assert_eq!(Tab::PriceByPlatform.previous(), Tab::CreationYears);
        assert_eq!(Tab::Releases.next(), Tab::Genres);
    }

    #[test]
    fn test_tab_from_digit() {
        assert_eq!(Tab::from_digit('1'), Some(Tab::PriceByPlatform));
        assert_eq!(Tab::from_digit('5'), Some(Tab::CreationYears));
        assert_eq!(Tab::from_digit('0'), None);
        assert_eq!(Tab::from_digit('6'), None);
        assert_eq!(Tab::from_digit('x'), None);
    }

    #[test]
    fn test_tab_index_matches_all() {
        for (i, tab) in Tab::ALL.iter().enumerate() {
            assert_eq!(tab.index(), i);
        }
    }

    // ── handle_key ────────────────────────────────────────────────────────────

    #[test]
    fn test_app_creation_defaults() {
        let app = App::new("dark", summaries());
        assert_eq!(app.tab, Tab::PriceByPlatform);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_handle_key_navigation() {
        let mut app = App::new("dark", summaries());
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.tab, Tab::Releases);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Genres);
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.tab, Tab::Releases);
        app.handle_key(key(KeyCode::Char('4')));
        assert_eq!(app.tab, Tab::PriceByGenre);
        app.handle_key(key(KeyCode::Char('9')));
        assert_eq!(app.tab, Tab::PriceByGenre);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_handle_key_quit() {
        let mut app = App::new("dark", summaries());
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = App::new("dark", summaries());
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_plain_c_does_not_quit() {
        let mut app = App::new("dark", summaries());
        app.handle_key(key(KeyCode::Char('c')));
        assert!(!app.should_quit);
    }

    // ── render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_every_tab() {
        let mut app = App::new("classic", summaries());
        for tab in Tab::ALL {
            app.tab = tab;
            let out = screen(&app);
            assert!(out.contains("GAMING DATA ANALYSIS"));
            assert!(out.contains(tab.question()));
        }
    }

    #[test]
    fn test_render_status_mentions_rejected_prices() {
        let app = App::new("dark", summaries());
        let out = screen(&app);
        assert!(out.contains("4 games without a price excluded"));
        assert!(out.contains("2 unreadable price cells skipped"));
    }
}
