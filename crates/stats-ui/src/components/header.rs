use crate::themes::Theme;
use ratatui::text::{Line, Span};
use stats_core::formatting::format_count;
use stats_core::models::Platform;

/// Decoration placed either side of the application title.
pub const ACCENT: &str = "◆ ◇ ◆";

/// Dashboard header rendering three lines:
///
/// 1. Application title with accent decorations (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. `[ platforms | N priced games | M players ]`.
pub struct Header<'a> {
    pub platforms: &'a [Platform],
    pub priced_games: usize,
    pub players: usize,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        platforms: &'a [Platform],
        priced_games: usize,
        players: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            platforms,
            priced_games,
            players,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        let platforms = if self.platforms.is_empty() {
            "no platforms".to_string()
        } else {
            self.platforms
                .iter()
                .map(|p| p.display_name())
                .collect::<Vec<_>>()
                .join(", ")
        };

        vec![
            Line::from(vec![
                Span::styled(ACCENT, self.theme.header_accent),
                Span::styled(" GAMING DATA ANALYSIS ", self.theme.header),
                Span::styled(ACCENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(platforms, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(
                    format!("{} priced games", format_count(self.priced_games as u64)),
                    self.theme.value,
                ),
                Span::styled(" | ", self.theme.label),
                Span::styled(
                    format!("{} players", format_count(self.players as u64)),
                    self.theme.value,
                ),
                Span::styled(" ]", self.theme.label),
            ]),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
