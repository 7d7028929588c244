use ratatui::style::{Color, Modifier, Style};
use stats_core::models::Platform;

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Detect the terminal background from `COLORFGBG` (`"fg;bg"`).
///
/// Background colours 0 to 6 count as dark, 7 and above as light. Absent or
/// unparseable values fall back to `Dark`.
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .map_or(BackgroundType::Dark, background_from_colorfgbg)
}

fn background_from_colorfgbg(val: &str) -> BackgroundType {
    match val.split(';').next_back().and_then(|bg| bg.parse::<u8>().ok()) {
        Some(bg) if bg > 6 => BackgroundType::Light,
        _ => BackgroundType::Dark,
    }
}

// ── Palette ──────────────────────────────────────────────────────────────────

/// The handful of colours a theme is derived from.
#[derive(Debug, Clone, Copy)]
struct Palette {
    /// Titles and table headers.
    primary: Color,
    /// Decorations and the active tab.
    accent: Color,
    /// Regular foreground.
    fg: Color,
    /// Secondary text.
    soft: Color,
    /// Borders, separators and empty bar cells.
    muted: Color,
    warning: Color,
    /// PlayStation, Steam, Xbox.
    platforms: [Color; 3],
    bold: bool,
}

/// Every style used by the dashboard.
#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    pub dim: Style,
    pub label: Style,
    pub value: Style,
    pub info: Style,
    pub warning: Style,

    pub tab: Style,
    pub tab_active: Style,

    pub bar_empty: Style,
    pub bar_label: Style,

    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,

    pub playstation: Color,
    pub steam: Color,
    pub xbox: Color,
}

impl Theme {
    fn from_palette(p: Palette) -> Self {
        let strong = |color: Color| {
            let style = Style::new().fg(color);
            if p.bold {
                style.add_modifier(Modifier::BOLD)
            } else {
                style
            }
        };
        let [playstation, steam, xbox] = p.platforms;

        Self {
            header: strong(p.primary),
            header_accent: Style::new().fg(p.accent),
            separator: Style::new().fg(p.muted),

            dim: Style::new().fg(p.muted),
            label: Style::new().fg(p.soft),
            value: strong(p.fg),
            info: Style::new().fg(p.primary),
            warning: Style::new().fg(p.warning),

            tab: Style::new().fg(p.soft),
            tab_active: strong(p.accent),

            bar_empty: Style::new().fg(p.muted),
            bar_label: Style::new().fg(p.soft),

            table_header: strong(p.primary),
            table_border: Style::new().fg(p.muted),
            table_row: Style::new().fg(p.fg),
            table_row_alt: Style::new().fg(p.soft),

            playstation,
            steam,
            xbox,
        }
    }

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self::from_palette(Palette {
            primary: Color::Cyan,
            accent: Color::Yellow,
            fg: Color::White,
            soft: Color::Gray,
            muted: Color::DarkGray,
            warning: Color::Yellow,
            platforms: [Color::LightBlue, Color::LightCyan, Color::LightGreen],
            bold: true,
        })
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self::from_palette(Palette {
            primary: Color::Blue,
            accent: Color::Magenta,
            fg: Color::Black,
            soft: Color::DarkGray,
            muted: Color::Gray,
            warning: Color::Red,
            platforms: [Color::Blue, Color::Black, Color::Green],
            bold: true,
        })
    }

    /// Basic 8-colour ANSI palette without bold modifiers.
    pub fn classic() -> Self {
        Self::from_palette(Palette {
            primary: Color::Cyan,
            accent: Color::Yellow,
            fg: Color::White,
            soft: Color::Gray,
            muted: Color::DarkGray,
            warning: Color::Yellow,
            platforms: [Color::Blue, Color::Cyan, Color::Green],
            bold: false,
        })
    }

    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// Theme by `--theme` name; unknown names auto-detect.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    /// Series colour of a platform in charts and legends.
    pub fn platform_color(&self, platform: Platform) -> Color {
        match platform {
            Platform::PlayStation => self.playstation,
            Platform::Steam => self.steam,
            Platform::Xbox => self.xbox,
        }
    }

    pub fn platform_style(&self, platform: Platform) -> Style {
        Style::new().fg(self.platform_color(platform))
    }

    /// Zebra striping for table rows.
    pub fn row_style(&self, index: usize) -> Style {
        if index % 2 == 0 {
            self.table_row
        } else {
            self.table_row_alt
        }
    }
}
