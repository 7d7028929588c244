//! One render function per dashboard question.
//!
//! Every function draws a finished summary table into `area`; none of them
//! computes anything beyond layout and scaling.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    symbols,
    text::{Line, Span, Text},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph,
        Row, Table, Wrap,
    },
    Frame,
};

use stats_core::formatting::{format_count, format_price, percentage};
use stats_core::models::Platform;
use stats_data::aggregator::{CreationYears, GenreCount, Summaries};

use crate::components::bar::{fit_label, BarConfig, HorizontalBar};
use crate::themes::Theme;

// ── Q1: price by platform ─────────────────────────────────────────────────────

/// Bar chart of the mean price per platform.
pub fn render_price_by_platform(frame: &mut Frame, area: Rect, summaries: &Summaries, theme: &Theme) {
    let rows = &summaries.price_by_platform;
    if rows.is_empty() {
        render_empty(frame, area, " Mean price by platform ", "No priced games found.", theme);
        return;
    }

    let bars: Vec<Bar> = rows
        .iter()
        .map(|r| {
            Bar::default()
                .value(to_cents(r.mean_price))
                .text_value(format_price(r.mean_price))
                .label(Line::from(r.platform.display_name()))
                .style(theme.platform_style(r.platform))
                .value_style(theme.value)
        })
        .collect();

    let chunks = Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).split(area);

    let chart = BarChart::default()
        .block(bordered(" Mean price by platform (USD) ", theme))
        .bar_width(bar_width(chunks[0].width, bars.len(), 16))
        .bar_gap(3)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, chunks[0]);

    let counts: Vec<String> = rows
        .iter()
        .map(|r| format!("{} {}", r.platform.display_name(), format_count(r.n_games as u64)))
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" Priced games: {}", counts.join(" · ")),
            theme.dim,
        ))),
        chunks[1],
    );
}

// ── Q2: releases over time ────────────────────────────────────────────────────

/// Line chart of release counts per year, one series per platform.
pub fn render_releases(frame: &mut Frame, area: Rect, summaries: &Summaries, theme: &Theme) {
    let rows = &summaries.releases;
    if rows.is_empty() {
        render_empty(
            frame,
            area,
            " Releases per year ",
            "No priced game has a parseable release date.",
            theme,
        );
        return;
    }

    let series: Vec<(Platform, Vec<(f64, f64)>)> = [Platform::PlayStation, Platform::Steam, Platform::Xbox]
        .into_iter()
        .map(|platform| {
            let points = rows
                .iter()
                .filter(|r| r.platform == platform)
                .map(|r| (r.release_year as f64, r.count as f64))
                .collect::<Vec<_>>();
            (platform, points)
        })
        .filter(|(_, points)| !points.is_empty())
        .collect();

    let min_year = rows.iter().map(|r| r.release_year).min().unwrap_or(0);
    let max_year = rows.iter().map(|r| r.release_year).max().unwrap_or(0);
    let max_count = rows.iter().map(|r| r.count).max().unwrap_or(0);
    let (x_lo, x_hi) = if min_year == max_year {
        (min_year as f64 - 1.0, max_year as f64 + 1.0)
    } else {
        (min_year as f64, max_year as f64)
    };
    let y_hi = (max_count as f64 * 1.1).max(1.0);

    let datasets: Vec<Dataset> = series
        .iter()
        .map(|(platform, points)| {
            Dataset::default()
                .name(platform.display_name())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(theme.platform_style(*platform))
                .data(points)
        })
        .collect();

    let mid_year = (min_year + max_year) / 2;
    let chart = Chart::new(datasets)
        .block(bordered(" Releases per year by platform ", theme))
        .x_axis(
            Axis::default()
                .title("Release year")
                .style(theme.label)
                .bounds([x_lo, x_hi])
                .labels(vec![
                    min_year.to_string(),
                    mid_year.to_string(),
                    max_year.to_string(),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Games")
                .style(theme.label)
                .bounds([0.0, y_hi])
                .labels(vec![
                    "0".to_string(),
                    format_count((y_hi / 2.0).round() as u64),
                    format_count(y_hi.round() as u64),
                ]),
        );
    frame.render_widget(chart, area);
}

// ── Q3: genres ────────────────────────────────────────────────────────────────

/// Grouped horizontal bars for the overall top genres, next to one ranked
/// table per platform.
pub fn render_genres(frame: &mut Frame, area: Rect, summaries: &Summaries, theme: &Theme) {
    let top = &summaries.top_genres;
    if top.ranking.is_empty() {
        render_empty(frame, area, " Most common genres ", "No genre data available.", theme);
        return;
    }

    let columns =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).split(area);

    // Grouped bars: one block of lines per genre, one bar per platform.
    let max = top.rows.iter().map(|r| r.count).max().unwrap_or(0) as f64;
    let config = BarConfig {
        label_width: 14,
        width: columns[0].width.saturating_sub(30).max(10),
        ..Default::default()
    };
    let platforms = &summaries.metadata.platforms;
    let mut lines: Vec<Line> = Vec::new();
    for genre in &top.ranking {
        lines.push(Line::from(Span::styled(
            format!("{} ({})", genre.genre, format_count(genre.total as u64)),
            theme.value,
        )));
        for &platform in platforms {
            let count = top.count(platform, &genre.genre);
            lines.push(
                HorizontalBar::new(
                    platform.display_name(),
                    count as f64,
                    max,
                    theme.platform_style(platform),
                    theme,
                )
                .with_value_text(format_count(count as u64))
                .with_config(config)
                .to_line(),
            );
        }
    }
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(bordered(
            &format!(" Top {} genres across platforms ", top.ranking.len()),
            theme,
        )),
        columns[0],
    );

    // Per-platform rankings.
    let per_platform = &summaries.top_genres_per_platform;
    let shown: Vec<Platform> = platforms
        .iter()
        .copied()
        .filter(|p| per_platform.iter().any(|r| r.platform == *p))
        .collect();
    if shown.is_empty() {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, shown.len() as u32); shown.len()];
    let cells = Layout::vertical(constraints).split(columns[1]);
    for (platform, cell) in shown.iter().zip(cells.iter()) {
        let rows: Vec<&GenreCount> = per_platform.iter().filter(|r| r.platform == *platform).collect();
        render_genre_table(frame, *cell, *platform, &rows, theme);
    }
}

fn render_genre_table(
    frame: &mut Frame,
    area: Rect,
    platform: Platform,
    rows: &[&GenreCount],
    theme: &Theme,
) {
    let header = Row::new(["#", "Genre", "Games"].map(|h| Cell::from(h).style(theme.table_header)));
    let genre_width = area.width.saturating_sub(16) as usize;
    let body: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(fit_label(&r.genre, genre_width)),
                Cell::from(format_count(r.count as u64)),
            ])
            .style(theme.row_style(i))
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(8),
        Constraint::Length(8),
    ];
    let table = Table::new(body, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.table_border)
            .title(Span::styled(
                format!(" {} ", platform.display_name()),
                theme.platform_style(platform),
            )),
    );
    frame.render_widget(table, area);
}

// ── Q4: price by genre ────────────────────────────────────────────────────────

/// Ranked table of mean price per platform and genre.
pub fn render_price_by_genre(frame: &mut Frame, area: Rect, summaries: &Summaries, theme: &Theme) {
    let table = &summaries.price_by_genre;
    if table.rows.is_empty() {
        render_empty(
            frame,
            area,
            " Mean price by genre and platform ",
            &format!(
                "No platform and genre combination has at least {} priced games.",
                table.min_games
            ),
            theme,
        );
        return;
    }

    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).split(area);

    let order = table.genre_order.join(" › ");
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Genres by average price: ", theme.label),
            Span::styled(order, theme.value),
        ]))
        .wrap(Wrap { trim: true })
        .block(bordered(" Genre order ", theme)),
        chunks[0],
    );

    let header = Row::new(
        ["Rank", "Genre", "Platform", "Mean price", "Games"]
            .map(|h| Cell::from(h).style(theme.table_header)),
    );
    let body: Vec<Row> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(r.genre.clone()),
                Cell::from(Span::styled(
                    r.platform.display_name(),
                    theme.platform_style(r.platform),
                )),
                Cell::from(format_price(r.mean_price)),
                Cell::from(format_count(r.n_games as u64)),
            ])
            .style(theme.row_style(i))
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Min(16),
        Constraint::Length(13),
        Constraint::Length(12),
        Constraint::Length(8),
    ];
    frame.render_widget(
        Table::new(body, widths).header(header).block(bordered(
            &format!(
                " Mean price by genre and platform (at least {} games) ",
                table.min_games
            ),
            theme,
        )),
        chunks[1],
    );
}

// ── Q5: account creation years ────────────────────────────────────────────────

/// Bar chart of accounts per creation year, or a warning when the players
/// data has no creation column.
pub fn render_creation_years(frame: &mut Frame, area: Rect, summaries: &Summaries, theme: &Theme) {
    let years = match &summaries.creation_years {
        CreationYears::Unavailable => {
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "The 'created' column was not found in the players data.",
                    theme.warning,
                )),
                Line::from(Span::styled(
                    "Account creation years cannot be plotted.",
                    theme.dim,
                )),
            ];
            frame.render_widget(
                Paragraph::new(Text::from(text)).block(bordered(" Account creation years ", theme)),
                area,
            );
            return;
        }
        CreationYears::Available(years) => years,
    };

    if years.is_empty() {
        render_empty(
            frame,
            area,
            " Account creation years ",
            "No player account has a parseable creation date.",
            theme,
        );
        return;
    }

    let total: usize = years.iter().map(|y| y.count).sum();
    let bars: Vec<Bar> = years
        .iter()
        .map(|y| {
            Bar::default()
                .value(y.count as u64)
                .text_value(format_count(y.count as u64))
                .label(Line::from(short_year(y.year, years.len())))
                .style(theme.info)
                .value_style(theme.value)
        })
        .collect();

    let peak = years
        .iter()
        .max_by(|a, b| a.count.cmp(&b.count).then_with(|| b.year.cmp(&a.year)));

    let chunks = Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).split(area);
    let chart = BarChart::default()
        .block(bordered(" Accounts created per year ", theme))
        .bar_width(bar_width(chunks[0].width, bars.len(), 6))
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, chunks[0]);

    if let Some(peak) = peak {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!(
                    " {} accounts · peak {} with {} ({:.1}%)",
                    format_count(total as u64),
                    peak.year,
                    format_count(peak.count as u64),
                    percentage(peak.count as f64, total as f64, 1)
                ),
                theme.dim,
            ))),
            chunks[1],
        );
    }
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Placeholder shown when a summary table has no rows.
pub fn render_empty(frame: &mut Frame, area: Rect, title: &str, message: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.warning)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(bordered(title, theme)),
        area,
    );
}

fn bordered<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(Span::styled(title.to_string(), theme.header))
}

/// Widest bar that fits `n` bars (plus gaps) into `width`, capped at `max`.
pub fn bar_width(width: u16, n: usize, max: u16) -> u16 {
    if n == 0 {
        return max;
    }
    let inner = width.saturating_sub(2) as usize;
    let per_bar = (inner / n).saturating_sub(1);
    (per_bar as u16).clamp(1, max)
}

/// Prices are charted in cents so the integer bar values keep precision.
fn to_cents(price: f64) -> u64 {
    (price.max(0.0) * 100.0).round() as u64
}

/// Two-digit year labels once there are too many bars for full years.
fn short_year(year: i32, n: usize) -> String {
    if n > 15 {
        format!("'{:02}", year.rem_euclid(100))
    } else {
        year.to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
