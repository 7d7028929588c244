use crate::themes::Theme;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Visual configuration of a [`HorizontalBar`].
#[derive(Debug, Clone, Copy)]
pub struct BarConfig {
    /// Columns reserved for the label in front of the bar.
    pub label_width: usize,
    /// Columns of the bar itself at the maximum value.
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            label_width: 18,
            width: 40,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: ' ',
        }
    }
}

// ── HorizontalBar ────────────────────────────────────────────────────────────

/// A labelled bar whose length is `value / max` of the configured width.
///
/// Renders as `label │████████      value`.
pub struct HorizontalBar<'a> {
    pub label: &'a str,
    pub value: f64,
    pub max: f64,
    /// Text shown after the bar, e.g. a formatted count.
    pub value_text: String,
    pub style: Style,
    pub theme: &'a Theme,
    pub config: BarConfig,
}

impl<'a> HorizontalBar<'a> {
    pub fn new(label: &'a str, value: f64, max: f64, style: Style, theme: &'a Theme) -> Self {
        Self {
            label,
            value,
            max,
            value_text: String::new(),
            style,
            theme,
            config: BarConfig::default(),
        }
    }

    pub fn with_value_text(mut self, text: impl Into<String>) -> Self {
        self.value_text = text.into();
        self
    }

    pub fn with_config(mut self, config: BarConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of filled columns, clamped to the bar width.
    pub fn filled(&self) -> u16 {
        if self.max <= 0.0 || self.value <= 0.0 {
            return 0;
        }
        let ratio = (self.value / self.max).min(1.0);
        ((ratio * self.config.width as f64).round() as u16).max(1)
    }

    pub fn to_line(&self) -> Line<'a> {
        let filled = self.filled();
        let empty = self.config.width.saturating_sub(filled);

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        Line::from(vec![
            Span::styled(fit_label(self.label, self.config.label_width), self.theme.label),
            Span::styled(" │", self.theme.separator),
            Span::styled(filled_str, self.style),
            Span::styled(empty_str, self.theme.bar_empty),
            Span::styled(format!(" {}", self.value_text), self.theme.bar_label),
        ])
    }
}

/// Pad or truncate `label` to exactly `width` display columns.
///
/// Truncated labels end with `…`. Wide characters are never split.
pub fn fit_label(label: &str, width: usize) -> String {
    let label_width = label.width();
    if label_width <= width {
        return format!("{}{}", label, " ".repeat(width - label_width));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in label.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_filled_proportional() {
        let theme = Theme::dark();
        let bar = HorizontalBar::new("Action", 50.0, 100.0, theme.info, &theme);
        assert_eq!(bar.filled(), 20);
    }

    #[test]
    fn test_filled_clamped_and_zero() {
        let theme = Theme::dark();
        assert_eq!(
            HorizontalBar::new("x", 500.0, 100.0, theme.info, &theme).filled(),
            40
        );
        assert_eq!(
            HorizontalBar::new("x", 0.0, 100.0, theme.info, &theme).filled(),
            0
        );
        assert_eq!(
            HorizontalBar::new("x", 5.0, 0.0, theme.info, &theme).filled(),
            0
        );
    }

    #[test]
    fn test_tiny_values_still_visible() {
        let theme = Theme::dark();
        let bar = HorizontalBar::new("x", 1.0, 10_000.0, theme.info, &theme);
        assert_eq!(bar.filled(), 1);
    }

    #[test]
    fn test_to_line_layout() {
        let theme = Theme::dark();
        let line = HorizontalBar::new("Rpg", 10.0, 10.0, theme.info, &theme)
            .with_value_text("10")
            .with_config(BarConfig {
                label_width: 6,
                width: 4,
                ..Default::default()
            })
            .to_line();
        assert_eq!(line.spans.len(), 5);
        assert_eq!(text(&line), "Rpg    │████ 10");
    }

    #[test]
    fn test_fit_label_pads_short() {
        assert_eq!(fit_label("abc", 5), "abc  ");
    }

    #[test]
    fn test_fit_label_truncates_long() {
        assert_eq!(fit_label("Massively Multiplayer", 8), "Massive…");
        assert_eq!(fit_label("Massively Multiplayer", 8).width(), 8);
    }

    #[test]
    fn test_fit_label_wide_chars() {
        let out = fit_label("日本語ゲーム", 6);
        assert_eq!(out.width(), 6);
        assert!(out.ends_with('…') || out.ends_with(' '));
    }
}
