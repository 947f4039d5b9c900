//! Colour theme for the painel viewer.
//!
//! Themes are TOML files; the default one is embedded with [`include_str!`]
//! so the viewer works without any files on disk. Series colours are not part
//! of the theme: they come from the render plan (`[render] palette` or the
//! chart's own colour) and are turned into terminal colours by
//! [`parse_color`].

use config::{Config, File, FileFormat};
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

const DEFAULT_THEME_SRC: &str = include_str!("themes/default.toml");

// ---------------------------------------------------------------------------
// Raw (serde) types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct RawStyle {
    fg: Option<String>,
    bg: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    dim: bool,
    #[serde(default)]
    italic: bool,
}

impl RawStyle {
    fn into_style(self) -> Style {
        let mut style = Style::default();
        if let Some(c) = self.fg.as_deref().and_then(parse_color) {
            style = style.fg(c);
        }
        if let Some(c) = self.bg.as_deref().and_then(parse_color) {
            style = style.bg(c);
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        style
    }
}

#[derive(Debug, Deserialize)]
struct RawBorders {
    focused: RawStyle,
    unfocused: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawList {
    selected: RawStyle,
    #[serde(default)]
    muted: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawText {
    title: RawStyle,
    description: RawStyle,
    #[serde(default)]
    placeholder: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawChart {
    axis: RawStyle,
    label: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    borders: RawBorders,
    list: RawList,
    text: RawText,
    chart: RawChart,
}

// ---------------------------------------------------------------------------
// Public Theme type
// ---------------------------------------------------------------------------

/// Resolved viewer styles.
#[derive(Debug, Clone)]
pub struct Theme {
    pub border_focused: Style,
    pub border_unfocused: Style,
    /// Highlighted row of a focused list.
    pub list_selected: Style,
    /// Secondary list text (dates, counts).
    pub list_muted: Style,
    pub title: Style,
    pub description: Style,
    /// "Nothing to show" messages.
    pub placeholder: Style,
    pub axis: Style,
    pub label: Style,
}

impl Theme {
    /// Load the embedded default theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_default() -> Self {
        Self::from_toml_str(DEFAULT_THEME_SRC).expect("embedded default theme must be valid TOML")
    }

    /// Parse a theme from a TOML string. Unknown keys are ignored.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            border_focused: raw.borders.focused.into_style(),
            border_unfocused: raw.borders.unfocused.into_style(),
            list_selected: raw.list.selected.into_style(),
            list_muted: raw.list.muted.into_style(),
            title: raw.text.title.into_style(),
            description: raw.text.description.into_style(),
            placeholder: raw.text.placeholder.into_style(),
            axis: raw.chart.axis.into_style(),
            label: raw.chart.label.into_style(),
        })
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            self.border_focused
        } else {
            self.border_unfocused
        }
    }

    /// Foreground style for a series or slice colour from the render plan.
    /// Unparseable or missing colours fall back to the label style.
    pub fn series_style(&self, color: Option<&str>) -> Style {
        match color.and_then(parse_color) {
            Some(c) => Style::default().fg(c),
            None => self.label,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a colour into a ratatui [`Color`].
///
/// Accepts named terminal colours (case-insensitive), `#rrggbb` and
/// `indexed:N`.
pub fn parse_color(s: &str) -> Option<Color> {
    match s.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "darkgray" | "dark_grey" | "darkgrey" => Some(Color::DarkGray),
        "white" => Some(Color::White),
        s if s.starts_with('#') && s.len() == 7 => {
            let r = u8::from_str_radix(s.get(1..3)?, 16).ok()?;
            let g = u8::from_str_radix(s.get(3..5)?, 16).ok()?;
            let b = u8::from_str_radix(s.get(5..7)?, 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        s if s.starts_with("indexed:") => {
            let n: u8 = s["indexed:".len()..].parse().ok()?;
            Some(Color::Indexed(n))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_loads() {
        let theme = Theme::load_default();
        assert_ne!(theme.border_focused, Style::default());
        assert_ne!(theme.list_selected, Style::default());
        assert_ne!(theme.axis, Style::default());
    }

    #[test]
    fn series_style_uses_plan_colour() {
        let theme = Theme::load_default();
        assert_eq!(
            theme.series_style(Some("#10b981")),
            Style::default().fg(Color::Rgb(0x10, 0xb9, 0x81))
        );
        assert_eq!(theme.series_style(None), theme.label);
        assert_eq!(theme.series_style(Some("verde")), theme.label);
    }

    #[test]
    fn parse_hex_color() {
        assert_eq!(parse_color("#FF0080"), Some(Color::Rgb(255, 0, 128)));
    }

    #[test]
    fn parse_multibyte_hex_does_not_panic() {
        assert_eq!(parse_color("#ééé"), None);
    }

    #[test]
    fn parse_indexed_color() {
        assert_eq!(parse_color("indexed:42"), Some(Color::Indexed(42)));
    }

    #[test]
    fn parse_unknown_color_returns_none() {
        assert_eq!(parse_color("chartreuse"), None);
    }
}
