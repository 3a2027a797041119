//! Chart themes and font resolution
//!
//! A [`Theme`] is a plain value handed to every render call. Nothing here
//! mutates shared drawing state, so themes can render side by side.

use citegraph_common::{CiteGraphError, Result};
use citegraph_config::{ThemeSettings, ThemesConfig};
use plotters::style::{FontDesc, FontFamily, FontStyle, RGBColor};
use tracing::debug;

/// 24-bit colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#RRGGBB`
    pub fn from_hex(value: &str) -> Result<Self> {
        let invalid = || CiteGraphError::validation(format!("invalid hex colour '{}'", value));

        let hex = value.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Self(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl From<Rgb> for RGBColor {
    fn from(c: Rgb) -> Self {
        RGBColor(c.0, c.1, c.2)
    }
}

/// Series colours for multi-line charts
pub const TAB10: [Rgb; 10] = [
    Rgb(31, 119, 180),  // Blue
    Rgb(255, 127, 14),  // Orange
    Rgb(44, 160, 44),   // Green
    Rgb(214, 39, 40),   // Red
    Rgb(148, 103, 189), // Purple
    Rgb(140, 86, 75),   // Brown
    Rgb(227, 119, 194), // Pink
    Rgb(127, 127, 127), // Gray
    Rgb(188, 189, 34),  // Olive
    Rgb(23, 190, 207),  // Cyan
];

/// Colours for one rendering of every chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub background: Rgb,
    pub text: Rgb,
    pub edge: Rgb,
    /// Colour of single-series charts
    pub line: Rgb,
    pub grid: Rgb,
    /// Colours cycled through by multi-series charts
    pub palette: Vec<Rgb>,
}

impl Theme {
    pub fn white() -> Self {
        Self {
            name: "white".to_string(),
            background: Rgb(0xFF, 0xFF, 0xFF),
            text: Rgb(0x00, 0x00, 0x00),
            edge: Rgb(0x00, 0x00, 0x00),
            line: Rgb(0x00, 0x80, 0x00),
            grid: Rgb(0xD3, 0xD3, 0xD3),
            palette: TAB10.to_vec(),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Rgb(0x1E, 0x1E, 0x1E),
            text: Rgb(0xE0, 0xE0, 0xE0),
            edge: Rgb(0xE0, 0xE0, 0xE0),
            line: Rgb(0x4C, 0xAF, 0x50),
            grid: Rgb(0x44, 0x44, 0x44),
            palette: TAB10.to_vec(),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Rgb(0xF5, 0xF5, 0xF5),
            text: Rgb(0x33, 0x33, 0x33),
            edge: Rgb(0x66, 0x66, 0x66),
            line: Rgb(0x2E, 0x7D, 0x32),
            grid: Rgb(0xDD, 0xDD, 0xDD),
            palette: TAB10.to_vec(),
        }
    }

    /// Build a theme from configuration; the palette is always tab10
    pub fn from_settings(settings: &ThemeSettings) -> Result<Self> {
        Ok(Self {
            name: settings.name.clone(),
            background: Rgb::from_hex(&settings.background_color)?,
            text: Rgb::from_hex(&settings.text_color)?,
            edge: Rgb::from_hex(&settings.edge_color)?,
            line: Rgb::from_hex(&settings.line_color)?,
            grid: Rgb::from_hex(&settings.grid_color)?,
            palette: TAB10.to_vec(),
        })
    }

    /// Colour of the `index`-th series
    pub fn series_color(&self, index: usize, series_count: usize) -> Rgb {
        if series_count <= 1 || self.palette.is_empty() {
            self.line
        } else {
            self.palette[index % self.palette.len()]
        }
    }
}

/// Named set of available themes
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    themes: Vec<Theme>,
}

impl ThemeCatalog {
    /// The built-in `white`, `dark` and `light` themes
    pub fn builtin() -> Self {
        Self {
            themes: vec![Theme::white(), Theme::dark(), Theme::light()],
        }
    }

    /// Built-in themes plus the custom ones from configuration
    ///
    /// A custom theme that reuses a built-in name replaces it.
    pub fn from_config(config: &ThemesConfig) -> Result<Self> {
        let mut catalog = Self::builtin();
        for settings in &config.custom {
            let theme = Theme::from_settings(settings)?;
            match catalog.themes.iter_mut().find(|t| t.name == theme.name) {
                Some(existing) => *existing = theme,
                None => catalog.themes.push(theme),
            }
        }
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Result<&Theme> {
        self.themes.iter().find(|t| t.name == name).ok_or_else(|| {
            CiteGraphError::validation_field(format!("unknown theme '{}'", name), "theme")
        })
    }

    /// Resolve a list of names, preserving order
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Theme>> {
        names
            .iter()
            .map(|n| self.get(n.as_ref()).cloned())
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(|t| t.name.as_str())
    }
}

/// Reports which font families can be drawn with
pub trait FontProbe {
    fn is_available(&self, family: &str) -> bool;

    /// The subset of `candidates` this probe can draw with, order kept
    fn available(&self, candidates: &[String]) -> Vec<String> {
        candidates
            .iter()
            .filter(|c| self.is_available(c))
            .cloned()
            .collect()
    }
}

/// Probe backed by plotters' own font loader
#[derive(Debug, Clone, Copy, Default)]
pub struct PlottersFontProbe;

impl FontProbe for PlottersFontProbe {
    fn is_available(&self, family: &str) -> bool {
        let font = FontDesc::new(FontFamily::Name(family), 12.0, FontStyle::Normal);
        font.box_size("Ag").is_ok()
    }
}

/// First candidate found in `available` (case-insensitive), else `fallback`
pub fn resolve_font(candidates: &[String], available: &[String], fallback: &str) -> String {
    let chosen = candidates
        .iter()
        .find(|c| available.iter().any(|a| a.eq_ignore_ascii_case(c)))
        .cloned()
        .unwrap_or_else(|| fallback.to_string());
    debug!("Resolved chart font family '{}'", chosen);
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct FixedProbe(HashSet<&'static str>);

    impl FontProbe for FixedProbe {
        fn is_available(&self, family: &str) -> bool {
            self.0.contains(family)
        }
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#1E1E1E").unwrap(), Rgb(30, 30, 30));
        assert_eq!(Rgb::from_hex("#4caf50").unwrap(), Rgb(76, 175, 80));
        assert!(Rgb::from_hex("1E1E1E").is_err());
        assert!(Rgb::from_hex("#1E1E").is_err());
        assert!(Rgb::from_hex("#GG0000").is_err());
        assert!(Rgb::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = ThemeCatalog::builtin();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["white", "dark", "light"]);
        assert_eq!(catalog.get("dark").unwrap().background, Rgb(0x1E, 0x1E, 0x1E));
        assert_eq!(catalog.get("white").unwrap().line, Rgb(0, 128, 0));
    }

    #[test]
    fn test_unknown_theme() {
        let err = ThemeCatalog::builtin().get("neon").unwrap_err();
        assert!(matches!(err, CiteGraphError::Validation { .. }));
    }

    #[test]
    fn test_custom_theme_extends_catalog() {
        let config = ThemesConfig {
            selected: names(&["sepia", "white"]),
            custom: vec![ThemeSettings {
                name: "sepia".to_string(),
                background_color: "#F4ECD8".to_string(),
                text_color: "#5B4636".to_string(),
                edge_color: "#5B4636".to_string(),
                line_color: "#8B4513".to_string(),
                grid_color: "#D8CBB0".to_string(),
            }],
        };

        let catalog = ThemeCatalog::from_config(&config).unwrap();
        let selected = catalog.select(&config.selected).unwrap();
        assert_eq!(selected[0].name, "sepia");
        assert_eq!(selected[0].line, Rgb(0x8B, 0x45, 0x13));
        assert_eq!(selected[1], Theme::white());
    }

    #[test]
    fn test_series_color() {
        let theme = Theme::light();
        assert_eq!(theme.series_color(0, 1), theme.line);
        assert_eq!(theme.series_color(1, 3), TAB10[1]);
        assert_eq!(theme.series_color(11, 12), TAB10[1]);
    }

    #[test]
    fn test_resolve_font_prefers_first_available_candidate() {
        let candidates = names(&["Humor Sans", "Comic Neue", "xkcd"]);
        assert_eq!(
            resolve_font(&candidates, &names(&["xkcd", "comic neue"]), "sans-serif"),
            "Comic Neue"
        );
        assert_eq!(resolve_font(&candidates, &[], "sans-serif"), "sans-serif");
    }

    #[test]
    fn test_probe_filters_candidates() {
        let probe = FixedProbe(["xkcd"].into_iter().collect());
        let candidates = names(&["Humor Sans", "xkcd"]);
        let available = probe.available(&candidates);
        assert_eq!(available, names(&["xkcd"]));
        assert_eq!(resolve_font(&candidates, &available, "sans-serif"), "xkcd");
    }
}
