//! Configuration types for Sankey chart rendering.
//!
//! This module provides configuration structures that control chart size,
//! styling, parsing and value formatting. All types implement
//! [`serde::Deserialize`] so they can be loaded from a TOML file; every
//! section and field is optional and falls back to its default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`ChartConfig`] - Canvas width, height and label font size.
//! - [`StyleConfig`] - Color scheme or custom palette, background, link opacity.
//! - [`ParseSettings`] - What the parser does with non-numeric values.
//! - [`CurrencyFormat`] - Symbol and precision of value labels.
//!
//! # Example
//!
//! ```
//! # use sankey::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.chart().width(), 1200);
//! assert!(config.style().palette().is_ok());
//! ```

use serde::Deserialize;

use sankey_core::{
    color::Color,
    flow::ValuePolicy,
    geometry::Bounds,
    palette::{Palette, PaletteError},
};
use sankey_parser::ParseConfig;

pub use sankey_core::currency::CurrencyFormat;

/// Space kept free below the chart for the bottom labels.
const BOTTOM_MARGIN: f32 = 10.0;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    chart: ChartConfig,

    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    parse: ParseSettings,

    #[serde(default)]
    currency: CurrencyFormat,
}

impl AppConfig {
    pub fn new(
        chart: ChartConfig,
        style: StyleConfig,
        parse: ParseSettings,
        currency: CurrencyFormat,
    ) -> Self {
        Self {
            chart,
            style,
            parse,
            currency,
        }
    }

    pub fn chart(&self) -> &ChartConfig {
        &self.chart
    }

    pub fn chart_mut(&mut self) -> &mut ChartConfig {
        &mut self.chart
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut StyleConfig {
        &mut self.style
    }

    pub fn parse(&self) -> &ParseSettings {
        &self.parse
    }

    pub fn currency(&self) -> &CurrencyFormat {
        &self.currency
    }
}

/// Canvas size and label font size, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    width: u32,
    height: u32,
    font_size: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
            font_size: 12,
        }
    }
}

impl ChartConfig {
    pub fn new(width: u32, height: u32, font_size: u32) -> Self {
        Self {
            width,
            height,
            font_size,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn set_width(&mut self, width: u32) -> &mut Self {
        self.width = width;
        self
    }

    pub fn set_height(&mut self, height: u32) -> &mut Self {
        self.height = height;
        self
    }

    pub fn set_font_size(&mut self, font_size: u32) -> &mut Self {
        self.font_size = font_size;
        self
    }

    /// The rectangle the layout may fill: the canvas minus a one pixel
    /// border and the bottom margin.
    pub fn extent(&self) -> Bounds {
        Bounds::new(
            0.0,
            0.0,
            self.width as f32,
            (self.height as f32 - BOTTOM_MARGIN).max(0.0),
        )
        .inset(1.0)
    }
}

/// Visual styling configuration for rendered charts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Index into the built-in color schemes. Wraps around.
    color_scheme: usize,

    /// Custom palette; replaces the color scheme when set.
    palette: Option<Vec<String>>,

    background_color: Option<String>,

    link_opacity: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            color_scheme: 0,
            palette: None,
            background_color: None,
            link_opacity: 0.5,
        }
    }
}

impl StyleConfig {
    pub fn color_scheme(&self) -> usize {
        self.color_scheme
    }

    pub fn set_color_scheme(&mut self, scheme: usize) -> &mut Self {
        self.color_scheme = scheme;
        self
    }

    pub fn set_palette(&mut self, colors: Vec<String>) -> &mut Self {
        self.palette = Some(colors);
        self
    }

    pub fn set_background_color(&mut self, color: impl Into<String>) -> &mut Self {
        self.background_color = Some(color.into());
        self
    }

    /// Opacity of link strokes, clamped to `0.0..=1.0`.
    pub fn link_opacity(&self) -> f32 {
        self.link_opacity.clamp(0.0, 1.0)
    }

    /// Returns the palette used for nodes without an explicit color.
    ///
    /// # Errors
    ///
    /// Returns an error if the custom palette is empty or holds an entry
    /// that is not a CSS color.
    pub fn palette(&self) -> Result<Palette, PaletteError> {
        match &self.palette {
            Some(colors) => Palette::new(colors),
            None => Ok(Palette::scheme(self.color_scheme)),
        }
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }
}

/// Parser settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseSettings {
    value_policy: ValuePolicy,
}

impl ParseSettings {
    pub fn new(value_policy: ValuePolicy) -> Self {
        Self { value_policy }
    }

    pub fn value_policy(&self) -> ValuePolicy {
        self.value_policy
    }
}

impl From<ParseSettings> for ParseConfig {
    fn from(settings: ParseSettings) -> Self {
        ParseConfig::new(settings.value_policy)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.chart(), &ChartConfig::new(1200, 700, 12));
        assert_eq!(config.style().color_scheme(), 0);
        assert_approx_eq!(f32, config.style().link_opacity(), 0.5);
        assert_eq!(config.parse().value_policy(), ValuePolicy::PassThrough);
        assert_eq!(config.currency().symbol(), "$");
        assert_eq!(config.currency().decimals(), 2);
    }

    #[test]
    fn test_extent() {
        let extent = ChartConfig::default().extent();
        assert_approx_eq!(f32, extent.min_x(), 1.0);
        assert_approx_eq!(f32, extent.min_y(), 1.0);
        assert_approx_eq!(f32, extent.max_x(), 1199.0);
        assert_approx_eq!(f32, extent.max_y(), 689.0);
    }

    #[test]
    fn test_scheme_palette() {
        let mut style = StyleConfig::default();
        style.set_color_scheme(1);
        assert_eq!(style.palette().unwrap(), Palette::scheme(1));
    }

    #[test]
    fn test_custom_palette_overrides_scheme() {
        let mut style = StyleConfig::default();
        style
            .set_color_scheme(2)
            .set_palette(vec!["red".to_string(), "#00f".to_string()]);
        let palette = style.palette().unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.color(3), "#00f");
    }

    #[test]
    fn test_invalid_custom_palette() {
        let mut style = StyleConfig::default();
        style.set_palette(vec!["red".to_string(), "nope".to_string()]);
        assert!(matches!(
            style.palette(),
            Err(PaletteError::InvalidColor { index: 1, .. })
        ));
    }

    #[test]
    fn test_background_color() {
        let mut style = StyleConfig::default();
        assert_eq!(style.background_color(), Ok(None));

        style.set_background_color("white");
        assert!(style.background_color().unwrap().is_some());

        style.set_background_color("not-a-color");
        assert!(style.background_color().is_err());
    }

    #[test]
    fn test_link_opacity_clamped() {
        let style = StyleConfig {
            link_opacity: 3.0,
            ..StyleConfig::default()
        };
        assert_approx_eq!(f32, style.link_opacity(), 1.0);
    }
}
