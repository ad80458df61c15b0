//! Cyclic color palettes for default node colors.

use thiserror::Error;

use crate::color::Color;

/// The built-in color schemes, selectable by index.
pub const SCHEMES: [&[&str]; 3] = [
    &[
        "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
        "#bcbd22", "#17becf",
    ],
    &[
        "#aec7e8", "#ffbb78", "#98df8a", "#ff9896", "#c5b0d5", "#c49c94", "#f7b6d2", "#c7c7c7",
        "#dbdb8d", "#9edae5",
    ],
    &[
        "#393b79", "#5254a3", "#6b6ecf", "#9c9ede", "#637939", "#8ca252", "#b5cf6b", "#8c6d31",
        "#bd9e39", "#e7ba52",
    ],
];

/// Errors raised when building a palette from user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    #[error("a palette needs at least one color")]
    Empty,

    #[error("palette entry {index}: {message}")]
    InvalidColor { index: usize, message: String },
}

/// An ordered, non-empty, cyclic list of colors.
///
/// # Example
///
/// ```
/// use sankey_core::palette::Palette;
///
/// let palette = Palette::scheme(0);
/// assert_eq!(palette.color(0), "#1f77b4");
/// assert_eq!(palette.color(10), "#1f77b4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// Builds a palette from CSS color strings.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::Empty`] for an empty list and
    /// [`PaletteError::InvalidColor`] for the first entry that is not a
    /// valid CSS color.
    pub fn new<I, S>(colors: I) -> Result<Self, PaletteError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let colors: Vec<String> = colors.into_iter().map(Into::into).collect();
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        if let Some((index, message)) = colors
            .iter()
            .enumerate()
            .find_map(|(index, color)| Color::new(color).err().map(|message| (index, message)))
        {
            return Err(PaletteError::InvalidColor { index, message });
        }
        Ok(Self { colors })
    }

    /// Returns one of the built-in [`SCHEMES`].
    ///
    /// Out-of-range indices wrap around, so every index selects a scheme.
    pub fn scheme(index: usize) -> Self {
        let scheme = SCHEMES[index % SCHEMES.len()];
        Self {
            colors: scheme.iter().map(|color| color.to_string()).collect(),
        }
    }

    /// Returns `palette[index mod len]`.
    pub fn color(&self, index: usize) -> &str {
        &self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; a palette cannot be empty.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::scheme(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles() {
        let palette = Palette::new(["red", "green", "blue"]).unwrap();
        assert_eq!(palette.color(0), "red");
        assert_eq!(palette.color(2), "blue");
        assert_eq!(palette.color(3), "red");
        assert_eq!(palette.color(7), "green");
    }

    #[test]
    fn test_palette_rejects_empty() {
        let empty: [&str; 0] = [];
        assert_eq!(Palette::new(empty), Err(PaletteError::Empty));
    }

    #[test]
    fn test_palette_rejects_invalid_color() {
        let err = Palette::new(["#1f77b4", "nope"]).unwrap_err();
        assert!(matches!(err, PaletteError::InvalidColor { index: 1, .. }));
    }

    #[test]
    fn test_builtin_schemes_are_valid() {
        for (index, scheme) in SCHEMES.iter().enumerate() {
            let palette = Palette::new(scheme.iter().copied());
            assert!(palette.is_ok(), "scheme {index} invalid: {palette:?}");
        }
    }

    #[test]
    fn test_scheme_index_wraps() {
        assert_eq!(Palette::scheme(3), Palette::scheme(0));
        assert_eq!(Palette::scheme(1).color(0), "#aec7e8");
        assert_eq!(Palette::scheme(2).color(9), "#e7ba52");
    }

    #[test]
    fn test_default_palette() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 10);
        assert!(!palette.is_empty());
    }
}
