//! Color handling for Sankey charts
//!
//! Colors in a chart source are kept as the text the author wrote (see
//! [`crate::flow`]). The [`Color`] type here wraps the `DynamicColor` type
//! from the color crate and is used wherever a color string needs to be
//! checked against CSS color syntax: configured palettes, the background
//! color and color tokens in chart directives.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "#e5a", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use sankey_core::color::Color;
    ///
    /// let green = Color::new("#548755").unwrap();
    /// let short = Color::new("#e5a").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns `true` if `color_str` is valid CSS color syntax.
    pub fn is_valid(color_str: &str) -> bool {
        DynamicColor::from_str(color_str).is_ok()
    }

    /// Returns the alpha (transparency) component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#548755").is_ok());
        assert!(Color::new("#e5a").is_ok());
        assert!(Color::new("steelblue").is_ok());
        assert!(Color::new("not-a-color").is_err());
    }

    #[test]
    fn test_color_is_valid() {
        assert!(Color::is_valid("#1f77b4"));
        assert!(Color::is_valid("rgb(10, 20, 30)"));
        assert!(!Color::is_valid("#"));
        assert!(!Color::is_valid(""));
    }

    #[test]
    fn test_color_error_message_names_input() {
        let err = Color::new("bogus").unwrap_err();
        assert!(err.contains("`bogus`"), "unexpected message: {err}");
    }

    #[test]
    fn test_color_alpha() {
        let opaque = Color::new("#000000").unwrap();
        assert!((opaque.alpha() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_color_eq_hash() {
        use std::collections::HashSet;

        let color1 = Color::new("red").unwrap();
        let color2 = Color::new("red").unwrap();
        let color3 = Color::new("blue").unwrap();

        assert_eq!(color1, color2);
        assert_ne!(color1, color3);

        let mut set = HashSet::new();
        set.insert(color1);
        assert!(set.contains(&color2));
        assert!(!set.contains(&color3));
    }
}
