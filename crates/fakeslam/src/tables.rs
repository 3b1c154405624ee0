//! Recognised colour names and image encodings.
//!
//! Both tables are fixed at compile time. Their option lists are sorted once,
//! on first use, and are read-only afterwards.

use std::sync::LazyLock;

/// A non-premultiplied RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

const COLORS: [(&str, Rgba); 4] = [
    ("white", Rgba::new(255, 255, 255, 255)),
    ("red", Rgba::new(255, 0, 0, 255)),
    ("green", Rgba::new(0, 255, 0, 255)),
    ("blue", Rgba::new(0, 0, 255, 255)),
];

const IMAGE_TYPES: [&str; 2] = ["jpeg", "png"];

static COLOR_OPTIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| sorted(COLORS.map(|(n, _)| n)));

static IMAGE_TYPE_OPTIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| sorted(IMAGE_TYPES));

fn sorted<const N: usize>(names: [&'static str; N]) -> Vec<&'static str> {
    let mut names = names.to_vec();
    names.sort_unstable();
    names
}

/// Looks up a colour by name.
pub fn color(name: &str) -> Option<Rgba> {
    COLORS.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
}

/// All colour names, sorted.
pub fn color_options() -> &'static [&'static str] {
    &COLOR_OPTIONS
}

pub fn is_image_type(name: &str) -> bool {
    IMAGE_TYPES.iter().any(|t| *t == name)
}

/// All image encodings, sorted.
pub fn image_type_options() -> &'static [&'static str] {
    &IMAGE_TYPE_OPTIONS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_are_sorted() {
        assert_eq!(color_options(), ["blue", "green", "red", "white"]);
        assert_eq!(image_type_options(), ["jpeg", "png"]);
    }

    #[test]
    fn every_option_resolves() {
        for name in color_options() {
            assert!(color(name).is_some(), "{name}");
        }
        for name in image_type_options() {
            assert!(is_image_type(name));
        }
    }

    #[test]
    fn lookups_reject_unknown_names() {
        assert_eq!(color("red"), Some(Rgba::new(255, 0, 0, 255)));
        assert_eq!(color("Red"), None);
        assert!(!is_image_type("gif"));
    }
}
