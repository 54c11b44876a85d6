//! Color palette shared by the paddle, ball and blocks
//!
//! Entities store palette *indices*. The palette can shrink at runtime, so
//! every lookup clamps the index into the current length instead of failing.

use serde::{Deserialize, Serialize};

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex form, e.g. `#ff0000`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Every color the palette can grow to, in the order they are unlocked
pub const BASE_COLORS: [Rgb; 6] = [
    Rgb::new(0xff, 0x00, 0x00), // red
    Rgb::new(0x00, 0xff, 0x00), // green
    Rgb::new(0x00, 0x00, 0xff), // blue
    Rgb::new(0xff, 0xff, 0x00), // yellow
    Rgb::new(0xff, 0x80, 0x00), // orange
    Rgb::new(0x80, 0x00, 0xff), // purple
];

/// Palette size used when nothing else is configured
pub const DEFAULT_COLOR_COUNT: usize = 4;

/// Bounded, ordered prefix of [`BASE_COLORS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    len: usize,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(DEFAULT_COLOR_COUNT)
    }
}

impl Palette {
    /// Largest palette available
    pub const CAPACITY: usize = BASE_COLORS.len();

    /// Create a palette of `len` colors (clamped to `1..=CAPACITY`)
    pub fn new(len: usize) -> Self {
        Self {
            len: len.clamp(1, Self::CAPACITY),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// A palette always holds at least one color
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Grow or shrink the palette
    pub fn resize(&mut self, len: usize) {
        *self = Self::new(len);
    }

    /// Clamp a stored index into the current palette
    #[inline]
    pub fn clamp(&self, index: usize) -> usize {
        index.min(self.len - 1)
    }

    /// Index after `index`, wrapping to 0
    #[inline]
    pub fn next(&self, index: usize) -> usize {
        (self.clamp(index) + 1) % self.len
    }

    /// Color at `index` (clamped)
    pub fn color(&self, index: usize) -> Rgb {
        BASE_COLORS[self.clamp(index)]
    }

    /// Whether two stored indices name the same color in the current palette
    pub fn same_color(&self, a: usize, b: usize) -> bool {
        self.clamp(a) == self.clamp(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_length() {
        assert_eq!(Palette::new(0).len(), 1);
        assert_eq!(Palette::new(3).len(), 3);
        assert_eq!(Palette::new(100).len(), Palette::CAPACITY);
    }

    #[test]
    fn test_next_wraps() {
        let palette = Palette::new(4);
        assert_eq!(palette.next(0), 1);
        assert_eq!(palette.next(3), 0);
    }

    #[test]
    fn test_shrink_clamps_stale_index() {
        let mut palette = Palette::new(4);
        let stored = 3;
        palette.resize(2);
        assert_eq!(palette.clamp(stored), 1);
        assert_eq!(palette.color(stored), BASE_COLORS[1]);
        assert!(palette.same_color(stored, 1));
        // Next from a stale index stays in range
        assert_eq!(palette.next(stored), 0);
    }

    #[test]
    fn test_hex() {
        assert_eq!(BASE_COLORS[0].to_hex(), "#ff0000");
        assert_eq!(BASE_COLORS[3].to_hex(), "#ffff00");
    }
}
