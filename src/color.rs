//! Pixel color for monochrome OLED panels
//!
//! The SH1106 drives one bit per pixel: a set bit lights the pixel (in
//! normal, non-inverted display mode), a cleared bit leaves it dark.
//!
//! ## Example
//!
//! ```
//! use sh1106::Color;
//!
//! assert_eq!(Color::On.fill_byte(), 0xFF);
//! assert_eq!(Color::Off.fill_byte(), 0x00);
//! assert_eq!(Color::from(true), Color::On);
//! ```

/// Pixel colors supported by the SH1106
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Pixel dark (bit cleared)
    #[default]
    Off,
    /// Pixel lit (bit set)
    On,
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU1;
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::BinaryColor> for Color {
    fn from(color: embedded_graphics_core::pixelcolor::BinaryColor) -> Self {
        match color {
            embedded_graphics_core::pixelcolor::BinaryColor::Off => Self::Off,
            embedded_graphics_core::pixelcolor::BinaryColor::On => Self::On,
        }
    }
}

impl From<bool> for Color {
    fn from(lit: bool) -> Self {
        if lit { Self::On } else { Self::Off }
    }
}

impl Color {
    /// Whether the pixel is lit
    pub fn is_on(self) -> bool {
        self == Self::On
    }

    /// Get the byte value that paints eight pixels of this color
    ///
    /// ## Example
    ///
    /// ```
    /// use sh1106::Color;
    ///
    /// assert_eq!(Color::On.fill_byte(), 0xFF);
    /// assert_eq!(Color::Off.fill_byte(), 0x00);
    /// ```
    pub fn fill_byte(self) -> u8 {
        match self {
            Self::Off => 0x00,
            Self::On => 0xFF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_off() {
        assert_eq!(Color::default(), Color::Off);
        assert!(!Color::default().is_on());
    }

    #[test]
    fn test_from_bool() {
        assert_eq!(Color::from(true), Color::On);
        assert_eq!(Color::from(false), Color::Off);
    }

    #[cfg(feature = "graphics")]
    #[test]
    fn test_from_binary_color() {
        use embedded_graphics_core::pixelcolor::BinaryColor;

        assert_eq!(Color::from(BinaryColor::On), Color::On);
        assert_eq!(Color::from(BinaryColor::Off), Color::Off);
    }
}
