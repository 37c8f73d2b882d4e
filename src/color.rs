//! RGB565 color words as streamed to the controller.

/// A 16-bit RGB565 color word.
///
/// The SSD1963 is configured for the 565 pixel format by this driver, so a
/// pixel is always one of these words on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color(u16);

impl Color {
    /// Black (all channels zero)
    pub const BLACK: Color = Color(0x0000);
    /// White (all channels full)
    pub const WHITE: Color = Color(0xFFFF);
    /// Pure red
    pub const RED: Color = Color(0xF800);
    /// Pure green
    pub const GREEN: Color = Color(0x07E0);
    /// Pure blue
    pub const BLUE: Color = Color(0x001F);

    /// Wrap a raw 565 word
    pub const fn from_raw(raw: u16) -> Self {
        Color(raw)
    }

    /// The raw 565 word
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Pack 8-bit channels into 565, truncating the low bits
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color((((r as u16) & 0xF8) << 8) | (((g as u16) & 0xFC) << 3) | ((b as u16) >> 3))
    }
}

#[cfg(feature = "graphics")]
mod graphics {
    use super::Color;
    use embedded_graphics::pixelcolor::raw::RawU16;
    use embedded_graphics::pixelcolor::Rgb565;
    use embedded_graphics::prelude::*;

    impl From<Rgb565> for Color {
        fn from(c: Rgb565) -> Self {
            Color::from_raw(c.into_storage())
        }
    }

    impl From<Color> for Rgb565 {
        fn from(c: Color) -> Self {
            RawU16::new(c.raw()).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_packing() {
        assert_eq!(Color::rgb(0xFF, 0x00, 0x00), Color::RED);
        assert_eq!(Color::rgb(0x00, 0xFF, 0x00), Color::GREEN);
        assert_eq!(Color::rgb(0x00, 0x00, 0xFF), Color::BLUE);
        assert_eq!(Color::rgb(0xFF, 0xFF, 0xFF), Color::WHITE);
    }

    #[cfg(feature = "graphics")]
    #[test]
    fn rgb565_round_trip() {
        use embedded_graphics::pixelcolor::Rgb565;
        use embedded_graphics::prelude::*;

        let eg = Rgb565::new(0x1F, 0x2A, 0x05);
        let c: Color = eg.into();
        assert_eq!(c.raw(), eg.into_storage());
        assert_eq!(Rgb565::from(c), eg);
    }
}
