//! `embedded-graphics` support, enabled by the `graphics` feature.
//!
//! The controller holds the frame memory, so there is no in-RAM framebuffer:
//! [`DrawTarget`] calls go straight to the bus. Filled primitives map onto
//! hardware rectangle fills; everything else falls back to per-pixel writes.

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::Rectangle,
};

use crate::color::Color;
use crate::driver::Ssd1963;
use crate::interface::{DisplayError, DisplayInterface};

impl<IF: DisplayInterface> OriginDimensions for Ssd1963<IF> {
    fn size(&self) -> Size {
        Size::new(
            u32::from(self.config().width),
            u32::from(self.config().height),
        )
    }
}

impl<IF: DisplayInterface> DrawTarget for Ssd1963<IF> {
    type Color = Rgb565;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (x, y) = match (u16::try_from(point.x), u16::try_from(point.y)) {
                (Ok(x), Ok(y)) => (x, y),
                _ => continue,
            };
            self.draw_pixel_clipped(x, y, Color::from(color))?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let (left, top) = match (u16::try_from(area.top_left.x), u16::try_from(area.top_left.y)) {
            (Ok(x), Ok(y)) => (x, y),
            _ => return Ok(()),
        };
        if area.size.width == 0 || area.size.height == 0 {
            return Ok(());
        }
        let right = left + (area.size.width - 1) as u16;
        let bottom = top + (area.size.height - 1) as u16;
        self.fill_clipped(left, top, right, bottom, Color::from(color))
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_full(Color::from(color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::PrimitiveStyle;

    use crate::config::TY430TFT480272;
    use crate::interface::DisplayInterface;
    use core::cell::RefCell;
    use embedded_hal::delay::DelayNs;
    use std::rc::Rc;
    use std::vec::Vec;

    type PixelCount = Rc<RefCell<u32>>;

    struct CountingInterface {
        pixels: PixelCount,
    }

    impl DisplayInterface for CountingInterface {
        fn cmd(&mut self, _cmd: u8) -> Result<(), DisplayError> {
            Ok(())
        }

        fn cmd_with_data(&mut self, _cmd: u8, _data: &[u8]) -> Result<(), DisplayError> {
            Ok(())
        }

        fn write_pixels(&mut self, pixels: &[u16]) -> Result<(), DisplayError> {
            *self.pixels.borrow_mut() += pixels.len() as u32;
            Ok(())
        }

        fn repeat_pixel(&mut self, _raw: u16, count: u32) -> Result<(), DisplayError> {
            *self.pixels.borrow_mut() += count;
            Ok(())
        }

        fn hard_reset(&mut self, _delay: &mut impl DelayNs) -> Result<(), DisplayError> {
            Ok(())
        }
    }

    fn display(pixels: &PixelCount) -> Ssd1963<CountingInterface> {
        let interface = CountingInterface {
            pixels: pixels.clone(),
        };
        Ssd1963::new(interface, TY430TFT480272)
    }

    #[test]
    fn size_matches_panel() {
        let pixels: PixelCount = Rc::default();
        let d = display(&pixels);
        assert_eq!(d.size(), Size::new(480, 272));
    }

    #[test]
    fn filled_rectangle_uses_hardware_fill() {
        let pixels: PixelCount = Rc::default();
        let mut d = display(&pixels);
        Rectangle::new(Point::new(10, 10), Size::new(20, 5))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
            .draw(&mut d)
            .unwrap();
        assert_eq!(*pixels.borrow(), 100);
    }

    #[test]
    fn out_of_bounds_pixels_are_dropped() {
        let pixels: PixelCount = Rc::default();
        let mut d = display(&pixels);
        let points: Vec<Pixel<Rgb565>> = [
            Pixel(Point::new(-1, 0), Rgb565::RED),
            Pixel(Point::new(0, -5), Rgb565::RED),
            Pixel(Point::new(480, 0), Rgb565::RED),
            Pixel(Point::new(5, 5), Rgb565::RED),
        ]
        .to_vec();
        d.draw_iter(points).unwrap();
        assert_eq!(*pixels.borrow(), 1);
    }

    #[test]
    fn coordinates_past_u16_do_not_wrap_on_screen() {
        let pixels: PixelCount = Rc::default();
        let mut d = display(&pixels);
        // 65541 truncated to u16 would be 5, well inside the panel
        let points: Vec<Pixel<Rgb565>> = [
            Pixel(Point::new(65541, 0), Rgb565::RED),
            Pixel(Point::new(0, 65541), Rgb565::RED),
            Pixel(Point::new(i32::MAX, i32::MAX), Rgb565::RED),
        ]
        .to_vec();
        d.draw_iter(points).unwrap();
        assert_eq!(*pixels.borrow(), 0);
    }

    #[test]
    fn clear_writes_every_pixel() {
        let pixels: PixelCount = Rc::default();
        let mut d = display(&pixels);
        DrawTarget::clear(&mut d, Rgb565::BLACK).unwrap();
        assert_eq!(*pixels.borrow(), 480 * 272);
    }
}
