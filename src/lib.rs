//! SSD1963 TFT-LCD Controller Driver
//!
//! Drives SSD1963-based boards such as the TechToys 4.3" 480x272 and
//! 5"/7" 800x480 panels over an Intel-8080 style parallel host bus.
//!
//! The controller owns 1215KB of frame memory and scans it out to the glass
//! itself, so the host never holds a framebuffer: drawing means programming
//! a window into the column/page address registers and streaming 565 pixel
//! words. The frame memory is taller than one frame, which this driver
//! exploits for multiple off-screen pages and for scroll-register double
//! buffering where a buffer swap is a single register write.
//!
//! ## Architecture
//!
//! - **[`driver::Ssd1963`]** holds the drawing state (color, clip region,
//!   active page, double-buffer bookkeeping) and issues controller commands
//! - **[`interface::DisplayInterface`]** is the transport seam;
//!   [`interface::ParallelInterface`] bit-bangs it over `embedded-hal` pins
//! - **[`config::PanelConfig`]** carries per-glass geometry and sync timing
//! - **[`image`]** decodes packed 1/4/8/16bpp bitmaps for
//!   [`driver::Ssd1963::put_image`]
//!
//! ## Usage
//!
//! ```rust, ignore
//! use ssd1963::prelude::*;
//! use ssd1963::interface::{Generic8BitBus, ParallelInterface};
//!
//! // 1. Wire up the 8080 bus from GPIO pins
//! let bus = Generic8BitBus::new((d0, d1, d2, d3, d4, d5, d6, d7));
//! let interface = ParallelInterface::new(bus, dc, wr, cs, rst);
//!
//! // 2. Create and initialize the driver for the attached glass
//! let mut display = Ssd1963::new(interface, TY430TFT480272);
//! display.init(&mut delay)?;
//! display.set_backlight(0xFF)?;
//!
//! // 3. Draw
//! display.set_color(Color::BLUE);
//! display.clear()?;
//! display.set_color(Color::WHITE);
//! display.bar(100, 60, 379, 211)?;
//!
//! // 4. Or draw through embedded-graphics (feature "graphics")
//! Circle::new(Point::new(200, 100), 50)
//!     .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
//!     .draw(&mut display)?;
//! ```
//!
//! With double buffering, draw a whole frame and then present it:
//!
//! ```rust, ignore
//! display.switch_on_double_buffering();
//! loop {
//!     draw_scene(&mut display)?;
//!     display.update_display_now()?;
//! }
//! ```
//!
#![no_std]
#![deny(missing_docs)]
#![allow(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

#[cfg(test)]
extern crate std;

mod cmd;
pub mod color;
pub mod config;
pub mod driver;
#[cfg(feature = "graphics")]
mod graphics;
pub mod image;
pub mod page;

mod flag;

/// Maximum display height this driver supports
pub const MAX_HEIGHT: u16 = 480;

/// Maximum display width this driver supports
pub const MAX_WIDTH: u16 = 864;

pub mod interface;

/// Useful exports
pub mod prelude {
    pub use crate::color::Color;
    pub use crate::config::{PanelConfig, TY430TFT480272, TY500TFT800480, TY700TFT800480};
    pub use crate::driver::Ssd1963;
    pub use crate::image::{BitmapReader, FlashBitmap};
}
