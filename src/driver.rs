//! Driver for the SSD1963 LCD controller.
//!
//! Every drawing primitive reduces to the same wire protocol: program a
//! rectangular window into the column/page address registers, issue
//! WRITE_MEMORY_START once, then stream pixel words that the controller
//! auto-increments into the window. The driver owns all the state the
//! protocol needs (current color, clip region, active page, double-buffer
//! bookkeeping, GPIO shadow) and is meant to be driven by a single control
//! thread; it provides no internal locking.

pub use display_interface::DisplayError;

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::cmd::Cmd;
use crate::color::Color;
use crate::config::PanelConfig;
use crate::flag::Flag;
use crate::image::{decode_row, BitmapHeader, BitmapReader, MAX_LINE_PIXELS};
use crate::interface::DisplayInterface;
use crate::page::{page_origin, DoubleBuffering};

const fn hi(v: u16) -> u8 {
    (v >> 8) as u8
}

const fn lo(v: u16) -> u8 {
    v as u8
}

/// Clip rectangle applied to pixel and bar operations.
#[derive(Clone, Copy, Debug)]
struct ClipRegion {
    enabled: bool,
    left: u16,
    top: u16,
    right: u16,
    bottom: u16,
}

/// A configured SSD1963 with a hardware interface.
pub struct Ssd1963<IF> {
    interface: IF,
    config: PanelConfig,
    color: Color,
    clip: ClipRegion,
    active_page: u8,
    visual_page: u8,
    buffers: DoubleBuffering,
    gpio_shadow: u8,
}

impl<IF: DisplayInterface> Ssd1963<IF> {
    /// Create the driver from a bus interface and a panel description.
    ///
    /// The controller is untouched until [`init`](Self::init) runs.
    pub fn new(interface: IF, config: PanelConfig) -> Self {
        debug!(
            "creating new Ssd1963 instance ({}x{})",
            config.width, config.height
        );
        Ssd1963 {
            interface,
            config,
            color: Color::BLACK,
            clip: ClipRegion {
                enabled: false,
                left: 0,
                top: 0,
                right: config.max_x(),
                bottom: config.max_y(),
            },
            active_page: 0,
            visual_page: 0,
            buffers: DoubleBuffering::new(),
            gpio_shadow: 0,
        }
    }

    /// Reset and initialize the controller for the configured panel:
    /// PLL lock, pixel clock, sync timing, 565 pixel format, host bus width,
    /// GPIO setup, then display on.
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), DisplayError> {
        debug!("initializing ssd1963");
        self.interface.hard_reset(delay)?;

        // program and lock the PLL, then switch the system clock onto it
        self.interface.cmd_with_data(
            Cmd::SET_PLL_MN,
            &[
                self.config.pll_mult,
                self.config.pll_div,
                Flag::PLL_MN_EFFECTIVE,
            ],
        )?;
        self.interface
            .cmd_with_data(Cmd::SET_PLL, &[Flag::PLL_ENABLE])?;
        delay.delay_ms(1);
        self.interface
            .cmd_with_data(Cmd::SET_PLL, &[Flag::PLL_AS_SYSCLK])?;

        self.interface.cmd(Cmd::SOFT_RESET)?;
        delay.delay_ms(10);

        // pixel clock: 20-bit LCDC_FPR, high bits first
        let fpr = self.config.lshift_mult;
        self.interface.cmd_with_data(
            Cmd::SET_LSHIFT_FREQ,
            &[((fpr >> 16) & 0x0F) as u8, (fpr >> 8) as u8, fpr as u8],
        )?;

        let max_x = self.config.max_x();
        let max_y = self.config.max_y();
        self.interface.cmd_with_data(
            Cmd::SET_PANEL_MODE,
            &[
                self.config.panel_data_width,
                self.config.panel_sync_mode,
                hi(max_x),
                lo(max_x),
                hi(max_y),
                lo(max_y),
                0x00, // RGB sequence
            ],
        )?;

        let ht = self.config.total_horizontal() - 1;
        let hps = self.config.horizontal_sync_start() - 1;
        let hpw = self.config.h_pulse_width - 1;
        self.interface.cmd_with_data(
            Cmd::SET_HORI_PERIOD,
            &[
                hi(ht),
                lo(ht),
                hi(hps),
                lo(hps),
                hpw as u8,
                0x00,
                0x00,
                0x00,
            ],
        )?;

        let vt = self.config.total_vertical() - 1;
        let vsp = self.config.vertical_sync_start() - 1;
        let vpw = self.config.v_pulse_width - 1;
        self.interface.cmd_with_data(
            Cmd::SET_VERT_PERIOD,
            &[hi(vt), lo(vt), hi(vsp), lo(vsp), vpw as u8, 0x00, 0x00],
        )?;

        self.interface
            .cmd_with_data(Cmd::SET_PIXEL_FORMAT, &[Flag::PIXEL_FORMAT_16BPP])?;
        self.interface.cmd_with_data(
            Cmd::SET_PIXEL_DATA_INTERFACE,
            &[self.config.host_bus.data_interface_flag()],
        )?;

        if let Some(mask) = self.config.gpio_panel_reset {
            self.interface.cmd_with_data(
                Cmd::SET_GPIO_CONF,
                &[Flag::GPIO_ALL_OUTPUT, Flag::GPIO_NORMAL],
            )?;
            // pulse the glass reset line routed through a controller GPIO
            self.gpio_write(mask, true)?;
            self.gpio_write(mask, false)?;
            delay.delay_ms(1);
            self.gpio_write(mask, true)?;
        }

        self.set_active_page(0);
        self.set_visual_page(0)?;
        self.interface.cmd(Cmd::SET_DISPLAY_ON)
    }

    /// The panel description this driver was configured with
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Set the color used by subsequent pixel/bar/clear operations
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// The current drawing color
    pub fn color(&self) -> Color {
        self.color
    }

    /// Set the clip rectangle (inclusive bounds). Takes effect while
    /// clipping is enabled via [`set_clip`](Self::set_clip).
    pub fn set_clip_region(&mut self, left: u16, top: u16, right: u16, bottom: u16) {
        self.clip.left = left;
        self.clip.top = top;
        self.clip.right = right;
        self.clip.bottom = bottom;
    }

    /// Enable or disable clipping
    pub fn set_clip(&mut self, enabled: bool) {
        self.clip.enabled = enabled;
    }

    /// Select which logical page subsequent drawing targets. Ignored while
    /// double buffering is enabled (the draw buffer wins).
    ///
    /// Pages are vertical slices of the controller's 1215KB frame memory,
    /// so the valid range depends on the panel: the page's last line
    /// `(page + 1) * height - 1` must fit both the memory and the 16-bit
    /// page address registers.
    pub fn set_active_page(&mut self, page: u8) {
        debug!("active page -> {}", page);
        self.active_page = page;
    }

    /// Scan out logical page `page` by moving the hardware scroll origin
    pub fn set_visual_page(&mut self, page: u8) -> Result<(), DisplayError> {
        debug!("visual page -> {}", page);
        self.visual_page = page;
        self.set_scroll_area(0, self.config.height, 0)?;
        self.set_scroll_start(page as u16 * self.config.height)
    }

    /// First physical line the current draw target starts at
    fn draw_origin(&self) -> u32 {
        if self.buffers.is_enabled() {
            self.buffers.draw().origin_line(self.config.height)
        } else {
            page_origin(self.active_page, self.config.height)
        }
    }

    /// Program the active window. Bounds are inclusive and must already be
    /// clipped to the surface; vertical coordinates are offset into the
    /// current draw page. Subsequent WRITE_MEMORY_START bursts wrap within
    /// this rectangle.
    fn set_area(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), DisplayError> {
        let origin = self.draw_origin();
        let top = origin + u32::from(y0);
        let bottom = origin + u32::from(y1);
        // the page address registers are 16 bit; a page origin past line
        // 65535 is outside the controller's frame memory
        debug_assert!(
            bottom <= u32::from(u16::MAX),
            "page origin past addressable frame memory"
        );
        debug!("set_area: x {}-{}, y {}-{}", x0, x1, top, bottom);

        self.interface.cmd_with_data(
            Cmd::SET_COLUMN_ADDRESS,
            &[hi(x0), lo(x0), hi(x1), lo(x1)],
        )?;
        self.interface.cmd_with_data(
            Cmd::SET_PAGE_ADDRESS,
            &[
                (top >> 8) as u8,
                top as u8,
                (bottom >> 8) as u8,
                bottom as u8,
            ],
        )
    }

    /// Draw one pixel of the current color. A no-op outside the surface or,
    /// while clipping is enabled, outside the clip rectangle.
    pub fn put_pixel(&mut self, x: u16, y: u16) -> Result<(), DisplayError> {
        self.draw_pixel_clipped(x, y, self.color)
    }

    pub(crate) fn draw_pixel_clipped(
        &mut self,
        x: u16,
        y: u16,
        color: Color,
    ) -> Result<(), DisplayError> {
        if x > self.config.max_x() || y > self.config.max_y() {
            return Ok(());
        }
        if self.clip.enabled
            && (x < self.clip.left || x > self.clip.right || y < self.clip.top || y > self.clip.bottom)
        {
            return Ok(());
        }
        self.set_area(x, y, x, y)?;
        self.interface.cmd(Cmd::WRITE_MEMORY_START)?;
        self.interface.write_pixels(&[color.raw()])
    }

    /// Read one pixel back from the controller.
    ///
    /// The write-only bus wiring has no readback path, so this always
    /// returns `None`.
    pub fn get_pixel(&self, _x: u16, _y: u16) -> Option<Color> {
        None
    }

    /// Fill the inclusive rectangle with the current color. Each edge is
    /// clamped independently to the clip rectangle (while clipping is
    /// enabled) and to the surface; an empty intersection writes nothing.
    pub fn bar(&mut self, left: u16, top: u16, right: u16, bottom: u16) -> Result<(), DisplayError> {
        self.fill_clipped(left, top, right, bottom, self.color)
    }

    pub(crate) fn fill_clipped(
        &mut self,
        mut left: u16,
        mut top: u16,
        mut right: u16,
        mut bottom: u16,
        color: Color,
    ) -> Result<(), DisplayError> {
        if self.clip.enabled {
            left = left.max(self.clip.left);
            top = top.max(self.clip.top);
            right = right.min(self.clip.right);
            bottom = bottom.min(self.clip.bottom);
        }
        right = right.min(self.config.max_x());
        bottom = bottom.min(self.config.max_y());
        if left > right || top > bottom {
            return Ok(());
        }

        let count = u32::from(right - left + 1) * u32::from(bottom - top + 1);
        self.set_area(left, top, right, bottom)?;
        self.interface.cmd(Cmd::WRITE_MEMORY_START)?;
        self.interface.repeat_pixel(color.raw(), count)
    }

    /// Fill the whole surface with the current color, bypassing the clip
    /// rectangle
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.fill_full(self.color)
    }

    pub(crate) fn fill_full(&mut self, color: Color) -> Result<(), DisplayError> {
        let max_x = self.config.max_x();
        let max_y = self.config.max_y();
        let count = u32::from(self.config.width) * u32::from(self.config.height);
        self.set_area(0, 0, max_x, max_y)?;
        self.interface.cmd(Cmd::WRITE_MEMORY_START)?;
        self.interface.repeat_pixel(color.raw(), count)
    }

    /// Blit a packed bitmap with its top-left corner at `(left, top)`,
    /// replicating every source pixel `stretch` times in both axes.
    ///
    /// The bitmap layout is described in [`crate::image`]. Rows that would
    /// land below the surface are silently dropped; the current drawing
    /// color is preserved.
    pub fn put_image<R: BitmapReader>(
        &mut self,
        left: u16,
        top: u16,
        bitmap: &mut R,
        stretch: u16,
    ) -> Result<(), DisplayError> {
        let max_x = self.config.max_x();
        let max_y = self.config.max_y();
        if left > max_x || top > max_y {
            return Ok(());
        }

        let mut header_raw = [0u8; BitmapHeader::LEN];
        bitmap.read(0, &mut header_raw)?;
        let header = BitmapHeader::parse(&header_raw);
        let format = header.format()?;
        debug!(
            "put_image: {}x{} depth {} stretch {}",
            header.width, header.height, header.depth, stretch
        );

        let mut offset = BitmapHeader::LEN as u32;
        let entries = format.palette_entries();
        let mut palette = [Color::BLACK; 256];
        if entries > 0 {
            let mut raw = [0u8; 512];
            bitmap.read(offset, &mut raw[..entries * 2])?;
            for (i, pair) in raw[..entries * 2].chunks_exact(2).enumerate() {
                palette[i] = Color::from_raw(u16::from_le_bytes([pair[0], pair[1]]));
            }
            offset += (entries * 2) as u32;
        }

        let row_bytes = format.row_bytes(header.width);
        let mut row_raw = [0u8; MAX_LINE_PIXELS * 2];
        if row_bytes > row_raw.len() {
            return Err(DisplayError::InvalidFormatError);
        }
        let mut line = [0u16; MAX_LINE_PIXELS];
        let stretch = stretch.max(1);

        let mut y_out = top;
        for _ in 0..header.height {
            bitmap.read(offset, &mut row_raw[..row_bytes])?;
            offset += row_bytes as u32;

            let n = decode_row(
                format,
                &palette[..entries],
                &row_raw[..row_bytes],
                header.width,
                stretch,
                &mut line,
            );

            // the decoded row is re-issued for every stretched output row,
            // each with its own window and memory-write command
            for _ in 0..stretch {
                if y_out > max_y {
                    return Ok(());
                }
                self.set_area(left, y_out, max_x, max_y)?;
                self.interface.cmd(Cmd::WRITE_MEMORY_START)?;
                self.interface.write_pixels(&line[..n])?;
                y_out += 1;
            }
        }
        Ok(())
    }

    /// Switch double buffering on. Drawing moves to the off-screen buffer;
    /// the full-redraw flag is raised because its contents are stale (a
    /// swap is a metadata change, never a pixel copy).
    pub fn switch_on_double_buffering(&mut self) {
        if self.buffers.enable() {
            debug!("double buffering enabled");
        }
    }

    /// Switch double buffering off, forcing one final
    /// [`update_display_now`](Self::update_display_now) so the last drawn
    /// frame stays visible. Drawing then targets the visible buffer again.
    pub fn switch_off_double_buffering(&mut self) -> Result<(), DisplayError> {
        if self.buffers.is_enabled() {
            self.update_display_now()?;
            self.buffers.disable();
            debug!("double buffering disabled");
        }
        Ok(())
    }

    /// Whether double buffering is currently enabled
    pub fn is_double_buffering(&self) -> bool {
        self.buffers.is_enabled()
    }

    /// Show the buffer drawn since the last swap by moving the hardware
    /// scroll origin onto it, then retarget drawing at the other buffer.
    ///
    /// The swap is immediate and not synchronized with vertical blanking;
    /// callers who care about tearing must time this themselves.
    pub fn update_display_now(&mut self) -> Result<(), DisplayError> {
        if !self.buffers.is_enabled() {
            return Ok(());
        }
        self.set_scroll_area(0, self.config.height, 0)?;
        let shown = self.buffers.present();
        debug!("presenting buffer {:?}", shown);
        self.set_scroll_start(shown.origin_line(self.config.height) as u16)
    }

    /// Request a buffer swap at the next vertical blanking interval.
    ///
    /// Not implemented: the tear-effect signal is not wired up, so no
    /// synchronized swap happens. Use
    /// [`update_display_now`](Self::update_display_now) instead.
    pub fn request_display_update(&mut self) {
        debug!("vblank-synchronized update not implemented");
    }

    /// Take the full-redraw flag raised by
    /// [`switch_on_double_buffering`](Self::switch_on_double_buffering),
    /// clearing it. Higher layers should redraw the whole scene when this
    /// returns true.
    pub fn take_full_redraw(&mut self) -> bool {
        self.buffers.take_full_redraw()
    }

    /// Define the vertical scroll area: fixed lines at the top, scrolling
    /// lines, fixed lines at the bottom (datasheet section 9.22)
    pub fn set_scroll_area(&mut self, top: u16, scroll: u16, bottom: u16) -> Result<(), DisplayError> {
        self.interface.cmd_with_data(
            Cmd::SET_SCROLL_AREA,
            &[hi(top), lo(top), hi(scroll), lo(scroll), hi(bottom), lo(bottom)],
        )
    }

    /// Set the first displayed line within the scroll area
    pub fn set_scroll_start(&mut self, line: u16) -> Result<(), DisplayError> {
        self.interface
            .cmd_with_data(Cmd::SET_SCROLL_START, &[hi(line), lo(line)])
    }

    /// Set backlight intensity through the controller's PWM output:
    /// 0x00 is fully off, 0xFF is maximum duty
    pub fn set_backlight(&mut self, intensity: u8) -> Result<(), DisplayError> {
        self.interface.cmd_with_data(
            Cmd::SET_PWM_CONF,
            &[
                Flag::PWM_BASE_FREQ,
                intensity,
                Flag::PWM_HOST_CONTROLLED,
                0x00,
                0x00,
                0x00,
            ],
        )
    }

    /// Enable or disable the tear-effect output line. With `include_hblank`
    /// the signal carries horizontal blanking information as well.
    pub fn set_tearing(&mut self, enabled: bool, include_hblank: bool) -> Result<(), DisplayError> {
        if enabled {
            let mode = if include_hblank {
                Flag::TEAR_V_AND_H_BLANK
            } else {
                Flag::TEAR_VBLANK_ONLY
            };
            self.interface.cmd_with_data(Cmd::SET_TEAR_ON, &[mode])
        } else {
            self.interface.cmd(Cmd::SET_TEAR_OFF)
        }
    }

    /// Drive a controller GPIO pin. The value register is write-only, so a
    /// shadow byte keeps the state of the other pins across single-bit
    /// updates.
    pub fn gpio_write(&mut self, mask: u8, state: bool) -> Result<(), DisplayError> {
        if state {
            self.gpio_shadow |= mask;
        } else {
            self.gpio_shadow &= !mask;
        }
        self.interface
            .cmd_with_data(Cmd::SET_GPIO_VALUE, &[self.gpio_shadow])
    }

    /// Enter sleep mode. The controller needs 5ms before the next command.
    pub fn enter_sleep(&mut self, delay: &mut impl DelayNs) -> Result<(), DisplayError> {
        self.interface.cmd(Cmd::ENTER_SLEEP_MODE)?;
        delay.delay_ms(5);
        Ok(())
    }

    /// Leave sleep mode. The controller needs 5ms before the next command.
    pub fn exit_sleep(&mut self, delay: &mut impl DelayNs) -> Result<(), DisplayError> {
        self.interface.cmd(Cmd::EXIT_SLEEP_MODE)?;
        delay.delay_ms(5);
        Ok(())
    }

    /// Enter deep sleep with the PLL stopped
    pub fn enter_deep_sleep(&mut self) -> Result<(), DisplayError> {
        self.interface.cmd(Cmd::SET_DEEP_SLEEP)
    }

    /// Blank the panel without losing frame memory
    pub fn display_off(&mut self) -> Result<(), DisplayError> {
        self.interface.cmd(Cmd::SET_DISPLAY_OFF)
    }

    /// Show frame memory on the panel
    pub fn display_on(&mut self) -> Result<(), DisplayError> {
        self.interface.cmd(Cmd::SET_DISPLAY_ON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TY430TFT480272;
    use crate::image::FlashBitmap;
    use std::vec::Vec;

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Op {
        Cmd(u8),
        CmdData(u8, Vec<u8>),
        Pixels(Vec<u16>),
        Repeat(u16, u32),
    }

    #[derive(Default)]
    struct MockInterface {
        ops: Vec<Op>,
    }

    impl DisplayInterface for MockInterface {
        fn cmd(&mut self, cmd: u8) -> Result<(), DisplayError> {
            self.ops.push(Op::Cmd(cmd));
            Ok(())
        }

        fn cmd_with_data(&mut self, cmd: u8, data: &[u8]) -> Result<(), DisplayError> {
            self.ops.push(Op::CmdData(cmd, data.to_vec()));
            Ok(())
        }

        fn write_pixels(&mut self, pixels: &[u16]) -> Result<(), DisplayError> {
            self.ops.push(Op::Pixels(pixels.to_vec()));
            Ok(())
        }

        fn repeat_pixel(&mut self, raw: u16, count: u32) -> Result<(), DisplayError> {
            self.ops.push(Op::Repeat(raw, count));
            Ok(())
        }

        fn hard_reset(&mut self, _delay: &mut impl DelayNs) -> Result<(), DisplayError> {
            Ok(())
        }
    }

    struct NoopDelay;

    impl DelayNs for NoopDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn driver() -> Ssd1963<MockInterface> {
        Ssd1963::new(MockInterface::default(), TY430TFT480272)
    }

    #[test]
    fn put_pixel_programs_unit_window() {
        let mut d = driver();
        d.set_color(Color::RED);
        d.put_pixel(5, 7).unwrap();
        assert_eq!(
            d.interface.ops,
            [
                Op::CmdData(Cmd::SET_COLUMN_ADDRESS, [0, 5, 0, 5].to_vec()),
                Op::CmdData(Cmd::SET_PAGE_ADDRESS, [0, 7, 0, 7].to_vec()),
                Op::Cmd(Cmd::WRITE_MEMORY_START),
                Op::Pixels([Color::RED.raw()].to_vec()),
            ]
        );
    }

    #[test]
    fn put_pixel_outside_clip_writes_nothing() {
        let mut d = driver();
        d.set_clip_region(10, 10, 20, 20);
        d.set_clip(true);
        d.put_pixel(5, 5).unwrap();
        d.put_pixel(21, 15).unwrap();
        assert!(d.interface.ops.is_empty());
        // and inside the region drawing resumes
        d.put_pixel(10, 20).unwrap();
        assert_eq!(d.interface.ops.len(), 4);
    }

    #[test]
    fn put_pixel_outside_surface_writes_nothing() {
        let mut d = driver();
        d.put_pixel(480, 0).unwrap();
        d.put_pixel(0, 272).unwrap();
        assert!(d.interface.ops.is_empty());
    }

    #[test]
    fn bar_clamps_each_edge_to_clip() {
        let mut d = driver();
        d.set_color(Color::GREEN);
        d.set_clip_region(10, 10, 20, 20);
        d.set_clip(true);
        d.bar(0, 0, 15, 40).unwrap();
        assert_eq!(
            d.interface.ops,
            [
                Op::CmdData(Cmd::SET_COLUMN_ADDRESS, [0, 10, 0, 15].to_vec()),
                Op::CmdData(Cmd::SET_PAGE_ADDRESS, [0, 10, 0, 20].to_vec()),
                Op::Cmd(Cmd::WRITE_MEMORY_START),
                Op::Repeat(Color::GREEN.raw(), 6 * 11),
            ]
        );
    }

    #[test]
    fn bar_disjoint_from_clip_writes_nothing() {
        let mut d = driver();
        d.set_clip_region(10, 10, 20, 20);
        d.set_clip(true);
        d.bar(30, 30, 40, 40).unwrap();
        assert!(d.interface.ops.is_empty());
    }

    #[test]
    fn bar_is_one_window_one_burst() {
        let mut d = driver();
        d.bar(0, 0, 479, 271).unwrap();
        let bursts = d
            .interface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Repeat(..)))
            .count();
        assert_eq!(bursts, 1);
        assert_eq!(
            d.interface.ops.last(),
            Some(&Op::Repeat(Color::BLACK.raw(), 480 * 272))
        );
    }

    #[test]
    fn clear_bypasses_clip() {
        let mut d = driver();
        d.set_color(Color::BLUE);
        d.set_clip_region(10, 10, 20, 20);
        d.set_clip(true);
        d.clear().unwrap();
        assert_eq!(
            d.interface.ops,
            [
                Op::CmdData(Cmd::SET_COLUMN_ADDRESS, [0x00, 0x00, 0x01, 0xDF].to_vec()),
                Op::CmdData(Cmd::SET_PAGE_ADDRESS, [0x00, 0x00, 0x01, 0x0F].to_vec()),
                Op::Cmd(Cmd::WRITE_MEMORY_START),
                Op::Repeat(Color::BLUE.raw(), 480 * 272),
            ]
        );
    }

    #[test]
    fn page_offset_shifts_vertical_bounds() {
        let mut d = driver();
        d.set_active_page(2);
        d.put_pixel(5, 7).unwrap();
        // effective top = 2 * 272 + 7 = 551 = 0x0227
        assert_eq!(
            d.interface.ops[1],
            Op::CmdData(Cmd::SET_PAGE_ADDRESS, [0x02, 0x27, 0x02, 0x27].to_vec())
        );
    }

    #[test]
    #[should_panic(expected = "addressable frame memory")]
    fn page_origin_past_frame_memory_is_rejected() {
        let mut d = driver();
        // 255 * 272 = 69360, beyond the 16-bit page address registers
        d.set_active_page(255);
        let _ = d.put_pixel(0, 0);
    }

    #[test]
    fn visual_page_moves_scroll_origin() {
        let mut d = driver();
        d.set_visual_page(1).unwrap();
        assert_eq!(
            d.interface.ops,
            [
                Op::CmdData(
                    Cmd::SET_SCROLL_AREA,
                    [0, 0, 0x01, 0x10, 0, 0].to_vec()
                ),
                Op::CmdData(Cmd::SET_SCROLL_START, [0x01, 0x10].to_vec()),
            ]
        );
    }

    #[test]
    fn get_pixel_is_unsupported() {
        let d = driver();
        assert_eq!(d.get_pixel(0, 0), None);
    }

    #[test]
    fn double_buffer_on_off_pair_is_a_noop() {
        let mut d = driver();
        d.switch_on_double_buffering();
        assert!(d.take_full_redraw());
        assert!(d.interface.ops.is_empty());

        d.switch_off_double_buffering().unwrap();
        // the forced update shows buffer A, which was visible all along
        assert_eq!(
            d.interface.ops.last(),
            Some(&Op::CmdData(Cmd::SET_SCROLL_START, [0, 0].to_vec()))
        );
        assert!(!d.is_double_buffering());

        // drawing afterwards targets the visible buffer (no offset)
        d.interface.ops.clear();
        d.put_pixel(0, 0).unwrap();
        assert_eq!(
            d.interface.ops[1],
            Op::CmdData(Cmd::SET_PAGE_ADDRESS, [0, 0, 0, 0].to_vec())
        );
    }

    #[test]
    fn update_display_now_swaps_draw_and_frame() {
        let mut d = driver();
        d.switch_on_double_buffering();

        // first swap: buffer A (just drawn) becomes visible
        d.update_display_now().unwrap();
        assert_eq!(
            d.interface.ops.last(),
            Some(&Op::CmdData(Cmd::SET_SCROLL_START, [0, 0].to_vec()))
        );

        // drawing now lands in buffer B's slice (offset 272 = 0x0110)
        d.interface.ops.clear();
        d.put_pixel(0, 0).unwrap();
        assert_eq!(
            d.interface.ops[1],
            Op::CmdData(Cmd::SET_PAGE_ADDRESS, [0x01, 0x10, 0x01, 0x10].to_vec())
        );

        // second swap: buffer B becomes visible
        d.interface.ops.clear();
        d.update_display_now().unwrap();
        assert_eq!(
            d.interface.ops.last(),
            Some(&Op::CmdData(Cmd::SET_SCROLL_START, [0x01, 0x10].to_vec()))
        );
    }

    #[test]
    fn update_display_now_is_noop_while_disabled() {
        let mut d = driver();
        d.update_display_now().unwrap();
        assert!(d.interface.ops.is_empty());
    }

    #[test]
    fn gpio_writes_go_through_shadow_byte() {
        let mut d = driver();
        d.gpio_write(Flag::GPIO0, true).unwrap();
        d.gpio_write(Flag::GPIO1, true).unwrap();
        d.gpio_write(Flag::GPIO0, false).unwrap();
        assert_eq!(
            d.interface.ops,
            [
                Op::CmdData(Cmd::SET_GPIO_VALUE, [0x01].to_vec()),
                Op::CmdData(Cmd::SET_GPIO_VALUE, [0x03].to_vec()),
                Op::CmdData(Cmd::SET_GPIO_VALUE, [0x02].to_vec()),
            ]
        );
    }

    #[test]
    fn backlight_programs_pwm() {
        let mut d = driver();
        d.set_backlight(0x80).unwrap();
        assert_eq!(
            d.interface.ops,
            [Op::CmdData(
                Cmd::SET_PWM_CONF,
                [0x0E, 0x80, 0x01, 0x00, 0x00, 0x00].to_vec()
            )]
        );
    }

    #[test]
    fn tearing_configuration() {
        let mut d = driver();
        d.set_tearing(true, true).unwrap();
        d.set_tearing(true, false).unwrap();
        d.set_tearing(false, false).unwrap();
        assert_eq!(
            d.interface.ops,
            [
                Op::CmdData(Cmd::SET_TEAR_ON, [0x01].to_vec()),
                Op::CmdData(Cmd::SET_TEAR_ON, [0x00].to_vec()),
                Op::Cmd(Cmd::SET_TEAR_OFF),
            ]
        );
    }

    #[test]
    fn init_programs_timing_from_config() {
        let mut d = driver();
        d.init(&mut NoopDelay).unwrap();
        let ops = &d.interface.ops;
        assert_eq!(
            ops[0],
            Op::CmdData(Cmd::SET_PLL_MN, [0x23, 0x02, 0x54].to_vec())
        );
        assert!(ops.contains(&Op::CmdData(
            Cmd::SET_LSHIFT_FREQ,
            [0x01, 0x33, 0x32].to_vec()
        )));
        // HT-1 = 524, HPS-1 = 42, HPW-1 = 40
        assert!(ops.contains(&Op::CmdData(
            Cmd::SET_HORI_PERIOD,
            [0x02, 0x0C, 0x00, 0x2A, 40, 0, 0, 0].to_vec()
        )));
        // VT-1 = 285, VSP-1 = 11, VPW-1 = 9
        assert!(ops.contains(&Op::CmdData(
            Cmd::SET_VERT_PERIOD,
            [0x01, 0x1D, 0x00, 0x0B, 9, 0, 0].to_vec()
        )));
        assert!(ops.contains(&Op::CmdData(Cmd::SET_PIXEL_FORMAT, [0x55].to_vec())));
        assert!(ops.contains(&Op::CmdData(
            Cmd::SET_PIXEL_DATA_INTERFACE,
            [0x00].to_vec()
        )));
        assert_eq!(ops.last(), Some(&Op::Cmd(Cmd::SET_DISPLAY_ON)));
    }

    fn bitmap_4bpp_2x2() -> Vec<u8> {
        // header: uncompressed, 4bpp, 2 rows, 2 columns
        let mut bytes = [0x00u8, 0x04, 0x02, 0x00, 0x02, 0x00].to_vec();
        // palette: entry i = 0x1000 + i
        for i in 0u16..16 {
            bytes.extend_from_slice(&(0x1000 + i).to_le_bytes());
        }
        // row 0: pixels 1, 2; row 1: pixels 3, 4 (low nibble first)
        bytes.push(0x21);
        bytes.push(0x43);
        bytes
    }

    #[test]
    fn put_image_repeats_each_row_stretch_times() {
        let bytes = bitmap_4bpp_2x2();
        let mut d = driver();
        d.put_image(100, 50, &mut FlashBitmap(&bytes), 2).unwrap();

        let rows: Vec<&Vec<u16>> = d
            .interface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Pixels(px) => Some(px),
                _ => None,
            })
            .collect();
        // 2 source rows * stretch 2
        assert_eq!(rows.len(), 4);
        // each source pixel replicated twice horizontally
        assert_eq!(rows[0], &[0x1001, 0x1001, 0x1002, 0x1002].to_vec());
        assert_eq!(rows[0], rows[1]);
        assert_eq!(rows[2], &[0x1003, 0x1003, 0x1004, 0x1004].to_vec());
        assert_eq!(rows[2], rows[3]);

        // every output row gets a fresh window: (left, top+row) to (max, max)
        let windows: Vec<&Vec<u8>> = d
            .interface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::CmdData(cmd, data) if *cmd == Cmd::SET_PAGE_ADDRESS => Some(data),
                _ => None,
            })
            .collect();
        assert_eq!(windows.len(), 4);
        for (i, w) in windows.iter().enumerate() {
            let top = 50 + i as u16;
            assert_eq!(w.as_slice(), &[hi(top), lo(top), hi(271), lo(271)]);
        }
    }

    #[test]
    fn put_image_preserves_current_color() {
        let bytes = bitmap_4bpp_2x2();
        let mut d = driver();
        d.set_color(Color::RED);
        d.put_image(0, 0, &mut FlashBitmap(&bytes), 1).unwrap();
        assert_eq!(d.color(), Color::RED);
    }

    #[test]
    fn put_image_16bpp_is_direct_color() {
        // 1x1 16bpp image with pixel 0xF800
        let bytes = [0x00u8, 0x10, 0x01, 0x00, 0x01, 0x00, 0x00, 0xF8];
        let mut d = driver();
        d.put_image(0, 0, &mut FlashBitmap(&bytes), 1).unwrap();
        assert!(d
            .interface
            .ops
            .contains(&Op::Pixels([0xF800].to_vec())));
    }

    #[test]
    fn put_image_rows_below_surface_are_dropped() {
        let bytes = bitmap_4bpp_2x2();
        let mut d = driver();
        // top on the last line: only one of the four output rows fits
        d.put_image(0, 271, &mut FlashBitmap(&bytes), 2).unwrap();
        let rows = d
            .interface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Pixels(_)))
            .count();
        assert_eq!(rows, 1);
    }
}
