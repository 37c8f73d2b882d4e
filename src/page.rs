//! Draw/frame buffer and page bookkeeping.
//!
//! The SSD1963's frame memory is taller than one panel frame, so several
//! logical pages can live in it as disjoint vertical slices: page `n` starts
//! at physical line `n * height`. "Showing" a page is a single write to the
//! scroll start register, never a pixel copy. Double buffering builds on the
//! same trick with exactly two slices.

/// One of the two framebuffer slices used for double buffering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Buffer {
    /// First slice, physical lines `0..height`
    A,
    /// Second slice, physical lines `height..2*height`
    B,
}

impl Buffer {
    /// The other slice
    pub const fn complement(self) -> Buffer {
        match self {
            Buffer::A => Buffer::B,
            Buffer::B => Buffer::A,
        }
    }

    /// First physical line of this slice
    pub const fn origin_line(self, lines_per_page: u16) -> u32 {
        match self {
            Buffer::A => 0,
            Buffer::B => lines_per_page as u32,
        }
    }
}

/// First physical line of logical page `page`
pub const fn page_origin(page: u8, lines_per_page: u16) -> u32 {
    page as u32 * lines_per_page as u32
}

/// Double buffering state.
///
/// While enabled, drawing targets the `draw` slice and the panel scans the
/// complementary slice. A swap only changes which slice is which; pixels not
/// redrawn afterwards keep their stale contents, which the full-redraw flag
/// signals to higher layers.
#[derive(Clone, Copy, Debug)]
pub struct DoubleBuffering {
    enabled: bool,
    draw: Buffer,
    full_redraw: bool,
}

impl DoubleBuffering {
    /// Disabled, drawing and scan-out both on slice A
    pub const fn new() -> Self {
        DoubleBuffering {
            enabled: false,
            draw: Buffer::A,
            full_redraw: false,
        }
    }

    /// Whether double buffering is active
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The slice drawing currently targets
    pub const fn draw(&self) -> Buffer {
        self.draw
    }

    /// Enable double buffering. Returns true on the Disabled -> Enabled
    /// transition and raises the full-redraw flag, since the draw slice
    /// contents are unspecified at that point.
    pub fn enable(&mut self) -> bool {
        if self.enabled {
            return false;
        }
        self.enabled = true;
        self.full_redraw = true;
        true
    }

    /// Swap draw and frame identities. Returns the slice that was just drawn
    /// into, which becomes the one to scan out.
    pub fn present(&mut self) -> Buffer {
        let shown = self.draw;
        self.draw = shown.complement();
        shown
    }

    /// Disable double buffering, re-aligning the draw slice with the visible
    /// one. Returns true on the Enabled -> Disabled transition.
    pub fn disable(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        // present() left draw on the stale slice; fold it back onto the
        // slice being scanned out so drawing is visible again
        self.draw = self.draw.complement();
        self.enabled = false;
        true
    }

    /// Take the full-redraw flag, clearing it
    pub fn take_full_redraw(&mut self) -> bool {
        let flag = self.full_redraw;
        self.full_redraw = false;
        flag
    }
}

impl Default for DoubleBuffering {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_lines() {
        assert_eq!(Buffer::A.origin_line(272), 0);
        assert_eq!(Buffer::B.origin_line(272), 272);
        assert_eq!(page_origin(0, 272), 0);
        assert_eq!(page_origin(3, 480), 1440);
    }

    #[test]
    fn complement_is_involution() {
        assert_eq!(Buffer::A.complement(), Buffer::B);
        assert_eq!(Buffer::B.complement().complement(), Buffer::B);
    }

    #[test]
    fn enable_raises_full_redraw_once() {
        let mut db = DoubleBuffering::new();
        assert!(db.enable());
        assert!(db.take_full_redraw());
        assert!(!db.take_full_redraw());
        // already enabled: no transition, no new invalidation
        assert!(!db.enable());
        assert!(!db.take_full_redraw());
    }

    #[test]
    fn present_alternates_slices() {
        let mut db = DoubleBuffering::new();
        db.enable();
        assert_eq!(db.draw(), Buffer::A);
        assert_eq!(db.present(), Buffer::A);
        assert_eq!(db.draw(), Buffer::B);
        assert_eq!(db.present(), Buffer::B);
        assert_eq!(db.draw(), Buffer::A);
    }

    #[test]
    fn disable_realigns_draw_with_visible() {
        let mut db = DoubleBuffering::new();
        db.enable();
        // a final present happens on switch-off; A is shown, draw moves to B
        let shown = db.present();
        assert!(db.disable());
        assert_eq!(db.draw(), shown);
        assert!(!db.is_enabled());
        assert!(!db.disable());
    }
}
