//! Panel geometry and timing configuration.
//!
//! The SSD1963 drives a bare TFT glass, so sync timing is not fixed by the
//! controller: every panel model brings its own resolution, pulse widths,
//! porches and pixel clock. A [`PanelConfig`] carries those numbers and the
//! driver computes the controller's period registers from them:
//! `total horizontal time = resolution + pulse + back porch + front porch`,
//! and the sync start is `pulse + back porch` (same arithmetic vertically).

use crate::flag::Flag;

/// Width of the host data bus feeding the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostBusWidth {
    /// 8-bit bus; 16-bit values cross in two transfers, high byte first
    Eight,
    /// 16-bit bus; one 565 pixel per transfer
    Sixteen,
}

impl HostBusWidth {
    /// Parameter byte for SET_PIXEL_DATA_INTERFACE
    pub const fn data_interface_flag(self) -> u8 {
        match self {
            HostBusWidth::Eight => Flag::DATA_INTERFACE_8BIT,
            HostBusWidth::Sixteen => Flag::DATA_INTERFACE_16BIT_565,
        }
    }
}

/// Description of one physical panel model.
///
/// `pll_mult` and `pll_div` are the raw register values: with a crystal
/// frequency `osc`, the VCO runs at `osc * (pll_mult + 1)` and the PLL output
/// is `vco / (pll_div + 1)`. `lshift_mult` is the 20-bit LCDC_FPR value:
/// pixel clock = `pll * (lshift_mult + 1) / 2^20`.
#[derive(Clone, Copy, Debug)]
pub struct PanelConfig {
    /// Horizontal resolution in pixels
    pub width: u16,
    /// Vertical resolution in lines
    pub height: u16,
    /// HSYNC pulse width in pixel clocks
    pub h_pulse_width: u16,
    /// Horizontal back porch in pixel clocks
    pub h_back_porch: u16,
    /// Horizontal front porch in pixel clocks
    pub h_front_porch: u16,
    /// VSYNC pulse width in lines
    pub v_pulse_width: u16,
    /// Vertical back porch in lines
    pub v_back_porch: u16,
    /// Vertical front porch in lines
    pub v_front_porch: u16,
    /// PLL multiplier register value (N)
    pub pll_mult: u8,
    /// PLL divider register value (M)
    pub pll_div: u8,
    /// 20-bit pixel clock fraction (LCDC_FPR)
    pub lshift_mult: u32,
    /// TFT data width bits for SET_PANEL_MODE (18 or 24 bit)
    pub panel_data_width: u8,
    /// Sync mode bits for SET_PANEL_MODE (HSYNC+VSYNC or TTL)
    pub panel_sync_mode: u8,
    /// Host bus width, selects the SET_PIXEL_DATA_INTERFACE value
    pub host_bus: HostBusWidth,
    /// GPIO mask wired to the glass reset line, if the board routes one
    pub gpio_panel_reset: Option<u8>,
}

impl PanelConfig {
    /// Largest addressable column
    pub const fn max_x(&self) -> u16 {
        self.width - 1
    }

    /// Largest addressable row within one page
    pub const fn max_y(&self) -> u16 {
        self.height - 1
    }

    /// Total horizontal period in pixel clocks
    pub const fn total_horizontal(&self) -> u16 {
        self.width + self.h_pulse_width + self.h_back_porch + self.h_front_porch
    }

    /// Pixel clocks from line start to the first active pixel
    pub const fn horizontal_sync_start(&self) -> u16 {
        self.h_pulse_width + self.h_back_porch
    }

    /// Total vertical period in lines
    pub const fn total_vertical(&self) -> u16 {
        self.height + self.v_pulse_width + self.v_back_porch + self.v_front_porch
    }

    /// Lines from frame start to the first active line
    pub const fn vertical_sync_start(&self) -> u16 {
        self.v_pulse_width + self.v_back_porch
    }
}

/// TechToys 4.3" 480x272 panel, 9MHz pixel clock
///
/// LCDC_FPR 0x13332: 9MHz = 120MHz * (0x13332 + 1) / 2^20
pub const TY430TFT480272: PanelConfig = PanelConfig {
    width: 480,
    height: 272,
    h_pulse_width: 41,
    h_back_porch: 2,
    h_front_porch: 2,
    v_pulse_width: 10,
    v_back_porch: 2,
    v_front_porch: 2,
    pll_mult: 0x23,
    pll_div: 0x02,
    lshift_mult: 0x0001_3332,
    panel_data_width: Flag::PANEL_DATA_24BIT,
    panel_sync_mode: Flag::PANEL_SYNC_HV,
    host_bus: HostBusWidth::Eight,
    gpio_panel_reset: Some(Flag::GPIO0),
};

/// TechToys 5.0" 800x480 panel, 30MHz pixel clock
pub const TY500TFT800480: PanelConfig = PanelConfig {
    width: 800,
    height: 480,
    h_pulse_width: 48,
    h_back_porch: 88,
    h_front_porch: 120,
    v_pulse_width: 3,
    v_back_porch: 32,
    v_front_porch: 10,
    pll_mult: 0x23,
    pll_div: 0x02,
    lshift_mult: 0x0003_FFFF,
    panel_data_width: Flag::PANEL_DATA_24BIT,
    panel_sync_mode: Flag::PANEL_SYNC_HV,
    host_bus: HostBusWidth::Eight,
    gpio_panel_reset: None,
};

/// TechToys 7.0" 800x480 panel, 18-bit TTL interface, 30MHz pixel clock
pub const TY700TFT800480: PanelConfig = PanelConfig {
    width: 800,
    height: 480,
    h_pulse_width: 48,
    h_back_porch: 88,
    h_front_porch: 120,
    v_pulse_width: 3,
    v_back_porch: 32,
    v_front_porch: 10,
    pll_mult: 0x23,
    pll_div: 0x02,
    lshift_mult: 0x0003_FFFF,
    panel_data_width: Flag::PANEL_DATA_18BIT,
    panel_sync_mode: Flag::PANEL_SYNC_TTL,
    host_bus: HostBusWidth::Eight,
    gpio_panel_reset: None,
};
