pub struct Flag;
#[allow(dead_code)]
impl Flag {
    // SET_PLL_MN: third parameter byte that makes M/N effective
    pub const PLL_MN_EFFECTIVE: u8 = 0x54;
    // SET_PLL: enable the PLL / use it as the system clock
    pub const PLL_ENABLE: u8 = 0x01;
    pub const PLL_AS_SYSCLK: u8 = 0x03;
    // SET_PANEL_MODE data width and sync mode bits
    pub const PANEL_DATA_18BIT: u8 = 0x10;
    pub const PANEL_DATA_24BIT: u8 = 0x20;
    pub const PANEL_SYNC_HV: u8 = 0x00;
    pub const PANEL_SYNC_TTL: u8 = 0x80;
    // SET_PIXEL_FORMAT: 16 bits per pixel (565)
    pub const PIXEL_FORMAT_16BPP: u8 = 0x55;
    // SET_PIXEL_DATA_INTERFACE host bus widths
    pub const DATA_INTERFACE_8BIT: u8 = 0x00;
    pub const DATA_INTERFACE_16BIT_565: u8 = 0x03;
    // SET_GPIO_CONF: all four GPIOs as host-controlled outputs
    pub const GPIO_ALL_OUTPUT: u8 = 0x0F;
    pub const GPIO_NORMAL: u8 = 0x01;
    // SET_GPIO_VALUE pin masks
    pub const GPIO0: u8 = 0x01;
    pub const GPIO1: u8 = 0x02;
    pub const GPIO2: u8 = 0x04;
    pub const GPIO3: u8 = 0x08;
    // SET_PWM_CONF: ~300Hz base frequency at 120MHz PLL, host-controlled duty
    pub const PWM_BASE_FREQ: u8 = 0x0E;
    pub const PWM_HOST_CONTROLLED: u8 = 0x01;
    // SET_TEAR_ON modes
    pub const TEAR_VBLANK_ONLY: u8 = 0x00;
    pub const TEAR_V_AND_H_BLANK: u8 = 0x01;
}
