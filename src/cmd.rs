pub struct Cmd;
#[allow(dead_code)]
impl Cmd {
    pub const SOFT_RESET: u8 = 0x01;
    pub const ENTER_SLEEP_MODE: u8 = 0x10;
    pub const EXIT_SLEEP_MODE: u8 = 0x11;
    pub const SET_DISPLAY_OFF: u8 = 0x28;
    pub const SET_DISPLAY_ON: u8 = 0x29;
    pub const SET_COLUMN_ADDRESS: u8 = 0x2A;
    pub const SET_PAGE_ADDRESS: u8 = 0x2B;
    pub const WRITE_MEMORY_START: u8 = 0x2C;
    pub const SET_SCROLL_AREA: u8 = 0x33;
    pub const SET_TEAR_OFF: u8 = 0x34;
    pub const SET_TEAR_ON: u8 = 0x35;
    pub const SET_SCROLL_START: u8 = 0x37;
    pub const SET_PIXEL_FORMAT: u8 = 0x3A;
    pub const SET_PANEL_MODE: u8 = 0xB0;
    pub const SET_HORI_PERIOD: u8 = 0xB4;
    pub const SET_VERT_PERIOD: u8 = 0xB6;
    pub const SET_GPIO_CONF: u8 = 0xB8;
    pub const SET_GPIO_VALUE: u8 = 0xBA;
    pub const SET_PWM_CONF: u8 = 0xBE;
    pub const SET_PLL: u8 = 0xE0;
    pub const SET_PLL_MN: u8 = 0xE2;
    pub const SET_DEEP_SLEEP: u8 = 0xE5;
    pub const SET_LSHIFT_FREQ: u8 = 0xE6;
    pub const SET_PIXEL_DATA_INTERFACE: u8 = 0xF0;
}
