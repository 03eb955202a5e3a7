pub const CHANNEL_OFFSET: usize = 0;
pub const TYPE_OFFSET: usize = 1;
pub const HEADER_LEN: usize = 2;

pub const OCTET_MAX: u32 = 0xFF;
pub const MAX_INT_WIDTH: usize = 9;

pub const TYPE_DIGITAL_INPUT: u8 = 0;
pub const TYPE_DIGITAL_OUTPUT: u8 = 1;
pub const TYPE_ANALOG_INPUT: u8 = 2;
pub const TYPE_ANALOG_OUTPUT: u8 = 3;
pub const TYPE_ILLUMINANCE: u8 = 101;
pub const TYPE_PRESENCE: u8 = 102;
pub const TYPE_TEMPERATURE: u8 = 103;
pub const TYPE_HUMIDITY: u8 = 104;
pub const TYPE_ACCELEROMETER: u8 = 113;
pub const TYPE_BAROMETER: u8 = 115;
pub const TYPE_GYROMETER: u8 = 134;
pub const TYPE_GPS: u8 = 136;
