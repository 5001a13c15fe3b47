// HEAD is the byte that marks the beginning of any frame (command or data).
pub const HEAD: u8 = 0xAA;

// TAIL is the byte that marks the end of any frame (command or data).
pub const TAIL: u8 = 0xAB;

// COMMAND_ID is the byte that identifies a command frame sent to the sensor.
pub const COMMAND_ID: u8 = 0xB4;

// DATA_REPORT_ID is the byte that identifies a data report frame received from the sensor.
// This is emitted continuously in active reporting mode and in answer to a query.
pub const DATA_REPORT_ID: u8 = 0xC0;

// REPLY_ID is the byte that identifies a reply frame received from the sensor
// in response to a command.
pub const REPLY_ID: u8 = 0xC5;

// Size of a command frame sent to the sensor.
pub const REQUEST_LEN: usize = 19;

// Size of a frame received from the sensor.
pub const RESPONSE_LEN: usize = 10;

// Number of data bytes carried by a command frame.
pub const REQUEST_DATA_LEN: usize = 11;

// Number of data bytes carried by a received frame.
pub const RESPONSE_DATA_LEN: usize = 6;

// Frames read while waiting for a reply before giving up.
pub const MAX_REPLY_ATTEMPTS: usize = 10;

// Longest duty cycle accepted by the sensor, in minutes.
pub const MAX_DUTY_CYCLE: u8 = 30;
