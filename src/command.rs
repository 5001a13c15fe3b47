use core::fmt;

/// Commands understood by the SDS011.
///
/// The discriminant is the byte placed in the command slot of a request
/// and echoed back as the first data byte of the matching reply.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[repr(u8)]
pub enum Command {
    /// Query or set the reporting mode (active or passive).
    ReportMode = 0x02,
    /// Ask for one measurement.
    Query = 0x04,
    /// Query the device ID.
    DeviceId = 0x05,
    /// Query or set the operational state (sleeping or working).
    WorkState = 0x06,
    /// Query the firmware version.
    Firmware = 0x07,
    /// Query or set the duty cycle.
    DutyCycle = 0x08,
}

impl Command {
    /// Maps a wire byte back to a command, if it is one.
    pub fn from_u8(byte: u8) -> Option<Self> {
        use Command::*;
        match byte {
            x if x == ReportMode as u8 => Some(ReportMode),
            x if x == Query as u8 => Some(Query),
            x if x == DeviceId as u8 => Some(DeviceId),
            x if x == WorkState as u8 => Some(WorkState),
            x if x == Firmware as u8 => Some(Firmware),
            x if x == DutyCycle as u8 => Some(DutyCycle),
            _ => None,
        }
    }
}

/// Whether a command reads or writes the sensor setting.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[repr(u8)]
pub enum Mode {
    /// Read the current setting.
    Get = 0x00,
    /// Write a new setting.
    Set = 0x01,
}

impl Mode {
    /// Maps a wire byte back to a mode, if it is one.
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Mode::Get),
            0x01 => Some(Mode::Set),
            _ => None,
        }
    }
}

/// Represents the operational state of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationalState {
    /// Sensor is in low-power sleep mode.
    Sleeping,
    /// Sensor is actively taking measurements.
    Working,
}

impl OperationalState {
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            OperationalState::Sleeping => 0x00,
            OperationalState::Working => 0x01,
        }
    }

    pub(crate) fn from_u8(byte: u8) -> Self {
        if byte == 0x01 {
            OperationalState::Working
        } else {
            OperationalState::Sleeping
        }
    }
}

/// Firmware version of the sensor, a build date.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct Firmware {
    pub year: u8,
    pub month: u8,
    pub day: u8,
}

/// Formats as `yy-mm-dd`.
impl fmt::Display for Firmware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_bytes_round_trip() {
        for cmd in [
            Command::ReportMode,
            Command::Query,
            Command::DeviceId,
            Command::WorkState,
            Command::Firmware,
            Command::DutyCycle,
        ] {
            assert_eq!(Command::from_u8(cmd as u8), Some(cmd));
        }
        assert_eq!(Command::from_u8(0x03), None);
        assert_eq!(Command::from_u8(0xC5), None);
    }

    #[test]
    fn firmware_is_zero_padded() {
        let fw = Firmware {
            year: 17,
            month: 3,
            day: 20,
        };
        assert_eq!(fw.to_string(), "17-03-20");
    }

    #[test]
    fn work_state_bytes() {
        assert_eq!(OperationalState::from_u8(0x01), OperationalState::Working);
        assert_eq!(OperationalState::from_u8(0x00), OperationalState::Sleeping);
        assert_eq!(OperationalState::Working.as_u8(), 0x01);
    }

    #[test]
    fn mode_bytes() {
        assert_eq!(Mode::from_u8(0x00), Some(Mode::Get));
        assert_eq!(Mode::from_u8(0x01), Some(Mode::Set));
        assert_eq!(Mode::from_u8(0x02), None);
    }
}
