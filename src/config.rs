use core::fmt;

use crate::constants::MAX_REPLY_ATTEMPTS;

/// Represents the operating mode of the SDS011 sensor.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum DeviceMode {
    /// In Active mode, the sensor automatically reports data.
    Active,
    /// In Passive mode, the sensor only reports data when queried.
    Passive,
}

impl DeviceMode {
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            DeviceMode::Active => 0x00,
            DeviceMode::Passive => 0x01,
        }
    }

    pub(crate) fn from_u8(byte: u8) -> Self {
        if byte == 0x00 {
            DeviceMode::Active
        } else {
            DeviceMode::Passive
        }
    }
}

/// Represents the unique identifier of the SDS011 sensor.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct DeviceId {
    /// The first byte of the device ID.
    pub id1: u8,
    /// The second byte of the device ID.
    pub id2: u8,
}

impl DeviceId {
    /// Address matching every sensor on the link.
    pub const BROADCAST: DeviceId = DeviceId {
        id1: 0xff,
        id2: 0xff,
    };

    pub fn new(id1: u8, id2: u8) -> Self {
        DeviceId { id1, id2 }
    }
}

impl Default for DeviceId {
    /// Returns the broadcast device id.
    fn default() -> DeviceId {
        DeviceId::BROADCAST
    }
}

/// Formats both bytes as zero-padded decimals, e.g. `0102`.
impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.id1, self.id2)
    }
}

/// Configuration settings for the SDS011 sensor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Config {
    /// The device ID commands are addressed to.
    pub id: DeviceId,
    /// The operating mode applied by `init`.
    pub mode: DeviceMode,
    /// How many frames to read while waiting for a command reply.
    pub reply_attempts: usize,
}

impl Config {
    /// Creates a new `Config` instance.
    ///
    /// # Arguments
    ///
    /// * `id` - The `DeviceId` for the sensor.
    /// * `mode` - The `DeviceMode` for the sensor.
    ///
    /// # Returns
    ///
    /// A new `Config` instance with the specified ID and mode and the
    /// default reply attempt bound.
    pub fn new(id: DeviceId, mode: DeviceMode) -> Config {
        Config {
            id,
            mode,
            reply_attempts: MAX_REPLY_ATTEMPTS,
        }
    }
    /// Sets the device ID for the configuration.
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = id;
        self
    }
    /// Sets the device mode for the configuration.
    pub fn mode(mut self, mode: DeviceMode) -> Self {
        self.mode = mode;
        self
    }
    /// Sets how many frames may be skipped while waiting for a reply.
    ///
    /// Unsolicited data reports count towards this bound, so in active mode
    /// it should cover the reports the sensor can emit before answering.
    pub fn reply_attempts(mut self, attempts: usize) -> Self {
        self.reply_attempts = attempts;
        self
    }
}

/// Provides default configuration values for the SDS011 sensor.
impl Default for Config {
    /// Returns the default configuration.
    ///
    /// The default configuration uses a device ID of `0xFFFF`, `Passive` mode
    /// and waits up to ten frames for a reply.
    fn default() -> Config {
        Config::new(DeviceId::default(), DeviceMode::Passive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.id, DeviceId::BROADCAST);
        assert_eq!(config.mode, DeviceMode::Passive);
        assert_eq!(config.reply_attempts, 10);
    }

    #[test]
    fn builder_overrides() {
        let config = Config::default()
            .id(DeviceId::new(0xA1, 0x60))
            .mode(DeviceMode::Active)
            .reply_attempts(3);
        assert_eq!(config.id, DeviceId::new(0xA1, 0x60));
        assert_eq!(config.mode, DeviceMode::Active);
        assert_eq!(config.reply_attempts, 3);
    }

    #[test]
    fn device_id_display() {
        assert_eq!(DeviceId::new(1, 2).to_string(), "0102");
        assert_eq!(DeviceId::new(12, 34).to_string(), "1234");
    }

    #[test]
    fn mode_bytes() {
        assert_eq!(DeviceMode::from_u8(0), DeviceMode::Active);
        assert_eq!(DeviceMode::from_u8(1), DeviceMode::Passive);
        assert_eq!(DeviceMode::Passive.as_u8(), 1);
    }
}
