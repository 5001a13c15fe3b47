//! Wire format of the frames exchanged with the sensor.
//!
//! Commands are 19 bytes long:
//!
//! ```text
//! AA B4 CMD MODE D0 00 00 00 00 00 00 00 00 00 00 ID1 ID2 CS AB
//! ```
//!
//! where `CS` is the sum of every byte from `CMD` to `ID2`. The sensor
//! answers with 10-byte frames:
//!
//! ```text
//! AA C0 PM25_L PM25_H PM10_L PM10_H ID1 ID2 CS AB    data report
//! AA C5 CMD    D1     D2     D3     D4  D5  CS AB    command reply
//! ```
//!
//! where `CS` is the sum of the six data bytes.

use embedded_io_async::Read;
use log::{debug, error, warn};

use crate::checksum::sum8;
use crate::command::{Command, Firmware, Mode, OperationalState};
use crate::config::{DeviceId, DeviceMode};
use crate::constants::*;
use crate::error::{ContractViolation, FrameError, Result};

/// A command frame addressed to the sensor.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct Request {
    command: Command,
    mode: Mode,
    data: [u8; REQUEST_DATA_LEN],
    target: DeviceId,
}

impl Request {
    /// Builds a broadcast request carrying `value` as its first data byte.
    pub fn new(command: Command, mode: Mode, value: u8) -> Self {
        let mut data = [0u8; REQUEST_DATA_LEN];
        data[0] = value;
        Request {
            command,
            mode,
            data,
            target: DeviceId::BROADCAST,
        }
    }

    /// Addresses the request to a specific sensor.
    pub fn target(mut self, id: DeviceId) -> Self {
        self.target = id;
        self
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn value(&self) -> u8 {
        self.data[0]
    }

    pub fn device_id(&self) -> DeviceId {
        self.target
    }

    /// Serializes the request, computing its checksum.
    pub fn to_bytes(&self) -> [u8; REQUEST_LEN] {
        let mut frame = [0u8; REQUEST_LEN];
        frame[0] = HEAD;
        frame[1] = COMMAND_ID;
        frame[2] = self.command as u8;
        frame[3] = self.mode as u8;
        frame[4..15].copy_from_slice(&self.data);
        frame[15] = self.target.id1;
        frame[16] = self.target.id2;
        frame[17] = sum8(&frame[2..17]);
        frame[18] = TAIL;
        frame
    }

    /// Decodes a command frame, validating framing and checksum.
    ///
    /// The sensor never sends these; this is useful to inspect or replay
    /// traffic captured on the link.
    pub fn parse(frame: &[u8; REQUEST_LEN]) -> core::result::Result<Self, FrameError> {
        if frame[0] != HEAD || frame[1] != COMMAND_ID || frame[18] != TAIL {
            return Err(FrameError::MalformedFrame);
        }
        if sum8(&frame[2..17]) != frame[17] {
            return Err(FrameError::ChecksumMismatch);
        }
        let command = Command::from_u8(frame[2]).ok_or(FrameError::MalformedFrame)?;
        let mode = Mode::from_u8(frame[3]).ok_or(FrameError::MalformedFrame)?;
        let mut data = [0u8; REQUEST_DATA_LEN];
        data.copy_from_slice(&frame[4..15]);

        Ok(Request {
            command,
            mode,
            data,
            target: DeviceId::new(frame[15], frame[16]),
        })
    }
}

/// A validated frame received from the sensor.
///
/// Both shapes share the same header, checksum and tail. Which accessors
/// are meaningful depends on the shape, and for replies on the command
/// they answer: calling one on the wrong frame panics with a
/// [`ContractViolation`].
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Response {
    /// A data report, sent unprompted in active mode or after a query.
    Measurement(Measurement),
    /// A reply to a command.
    Reply(Reply),
}

impl Response {
    /// Validates a raw frame.
    ///
    /// Framing is checked first, then the checksum. Discriminators other
    /// than `REPLY_ID` are treated as data reports.
    pub fn parse(frame: &[u8; RESPONSE_LEN]) -> core::result::Result<Self, FrameError> {
        if frame[0] != HEAD || frame[9] != TAIL {
            return Err(FrameError::MalformedFrame);
        }

        let checksum = sum8(&frame[2..8]);
        if checksum != frame[8] {
            error!(
                "Bad checksum: Calculated {:02X}, Received {:02X}. Frame: {:02X?}",
                checksum, frame[8], frame
            );
            return Err(FrameError::ChecksumMismatch);
        }

        match frame[1] {
            REPLY_ID => Ok(Response::Reply(Reply { frame: *frame })),
            DATA_REPORT_ID => Ok(Response::Measurement(Measurement { frame: *frame })),
            other => {
                warn!(
                    "Frame has unexpected command ID: {:02X} (Expected {:02X} or {:02X})",
                    other, REPLY_ID, DATA_REPORT_ID
                );
                Ok(Response::Measurement(Measurement { frame: *frame }))
            }
        }
    }

    /// Returns `true` if this frame answers a command.
    pub fn is_reply(&self) -> bool {
        matches!(self, Response::Reply(_))
    }

    /// Raw bytes of the frame.
    pub fn bytes(&self) -> &[u8; RESPONSE_LEN] {
        match self {
            Response::Measurement(m) => &m.frame,
            Response::Reply(r) => &r.frame,
        }
    }

    /// PM2.5 concentration in µg/m³.
    ///
    /// # Panics
    ///
    /// If this is a reply frame.
    #[track_caller]
    pub fn pm2_5(&self) -> f32 {
        self.measurement("pm2_5").pm2_5()
    }

    /// PM10 concentration in µg/m³.
    ///
    /// # Panics
    ///
    /// If this is a reply frame.
    #[track_caller]
    pub fn pm10(&self) -> f32 {
        self.measurement("pm10").pm10()
    }

    /// ID of the sensor that sent the data report.
    ///
    /// # Panics
    ///
    /// If this is a reply frame.
    #[track_caller]
    pub fn device_id(&self) -> DeviceId {
        self.measurement("device_id").device_id()
    }

    #[track_caller]
    fn measurement(&self, accessor: &'static str) -> &Measurement {
        match self {
            Response::Measurement(m) => m,
            Response::Reply(r) => ContractViolation {
                accessor,
                expected: "data report",
                frame: r.frame,
            }
            .raise(),
        }
    }
}

/// A data report frame.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct Measurement {
    frame: [u8; RESPONSE_LEN],
}

impl Measurement {
    fn data(&self) -> &[u8] {
        &self.frame[2..8]
    }

    pub fn pm2_5(&self) -> f32 {
        f32::from(u16::from_le_bytes([self.data()[0], self.data()[1]])) / 10.0
    }

    pub fn pm10(&self) -> f32 {
        f32::from(u16::from_le_bytes([self.data()[2], self.data()[3]])) / 10.0
    }

    pub fn device_id(&self) -> DeviceId {
        DeviceId::new(self.data()[4], self.data()[5])
    }
}

/// A command reply frame.
///
/// The first data byte echoes the command being answered; the typed
/// accessors check it before interpreting the rest.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct Reply {
    frame: [u8; RESPONSE_LEN],
}

impl Reply {
    fn data(&self) -> &[u8] {
        &self.frame[2..8]
    }

    /// The echoed command byte.
    pub fn command(&self) -> u8 {
        self.data()[0]
    }

    /// Returns `true` if this reply answers `command`.
    pub fn answers(&self, command: Command) -> bool {
        self.command() == command as u8
    }

    /// The six data bytes, uninterpreted.
    pub fn raw(&self) -> [u8; RESPONSE_DATA_LEN] {
        let mut data = [0u8; RESPONSE_DATA_LEN];
        data.copy_from_slice(self.data());
        data
    }

    #[track_caller]
    fn payload_for(&self, command: Command, accessor: &'static str) -> &[u8] {
        if !self.answers(command) {
            let expected = match command {
                Command::ReportMode => "reply to ReportMode",
                Command::Query => "reply to Query",
                Command::DeviceId => "reply to DeviceId",
                Command::WorkState => "reply to WorkState",
                Command::Firmware => "reply to Firmware",
                Command::DutyCycle => "reply to DutyCycle",
            };
            ContractViolation {
                accessor,
                expected,
                frame: self.frame,
            }
            .raise();
        }
        self.data()
    }

    /// # Panics
    ///
    /// If this reply does not answer [`Command::Firmware`].
    #[track_caller]
    pub fn firmware(&self) -> Firmware {
        let data = self.payload_for(Command::Firmware, "firmware");
        Firmware {
            year: data[1],
            month: data[2],
            day: data[3],
        }
    }

    /// # Panics
    ///
    /// If this reply does not answer [`Command::DeviceId`].
    #[track_caller]
    pub fn device_id(&self) -> DeviceId {
        let data = self.payload_for(Command::DeviceId, "device_id");
        DeviceId::new(data[1], data[2])
    }

    /// # Panics
    ///
    /// If this reply does not answer [`Command::ReportMode`].
    #[track_caller]
    pub fn report_mode(&self) -> DeviceMode {
        DeviceMode::from_u8(self.payload_for(Command::ReportMode, "report_mode")[2])
    }

    /// # Panics
    ///
    /// If this reply does not answer [`Command::DutyCycle`].
    #[track_caller]
    pub fn duty_cycle(&self) -> u8 {
        self.payload_for(Command::DutyCycle, "duty_cycle")[2]
    }

    /// # Panics
    ///
    /// If this reply does not answer [`Command::WorkState`].
    #[track_caller]
    pub fn work_state(&self) -> OperationalState {
        OperationalState::from_u8(self.payload_for(Command::WorkState, "work_state")[2])
    }
}

/// Reads exactly one frame from the port and validates it.
pub async fn read_response<S: Read>(port: &mut S) -> Result<Response, S::Error> {
    let mut frame = [0u8; RESPONSE_LEN];
    port.read_exact(&mut frame).await?;
    debug!("Received frame: {:02X?}", frame);
    Ok(Response::parse(&frame)?)
}
