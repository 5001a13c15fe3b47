#![cfg_attr(not(any(test, feature = "std")), no_std)]

use core::fmt;

use embedded_io_async::{Read, Write};
use log::debug;

mod constants;
pub use constants::*;

mod error;
pub use error::*;

mod config;
pub use config::*;

mod checksum;
pub use checksum::*;

mod command;
pub use command::*;

mod clock;
pub use clock::*;

mod frame;
pub use frame::*;

mod reply;
pub use reply::*;

#[cfg(test)]
mod mock;

/// Represents an SDS011 air quality sensor.
///
/// This struct provides methods to interact with the sensor,
/// such as initializing it, reading data, and configuring its settings.
/// The sensor owns the serial port until [`close`](Sds011::close) is called.
///
/// # Type Parameters
///
/// * `Serial`: The type of the serial interface used to communicate with the sensor.
///   It must implement `embedded_io_async::Read` and `embedded_io_async::Write`.
/// * `C`: The [`Clock`] used to timestamp measurements.
pub struct Sds011<Serial, C = NoClock> {
    serial: Option<Serial>,
    config: Config,
    clock: C,
}

/// Represents a single measurement read from the SDS011 sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<T = ()> {
    /// PM2.5 concentration in µg/m³.
    pub pm2_5: f32,
    /// PM10 concentration in µg/m³.
    pub pm10: f32,
    /// When the frame carrying this measurement was decoded.
    pub timestamp: T,
}

impl<T> fmt::Display for Point<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PM2.5: {} µg/m³ PM10: {} µg/m³", self.pm2_5, self.pm10)
    }
}

// Logs a failed operation by name and passes the error through untouched.
fn failed<E: fmt::Debug>(operation: &'static str) -> impl FnOnce(Error<E>) -> Error<E> {
    move |e| {
        log::error!("{} failed: {:?}", operation, e);
        e
    }
}

impl<S> Sds011<S> {
    /// Creates a new `Sds011` sensor instance whose measurements carry no timestamp.
    ///
    /// # Arguments
    ///
    /// * `serial`: The serial interface for communication with the sensor.
    /// * `config`: The initial configuration for the sensor.
    pub fn new(serial: S, config: Config) -> Self {
        Self::with_clock(serial, config, NoClock)
    }
}

impl<S, C: Clock> Sds011<S, C> {
    /// Creates a new `Sds011` sensor instance that timestamps measurements with `clock`.
    pub fn with_clock(serial: S, config: Config, clock: C) -> Self {
        Self {
            serial: Some(serial),
            config,
            clock,
        }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Releases the serial port.
    ///
    /// Returns the port the first time it is called and `None` afterwards.
    /// Every operation on a closed sensor fails with [`Error::Closed`].
    pub fn close(&mut self) -> Option<S> {
        let serial = self.serial.take();
        if serial.is_some() {
            debug!("Serial port released");
        }
        serial
    }

    /// Returns `true` once [`close`](Sds011::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.serial.is_none()
    }
}

impl<S, C> Sds011<S, C>
where
    S: Read + Write,
    C: Clock,
{
    /// Initializes the SDS011 sensor according to the provided configuration.
    ///
    /// This involves:
    /// - Flushing the serial buffer.
    /// - Setting the reporting mode (Active or Passive).
    /// - If Passive mode, putting the sensor to sleep initially.
    /// - If Active mode, setting the duty cycle to continuous.
    pub async fn init(&mut self) -> Result<(), S::Error> {
        self.port()?
            .flush()
            .await
            .map_err(Error::Io)
            .map_err(failed("init: flush"))?;

        let mode = self.config.mode;
        self.set_reporting_mode(mode)
            .await
            .map_err(failed("init: set reporting mode"))?;

        if mode == DeviceMode::Passive {
            self.set_operational_state(OperationalState::Sleeping)
                .await
                .map_err(failed("init: sleep (Passive Mode)"))?;
        } else {
            self.set_duty_cycle(0)
                .await
                .map_err(failed("init: continuous duty cycle (Active Mode)"))?;
        }

        debug!("SDS011 init sequence complete.");
        Ok(())
    }

    /// Reads a single measurement according to the configured mode.
    ///
    /// In Passive mode the sensor is woken up, queried and put back to
    /// sleep. In Active mode this waits for the next data report.
    ///
    /// # Panics
    ///
    /// See [`read`](Sds011::read).
    pub async fn read_sample(&mut self) -> Result<Point<C::Instant>, S::Error> {
        if self.config.mode == DeviceMode::Active {
            return self.read().await;
        }

        debug!("Waking up sensor (Passive Mode)");
        self.wake().await?;

        let point = self.query().await?;

        debug!("Putting sensor back to sleep (Passive Mode)");
        self.sleep().await?;
        Ok(point)
    }

    /// Waits for the next data report.
    ///
    /// Nothing is written to the port; this only makes sense while the
    /// sensor is streaming in Active mode, or right after a query. There is
    /// no timeout: wrap the port or the future to bound the wait.
    ///
    /// # Panics
    ///
    /// If the frame read is a command reply rather than a data report.
    pub async fn read(&mut self) -> Result<Point<C::Instant>, S::Error> {
        let response = read_response(self.port()?)
            .await
            .map_err(failed("read"))?;

        let point = Point {
            pm2_5: response.pm2_5(),
            pm10: response.pm10(),
            timestamp: self.clock.now(),
        };
        debug!("Read measurement - PM2.5: {}, PM10: {}", point.pm2_5, point.pm10);
        Ok(point)
    }

    /// Asks the sensor for a measurement and reads the data report it sends back.
    ///
    /// # Panics
    ///
    /// See [`read`](Sds011::read).
    pub async fn query(&mut self) -> Result<Point<C::Instant>, S::Error> {
        debug!("Querying sensor data (CMD 0x04)");
        self.send(Command::Query, Mode::Get, 0)
            .await
            .map_err(failed("query"))?;
        self.read().await
    }

    /// Queries the sensor's current reporting mode.
    pub async fn get_reporting_mode(&mut self) -> Result<DeviceMode, S::Error> {
        let reply = self
            .command(Command::ReportMode, Mode::Get, 0)
            .await
            .map_err(failed("get_reporting_mode"))?;
        let mode = reply.report_mode();
        debug!("Queried reporting mode: {:?}", mode);
        Ok(mode)
    }

    /// Sets the sensor's reporting mode (Active or Passive).
    ///
    /// The configured mode is updated once the sensor replies.
    pub async fn set_reporting_mode(&mut self, mode: DeviceMode) -> Result<(), S::Error> {
        debug!("Setting reporting mode to: {:?}", mode);
        self.command(Command::ReportMode, Mode::Set, mode.as_u8())
            .await
            .map_err(failed("set_reporting_mode"))?;
        self.config.mode = mode;
        Ok(())
    }

    /// Makes the sensor report data continuously.
    pub async fn set_active(&mut self) -> Result<(), S::Error> {
        self.set_reporting_mode(DeviceMode::Active).await
    }

    /// Makes the sensor report data only when queried.
    pub async fn set_passive(&mut self) -> Result<(), S::Error> {
        self.set_reporting_mode(DeviceMode::Passive).await
    }

    /// Queries the sensor's current operational state.
    pub async fn get_operational_state(&mut self) -> Result<OperationalState, S::Error> {
        let reply = self
            .command(Command::WorkState, Mode::Get, 0)
            .await
            .map_err(failed("get_operational_state"))?;
        let state = reply.work_state();
        debug!("Queried operational state: {:?}", state);
        Ok(state)
    }

    /// Sets the sensor's operational state (Sleeping or Working).
    pub async fn set_operational_state(&mut self, state: OperationalState) -> Result<(), S::Error> {
        debug!("Setting operational state to: {:?}", state);
        self.command(Command::WorkState, Mode::Set, state.as_u8())
            .await
            .map_err(failed("set_operational_state"))?;
        Ok(())
    }

    /// Returns `true` if the sensor is working rather than sleeping.
    pub async fn is_awake(&mut self) -> Result<bool, S::Error> {
        Ok(self.get_operational_state().await? == OperationalState::Working)
    }

    /// Wakes the sensor up.
    pub async fn wake(&mut self) -> Result<(), S::Error> {
        self.set_operational_state(OperationalState::Working).await
    }

    /// Puts the sensor to sleep.
    pub async fn sleep(&mut self) -> Result<(), S::Error> {
        self.set_operational_state(OperationalState::Sleeping).await
    }

    /// Queries the sensor's current duty cycle.
    ///
    /// A value of `0` means continuous mode. Values `1-30` correspond
    /// to reporting data once every `N` minutes.
    pub async fn get_duty_cycle(&mut self) -> Result<u8, S::Error> {
        let reply = self
            .command(Command::DutyCycle, Mode::Get, 0)
            .await
            .map_err(failed("get_duty_cycle"))?;
        let minutes = reply.duty_cycle();
        debug!("Queried duty cycle: {} minutes", minutes);
        Ok(minutes)
    }

    /// Sets the sensor's duty cycle.
    ///
    /// - A value of `0` sets the sensor to continuous working mode.
    /// - Values from `1` to `30` make the sensor work for 30 seconds, then sleep for
    ///   `(minutes - 1) * 60 + 30` seconds, reporting data once per `minutes` minutes.
    ///
    /// Fails with [`Error::InvalidArgument`] for values above 30, before
    /// anything is written to the port.
    pub async fn set_duty_cycle(&mut self, minutes: u8) -> Result<(), S::Error> {
        if minutes > MAX_DUTY_CYCLE {
            log::error!(
                "Duty cycle {} out of range (0-{})",
                minutes,
                MAX_DUTY_CYCLE
            );
            return Err(Error::InvalidArgument);
        }
        debug!("Setting duty cycle to: {} minutes", minutes);
        self.command(Command::DutyCycle, Mode::Set, minutes)
            .await
            .map_err(failed("set_duty_cycle"))?;
        Ok(())
    }

    /// Queries the device ID of the sensor.
    pub async fn get_device_id(&mut self) -> Result<DeviceId, S::Error> {
        let reply = self
            .command(Command::DeviceId, Mode::Get, 0)
            .await
            .map_err(failed("get_device_id"))?;
        let id = reply.device_id();
        debug!("Queried device ID: {}", id);
        Ok(id)
    }

    /// Retrieves the firmware version of the sensor.
    ///
    /// For example, a firmware built on 2015-10-21 is returned with year 15,
    /// month 10 and day 21, and displays as `15-10-21`.
    pub async fn get_firmware(&mut self) -> Result<Firmware, S::Error> {
        let reply = self
            .command(Command::Firmware, Mode::Get, 0)
            .await
            .map_err(failed("get_firmware"))?;
        let firmware = reply.firmware();
        debug!("Firmware version: {}", firmware);
        Ok(firmware)
    }

    fn port(&mut self) -> Result<&mut S, S::Error> {
        self.serial.as_mut().ok_or(Error::Closed)
    }

    // Writes a command frame addressed to the configured device.
    async fn send(&mut self, command: Command, mode: Mode, value: u8) -> Result<(), S::Error> {
        let frame = Request::new(command, mode, value)
            .target(self.config.id)
            .to_bytes();

        debug!("Executing command: {:02X?}", frame);
        let port = self.port()?;
        port.write_all(&frame).await.map_err(Error::Io)?;
        port.flush().await.map_err(Error::Io)?;
        Ok(())
    }

    // Sends a command and waits for the sensor to reply to it.
    async fn command(&mut self, command: Command, mode: Mode, value: u8) -> Result<Reply, S::Error> {
        self.send(command, mode, value).await?;

        let attempts = self.config.reply_attempts;
        let reply = await_reply_to(self.port()?, command, attempts).await?;
        debug!("{:?} reply: {:02X?}", command, reply.raw());
        Ok(reply)
    }
}
