use core::fmt;

use embedded_io_async::ReadExactError;

/// A specialized [`Result`] type for sensor operations.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Errors raised while decoding a frame, independent of any port.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum FrameError {
    /// The frame does not start with `HEAD` or end with `TAIL`.
    MalformedFrame,
    /// The checksum byte does not match the frame data.
    ChecksumMismatch,
}

/// Error type for sensor operations.
///
/// The generic parameter `E` is the error of the underlying serial port.
#[non_exhaustive]
#[derive(PartialEq, Eq, Debug)]
pub enum Error<E> {
    /// A received frame had a bad header or tail byte.
    MalformedFrame,
    /// A received frame failed checksum validation.
    ChecksumMismatch,
    /// No reply arrived within the configured number of frames.
    NoReply,
    /// An argument was outside the range the sensor accepts.
    InvalidArgument,
    /// The port reached end-of-file before a full frame was read.
    UnexpectedEof,
    /// The sensor was closed and no longer owns a port.
    Closed,
    /// A port-specific input/output error.
    Io(E),
}

impl<E> Error<E> {
    /// Returns `true` if the error came from the port rather than the protocol.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::UnexpectedEof | Error::Closed | Error::Io(_))
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedFrame => write!(f, "malformed frame"),
            Error::ChecksumMismatch => write!(f, "checksum mismatch"),
            Error::NoReply => write!(f, "no reply"),
            Error::InvalidArgument => write!(f, "invalid argument"),
            Error::UnexpectedEof => write!(f, "unexpected end-of-file"),
            Error::Closed => write!(f, "sensor closed"),
            Error::Io(err) => write!(f, "input/output error: {err:?}"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}

impl<E> From<ReadExactError<E>> for Error<E> {
    fn from(err: ReadExactError<E>) -> Self {
        match err {
            ReadExactError::UnexpectedEof => Error::UnexpectedEof,
            ReadExactError::Other(err) => Error::Io(err),
        }
    }
}

impl<E> From<FrameError> for Error<E> {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::MalformedFrame => Error::MalformedFrame,
            FrameError::ChecksumMismatch => Error::ChecksumMismatch,
        }
    }
}

/// Describes an accessor used on a frame of the wrong shape.
///
/// This is a programming error: reading measurements out of a command
/// reply, or a setting out of a reply to another command, would yield
/// meaningless numbers. Accessors panic with this as their message and it
/// is never returned as an `Err`.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct ContractViolation {
    /// The accessor that was called.
    pub accessor: &'static str,
    /// What the accessor required, e.g. `data report` or `reply to Firmware`.
    pub expected: &'static str,
    /// Raw bytes of the offending frame.
    pub frame: [u8; 10],
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "contract violation: `{}` requires a {}, got frame {:02X?}",
            self.accessor, self.expected, self.frame
        )
    }
}

impl ContractViolation {
    #[track_caller]
    pub(crate) fn raise(self) -> ! {
        panic!("{}", self)
    }
}
