use core::fmt::Debug;

/// Source of timestamps for measurements.
///
/// The sensor does not timestamp its reports, so the driver stamps each
/// [`Point`](crate::Point) when its frame decodes.
pub trait Clock {
    type Instant: Copy + Debug;

    fn now(&self) -> Self::Instant;
}

/// Clock for targets without a time source; points carry `()`.
#[derive(Default, Debug, Copy, Clone)]
pub struct NoClock;

impl Clock for NoClock {
    type Instant = ();

    fn now(&self) -> Self::Instant {}
}

/// Wall-clock time from the operating system.
#[cfg(feature = "std")]
#[derive(Default, Debug, Copy, Clone)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    type Instant = std::time::SystemTime;

    fn now(&self) -> Self::Instant {
        std::time::SystemTime::now()
    }
}
