//! Error types for kts1622-core
//!
//! The driver distinguishes three failure kinds:
//!
//! - [`ConfigError`] - the handle could not be built (missing bus callback,
//!   bad device address)
//! - [`InvalidArgument`] - a selector passed to the API is out of range
//! - the bus error `E` - whatever the injected [`RegisterBus`] reported,
//!   passed through untouched
//!
//! The first two are detected before the bus is touched.
//!
//! [`RegisterBus`]: crate::bus::RegisterBus

use core::fmt;

/// Reasons a device handle could not be constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The register read callback was not supplied
    MissingReadCallback,
    /// The register write callback was not supplied
    MissingWriteCallback,
    /// Device address does not fit in 7 bits
    InvalidDeviceAddress(u8),
}

/// An out-of-range selector
///
/// Carries the raw value that was rejected so callers can report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidArgument {
    /// Port number other than 0 or 1
    Port(u8),
    /// Pin number above 7
    Pin(u8),
    /// Polarity encoding other than 0 or 1
    Polarity(u8),
    /// Direction encoding other than 0 or 1
    Direction(u8),
    /// Drive strength encoding above 3
    DriveStrength(u8),
    /// Interrupt edge encoding above 3
    InterruptEdge(u8),
    /// Output mode encoding other than 0 or 1
    OutputMode(u8),
    /// A named selector that could not be parsed
    Name,
}

/// Driver error, generic over the bus error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// Handle construction failed
    Config(ConfigError),
    /// A selector was out of range
    InvalidArgument(InvalidArgument),
    /// The bus reported a failure
    Bus(E),
}

impl<E> Error<E> {
    /// Returns the bus error, if this is one
    pub fn bus(&self) -> Option<&E> {
        match self {
            Error::Bus(e) => Some(e),
            _ => None,
        }
    }

    /// Maps the bus error type, leaving the other kinds as they are
    pub fn map_bus<F, O>(self, f: O) -> Error<F>
    where
        O: FnOnce(E) -> F,
    {
        match self {
            Error::Config(c) => Error::Config(c),
            Error::InvalidArgument(a) => Error::InvalidArgument(a),
            Error::Bus(e) => Error::Bus(f(e)),
        }
    }
}

impl<E> From<ConfigError> for Error<E> {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl<E> From<InvalidArgument> for Error<E> {
    fn from(e: InvalidArgument) -> Self {
        Error::InvalidArgument(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingReadCallback => write!(f, "register read callback is missing"),
            Self::MissingWriteCallback => write!(f, "register write callback is missing"),
            Self::InvalidDeviceAddress(addr) => {
                write!(f, "invalid device address 0x{:02X} (must be 7-bit)", addr)
            }
        }
    }
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Port(v) => write!(f, "undefined port {} (expected 0 or 1)", v),
            Self::Pin(v) => write!(f, "undefined pin {} (expected 0-7)", v),
            Self::Polarity(v) => write!(f, "undefined polarity {}", v),
            Self::Direction(v) => write!(f, "undefined direction {}", v),
            Self::DriveStrength(v) => write!(f, "undefined drive strength {}", v),
            Self::InterruptEdge(v) => write!(f, "undefined interrupt edge {}", v),
            Self::OutputMode(v) => write!(f, "undefined output mode {}", v),
            Self::Name => write!(f, "unrecognized selector name"),
        }
    }
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {}", e),
            Self::InvalidArgument(e) => write!(f, "invalid argument: {}", e),
            Self::Bus(e) => write!(f, "bus error: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for InvalidArgument {}

#[cfg(feature = "std")]
impl<E> std::error::Error for Error<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::InvalidArgument(e) => Some(e),
            Self::Bus(e) => Some(e),
        }
    }
}

/// Result type alias for driver operations
pub type Result<T, E> = core::result::Result<T, Error<E>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_bus_keeps_other_kinds() {
        let e: Error<u8> = Error::InvalidArgument(InvalidArgument::Port(2));
        assert_eq!(
            e.map_bus(u16::from),
            Error::InvalidArgument(InvalidArgument::Port(2))
        );

        let e: Error<u8> = Error::Bus(7);
        assert_eq!(e.map_bus(u16::from), Error::<u16>::Bus(7));
    }

    #[test]
    fn test_bus_accessor() {
        let e: Error<&str> = Error::Bus("nack");
        assert_eq!(e.bus(), Some(&"nack"));
        let e: Error<&str> = ConfigError::MissingReadCallback.into();
        assert_eq!(e.bus(), None);
    }
}
