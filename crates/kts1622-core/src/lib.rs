//! kts1622-core - Register-level driver for the KTS1622 GPIO expander
//!
//! The KTS1622 is a 16-bit I2C GPIO expander with two 8-bit ports. Besides
//! the classic input/output/polarity/configuration registers it has an
//! extended block for pull resistors, input latching, per-pin interrupt
//! masking and edge selection, drive strength and switch debouncing.
//!
//! This crate is `no_std`. It holds no register cache; the driver is a thin
//! translation from port/pin requests to register reads and writes on an
//! injected [`RegisterBus`](bus::RegisterBus).
//!
//! # Features
//!
//! - `std` - `std::error::Error` impls and TOML pin-setup files (includes `alloc`)
//! - `alloc` - allow `Box<dyn RegisterBus>` as a bus
//!
//! # Example
//!
//! ```ignore
//! use kts1622_core::{bus::HalBus, Kts1622, Port, Pin, Direction};
//!
//! let mut gpio = Kts1622::new(HalBus::new(i2c), 0x20)?;
//! gpio.set_pin_direction(Port::Port1, Pin::Pin0, Direction::Input)?;
//! gpio.enable_pullup(Port::Port1, Pin::Pin0)?;
//! let pressed = !gpio.pin_input(Port::Port1, Pin::Pin0)?;
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod bus;
#[cfg(feature = "std")]
pub mod config;
pub mod device;
pub mod error;
pub mod registers;
pub mod types;

pub use device::Kts1622;
pub use error::{ConfigError, Error, InvalidArgument, Result};
pub use types::{
    Direction, DriveStrength, InterruptEdge, IntoPin, IntoPort, OutputMode, Pin, Pins, Polarity,
    Port, Pull,
};
