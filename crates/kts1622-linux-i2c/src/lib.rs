//! kts1622-linux-i2c - Linux i2c-dev transport
//!
//! This crate provides a [`RegisterBus`](kts1622_core::bus::RegisterBus) over
//! the Linux `/dev/i2c-N` character devices, using the `I2C_RDWR` ioctl so
//! a register read is one combined transfer.
//!
//! # Example
//!
//! ```no_run
//! use kts1622_core::{Kts1622, Port};
//! use kts1622_linux_i2c::LinuxI2c;
//!
//! let bus = LinuxI2c::open_device("/dev/i2c-1")?;
//! let mut gpio = Kts1622::new(bus, 0x20)?;
//! println!("P0 = 0x{:02X}", gpio.port_input(Port::Port0)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with kts1622 CLI
//!
//! ```bash
//! kts1622 read-port -b linux_i2c:bus=1 --port 0
//! kts1622 dump -b linux_i2c:dev=/dev/i2c-1 -a 0x21
//! ```
//!
//! # System Requirements
//!
//! - Kernel with i2c-dev (`CONFIG_I2C_CHARDEV`)
//! - Read/write access to `/dev/i2c-N`, usually via the `i2c` group

pub mod device;
pub mod error;

pub use device::{parse_options, LinuxI2c, LinuxI2cConfig};
pub use error::{LinuxI2cError, Result};

/// Open a Linux I2C adapter from programmer-style options
///
/// # Example Options
///
/// - `dev=/dev/i2c-1` - device path
/// - `bus=1` - adapter number, shorthand for `dev=/dev/i2c-1`
pub fn open_linux_i2c(
    options: &[(&str, &str)],
) -> std::result::Result<LinuxI2c, Box<dyn std::error::Error>> {
    let config = parse_options(options)?;
    let i2c = LinuxI2c::open(&config)?;
    Ok(i2c)
}
