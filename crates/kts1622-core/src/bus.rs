//! Bus access capability
//!
//! The driver never talks to a bus controller directly. It is handed a
//! [`RegisterBus`]: two blocking primitives that read and write one byte at
//! a register index of a device address. Whatever error type the bus uses
//! is passed back to the caller unchanged.
//!
//! Three ways to get one:
//!
//! - implement [`RegisterBus`] for a transport (see `kts1622-linux-i2c`)
//! - wrap an `embedded-hal` I2C peripheral in [`HalBus`]
//! - hand two closures to [`CallbackBus`]

use crate::error::ConfigError;
use embedded_hal::i2c::{I2c, SevenBitAddress};

/// Register-oriented bus (blocking)
///
/// ## Concurrency
///
/// Implementations are not required to be thread-safe. When two driver
/// handles share one physical bus, the bus itself has to be serialized
/// (e.g. a `Mutex` around the transport).
pub trait RegisterBus {
    /// Error reported by the transport
    type Error;

    /// Read one byte from `register` of the device at `device_address`
    fn read_register(&mut self, device_address: u8, register: u8) -> Result<u8, Self::Error>;

    /// Write one byte to `register` of the device at `device_address`
    fn write_register(
        &mut self,
        device_address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), Self::Error>;
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    type Error = B::Error;

    fn read_register(&mut self, device_address: u8, register: u8) -> Result<u8, Self::Error> {
        (**self).read_register(device_address, register)
    }

    fn write_register(
        &mut self,
        device_address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), Self::Error> {
        (**self).write_register(device_address, register, value)
    }
}

// Boxed buses allow trait objects for runtime bus selection
#[cfg(feature = "alloc")]
impl<B: RegisterBus + ?Sized> RegisterBus for alloc::boxed::Box<B> {
    type Error = B::Error;

    fn read_register(&mut self, device_address: u8, register: u8) -> Result<u8, Self::Error> {
        (**self).read_register(device_address, register)
    }

    fn write_register(
        &mut self,
        device_address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), Self::Error> {
        (**self).write_register(device_address, register, value)
    }
}

/// Bus built from a pair of callbacks
///
/// This is the closest match to a C-style driver that takes a read function
/// and a write function. Both must be present:
///
/// ```
/// use kts1622_core::bus::CallbackBus;
/// use kts1622_core::error::ConfigError;
///
/// let read = |_dev: u8, _reg: u8| -> Result<u8, ()> { Ok(0) };
/// let write = |_dev: u8, _reg: u8, _val: u8| -> Result<(), ()> { Ok(()) };
///
/// assert!(CallbackBus::new(Some(read), Some(write)).is_ok());
/// assert_eq!(
///     CallbackBus::new(Some(read), None::<fn(u8, u8, u8) -> Result<(), ()>>).err(),
///     Some(ConfigError::MissingWriteCallback),
/// );
/// ```
pub struct CallbackBus<R, W> {
    read: R,
    write: W,
}

impl<R, W, E> CallbackBus<R, W>
where
    R: FnMut(u8, u8) -> Result<u8, E>,
    W: FnMut(u8, u8, u8) -> Result<(), E>,
{
    /// Create a bus from optional callbacks
    ///
    /// Both callbacks are checked before either is stored.
    pub fn new(read: Option<R>, write: Option<W>) -> Result<Self, ConfigError> {
        match (read, write) {
            (Some(read), Some(write)) => Ok(Self { read, write }),
            (None, _) => Err(ConfigError::MissingReadCallback),
            (_, None) => Err(ConfigError::MissingWriteCallback),
        }
    }
}

impl<R, W, E> RegisterBus for CallbackBus<R, W>
where
    R: FnMut(u8, u8) -> Result<u8, E>,
    W: FnMut(u8, u8, u8) -> Result<(), E>,
{
    type Error = E;

    fn read_register(&mut self, device_address: u8, register: u8) -> Result<u8, E> {
        (self.read)(device_address, register)
    }

    fn write_register(&mut self, device_address: u8, register: u8, value: u8) -> Result<(), E> {
        (self.write)(device_address, register, value)
    }
}

/// Adapter for any `embedded-hal` 1.0 I2C peripheral
///
/// Reads are a combined write-read (register index, then one byte with a
/// repeated start); writes send the index followed by the value.
pub struct HalBus<I2C> {
    i2c: I2C,
}

impl<I2C: I2c<SevenBitAddress>> HalBus<I2C> {
    /// Wrap an I2C peripheral
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Release the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c<SevenBitAddress>> RegisterBus for HalBus<I2C> {
    type Error = I2C::Error;

    fn read_register(&mut self, device_address: u8, register: u8) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(device_address, &[register], &mut buf)?;
        Ok(buf[0])
    }

    fn write_register(
        &mut self,
        device_address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), Self::Error> {
        self.i2c.write(device_address, &[register, value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    use std::vec;

    #[test]
    fn test_hal_bus_read_is_write_read() {
        let expectations = [I2cTransaction::write_read(0x20, vec![0x4C], vec![0x81])];
        let mut bus = HalBus::new(I2cMock::new(&expectations));

        assert_eq!(bus.read_register(0x20, 0x4C).unwrap(), 0x81);

        bus.release().done();
    }

    #[test]
    fn test_hal_bus_write_sends_index_then_value() {
        let expectations = [I2cTransaction::write(0x21, vec![0x03, 0x5A])];
        let mut bus = HalBus::new(I2cMock::new(&expectations));

        bus.write_register(0x21, 0x03, 0x5A).unwrap();

        bus.release().done();
    }

    #[test]
    fn test_callback_bus_requires_both_callbacks() {
        let read = |_: u8, _: u8| -> Result<u8, ()> { Ok(0) };
        let write = |_: u8, _: u8, _: u8| -> Result<(), ()> { Ok(()) };

        assert!(matches!(
            CallbackBus::new(None::<fn(u8, u8) -> Result<u8, ()>>, Some(write)),
            Err(ConfigError::MissingReadCallback)
        ));
        assert!(matches!(
            CallbackBus::new(Some(read), None::<fn(u8, u8, u8) -> Result<(), ()>>),
            Err(ConfigError::MissingWriteCallback)
        ));
        assert!(matches!(
            CallbackBus::<fn(u8, u8) -> Result<u8, ()>, fn(u8, u8, u8) -> Result<(), ()>>::new(
                None, None
            ),
            Err(ConfigError::MissingReadCallback)
        ));
    }

    #[test]
    fn test_callback_bus_forwards_calls() {
        let mut last_write = None;
        {
            let read = |dev: u8, reg: u8| -> Result<u8, ()> { Ok(dev ^ reg) };
            let write = |dev: u8, reg: u8, val: u8| -> Result<(), ()> {
                last_write = Some((dev, reg, val));
                Ok(())
            };
            let mut bus = CallbackBus::new(Some(read), Some(write)).unwrap();
            assert_eq!(bus.read_register(0x20, 0x01), Ok(0x21));
            bus.write_register(0x20, 0x02, 0xAA).unwrap();
        }
        assert_eq!(last_write, Some((0x20, 0x02, 0xAA)));
    }
}
