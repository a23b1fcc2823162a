//! KTS1622 device driver
//!
//! [`Kts1622`] turns port/pin requests into register accesses on a
//! [`RegisterBus`]. It keeps no copy of the device registers: every query
//! reads the chip and every per-pin change is a fresh read-modify-write.
//!
//! # Example
//!
//! ```
//! use kts1622_core::bus::CallbackBus;
//! use kts1622_core::{Direction, Kts1622, Pin, Port};
//!
//! let mut regs = [0u8; 0x60];
//! let regs = core::cell::RefCell::new(&mut regs);
//! let bus = CallbackBus::new(
//!     Some(|_dev: u8, reg: u8| -> Result<u8, ()> { Ok(regs.borrow()[reg as usize]) }),
//!     Some(|_dev: u8, reg: u8, val: u8| -> Result<(), ()> {
//!         regs.borrow_mut()[reg as usize] = val;
//!         Ok(())
//!     }),
//! )
//! .unwrap();
//!
//! let mut gpio = Kts1622::new(bus, Kts1622::<()>::DEFAULT_ADDRESS).unwrap();
//! gpio.set_pin_direction(Port::Port0, Pin::Pin3, Direction::Output).unwrap();
//! gpio.set_pin_output(Port::Port0, Pin::Pin3, true).unwrap();
//! assert_eq!(gpio.port_output(Port::Port0).unwrap(), 0b0000_1000);
//! ```

use crate::bus::RegisterBus;
use crate::error::{ConfigError, Error, InvalidArgument, Result};
use crate::registers::{RegisterInfo, RegisterKind, REGISTER_MAP};
use crate::types::{
    Direction, DriveStrength, InterruptEdge, IntoPin, IntoPort, OutputMode, Pin, Pins, Polarity,
    Port, Pull,
};

/// Highest valid 7-bit I2C address
const MAX_DEVICE_ADDRESS: u8 = 0x7F;

/// KTS1622 GPIO expander
///
/// The handle holds the device address and the bus. Both are fixed at
/// construction.
///
/// ## Concurrency
///
/// Per-pin setters read the register, change one bit (or one 2-bit field)
/// and write the byte back. Two callers doing this on the same port at the
/// same time can lose an update, so access to one physical device must be
/// serialized by the caller, e.g. by keeping the handle on one thread or
/// behind a `Mutex`. Operations on different ports touch different
/// registers and cannot clobber each other.
#[derive(Debug)]
pub struct Kts1622<B> {
    bus: B,
    address: u8,
}

impl<B> Kts1622<B> {
    /// Address with ADDR tied to GND
    pub const DEFAULT_ADDRESS: u8 = 0x20;
    /// Address with ADDR tied to VDD
    pub const ALT_ADDRESS: u8 = 0x21;
}

impl<B: RegisterBus> Kts1622<B> {
    /// Create a driver for the device at `address` on `bus`
    ///
    /// The address is validated before the handle is built.
    pub fn new(bus: B, address: u8) -> core::result::Result<Self, ConfigError> {
        if address > MAX_DEVICE_ADDRESS {
            return Err(ConfigError::InvalidDeviceAddress(address));
        }
        log::debug!("kts1622: new handle at 0x{:02X}", address);
        Ok(Self { bus, address })
    }

    /// Device address on the bus
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Consume the driver and return the bus
    pub fn release(self) -> B {
        self.bus
    }

    fn read(&mut self, register: u8) -> Result<u8, B::Error> {
        let value = self
            .bus
            .read_register(self.address, register)
            .map_err(Error::Bus)?;
        log::trace!("kts1622: read 0x{:02X} -> 0x{:02X}", register, value);
        Ok(value)
    }

    fn write(&mut self, register: u8, value: u8) -> Result<(), B::Error> {
        log::trace!("kts1622: write 0x{:02X} <- 0x{:02X}", register, value);
        self.bus
            .write_register(self.address, register, value)
            .map_err(Error::Bus)
    }

    /// Read-modify-write of one pin's field in a register kind
    ///
    /// Works for 1-bit kinds and for the 2-bit split kinds. Bits belonging
    /// to other pins are written back as they were read.
    fn modify_field(
        &mut self,
        kind: RegisterKind,
        port: Port,
        pin: Pin,
        value: u8,
    ) -> Result<(), B::Error> {
        let register = kind.address_for_pin(port, pin);
        let shift = kind.field_shift(pin);
        let field_mask = ((1u8 << kind.field_width()) - 1) << shift;

        let old = self.read(register)?;
        let new = (old & !field_mask) | ((value << shift) & field_mask);
        log::debug!(
            "kts1622: {} {}.{} = {} (0x{:02X} -> 0x{:02X})",
            kind.name(),
            port,
            pin,
            value,
            old,
            new
        );
        self.write(register, new)
    }

    fn read_field(&mut self, kind: RegisterKind, port: Port, pin: Pin) -> Result<u8, B::Error> {
        let register = kind.address_for_pin(port, pin);
        let shift = kind.field_shift(pin);
        let field_mask = (1u8 << kind.field_width()) - 1;
        Ok((self.read(register)? >> shift) & field_mask)
    }

    fn read_bit(&mut self, kind: RegisterKind, port: Port, pin: Pin) -> Result<bool, B::Error> {
        Ok(self.read_field(kind, port, pin)? != 0)
    }

    fn read_port(&mut self, kind: RegisterKind, port: impl IntoPort) -> Result<u8, B::Error> {
        let port = port.into_port()?;
        self.read(kind.address(port))
    }

    fn write_port(
        &mut self,
        kind: RegisterKind,
        port: impl IntoPort,
        value: u8,
    ) -> Result<(), B::Error> {
        let port = port.into_port()?;
        self.write(kind.address(port), value)
    }

    fn set_bit(
        &mut self,
        kind: RegisterKind,
        port: impl IntoPort,
        pin: impl IntoPin,
        value: bool,
    ) -> Result<(), B::Error> {
        let (port, pin) = selectors(port, pin)?;
        self.modify_field(kind, port, pin, value as u8)
    }

    // ========================================================================
    // Input / output data
    // ========================================================================

    /// Read the input register of a port
    pub fn port_input(&mut self, port: impl IntoPort) -> Result<u8, B::Error> {
        self.read_port(RegisterKind::InputData, port)
    }

    /// Read one pin's input level
    pub fn pin_input(&mut self, port: impl IntoPort, pin: impl IntoPin) -> Result<bool, B::Error> {
        let (port, pin) = selectors(port, pin)?;
        let value = self.port_input(port)?;
        Ok(value & pin.bit() != 0)
    }

    /// Read the output latch of a port
    pub fn port_output(&mut self, port: impl IntoPort) -> Result<u8, B::Error> {
        self.read_port(RegisterKind::OutputData, port)
    }

    /// Overwrite the output latch of a port
    pub fn set_port_output(&mut self, port: impl IntoPort, value: u8) -> Result<(), B::Error> {
        self.write_port(RegisterKind::OutputData, port, value)
    }

    /// Set one pin's output latch
    pub fn set_pin_output(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
        value: bool,
    ) -> Result<(), B::Error> {
        self.set_bit(RegisterKind::OutputData, port, pin, value)
    }

    // ========================================================================
    // Polarity and direction
    // ========================================================================

    /// Set the input polarity of all pins of a port
    ///
    /// Writes 0x00 or 0xFF to the polarity register.
    pub fn set_port_polarity(
        &mut self,
        port: impl IntoPort,
        polarity: Polarity,
    ) -> Result<(), B::Error> {
        self.write_port(RegisterKind::Polarity, port, polarity.port_value())
    }

    /// Set the input polarity of one pin
    pub fn set_pin_polarity(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
        polarity: Polarity,
    ) -> Result<(), B::Error> {
        self.set_bit(RegisterKind::Polarity, port, pin, polarity == Polarity::Inverted)
    }

    /// Read back the input polarity of one pin
    pub fn pin_polarity(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
    ) -> Result<Polarity, B::Error> {
        let (port, pin) = selectors(port, pin)?;
        Ok(if self.read_bit(RegisterKind::Polarity, port, pin)? {
            Polarity::Inverted
        } else {
            Polarity::NotInverted
        })
    }

    /// Set the direction of all pins of a port
    pub fn set_port_direction(
        &mut self,
        port: impl IntoPort,
        direction: Direction,
    ) -> Result<(), B::Error> {
        let value = match direction {
            Direction::Output => 0x00,
            Direction::Input => 0xFF,
        };
        self.write_port(RegisterKind::Direction, port, value)
    }

    /// Set the direction of one pin
    pub fn set_pin_direction(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
        direction: Direction,
    ) -> Result<(), B::Error> {
        self.set_bit(RegisterKind::Direction, port, pin, direction == Direction::Input)
    }

    /// Read back the direction of one pin
    pub fn pin_direction(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
    ) -> Result<Direction, B::Error> {
        let (port, pin) = selectors(port, pin)?;
        Ok(if self.read_bit(RegisterKind::Direction, port, pin)? {
            Direction::Input
        } else {
            Direction::Output
        })
    }

    // ========================================================================
    // Input latch
    // ========================================================================

    /// Latch the input state of a pin until the input register is read
    pub fn enable_latch(&mut self, port: impl IntoPort, pin: impl IntoPin) -> Result<(), B::Error> {
        self.set_bit(RegisterKind::InputLatch, port, pin, true)
    }

    /// Stop latching the input state of a pin
    pub fn disable_latch(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
    ) -> Result<(), B::Error> {
        self.set_bit(RegisterKind::InputLatch, port, pin, false)
    }

    /// Whether input latching is enabled for a pin
    pub fn is_latched(&mut self, port: impl IntoPort, pin: impl IntoPin) -> Result<bool, B::Error> {
        let (port, pin) = selectors(port, pin)?;
        self.read_bit(RegisterKind::InputLatch, port, pin)
    }

    // ========================================================================
    // Pull resistors
    // ========================================================================

    /// Enable the pull-up resistor of a pin
    ///
    /// The selection is switched to pull-up before the resistor is enabled.
    pub fn enable_pullup(&mut self, port: impl IntoPort, pin: impl IntoPin) -> Result<(), B::Error> {
        let (port, pin) = selectors(port, pin)?;
        self.modify_field(RegisterKind::PullSelect, port, pin, 1)?;
        self.modify_field(RegisterKind::PullEnable, port, pin, 1)
    }

    /// Disable the pull-up resistor of a pin
    ///
    /// Does nothing if the pin is configured for pull-down.
    pub fn disable_pullup(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
    ) -> Result<(), B::Error> {
        let (port, pin) = selectors(port, pin)?;
        if self.read_bit(RegisterKind::PullSelect, port, pin)? {
            self.modify_field(RegisterKind::PullEnable, port, pin, 0)
        } else {
            Ok(())
        }
    }

    /// Enable the pull-down resistor of a pin
    ///
    /// The selection is switched to pull-down before the resistor is enabled.
    pub fn enable_pulldown(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
    ) -> Result<(), B::Error> {
        let (port, pin) = selectors(port, pin)?;
        self.modify_field(RegisterKind::PullSelect, port, pin, 0)?;
        self.modify_field(RegisterKind::PullEnable, port, pin, 1)
    }

    /// Disable the pull-down resistor of a pin
    ///
    /// Does nothing if the pin is configured for pull-up.
    pub fn disable_pulldown(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
    ) -> Result<(), B::Error> {
        let (port, pin) = selectors(port, pin)?;
        if self.read_bit(RegisterKind::PullSelect, port, pin)? {
            Ok(())
        } else {
            self.modify_field(RegisterKind::PullEnable, port, pin, 0)
        }
    }

    /// Read back the pull configuration of a pin
    pub fn pull(&mut self, port: impl IntoPort, pin: impl IntoPin) -> Result<Pull, B::Error> {
        let (port, pin) = selectors(port, pin)?;
        if !self.read_bit(RegisterKind::PullEnable, port, pin)? {
            return Ok(Pull::None);
        }
        Ok(if self.read_bit(RegisterKind::PullSelect, port, pin)? {
            Pull::Up
        } else {
            Pull::Down
        })
    }

    /// Apply a pull configuration in one call
    pub fn set_pull(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
        pull: Pull,
    ) -> Result<(), B::Error> {
        let (port, pin) = selectors(port, pin)?;
        match pull {
            Pull::None => self.modify_field(RegisterKind::PullEnable, port, pin, 0),
            Pull::Up => self.enable_pullup(port, pin),
            Pull::Down => self.enable_pulldown(port, pin),
        }
    }

    // ========================================================================
    // Interrupts
    // ========================================================================

    /// Unmask the interrupt of a pin
    pub fn enable_interrupt(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
    ) -> Result<(), B::Error> {
        self.set_bit(RegisterKind::InterruptMask, port, pin, false)
    }

    /// Mask the interrupt of a pin
    pub fn disable_interrupt(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
    ) -> Result<(), B::Error> {
        self.set_bit(RegisterKind::InterruptMask, port, pin, true)
    }

    /// Whether a pin's interrupt is unmasked
    pub fn is_interrupt_enabled(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
    ) -> Result<bool, B::Error> {
        let (port, pin) = selectors(port, pin)?;
        Ok(!self.read_bit(RegisterKind::InterruptMask, port, pin)?)
    }

    /// Select the interrupt trigger of a pin
    pub fn set_interrupt_edge(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
        edge: InterruptEdge,
    ) -> Result<(), B::Error> {
        let (port, pin) = selectors(port, pin)?;
        self.modify_field(RegisterKind::InterruptEdge, port, pin, edge as u8)
    }

    /// Read back the interrupt trigger of a pin
    pub fn interrupt_edge(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
    ) -> Result<InterruptEdge, B::Error> {
        let (port, pin) = selectors(port, pin)?;
        let raw = self.read_field(RegisterKind::InterruptEdge, port, pin)?;
        Ok(InterruptEdge::try_from(raw)?)
    }

    /// Pending interrupt sources of a port
    pub fn interrupt_status(&mut self, port: impl IntoPort) -> Result<Pins, B::Error> {
        Ok(Pins::from_bits_retain(
            self.read_port(RegisterKind::InterruptStatus, port)?,
        ))
    }

    /// Clear pending interrupts of the given pins
    pub fn clear_interrupts(&mut self, port: impl IntoPort, pins: Pins) -> Result<(), B::Error> {
        self.write_port(RegisterKind::InterruptClear, port, pins.bits())
    }

    /// Read the input status register of a port
    pub fn input_status(&mut self, port: impl IntoPort) -> Result<u8, B::Error> {
        self.read_port(RegisterKind::InputStatus, port)
    }

    // ========================================================================
    // Output stage
    // ========================================================================

    /// Set the drive strength of a pin
    pub fn set_drive_strength(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
        strength: DriveStrength,
    ) -> Result<(), B::Error> {
        let (port, pin) = selectors(port, pin)?;
        self.modify_field(RegisterKind::DriveStrength, port, pin, strength as u8)
    }

    /// Read back the drive strength of a pin
    pub fn drive_strength(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
    ) -> Result<DriveStrength, B::Error> {
        let (port, pin) = selectors(port, pin)?;
        let raw = self.read_field(RegisterKind::DriveStrength, port, pin)?;
        Ok(DriveStrength::try_from(raw)?)
    }

    /// Select push-pull or open-drain outputs for a whole port
    ///
    /// The output port configuration register is shared by both ports; bit n
    /// belongs to port n.
    pub fn set_port_output_mode(
        &mut self,
        port: impl IntoPort,
        mode: OutputMode,
    ) -> Result<(), B::Error> {
        let port = port.into_port()?;
        let register = RegisterKind::OutputPortConfig.address(port);
        let bit = 1u8 << port.index();
        let old = self.read(register)?;
        let new = match mode {
            OutputMode::PushPull => old & !bit,
            OutputMode::OpenDrain => old | bit,
        };
        log::debug!("kts1622: output mode {} = {}", port, mode);
        self.write(register, new)
    }

    /// Read back the output mode of a port
    pub fn port_output_mode(&mut self, port: impl IntoPort) -> Result<OutputMode, B::Error> {
        let port = port.into_port()?;
        let value = self.read(RegisterKind::OutputPortConfig.address(port))?;
        Ok(if value & (1 << port.index()) != 0 {
            OutputMode::OpenDrain
        } else {
            OutputMode::PushPull
        })
    }

    // ========================================================================
    // Debounce
    // ========================================================================

    /// Enable switch debouncing on a pin
    pub fn enable_debounce(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
    ) -> Result<(), B::Error> {
        self.set_bit(RegisterKind::DebounceEnable, port, pin, true)
    }

    /// Disable switch debouncing on a pin
    pub fn disable_debounce(
        &mut self,
        port: impl IntoPort,
        pin: impl IntoPin,
    ) -> Result<(), B::Error> {
        self.set_bit(RegisterKind::DebounceEnable, port, pin, false)
    }

    /// Set the device-wide debounce count
    pub fn set_debounce_count(&mut self, count: u8) -> Result<(), B::Error> {
        self.write(RegisterKind::DebounceCount.address(Port::Port0), count)
    }

    /// Read the device-wide debounce count
    pub fn debounce_count(&mut self) -> Result<u8, B::Error> {
        self.read(RegisterKind::DebounceCount.address(Port::Port0))
    }

    // ========================================================================
    // Whole-device access
    // ========================================================================

    /// Read every readable register, in address order
    ///
    /// Write-only registers are skipped. Stops at the first bus error.
    pub fn read_register_map<F>(&mut self, mut visit: F) -> Result<(), B::Error>
    where
        F: FnMut(&RegisterInfo, u8),
    {
        for info in REGISTER_MAP.iter() {
            if !info.kind.access().is_readable() {
                continue;
            }
            let value = self.read(info.address)?;
            visit(info, value);
        }
        Ok(())
    }
}

/// Validate a port and pin pair together
fn selectors(
    port: impl IntoPort,
    pin: impl IntoPin,
) -> core::result::Result<(Port, Pin), InvalidArgument> {
    Ok((port.into_port()?, pin.into_pin()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers;

    /// 256-byte register file with a call counter
    struct FakeBus {
        regs: [u8; 256],
        reads: usize,
        writes: usize,
        fail: bool,
    }

    impl FakeBus {
        fn new() -> Self {
            Self {
                regs: [0; 256],
                reads: 0,
                writes: 0,
                fail: false,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Nack;

    impl RegisterBus for FakeBus {
        type Error = Nack;

        fn read_register(
            &mut self,
            device_address: u8,
            register: u8,
        ) -> core::result::Result<u8, Nack> {
            assert_eq!(device_address, 0x20);
            self.reads += 1;
            if self.fail {
                return Err(Nack);
            }
            Ok(self.regs[register as usize])
        }

        fn write_register(
            &mut self,
            device_address: u8,
            register: u8,
            value: u8,
        ) -> core::result::Result<(), Nack> {
            assert_eq!(device_address, 0x20);
            self.writes += 1;
            if self.fail {
                return Err(Nack);
            }
            self.regs[register as usize] = value;
            Ok(())
        }
    }

    fn device() -> Kts1622<FakeBus> {
        Kts1622::new(FakeBus::new(), 0x20).unwrap()
    }

    #[test]
    fn test_rejects_8bit_address() {
        assert_eq!(
            Kts1622::new(FakeBus::new(), 0x80).err(),
            Some(ConfigError::InvalidDeviceAddress(0x80))
        );
    }

    #[test]
    fn test_pin_input_uses_bitwise_mask() {
        let mut dev = device();
        dev.bus.regs[registers::INPUT_PORT_1 as usize] = 0b0100_0000;

        for pin in Pin::ALL {
            let expected = pin == Pin::Pin6;
            assert_eq!(dev.pin_input(Port::Port1, pin), Ok(expected));
        }
        // Port 0 reads register 0x00, not 0x01
        assert_eq!(dev.pin_input(Port::Port0, Pin::Pin6), Ok(false));
    }

    #[test]
    fn test_set_pin_output_only_touches_one_bit() {
        for port in Port::ALL {
            for pin in Pin::ALL {
                for start in [0x00u8, 0xFF, 0xA5, 0x5A] {
                    for value in [false, true] {
                        let mut dev = device();
                        dev.set_port_output(port, start).unwrap();
                        dev.set_pin_output(port, pin, value).unwrap();

                        let out = dev.port_output(port).unwrap();
                        assert_eq!(out & pin.bit() != 0, value);
                        assert_eq!(out & !pin.bit(), start & !pin.bit());
                    }
                }
            }
        }
    }

    #[test]
    fn test_port_polarity_writes_full_byte() {
        let mut dev = device();
        dev.bus.regs[registers::POLARITY_PORT_1 as usize] = 0x3C;

        dev.set_port_polarity(Port::Port1, Polarity::Inverted).unwrap();
        assert_eq!(dev.bus.regs[registers::POLARITY_PORT_1 as usize], 0xFF);
        assert_eq!(dev.bus.reads, 0);

        dev.set_port_polarity(Port::Port1, Polarity::NotInverted).unwrap();
        assert_eq!(dev.bus.regs[registers::POLARITY_PORT_1 as usize], 0x00);
        assert_eq!(dev.bus.regs[registers::POLARITY_PORT_0 as usize], 0x00);
    }

    #[test]
    fn test_pin_direction_round_trip_and_idempotent() {
        let mut dev = device();
        dev.set_pin_direction(Port::Port0, Pin::Pin2, Direction::Input).unwrap();
        let first = dev.bus.regs[registers::CONFIG_PORT_0 as usize];
        assert_eq!(dev.pin_direction(Port::Port0, Pin::Pin2), Ok(Direction::Input));

        dev.set_pin_direction(Port::Port0, Pin::Pin2, Direction::Input).unwrap();
        assert_eq!(dev.bus.regs[registers::CONFIG_PORT_0 as usize], first);
        assert_eq!(first, 0b0000_0100);

        dev.set_pin_direction(Port::Port0, Pin::Pin2, Direction::Output).unwrap();
        assert_eq!(dev.pin_direction(0u8, 2u8), Ok(Direction::Output));
    }

    #[test]
    fn test_invalid_selectors_never_reach_bus() {
        let mut dev = device();
        for port in 2..=u8::MAX {
            let err = Error::InvalidArgument(InvalidArgument::Port(port));
            assert_eq!(dev.port_input(port), Err(err));
            assert_eq!(dev.pin_input(port, 0u8), Err(err));
            assert_eq!(dev.port_output(port), Err(err));
            assert_eq!(dev.set_port_output(port, 0xFF), Err(err));
            assert_eq!(dev.set_pin_output(port, 0u8, true), Err(err));
            assert_eq!(dev.set_port_polarity(port, Polarity::Inverted), Err(err));
            assert_eq!(dev.set_pin_polarity(port, 0u8, Polarity::Inverted), Err(err));
            assert_eq!(dev.set_pin_direction(port, 0u8, Direction::Input), Err(err));
            assert_eq!(dev.enable_latch(port, 0u8), Err(err));
            assert_eq!(dev.disable_latch(port, 0u8), Err(err));
            assert_eq!(dev.enable_pullup(port, 0u8), Err(err));
            assert_eq!(dev.disable_pullup(port, 0u8), Err(err));
            assert_eq!(dev.enable_pulldown(port, 0u8), Err(err));
            assert_eq!(dev.disable_pulldown(port, 0u8), Err(err));
            assert_eq!(dev.enable_interrupt(port, 0u8), Err(err));
            assert_eq!(dev.disable_interrupt(port, 0u8), Err(err));
            assert_eq!(dev.interrupt_status(port), Err(err));
            assert_eq!(dev.clear_interrupts(port, Pins::all()), Err(err));
            assert_eq!(dev.set_port_output_mode(port, OutputMode::OpenDrain), Err(err));
        }
        let err = Error::InvalidArgument(InvalidArgument::Pin(8));
        assert_eq!(dev.pin_input(0u8, 8u8), Err(err));
        assert_eq!(dev.set_pin_output(1u8, 8u8, true), Err(err));
        assert_eq!(dev.set_drive_strength(0u8, 8u8, DriveStrength::Half), Err(err));

        assert_eq!(dev.bus.reads, 0);
        assert_eq!(dev.bus.writes, 0);
    }

    #[test]
    fn test_bus_error_passes_through() {
        let mut dev = device();
        dev.bus.fail = true;
        assert_eq!(dev.port_input(Port::Port0), Err(Error::Bus(Nack)));
        // A failed read aborts the mutation before any write
        assert_eq!(
            dev.set_pin_output(Port::Port0, Pin::Pin0, true),
            Err(Error::Bus(Nack))
        );
        assert_eq!(dev.bus.writes, 0);
        assert_eq!(dev.bus.reads, 2);
    }

    #[test]
    fn test_pull_selection() {
        let mut dev = device();
        dev.enable_pullup(Port::Port1, Pin::Pin4).unwrap();
        assert_eq!(dev.pull(Port::Port1, Pin::Pin4), Ok(Pull::Up));
        assert_eq!(dev.bus.regs[registers::PULL_SELECT_PORT_1 as usize], 0x10);
        assert_eq!(dev.bus.regs[registers::PULL_ENABLE_PORT_1 as usize], 0x10);

        // Disabling the pull that is not selected leaves the pin alone
        dev.disable_pulldown(Port::Port1, Pin::Pin4).unwrap();
        assert_eq!(dev.pull(Port::Port1, Pin::Pin4), Ok(Pull::Up));

        dev.enable_pulldown(Port::Port1, Pin::Pin4).unwrap();
        assert_eq!(dev.pull(Port::Port1, Pin::Pin4), Ok(Pull::Down));
        dev.disable_pullup(Port::Port1, Pin::Pin4).unwrap();
        assert_eq!(dev.pull(Port::Port1, Pin::Pin4), Ok(Pull::Down));

        dev.disable_pulldown(Port::Port1, Pin::Pin4).unwrap();
        assert_eq!(dev.pull(Port::Port1, Pin::Pin4), Ok(Pull::None));

        dev.set_pull(Port::Port1, Pin::Pin4, Pull::Up).unwrap();
        dev.set_pull(Port::Port1, Pin::Pin4, Pull::None).unwrap();
        assert_eq!(dev.pull(Port::Port1, Pin::Pin4), Ok(Pull::None));
    }

    #[test]
    fn test_interrupt_mask_is_inverted() {
        let mut dev = device();
        dev.bus.regs[registers::INT_MASK_PORT_0 as usize] = 0xFF;

        dev.enable_interrupt(Port::Port0, Pin::Pin1).unwrap();
        assert_eq!(dev.bus.regs[registers::INT_MASK_PORT_0 as usize], 0xFD);
        assert_eq!(dev.is_interrupt_enabled(Port::Port0, Pin::Pin1), Ok(true));

        dev.disable_interrupt(Port::Port0, Pin::Pin1).unwrap();
        assert_eq!(dev.bus.regs[registers::INT_MASK_PORT_0 as usize], 0xFF);
        assert_eq!(dev.is_interrupt_enabled(Port::Port0, Pin::Pin1), Ok(false));
    }

    #[test]
    fn test_two_bit_fields() {
        let mut dev = device();
        dev.bus.regs[registers::DRIVE_STRENGTH_PORT_1B as usize] = 0xFF;

        dev.set_drive_strength(Port::Port1, Pin::Pin5, DriveStrength::Quarter)
            .unwrap();
        assert_eq!(dev.bus.regs[registers::DRIVE_STRENGTH_PORT_1B as usize], 0b1111_0011);
        assert_eq!(
            dev.drive_strength(Port::Port1, Pin::Pin5),
            Ok(DriveStrength::Quarter)
        );
        assert_eq!(dev.drive_strength(Port::Port1, Pin::Pin4), Ok(DriveStrength::Full));

        dev.set_interrupt_edge(Port::Port0, Pin::Pin3, InterruptEdge::Falling)
            .unwrap();
        assert_eq!(dev.bus.regs[registers::INT_EDGE_PORT_0A as usize], 0b1000_0000);
        assert_eq!(dev.bus.regs[registers::INT_EDGE_PORT_0B as usize], 0);
        assert_eq!(
            dev.interrupt_edge(Port::Port0, Pin::Pin3),
            Ok(InterruptEdge::Falling)
        );
    }

    #[test]
    fn test_output_mode_shares_global_register() {
        let mut dev = device();
        dev.set_port_output_mode(Port::Port1, OutputMode::OpenDrain).unwrap();
        dev.set_port_output_mode(Port::Port0, OutputMode::OpenDrain).unwrap();
        assert_eq!(dev.bus.regs[registers::OUTPUT_PORT_CONFIG as usize], 0b11);

        dev.set_port_output_mode(Port::Port1, OutputMode::PushPull).unwrap();
        assert_eq!(dev.bus.regs[registers::OUTPUT_PORT_CONFIG as usize], 0b01);
        assert_eq!(dev.port_output_mode(Port::Port0), Ok(OutputMode::OpenDrain));
        assert_eq!(dev.port_output_mode(Port::Port1), Ok(OutputMode::PushPull));
    }

    #[test]
    fn test_interrupt_status_and_clear() {
        let mut dev = device();
        dev.bus.regs[registers::INT_STATUS_PORT_1 as usize] = 0x81;
        assert_eq!(
            dev.interrupt_status(Port::Port1),
            Ok(Pins::PIN0 | Pins::PIN7)
        );
        dev.clear_interrupts(Port::Port1, Pins::PIN7).unwrap();
        assert_eq!(dev.bus.regs[registers::INT_CLEAR_PORT_1 as usize], 0x80);
    }

    #[test]
    fn test_debounce() {
        let mut dev = device();
        dev.enable_debounce(Port::Port0, Pin::Pin0).unwrap();
        dev.enable_debounce(Port::Port0, Pin::Pin7).unwrap();
        dev.disable_debounce(Port::Port0, Pin::Pin0).unwrap();
        assert_eq!(dev.bus.regs[registers::DEBOUNCE_ENABLE_PORT_0 as usize], 0x80);

        dev.set_debounce_count(0x10).unwrap();
        assert_eq!(dev.debounce_count(), Ok(0x10));
        assert_eq!(dev.bus.regs[registers::DEBOUNCE_COUNT as usize], 0x10);
    }

    #[test]
    fn test_register_map_skips_write_only() {
        let mut dev = device();
        let mut seen = 0usize;
        dev.read_register_map(|info, _| {
            assert_ne!(info.kind, RegisterKind::InterruptClear);
            seen += 1;
        })
        .unwrap();
        assert_eq!(seen, 34);
        assert_eq!(dev.bus.reads, 34);
    }

    #[test]
    fn test_works_through_mut_reference() {
        let mut bus = FakeBus::new();
        {
            let mut dev = Kts1622::new(&mut bus, 0x20).unwrap();
            dev.set_port_output(1u8, 0x42).unwrap();
        }
        assert_eq!(bus.regs[registers::OUTPUT_PORT_1 as usize], 0x42);
    }
}
