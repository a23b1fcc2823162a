//! kts1622-dummy - In-memory KTS1622 emulator for testing
//!
//! [`DummyKts1622`] is a [`RegisterBus`] backed by a register file with the
//! chip's power-on defaults. It honors read-only and write-only registers,
//! models the input port from the output and direction registers plus
//! externally driven pin levels, and records every transaction so tests can
//! count bus calls.
//!
//! [`SharedDummy`] puts one emulated chip behind an `Arc<Mutex<_>>` so
//! several driver handles can talk to the same device.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use kts1622_core::bus::RegisterBus;
use kts1622_core::registers::{self, lookup, RegisterKind};
use kts1622_core::Port;

/// Configuration for the emulated chip
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Address the chip answers on
    pub address: u8,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self { address: 0x20 }
    }
}

/// One recorded bus access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    /// Register read and the value returned
    Read {
        /// Register index
        register: u8,
        /// Value returned
        value: u8,
    },
    /// Register write
    Write {
        /// Register index
        register: u8,
        /// Value written
        value: u8,
    },
}

/// Errors reported by the emulated bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DummyError {
    /// Nothing answered at this address
    Nack(u8),
    /// Register index not implemented by the chip
    UnknownRegister(u8),
    /// Write to a read-only register
    ReadOnly(u8),
    /// Read from a write-only register
    WriteOnly(u8),
    /// Fault injected by the test
    Injected,
}

impl fmt::Display for DummyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nack(addr) => write!(f, "no ACK from address 0x{:02X}", addr),
            Self::UnknownRegister(reg) => write!(f, "unknown register 0x{:02X}", reg),
            Self::ReadOnly(reg) => write!(f, "register 0x{:02X} is read-only", reg),
            Self::WriteOnly(reg) => write!(f, "register 0x{:02X} is write-only", reg),
            Self::Injected => write!(f, "injected bus fault"),
        }
    }
}

impl std::error::Error for DummyError {}

/// Power-on register contents
fn reset_value(kind: RegisterKind) -> u8 {
    match kind {
        RegisterKind::OutputData
        | RegisterKind::Direction
        | RegisterKind::DriveStrength
        | RegisterKind::PullSelect
        | RegisterKind::InterruptMask => 0xFF,
        _ => 0x00,
    }
}

/// Emulated KTS1622
#[derive(Debug, Clone)]
pub struct DummyKts1622 {
    config: DummyConfig,
    regs: [u8; 256],
    /// Level driven onto each pin from outside, per port
    external: [u8; 2],
    log: Vec<Transaction>,
    fail_in: Option<usize>,
}

impl DummyKts1622 {
    /// Create an emulated chip in its power-on state
    pub fn new(config: DummyConfig) -> Self {
        let mut regs = [0u8; 256];
        for info in registers::REGISTER_MAP.iter() {
            regs[info.address as usize] = reset_value(info.kind);
        }
        Self {
            config,
            regs,
            external: [0x00; 2],
            log: Vec::new(),
            fail_in: None,
        }
    }

    /// Create an emulated chip at the default address
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Raw register contents, bypassing access rules
    pub fn peek(&self, register: u8) -> u8 {
        self.regs[register as usize]
    }

    /// Set raw register contents, bypassing access rules
    pub fn poke(&mut self, register: u8, value: u8) {
        self.regs[register as usize] = value;
    }

    /// Drive the pins of a port from outside
    ///
    /// Only pins configured as inputs see these levels.
    pub fn set_external_levels(&mut self, port: Port, levels: u8) {
        self.external[port.index()] = levels;
    }

    /// Flag pending interrupts on a port, honoring the interrupt mask
    pub fn raise_interrupt(&mut self, port: Port, pins: u8) {
        let mask = self.regs[RegisterKind::InterruptMask.address(port) as usize];
        let status = RegisterKind::InterruptStatus.address(port) as usize;
        self.regs[status] |= pins & !mask;
    }

    /// Fail the transaction after `n` more successful ones
    pub fn fail_after(&mut self, n: usize) {
        self.fail_in = Some(n);
    }

    /// Every transaction since creation or the last [`clear_log`](Self::clear_log)
    pub fn transactions(&self) -> &[Transaction] {
        &self.log
    }

    /// Forget recorded transactions
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Number of recorded reads
    pub fn reads(&self) -> usize {
        self.log
            .iter()
            .filter(|t| matches!(t, Transaction::Read { .. }))
            .count()
    }

    /// Number of recorded writes
    pub fn writes(&self) -> usize {
        self.log.len() - self.reads()
    }

    fn check_fault(&mut self) -> Result<(), DummyError> {
        match self.fail_in {
            Some(0) => {
                self.fail_in = None;
                Err(DummyError::Injected)
            }
            Some(n) => {
                self.fail_in = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn check_address(&self, device_address: u8) -> Result<(), DummyError> {
        if device_address == self.config.address {
            Ok(())
        } else {
            Err(DummyError::Nack(device_address))
        }
    }

    /// Value the input register of a port reports
    fn input_value(&self, port: Port) -> u8 {
        let i = port.index();
        let output = self.regs[RegisterKind::OutputData.address(port) as usize];
        let inputs = self.regs[RegisterKind::Direction.address(port) as usize];
        let polarity = self.regs[RegisterKind::Polarity.address(port) as usize];
        let level = (output & !inputs) | (self.external[i] & inputs);
        level ^ polarity
    }
}

impl Default for DummyKts1622 {
    fn default() -> Self {
        Self::new_default()
    }
}

impl RegisterBus for DummyKts1622 {
    type Error = DummyError;

    fn read_register(&mut self, device_address: u8, register: u8) -> Result<u8, DummyError> {
        self.check_address(device_address)?;
        self.check_fault()?;
        let info = lookup(register).ok_or(DummyError::UnknownRegister(register))?;
        if !info.kind.access().is_readable() {
            return Err(DummyError::WriteOnly(register));
        }

        let value = match (info.kind, info.port) {
            (RegisterKind::InputData, Some(port)) => self.input_value(port),
            _ => self.regs[register as usize],
        };
        log::trace!("dummy: read 0x{:02X} -> 0x{:02X}", register, value);
        self.log.push(Transaction::Read { register, value });
        Ok(value)
    }

    fn write_register(
        &mut self,
        device_address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), DummyError> {
        self.check_address(device_address)?;
        self.check_fault()?;
        let info = lookup(register).ok_or(DummyError::UnknownRegister(register))?;
        if !info.kind.access().is_writable() {
            return Err(DummyError::ReadOnly(register));
        }

        log::trace!("dummy: write 0x{:02X} <- 0x{:02X}", register, value);
        self.log.push(Transaction::Write { register, value });
        match (info.kind, info.port) {
            (RegisterKind::InterruptClear, Some(port)) => {
                let status = RegisterKind::InterruptStatus.address(port) as usize;
                self.regs[status] &= !value;
            }
            _ => self.regs[register as usize] = value,
        }
        Ok(())
    }
}

/// One emulated chip shared by several bus handles
///
/// Each transaction locks the chip, so individual register accesses are
/// atomic but a driver's read-modify-write sequence is not.
#[derive(Debug, Clone, Default)]
pub struct SharedDummy {
    inner: Arc<Mutex<DummyKts1622>>,
}

impl SharedDummy {
    /// Share an emulated chip
    pub fn new(chip: DummyKts1622) -> Self {
        Self {
            inner: Arc::new(Mutex::new(chip)),
        }
    }

    /// Lock the chip for inspection
    pub fn lock(&self) -> MutexGuard<'_, DummyKts1622> {
        // A panicking test thread must not hide the register state
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RegisterBus for SharedDummy {
    type Error = DummyError;

    fn read_register(&mut self, device_address: u8, register: u8) -> Result<u8, DummyError> {
        self.lock().read_register(device_address, register)
    }

    fn write_register(
        &mut self,
        device_address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), DummyError> {
        self.lock().write_register(device_address, register, value)
    }
}
