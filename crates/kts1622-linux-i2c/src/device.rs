//! Linux i2c-dev device implementation
//!
//! This module provides the `LinuxI2c` struct that implements the
//! `RegisterBus` trait using Linux's `/dev/i2c-N` interface.

use crate::error::{LinuxI2cError, Result};

use kts1622_core::bus::RegisterBus;

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;

/// Linux i2c-dev ioctl constants
mod ioctl {
    use nix::{ioctl_read_bad, ioctl_write_ptr_bad};

    // From <linux/i2c-dev.h>; these predate the _IOC encoding
    const I2C_FUNCS: u16 = 0x0705;
    const I2C_RDWR: u16 = 0x0707;

    /// Adapter supports plain I2C transfers
    pub const I2C_FUNC_I2C: libc::c_ulong = 0x0000_0001;

    /// Message is a read
    pub const I2C_M_RD: u16 = 0x0001;

    /// One segment of a combined transfer, `struct i2c_msg`
    #[repr(C)]
    pub struct I2cMsg {
        pub addr: u16,
        pub flags: u16,
        pub len: u16,
        pub buf: *mut u8,
    }

    /// Argument of I2C_RDWR, `struct i2c_rdwr_ioctl_data`
    #[repr(C)]
    pub struct I2cRdwrData {
        pub msgs: *mut I2cMsg,
        pub nmsgs: u32,
    }

    ioctl_read_bad!(i2c_funcs, I2C_FUNCS, libc::c_ulong);
    ioctl_write_ptr_bad!(i2c_rdwr, I2C_RDWR, I2cRdwrData);
}

/// Configuration for opening a Linux I2C adapter
#[derive(Debug, Clone, Default)]
pub struct LinuxI2cConfig {
    /// Device path (e.g., "/dev/i2c-1")
    pub device: String,
}

impl LinuxI2cConfig {
    /// Create a new configuration with the given device path
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
        }
    }

    /// Configuration for adapter number `bus`
    pub fn for_bus(bus: u32) -> Self {
        Self::new(format!("/dev/i2c-{}", bus))
    }
}

/// I2C adapter exposed through i2c-dev
///
/// Register reads are a single `I2C_RDWR` with a one-byte write (register
/// index) and a one-byte read, joined by a repeated start.
pub struct LinuxI2c {
    file: File,
    path: String,
}

impl LinuxI2c {
    /// Open a Linux I2C adapter with the given configuration
    pub fn open(config: &LinuxI2cConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxI2cError::NoDevice);
        }

        log::debug!("linux_i2c: Opening device {}", config.device);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.device)
            .map_err(|e| LinuxI2cError::OpenFailed {
                path: config.device.clone(),
                source: e,
            })?;

        let mut funcs: libc::c_ulong = 0;
        unsafe {
            ioctl::i2c_funcs(file.as_raw_fd(), &mut funcs).map_err(|e| {
                LinuxI2cError::FuncsFailed {
                    path: config.device.clone(),
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }
        log::debug!("linux_i2c: Adapter functionality 0x{:08X}", funcs);

        if funcs & ioctl::I2C_FUNC_I2C == 0 {
            return Err(LinuxI2cError::Unsupported {
                path: config.device.clone(),
            });
        }

        log::info!("linux_i2c: Opened {}", config.device);

        Ok(Self {
            file,
            path: config.device.clone(),
        })
    }

    /// Open a device with default settings
    pub fn open_device(device: &str) -> Result<Self> {
        Self::open(&LinuxI2cConfig::new(device))
    }

    /// Device path this adapter was opened from
    pub fn path(&self) -> &str {
        &self.path
    }

    fn transfer(&mut self, msgs: &mut [ioctl::I2cMsg]) -> std::io::Result<()> {
        let data = ioctl::I2cRdwrData {
            msgs: msgs.as_mut_ptr(),
            nmsgs: msgs.len() as u32,
        };
        // The kernel fills the read buffers the messages point at
        unsafe {
            ioctl::i2c_rdwr(self.file.as_raw_fd(), &data)
                .map_err(|e| std::io::Error::from_raw_os_error(e as i32))?;
        }
        Ok(())
    }
}

impl RegisterBus for LinuxI2c {
    type Error = LinuxI2cError;

    fn read_register(&mut self, device_address: u8, register: u8) -> Result<u8> {
        let mut index = [register];
        let mut value = [0u8; 1];
        let mut msgs = [
            ioctl::I2cMsg {
                addr: device_address as u16,
                flags: 0,
                len: 1,
                buf: index.as_mut_ptr(),
            },
            ioctl::I2cMsg {
                addr: device_address as u16,
                flags: ioctl::I2C_M_RD,
                len: 1,
                buf: value.as_mut_ptr(),
            },
        ];
        self.transfer(&mut msgs)
            .map_err(|source| LinuxI2cError::TransferFailed {
                address: device_address,
                register,
                source,
            })?;
        Ok(value[0])
    }

    fn write_register(&mut self, device_address: u8, register: u8, value: u8) -> Result<()> {
        let mut buf = [register, value];
        let mut msgs = [ioctl::I2cMsg {
            addr: device_address as u16,
            flags: 0,
            len: buf.len() as u16,
            buf: buf.as_mut_ptr(),
        }];
        self.transfer(&mut msgs)
            .map_err(|source| LinuxI2cError::TransferFailed {
                address: device_address,
                register,
                source,
            })
    }
}

/// Parse programmer-style options into a configuration
///
/// Accepts `dev=/dev/i2c-N` or `bus=N`; `dev` wins if both are given.
pub fn parse_options(options: &[(&str, &str)]) -> Result<LinuxI2cConfig> {
    let mut device = None;
    let mut bus = None;

    for (key, value) in options {
        match *key {
            "dev" => {
                device = Some(value.to_string());
            }
            "bus" => {
                let n: u32 = value
                    .parse()
                    .map_err(|_| LinuxI2cError::InvalidParameter(format!("bus={}", value)))?;
                bus = Some(n);
            }
            _ => {
                log::warn!("linux_i2c: Unknown option: {}={}", key, value);
            }
        }
    }

    match (device, bus) {
        (Some(dev), _) => Ok(LinuxI2cConfig::new(dev)),
        (None, Some(n)) => Ok(LinuxI2cConfig::for_bus(n)),
        (None, None) => Err(LinuxI2cError::NoDevice),
    }
}
