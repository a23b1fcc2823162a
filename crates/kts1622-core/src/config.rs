//! TOML pin-setup files
//!
//! A board description lists the pins to configure, applied in file order:
//!
//! ```toml
//! [device]
//! address = "0x21"
//! debounce_count = 8
//!
//! [[pin]]
//! port = 0
//! pin = 3
//! direction = "output"
//! output = true
//! drive = "half"
//!
//! [[pin]]
//! port = 1
//! pin = 0
//! direction = "input"
//! pull = "up"
//! interrupt = true
//! edge = "falling"
//! debounce = true
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::string::{String, ToString};
use std::vec::Vec;
use std::format;

use crate::bus::RegisterBus;
use crate::device::Kts1622;
use crate::error::Result;
use crate::types::{Direction, DriveStrength, InterruptEdge, Pin, Polarity, Port, Pull};

/// Errors from loading a pin-setup file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardConfigError {
    /// The file could not be read
    Io(String),
    /// The file is not a valid pin-setup document
    Parse(String),
}

impl fmt::Display for BoardConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read pin setup: {}", e),
            Self::Parse(e) => write!(f, "invalid pin setup: {}", e),
        }
    }
}

impl std::error::Error for BoardConfigError {}

/// Settings for one pin
///
/// Every setting is optional; absent settings leave the register alone.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PinSetup {
    /// Port the pin belongs to
    pub port: Port,
    /// Pin within the port
    pub pin: Pin,
    /// Direction
    pub direction: Option<Direction>,
    /// Input polarity
    pub polarity: Option<Polarity>,
    /// Initial output level, written before the direction
    pub output: Option<bool>,
    /// Pull resistor
    pub pull: Option<Pull>,
    /// Input latching
    pub latch: Option<bool>,
    /// Interrupt enabled (unmasked)
    pub interrupt: Option<bool>,
    /// Drive strength
    pub drive: Option<DriveStrength>,
    /// Interrupt trigger
    pub edge: Option<InterruptEdge>,
    /// Switch debouncing
    pub debounce: Option<bool>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlDevice {
    #[serde(default, deserialize_with = "deserialize_opt_hex_u8")]
    address: Option<u8>,
    #[serde(default, deserialize_with = "deserialize_opt_hex_u8")]
    debounce_count: Option<u8>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlBoardFile {
    device: Option<TomlDevice>,
    #[serde(default)]
    pin: Vec<PinSetup>,
}

/// Parsed pin-setup file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardConfig {
    /// Device address, if the file names one
    pub address: Option<u8>,
    /// Device-wide debounce count
    pub debounce_count: Option<u8>,
    /// Pin settings in file order
    pub pins: Vec<PinSetup>,
}

/// Deserialize an optional u8 that can be hex (0x...) or decimal
fn deserialize_opt_hex_u8<'de, D>(deserializer: D) -> core::result::Result<Option<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum HexOrInt {
        Int(u8),
        Str(String),
    }

    match HexOrInt::deserialize(deserializer)? {
        HexOrInt::Int(n) => Ok(Some(n)),
        HexOrInt::Str(s) => parse_number(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Parse a number that can be hex (0x...) or decimal
fn parse_number(s: &str) -> core::result::Result<u8, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).map_err(|e| format!("invalid hex: {}", e))
    } else {
        s.parse().map_err(|e| format!("invalid number: {}", e))
    }
}

impl BoardConfig {
    /// Load a pin setup from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> core::result::Result<Self, BoardConfigError> {
        let content = fs::read_to_string(path).map_err(|e| BoardConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse a pin setup from a TOML string
    pub fn from_toml_str(content: &str) -> core::result::Result<Self, BoardConfigError> {
        let file: TomlBoardFile =
            toml::from_str(content).map_err(|e| BoardConfigError::Parse(e.to_string()))?;

        let (address, debounce_count) = match file.device {
            Some(dev) => (dev.address, dev.debounce_count),
            None => (None, None),
        };

        Ok(Self {
            address,
            debounce_count,
            pins: file.pin,
        })
    }

    /// Apply the setup through the driver, stopping at the first error
    pub fn apply<B: RegisterBus>(&self, dev: &mut Kts1622<B>) -> Result<(), B::Error> {
        if let Some(count) = self.debounce_count {
            dev.set_debounce_count(count)?;
        }
        for setup in &self.pins {
            setup.apply(dev)?;
        }
        Ok(())
    }
}

impl PinSetup {
    /// Apply this pin's settings through the driver
    ///
    /// The output level is written before the direction so a pin switched
    /// to output starts at the requested level.
    pub fn apply<B: RegisterBus>(&self, dev: &mut Kts1622<B>) -> Result<(), B::Error> {
        let (port, pin) = (self.port, self.pin);
        log::debug!("kts1622: applying setup for {}.{}", port, pin);

        if let Some(level) = self.output {
            dev.set_pin_output(port, pin, level)?;
        }
        if let Some(direction) = self.direction {
            dev.set_pin_direction(port, pin, direction)?;
        }
        if let Some(polarity) = self.polarity {
            dev.set_pin_polarity(port, pin, polarity)?;
        }
        if let Some(pull) = self.pull {
            dev.set_pull(port, pin, pull)?;
        }
        if let Some(drive) = self.drive {
            dev.set_drive_strength(port, pin, drive)?;
        }
        if let Some(latch) = self.latch {
            if latch {
                dev.enable_latch(port, pin)?;
            } else {
                dev.disable_latch(port, pin)?;
            }
        }
        if let Some(debounce) = self.debounce {
            if debounce {
                dev.enable_debounce(port, pin)?;
            } else {
                dev.disable_debounce(port, pin)?;
            }
        }
        if let Some(edge) = self.edge {
            dev.set_interrupt_edge(port, pin, edge)?;
        }
        // Unmask last, once the trigger is configured
        if let Some(interrupt) = self.interrupt {
            if interrupt {
                dev.enable_interrupt(port, pin)?;
            } else {
                dev.disable_interrupt(port, pin)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::CallbackBus;
    use crate::registers;
    use core::cell::RefCell;

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[device]
address = "0x21"

[[pin]]
port = 0
pin = 3
direction = "output"
output = true
drive = "three-quarter"

[[pin]]
port = 1
pin = 7
pull = "down"
polarity = "inverted"
edge = "any"
interrupt = true
"#;
        let config = BoardConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.address, Some(0x21));
        assert_eq!(config.debounce_count, None);
        assert_eq!(config.pins.len(), 2);
        assert_eq!(config.pins[0].port, Port::Port0);
        assert_eq!(config.pins[0].pin, Pin::Pin3);
        assert_eq!(config.pins[0].direction, Some(Direction::Output));
        assert_eq!(config.pins[0].drive, Some(DriveStrength::ThreeQuarter));
        assert_eq!(config.pins[1].pull, Some(Pull::Down));
        assert_eq!(config.pins[1].polarity, Some(Polarity::Inverted));
        assert_eq!(config.pins[1].edge, Some(InterruptEdge::Any));
        assert_eq!(config.pins[1].latch, None);
    }

    #[test]
    fn test_rejects_out_of_range_selectors() {
        let bad_port = "[[pin]]\nport = 2\npin = 0\n";
        assert!(matches!(
            BoardConfig::from_toml_str(bad_port),
            Err(BoardConfigError::Parse(_))
        ));
        let bad_pin = "[[pin]]\nport = 0\npin = 8\n";
        assert!(BoardConfig::from_toml_str(bad_pin).is_err());
        let typo = "[[pin]]\nport = 0\npin = 1\npullup = true\n";
        assert!(BoardConfig::from_toml_str(typo).is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("0x7F"), Ok(0x7F));
        assert_eq!(parse_number("32"), Ok(32));
        assert!(parse_number("0x100").is_err());
    }

    #[test]
    fn test_apply_in_order() {
        let regs = RefCell::new([0u8; 0x60]);
        let log = RefCell::new(Vec::new());
        let bus = CallbackBus::new(
            Some(|_: u8, reg: u8| -> core::result::Result<u8, ()> {
                Ok(regs.borrow()[reg as usize])
            }),
            Some(|_: u8, reg: u8, val: u8| -> core::result::Result<(), ()> {
                regs.borrow_mut()[reg as usize] = val;
                log.borrow_mut().push(reg);
                Ok(())
            }),
        )
        .unwrap();
        regs.borrow_mut()[registers::CONFIG_PORT_0 as usize] = 0xFF;

        let config = BoardConfig::from_toml_str(
            "[device]\ndebounce_count = 4\n\n[[pin]]\nport = 0\npin = 1\noutput = true\ndirection = \"output\"\n",
        )
        .unwrap();
        let mut dev = Kts1622::new(bus, 0x20).unwrap();
        config.apply(&mut dev).unwrap();
        drop(dev);

        assert_eq!(
            *log.borrow(),
            [
                registers::DEBOUNCE_COUNT,
                registers::OUTPUT_PORT_0,
                registers::CONFIG_PORT_0
            ]
        );
        let regs = regs.borrow();
        assert_eq!(regs[registers::DEBOUNCE_COUNT as usize], 4);
        assert_eq!(regs[registers::OUTPUT_PORT_0 as usize], 0b10);
        assert_eq!(regs[registers::CONFIG_PORT_0 as usize], 0xFD);
    }
}
