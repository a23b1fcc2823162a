//! CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use kts1622_core::{Direction, DriveStrength, InterruptEdge, OutputMode, Pin, Polarity, Port};
use std::path::PathBuf;

/// Parse a string as a hex or decimal u8
fn parse_hex_u8(s: &str) -> Result<u8, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u8>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Parse a pin level: 0/1, low/high, off/on
fn parse_level(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "high" | "on" | "true" => Ok(true),
        "0" | "low" | "off" | "false" => Ok(false),
        _ => Err(format!("Invalid level '{}' (expected 0/1, low/high)", s)),
    }
}

#[derive(Parser)]
#[command(name = "kts1622")]
#[command(author, version, about = "KTS1622 I2C GPIO expander tool", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Bus and device selection shared by every device command
#[derive(clap::Args, Debug, Clone)]
pub struct BusArgs {
    /// Bus to use, e.g. "dummy", "linux_i2c:bus=1" or "linux_i2c:dev=/dev/i2c-1"
    #[arg(short, long)]
    pub bus: String,

    /// 7-bit device address (default 0x20)
    #[arg(short, long, value_parser = parse_hex_u8)]
    pub address: Option<u8>,
}

/// Pin selection
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct PinArgs {
    /// Port (0, 1, P0 or P1)
    #[arg(long)]
    pub port: Port,

    /// Pin within the port (0-7)
    #[arg(long)]
    pub pin: Pin,
}

/// Enable or disable a per-pin feature
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Turn the feature on
    Enable,
    /// Turn the feature off
    Disable,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read the input register of a port
    ReadPort {
        #[command(flatten)]
        bus: BusArgs,

        /// Port (0, 1, P0 or P1)
        #[arg(long)]
        port: Port,
    },

    /// Read the input level of one pin
    ReadPin {
        #[command(flatten)]
        bus: BusArgs,

        #[command(flatten)]
        pin: PinArgs,
    },

    /// Overwrite the output register of a port
    WritePort {
        #[command(flatten)]
        bus: BusArgs,

        /// Port (0, 1, P0 or P1)
        #[arg(long)]
        port: Port,

        /// Output byte (hex or decimal)
        #[arg(value_parser = parse_hex_u8)]
        value: u8,
    },

    /// Set the output level of one pin
    WritePin {
        #[command(flatten)]
        bus: BusArgs,

        #[command(flatten)]
        pin: PinArgs,

        /// Level (0/1, low/high)
        #[arg(value_parser = parse_level, action = clap::ArgAction::Set)]
        level: bool,
    },

    /// Set input polarity of a whole port, or of one pin with --pin
    Polarity {
        #[command(flatten)]
        bus: BusArgs,

        /// Port (0, 1, P0 or P1)
        #[arg(long)]
        port: Port,

        /// Pin within the port (0-7); omit to set the whole port
        #[arg(long)]
        pin: Option<Pin>,

        /// normal or inverted
        polarity: Polarity,
    },

    /// Set the direction of one pin
    Direction {
        #[command(flatten)]
        bus: BusArgs,

        #[command(flatten)]
        pin: PinArgs,

        /// input or output
        direction: Direction,
    },

    /// Enable or disable input latching on a pin
    Latch {
        #[command(flatten)]
        bus: BusArgs,

        #[command(flatten)]
        pin: PinArgs,

        #[arg(value_enum)]
        action: Toggle,
    },

    /// Enable or disable the pull-up resistor of a pin
    Pullup {
        #[command(flatten)]
        bus: BusArgs,

        #[command(flatten)]
        pin: PinArgs,

        #[arg(value_enum)]
        action: Toggle,
    },

    /// Enable or disable the pull-down resistor of a pin
    Pulldown {
        #[command(flatten)]
        bus: BusArgs,

        #[command(flatten)]
        pin: PinArgs,

        #[arg(value_enum)]
        action: Toggle,
    },

    /// Enable (unmask) or disable (mask) the interrupt of a pin
    Interrupt {
        #[command(flatten)]
        bus: BusArgs,

        #[command(flatten)]
        pin: PinArgs,

        #[arg(value_enum)]
        action: Toggle,
    },

    /// Set the drive strength of a pin
    Drive {
        #[command(flatten)]
        bus: BusArgs,

        #[command(flatten)]
        pin: PinArgs,

        /// quarter, half, three-quarter or full
        strength: DriveStrength,
    },

    /// Set the interrupt trigger of a pin
    Edge {
        #[command(flatten)]
        bus: BusArgs,

        #[command(flatten)]
        pin: PinArgs,

        /// level, rising, falling or any
        edge: InterruptEdge,
    },

    /// Select push-pull or open-drain outputs for a port
    OutputMode {
        #[command(flatten)]
        bus: BusArgs,

        /// Port (0, 1, P0 or P1)
        #[arg(long)]
        port: Port,

        /// push-pull or open-drain
        mode: OutputMode,
    },

    /// Enable or disable switch debouncing on a pin
    Debounce {
        #[command(flatten)]
        bus: BusArgs,

        #[command(flatten)]
        pin: PinArgs,

        #[arg(value_enum)]
        action: Toggle,
    },

    /// Set the device-wide debounce count
    DebounceCount {
        #[command(flatten)]
        bus: BusArgs,

        /// Count (hex or decimal)
        #[arg(value_parser = parse_hex_u8)]
        count: u8,
    },

    /// Show input, input status and pending interrupts of a port
    Status {
        #[command(flatten)]
        bus: BusArgs,

        /// Port (0, 1, P0 or P1)
        #[arg(long)]
        port: Port,
    },

    /// Clear pending interrupts of a port
    ClearInterrupts {
        #[command(flatten)]
        bus: BusArgs,

        /// Port (0, 1, P0 or P1)
        #[arg(long)]
        port: Port,

        /// Pins to clear (default: all)
        #[arg(long, value_parser = parse_hex_u8, default_value = "0xFF")]
        mask: u8,
    },

    /// Read and print every readable register
    Dump {
        #[command(flatten)]
        bus: BusArgs,
    },

    /// Print the register map (no device access)
    Registers,

    /// Apply a TOML pin-setup file
    Apply {
        #[command(flatten)]
        bus: BusArgs,

        /// Pin-setup file (TOML format)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// List supported buses
    ListBuses,
}
