//! kts1622 - Command-line tool for the KTS1622 I2C GPIO expander
//!
//! Every device command opens a bus (`-b`), builds a `Kts1622` driver for
//! the device address (`-a`, default 0x20) and performs one operation
//! through the driver API.
//!
//! # Buses
//!
//! - `dummy` - in-memory emulator, a fresh chip per invocation
//! - `linux_i2c:bus=N` / `linux_i2c:dev=/dev/i2c-N` - Linux i2c-dev

mod buses;
mod cli;
mod commands;

use buses::DynBus;
use clap::Parser;
use cli::{BusArgs, Cli, Commands, Toggle};
use commands::pins::Feature;
use kts1622_core::config::BoardConfig;
use kts1622_core::Kts1622;

/// Open the bus and build a driver
///
/// `fallback` is used when `-a` is absent (e.g. the address from a
/// pin-setup file).
fn open_device(
    args: &BusArgs,
    fallback: Option<u8>,
) -> Result<Kts1622<DynBus>, Box<dyn std::error::Error>> {
    let address = args
        .address
        .or(fallback)
        .unwrap_or(Kts1622::<DynBus>::DEFAULT_ADDRESS);
    let bus = buses::open_bus(&args.bus, address)?;
    let dev = Kts1622::new(bus, address)?;
    log::debug!("Using device at 0x{:02X} on {}", address, args.bus);
    Ok(dev)
}

/// Default log filter for a `-v` count; `RUST_LOG` still takes precedence
fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logger at the requested verbosity
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(cli.verbose)),
    )
    .init();

    match cli.command {
        Commands::ReadPort { bus, port } => {
            commands::io::cmd_read_port(&mut open_device(&bus, None)?, port)
        }
        Commands::ReadPin { bus, pin } => {
            commands::io::cmd_read_pin(&mut open_device(&bus, None)?, pin.port, pin.pin)
        }
        Commands::WritePort { bus, port, value } => {
            commands::io::cmd_write_port(&mut open_device(&bus, None)?, port, value)
        }
        Commands::WritePin { bus, pin, level } => {
            commands::io::cmd_write_pin(&mut open_device(&bus, None)?, pin.port, pin.pin, level)
        }
        Commands::Polarity {
            bus,
            port,
            pin,
            polarity,
        } => commands::pins::cmd_polarity(&mut open_device(&bus, None)?, port, pin, polarity),
        Commands::Direction {
            bus,
            pin,
            direction,
        } => commands::pins::cmd_direction(
            &mut open_device(&bus, None)?,
            pin.port,
            pin.pin,
            direction,
        ),
        Commands::Latch { bus, pin, action } => run_feature(&bus, pin, Feature::Latch, action),
        Commands::Pullup { bus, pin, action } => run_feature(&bus, pin, Feature::Pullup, action),
        Commands::Pulldown { bus, pin, action } => {
            run_feature(&bus, pin, Feature::Pulldown, action)
        }
        Commands::Interrupt { bus, pin, action } => {
            run_feature(&bus, pin, Feature::Interrupt, action)
        }
        Commands::Debounce { bus, pin, action } => {
            run_feature(&bus, pin, Feature::Debounce, action)
        }
        Commands::Drive { bus, pin, strength } => {
            commands::pins::cmd_drive(&mut open_device(&bus, None)?, pin.port, pin.pin, strength)
        }
        Commands::Edge { bus, pin, edge } => {
            commands::pins::cmd_edge(&mut open_device(&bus, None)?, pin.port, pin.pin, edge)
        }
        Commands::OutputMode { bus, port, mode } => {
            commands::pins::cmd_output_mode(&mut open_device(&bus, None)?, port, mode)
        }
        Commands::DebounceCount { bus, count } => {
            commands::pins::cmd_debounce_count(&mut open_device(&bus, None)?, count)
        }
        Commands::Status { bus, port } => {
            commands::status::cmd_status(&mut open_device(&bus, None)?, port)
        }
        Commands::ClearInterrupts { bus, port, mask } => {
            commands::status::cmd_clear_interrupts(&mut open_device(&bus, None)?, port, mask)
        }
        Commands::Dump { bus } => commands::status::cmd_dump(&mut open_device(&bus, None)?),
        Commands::Registers => {
            commands::status::cmd_registers();
            Ok(())
        }
        Commands::Apply { bus, config } => {
            let board = BoardConfig::from_toml_file(&config)?;
            let mut dev = open_device(&bus, board.address)?;
            commands::apply::cmd_apply(&mut dev, &board)
        }
        Commands::ListBuses => {
            commands::list_buses();
            Ok(())
        }
    }
}

fn run_feature(
    bus: &BusArgs,
    pin: cli::PinArgs,
    feature: Feature,
    action: Toggle,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut dev = open_device(bus, None)?;
    commands::pins::cmd_feature(
        &mut dev,
        pin.port,
        pin.pin,
        feature,
        action == Toggle::Enable,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(0), "info");
        assert_eq!(log_filter(1), "debug");
        assert_eq!(log_filter(2), "trace");
        assert_eq!(log_filter(5), "trace");
    }
}
