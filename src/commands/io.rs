//! Port and pin I/O commands

use kts1622_core::bus::RegisterBus;
use kts1622_core::{Kts1622, Pin, Port};
use std::error::Error;

/// Format a register byte as hex plus per-pin bits
pub fn format_byte(value: u8) -> String {
    format!("0x{:02X} (0b{:04b}_{:04b})", value, value >> 4, value & 0x0F)
}

/// Format a pin level
pub fn format_level(level: bool) -> &'static str {
    if level {
        "high"
    } else {
        "low"
    }
}

/// Read and print the input register of a port
pub fn cmd_read_port<B>(dev: &mut Kts1622<B>, port: Port) -> Result<(), Box<dyn Error>>
where
    B: RegisterBus,
    B::Error: Error + 'static,
{
    let value = dev.port_input(port)?;
    println!("{} input: {}", port, format_byte(value));
    Ok(())
}

/// Read and print the input level of one pin
pub fn cmd_read_pin<B>(dev: &mut Kts1622<B>, port: Port, pin: Pin) -> Result<(), Box<dyn Error>>
where
    B: RegisterBus,
    B::Error: Error + 'static,
{
    let level = dev.pin_input(port, pin)?;
    println!("{}.{}: {}", port, pin, format_level(level));
    Ok(())
}

/// Overwrite the output register of a port
pub fn cmd_write_port<B>(dev: &mut Kts1622<B>, port: Port, value: u8) -> Result<(), Box<dyn Error>>
where
    B: RegisterBus,
    B::Error: Error + 'static,
{
    dev.set_port_output(port, value)?;
    log::info!("{} output set to {}", port, format_byte(value));
    Ok(())
}

/// Set the output level of one pin
pub fn cmd_write_pin<B>(
    dev: &mut Kts1622<B>,
    port: Port,
    pin: Pin,
    level: bool,
) -> Result<(), Box<dyn Error>>
where
    B: RegisterBus,
    B::Error: Error + 'static,
{
    dev.set_pin_output(port, pin, level)?;
    let output = dev.port_output(port)?;
    log::info!(
        "{}.{} set {}, {} output now {}",
        port,
        pin,
        format_level(level),
        port,
        format_byte(output)
    );
    Ok(())
}
