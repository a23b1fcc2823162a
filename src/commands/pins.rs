//! Pin configuration commands

use kts1622_core::bus::RegisterBus;
use kts1622_core::{
    Direction, DriveStrength, InterruptEdge, Kts1622, OutputMode, Pin, Polarity, Port,
};
use std::error::Error;

/// Per-pin features switched on and off with `enable`/`disable`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// Input latching
    Latch,
    /// Pull-up resistor
    Pullup,
    /// Pull-down resistor
    Pulldown,
    /// Interrupt (mask cleared when enabled)
    Interrupt,
    /// Switch debouncing
    Debounce,
}

impl Feature {
    fn name(self) -> &'static str {
        match self {
            Feature::Latch => "latch",
            Feature::Pullup => "pull-up",
            Feature::Pulldown => "pull-down",
            Feature::Interrupt => "interrupt",
            Feature::Debounce => "debounce",
        }
    }
}

/// Set the input polarity of a port, or of one pin
pub fn cmd_polarity<B>(
    dev: &mut Kts1622<B>,
    port: Port,
    pin: Option<Pin>,
    polarity: Polarity,
) -> Result<(), Box<dyn Error>>
where
    B: RegisterBus,
    B::Error: Error + 'static,
{
    match pin {
        Some(pin) => {
            dev.set_pin_polarity(port, pin, polarity)?;
            log::info!("{}.{} polarity: {}", port, pin, polarity);
        }
        None => {
            dev.set_port_polarity(port, polarity)?;
            log::info!("{} polarity: {}", port, polarity);
        }
    }
    Ok(())
}

/// Set the direction of one pin
pub fn cmd_direction<B>(
    dev: &mut Kts1622<B>,
    port: Port,
    pin: Pin,
    direction: Direction,
) -> Result<(), Box<dyn Error>>
where
    B: RegisterBus,
    B::Error: Error + 'static,
{
    dev.set_pin_direction(port, pin, direction)?;
    log::info!("{}.{} direction: {}", port, pin, direction);
    Ok(())
}

/// Enable or disable a per-pin feature
pub fn cmd_feature<B>(
    dev: &mut Kts1622<B>,
    port: Port,
    pin: Pin,
    feature: Feature,
    enable: bool,
) -> Result<(), Box<dyn Error>>
where
    B: RegisterBus,
    B::Error: Error + 'static,
{
    match (feature, enable) {
        (Feature::Latch, true) => dev.enable_latch(port, pin)?,
        (Feature::Latch, false) => dev.disable_latch(port, pin)?,
        (Feature::Pullup, true) => dev.enable_pullup(port, pin)?,
        (Feature::Pullup, false) => dev.disable_pullup(port, pin)?,
        (Feature::Pulldown, true) => dev.enable_pulldown(port, pin)?,
        (Feature::Pulldown, false) => dev.disable_pulldown(port, pin)?,
        (Feature::Interrupt, true) => dev.enable_interrupt(port, pin)?,
        (Feature::Interrupt, false) => dev.disable_interrupt(port, pin)?,
        (Feature::Debounce, true) => dev.enable_debounce(port, pin)?,
        (Feature::Debounce, false) => dev.disable_debounce(port, pin)?,
    }

    let state = if enable { "enabled" } else { "disabled" };
    log::info!("{}.{} {} {}", port, pin, feature.name(), state);

    if matches!(feature, Feature::Pullup | Feature::Pulldown) {
        log::info!("{}.{} pull is now {}", port, pin, dev.pull(port, pin)?);
    }
    Ok(())
}

/// Set the drive strength of one pin
pub fn cmd_drive<B>(
    dev: &mut Kts1622<B>,
    port: Port,
    pin: Pin,
    strength: DriveStrength,
) -> Result<(), Box<dyn Error>>
where
    B: RegisterBus,
    B::Error: Error + 'static,
{
    dev.set_drive_strength(port, pin, strength)?;
    log::info!("{}.{} drive strength: {}", port, pin, strength);
    Ok(())
}

/// Set the interrupt trigger of one pin
pub fn cmd_edge<B>(
    dev: &mut Kts1622<B>,
    port: Port,
    pin: Pin,
    edge: InterruptEdge,
) -> Result<(), Box<dyn Error>>
where
    B: RegisterBus,
    B::Error: Error + 'static,
{
    dev.set_interrupt_edge(port, pin, edge)?;
    log::info!("{}.{} interrupt edge: {}", port, pin, edge);
    Ok(())
}

/// Select the output stage of a port
pub fn cmd_output_mode<B>(
    dev: &mut Kts1622<B>,
    port: Port,
    mode: OutputMode,
) -> Result<(), Box<dyn Error>>
where
    B: RegisterBus,
    B::Error: Error + 'static,
{
    dev.set_port_output_mode(port, mode)?;
    log::info!("{} output mode: {}", port, mode);
    Ok(())
}

/// Set the device-wide debounce count
pub fn cmd_debounce_count<B>(dev: &mut Kts1622<B>, count: u8) -> Result<(), Box<dyn Error>>
where
    B: RegisterBus,
    B::Error: Error + 'static,
{
    dev.set_debounce_count(count)?;
    log::info!("debounce count: {}", count);
    Ok(())
}
