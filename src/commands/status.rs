//! Status, interrupt and register dump commands

use super::io::format_byte;
use kts1622_core::bus::RegisterBus;
use kts1622_core::registers::{Access, Layout, RegisterInfo, REGISTER_MAP};
use kts1622_core::{Kts1622, Pins, Port};
use std::error::Error;

fn format_access(access: Access) -> &'static str {
    match access {
        Access::ReadWrite => "rw",
        Access::ReadOnly => "ro",
        Access::WriteOnly => "wo",
    }
}

fn format_layout(layout: Layout) -> &'static str {
    match layout {
        Layout::PerPort(_) => "per-port",
        Layout::Split(_) => "split",
        Layout::Global(_) => "global",
    }
}

/// Format a set of pins as "0,3,7" (or "none")
pub fn format_pins(pins: Pins) -> String {
    if pins.is_empty() {
        return "none".to_string();
    }
    pins.pins()
        .map(|p| p.index().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// One line of a register dump
pub fn format_register_line(info: &RegisterInfo, value: u8) -> String {
    format!(
        "0x{:02X}  {:<22} {}",
        info.address,
        info.to_string(),
        format_byte(value)
    )
}

/// Print input, input status and pending interrupts of a port
pub fn cmd_status<B>(dev: &mut Kts1622<B>, port: Port) -> Result<(), Box<dyn Error>>
where
    B: RegisterBus,
    B::Error: Error + 'static,
{
    let input = dev.port_input(port)?;
    let input_status = dev.input_status(port)?;
    let pending = dev.interrupt_status(port)?;

    println!("{} status:", port);
    println!("  input:         {}", format_byte(input));
    println!("  input status:  {}", format_byte(input_status));
    println!("  interrupts:    {}", format_pins(pending));
    Ok(())
}

/// Clear pending interrupts of the given pins
pub fn cmd_clear_interrupts<B>(dev: &mut Kts1622<B>, port: Port, mask: u8) -> Result<(), Box<dyn Error>>
where
    B: RegisterBus,
    B::Error: Error + 'static,
{
    let pins = Pins::from_bits_retain(mask);
    dev.clear_interrupts(port, pins)?;
    log::info!("{} interrupts cleared: {}", port, format_pins(pins));
    Ok(())
}

/// Read and print every readable register
pub fn cmd_dump<B>(dev: &mut Kts1622<B>) -> Result<(), Box<dyn Error>>
where
    B: RegisterBus,
    B::Error: Error + 'static,
{
    println!("KTS1622 at 0x{:02X}:", dev.address());
    dev.read_register_map(|info, value| println!("{}", format_register_line(info, value)))?;
    Ok(())
}

/// Print the register map
pub fn cmd_registers() {
    println!("{:<6} {:<22} {:<6} {}", "Addr", "Name", "Access", "Layout");
    println!("{}", "-".repeat(46));
    for info in REGISTER_MAP.iter() {
        println!(
            "0x{:02X}   {:<22} {:<6} {}",
            info.address,
            info.to_string(),
            format_access(info.kind.access()),
            format_layout(info.kind.layout())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kts1622_core::registers::lookup;

    #[test]
    fn test_format_pins() {
        assert_eq!(format_pins(Pins::empty()), "none");
        assert_eq!(format_pins(Pins::PIN0 | Pins::PIN3 | Pins::PIN7), "0,3,7");
    }

    #[test]
    fn test_format_register_line() {
        let info = lookup(0x41).unwrap();
        assert_eq!(
            format_register_line(info, 0xFF),
            "0x41  drive_strength_0b      0xFF (0b1111_1111)"
        );
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_clear_interrupts_on_dummy() {
        use kts1622_dummy::DummyKts1622;

        let mut chip = DummyKts1622::new_default();
        chip.poke(kts1622_core::registers::INT_MASK_PORT_0, 0x00);
        chip.raise_interrupt(Port::Port0, 0x0F);

        let mut dev = Kts1622::new(chip, 0x20).unwrap();
        cmd_status(&mut dev, Port::Port0).unwrap();
        cmd_clear_interrupts(&mut dev, Port::Port0, 0x03).unwrap();
        assert_eq!(
            dev.interrupt_status(Port::Port0).unwrap(),
            Pins::PIN2 | Pins::PIN3
        );
        cmd_dump(&mut dev).unwrap();
    }
}
