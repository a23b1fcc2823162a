//! Pin-setup file command

use kts1622_core::bus::RegisterBus;
use kts1622_core::config::BoardConfig;
use kts1622_core::Kts1622;
use std::error::Error;

/// Apply a parsed pin-setup file to the device
pub fn cmd_apply<B>(dev: &mut Kts1622<B>, config: &BoardConfig) -> Result<(), Box<dyn Error>>
where
    B: RegisterBus,
    B::Error: Error + 'static,
{
    log::info!(
        "Applying {} pin setting(s) to 0x{:02X}",
        config.pins.len(),
        dev.address()
    );
    config.apply(dev)?;
    log::info!("Pin setup applied");
    Ok(())
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use kts1622_core::{Direction, InterruptEdge, Pin, Port, Pull};
    use kts1622_dummy::DummyKts1622;

    #[test]
    fn test_apply_board_config() {
        let config = BoardConfig::from_toml_str(
            r#"
[device]
debounce_count = "0x08"

[[pin]]
port = 0
pin = 3
output = false
direction = "output"

[[pin]]
port = 1
pin = 0
direction = "input"
pull = "up"
edge = "falling"
interrupt = true
debounce = true
"#,
        )
        .unwrap();

        let mut dev = Kts1622::new(DummyKts1622::new_default(), 0x20).unwrap();
        cmd_apply(&mut dev, &config).unwrap();

        assert_eq!(dev.pin_direction(Port::Port0, Pin::Pin3).unwrap(), Direction::Output);
        assert_eq!(dev.port_output(Port::Port0).unwrap(), 0xF7);
        assert_eq!(dev.pull(Port::Port1, Pin::Pin0).unwrap(), Pull::Up);
        assert_eq!(
            dev.interrupt_edge(Port::Port1, Pin::Pin0).unwrap(),
            InterruptEdge::Falling
        );
        assert!(dev.is_interrupt_enabled(Port::Port1, Pin::Pin0).unwrap());
        assert_eq!(dev.debounce_count().unwrap(), 8);
    }
}
