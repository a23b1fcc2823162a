//! List commands implementation

use crate::buses;

/// List all supported buses
pub fn list_buses() {
    println!("Supported buses:");
    println!();
    for bus in buses::available_buses() {
        let aliases = if bus.aliases.is_empty() {
            String::new()
        } else {
            format!(" (aliases: {})", bus.aliases.join(", "))
        };
        println!("  {:10} - {}{}", bus.name, bus.description, aliases);
    }
}
