//! CLI command implementations
//!
//! Every device command takes a `Kts1622` driver over any bus, so the same
//! code runs against the dummy emulator and real hardware.

pub mod apply;
pub mod io;
mod list;
pub mod pins;
pub mod status;

pub use list::list_buses;
