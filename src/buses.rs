//! Bus registration and dispatch
//!
//! Buses are selected with a string of the form `name` or
//! `name:key1=value1,key2=value2`. Each opened bus is wrapped so its error
//! type is erased, which lets every command work on one concrete
//! `Kts1622<DynBus>` regardless of the transport.

use kts1622_core::bus::RegisterBus;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Information about a bus
pub struct BusInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Get information about all available buses (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_buses() -> Vec<BusInfo> {
    let mut buses = Vec::new();

    #[cfg(feature = "dummy")]
    buses.push(BusInfo {
        name: "dummy",
        aliases: &[],
        description: "In-memory KTS1622 emulator for testing",
    });

    #[cfg(feature = "linux-i2c")]
    buses.push(BusInfo {
        name: "linux_i2c",
        aliases: &["linux-i2c", "i2c-dev"],
        description: "Linux i2c-dev interface (dev=/dev/i2c-N or bus=N)",
    });

    buses
}

/// Errors from selecting a bus
#[derive(Debug, Error)]
pub enum BusSelectError {
    /// No bus with that name was compiled in
    #[error("Unknown bus: {name} (available: {available})")]
    Unknown { name: String, available: String },

    /// A parameter is not in key=value form
    #[error("Invalid parameter format: '{0}' (expected key=value)")]
    InvalidParameter(String),
}

/// Error from an opened bus, with the transport's type erased
pub struct BusError(Box<dyn Error + Send + Sync>);

#[cfg(any(feature = "dummy", feature = "linux-i2c"))]
impl BusError {
    fn new<E: Error + Send + Sync + 'static>(e: E) -> Self {
        Self(Box::new(e))
    }
}

impl fmt::Debug for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Error for BusError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}

/// Adapter turning any transport into one with [`BusError`]
#[cfg(any(feature = "dummy", feature = "linux-i2c"))]
struct ErasedBus<B>(B);

#[cfg(any(feature = "dummy", feature = "linux-i2c"))]
impl<B> RegisterBus for ErasedBus<B>
where
    B: RegisterBus,
    B::Error: Error + Send + Sync + 'static,
{
    type Error = BusError;

    fn read_register(&mut self, device_address: u8, register: u8) -> Result<u8, BusError> {
        self.0
            .read_register(device_address, register)
            .map_err(BusError::new)
    }

    fn write_register(
        &mut self,
        device_address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), BusError> {
        self.0
            .write_register(device_address, register, value)
            .map_err(BusError::new)
    }
}

/// A bus selected at runtime
pub type DynBus = Box<dyn RegisterBus<Error = BusError>>;

#[cfg(any(feature = "dummy", feature = "linux-i2c"))]
fn erase<B>(bus: B) -> DynBus
where
    B: RegisterBus + 'static,
    B::Error: Error + Send + Sync + 'static,
{
    Box::new(ErasedBus(bus))
}

/// Parsed bus parameters
#[derive(Debug)]
pub struct BusParams {
    /// Bus name as given
    pub name: String,
    /// Key-value parameters
    pub params: HashMap<String, String>,
}

#[cfg(any(feature = "dummy", feature = "linux-i2c"))]
impl BusParams {
    /// Parameters as borrowed pairs, for the transport crates' option parsers
    fn options(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

/// Parse a bus string into name and parameters
///
/// Format: "name" or "name:key1=value1,key2=value2"
pub fn parse_bus_params(s: &str) -> Result<BusParams, BusSelectError> {
    let (name, opts_str) = s.split_once(':').unwrap_or((s, ""));

    let mut params = HashMap::new();
    if !opts_str.is_empty() {
        for opt in opts_str.split(',') {
            if let Some((key, value)) = opt.split_once('=') {
                params.insert(key.to_string(), value.to_string());
            } else {
                return Err(BusSelectError::InvalidParameter(opt.to_string()));
            }
        }
    }

    Ok(BusParams {
        name: name.to_string(),
        params,
    })
}

/// Open a bus by its selection string
///
/// `address` is the device address the caller is going to use; the dummy
/// bus emulates a chip there.
#[allow(unused_variables)]
pub fn open_bus(selection: &str, address: u8) -> Result<DynBus, Box<dyn Error>> {
    let params = parse_bus_params(selection)?;
    log::debug!(
        "Opening bus {} with {} option(s)",
        params.name,
        params.params.len()
    );

    match params.name.as_str() {
        #[cfg(feature = "dummy")]
        "dummy" => open_dummy(&params, address),

        #[cfg(feature = "linux-i2c")]
        "linux_i2c" | "linux-i2c" | "i2c-dev" => open_linux_i2c(&params),

        _ => Err(BusSelectError::Unknown {
            name: params.name.clone(),
            available: bus_names_short(),
        }
        .into()),
    }
}

#[cfg(feature = "dummy")]
fn open_dummy(params: &BusParams, address: u8) -> Result<DynBus, Box<dyn Error>> {
    for (key, value) in &params.params {
        log::warn!("dummy: Unknown option: {}={}", key, value);
    }
    log::info!("Using dummy KTS1622 at 0x{:02X}", address);
    let chip = kts1622_dummy::DummyKts1622::new(kts1622_dummy::DummyConfig { address });
    Ok(erase(chip))
}

#[cfg(feature = "linux-i2c")]
fn open_linux_i2c(params: &BusParams) -> Result<DynBus, Box<dyn Error>> {
    let i2c = kts1622_linux_i2c::open_linux_i2c(&params.options())?;
    Ok(erase(i2c))
}

/// Generate a short list of bus names for CLI help
pub fn bus_names_short() -> String {
    let buses = available_buses();
    let names: Vec<&str> = buses.iter().map(|b| b.name).collect();
    names.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bus_params() {
        let params = parse_bus_params("linux_i2c:bus=1,dev=/dev/i2c-3").unwrap();
        assert_eq!(params.name, "linux_i2c");
        assert_eq!(params.params.get("bus"), Some(&"1".to_string()));
        assert_eq!(params.params.get("dev"), Some(&"/dev/i2c-3".to_string()));

        let params = parse_bus_params("dummy").unwrap();
        assert_eq!(params.name, "dummy");
        assert!(params.params.is_empty());
    }

    #[test]
    fn test_parse_bus_params_rejects_bare_key() {
        assert!(matches!(
            parse_bus_params("linux_i2c:bus"),
            Err(BusSelectError::InvalidParameter(p)) if p == "bus"
        ));
    }

    #[cfg(any(feature = "dummy", feature = "linux-i2c"))]
    #[test]
    fn test_bus_params_options() {
        let params = parse_bus_params("linux_i2c:bus=2").unwrap();
        assert_eq!(params.options(), vec![("bus", "2")]);
        assert!(parse_bus_params("dummy").unwrap().options().is_empty());
    }

    #[test]
    fn test_unknown_bus() {
        let err = open_bus("ch341a", 0x20).err().unwrap();
        assert!(err.to_string().starts_with("Unknown bus: ch341a"));
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_dummy_bus_erases_errors() {
        use kts1622_core::registers;

        let mut bus = open_bus("dummy", 0x21).unwrap();
        assert_eq!(bus.read_register(0x21, registers::OUTPUT_PORT_0).unwrap(), 0xFF);

        let err = bus.read_register(0x20, registers::OUTPUT_PORT_0).unwrap_err();
        assert_eq!(err.to_string(), "no ACK from address 0x20");
    }

    #[cfg(feature = "linux-i2c")]
    #[test]
    fn test_linux_i2c_requires_device() {
        let err = open_bus("linux_i2c", 0x20).err().unwrap();
        assert!(err.to_string().contains("No device specified"));
    }
}
