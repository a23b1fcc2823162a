//! Selector and setting types
//!
//! Every enum here has an explicit numeric encoding because that encoding is
//! what ends up in the register byte. `TryFrom<u8>` is the validation point
//! for raw values; anything outside the encoding is an [`InvalidArgument`].

use crate::error::InvalidArgument;
use bitflags::bitflags;
use core::fmt;
use core::str::FromStr;

/// One of the two 8-bit GPIO banks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Deserialize), serde(try_from = "u8"))]
#[repr(u8)]
pub enum Port {
    /// Port 0 (P0_0 .. P0_7)
    Port0 = 0,
    /// Port 1 (P1_0 .. P1_7)
    Port1 = 1,
}

impl Port {
    /// Both ports, in address order
    pub const ALL: [Port; 2] = [Port::Port0, Port::Port1];

    /// Port number as used for register offsets
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A bit position within a port byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Deserialize), serde(try_from = "u8"))]
#[repr(u8)]
pub enum Pin {
    /// Bit 0
    Pin0 = 0,
    /// Bit 1
    Pin1 = 1,
    /// Bit 2
    Pin2 = 2,
    /// Bit 3
    Pin3 = 3,
    /// Bit 4
    Pin4 = 4,
    /// Bit 5
    Pin5 = 5,
    /// Bit 6
    Pin6 = 6,
    /// Bit 7
    Pin7 = 7,
}

impl Pin {
    /// All pins, lowest bit first
    pub const ALL: [Pin; 8] = [
        Pin::Pin0,
        Pin::Pin1,
        Pin::Pin2,
        Pin::Pin3,
        Pin::Pin4,
        Pin::Pin5,
        Pin::Pin6,
        Pin::Pin7,
    ];

    /// Bit index within the port byte
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Single-bit mask `1 << pin`
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// The pin as a [`Pins`] set
    pub const fn mask(self) -> Pins {
        Pins::from_bits_retain(self.bit())
    }
}

bitflags! {
    /// A set of pins within one port, bit n = pin n
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Pins: u8 {
        /// Pin 0
        const PIN0 = 1 << 0;
        /// Pin 1
        const PIN1 = 1 << 1;
        /// Pin 2
        const PIN2 = 1 << 2;
        /// Pin 3
        const PIN3 = 1 << 3;
        /// Pin 4
        const PIN4 = 1 << 4;
        /// Pin 5
        const PIN5 = 1 << 5;
        /// Pin 6
        const PIN6 = 1 << 6;
        /// Pin 7
        const PIN7 = 1 << 7;
    }
}

impl Pins {
    /// Iterate over the pins in the set, lowest first
    pub fn pins(self) -> impl Iterator<Item = Pin> {
        Pin::ALL.into_iter().filter(move |p| self.contains(p.mask()))
    }
}

impl From<Pin> for Pins {
    fn from(pin: Pin) -> Self {
        pin.mask()
    }
}

/// Input polarity inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "std",
    derive(serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
#[repr(u8)]
pub enum Polarity {
    /// Input register reflects the pin level
    #[default]
    #[cfg_attr(feature = "std", serde(alias = "normal"))]
    NotInverted = 0,
    /// Input register reflects the inverted pin level
    Inverted = 1,
}

impl Polarity {
    /// Full-port register value for this polarity
    pub const fn port_value(self) -> u8 {
        match self {
            Polarity::NotInverted => 0x00,
            Polarity::Inverted => 0xFF,
        }
    }
}

/// Pin direction, as encoded in the configuration register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "std",
    derive(serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[repr(u8)]
pub enum Direction {
    /// Output driver enabled
    Output = 0,
    /// High-impedance input (power-on default)
    Input = 1,
}

/// Pull resistor configuration of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "std",
    derive(serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Pull {
    /// No pull resistor
    #[default]
    None,
    /// Pull-up to VDD
    Up,
    /// Pull-down to GND
    Down,
}

/// Output drive strength, a 2-bit field per pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "std",
    derive(serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
#[repr(u8)]
pub enum DriveStrength {
    /// 0.25x drive
    Quarter = 0,
    /// 0.5x drive
    Half = 1,
    /// 0.75x drive
    ThreeQuarter = 2,
    /// 1x drive (power-on default)
    Full = 3,
}

/// Interrupt trigger, a 2-bit field per pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "std",
    derive(serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[repr(u8)]
pub enum InterruptEdge {
    /// Level change (power-on default)
    Level = 0,
    /// Rising edge
    Rising = 1,
    /// Falling edge
    Falling = 2,
    /// Either edge
    Any = 3,
}

/// Output stage of a whole port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "std",
    derive(serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
#[repr(u8)]
pub enum OutputMode {
    /// Push-pull (power-on default)
    PushPull = 0,
    /// Open-drain
    OpenDrain = 1,
}

macro_rules! impl_encoding {
    ($ty:ty, $err:ident, [$($variant:path = $value:literal),+ $(,)?]) => {
        impl TryFrom<u8> for $ty {
            type Error = InvalidArgument;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok($variant),)+
                    other => Err(InvalidArgument::$err(other)),
                }
            }
        }

        impl From<$ty> for u8 {
            fn from(value: $ty) -> u8 {
                value as u8
            }
        }
    };
}

impl_encoding!(Port, Port, [Port::Port0 = 0, Port::Port1 = 1]);
impl_encoding!(
    Pin,
    Pin,
    [
        Pin::Pin0 = 0,
        Pin::Pin1 = 1,
        Pin::Pin2 = 2,
        Pin::Pin3 = 3,
        Pin::Pin4 = 4,
        Pin::Pin5 = 5,
        Pin::Pin6 = 6,
        Pin::Pin7 = 7,
    ]
);
impl_encoding!(
    Polarity,
    Polarity,
    [Polarity::NotInverted = 0, Polarity::Inverted = 1]
);
impl_encoding!(
    Direction,
    Direction,
    [Direction::Output = 0, Direction::Input = 1]
);
impl_encoding!(
    DriveStrength,
    DriveStrength,
    [
        DriveStrength::Quarter = 0,
        DriveStrength::Half = 1,
        DriveStrength::ThreeQuarter = 2,
        DriveStrength::Full = 3,
    ]
);
impl_encoding!(
    InterruptEdge,
    InterruptEdge,
    [
        InterruptEdge::Level = 0,
        InterruptEdge::Rising = 1,
        InterruptEdge::Falling = 2,
        InterruptEdge::Any = 3,
    ]
);
impl_encoding!(
    OutputMode,
    OutputMode,
    [OutputMode::PushPull = 0, OutputMode::OpenDrain = 1]
);

/// Anything that names a port
///
/// Driver methods take `impl IntoPort` so callers can pass either a [`Port`]
/// or a raw number. Raw numbers are validated here, before the driver goes
/// near the bus.
pub trait IntoPort {
    /// Resolve to a port or report the rejected value
    fn into_port(self) -> Result<Port, InvalidArgument>;
}

/// Anything that names a pin, see [`IntoPort`]
pub trait IntoPin {
    /// Resolve to a pin or report the rejected value
    fn into_pin(self) -> Result<Pin, InvalidArgument>;
}

impl IntoPort for Port {
    fn into_port(self) -> Result<Port, InvalidArgument> {
        Ok(self)
    }
}

impl IntoPort for u8 {
    fn into_port(self) -> Result<Port, InvalidArgument> {
        Port::try_from(self)
    }
}

impl IntoPin for Pin {
    fn into_pin(self) -> Result<Pin, InvalidArgument> {
        Ok(self)
    }
}

impl IntoPin for u8 {
    fn into_pin(self) -> Result<Pin, InvalidArgument> {
        Pin::try_from(self)
    }
}

/// Parse a selector number that may be written as hex (`0x..`) or decimal
fn parse_u8(s: &str) -> Option<u8> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

impl FromStr for Port {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s
            .strip_prefix("port")
            .or_else(|| s.strip_prefix('P'))
            .or_else(|| s.strip_prefix('p'))
            .unwrap_or(s);
        parse_u8(s).ok_or(InvalidArgument::Name)?.try_into()
    }
}

impl FromStr for Pin {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix("pin").unwrap_or(s);
        parse_u8(s).ok_or(InvalidArgument::Name)?.try_into()
    }
}

impl FromStr for Polarity {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "not-inverted" | "0" => Ok(Polarity::NotInverted),
            "inverted" | "1" => Ok(Polarity::Inverted),
            _ => Err(InvalidArgument::Name),
        }
    }
}

impl FromStr for Direction {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "output" | "out" | "0" => Ok(Direction::Output),
            "input" | "in" | "1" => Ok(Direction::Input),
            _ => Err(InvalidArgument::Name),
        }
    }
}

impl FromStr for DriveStrength {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quarter" | "0.25" => Ok(DriveStrength::Quarter),
            "half" | "0.5" => Ok(DriveStrength::Half),
            "three-quarter" | "0.75" => Ok(DriveStrength::ThreeQuarter),
            "full" | "1" => Ok(DriveStrength::Full),
            _ => Err(InvalidArgument::Name),
        }
    }
}

impl FromStr for InterruptEdge {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "level" => Ok(InterruptEdge::Level),
            "rising" => Ok(InterruptEdge::Rising),
            "falling" => Ok(InterruptEdge::Falling),
            "any" | "both" => Ok(InterruptEdge::Any),
            _ => Err(InvalidArgument::Name),
        }
    }
}

impl FromStr for OutputMode {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "push-pull" | "pushpull" => Ok(OutputMode::PushPull),
            "open-drain" | "opendrain" => Ok(OutputMode::OpenDrain),
            _ => Err(InvalidArgument::Name),
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", *self as u8)
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::NotInverted => write!(f, "normal"),
            Polarity::Inverted => write!(f, "inverted"),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Output => write!(f, "output"),
            Direction::Input => write!(f, "input"),
        }
    }
}

impl fmt::Display for Pull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pull::None => write!(f, "none"),
            Pull::Up => write!(f, "pull-up"),
            Pull::Down => write!(f, "pull-down"),
        }
    }
}

impl fmt::Display for DriveStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveStrength::Quarter => write!(f, "0.25x"),
            DriveStrength::Half => write!(f, "0.5x"),
            DriveStrength::ThreeQuarter => write!(f, "0.75x"),
            DriveStrength::Full => write!(f, "1x"),
        }
    }
}

impl fmt::Display for InterruptEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterruptEdge::Level => write!(f, "level"),
            InterruptEdge::Rising => write!(f, "rising"),
            InterruptEdge::Falling => write!(f, "falling"),
            InterruptEdge::Any => write!(f, "any"),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::PushPull => write!(f, "push-pull"),
            OutputMode::OpenDrain => write!(f, "open-drain"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_encoding() {
        assert_eq!(Port::try_from(0), Ok(Port::Port0));
        assert_eq!(Port::try_from(1), Ok(Port::Port1));
        for raw in 2..=u8::MAX {
            assert_eq!(Port::try_from(raw), Err(InvalidArgument::Port(raw)));
        }
    }

    #[test]
    fn test_pin_encoding_and_masks() {
        for (i, pin) in Pin::ALL.iter().enumerate() {
            assert_eq!(Pin::try_from(i as u8), Ok(*pin));
            assert_eq!(pin.bit(), 1u8 << i);
            assert_eq!(pin.mask().bits(), 1u8 << i);
        }
        assert_eq!(Pin::try_from(8), Err(InvalidArgument::Pin(8)));
        assert_eq!(Pin::try_from(0xFF), Err(InvalidArgument::Pin(0xFF)));
    }

    #[test]
    fn test_enum_ordinals_match_register_bits() {
        assert_eq!(u8::from(Polarity::NotInverted), 0);
        assert_eq!(u8::from(Polarity::Inverted), 1);
        assert_eq!(u8::from(Direction::Output), 0);
        assert_eq!(u8::from(Direction::Input), 1);
        assert_eq!(Polarity::try_from(2), Err(InvalidArgument::Polarity(2)));
        assert_eq!(Direction::try_from(2), Err(InvalidArgument::Direction(2)));
        assert_eq!(
            DriveStrength::try_from(4),
            Err(InvalidArgument::DriveStrength(4))
        );
    }

    #[test]
    fn test_parse_selectors() {
        assert_eq!("1".parse::<Port>(), Ok(Port::Port1));
        assert_eq!("P0".parse::<Port>(), Ok(Port::Port0));
        assert_eq!("port1".parse::<Port>(), Ok(Port::Port1));
        assert_eq!("2".parse::<Port>(), Err(InvalidArgument::Port(2)));
        assert_eq!("x".parse::<Port>(), Err(InvalidArgument::Name));
        assert_eq!("0x7".parse::<Pin>(), Ok(Pin::Pin7));
        assert_eq!("pin3".parse::<Pin>(), Ok(Pin::Pin3));
        assert_eq!("9".parse::<Pin>(), Err(InvalidArgument::Pin(9)));
        assert_eq!("normal".parse::<Polarity>(), Ok(Polarity::NotInverted));
        assert_eq!("in".parse::<Direction>(), Ok(Direction::Input));
        assert_eq!("open-drain".parse::<OutputMode>(), Ok(OutputMode::OpenDrain));
    }

    #[test]
    fn test_pins_iter() {
        let set = Pins::PIN1 | Pins::PIN6;
        let pins: [Option<Pin>; 3] = {
            let mut it = set.pins();
            [it.next(), it.next(), it.next()]
        };
        assert_eq!(pins, [Some(Pin::Pin1), Some(Pin::Pin6), None]);
    }
}
