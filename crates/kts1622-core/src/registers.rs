//! KTS1622 register map
//!
//! The first eight registers follow the classic PCA9555-style layout. The
//! extended block at 0x40 adds the agile I/O features. Some kinds are split
//! across two sub-registers (a: pins 0-3, b: pins 4-7) because they hold a
//! 2-bit field per pin, and two kinds are global to the device.

use crate::types::{Pin, Port};

// ============================================================================
// Standard block
// ============================================================================

/// Input port 0 (read-only)
pub const INPUT_PORT_0: u8 = 0x00;
/// Input port 1 (read-only)
pub const INPUT_PORT_1: u8 = 0x01;
/// Output port 0
pub const OUTPUT_PORT_0: u8 = 0x02;
/// Output port 1
pub const OUTPUT_PORT_1: u8 = 0x03;
/// Polarity inversion port 0
pub const POLARITY_PORT_0: u8 = 0x04;
/// Polarity inversion port 1
pub const POLARITY_PORT_1: u8 = 0x05;
/// Configuration (direction) port 0
pub const CONFIG_PORT_0: u8 = 0x06;
/// Configuration (direction) port 1
pub const CONFIG_PORT_1: u8 = 0x07;

// ============================================================================
// Extended block
// ============================================================================

/// Output drive strength port 0, pins 0-3
pub const DRIVE_STRENGTH_PORT_0A: u8 = 0x40;
/// Output drive strength port 0, pins 4-7
pub const DRIVE_STRENGTH_PORT_0B: u8 = 0x41;
/// Output drive strength port 1, pins 0-3
pub const DRIVE_STRENGTH_PORT_1A: u8 = 0x42;
/// Output drive strength port 1, pins 4-7
pub const DRIVE_STRENGTH_PORT_1B: u8 = 0x43;
/// Input latch port 0
pub const INPUT_LATCH_PORT_0: u8 = 0x44;
/// Input latch port 1
pub const INPUT_LATCH_PORT_1: u8 = 0x45;
/// Pull-up/pull-down enable port 0
pub const PULL_ENABLE_PORT_0: u8 = 0x46;
/// Pull-up/pull-down enable port 1
pub const PULL_ENABLE_PORT_1: u8 = 0x47;
/// Pull-up/pull-down selection port 0
pub const PULL_SELECT_PORT_0: u8 = 0x48;
/// Pull-up/pull-down selection port 1
pub const PULL_SELECT_PORT_1: u8 = 0x49;
/// Interrupt mask port 0
pub const INT_MASK_PORT_0: u8 = 0x4A;
/// Interrupt mask port 1
pub const INT_MASK_PORT_1: u8 = 0x4B;
/// Interrupt status port 0 (read-only)
pub const INT_STATUS_PORT_0: u8 = 0x4C;
/// Interrupt status port 1 (read-only)
pub const INT_STATUS_PORT_1: u8 = 0x4D;
/// Output port configuration (push-pull / open-drain per port)
pub const OUTPUT_PORT_CONFIG: u8 = 0x4F;
/// Interrupt edge port 0, pins 0-3
pub const INT_EDGE_PORT_0A: u8 = 0x50;
/// Interrupt edge port 0, pins 4-7
pub const INT_EDGE_PORT_0B: u8 = 0x51;
/// Interrupt edge port 1, pins 0-3
pub const INT_EDGE_PORT_1A: u8 = 0x52;
/// Interrupt edge port 1, pins 4-7
pub const INT_EDGE_PORT_1B: u8 = 0x53;
/// Interrupt clear port 0 (write-only)
pub const INT_CLEAR_PORT_0: u8 = 0x54;
/// Interrupt clear port 1 (write-only)
pub const INT_CLEAR_PORT_1: u8 = 0x55;
/// Input status port 0 (read-only)
pub const INPUT_STATUS_PORT_0: u8 = 0x56;
/// Input status port 1 (read-only)
pub const INPUT_STATUS_PORT_1: u8 = 0x57;
/// Individual pin output configuration port 0
pub const OUTPUT_PIN_CONFIG_PORT_0: u8 = 0x58;
/// Individual pin output configuration port 1
pub const OUTPUT_PIN_CONFIG_PORT_1: u8 = 0x59;
/// Switch debounce enable port 0
pub const DEBOUNCE_ENABLE_PORT_0: u8 = 0x5A;
/// Switch debounce enable port 1
pub const DEBOUNCE_ENABLE_PORT_1: u8 = 0x5B;
/// Switch debounce count
pub const DEBOUNCE_COUNT: u8 = 0x5C;

/// Logical register function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterKind {
    /// Pin levels as seen by the input buffer
    InputData,
    /// Output latch
    OutputData,
    /// Input polarity inversion
    Polarity,
    /// Direction (1 = input)
    Direction,
    /// 2-bit drive strength per pin
    DriveStrength,
    /// Input latch enable
    InputLatch,
    /// Pull resistor enable
    PullEnable,
    /// Pull resistor selection (1 = pull-up)
    PullSelect,
    /// Interrupt mask (1 = masked)
    InterruptMask,
    /// Pending interrupt sources
    InterruptStatus,
    /// 2-bit interrupt edge per pin
    InterruptEdge,
    /// Interrupt clear, write 1 to clear
    InterruptClear,
    /// Input status
    InputStatus,
    /// Per-pin output stage override
    OutputPinConfig,
    /// Switch debounce enable
    DebounceEnable,
    /// Switch debounce count (global)
    DebounceCount,
    /// Push-pull / open-drain per port (global)
    OutputPortConfig,
}

/// How a register kind maps onto physical addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One register per port, indexed by port
    PerPort([u8; 2]),
    /// Two sub-registers per port, `[port][half]`, 2 bits per pin
    Split([[u8; 2]; 2]),
    /// A single register for the whole device
    Global(u8),
}

/// Register access permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Read and write
    ReadWrite,
    /// Reads only, writes are ignored by the device
    ReadOnly,
    /// Writes only, reads are undefined
    WriteOnly,
}

impl Access {
    /// Whether reading this register is meaningful
    pub const fn is_readable(self) -> bool {
        !matches!(self, Access::WriteOnly)
    }

    /// Whether writing this register has an effect
    pub const fn is_writable(self) -> bool {
        !matches!(self, Access::ReadOnly)
    }
}

impl RegisterKind {
    /// Every register kind, in address order of its first register
    pub const ALL: [RegisterKind; 17] = [
        RegisterKind::InputData,
        RegisterKind::OutputData,
        RegisterKind::Polarity,
        RegisterKind::Direction,
        RegisterKind::DriveStrength,
        RegisterKind::InputLatch,
        RegisterKind::PullEnable,
        RegisterKind::PullSelect,
        RegisterKind::InterruptMask,
        RegisterKind::InterruptStatus,
        RegisterKind::OutputPortConfig,
        RegisterKind::InterruptEdge,
        RegisterKind::InterruptClear,
        RegisterKind::InputStatus,
        RegisterKind::OutputPinConfig,
        RegisterKind::DebounceEnable,
        RegisterKind::DebounceCount,
    ];

    /// Physical address layout
    pub const fn layout(self) -> Layout {
        match self {
            Self::InputData => Layout::PerPort([INPUT_PORT_0, INPUT_PORT_1]),
            Self::OutputData => Layout::PerPort([OUTPUT_PORT_0, OUTPUT_PORT_1]),
            Self::Polarity => Layout::PerPort([POLARITY_PORT_0, POLARITY_PORT_1]),
            Self::Direction => Layout::PerPort([CONFIG_PORT_0, CONFIG_PORT_1]),
            Self::DriveStrength => Layout::Split([
                [DRIVE_STRENGTH_PORT_0A, DRIVE_STRENGTH_PORT_0B],
                [DRIVE_STRENGTH_PORT_1A, DRIVE_STRENGTH_PORT_1B],
            ]),
            Self::InputLatch => Layout::PerPort([INPUT_LATCH_PORT_0, INPUT_LATCH_PORT_1]),
            Self::PullEnable => Layout::PerPort([PULL_ENABLE_PORT_0, PULL_ENABLE_PORT_1]),
            Self::PullSelect => Layout::PerPort([PULL_SELECT_PORT_0, PULL_SELECT_PORT_1]),
            Self::InterruptMask => Layout::PerPort([INT_MASK_PORT_0, INT_MASK_PORT_1]),
            Self::InterruptStatus => Layout::PerPort([INT_STATUS_PORT_0, INT_STATUS_PORT_1]),
            Self::InterruptEdge => Layout::Split([
                [INT_EDGE_PORT_0A, INT_EDGE_PORT_0B],
                [INT_EDGE_PORT_1A, INT_EDGE_PORT_1B],
            ]),
            Self::InterruptClear => Layout::PerPort([INT_CLEAR_PORT_0, INT_CLEAR_PORT_1]),
            Self::InputStatus => Layout::PerPort([INPUT_STATUS_PORT_0, INPUT_STATUS_PORT_1]),
            Self::OutputPinConfig => {
                Layout::PerPort([OUTPUT_PIN_CONFIG_PORT_0, OUTPUT_PIN_CONFIG_PORT_1])
            }
            Self::DebounceEnable => {
                Layout::PerPort([DEBOUNCE_ENABLE_PORT_0, DEBOUNCE_ENABLE_PORT_1])
            }
            Self::DebounceCount => Layout::Global(DEBOUNCE_COUNT),
            Self::OutputPortConfig => Layout::Global(OUTPUT_PORT_CONFIG),
        }
    }

    /// Access permissions
    pub const fn access(self) -> Access {
        match self {
            Self::InputData | Self::InterruptStatus | Self::InputStatus => Access::ReadOnly,
            Self::InterruptClear => Access::WriteOnly,
            _ => Access::ReadWrite,
        }
    }

    /// Short register name, as used in the datasheet tables
    pub const fn name(self) -> &'static str {
        match self {
            Self::InputData => "input",
            Self::OutputData => "output",
            Self::Polarity => "polarity",
            Self::Direction => "config",
            Self::DriveStrength => "drive_strength",
            Self::InputLatch => "input_latch",
            Self::PullEnable => "pull_enable",
            Self::PullSelect => "pull_select",
            Self::InterruptMask => "int_mask",
            Self::InterruptStatus => "int_status",
            Self::InterruptEdge => "int_edge",
            Self::InterruptClear => "int_clear",
            Self::InputStatus => "input_status",
            Self::OutputPinConfig => "output_pin_config",
            Self::DebounceEnable => "debounce_enable",
            Self::DebounceCount => "debounce_count",
            Self::OutputPortConfig => "output_port_config",
        }
    }

    /// Register address for a port
    ///
    /// Global kinds ignore the port. For split kinds this is the `a`
    /// sub-register (pins 0-3); use [`address_for_pin`](Self::address_for_pin)
    /// to reach pins 4-7.
    pub const fn address(self, port: Port) -> u8 {
        match self.layout() {
            Layout::PerPort(addrs) => addrs[port.index()],
            Layout::Split(addrs) => addrs[port.index()][0],
            Layout::Global(addr) => addr,
        }
    }

    /// Register address holding a pin's bit or field
    pub const fn address_for_pin(self, port: Port, pin: Pin) -> u8 {
        match self.layout() {
            Layout::Split(addrs) => addrs[port.index()][(pin.index() / 4) as usize],
            _ => self.address(port),
        }
    }

    /// Bits per pin (1, or 2 for split kinds)
    pub const fn field_width(self) -> u8 {
        match self.layout() {
            Layout::Split(_) => 2,
            _ => 1,
        }
    }

    /// Bit offset of a pin's field within the register from
    /// [`address_for_pin`](Self::address_for_pin)
    pub const fn field_shift(self, pin: Pin) -> u8 {
        match self.layout() {
            Layout::Split(_) => 2 * (pin.index() % 4),
            _ => pin.index(),
        }
    }
}

/// One physical register, for dumps and listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterInfo {
    /// Register address
    pub address: u8,
    /// Logical kind
    pub kind: RegisterKind,
    /// Port the register belongs to, `None` for global registers
    pub port: Option<Port>,
    /// Sub-register index for split kinds (0 = a, 1 = b)
    pub half: Option<u8>,
}

impl RegisterInfo {
    const fn new(address: u8, kind: RegisterKind, port: Option<Port>, half: Option<u8>) -> Self {
        Self {
            address,
            kind,
            port,
            half,
        }
    }

    /// Display label such as `output_1` or `drive_strength_0b`
    pub fn write_label(&self, f: &mut impl core::fmt::Write) -> core::fmt::Result {
        f.write_str(self.kind.name())?;
        if let Some(port) = self.port {
            write!(f, "_{}", port.index())?;
        }
        match self.half {
            Some(0) => f.write_str("a"),
            Some(_) => f.write_str("b"),
            None => Ok(()),
        }
    }
}

impl core::fmt::Display for RegisterInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.write_label(f)
    }
}

use Port::{Port0 as P0, Port1 as P1};
use RegisterKind as K;

/// Every physical register, in address order
pub const REGISTER_MAP: [RegisterInfo; 36] = [
    RegisterInfo::new(INPUT_PORT_0, K::InputData, Some(P0), None),
    RegisterInfo::new(INPUT_PORT_1, K::InputData, Some(P1), None),
    RegisterInfo::new(OUTPUT_PORT_0, K::OutputData, Some(P0), None),
    RegisterInfo::new(OUTPUT_PORT_1, K::OutputData, Some(P1), None),
    RegisterInfo::new(POLARITY_PORT_0, K::Polarity, Some(P0), None),
    RegisterInfo::new(POLARITY_PORT_1, K::Polarity, Some(P1), None),
    RegisterInfo::new(CONFIG_PORT_0, K::Direction, Some(P0), None),
    RegisterInfo::new(CONFIG_PORT_1, K::Direction, Some(P1), None),
    RegisterInfo::new(DRIVE_STRENGTH_PORT_0A, K::DriveStrength, Some(P0), Some(0)),
    RegisterInfo::new(DRIVE_STRENGTH_PORT_0B, K::DriveStrength, Some(P0), Some(1)),
    RegisterInfo::new(DRIVE_STRENGTH_PORT_1A, K::DriveStrength, Some(P1), Some(0)),
    RegisterInfo::new(DRIVE_STRENGTH_PORT_1B, K::DriveStrength, Some(P1), Some(1)),
    RegisterInfo::new(INPUT_LATCH_PORT_0, K::InputLatch, Some(P0), None),
    RegisterInfo::new(INPUT_LATCH_PORT_1, K::InputLatch, Some(P1), None),
    RegisterInfo::new(PULL_ENABLE_PORT_0, K::PullEnable, Some(P0), None),
    RegisterInfo::new(PULL_ENABLE_PORT_1, K::PullEnable, Some(P1), None),
    RegisterInfo::new(PULL_SELECT_PORT_0, K::PullSelect, Some(P0), None),
    RegisterInfo::new(PULL_SELECT_PORT_1, K::PullSelect, Some(P1), None),
    RegisterInfo::new(INT_MASK_PORT_0, K::InterruptMask, Some(P0), None),
    RegisterInfo::new(INT_MASK_PORT_1, K::InterruptMask, Some(P1), None),
    RegisterInfo::new(INT_STATUS_PORT_0, K::InterruptStatus, Some(P0), None),
    RegisterInfo::new(INT_STATUS_PORT_1, K::InterruptStatus, Some(P1), None),
    RegisterInfo::new(OUTPUT_PORT_CONFIG, K::OutputPortConfig, None, None),
    RegisterInfo::new(INT_EDGE_PORT_0A, K::InterruptEdge, Some(P0), Some(0)),
    RegisterInfo::new(INT_EDGE_PORT_0B, K::InterruptEdge, Some(P0), Some(1)),
    RegisterInfo::new(INT_EDGE_PORT_1A, K::InterruptEdge, Some(P1), Some(0)),
    RegisterInfo::new(INT_EDGE_PORT_1B, K::InterruptEdge, Some(P1), Some(1)),
    RegisterInfo::new(INT_CLEAR_PORT_0, K::InterruptClear, Some(P0), None),
    RegisterInfo::new(INT_CLEAR_PORT_1, K::InterruptClear, Some(P1), None),
    RegisterInfo::new(INPUT_STATUS_PORT_0, K::InputStatus, Some(P0), None),
    RegisterInfo::new(INPUT_STATUS_PORT_1, K::InputStatus, Some(P1), None),
    RegisterInfo::new(OUTPUT_PIN_CONFIG_PORT_0, K::OutputPinConfig, Some(P0), None),
    RegisterInfo::new(OUTPUT_PIN_CONFIG_PORT_1, K::OutputPinConfig, Some(P1), None),
    RegisterInfo::new(DEBOUNCE_ENABLE_PORT_0, K::DebounceEnable, Some(P0), None),
    RegisterInfo::new(DEBOUNCE_ENABLE_PORT_1, K::DebounceEnable, Some(P1), None),
    RegisterInfo::new(DEBOUNCE_COUNT, K::DebounceCount, None, None),
];

/// Look up a physical register by address
pub fn lookup(address: u8) -> Option<&'static RegisterInfo> {
    REGISTER_MAP.iter().find(|r| r.address == address)
}
