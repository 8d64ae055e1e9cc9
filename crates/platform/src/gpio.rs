//! GPIO pin identification and function multiplexing
//!
//! Pins on the target are shared between plain digital I/O and peripheral
//! functions. Drivers name pins with [`PinId`] and select what drives them
//! with [`PinFunction`]; the multiplexing itself is performed by the
//! peripheral capability (see [`crate::pwm::PwmPeripheral::set_pin_function`]).

/// GPIO port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    /// Port A
    A,
    /// Port B
    B,
    /// Port C
    C,
    /// Port D
    D,
}

/// A single pin: port plus bit index within the port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId {
    port: Port,
    index: u8,
}

impl PinId {
    /// Create a pin identifier. `index` is the bit number within the port (0–31).
    #[must_use]
    pub const fn new(port: Port, index: u8) -> Self {
        Self { port, index }
    }

    /// Port this pin belongs to
    #[must_use]
    pub const fn port(self) -> Port {
        self.port
    }

    /// Bit index within the port
    #[must_use]
    pub const fn index(self) -> u8 {
        self.index
    }
}

/// Pin state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    Low,
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

/// Pull resistor configuration for inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// Floating (no pull resistor)
    None,
    /// Internal pull-up
    Up,
    /// Internal pull-down
    Down,
}

/// What drives a pin
///
/// Peripheral functions A and B are the two alternate functions a pin can be
/// routed to; which peripheral signal each one carries is fixed by the chip's
/// pin-mux table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinFunction {
    /// Plain push-pull output held at a fixed level
    Output(PinState),
    /// Plain digital input
    Input(Pull),
    /// Routed to peripheral function A
    PeripheralA,
    /// Routed to peripheral function B
    PeripheralB,
}

impl PinFunction {
    /// Output held low, the safe idle state for driven loads
    pub const OUTPUT_LOW: Self = Self::Output(PinState::Low);

    /// `true` if the pin is connected to a peripheral rather than GPIO
    #[must_use]
    pub const fn is_peripheral(self) -> bool {
        matches!(self, Self::PeripheralA | Self::PeripheralB)
    }
}
