//! PWM peripheral abstraction
//!
//! Register-level capability consumed by drivers that share one PWM block
//! across several channels (piezo sounder, backlight). Every field a channel
//! needs is spelled out in [`ChannelConfig`]; implementations must not rely on
//! zero-initialised defaults.

use crate::gpio::{PinFunction, PinId};

/// PWM peripheral abstraction
pub trait PwmPeripheral {
    /// Error type
    type Error: core::fmt::Debug;

    /// Program the peripheral clock dividers
    fn init_clock(&mut self, clock: PwmClock) -> Result<(), Self::Error>;

    /// Write a complete channel configuration.
    ///
    /// The channel must be disabled or the new values take effect at the next
    /// period boundary, depending on the hardware.
    fn configure_channel(
        &mut self,
        channel: PwmChannel,
        config: &ChannelConfig,
    ) -> Result<(), Self::Error>;

    /// Start the channel counter
    fn enable(&mut self, channel: PwmChannel) -> Result<(), Self::Error>;

    /// Stop the channel counter
    fn disable(&mut self, channel: PwmChannel) -> Result<(), Self::Error>;

    /// Route a pin to GPIO or to one of the peripheral functions
    fn set_pin_function(&mut self, pin: PinId, function: PinFunction) -> Result<(), Self::Error>;
}

/// PWM channel index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmChannel(u8);

impl PwmChannel {
    /// Create a channel identifier
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Return the channel index
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// Peripheral clock configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmClock {
    /// Clock A frequency in Hz (0 = off)
    pub clock_a_hz: u32,
    /// Clock B frequency in Hz (0 = off)
    pub clock_b_hz: u32,
}

impl PwmClock {
    /// Only clock A running, at `hz`
    #[must_use]
    pub const fn clock_a(hz: u32) -> Self {
        Self {
            clock_a_hz: hz,
            clock_b_hz: 0,
        }
    }
}

/// Channel counter clock source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Prescaler {
    /// Undivided master clock
    MasterClock,
    /// Divided clock A
    ClockA,
    /// Divided clock B
    ClockB,
}

/// Counter alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alignment {
    /// Edge-aligned, counts up and resets
    Left,
    /// Center-aligned, counts up then down
    Center,
}

/// Output level at the start of each period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Output starts low, goes high after `duty` counts
    StartLow,
    /// Output starts high
    StartHigh,
}

/// Dead-time generator values, in counter ticks
///
/// The generator delays the rising edge of each complementary output by the
/// given amount, reducing the effective on-time of both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeadTime {
    /// Delay on the high-side output (PWMH)
    pub high: u16,
    /// Delay on the low-side output (PWML)
    pub low: u16,
}

impl DeadTime {
    /// Same delay on both outputs
    #[must_use]
    pub const fn symmetric(ticks: u16) -> Self {
        Self {
            high: ticks,
            low: ticks,
        }
    }

    /// Packed register layout: high-side delay in bits 31:16, low-side in 15:0
    #[must_use]
    pub const fn register_value(self) -> u32 {
        ((self.high as u32) << 16) | self.low as u32
    }
}

/// Complete channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Counter period in clock ticks
    pub period: u32,
    /// Counts before the output changes level
    pub duty: u32,
    /// Counter clock source
    pub prescaler: Prescaler,
    /// Counter alignment
    pub alignment: Alignment,
    /// Output level at period start
    pub polarity: Polarity,
    /// Dead-time generator, `None` = disabled
    pub dead_time: Option<DeadTime>,
}

impl ChannelConfig {
    /// Left-aligned, clock A, start-low channel without dead time
    #[must_use]
    pub const fn new(period: u32, duty: u32) -> Self {
        Self {
            period,
            duty,
            prescaler: Prescaler::ClockA,
            alignment: Alignment::Left,
            polarity: Polarity::StartLow,
            dead_time: None,
        }
    }

    /// Enable the dead-time generator with the given values
    #[must_use]
    pub const fn with_dead_time(mut self, dead_time: DeadTime) -> Self {
        self.dead_time = Some(dead_time);
        self
    }
}
