//! Backlight brightness to PWM duty mapping
//!
//! The backlight input is inverted downstream of the PWM pin: brightness 0
//! maps to the top of the duty range (dark) and `MAX_BRIGHTNESS` to the bottom.

use platform::{ChannelConfig, PinState};

use crate::config::{SounderConfig, MAX_BRIGHTNESS};

/// Which backlight inverter an East Rising board carries, from its
/// identification strap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BacklightInverter {
    /// Strap open (reads high with the pull-up): PWM drives the inverter
    /// directly, full duty range usable.
    Direct,
    /// Strap grounded: PWM is RC-smoothed into the MP3302 analog input and
    /// must stay inside the filter's control window.
    Smoothed,
}

impl BacklightInverter {
    /// Decode the board-identification pin level
    #[must_use]
    pub const fn from_strap(level: PinState) -> Self {
        match level {
            PinState::High => Self::Direct,
            PinState::Low => Self::Smoothed,
        }
    }
}

/// Duty-cycle formula, fixed at init
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BacklightCurve {
    /// `duty = (period - 1) * (MAX - b) / MAX`
    Linear,
    /// `duty = min + (max - min) * (MAX - b) / MAX`
    Clamped {
        /// Duty at full brightness
        min: u32,
        /// Duty at zero brightness
        max: u32,
    },
}

/// Backlight channel mapping: fixed period plus curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Backlight {
    period: u32,
    curve: BacklightCurve,
}

impl Backlight {
    /// Mapping for `config`. `inverter` is the strap reading on families that
    /// have one; `None` (or [`BacklightInverter::Direct`]) selects the linear
    /// curve.
    #[must_use]
    pub const fn new(config: &SounderConfig, inverter: Option<BacklightInverter>) -> Self {
        let period = config.backlight_period();
        let curve = match inverter {
            Some(BacklightInverter::Smoothed) => BacklightCurve::Clamped {
                min: config.filter.min_duty(period),
                max: config.filter.max_duty(period),
            },
            Some(BacklightInverter::Direct) | None => BacklightCurve::Linear,
        };
        Self { period, curve }
    }

    /// Period in clock ticks
    #[must_use]
    pub const fn period(&self) -> u32 {
        self.period
    }

    /// Selected curve
    #[must_use]
    pub const fn curve(&self) -> BacklightCurve {
        self.curve
    }

    /// Duty for `brightness` (0–`MAX_BRIGHTNESS`).
    ///
    /// Out-of-range brightness is not clamped; the arithmetic wraps and the
    /// duty is meaningless, but nothing panics.
    #[must_use]
    pub const fn duty(&self, brightness: u32) -> u32 {
        let dimming = MAX_BRIGHTNESS.wrapping_sub(brightness);
        match self.curve {
            BacklightCurve::Linear => self
                .period
                .wrapping_sub(1)
                .wrapping_mul(dimming)
                .wrapping_div(MAX_BRIGHTNESS),
            BacklightCurve::Clamped { min, max } => min.wrapping_add(
                max.wrapping_sub(min)
                    .wrapping_mul(dimming)
                    .wrapping_div(MAX_BRIGHTNESS),
            ),
        }
    }

    /// Channel configuration for `brightness`
    #[must_use]
    pub const fn channel_config(&self, brightness: u32) -> ChannelConfig {
        ChannelConfig::new(self.period, self.duty(brightness))
    }
}
