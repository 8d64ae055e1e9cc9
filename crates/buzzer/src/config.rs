//! Driver configuration and compiled-in hardware constants
//!
//! The piezo sits across the complementary outputs of PWM channel 0
//! (PWMH0 on PB0 peripheral A, PWML0 on PB5 peripheral B). The backlight
//! control input is driven by PWMH1 on PB1 peripheral A. East Rising panels
//! strap PB13 to identify which backlight inverter is fitted.

use platform::{PinId, Port, PwmChannel};

/// PWM clock A frequency (2 MHz, usable down to ~30 Hz tones)
pub const PWM_CLOCK_HZ: u32 = 2_000_000;

/// Lowest tone frequency the clock and dead-time field are calibrated for
pub const MIN_TONE_HZ: u32 = 30;

/// Highest volume level; requests above this are clamped
pub const MAX_VOLUME: u8 = 5;

/// On-time per volume level, in parts per [`VOLUME_TABLE_DIVISOR`] of the period.
///
/// Index 0 is volume 1. Maximum fundamental amplitude is reached when the dead
/// time is about 1/6 of the period; larger dead times are quieter but richer
/// in high harmonics.
pub const VOLUME_TABLE: [u32; MAX_VOLUME as usize] = [3, 9, 20, 40, 80];

/// Denominator of [`VOLUME_TABLE`] entries
pub const VOLUME_TABLE_DIVISOR: u32 = 200;

/// Highest brightness level accepted by `set_backlight`
pub const MAX_BRIGHTNESS: u32 = 100;

/// PWM channel driving the piezo
pub const BUZZER_CHANNEL: PwmChannel = PwmChannel::new(0);

/// PWM channel driving the backlight
pub const BACKLIGHT_CHANNEL: PwmChannel = PwmChannel::new(1);

/// Piezo high side (PWMH0, peripheral A)
pub const PIEZO_HIGH_PIN: PinId = PinId::new(Port::B, 0);

/// Piezo low side (PWML0, peripheral B)
pub const PIEZO_LOW_PIN: PinId = PinId::new(Port::B, 5);

/// Backlight control (PWMH1, peripheral A)
pub const BACKLIGHT_PIN: PinId = PinId::new(Port::B, 1);

/// Board-identification strap on East Rising panels (input, pull-up)
pub const BOARD_ID_PIN: PinId = PinId::new(Port::B, 13);

/// Display hardware family
///
/// Selects the backlight PWM frequency and whether a board-identification
/// pin exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareFamily {
    /// Boost-converter backlight. Working range is about 100 Hz to 1 kHz;
    /// higher rates fight the converter's soft start and some frequencies
    /// flicker on the 4.3" panel.
    Standard,
    /// East Rising panels. 20 kHz suits both the direct-drive inverter and
    /// the newer inverter behind an RC smoothing filter.
    EastRising,
}

impl HardwareFamily {
    /// Target backlight PWM frequency in Hz
    #[must_use]
    pub const fn backlight_hz(self) -> u32 {
        match self {
            Self::Standard => 300,
            Self::EastRising => 20_000,
        }
    }

    /// `true` if boards of this family carry a board-identification strap
    #[must_use]
    pub const fn has_board_id(self) -> bool {
        matches!(self, Self::EastRising)
    }
}

/// RC smoothing filter between the PWM output and an analog backlight input.
///
/// The smoothed output spans 0 V to the supply voltage and is inverted, so the
/// usable control window maps to a window of duty values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SmoothingFilter {
    /// PWM high level in millivolts
    pub supply_mv: u32,
    /// Control voltage giving minimum backlight
    pub control_min_mv: u32,
    /// Control voltage giving full backlight
    pub control_max_mv: u32,
}

impl SmoothingFilter {
    /// MP3302 inverter input: nominally 0.7 V to 1.4 V, taken slightly past
    /// 1.4 V so full brightness is reachable.
    pub const MP3302: Self = Self {
        supply_mv: 3_300,
        control_min_mv: 700,
        control_max_mv: 1_450,
    };

    /// Duty for full brightness (lowest duty, output is inverted)
    #[must_use]
    pub const fn min_duty(self, period: u32) -> u32 {
        scale(period, self.supply_mv.saturating_sub(self.control_max_mv), self.supply_mv)
    }

    /// Duty for minimum brightness
    #[must_use]
    pub const fn max_duty(self, period: u32) -> u32 {
        scale(period, self.supply_mv.saturating_sub(self.control_min_mv), self.supply_mv)
    }
}

/// `value * num / den` in 64-bit, truncating
#[allow(clippy::cast_possible_truncation)] // num <= den, so the result fits
const fn scale(value: u32, num: u32, den: u32) -> u32 {
    let wide = (value as u64).saturating_mul(num as u64);
    match wide.checked_div(den as u64) {
        Some(v) => v as u32,
        None => 0,
    }
}

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SounderConfig {
    /// PWM clock A frequency in Hz
    pub pwm_clock_hz: u32,
    /// Display hardware family
    pub family: HardwareFamily,
    /// Smoothing filter used by the clamped backlight curve
    pub filter: SmoothingFilter,
    /// Channel driving the piezo
    pub buzzer_channel: PwmChannel,
    /// Channel driving the backlight
    pub backlight_channel: PwmChannel,
    /// Piezo high-side pin (routed to peripheral A while sounding)
    pub piezo_high: PinId,
    /// Piezo low-side pin (routed to peripheral B while sounding)
    pub piezo_low: PinId,
    /// Backlight pin (peripheral A)
    pub backlight_pin: PinId,
    /// Board-identification strap, read only on families that have one
    pub board_id_pin: PinId,
}

impl SounderConfig {
    /// Board defaults for `family`
    #[must_use]
    pub const fn new(family: HardwareFamily) -> Self {
        Self {
            pwm_clock_hz: PWM_CLOCK_HZ,
            family,
            filter: SmoothingFilter::MP3302,
            buzzer_channel: BUZZER_CHANNEL,
            backlight_channel: BACKLIGHT_CHANNEL,
            piezo_high: PIEZO_HIGH_PIN,
            piezo_low: PIEZO_LOW_PIN,
            backlight_pin: BACKLIGHT_PIN,
            board_id_pin: BOARD_ID_PIN,
        }
    }

    /// Fixed backlight period in clock ticks
    #[must_use]
    pub const fn backlight_period(&self) -> u32 {
        match self.pwm_clock_hz.checked_div(self.family.backlight_hz()) {
            Some(period) => period,
            None => 0,
        }
    }
}

impl Default for SounderConfig {
    fn default() -> Self {
        Self::new(HardwareFamily::Standard)
    }
}
