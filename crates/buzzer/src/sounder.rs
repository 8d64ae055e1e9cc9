//! Piezo sounder and backlight driver.
//!
//! [`Sounder`] owns the PWM block and exposes every operation through `&self`,
//! so one instance can sit in a `static` and be shared between thread context
//! (`beep`, `set_backlight`, `noisy`) and the periodic tick interrupt (`tick`).
//!
//! Register writes happen inside short critical sections
//! (`CriticalSectionRawMutex`, a PRIMASK-masked region on single-core
//! Cortex-M). The longest one is the buzzer programming sequence in `beep`:
//! one channel write, one enable and two pin-mux writes. The tone phase
//! itself is tracked lock-free in [`ToneState`].
//!
//! # Usage
//!
//! ```no_run
//! # use core::num::NonZeroU32;
//! # use buzzer::{Sounder, SounderConfig};
//! # fn demo<P: platform::PwmPeripheral>(pwm: P) -> Result<(), buzzer::Error<P::Error>> {
//! let sounder = Sounder::init(pwm, SounderConfig::default())?;
//! sounder.set_backlight(80)?;
//! if let Some(a4) = NonZeroU32::new(440) {
//!     sounder.beep(a4, 100, 3)?;
//! }
//! // from the 1 kHz tick interrupt:
//! sounder.tick()?;
//! # Ok(())
//! # }
//! ```

use core::cell::RefCell;
use core::num::NonZeroU32;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::digital::InputPin;
use platform::{PinFunction, PinState, Pull, PwmClock, PwmPeripheral};

use crate::backlight::{Backlight, BacklightInverter};
use crate::config::SounderConfig;
use crate::error::Error;
use crate::tone::{ToneParams, ToneRequest, ToneState, TickOutcome};

#[cfg(feature = "defmt")]
use platform::DeadTime;

/// What `beep` did with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BeepOutcome {
    /// Tone programmed and running
    Started(ToneParams),
    /// Volume 0 or zero duration: nothing to play
    Silent,
    /// A tone is already sounding; the request was dropped
    Busy,
}

/// Piezo tone sequencer and backlight mapper sharing one PWM peripheral
pub struct Sounder<H> {
    hw: Mutex<CriticalSectionRawMutex, RefCell<H>>,
    tone: ToneState,
    backlight: Backlight,
    config: SounderConfig,
}

impl<H: PwmPeripheral> Sounder<H> {
    /// Bring the PWM block to a safe state without reading a board strap.
    ///
    /// Both channels are disabled, clock A is started, the backlight pin is
    /// routed to the PWM (its channel stays off until the first
    /// [`set_backlight`](Self::set_backlight)) and both piezo pins are driven
    /// low. The backlight uses the linear curve; East Rising boards that may
    /// carry the smoothed inverter should use
    /// [`init_with_board_id`](Self::init_with_board_id).
    pub fn init(hw: H, config: SounderConfig) -> Result<Self, Error<H::Error>> {
        Self::init_inner(hw, config, None)
    }

    /// As [`init`](Self::init), sampling the board-identification strap once
    /// on families that have one.
    ///
    /// `board_id` is the input handle for
    /// [`SounderConfig::board_id_pin`]. That pin is switched to an input with
    /// its pull-up enabled before the read, so an open strap reads high. On
    /// [`HardwareFamily::Standard`](crate::HardwareFamily::Standard) boards
    /// the pin is neither configured nor read.
    pub fn init_with_board_id<B: InputPin>(
        mut hw: H,
        config: SounderConfig,
        board_id: &mut B,
    ) -> Result<Self, Error<H::Error>> {
        let inverter = if config.family.has_board_id() {
            hw.set_pin_function(config.board_id_pin, PinFunction::Input(Pull::Up))
                .map_err(Error::Pwm)?;
            let level = PinState::from(board_id.is_high().map_err(|_| Error::BoardId)?);
            Some(BacklightInverter::from_strap(level))
        } else {
            None
        };
        Self::init_inner(hw, config, inverter)
    }

    fn init_inner(
        mut hw: H,
        config: SounderConfig,
        inverter: Option<BacklightInverter>,
    ) -> Result<Self, Error<H::Error>> {
        hw.disable(config.buzzer_channel).map_err(Error::Pwm)?;
        hw.disable(config.backlight_channel).map_err(Error::Pwm)?;
        hw.init_clock(PwmClock::clock_a(config.pwm_clock_hz))
            .map_err(Error::Pwm)?;
        hw.set_pin_function(config.backlight_pin, PinFunction::PeripheralA)
            .map_err(Error::Pwm)?;
        silence(&mut hw, &config).map_err(Error::Pwm)?;

        let backlight = Backlight::new(&config, inverter);

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Sounder ready: {}, backlight {} (period {=u32})",
            config.family,
            backlight.curve(),
            backlight.period()
        );

        Ok(Self {
            hw: Mutex::new(RefCell::new(hw)),
            tone: ToneState::new(),
            backlight,
            config,
        })
    }

    /// Start a tone of `frequency` Hz for `duration_ticks` ticks.
    ///
    /// Volume 0 and zero duration do nothing; volumes above
    /// [`MAX_VOLUME`](crate::MAX_VOLUME) are clamped. While a tone is
    /// sounding further requests are dropped, not queued.
    pub fn beep(
        &self,
        frequency: NonZeroU32,
        duration_ticks: u32,
        volume: u8,
    ) -> Result<BeepOutcome, Error<H::Error>> {
        self.start(ToneRequest::new(frequency, duration_ticks, volume))
    }

    /// Start a tone from a prepared request. See [`beep`](Self::beep).
    pub fn start(&self, request: ToneRequest) -> Result<BeepOutcome, Error<H::Error>> {
        let Some(params) =
            ToneParams::compute(self.config.pwm_clock_hz, request.frequency, request.volume)
        else {
            return Ok(BeepOutcome::Silent);
        };
        if request.duration_ticks == 0 {
            return Ok(BeepOutcome::Silent);
        }
        if !self.tone.try_claim() {
            #[cfg(feature = "defmt")]
            defmt::debug!("Beep dropped: tone already sounding");
            return Ok(BeepOutcome::Busy);
        }

        let programmed = self.hw.lock(|hw| {
            let mut hw = hw.borrow_mut();
            hw.configure_channel(self.config.buzzer_channel, &params.channel_config())?;
            hw.enable(self.config.buzzer_channel)?;
            hw.set_pin_function(self.config.piezo_high, PinFunction::PeripheralA)?;
            hw.set_pin_function(self.config.piezo_low, PinFunction::PeripheralB)
        });

        match programmed {
            Ok(()) => {
                self.tone.commit(request.duration_ticks);
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "Beep {=u32} Hz x{=u32}: period {=u32}, DTR {=u32:#x}",
                    request.frequency.get(),
                    request.duration_ticks,
                    params.period,
                    DeadTime::symmetric(params.dead_time).register_value()
                );
                Ok(BeepOutcome::Started(params))
            }
            Err(e) => {
                match self.hw.lock(|hw| silence(&mut *hw.borrow_mut(), &self.config)) {
                    Ok(()) => self.tone.release(),
                    // buzzer may still be running: the next tick retries the silence
                    Err(_) => self.tone.expire(),
                }
                #[cfg(feature = "defmt")]
                defmt::warn!("Beep programming failed");
                Err(Error::Pwm(e))
            }
        }
    }

    /// Advance the tone by one tick. Call from the periodic tick interrupt.
    ///
    /// When the tone runs out the buzzer channel is disabled and both piezo
    /// pins are driven low. If that fails the error is returned and the next
    /// tick retries.
    pub fn tick(&self) -> Result<TickOutcome, Error<H::Error>> {
        let outcome = self.tone.tick();
        if outcome == TickOutcome::Expired {
            self.hw
                .lock(|hw| silence(&mut *hw.borrow_mut(), &self.config))
                .map_err(Error::Pwm)?;
            self.tone.finish();
            #[cfg(feature = "defmt")]
            defmt::trace!("Tone finished");
        }
        Ok(outcome)
    }

    /// `true` while a tone is (or should be) sounding
    pub fn noisy(&self) -> bool {
        self.tone.is_active()
    }

    /// Set backlight brightness on a 0–[`MAX_BRIGHTNESS`](crate::MAX_BRIGHTNESS)
    /// scale. Takes effect at the next PWM period; safe to call at any rate.
    pub fn set_backlight(&self, brightness: u32) -> Result<(), Error<H::Error>> {
        let channel_config = self.backlight.channel_config(brightness);
        self.hw
            .lock(|hw| {
                let mut hw = hw.borrow_mut();
                hw.configure_channel(self.config.backlight_channel, &channel_config)?;
                hw.enable(self.config.backlight_channel)
            })
            .map_err(Error::Pwm)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Backlight {=u32}: duty {=u32}", brightness, channel_config.duty);
        Ok(())
    }

    /// Backlight mapping chosen at init
    pub fn backlight(&self) -> &Backlight {
        &self.backlight
    }

    /// Configuration the driver was built with
    pub fn config(&self) -> &SounderConfig {
        &self.config
    }

    /// Shared tone state
    pub fn tone_state(&self) -> &ToneState {
        &self.tone
    }

    /// Run `f` with shared access to the PWM peripheral inside a critical section
    pub fn with_hardware<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        self.hw.lock(|hw| f(&hw.borrow()))
    }

    /// Run `f` with exclusive access to the PWM peripheral inside a critical
    /// section, e.g. to drive channels this driver does not own
    pub fn with_hardware_mut<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        self.hw.lock(|hw| f(&mut hw.borrow_mut()))
    }
}

/// Disable the buzzer channel and hold both piezo pins low
fn silence<H: PwmPeripheral>(hw: &mut H, config: &SounderConfig) -> Result<(), H::Error> {
    hw.disable(config.buzzer_channel)?;
    hw.set_pin_function(config.piezo_high, PinFunction::OUTPUT_LOW)?;
    hw.set_pin_function(config.piezo_low, PinFunction::OUTPUT_LOW)
}
