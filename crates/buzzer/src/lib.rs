//! Piezo sounder and LCD backlight driver
//!
//! Two features share one PWM block:
//!
//! - **Tone sequencer**: a single timed tone on the complementary outputs of
//!   the buzzer channel. Volume is set with the dead-time generator; duration
//!   is counted in ticks from a periodic interrupt. One tone at a time, later
//!   requests are dropped while it sounds.
//! - **Backlight mapper**: brightness `0..=MAX_BRIGHTNESS` to an inverted
//!   duty on the backlight channel, linear or clamped to the smoothing-filter
//!   window depending on the board strap read at init.
//!
//! Hardware is reached only through [`platform::PwmPeripheral`] and, for the
//! board strap, [`embedded_hal::digital::InputPin`], so the whole driver runs
//! against `platform::mocks::MockPwm` on the host.
//!
//! # Features
//!
//! - `std`: `std::error::Error` for [`Error`], mocks outside tests
//! - `defmt`: defmt logging and `Format` derives

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // tick() runs in interrupt context
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_code)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing, clippy::arithmetic_side_effects)
)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

pub mod backlight;
pub mod config;
pub mod error;
pub mod sounder;
pub mod tone;

pub use backlight::{Backlight, BacklightCurve, BacklightInverter};
pub use config::{HardwareFamily, SmoothingFilter, SounderConfig, MAX_BRIGHTNESS, MAX_VOLUME};
pub use error::Error;
pub use sounder::{BeepOutcome, Sounder};
pub use tone::{Phase, TickOutcome, ToneParams, ToneRequest, ToneState, Volume};
