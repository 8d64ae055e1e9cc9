//! Hardware Abstraction Layer (HAL) for the panel sounder
//!
//! This crate provides trait-based abstractions for the hardware the
//! sounder and backlight drivers run on, enabling development and testing
//! without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (UI, tick interrupt)
//!         ↓
//! Driver Layer (buzzer crate: tone sequencer, backlight mapper)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (vendor HAL + PAC)
//! ```
//!
//! # Modules
//!
//! - [`pwm`] - PWM clock, channel and pin-mux capability
//! - [`gpio`] - Pin identifiers and pin functions
//! - `mocks` - Recording mock peripheral (tests and `std` feature)
//!
//! # Features
//!
//! - `std`: Enable standard library support (for testing)
//! - `defmt`: Enable defmt formatting of platform types
//!
//! # Example
//!
//! ```no_run
//! use platform::{ChannelConfig, PwmChannel, PwmPeripheral};
//!
//! fn start<P: PwmPeripheral>(pwm: &mut P) -> Result<(), P::Error> {
//!     let channel = PwmChannel::new(1);
//!     pwm.configure_channel(channel, &ChannelConfig::new(100, 25))?;
//!     pwm.enable(channel)
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // register and pin names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

pub mod gpio;
pub mod mocks;
pub mod pwm;

// Re-export GPIO types
pub use gpio::{PinFunction, PinId, PinState, Port, Pull};

// Re-export PWM types
pub use pwm::{
    Alignment, ChannelConfig, DeadTime, Polarity, Prescaler, PwmChannel, PwmClock, PwmPeripheral,
};

#[cfg(feature = "std")]
impl std::error::Error for mocks::MockPwmError {}
