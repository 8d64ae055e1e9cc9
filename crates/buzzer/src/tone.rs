//! Tone parameters and the shared tone state machine.
//!
//! ## Phases
//! ```text
//! [Idle] --try_claim()--> [Programming] --commit(d > 0)--> [Sounding]
//!                               |                              |
//!                               +--release()--> [Idle] <--finish()-- tick() == Expired
//! ```
//!
//! `Programming` is the window in which thread context is writing the buzzer
//! channel registers. The tick handler never waits for it: a tick that lands
//! inside the window is dropped (at most one per `beep`, well below the tick
//! granularity of any tone).

use core::num::NonZeroU32;
use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use platform::{ChannelConfig, DeadTime};

use crate::config::{MAX_VOLUME, VOLUME_TABLE, VOLUME_TABLE_DIVISOR};

// ── Volume ───────────────────────────────────────────────────────────────────

/// Volume level, clamped to `0..=MAX_VOLUME`. Level 0 is silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Volume(u8);

impl Volume {
    /// Silence
    pub const SILENT: Self = Self(0);

    /// Loudest level
    pub const MAX: Self = Self(MAX_VOLUME);

    /// Create a `Volume`, clamping values above [`MAX_VOLUME`].
    #[must_use]
    pub const fn new(level: u8) -> Self {
        if level > MAX_VOLUME {
            Self(MAX_VOLUME)
        } else {
            Self(level)
        }
    }

    /// Return the level (0–`MAX_VOLUME`)
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// `true` for level 0
    #[must_use]
    pub const fn is_silent(self) -> bool {
        self.0 == 0
    }

    /// On-time in parts per [`VOLUME_TABLE_DIVISOR`], `None` when silent
    #[must_use]
    pub fn on_time_parts(self) -> Option<u32> {
        let index = usize::from(self.0).checked_sub(1)?;
        VOLUME_TABLE.get(index).copied()
    }
}

// ── ToneRequest ──────────────────────────────────────────────────────────────

/// A single beep request. Consumed immediately by `Sounder::start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToneRequest {
    /// Tone frequency in Hz
    pub frequency: NonZeroU32,
    /// Length of the tone in ticks
    pub duration_ticks: u32,
    /// Loudness
    pub volume: Volume,
}

impl ToneRequest {
    /// Build a request, clamping `volume`
    #[must_use]
    pub const fn new(frequency: NonZeroU32, duration_ticks: u32, volume: u8) -> Self {
        Self {
            frequency,
            duration_ticks,
            volume: Volume::new(volume),
        }
    }
}

// ── ToneParams ───────────────────────────────────────────────────────────────

/// Buzzer channel register values derived from a request.
///
/// The piezo is driven by both complementary outputs at 50 % nominal duty.
/// The dead-time generator delays each rising edge by `dead_time`, leaving
/// each output high for `on_time` per period. `on_time + dead_time` is always
/// `period / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToneParams {
    /// Period in clock ticks (`clock_hz / frequency`, truncated)
    pub period: u32,
    /// High time of each output in clock ticks
    pub on_time: u32,
    /// Dead time in clock ticks
    pub dead_time: u16,
}

impl ToneParams {
    /// Compute register values, `None` for a silent volume.
    ///
    /// Frequency accuracy is limited by the integer period. Dead times that
    /// would overflow the 16-bit field (tones far below
    /// [`MIN_TONE_HZ`](crate::config::MIN_TONE_HZ)) saturate.
    #[must_use]
    pub fn compute(clock_hz: u32, frequency: NonZeroU32, volume: Volume) -> Option<Self> {
        let parts = volume.on_time_parts()?;
        let period = clock_hz / frequency;
        let on_time = period
            .saturating_mul(parts)
            .checked_div(VOLUME_TABLE_DIVISOR)
            .unwrap_or(0);
        let half = period / 2;
        let dead_time = u16::try_from(half.saturating_sub(on_time)).unwrap_or(u16::MAX);
        Some(Self {
            period,
            on_time,
            dead_time,
        })
    }

    /// Channel configuration: 50 % duty, symmetric dead time
    #[must_use]
    pub const fn channel_config(&self) -> ChannelConfig {
        ChannelConfig::new(self.period, self.period / 2)
            .with_dead_time(DeadTime::symmetric(self.dead_time))
    }
}

// ── ToneState ────────────────────────────────────────────────────────────────

/// Tone state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Phase {
    /// No tone, buzzer pins held low
    Idle = 0,
    /// A `beep` is writing the buzzer registers
    Programming = 1,
    /// Tone running, counting down
    Sounding = 2,
}

impl Phase {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Programming,
            2 => Self::Sounding,
            _ => Self::Idle,
        }
    }
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Nothing sounding
    Idle,
    /// A `beep` was mid-flight; the tick was dropped
    Suppressed,
    /// Tone still running with this many ticks left
    Counting(u32),
    /// The tone just ran out; the buzzer must be silenced
    Expired,
}

/// Tone state shared between `beep` (producer) and `tick` (consumer).
///
/// Lock-free: every method is a handful of atomic operations and never
/// blocks, so it is safe to call from interrupt context.
pub struct ToneState {
    phase: AtomicU8,
    remaining: AtomicU32,
}

impl ToneState {
    /// Idle, zero ticks remaining
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: AtomicU8::new(Phase::Idle as u8),
            remaining: AtomicU32::new(0),
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Ticks left on the current tone
    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::Acquire)
    }

    /// `true` while a tone has ticks left
    pub fn is_active(&self) -> bool {
        self.remaining() != 0
    }

    /// Move `Idle → Programming`. Returns `false` (and changes nothing) if a
    /// tone is sounding or another `beep` holds the claim.
    pub fn try_claim(&self) -> bool {
        self.phase
            .compare_exchange(
                Phase::Idle as u8,
                Phase::Programming as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Publish a programmed tone: `Programming → Sounding` with `ticks` left.
    /// Zero ticks goes straight back to `Idle`.
    pub fn commit(&self, ticks: u32) {
        self.remaining.store(ticks, Ordering::Release);
        let next = if ticks == 0 { Phase::Idle } else { Phase::Sounding };
        self.phase.store(next as u8, Ordering::Release);
    }

    /// Abandon a claim whose hardware may still be sounding:
    /// `Programming → Sounding` with nothing remaining. The next
    /// [`tick`](Self::tick) reports [`TickOutcome::Expired`] so the buzzer
    /// gets silenced before a new tone can claim it.
    pub fn expire(&self) {
        self.remaining.store(0, Ordering::Release);
        self.phase.store(Phase::Sounding as u8, Ordering::Release);
    }

    /// Abandon a claim without starting a tone: `Programming → Idle`
    pub fn release(&self) {
        self.remaining.store(0, Ordering::Release);
        self.phase.store(Phase::Idle as u8, Ordering::Release);
    }

    /// Advance one tick.
    ///
    /// On [`TickOutcome::Expired`] the phase stays `Sounding` until
    /// [`finish`](Self::finish), so no new tone can claim the buzzer before
    /// it has been silenced. A `Sounding` state with nothing remaining (a
    /// failed silence on the previous tick) reports `Expired` again.
    pub fn tick(&self) -> TickOutcome {
        match self.phase() {
            Phase::Idle => TickOutcome::Idle,
            Phase::Programming => TickOutcome::Suppressed,
            Phase::Sounding => {
                match self.remaining.fetch_update(Ordering::AcqRel, Ordering::Acquire, |r| {
                    r.checked_sub(1)
                }) {
                    Ok(1) | Err(_) => TickOutcome::Expired,
                    Ok(previous) => TickOutcome::Counting(previous.saturating_sub(1)),
                }
            }
        }
    }

    /// Return to `Idle` after the buzzer has been silenced
    pub fn finish(&self) {
        self.phase.store(Phase::Idle as u8, Ordering::Release);
    }
}

impl Default for ToneState {
    fn default() -> Self {
        Self::new()
    }
}
