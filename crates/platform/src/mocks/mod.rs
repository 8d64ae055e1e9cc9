//! Mock implementations for testing
//!
//! This module provides mock implementations of the platform traits
//! for use in unit and integration tests.

#![cfg(any(test, feature = "std"))]

use heapless::{LinearMap, Vec};

use crate::gpio::{PinFunction, PinId};
use crate::pwm::{ChannelConfig, PwmChannel, PwmClock, PwmPeripheral};

/// Capacity of the recorded operation log
pub const OP_LOG_CAPACITY: usize = 128;

/// One register-level operation performed on [`MockPwm`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmOp {
    /// `init_clock`
    InitClock(PwmClock),
    /// `configure_channel`
    Configure(PwmChannel, ChannelConfig),
    /// `enable`
    Enable(PwmChannel),
    /// `disable`
    Disable(PwmChannel),
    /// `set_pin_function`
    SetPin(PinId, PinFunction),
}

/// Error injected by [`MockPwm::set_failing`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPwmError;

impl core::fmt::Display for MockPwmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Mock PWM failure")
    }
}

/// Mock PWM peripheral
///
/// Tracks the current clock, channel configurations, enable bits and pin
/// functions, and keeps a log of every operation for ordering assertions.
/// Operations past [`OP_LOG_CAPACITY`] still update state and are counted by
/// [`op_count`](MockPwm::op_count) but are not logged.
pub struct MockPwm {
    clock: Option<PwmClock>,
    configs: LinearMap<PwmChannel, ChannelConfig, 4>,
    enabled: LinearMap<PwmChannel, bool, 4>,
    pins: LinearMap<PinId, PinFunction, 16>,
    ops: Vec<PwmOp, OP_LOG_CAPACITY>,
    op_count: usize,
    failing: bool,
    fail_after: Option<usize>,
}

impl MockPwm {
    /// Create new mock PWM peripheral with everything unconfigured
    pub fn new() -> Self {
        Self {
            clock: None,
            configs: LinearMap::new(),
            enabled: LinearMap::new(),
            pins: LinearMap::new(),
            ops: Vec::new(),
            op_count: 0,
            failing: false,
            fail_after: None,
        }
    }

    /// Make every subsequent operation fail (`true`) or succeed (`false`)
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
        self.fail_after = None;
    }

    /// Let the next `successes` operations through, then fail every
    /// operation until [`set_failing(false)`](Self::set_failing)
    pub fn fail_after(&mut self, successes: usize) {
        self.failing = false;
        self.fail_after = Some(successes);
    }

    /// Last programmed clock
    pub fn clock(&self) -> Option<PwmClock> {
        self.clock
    }

    /// Last configuration written to `channel`
    pub fn channel_config(&self, channel: PwmChannel) -> Option<ChannelConfig> {
        self.configs.get(&channel).copied()
    }

    /// Check if `channel` is running
    pub fn is_enabled(&self, channel: PwmChannel) -> bool {
        self.enabled.get(&channel).copied().unwrap_or(false)
    }

    /// Current function of `pin`, `None` if never configured
    pub fn pin_function(&self, pin: PinId) -> Option<PinFunction> {
        self.pins.get(&pin).copied()
    }

    /// Recorded operations, oldest first
    pub fn ops(&self) -> &[PwmOp] {
        &self.ops
    }

    /// Number of successful operations since creation, including those
    /// past the log capacity or removed by [`clear_ops`](Self::clear_ops)
    pub fn op_count(&self) -> usize {
        self.op_count
    }

    /// Forget recorded operations (state and `op_count` are kept)
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    fn record(&mut self, op: PwmOp) -> Result<(), MockPwmError> {
        match self.fail_after {
            Some(0) => {
                self.failing = true;
                self.fail_after = None;
            }
            Some(n) => self.fail_after = Some(n.saturating_sub(1)),
            None => {}
        }
        if self.failing {
            return Err(MockPwmError);
        }
        self.op_count = self.op_count.saturating_add(1);
        // log full: state still updates, `op_count` still advances
        let _ = self.ops.push(op);
        Ok(())
    }
}

impl Default for MockPwm {
    fn default() -> Self {
        Self::new()
    }
}

impl PwmPeripheral for MockPwm {
    type Error = MockPwmError;

    fn init_clock(&mut self, clock: PwmClock) -> Result<(), Self::Error> {
        self.record(PwmOp::InitClock(clock))?;
        self.clock = Some(clock);
        Ok(())
    }

    fn configure_channel(
        &mut self,
        channel: PwmChannel,
        config: &ChannelConfig,
    ) -> Result<(), Self::Error> {
        self.record(PwmOp::Configure(channel, *config))?;
        self.configs.insert(channel, *config).map_err(|_| MockPwmError)?;
        Ok(())
    }

    fn enable(&mut self, channel: PwmChannel) -> Result<(), Self::Error> {
        self.record(PwmOp::Enable(channel))?;
        self.enabled.insert(channel, true).map_err(|_| MockPwmError)?;
        Ok(())
    }

    fn disable(&mut self, channel: PwmChannel) -> Result<(), Self::Error> {
        self.record(PwmOp::Disable(channel))?;
        self.enabled.insert(channel, false).map_err(|_| MockPwmError)?;
        Ok(())
    }

    fn set_pin_function(&mut self, pin: PinId, function: PinFunction) -> Result<(), Self::Error> {
        self.record(PwmOp::SetPin(pin, function))?;
        self.pins.insert(pin, function).map_err(|_| MockPwmError)?;
        Ok(())
    }
}
