//! Tone sequencer behaviour against the recording mock PWM.
//!
//! One tone at a time: a beep while sounding is dropped without touching the
//! peripheral, and a tone of `d` ticks ends on exactly the `d`-th tick with
//! both piezo pins back to the low outputs `init` left them in.

#![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use core::num::NonZeroU32;

use buzzer::config::{BUZZER_CHANNEL, PIEZO_HIGH_PIN, PIEZO_LOW_PIN};
use buzzer::{BeepOutcome, Error, Phase, Sounder, SounderConfig, TickOutcome};
use platform::mocks::{MockPwm, MockPwmError, PwmOp, OP_LOG_CAPACITY};
use platform::PinFunction;

fn hz(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).unwrap()
}

fn sounder() -> Sounder<MockPwm> {
    Sounder::init(MockPwm::new(), SounderConfig::default()).unwrap()
}

fn piezo_pins(sounder: &Sounder<MockPwm>) -> (Option<PinFunction>, Option<PinFunction>) {
    sounder.with_hardware(|pwm| (pwm.pin_function(PIEZO_HIGH_PIN), pwm.pin_function(PIEZO_LOW_PIN)))
}

/// Init(); Beep(440, 100, 3); 99 ticks still noisy; 100th tick silences.
#[test]
fn beep_lasts_exactly_its_duration() {
    let sounder = sounder();
    let idle_pins = piezo_pins(&sounder);

    assert!(matches!(sounder.beep(hz(440), 100, 3).unwrap(), BeepOutcome::Started(_)));
    assert!(sounder.noisy());
    sounder.with_hardware(|pwm| assert!(pwm.is_enabled(BUZZER_CHANNEL)));
    assert_eq!(
        piezo_pins(&sounder),
        (Some(PinFunction::PeripheralA), Some(PinFunction::PeripheralB))
    );

    for _ in 0..99 {
        assert!(matches!(sounder.tick().unwrap(), TickOutcome::Counting(_)));
        assert!(sounder.noisy());
    }

    assert_eq!(sounder.tick().unwrap(), TickOutcome::Expired);
    assert!(!sounder.noisy());
    sounder.with_hardware(|pwm| assert!(!pwm.is_enabled(BUZZER_CHANNEL)));
    assert_eq!(piezo_pins(&sounder), idle_pins);
    assert_eq!(idle_pins, (Some(PinFunction::OUTPUT_LOW), Some(PinFunction::OUTPUT_LOW)));
}

/// Beep(440, 50, 3); midway Beep(880, 50, 5) is ignored; first tone ends on tick 50.
#[test]
fn second_beep_while_sounding_is_ignored() {
    let sounder = sounder();
    let BeepOutcome::Started(first) = sounder.beep(hz(440), 50, 3).unwrap() else {
        panic!("first beep should start");
    };

    for _ in 0..25 {
        sounder.tick().unwrap();
    }
    let remaining = sounder.tone_state().remaining();
    let ops_before = sounder.with_hardware(|pwm| pwm.op_count());

    assert_eq!(sounder.beep(hz(880), 50, 5).unwrap(), BeepOutcome::Busy);
    assert_eq!(sounder.tone_state().remaining(), remaining);
    sounder.with_hardware(|pwm| {
        assert_eq!(pwm.op_count(), ops_before, "rejected beep must not touch the PWM");
        assert_eq!(pwm.channel_config(BUZZER_CHANNEL), Some(first.channel_config()));
    });

    for _ in 0..24 {
        sounder.tick().unwrap();
        assert!(sounder.noisy());
    }
    assert_eq!(sounder.tick().unwrap(), TickOutcome::Expired);
    assert!(!sounder.noisy());
}

#[test]
fn zero_volume_never_changes_state() {
    let sounder = sounder();
    let ops_before = sounder.with_hardware(|pwm| pwm.op_count());

    assert_eq!(sounder.beep(hz(2000), 10, 0).unwrap(), BeepOutcome::Silent);
    assert!(!sounder.noisy());
    assert_eq!(sounder.tone_state().phase(), Phase::Idle);
    sounder.with_hardware(|pwm| assert_eq!(pwm.op_count(), ops_before));

    // and while sounding
    sounder.beep(hz(2000), 10, 2).unwrap();
    let remaining = sounder.tone_state().remaining();
    assert_eq!(sounder.beep(hz(500), 3, 0).unwrap(), BeepOutcome::Silent);
    assert_eq!(sounder.tone_state().remaining(), remaining);
}

#[test]
fn volume_above_max_is_clamped() {
    let loud = sounder();
    let clamped = sounder();
    let BeepOutcome::Started(at_max) = loud.beep(hz(1000), 1, buzzer::MAX_VOLUME).unwrap() else {
        panic!("beep should start");
    };
    let BeepOutcome::Started(over) = clamped.beep(hz(1000), 1, 200).unwrap() else {
        panic!("beep should start");
    };
    assert_eq!(at_max, over);
}

#[test]
fn tick_while_idle_does_nothing() {
    let sounder = sounder();
    let ops_before = sounder.with_hardware(|pwm| pwm.op_count());
    for _ in 0..10 {
        assert_eq!(sounder.tick().unwrap(), TickOutcome::Idle);
    }
    sounder.with_hardware(|pwm| assert_eq!(pwm.op_count(), ops_before));
}

#[test]
fn new_tone_can_start_after_previous_ends() {
    let sounder = sounder();
    sounder.beep(hz(440), 1, 3).unwrap();
    assert_eq!(sounder.tick().unwrap(), TickOutcome::Expired);

    let BeepOutcome::Started(params) = sounder.beep(hz(880), 2, 5).unwrap() else {
        panic!("beep after expiry should start");
    };
    assert_eq!(params.period, 2_000_000 / 880);
    assert!(sounder.noisy());
}

#[test]
fn final_tick_still_refuses_new_tone() {
    let sounder = sounder();
    sounder.beep(hz(440), 2, 3).unwrap();
    sounder.tick().unwrap();
    assert_eq!(sounder.tone_state().remaining(), 1);
    assert_eq!(sounder.beep(hz(880), 5, 3).unwrap(), BeepOutcome::Busy);
}

#[test]
fn expiry_disables_channel_before_grounding_pins() {
    let sounder = sounder();
    sounder.beep(hz(440), 1, 3).unwrap();
    sounder.tick().unwrap();
    sounder.with_hardware(|pwm| {
        let ops = pwm.ops();
        let tail = &ops[ops.len() - 3..];
        assert_eq!(
            tail,
            &[
                PwmOp::Disable(BUZZER_CHANNEL),
                PwmOp::SetPin(PIEZO_HIGH_PIN, PinFunction::OUTPUT_LOW),
                PwmOp::SetPin(PIEZO_LOW_PIN, PinFunction::OUTPUT_LOW),
            ]
        );
    });
}

/// Tick from a context that interrupts `beep` mid-programming.
#[test]
fn tick_during_programming_is_dropped() {
    let sounder = sounder();
    let state = sounder.tone_state();

    assert!(state.try_claim());
    assert_eq!(sounder.tick().unwrap(), TickOutcome::Suppressed);
    assert_eq!(sounder.beep(hz(440), 5, 3).unwrap(), BeepOutcome::Busy);
    state.release();

    assert!(matches!(sounder.beep(hz(440), 5, 3).unwrap(), BeepOutcome::Started(_)));
}

#[test]
fn failed_programming_leaves_sequencer_usable() {
    let sounder = sounder();
    sounder.with_hardware_mut(|pwm| pwm.set_failing(true));
    assert_eq!(sounder.beep(hz(440), 3, 3), Err(Error::Pwm(MockPwmError)));
    assert!(!sounder.noisy());
    assert_eq!(sounder.tone_state().phase(), Phase::Idle);

    sounder.with_hardware_mut(|pwm| pwm.set_failing(false));
    assert!(matches!(sounder.beep(hz(440), 3, 3).unwrap(), BeepOutcome::Started(_)));
}

#[test]
fn partial_programming_failure_keeps_buzzer_for_next_tick() {
    let sounder = sounder();
    // channel write and enable succeed, pin routing and the cleanup fail
    sounder.with_hardware_mut(|pwm| pwm.fail_after(2));
    assert_eq!(sounder.beep(hz(440), 50, 3), Err(Error::Pwm(MockPwmError)));
    assert!(!sounder.noisy());
    assert_eq!(sounder.tone_state().phase(), Phase::Sounding);
    sounder.with_hardware(|pwm| assert!(pwm.is_enabled(BUZZER_CHANNEL)));

    sounder.with_hardware_mut(|pwm| pwm.set_failing(false));
    assert_eq!(sounder.beep(hz(880), 5, 3).unwrap(), BeepOutcome::Busy);

    assert_eq!(sounder.tick().unwrap(), TickOutcome::Expired);
    assert_eq!(sounder.tone_state().phase(), Phase::Idle);
    sounder.with_hardware(|pwm| assert!(!pwm.is_enabled(BUZZER_CHANNEL)));
    assert_eq!(piezo_pins(&sounder), (Some(PinFunction::OUTPUT_LOW), Some(PinFunction::OUTPUT_LOW)));
}

#[test]
fn busy_beep_is_untouched_after_op_log_fills() {
    let sounder = sounder();
    for _ in 0..OP_LOG_CAPACITY {
        sounder.beep(hz(1000), 1, 2).unwrap();
        sounder.tick().unwrap();
    }
    sounder.with_hardware(|pwm| assert_eq!(pwm.ops().len(), OP_LOG_CAPACITY));

    sounder.beep(hz(1000), 2, 2).unwrap();
    let count = sounder.with_hardware(|pwm| pwm.op_count());
    assert_eq!(sounder.beep(hz(500), 2, 2).unwrap(), BeepOutcome::Busy);
    sounder.with_hardware(|pwm| assert_eq!(pwm.op_count(), count));

    sounder.tick().unwrap();
    assert_eq!(sounder.tick().unwrap(), TickOutcome::Expired);
    sounder.with_hardware(|pwm| assert_eq!(pwm.op_count(), count + 3));
}

#[test]
fn failed_silence_is_retried_on_next_tick() {
    let sounder = sounder();
    sounder.beep(hz(440), 1, 3).unwrap();

    sounder.with_hardware_mut(|pwm| pwm.set_failing(true));
    assert_eq!(sounder.tick(), Err(Error::Pwm(MockPwmError)));
    assert!(!sounder.noisy());
    assert_eq!(sounder.tone_state().phase(), Phase::Sounding);

    sounder.with_hardware_mut(|pwm| pwm.set_failing(false));
    assert_eq!(sounder.tick().unwrap(), TickOutcome::Expired);
    assert_eq!(sounder.tone_state().phase(), Phase::Idle);
    sounder.with_hardware(|pwm| assert!(!pwm.is_enabled(BUZZER_CHANNEL)));
}

#[test]
fn init_reports_pwm_failure() {
    let mut pwm = MockPwm::new();
    pwm.set_failing(true);
    assert_eq!(
        Sounder::init(pwm, SounderConfig::default()).err(),
        Some(Error::Pwm(MockPwmError))
    );
}
