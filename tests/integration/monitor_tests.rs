//! End-to-end tests of the measurement-and-control loop against mock hardware.

use crate::mock_hw::{ClockLog, FakeClock, LineCall, LineState, MockLine};
use proximity_blinker::config::{FAR_HOLD, MID_HOLD, NEAR_HOLD, SETTLE_TIME, TRIGGER_PULSE_WIDTH};
use proximity_blinker::{
    Band, Direction, EchoTimeout, Error, Line, Monitor, Rangefinder, Reading, Shutdown,
    ShutdownTrigger,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

const TICK: Duration = Duration::from_micros(100);

// High samples per echo; the rising-edge poll eats the first one, so N samples
// time as N - 1 ticks of 100 µs.
const NEAR_ECHO: usize = 6; // 500 µs -> 8.6 cm
const MID_ECHO: usize = 16; // 1500 µs -> 25.7 cm
const FAR_ECHO: usize = 31; // 3000 µs -> 51.5 cm

type TestMonitor = Monitor<MockLine, MockLine, FakeClock>;

struct Rig {
    monitor: TestMonitor,
    trig_echo: Rc<RefCell<LineState>>,
    indicator: Rc<RefCell<LineState>>,
    clock: Rc<RefCell<ClockLog>>,
    trigger: ShutdownTrigger,
}

fn rig(timeout: EchoTimeout) -> Rig {
    let (shutdown, trigger) = Shutdown::new();
    let (trig_echo_line, trig_echo) = MockLine::new(12);
    let (indicator_line, indicator) = MockLine::new(23);
    let (clock_impl, clock) = FakeClock::new(TICK);

    let rangefinder = Rangefinder::new(trig_echo_line, timeout, shutdown.clone()).unwrap();
    let monitor = Monitor::new(rangefinder, indicator_line, clock_impl, shutdown).unwrap();
    Rig {
        monitor,
        trig_echo,
        indicator,
        clock,
        trigger,
    }
}

fn queue(rig: &Rig, highs: &[usize]) {
    for &n in highs {
        MockLine::queue_echo(&rig.trig_echo, 2, n);
    }
}

#[test]
fn construction_leaves_both_lines_idle() {
    let rig = rig(EchoTimeout::Unbounded);

    for line in [&rig.trig_echo, &rig.indicator] {
        let state = line.borrow();
        assert_eq!(state.direction, Some(Direction::Output));
        assert!(!state.level);
    }
}

#[test]
fn one_step_follows_the_trigger_echo_protocol() {
    let mut rig = rig(EchoTimeout::Unbounded);
    MockLine::queue_echo(&rig.trig_echo, 1, 3);

    let reading = rig.monitor.step().unwrap();

    assert_eq!(
        rig.trig_echo.borrow().calls,
        vec![
            // Construction
            LineCall::Configure(Direction::Output),
            LineCall::Write(false),
            // Trigger pulse
            LineCall::Write(true),
            LineCall::Write(false),
            // Echo timing
            LineCall::Configure(Direction::Input),
            LineCall::Read(false),
            LineCall::Read(true),
            LineCall::Read(true),
            LineCall::Read(true),
            LineCall::Read(false),
            // Back to idle
            LineCall::Configure(Direction::Output),
            LineCall::Write(false),
        ]
    );
    assert_eq!(rig.clock.borrow().delays, vec![TRIGGER_PULSE_WIDTH]);
    assert_eq!(rig.clock.borrow().sleeps, vec![SETTLE_TIME]);
    assert_eq!(reading.measurement.elapsed, Duration::from_micros(200));
}

#[test]
fn trig_echo_line_is_idle_after_every_measurement() {
    let mut rig = rig(EchoTimeout::Unbounded);
    queue(&rig, &[NEAR_ECHO, MID_ECHO, FAR_ECHO]);

    for _ in 0..3 {
        rig.monitor.step().unwrap();
        let state = rig.trig_echo.borrow();
        assert_eq!(state.direction, Some(Direction::Output));
        assert!(!state.level);
    }
}

#[test]
fn readings_map_onto_bands() {
    let mut rig = rig(EchoTimeout::Unbounded);
    queue(&rig, &[NEAR_ECHO, MID_ECHO, FAR_ECHO]);

    let bands: Vec<Band> = (0..3)
        .map(|_| rig.monitor.step().unwrap().action.band)
        .collect();

    assert_eq!(bands, vec![Band::Near, Band::Mid, Band::Far]);
}

#[test]
fn mid_band_blinks_on_alternate_visits() {
    let mut rig = rig(EchoTimeout::Unbounded);
    queue(&rig, &[MID_ECHO, MID_ECHO, MID_ECHO]);

    for _ in 0..3 {
        rig.monitor.step().unwrap();
    }

    // Initial low from construction, then one write per step
    assert_eq!(rig.indicator.borrow().writes(), vec![false, true, false, true]);
    assert!(!rig.monitor.indicator().blink_phase());
}

#[test]
fn near_then_mid_starts_the_blink_off() {
    let mut rig = rig(EchoTimeout::Unbounded);
    queue(&rig, &[NEAR_ECHO, MID_ECHO, MID_ECHO]);

    for _ in 0..3 {
        rig.monitor.step().unwrap();
    }

    assert_eq!(rig.indicator.borrow().writes(), vec![false, true, false, true]);
}

#[test]
fn far_then_mid_starts_the_blink_on() {
    let mut rig = rig(EchoTimeout::Unbounded);
    queue(&rig, &[MID_ECHO, FAR_ECHO, MID_ECHO]);

    for _ in 0..3 {
        rig.monitor.step().unwrap();
    }

    assert_eq!(rig.indicator.borrow().writes(), vec![false, true, false, true]);
}

#[test]
fn run_holds_per_band_and_stops_on_shutdown() {
    let mut rig = rig(EchoTimeout::Unbounded);
    queue(&rig, &[NEAR_ECHO, MID_ECHO, FAR_ECHO]);

    let mut readings: Vec<Reading> = Vec::new();
    let trigger = &mut rig.trigger;
    rig.monitor
        .run(|reading| {
            readings.push(*reading);
            if readings.len() == 3 {
                trigger.trigger();
            }
        })
        .unwrap();

    assert_eq!(readings.len(), 3);
    assert_eq!(
        rig.clock.borrow().sleeps,
        vec![SETTLE_TIME, NEAR_HOLD, SETTLE_TIME, MID_HOLD, SETTLE_TIME, FAR_HOLD]
    );
}

#[test]
fn run_does_nothing_once_shutdown_was_requested() {
    let mut rig = rig(EchoTimeout::Unbounded);
    rig.trigger.trigger();

    rig.monitor.run(|_| panic!("no reading expected")).unwrap();

    assert_eq!(rig.trig_echo.borrow().calls.len(), 2);
}

#[test]
fn run_skips_a_timed_out_sample() {
    let mut rig = rig(EchoTimeout::Polls(20));
    // 20 silent polls time out the first sample, the rest is a mid-band echo
    MockLine::queue_echo(&rig.trig_echo, 25, MID_ECHO);

    let mut readings = Vec::new();
    let trigger = &mut rig.trigger;
    rig.monitor
        .run(|reading| {
            readings.push(reading.action.band);
            trigger.trigger();
        })
        .unwrap();

    assert_eq!(readings, vec![Band::Mid]);
    assert_eq!(
        rig.clock.borrow().sleeps,
        vec![SETTLE_TIME, SETTLE_TIME, MID_HOLD]
    );
    assert_eq!(rig.indicator.borrow().writes(), vec![false, true]);
}

#[test]
fn fatal_errors_end_the_run() {
    let mut rig = rig(EchoTimeout::Unbounded);
    rig.monitor.release().unwrap();

    let err = rig.monitor.run(|_| {}).unwrap_err();

    assert!(matches!(err, Error::Released(12)));
}

#[test]
fn release_is_idempotent() {
    let mut rig = rig(EchoTimeout::Unbounded);

    rig.monitor.release().unwrap();
    rig.monitor.release().unwrap();

    for line in [&rig.trig_echo, &rig.indicator] {
        let state = line.borrow();
        assert!(state.released);
        assert!(!state.level);
        assert_eq!(state.release_count(), 1);
    }
}

#[test]
fn dropping_the_monitor_releases_both_lines() {
    let rig = rig(EchoTimeout::Unbounded);
    let Rig {
        monitor,
        trig_echo,
        indicator,
        ..
    } = rig;

    drop(monitor);

    assert!(trig_echo.borrow().released);
    assert!(indicator.borrow().released);
}

#[test]
fn reading_the_trigger_line_while_output_is_rejected() {
    let (mut line, _state) = MockLine::new(12);
    line.configure(Direction::Output).unwrap();

    let err = line.read().unwrap_err();

    assert!(matches!(
        err,
        Error::WrongDirection {
            pin: 12,
            expected: Direction::Input,
            actual: Direction::Output,
        }
    ));
}
