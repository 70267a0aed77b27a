/// Config Module
///
/// Pin assignments, timings and band thresholds. Pins and the echo timeout can be
/// overridden from the command line, everything else is fixed at compile time.
use crate::rangefinder::EchoTimeout;
use clap::Parser;
use std::time::Duration;

// Overridable from the command line (BCM numbering)
pub const TRIG_ECHO_PIN: u8 = 12;
pub const INDICATOR_PIN: u8 = 23;

// Should be hardcoded
pub const SPEED_OF_SOUND_CM_PER_S: f64 = 34_300.0;
pub const TRIGGER_PULSE_WIDTH: Duration = Duration::from_micros(10); // Minimum the sensor accepts
pub const SETTLE_TIME: Duration = Duration::from_millis(100);

// Indicator bands, lower bound inclusive
pub const MID_FROM_CM: f64 = 18.0;
pub const FAR_FROM_CM: f64 = 30.0;
pub const NEAR_HOLD: Duration = Duration::from_millis(100);
pub const MID_HOLD: Duration = Duration::from_millis(1000);
pub const FAR_HOLD: Duration = Duration::from_millis(1000);

/// Ultrasonic proximity indicator for a single-pin trigger/echo sensor.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// BCM number of the shared trigger/echo pin
    #[arg(long, default_value_t = TRIG_ECHO_PIN)]
    pub trig_echo_pin: u8,

    /// BCM number of the indicator LED pin
    #[arg(long, default_value_t = INDICATOR_PIN)]
    pub indicator_pin: u8,

    /// Give up on an echo edge after this many milliseconds (waits forever if unset)
    #[arg(long)]
    pub echo_timeout_ms: Option<u64>,

    /// Give up on an echo edge after this many polls (ignored with --echo-timeout-ms)
    #[arg(long)]
    pub max_polls: Option<u64>,
}

impl Args {
    pub fn echo_timeout(&self) -> EchoTimeout {
        match (self.echo_timeout_ms, self.max_polls) {
            (Some(ms), _) => EchoTimeout::Within(Duration::from_millis(ms)),
            (None, Some(polls)) => EchoTimeout::Polls(polls),
            (None, None) => EchoTimeout::Unbounded,
        }
    }
}
