/// Rangefinder Module
///
/// Drives a single-pin ultrasonic sensor: the same line emits the trigger pulse and
/// then carries the echo pulse, whose width is the round-trip time of the sound.
use crate::clock::Clock;
use crate::config::{SETTLE_TIME, SPEED_OF_SOUND_CM_PER_S, TRIGGER_PULSE_WIDTH};
use crate::error::{Error, Result};
use crate::line::{Direction, Line};
use crate::shutdown::Shutdown;
use std::fmt;
use std::time::Duration;

/// How long a busy-poll may wait for an echo edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EchoTimeout {
    /// Spin until the edge shows up, however long that takes.
    #[default]
    Unbounded,
    /// Give up after this many reads of the line.
    Polls(u64),
    /// Give up once this much time has passed since polling began.
    Within(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rising => write!(f, "rising"),
            Self::Falling => write!(f, "falling"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub elapsed: Duration,
    pub distance_cm: f64,
}

impl Measurement {
    pub fn from_elapsed(elapsed: Duration) -> Self {
        Self {
            elapsed,
            distance_cm: distance_cm(elapsed.as_secs_f64()),
        }
    }
}

/// Converts an echo round-trip time into a one-way distance.
///
/// A negative time can only come from a malformed reading and yields 0 cm.
pub fn distance_cm(elapsed_s: f64) -> f64 {
    if elapsed_s <= 0.0 {
        return 0.0;
    }
    elapsed_s * SPEED_OF_SOUND_CM_PER_S / 2.0
}

pub struct Rangefinder<L: Line> {
    line: L,
    timeout: EchoTimeout,
    shutdown: Shutdown,
}

impl<L: Line> Rangefinder<L> {
    /// Takes over `line` and puts it in the idle state: output, low.
    pub fn new(mut line: L, timeout: EchoTimeout, shutdown: Shutdown) -> Result<Self> {
        line.configure(Direction::Output)?;
        line.write(false)?;
        Ok(Self {
            line,
            timeout,
            shutdown,
        })
    }

    pub fn line(&self) -> &L {
        &self.line
    }

    pub fn line_mut(&mut self) -> &mut L {
        &mut self.line
    }

    /// Takes one distance sample. The line is back in the idle state when this
    /// returns, whether or not the echo was timed successfully.
    pub fn measure<C: Clock>(&mut self, clock: &mut C) -> Result<Measurement> {
        self.line.write(true)?;
        clock.delay(TRIGGER_PULSE_WIDTH);
        self.line.write(false)?;
        // Covers an echo that starts before the first poll
        let start = clock.now();

        let echo = self.time_echo(clock, start);
        self.line.configure(Direction::Output)?;
        self.line.write(false)?;
        let (start, stop) = echo?;

        let measurement = Measurement::from_elapsed(stop.saturating_sub(start));
        clock.sleep(SETTLE_TIME);
        Ok(measurement)
    }

    fn time_echo<C: Clock>(
        &mut self,
        clock: &mut C,
        mut start: Duration,
    ) -> Result<(Duration, Duration)> {
        self.line.configure(Direction::Input)?;

        let waiting_since = start;
        let mut polls = 0;
        while !self.line.read()? {
            start = clock.now();
            polls += 1;
            let waited = start.saturating_sub(waiting_since);
            self.keep_waiting(Edge::Rising, polls, waited)?;
        }

        // An echo too short to be sampled high counts as zero width
        let mut stop = start;
        polls = 0;
        while self.line.read()? {
            stop = clock.now();
            polls += 1;
            self.keep_waiting(Edge::Falling, polls, stop.saturating_sub(start))?;
        }

        Ok((start, stop))
    }

    fn keep_waiting(&self, edge: Edge, polls: u64, waited: Duration) -> Result<()> {
        if self.shutdown.is_requested() {
            return Err(Error::Interrupted);
        }
        let expired = match self.timeout {
            EchoTimeout::Unbounded => false,
            EchoTimeout::Polls(limit) => polls >= limit,
            EchoTimeout::Within(limit) => waited >= limit,
        };
        if expired {
            return Err(Error::EchoTimeout(edge));
        }
        Ok(())
    }
}
