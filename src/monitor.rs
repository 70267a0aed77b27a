use crate::clock::Clock;
use crate::config::SETTLE_TIME;
use crate::error::{Error, Result};
use crate::indicator::{Indicator, IndicatorAction};
use crate::line::{Direction, Line};
use crate::rangefinder::{Measurement, Rangefinder};
use crate::shutdown::Shutdown;
use log::{debug, error, info, warn};

/// What one pass of the loop measured and did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub measurement: Measurement,
    pub action: IndicatorAction,
}

/// Measurement-and-control loop. Owns both lines and releases them when dropped.
pub struct Monitor<T: Line, I: Line, C: Clock> {
    rangefinder: Rangefinder<T>,
    indicator_line: I,
    indicator: Indicator,
    clock: C,
    shutdown: Shutdown,
}

impl<T: Line, I: Line, C: Clock> Monitor<T, I, C> {
    pub fn new(
        rangefinder: Rangefinder<T>,
        mut indicator_line: I,
        clock: C,
        shutdown: Shutdown,
    ) -> Result<Self> {
        indicator_line.configure(Direction::Output)?;
        indicator_line.write(false)?;
        Ok(Self {
            rangefinder,
            indicator_line,
            indicator: Indicator::new(),
            clock,
            shutdown,
        })
    }

    pub fn rangefinder(&self) -> &Rangefinder<T> {
        &self.rangefinder
    }

    pub fn indicator_line(&self) -> &I {
        &self.indicator_line
    }

    pub fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    /// Measures once and updates the indicator. Does not wait out the hold time.
    pub fn step(&mut self) -> Result<Reading> {
        let measurement = self.rangefinder.measure(&mut self.clock)?;
        let action = self.indicator.step(measurement.distance_cm);
        self.indicator_line.write(action.level)?;
        debug!(
            "{:.1} cm -> {:?}, indicator {}",
            measurement.distance_cm,
            action.band,
            if action.level { "on" } else { "off" }
        );
        Ok(Reading {
            measurement,
            action,
        })
    }

    /// Runs until shutdown is requested, handing every reading to `on_reading`.
    ///
    /// Echo timeouts skip the sample and keep going; any other error stops the loop.
    pub fn run<F: FnMut(&Reading)>(&mut self, mut on_reading: F) -> Result<()> {
        info!(
            "Measuring on GPIO {}, indicator on GPIO {}",
            self.rangefinder.line().pin(),
            self.indicator_line.pin()
        );
        while !self.shutdown.is_requested() {
            match self.step() {
                Ok(reading) => {
                    on_reading(&reading);
                    self.clock.sleep(reading.action.hold);
                }
                Err(Error::EchoTimeout(edge)) => {
                    warn!("No {} echo edge, skipping sample", edge);
                    self.clock.sleep(SETTLE_TIME);
                }
                Err(Error::Interrupted) => break,
                Err(err) => return Err(err),
            }
        }
        info!("Measurement loop stopped");
        Ok(())
    }

    /// Releases both lines. Safe to call more than once.
    pub fn release(&mut self) -> Result<()> {
        let trig_echo = self.rangefinder.line_mut().release();
        let indicator = self.indicator_line.release();
        trig_echo.and(indicator)
    }
}

impl<T: Line, I: Line, C: Clock> Drop for Monitor<T, I, C> {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            error!("Failed to release GPIO lines: {}", err);
        }
    }
}
