/// Indicator Module
///
/// Maps each distance onto one of three bands and decides what the indicator shows:
/// solid on when something is near, blinking (one toggle per visit) in the middle
/// band, off when far.
use crate::config::{FAR_FROM_CM, FAR_HOLD, MID_FROM_CM, MID_HOLD, NEAR_HOLD};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Near,
    Mid,
    Far,
}

impl Band {
    /// NaN falls through to `Far`.
    pub fn classify(distance_cm: f64) -> Band {
        if distance_cm < MID_FROM_CM {
            Band::Near
        } else if distance_cm < FAR_FROM_CM {
            Band::Mid
        } else {
            Band::Far
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorAction {
    pub band: Band,
    pub level: bool,
    pub hold: Duration,
}

#[derive(Debug, Clone)]
pub struct Indicator {
    blink_phase: bool,
}

impl Default for Indicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator {
    pub fn new() -> Self {
        Self { blink_phase: true }
    }

    /// Level the next mid-band visit will show.
    pub fn blink_phase(&self) -> bool {
        self.blink_phase
    }

    pub fn step(&mut self, distance_cm: f64) -> IndicatorAction {
        let band = Band::classify(distance_cm);
        let (level, hold) = match band {
            Band::Near => {
                self.blink_phase = false;
                (true, NEAR_HOLD)
            }
            Band::Mid => {
                let level = self.blink_phase;
                self.blink_phase = !level;
                (level, MID_HOLD)
            }
            Band::Far => {
                self.blink_phase = true;
                (false, FAR_HOLD)
            }
        };
        IndicatorAction { band, level, hold }
    }
}
