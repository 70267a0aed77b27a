//! Ultrasonic proximity indicator.
//!
//! Times the echo of a single-pin ultrasonic rangefinder on a Raspberry Pi and
//! blinks an indicator LED according to how close the nearest object is.

pub mod clock;
pub mod config;
pub mod error;
pub mod indicator;
pub mod line;
pub mod monitor;
pub mod rangefinder;
pub mod shutdown;
pub mod utils;

pub use clock::{Clock, SystemClock};
pub use error::{Error, Result};
pub use indicator::{Band, Indicator, IndicatorAction};
pub use line::{Direction, Line};
pub use monitor::{Monitor, Reading};
pub use rangefinder::{distance_cm, EchoTimeout, Edge, Measurement, Rangefinder};
pub use shutdown::{Shutdown, ShutdownTrigger};
