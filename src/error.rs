use crate::line::Direction;
use crate::rangefinder::Edge;

/// Everything that can go wrong while driving the sensor and the indicator.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("GPIO access failed: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    #[error("GPIO {pin} is configured as {actual}, expected {expected}")]
    WrongDirection {
        pin: u8,
        expected: Direction,
        actual: Direction,
    },

    #[error("GPIO {0} has already been released")]
    Released(u8),

    #[error("Timed out waiting for the echo {0} edge")]
    EchoTimeout(Edge),

    #[error("Could not install the signal listener: {0}")]
    Signal(#[from] std::io::Error),

    #[error("Interrupted")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, Error>;
