/// GPIO Line Module
///
/// A single digital line that can be switched between output and input at runtime.
/// The measurement loop only talks to hardware through this trait, the Raspberry Pi
/// implementation lives in `utils::rpi_line`.
use crate::error::Result;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Output,
    Input,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Output => write!(f, "output"),
            Self::Input => write!(f, "input"),
        }
    }
}

pub trait Line {
    /// BCM number of the pin behind this line.
    fn pin(&self) -> u8;

    /// Sets the direction. Setting the current direction again has no effect.
    fn configure(&mut self, direction: Direction) -> Result<()>;

    /// Drives the level. Only valid while configured as output.
    fn write(&mut self, level: bool) -> Result<()>;

    /// Samples the level. Only valid while configured as input.
    fn read(&mut self) -> Result<bool>;

    /// Drives an output line low and hands the pin back. Calling it again is a no-op,
    /// every other operation fails afterwards.
    fn release(&mut self) -> Result<()>;
}
