/// Raspberry Pi GPIO Line
///
/// Implements `Line` on top of an rppal `IoPin`, so the same physical pin can be
/// flipped between trigger output and echo input.
use crate::error::{Error, Result};
use crate::line::{Direction, Line};
use log::debug;
use rppal::gpio::{Gpio, IoPin, Level, Mode};

pub struct RpiLine {
    pin: u8,
    io: Option<IoPin>,
}

impl RpiLine {
    /// Claims `pin` in the given direction. Output lines start low.
    pub fn new(gpio: &Gpio, pin: u8, direction: Direction) -> Result<Self> {
        let mut io = gpio.get(pin)?.into_io(mode_of(direction));
        if direction == Direction::Output {
            io.set_low();
        }
        debug!("Claimed GPIO {} as {}", pin, direction);
        Ok(Self { pin, io: Some(io) })
    }

    fn io(&mut self) -> Result<&mut IoPin> {
        self.io.as_mut().ok_or(Error::Released(self.pin))
    }

    fn expect_direction(&mut self, expected: Direction) -> Result<&mut IoPin> {
        let pin = self.pin;
        let io = self.io()?;
        let actual = direction_of(io.mode());
        if actual != expected {
            return Err(Error::WrongDirection {
                pin,
                expected,
                actual,
            });
        }
        Ok(io)
    }
}

impl Line for RpiLine {
    fn pin(&self) -> u8 {
        self.pin
    }

    fn configure(&mut self, direction: Direction) -> Result<()> {
        let io = self.io()?;
        if direction_of(io.mode()) != direction {
            io.set_mode(mode_of(direction));
        }
        Ok(())
    }

    fn write(&mut self, level: bool) -> Result<()> {
        let io = self.expect_direction(Direction::Output)?;
        io.write(if level { Level::High } else { Level::Low });
        Ok(())
    }

    fn read(&mut self) -> Result<bool> {
        Ok(self.expect_direction(Direction::Input)?.is_high())
    }

    fn release(&mut self) -> Result<()> {
        if let Some(mut io) = self.io.take() {
            if io.mode() == Mode::Output {
                io.set_low();
            }
            // Dropping the pin restores the mode it had before we claimed it
            drop(io);
            debug!("Released GPIO {}", self.pin);
        }
        Ok(())
    }
}

impl Drop for RpiLine {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

fn mode_of(direction: Direction) -> Mode {
    match direction {
        Direction::Output => Mode::Output,
        Direction::Input => Mode::Input,
    }
}

fn direction_of(mode: Mode) -> Direction {
    match mode {
        Mode::Output => Direction::Output,
        _ => Direction::Input,
    }
}
