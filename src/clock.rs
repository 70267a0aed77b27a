/// Clock Module
///
/// Time source for the measurement loop. Timestamps only need to be monotonic,
/// so they are offsets from an arbitrary origin.
use crate::shutdown::Shutdown;
use std::thread;
use std::time::{Duration, Instant};

pub trait Clock {
    /// Monotonic timestamp.
    fn now(&mut self) -> Duration;

    /// Short, uninterruptible delay (trigger pulse width).
    fn delay(&mut self, duration: Duration);

    /// Long pause between measurements and indicator actions. May return early
    /// when shutdown is requested.
    fn sleep(&mut self, duration: Duration);
}

pub struct SystemClock {
    origin: Instant,
    shutdown: Shutdown,
}

impl SystemClock {
    pub fn new(shutdown: Shutdown) -> Self {
        Self {
            origin: Instant::now(),
            shutdown,
        }
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }

    fn delay(&mut self, duration: Duration) {
        thread::sleep(duration);
    }

    fn sleep(&mut self, duration: Duration) {
        self.shutdown.wait_timeout(duration);
    }
}
