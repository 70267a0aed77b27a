use crate::error::Result;
use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::info;
use std::io;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Cancellation token shared by the measurement loop and the clock.
///
/// Nothing is ever sent on `wake`; the trigger drops its sender, which disconnects
/// the channel and wakes every waiter at once.
#[derive(Clone)]
pub struct Shutdown {
    requested: Arc<AtomicBool>,
    wake: Receiver<()>,
}

/// The only handle able to request a shutdown. Dropping it requests one too.
pub struct ShutdownTrigger {
    requested: Arc<AtomicBool>,
    wake: Option<Sender<()>>,
}

impl Shutdown {
    pub fn new() -> (Shutdown, ShutdownTrigger) {
        let requested = Arc::new(AtomicBool::new(false));
        let (sender, receiver) = bounded(0);
        (
            Shutdown {
                requested: Arc::clone(&requested),
                wake: receiver,
            },
            ShutdownTrigger {
                requested,
                wake: Some(sender),
            },
        )
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Blocks for `timeout` or until shutdown is requested, whichever comes first.
    /// Returns whether shutdown was requested.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.is_requested() {
            return true;
        }
        match self.wake.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => self.is_requested(),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
        }
    }
}

impl ShutdownTrigger {
    pub fn trigger(&mut self) {
        self.requested.store(true, Ordering::SeqCst);
        self.wake.take();
    }
}

impl Drop for ShutdownTrigger {
    fn drop(&mut self) {
        self.trigger();
    }
}

/// Routes SIGINT and SIGTERM to `trigger` from a dedicated thread.
///
/// Must run before any other thread is spawned: the signals are blocked on the
/// calling thread and every thread created afterwards inherits that mask, so only
/// the listener's `sigwait` ever sees them.
pub fn listen_for_signals(mut trigger: ShutdownTrigger) -> Result<()> {
    // SAFETY: the set is initialised by sigemptyset before use and only plain
    // signal numbers are added to it.
    let signals = unsafe {
        let mut set: libc::sigset_t = std::mem::zeroed();
        libc::sigemptyset(&mut set);
        libc::sigaddset(&mut set, libc::SIGINT);
        libc::sigaddset(&mut set, libc::SIGTERM);
        let rc = libc::pthread_sigmask(libc::SIG_BLOCK, &set, ptr::null_mut());
        if rc != 0 {
            return Err(io::Error::from_raw_os_error(rc).into());
        }
        set
    };

    thread::Builder::new()
        .name("signal-listener".into())
        .spawn(move || loop {
            let mut signal: libc::c_int = 0;
            // SAFETY: `signals` is a valid, initialised set owned by this thread.
            if unsafe { libc::sigwait(&signals, &mut signal) } == 0 {
                info!("Received signal {}, stopping", signal);
                trigger.trigger();
                break;
            }
        })?;

    Ok(())
}
