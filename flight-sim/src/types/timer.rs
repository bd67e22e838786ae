use chrono::{DateTime, Utc};
use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex, RwLock,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use super::config::tick_interval;
use super::sim_error::SimError;

/// Longest stretch the timer thread sleeps without checking whether it was stopped.
const POLL_MILLIS: u64 = 20;

/// A fixed-interval ticker with support for starting, pausing, resuming and stopping.
///
/// The first tick fires one interval after `start`. Each tick runs the callback to
/// completion on the timer thread before the next one is scheduled, so ticks
/// never overlap.
pub struct Timer {
    pub interval: RwLock<Duration>,
    pub running: AtomicBool, // Flag to indicate if the timer is running
    pub paused: AtomicBool,  // Flag to indicate if the timer is paused
    pub tick_count: AtomicU64,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Timer {
    /// Creates new timer
    pub fn new(interval: Duration) -> Arc<Self> {
        Arc::new(Self {
            interval: RwLock::new(interval),
            running: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            tick_count: AtomicU64::new(0),
            handle: Mutex::new(None),
        })
    }

    /// Changes the interval between ticks
    pub fn set_interval(&self, millis: u64) -> Result<(), SimError> {
        let interval = tick_interval(millis)?;

        let mut interval_lock = self.interval.write().map_err(|_| {
            SimError::TimerLockError("Failed to acquire write lock for interval.".to_string())
        })?;
        *interval_lock = interval;
        Ok(())
    }

    pub fn current_interval(&self) -> Result<Duration, SimError> {
        self.interval
            .read()
            .map(|interval| *interval)
            .map_err(|_| SimError::TimerLockError("Failed to read interval.".to_string()))
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Stops the timer and waits for the tick in progress to finish
    pub fn stop(&self) -> Result<(), SimError> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Err(SimError::NotRunning);
        }
        self.paused.store(false, Ordering::SeqCst);

        let handle = self
            .handle
            .lock()
            .map_err(|_| SimError::TimerLockError("Failed to lock timer handle.".to_string()))?
            .take();

        if let Some(handle) = handle {
            // stop() may be called from inside a tick callback
            if handle.thread().id() != thread::current().id() {
                handle
                    .join()
                    .map_err(|_| SimError::Other("Timer thread panicked.".to_string()))?;
            }
        }
        Ok(())
    }

    /// Pauses the timer indefinitely
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Resumes the timer
    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    /// Starts timer and executes the callback function on each tick.
    pub fn start(
        self: &Arc<Self>,
        tick_callback: impl Fn(DateTime<Utc>, u64) + Send + 'static,
    ) -> Result<(), SimError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(SimError::AlreadyRunning);
        }
        // A pause left over from before this start must not freeze the new run
        self.paused.store(false, Ordering::SeqCst);

        let timer = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name("timer-thread".to_string())
            .spawn(move || {
                let mut last_tick = Instant::now();
                while timer.running.load(Ordering::SeqCst) {
                    let interval = match timer.interval.read() {
                        Ok(interval) => *interval,
                        Err(_) => {
                            eprintln!("Failed to acquire read lock on interval. Stopping timer.");
                            break;
                        }
                    };

                    let remaining = interval.saturating_sub(last_tick.elapsed());
                    if !remaining.is_zero() {
                        // Sleep in short slices so stop() is noticed quickly
                        thread::sleep(remaining.min(Duration::from_millis(POLL_MILLIS)));
                        continue;
                    }
                    last_tick = Instant::now();

                    if timer.paused.load(Ordering::SeqCst) {
                        continue;
                    }

                    let tick = timer.tick_count.fetch_add(1, Ordering::SeqCst) + 1;
                    tick_callback(Utc::now(), tick);
                }
            });

        match spawned {
            Ok(handle) => {
                let mut handle_lock = self.handle.lock().map_err(|_| {
                    SimError::TimerLockError("Failed to lock timer handle.".to_string())
                })?;
                *handle_lock = Some(handle);
                Ok(())
            }
            Err(_) => {
                self.running.store(false, Ordering::SeqCst);
                Err(SimError::TimerStartError(
                    "Failed to start the timer thread.".to_string(),
                ))
            }
        }
    }
}
