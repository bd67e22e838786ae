use chrono::{DateTime, Utc};
use logger::{Color, Logger};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{mpsc, Arc, Mutex, RwLock};
use std::time::Duration;
use threadpool::ThreadPool;

use super::airfield::Airfield;
use super::catalog::Catalog;
use super::config::SimConfig;
use super::fleet_generator::FleetGenerator;
use super::flight::Flight;
use super::flight_status::FlightStatus;
use super::sim_error::SimError;
use super::tick_engine::{SkipReason, TickEngine, TickEvent, TickReport};
use super::timer::Timer;

/// Immutable view of the fleet published after every tick.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub tick: u64,
    pub time: DateTime<Utc>,
    pub flights: Arc<Vec<Flight>>,
}

impl Snapshot {
    fn empty() -> Self {
        Snapshot {
            tick: 0,
            time: Utc::now(),
            flights: Arc::new(Vec::new()),
        }
    }
}

/// State shared between the simulation handle and the timer thread.
#[derive(Clone)]
struct FleetState {
    airfield: Arc<Airfield>,
    catalog: Arc<Catalog>,
    snapshot: Arc<RwLock<Snapshot>>,
    rng: Arc<Mutex<StdRng>>,
    thread_pool: Arc<ThreadPool>,
    tick_lock: Arc<Mutex<()>>,
    workers: usize,
    logger: Option<Logger>,
}

impl FleetState {
    /// Computes the next fleet from the published snapshot and publishes it.
    ///
    /// The fleet is split into one contiguous chunk per worker, each updated on
    /// the thread pool with its own RNG seeded from the simulation RNG. Chunks are
    /// put back together in order before the new snapshot is swapped in.
    fn tick(&self, now: DateTime<Utc>) -> Result<Snapshot, SimError> {
        let _tick_guard = self
            .tick_lock
            .lock()
            .map_err(|_| SimError::Other("Failed to lock tick.".to_string()))?;

        let current = self.snapshot()?;
        let total = current.flights.len();
        let chunk_size = total.div_ceil(self.workers).max(1);
        let chunk_count = total.div_ceil(chunk_size);

        let seeds: Vec<u64> = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| SimError::Other("Failed to lock random generator.".to_string()))?;
            (0..chunk_count).map(|_| rng.gen()).collect()
        };

        let (tx, rx) = mpsc::channel::<(usize, TickReport)>();
        for (index, seed) in seeds.into_iter().enumerate() {
            let flights = Arc::clone(&current.flights);
            let airfield = Arc::clone(&self.airfield);
            let catalog = Arc::clone(&self.catalog);
            let tx = tx.clone();
            let start = index * chunk_size;
            let end = (start + chunk_size).min(total);

            self.thread_pool.execute(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                let engine = TickEngine::new(&airfield, &catalog);
                let report = engine.tick(&flights[start..end], now, &mut rng);

                if tx.send((index, report)).is_err() {
                    eprintln!("Failed to send updated flights for chunk {}.", index);
                }
            });
        }
        drop(tx);

        let mut reports: Vec<(usize, TickReport)> = rx.iter().collect();
        if reports.len() != chunk_count {
            return Err(SimError::Other(format!(
                "Only {} of {} fleet chunks were updated.",
                reports.len(),
                chunk_count
            )));
        }
        reports.sort_by_key(|(index, _)| *index);

        let mut fleet = Vec::with_capacity(total);
        let mut events = Vec::new();
        for (_, report) in reports {
            fleet.extend(report.fleet);
            events.extend(report.events);
        }

        let next = Snapshot {
            tick: current.tick + 1,
            time: now,
            flights: Arc::new(fleet),
        };
        self.publish(next.clone())?;
        self.log_events(&events);

        Ok(next)
    }

    fn snapshot(&self) -> Result<Snapshot, SimError> {
        self.snapshot
            .read()
            .map(|snapshot| snapshot.clone())
            .map_err(|_| SimError::Other("Failed to read fleet snapshot.".to_string()))
    }

    fn publish(&self, snapshot: Snapshot) -> Result<(), SimError> {
        let mut snapshot_lock = self
            .snapshot
            .write()
            .map_err(|_| SimError::Other("Failed to lock fleet snapshot.".to_string()))?;
        *snapshot_lock = snapshot;
        Ok(())
    }

    fn log_events(&self, events: &[TickEvent]) {
        for event in events {
            match event {
                TickEvent::Transition {
                    flight_number,
                    from,
                    to,
                    ..
                } => self.info(
                    &format!("{}: {} -> {}", flight_number, from.as_str(), to.as_str()),
                    Color::Cyan,
                ),
                TickEvent::Skipped {
                    flight_number,
                    status,
                    reason,
                    ..
                } => {
                    let reason = match reason {
                        SkipReason::MissingGate => "no gate assigned".to_string(),
                        SkipReason::UnknownDestination(code) => {
                            format!("unknown destination {}", code)
                        }
                    };
                    self.warn(&format!(
                        "{}: {} phase complete but transition skipped ({})",
                        flight_number,
                        status.as_str(),
                        reason
                    ));
                }
            }
        }
    }

    fn info(&self, message: &str, color: Color) {
        if let Some(logger) = &self.logger {
            if let Err(e) = logger.info(message, color) {
                eprintln!("Failed to write log: {}", e);
            }
        }
    }

    fn warn(&self, message: &str) {
        if let Some(logger) = &self.logger {
            if let Err(e) = logger.warn(message) {
                eprintln!("Failed to write log: {}", e);
            }
        }
    }

    /// Errors always reach stderr when there is no log to put them in.
    fn error(&self, message: &str) {
        match &self.logger {
            Some(logger) => {
                if let Err(e) = logger.error(message) {
                    eprintln!("Failed to write log: {}. {}", e, message);
                }
            }
            None => eprintln!("{}", message),
        }
    }
}

/// Owns the simulated fleet and the loop that ticks it.
///
/// A single writer (the timer thread, or [`Simulation::step`]) produces each new
/// fleet; readers get a cheap [`Snapshot`] of the last published one.
pub struct Simulation {
    config: SimConfig,
    state: FleetState,
    timer: Arc<Timer>,
}

impl Simulation {
    /// Create a new simulation over San Francisco with the default catalog
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        Simulation::with_reference_data(config, Airfield::default(), Catalog::default())
    }

    /// Create a new simulation over the given airfield and catalog
    pub fn with_reference_data(
        config: SimConfig,
        airfield: Airfield,
        catalog: Catalog,
    ) -> Result<Self, SimError> {
        catalog.validate()?;
        if config.workers == 0 {
            return Err(SimError::InvalidArgument(
                "At least one worker is required.".to_string(),
            ));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let logger = match &config.log_dir {
            Some(dir) => Some(Logger::new(dir, "simulation")?.with_console(config.log_console)),
            None => None,
        };

        let state = FleetState {
            airfield: Arc::new(airfield),
            catalog: Arc::new(catalog),
            snapshot: Arc::new(RwLock::new(Snapshot::empty())),
            rng: Arc::new(Mutex::new(rng)),
            thread_pool: Arc::new(ThreadPool::new(config.workers)),
            tick_lock: Arc::new(Mutex::new(())),
            workers: config.workers,
            logger,
        };

        Ok(Simulation {
            timer: Timer::new(config.tick_interval),
            config,
            state,
        })
    }

    /// Generates a fleet of `count` flights and starts ticking it
    pub fn start(&self, count: usize) -> Result<(), SimError> {
        if self.timer.is_running() {
            return Err(SimError::AlreadyRunning);
        }
        if count == 0 {
            return Err(SimError::InvalidArgument(
                "The fleet needs at least one flight.".to_string(),
            ));
        }

        let now = Utc::now();
        let fleet = {
            let mut rng = self
                .state
                .rng
                .lock()
                .map_err(|_| SimError::Other("Failed to lock random generator.".to_string()))?;
            FleetGenerator::new(&self.state.airfield, &self.state.catalog).generate(
                count,
                now,
                &mut *rng,
            )
        };

        self.state.publish(Snapshot {
            tick: 0,
            time: now,
            flights: Arc::new(fleet),
        })?;

        let summary = self
            .status_counts()?
            .iter()
            .map(|(status, count)| format!("{} {}", count, status.as_str()))
            .collect::<Vec<String>>()
            .join(", ");
        self.state.info(
            &format!("Simulation started with {} flights: {}", count, summary),
            Color::Green,
        );

        let state = self.state.clone();
        self.timer.start(move |now, _| {
            if let Err(e) = state.tick(now) {
                state.error(&format!("Tick failed: {}", e));
            }
        })
    }

    /// Generates the configured number of flights and starts ticking them
    pub fn start_default(&self) -> Result<(), SimError> {
        self.start(self.config.fleet_size)
    }

    /// Stop ticking and wait for pending work. The last snapshot is kept.
    pub fn stop(&self) -> Result<(), SimError> {
        self.timer.stop()?;
        self.state.thread_pool.join();

        let tick = self.state.snapshot()?.tick;
        self.state
            .info(&format!("Simulation stopped after {} ticks", tick), Color::Yellow);
        Ok(())
    }

    pub fn pause(&self) {
        self.timer.pause();
        self.state.info("Simulation paused", Color::Yellow);
    }

    pub fn resume(&self) {
        self.timer.resume();
        self.state.info("Simulation resumed", Color::Green);
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.timer.is_paused()
    }

    /// Runs a single tick right away. Not allowed while the timer is actively ticking.
    pub fn step(&self) -> Result<Snapshot, SimError> {
        if self.timer.is_running() && !self.timer.is_paused() {
            return Err(SimError::AlreadyRunning);
        }
        self.state.tick(Utc::now())
    }

    /// The most recently published fleet.
    pub fn snapshot(&self) -> Result<Snapshot, SimError> {
        self.state.snapshot()
    }

    /// Number of flights in each status, in declaration order.
    pub fn status_counts(&self) -> Result<Vec<(FlightStatus, usize)>, SimError> {
        let snapshot = self.state.snapshot()?;

        Ok(FlightStatus::ALL
            .iter()
            .map(|status| {
                let count = snapshot
                    .flights
                    .iter()
                    .filter(|flight| flight.status == *status)
                    .count();
                (*status, count)
            })
            .collect())
    }

    /// Changes the time between ticks, in milliseconds.
    pub fn set_tick_interval(&self, millis: u64) -> Result<(), SimError> {
        self.timer.set_interval(millis)?;
        self.state
            .info(&format!("Tick interval set to {} ms", millis), Color::Blue);
        Ok(())
    }

    /// The interval currently in use, which may differ from the configured one.
    pub fn tick_interval(&self) -> Result<Duration, SimError> {
        self.timer.current_interval()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn airfield(&self) -> &Airfield {
        &self.state.airfield
    }

    pub fn catalog(&self) -> &Catalog {
        &self.state.catalog
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        if self.timer.is_running() {
            if let Err(e) = self.stop() {
                eprintln!("Failed to stop simulation: {}", e);
            }
        }
    }
}
