const TICK_FREQUENCY_MILLIS: u64 = 1000;

/// Default number of simulated aircraft.
pub const DEFAULT_FLEET_SIZE: usize = 500;

/// Default size of the worker pool used to update the fleet on each tick.
pub const DEFAULT_WORKERS: usize = 4;

pub mod coordinate;

pub mod airport;

pub mod airfield;

pub mod catalog;

pub mod route;

pub mod route_generator;

pub mod flight_status;

pub mod flight;

pub mod fleet_generator;

pub mod tick_engine;

pub mod config;

pub mod sim_error;

pub mod timer;

pub mod simulation;
