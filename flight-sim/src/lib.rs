//! Procedural simulation of aircraft cycling through the phases of an airport:
//! approach, taxi to gate, gate dwell, taxi out and climb-out.

pub mod types;

pub use types::config::SimConfig;
pub use types::flight::Flight;
pub use types::flight_status::FlightStatus;
pub use types::sim_error::SimError;
pub use types::simulation::{Simulation, Snapshot};
