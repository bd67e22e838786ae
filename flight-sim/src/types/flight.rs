use chrono::{DateTime, Utc};
use rand::Rng;

use super::coordinate::Coordinate;
use super::flight_status::FlightStatus;
use super::route::Route;

/// Represents a simulated aircraft, including its status, position, gate
/// assignment and the route it is following.
///
/// `route` is present only while the status is one that moves (approaching,
/// taxiing in or out, departed); `None` means the aircraft is stationary.
/// `gate` is `None` when the flight holds no ground assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    pub id: usize,
    pub flight_number: String,
    pub airline: String,
    pub aircraft_type: String,
    pub status: FlightStatus,
    pub position: Coordinate,
    pub heading: f64,
    pub speed: f64,
    pub altitude: i32,
    pub gate: Option<String>,
    pub eta: Option<DateTime<Utc>>,
    pub etd: Option<DateTime<Utc>>,
    pub origin: String,
    pub destination: String,
    pub route: Option<Route>,
}

impl Flight {
    /// Whether the flight is stationary, i.e. has no route to follow.
    pub fn is_stationary(&self) -> bool {
        self.route.is_none()
    }

    /// Copies position and heading from the route's interpolation.
    pub fn refresh_from_route(&mut self) {
        if let Some(route) = &self.route {
            self.position = route.current_position();
            self.heading = route.current_heading();
        }
    }

    /// Draws speed and altitude matching the current status.
    pub fn reset_performance<R: Rng>(&mut self, rng: &mut R) {
        self.speed = ground_speed(self.status, rng);
        self.altitude = altitude(self.status, rng);
    }

    /// Path already covered, for drawing the flown part of the route.
    pub fn traveled_path(&self) -> Vec<Coordinate> {
        match &self.route {
            Some(route) => route.traveled_path(),
            None => vec![self.position],
        }
    }

    /// Path still ahead, for drawing the part of the route left to fly.
    pub fn remaining_path(&self) -> Vec<Coordinate> {
        match &self.route {
            Some(route) => route.remaining_path(),
            None => vec![self.position],
        }
    }
}

/// Random ground speed in knots for the given status.
pub fn ground_speed<R: Rng>(status: FlightStatus, rng: &mut R) -> f64 {
    match status {
        FlightStatus::Approaching => rng.gen_range(140.0..=180.0),
        FlightStatus::TaxiingIn | FlightStatus::TaxiingOut => rng.gen_range(10.0..=25.0),
        FlightStatus::Departed => rng.gen_range(160.0..=200.0),
        FlightStatus::Parked
        | FlightStatus::Boarding
        | FlightStatus::Delayed
        | FlightStatus::Cancelled => 0.0,
    }
}

/// Random altitude in feet for the given status.
pub fn altitude<R: Rng>(status: FlightStatus, rng: &mut R) -> i32 {
    match status {
        FlightStatus::Approaching => rng.gen_range(2000..=4000),
        FlightStatus::Departed => rng.gen_range(1000..=3000),
        FlightStatus::TaxiingIn
        | FlightStatus::TaxiingOut
        | FlightStatus::Parked
        | FlightStatus::Boarding
        | FlightStatus::Delayed
        | FlightStatus::Cancelled => 0,
    }
}

/// Random heading for an aircraft standing at a gate.
pub fn parked_heading<R: Rng>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..360.0)
}
