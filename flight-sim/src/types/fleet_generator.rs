use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::airfield::{Airfield, Terminal};
use super::catalog::Catalog;
use super::flight::{parked_heading, Flight};
use super::flight_status::FlightStatus;
use super::route_generator::RouteGenerator;

/// Share of the initial fleet, in percent, that starts in each status.
const STATUS_DISTRIBUTION: [(FlightStatus, usize); 7] = [
    (FlightStatus::Approaching, 15),
    (FlightStatus::TaxiingIn, 10),
    (FlightStatus::Parked, 40),
    (FlightStatus::Boarding, 15),
    (FlightStatus::TaxiingOut, 10),
    (FlightStatus::Delayed, 8),
    (FlightStatus::Cancelled, 2),
];

const MAX_GATE_NUMBER: u32 = 20;

/// Builds the initial fleet and the flights that replace recycled ones.
pub struct FleetGenerator<'a> {
    airfield: &'a Airfield,
    catalog: &'a Catalog,
}

impl<'a> FleetGenerator<'a> {
    pub fn new(airfield: &'a Airfield, catalog: &'a Catalog) -> Self {
        FleetGenerator { airfield, catalog }
    }

    /// Generates `count` flights with statuses drawn from the fixed distribution.
    pub fn generate<R: Rng>(&self, count: usize, now: DateTime<Utc>, rng: &mut R) -> Vec<Flight> {
        status_pool(count, rng)
            .into_iter()
            .enumerate()
            .map(|(id, status)| self.generate_flight(id, status, now, rng))
            .collect()
    }

    /// Creates one flight in the given status with a consistent gate, route and position.
    pub fn generate_flight<R: Rng>(
        &self,
        id: usize,
        status: FlightStatus,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Flight {
        let routes = RouteGenerator::new(self.airfield);
        let hub = &self.airfield.hub.iata_code;

        let (airline, flight_number) = self.catalog.random_flight_number(rng);
        let aircraft_type = self.catalog.random_aircraft_type(rng).to_string();
        let origin = self.catalog.random_airport(rng).clone();
        let destination = self
            .catalog
            .random_airport_except(&origin.iata_code, rng)
            .clone();

        let gate = match status {
            FlightStatus::Departed => None,
            FlightStatus::Approaching
            | FlightStatus::TaxiingIn
            | FlightStatus::Parked
            | FlightStatus::Boarding
            | FlightStatus::TaxiingOut
            | FlightStatus::Delayed
            | FlightStatus::Cancelled => Some(random_gate(rng)),
        };
        let gate_name = gate.clone().unwrap_or_default();

        let route = match status {
            FlightStatus::Approaching => Some(routes.approach(&origin, rng)),
            FlightStatus::TaxiingIn => Some(routes.taxi_in(&gate_name, rng)),
            FlightStatus::TaxiingOut => Some(routes.taxi_out(&gate_name, rng)),
            FlightStatus::Departed => Some(routes.departure(&destination, rng)),
            FlightStatus::Parked
            | FlightStatus::Boarding
            | FlightStatus::Delayed
            | FlightStatus::Cancelled => None,
        };

        let (position, heading) = match &route {
            Some(route) => (route.current_position(), route.current_heading()),
            None => (routes.gate_position(&gate_name, rng), parked_heading(rng)),
        };

        let (origin_code, destination_code) = if status.is_arrival_side() {
            (origin.iata_code.clone(), hub.clone())
        } else {
            (hub.clone(), destination.iata_code.clone())
        };

        let mut flight = Flight {
            id,
            flight_number,
            airline,
            aircraft_type,
            status,
            position,
            heading,
            speed: 0.0,
            altitude: 0,
            gate,
            eta: estimated_arrival(status, now, rng),
            etd: estimated_departure(status, now, rng),
            origin: origin_code,
            destination: destination_code,
            route,
        };
        flight.reset_performance(rng);
        flight
    }
}

/// Statuses for a fleet of `count` flights, shuffled.
///
/// Each bucket is rounded down, so whatever the rounding leaves out is filled
/// with parked flights and the pool always holds exactly `count` entries.
pub fn status_pool<R: Rng>(count: usize, rng: &mut R) -> Vec<FlightStatus> {
    let mut pool: Vec<FlightStatus> = STATUS_DISTRIBUTION
        .iter()
        .flat_map(|(status, percent)| std::iter::repeat(*status).take(count * percent / 100))
        .collect();

    pool.shuffle(rng);
    pool.resize(count, FlightStatus::Parked);
    pool
}

/// Gate identifier such as `B14`.
pub fn random_gate<R: Rng>(rng: &mut R) -> String {
    let terminal = Terminal::ASSIGNABLE[rng.gen_range(0..Terminal::ASSIGNABLE.len())];
    let letter = terminal.letter().unwrap_or('A');
    format!("{}{}", letter, rng.gen_range(1..=MAX_GATE_NUMBER))
}

/// ETA offset for the statuses that carry one.
pub fn estimated_arrival<R: Rng>(
    status: FlightStatus,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Option<DateTime<Utc>> {
    let minutes = match status {
        FlightStatus::Approaching => rng.gen_range(5..=30),
        FlightStatus::TaxiingIn => rng.gen_range(1..=10),
        FlightStatus::Delayed => rng.gen_range(30..=120),
        FlightStatus::Parked
        | FlightStatus::Boarding
        | FlightStatus::TaxiingOut
        | FlightStatus::Departed
        | FlightStatus::Cancelled => return None,
    };
    Some(now + Duration::minutes(minutes))
}

/// ETD offset for the statuses that carry one.
pub fn estimated_departure<R: Rng>(
    status: FlightStatus,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Option<DateTime<Utc>> {
    let minutes = match status {
        FlightStatus::Boarding => rng.gen_range(10..=45),
        FlightStatus::TaxiingOut => rng.gen_range(1..=15),
        FlightStatus::Delayed => rng.gen_range(60..=180),
        FlightStatus::Approaching
        | FlightStatus::TaxiingIn
        | FlightStatus::Parked
        | FlightStatus::Departed
        | FlightStatus::Cancelled => return None,
    };
    Some(now + Duration::minutes(minutes))
}
