use chrono::{DateTime, Utc};
use rand::Rng;

use super::airfield::Airfield;
use super::catalog::Catalog;
use super::fleet_generator::{estimated_arrival, random_gate};
use super::flight::{parked_heading, Flight};
use super::flight_status::FlightStatus;
use super::route_generator::RouteGenerator;

/// Progress at which a phase counts as complete. Kept short of 1.0 so the
/// transition happens slightly before the nominal end of the route.
pub const COMPLETION_THRESHOLD: f64 = 0.95;

/// Why a completed phase could not move on to the next status.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    MissingGate,
    UnknownDestination(String),
}

/// Something worth reporting that happened to a flight during a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    Transition {
        flight_id: usize,
        flight_number: String,
        from: FlightStatus,
        to: FlightStatus,
    },
    Skipped {
        flight_id: usize,
        flight_number: String,
        status: FlightStatus,
        reason: SkipReason,
    },
}

/// The fleet after a tick plus the events it produced.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub fleet: Vec<Flight>,
    pub events: Vec<TickEvent>,
}

/// Advances flights along their routes and moves them between phases.
pub struct TickEngine<'a> {
    airfield: &'a Airfield,
    catalog: &'a Catalog,
}

impl<'a> TickEngine<'a> {
    pub fn new(airfield: &'a Airfield, catalog: &'a Catalog) -> Self {
        TickEngine { airfield, catalog }
    }

    /// Produces the next state of every flight. The input is left untouched.
    pub fn tick<R: Rng>(&self, fleet: &[Flight], now: DateTime<Utc>, rng: &mut R) -> TickReport {
        let mut report = TickReport {
            fleet: Vec::with_capacity(fleet.len()),
            events: Vec::new(),
        };

        for flight in fleet {
            let (next, event) = self.advance_flight(flight, now, rng);
            report.fleet.push(next);
            report.events.extend(event);
        }

        report
    }

    /// Next state of a single flight.
    ///
    /// Stationary flights come back unchanged. Moving flights advance their
    /// route and, once past [`COMPLETION_THRESHOLD`], go through exactly one
    /// status transition.
    pub fn advance_flight<R: Rng>(
        &self,
        flight: &Flight,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> (Flight, Option<TickEvent>) {
        let Some(increment) = flight.status.progress_increment() else {
            return (flight.clone(), None);
        };

        let mut next = flight.clone();
        let progress = match next.route.as_mut() {
            Some(route) => route.advance(increment),
            None => return (next, None),
        };

        if progress >= COMPLETION_THRESHOLD {
            let event = self.transition(&mut next, now, rng);
            (next, Some(event))
        } else {
            next.refresh_from_route();
            (next, None)
        }
    }

    fn transition<R: Rng>(
        &self,
        flight: &mut Flight,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> TickEvent {
        let routes = RouteGenerator::new(self.airfield);
        let from = flight.status;

        match flight.status {
            FlightStatus::Approaching => {
                let Some(gate) = flight.gate.clone() else {
                    flight.refresh_from_route();
                    return skipped(flight, SkipReason::MissingGate);
                };

                flight.status = FlightStatus::TaxiingIn;
                flight.route = Some(routes.taxi_in(&gate, rng));
                flight.eta = estimated_arrival(FlightStatus::TaxiingIn, now, rng);
                flight.reset_performance(rng);
                flight.refresh_from_route();
            }
            FlightStatus::TaxiingIn => {
                if let Some(route) = flight.route.take() {
                    flight.position = route.last_waypoint();
                }

                flight.status = FlightStatus::Parked;
                flight.heading = parked_heading(rng);
                flight.eta = None;
                flight.reset_performance(rng);
            }
            FlightStatus::TaxiingOut => {
                let Some(destination) = self.catalog.find_airport(&flight.destination) else {
                    flight.refresh_from_route();
                    let reason = SkipReason::UnknownDestination(flight.destination.clone());
                    return skipped(flight, reason);
                };

                flight.status = FlightStatus::Departed;
                flight.route = Some(routes.departure(destination, rng));
                flight.gate = None;
                flight.etd = None;
                flight.reset_performance(rng);
                flight.refresh_from_route();
            }
            FlightStatus::Departed => {
                let origin = self
                    .catalog
                    .random_airport_except(&flight.origin, rng)
                    .clone();
                let (airline, flight_number) = self.catalog.random_flight_number(rng);

                flight.status = FlightStatus::Approaching;
                flight.flight_number = flight_number;
                flight.airline = airline;
                flight.aircraft_type = self.catalog.random_aircraft_type(rng).to_string();
                flight.origin = origin.iata_code.clone();
                flight.destination = self.airfield.hub.iata_code.clone();
                flight.gate = Some(random_gate(rng));
                flight.route = Some(routes.approach(&origin, rng));
                flight.eta = estimated_arrival(FlightStatus::Approaching, now, rng);
                flight.etd = None;
                flight.reset_performance(rng);
                flight.refresh_from_route();
            }
            // Only moving statuses reach a phase boundary.
            FlightStatus::Parked
            | FlightStatus::Boarding
            | FlightStatus::Delayed
            | FlightStatus::Cancelled => {}
        }

        TickEvent::Transition {
            flight_id: flight.id,
            flight_number: flight.flight_number.clone(),
            from,
            to: flight.status,
        }
    }
}

fn skipped(flight: &Flight, reason: SkipReason) -> TickEvent {
    TickEvent::Skipped {
        flight_id: flight.id,
        flight_number: flight.flight_number.clone(),
        status: flight.status,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::coordinate::Coordinate;
    use crate::types::fleet_generator::FleetGenerator;
    use crate::types::route::Route;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn approach_waypoints() -> Vec<Coordinate> {
        vec![
            Coordinate::new(37.85, -122.25),
            Coordinate::new(37.72, -122.27),
            Coordinate::new(37.5832, -122.2846),
            Coordinate::new(37.6136, -122.3570),
            Coordinate::new(37.6212, -122.3751),
        ]
    }

    fn flight(status: FlightStatus, route: Option<Route>, gate: Option<&str>) -> Flight {
        Flight {
            id: 7,
            flight_number: "UA123".to_string(),
            airline: "United Airlines".to_string(),
            aircraft_type: "B789".to_string(),
            status,
            position: Coordinate::new(37.62, -122.38),
            heading: 123.0,
            speed: 150.0,
            altitude: 3000,
            gate: gate.map(|g| g.to_string()),
            eta: None,
            etd: None,
            origin: "SEA".to_string(),
            destination: "SFO".to_string(),
            route,
        }
    }

    fn route_at(progress: f64) -> Route {
        Route::new(
            "SEA",
            Coordinate::new(47.4502, -122.3088),
            "SFO",
            Coordinate::new(37.6213, -122.3790),
            approach_waypoints(),
            progress,
        )
    }

    #[test]
    fn approach_crosses_threshold_on_second_tick() {
        let airfield = Airfield::san_francisco();
        let catalog = Catalog::default();
        let engine = TickEngine::new(&airfield, &catalog);
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc::now();

        let start = flight(FlightStatus::Approaching, Some(route_at(0.94)), Some("B12"));

        let (first, event) = engine.advance_flight(&start, now, &mut rng);
        assert!(event.is_none());
        assert_eq!(first.status, FlightStatus::Approaching);
        let progress = first.route.as_ref().unwrap().progress;
        assert!((progress - 0.948).abs() < 1e-9);

        let (second, event) = engine.advance_flight(&first, now, &mut rng);
        assert_eq!(second.status, FlightStatus::TaxiingIn);
        assert!(matches!(
            event,
            Some(TickEvent::Transition {
                from: FlightStatus::Approaching,
                to: FlightStatus::TaxiingIn,
                ..
            })
        ));

        let route = second.route.as_ref().expect("taxi-in route expected");
        assert!(route.waypoints.len() >= 4);
        assert_eq!(route.waypoints[0], airfield.runway_exit);
        assert!((10.0..=25.0).contains(&second.speed));
        assert_eq!(second.altitude, 0);
        assert_eq!(second.position, route.current_position());
    }

    #[test]
    fn approach_without_gate_stays_approaching() {
        let airfield = Airfield::san_francisco();
        let catalog = Catalog::default();
        let engine = TickEngine::new(&airfield, &catalog);
        let mut rng = StdRng::seed_from_u64(2);

        let start = flight(FlightStatus::Approaching, Some(route_at(0.949)), None);
        let (next, event) = engine.advance_flight(&start, Utc::now(), &mut rng);

        assert_eq!(next.status, FlightStatus::Approaching);
        assert_eq!(next.route.as_ref().unwrap().waypoints, approach_waypoints());
        assert!(matches!(
            event,
            Some(TickEvent::Skipped {
                reason: SkipReason::MissingGate,
                ..
            })
        ));
    }

    #[test]
    fn taxi_in_completion_parks_at_last_waypoint() {
        let airfield = Airfield::san_francisco();
        let catalog = Catalog::default();
        let engine = TickEngine::new(&airfield, &catalog);
        let mut rng = StdRng::seed_from_u64(3);

        let taxi = RouteGenerator::new(&airfield).taxi_in("A4", &mut rng);
        let gate_position = *taxi.waypoints.last().unwrap();
        let mut route = taxi;
        route.progress = 0.94;

        let start = flight(FlightStatus::TaxiingIn, Some(route), Some("A4"));
        let (next, _) = engine.advance_flight(&start, Utc::now(), &mut rng);

        assert_eq!(next.status, FlightStatus::Parked);
        assert!(next.route.is_none());
        assert_eq!(next.position, gate_position);
        assert_eq!(next.speed, 0.0);
        assert_eq!(next.gate.as_deref(), Some("A4"));
        assert!((0.0..360.0).contains(&next.heading));
    }

    #[test]
    fn taxi_out_completion_departs_toward_destination() {
        let airfield = Airfield::san_francisco();
        let catalog = Catalog::default();
        let engine = TickEngine::new(&airfield, &catalog);
        let mut rng = StdRng::seed_from_u64(4);

        let mut route = RouteGenerator::new(&airfield).taxi_out("G2", &mut rng);
        route.progress = 0.945;
        let mut start = flight(FlightStatus::TaxiingOut, Some(route), Some("G2"));
        start.origin = "SFO".to_string();
        start.destination = "JFK".to_string();

        let (next, _) = engine.advance_flight(&start, Utc::now(), &mut rng);

        assert_eq!(next.status, FlightStatus::Departed);
        assert!(next.gate.is_none());
        let route = next.route.as_ref().expect("departure route expected");
        assert_eq!(route.destination_code, "JFK");
        assert_eq!(route.waypoints.last(), Some(&airfield.departure_exits.east));
        assert!((160.0..=200.0).contains(&next.speed));
        assert!((1000..=3000).contains(&next.altitude));
    }

    #[test]
    fn taxi_out_with_unknown_destination_is_skipped() {
        let airfield = Airfield::san_francisco();
        let catalog = Catalog::default();
        let engine = TickEngine::new(&airfield, &catalog);
        let mut rng = StdRng::seed_from_u64(5);

        let mut route = RouteGenerator::new(&airfield).taxi_out("C1", &mut rng);
        route.progress = 0.96;
        let mut start = flight(FlightStatus::TaxiingOut, Some(route), Some("C1"));
        start.destination = "ZZZ".to_string();

        let (next, event) = engine.advance_flight(&start, Utc::now(), &mut rng);

        assert_eq!(next.status, FlightStatus::TaxiingOut);
        assert_eq!(next.gate.as_deref(), Some("C1"));
        assert_eq!(
            event,
            Some(TickEvent::Skipped {
                flight_id: 7,
                flight_number: "UA123".to_string(),
                status: FlightStatus::TaxiingOut,
                reason: SkipReason::UnknownDestination("ZZZ".to_string()),
            })
        );
    }

    #[test]
    fn departed_flight_is_recycled_as_new_arrival() {
        let airfield = Airfield::san_francisco();
        let catalog = Catalog::default();
        let engine = TickEngine::new(&airfield, &catalog);
        let mut rng = StdRng::seed_from_u64(6);

        let destination = catalog.find_airport("LAX").unwrap();
        let mut route = RouteGenerator::new(&airfield).departure(destination, &mut rng);
        route.progress = 0.945;
        let mut start = flight(FlightStatus::Departed, Some(route), None);
        start.origin = "SFO".to_string();
        start.destination = "LAX".to_string();

        let (next, _) = engine.advance_flight(&start, Utc::now(), &mut rng);

        assert_eq!(next.status, FlightStatus::Approaching);
        assert_eq!(next.id, start.id);
        assert_ne!(next.origin, start.origin);
        assert!(catalog.find_airport(&next.origin).is_some());
        assert_eq!(next.destination, "SFO");
        assert!(next.gate.is_some());
        assert!(next.eta.is_some());
        let route = next.route.as_ref().expect("approach route expected");
        assert_eq!(route.origin_code, next.origin);
        assert!(route.progress < 0.7);
        assert!((140.0..=180.0).contains(&next.speed));
        assert!((2000..=4000).contains(&next.altitude));
    }

    #[test]
    fn stationary_flights_are_untouched() {
        let airfield = Airfield::san_francisco();
        let catalog = Catalog::default();
        let engine = TickEngine::new(&airfield, &catalog);
        let mut rng = StdRng::seed_from_u64(7);

        let parked = flight(FlightStatus::Parked, None, Some("B2"));
        let mut fleet = vec![parked.clone()];
        for _ in 0..50 {
            fleet = engine.tick(&fleet, Utc::now(), &mut rng).fleet;
        }

        assert_eq!(fleet[0], parked);
    }

    #[test]
    fn stationary_status_with_stale_route_does_not_move() {
        let airfield = Airfield::san_francisco();
        let catalog = Catalog::default();
        let engine = TickEngine::new(&airfield, &catalog);
        let mut rng = StdRng::seed_from_u64(8);

        let boarding = flight(FlightStatus::Boarding, Some(route_at(0.2)), Some("G9"));
        let (next, event) = engine.advance_flight(&boarding, Utc::now(), &mut rng);

        assert_eq!(next, boarding);
        assert!(event.is_none());
    }

    #[test]
    fn progress_never_decreases_within_a_phase() {
        let airfield = Airfield::san_francisco();
        let catalog = Catalog::default();
        let engine = TickEngine::new(&airfield, &catalog);
        let mut rng = StdRng::seed_from_u64(9);

        let mut fleet = FleetGenerator::new(&airfield, &catalog).generate(200, Utc::now(), &mut rng);

        for _ in 0..300 {
            let report = engine.tick(&fleet, Utc::now(), &mut rng);
            assert_eq!(report.fleet.len(), fleet.len());

            for (before, after) in fleet.iter().zip(report.fleet.iter()) {
                assert_eq!(before.id, after.id);
                if before.status != after.status {
                    continue;
                }
                if let (Some(old), Some(new)) = (&before.route, &after.route) {
                    assert!(new.progress >= old.progress);
                }
            }

            for flight in &report.fleet {
                assert_eq!(flight.route.is_some(), flight.status.is_in_motion());
                if let Some(route) = &flight.route {
                    assert!(route.waypoints.len() >= 4);
                }
            }

            fleet = report.fleet;
        }
    }

    #[test]
    fn one_transition_per_flight_per_tick() {
        let airfield = Airfield::san_francisco();
        let catalog = Catalog::default();
        let engine = TickEngine::new(&airfield, &catalog);
        let mut rng = StdRng::seed_from_u64(10);

        let fleet = FleetGenerator::new(&airfield, &catalog).generate(300, Utc::now(), &mut rng);
        let report = engine.tick(&fleet, Utc::now(), &mut rng);

        let mut ids: Vec<usize> = report
            .events
            .iter()
            .map(|event| match event {
                TickEvent::Transition { flight_id, .. } => *flight_id,
                TickEvent::Skipped { flight_id, .. } => *flight_id,
            })
            .collect();
        let total = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
