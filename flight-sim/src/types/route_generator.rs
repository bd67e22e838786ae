use rand::Rng;

use super::airfield::{Airfield, Sector};
use super::airport::Airport;
use super::coordinate::{lerp, Coordinate};
use super::route::Route;

/// Upper bound (exclusive) of the progress an approach starts with.
const APPROACH_START_MAX: f64 = 0.7;
const TAXI_IN_START_MAX: f64 = 0.8;
const TAXI_OUT_START_MAX: f64 = 0.7;
const DEPARTURE_START_MAX: f64 = 0.5;

/// Maximum offset, in degrees, of the approach midpoint.
const APPROACH_MIDPOINT_JITTER: f64 = 0.02;

/// Maximum offset, in degrees, of a gate from its terminal cluster center.
pub const GATE_JITTER: f64 = 0.001;

/// Builds phase specific routes anchored to the hub's reference geometry.
///
/// Every route has at least four waypoints ordered from where the phase starts to
/// where it ends, and a random initial progress so a freshly generated fleet is
/// spread along its paths.
pub struct RouteGenerator<'a> {
    airfield: &'a Airfield,
}

impl<'a> RouteGenerator<'a> {
    pub fn new(airfield: &'a Airfield) -> Self {
        RouteGenerator { airfield }
    }

    /// Random point close to the gate cluster of the gate's terminal.
    pub fn gate_position<R: Rng>(&self, gate: &str, rng: &mut R) -> Coordinate {
        let cluster = self.airfield.area_for_gate(gate).gate_cluster;
        cluster.offset(
            rng.gen_range(-GATE_JITTER..=GATE_JITTER),
            rng.gen_range(-GATE_JITTER..=GATE_JITTER),
        )
    }

    /// Entry point → perturbed midpoint → final approach fix → threshold → touchdown.
    pub fn approach<R: Rng>(&self, origin: &Airport, rng: &mut R) -> Route {
        let airfield = self.airfield;
        let runway = &airfield.arrival_runway;
        let sector = Sector::classify(airfield.hub.position, origin.position);
        let entry = airfield.approach_entries.get(sector);

        let midpoint = lerp(entry, airfield.final_approach, 0.5).offset(
            rng.gen_range(-APPROACH_MIDPOINT_JITTER..=APPROACH_MIDPOINT_JITTER),
            rng.gen_range(-APPROACH_MIDPOINT_JITTER..=APPROACH_MIDPOINT_JITTER),
        );

        let waypoints = vec![
            entry,
            midpoint,
            airfield.final_approach,
            runway.threshold,
            runway.midpoint(),
        ];

        Route::new(
            &origin.iata_code,
            origin.position,
            &airfield.hub.iata_code,
            airfield.hub.position,
            waypoints,
            rng.gen_range(0.0..APPROACH_START_MAX),
        )
    }

    /// Runway exit → taxiway junction → terminal junction → gate.
    pub fn taxi_in<R: Rng>(&self, gate: &str, rng: &mut R) -> Route {
        let airfield = self.airfield;
        let area = airfield.area_for_gate(gate);
        let gate_position = self.gate_position(gate, rng);

        let waypoints = vec![
            airfield.runway_exit,
            airfield.taxiway_junction,
            area.junction,
            gate_position,
        ];

        Route::new(
            &airfield.arrival_runway.designator,
            airfield.runway_exit,
            gate,
            gate_position,
            waypoints,
            rng.gen_range(0.0..TAXI_IN_START_MAX),
        )
    }

    /// Gate → terminal junction → main taxiway → hold short → threshold.
    pub fn taxi_out<R: Rng>(&self, gate: &str, rng: &mut R) -> Route {
        let airfield = self.airfield;
        let runway = &airfield.departure_runway;
        let area = airfield.area_for_gate(gate);
        let gate_position = self.gate_position(gate, rng);

        let waypoints = vec![
            gate_position,
            area.junction,
            airfield.main_taxiway,
            airfield.hold_short,
            runway.threshold,
        ];

        Route::new(
            gate,
            gate_position,
            &runway.designator,
            runway.threshold,
            waypoints,
            rng.gen_range(0.0..TAXI_OUT_START_MAX),
        )
    }

    /// Threshold → liftoff → initial climb → departure fix toward the destination.
    pub fn departure<R: Rng>(&self, destination: &Airport, rng: &mut R) -> Route {
        let airfield = self.airfield;
        let runway = &airfield.departure_runway;
        let sector = Sector::classify(airfield.hub.position, destination.position);

        let waypoints = vec![
            runway.threshold,
            runway.liftoff_point(),
            airfield.initial_climb,
            airfield.departure_exits.get(sector),
        ];

        Route::new(
            &airfield.hub.iata_code,
            airfield.hub.position,
            &destination.iata_code,
            destination.position,
            waypoints,
            rng.gen_range(0.0..DEPARTURE_START_MAX),
        )
    }
}
