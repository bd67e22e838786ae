use super::sim_error::SimError;

/// Represents the phases a simulated flight goes through.

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum FlightStatus {
    Approaching,
    TaxiingIn,
    Parked,
    Boarding,
    TaxiingOut,
    Departed,
    Delayed,
    Cancelled,
}

impl FlightStatus {
    pub const ALL: [FlightStatus; 8] = [
        FlightStatus::Approaching,
        FlightStatus::TaxiingIn,
        FlightStatus::Parked,
        FlightStatus::Boarding,
        FlightStatus::TaxiingOut,
        FlightStatus::Departed,
        FlightStatus::Delayed,
        FlightStatus::Cancelled,
    ];

    /// Converts the `FlightStatus` variant to its corresponding string representation.
    pub fn as_str(&self) -> &str {
        match self {
            FlightStatus::Approaching => "approaching",
            FlightStatus::TaxiingIn => "taxiing in",
            FlightStatus::Parked => "parked",
            FlightStatus::Boarding => "boarding",
            FlightStatus::TaxiingOut => "taxiing out",
            FlightStatus::Departed => "departed",
            FlightStatus::Delayed => "delayed",
            FlightStatus::Cancelled => "cancelled",
        }
    }

    /// Creates a `FlightStatus` variant from a string slice.
    pub fn from_str(status: &str) -> Result<FlightStatus, SimError> {
        match status.to_lowercase().as_str() {
            "approaching" => Ok(FlightStatus::Approaching),
            "taxiing in" => Ok(FlightStatus::TaxiingIn),
            "parked" => Ok(FlightStatus::Parked),
            "boarding" => Ok(FlightStatus::Boarding),
            "taxiing out" => Ok(FlightStatus::TaxiingOut),
            "departed" => Ok(FlightStatus::Departed),
            "delayed" => Ok(FlightStatus::Delayed),
            "cancelled" => Ok(FlightStatus::Cancelled),
            _ => Err(SimError::InvalidStatus(status.to_string())),
        }
    }

    /// Progress added to the route on every tick, or `None` for statuses that do not move.
    pub fn progress_increment(&self) -> Option<f64> {
        match self {
            FlightStatus::Approaching => Some(0.008),
            FlightStatus::TaxiingIn | FlightStatus::TaxiingOut => Some(0.015),
            FlightStatus::Departed => Some(0.012),
            FlightStatus::Parked
            | FlightStatus::Boarding
            | FlightStatus::Delayed
            | FlightStatus::Cancelled => None,
        }
    }

    /// Whether flights in this status follow a route.
    pub fn is_in_motion(&self) -> bool {
        self.progress_increment().is_some()
    }

    /// Arrival side statuses show the real origin and the hub as destination.
    pub fn is_arrival_side(&self) -> bool {
        matches!(
            self,
            FlightStatus::Approaching | FlightStatus::TaxiingIn | FlightStatus::Parked
        )
    }
}
