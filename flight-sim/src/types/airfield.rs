use super::airport::Airport;
use super::coordinate::{lerp, Coordinate};

/// Fraction of the runway length covered before the wheels leave the ground.
const LIFTOFF_FRACTION: f64 = 0.65;

/// A runway described by the threshold aircraft use and the opposite end.
#[derive(Clone, Debug, PartialEq)]
pub struct Runway {
    pub designator: String,
    pub threshold: Coordinate,
    pub end: Coordinate,
}

impl Runway {
    pub fn new(designator: &str, threshold: Coordinate, end: Coordinate) -> Self {
        Runway {
            designator: designator.to_string(),
            threshold,
            end,
        }
    }

    /// Touchdown point for arrivals.
    pub fn midpoint(&self) -> Coordinate {
        lerp(self.threshold, self.end, 0.5)
    }

    /// Point along the runway where departures rotate.
    pub fn liftoff_point(&self) -> Coordinate {
        lerp(self.threshold, self.end, LIFTOFF_FRACTION)
    }
}

/// Terminal a gate belongs to, taken from the first letter of the gate identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminal {
    A,
    B,
    C,
    G,
    /// Gate letter that does not match any known terminal.
    Unrecognized,
}

impl Terminal {
    /// Terminals gates are handed out from.
    pub const ASSIGNABLE: [Terminal; 4] = [Terminal::A, Terminal::B, Terminal::C, Terminal::G];

    pub fn from_gate(gate: &str) -> Terminal {
        match gate.chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('A') => Terminal::A,
            Some('B') => Terminal::B,
            Some('C') => Terminal::C,
            Some('G') => Terminal::G,
            _ => Terminal::Unrecognized,
        }
    }

    pub fn letter(&self) -> Option<char> {
        match self {
            Terminal::A => Some('A'),
            Terminal::B => Some('B'),
            Terminal::C => Some('C'),
            Terminal::G => Some('G'),
            Terminal::Unrecognized => None,
        }
    }
}

/// Taxiway junction serving a terminal plus the center of its gate cluster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerminalArea {
    pub junction: Coordinate,
    pub gate_cluster: Coordinate,
}

/// Coarse direction of another airport as seen from the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sector {
    North,
    East,
    South,
}

impl Sector {
    /// Northern when the other airport is mostly north of the hub, eastern when it
    /// lies east, southern otherwise. Longitude deltas are wrapped to [-180, 180).
    pub fn classify(hub: Coordinate, other: Coordinate) -> Sector {
        let delta_lat = other.latitude - hub.latitude;
        let delta_lon = (other.longitude - hub.longitude + 180.0).rem_euclid(360.0) - 180.0;

        if delta_lat > 0.0 && delta_lat >= delta_lon.abs() {
            Sector::North
        } else if delta_lon > 0.0 {
            Sector::East
        } else {
            Sector::South
        }
    }
}

/// One fixed point per sector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectorPoints {
    pub north: Coordinate,
    pub east: Coordinate,
    pub south: Coordinate,
}

impl SectorPoints {
    pub fn get(&self, sector: Sector) -> Coordinate {
        match sector {
            Sector::North => self.north,
            Sector::East => self.east,
            Sector::South => self.south,
        }
    }
}

/// Fixed reference geometry of the hub airport used to build every route.
#[derive(Clone, Debug, PartialEq)]
pub struct Airfield {
    pub hub: Airport,
    pub arrival_runway: Runway,
    pub departure_runway: Runway,
    pub approach_entries: SectorPoints,
    pub final_approach: Coordinate,
    pub runway_exit: Coordinate,
    pub taxiway_junction: Coordinate,
    pub main_taxiway: Coordinate,
    pub hold_short: Coordinate,
    pub initial_climb: Coordinate,
    pub departure_exits: SectorPoints,
    pub terminal_a: TerminalArea,
    pub terminal_b: TerminalArea,
    pub terminal_c: TerminalArea,
    pub terminal_g: TerminalArea,
    pub fallback_terminal: TerminalArea,
}

impl Airfield {
    /// San Francisco International with arrivals on 28R and departures on 28L.
    pub fn san_francisco() -> Self {
        Airfield {
            hub: Airport::new("SFO", "San Francisco International", 37.6213, -122.3790),
            arrival_runway: Runway::new(
                "28R",
                Coordinate::new(37.6136, -122.3570),
                Coordinate::new(37.6288, -122.3932),
            ),
            departure_runway: Runway::new(
                "28L",
                Coordinate::new(37.6117, -122.3582),
                Coordinate::new(37.6262, -122.3933),
            ),
            approach_entries: SectorPoints {
                north: Coordinate::new(37.8500, -122.2500),
                east: Coordinate::new(37.6000, -121.9500),
                south: Coordinate::new(37.3500, -122.1000),
            },
            final_approach: Coordinate::new(37.5832, -122.2846),
            runway_exit: Coordinate::new(37.6245, -122.3840),
            taxiway_junction: Coordinate::new(37.6205, -122.3830),
            main_taxiway: Coordinate::new(37.6150, -122.3760),
            hold_short: Coordinate::new(37.6105, -122.3595),
            initial_climb: Coordinate::new(37.6380, -122.4180),
            departure_exits: SectorPoints {
                north: Coordinate::new(37.9000, -122.5000),
                east: Coordinate::new(37.7500, -122.1000),
                south: Coordinate::new(37.3500, -122.4500),
            },
            terminal_a: TerminalArea {
                junction: Coordinate::new(37.6140, -122.3880),
                gate_cluster: Coordinate::new(37.6128, -122.3920),
            },
            terminal_b: TerminalArea {
                junction: Coordinate::new(37.6150, -122.3840),
                gate_cluster: Coordinate::new(37.6140, -122.3865),
            },
            terminal_c: TerminalArea {
                junction: Coordinate::new(37.6175, -122.3830),
                gate_cluster: Coordinate::new(37.6168, -122.3858),
            },
            terminal_g: TerminalArea {
                junction: Coordinate::new(37.6185, -122.3880),
                gate_cluster: Coordinate::new(37.6195, -122.3912),
            },
            fallback_terminal: TerminalArea {
                junction: Coordinate::new(37.6200, -122.3845),
                gate_cluster: Coordinate::new(37.6205, -122.3875),
            },
        }
    }

    pub fn terminal_area(&self, terminal: Terminal) -> &TerminalArea {
        match terminal {
            Terminal::A => &self.terminal_a,
            Terminal::B => &self.terminal_b,
            Terminal::C => &self.terminal_c,
            Terminal::G => &self.terminal_g,
            Terminal::Unrecognized => &self.fallback_terminal,
        }
    }

    /// Terminal area serving the given gate.
    pub fn area_for_gate(&self, gate: &str) -> &TerminalArea {
        self.terminal_area(Terminal::from_gate(gate))
    }
}

impl Default for Airfield {
    fn default() -> Self {
        Airfield::san_francisco()
    }
}
