use rand::seq::SliceRandom;
use rand::Rng;

use super::airport::Airport;
use super::sim_error::SimError;

/// An airline code paired with its display name.
#[derive(Clone, Debug, PartialEq)]
pub struct Airline {
    pub code: String,
    pub name: String,
}

impl Airline {
    pub fn new(code: &str, name: &str) -> Self {
        Airline {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

/// Static lookup data the fleet is drawn from: airports served from the hub,
/// operating airlines and aircraft types.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    pub airports: Vec<Airport>,
    pub airlines: Vec<Airline>,
    pub aircraft_types: Vec<String>,
}

impl Catalog {
    /// Builds a catalog, rejecting one the generators could not draw from.
    pub fn new(
        airports: Vec<Airport>,
        airlines: Vec<Airline>,
        aircraft_types: Vec<String>,
    ) -> Result<Self, SimError> {
        let catalog = Catalog {
            airports,
            airlines,
            aircraft_types,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Checks there is enough data to draw distinct origins and destinations,
    /// airlines and aircraft types.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.airports.len() < 2 {
            return Err(SimError::EmptyCatalog(
                "At least two airports are required.".to_string(),
            ));
        }
        if self.airlines.is_empty() {
            return Err(SimError::EmptyCatalog("No airlines available.".to_string()));
        }
        if self.aircraft_types.is_empty() {
            return Err(SimError::EmptyCatalog(
                "No aircraft types available.".to_string(),
            ));
        }
        Ok(())
    }

    /// Looks an airport up by IATA code.
    pub fn find_airport(&self, iata_code: &str) -> Option<&Airport> {
        self.airports
            .iter()
            .find(|airport| airport.iata_code == iata_code)
    }

    pub fn random_airport<R: Rng>(&self, rng: &mut R) -> &Airport {
        &self.airports[rng.gen_range(0..self.airports.len())]
    }

    /// Picks an airport whose code differs from `excluded`.
    pub fn random_airport_except<R: Rng>(&self, excluded: &str, rng: &mut R) -> &Airport {
        let candidates: Vec<&Airport> = self
            .airports
            .iter()
            .filter(|airport| airport.iata_code != excluded)
            .collect();

        match candidates.choose(rng) {
            Some(airport) => *airport,
            None => self.random_airport(rng),
        }
    }

    pub fn random_airline<R: Rng>(&self, rng: &mut R) -> &Airline {
        &self.airlines[rng.gen_range(0..self.airlines.len())]
    }

    pub fn random_aircraft_type<R: Rng>(&self, rng: &mut R) -> &str {
        &self.aircraft_types[rng.gen_range(0..self.aircraft_types.len())]
    }

    /// Draws an airline and a flight number such as `UA1234`.
    pub fn random_flight_number<R: Rng>(&self, rng: &mut R) -> (String, String) {
        let airline = self.random_airline(rng);
        let number = format!("{}{}", airline.code, rng.gen_range(100..10000));
        (airline.name.clone(), number)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let airports = vec![
            ("LAX", "Los Angeles International", 33.9416, -118.4085),
            ("SEA", "Seattle-Tacoma International", 47.4502, -122.3088),
            ("PDX", "Portland International", 45.5898, -122.5951),
            ("SAN", "San Diego International", 32.7338, -117.1933),
            ("LAS", "Harry Reid International", 36.0840, -115.1537),
            ("PHX", "Phoenix Sky Harbor International", 33.4352, -112.0101),
            ("DEN", "Denver International", 39.8561, -104.6737),
            ("SLC", "Salt Lake City International", 40.7899, -111.9791),
            ("ORD", "Chicago O'Hare International", 41.9742, -87.9073),
            ("DFW", "Dallas/Fort Worth International", 32.8998, -97.0403),
            ("ATL", "Hartsfield-Jackson Atlanta International", 33.6407, -84.4277),
            ("JFK", "John F. Kennedy International", 40.6413, -73.7781),
            ("BOS", "Boston Logan International", 42.3656, -71.0096),
            ("IAD", "Washington Dulles International", 38.9531, -77.4565),
            ("ANC", "Ted Stevens Anchorage International", 61.1743, -149.9962),
            ("YVR", "Vancouver International", 49.1967, -123.1815),
            ("HNL", "Daniel K. Inouye International", 21.3245, -157.9251),
            ("MEX", "Mexico City International", 19.4361, -99.0719),
            ("NRT", "Narita International", 35.7720, 140.3929),
            ("LHR", "London Heathrow", 51.4700, -0.4543),
        ]
        .into_iter()
        .map(|(code, name, lat, lon)| Airport::new(code, name, lat, lon))
        .collect();

        let airlines = vec![
            ("UA", "United Airlines"),
            ("AA", "American Airlines"),
            ("DL", "Delta Air Lines"),
            ("AS", "Alaska Airlines"),
            ("WN", "Southwest Airlines"),
            ("B6", "JetBlue Airways"),
            ("AC", "Air Canada"),
            ("BA", "British Airways"),
            ("NH", "All Nippon Airways"),
            ("AM", "Aeromexico"),
        ]
        .into_iter()
        .map(|(code, name)| Airline::new(code, name))
        .collect();

        let aircraft_types = ["A320", "A321", "A350", "B737", "B738", "B739", "B77W", "B789", "E175"]
            .iter()
            .map(|t| t.to_string())
            .collect();

        Catalog {
            airports,
            airlines,
            aircraft_types,
        }
    }
}
