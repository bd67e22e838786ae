use super::coordinate::Coordinate;

/// Represents an airport with its IATA code, display name and geographical position.

#[derive(Clone, Debug, PartialEq)]
pub struct Airport {
    pub iata_code: String,
    pub name: String,
    pub position: Coordinate,
}

impl Airport {
    pub fn new(iata_code: &str, name: &str, latitude: f64, longitude: f64) -> Self {
        Airport {
            iata_code: iata_code.to_string(),
            name: name.to_string(),
            position: Coordinate::new(latitude, longitude),
        }
    }
}

impl Default for Airport {
    fn default() -> Self {
        Airport {
            iata_code: "XXX".to_string(),
            name: "Default Airport".to_string(),
            position: Coordinate::default(),
        }
    }
}
