use super::coordinate::{bearing, lerp, Coordinate};

/// The path a flight is currently following.
///
/// `progress` is measured in segment units: with `n` waypoints the route has
/// `n - 1` segments of equal weight regardless of their length, so a progress
/// of 0.5 over three segments lands halfway along the second one.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub origin_code: String,
    pub origin_coordinate: Coordinate,
    pub destination_code: String,
    pub destination_coordinate: Coordinate,
    pub waypoints: Vec<Coordinate>,
    pub progress: f64,
}

impl Route {
    pub fn new(
        origin_code: &str,
        origin_coordinate: Coordinate,
        destination_code: &str,
        destination_coordinate: Coordinate,
        waypoints: Vec<Coordinate>,
        progress: f64,
    ) -> Self {
        Route {
            origin_code: origin_code.to_string(),
            origin_coordinate,
            destination_code: destination_code.to_string(),
            destination_coordinate,
            waypoints,
            progress: progress.clamp(0.0, 1.0),
        }
    }

    /// Index of the segment `progress` falls in and the fraction covered within it.
    fn segment(&self) -> (usize, f64) {
        let segments = self.waypoints.len().saturating_sub(1);
        if segments == 0 {
            return (0, 0.0);
        }

        let scaled = self.progress.clamp(0.0, 1.0) * segments as f64;
        let index = (scaled.floor() as usize).min(segments - 1);
        let fraction = (scaled - index as f64).clamp(0.0, 1.0);

        (index, fraction)
    }

    /// Position along the route for the current progress.
    pub fn current_position(&self) -> Coordinate {
        match self.waypoints.as_slice() {
            [] => self.origin_coordinate,
            [only] => *only,
            waypoints => {
                let (index, fraction) = self.segment();
                lerp(waypoints[index], waypoints[index + 1], fraction)
            }
        }
    }

    /// Bearing of the current segment. Constant within a segment and jumps at
    /// waypoints. Routes with fewer than two waypoints report 0.
    pub fn current_heading(&self) -> f64 {
        if self.waypoints.len() < 2 {
            return 0.0;
        }

        let (index, _) = self.segment();
        bearing(self.waypoints[index], self.waypoints[index + 1])
    }

    /// Waypoints already flown up to the current segment start, followed by the current position.
    pub fn traveled_path(&self) -> Vec<Coordinate> {
        let current = self.current_position();
        if self.waypoints.len() < 2 {
            return vec![current];
        }

        let (index, _) = self.segment();
        let mut path: Vec<Coordinate> = self.waypoints[..=index].to_vec();
        path.push(current);
        path
    }

    /// The current position followed by every waypoint still ahead.
    pub fn remaining_path(&self) -> Vec<Coordinate> {
        let current = self.current_position();
        if self.waypoints.len() < 2 {
            return vec![current];
        }

        let (index, _) = self.segment();
        let mut path = vec![current];
        path.extend_from_slice(&self.waypoints[index + 1..]);
        path
    }

    /// Moves progress forward, never past 1.0. Returns the new value.
    pub fn advance(&mut self, increment: f64) -> f64 {
        self.progress = (self.progress + increment).min(1.0);
        self.progress
    }

    pub fn last_waypoint(&self) -> Coordinate {
        self.waypoints
            .last()
            .copied()
            .unwrap_or(self.destination_coordinate)
    }
}
