/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
        }
    }

    /// Returns this coordinate moved by the given deltas, in degrees.
    pub fn offset(&self, delta_latitude: f64, delta_longitude: f64) -> Self {
        Coordinate::new(
            self.latitude + delta_latitude,
            self.longitude + delta_longitude,
        )
    }
}

/// Initial compass bearing from `from` to `to`, in degrees within [0, 360).
///
/// Uses the great-circle initial bearing formula on a spherical earth. When both
/// points are equal the result is whatever `atan2(0, 0)` yields, which is 0.
pub fn bearing(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();
    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);

    // rem_euclid can round up to exactly 360 for tiny negative angles
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}

/// Planar interpolation between two coordinates, `t` in [0, 1].
pub fn lerp(a: Coordinate, b: Coordinate, t: f64) -> Coordinate {
    Coordinate::new(
        a.latitude + (b.latitude - a.latitude) * t,
        a.longitude + (b.longitude - a.longitude) * t,
    )
}
