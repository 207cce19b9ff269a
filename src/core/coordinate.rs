use serde::{Deserialize, Serialize};

/// Planar (lat, lon) point; distances are Euclidean in degree-space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate { lat: 0.0, lon: 0.0 };

    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Euclidean distance, no geodesic correction
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        ((self.lat - other.lat).powi(2) + (self.lon - other.lon).powi(2)).sqrt()
    }

    /// Distance to the closed segment `a`-`b`
    pub fn distance_to_segment(&self, a: &Coordinate, b: &Coordinate) -> f64 {
        let (dx, dy) = (b.lat - a.lat, b.lon - a.lon);
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return self.distance_to(a);
        }

        let t = (((self.lat - a.lat) * dx + (self.lon - a.lon) * dy) / len_sq).clamp(0.0, 1.0);
        let projected = Coordinate::new(a.lat + t * dx, a.lon + t * dy);
        self.distance_to(&projected)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lat, c.lon]
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(10.0, 0.0);

        // Perpendicular foot inside the segment
        assert_eq!(Coordinate::new(5.0, 3.0).distance_to_segment(&a, &b), 3.0);
        // Beyond the end clamps to the endpoint
        assert_eq!(Coordinate::new(13.0, 4.0).distance_to_segment(&a, &b), 5.0);
        // Degenerate segment
        assert_eq!(Coordinate::new(3.0, 4.0).distance_to_segment(&a, &a), 5.0);
    }

    #[test]
    fn test_wire_format() {
        let c: Coordinate = serde_json::from_str("[45.2, -121.3]").unwrap();
        assert_eq!(c, Coordinate::new(45.2, -121.3));
        assert_eq!(serde_json::to_string(&c).unwrap(), "[45.2,-121.3]");
    }
}
