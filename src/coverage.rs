//! Survey coverage from the photo agent and the infrared drone.

use crate::core::Coordinate;

/// Photo-agent coverage: does the photo survey path pass by a point
pub trait PhotoCoverage: Send + Sync {
    fn path_intersects(&self, coordinate: Coordinate) -> bool;
}

/// Drone infrared coverage: does a thermal hit overlap a point
pub trait InfraredCoverage: Send + Sync {
    fn overlaps(&self, coordinate: Coordinate) -> bool;
}

/// Photo track as a list of waypoints with a capture tolerance
#[derive(Debug, Clone, Default)]
pub struct PhotoTrack {
    pub waypoints: Vec<Coordinate>,
    pub tolerance: f64,
}

impl PhotoTrack {
    pub fn new(waypoints: Vec<Coordinate>, tolerance: f64) -> Self {
        Self { waypoints, tolerance }
    }
}

impl PhotoCoverage for PhotoTrack {
    fn path_intersects(&self, coordinate: Coordinate) -> bool {
        self.waypoints
            .iter()
            .any(|w| coordinate.distance_to(w) <= self.tolerance)
    }
}

/// Infrared hotspots reported by the drone
#[derive(Debug, Clone, Default)]
pub struct InfraredHotspots {
    pub hotspots: Vec<Coordinate>,
    pub radius: f64,
}

impl InfraredHotspots {
    pub fn new(hotspots: Vec<Coordinate>, radius: f64) -> Self {
        Self { hotspots, radius }
    }
}

impl InfraredCoverage for InfraredHotspots {
    fn overlaps(&self, coordinate: Coordinate) -> bool {
        self.hotspots
            .iter()
            .any(|h| coordinate.distance_to(h) <= self.radius)
    }
}

/// No survey data yet
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCoverage;

impl PhotoCoverage for NoCoverage {
    fn path_intersects(&self, _coordinate: Coordinate) -> bool {
        false
    }
}

impl InfraredCoverage for NoCoverage {
    fn overlaps(&self, _coordinate: Coordinate) -> bool {
        false
    }
}
