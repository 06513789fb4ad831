use crate::types::{Coordinate, LocationError};
use async_trait::async_trait;

/// A single-shot source for the current position.
#[async_trait]
pub trait Geolocator: Send + Sync {
    /// Whether this environment can report a position at all.
    fn is_available(&self) -> bool {
        true
    }

    async fn current_position(&self) -> Result<Coordinate, LocationError>;
}

/// A position known up front (configuration or command line).
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator {
    position: Coordinate,
}

impl FixedGeolocator {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            position: Coordinate {
                latitude,
                longitude,
            },
        }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        let Coordinate {
            latitude,
            longitude,
        } = self.position;
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(LocationError::PositionUnavailable);
        }
        Ok(self.position)
    }
}

/// An environment without any location capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

#[async_trait]
impl Geolocator for Unsupported {
    fn is_available(&self) -> bool {
        false
    }

    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Err(LocationError::PositionUnavailable)
    }
}
