use crate::config::{Config, GeoPermission};
use crate::model::geolocation::{Coordinates, GeolocationError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

/// Device position capability. One call yields one reading.
#[async_trait]
pub trait GeolocationSource: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Requests a single reading, giving up after `timeout`.
pub async fn acquire(
    source: &dyn GeolocationSource,
    timeout: Duration,
) -> Result<Coordinates, GeolocationError> {
    match tokio::time::timeout(timeout, source.current_position()).await {
        Ok(reading) => reading,
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "geolocation request timed out");
            Err(GeolocationError::Timeout)
        }
    }
}

/// Position reported by the host the dashboard runs on, configured through
/// the environment.
#[derive(Debug, Clone)]
pub struct ConfiguredGeolocation {
    reading: Result<Coordinates, GeolocationError>,
}

impl ConfiguredGeolocation {
    pub fn from_config(config: &Config) -> Self {
        let reading = match config.geo_permission {
            GeoPermission::Denied => Err(GeolocationError::PermissionDenied),
            GeoPermission::Unrecognized => Err(GeolocationError::Unknown),
            GeoPermission::Granted => match (config.geo_latitude, config.geo_longitude) {
                (Some(latitude), Some(longitude)) => Ok(Coordinates { latitude, longitude }),
                (None, None) => Err(GeolocationError::Unsupported),
                // half a coordinate is not a position
                _ => Err(GeolocationError::PositionUnavailable),
            },
        };
        Self { reading }
    }
}

#[async_trait]
impl GeolocationSource for ConfiguredGeolocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.reading
    }
}
