use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Why a single-shot position request produced no reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("geolocation is not supported on this device")]
    Unsupported,
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("position request timed out")]
    Timeout,
    #[error("unknown geolocation error")]
    Unknown,
}

impl GeolocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            GeolocationError::Unsupported => "This device does not support geolocation.",
            GeolocationError::PermissionDenied => "Permission denied. Please allow location access.",
            GeolocationError::PositionUnavailable => "Location information is unavailable.",
            GeolocationError::Timeout => "The request to get location timed out.",
            GeolocationError::Unknown => "An unknown error occurred while fetching location.",
        }
    }
}
