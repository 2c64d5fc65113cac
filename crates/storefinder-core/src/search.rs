//! Search requests: where to look and what to look for.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a search is centred.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    PostalCode(String),
    Address(String),
    Coordinates { latitude: f64, longitude: f64 },
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::PostalCode(code) => write!(f, "{code}"),
            Location::Address(address) => write!(f, "{address}"),
            Location::Coordinates {
                latitude,
                longitude,
            } => write!(f, "{latitude},{longitude}"),
        }
    }
}

/// A validated search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub location: Location,
    /// Product names in caller order. May be empty.
    pub desired_items: Vec<String>,
    /// Radius in kilometres. `None` means use the configured default.
    pub search_radius: Option<f64>,
}

/// Wire form of a search as posted by clients.
///
/// Any one of `address`, `postal_code`, or the `latitude`/`longitude` pair
/// locates the search. When several are present the address wins, then the
/// postal code, then the coordinates.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchParams {
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, alias = "strains", alias = "items")]
    pub desired_items: Vec<String>,
    #[serde(default, alias = "radius")]
    pub search_radius: Option<f64>,
}

#[derive(Debug, Error, PartialEq)]
pub enum SearchRequestError {
    #[error("a location is required: provide address, postal_code, or latitude and longitude")]
    MissingLocation,

    #[error("latitude and longitude must be provided together")]
    IncompleteCoordinates,

    #[error("coordinates out of range: latitude {latitude}, longitude {longitude}")]
    CoordinatesOutOfRange { latitude: f64, longitude: f64 },

    #[error("search radius must be a positive number, got {0}")]
    InvalidRadius(f64),
}

impl SearchParams {
    /// Resolves the wire form into a [`SearchRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchRequestError`] when no usable location is present,
    /// when only half a coordinate pair is given, or when the radius is not
    /// a positive finite number.
    pub fn into_request(self) -> Result<SearchRequest, SearchRequestError> {
        if let Some(radius) = self.search_radius {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(SearchRequestError::InvalidRadius(radius));
            }
        }

        let location = resolve_location(
            non_blank(self.address),
            non_blank(self.postal_code),
            self.latitude,
            self.longitude,
        )?;

        Ok(SearchRequest {
            location,
            desired_items: self.desired_items,
            search_radius: self.search_radius,
        })
    }
}

fn resolve_location(
    address: Option<String>,
    postal_code: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Location, SearchRequestError> {
    if let Some(address) = address {
        return Ok(Location::Address(address));
    }
    if let Some(code) = postal_code {
        return Ok(Location::PostalCode(code));
    }
    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => {
            if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                return Err(SearchRequestError::CoordinatesOutOfRange {
                    latitude,
                    longitude,
                });
            }
            Ok(Location::Coordinates {
                latitude,
                longitude,
            })
        }
        (None, None) => Err(SearchRequestError::MissingLocation),
        _ => Err(SearchRequestError::IncompleteCoordinates),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
