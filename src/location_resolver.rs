//! Location Resolution Module
//!
//! Turns a [`LocationQuery`] into a [`ResolvedLocation`]. Free text goes
//! through the primary geocoder and falls back to the secondary one only when
//! the primary definitively found nothing. Coordinates skip forward geocoding
//! and are only reverse-geocoded for a display name.

use tracing::{debug, info, instrument, warn};

use crate::geocoding::{GoogleGeocoder, OpenWeatherGeocoder};
use crate::models::{GeocodeCandidate, LocationQuery, ResolvedLocation};
use crate::{Result, SkycastError};

/// One step of the resolution fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodeStrategy {
    /// Keep the user's coordinates, look up a display name
    CoordinatePassthrough,
    /// OpenWeatherMap direct geocoding
    Primary,
    /// Google geocoding, only when a key is configured
    Secondary,
}

const COORDINATE_STRATEGIES: &[GeocodeStrategy] = &[GeocodeStrategy::CoordinatePassthrough];
const NAME_STRATEGIES: &[GeocodeStrategy] = &[GeocodeStrategy::Primary, GeocodeStrategy::Secondary];

impl GeocodeStrategy {
    /// Ordered strategies to try for a query
    #[must_use]
    pub fn chain_for(query: &LocationQuery) -> &'static [GeocodeStrategy] {
        match query {
            LocationQuery::Coordinates { .. } => COORDINATE_STRATEGIES,
            LocationQuery::Name(_) => NAME_STRATEGIES,
        }
    }
}

/// Service for resolving location queries
#[derive(Debug, Clone)]
pub struct LocationResolver {
    primary: OpenWeatherGeocoder,
    secondary: Option<GoogleGeocoder>,
}

impl LocationResolver {
    #[must_use]
    pub fn new(primary: OpenWeatherGeocoder, secondary: Option<GoogleGeocoder>) -> Self {
        Self { primary, secondary }
    }

    /// Walk the strategy chain until one produces a location.
    ///
    /// A strategy returning `Ok(None)` hands over to the next one; any error
    /// ends resolution immediately. Exhausting the chain is `NotFound`.
    #[instrument(skip(self))]
    pub async fn resolve(&self, query: &LocationQuery) -> Result<ResolvedLocation> {
        for &strategy in GeocodeStrategy::chain_for(query) {
            debug!("Trying geocode strategy {:?}", strategy);
            if let Some(location) = self.attempt(strategy, query).await? {
                info!(
                    "Resolved location: {} at ({}, {})",
                    location.display_name, location.latitude, location.longitude
                );
                return Ok(location);
            }
        }

        let text = match query {
            LocationQuery::Name(name) => name.clone(),
            LocationQuery::Coordinates {
                latitude,
                longitude,
            } => format!("{latitude}, {longitude}"),
        };
        Err(SkycastError::not_found(text))
    }

    async fn attempt(
        &self,
        strategy: GeocodeStrategy,
        query: &LocationQuery,
    ) -> Result<Option<ResolvedLocation>> {
        match (strategy, query) {
            (
                GeocodeStrategy::CoordinatePassthrough,
                LocationQuery::Coordinates {
                    latitude,
                    longitude,
                },
            ) => Ok(Some(self.resolve_coordinates(*latitude, *longitude).await)),
            (GeocodeStrategy::Primary, LocationQuery::Name(name)) => {
                let candidates = self.primary.direct(name).await?;
                Ok(first_candidate(candidates))
            }
            (GeocodeStrategy::Secondary, LocationQuery::Name(name)) => {
                let Some(secondary) = &self.secondary else {
                    debug!("Secondary geocoder not configured, skipping");
                    return Ok(None);
                };
                let candidates = secondary.search(name).await?;
                Ok(first_candidate(candidates))
            }
            _ => Ok(None),
        }
    }

    /// Reverse geocoding only decorates the name; it never fails resolution
    async fn resolve_coordinates(&self, lat: f64, lon: f64) -> ResolvedLocation {
        debug!("Resolving coordinates: ({}, {})", lat, lon);

        match self.primary.reverse(lat, lon).await {
            Ok(candidates) => match candidates.into_iter().next() {
                Some(candidate) => ResolvedLocation::new(lat, lon, candidate.display_name()),
                None => {
                    debug!("No reverse geocoding results found, using coordinates as name");
                    ResolvedLocation::from_coordinates(lat, lon)
                }
            },
            Err(e) => {
                warn!("Reverse geocoding failed: {}, using coordinates as name", e);
                ResolvedLocation::from_coordinates(lat, lon)
            }
        }
    }
}

fn first_candidate(candidates: Vec<GeocodeCandidate>) -> Option<ResolvedLocation> {
    candidates.into_iter().next().map(GeocodeCandidate::into_resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_never_forward_geocode() {
        let query = LocationQuery::coordinates(46.8182, 8.2275).unwrap();
        assert_eq!(
            GeocodeStrategy::chain_for(&query),
            &[GeocodeStrategy::CoordinatePassthrough]
        );
    }

    #[test]
    fn test_names_try_primary_before_secondary() {
        let query = LocationQuery::Name("Springfield".to_string());
        assert_eq!(
            GeocodeStrategy::chain_for(&query),
            &[GeocodeStrategy::Primary, GeocodeStrategy::Secondary]
        );
    }

    #[test]
    fn test_first_candidate_wins() {
        let candidates = vec![
            GeocodeCandidate {
                name: "Paris".to_string(),
                lat: 48.8566,
                lon: 2.3522,
                country: Some("FR".to_string()),
                region: None,
            },
            GeocodeCandidate {
                name: "Paris".to_string(),
                lat: 33.66,
                lon: -95.55,
                country: Some("US".to_string()),
                region: Some("Texas".to_string()),
            },
        ];
        let location = first_candidate(candidates).unwrap();
        assert_eq!(location.display_name, "Paris, FR");
        assert_eq!(first_candidate(Vec::new()), None);
    }
}
