//! Location query and resolution models

use serde::{Deserialize, Serialize};

use crate::{Result, SkycastError};

const COORDS_PREFIX: &str = "coords:";

/// What the user asked for: a place name or an explicit coordinate pair
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// Free-text place name (city, region, etc.)
    Name(String),
    /// Latitude / longitude in decimal degrees
    Coordinates { latitude: f64, longitude: f64 },
}

impl LocationQuery {
    /// Parse raw user input.
    ///
    /// `coords:<lat>,<lon>` must be a valid pair. A bare `<lat>,<lon>` whose
    /// parts are both numbers is treated as coordinates as well; anything else
    /// is a place name.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SkycastError::validation("Location cannot be empty"));
        }

        if let Some(rest) = input.strip_prefix(COORDS_PREFIX) {
            let (latitude, longitude) = Self::parse_coordinates(rest)?;
            return Ok(Self::Coordinates {
                latitude,
                longitude,
            });
        }

        if Self::looks_like_coordinates(input) {
            let (latitude, longitude) = Self::parse_coordinates(input)?;
            return Ok(Self::Coordinates {
                latitude,
                longitude,
            });
        }

        Ok(Self::Name(input.to_string()))
    }

    /// Build a validated coordinate query
    pub fn coordinates(latitude: f64, longitude: f64) -> Result<Self> {
        Self::validate_range(latitude, longitude)?;
        Ok(Self::Coordinates {
            latitude,
            longitude,
        })
    }

    /// Check a query built without `parse` or `coordinates`
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Name(name) if name.trim().is_empty() => {
                Err(SkycastError::validation("Location cannot be empty"))
            }
            Self::Name(_) => Ok(()),
            Self::Coordinates {
                latitude,
                longitude,
            } => Self::validate_range(*latitude, *longitude),
        }
    }

    /// Parse coordinates from a string like "46.8182,8.2275"
    fn parse_coordinates(input: &str) -> Result<(f64, f64)> {
        let parts: Vec<&str> = input.split(',').map(str::trim).collect();

        if parts.len() != 2 {
            return Err(SkycastError::validation(
                "Coordinates must be in format 'lat,lon'",
            ));
        }

        let lat = parts[0].parse::<f64>().map_err(|_| {
            SkycastError::validation(format!("Invalid latitude: '{}'", parts[0]))
        })?;
        let lon = parts[1].parse::<f64>().map_err(|_| {
            SkycastError::validation(format!("Invalid longitude: '{}'", parts[1]))
        })?;

        Self::validate_range(lat, lon)?;
        Ok((lat, lon))
    }

    fn validate_range(lat: f64, lon: f64) -> Result<()> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(SkycastError::validation(format!(
                "Latitude must be between -90 and 90, got: {lat}"
            )));
        }

        if !(-180.0..=180.0).contains(&lon) {
            return Err(SkycastError::validation(format!(
                "Longitude must be between -180 and 180, got: {lon}"
            )));
        }

        Ok(())
    }

    fn looks_like_coordinates(input: &str) -> bool {
        let parts: Vec<&str> = input.split(',').map(str::trim).collect();
        parts.len() == 2 && parts.iter().all(|p| p.parse::<f64>().is_ok())
    }
}

/// A place the pipeline can fetch weather for
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Human-readable name, e.g. "Paris, Île-de-France, FR"
    pub display_name: String,
}

impl ResolvedLocation {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, display_name: String) -> Self {
        Self {
            latitude,
            longitude,
            display_name,
        }
    }

    /// Location named after its own coordinates
    #[must_use]
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self::new(latitude, longitude, format!("{latitude:.4}, {longitude:.4}"))
    }
}

/// Geocoding candidate, normalized from any provider's response shape
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GeocodeCandidate {
    /// City or place name (or a pre-formatted address)
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: Option<String>,
    /// State or other first-level administrative region
    pub region: Option<String>,
}

impl GeocodeCandidate {
    /// "city, region, country" with absent or empty parts omitted
    #[must_use]
    pub fn display_name(&self) -> String {
        [
            Some(self.name.as_str()),
            self.region.as_deref(),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    #[must_use]
    pub fn into_resolved(self) -> ResolvedLocation {
        let display_name = self.display_name();
        ResolvedLocation::new(self.lat, self.lon, display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("coords:48.85,2.35", 48.85, 2.35)]
    #[case("coords: -33.86 , 151.21", -33.86, 151.21)]
    #[case("46.8182,8.2275", 46.8182, 8.2275)]
    #[case("-46.8182, -8.2275", -46.8182, -8.2275)]
    fn test_parse_coordinates(#[case] input: &str, #[case] lat: f64, #[case] lon: f64) {
        assert_eq!(
            LocationQuery::parse(input).unwrap(),
            LocationQuery::Coordinates {
                latitude: lat,
                longitude: lon
            }
        );
    }

    #[rstest]
    #[case("coords:91.0,8.0")]
    #[case("coords:46.0,-181.0")]
    #[case("coords:46.0")]
    #[case("coords:46.0,8.0,1.0")]
    #[case("coords:abc,8.0")]
    #[case("-91.0,8.0")]
    #[case("46.0,181.0")]
    #[case("coords:NaN,8.0")]
    #[case("   ")]
    fn test_parse_rejects_invalid(#[case] input: &str) {
        let err = LocationQuery::parse(input).unwrap_err();
        assert!(matches!(err, SkycastError::Validation { .. }), "{input}");
    }

    #[test]
    fn test_validate_hand_built_queries() {
        let bad = LocationQuery::Coordinates {
            latitude: 10.0,
            longitude: f64::NAN,
        };
        assert!(matches!(bad.validate(), Err(SkycastError::Validation { .. })));
        assert!(LocationQuery::Name(String::new()).validate().is_err());
        assert!(LocationQuery::Name("Paris".to_string()).validate().is_ok());
        assert!(LocationQuery::coordinates(-90.0, 180.0).unwrap().validate().is_ok());
    }

    #[rstest]
    #[case("Paris")]
    #[case("New York City")]
    #[case("Portland, OR")]
    #[case("Chamonix-Mont-Blanc")]
    fn test_parse_names(#[case] input: &str) {
        assert_eq!(
            LocationQuery::parse(input).unwrap(),
            LocationQuery::Name(input.to_string())
        );
    }

    #[test]
    fn test_display_name_joins_present_parts() {
        let mut candidate = GeocodeCandidate {
            name: "Paris".to_string(),
            lat: 48.8566,
            lon: 2.3522,
            country: Some("FR".to_string()),
            region: Some("Ile-de-France".to_string()),
        };
        assert_eq!(candidate.display_name(), "Paris, Ile-de-France, FR");

        candidate.region = None;
        assert_eq!(candidate.display_name(), "Paris, FR");

        candidate.region = Some(String::new());
        candidate.country = None;
        assert_eq!(candidate.display_name(), "Paris");
    }

    #[test]
    fn test_location_from_coordinates() {
        let location = ResolvedLocation::from_coordinates(46.8182, 8.2275);
        assert_eq!(location.display_name, "46.8182, 8.2275");
    }
}
