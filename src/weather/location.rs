use super::models::LocationQuery;
use crate::error::WeatherError;

/// Resolve raw request inputs into a single location.
///
/// A complete coordinate pair wins over a city, even when both are given.
/// A half pair is treated as absent rather than an error, so callers that
/// skipped validation still fall through to the city or `MissingLocation`.
pub fn resolve(
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<&str>,
) -> Result<LocationQuery, WeatherError> {
    if let (Some(lat), Some(lon)) = (lat, lon) {
        return Ok(LocationQuery::Coordinates { lat, lon });
    }

    match city.map(str::trim) {
        Some(city) if !city.is_empty() => Ok(LocationQuery::City(city.to_string())),
        _ => Err(WeatherError::MissingLocation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_supplied_is_missing_location() {
        assert!(matches!(
            resolve(None, None, None),
            Err(WeatherError::MissingLocation)
        ));
    }

    #[test]
    fn test_coordinates_take_precedence_over_city() {
        let location = resolve(Some(10.0), Some(20.0), Some("Paris")).unwrap();
        assert_eq!(location, LocationQuery::Coordinates { lat: 10.0, lon: 20.0 });
    }

    #[test]
    fn test_city_only() {
        let location = resolve(None, None, Some("  London ")).unwrap();
        assert_eq!(location, LocationQuery::City("London".to_string()));
    }

    #[test]
    fn test_blank_city_is_missing_location() {
        assert!(matches!(
            resolve(None, None, Some("   ")),
            Err(WeatherError::MissingLocation)
        ));
    }

    #[test]
    fn test_half_pair_falls_back_to_city() {
        let location = resolve(Some(10.0), None, Some("Oslo")).unwrap();
        assert_eq!(location, LocationQuery::City("Oslo".to_string()));

        assert!(matches!(
            resolve(None, Some(20.0), None),
            Err(WeatherError::MissingLocation)
        ));
    }

    #[test]
    fn test_zero_coordinates_are_a_valid_pair() {
        let location = resolve(Some(0.0), Some(0.0), None).unwrap();
        assert_eq!(location, LocationQuery::Coordinates { lat: 0.0, lon: 0.0 });
    }
}
