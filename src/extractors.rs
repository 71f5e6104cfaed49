use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use crate::error::WeatherError;
use crate::weather::models::Units;

/// Largest forecast the provider's free 3-hour endpoint covers
pub const MAX_FORECAST_DAYS: i64 = 5;

/// Raw query string for weather/forecast requests
#[derive(Debug, Default, Deserialize)]
pub struct WeatherQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub city: Option<String>,
    /// metric or imperial
    pub units: Option<String>,
    /// Forecast length in days (forecast endpoint only)
    pub days: Option<i64>,
}

/// Query parameters that passed boundary validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub city: Option<String>,
    pub units: Option<Units>,
    pub days: Option<u8>,
}

impl WeatherQuery {
    /// Enforce the request rules: exactly one location form, coordinates in
    /// range, a known unit system and a day count between 1 and 5.
    pub fn validate(self) -> Result<ValidatedQuery, WeatherError> {
        let city = match self.city {
            Some(city) if city.trim().is_empty() => {
                return Err(WeatherError::InvalidRequest("city must not be blank".into()))
            }
            other => other,
        };

        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => {
                if city.is_some() {
                    return Err(WeatherError::InvalidRequest(
                        "provide either lat/lon or city, not both".into(),
                    ));
                }
                if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
                    return Err(WeatherError::InvalidRequest(
                        "lat must be between -90 and 90".into(),
                    ));
                }
                if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
                    return Err(WeatherError::InvalidRequest(
                        "lon must be between -180 and 180".into(),
                    ));
                }
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(WeatherError::InvalidRequest(
                    "lat and lon must be provided together".into(),
                ));
            }
            (None, None) if city.is_none() => return Err(WeatherError::MissingLocation),
            (None, None) => {}
        }

        let units = self
            .units
            .map(|u| u.parse::<Units>())
            .transpose()
            .map_err(WeatherError::InvalidRequest)?;

        let days = match self.days {
            Some(days) if (1..=MAX_FORECAST_DAYS).contains(&days) => Some(days as u8),
            Some(_) => {
                return Err(WeatherError::InvalidRequest(format!(
                    "days must be between 1 and {MAX_FORECAST_DAYS}"
                )))
            }
            None => None,
        };

        Ok(ValidatedQuery {
            lat: self.lat,
            lon: self.lon,
            city,
            units,
            days,
        })
    }
}

impl<S> FromRequestParts<S> for ValidatedQuery
where
    S: Send + Sync,
{
    type Rejection = WeatherError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<WeatherQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| WeatherError::InvalidRequest(e.body_text()))?;

        query.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city_query(city: &str) -> WeatherQuery {
        WeatherQuery {
            city: Some(city.to_string()),
            ..Default::default()
        }
    }

    fn coord_query(lat: f64, lon: f64) -> WeatherQuery {
        WeatherQuery {
            lat: Some(lat),
            lon: Some(lon),
            ..Default::default()
        }
    }

    fn assert_invalid(query: WeatherQuery) {
        assert!(matches!(
            query.validate(),
            Err(WeatherError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_city_query_is_valid() {
        let validated = city_query("London").validate().unwrap();
        assert_eq!(validated.city.as_deref(), Some("London"));
        assert_eq!(validated.units, None);
        assert_eq!(validated.days, None);
    }

    #[test]
    fn test_coordinate_query_is_valid() {
        let validated = coord_query(-90.0, 180.0).validate().unwrap();
        assert_eq!(validated.lat, Some(-90.0));
        assert_eq!(validated.lon, Some(180.0));
    }

    #[test]
    fn test_no_location_is_missing_location() {
        assert!(matches!(
            WeatherQuery::default().validate(),
            Err(WeatherError::MissingLocation)
        ));
    }

    #[test]
    fn test_rejects_both_location_forms() {
        let mut query = coord_query(10.0, 20.0);
        query.city = Some("Paris".into());
        assert_invalid(query);
    }

    #[test]
    fn test_rejects_half_coordinate_pair() {
        assert_invalid(WeatherQuery {
            lat: Some(10.0),
            ..Default::default()
        });
        assert_invalid(WeatherQuery {
            lon: Some(10.0),
            city: Some("Paris".into()),
            ..Default::default()
        });
    }

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        assert_invalid(coord_query(90.5, 0.0));
        assert_invalid(coord_query(0.0, -180.5));
        assert_invalid(coord_query(f64::NAN, 0.0));
    }

    #[test]
    fn test_rejects_blank_city() {
        assert_invalid(city_query("   "));
    }

    #[test]
    fn test_units_are_parsed() {
        let mut query = city_query("Boston");
        query.units = Some("imperial".into());
        assert_eq!(query.validate().unwrap().units, Some(Units::Imperial));

        let mut query = city_query("Boston");
        query.units = Some("kelvin".into());
        assert_invalid(query);
    }

    #[test]
    fn test_days_range() {
        for days in 1..=5 {
            let mut query = city_query("Rome");
            query.days = Some(days);
            assert_eq!(query.validate().unwrap().days, Some(days as u8));
        }
        for days in [0, 6, -1, 300] {
            let mut query = city_query("Rome");
            query.days = Some(days);
            assert_invalid(query);
        }
    }
}
