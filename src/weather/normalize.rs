use chrono::DateTime;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::models::*;
use crate::error::WeatherError;

/// One 3-hour forecast sample, reduced to what the daily summary needs
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    pub date: String,
    pub temp: f64,
    pub condition: Option<String>,
    pub icon: Option<String>,
}

fn parse<T: DeserializeOwned>(raw: Value) -> Result<T, WeatherError> {
    serde_json::from_value(raw).map_err(|e| WeatherError::MalformedUpstreamResponse(e.to_string()))
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, WeatherError> {
    value.ok_or_else(|| {
        WeatherError::MalformedUpstreamResponse(format!("missing required field '{field}'"))
    })
}

/// Map a raw current-weather payload onto [`CurrentWeather`]
///
/// The payload is parsed into the all-optional [`RawCurrent`] first; each
/// field is then either required or filled with its default here.
pub fn normalize_current(raw: Value) -> Result<CurrentWeather, WeatherError> {
    let raw: RawCurrent = parse(raw)?;

    let main = require(raw.main, "main")?;
    let wind = require(raw.wind, "wind")?;
    let condition = require(raw.weather.into_iter().next(), "weather[0]")?;

    let coordinates = raw
        .coord
        .and_then(|c| Some(Coordinates { lat: c.lat?, lon: c.lon? }));
    let (country, sunrise, sunset) = match raw.sys {
        Some(sys) => (sys.country.unwrap_or_default(), sys.sunrise, sys.sunset),
        None => (String::new(), None, None),
    };

    Ok(CurrentWeather {
        location: require(raw.name, "name")?,
        country,
        coordinates,
        temp: require(main.temp, "main.temp")?,
        feels_like: require(main.feels_like, "main.feels_like")?,
        temp_min: require(main.temp_min, "main.temp_min")?,
        temp_max: require(main.temp_max, "main.temp_max")?,
        humidity: require(main.humidity, "main.humidity")?,
        pressure: require(main.pressure, "main.pressure")?,
        wind_speed: require(wind.speed, "wind.speed")?,
        wind_direction: wind.deg,
        clouds: raw.clouds.and_then(|c| c.all).unwrap_or(0),
        visibility: raw.visibility,
        condition_id: require(condition.id, "weather[0].id")?,
        description: require(condition.description, "weather[0].description")?,
        icon: require(condition.icon, "weather[0].icon")?,
        sunrise,
        sunset,
        timezone_offset: raw.timezone.unwrap_or(0),
        observed_at: require(raw.dt, "dt")?,
    })
}

/// Map a raw forecast payload onto [`Forecast`], keeping at most `days` days
pub fn normalize_forecast(raw: Value, days: u8) -> Result<Forecast, WeatherError> {
    let raw: RawForecast = parse(raw)?;

    let samples = raw
        .list
        .into_iter()
        .enumerate()
        .map(|(i, sample)| to_sample(i, sample))
        .collect::<Result<Vec<_>, _>>()?;

    let (city, country, timezone_offset) = match raw.city {
        Some(c) => (
            c.name.unwrap_or_default(),
            c.country.unwrap_or_default(),
            c.timezone.unwrap_or(0),
        ),
        None => (String::new(), String::new(), 0),
    };

    Ok(Forecast {
        city,
        country,
        timezone_offset,
        days: aggregate_days(&samples, usize::from(days)),
    })
}

fn to_sample(index: usize, sample: RawSample) -> Result<ForecastSample, WeatherError> {
    let dt = require(sample.dt, &format!("list[{index}].dt"))?;
    let temp = require(
        sample.main.and_then(|m| m.temp),
        &format!("list[{index}].main.temp"),
    )?;

    // The provider's own date text wins; otherwise truncate the UTC timestamp.
    let date = match sample.dt_txt.as_deref().and_then(|t| t.get(..10)) {
        Some(date) => date.to_string(),
        None => DateTime::from_timestamp(dt, 0)
            .ok_or_else(|| {
                WeatherError::MalformedUpstreamResponse(format!(
                    "list[{index}].dt out of range: {dt}"
                ))
            })?
            .date_naive()
            .format("%Y-%m-%d")
            .to_string(),
    };

    let primary = sample.weather.into_iter().next();
    Ok(ForecastSample {
        date,
        temp,
        condition: primary.as_ref().and_then(|w| w.main.clone()),
        icon: primary.and_then(|w| w.icon),
    })
}

/// Group samples by calendar day and summarize each day.
///
/// Days come out in the order their first sample appears and only the first
/// `max_days` are kept. Condition and icon are majority votes; on a tie the
/// value seen first within the day wins.
pub fn aggregate_days(samples: &[ForecastSample], max_days: usize) -> Vec<ForecastDay> {
    let mut buckets: IndexMap<&str, Vec<&ForecastSample>> = IndexMap::new();
    for sample in samples {
        buckets.entry(sample.date.as_str()).or_default().push(sample);
    }

    buckets
        .into_iter()
        .take(max_days)
        .map(|(date, day)| {
            let temps = day.iter().map(|s| s.temp);
            let temp_min = temps.clone().fold(f64::INFINITY, f64::min);
            let temp_max = temps.clone().fold(f64::NEG_INFINITY, f64::max);
            let temp_avg = temps.sum::<f64>() / day.len() as f64;

            ForecastDay {
                date: date.to_string(),
                temp_avg,
                temp_min,
                temp_max,
                condition: dominant(day.iter().filter_map(|s| s.condition.as_deref())),
                icon: dominant(day.iter().filter_map(|s| s.icon.as_deref())),
            }
        })
        .collect()
}

/// Most frequent value; ties go to the first one encountered, none gives ""
fn dominant<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn london_current() -> Value {
        json!({
            "coord": {"lon": -0.1257, "lat": 51.5085},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "main": {
                "temp": 15.2, "feels_like": 14.6, "temp_min": 13.9, "temp_max": 16.4,
                "pressure": 1012, "humidity": 77
            },
            "visibility": 10000,
            "wind": {"speed": 4.12, "deg": 250},
            "clouds": {"all": 75},
            "dt": 1700000000,
            "sys": {"country": "GB", "sunrise": 1699975000, "sunset": 1700008000},
            "timezone": 0,
            "name": "London"
        })
    }

    fn sample(dt_txt: &str, temp: f64, condition: &str, icon: &str) -> Value {
        json!({
            "dt": 0,
            "dt_txt": dt_txt,
            "main": {"temp": temp},
            "weather": [{"id": 800, "main": condition, "description": "", "icon": icon}]
        })
    }

    fn day_sample(date: &str, temp: f64, condition: &str) -> ForecastSample {
        ForecastSample {
            date: date.to_string(),
            temp,
            condition: Some(condition.to_string()),
            icon: Some(format!("{}-icon", condition.to_lowercase())),
        }
    }

    #[test]
    fn test_current_maps_fields_literally() {
        let weather = normalize_current(london_current()).unwrap();
        assert_eq!(weather.temp, 15.2);
        assert_eq!(weather.feels_like, 14.6);
        assert_eq!(weather.temp_min, 13.9);
        assert_eq!(weather.temp_max, 16.4);
        assert_eq!(weather.humidity, 77);
        assert_eq!(weather.pressure, 1012);
        assert_eq!(weather.wind_speed, 4.12);
        assert_eq!(weather.wind_direction, Some(250.0));
        assert_eq!(weather.clouds, 75);
        assert_eq!(weather.visibility, Some(10000));
        assert_eq!(weather.condition_id, 500);
        assert_eq!(weather.description, "light rain");
        assert_eq!(weather.icon, "10d");
        assert_eq!(weather.location, "London");
        assert_eq!(weather.country, "GB");
        assert_eq!(weather.sunrise, Some(1699975000));
        assert_eq!(weather.observed_at, 1700000000);
        assert_eq!(
            weather.coordinates,
            Some(Coordinates { lat: 51.5085, lon: -0.1257 })
        );
    }

    #[test]
    fn test_current_optional_fields_fall_back() {
        let mut raw = london_current();
        let obj = raw.as_object_mut().unwrap();
        for field in ["coord", "visibility", "clouds", "sys", "timezone"] {
            obj.remove(field);
        }
        obj["wind"] = json!({"speed": 3.0});

        let weather = normalize_current(raw).unwrap();
        assert_eq!(weather.wind_direction, None);
        assert_eq!(weather.clouds, 0);
        assert_eq!(weather.visibility, None);
        assert_eq!(weather.country, "");
        assert_eq!(weather.sunrise, None);
        assert_eq!(weather.sunset, None);
        assert_eq!(weather.timezone_offset, 0);
        assert_eq!(weather.coordinates, None);
    }

    #[test]
    fn test_current_missing_required_field_is_malformed() {
        let mut raw = london_current();
        raw["main"].as_object_mut().unwrap().remove("temp");
        let err = normalize_current(raw).unwrap_err();
        match err {
            WeatherError::MalformedUpstreamResponse(msg) => assert!(msg.contains("main.temp")),
            other => panic!("unexpected error: {other:?}"),
        }

        let mut raw = london_current();
        raw["weather"] = json!([]);
        assert!(matches!(
            normalize_current(raw),
            Err(WeatherError::MalformedUpstreamResponse(_))
        ));

        let mut raw = london_current();
        raw.as_object_mut().unwrap().remove("name");
        assert!(matches!(
            normalize_current(raw),
            Err(WeatherError::MalformedUpstreamResponse(_))
        ));
    }

    #[test]
    fn test_current_wrong_type_is_malformed() {
        let mut raw = london_current();
        raw["main"]["temp"] = json!("warm");
        assert!(matches!(
            normalize_current(raw),
            Err(WeatherError::MalformedUpstreamResponse(_))
        ));
    }

    #[test]
    fn test_dominant_tie_goes_to_first_encountered() {
        let samples: Vec<_> = ["Rain", "Clear", "Rain", "Clear"]
            .iter()
            .map(|c| day_sample("2024-01-01", 10.0, c))
            .collect();
        let days = aggregate_days(&samples, 5);
        assert_eq!(days[0].condition, "Rain");
        assert_eq!(days[0].icon, "rain-icon");

        let samples: Vec<_> = ["Clear", "Rain", "Rain", "Clear"]
            .iter()
            .map(|c| day_sample("2024-01-01", 10.0, c))
            .collect();
        assert_eq!(aggregate_days(&samples, 5)[0].condition, "Clear");
    }

    #[test]
    fn test_dominant_majority_wins() {
        let samples: Vec<_> = ["Clouds", "Rain", "Rain"]
            .iter()
            .map(|c| day_sample("2024-01-01", 10.0, c))
            .collect();
        assert_eq!(aggregate_days(&samples, 5)[0].condition, "Rain");
    }

    #[test]
    fn test_daily_temperature_stats() {
        let samples = vec![
            day_sample("2024-01-01", 10.0, "Clear"),
            day_sample("2024-01-01", 14.0, "Clear"),
            day_sample("2024-01-01", 6.0, "Clear"),
            day_sample("2024-01-01", 12.0, "Clear"),
        ];
        let day = &aggregate_days(&samples, 1)[0];
        assert_eq!(day.date, "2024-01-01");
        assert_eq!(day.temp_avg, 10.5);
        assert_eq!(day.temp_min, 6.0);
        assert_eq!(day.temp_max, 14.0);
    }

    #[test]
    fn test_day_count_is_min_of_requested_and_present() {
        let samples: Vec<_> = (1..=6)
            .flat_map(|d| {
                let date = format!("2024-01-0{d}");
                (0..8).map(move |h| day_sample(&date, f64::from(h), "Clear"))
            })
            .collect();

        for requested in 0..=8usize {
            let days = aggregate_days(&samples, requested);
            assert_eq!(days.len(), requested.min(6));
            for (i, day) in days.iter().enumerate() {
                assert_eq!(day.date, format!("2024-01-0{}", i + 1));
            }
        }
    }

    #[test]
    fn test_days_keep_discovery_order() {
        let samples = vec![
            day_sample("2024-01-02", 1.0, "Clear"),
            day_sample("2024-01-01", 2.0, "Clear"),
            day_sample("2024-01-02", 3.0, "Clear"),
        ];
        let days = aggregate_days(&samples, 5);
        let dates: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-02", "2024-01-01"]);
        assert_eq!(days[0].temp_avg, 2.0);
    }

    #[test]
    fn test_day_without_conditions_has_empty_label() {
        let samples = vec![ForecastSample {
            date: "2024-01-01".to_string(),
            temp: 1.0,
            condition: None,
            icon: None,
        }];
        let day = &aggregate_days(&samples, 1)[0];
        assert_eq!(day.condition, "");
        assert_eq!(day.icon, "");
    }

    #[test]
    fn test_forecast_groups_by_dt_txt_and_truncates() {
        let raw = json!({
            "city": {"name": "London", "country": "GB", "timezone": 3600},
            "list": [
                sample("2024-01-01 18:00:00", 8.0, "Clouds", "04n"),
                sample("2024-01-01 21:00:00", 6.0, "Clouds", "04n"),
                sample("2024-01-02 00:00:00", 5.0, "Rain", "10n"),
                sample("2024-01-02 03:00:00", 4.0, "Rain", "10n"),
                sample("2024-01-03 00:00:00", 3.0, "Snow", "13n"),
            ]
        });

        let forecast = normalize_forecast(raw, 2).unwrap();
        assert_eq!(forecast.city, "London");
        assert_eq!(forecast.country, "GB");
        assert_eq!(forecast.timezone_offset, 3600);
        assert_eq!(forecast.days.len(), 2);
        assert_eq!(forecast.days[0].date, "2024-01-01");
        assert_eq!(forecast.days[0].temp_avg, 7.0);
        assert_eq!(forecast.days[0].condition, "Clouds");
        assert_eq!(forecast.days[1].date, "2024-01-02");
        assert_eq!(forecast.days[1].icon, "10n");
    }

    #[test]
    fn test_forecast_falls_back_to_utc_date_of_dt() {
        let raw = json!({
            "list": [
                {"dt": 1704067200, "main": {"temp": 1.0}, "weather": []},
                {"dt": 1704153600, "main": {"temp": 2.0}, "weather": []}
            ]
        });
        let forecast = normalize_forecast(raw, 5).unwrap();
        let dates: Vec<_> = forecast.days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02"]);
    }

    #[test]
    fn test_forecast_empty_list_is_not_an_error() {
        let forecast = normalize_forecast(json!({"list": []}), 5).unwrap();
        assert!(forecast.days.is_empty());
        assert_eq!(forecast.city, "");
        assert_eq!(forecast.country, "");
        assert_eq!(forecast.timezone_offset, 0);

        let forecast = normalize_forecast(json!({}), 5).unwrap();
        assert!(forecast.days.is_empty());
    }

    #[test]
    fn test_forecast_sample_without_temp_is_malformed() {
        let raw = json!({"list": [{"dt": 1704067200, "main": {}, "weather": []}]});
        let err = normalize_forecast(raw, 5).unwrap_err();
        match err {
            WeatherError::MalformedUpstreamResponse(msg) => {
                assert!(msg.contains("list[0].main.temp"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
