//! Built-in sample cities, shown until live or cached data is available.

use crate::types::CityWeather;

/// Cities fetched by default, in display order
pub const DEFAULT_CITIES: [&str; 5] = ["New York", "Tokyo", "Sydney", "London", "Nairobi"];

fn city(
    city: &str,
    country: &str,
    temperature: f64,
    humidity: f64,
    wind_speed: f64,
    precipitation: f64,
    condition: &str,
    lat: f64,
    lon: f64,
) -> CityWeather {
    CityWeather {
        city: city.to_string(),
        country: country.to_string(),
        temperature,
        humidity,
        wind_speed,
        precipitation,
        condition: condition.to_string(),
        lat,
        lon,
    }
}

pub fn sample_cities() -> Vec<CityWeather> {
    vec![
        city("New York", "USA", 18.0, 65.0, 4.5, 2.3, "Partly Cloudy", 40.7128, -74.0060),
        city("Tokyo", "Japan", 22.0, 70.0, 3.2, 0.5, "Clear Sky", 35.6762, 139.6503),
        city("Sydney", "Australia", 26.0, 55.0, 5.8, 0.0, "Sunny", -33.8688, 151.2093),
        city("London", "UK", 12.0, 80.0, 6.2, 5.1, "Rainy", 51.5074, -0.1278),
        city("Nairobi", "Kenya", 20.0, 60.0, 2.8, 1.2, "Partly Cloudy", -1.2921, 36.8219),
    ]
}

/// Find a city by exact name, falling back to the first entry.
///
/// Returns `None` only for an empty slice.
pub fn select_city<'a>(cities: &'a [CityWeather], name: &str) -> Option<&'a CityWeather> {
    cities
        .iter()
        .find(|c| c.city == name)
        .or_else(|| cities.first())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_sample_matches_default_city_order() {
        let names: Vec<_> = sample_cities().into_iter().map(|c| c.city).collect();
        assert_eq!(names, DEFAULT_CITIES);
    }

    #[test]
    fn test_sample_has_unique_names() {
        let cities = sample_cities();
        let mut names: Vec<_> = cities.iter().map(|c| c.city.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), cities.len());
    }

    #[test]
    fn test_select_known_city() {
        let cities = sample_cities();
        let london = select_city(&cities, "London").unwrap();
        assert_eq!(london.country, "UK");
        assert_eq!(london.precipitation, 5.1);
    }

    #[test]
    fn test_select_unknown_city_falls_back_to_first() {
        let cities = sample_cities();
        let selected = select_city(&cities, "Atlantis").unwrap();
        assert_eq!(selected.city, "New York");
    }

    #[test]
    fn test_select_is_case_sensitive() {
        let cities = sample_cities();
        assert_eq!(select_city(&cities, "tokyo").unwrap().city, "New York");
    }

    #[test]
    fn test_select_from_empty() {
        assert!(select_city(&[], "London").is_none());
    }
}
