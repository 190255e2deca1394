//! OpenWeatherMap client: geocode each city, then fetch its current conditions.

use futures::future::try_join_all;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

use skyboard_core::config::{DEFAULT_GEO_BASE_URL, DEFAULT_WEATHER_BASE_URL};

use crate::http::{build_client, handle_response};
use crate::types::{CityWeather, Coordinates, WeatherError};

#[derive(Debug, Deserialize)]
struct GeoResult {
    lat: f64,
    lon: f64,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    main: MainBlock,
    #[serde(default)]
    wind: Option<WindBlock>,
    #[serde(default)]
    rain: Option<RainBlock>,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
    #[serde(default)]
    sys: Option<SysBlock>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct RainBlock {
    #[serde(rename = "1h", default)]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct SysBlock {
    #[serde(default)]
    country: Option<String>,
}

/// "broken clouds" -> "Broken Clouds"
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    api_key: String,
    geo_base_url: String,
    weather_base_url: String,
}

impl WeatherProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, WeatherError> {
        Self::with_base_urls(api_key, DEFAULT_GEO_BASE_URL, DEFAULT_WEATHER_BASE_URL)
    }

    pub fn with_base_urls(
        api_key: impl Into<String>,
        geo_base_url: &str,
        weather_base_url: &str,
    ) -> Result<Self, WeatherError> {
        Ok(Self {
            client: Arc::new(build_client()?),
            api_key: api_key.into(),
            geo_base_url: geo_base_url.trim_end_matches('/').to_string(),
            weather_base_url: weather_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a city name to coordinates via the direct geocoding endpoint.
    #[instrument(skip(self), level = "info")]
    pub async fn geocode(&self, city: &str) -> Result<Coordinates, WeatherError> {
        self.geocode_with_country(city).await.map(|(coords, _)| coords)
    }

    async fn geocode_with_country(
        &self,
        city: &str,
    ) -> Result<(Coordinates, Option<String>), WeatherError> {
        let url = format!("{}/geo/1.0/direct", self.geo_base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("limit", "1"), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let results: Vec<GeoResult> = handle_response(response).await?;
        let first = results
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::LocationNotFound(city.to_string()))?;

        tracing::debug!("Geocoded {} to {}, {}", city, first.lat, first.lon);
        Ok((
            Coordinates {
                lat: first.lat,
                lon: first.lon,
            },
            first.country,
        ))
    }

    /// Fetch current conditions at `coords`, labelled as `city`.
    #[instrument(skip(self), level = "info")]
    pub async fn current(
        &self,
        city: &str,
        coords: Coordinates,
    ) -> Result<CityWeather, WeatherError> {
        let url = format!("{}/data/2.5/weather", self.weather_base_url);
        let lat = coords.lat.to_string();
        let lon = coords.lon.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let body: CurrentResponse = handle_response(response).await?;

        let condition = body
            .weather
            .first()
            .map(|w| title_case(&w.description))
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(CityWeather {
            city: city.to_string(),
            country: body.sys.and_then(|s| s.country).unwrap_or_default(),
            temperature: body.main.temp,
            humidity: body.main.humidity,
            wind_speed: body.wind.map(|w| w.speed).unwrap_or(0.0),
            precipitation: body.rain.and_then(|r| r.one_hour).unwrap_or(0.0),
            condition,
            lat: coords.lat,
            lon: coords.lon,
        })
    }

    /// Geocode then fetch current conditions for one city.
    pub async fn fetch_city(&self, city: &str) -> Result<CityWeather, WeatherError> {
        let (coords, geo_country) = self.geocode_with_country(city).await?;
        let mut weather = self.current(city, coords).await?;
        if weather.country.is_empty() {
            weather.country = geo_country.unwrap_or_default();
        }
        Ok(weather)
    }

    /// Fetch every city concurrently. All-or-nothing: the first failure
    /// aborts the batch. Results keep input order.
    #[instrument(skip(self, cities), fields(count = cities.len()), level = "info")]
    pub async fn fetch_all<S: AsRef<str>>(
        &self,
        cities: &[S],
    ) -> Result<Vec<CityWeather>, WeatherError> {
        let requests = cities.iter().map(|c| self.fetch_city(c.as_ref()));
        let results = try_join_all(requests).await?;
        tracing::info!("Fetched current weather for {} cities", results.len());
        Ok(results)
    }
}
