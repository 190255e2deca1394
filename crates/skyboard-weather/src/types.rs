use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use skyboard_core::{AppError, NetworkError, ReqwestErrorExt, StorageError};
use std::collections::BTreeMap;

/// One city's current weather snapshot.
///
/// Built either from the sample dataset or from a fetch; the next fetch
/// replaces the whole array rather than patching records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityWeather {
    pub city: String,
    pub country: String,
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity, percent
    pub humidity: f64,
    /// Metres per second
    pub wind_speed: f64,
    /// Millimetres over the last hour
    pub precipitation: f64,
    pub condition: String,
    pub lat: f64,
    pub lon: f64,
}

/// Geographic coordinates in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One day of the temperature trend: a date label plus a value per city.
///
/// Serializes flat, e.g. `{"date": "Oct 19", "London": 12.4, "Tokyo": 21.7}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl HistoricalPoint {
    pub fn value(&self, city: &str) -> Option<f64> {
        self.values.get(city).copied()
    }
}

/// A row of the static historical blob (`data/weather_data.json`).
///
/// The exporter also writes humidity and precipitation columns; only the
/// temperature feeds the trend series, so the rest are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoricalRecord {
    /// ISO-8601 timestamp
    pub date: String,
    pub city: String,
    pub temp: f64,
}

impl HistoricalRecord {
    /// Calendar day of the record, if the timestamp starts with `YYYY-MM-DD`
    pub fn day(&self) -> Option<NaiveDate> {
        self.date
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }
}

/// A forecast row as produced by the offline forecasting job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub ds: String,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

impl ForecastPoint {
    pub fn day(&self) -> Option<NaiveDate> {
        self.ds
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }
}

/// Where the city array currently held in memory came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Sample,
    Cached,
    Live,
}

impl DataSource {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Sample => "sample data",
            Self::Cached => "cached data",
            Self::Live => "live data",
        }
    }
}

/// Weather data errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
    #[error("Location not found: {0}")]
    LocationNotFound(String),
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Rate limited by weather API")]
    RateLimited,
    #[error("Weather API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.into_network_error())
    }
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(e) => e.user_message(),
            Self::LocationNotFound(_) => "City not found. Check the city list in your settings.",
            Self::InvalidApiKey => "Weather API key is invalid. Check settings.",
            Self::RateLimited => "Weather service is busy. Showing the last data we had.",
            Self::Api { status, .. } if *status >= 500 => {
                "Weather service unavailable. Please try again later."
            }
            Self::Api { .. } => "Weather service error. Please try again.",
            Self::Parse(_) => "Weather service sent data we could not read.",
            Self::Storage(e) => e.user_message(),
        }
    }

    /// Informational only; nothing in the refresh flow retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(NetworkError::Timeout | NetworkError::ConnectionFailed(_)) => true,
            Self::RateLimited => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Lower a weather error onto the application error the binary reports.
impl From<WeatherError> for AppError {
    fn from(e: WeatherError) -> Self {
        match e {
            WeatherError::Network(e) => AppError::Network(e),
            WeatherError::Storage(e) => AppError::Storage(e),
            WeatherError::InvalidApiKey => AppError::Network(NetworkError::ServerError {
                status: 401,
                message: "invalid API key".to_string(),
            }),
            WeatherError::RateLimited => AppError::Network(NetworkError::ServerError {
                status: 429,
                message: "rate limited".to_string(),
            }),
            WeatherError::Api { status, message } => {
                AppError::Network(NetworkError::ServerError { status, message })
            }
            WeatherError::LocationNotFound(city) => {
                AppError::Network(NetworkError::InvalidResponse(format!("no location for {}", city)))
            }
            WeatherError::Parse(message) => {
                AppError::Network(NetworkError::InvalidResponse(message))
            }
        }
    }
}
