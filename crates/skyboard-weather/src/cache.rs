//! Single-slot cache of the last successful fetch.
//!
//! Two keys: the serialized city array and its write time in milliseconds.
//! A read inside the freshness window returns the array unchanged; anything
//! else means "fetch again". Writes always overwrite both keys.

use chrono::{DateTime, Duration, Utc};
use skyboard_core::StorageError;

use crate::storage::Storage;
use crate::types::CityWeather;

pub const CACHE_KEY: &str = "weatherCache";
pub const CACHE_TIME_KEY: &str = "weatherCacheTime";

/// Default freshness window
pub fn freshness_window() -> Duration {
    Duration::hours(1)
}

#[derive(Debug)]
pub struct WeatherCache<S: Storage> {
    storage: S,
    window: Duration,
}

impl<S: Storage> WeatherCache<S> {
    pub fn new(storage: S) -> Self {
        Self::with_window(storage, freshness_window())
    }

    pub fn with_window(storage: S, window: Duration) -> Self {
        Self { storage, window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn stored_at(&self) -> Result<Option<i64>, StorageError> {
        let Some(raw) = self.storage.get(CACHE_TIME_KEY)? else {
            return Ok(None);
        };
        match raw.trim().parse::<i64>() {
            Ok(ms) => Ok(Some(ms)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable cache timestamp {:?}: {}", raw, e);
                Ok(None)
            }
        }
    }

    /// Age of the stored entry at `now`, if there is one. A timestamp too far
    /// from `now` to subtract counts as no entry.
    pub fn age(&self, now: DateTime<Utc>) -> Result<Option<Duration>, StorageError> {
        let Some(ms) = self.stored_at()? else {
            return Ok(None);
        };
        match now
            .timestamp_millis()
            .checked_sub(ms)
            .and_then(Duration::try_milliseconds)
        {
            Some(age) => Ok(Some(age)),
            None => {
                tracing::warn!("Ignoring out-of-range cache timestamp {}", ms);
                Ok(None)
            }
        }
    }

    /// Return the stored cities if both keys exist and the entry is younger
    /// than the window.
    pub fn load_fresh(&self, now: DateTime<Utc>) -> Result<Option<Vec<CityWeather>>, StorageError> {
        let Some(age) = self.age(now)? else {
            return Ok(None);
        };
        if age >= self.window {
            tracing::debug!("Weather cache is stale ({}s old)", age.num_seconds());
            return Ok(None);
        }

        let Some(payload) = self.storage.get(CACHE_KEY)? else {
            return Ok(None);
        };
        let cities = serde_json::from_str(&payload).map_err(|e| StorageError::Corrupt {
            key: CACHE_KEY.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(cities))
    }

    /// Overwrite the slot with `cities`, stamped at `now`.
    pub fn store(&self, cities: &[CityWeather], now: DateTime<Utc>) -> Result<(), StorageError> {
        let payload = serde_json::to_string(cities).map_err(|e| StorageError::WriteFailed {
            key: CACHE_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.storage.set(CACHE_KEY, &payload)?;
        self.storage
            .set(CACHE_TIME_KEY, &now.timestamp_millis().to_string())?;
        tracing::info!("Cached weather for {} cities", cities.len());
        Ok(())
    }
}
