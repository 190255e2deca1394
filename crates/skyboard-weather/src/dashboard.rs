//! In-memory dashboard state and the refresh flow that feeds it.
//!
//! Every failure is logged and leaves the previous state in place; there is
//! no retry and no partial update.

use chrono::{DateTime, Utc};

use crate::cache::WeatherCache;
use crate::dataset::{sample_cities, select_city};
use crate::history::{generate_historical_now, pivot_records};
use crate::provider::WeatherProvider;
use crate::static_data::StaticDataClient;
use crate::storage::Storage;
use crate::types::{CityWeather, DataSource, ForecastPoint, HistoricalPoint};

pub struct Dashboard<S: Storage> {
    cache: WeatherCache<S>,
    provider: Option<WeatherProvider>,
    static_client: Option<StaticDataClient>,
    city_names: Vec<String>,
    cities: Vec<CityWeather>,
    historical: Vec<HistoricalPoint>,
    /// True until the static historical blob replaces the generated series
    synthetic_history: bool,
    forecast: Vec<ForecastPoint>,
    selected: String,
    source: DataSource,
}

impl<S: Storage> Dashboard<S> {
    /// Start from the sample dataset with a synthetic trend series.
    ///
    /// `provider` is `None` when no API key is configured or the caller is
    /// offline; `static_client` is `None` when offline.
    pub fn new(
        cache: WeatherCache<S>,
        provider: Option<WeatherProvider>,
        static_client: Option<StaticDataClient>,
        city_names: Vec<String>,
    ) -> Self {
        let cities = sample_cities();
        let historical = generate_historical_now(&cities);
        let selected = city_names
            .first()
            .cloned()
            .or_else(|| cities.first().map(|c| c.city.clone()))
            .unwrap_or_default();

        let mut dashboard = Self {
            cache,
            provider,
            static_client,
            city_names,
            cities,
            historical,
            synthetic_history: true,
            forecast: Vec::new(),
            selected,
            source: DataSource::Sample,
        };
        let initial = dashboard.selected.clone();
        dashboard.select_city(&initial);
        dashboard
    }

    pub fn cities(&self) -> &[CityWeather] {
        &self.cities
    }

    pub fn historical(&self) -> &[HistoricalPoint] {
        &self.historical
    }

    pub fn forecast(&self) -> &[ForecastPoint] {
        &self.forecast
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn cache(&self) -> &WeatherCache<S> {
        &self.cache
    }

    pub fn selected_name(&self) -> &str {
        &self.selected
    }

    pub fn selected_city(&self) -> Option<&CityWeather> {
        select_city(&self.cities, &self.selected)
    }

    /// Select a city by name. Unknown names fall back to the first city.
    /// Clears the forecast; `refresh_static` reloads it for the new city.
    pub fn select_city(&mut self, name: &str) {
        let resolved = select_city(&self.cities, name).map(|c| c.city.clone());
        match resolved {
            Some(city) => {
                if city != name {
                    tracing::debug!("Unknown city {:?}, showing {}", name, city);
                }
                if city != self.selected {
                    self.forecast.clear();
                }
                self.selected = city;
            }
            None => tracing::warn!("No cities loaded; cannot select {:?}", name),
        }
    }

    fn replace_cities(&mut self, cities: Vec<CityWeather>, source: DataSource) {
        self.cities = cities;
        self.source = source;
        if self.synthetic_history {
            self.historical = generate_historical_now(&self.cities);
        }
        let current = self.selected.clone();
        self.select_city(&current);
    }

    /// Load current conditions: cache first, then the network.
    ///
    /// With `force` the freshness check is skipped. Returns where the
    /// resulting city array came from.
    pub async fn refresh_current(&mut self, now: DateTime<Utc>, force: bool) -> DataSource {
        if !force {
            match self.cache.load_fresh(now) {
                Ok(Some(cities)) => {
                    tracing::info!("Using cached weather for {} cities", cities.len());
                    self.replace_cities(cities, DataSource::Cached);
                    return self.source;
                }
                Ok(None) => tracing::debug!("No fresh cached weather"),
                Err(e) => tracing::warn!("Ignoring weather cache: {}", e),
            }
        }

        let Some(provider) = &self.provider else {
            tracing::warn!(
                "Live weather unavailable (no API key or offline); showing {}",
                self.source.description()
            );
            return self.source;
        };

        let result = provider.fetch_all(&self.city_names).await;
        match result {
            Ok(cities) => {
                self.replace_cities(cities, DataSource::Live);
                if let Err(e) = self.cache.store(&self.cities, now) {
                    tracing::error!("Failed to cache weather: {}", e);
                }
            }
            Err(e) => {
                tracing::error!("Weather fetch failed: {} ({})", e, e.user_message());
            }
        }
        self.source
    }

    /// Load the historical blob and the selected city's forecast.
    pub async fn refresh_static(&mut self) {
        let Some(client) = &self.static_client else {
            tracing::debug!("Static data disabled; keeping synthetic trends");
            return;
        };

        match client.historical().await {
            Ok(records) => {
                let names: Vec<String> = self.cities.iter().map(|c| c.city.clone()).collect();
                let points = pivot_records(&records, &names);
                if points.is_empty() {
                    tracing::warn!("Historical data has no rows for the current cities");
                } else {
                    self.historical = points;
                    self.synthetic_history = false;
                }
            }
            Err(e) => tracing::error!("Error fetching historical data: {}", e),
        }

        match client.forecast(&self.selected).await {
            Ok(points) => self.forecast = points,
            Err(e) => tracing::error!("Error fetching forecast for {}: {}", self.selected, e),
        }
    }
}
