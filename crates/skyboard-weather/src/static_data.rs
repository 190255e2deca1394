//! Pre-computed historical and forecast blobs served from a static file host.

use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tracing::instrument;

use crate::http::{build_client, handle_response};
use crate::types::{ForecastPoint, HistoricalRecord, WeatherError};

/// File-name slug for a city's forecast blob: "New York" -> "new_york"
pub fn forecast_slug(city: &str) -> String {
    city.trim().to_lowercase().replace(' ', "_")
}

#[derive(Debug, Clone)]
pub struct StaticDataClient {
    client: Arc<Client>,
    base_url: String,
}

impl StaticDataClient {
    pub fn new(base_url: &str) -> Result<Self, WeatherError> {
        Ok(Self {
            client: Arc::new(build_client()?),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch `data/weather_data.json`.
    #[instrument(skip(self), level = "info")]
    pub async fn historical(&self) -> Result<Vec<HistoricalRecord>, WeatherError> {
        let url = format!("{}/data/weather_data.json", self.base_url);
        let response = self.client.get(&url).send().await?;
        let records: Vec<HistoricalRecord> = handle_response(response).await?;
        tracing::debug!("Loaded {} historical rows", records.len());
        Ok(records)
    }

    /// Fetch the forecast blob for `city`. A city with no blob yields an
    /// empty forecast.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast(&self, city: &str) -> Result<Vec<ForecastPoint>, WeatherError> {
        let url = format!("{}/data/forecast_{}.json", self.base_url, forecast_slug(city));
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::info!("No forecast published for {}", city);
            return Ok(Vec::new());
        }

        handle_response(response).await
    }
}
