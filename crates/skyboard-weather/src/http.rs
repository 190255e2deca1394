use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::types::WeatherError;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "Skyboard/0.1.0";

pub(crate) fn build_client() -> Result<Client, WeatherError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?)
}

/// Map status codes to typed errors and decode successful bodies.
pub(crate) async fn handle_response<T: DeserializeOwned>(
    response: Response,
) -> Result<T, WeatherError> {
    let status = response.status();

    if status.is_success() {
        let body = response.text().await?;
        return serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()));
    }

    match status {
        StatusCode::UNAUTHORIZED => Err(WeatherError::InvalidApiKey),
        StatusCode::TOO_MANY_REQUESTS => Err(WeatherError::RateLimited),
        _ => {
            let message = response.text().await.unwrap_or_default();
            Err(WeatherError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
