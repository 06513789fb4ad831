use crate::types::{CityQuery, ForecastResponse, WeatherError, WeatherQuery, WeatherResponse};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const CURRENT_WEATHER_PATH: &str = "/api/current_weather";
pub const FORECAST_PATH: &str = "/api/weather_forecast";

/// Client for the weather backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: Url,
}

impl WeatherProvider {
    /// Build a provider for `base_url`.
    ///
    /// With `timeout` unset the request waits as long as the HTTP stack allows.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, WeatherError> {
        let base_url = Url::parse(base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full request URL for a current-weather lookup.
    pub fn current_weather_url(&self, query: &WeatherQuery) -> Result<Url, WeatherError> {
        let mut url = self.base_url.join(CURRENT_WEATHER_PATH)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.query_pairs() {
                pairs.append_pair(key, &value);
            }
        }
        Ok(url)
    }

    pub fn forecast_url(&self, city: &CityQuery) -> Result<Url, WeatherError> {
        let mut url = self.base_url.join(FORECAST_PATH)?;
        url.query_pairs_mut().append_pair("location", &city.location);
        Ok(url)
    }

    /// Fetch current weather.
    ///
    /// The HTTP status is not inspected: the backend reports failures in the
    /// body, including on 4xx answers.
    pub async fn current_weather(
        &self,
        query: &WeatherQuery,
    ) -> Result<WeatherResponse, WeatherError> {
        let url = self.current_weather_url(query)?;
        let body = self.get_json(url).await?;
        WeatherResponse::from_value(body)
    }

    /// Fetch the multi-slot forecast for a city.
    pub async fn forecast(&self, city: &CityQuery) -> Result<ForecastResponse, WeatherError> {
        let url = self.forecast_url(city)?;
        let body = self.get_json(url).await?;
        ForecastResponse::from_value(body)
    }

    async fn get_json(&self, url: Url) -> Result<Value, WeatherError> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        tracing::debug!("Backend answered {} ({} bytes)", status, bytes.len());

        serde_json::from_slice(&bytes).map_err(|e| WeatherError::Parse(e.to_string()))
    }
}
