use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config, ForecastSnapshot, LookupError, WeatherSnapshot, client::openweather::OpenWeatherClient,
};

pub mod openweather;

/// Read-only access to a weather provider. Each call is a single attempt:
/// there are no retries, and the first failure is returned.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    /// Current conditions for `city`.
    async fn fetch_current(&self, city: &str) -> Result<WeatherSnapshot, LookupError>;

    /// Multi-day forecast for `city`.
    async fn fetch_forecast(&self, city: &str) -> Result<ForecastSnapshot, LookupError>;
}

/// Construct the OpenWeatherMap client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.resolve_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeatherMap API key configured.\n\
                 Hint: run `weather-dash configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    let client = OpenWeatherClient::builder(api_key)
        .units(config.units)
        .timeout(config.timeout())
        .base_url(config.base_url())
        .build()?;

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        // The environment may carry a real key; only assert when it does not.
        if std::env::var(crate::config::API_KEY_ENV).is_err() {
            let err = client_from_config(&cfg).unwrap_err();
            assert!(err.to_string().contains("No OpenWeatherMap API key configured"));
        }
    }

    #[test]
    fn client_from_config_works_when_key_present() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            ..Config::default()
        };
        assert!(client_from_config(&cfg).is_ok());
    }
}
