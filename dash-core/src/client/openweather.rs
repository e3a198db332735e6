use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

use crate::{
    config::{DEFAULT_BASE_URL, Units},
    error::LookupError,
    model::{Condition, ForecastEntry, ForecastSnapshot, WeatherSnapshot},
};

use super::WeatherClient;

/// OpenWeatherMap `data/2.5` client.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    units: Units,
    http: Client,
}

#[derive(Debug)]
pub struct OpenWeatherClientBuilder {
    api_key: String,
    base_url: String,
    units: Units,
    timeout: Duration,
}

impl OpenWeatherClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> anyhow::Result<OpenWeatherClient> {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(OpenWeatherClient {
            api_key: self.api_key,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            units: self.units,
            http,
        })
    }
}

impl OpenWeatherClient {
    pub fn builder(api_key: impl Into<String>) -> OpenWeatherClientBuilder {
        OpenWeatherClientBuilder {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            units: Units::default(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn units(&self) -> Units {
        self.units
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
    ) -> Result<T, LookupError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        let url = format!("{}/data/2.5/{endpoint}", self.base_url);
        debug!(%url, city, "requesting OpenWeather {endpoint}");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        let body = res.text().await.map_err(transport_error)?;

        match status {
            s if s.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(LookupError::CityNotFound {
                    city: city.to_string(),
                });
            }
            StatusCode::UNAUTHORIZED => return Err(LookupError::Unauthorized),
            s => {
                return Err(LookupError::Provider {
                    status: s.as_u16(),
                    message: provider_message(&body),
                });
            }
        }

        serde_json::from_str(&body).map_err(decode_error)
    }
}

fn transport_error(err: reqwest::Error) -> LookupError {
    LookupError::Transport(err.to_string())
}

fn decode_error(err: serde_json::Error) -> LookupError {
    LookupError::Decode(err.to_string())
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u32,
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

fn first_condition(weather: Vec<OwWeather>) -> Condition {
    weather
        .into_iter()
        .next()
        .map(|w| Condition {
            id: w.id,
            main: w.main,
            description: w.description,
            icon: w.icon,
        })
        .unwrap_or_else(Condition::unknown)
}

impl From<OwCurrentResponse> for WeatherSnapshot {
    fn from(parsed: OwCurrentResponse) -> Self {
        Self {
            name: parsed.name,
            country: parsed.sys.country,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            condition: first_condition(parsed.weather),
        }
    }
}

impl TryFrom<OwForecastEntry> for ForecastEntry {
    type Error = LookupError;

    fn try_from(entry: OwForecastEntry) -> Result<Self, Self::Error> {
        let dt = entry.dt;
        let Some(timestamp) = unix_to_utc(dt) else {
            return Err(LookupError::Decode(format!("bad forecast timestamp {dt}")));
        };

        Ok(Self {
            timestamp,
            display_time: entry.dt_txt,
            temperature: entry.main.temp,
            feels_like: entry.main.feels_like,
            humidity_pct: entry.main.humidity,
            wind_speed: entry.wind.speed,
            condition: first_condition(entry.weather),
        })
    }
}

impl TryFrom<OwForecastResponse> for ForecastSnapshot {
    type Error = LookupError;

    fn try_from(parsed: OwForecastResponse) -> Result<Self, Self::Error> {
        let entries = parsed
            .list
            .into_iter()
            .map(ForecastEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: parsed.city.name,
            country: parsed.city.country,
            entries,
        })
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn fetch_current(&self, city: &str) -> Result<WeatherSnapshot, LookupError> {
        let parsed: OwCurrentResponse = self.get_json("weather", city).await?;
        Ok(parsed.into())
    }

    async fn fetch_forecast(&self, city: &str) -> Result<ForecastSnapshot, LookupError> {
        let parsed: OwForecastResponse = self.get_json("forecast", city).await?;
        parsed.try_into()
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

/// Prefer the provider's own `message`; fall back to the raw body.
fn provider_message(body: &str) -> String {
    match serde_json::from_str::<OwErrorBody>(body) {
        Ok(err) => err.message,
        Err(_) => truncate_body(body),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_response_maps_first_condition_and_country() {
        let json = r#"{
            "name": "Paris",
            "main": {"temp": 18.2, "feels_like": 17.5, "humidity": 64},
            "weather": [
                {"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"},
                {"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}
            ],
            "wind": {"speed": 3.6},
            "sys": {"country": "FR"}
        }"#;

        let parsed: OwCurrentResponse = serde_json::from_str(json).unwrap();
        let snapshot = WeatherSnapshot::from(parsed);

        assert_eq!(snapshot.name, "Paris");
        assert_eq!(snapshot.country, "FR");
        assert_eq!(snapshot.humidity_pct, 64);
        assert_eq!(snapshot.condition.main, "Clouds");
        assert_eq!(snapshot.condition.id, 803);
    }

    #[test]
    fn empty_weather_array_maps_to_unknown() {
        let json = r#"{
            "name": "Nowhere",
            "main": {"temp": 1.0, "feels_like": 0.0, "humidity": 10},
            "weather": [],
            "wind": {"speed": 0.0}
        }"#;

        let parsed: OwCurrentResponse = serde_json::from_str(json).unwrap();
        let snapshot = WeatherSnapshot::from(parsed);

        assert_eq!(snapshot.condition, Condition::unknown());
        assert_eq!(snapshot.country, "");
    }

    #[test]
    fn provider_message_prefers_json_message() {
        let json = r#"{"cod":"500","message":"boom"}"#;
        assert_eq!(provider_message(json), "boom");
        assert_eq!(provider_message("plain failure"), "plain failure");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }
}
