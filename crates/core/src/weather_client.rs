//! Weather Backend
//!
//! Fetches current conditions from the OpenWeatherMap REST API.

use serde::Deserialize;
use std::time::Duration;

const OPENWEATHERMAP_URL: &str = "http://api.openweathermap.org/data/2.5/weather";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// The request failed or the service answered with an error status.
    #[error("{0}")]
    Request(String),
    /// The service answered but the payload lacked an expected field.
    #[error("unexpected weather data: {0}")]
    Parse(String),
}

/// The fields the weather skill reports.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub description: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u32,
}

/// A source of current weather conditions.
#[cfg_attr(test, mockall::automock)]
pub trait WeatherApi {
    fn current(
        &self,
        location: &str,
        api_key: &str,
        units: &str,
    ) -> Result<WeatherReport, WeatherError>;
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    weather: Vec<Condition>,
    main: MainReadings,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    feels_like: f64,
    humidity: u32,
}

/// Parses an OpenWeatherMap "current weather" body.
fn parse_current_weather(body: &str) -> Result<WeatherReport, WeatherError> {
    let data: CurrentWeather =
        serde_json::from_str(body).map_err(|e| WeatherError::Parse(e.to_string()))?;
    let description = data
        .weather
        .into_iter()
        .next()
        .map(|c| c.description)
        .ok_or_else(|| WeatherError::Parse("empty 'weather' list".to_string()))?;
    Ok(WeatherReport {
        description,
        temperature: data.main.temp,
        feels_like: data.main.feels_like,
        humidity: data.main.humidity,
    })
}

pub struct OpenWeatherMapClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl OpenWeatherMapClient {
    pub fn new() -> Result<Self, WeatherError> {
        Self::with_base_url(OPENWEATHERMAP_URL)
    }

    /// Creates a client against a custom endpoint (e.g. a proxy or mock server).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, WeatherError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WeatherError::Request(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

impl WeatherApi for OpenWeatherMapClient {
    fn current(
        &self,
        location: &str,
        api_key: &str,
        units: &str,
    ) -> Result<WeatherReport, WeatherError> {
        let body = self
            .http
            .get(&self.base_url)
            .query(&[("q", location), ("appid", api_key), ("units", units)])
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| WeatherError::Request(e.to_string()))?;
        parse_current_weather(&body)
    }
}
