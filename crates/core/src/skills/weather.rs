//! Weather skill: reports current conditions for a place named in the request.

use crate::{
    config::WeatherSettings,
    skill::{Skill, SkillError, capitalize, contains_any, title_case},
    weather_client::{WeatherApi, WeatherError},
};
use tracing::{error, info};

const KEYWORDS: &[&str] = &[
    "weather",
    "temperature",
    "forecast",
    "rain",
    "sunny",
    "cloudy",
];
/// Checked in priority order; the text after the last occurrence is the place.
const PREPOSITIONS: &[&str] = &[" in ", " for ", " at "];

pub const SETUP_INSTRUCTIONS: &str = "Weather service not configured. Please:\n\
1. Get a free API key from: https://openweathermap.org/api\n\
2. Add it to config.yaml under skills.weather.api_key";

pub struct WeatherSkill<W: WeatherApi> {
    api: W,
    settings: WeatherSettings,
}

impl<W: WeatherApi> WeatherSkill<W> {
    pub fn new(settings: WeatherSettings, api: W) -> Self {
        Self { api, settings }
    }

    fn unit_suffix(&self) -> &'static str {
        if self.settings.units == "metric" {
            "°C"
        } else {
            "°F"
        }
    }
}

/// Pulls a place name out of requests like "what's the weather in Paris?".
pub fn extract_location(text: &str) -> Option<String> {
    let text_lower = text.to_lowercase();
    let prep = PREPOSITIONS.iter().find(|p| text_lower.contains(**p))?;
    let after = text_lower.rsplit(*prep).next()?;
    let location = after
        .trim()
        .trim_matches(|c: char| matches!(c, '?' | '.' | ',' | '!'));
    if location.is_empty() {
        None
    } else {
        Some(title_case(location))
    }
}

impl<W: WeatherApi> Skill for WeatherSkill<W> {
    fn recognize(&self, text: &str) -> bool {
        contains_any(&text.to_lowercase(), KEYWORDS)
    }

    fn execute(&self, text: &str) -> Result<String, SkillError> {
        let Some(api_key) = self.settings.configured_api_key() else {
            return Ok(SETUP_INSTRUCTIONS.to_string());
        };

        let location =
            extract_location(text).unwrap_or_else(|| self.settings.default_location.clone());

        let report = match self.api.current(&location, api_key, &self.settings.units) {
            Ok(report) => report,
            Err(WeatherError::Request(e)) => {
                error!(location = %location, error = %e, "Weather API error");
                return Ok(format!(
                    "Sorry, I couldn't fetch the weather data. Error: {e}"
                ));
            }
            Err(WeatherError::Parse(e)) => {
                error!(location = %location, error = %e, "Weather data parsing error");
                return Ok(format!(
                    "Sorry, I couldn't parse the weather data for {location}"
                ));
            }
        };

        info!(location = %location, "Weather fetched");
        let unit = self.unit_suffix();
        Ok(format!(
            "Weather in {location}:\n\
             • Conditions: {}\n\
             • Temperature: {:.1}{unit} (feels like {:.1}{unit})\n\
             • Humidity: {}%",
            capitalize(&report.description),
            report.temperature,
            report.feels_like,
            report.humidity,
        ))
    }

    fn describe(&self) -> String {
        "Get weather information (e.g., 'what's the weather in Tokyo?')".to_string()
    }
}
