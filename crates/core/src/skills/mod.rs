//! Built-in skills and their registration from configuration.

pub mod system;
pub mod weather;

use crate::{
    config::SkillsSettings, launcher::OsLauncher, skill::SkillRegistry,
    weather_client::OpenWeatherMapClient,
};
use system::SystemControlSkill;
use tracing::{error, info};
use weather::WeatherSkill;

/// Builds the registry from the `skills` section. Weather is registered
/// before system control, so it wins when both recognize an utterance.
pub fn load_skills(settings: &SkillsSettings) -> SkillRegistry {
    let mut registry = SkillRegistry::new();

    if settings.weather.enabled {
        match OpenWeatherMapClient::new() {
            Ok(api) => {
                registry.register(
                    "weather",
                    Box::new(WeatherSkill::new(settings.weather.clone(), api)),
                );
                info!("Weather skill loaded");
            }
            Err(e) => error!(error = %e, "Failed to load weather skill"),
        }
    }

    if settings.system_control.enabled {
        registry.register(
            "system",
            Box::new(SystemControlSkill::new(
                &settings.system_control,
                OsLauncher,
            )),
        );
        info!("System control skill loaded");
    }

    info!(count = registry.len(), "Skills loaded");
    registry
}
