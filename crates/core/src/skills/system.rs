//! System-control skill: opens desktop applications by name.

use crate::{
    config::SystemControlSettings,
    launcher::AppLauncher,
    skill::{Skill, SkillError, contains_any, title_case},
};
use tracing::{error, info};

const KEYWORDS: &[&str] = &[
    "open", "launch", "start", "close", "shutdown", "restart", "volume",
];
const OPEN_WORDS: &[&str] = &["open", "launch", "start"];

/// Known applications and their launch targets. The first entry whose name
/// occurs in the request wins, so order matters.
pub const APPLICATIONS: &[(&str, &str)] = &[
    ("notepad", "notepad.exe"),
    ("calculator", "calc.exe"),
    ("chrome", "chrome.exe"),
    ("edge", "msedge.exe"),
    ("firefox", "firefox.exe"),
    ("explorer", "explorer.exe"),
    ("file explorer", "explorer.exe"),
    ("cmd", "cmd.exe"),
    ("command prompt", "cmd.exe"),
    ("powershell", "powershell.exe"),
    ("terminal", "wt.exe"),
];

pub const UNKNOWN_APPLICATION_REPLY: &str = "I couldn't identify which application you want to open. Try: 'open notepad' or 'open chrome'";
pub const SHUTDOWN_DISABLED_REPLY: &str =
    "Shutdown/restart commands are disabled in settings for safety.";

pub struct SystemControlSkill<L: AppLauncher> {
    launcher: L,
    applications: Vec<(String, String)>,
    allow_shutdown: bool,
}

impl<L: AppLauncher> SystemControlSkill<L> {
    pub fn new(settings: &SystemControlSettings, launcher: L) -> Self {
        Self::with_applications(settings, launcher, APPLICATIONS)
    }

    /// Uses a custom application table instead of [`APPLICATIONS`].
    pub fn with_applications(
        settings: &SystemControlSettings,
        launcher: L,
        applications: &[(&str, &str)],
    ) -> Self {
        Self {
            launcher,
            applications: applications
                .iter()
                .map(|(name, target)| (name.to_lowercase(), target.to_string()))
                .collect(),
            allow_shutdown: settings.allow_shutdown,
        }
    }

    fn open_application(&self, text_lower: &str) -> String {
        let Some((name, target)) = self
            .applications
            .iter()
            .find(|(name, _)| text_lower.contains(name.as_str()))
        else {
            return UNKNOWN_APPLICATION_REPLY.to_string();
        };

        match self.launcher.launch(target) {
            Ok(()) => {
                info!(app = %name, target = %target, "Application launched");
                format!("Opening {}...", title_case(name))
            }
            Err(e) => {
                error!(app = %name, error = %e, "Failed to open application");
                format!("Sorry, I couldn't open {name}: {e}")
            }
        }
    }
}

impl<L: AppLauncher> Skill for SystemControlSkill<L> {
    fn recognize(&self, text: &str) -> bool {
        contains_any(&text.to_lowercase(), KEYWORDS)
    }

    fn execute(&self, text: &str) -> Result<String, SkillError> {
        let text_lower = text.to_lowercase();

        if text_lower.contains("shutdown") || text_lower.contains("restart") {
            if !self.allow_shutdown {
                return Ok(SHUTDOWN_DISABLED_REPLY.to_string());
            }
            return Ok("Shutdown/restart commands coming soon!".to_string());
        }

        if contains_any(&text_lower, OPEN_WORDS) {
            return Ok(self.open_application(&text_lower));
        }

        if text_lower.contains("volume") {
            return Ok("Volume control coming soon!".to_string());
        }

        Ok("I'm not sure how to handle that system command yet.".to_string())
    }

    fn describe(&self) -> String {
        "Control system (e.g., 'open notepad', 'launch chrome')".to_string()
    }
}
