//! Claire Core
//!
//! The command dispatch and conversation-state engine of the Claire personal
//! assistant. Front-ends hand raw text to [`assistant::Assistant::process`] and
//! render the reply; everything else in this crate supports that call.

pub mod assistant;
pub mod config;
pub mod conversation;
pub mod launcher;
pub mod llm_client;
pub mod skill;
pub mod skills;
pub mod weather_client;

pub use assistant::Assistant;
pub use config::AppConfig;
