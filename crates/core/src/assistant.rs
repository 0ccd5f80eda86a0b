//! Assistant Core
//!
//! The dispatcher behind every front-end. Each call to [`Assistant::process`]
//! records the user's turn, routes the text to the first handler that accepts
//! it, records the reply, and returns it:
//!
//! 1. built-in commands (greeting, time, date, help, farewell),
//! 2. the first registered skill that recognizes the text,
//! 3. the language-model backend, when one is connected,
//! 4. a static explanation of degraded mode.
//!
//! `process` never fails: every error is turned into reply text.

use crate::{
    config::AppConfig,
    conversation::{ConversationLog, Role, Turn},
    llm_client::{LanguageModel, OllamaClient},
    skill::{SkillRegistry, contains_any},
    skills::load_skills,
};
use chrono::Local;
use tracing::{debug, error, info, warn};

/// Number of turns (three exchanges) included in a backend prompt.
const CONTEXT_TURNS: usize = 6;

const GREETINGS: &[&str] = &["hello", "hi", "hey", "good morning", "good afternoon"];
const HELP_COMMANDS: &[&str] = &["help", "what can you do", "commands"];
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "goodbye", "bye"];

pub const FAREWELL: &str = "Goodbye! Have a great day!";

/// Returns `true` for inputs that end a session.
pub fn is_exit_command(text: &str) -> bool {
    EXIT_COMMANDS.contains(&text.trim().to_lowercase().as_str())
}

/// Persona settings embedded in the backend's system preamble.
#[derive(Debug, Clone)]
pub struct Persona {
    pub name: String,
    pub personality: String,
    pub response_style: String,
    pub temperature: f32,
}

impl Persona {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            name: config.assistant.name.clone(),
            personality: config.assistant.personality.clone(),
            response_style: config.assistant.response_style.clone(),
            temperature: config.ai.temperature,
        }
    }
}

pub struct Assistant {
    persona: Persona,
    history: ConversationLog,
    skills: SkillRegistry,
    backend: Option<Box<dyn LanguageModel>>,
}

impl Assistant {
    pub fn new(
        persona: Persona,
        max_history: usize,
        skills: SkillRegistry,
        backend: Option<Box<dyn LanguageModel>>,
    ) -> Self {
        Self {
            persona,
            history: ConversationLog::new(max_history),
            skills,
            backend,
        }
    }

    /// Builds the assistant from configuration: loads enabled skills and
    /// connects to the configured backend if it is reachable.
    pub fn from_config(config: &AppConfig) -> Self {
        let persona = Persona::from_config(config);
        info!(name = %persona.name, "Initializing assistant");

        let backend: Option<Box<dyn LanguageModel>> = match config.ai.provider.as_str() {
            "ollama" => OllamaClient::connect(&config.ai.ollama.url, &config.ai.ollama.model)
                .map(|client| Box::new(client) as Box<dyn LanguageModel>),
            other => {
                warn!(provider = other, "Provider not supported. Use 'ollama'");
                None
            }
        };

        let assistant = Self::new(
            persona,
            config.assistant.conversation_memory,
            load_skills(&config.skills),
            backend,
        );
        info!(
            name = %assistant.persona.name,
            skills = ?assistant.skills.names(),
            ai = assistant.has_backend(),
            "Assistant initialized"
        );
        assistant
    }

    pub fn name(&self) -> &str {
        &self.persona.name
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn history(&self) -> &ConversationLog {
        &self.history
    }

    pub fn skills(&self) -> &SkillRegistry {
        &self.skills
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        info!("Conversation history cleared");
    }

    /// Handles one user turn and returns the reply.
    pub fn process(&mut self, text: &str) -> String {
        info!(input = %text, "Processing");
        self.history.append(Role::User, text);

        if let Some(reply) = self.builtin_reply(text) {
            debug!("Handled by built-in command");
            return self.reply(reply);
        }

        if let Some((name, skill)) = self.skills.find(text) {
            let reply = match skill.execute(text) {
                Ok(reply) => reply,
                Err(e) => {
                    error!(skill = name, error = %e, "Skill failed");
                    format!("Sorry, I encountered an error with {name}: {e}")
                }
            };
            return self.reply(reply);
        }

        if let Some(backend) = &self.backend {
            let prompt = self.build_prompt(text);
            return match backend.generate(&prompt, self.persona.temperature) {
                Ok(reply) => self.reply(reply.trim().to_string()),
                Err(e) => {
                    // Failed backend replies are not recorded in the history.
                    error!(error = %e, "AI error");
                    format!("Sorry, I encountered an error: {e}")
                }
            };
        }

        let reply = fallback_reply(text);
        self.reply(reply)
    }

    fn reply(&mut self, reply: String) -> String {
        self.history.append(Role::Assistant, reply.clone());
        reply
    }

    fn builtin_reply(&self, text: &str) -> Option<String> {
        let text_lower = text.trim().to_lowercase();

        if contains_any(&text_lower, GREETINGS) {
            return Some(format!(
                "Hello! I'm {}, your personal AI assistant. How can I help you today?",
                self.persona.name
            ));
        }

        if text_lower.contains("what time") || text_lower.contains("current time") {
            return Some(format!(
                "The current time is {}",
                Local::now().format("%I:%M %p")
            ));
        }

        if text_lower.contains("what date")
            || text_lower.contains("today's date")
            || text_lower.contains("what day")
        {
            return Some(format!("Today is {}", Local::now().format("%A, %B %d, %Y")));
        }

        if HELP_COMMANDS.contains(&text_lower.as_str()) {
            return Some(self.help_text());
        }

        if EXIT_COMMANDS.contains(&text_lower.as_str()) {
            return Some(FAREWELL.to_string());
        }

        None
    }

    /// Help text: basic commands, then each skill in registration order, then
    /// the free-form chat note when a backend is connected.
    pub fn help_text(&self) -> String {
        let mut help = format!(
            "\n{} - Available Commands\n\n\
             BASIC:\n  \
             • hello/hi - Greet me\n  \
             • what time is it? - Current time\n  \
             • what's the date? - Current date\n  \
             • help - Show this help\n\n\
             SKILLS:\n",
            self.persona.name
        );
        for (name, skill) in self.skills.iter() {
            help.push_str(&format!("  • {name}: {}\n", skill.describe()));
        }
        if self.has_backend() {
            help.push_str(
                "\nAI CHAT:\n  • Ask me anything! I'm powered by AI and can help with various tasks.\n",
            );
        }
        help
    }

    fn build_prompt(&self, text: &str) -> String {
        let name = &self.persona.name;
        let mut prompt = format!(
            "You are {name}, a helpful AI personal assistant running locally on the user's computer.\n\
             Your personality is {}.\n\
             Keep responses {}.\n\
             Current date/time: {}\n\n",
            self.persona.personality,
            self.persona.response_style,
            Local::now().format("%Y-%m-%d %H:%M"),
        );
        for turn in self.history.recent(CONTEXT_TURNS) {
            prompt.push_str(&render_turn(turn, name));
        }
        prompt.push_str(&format!("User: {text}\n{name}:"));
        prompt
    }
}

fn render_turn(turn: &Turn, assistant_name: &str) -> String {
    let speaker = match turn.role {
        Role::User => "User",
        Role::Assistant => assistant_name,
    };
    format!("{speaker}: {}\n", turn.content)
}

fn fallback_reply(text: &str) -> String {
    format!(
        "I heard you say: '{text}'\n\n\
         I'm running in basic mode without AI. To enable full AI capabilities:\n\
         1. Install Ollama from: https://ollama.ai\n\
         2. Run: ollama pull llama2\n\
         3. Start Ollama: ollama serve\n\n\
         For now, try commands like:\n\
         - 'what time is it?'\n\
         - 'what's the date?'\n\
         - 'help'"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        llm_client::{BackendError, MockLanguageModel},
        skill::{MockSkill, Skill},
    };
    use std::cell::Cell;
    use std::rc::Rc;

    fn persona() -> Persona {
        Persona {
            name: "Claire".to_string(),
            personality: "witty".to_string(),
            response_style: "short".to_string(),
            temperature: 0.3,
        }
    }

    /// A skill that counts how often it runs.
    struct CountingSkill {
        recognizes: bool,
        reply: &'static str,
        runs: Rc<Cell<usize>>,
    }

    impl Skill for CountingSkill {
        fn recognize(&self, _text: &str) -> bool {
            self.recognizes
        }

        fn execute(&self, _text: &str) -> Result<String, crate::skill::SkillError> {
            self.runs.set(self.runs.get() + 1);
            Ok(self.reply.to_string())
        }

        fn describe(&self) -> String {
            format!("{} skill", self.reply)
        }
    }

    fn counting(recognizes: bool, reply: &'static str) -> (Box<dyn Skill>, Rc<Cell<usize>>) {
        let runs = Rc::new(Cell::new(0));
        let skill = CountingSkill {
            recognizes,
            reply,
            runs: runs.clone(),
        };
        (Box::new(skill), runs)
    }

    fn untouched_backend() -> Box<dyn LanguageModel> {
        let mut backend = MockLanguageModel::new();
        backend.expect_generate().never();
        Box::new(backend)
    }

    fn contents(assistant: &Assistant) -> Vec<String> {
        assistant
            .history()
            .iter()
            .map(|t| t.content.clone())
            .collect()
    }

    #[test]
    fn test_builtins_bypass_skills_and_backend() {
        let (skill, runs) = counting(true, "skill");
        let skills = SkillRegistry::new().with("greedy", skill);
        let mut assistant = Assistant::new(persona(), 10, skills, Some(untouched_backend()));

        assert_eq!(
            assistant.process("Hello"),
            "Hello! I'm Claire, your personal AI assistant. How can I help you today?"
        );
        assert!(assistant.process("what time is it?").starts_with("The current time is "));
        assert!(assistant.process("What day is it").starts_with("Today is "));
        assert!(assistant.process("  HELP ").contains("Claire - Available Commands"));
        assert_eq!(assistant.process("exit"), FAREWELL);
        assert_eq!(runs.get(), 0);
        assert_eq!(assistant.history().len(), 10);
    }

    #[test]
    fn test_greeting_keywords_match_anywhere() {
        let (skill, runs) = counting(true, "skill reply");
        let mut assistant = Assistant::new(
            persona(),
            10,
            SkillRegistry::new().with("any", skill),
            None,
        );

        // Greeting keywords are substring matches and win over every skill.
        for input in ["weather in Chicago", "tell me which way to go", "they are here"] {
            assert!(assistant.process(input).starts_with("Hello! I'm Claire"));
        }
        assert!(assistant.process("good morning!").starts_with("Hello! I'm Claire"));
        assert_eq!(runs.get(), 0);

        assert_eq!(assistant.process("weather in Rome"), "skill reply");
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_help_lists_skills_in_order_and_ai_note() {
        let (first, _) = counting(false, "first");
        let (second, _) = counting(false, "second");
        let skills = SkillRegistry::new().with("alpha", first).with("beta", second);
        let mut assistant = Assistant::new(persona(), 10, skills, Some(untouched_backend()));

        let help = assistant.process("what can you do");
        let basic = help.find("BASIC:").unwrap();
        let alpha = help.find("  • alpha: first skill").unwrap();
        let beta = help.find("  • beta: second skill").unwrap();
        let ai = help.find("AI CHAT:").unwrap();
        assert!(basic < alpha && alpha < beta && beta < ai);
    }

    #[test]
    fn test_help_without_backend_omits_ai_note() {
        let mut assistant = Assistant::new(persona(), 10, SkillRegistry::new(), None);
        let help = assistant.process("commands");
        assert!(help.starts_with("\nClaire - Available Commands\n"));
        assert!(!help.contains("AI CHAT"));
    }

    #[test]
    fn test_first_recognizing_skill_wins() {
        let (first, first_runs) = counting(true, "first");
        let (second, second_runs) = counting(true, "second");
        let skills = SkillRegistry::new().with("first", first).with("second", second);
        let mut assistant = Assistant::new(persona(), 10, skills, Some(untouched_backend()));

        assert_eq!(assistant.process("do the task"), "first");
        assert_eq!(first_runs.get(), 1);
        assert_eq!(second_runs.get(), 0);
    }

    #[test]
    fn test_skill_error_is_reported_with_skill_name() {
        let mut skill = MockSkill::new();
        skill.expect_recognize().return_const(true);
        skill
            .expect_execute()
            .returning(|_| Err(crate::skill::SkillError("boom".to_string())));
        let skills = SkillRegistry::new().with("weather", Box::new(skill));
        let mut assistant = Assistant::new(persona(), 10, skills, Some(untouched_backend()));

        let reply = assistant.process("weather please");
        assert_eq!(reply, "Sorry, I encountered an error with weather: boom");
        assert_eq!(contents(&assistant), vec!["weather please", reply.as_str()]);
    }

    #[test]
    fn test_backend_fallback_returns_trimmed_reply() {
        let mut backend = MockLanguageModel::new();
        backend
            .expect_generate()
            .withf(|prompt, temperature| {
                prompt.starts_with("You are Claire,")
                    && prompt.contains("Your personality is witty.")
                    && prompt.contains("Keep responses short.")
                    && prompt.ends_with("User: random question\nClaire:")
                    && *temperature == 0.3
            })
            .times(1)
            .returning(|_, _| Ok("  OK \n".to_string()));
        let mut assistant = Assistant::new(persona(), 10, SkillRegistry::new(), Some(Box::new(backend)));

        assert_eq!(assistant.process("random question"), "OK");
        let turns: Vec<(Role, String)> = assistant
            .history()
            .iter()
            .map(|t| (t.role, t.content.clone()))
            .collect();
        assert_eq!(
            turns,
            vec![
                (Role::User, "random question".to_string()),
                (Role::Assistant, "OK".to_string()),
            ]
        );
    }

    #[test]
    fn test_backend_prompt_includes_last_six_turns() {
        let mut backend = MockLanguageModel::new();
        backend
            .expect_generate()
            .withf(|prompt, _| {
                !prompt.contains("User: q1\n")
                    && prompt.contains("Claire: a1\n")
                    && prompt.contains("User: q2\nClaire: a2\nUser: q3\nClaire: a3\nUser: q4\n")
            })
            .times(1)
            .returning(|_, _| Ok("a4".to_string()));
        let mut assistant = Assistant::new(persona(), 10, SkillRegistry::new(), Some(Box::new(backend)));
        for (role, content) in [
            (Role::User, "q1"),
            (Role::Assistant, "a1"),
            (Role::User, "q2"),
            (Role::Assistant, "a2"),
            (Role::User, "q3"),
            (Role::Assistant, "a3"),
        ] {
            assistant.history.append(role, content);
        }

        assert_eq!(assistant.process("q4"), "a4");
    }

    #[test]
    fn test_backend_error_is_reported_once() {
        let mut backend = MockLanguageModel::new();
        backend
            .expect_generate()
            .times(1)
            .returning(|_, _| Err(BackendError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR)));
        let mut assistant = Assistant::new(persona(), 10, SkillRegistry::new(), Some(Box::new(backend)));

        let reply = assistant.process("tell me a joke");
        assert_eq!(
            reply,
            "Sorry, I encountered an error: Ollama returned status 500 Internal Server Error"
        );
        assert_eq!(contents(&assistant), vec!["tell me a joke"]);
    }

    #[test]
    fn test_static_fallback_without_backend() {
        let mut assistant = Assistant::new(persona(), 10, SkillRegistry::new(), None);

        let reply = assistant.process("random question");
        assert!(reply.starts_with("I heard you say: 'random question'\n\n"));
        assert!(reply.contains("running in basic mode without AI"));
        assert!(reply.ends_with("- 'help'"));
        assert_eq!(assistant.history().len(), 2);
    }

    #[test]
    fn test_history_is_bounded_and_keeps_newest() {
        let mut assistant = Assistant::new(persona(), 3, SkillRegistry::new(), None);
        for i in 0..20 {
            assistant.process(&format!("message {i}"));
            assert!(assistant.history().len() <= 6);
        }

        let tail = contents(&assistant);
        assert_eq!(tail.len(), 6);
        assert_eq!(tail[4], "message 19");
        assert_eq!(tail[2], "message 18");
        assert_eq!(tail[0], "message 17");
        assert_eq!(tail[5], fallback_reply("message 19"));
    }

    #[test]
    fn test_clear_history() {
        let mut assistant = Assistant::new(persona(), 3, SkillRegistry::new(), None);
        assistant.process("hello");
        assistant.clear_history();
        assert!(assistant.history().is_empty());
    }

    #[test]
    fn test_recognize_and_describe_have_no_side_effects() {
        let (skill, runs) = counting(true, "only");
        let skills = SkillRegistry::new().with("only", skill);
        let assistant = Assistant::new(persona(), 3, skills, None);

        for _ in 0..3 {
            let (_, skill) = assistant.skills().find("anything").unwrap();
            assert!(skill.recognize("anything"));
            assert_eq!(skill.describe(), "only skill");
        }
        assert_eq!(runs.get(), 0);
        assert!(assistant.history().is_empty());
    }

    #[test]
    fn test_from_config_with_unsupported_provider_has_no_backend() {
        let mut config = AppConfig::default();
        config.ai.provider = "openai".to_string();
        config.assistant.name = "Jarvis".to_string();

        let mut assistant = Assistant::from_config(&config);

        assert_eq!(assistant.name(), "Jarvis");
        assert!(!assistant.has_backend());
        assert_eq!(assistant.skills().names(), vec!["system"]);
        assert!(assistant.process("tell me a story").starts_with("I heard you say:"));
    }

    #[test]
    fn test_exit_command_detection() {
        assert!(is_exit_command(" Bye "));
        assert!(is_exit_command("QUIT"));
        assert!(!is_exit_command("bye for now"));
    }
}
