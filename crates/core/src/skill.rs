//! Skill Interface
//!
//! Skills are the handlers consulted after the built-in commands. Each one
//! decides cheaply whether it wants an utterance (`recognize`), produces the
//! reply (`execute`), and summarizes itself for the help text (`describe`).

use tracing::debug;

/// A failure a skill could not turn into a reply on its own.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct SkillError(pub String);

/// The contract every skill satisfies.
#[cfg_attr(test, mockall::automock)]
pub trait Skill {
    /// Returns `true` if this skill should handle `text`. Must be pure.
    fn recognize(&self, text: &str) -> bool;

    /// Produces the reply for `text`. Expected failures (missing settings,
    /// unreachable services) come back as `Ok` with an explanatory message.
    fn execute(&self, text: &str) -> Result<String, SkillError>;

    /// One-line capability summary for the help text.
    fn describe(&self) -> String;
}

/// Named skills, consulted in registration order.
#[derive(Default)]
pub struct SkillRegistry {
    skills: Vec<(String, Box<dyn Skill>)>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a skill under `name`. A later registration with the same name
    /// replaces the skill but keeps its original position.
    pub fn register(&mut self, name: impl Into<String>, skill: Box<dyn Skill>) {
        let name = name.into();
        if let Some(slot) = self.skills.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = skill;
        } else {
            self.skills.push((name, skill));
        }
    }

    /// Builder-style variant of [`SkillRegistry::register`].
    pub fn with(mut self, name: impl Into<String>, skill: Box<dyn Skill>) -> Self {
        self.register(name, skill);
        self
    }

    /// Finds the first skill, in registration order, that recognizes `text`.
    pub fn find(&self, text: &str) -> Option<(&str, &dyn Skill)> {
        let found = self
            .skills
            .iter()
            .find(|(_, skill)| skill.recognize(text))
            .map(|(name, skill)| (name.as_str(), skill.as_ref()));
        if let Some((name, _)) = found {
            debug!(skill = name, "Skill recognized input");
        }
        found
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Skill)> {
        self.skills
            .iter()
            .map(|(name, skill)| (name.as_str(), skill.as_ref()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.skills.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

/// True if any keyword occurs anywhere in the lowercased text.
pub(crate) fn contains_any(text_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text_lower.contains(k))
}

/// Capitalizes the first letter of every word and lowercases the rest.
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Uppercases the first character and lowercases the rest.
pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
