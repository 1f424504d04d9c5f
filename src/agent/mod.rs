//! The TokenGenie chat persona.

mod personality;

pub use personality::{classify, wants_suggestions, AgentPersonality, Intent, PersonalityKind, THEMES};
