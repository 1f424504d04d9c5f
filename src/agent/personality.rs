use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonalityKind {
    #[default]
    Creative,
    Weird,
    Helpful,
    Chaotic,
}

const CREATIVE_NAMES: [&str; 15] = [
    "CosmicChaos",
    "QuantumQuirk",
    "NeonNexus",
    "VoidVibes",
    "EchoEthereal",
    "NovaNonsense",
    "ApexAnomaly",
    "ZenithZest",
    "PrismPulse",
    "NexusNudge",
    "ChaosCrystal",
    "MysticMoment",
    "EpicEcho",
    "WildWave",
    "SmoothSoul",
];

const WEIRD_NAMES: [&str; 10] = [
    "BananaBlockchain",
    "PenguinProtocol",
    "LlamaLiquidity",
    "DuckDecentralized",
    "OctopusOracle",
    "FlamingoFinance",
    "AlpacaAsset",
    "KoalaCoin",
    "SlothSwap",
    "NarwhalNetwork",
];

pub const THEMES: [&str; 15] = [
    "Cosmic", "Quantum", "Neon", "Void", "Echo", "Nova", "Chaos", "Zen", "Epic", "Mystic", "Wild",
    "Smooth", "Electric", "Vibey", "Chill",
];

const NAME_PICKS: usize = 5;

const CREATION_RESPONSES: [&str; 4] = [
    "Awesome! Let's create something amazing! Just give me a name, symbol, and description, and I'll handle the rest! 🚀",
    "Perfect! I'll guide you through creating your token. It's a 4-step process: upload image, metadata, mine salt, and deploy on-chain!",
    "Let's do this! I'll make sure your token is creative and unique. What should we call it?",
    "Excellent choice! Token creation is my specialty. I'll make it weird and wonderful!",
];

const DEFAULT_RESPONSES: [&str; 5] = [
    "Interesting! Tell me more about what you'd like to create.",
    "Hmm, let me think... How about we create a token together?",
    "I'm listening! What kind of token are you dreaming of?",
    "Cool! Want to create something weird and wonderful?",
    "Let's make something amazing! What's your idea?",
];

const HELP_RESPONSE: &str = "I'm here to help! I can:
- Create tokens on nad.fun/Monad
- Suggest creative token names and ideas
- Guide you through the 4-step creation process
- Generate unique metadata and attributes

Just tell me what you'd like to create, and I'll help you make it happen! 🦞";

const PROCESS_RESPONSE: &str = "The token creation process has 4 steps:
1️⃣ Upload Image - Your token's visual identity
2️⃣ Upload Metadata - Name, symbol, description, and attributes
3️⃣ Mine Salt - Generate a vanity address ending in 7777
4️⃣ Create On-Chain - Deploy to Monad blockchain via BondingCurveRouter

I'll handle all of this for you! Just provide the basics, and I'll add the creative flair! ✨";

const GREETING_KEYWORDS: [&str; 4] = ["hi", "hello", "hey", "greetings"];
const CREATION_KEYWORDS: [&str; 4] = ["create", "make", "build", "token"];
const HELP_KEYWORDS: [&str; 4] = ["help", "how", "what", "guide"];
const PROCESS_KEYWORDS: [&str; 3] = ["process", "steps", "flow"];
const SUGGESTION_KEYWORDS: [&str; 4] = ["suggest", "idea", "name", "theme"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// `how` followed anywhere later by `work`.
fn asks_how_it_works(input: &str) -> bool {
    input
        .find("how")
        .map(|i| input[i + 3..].contains("work"))
        .unwrap_or(false)
}

/// What kind of reply `respond_to_user` chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Creation,
    Help,
    Process,
    Other,
}

/// Classify a chat message. Checks run in a fixed order and the first hit wins.
pub fn classify(input: &str) -> Intent {
    let lower = input.to_lowercase();
    if contains_any(&lower, &GREETING_KEYWORDS) {
        Intent::Greeting
    } else if contains_any(&lower, &CREATION_KEYWORDS) {
        Intent::Creation
    } else if contains_any(&lower, &HELP_KEYWORDS) {
        Intent::Help
    } else if asks_how_it_works(&lower) || contains_any(&lower, &PROCESS_KEYWORDS) {
        Intent::Process
    } else {
        Intent::Other
    }
}

/// True when a chat message asks for name or theme ideas.
pub fn wants_suggestions(message: &str) -> bool {
    contains_any(&message.to_lowercase(), &SUGGESTION_KEYWORDS)
}

/// The chat persona. Stateless apart from its name and kind; every random
/// choice draws from the caller's `Rng`.
#[derive(Debug, Clone)]
pub struct AgentPersonality {
    name: String,
    kind: PersonalityKind,
}

impl Default for AgentPersonality {
    fn default() -> Self {
        Self::new("TokenGenie", PersonalityKind::Creative)
    }
}

impl AgentPersonality {
    pub fn new(name: impl Into<String>, kind: PersonalityKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PersonalityKind {
        self.kind
    }

    pub fn greet<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let name = &self.name;
        match rng.gen_range(0..5) {
            0 => format!("Hey there! I'm {}, your AI token creation companion! 🦞", name),
            1 => format!("Welcome! {} here, ready to create some weird and wonderful tokens!", name),
            2 => format!("Yo! {} at your service. Let's make something amazing!", name),
            3 => format!(
                "Greetings, human! {} is here to help you create tokens that break boundaries!",
                name
            ),
            _ => format!(
                "Hello! I'm {}, and I specialize in creating tokens that surprise and delight!",
                name
            ),
        }
    }

    /// Up to five distinct names from the persona's list, then
    /// `{theme}Token`, `{theme}Coin` and `{theme}Gem`.
    pub fn suggest_token_names<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        theme: Option<&str>,
    ) -> Vec<String> {
        let names: &[&str] = match self.kind {
            PersonalityKind::Weird => &WEIRD_NAMES,
            _ => &CREATIVE_NAMES,
        };

        let mut suggestions: Vec<String> = Vec::new();
        for _ in 0..NAME_PICKS {
            if let Some(name) = names.choose(rng) {
                if !suggestions.iter().any(|s| s == name) {
                    suggestions.push(name.to_string());
                }
            }
        }

        if let Some(theme) = theme.filter(|t| !t.is_empty()) {
            suggestions.push(format!("{}Token", theme));
            suggestions.push(format!("{}Coin", theme));
            suggestions.push(format!("{}Gem", theme));
        }

        suggestions
    }

    pub fn respond_to_user<R: Rng + ?Sized>(&self, rng: &mut R, input: &str) -> String {
        match classify(input) {
            Intent::Greeting => self.greet(rng),
            Intent::Creation => pick(rng, &CREATION_RESPONSES).to_string(),
            Intent::Help => HELP_RESPONSE.to_string(),
            Intent::Process => PROCESS_RESPONSE.to_string(),
            Intent::Other => pick(rng, &DEFAULT_RESPONSES).to_string(),
        }
    }

    pub fn celebrate_success<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        token_address: &str,
        token_name: &str,
    ) -> String {
        match rng.gen_range(0..4) {
            0 => format!(
                "🎉 Success! {} has been created at {}! You're now part of the Monad ecosystem!",
                token_name, token_address
            ),
            1 => format!(
                "✨ Amazing! Your token {} is live on-chain at {}! Time to celebrate!",
                token_name, token_address
            ),
            2 => format!(
                "🚀 Boom! {} is deployed at {}! Welcome to the future of tokens!",
                token_name, token_address
            ),
            _ => format!(
                "🦞 Epic! {} is now on Monad at {}! You did it!",
                token_name, token_address
            ),
        }
    }

    pub fn handle_error<R: Rng + ?Sized>(&self, rng: &mut R, error: &str) -> String {
        match rng.gen_range(0..3) {
            0 => format!("Oops! Something went wrong: {}. Let's try again!", error),
            1 => format!(
                "Hmm, we hit a snag: {}. Don't worry, I'll help you fix it!",
                error
            ),
            _ => format!(
                "Well, that's unexpected: {}. Let's troubleshoot together!",
                error
            ),
        }
    }

    pub fn suggest_themes(&self) -> Vec<String> {
        THEMES.iter().map(|t| t.to_string()).collect()
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(2024)
    }

    #[test]
    fn test_classify_order() {
        assert_eq!(classify("Hello there"), Intent::Greeting);
        // "hey" wins over "token"
        assert_eq!(classify("hey, make me a token"), Intent::Greeting);
        assert_eq!(classify("please BUILD one"), Intent::Creation);
        assert_eq!(classify("guide me"), Intent::Help);
        // "how" is a help keyword, so help is checked before process
        assert_eq!(classify("how does it work"), Intent::Help);
        assert_eq!(classify("explain the process"), Intent::Process);
        assert_eq!(classify("steps?"), Intent::Process);
        assert_eq!(classify("banana"), Intent::Other);
    }

    #[test]
    fn test_how_it_works_needs_order() {
        assert!(asks_how_it_works("so how does this work"));
        assert!(!asks_how_it_works("work out how"));
    }

    #[test]
    fn test_respond_uses_fixed_texts() {
        let agent = AgentPersonality::default();
        let mut rng = rng();

        assert_eq!(agent.respond_to_user(&mut rng, "guide"), HELP_RESPONSE);
        let process = agent.respond_to_user(&mut rng, "what are the steps");
        // "what" is a help keyword
        assert_eq!(process, HELP_RESPONSE);
        assert!(agent
            .respond_to_user(&mut rng, "the flow")
            .contains("vanity address ending in 7777"));
        assert!(CREATION_RESPONSES.contains(&agent.respond_to_user(&mut rng, "create").as_str()));
        assert!(DEFAULT_RESPONSES.contains(&agent.respond_to_user(&mut rng, "lobster").as_str()));
    }

    #[test]
    fn test_greeting_uses_agent_name() {
        let agent = AgentPersonality::new("Genie", PersonalityKind::Helpful);
        let mut rng = rng();
        for _ in 0..10 {
            assert!(agent.greet(&mut rng).contains("Genie"));
        }
    }

    #[test]
    fn test_name_suggestions_are_distinct() {
        let agent = AgentPersonality::default();
        let mut rng = rng();

        for _ in 0..20 {
            let names = agent.suggest_token_names(&mut rng, None);
            assert!(!names.is_empty() && names.len() <= 5);
            let mut deduped = names.clone();
            deduped.sort();
            deduped.dedup();
            assert_eq!(deduped.len(), names.len());
            assert!(names.iter().all(|n| CREATIVE_NAMES.contains(&n.as_str())));
        }
    }

    #[test]
    fn test_weird_names_and_theme_suffixes() {
        let agent = AgentPersonality::new("TokenGenie", PersonalityKind::Weird);
        let names = agent.suggest_token_names(&mut rng(), Some("Lobster"));

        let (picked, themed) = names.split_at(names.len() - 3);
        assert!(picked.iter().all(|n| WEIRD_NAMES.contains(&n.as_str())));
        assert_eq!(themed, ["LobsterToken", "LobsterCoin", "LobsterGem"]);
    }

    #[test]
    fn test_wants_suggestions() {
        assert!(wants_suggestions("Any NAME ideas?"));
        assert!(wants_suggestions("suggest a theme"));
        assert!(!wants_suggestions("deploy it"));
    }

    #[test]
    fn test_celebrate_and_error_include_details() {
        let agent = AgentPersonality::default();
        let mut rng = rng();

        let msg = agent.celebrate_success(&mut rng, "0xabc", "VoidVibes");
        assert!(msg.contains("VoidVibes") && msg.contains("0xabc"));
        assert!(agent.handle_error(&mut rng, "boom").contains("boom"));
        assert_eq!(agent.suggest_themes().len(), 15);
    }

    #[test]
    fn test_personality_kind_deserializes_lowercase() {
        let kind: PersonalityKind = serde_json::from_str("\"chaotic\"").unwrap();
        assert_eq!(kind, PersonalityKind::Chaotic);
        assert_eq!(PersonalityKind::default(), PersonalityKind::Creative);
    }
}
