//! Attribute and copy generation for new tokens.
//!
//! Every generator takes the caller's `Rng` so tests can seed it.

use rand::Rng;

use crate::types::token::{TokenAttribute, TokenMetadata};
use crate::util::validation::normalize_symbol;

pub const VIBES: [&str; 10] = [
    "Chaotic", "Zen", "Electric", "Cosmic", "Vibey", "Chill", "Wild", "Smooth", "Epic", "Mystical",
];

/// Rarity tiers with their weight in percent. Weights sum to 100.
pub const RARITIES: [(&str, u32); 6] = [
    ("Common", 40),
    ("Uncommon", 30),
    ("Rare", 15),
    ("Epic", 10),
    ("Legendary", 4),
    ("Mythic", 1),
];

/// Build the metadata document for a token: upper-cased symbol plus
/// Vibe, Energy, Rarity, an optional Theme and one trait derived from the name.
pub fn generate_token_metadata<R: Rng + ?Sized>(
    rng: &mut R,
    name: &str,
    symbol: &str,
    description: &str,
    image_uri: &str,
    theme: Option<&str>,
) -> TokenMetadata {
    TokenMetadata {
        name: name.to_string(),
        symbol: normalize_symbol(symbol),
        description: description.to_string(),
        image: image_uri.to_string(),
        attributes: generate_attributes(rng, name, theme),
    }
}

fn generate_attributes<R: Rng + ?Sized>(
    rng: &mut R,
    name: &str,
    theme: Option<&str>,
) -> Vec<TokenAttribute> {
    let mut attributes = vec![
        TokenAttribute::text("Vibe", random_vibe(rng)),
        TokenAttribute::number("Energy", rng.gen_range(0..100)),
        TokenAttribute::text("Rarity", random_rarity(rng)),
    ];

    if let Some(theme) = theme.filter(|t| !t.is_empty()) {
        attributes.push(TokenAttribute::text("Theme", theme));
    }

    if let Some(creative) = creative_trait(rng, name) {
        attributes.push(creative);
    }

    attributes
}

pub fn random_vibe<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    VIBES[rng.gen_range(0..VIBES.len())]
}

pub fn random_rarity<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    let roll = rng.gen_range(0..100u32);
    let mut cumulative = 0;
    for (rarity, weight) in RARITIES {
        cumulative += weight;
        if roll < cumulative {
            return rarity;
        }
    }
    RARITIES[0].0
}

fn creative_trait<R: Rng + ?Sized>(rng: &mut R, name: &str) -> Option<TokenAttribute> {
    let first = name.chars().next()?;
    let len = name.chars().count() as u64;

    let attribute = match rng.gen_range(0..3) {
        0 => TokenAttribute::text("First Letter", first.to_uppercase().to_string()),
        1 => TokenAttribute::number("Name Length", len),
        _ => TokenAttribute::number("Power Level", len * 10),
    };
    Some(attribute)
}

pub fn generate_description<R: Rng + ?Sized>(
    rng: &mut R,
    name: &str,
    symbol: &str,
    theme: Option<&str>,
) -> String {
    let mut description = match rng.gen_range(0..5) {
        0 => format!(
            "Welcome to {} ({}) - a token that defies expectations and breaks boundaries.",
            name, symbol
        ),
        1 => format!(
            "{} ({}) is not just a token, it's a movement. Join the revolution.",
            name, symbol
        ),
        2 => format!(
            "Experience the power of {} ({}) - where creativity meets blockchain.",
            name, symbol
        ),
        3 => format!(
            "{} ({}) represents the future of decentralized creativity.",
            name, symbol
        ),
        _ => format!(
            "Dive into the {} ({}) ecosystem - weird, wild, and wonderful.",
            name, symbol
        ),
    };

    if let Some(theme) = theme.filter(|t| !t.is_empty()) {
        description.push_str(&format!(
            " This token embodies the {} theme, bringing unique value to the Monad ecosystem.",
            theme
        ));
    }
    description.push_str(" Created by TokenGenie - your AI token creation companion.");

    description
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::types::token::AttributeValue;

    #[test]
    fn test_metadata_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let metadata = generate_token_metadata(
            &mut rng,
            "CosmicChaos",
            "cosmic",
            "A chaotic token from the edge of the void.",
            "ipfs://image",
            Some("Cosmic"),
        );

        assert_eq!(metadata.symbol, "COSMIC");
        assert_eq!(metadata.image, "ipfs://image");
        assert_eq!(metadata.attributes.len(), 5);

        match metadata.attribute("Vibe") {
            Some(AttributeValue::Text(v)) => assert!(VIBES.contains(&v.as_str())),
            other => panic!("unexpected vibe {other:?}"),
        }
        match metadata.attribute("Energy") {
            Some(AttributeValue::Number(n)) => assert!(*n < 100),
            other => panic!("unexpected energy {other:?}"),
        }
        match metadata.attribute("Rarity") {
            Some(AttributeValue::Text(r)) => {
                assert!(RARITIES.iter().any(|(name, _)| name == r))
            }
            other => panic!("unexpected rarity {other:?}"),
        }
        assert_eq!(
            metadata.attribute("Theme"),
            Some(&AttributeValue::Text("Cosmic".to_string()))
        );

        let creative = &metadata.attributes[4];
        match creative.trait_type.as_str() {
            "First Letter" => assert_eq!(creative.value, AttributeValue::Text("C".to_string())),
            "Name Length" => assert_eq!(creative.value, AttributeValue::Number(11)),
            "Power Level" => assert_eq!(creative.value, AttributeValue::Number(110)),
            other => panic!("unexpected creative trait {other}"),
        }
    }

    #[test]
    fn test_no_theme_attribute_without_theme() {
        let mut rng = StdRng::seed_from_u64(1);
        let metadata = generate_token_metadata(&mut rng, "x", "x", "d", "i", None);

        assert!(metadata.attribute("Theme").is_none());
        assert_eq!(metadata.attributes.len(), 4);
    }

    #[test]
    fn test_creative_trait_upper_cases_first_letter() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            if let Some(attr) = creative_trait(&mut rng, "void") {
                if attr.trait_type == "First Letter" {
                    assert_eq!(attr.value, AttributeValue::Text("V".to_string()));
                    return;
                }
            }
        }
        panic!("First Letter trait never drawn");
    }

    #[test]
    fn test_rarity_distribution_follows_weights() {
        let mut rng = StdRng::seed_from_u64(42);
        let draws = 100_000;
        let mut counts = std::collections::HashMap::new();
        for _ in 0..draws {
            *counts.entry(random_rarity(&mut rng)).or_insert(0u32) += 1;
        }

        for (rarity, weight) in RARITIES {
            let observed = counts.get(rarity).copied().unwrap_or(0) as f64 / draws as f64;
            let expected = weight as f64 / 100.0;
            assert!(
                (observed - expected).abs() < 0.01,
                "{} observed {} expected {}",
                rarity,
                observed,
                expected
            );
        }
    }

    #[test]
    fn test_description_mentions_theme_and_signature() {
        let mut rng = StdRng::seed_from_u64(5);
        let description = generate_description(&mut rng, "VoidVibes", "VOID", Some("Void"));

        assert!(description.contains("VoidVibes (VOID)"));
        assert!(description.contains("embodies the Void theme"));
        assert!(description.ends_with("Created by TokenGenie - your AI token creation companion."));

        let plain = generate_description(&mut rng, "VoidVibes", "VOID", None);
        assert!(!plain.contains("theme"));
    }
}
