//! Keyword intent detection and related-question suggestions.
//!
//! All functions expect lowercased input.

use crate::catalogue::aliases::canonical_crop;

const GREETINGS: &[&str] = &["bonjour", "salut", "coucou", "hello", "hey", "bonsoir"];
const THANKS: &[&str] = &["merci", "thank", "thanks", "merçi"];
const PLANTING: &[&str] = &["planter", "plantation", "semer", "semis", "quand", "période"];
const URGENCY: &[&str] = &[
    "urgent", "vite", "rapidement", "aide", "problème", "meurent", "séchent", "danger", "attaque",
    "invasion",
];

const FAREWELLS: &[&str] = &["au revoir", "à bientôt", "a bientot"];
const HOW_IT_WORKS: &[&str] = &[
    "comment ca marche",
    "comment ça marche",
    "comment ça fonctionne",
    "comment ca fonctionne",
];
const PLANTING_SEASONS: &[&str] = &[
    "periode plantation",
    "période plantation",
    "periode de plantation",
    "période de plantation",
    "périodes de plantation",
    "saison de plantation",
];

const MAX_SUGGESTIONS: usize = 3;

/// Starter questions offered when the bot cannot do better.
pub const STARTERS: &[&str] = &[
    "Quand planter le maïs ?",
    "Comment lutter contre les parasites ?",
    "Quels conseils pour l'irrigation ?",
];

fn contains_any(lower: &str, words: &[&str]) -> bool {
    words.iter().any(|w| lower.contains(w))
}

pub fn is_greeting(lower: &str) -> bool {
    contains_any(lower, GREETINGS)
}

pub fn is_thanks(lower: &str) -> bool {
    contains_any(lower, THANKS)
}

pub fn asks_planting(lower: &str) -> bool {
    contains_any(lower, PLANTING)
}

pub fn is_urgent(lower: &str) -> bool {
    contains_any(lower, URGENCY)
}

pub fn is_farewell(lower: &str) -> bool {
    contains_any(lower, FAREWELLS)
}

pub fn asks_how_it_works(lower: &str) -> bool {
    contains_any(lower, HOW_IT_WORKS)
}

/// General planting-season question, without a particular crop.
pub fn asks_planting_seasons(lower: &str) -> bool {
    contains_any(lower, PLANTING_SEASONS)
}

/// Whether the message names the zaï technique as a word of its own.
pub fn mentions_zai(lower: &str) -> bool {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word == "zaï" || word == "zai")
}

/// What kind of emergency a message describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    Drying,
    Pests,
    Disease,
}

impl Problem {
    pub fn detect(lower: &str) -> Option<Self> {
        if contains_any(lower, &["sécher", "sèche", "fane"]) {
            Some(Self::Drying)
        } else if contains_any(lower, &["insecte", "chenille", "parasite"]) {
            Some(Self::Pests)
        } else if contains_any(lower, &["maladie", "tache", "pourri"]) {
            Some(Self::Disease)
        } else {
            None
        }
    }

    /// Immediate steps, one per line.
    pub fn steps(self) -> &'static str {
        match self {
            Self::Drying => {
                "1. Vérifiez l'humidité du sol\n\
                 2. Arrosez immédiatement si le sol est sec\n\
                 3. Paillez le sol pour retenir l'humidité\n\
                 4. Vérifiez qu'il n'y a pas d'attaque de parasites sur les racines"
            }
            Self::Pests => {
                "1. Inspectez les plants pour identifier le parasite\n\
                 2. Préparez une solution de neem (100g dans 1L d'eau)\n\
                 3. Pulvérisez tôt le matin ou tard le soir\n\
                 4. Répétez tous les 3 jours jusqu'à disparition"
            }
            Self::Disease => {
                "1. Isolez les plants malades\n\
                 2. Retirez et brûlez les parties atteintes\n\
                 3. Évitez d'arroser les feuilles\n\
                 4. Améliorez l'aération entre les plants"
            }
        }
    }
}

/// Follow-up questions for a message, at most three.
pub fn related_questions(lower: &str) -> Vec<String> {
    let mut suggestions = Vec::new();

    if let Some(crop) = canonical_crop(lower) {
        suggestions.push(format!("Quelle est la meilleure période pour planter du {crop} ?"));
        suggestions.push(format!("Comment lutter contre les parasites du {crop} ?"));
        suggestions.push(format!("Quel type de sol pour le {crop} ?"));
    }

    if lower.contains("météo") {
        suggestions.push("Quelles sont les prévisions pour demain ?".to_string());
        suggestions.push("Y a-t-il des risques de sécheresse ?".to_string());
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

pub fn starters() -> Vec<String> {
    STARTERS.iter().map(ToString::to_string).collect()
}
