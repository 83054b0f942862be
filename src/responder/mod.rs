//! Agricultural answer engine.
//!
//! Turns a user question into a [`Reply`]: the answer text (plain text with
//! `**bold**` and newlines, rendered by the widget), follow-up suggestions, a
//! confidence and the name of the source that answered. Rules are tried in
//! order and the first match wins:
//!
//! 1. greetings, thanks and farewells
//! 2. frequent questions (how the assistant works, the zaï technique)
//! 3. planting calendar for a catalogued crop, else the general seasons
//! 4. soil type advice
//! 5. emergency steps for a crop problem
//! 6. general topic table
//! 7. a request for details on an urgent message nothing above answered
//! 8. help menu

pub mod intent;
pub mod topics;

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::catalogue::aliases::canonical_crop;
use crate::catalogue::{CatalogueError, CatalogueStore, PlantingPeriod, SoilAdvice};
use intent::Problem;

const GREETING: &str =
    "Bonjour ! Comment puis-je vous aider avec votre exploitation agricole aujourd'hui ? 🚜";
const YOU_ARE_WELCOME: &str = "De rien ! N'hésitez pas si vous avez d'autres questions. 🌾";
const FAREWELL: &str = "Au revoir ! Bonne continuation avec vos cultures. 🌾";
const HOW_IT_WORKS: &str = "Je peux vous aider avec :
- Conseils de plantation
- Prévisions météo
- Lutte contre parasites
- Irrigation
- Gestion du sol

Posez-moi vos questions !";
const ZAI: &str = "Le **Zaï** est une technique traditionnelle burkinabè de récupération des \
sols dégradés. On creuse des poquets de 20-40cm, on y ajoute du compost et on plante dedans. \
Cette technique permet de capter l'eau et d'augmenter les rendements de 50-100% !";
const PLANTING_SEASONS: &str = "Les périodes de plantation dépendent de la culture :
- Saison des pluies (Mai-Oct) : Maïs, Mil, Sorgho, Arachide
- Saison sèche (Nov-Avr) : Cultures maraîchères avec irrigation

Quelle culture vous intéresse ?";
const URGENT: &str = "⚠️ Je comprends que c'est urgent.";
const FALLBACK: &str = "🤔 Je ne suis pas sûr de bien comprendre votre question.

**Je peux vous aider sur :**
• 📅 Calendrier de plantation
• 🌿 Maladies des plantes
• 🌤️ Météo et sécheresse
• 🐛 Lutte contre les parasites
• 💧 Irrigation
• 🌱 Amélioration du sol
• 🌾 Récolte

Posez-moi une question précise sur l'un de ces sujets.";

const MONTHS: [&str; 13] = [
    "", "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre",
];

/// An answer to one user message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub response: String,
    pub suggestions: Vec<String>,
    /// 0.0-1.0
    pub confidence: f32,
    pub source: String,
}

impl Reply {
    fn new(response: impl Into<String>, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            suggestions: Vec::new(),
            confidence,
            source: source.into(),
        }
    }

    fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    /// Confidence as a percentage with one decimal.
    #[must_use]
    pub fn score(&self) -> f32 {
        (self.confidence * 1000.0).round() / 10.0
    }
}

#[derive(Debug, Clone)]
pub struct Responder {
    catalogue: Arc<dyn CatalogueStore>,
}

impl Responder {
    pub fn new(catalogue: Arc<dyn CatalogueStore>) -> Self {
        Self { catalogue }
    }

    /// Answer `message`.
    pub async fn reply(&self, message: &str) -> Result<Reply, CatalogueError> {
        let lower = message.to_lowercase();
        let related = intent::related_questions(&lower);

        let reply = self.answer(&lower).await?;
        let suggestions = if !related.is_empty() {
            related
        } else if matches!(reply.source.as_str(), "salutation" | "aide" | "Système") {
            intent::starters()
        } else {
            Vec::new()
        };
        let reply = reply.with_suggestions(suggestions);

        debug!(
            name: "responder.reply",
            source = %reply.source,
            confidence = reply.confidence,
            suggestions = reply.suggestions.len(),
            "Reply selected"
        );
        Ok(reply)
    }

    async fn answer(&self, lower: &str) -> Result<Reply, CatalogueError> {
        if intent::is_greeting(lower) {
            return Ok(Reply::new(GREETING, 0.95, "salutation"));
        }
        if intent::is_thanks(lower) {
            return Ok(Reply::new(YOU_ARE_WELCOME, 0.90, "remerciement"));
        }
        if intent::is_farewell(lower) {
            return Ok(Reply::new(FAREWELL, 0.95, "au revoir"));
        }
        if intent::asks_how_it_works(lower) {
            return Ok(Reply::new(HOW_IT_WORKS, 0.95, "aide"));
        }
        if intent::mentions_zai(lower) {
            return Ok(Reply::new(ZAI, 0.92, "FAQ"));
        }

        if intent::asks_planting(lower) {
            if let Some(crop) = self.catalogue.find_crop_in_text(lower).await? {
                let periods = self.catalogue.planting_periods(&crop).await?;
                if !periods.is_empty() {
                    return Ok(Reply::new(
                        format_planting(&crop, &periods),
                        0.96,
                        "catalogue (cultures)",
                    ));
                }
            }
        }
        if intent::asks_planting_seasons(lower) {
            return Ok(Reply::new(PLANTING_SEASONS, 0.90, "FAQ"));
        }

        if let Some(advice) = self.catalogue.soil_recommendation(lower).await? {
            return Ok(Reply::new(format_soil(&advice), 0.93, "catalogue (sols)"));
        }

        let urgent = intent::is_urgent(lower);
        if urgent {
            if let (Some(crop), Some(problem)) = (canonical_crop(lower), Problem::detect(lower)) {
                return Ok(Reply::new(format_urgent(crop, problem), 0.85, "urgence"));
            }
        }

        if let Some(topic) = topics::best_topic(lower) {
            return Ok(Reply::new(topic.response, topic.confidence, topic.source));
        }

        if urgent {
            return Ok(Reply::new(
                format_urgent_details(canonical_crop(lower)),
                0.80,
                "urgence",
            ));
        }

        Ok(Reply::new(FALLBACK, 0.50, "Système"))
    }
}

fn month_name(month: u32) -> &'static str {
    usize::try_from(month)
        .ok()
        .and_then(|i| MONTHS.get(i))
        .copied()
        .filter(|m| !m.is_empty())
        .unwrap_or("?")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn format_planting(crop: &str, periods: &[PlantingPeriod]) -> String {
    let mut lines = Vec::with_capacity(periods.len() * 2);
    for p in periods {
        lines.push(format!(
            "• **Région {}** : {} - {}.",
            p.region,
            capitalize(month_name(p.start_month)),
            month_name(p.end_month)
        ));
        if let Some(advice) = p.advice.as_deref().filter(|a| !a.is_empty()) {
            lines.push(format!("  → {advice}"));
        }
    }

    let cycle = periods
        .first()
        .and_then(|p| p.cycle_days)
        .map(|days| format!("\n\n⏱️ Durée approximative du cycle : **{days} jours**."))
        .unwrap_or_default();

    format!(
        "📅 **Périodes de plantation pour le {crop} :**\n\n{}{cycle}",
        lines.join("\n")
    )
}

fn format_soil(advice: &SoilAdvice) -> String {
    let crops = if advice.crops.is_empty() {
        "plusieurs cultures adaptées".to_string()
    } else {
        advice.crops.join(", ")
    };
    format!(
        "🌱 **Sol {}**\n\n{}\n\n✅ Cultures adaptées : {crops}.",
        advice.soil.name,
        advice.soil.description.as_deref().unwrap_or_default()
    )
}

fn format_urgent(crop: &str, problem: Problem) -> String {
    format!(
        "{URGENT} Pour votre problème de {crop}, \
         voici ce que vous devez faire immédiatement :\n\n{}",
        problem.steps()
    )
}

fn format_urgent_details(crop: Option<&str>) -> String {
    match crop {
        Some(crop) => format!(
            "{URGENT} Que se passe-t-il avec votre {crop} ? \
             Les plants sèchent-ils, sont-ils attaqués par des insectes ou malades ?"
        ),
        None => format!(
            "{URGENT} Pouvez-vous me donner plus de détails sur votre problème ? \
             Quelle culture est concernée ?"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::SqliteCatalogue;

    async fn responder() -> Responder {
        let catalogue = SqliteCatalogue::connect("sqlite::memory:").await.unwrap();
        Responder::new(Arc::new(catalogue))
    }

    #[tokio::test]
    async fn test_greeting_offers_starters() {
        let reply = responder().await.reply("Bonjour !").await.unwrap();
        assert_eq!(reply.source, "salutation");
        assert_eq!(reply.score(), 95.0);
        assert_eq!(reply.suggestions, intent::starters());
    }

    #[tokio::test]
    async fn test_planting_calendar() {
        let reply = responder()
            .await
            .reply("Quand planter le maïs ?")
            .await
            .unwrap();
        assert_eq!(reply.source, "catalogue (cultures)");
        assert_eq!(
            reply.response,
            "📅 **Périodes de plantation pour le Maïs :**\n\n\
             • **Région Centre** : Mai - juillet.\n\
             \u{20}\u{20}→ Semer dès l'installation des pluies, sur sol bien préparé.\n\n\
             ⏱️ Durée approximative du cycle : **90 jours**."
        );
        assert_eq!(reply.suggestions.len(), 3);
    }

    #[tokio::test]
    async fn test_wrapping_period_month_names() {
        let reply = responder()
            .await
            .reply("période de semis de la tomate")
            .await
            .unwrap();
        assert!(reply.response.contains("Novembre - février."));
    }

    #[tokio::test]
    async fn test_soil_advice() {
        let reply = responder()
            .await
            .reply("que cultiver en sol sablonneux")
            .await
            .unwrap();
        assert_eq!(reply.source, "catalogue (sols)");
        assert!(reply.response.contains("Cultures adaptées : Mil, Oignon."));
    }

    #[tokio::test]
    async fn test_urgent_pest_problem() {
        let reply = responder()
            .await
            .reply("Urgent : des chenilles sur mon coton")
            .await
            .unwrap();
        assert_eq!(reply.source, "urgence");
        assert!(reply.response.contains("problème de coton"));
        assert!(reply.response.contains("neem"));
    }

    #[tokio::test]
    async fn test_urgent_without_crop_asks_for_details() {
        let reply = responder().await.reply("urgent, aidez-moi").await.unwrap();
        assert_eq!(reply.source, "urgence");
        assert_eq!(
            reply.response,
            "⚠️ Je comprends que c'est urgent. Pouvez-vous me donner plus de détails \
             sur votre problème ? Quelle culture est concernée ?"
        );
        assert!(reply.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_urgent_crop_without_symptom_asks_what_happens() {
        let reply = responder()
            .await
            .reply("vite, mon sorgho !")
            .await
            .unwrap();
        assert_eq!(reply.source, "urgence");
        assert!(reply.response.contains("votre sorgho"));
        assert_eq!(reply.suggestions.len(), 3);
    }

    #[tokio::test]
    async fn test_frequent_questions() {
        let responder = responder().await;

        let farewell = responder.reply("Au revoir").await.unwrap();
        assert_eq!(farewell.response, FAREWELL);
        assert!(farewell.suggestions.is_empty());

        let help = responder.reply("Comment ça marche ?").await.unwrap();
        assert_eq!(help.source, "aide");
        assert!(help.response.contains("- Irrigation"));
        assert_eq!(help.suggestions, intent::starters());

        let zai = responder.reply("C'est quoi le zaï ?").await.unwrap();
        assert_eq!(zai.source, "FAQ");
        assert!(zai.response.starts_with("Le **Zaï**"));
        assert!(zai.response.contains("50-100%"));

        let seasons = responder.reply("periode plantation").await.unwrap();
        assert_eq!(seasons.response, PLANTING_SEASONS);
    }

    #[tokio::test]
    async fn test_crop_calendar_beats_general_seasons() {
        let reply = responder()
            .await
            .reply("période de plantation du mil")
            .await
            .unwrap();
        assert_eq!(reply.source, "catalogue (cultures)");
    }

    #[tokio::test]
    async fn test_topic_answer() {
        let reply = responder()
            .await
            .reply("Comment faire l'arrosage avec une pompe ?")
            .await
            .unwrap();
        assert_eq!(reply.source, "Manuel irrigation");
        assert!(reply.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_fallback() {
        let reply = responder().await.reply("xyz").await.unwrap();
        assert_eq!(reply.source, "Système");
        assert_eq!(reply.score(), 50.0);
        assert_eq!(reply.suggestions.len(), 3);
    }

    #[test]
    fn test_month_name_bounds() {
        assert_eq!(month_name(1), "janvier");
        assert_eq!(month_name(0), "?");
        assert_eq!(month_name(13), "?");
        assert_eq!(capitalize("août"), "Août");
    }
}
