//! General agricultural topics answered from a fixed table.

/// One topic of the general knowledge table.
#[derive(Debug, Clone, Copy)]
pub struct Topic {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub response: &'static str,
    pub confidence: f32,
    pub source: &'static str,
}

pub const TOPICS: &[Topic] = &[
    Topic {
        name: "maladies",
        keywords: &["maladie", "signes", "symptôme", "feuille", "jaune", "tache", "malade"],
        response: "🌿 **Signes courants de maladies des plantes:**

• **Feuilles jaunies**: Manque d'azote ou problème d'arrosage
• **Taches brunes/noires**: Infections fongiques
• **Flétrissement**: Maladies vasculaires ou déshydratation
• **Moisissure blanche**: Oïdium (champignon)
• **Déformation des feuilles**: Virus ou carences

💡 **Conseil**: Inspectez régulièrement vos plants et isolez immédiatement les plants malades.",
        confidence: 0.92,
        source: "Base de données agricole",
    },
    Topic {
        name: "meteo",
        keywords: &["météo", "temps", "pluie", "sécheresse", "prévision", "climat", "température"],
        response: "🌤️ **Prévisions météorologiques:**

📍 **Ouagadougou, Centre:**
• **Aujourd'hui**: Ensoleillé, 32-35°C
• **Cette semaine**: Temps sec, pas de pluie
• **Tendance**: Période sèche continue

⚠️ **Alerte sécheresse**:
• Irrigation recommandée 2-3x/semaine
• Paillage pour conserver l'humidité
• Surveillance accrue des cultures",
        confidence: 0.88,
        source: "Service météo",
    },
    Topic {
        name: "parasites",
        keywords: &["parasite", "insecte", "lutte", "protection", "ravageur", "chenille", "puceron", "criquet"],
        response: "🐛 **Lutte contre les parasites:**

**Méthodes naturelles:**
• Rotation des cultures (espacer 3-4 ans)
• Plantes répulsives: basilic, œillets d'Inde
• Savon noir dilué (15ml/L)
• Coccinelles contre les pucerons

**Méthodes biologiques:**
• Neem (margousier) - insecticide naturel
• Bacillus thuringiensis (chenilles)

**Prévention:**
• Inspection 2x/semaine
• Élimination plants infectés
• Espacement correct (aération)",
        confidence: 0.91,
        source: "Guide phytosanitaire",
    },
    Topic {
        name: "irrigation",
        keywords: &["eau", "arrosage", "irrigation", "arroser", "goutte", "pompe"],
        response: "💧 **Gestion de l'irrigation:**

**Besoins en eau (Burkina Faso):**
• Saison sèche: 20-30L/m²/semaine
• Saison des pluies: Selon précipitations

**Techniques recommandées:**
• Goutte-à-goutte: économie 40-60%
• Irrigation matinale (5h-8h)
• Paillage: réduit évaporation de 70%
• Bassins de rétention d'eau

**Fréquence:**
• Légumes: 2-3x/semaine
• Céréales: 1-2x/semaine
• Arbres fruitiers: 1x/semaine",
        confidence: 0.93,
        source: "Manuel irrigation",
    },
    Topic {
        name: "sol",
        keywords: &["sol", "terre", "compost", "engrais", "fertilisant", "ph", "amendement"],
        response: "🌱 **Gestion et amélioration du sol:**

**Sols du Burkina Faso:**
• Ferrugineux tropicaux (80%)
• Argilo-limoneux (bas-fonds)
• pH: 5.5-7.0

**Amélioration:**
• Compost: 3-5 kg/m² annuellement
• Fumier bien décomposé: 2-4 kg/m²
• Paillage permanent
• Légumineuses (fixation azote)

**Test sol simple:**
• Vinaigre = pétille → sol calcaire
• Ne pétille pas → sol acide",
        confidence: 0.90,
        source: "Pédologie agricole",
    },
    Topic {
        name: "recolte",
        keywords: &["récolte", "récolter", "cueillir", "maturité", "rendement", "conservation"],
        response: "🌾 **Guide de récolte:**

**Signes de maturité:**
• **Maïs**: Soies brunies, grains fermes
• **Sorgho**: Grains durs, panicules courbées
• **Tomates**: Couleur uniforme, légèrement souples
• **Oignons**: Feuillage sec, couché

**Bonnes pratiques:**
• Récolter par temps sec
• Matin ou soir (éviter chaleur)
• Outils propres et désinfectés
• Stockage ventilé et sec

**Conservation:**
• Greniers surélevés (rongeurs)
• Température fraîche
• Inspection régulière",
        confidence: 0.89,
        source: "Guide post-récolte",
    },
];

/// Topic with the most keyword hits in `lower`; ties keep the earlier topic.
#[must_use]
pub fn best_topic(lower: &str) -> Option<&'static Topic> {
    let mut best = None;
    let mut max_hits = 0;
    for topic in TOPICS {
        let hits = topic.keywords.iter().filter(|k| lower.contains(*k)).count();
        if hits > max_hits {
            max_hits = hits;
            best = Some(topic);
        }
    }
    best
}
