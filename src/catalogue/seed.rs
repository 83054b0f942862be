//! Reference data loaded into an empty catalogue.

/// name, kind, cycle length in days, description
pub const CROPS: &[(&str, &str, i64, &str)] = &[
    ("Maïs", "céréale", 90, "Céréale de base très cultivée, sensible au manque d'eau au démarrage."),
    ("Sorgho", "céréale", 110, "Céréale résistante à la sécheresse, adaptée aux zones sèches."),
    ("Mil", "céréale", 100, "Céréale traditionnelle très résistante, pour sols pauvres."),
    ("Riz", "céréale", 120, "Culture de bas-fond demandant beaucoup d'eau."),
    ("Niébé", "légumineuse", 70, "Légumineuse qui fixe l'azote et enrichit le sol."),
    ("Arachide", "légumineuse", 110, "Culture de rente, apprécie les sols sablo-limoneux."),
    ("Tomate", "maraîchère", 80, "Culture maraîchère exigeante en eau et en suivi sanitaire."),
    ("Oignon", "maraîchère", 120, "Culture de saison sèche, sensible à l'excès d'eau."),
];

/// crop, region, start month, end month, advice
pub const PERIODS: &[(&str, &str, u32, u32, &str)] = &[
    ("Maïs", "Centre", 5, 7, "Semer dès l'installation des pluies, sur sol bien préparé."),
    ("Sorgho", "Centre", 6, 7, "Semer après le maïs, tolère mieux les pauses pluviométriques."),
    ("Mil", "Nord", 6, 7, "Privilégier le mil dans les zones très sèches."),
    ("Riz", "Bas-fonds", 6, 7, "Planter dans les bas-fonds ou zones irriguées."),
    ("Niébé", "Centre", 7, 8, "Peut être associé avec le maïs pour enrichir le sol."),
    ("Arachide", "Centre", 5, 6, "Semer en début de saison des pluies sur sols légers."),
    ("Tomate", "Périmètre irrigué", 11, 2, "Culture de saison sèche avec irrigation régulière."),
    ("Oignon", "Périmètre irrigué", 11, 1, "Préférer des sols légers, bien drainés."),
];

/// name, description
pub const SOILS: &[(&str, &str)] = &[
    ("sablonneux", "Sols légers, pauvres en matière organique, se réchauffent vite mais retiennent peu l'eau."),
    ("argilo-limoneux", "Sols fertiles, bons pour de nombreuses cultures mais sensibles au tassement."),
    ("ferrugineux tropicaux", "Sols dominants au Burkina, souvent pauvres en matière organique."),
];

/// crop, soil
pub const CROP_SOILS: &[(&str, &str)] = &[
    ("Maïs", "ferrugineux tropicaux"),
    ("Maïs", "argilo-limoneux"),
    ("Sorgho", "ferrugineux tropicaux"),
    ("Mil", "sablonneux"),
    ("Riz", "argilo-limoneux"),
    ("Tomate", "argilo-limoneux"),
    ("Oignon", "sablonneux"),
];
