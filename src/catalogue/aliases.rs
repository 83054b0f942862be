//! Crop spelling variants.

/// Canonical (lowercase) crop name followed by the variants that denote it.
const CROP_ALIASES: &[(&str, &[&str])] = &[
    ("maïs", &["mais", "maïs", "maiz"]),
    ("mil", &["mil", "millet"]),
    ("sorgho", &["sorgho", "sorgo"]),
    ("riz", &["riz", "paddy"]),
    ("tomate", &["tomate", "tomates"]),
    ("oignon", &["oignon", "oignons", "ognon"]),
    ("arachide", &["arachide", "arachides", "cacahuète"]),
    ("niébé", &["niébé", "niebe", "haricot"]),
    ("coton", &["coton"]),
    ("sésame", &["sésame", "sesame"]),
    ("chou", &["chou", "choux"]),
    ("salade", &["salade", "laitue"]),
];

/// First canonical crop whose variants appear in `text`.
#[must_use]
pub fn canonical_crop(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    CROP_ALIASES
        .iter()
        .find(|(_, variants)| variants.iter().any(|v| lower.contains(v)))
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants() {
        assert_eq!(canonical_crop("Mon MAIS jaunit"), Some("maïs"));
        assert_eq!(canonical_crop("des cacahuète"), Some("arachide"));
        assert_eq!(canonical_crop("du niebe"), Some("niébé"));
        assert_eq!(canonical_crop("rien ici"), None);
    }
}
