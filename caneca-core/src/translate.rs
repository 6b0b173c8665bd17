//! Spanish display names for common model labels.

const TRANSLATIONS: &[(&str, &str)] = &[
    ("water bottle", "Botella de agua"),
    ("coffee mug", "Taza de café"),
    ("plastic bag", "Bolsa plástica"),
    ("wine glass", "Copa de vino"),
    ("beer bottle", "Botella de cerveza"),
    ("banana", "Banana/Plátano"),
    ("apple", "Manzana"),
    ("orange", "Naranja"),
];

/// Translate a model label, passing unknown labels through unchanged.
#[must_use]
pub fn translate_label(label: &str) -> &str {
    TRANSLATIONS
        .iter()
        .find(|(english, _)| *english == label)
        .map_or(label, |&(_, spanish)| spanish)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_are_translated() {
        assert_eq!(translate_label("water bottle"), "Botella de agua");
        assert_eq!(translate_label("banana"), "Banana/Plátano");
    }

    #[test]
    fn unknown_labels_pass_through() {
        assert_eq!(translate_label("tabby, tabby cat"), "tabby, tabby cat");
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(translate_label("Water Bottle"), "Water Bottle");
    }
}
