//! Domain data structures for uploads, predictions, waste categories and responses.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::resolver;
use crate::tier::{self, ConfidenceTier};
use crate::translate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Material families known to the Colombian colour code.
pub enum MaterialKind {
    /// Plastic containers and packaging.
    Plastic,
    /// Glass bottles and jars.
    Glass,
    /// Cans and other metal packaging.
    Metal,
    /// Paper and cardboard.
    PaperCardboard,
    /// Food and garden waste.
    Organic,
    /// Anything the rule table does not recognise.
    Unclassified,
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MaterialKind::Plastic => "Plástico",
            MaterialKind::Glass => "Vidrio",
            MaterialKind::Metal => "Metal/Lata",
            MaterialKind::PaperCardboard => "Papel/Cartón",
            MaterialKind::Organic => "Orgánico",
            MaterialKind::Unclassified => "No identificado",
        };
        write!(formatter, "{name}")
    }
}

impl Serialize for MaterialKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Bin colours of the national separation-at-source scheme.
pub enum BinColor {
    /// Recoverable, clean and dry materials.
    White,
    /// Organic, compostable waste.
    Green,
    /// Non-recoverable waste.
    Black,
}

impl fmt::Display for BinColor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BinColor::White => "⚪ CANECA BLANCA",
            BinColor::Green => "🟢 CANECA VERDE",
            BinColor::Black => "⚫ CANECA NEGRA",
        };
        write!(formatter, "{label}")
    }
}

impl Serialize for BinColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone)]
/// Photo bytes exactly as uploaded.
pub struct RawImage {
    /// Encoded image data.
    pub bytes: Vec<u8>,
    /// Content type declared by the client, if any.
    pub content_type: Option<String>,
}

impl RawImage {
    /// Wrap uploaded bytes together with their declared content type.
    #[must_use]
    pub fn new<C: Into<String>>(bytes: Vec<u8>, content_type: Option<C>) -> Self {
        Self {
            bytes,
            content_type: content_type.map(Into::into),
        }
    }

    /// Whether the upload carried no data at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A single `(label, score)` pair produced by the classifier.
pub struct ClassificationResult {
    /// Free-text class name, e.g. "water bottle".
    pub label: String,
    /// Model confidence in `[0, 1]`.
    pub score: f64,
}

#[derive(Debug, PartialEq, Serialize)]
/// Disposal guidance for one entry of the fixed waste catalog.
pub struct WasteCategory {
    /// Material family.
    #[serde(rename = "tipo")]
    pub material_type: MaterialKind,
    /// Bin the item belongs in.
    #[serde(rename = "caneca")]
    pub bin_color: BinColor,
    /// Recoverability class.
    #[serde(rename = "categoria")]
    pub category: &'static str,
    /// How to prepare and deposit the item.
    #[serde(rename = "consejo")]
    pub disposal_advice: &'static str,
    /// Whether the item goes to recycling.
    #[serde(rename = "reciclable")]
    pub is_recyclable: bool,
    /// Other items handled the same way.
    #[serde(rename = "materiales_similares")]
    pub similar_materials: &'static [&'static str],
    /// Short environmental note.
    #[serde(rename = "impacto_ambiental")]
    pub environmental_impact: &'static str,
    /// Trivia shown alongside the advice.
    #[serde(rename = "dato_curioso")]
    pub fun_fact: &'static str,
    /// Where the item can be dropped off.
    #[serde(rename = "puntos_reciclaje")]
    pub dropoff_points: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq)]
/// Everything the pipeline learned about one photo.
///
/// Built once per request from the top-ranked prediction and never modified afterwards.
pub struct RecyclingResponse {
    classification: ClassificationResult,
    translated_label: String,
    confidence_percent: f64,
    tier: ConfidenceTier,
    hint: Option<&'static str>,
    category: &'static WasteCategory,
}

impl RecyclingResponse {
    /// Combine tiering, category resolution and translation for a prediction.
    ///
    /// Tiering only looks at the score and resolution only looks at the label.
    #[must_use]
    pub fn from_classification(classification: ClassificationResult) -> Self {
        let confidence_percent = tier::confidence_percent(classification.score);
        let (tier, hint) = tier::tier(classification.score);
        let category = resolver::resolve(&classification.label);
        let translated_label = translate::translate_label(&classification.label).to_owned();

        Self {
            classification,
            confidence_percent,
            translated_label,
            tier,
            hint,
            category,
        }
    }

    /// Prediction the response was derived from.
    #[must_use]
    pub fn classification(&self) -> &ClassificationResult {
        &self.classification
    }

    /// Raw model label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.classification.label
    }

    /// Spanish display name for the label.
    #[must_use]
    pub fn translated_label(&self) -> &str {
        &self.translated_label
    }

    /// Score as a percentage rounded to one decimal.
    #[must_use]
    pub fn confidence_percent(&self) -> f64 {
        self.confidence_percent
    }

    /// Confidence bucket decided on the unrounded score.
    #[must_use]
    pub fn tier(&self) -> ConfidenceTier {
        self.tier
    }

    /// Photo-retake hint, present for medium and low confidence.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        self.hint
    }

    /// Resolved catalog entry.
    #[must_use]
    pub fn category(&self) -> &'static WasteCategory {
        self.category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(label: &str, score: f64) -> ClassificationResult {
        ClassificationResult {
            label: label.to_owned(),
            score,
        }
    }

    #[test]
    fn response_combines_tier_category_and_translation() {
        let response = RecyclingResponse::from_classification(prediction("water bottle", 0.853));

        assert_eq!(response.translated_label(), "Botella de agua");
        assert!((response.confidence_percent() - 85.3).abs() < 1e-9);
        assert_eq!(response.tier(), ConfidenceTier::High);
        assert_eq!(response.hint(), None);
        assert_eq!(response.category().material_type, MaterialKind::Plastic);
    }

    #[test]
    fn unknown_label_keeps_its_name_and_falls_back() {
        let response = RecyclingResponse::from_classification(prediction("tabby cat", 0.2));

        assert_eq!(response.translated_label(), "tabby cat");
        assert_eq!(response.tier(), ConfidenceTier::Low);
        assert!(response.hint().is_some());
        assert_eq!(response.category().bin_color, BinColor::Black);
    }

    #[test]
    fn same_prediction_builds_identical_responses() {
        let first = RecyclingResponse::from_classification(prediction("beer bottle", 0.5));
        let second = RecyclingResponse::from_classification(prediction("beer bottle", 0.5));

        assert_eq!(first, second);
    }

    #[test]
    fn catalog_labels_serialize_as_display_text() {
        let value = serde_json::to_value(MaterialKind::PaperCardboard).expect("serialize");
        assert_eq!(value, "Papel/Cartón");

        let value = serde_json::to_value(BinColor::Green).expect("serialize");
        assert_eq!(value, "🟢 CANECA VERDE");
    }
}
