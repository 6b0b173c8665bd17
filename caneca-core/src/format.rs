//! Rendering of a [`RecyclingResponse`] for structured and conversational clients.
//!
//! Both renderings read the same response; only presentation differs.

use serde::Serialize;

use crate::model::{RecyclingResponse, WasteCategory};

/// Reply sent on the conversational channel whenever processing fails.
pub const APOLOGY_MESSAGE: &str = "❌ No pude procesar la imagen. Intenta de nuevo.";

#[derive(Debug, Serialize)]
/// Flat record returned by the structured endpoint.
pub struct StructuredPayload<'a> {
    /// Always `true`; failures are rendered elsewhere.
    pub success: bool,
    /// Raw model label.
    #[serde(rename = "objeto_detectado")]
    pub detected_label: &'a str,
    /// Spanish display name.
    #[serde(rename = "objeto_detectado_espanol")]
    pub translated_label: &'a str,
    /// Confidence percentage with one decimal.
    #[serde(rename = "confianza")]
    pub confidence: f64,
    /// Tier wire name.
    #[serde(rename = "nivel_confianza")]
    pub confidence_level: &'static str,
    /// Tier emoji.
    #[serde(rename = "emoji_confianza")]
    pub confidence_emoji: &'static str,
    /// Photo-retake hint; serialized as `null` when absent.
    #[serde(rename = "sugerencia_foto")]
    pub photo_hint: Option<&'static str>,
    /// Catalog fields, flattened into the record.
    #[serde(flatten)]
    pub category: &'a WasteCategory,
}

/// Structured rendering of a response.
#[must_use]
pub fn structured(response: &RecyclingResponse) -> StructuredPayload<'_> {
    StructuredPayload {
        success: true,
        detected_label: response.label(),
        translated_label: response.translated_label(),
        confidence: response.confidence_percent(),
        confidence_level: response.tier().level(),
        confidence_emoji: response.tier().emoji(),
        photo_hint: response.hint(),
        category: response.category(),
    }
}

/// Chat-style rendering of a response, one fixed template.
#[must_use]
pub fn conversational(response: &RecyclingResponse) -> String {
    let category = response.category();
    let (recyclable_emoji, recyclable_text) = if category.is_recyclable {
        ("✅", "Reciclable")
    } else {
        ("❌", "No reciclable")
    };

    let mut message = format!(
        "🔍 *DETECCIÓN*\n\
         {label}\n\
         \n\
         {bin}\n\
         📦 *Tipo:* {material}\n\
         {recyclable_emoji} {recyclable_text}\n\
         \n\
         💬 *¿Cómo depositarlo?*\n\
         {advice}\n\
         \n\
         🌍 *Impacto ambiental*\n\
         {impact}\n\
         \n\
         {fun_fact}\n\
         \n\
         📊 *Confianza:* {confidence:.1}% ({level})",
        label = response.translated_label(),
        bin = category.bin_color,
        material = category.material_type,
        advice = category.disposal_advice,
        impact = category.environmental_impact,
        fun_fact = category.fun_fact,
        confidence = response.confidence_percent(),
        level = response.tier().level(),
    );

    if let Some(hint) = response.hint() {
        message.push_str("\n\n");
        message.push_str(hint);
    }

    message
}

#[derive(Debug, Serialize)]
/// Body returned by the conversational endpoint.
pub struct ConversationalReply<'a> {
    /// Text to show the user.
    pub message: String,
    /// Whether a recommendation was produced.
    pub success: bool,
    /// Structured payload, present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<StructuredPayload<'a>>,
}

impl<'a> ConversationalReply<'a> {
    /// Successful reply carrying both renderings.
    #[must_use]
    pub fn recommendation(response: &'a RecyclingResponse) -> Self {
        Self {
            message: conversational(response),
            success: true,
            data: Some(structured(response)),
        }
    }

    /// Failure reply. Deliberately carries no diagnostic detail.
    #[must_use]
    pub fn apology() -> Self {
        Self {
            message: APOLOGY_MESSAGE.to_owned(),
            success: false,
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::model::ClassificationResult;

    fn response(label: &str, score: f64) -> RecyclingResponse {
        RecyclingResponse::from_classification(ClassificationResult {
            label: label.to_owned(),
            score,
        })
    }

    #[test]
    fn structured_payload_is_flat() {
        let value = serde_json::to_value(structured(&response("water bottle", 0.9))).expect("json");

        assert_eq!(value["success"], json!(true));
        assert_eq!(value["objeto_detectado"], json!("water bottle"));
        assert_eq!(value["objeto_detectado_espanol"], json!("Botella de agua"));
        assert_eq!(value["confianza"], json!(90.0));
        assert_eq!(value["nivel_confianza"], json!("alta"));
        assert_eq!(value["emoji_confianza"], json!("✅"));
        assert_eq!(value["sugerencia_foto"], Value::Null);
        assert_eq!(value["tipo"], json!("Plástico"));
        assert_eq!(value["caneca"], json!("⚪ CANECA BLANCA"));
        assert_eq!(value["categoria"], json!("Aprovechable"));
        assert_eq!(value["reciclable"], json!(true));
        assert_eq!(value["materiales_similares"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["puntos_reciclaje"][0], json!("Puntos verdes"));
        assert!(value.get("impacto_ambiental").is_some());
        assert!(value.get("dato_curioso").is_some());
        assert!(value.get("consejo").is_some());
    }

    #[test]
    fn hint_key_is_present_when_set() {
        let value = serde_json::to_value(structured(&response("banana", 0.5))).expect("json");

        assert_eq!(value["nivel_confianza"], json!("media"));
        assert_eq!(value["sugerencia_foto"], json!("💡 Intenta acercar más la cámara"));
    }

    #[test]
    fn conversational_template_without_hint() {
        let message = conversational(&response("water bottle", 0.853));
        let expected = "🔍 *DETECCIÓN*\n\
                        Botella de agua\n\
                        \n\
                        ⚪ CANECA BLANCA\n\
                        📦 *Tipo:* Plástico\n\
                        ✅ Reciclable\n\
                        \n\
                        💬 *¿Cómo depositarlo?*\n\
                        Enjuaga el envase y aplástalo antes de depositarlo\n\
                        \n\
                        🌍 *Impacto ambiental*\n\
                        El plástico tarda entre 100 y 1000 años en degradarse\n\
                        \n\
                        💡 Una botella reciclada ahorra energía para 3 horas de TV\n\
                        \n\
                        📊 *Confianza:* 85.3% (alta)";

        assert_eq!(message, expected);
    }

    #[test]
    fn conversational_appends_hint_last() {
        let message = conversational(&response("tabby cat", 0.1));

        assert!(message.contains("❌ No reciclable"));
        assert!(message.contains("⚫ CANECA NEGRA"));
        assert!(message.ends_with(
            "📊 *Confianza:* 10.0% (baja)\n\n📸 Toma otra foto más cerca o con mejor luz"
        ));
    }

    #[test]
    fn apology_has_no_data() {
        let value = serde_json::to_value(ConversationalReply::apology()).expect("json");

        assert_eq!(value, json!({"message": APOLOGY_MESSAGE, "success": false}));
    }

    #[test]
    fn recommendation_reply_embeds_structured_payload() {
        let response = response("apple", 0.75);
        let value = serde_json::to_value(ConversationalReply::recommendation(&response)).expect("json");

        assert_eq!(value["success"], json!(true));
        assert_eq!(value["data"], serde_json::to_value(structured(&response)).expect("json"));
        assert!(value["message"].as_str().is_some_and(|text| text.contains("Manzana")));
    }
}
