//! Ordered keyword rules mapping classifier labels onto the waste catalog.
//!
//! Rules are evaluated top to bottom and the first rule with a keyword occurring
//! anywhere in the lowercased label wins, so "bottlecap" and "paper cups" are plastic. There is no scoring; a later, "better" match never overrides
//! an earlier one. Labels matching nothing fall through to [`UNCLASSIFIED`].

use crate::model::{BinColor, MaterialKind, WasteCategory};

/// Plastic packaging.
pub static PLASTIC: WasteCategory = WasteCategory {
    material_type: MaterialKind::Plastic,
    bin_color: BinColor::White,
    category: "Aprovechable",
    disposal_advice: "Enjuaga el envase y aplástalo antes de depositarlo",
    is_recyclable: true,
    similar_materials: &[
        "Botellas PET",
        "Envases de champú",
        "Bolsas plásticas limpias",
    ],
    environmental_impact: "El plástico tarda entre 100 y 1000 años en degradarse",
    fun_fact: "💡 Una botella reciclada ahorra energía para 3 horas de TV",
    dropoff_points: &["Puntos verdes", "Centros de acopio", "Recicladores de base"],
};

/// Glass bottles and jars.
pub static GLASS: WasteCategory = WasteCategory {
    material_type: MaterialKind::Glass,
    bin_color: BinColor::White,
    category: "Aprovechable",
    disposal_advice: "Retira tapas metálicas, enjuaga bien",
    is_recyclable: true,
    similar_materials: &[
        "Botellas de vino",
        "Frascos de alimentos",
        "Envases de perfume",
    ],
    environmental_impact: "El vidrio es 100% reciclable infinitas veces",
    fun_fact: "🌟 Reciclar 1 botella ahorra energía para 20 horas de LED",
    dropoff_points: &["Contenedores blancos", "Vidrieros locales"],
};

/// Cans and metal packaging.
pub static METAL: WasteCategory = WasteCategory {
    material_type: MaterialKind::Metal,
    bin_color: BinColor::White,
    category: "Aprovechable",
    disposal_advice: "Aplana las latas para ahorrar espacio",
    is_recyclable: true,
    similar_materials: &[
        "Latas de bebidas",
        "Latas de conservas",
        "Tapas metálicas",
    ],
    environmental_impact: "Reciclar aluminio ahorra 95% de energía",
    fun_fact: "♻️ Una lata puede ser lata nueva en 60 días",
    dropoff_points: &["Chatarreros certificados", "Puntos de acopio"],
};

/// Paper and cardboard.
pub static PAPER_CARDBOARD: WasteCategory = WasteCategory {
    material_type: MaterialKind::PaperCardboard,
    bin_color: BinColor::White,
    category: "Aprovechable",
    disposal_advice: "Solo si está limpio y seco",
    is_recyclable: true,
    similar_materials: &["Periódicos", "Cajas de cartón", "Papel de oficina"],
    environmental_impact: "1 tonelada reciclada salva 17 árboles",
    fun_fact: "📚 El papel se recicla hasta 7 veces",
    dropoff_points: &["Cartoneros", "Cooperativas de recicladores"],
};

/// Compostable food waste.
pub static ORGANIC: WasteCategory = WasteCategory {
    material_type: MaterialKind::Organic,
    bin_color: BinColor::Green,
    category: "Orgánico biodegradable",
    disposal_advice: "Ideal para compostaje",
    is_recyclable: false,
    similar_materials: &[
        "Cáscaras de frutas",
        "Restos de comida",
        "Residuos de jardín",
    ],
    environmental_impact: "En rellenos genera metano. ¡Compóstalos!",
    fun_fact: "🌱 El compostaje reduce 30% residuos del hogar",
    dropoff_points: &["Composteras comunitarias", "Agricultura urbana"],
};

/// Default arm for labels no rule recognises.
pub static UNCLASSIFIED: WasteCategory = WasteCategory {
    material_type: MaterialKind::Unclassified,
    bin_color: BinColor::Black,
    category: "No aprovechable (por precaución)",
    disposal_advice: "Si tienes dudas, deposítalo en la caneca negra",
    is_recyclable: false,
    similar_materials: &["Objetos mixtos", "Artículos electrónicos pequeños"],
    environmental_impact: "La clasificación correcta facilita el reciclaje",
    fun_fact: "🤔 Consulta con tu operador de aseo local",
    dropoff_points: &["CAI ambiental", "Línea de atención de aseo"],
};

#[derive(Debug)]
/// One entry of the rule table.
pub struct Rule {
    /// Lowercase keywords; any one of them occurring in the label triggers the rule.
    pub keywords: &'static [&'static str],
    /// Catalog entry returned when the rule fires.
    pub category: &'static WasteCategory,
}

impl Rule {
    /// Whether any keyword occurs in the already lowercased label.
    #[must_use]
    pub fn matches(&self, lowercased: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| lowercased.contains(keyword))
    }
}

/// The rule table in evaluation order.
pub static RULES: [Rule; 5] = [
    Rule {
        keywords: &["bottle", "plastic", "cup", "container", "jug"],
        category: &PLASTIC,
    },
    Rule {
        keywords: &["glass", "jar", "wine", "beer"],
        category: &GLASS,
    },
    Rule {
        keywords: &["can", "tin", "aluminum", "metal"],
        category: &METAL,
    },
    Rule {
        keywords: &["paper", "cardboard", "box", "book"],
        category: &PAPER_CARDBOARD,
    },
    Rule {
        keywords: &["banana", "apple", "orange", "food", "fruit"],
        category: &ORGANIC,
    },
];

/// Resolve a label to its catalog entry. Always returns a category.
#[must_use]
pub fn resolve(label: &str) -> &'static WasteCategory {
    let lowercased = label.to_lowercase();

    RULES
        .iter()
        .find(|rule| rule.matches(&lowercased))
        .map_or(&UNCLASSIFIED, |rule| rule.category)
}
