//! Confidence tiering for classifier scores.

/// Lowest score (inclusive) treated as a confident detection.
pub const HIGH_THRESHOLD: f64 = 0.70;
/// Lowest score (inclusive) treated as a usable but uncertain detection.
pub const MEDIUM_THRESHOLD: f64 = 0.40;

/// Hint attached to medium-confidence results.
pub const MOVE_CLOSER_HINT: &str = "💡 Intenta acercar más la cámara";
/// Hint attached to low-confidence results.
pub const RETAKE_HINT: &str = "📸 Toma otra foto más cerca o con mejor luz";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Discrete bucket derived from a classifier score.
pub enum ConfidenceTier {
    /// Score of at least 0.70.
    High,
    /// Score in `[0.40, 0.70)`.
    Medium,
    /// Score below 0.40.
    Low,
}

impl ConfidenceTier {
    /// Wire name used by both response formats.
    #[must_use]
    pub fn level(self) -> &'static str {
        match self {
            ConfidenceTier::High => "alta",
            ConfidenceTier::Medium => "media",
            ConfidenceTier::Low => "baja",
        }
    }

    /// Emoji shown next to the confidence level.
    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            ConfidenceTier::High => "✅",
            ConfidenceTier::Medium | ConfidenceTier::Low => "⚠️",
        }
    }

    /// Photo-retake hint for this tier, if any.
    #[must_use]
    pub fn hint(self) -> Option<&'static str> {
        match self {
            ConfidenceTier::High => None,
            ConfidenceTier::Medium => Some(MOVE_CLOSER_HINT),
            ConfidenceTier::Low => Some(RETAKE_HINT),
        }
    }
}

/// Bucket a score and pick the matching photo hint.
///
/// Lower bounds are inclusive, so exactly 0.70 is high and exactly 0.40 is medium.
/// The decision uses the raw score, not the rounded percentage.
#[must_use]
pub fn tier(score: f64) -> (ConfidenceTier, Option<&'static str>) {
    let tier = if score >= HIGH_THRESHOLD {
        ConfidenceTier::High
    } else if score >= MEDIUM_THRESHOLD {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    };
    (tier, tier.hint())
}

/// Score expressed as a percentage rounded to one decimal place.
#[must_use]
pub fn confidence_percent(score: f64) -> f64 {
    (score * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_round_up_into_the_higher_tier() {
        assert_eq!(tier(0.70), (ConfidenceTier::High, None));
        assert_eq!(tier(0.40), (ConfidenceTier::Medium, Some(MOVE_CLOSER_HINT)));
    }

    #[test]
    fn just_below_a_boundary_stays_in_the_lower_tier() {
        let (medium, hint) = tier(0.6999);
        assert_eq!(medium, ConfidenceTier::Medium);
        assert!(hint.is_some());

        assert_eq!(tier(0.399), (ConfidenceTier::Low, Some(RETAKE_HINT)));
    }

    #[test]
    fn extremes() {
        assert_eq!(tier(1.0).0, ConfidenceTier::High);
        assert_eq!(tier(0.0).0, ConfidenceTier::Low);
    }

    #[test]
    fn tier_uses_unrounded_score() {
        // 0.6999 renders as 70.0 % but is still medium.
        assert!((confidence_percent(0.6999) - 70.0).abs() < 1e-9);
        assert_eq!(tier(0.6999).0, ConfidenceTier::Medium);
    }

    #[test]
    fn percent_has_one_decimal() {
        assert!((confidence_percent(0.85321) - 85.3).abs() < 1e-9);
        assert!((confidence_percent(0.12345) - 12.3).abs() < 1e-9);
        assert!((confidence_percent(1.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn wire_names() {
        assert_eq!(ConfidenceTier::High.level(), "alta");
        assert_eq!(ConfidenceTier::Medium.level(), "media");
        assert_eq!(ConfidenceTier::Low.level(), "baja");
        assert_eq!(ConfidenceTier::Low.emoji(), "⚠️");
    }
}
