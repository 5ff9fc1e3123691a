use serde::{Deserialize, Serialize};

/// A single scored dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreMetric {
    /// 1 to 10.
    pub score: u8,
    pub rationale: String,
}

/// Structured score returned by the assistant for a post or thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostScore {
    pub engagement: ScoreMetric,
    pub clarity: ScoreMetric,
    pub tone_alignment: ScoreMetric,
    pub overall: ScoreMetric,
}

impl PostScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Named metrics in display order, overall last.
    pub fn metrics(&self) -> [(&'static str, &ScoreMetric); 4] {
        [
            ("Engagement", &self.engagement),
            ("Clarity", &self.clarity),
            ("Tone Alignment", &self.tone_alignment),
            ("Overall", &self.overall),
        ]
    }

    /// Checks every score is within 1..=10.
    pub fn validate(&self) -> Result<(), String> {
        for (name, metric) in self.metrics() {
            if !(Self::MIN..=Self::MAX).contains(&metric.score) {
                return Err(format!(
                    "{name} score {} is outside {}-{}",
                    metric.score,
                    Self::MIN,
                    Self::MAX
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "engagement": {"score": 7, "rationale": "Strong hook."},
        "clarity": {"score": 9, "rationale": "Easy to follow."},
        "toneAlignment": {"score": 6, "rationale": "Slightly formal."},
        "overall": {"score": 7, "rationale": "Solid post."}
    }"#;

    #[test]
    fn test_parse_camel_case_score() {
        let score: PostScore = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(score.tone_alignment.score, 6);
        assert!(score.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_score_fails_validation() {
        let mut score: PostScore = serde_json::from_str(SAMPLE).unwrap();
        score.clarity.score = 11;
        assert!(score.validate().unwrap_err().contains("Clarity"));

        score.clarity.score = 0;
        assert!(score.validate().is_err());
    }
}
