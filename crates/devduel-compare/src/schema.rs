//! The comparison schema: the fixed contract the model's reply must satisfy.
//!
//! Single source of truth shared by the prompt builder (which names every
//! section and its ranges in the instruction block) and the response
//! validator (which enforces them). Wire names are camelCase to match the
//! JSON contract; the two subject slots are always `userA` and `userB`.

use serde::{Deserialize, Serialize};

/// Wire name of the first subject slot, also the fallback identity label.
pub const SUBJECT_A: &str = "userA";
/// Wire name of the second subject slot, also the fallback identity label.
pub const SUBJECT_B: &str = "userB";

/// Inclusive score range for every metric and overall score.
pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 10.0;

/// Every required top-level section, in contract order.
pub const TOP_LEVEL_SECTIONS: [&str; 11] = [
    "usernames",
    "overview",
    "metrics",
    "topLanguages",
    "statistics",
    "overallScores",
    "strengths",
    "weaknesses",
    "missingElements",
    "improvements",
    "finalVerdict",
];

/// The six named metric categories scored per subject.
pub const METRIC_SECTIONS: [&str; 6] = [
    "activity",
    "codeQuality",
    "consistency",
    "documentation",
    "techStack",
    "socialProof",
];

/// Required headings for the narrative (markdown) report variant.
pub const NARRATIVE_SECTIONS: [&str; 7] = [
    "## Overview",
    "## Metrics",
    "## Languages",
    "## Statistics",
    "## Strengths & Weaknesses",
    "## Improvements",
    "## Final Verdict",
];

/// One value per subject slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubjectPair<T> {
    #[serde(rename = "userA")]
    pub user_a: T,
    #[serde(rename = "userB")]
    pub user_b: T,
}

/// A declared winner; only the two recognized subject slots are accepted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Winner {
    #[serde(rename = "userA")]
    UserA,
    #[serde(rename = "userB")]
    UserB,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricScore {
    #[serde(rename = "userA")]
    pub user_a: f64,
    #[serde(rename = "userB")]
    pub user_b: f64,
    pub winner: Winner,
    pub insight: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metrics {
    pub activity: MetricScore,
    #[serde(rename = "codeQuality")]
    pub code_quality: MetricScore,
    pub consistency: MetricScore,
    pub documentation: MetricScore,
    #[serde(rename = "techStack")]
    pub tech_stack: MetricScore,
    #[serde(rename = "socialProof")]
    pub social_proof: MetricScore,
}

impl Metrics {
    /// All metric categories with their wire names, in [`METRIC_SECTIONS`] order.
    #[must_use]
    pub fn named(&self) -> [(&'static str, &MetricScore); 6] {
        [
            ("activity", &self.activity),
            ("codeQuality", &self.code_quality),
            ("consistency", &self.consistency),
            ("documentation", &self.documentation),
            ("techStack", &self.tech_stack),
            ("socialProof", &self.social_proof),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LanguageShare {
    pub name: String,
    /// 0–100.
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubjectStats {
    pub repos: i64,
    pub followers: i64,
    pub following: i64,
    pub stars: i64,
    pub contributions: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeadToHeadScore {
    #[serde(rename = "userA")]
    pub user_a: f64,
    #[serde(rename = "userB")]
    pub user_b: f64,
    pub verdict: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AbsoluteScore {
    #[serde(rename = "userA")]
    pub user_a: f64,
    #[serde(rename = "userB")]
    pub user_b: f64,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverallScores {
    #[serde(rename = "headToHead")]
    pub head_to_head: HeadToHeadScore,
    pub absolute: AbsoluteScore,
}

/// The schema-validated structured comparison. Only [`crate::validate`]
/// produces values of this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonPayload {
    pub usernames: SubjectPair<String>,
    pub overview: SubjectPair<String>,
    pub metrics: Metrics,
    pub top_languages: SubjectPair<Vec<LanguageShare>>,
    pub statistics: SubjectPair<SubjectStats>,
    pub overall_scores: OverallScores,
    pub strengths: SubjectPair<Vec<String>>,
    pub weaknesses: SubjectPair<Vec<String>>,
    pub missing_elements: SubjectPair<Vec<String>>,
    pub improvements: SubjectPair<Vec<String>>,
    pub final_verdict: String,
}
