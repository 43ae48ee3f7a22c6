//! Strict validation of the model's raw reply.
//!
//! The reply is adversarial until proven otherwise: it may be fenced,
//! truncated, prose-wrapped, or structurally wrong. Validation strips
//! incidental fencing, parses, and checks the full contract; it never
//! clamps out-of-range values (a score of 11 is a contract failure the
//! caller needs to see, not a value to repair) and never evaluates the
//! text as anything but data.

use serde_json::Value;

use crate::error::ValidationError;
use crate::report::{ComparisonReport, ReportFormat};
use crate::schema::{
    ComparisonPayload, LanguageShare, MetricScore, SubjectPair, METRIC_SECTIONS,
    NARRATIVE_SECTIONS, SCORE_MAX, SCORE_MIN, SUBJECT_A, SUBJECT_B, TOP_LEVEL_SECTIONS,
};

/// Validates a raw model reply against the contract for `format`.
///
/// # Errors
///
/// - [`ValidationError::Malformed`] — the reply does not parse at all.
/// - [`ValidationError::SchemaViolation`] — a required section is missing or
///   a value is out of contract; the path names the offending location.
pub fn validate_reply(raw: &str, format: ReportFormat) -> Result<ComparisonReport, ValidationError> {
    match format {
        ReportFormat::Analytics => validate_analytics(raw).map(ComparisonReport::Analytics),
        ReportFormat::Narrative => validate_narrative(raw).map(ComparisonReport::Narrative),
    }
}

/// Strips one layer of surrounding markdown code fencing, if present.
///
/// Models add ```-fences despite instruction; treat them as incidental
/// formatting, not content. Idempotent: unfenced input is returned as-is
/// (modulo whitespace trimming).
pub(crate) fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // Drop the info string ("json", "markdown", ...). Models sometimes
        // emit the whole reply on one line, so the info string is bounded by
        // the first non-alphanumeric character, not by a newline.
        text = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
        text = text.trim_end();
        if let Some(body) = text.strip_suffix("```") {
            text = body;
        }
        text = text.trim();
    }
    text
}

fn validate_analytics(raw: &str) -> Result<ComparisonPayload, ValidationError> {
    let text = strip_code_fences(raw);

    let value: Value = serde_json::from_str(text).map_err(|source| ValidationError::Malformed {
        raw: raw.to_owned(),
        source,
    })?;

    check_required_sections(&value)?;

    // Typed deserialization mops up remaining shape problems (wrong types
    // inside sections, missing nested fields) after the named-path checks.
    let payload: ComparisonPayload = serde_json::from_value(value)
        .map_err(|e| ValidationError::violation("$", e.to_string()))?;

    check_ranges(&payload)?;
    Ok(payload)
}

/// Presence and slot checks against the untyped value, so violations carry
/// the exact offending path.
fn check_required_sections(value: &Value) -> Result<(), ValidationError> {
    let Some(root) = value.as_object() else {
        return Err(ValidationError::violation("$", "expected a JSON object"));
    };

    for section in TOP_LEVEL_SECTIONS {
        if !root.contains_key(section) {
            return Err(ValidationError::violation(
                section,
                "missing required section",
            ));
        }
    }

    let Some(metrics) = root["metrics"].as_object() else {
        return Err(ValidationError::violation("metrics", "expected an object"));
    };

    for metric in METRIC_SECTIONS {
        let Some(entry) = metrics.get(metric) else {
            return Err(ValidationError::violation(
                format!("metrics.{metric}"),
                "missing required metric category",
            ));
        };
        let Some(entry) = entry.as_object() else {
            return Err(ValidationError::violation(
                format!("metrics.{metric}"),
                "expected an object",
            ));
        };

        for slot in [SUBJECT_A, SUBJECT_B] {
            match entry.get(slot) {
                Some(score) if score.is_number() => {}
                Some(_) => {
                    return Err(ValidationError::violation(
                        format!("metrics.{metric}.{slot}"),
                        "expected a number",
                    ));
                }
                None => {
                    return Err(ValidationError::violation(
                        format!("metrics.{metric}.{slot}"),
                        "missing per-subject score",
                    ));
                }
            }
        }

        match entry.get("winner").and_then(Value::as_str) {
            Some(w) if w == SUBJECT_A || w == SUBJECT_B => {}
            Some(w) => {
                return Err(ValidationError::violation(
                    format!("metrics.{metric}.winner"),
                    format!("\"{w}\" is not one of the two subject slots"),
                ));
            }
            None => {
                return Err(ValidationError::violation(
                    format!("metrics.{metric}.winner"),
                    "missing or non-string winner",
                ));
            }
        }
    }

    Ok(())
}

fn check_ranges(payload: &ComparisonPayload) -> Result<(), ValidationError> {
    for (name, metric) in payload.metrics.named() {
        check_metric_scores(name, metric)?;
    }

    let overall = &payload.overall_scores;
    check_score("overallScores.headToHead.userA", overall.head_to_head.user_a)?;
    check_score("overallScores.headToHead.userB", overall.head_to_head.user_b)?;
    check_score("overallScores.absolute.userA", overall.absolute.user_a)?;
    check_score("overallScores.absolute.userB", overall.absolute.user_b)?;

    check_language_shares("topLanguages", &payload.top_languages)?;
    Ok(())
}

fn check_metric_scores(name: &str, metric: &MetricScore) -> Result<(), ValidationError> {
    check_score(format!("metrics.{name}.userA"), metric.user_a)?;
    check_score(format!("metrics.{name}.userB"), metric.user_b)?;
    Ok(())
}

fn check_score(path: impl Into<String>, score: f64) -> Result<(), ValidationError> {
    // NaN fails the range test as well.
    if (SCORE_MIN..=SCORE_MAX).contains(&score) {
        Ok(())
    } else {
        Err(ValidationError::violation(
            path,
            format!("score {score} is outside {SCORE_MIN}-{SCORE_MAX}"),
        ))
    }
}

fn check_language_shares(
    path: &str,
    languages: &SubjectPair<Vec<LanguageShare>>,
) -> Result<(), ValidationError> {
    for (slot, shares) in [(SUBJECT_A, &languages.user_a), (SUBJECT_B, &languages.user_b)] {
        for (index, share) in shares.iter().enumerate() {
            if !(0.0..=100.0).contains(&share.percentage) {
                return Err(ValidationError::violation(
                    format!("{path}.{slot}[{index}].percentage"),
                    format!("percentage {} is outside 0-100", share.percentage),
                ));
            }
        }
    }
    Ok(())
}

fn validate_narrative(raw: &str) -> Result<String, ValidationError> {
    let text = strip_code_fences(raw);

    if text.trim().is_empty() {
        return Err(ValidationError::violation("report", "report is empty"));
    }

    for heading in NARRATIVE_SECTIONS {
        if !text.contains(heading) {
            return Err(ValidationError::violation(
                heading,
                "missing required heading",
            ));
        }
    }

    Ok(text.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(a: f64, b: f64, winner: &str) -> serde_json::Value {
        serde_json::json!({
            "userA": a,
            "userB": b,
            "winner": winner,
            "insight": "more frequent commits"
        })
    }

    fn valid_reply() -> serde_json::Value {
        serde_json::json!({
            "usernames": { "userA": "alice", "userB": "bob" },
            "overview": { "userA": "Prolific Rustacean", "userB": "Weekend hacker" },
            "metrics": {
                "activity": metric(8.0, 4.0, "userA"),
                "codeQuality": metric(7.0, 6.0, "userA"),
                "consistency": metric(5.0, 9.0, "userB"),
                "documentation": metric(6.0, 6.5, "userB"),
                "techStack": metric(7.5, 5.0, "userA"),
                "socialProof": metric(9.0, 2.0, "userA")
            },
            "topLanguages": {
                "userA": [ { "name": "Rust", "percentage": 80.0 } ],
                "userB": [ { "name": "Python", "percentage": 55.0 } ]
            },
            "statistics": {
                "userA": { "repos": 30, "followers": 120, "following": 10, "stars": 900, "contributions": 2100 },
                "userB": { "repos": 12, "followers": 15, "following": 40, "stars": 60, "contributions": 340 }
            },
            "overallScores": {
                "headToHead": { "userA": 8.0, "userB": 5.0, "verdict": "alice leads on activity and reach" },
                "absolute": { "userA": 7.0, "userB": 4.5, "explanation": "both trail a complete profile" }
            },
            "strengths": { "userA": ["active"], "userB": ["consistent"] },
            "weaknesses": { "userA": ["sparse docs"], "userB": ["low reach"] },
            "missingElements": { "userA": ["pinned repos"], "userB": ["bio"] },
            "improvements": { "userA": ["write READMEs"], "userB": ["publish more"] },
            "finalVerdict": "alice wins overall; bob is steadier week to week."
        })
    }

    fn validate_str(raw: &str) -> Result<ComparisonPayload, ValidationError> {
        match validate_reply(raw, ReportFormat::Analytics)? {
            ComparisonReport::Analytics(payload) => Ok(payload),
            ComparisonReport::Narrative(_) => unreachable!("analytics format requested"),
        }
    }

    #[test]
    fn accepts_well_formed_reply() {
        let payload = validate_str(&valid_reply().to_string()).expect("should validate");
        assert_eq!(payload.usernames.user_a, "alice");
        assert_eq!(payload.usernames.user_b, "bob");
        assert_eq!(payload.metrics.activity.user_a, 8.0);
    }

    #[test]
    fn fenced_reply_validates_identically_to_unfenced() {
        let plain = valid_reply().to_string();
        let fenced = format!("```json\n{plain}\n```");
        let from_plain = validate_str(&plain).expect("plain should validate");
        let from_fenced = validate_str(&fenced).expect("fenced should validate");
        assert_eq!(from_plain, from_fenced);
    }

    #[test]
    fn strip_code_fences_is_idempotent() {
        let plain = r#"{"x": 1}"#;
        assert_eq!(strip_code_fences(plain), plain);
        let once = strip_code_fences("```json\n{\"x\": 1}\n```");
        assert_eq!(once, plain);
        assert_eq!(strip_code_fences(once), plain);
    }

    #[test]
    fn strip_code_fences_handles_fence_without_newline() {
        // No newline after the opening fence; only the marker and info
        // string may be dropped, never the body.
        assert_eq!(strip_code_fences("```json {\"x\": 1}```"), r#"{"x": 1}"#);
        assert_eq!(strip_code_fences("```json{\"x\": 1}```"), r#"{"x": 1}"#);
        assert_eq!(strip_code_fences("```{\"x\": 1}```"), r#"{"x": 1}"#);
    }

    #[test]
    fn single_line_fenced_reply_validates_like_unfenced() {
        let plain = valid_reply().to_string();
        let fenced = format!("```json {plain}```");
        let from_plain = validate_str(&plain).expect("plain should validate");
        let from_fenced = validate_str(&fenced).expect("single-line fence should validate");
        assert_eq!(from_plain, from_fenced);
    }

    #[test]
    fn malformed_reply_keeps_raw_text() {
        let err = validate_str("this is not json {").unwrap_err();
        match err {
            ValidationError::Malformed { raw, .. } => {
                assert_eq!(raw, "this is not json {");
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn each_missing_top_level_section_is_named() {
        for section in TOP_LEVEL_SECTIONS {
            let mut reply = valid_reply();
            reply.as_object_mut().unwrap().remove(section);
            let err = validate_str(&reply.to_string()).unwrap_err();
            match err {
                ValidationError::SchemaViolation { path, .. } => {
                    assert_eq!(path, section, "violation must name the missing section");
                }
                other => panic!("expected SchemaViolation for {section}, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_metric_category_is_named() {
        let mut reply = valid_reply();
        reply["metrics"]
            .as_object_mut()
            .unwrap()
            .remove("codeQuality");
        let err = validate_str(&reply.to_string()).unwrap_err();
        assert!(
            matches!(err, ValidationError::SchemaViolation { ref path, .. } if path == "metrics.codeQuality"),
            "got {err:?}"
        );
    }

    #[test]
    fn missing_per_subject_score_is_named() {
        let mut reply = valid_reply();
        reply["metrics"]["activity"]
            .as_object_mut()
            .unwrap()
            .remove("userB");
        let err = validate_str(&reply.to_string()).unwrap_err();
        assert!(
            matches!(err, ValidationError::SchemaViolation { ref path, .. } if path == "metrics.activity.userB"),
            "got {err:?}"
        );
    }

    #[test]
    fn non_numeric_score_is_rejected() {
        let mut reply = valid_reply();
        reply["metrics"]["consistency"]["userA"] = serde_json::json!("seven");
        let err = validate_str(&reply.to_string()).unwrap_err();
        assert!(
            matches!(err, ValidationError::SchemaViolation { ref path, .. } if path == "metrics.consistency.userA"),
            "got {err:?}"
        );
    }

    #[test]
    fn winner_outside_subject_slots_is_rejected() {
        let mut reply = valid_reply();
        reply["metrics"]["activity"]["winner"] = serde_json::json!("userC");
        let err = validate_str(&reply.to_string()).unwrap_err();
        assert!(
            matches!(err, ValidationError::SchemaViolation { ref path, .. } if path == "metrics.activity.winner"),
            "got {err:?}"
        );
    }

    #[test]
    fn out_of_range_score_is_a_violation_not_clamped() {
        let mut reply = valid_reply();
        reply["metrics"]["activity"]["userA"] = serde_json::json!(11.0);
        let err = validate_str(&reply.to_string()).unwrap_err();
        assert!(
            matches!(err, ValidationError::SchemaViolation { ref path, .. } if path == "metrics.activity.userA"),
            "got {err:?}"
        );
    }

    #[test]
    fn out_of_range_overall_score_is_rejected() {
        let mut reply = valid_reply();
        reply["overallScores"]["absolute"]["userB"] = serde_json::json!(-1.0);
        let err = validate_str(&reply.to_string()).unwrap_err();
        assert!(
            matches!(err, ValidationError::SchemaViolation { ref path, .. } if path == "overallScores.absolute.userB"),
            "got {err:?}"
        );
    }

    #[test]
    fn out_of_range_language_percentage_is_rejected() {
        let mut reply = valid_reply();
        reply["topLanguages"]["userB"][0]["percentage"] = serde_json::json!(140.0);
        let err = validate_str(&reply.to_string()).unwrap_err();
        assert!(
            matches!(err, ValidationError::SchemaViolation { ref path, .. } if path == "topLanguages.userB[0].percentage"),
            "got {err:?}"
        );
    }

    #[test]
    fn extra_unknown_fields_are_tolerated() {
        let mut reply = valid_reply();
        reply["vibes"] = serde_json::json!("immaculate");
        assert!(validate_str(&reply.to_string()).is_ok());
    }

    fn valid_narrative() -> String {
        let mut report = String::from("# alice vs bob\n\n");
        for heading in NARRATIVE_SECTIONS {
            report.push_str(heading);
            report.push_str("\n\nSome analysis here.\n\n");
        }
        report
    }

    #[test]
    fn narrative_with_all_headings_is_accepted() {
        let report = valid_narrative();
        let result = validate_reply(&report, ReportFormat::Narrative).expect("should validate");
        assert!(matches!(result, ComparisonReport::Narrative(_)));
    }

    #[test]
    fn narrative_missing_heading_is_named() {
        let report = valid_narrative().replace("## Final Verdict", "## Closing");
        let err = validate_reply(&report, ReportFormat::Narrative).unwrap_err();
        assert!(
            matches!(err, ValidationError::SchemaViolation { ref path, .. } if path == "## Final Verdict"),
            "got {err:?}"
        );
    }

    #[test]
    fn fenced_narrative_is_unwrapped() {
        let fenced = format!("```markdown\n{}\n```", valid_narrative());
        assert!(validate_reply(&fenced, ReportFormat::Narrative).is_ok());
    }

    #[test]
    fn empty_narrative_is_rejected() {
        let err = validate_reply("```\n\n```", ReportFormat::Narrative).unwrap_err();
        assert!(matches!(err, ValidationError::SchemaViolation { .. }));
    }
}
