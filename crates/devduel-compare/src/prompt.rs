//! Deterministic prompt construction.
//!
//! Pure functions: the same pair of profiles always renders a byte-identical
//! prompt. The instruction block names every required schema section, states
//! every range and enumeration, and declares that omitting any section makes
//! the reply invalid — validation leans on the model having been told the
//! exact contract.

use devduel_github::Profile;

use crate::report::ReportFormat;
use crate::schema::{NARRATIVE_SECTIONS, SUBJECT_A, SUBJECT_B};

const LABEL_A_SLOT: &str = "__SUBJECT_A__";
const LABEL_B_SLOT: &str = "__SUBJECT_B__";

/// The exact JSON skeleton the analytics strategy demands from the model.
/// Section names, score ranges, and the winner enumeration here must stay in
/// lockstep with [`crate::schema`]; the validator enforces the same contract.
const ANALYTICS_CONTRACT: &str = r#"{
  "usernames": {
    "userA": "__SUBJECT_A__",
    "userB": "__SUBJECT_B__"
  },
  "overview": {
    "userA": "One sentence summary",
    "userB": "One sentence summary"
  },
  "metrics": {
    "activity": { "userA": 0-10, "userB": 0-10, "winner": "userA or userB", "insight": "Why this winner (max 15 words)" },
    "codeQuality": { "userA": 0-10, "userB": 0-10, "winner": "userA or userB", "insight": "Why this winner (max 15 words)" },
    "consistency": { "userA": 0-10, "userB": 0-10, "winner": "userA or userB", "insight": "Why this winner (max 15 words)" },
    "documentation": { "userA": 0-10, "userB": 0-10, "winner": "userA or userB", "insight": "Why this winner (max 15 words)" },
    "techStack": { "userA": 0-10, "userB": 0-10, "winner": "userA or userB", "insight": "Why this winner (max 15 words)" },
    "socialProof": { "userA": 0-10, "userB": 0-10, "winner": "userA or userB", "insight": "Why this winner (max 15 words)" }
  },
  "topLanguages": {
    "userA": [{"name": "JavaScript", "percentage": 45}],
    "userB": [{"name": "Java", "percentage": 60}]
  },
  "statistics": {
    "userA": { "repos": 0, "followers": 0, "following": 0, "stars": 0, "contributions": 0 },
    "userB": { "repos": 0, "followers": 0, "following": 0, "stars": 0, "contributions": 0 }
  },
  "overallScores": {
    "headToHead": { "userA": 0-10, "userB": 0-10, "verdict": "One sentence explaining winner" },
    "absolute": { "userA": 0-10, "userB": 0-10, "explanation": "One sentence explaining scores vs perfect profile" }
  },
  "strengths": {
    "userA": ["strength 1", "strength 2", "strength 3"],
    "userB": ["strength 1", "strength 2", "strength 3"]
  },
  "weaknesses": {
    "userA": ["weakness 1", "weakness 2"],
    "userB": ["weakness 1", "weakness 2"]
  },
  "missingElements": {
    "userA": ["missing item 1", "missing item 2"],
    "userB": ["missing item 1", "missing item 2"]
  },
  "improvements": {
    "userA": ["actionable tip 1", "actionable tip 2", "actionable tip 3"],
    "userB": ["actionable tip 1", "actionable tip 2", "actionable tip 3"]
  },
  "finalVerdict": "2-3 sentence final comparison"
}"#;

/// Renders the instruction payload for one comparison.
///
/// Pure and deterministic: no timestamps, no randomness. When a subject's
/// login is blank, the stable slot label (`userA`/`userB`) is substituted so
/// the rendered prompt never contains an empty identity placeholder.
#[must_use]
pub fn build_prompt(profile_a: &Profile, profile_b: &Profile, format: ReportFormat) -> String {
    let label_a = subject_label(profile_a, SUBJECT_A);
    let label_b = subject_label(profile_b, SUBJECT_B);

    match format {
        ReportFormat::Analytics => analytics_prompt(profile_a, profile_b, label_a, label_b),
        ReportFormat::Narrative => narrative_prompt(profile_a, profile_b, label_a, label_b),
    }
}

/// The identity label used in the prompt for one subject: the login when
/// present, otherwise the stable slot fallback.
pub(crate) fn subject_label<'a>(profile: &'a Profile, fallback: &'a str) -> &'a str {
    let login = profile.login.trim();
    if login.is_empty() {
        fallback
    } else {
        login
    }
}

fn analytics_prompt(
    profile_a: &Profile,
    profile_b: &Profile,
    label_a: &str,
    label_b: &str,
) -> String {
    let contract = ANALYTICS_CONTRACT
        .replace(LABEL_A_SLOT, label_a)
        .replace(LABEL_B_SLOT, label_b);

    format!(
        "You are an expert GitHub profile analyzer. Analyze the two GitHub users and \
return a STRICT JSON response for data visualization.\n\
\n\
**CRITICAL:** Return ONLY valid JSON. No markdown, no code blocks, no preamble, \
no surrounding prose. A reply that omits any of the sections below is invalid, \
not merely incomplete. All scores are numbers from 0 to 10 inclusive; every \
\"winner\" value must be exactly \"userA\" or \"userB\"; every language \
\"percentage\" is a number from 0 to 100.\n\
\n\
Users:\n\
- **User A:** {label_a}\n\
- **User B:** {label_b}\n\
\n\
Analyze these data points and return JSON in this EXACT structure:\n\
\n\
{contract}\n\
\n\
# USER DATA\n\
\n\
## {label_a}\n\
{data_a}\n\
\n\
## {label_b}\n\
{data_b}\n\
\n\
Return ONLY the JSON object. No other text.\n",
        data_a = render_profile(profile_a),
        data_b = render_profile(profile_b),
    )
}

fn narrative_prompt(
    profile_a: &Profile,
    profile_b: &Profile,
    label_a: &str,
    label_b: &str,
) -> String {
    let headings = NARRATIVE_SECTIONS.join("\n");

    format!(
        "You are an expert GitHub profile analyzer. Write a markdown report comparing \
the two GitHub users below.\n\
\n\
**CRITICAL:** The report must contain every one of these second-level headings, \
verbatim and in this order. A report that omits any heading is invalid, not \
merely incomplete. Do not wrap the report in code fences and do not add any \
preamble before the first heading.\n\
\n\
{headings}\n\
\n\
Users:\n\
- **User A:** {label_a}\n\
- **User B:** {label_b}\n\
\n\
# USER DATA\n\
\n\
## {label_a}\n\
{data_a}\n\
\n\
## {label_b}\n\
{data_b}\n\
\n\
Return ONLY the markdown report.\n",
        data_a = render_profile(profile_a),
        data_b = render_profile(profile_b),
    )
}

fn render_profile(profile: &Profile) -> String {
    serde_json::to_string_pretty(profile).unwrap_or_else(|_| String::from("{}"))
}
