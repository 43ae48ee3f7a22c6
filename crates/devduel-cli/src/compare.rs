//! The `compare` subcommand: one full comparison from the terminal.
//!
//! Runs against an in-process quota counter, so each invocation starts
//! with a fresh daily budget; the shared persistent counter belongs to
//! the server.

use anyhow::{bail, Context};
use clap::Args;

use devduel_compare::{
    CompareError, ComparePipeline, CompareRequest, ComparisonReport, GeminiClient,
    MemoryQuotaStore, ReportFormat,
};
use devduel_github::GithubClient;

const USER_AGENT: &str = "devduel-cli/0.1";

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// First GitHub handle.
    pub user_a: String,

    /// Second GitHub handle.
    pub user_b: String,

    /// Output contract: "analytics" (strict JSON) or "narrative" (markdown).
    #[arg(long, default_value = "analytics", value_parser = parse_format)]
    pub format: ReportFormat,

    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: String,

    /// Gemini model to invoke.
    #[arg(long, env = "DEVDUEL_GEMINI_MODEL", default_value = "gemini-1.5-flash")]
    pub model: String,

    /// GitHub token for authenticated API calls (higher rate limits).
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Request timeout for the model call, in seconds.
    #[arg(long, default_value_t = 60)]
    pub model_timeout_secs: u64,
}

fn parse_format(s: &str) -> Result<ReportFormat, String> {
    match s {
        "analytics" => Ok(ReportFormat::Analytics),
        "narrative" => Ok(ReportFormat::Narrative),
        other => Err(format!(
            "unknown format {other:?}: expected \"analytics\" or \"narrative\""
        )),
    }
}

pub async fn run(args: CompareArgs) -> anyhow::Result<()> {
    let github = GithubClient::new(
        30,
        USER_AGENT,
        args.github_token.filter(|t| !t.is_empty()),
        3,
        500,
    )
    .context("failed to build GitHub client")?;
    let gemini = GeminiClient::new(&args.gemini_api_key, &args.model, args.model_timeout_secs)
        .context("failed to build Gemini client")?;

    let pipeline = ComparePipeline::new(github, gemini);
    let quota = MemoryQuotaStore::new(1);
    let request = CompareRequest::new(args.user_a, args.user_b).with_format(args.format);

    match pipeline.compare(&quota, &request).await {
        Ok(ComparisonReport::Analytics(payload)) => {
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Ok(ComparisonReport::Narrative(text)) => {
            println!("{text}");
        }
        Err(CompareError::SubjectNotFound { handles }) => {
            bail!("no GitHub profile found for: {}", handles.join(", "));
        }
        Err(e) => bail!(e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_flag_parses_both_contracts() {
        assert_eq!(parse_format("analytics"), Ok(ReportFormat::Analytics));
        assert_eq!(parse_format("narrative"), Ok(ReportFormat::Narrative));
        assert!(parse_format("yaml").is_err());
    }
}
