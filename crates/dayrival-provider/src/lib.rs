use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use dayrival_core::{
    build_summary_prompt, extract_json_block, validate_summary, Competition, CompetitionSummary,
    RivalError,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const DEFAULT_MODEL_ID: &str = "gemini-2.5-flash-lite";
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

const GENERATE_ENDPOINT_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MAX_OUTPUT_TOKENS: u32 = 1000;
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Text-in, text-out seam in front of the model endpoint. Everything above
/// this trait treats the model as an untrusted generator whose output gets
/// validated before use.
pub trait LlmClient {
    fn client_name(&self) -> &'static str;

    #[allow(clippy::missing_errors_doc)]
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Offline stand-in that replays a canned response regardless of prompt.
#[derive(Debug, Clone)]
pub struct MockLlmClient {
    response: String,
}

impl MockLlmClient {
    #[must_use]
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }

    /// Mock that answers with a correct summary for `competition`, wrapped in
    /// the kind of prose a real model tends to add.
    ///
    /// # Errors
    /// Fails only if the summary cannot be serialized.
    pub fn faithful(competition: &Competition) -> Result<Self> {
        let summary = CompetitionSummary::faithful(competition);
        let body = serde_json::to_string_pretty(&summary)?;
        Ok(Self::with_response(format!(
            "Here is the weekly summary you asked for:\n```json\n{body}\n```\n"
        )))
    }
}

impl LlmClient for MockLlmClient {
    fn client_name(&self) -> &'static str {
        "mock"
    }

    fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.response.clone())
    }
}

/// Blocking client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model_id: String,
    timeout_ms: u64,
}

impl GeminiClient {
    #[must_use]
    pub fn new(api_key: String, model_id: Option<String>) -> Self {
        Self {
            api_key,
            model_id: model_id.unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    #[must_use]
    pub fn from_config(config: &LlmConfig) -> Self {
        let mut client = Self::new(config.api_key.clone(), config.model_id.clone());
        if let Some(timeout_ms) = config.timeout_ms {
            client.timeout_ms = timeout_ms;
        }
        client
    }

    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

impl LlmClient for GeminiClient {
    fn client_name(&self) -> &'static str {
        "gemini"
    }

    fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{GENERATE_ENDPOINT_BASE}/{}:generateContent",
            self.model_id
        );
        let outbound = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "maxOutputTokens": MAX_OUTPUT_TOKENS },
        });

        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(self.timeout_ms))
            .build();

        tracing::debug!(model_id = %self.model_id, "calling model endpoint");
        let body: Value = match agent
            .request("POST", &url)
            .set("content-type", "application/json")
            .set("x-goog-api-key", &self.api_key)
            .send_json(&outbound)
        {
            Ok(response) => response.into_json()?,
            Err(ureq::Error::Status(code, response)) => {
                let detail = response.into_string().unwrap_or_default();
                bail!("model endpoint returned http status {code}: {detail}");
            }
            Err(ureq::Error::Transport(err)) => {
                bail!("http transport failure: {err}");
            }
        };

        let text = body
            .get("candidates")
            .and_then(|candidates| candidates.get(0))
            .and_then(|candidate| candidate.get("content"))
            .and_then(|content| content.get("parts"))
            .and_then(|parts| parts.get(0))
            .and_then(|part| part.get("text"))
            .and_then(Value::as_str);
        match text {
            Some(text) => Ok(text.to_string()),
            None => bail!("model response carried no text part"),
        }
    }
}

/// Credentials and model selection, matching the JSON config file layout
/// (`{"apiKey": "...", "modelId": "...", "timeoutMs": 30000}`).
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LlmConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl LlmConfig {
    /// # Errors
    /// Fails when the file is unreadable or not valid config JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        if config.api_key.trim().is_empty() {
            bail!("config file {} has an empty apiKey", path.display());
        }
        Ok(config)
    }

    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var(API_KEY_ENV_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(|api_key| Self {
                api_key,
                model_id: None,
                timeout_ms: None,
            })
    }

    /// Config file first, environment variable second.
    ///
    /// # Errors
    /// Fails when neither source yields an API key.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::from_file(path);
        }
        match Self::from_env() {
            Some(config) => Ok(config),
            None => bail!(
                "no API key available: create {} or set {API_KEY_ENV_VAR}",
                path.display()
            ),
        }
    }
}

/// Full summarize pipeline: prompt the model with the canonical stats,
/// extract the JSON block from its reply, cross-check it against the store,
/// and only then persist the rendered summary on the competition.
///
/// # Errors
/// Fails when the model call fails or the reply does not survive validation;
/// a rejected reply leaves `competition.summary` untouched.
pub fn summarize_competition(
    client: &dyn LlmClient,
    competition: &mut Competition,
) -> Result<String> {
    let prompt = build_summary_prompt(competition);
    tracing::debug!(
        client = client.client_name(),
        competition_id = %competition.id,
        "requesting competition summary"
    );
    let raw = client.generate(&prompt)?;

    let Some(block) = extract_json_block(&raw) else {
        return Err(RivalError::SummaryRejected(
            "model response contained no JSON object".to_string(),
        )
        .into());
    };

    let report = validate_summary(block, competition);
    if !report.valid {
        tracing::warn!(
            competition_id = %competition.id,
            reason = %report.message,
            "rejected model summary"
        );
        return Err(RivalError::SummaryRejected(report.message).into());
    }

    let summary: CompetitionSummary = serde_json::from_str(block).map_err(|err| {
        RivalError::SummaryRejected(format!(
            "summary JSON did not match the expected schema: {err}"
        ))
    })?;
    let rendered = summary.render();
    competition.summary = rendered.clone();
    tracing::info!(
        competition_id = %competition.id,
        winner = %summary.winner,
        "accepted model summary"
    );
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dayrival_core::{daily_score, parse_iso_date, CompetitionId, DailyStat};
    use time::Date;

    fn must<T, E: std::fmt::Display>(result: Result<T, E>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => panic!("expected Ok(..), got error: {err}"),
        }
    }

    fn d(value: &str) -> Date {
        must(parse_iso_date(value))
    }

    fn stat(user: &str, date: &str, bedtime: Option<bool>, wake_up: Option<bool>) -> DailyStat {
        DailyStat {
            user: user.to_string(),
            date: d(date),
            bedtime_success: bedtime,
            wake_up_success: wake_up,
            daily_score: daily_score(bedtime, wake_up),
        }
    }

    fn fixture_competition() -> Competition {
        Competition {
            id: CompetitionId::new(),
            user: "Alice".to_string(),
            challenger: "Bob".to_string(),
            start_date: d("2025-05-05"),
            end_date: d("2025-05-06"),
            outcome: String::new(),
            summary: String::new(),
            daily_stats: vec![
                stat("Alice", "2025-05-05", Some(true), Some(true)),
                stat("Alice", "2025-05-06", Some(true), None),
                stat("Bob", "2025-05-05", Some(false), Some(false)),
                stat("Bob", "2025-05-06", None, Some(true)),
            ],
        }
    }

    #[test]
    fn faithful_mock_summary_is_accepted_and_persisted() {
        let mut competition = fixture_competition();
        let client = must(MockLlmClient::faithful(&competition));

        let rendered = must(summarize_competition(&client, &mut competition));
        assert!(rendered.contains("Winner: Alice"));
        assert!(rendered.contains("2025-05-05"));
        assert_eq!(competition.summary, rendered);
    }

    #[test]
    fn reply_without_json_is_rejected() {
        let mut competition = fixture_competition();
        let client = MockLlmClient::with_response("I refuse to answer in JSON.");

        let err = match summarize_competition(&client, &mut competition) {
            Ok(rendered) => panic!("expected rejection, got {rendered}"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("no JSON object"));
        assert!(competition.summary.is_empty());
    }

    #[test]
    fn lying_totals_are_rejected_and_nothing_persists() {
        let mut competition = fixture_competition();
        let client = MockLlmClient::with_response(
            r#"{"summaryTitle":"Alice vs Bob Weekly Competition Summary","winner":"Bob","userTotal":0,"challengerTotal":9,"dailyHighlights":["Day 1 (2025-05-05): Bob crushed it","Day 2 (2025-05-06): Bob again"],"motivation":"Bob rules."}"#,
        );

        let err = match summarize_competition(&client, &mut competition) {
            Ok(rendered) => panic!("expected rejection, got {rendered}"),
            Err(err) => err,
        };
        let message = err.to_string();
        assert!(message.contains("expected totals 3/-1"), "message: {message}");
        assert!(message.contains("expected winner \"Alice\""), "message: {message}");
        assert!(competition.summary.is_empty());
    }

    #[test]
    fn prose_wrapped_json_is_extracted() {
        let mut competition = fixture_competition();
        let summary = CompetitionSummary::faithful(&competition);
        let body = must(serde_json::to_string(&summary));
        let client =
            MockLlmClient::with_response(format!("Sure thing!\n```json\n{body}\n```\nEnjoy."));

        let rendered = must(summarize_competition(&client, &mut competition));
        assert!(rendered.contains("Daily highlights:"));
    }

    #[test]
    fn config_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "dayrival-config-{}-{}.json",
            std::process::id(),
            line!()
        ));
        must(std::fs::write(
            &path,
            r#"{"apiKey":"test-key","modelId":"gemini-2.5-flash-lite"}"#,
        ));

        let config = must(LlmConfig::from_file(&path));
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.model_id.as_deref(), Some("gemini-2.5-flash-lite"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn config_file_with_empty_key_is_rejected() {
        let path = std::env::temp_dir().join(format!(
            "dayrival-config-{}-{}.json",
            std::process::id(),
            line!()
        ));
        must(std::fs::write(&path, r#"{"apiKey":"  "}"#));

        assert!(LlmConfig::from_file(&path).is_err());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn gemini_client_defaults_model_id() {
        let client = GeminiClient::new("key".to_string(), None);
        assert_eq!(client.model_id(), DEFAULT_MODEL_ID);
        let pinned = GeminiClient::new("key".to_string(), Some("gemini-2.0-pro".to_string()));
        assert_eq!(pinned.model_id(), "gemini-2.0-pro");
    }
}
