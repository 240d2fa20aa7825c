//! Mentor matching and advice summarization on top of a text-generation model.
//!
//! The model is asked for schema-constrained JSON. Replies are still parsed
//! tolerantly: JSON first, then the older two-line / blank-line-separated
//! plain text shape, and finally an empty result. Malformed output never
//! becomes an error; only transport failures do.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::config::GeminiSettings;
use crate::models::User;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MAX_TAGS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Gemini API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Gemini returned no candidates")]
    EmptyResponse,
    #[error("AI call timed out after {0:?}")]
    Timeout(Duration),
}

/// A text-in, text-out model. `schema` asks for JSON shaped like it.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &str, schema: Option<&Value>) -> Result<String, AiError>;
}

// ==================== GEMINI ====================

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    pub fn new(settings: &GeminiSettings, timeout: Duration) -> Result<Self, AiError> {
        if settings.api_key.is_none() {
            log::warn!("⚠️  GEMINI_API_KEY not set, AI analysis will be unavailable");
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_API_BASE, self.model)
    }
}

fn request_body(prompt: &str, schema: Option<&Value>) -> Value {
    let mut body = json!({
        "contents": [{ "parts": [{ "text": prompt }] }]
    });
    if let Some(schema) = schema {
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        });
    }
    body
}

/// Concatenated text parts of the first candidate.
fn first_candidate_text(response: &Value) -> Option<String> {
    let parts = response
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str, schema: Option<&Value>) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::MissingApiKey)?;

        log::debug!("🤖 Calling Gemini model {}", self.model);
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request_body(prompt, schema))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await?;
        first_candidate_text(&payload).ok_or(AiError::EmptyResponse)
    }
}

// ==================== ANALYSIS ====================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchAnalysis {
    /// `None` when the model did not produce a usable score.
    pub score: Option<u8>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdviceAnalysis {
    pub summary: Option<String>,
    pub tags: Vec<String>,
    pub takeaways: Option<String>,
}

fn match_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "INTEGER" },
            "reason": { "type": "STRING" }
        },
        "required": ["score", "reason"]
    })
}

fn advice_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "tags": { "type": "ARRAY", "items": { "type": "STRING" } },
            "takeaways": { "type": "STRING" }
        },
        "required": ["summary", "tags"]
    })
}

fn or_unspecified(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("Not specified")
}

pub fn mentorship_prompt(student: &User, alumni: &User, goals: &str) -> String {
    let expertise = if alumni.expertise_areas.is_empty() {
        "Not specified".to_string()
    } else {
        alumni.expertise_areas.join(", ")
    };

    format!(
        "Analyze the compatibility between a student and an alumni mentor.\n\n\
         Student Information:\n\
         - Name: {}\n\
         - Goals: {}\n\n\
         Alumni Information:\n\
         - Name: {}\n\
         - Experience: {}\n\
         - Field: {}\n\
         - Expertise: {}\n\
         - Position: {}\n\
         - Company: {}\n\n\
         Respond with a JSON object containing \"score\" (integer compatibility score from 0 to 100) \
         and \"reason\" (a brief explanation of why they would or would not be a good match).",
        student.name,
        or_unspecified(Some(goals)),
        alumni.name,
        or_unspecified(alumni.experience.as_deref()),
        or_unspecified(alumni.field.as_deref()),
        expertise,
        or_unspecified(alumni.current_position.as_deref()),
        or_unspecified(alumni.company.as_deref()),
    )
}

pub fn career_advice_prompt(content: &str) -> String {
    format!(
        "Analyze the following career advice.\n\n\
         Career Advice:\n\"{}\"\n\n\
         Respond with a JSON object containing \"summary\" (a concise summary), \
         \"tags\" (at most 5 short relevant tags) and \"takeaways\" (the key takeaways).",
        content
    )
}

/// Removes a surrounding markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parses the reply as a JSON object, or the first `{...}` span inside it.
fn parse_json_object(text: &str) -> Option<serde_json::Map<String, Value>> {
    let text = strip_code_fence(text);
    if let Ok(Value::Object(map)) = serde_json::from_str(text) {
        return Some(map);
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str(&text[start..=end]) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn clamp_score(raw: f64) -> Option<u8> {
    if raw.is_nan() {
        return None;
    }
    Some(raw.round().clamp(0.0, 100.0) as u8)
}

fn first_integer(text: &str) -> Option<u8> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..].chars().take_while(char::is_ascii_digit).collect();
    // Anything too long to parse is far above the cap anyway.
    let value = digits.parse::<u64>().unwrap_or(u64::MAX);
    Some(value.min(100) as u8)
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

pub fn parse_match_response(text: &str) -> MatchAnalysis {
    if let Some(object) = parse_json_object(text) {
        let score = match object.get("score") {
            Some(Value::Number(n)) => n.as_f64().and_then(clamp_score),
            Some(Value::String(s)) => first_integer(s),
            _ => None,
        };
        let reason = object
            .get("reason")
            .and_then(Value::as_str)
            .and_then(non_empty);
        return MatchAnalysis { score, reason };
    }

    // Legacy shape: score on the first line, reason on the next.
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let Some(first) = lines.next() else {
        return MatchAnalysis::default();
    };
    match first_integer(first) {
        Some(score) => MatchAnalysis {
            score: Some(score),
            reason: lines.next().and_then(non_empty),
        },
        None => MatchAnalysis::default(),
    }
}

/// Drops a leading `1.` or `2)` list marker.
fn strip_numbering(tag: &str) -> &str {
    let digits_end = tag.find(|c: char| !c.is_ascii_digit()).unwrap_or(tag.len());
    if digits_end > 0 && tag[digits_end..].starts_with(&['.', ')'][..]) {
        &tag[digits_end + 1..]
    } else {
        tag
    }
}

fn clean_tag(raw: &str) -> Option<String> {
    let tag = strip_numbering(raw.trim())
        .trim_start_matches(&['-', '*', '•', '#'][..])
        .trim();
    non_empty(tag)
}

fn collect_tags<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.filter_map(clean_tag) {
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            tags.push(tag);
        }
        if tags.len() == MAX_TAGS {
            break;
        }
    }
    tags
}

fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => non_empty(s),
        Value::Array(items) => {
            let joined = items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("\n");
            non_empty(&joined)
        }
        _ => None,
    }
}

pub fn parse_advice_response(text: &str) -> AdviceAnalysis {
    if let Some(object) = parse_json_object(text) {
        let tags = match object.get("tags") {
            Some(Value::Array(items)) => collect_tags(items.iter().filter_map(Value::as_str)),
            Some(Value::String(s)) => collect_tags(s.split(',')),
            _ => Vec::new(),
        };
        return AdviceAnalysis {
            summary: text_field(object.get("summary")),
            tags,
            takeaways: text_field(object.get("takeaways")),
        };
    }

    // Legacy shape: summary, comma separated tags and takeaways as blank-line separated blocks.
    let normalized = text.replace("\r\n", "\n");
    let blocks: Vec<&str> = normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .collect();

    AdviceAnalysis {
        summary: blocks.first().and_then(|b| non_empty(b)),
        tags: blocks
            .get(1)
            .map(|b| collect_tags(b.split(',')))
            .unwrap_or_default(),
        takeaways: if blocks.len() > 2 {
            non_empty(&blocks[2..].join("\n\n"))
        } else {
            None
        },
    }
}

/// Builds prompts, calls the model and parses its replies.
#[derive(Clone)]
pub struct AiMatcher {
    model: Arc<dyn GenerativeModel>,
}

impl AiMatcher {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    pub async fn analyze_mentorship_match(
        &self,
        student: &User,
        alumni: &User,
        goals: &str,
    ) -> Result<MatchAnalysis, AiError> {
        let prompt = mentorship_prompt(student, alumni, goals);
        let reply = self.model.generate(&prompt, Some(&match_schema())).await?;
        let analysis = parse_match_response(&reply);
        if analysis.score.is_none() {
            log::warn!("⚠️  Could not read a match score for alumni {}", alumni.id_hex());
        }
        Ok(analysis)
    }

    pub async fn analyze_career_advice(&self, content: &str) -> Result<AdviceAnalysis, AiError> {
        let prompt = career_advice_prompt(content);
        let reply = self.model.generate(&prompt, Some(&advice_schema())).await?;
        Ok(parse_advice_response(&reply))
    }
}
