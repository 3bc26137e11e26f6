//! LLM Assistant - adapts any `AIProvider` to the extraction and enhancement ports.
//!
//! The model is asked for JSON only. Replies are parsed strictly: markdown
//! code fences and surrounding chatter are stripped, then the payload must
//! deserialize with `serde_json` or the call fails. Nothing in a reply is
//! ever executed or evaluated.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::conversation::{Intent, IntentExtraction};
use crate::domain::cv::{CvDocument, FieldMap, Section};
use crate::ports::{
    AIProvider, CompletionRequest, EnhanceError, ExtractionError, FieldExtractor, MessageRole,
    RequestMetadata, RequestPurpose, TextEnhancer,
};

/// Sampling settings for the two kinds of request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssistantSettings {
    pub extraction_temperature: f32,
    pub enhance_temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            extraction_temperature: 0.3,
            enhance_temperature: 0.5,
            max_tokens: None,
        }
    }
}

/// Field extraction and text enhancement backed by a language model.
#[derive(Clone)]
pub struct LlmAssistant {
    provider: Arc<dyn AIProvider>,
    settings: AssistantSettings,
}

impl LlmAssistant {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            settings: AssistantSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: AssistantSettings) -> Self {
        self.settings = settings;
        self
    }

    async fn ask(
        &self,
        purpose: RequestPurpose,
        system_prompt: String,
        user_text: &str,
    ) -> Result<String, crate::ports::AIError> {
        let temperature = match purpose {
            RequestPurpose::Extraction => self.settings.extraction_temperature,
            RequestPurpose::Enhancement => self.settings.enhance_temperature,
        };

        let mut request = CompletionRequest::new(RequestMetadata::new(purpose))
            .with_system_prompt(system_prompt)
            .with_message(MessageRole::User, user_text)
            .with_temperature(temperature);
        if let Some(max) = self.settings.max_tokens {
            request = request.with_max_tokens(max);
        }

        let response = self.provider.complete(request).await?;
        debug!(
            purpose = purpose.as_str(),
            model = %response.model,
            tokens = response.usage.total_tokens,
            "model replied"
        );
        Ok(response.content)
    }
}

#[async_trait]
impl FieldExtractor for LlmAssistant {
    async fn extract_fields(&self, text: &str, section: Section) -> Result<FieldMap, ExtractionError> {
        let reply = self
            .ask(RequestPurpose::Extraction, extraction_prompt(section), text)
            .await?;

        let object = parse_object(&reply)?;
        Ok(normalize_fields(section, &object))
    }

    async fn extract_with_intent(
        &self,
        text: &str,
        section: Section,
        document: &CvDocument,
    ) -> Result<IntentExtraction, ExtractionError> {
        let reply = self
            .ask(
                RequestPurpose::Extraction,
                intent_prompt(section, document),
                text,
            )
            .await?;

        parse_intent(section, &reply)
    }
}

#[async_trait]
impl TextEnhancer for LlmAssistant {
    async fn try_enhance(&self, text: &str) -> Result<String, EnhanceError> {
        let reply = self
            .ask(RequestPurpose::Enhancement, ENHANCE_PROMPT.to_string(), text)
            .await?;

        let enhanced = strip_code_fence(&reply).trim().trim_matches('"').trim();
        if enhanced.is_empty() {
            return Err(EnhanceError::Malformed("empty rewrite".to_string()));
        }
        Ok(enhanced.to_string())
    }

    async fn try_enhance_batch(&self, texts: &[String]) -> Result<Vec<String>, EnhanceError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let payload = serde_json::to_string(texts)
            .map_err(|e| EnhanceError::Malformed(e.to_string()))?;
        let reply = self
            .ask(RequestPurpose::Enhancement, BATCH_ENHANCE_PROMPT.to_string(), &payload)
            .await?;

        let json = extract_json(&reply).ok_or_else(|| EnhanceError::Malformed("no JSON array".into()))?;
        let rewritten: Vec<String> =
            serde_json::from_str(&json).map_err(|e| EnhanceError::Malformed(e.to_string()))?;

        if rewritten.len() != texts.len() {
            return Err(EnhanceError::CountMismatch {
                expected: texts.len(),
                actual: rewritten.len(),
            });
        }
        Ok(rewritten)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Prompts
// ════════════════════════════════════════════════════════════════════════════════

const ENHANCE_PROMPT: &str = "You improve text for a professional CV. Rewrite the user's text \
to be clear, concise and achievement-oriented without inventing facts. \
Reply with the rewritten text only.";

const BATCH_ENHANCE_PROMPT: &str = "You improve text for a professional CV. The user sends a JSON \
array of strings. Rewrite each one to be clear, concise and achievement-oriented without \
inventing facts. Reply with a JSON array of the same length, in the same order, and nothing else.";

fn field_hint(section: Section) -> &'static str {
    match section {
        Section::PersonalInfo => "name, email, phone, address",
        Section::Summary => "summary (a short professional summary)",
        Section::Education => "institution, degree, year (four digits), details",
        Section::Experience => {
            "company, role, start_date (MM/YYYY), end_date (MM/YYYY or 'present'), description"
        }
        Section::Projects => "name, description, technologies",
        Section::Skills => "skills (a JSON list of strings)",
        Section::Certifications => "name, issuer, year (four digits)",
        Section::References => "name, contact (email or phone), relationship",
    }
}

fn extraction_prompt(section: Section) -> String {
    format!(
        "You extract CV data for the '{}' section from the user's message. \
         Reply with a single JSON object with the keys: {}. \
         Use an empty string for anything the message does not mention. \
         Do not add keys and do not add commentary.",
        section.as_str(),
        field_hint(section)
    )
}

fn intent_prompt(section: Section, document: &CvDocument) -> String {
    let sections = Section::sections()
        .iter()
        .map(|s| format!("- {}: {}", s.as_str(), field_hint(*s)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You help a user fill in their CV one section at a time. The current section is '{}'.\n\
         Sections and their fields:\n{}\n\n\
         The CV so far:\n{}\n\n\
         Classify the user's message and extract fields. Reply with a single JSON object:\n\
         {{\"intent\": \"current_section\" | \"update_previous\" | \"unclear\", \
         \"target_section\": <section id or null>, \
         \"extracted_data\": {{<field>: <string>}}, \
         \"confidence\": <number between 0 and 1>, \
         \"response_message\": <short reply>, \
         \"should_advance\": <bool>, \
         \"validation_notes\": [<string>]}}\n\
         Use 'update_previous' only when the user is correcting an earlier section.",
        section.as_str(),
        sections,
        document
    )
}

// ════════════════════════════════════════════════════════════════════════════════
// Reply parsing
// ════════════════════════════════════════════════════════════════════════════════

/// Intent reply as the model sends it; every key optional.
#[derive(Debug, Deserialize)]
struct RawIntent {
    #[serde(default)]
    intent: Option<String>,
    #[serde(default)]
    target_section: Option<String>,
    #[serde(default)]
    extracted_data: Option<Map<String, Value>>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    response_message: Option<String>,
    #[serde(default)]
    should_advance: Option<bool>,
    #[serde(default)]
    validation_notes: Vec<String>,
}

fn parse_intent(section: Section, reply: &str) -> Result<IntentExtraction, ExtractionError> {
    let json = extract_json(reply).ok_or(ExtractionError::Empty)?;
    let raw: RawIntent =
        serde_json::from_str(&json).map_err(|e| ExtractionError::Malformed(e.to_string()))?;

    let intent = match raw.intent.as_deref().map(str::trim) {
        Some("current_section") => Intent::CurrentSection,
        Some("update_previous") => Intent::UpdatePrevious,
        _ => Intent::Unclear,
    };

    let target_section = raw
        .target_section
        .as_deref()
        .and_then(|name| Section::from_str(name).ok());
    if raw.target_section.is_some() && target_section.is_none() {
        warn!(target = ?raw.target_section, "model named an unknown section");
    }

    let fields_for = match intent {
        Intent::UpdatePrevious => target_section.unwrap_or(section),
        _ => section,
    };
    let extracted_data = raw
        .extracted_data
        .as_ref()
        .map(|object| normalize_fields(fields_for, object))
        .unwrap_or_default();

    let confidence = raw
        .confidence
        .filter(|c| c.is_finite())
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or(0.0);

    Ok(IntentExtraction {
        intent,
        target_section,
        extracted_data,
        confidence,
        response_message: raw.response_message.unwrap_or_default(),
        should_advance: raw.should_advance.unwrap_or(false),
        validation_notes: raw.validation_notes,
    })
}

fn parse_object(reply: &str) -> Result<Map<String, Value>, ExtractionError> {
    let json = extract_json(reply).ok_or(ExtractionError::Empty)?;
    match serde_json::from_str::<Value>(&json) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(ExtractionError::Malformed(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(ExtractionError::Malformed(e.to_string())),
    }
}

/// Keeps only the section's fields, every one of them present and string-valued.
fn normalize_fields(section: Section, object: &Map<String, Value>) -> FieldMap {
    section
        .fields()
        .iter()
        .map(|key| (*key, object.get(*key).map(value_to_text).unwrap_or_default()))
        .collect()
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => String::new(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Returns the content of the first fenced code block, or the input.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let after = &trimmed[start + 3..];
    // Skip the info string (e.g. "json") up to the end of the line.
    let body_start = after.find('\n').map(|i| i + 1).unwrap_or(after.len());
    let body = &after[body_start..];
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => trimmed,
    }
}

/// Locates the JSON payload in a reply: fenced block first, then the first
/// balanced object or array.
fn extract_json(reply: &str) -> Option<String> {
    let candidate = strip_code_fence(reply);
    if candidate.is_empty() {
        return None;
    }

    let obj_start = candidate.find('{');
    let arr_start = candidate.find('[');
    let (start, open, close) = match (obj_start, arr_start) {
        (Some(o), Some(a)) if a < o => (a, '[', ']'),
        (Some(o), _) => (o, '{', '}'),
        (None, Some(a)) => (a, '[', ']'),
        (None, None) => return Some(candidate.to_string()),
    };

    Some(balanced(candidate, start, open, close).unwrap_or(candidate).to_string())
}

fn balanced(s: &str, start: usize, open: char, close: char) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            c if c == open => depth += 1,
            c if c == close => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&s[start..start + i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};

    fn assistant(provider: &MockAIProvider) -> LlmAssistant {
        LlmAssistant::new(Arc::new(provider.clone()))
    }

    mod json_extraction {
        use super::*;

        #[test]
        fn plain_object() {
            assert_eq!(extract_json(r#"{"a": "b"}"#).unwrap(), r#"{"a": "b"}"#);
        }

        #[test]
        fn fenced_block_with_language() {
            let reply = "Here you go:\n```json\n{\"a\": 1}\n```\nThanks";
            assert_eq!(extract_json(reply).unwrap(), "{\"a\": 1}");
        }

        #[test]
        fn fenced_block_without_language() {
            assert_eq!(extract_json("```\n[1, 2]\n```").unwrap(), "[1, 2]");
        }

        #[test]
        fn object_after_preamble() {
            let reply = r#"Sure! {"name": "Jane {Doe}"} hope that helps"#;
            assert_eq!(extract_json(reply).unwrap(), r#"{"name": "Jane {Doe}"}"#);
        }

        #[test]
        fn empty_reply_has_no_json() {
            assert!(extract_json("   ").is_none());
        }
    }

    mod normalization {
        use super::*;

        #[test]
        fn missing_and_null_keys_become_empty() {
            let object: Map<String, Value> =
                serde_json::from_str(r#"{"institution": "UDSM", "degree": null}"#).unwrap();
            let fields = normalize_fields(Section::Education, &object);

            assert_eq!(fields.get("institution"), "UDSM");
            assert_eq!(fields.get("degree"), "");
            assert_eq!(fields.get("year"), "");
            assert!(fields.iter().any(|(key, _)| key == "details"));
        }

        #[test]
        fn unknown_keys_are_dropped() {
            let object: Map<String, Value> =
                serde_json::from_str(r#"{"name": "Jane", "favourite_colour": "blue"}"#).unwrap();
            let fields = normalize_fields(Section::PersonalInfo, &object);
            assert!(fields.iter().all(|(key, _)| key != "favourite_colour"));
        }

        #[test]
        fn numbers_become_text() {
            let object: Map<String, Value> = serde_json::from_str(r#"{"year": 2020}"#).unwrap();
            assert_eq!(normalize_fields(Section::Education, &object).get("year"), "2020");
        }

        #[test]
        fn skills_list_is_comma_joined() {
            let object: Map<String, Value> =
                serde_json::from_str(r#"{"skills": ["Rust", " SQL ", ""]}"#).unwrap();
            assert_eq!(normalize_fields(Section::Skills, &object).get("skills"), "Rust, SQL");
        }
    }

    mod extraction {
        use super::*;

        #[tokio::test]
        async fn extracts_fields_for_section() {
            let provider = MockAIProvider::new().with_response(
                "```json\n{\"institution\": \"University of Dar es Salaam\", \"degree\": \"BSc\", \"year\": \"2020\"}\n```",
            );

            let fields = assistant(&provider)
                .extract_fields("I studied a BSc at UDSM, finished 2020", Section::Education)
                .await
                .unwrap();

            assert_eq!(fields.get("institution"), "University of Dar es Salaam");
            assert_eq!(fields.get("details"), "");
            let call = &provider.get_calls()[0];
            assert!(call.system_prompt.as_deref().unwrap().contains("'education'"));
            assert_eq!(call.temperature, Some(0.3));
        }

        #[tokio::test]
        async fn non_object_reply_is_malformed() {
            let provider = MockAIProvider::new().with_response("[\"a\"]");
            let err = assistant(&provider)
                .extract_fields("x", Section::Summary)
                .await
                .unwrap_err();
            assert!(matches!(err, ExtractionError::Malformed(_)));
        }

        #[tokio::test]
        async fn prose_reply_is_malformed() {
            let provider = MockAIProvider::new().with_response("I could not find anything.");
            let err = assistant(&provider)
                .extract_fields("x", Section::Summary)
                .await
                .unwrap_err();
            assert!(matches!(err, ExtractionError::Malformed(_)));
        }

        #[tokio::test]
        async fn provider_failure_is_reported() {
            let provider = MockAIProvider::new().with_error(MockError::Unavailable {
                message: "down".into(),
            });
            let err = assistant(&provider)
                .extract_fields("x", Section::Summary)
                .await
                .unwrap_err();
            assert!(matches!(err, ExtractionError::Provider(_)));
        }
    }

    mod intent {
        use super::*;

        #[tokio::test]
        async fn parses_update_previous() {
            let provider = MockAIProvider::new().with_response(
                r#"{"intent": "update_previous", "target_section": "personal_info",
                    "extracted_data": {"email": "jane@example.com"}, "confidence": 0.9,
                    "response_message": "Updated", "should_advance": false}"#,
            );

            let result = assistant(&provider)
                .extract_with_intent("my email is jane@example.com", Section::Education, &CvDocument::default())
                .await
                .unwrap();

            assert_eq!(result.intent, Intent::UpdatePrevious);
            assert_eq!(result.target_section, Some(Section::PersonalInfo));
            assert_eq!(result.extracted_data.get("email"), "jane@example.com");
            assert_eq!(result.extracted_data.get("name"), "");
            assert!((result.confidence - 0.9).abs() < f64::EPSILON);
        }

        #[test]
        fn unknown_target_and_intent_degrade() {
            let result = parse_intent(
                Section::Skills,
                r#"{"intent": "chat", "target_section": "hobbies", "confidence": 4}"#,
            )
            .unwrap();

            assert_eq!(result.intent, Intent::Unclear);
            assert_eq!(result.target_section, None);
            assert_eq!(result.confidence, 1.0);
            assert!(result.extracted_data.is_blank());
        }

        #[test]
        fn missing_confidence_is_zero() {
            let result = parse_intent(Section::Skills, r#"{"intent": "current_section"}"#).unwrap();
            assert_eq!(result.confidence, 0.0);
        }

        #[tokio::test]
        async fn prompt_carries_document_context() {
            let provider = MockAIProvider::new().with_response("{}");
            let mut document = CvDocument::default();
            document.summary = Some("Seasoned teacher".into());

            assistant(&provider)
                .extract_with_intent("hi", Section::Skills, &document)
                .await
                .unwrap();

            let prompt = provider.get_calls()[0].system_prompt.clone().unwrap();
            assert!(prompt.contains("Seasoned teacher"));
            assert!(prompt.contains("'skills'"));
        }
    }

    mod enhancement {
        use super::*;

        #[tokio::test]
        async fn single_rewrite_is_trimmed() {
            let provider = MockAIProvider::new().with_response("  \"Led a team of five.\"  ");
            let out = assistant(&provider).try_enhance("led team").await.unwrap();
            assert_eq!(out, "Led a team of five.");
            assert_eq!(provider.get_calls()[0].temperature, Some(0.5));
        }

        #[tokio::test]
        async fn enhance_text_falls_back_to_original() {
            let provider = MockAIProvider::new().with_error(MockError::Timeout { timeout_secs: 30 });
            let out = assistant(&provider).enhance_text("led team").await;
            assert_eq!(out, "led team");
        }

        #[tokio::test]
        async fn batch_is_one_call() {
            let provider = MockAIProvider::new().with_response(r#"["A.", "B."]"#);
            let out = assistant(&provider)
                .try_enhance_batch(&["a".to_string(), "b".to_string()])
                .await
                .unwrap();

            assert_eq!(out, vec!["A.", "B."]);
            assert_eq!(provider.call_count(), 1);
        }

        #[tokio::test]
        async fn batch_length_must_match() {
            let provider = MockAIProvider::new().with_response(r#"["A."]"#);
            let err = assistant(&provider)
                .try_enhance_batch(&["a".to_string(), "b".to_string()])
                .await
                .unwrap_err();
            assert!(matches!(err, EnhanceError::CountMismatch { expected: 2, actual: 1 }));
        }

        #[tokio::test]
        async fn empty_batch_skips_the_model() {
            let provider = MockAIProvider::new();
            let out = assistant(&provider).try_enhance_batch(&[]).await.unwrap();
            assert!(out.is_empty());
            assert_eq!(provider.call_count(), 0);
        }
    }
}
