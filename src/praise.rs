//! Praise text for a finished puzzle
//!
//! The text comes from a remote text-generation API. Any failure is logged
//! and replaced by one of [`FALLBACK_PRAISE`]; the player never sees an
//! error. Responses are tagged with the puzzle session they were requested
//! for so late answers can be dropped.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::Theme;
use crate::consts::{PRAISE_ENDPOINT, PRAISE_MODEL};

/// Canned praise used whenever the service fails
pub const FALLBACK_PRAISE: [&str; 4] = [
    "Bra jobbat! Du är en stjärna! 🌟",
    "Wow! Vilket pusselproffs du är! 🧩✨",
    "Fantastiskt! Du klarade det! 🎉",
    "Snyggt jobbat! Inget stoppar dig! 🚀",
];

#[derive(Debug, thiserror::Error)]
pub enum PraiseError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service answered with HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("response contained no text")]
    Empty,
}

impl From<serde_json::Error> for PraiseError {
    fn from(err: serde_json::Error) -> Self {
        PraiseError::Malformed(err.to_string())
    }
}

/// Where and how to reach the text service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PraiseConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for PraiseConfig {
    fn default() -> Self {
        Self {
            endpoint: PRAISE_ENDPOINT.to_owned(),
            model: PRAISE_MODEL.to_owned(),
            // Baked in at build time, like the rest of the static site config
            api_key: option_env!("GEMINI_API_KEY")
                .filter(|k| !k.is_empty())
                .map(str::to_owned),
        }
    }
}

impl PraiseConfig {
    pub fn request_url(&self) -> Result<String, PraiseError> {
        let key = self.api_key.as_deref().ok_or(PraiseError::MissingApiKey)?;
        Ok(format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            key
        ))
    }
}

/// Everything the service is told about the finished puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PraiseRequest {
    /// Puzzle session this praise belongs to
    pub session: u64,
    pub theme: Theme,
    pub elapsed_secs: u32,
    pub rows: u32,
    pub cols: u32,
}

impl PraiseRequest {
    pub fn prompt(&self) -> String {
        format!(
            "Du är en uppmuntrande vän till ett barn som precis har klarat ett pussel.\n\
             Temat var \"{theme}\".\n\
             Svårighetsgraden var {rows}x{cols} bitar ({total} totalt).\n\
             Det tog {secs} sekunder.\n\
             Skriv en kort, superglad och magisk mening på svenska som berömmer barnet.\n\
             Använd emojis! Referera gärna till temat.\n\
             Håll det under 20 ord.",
            theme = self.theme.as_str(),
            rows = self.rows,
            cols = self.cols,
            total = self.rows * self.cols,
            secs = self.elapsed_secs,
        )
    }

    /// JSON body for a `generateContent` call
    pub fn body(&self) -> Result<String, PraiseError> {
        let prompt = self.prompt();
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: &prompt }],
            }],
        };
        Ok(serde_json::to_string(&body)?)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Extract the generated sentence from a `generateContent` response
pub fn parse_response(json: &str) -> Result<String, PraiseError> {
    let response: GenerateResponse = serde_json::from_str(json)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(PraiseError::Empty);
    }
    Ok(text.to_owned())
}

pub fn fallback(rng: &mut impl Rng) -> &'static str {
    FALLBACK_PRAISE[rng.random_range(0..FALLBACK_PRAISE.len())]
}

/// Turn a service outcome into displayable text
pub fn resolve(outcome: Result<String, PraiseError>, rng: &mut impl Rng) -> String {
    match outcome {
        Ok(text) => text,
        Err(err) => {
            log::warn!("Praise generation failed, using fallback: {err}");
            fallback(rng).to_owned()
        }
    }
}

/// Call the text service from the browser
#[cfg(target_arch = "wasm32")]
pub async fn fetch_praise(config: &PraiseConfig, request: &PraiseRequest) -> Result<String, PraiseError> {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    fn js_err(err: JsValue) -> PraiseError {
        PraiseError::Transport(format!("{err:?}"))
    }

    let url = config.request_url()?;
    let body = request.body()?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));

    let req = Request::new_with_str_and_init(&url, &opts).map_err(js_err)?;
    req.headers()
        .set("Content-Type", "application/json")
        .map_err(js_err)?;

    let window = web_sys::window().ok_or_else(|| PraiseError::Transport("no window".into()))?;
    let resp: Response = JsFuture::from(window.fetch_with_request(&req))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    if !resp.ok() {
        return Err(PraiseError::Status(resp.status()));
    }

    let text = JsFuture::from(resp.text().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .as_string()
        .ok_or_else(|| PraiseError::Malformed("body is not text".into()))?;
    parse_response(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn request() -> PraiseRequest {
        PraiseRequest {
            session: 1,
            theme: Theme::Space,
            elapsed_secs: 42,
            rows: 3,
            cols: 4,
        }
    }

    #[test]
    fn test_prompt_mentions_puzzle_details() {
        let prompt = request().prompt();
        assert!(prompt.contains("\"space\""));
        assert!(prompt.contains("3x4 bitar (12 totalt)"));
        assert!(prompt.contains("42 sekunder"));
    }

    #[test]
    fn test_body_wraps_prompt() {
        let body: serde_json::Value = serde_json::from_str(&request().body().unwrap()).unwrap();
        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert_eq!(text, request().prompt());
    }

    #[test]
    fn test_parse_response_text() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"  Du är snabbare än en komet! 🚀\n"}]}}]}"#;
        assert_eq!(parse_response(json).unwrap(), "Du är snabbare än en komet! 🚀");
    }

    #[test]
    fn test_parse_response_failures() {
        assert!(matches!(parse_response("{}"), Err(PraiseError::Empty)));
        assert!(matches!(
            parse_response(r#"{"candidates":[{"content":{"parts":[{"text":"   "}]}}]}"#),
            Err(PraiseError::Empty)
        ));
        assert!(matches!(parse_response("<html>"), Err(PraiseError::Malformed(_))));
    }

    #[test]
    fn test_missing_key_fails_fast() {
        let config = PraiseConfig {
            api_key: None,
            ..PraiseConfig::default()
        };
        assert!(matches!(config.request_url(), Err(PraiseError::MissingApiKey)));

        let config = PraiseConfig {
            api_key: Some("k".into()),
            ..PraiseConfig::default()
        };
        assert_eq!(
            config.request_url().unwrap(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent?key=k"
        );
    }

    #[test]
    fn test_resolve_uses_fallback_on_error() {
        let mut rng = Pcg32::seed_from_u64(3);
        let text = resolve(Err(PraiseError::Status(429)), &mut rng);
        assert!(FALLBACK_PRAISE.contains(&text.as_str()));
        assert_eq!(resolve(Ok("Hurra!".into()), &mut rng), "Hurra!");
    }
}
