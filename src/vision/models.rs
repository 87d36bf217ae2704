use anyhow::{anyhow, Context};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// IdentificationResult
// ---------------------------------------------------------------------------

/// Best-guess species identity for a photographed plant.
///
/// Produced exactly once per identification request; plant creation copies
/// these fields into the plant row and never re-derives them unless a new
/// photo is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IdentificationResult {
    pub common_name: String,
    /// Binomial form: genus + species.
    pub scientific_name: String,
    /// 0–100. Fixed at 92.0 for remote results (the classifier reports no
    /// calibrated score); variable only for fallback results.
    pub confidence: f64,
    pub description: String,
}

// ---------------------------------------------------------------------------
// EncodedImage
// ---------------------------------------------------------------------------

/// A self-describing encoded still image, as submitted by the capture UI.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
    #[error("image is not a base64 data URL (expected 'data:<mime>;base64,<payload>')")]
    NotADataUrl,
    #[error("image payload is not valid base64")]
    InvalidBase64,
}

impl EncodedImage {
    /// Parse a `data:image/jpeg;base64,<payload>` URL as produced by the
    /// capture UI's canvas export.
    pub fn from_data_url(url: &str) -> Result<Self, ImageError> {
        let rest = url.strip_prefix("data:").ok_or(ImageError::NotADataUrl)?;
        let (mime_type, payload) = rest.split_once(";base64,").ok_or(ImageError::NotADataUrl)?;
        if mime_type.is_empty() {
            return Err(ImageError::NotADataUrl);
        }
        let data = BASE64
            .decode(payload.trim())
            .map_err(|_| ImageError::InvalidBase64)?;
        Ok(Self {
            mime_type: mime_type.to_owned(),
            data,
        })
    }

    /// Base64 payload for the classifier's inline-data part.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.data)
    }
}

// ---------------------------------------------------------------------------
// Gemini generateContent wire types
//
// Request:
//   { "contents": [ { "parts": [ { "text": … }, { "inlineData": { … } } ] } ] }
//
// Response (fields we consume):
//   { "candidates": [ { "content": { "parts": [ { "text": … } ] } } ] }
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: CandidateContent,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts.
    pub fn into_text(self) -> anyhow::Result<String> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("classifier response contains no candidates"))?;
        let text: String = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        if text.is_empty() {
            return Err(anyhow!("classifier candidate contains no text parts"));
        }
        Ok(text)
    }
}

/// The JSON shape the prompt instructs the classifier to return.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierFields {
    pub common_name: Option<String>,
    pub scientific_name: Option<String>,
    pub description: Option<String>,
}

impl ClassifierFields {
    /// Parse classifier output text, tolerating Markdown code fences the
    /// model sometimes wraps its JSON in despite the prompt.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let clean = text
            .replace("```json", "")
            .replace("```", "")
            .trim()
            .to_owned();
        serde_json::from_str(&clean).context("classifier text is not the requested JSON shape")
    }
}
