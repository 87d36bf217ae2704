pub mod fallback;
pub mod models;

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, warn};

use crate::{config::Config, response_store};

use self::models::{
    ClassifierFields, Content, EncodedImage, GenerateContentRequest, GenerateContentResponse,
    IdentificationResult, InlineData, Part,
};

/// Confidence assigned to remote results; the classifier does not report a
/// calibrated score of its own.
const REMOTE_CONFIDENCE: f64 = 92.0;

/// Credential values that count as "not configured".
const PLACEHOLDER_API_KEYS: &[&str] = &["", "your_api_key_here", "changeme"];

const IDENTIFY_PROMPT: &str = "Identify this houseplant. Provide:\n\
1. Common name\n\
2. Scientific name (genus and species)\n\
3. A brief 1-sentence description\n\
\n\
Format your response EXACTLY as JSON with these fields (no markdown, no code blocks):\n\
{\n\
  \"commonName\": \"English common name\",\n\
  \"scientificName\": \"Genus species\",\n\
  \"description\": \"Brief description\"\n\
}";

/// Gateway to the remote vision classifier.
///
/// `identify` never fails: every failure mode of the remote path resolves to
/// the fallback generator. Identification is advisory, so availability trumps
/// correctness-on-failure.
#[derive(Debug, Clone)]
pub struct VisionClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl VisionClient {
    pub fn new(config: &Config) -> Self {
        // Single bounded outbound call per identification; the client-level
        // timeout turns a hung classifier into a fallback.
        let http = Client::builder()
            .timeout(Duration::from_secs(config.classifier_timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            inner: Arc::new(Inner {
                http,
                base_url: config.classifier_base_url.clone(),
                model: config.classifier_model.clone(),
                api_key: config.classifier_api_key.clone(),
            }),
        }
    }

    /// Identify the plant in `image`.
    ///
    /// Routes to the remote classifier when a usable credential is
    /// configured; otherwise, or on any remote failure, degrades silently to
    /// the fallback generator.
    pub async fn identify(&self, image: &EncodedImage) -> IdentificationResult {
        let Some(api_key) = self.credential() else {
            warn!("classifier API key not configured, using mock identification");
            return fallback::generate().await;
        };

        match self.request_identification(api_key, image).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "remote identification failed, falling back to mock");
                fallback::generate().await
            }
        }
    }

    /// The configured API key, unless it is absent or an obvious placeholder.
    fn credential(&self) -> Option<&str> {
        self.inner
            .api_key
            .as_deref()
            .filter(|k| !PLACEHOLDER_API_KEYS.contains(k))
    }

    async fn request_identification(
        &self,
        api_key: &str,
        image: &EncodedImage,
    ) -> Result<IdentificationResult> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.inner.base_url, self.inner.model, api_key
        );
        debug!(model = %self.inner.model, mime = %image.mime_type, "Requesting plant identification");

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: Some(IDENTIFY_PROMPT.to_owned()),
                        inline_data: None,
                    },
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: image.mime_type.clone(),
                            data: image.to_base64(),
                        }),
                    },
                ],
            }],
        };

        let bytes = self
            .inner
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("classifier request failed")?
            .error_for_status()
            .context("classifier returned error status")?
            .bytes()
            .await
            .context("failed to read classifier response body")?;

        response_store::save("identify", &self.inner.model, &bytes).await;

        let text = serde_json::from_slice::<GenerateContentResponse>(&bytes)
            .context("failed to deserialize classifier response")?
            .into_text()?;
        let fields = ClassifierFields::parse(&text)?;

        Ok(to_result(fields))
    }
}

/// Normalize parsed classifier fields into an [`IdentificationResult`]:
/// missing fields get generic defaults and the confidence is always the
/// fixed remote value.
fn to_result(fields: ClassifierFields) -> IdentificationResult {
    IdentificationResult {
        common_name: fields.common_name.unwrap_or_else(|| "Unknown Plant".to_owned()),
        scientific_name: fields.scientific_name.unwrap_or_else(|| "Unknown".to_owned()),
        confidence: REMOTE_CONFIDENCE,
        description: fields.description.unwrap_or_else(|| "A houseplant".to_owned()),
    }
}
