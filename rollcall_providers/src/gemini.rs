use async_trait::async_trait;
use reqwest::Client;
use rollcall_core::{GenerateRequest, LLMProvider, LLMResponse, Usage};
use serde_json::{Value, json};
use tracing::info;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: String) -> Self {
        info!("Creating GeminiProvider");
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn build_body(request: &GenerateRequest) -> Value {
        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
        });
        if let Some(mime) = &request.response_mime_type {
            body["generationConfig"] = json!({ "responseMimeType": mime });
        }
        body
    }

    /// Concatenate the text parts of the first candidate.
    fn candidate_text(response: &Value) -> anyhow::Result<String> {
        let parts = response["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing candidate parts"))?;

        let text: String = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();

        if text.is_empty() {
            anyhow::bail!("Invalid response format: candidate has no text");
        }
        Ok(text)
    }

    fn usage(response: &Value) -> Option<Usage> {
        let meta = response["usageMetadata"].as_object()?;
        let count = |key: &str| {
            meta.get(key)
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0)
        };
        Some(Usage {
            prompt_tokens: count("promptTokenCount"),
            completion_tokens: count("candidatesTokenCount"),
            total_tokens: count("totalTokenCount"),
        })
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<LLMResponse> {
        info!("Sending request to Gemini API: model={}", request.model);

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, request.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::build_body(request))
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        let content = Self::candidate_text(&response)?;
        let usage = Self::usage(&response);

        info!("Received response from Gemini API");
        Ok(LLMResponse { content, usage })
    }

    fn get_default_model(&self) -> &'static str {
        "gemini-2.5-flash"
    }
}
