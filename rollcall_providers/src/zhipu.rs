use async_trait::async_trait;
use reqwest::Client;
use rollcall_core::{GenerateRequest, JSON_MIME_TYPE, LLMProvider, LLMResponse, Usage};
use serde_json::{Value, json};
use tracing::info;

/// OpenAI-compatible chat completions provider for Zhipu GLM models.
pub struct ZhipuProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ZhipuProvider {
    pub fn new(api_key: String) -> Self {
        info!("Creating ZhipuProvider");
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://open.bigmodel.cn/api/paas/v4".to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn build_body(request: &GenerateRequest) -> Value {
        let mut body = json!({
            "model": request.model,
            "messages": [{ "role": "user", "content": request.prompt }],
        });
        // Chat completions only know "json_object"; other MIME types are dropped.
        if request.response_mime_type.as_deref() == Some(JSON_MIME_TYPE) {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }
}

#[async_trait]
impl LLMProvider for ZhipuProvider {
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<LLMResponse> {
        info!("Sending request to Zhipu API: model={}", request.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&Self::build_body(request))
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing content"))?
            .to_string();

        let usage = response["usage"].as_object().map(|u| Usage {
            prompt_tokens: u32::try_from(u["prompt_tokens"].as_u64().unwrap_or(0)).unwrap_or(0),
            completion_tokens: u32::try_from(u["completion_tokens"].as_u64().unwrap_or(0))
                .unwrap_or(0),
            total_tokens: u32::try_from(u["total_tokens"].as_u64().unwrap_or(0)).unwrap_or(0),
        });

        info!("Received response from Zhipu API");
        Ok(LLMResponse { content, usage })
    }

    fn get_default_model(&self) -> &'static str {
        "glm-4-flash"
    }
}
